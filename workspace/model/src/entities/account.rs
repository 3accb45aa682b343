use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::category_group;

/// Whether a category tracks money coming in or going out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum AccountKind {
    #[sea_orm(string_value = "income")]
    Income,
    #[sea_orm(string_value = "expense")]
    Expense,
}

/// A named income or expense category owned by a single user.
/// "Account" follows the original schema's naming; it is a budgeting
/// category, not a bank account.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Uuid,
    pub name: String,
    pub kind: AccountKind,
    /// Denormalized display copy of the group name, kept in sync when the
    /// group is renamed. `group_id` is the authoritative link.
    pub group_name: Option<String>,
    /// Must reference a group of the same kind; enforced by the CRUD layer.
    pub group_id: Option<i32>,
    /// Fixed expenses contribute their `budget` to the monthly baseline
    /// regardless of actual spend.
    #[sea_orm(default_value = "false")]
    pub is_fixed: bool,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub budget: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "category_group::Entity",
        from = "Column::GroupId",
        to = "category_group::Column::Id",
        on_delete = "SetNull"
    )]
    Group,
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transaction,
}

impl Related<category_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
