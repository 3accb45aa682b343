use sea_orm::entity::prelude::*;

use super::account::AccountKind;

/// A user-scoped bucket of income or expense categories.
/// Budget plan allocations are keyed by expense groups.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "category_groups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Uuid,
    /// Unique per (user, kind) case-insensitively; the CRUD layer stores the
    /// name as entered and compares lowercased.
    pub name: String,
    pub kind: AccountKind,
    #[sea_orm(default_value = "0")]
    pub sort_order: i32,
    #[sea_orm(default_value = "false")]
    pub is_archived: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::account::Entity")]
    Account,
    #[sea_orm(has_many = "super::budget_plan_group_allocation::Entity")]
    Allocation,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::budget_plan_group_allocation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Allocation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
