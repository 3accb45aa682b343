use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::{budget_plan_month, category_group};

/// Which of the two stored figures the user actually edited. The other one
/// is derived from the plan month's forecast income on every save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum AllocationInputMode {
    #[sea_orm(string_value = "percent")]
    Percent,
    #[sea_orm(string_value = "amount")]
    Amount,
}

/// One category group's planned share of a plan month's disposable income.
/// Unique per (plan month, group); the full set for a month is replaced on
/// every save rather than diffed.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budget_plan_group_allocations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Uuid,
    pub plan_month_id: i32,
    pub group_id: i32,
    pub input_mode: AllocationInputMode,
    /// Kept numerically consistent with `planned_amount`:
    /// percent * forecast income / 100 = amount, up to rounding.
    #[sea_orm(column_type = "Decimal(Some((9, 4)))")]
    pub planned_percent: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub planned_amount: Decimal,
    #[sea_orm(default_value = "0")]
    pub priority: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "budget_plan_month::Entity",
        from = "Column::PlanMonthId",
        to = "budget_plan_month::Column::Id",
        on_delete = "Cascade"
    )]
    PlanMonth,
    #[sea_orm(
        belongs_to = "category_group::Entity",
        from = "Column::GroupId",
        to = "category_group::Column::Id",
        on_delete = "Cascade"
    )]
    Group,
}

impl Related<budget_plan_month::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlanMonth.def()
    }
}

impl Related<category_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
