use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

/// The per-user-per-calendar-month budget configuration record.
/// Created lazily on first read or write of a month; never deleted, only
/// updated in place. Unique per (user, year, month).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budget_plan_months")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Uuid,
    pub year: i32,
    /// 1-12, validated before any write.
    pub month: i32,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub forecast_disposable_income: Decimal,
    /// Whether the forecast figure is computed against gross income.
    #[sea_orm(default_value = "false")]
    pub use_gross_income_base: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::budget_plan_group_allocation::Entity")]
    Allocation,
}

impl Related<super::budget_plan_group_allocation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Allocation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
