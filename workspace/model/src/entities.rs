//! This file serves as the root for all SeaORM entity modules.
//! The schema models a multi-tenant budgeting ledger: user-scoped category
//! groups and categories ("accounts"), dated transactions, and the monthly
//! budget plan rows the allocation planner reads and writes.

pub mod account;
pub mod budget_plan_group_allocation;
pub mod budget_plan_month;
pub mod category_group;
pub mod transaction;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::account::Entity as Account;
    pub use super::budget_plan_group_allocation::Entity as BudgetPlanGroupAllocation;
    pub use super::budget_plan_month::Entity as BudgetPlanMonth;
    pub use super::category_group::Entity as CategoryGroup;
    pub use super::transaction::Entity as Transaction;
}
