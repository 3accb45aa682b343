//! Common transport-layer types for the budgeting engine.
//! These structs mirror the shapes the compute crate accepts and returns,
//! so an HTTP layer (or any other embedder) can bind and serialize them
//! without duplicating field lists.

mod budget;
mod recurrence;

pub use budget::{
    AllocationRowInput, AllocationRowView, AccountSpendingView, BudgetPlanSummary, BudgetPlanView,
    BudgetStatsQuery, BudgetStatsView, CategorySpendingView, GroupPlanView, PlanMonthRef,
    UpsertBudgetPlanRequest,
};
pub use recurrence::{RecurrenceRule, RepaymentRule};
