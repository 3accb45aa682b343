//! Budgetcast: a recurrence/repayment generator and monthly allocation
//! planner over a SeaORM-backed ledger.
//!
//! The engine is split across the workspace crates and re-exported here as
//! the single surface an embedding service depends on:
//!
//! - [`model`] holds the entities, [`migration`] the schema.
//! - [`compute`] is the engine proper; its planner functions take a
//!   `sea_orm::DatabaseConnection` plus an explicit reference date.
//! - [`common`] carries the serde request/response shapes.

pub use common::{
    AccountSpendingView, AllocationRowInput, AllocationRowView, BudgetPlanSummary, BudgetPlanView,
    BudgetStatsQuery, BudgetStatsView, CategorySpendingView, GroupPlanView, PlanMonthRef,
    RecurrenceRule, RepaymentRule, UpsertBudgetPlanRequest,
};
pub use compute::error::{ComputeError, ValidationError};
pub use compute::recurrence::{TransactionDraft, TransactionSeed};
pub use compute::retry::RetryPolicy;
pub use compute::{batch, generate_recurrence, generate_repayment_plan, get_budget_stats, upsert_budget_plan};
pub use migration::{Migrator, MigratorTrait};
pub use model::entities;
pub use model::init_tracing;
