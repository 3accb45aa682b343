//! Request and response shapes for the allocation planner.
//!
//! All money fields are `Decimal` rounded to 2 decimal places and percent
//! fields to 4 (aggregate percents to 2) before they reach these structs;
//! the planner never exposes unrounded intermediates.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Query parameters of the stats/read path. Year and month default to the
/// caller-supplied reference date when omitted.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema)]
pub struct BudgetStatsQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    /// Seed a missing plan month by copying the nearest prior month's
    /// forecast income and allocation set.
    pub reuse_plan: bool,
}

/// One submitted allocation row of the write path.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AllocationRowInput {
    pub group_id: i32,
    /// "amount" selects amount mode; anything else falls back to "percent".
    pub input_mode: Option<String>,
    pub planned_percent: Option<Decimal>,
    pub planned_amount: Option<Decimal>,
    pub priority: Option<i32>,
}

/// Body of the write path. Omitted fields keep the plan month's stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpsertBudgetPlanRequest {
    pub forecast_disposable_income: Option<Decimal>,
    pub use_gross_income_base: Option<bool>,
    pub groups: Vec<AllocationRowInput>,
}

/// Current-month spend of one expense category, across manual and auto rows.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct AccountSpendingView {
    pub account_id: i32,
    pub account_name: String,
    pub group: Option<String>,
    pub group_id: Option<i32>,
    pub is_fixed: bool,
    pub budget: Decimal,
    pub spent: Decimal,
    /// Spent as a share of the category budget, 1 decimal place.
    pub percentage: Decimal,
}

/// Manual spend/pending breakdown of one category inside its group.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct CategorySpendingView {
    pub account_id: i32,
    pub account_name: String,
    pub is_fixed: bool,
    pub budget: Decimal,
    pub spent: Decimal,
    pub pending: Decimal,
    pub percentage: Decimal,
}

/// One expense group's slice of the plan month, as presented to the caller.
/// `planned_*` is the manual share only; `auto_planned_*` is what auto-debits
/// already reserved this month.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct GroupPlanView {
    pub group_id: i32,
    pub group_name: String,
    pub sort_order: i32,
    pub is_fixed_group: bool,
    pub categories: Vec<CategorySpendingView>,
    pub spent_actual: Decimal,
    pub pending_amount: Decimal,
    pub auto_planned_amount: Decimal,
    pub auto_planned_percent: Decimal,
    pub planned_percent: Decimal,
    pub planned_amount: Decimal,
    pub input_mode: String,
    pub priority: i32,
}

/// Which earlier month a lazily created plan was copied from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct PlanMonthRef {
    pub year: i32,
    pub month: u32,
}

/// The nested plan object of the read path: the plan month's stored figures
/// plus every aggregate the caller needs to render headroom.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct BudgetPlanSummary {
    pub id: i32,
    pub forecast_disposable_income: Decimal,
    pub use_gross_income_base: bool,
    pub gross_income_reference: Decimal,
    pub committed_manual_amount: Decimal,
    pub committed_auto_amount: Decimal,
    pub committed_total_amount: Decimal,
    pub recommended_net_income: Decimal,
    pub manual_allocated_percent: Decimal,
    pub manual_allocated_amount: Decimal,
    pub manual_allocatable_percent: Decimal,
    pub manual_allocatable_amount: Decimal,
    pub manual_remaining_percent: Decimal,
    pub manual_remaining_amount: Decimal,
    pub auto_reserve_percent: Decimal,
    pub auto_reserve_amount: Decimal,
    pub total_allocated_percent: Decimal,
    pub total_allocated_amount: Decimal,
    pub remaining_percent: Decimal,
    pub remaining_amount: Decimal,
    pub copied_from: Option<PlanMonthRef>,
    pub groups: Vec<GroupPlanView>,
}

/// Full read-path response: income baseline, per-category current-month
/// spending, and the plan-with-groups structure.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct BudgetStatsView {
    pub average_income: Decimal,
    pub fixed_expenses_total: Decimal,
    pub disposable_income: Decimal,
    pub selected_year: i32,
    pub selected_month: u32,
    pub current_month_spending: Vec<AccountSpendingView>,
    pub budget_plan: BudgetPlanSummary,
}

/// One normalized allocation row echoed back by the write path.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct AllocationRowView {
    pub group_id: i32,
    pub input_mode: String,
    pub planned_percent: Decimal,
    pub planned_amount: Decimal,
    pub priority: i32,
}

/// Write-path response: the saved plan month plus the same aggregate totals
/// the read path reports.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct BudgetPlanView {
    pub year: i32,
    pub month: u32,
    pub forecast_disposable_income: Decimal,
    pub use_gross_income_base: bool,
    pub manual_allocated_percent: Decimal,
    pub manual_allocated_amount: Decimal,
    pub manual_allocatable_percent: Decimal,
    pub manual_allocatable_amount: Decimal,
    pub manual_remaining_percent: Decimal,
    pub manual_remaining_amount: Decimal,
    pub auto_reserve_percent: Decimal,
    pub auto_reserve_amount: Decimal,
    pub total_allocated_percent: Decimal,
    pub total_allocated_amount: Decimal,
    pub remaining_percent: Decimal,
    pub remaining_amount: Decimal,
    pub groups: Vec<AllocationRowView>,
}
