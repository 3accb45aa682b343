//! Read/derive path of the planner: income baseline, current-month
//! spending, and the plan-with-groups structure, resolving the plan month
//! lazily on the way.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use tracing::instrument;
use uuid::Uuid;

use common::{
    AccountSpendingView, BudgetPlanSummary, BudgetStatsQuery, BudgetStatsView, CategorySpendingView,
    GroupPlanView,
};
use model::entities::budget_plan_group_allocation as allocation;
use model::entities::transaction::TransactionStatus;

use super::{input_mode_str, queries};
use crate::error::{Result, ValidationError};
use crate::money::{round_amount, round_dp, round_percent};

/// Spent as a share of a category budget, 1 decimal place; zero when the
/// category has no budget.
fn budget_share(spent: Decimal, budget: Decimal) -> Decimal {
    if budget > Decimal::ZERO {
        round_dp(spent / budget * Decimal::ONE_HUNDRED, 1)
    } else {
        Decimal::ZERO
    }
}

/// Computes the monthly budget picture for (user, year, month), creating
/// the plan month on first read. Year and month default to `today`'s.
#[instrument(skip(db))]
pub async fn get_budget_stats(
    db: &DatabaseConnection,
    user_id: Uuid,
    query: BudgetStatsQuery,
    today: NaiveDate,
) -> Result<BudgetStatsView> {
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());
    if !(1..=12).contains(&month) {
        return Err(ValidationError::MonthOutOfRange { month }.into());
    }

    let groups = queries::expense_groups(db, user_id).await?;
    let accounts = queries::expense_accounts(db, user_id).await?;
    let account_ids: Vec<i32> = accounts.iter().map(|a| a.id).collect();

    let baseline = queries::plan_baseline(db, user_id, year, month, &account_ids).await?;

    let spending = queries::sum_by_account(
        db,
        user_id,
        year,
        month,
        TransactionStatus::Completed,
        None,
        &account_ids,
    )
    .await?;
    let manual_spent = queries::sum_by_account(
        db,
        user_id,
        year,
        month,
        TransactionStatus::Completed,
        Some(false),
        &account_ids,
    )
    .await?;
    let manual_pending = queries::sum_by_account(
        db,
        user_id,
        year,
        month,
        TransactionStatus::Pending,
        Some(false),
        &account_ids,
    )
    .await?;
    let auto_by_group =
        queries::auto_reserved_by_group(db, user_id, year, month, &accounts).await?;

    let current_month_spending: Vec<AccountSpendingView> = accounts
        .iter()
        .map(|a| {
            let spent = spending.get(&a.id).copied().unwrap_or_default();
            AccountSpendingView {
                account_id: a.id,
                account_name: a.name.clone(),
                group: a.group_name.clone(),
                group_id: a.group_id,
                is_fixed: a.is_fixed,
                budget: a.budget,
                spent,
                percentage: budget_share(spent, a.budget),
            }
        })
        .collect();

    let resolved = queries::get_or_create_plan_month(
        db,
        user_id,
        year,
        month,
        baseline.default_disposable_income,
        query.reuse_plan,
    )
    .await?;
    let income = resolved.plan.forecast_disposable_income;

    // Manual spend/pending breakdown per group, categories sorted by spend.
    let mut categories_by_group: HashMap<i32, Vec<CategorySpendingView>> = HashMap::new();
    for a in accounts.iter().filter(|a| a.group_id.is_some()) {
        let spent = manual_spent.get(&a.id).copied().unwrap_or_default();
        categories_by_group
            .entry(a.group_id.unwrap_or_default())
            .or_default()
            .push(CategorySpendingView {
                account_id: a.id,
                account_name: a.name.clone(),
                is_fixed: a.is_fixed,
                budget: a.budget,
                spent,
                pending: manual_pending.get(&a.id).copied().unwrap_or_default(),
                percentage: budget_share(spent, a.budget),
            });
    }
    for categories in categories_by_group.values_mut() {
        categories.sort_by(|a, b| b.spent.cmp(&a.spent));
    }

    let allocation_by_group: HashMap<i32, &allocation::Model> = resolved
        .allocations
        .iter()
        .map(|a| (a.group_id, a))
        .collect();

    let group_views: Vec<GroupPlanView> = groups
        .iter()
        .map(|g| {
            let categories = categories_by_group.remove(&g.id).unwrap_or_default();
            let spent_actual: Decimal = categories.iter().map(|c| c.spent).sum();
            let pending: Decimal = categories.iter().map(|c| c.pending).sum();
            let alloc = allocation_by_group.get(&g.id);

            let auto_amount = auto_by_group.get(&g.id).copied().unwrap_or_default();
            let auto_percent = if income > Decimal::ZERO {
                auto_amount / income * Decimal::ONE_HUNDRED
            } else {
                Decimal::ZERO
            };

            // Older versions stored manual + auto together; present only the
            // manual part in the editable allocation.
            let stored_amount = alloc.map(|a| a.planned_amount).unwrap_or_default();
            let planned_amount = (stored_amount - auto_amount).max(Decimal::ZERO);
            let planned_percent = if income > Decimal::ZERO {
                planned_amount / income * Decimal::ONE_HUNDRED
            } else {
                Decimal::ZERO
            };

            GroupPlanView {
                group_id: g.id,
                group_name: g.name.clone(),
                sort_order: g.sort_order,
                is_fixed_group: !categories.is_empty() && categories.iter().all(|c| c.is_fixed),
                spent_actual,
                pending_amount: round_amount(pending),
                auto_planned_amount: round_amount(auto_amount),
                auto_planned_percent: round_percent(auto_percent),
                planned_percent: round_percent(planned_percent),
                planned_amount: round_amount(planned_amount),
                input_mode: alloc
                    .map(|a| input_mode_str(a.input_mode))
                    .unwrap_or("percent")
                    .to_string(),
                priority: alloc.map(|a| a.priority).unwrap_or(g.sort_order),
                categories,
            }
        })
        .collect();

    let manual_allocated_percent: Decimal = group_views.iter().map(|g| g.planned_percent).sum();
    let manual_allocated_amount: Decimal = group_views.iter().map(|g| g.planned_amount).sum();
    let auto_reserve_amount: Decimal = group_views.iter().map(|g| g.auto_planned_amount).sum();
    let auto_reserve_percent = if income > Decimal::ZERO {
        auto_reserve_amount / income * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };

    let manual_allocatable_percent = Decimal::ONE_HUNDRED;
    let manual_allocatable_amount = income.max(Decimal::ZERO);
    let total_allocated_percent = manual_allocated_percent;
    let total_allocated_amount = manual_allocated_amount;

    let budget_plan = BudgetPlanSummary {
        id: resolved.plan.id,
        forecast_disposable_income: income,
        use_gross_income_base: resolved.plan.use_gross_income_base,
        gross_income_reference: round_amount(baseline.average_income),
        committed_manual_amount: round_amount(baseline.committed.manual),
        committed_auto_amount: round_amount(baseline.committed.auto),
        committed_total_amount: round_amount(baseline.committed.total()),
        recommended_net_income: round_amount(baseline.default_disposable_income),
        manual_allocated_percent: round_amount(manual_allocated_percent),
        manual_allocated_amount: round_amount(manual_allocated_amount),
        manual_allocatable_percent: round_amount(manual_allocatable_percent),
        manual_allocatable_amount: round_amount(manual_allocatable_amount),
        manual_remaining_percent: round_amount(manual_allocatable_percent - manual_allocated_percent),
        manual_remaining_amount: round_amount(manual_allocatable_amount - manual_allocated_amount),
        auto_reserve_percent: round_amount(auto_reserve_percent),
        auto_reserve_amount: round_amount(auto_reserve_amount),
        total_allocated_percent: round_amount(total_allocated_percent),
        total_allocated_amount: round_amount(total_allocated_amount),
        remaining_percent: round_amount((Decimal::ONE_HUNDRED - total_allocated_percent).max(Decimal::ZERO)),
        remaining_amount: round_amount((income - total_allocated_amount).max(Decimal::ZERO)),
        copied_from: resolved.copied_from,
        groups: group_views,
    };

    Ok(BudgetStatsView {
        average_income: baseline.average_income,
        fixed_expenses_total: baseline.fixed_expenses_total,
        disposable_income: baseline.default_disposable_income,
        selected_year: year,
        selected_month: month,
        current_month_spending,
        budget_plan,
    })
}
