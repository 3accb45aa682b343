//! Write path of the planner: validate and normalize the submitted
//! allocation set, then replace the plan month's rows in one transaction.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set, TransactionTrait,
};
use tracing::{debug, instrument};
use uuid::Uuid;

use common::{AllocationRowView, BudgetPlanView, UpsertBudgetPlanRequest};
use model::entities::budget_plan_group_allocation::{self as allocation, AllocationInputMode};

use super::{input_mode_str, queries};
use crate::error::{Result, ValidationError};
use crate::money::{round_amount, round_percent};

/// One row after validation, holding the rounded figures as stored.
struct NormalizedRow {
    group_id: i32,
    input_mode: AllocationInputMode,
    planned_percent: Decimal,
    planned_amount: Decimal,
    priority: i32,
}

/// Replaces the allocation set of (user, year, month) with the submitted
/// rows. The plan month is created on first write; omitted request fields
/// keep its stored forecast and income base. Nothing is persisted when any
/// row fails validation.
#[instrument(skip(db, request), fields(groups = request.groups.len()))]
pub async fn upsert_budget_plan(
    db: &DatabaseConnection,
    user_id: Uuid,
    year: i32,
    month: u32,
    request: UpsertBudgetPlanRequest,
) -> Result<BudgetPlanView> {
    if !(1..=12).contains(&month) {
        return Err(ValidationError::MonthOutOfRange { month }.into());
    }

    let accounts = queries::expense_accounts(db, user_id).await?;
    let account_ids: Vec<i32> = accounts.iter().map(|a| a.id).collect();
    let baseline = queries::plan_baseline(db, user_id, year, month, &account_ids).await?;
    let resolved = queries::get_or_create_plan_month(
        db,
        user_id,
        year,
        month,
        baseline.default_disposable_income,
        false,
    )
    .await?;
    let plan = resolved.plan;

    let income = request
        .forecast_disposable_income
        .unwrap_or(plan.forecast_disposable_income);
    if income < Decimal::ZERO {
        return Err(ValidationError::NegativeForecastIncome { value: income }.into());
    }
    let use_gross = request
        .use_gross_income_base
        .unwrap_or(plan.use_gross_income_base);

    let requested_ids: Vec<i32> = request.groups.iter().map(|g| g.group_id).collect();
    let owned = queries::owned_expense_groups(db, user_id, &requested_ids).await?;
    let mut invalid: Vec<i32> = requested_ids
        .iter()
        .copied()
        .filter(|id| !owned.contains_key(id))
        .collect();
    if !invalid.is_empty() {
        invalid.sort_unstable();
        invalid.dedup();
        return Err(ValidationError::InvalidGroupIds { ids: invalid }.into());
    }

    // Ceiling checks run on the unrounded running totals; only the stored
    // per-row figures are rounded.
    let mut total_percent = Decimal::ZERO;
    let mut total_amount = Decimal::ZERO;
    let mut rows: Vec<NormalizedRow> = Vec::with_capacity(request.groups.len());
    for input in &request.groups {
        let mode = match input.input_mode.as_deref() {
            Some(raw) if raw.trim().eq_ignore_ascii_case("amount") => AllocationInputMode::Amount,
            _ => AllocationInputMode::Percent,
        };

        let (percent, amount) = match mode {
            AllocationInputMode::Percent => {
                let percent = input.planned_percent.unwrap_or_default().max(Decimal::ZERO);
                (percent, income * percent / Decimal::ONE_HUNDRED)
            }
            AllocationInputMode::Amount => {
                let amount = input.planned_amount.unwrap_or_default().max(Decimal::ZERO);
                if income == Decimal::ZERO && amount > Decimal::ZERO {
                    return Err(ValidationError::AmountModeWithZeroIncome {
                        group_id: input.group_id,
                    }
                    .into());
                }
                let percent = if income > Decimal::ZERO {
                    amount / income * Decimal::ONE_HUNDRED
                } else {
                    Decimal::ZERO
                };
                (percent, amount)
            }
        };

        total_percent += percent;
        total_amount += amount;
        rows.push(NormalizedRow {
            group_id: input.group_id,
            input_mode: mode,
            planned_percent: round_percent(percent),
            planned_amount: round_amount(amount),
            priority: input.priority.unwrap_or(0),
        });
    }

    // Small epsilons absorb accumulated division noise at exactly-full plans.
    let percent_ceiling = Decimal::ONE_HUNDRED + Decimal::new(1, 4);
    if total_percent > percent_ceiling {
        return Err(ValidationError::PercentOverCeiling {
            attempted: total_percent,
            allowed: Decimal::ONE_HUNDRED,
        }
        .into());
    }
    let amount_ceiling = income + Decimal::new(1, 2);
    if total_amount > amount_ceiling {
        return Err(ValidationError::AmountOverCeiling {
            attempted: total_amount,
            allowed: income,
        }
        .into());
    }

    // Plan-month update and the full row replace commit together, so a
    // failure on either side leaves the previous plan intact.
    let now = Utc::now();
    let txn = db.begin().await?;

    let mut plan_update = plan.clone().into_active_model();
    plan_update.forecast_disposable_income = Set(income);
    plan_update.use_gross_income_base = Set(use_gross);
    plan_update.updated_at = Set(now);
    let plan = plan_update.update(&txn).await?;

    allocation::Entity::delete_many()
        .filter(allocation::Column::UserId.eq(user_id))
        .filter(allocation::Column::PlanMonthId.eq(plan.id))
        .exec(&txn)
        .await?;

    let mut saved: Vec<allocation::Model> = Vec::with_capacity(rows.len());
    for row in &rows {
        let inserted = allocation::ActiveModel {
            user_id: Set(user_id),
            plan_month_id: Set(plan.id),
            group_id: Set(row.group_id),
            input_mode: Set(row.input_mode),
            planned_percent: Set(row.planned_percent),
            planned_amount: Set(row.planned_amount),
            priority: Set(row.priority),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        saved.push(inserted);
    }

    txn.commit().await?;
    debug!(plan_id = plan.id, rows = saved.len(), "replaced allocation set");

    let groups = queries::expense_groups(db, user_id).await?;
    let auto_by_group = queries::auto_reserved_by_group(db, user_id, year, month, &accounts).await?;
    let auto_reserve_amount: Decimal = groups
        .iter()
        .filter_map(|g| auto_by_group.get(&g.id))
        .map(|amount| round_amount(*amount))
        .sum();
    let auto_reserve_percent = if income > Decimal::ZERO {
        auto_reserve_amount / income * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };

    let allocated_percent: Decimal = saved.iter().map(|r| r.planned_percent).sum();
    let allocated_amount: Decimal = saved.iter().map(|r| r.planned_amount).sum();
    let allocatable_amount = income.max(Decimal::ZERO);

    Ok(BudgetPlanView {
        year,
        month,
        forecast_disposable_income: income,
        use_gross_income_base: use_gross,
        manual_allocated_percent: round_amount(allocated_percent),
        manual_allocated_amount: round_amount(allocated_amount),
        manual_allocatable_percent: round_amount(Decimal::ONE_HUNDRED),
        manual_allocatable_amount: round_amount(allocatable_amount),
        manual_remaining_percent: round_amount(Decimal::ONE_HUNDRED - allocated_percent),
        manual_remaining_amount: round_amount(allocatable_amount - allocated_amount),
        auto_reserve_percent: round_amount(auto_reserve_percent),
        auto_reserve_amount: round_amount(auto_reserve_amount),
        total_allocated_percent: round_amount(allocated_percent),
        total_allocated_amount: round_amount(allocated_amount),
        remaining_percent: round_amount((Decimal::ONE_HUNDRED - allocated_percent).max(Decimal::ZERO)),
        remaining_amount: round_amount((income - allocated_amount).max(Decimal::ZERO)),
        groups: saved
            .iter()
            .map(|r| AllocationRowView {
                group_id: r.group_id,
                input_mode: input_mode_str(r.input_mode).to_string(),
                planned_percent: r.planned_percent,
                planned_amount: r.planned_amount,
                priority: r.priority,
            })
            .collect(),
    })
}
