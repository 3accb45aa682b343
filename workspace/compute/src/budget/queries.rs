//! The planner's persistence port: every aggregate read and the plan-month
//! resolve-or-create step, expressed as explicit queries plus in-memory
//! folds over the fetched rows.

use std::collections::HashMap;

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::{debug, instrument};
use uuid::Uuid;

use common::PlanMonthRef;
use model::entities::account::{self, AccountKind};
use model::entities::transaction::{self, TransactionStatus};
use model::entities::{budget_plan_group_allocation as allocation, budget_plan_month as plan_month, category_group};

use crate::calendar::{month_bounds, month_start, month_start_back};
use crate::error::Result;

/// Actual expense obligations of the target month, split by origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommittedExpenses {
    pub manual: Decimal,
    pub auto: Decimal,
}

impl CommittedExpenses {
    pub fn total(&self) -> Decimal {
        self.manual + self.auto
    }
}

/// The income-side figures both planner paths derive before touching the
/// plan month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanBaseline {
    pub average_income: Decimal,
    pub fixed_expenses_total: Decimal,
    pub committed: CommittedExpenses,
    /// max(0, average income - committed expenses); the forecast used when
    /// the caller supplies none.
    pub default_disposable_income: Decimal,
}

/// A resolved plan month together with its allocation rows and, when it was
/// just seeded from an earlier month, that month's coordinates.
#[derive(Debug, Clone)]
pub struct ResolvedPlanMonth {
    pub plan: plan_month::Model,
    pub allocations: Vec<allocation::Model>,
    pub copied_from: Option<PlanMonthRef>,
}

/// Non-archived expense groups, ordered the way the caller renders them.
pub async fn expense_groups(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Vec<category_group::Model>> {
    let groups = category_group::Entity::find()
        .filter(category_group::Column::UserId.eq(user_id))
        .filter(category_group::Column::Kind.eq(AccountKind::Expense))
        .filter(category_group::Column::IsArchived.eq(false))
        .order_by_asc(category_group::Column::SortOrder)
        .order_by_asc(category_group::Column::Name)
        .all(db)
        .await?;
    Ok(groups)
}

/// All expense categories of the user, ordered by (group name, name).
pub async fn expense_accounts(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Vec<account::Model>> {
    let accounts = account::Entity::find()
        .filter(account::Column::UserId.eq(user_id))
        .filter(account::Column::Kind.eq(AccountKind::Expense))
        .order_by_asc(account::Column::GroupName)
        .order_by_asc(account::Column::Name)
        .all(db)
        .await?;
    Ok(accounts)
}

/// Mean of the completed income sums of the three complete calendar months
/// strictly before the target month. Months without income rows do not
/// participate in the mean; no income at all yields zero.
#[instrument(skip(db))]
pub async fn average_trailing_income(
    db: &DatabaseConnection,
    user_id: Uuid,
    year: i32,
    month: u32,
) -> Result<Decimal> {
    let date_to = month_start(year, month);
    let date_from = month_start_back(year, month, 3);

    let income_ids: Vec<i32> = account::Entity::find()
        .filter(account::Column::UserId.eq(user_id))
        .filter(account::Column::Kind.eq(AccountKind::Income))
        .all(db)
        .await?
        .into_iter()
        .map(|a| a.id)
        .collect();
    if income_ids.is_empty() {
        return Ok(Decimal::ZERO);
    }

    let rows = transaction::Entity::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .filter(transaction::Column::Status.eq(TransactionStatus::Completed))
        .filter(transaction::Column::AccountId.is_in(income_ids))
        .filter(transaction::Column::Date.gte(date_from))
        .filter(transaction::Column::Date.lt(date_to))
        .all(db)
        .await?;

    let mut by_month: HashMap<(i32, u32), Decimal> = HashMap::new();
    for tx in rows {
        *by_month
            .entry((tx.date.year(), tx.date.month()))
            .or_default() += tx.amount;
    }

    if by_month.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let total: Decimal = by_month.values().copied().sum();
    let average = total / Decimal::from(by_month.len() as u64);
    debug!(%average, months = by_month.len(), "trailing income");
    Ok(average)
}

/// Sum of `budget` over the user's fixed expense categories; the static
/// baseline independent of actual spend.
pub async fn fixed_expense_total(db: &DatabaseConnection, user_id: Uuid) -> Result<Decimal> {
    let accounts = account::Entity::find()
        .filter(account::Column::UserId.eq(user_id))
        .filter(account::Column::Kind.eq(AccountKind::Expense))
        .filter(account::Column::IsFixed.eq(true))
        .all(db)
        .await?;
    Ok(accounts.iter().map(|a| a.budget).sum())
}

/// Completed-plus-pending expense transactions of the target month, split
/// into manual and auto-debit buckets.
#[instrument(skip(db, expense_account_ids))]
pub async fn committed_expense_split(
    db: &DatabaseConnection,
    user_id: Uuid,
    year: i32,
    month: u32,
    expense_account_ids: &[i32],
) -> Result<CommittedExpenses> {
    let (date_from, date_to) = month_bounds(year, month);
    let rows = transaction::Entity::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .filter(transaction::Column::AccountId.is_in(expense_account_ids.to_vec()))
        .filter(transaction::Column::Date.gte(date_from))
        .filter(transaction::Column::Date.lt(date_to))
        .all(db)
        .await?;

    let mut committed = CommittedExpenses {
        manual: Decimal::ZERO,
        auto: Decimal::ZERO,
    };
    for tx in rows {
        if tx.is_auto {
            committed.auto += tx.amount;
        } else {
            committed.manual += tx.amount;
        }
    }
    Ok(committed)
}

/// Per-category transaction sums for the target month, optionally filtered
/// by origin. Only the given (expense) accounts participate.
pub async fn sum_by_account(
    db: &DatabaseConnection,
    user_id: Uuid,
    year: i32,
    month: u32,
    status: TransactionStatus,
    is_auto: Option<bool>,
    expense_account_ids: &[i32],
) -> Result<HashMap<i32, Decimal>> {
    let (date_from, date_to) = month_bounds(year, month);
    let mut query = transaction::Entity::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .filter(transaction::Column::Status.eq(status))
        .filter(transaction::Column::AccountId.is_in(expense_account_ids.to_vec()))
        .filter(transaction::Column::Date.gte(date_from))
        .filter(transaction::Column::Date.lt(date_to));
    if let Some(is_auto) = is_auto {
        query = query.filter(transaction::Column::IsAuto.eq(is_auto));
    }

    let mut sums: HashMap<i32, Decimal> = HashMap::new();
    for tx in query.all(db).await? {
        *sums.entry(tx.account_id).or_default() += tx.amount;
    }
    Ok(sums)
}

/// Auto-debit expense totals of the month, keyed by the category group the
/// spending category belongs to. Categories without a group are excluded.
/// No status filter: pending auto-debits are already reserved.
pub async fn auto_reserved_by_group(
    db: &DatabaseConnection,
    user_id: Uuid,
    year: i32,
    month: u32,
    accounts: &[account::Model],
) -> Result<HashMap<i32, Decimal>> {
    let group_by_account: HashMap<i32, i32> = accounts
        .iter()
        .filter_map(|a| a.group_id.map(|g| (a.id, g)))
        .collect();
    if group_by_account.is_empty() {
        return Ok(HashMap::new());
    }

    let (date_from, date_to) = month_bounds(year, month);
    let rows = transaction::Entity::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .filter(transaction::Column::IsAuto.eq(true))
        .filter(
            transaction::Column::AccountId.is_in(group_by_account.keys().copied().collect::<Vec<_>>()),
        )
        .filter(transaction::Column::Date.gte(date_from))
        .filter(transaction::Column::Date.lt(date_to))
        .all(db)
        .await?;

    let mut by_group: HashMap<i32, Decimal> = HashMap::new();
    for tx in rows {
        if let Some(group_id) = group_by_account.get(&tx.account_id) {
            *by_group.entry(*group_id).or_default() += tx.amount;
        }
    }
    Ok(by_group)
}

/// Derives the income baseline shared by the read and write paths.
#[instrument(skip(db, expense_account_ids))]
pub async fn plan_baseline(
    db: &DatabaseConnection,
    user_id: Uuid,
    year: i32,
    month: u32,
    expense_account_ids: &[i32],
) -> Result<PlanBaseline> {
    let average_income = average_trailing_income(db, user_id, year, month).await?;
    let fixed_expenses_total = fixed_expense_total(db, user_id).await?;
    let committed = committed_expense_split(db, user_id, year, month, expense_account_ids).await?;
    let default_disposable_income = (average_income - committed.total()).max(Decimal::ZERO);

    Ok(PlanBaseline {
        average_income,
        fixed_expenses_total,
        committed,
        default_disposable_income,
    })
}

/// Fetches the plan month for (user, year, month), creating it when absent.
///
/// A newly created month takes `default_income` as its forecast, unless
/// `reuse_previous` is set and a strictly earlier plan month exists, in
/// which case that month's forecast and allocation set are copied (fresh
/// row ids, same figures) and its coordinates reported as `copied_from`.
#[instrument(skip(db))]
pub async fn get_or_create_plan_month(
    db: &DatabaseConnection,
    user_id: Uuid,
    year: i32,
    month: u32,
    default_income: Decimal,
    reuse_previous: bool,
) -> Result<ResolvedPlanMonth> {
    let existing = plan_month::Entity::find()
        .filter(plan_month::Column::UserId.eq(user_id))
        .filter(plan_month::Column::Year.eq(year))
        .filter(plan_month::Column::Month.eq(month as i32))
        .one(db)
        .await?;

    if let Some(plan) = existing {
        let allocations = allocations_for(db, user_id, plan.id).await?;
        return Ok(ResolvedPlanMonth {
            plan,
            allocations,
            copied_from: None,
        });
    }

    let now = Utc::now();
    let mut forecast = default_income;
    let mut use_gross = false;
    let mut copied_from = None;
    let mut source_rows: Vec<allocation::Model> = Vec::new();

    if reuse_previous {
        let previous = plan_month::Entity::find()
            .filter(plan_month::Column::UserId.eq(user_id))
            .filter(
                Condition::any()
                    .add(plan_month::Column::Year.lt(year))
                    .add(
                        Condition::all()
                            .add(plan_month::Column::Year.eq(year))
                            .add(plan_month::Column::Month.lt(month as i32)),
                    ),
            )
            .order_by_desc(plan_month::Column::Year)
            .order_by_desc(plan_month::Column::Month)
            .one(db)
            .await?;

        if let Some(previous) = previous {
            forecast = previous.forecast_disposable_income;
            use_gross = previous.use_gross_income_base;
            source_rows = allocations_for(db, user_id, previous.id).await?;
            copied_from = Some(PlanMonthRef {
                year: previous.year,
                month: previous.month as u32,
            });
            debug!(?copied_from, rows = source_rows.len(), "seeding plan month from prior month");
        }
    }

    let plan = plan_month::ActiveModel {
        user_id: Set(user_id),
        year: Set(year),
        month: Set(month as i32),
        forecast_disposable_income: Set(forecast),
        use_gross_income_base: Set(use_gross),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let mut allocations = Vec::with_capacity(source_rows.len());
    for source in source_rows {
        let copied = allocation::ActiveModel {
            user_id: Set(user_id),
            plan_month_id: Set(plan.id),
            group_id: Set(source.group_id),
            input_mode: Set(source.input_mode),
            planned_percent: Set(source.planned_percent),
            planned_amount: Set(source.planned_amount),
            priority: Set(source.priority),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
        allocations.push(copied);
    }

    Ok(ResolvedPlanMonth {
        plan,
        allocations,
        copied_from,
    })
}

/// Allocation rows of one plan month.
pub async fn allocations_for(
    db: &DatabaseConnection,
    user_id: Uuid,
    plan_month_id: i32,
) -> Result<Vec<allocation::Model>> {
    let rows = allocation::Entity::find()
        .filter(allocation::Column::UserId.eq(user_id))
        .filter(allocation::Column::PlanMonthId.eq(plan_month_id))
        .all(db)
        .await?;
    Ok(rows)
}

/// Expense groups of the user among the requested ids. Used to validate a
/// submitted allocation set; any requested id missing from the result is
/// foreign or mistyped.
pub async fn owned_expense_groups(
    db: &DatabaseConnection,
    user_id: Uuid,
    group_ids: &[i32],
) -> Result<HashMap<i32, category_group::Model>> {
    let groups = category_group::Entity::find()
        .filter(category_group::Column::UserId.eq(user_id))
        .filter(category_group::Column::Kind.eq(AccountKind::Expense))
        .filter(category_group::Column::Id.is_in(group_ids.to_vec()))
        .all(db)
        .await?;
    Ok(groups.into_iter().map(|g| (g.id, g)).collect())
}
