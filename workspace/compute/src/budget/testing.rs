//! Shared fixtures for the planner tests: an in-memory database with the
//! schema applied, plus terse row constructors.

use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use migration::{Migrator, MigratorTrait};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, Set};
use uuid::Uuid;

use model::entities::account::{self, AccountKind};
use model::entities::budget_plan_group_allocation::{self as allocation, AllocationInputMode};
use model::entities::budget_plan_month as plan_month;
use model::entities::category_group;
use model::entities::transaction::{self, TransactionStatus};

use crate::budget::upsert::upsert_budget_plan;
use common::{AllocationRowInput, UpsertBudgetPlanRequest};

pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    db.execute_unprepared("PRAGMA foreign_keys = ON;").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub fn user_id() -> Uuid {
    Uuid::new_v4()
}

pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

pub async fn create_group(
    db: &DatabaseConnection,
    user: Uuid,
    name: &str,
    kind: AccountKind,
    sort_order: i32,
) -> category_group::Model {
    category_group::ActiveModel {
        user_id: Set(user),
        name: Set(name.to_string()),
        kind: Set(kind),
        sort_order: Set(sort_order),
        is_archived: Set(false),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn archive_group(db: &DatabaseConnection, group: &category_group::Model) {
    let mut update: category_group::ActiveModel = group.clone().into();
    update.is_archived = Set(true);
    update.update(db).await.unwrap();
}

pub async fn create_account(
    db: &DatabaseConnection,
    user: Uuid,
    name: &str,
    kind: AccountKind,
    group: Option<&category_group::Model>,
    is_fixed: bool,
    budget: &str,
) -> account::Model {
    account::ActiveModel {
        user_id: Set(user),
        name: Set(name.to_string()),
        kind: Set(kind),
        group_name: Set(group.map(|g| g.name.clone())),
        group_id: Set(group.map(|g| g.id)),
        is_fixed: Set(is_fixed),
        budget: Set(dec(budget)),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

async fn create_tx(
    db: &DatabaseConnection,
    user: Uuid,
    account_id: i32,
    date: NaiveDate,
    amount: &str,
    status: TransactionStatus,
    is_auto: bool,
) -> transaction::Model {
    transaction::ActiveModel {
        account_id: Set(account_id),
        user_id: Set(user),
        date: Set(date),
        amount: Set(dec(amount)),
        note: Set(None),
        status: Set(status),
        is_auto: Set(is_auto),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn completed_tx(
    db: &DatabaseConnection,
    user: Uuid,
    account_id: i32,
    date: NaiveDate,
    amount: &str,
) -> transaction::Model {
    create_tx(db, user, account_id, date, amount, TransactionStatus::Completed, false).await
}

pub async fn pending_tx(
    db: &DatabaseConnection,
    user: Uuid,
    account_id: i32,
    date: NaiveDate,
    amount: &str,
) -> transaction::Model {
    create_tx(db, user, account_id, date, amount, TransactionStatus::Pending, false).await
}

pub async fn auto_completed_tx(
    db: &DatabaseConnection,
    user: Uuid,
    account_id: i32,
    date: NaiveDate,
    amount: &str,
) -> transaction::Model {
    create_tx(db, user, account_id, date, amount, TransactionStatus::Completed, true).await
}

pub async fn auto_pending_tx(
    db: &DatabaseConnection,
    user: Uuid,
    account_id: i32,
    date: NaiveDate,
    amount: &str,
) -> transaction::Model {
    create_tx(db, user, account_id, date, amount, TransactionStatus::Pending, true).await
}

pub async fn create_plan_month(
    db: &DatabaseConnection,
    user: Uuid,
    year: i32,
    month: i32,
    income: &str,
) -> plan_month::Model {
    let now = Utc::now();
    plan_month::ActiveModel {
        user_id: Set(user),
        year: Set(year),
        month: Set(month),
        forecast_disposable_income: Set(dec(income)),
        use_gross_income_base: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn create_allocation(
    db: &DatabaseConnection,
    user: Uuid,
    plan_month_id: i32,
    group_id: i32,
    percent: &str,
    amount: &str,
) -> allocation::Model {
    let now = Utc::now();
    allocation::ActiveModel {
        user_id: Set(user),
        plan_month_id: Set(plan_month_id),
        group_id: Set(group_id),
        input_mode: Set(AllocationInputMode::Percent),
        planned_percent: Set(dec(percent)),
        planned_amount: Set(dec(amount)),
        priority: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

/// Saves a percent-mode plan through the write path.
pub async fn upsert_plan_fixture(
    db: &DatabaseConnection,
    user: Uuid,
    year: i32,
    month: u32,
    income: &str,
    rows: &[(i32, &str)],
) {
    let request = UpsertBudgetPlanRequest {
        forecast_disposable_income: Some(dec(income)),
        use_gross_income_base: None,
        groups: rows
            .iter()
            .map(|(group_id, percent)| AllocationRowInput {
                group_id: *group_id,
                input_mode: Some("percent".to_string()),
                planned_percent: Some(dec(percent)),
                planned_amount: None,
                priority: None,
            })
            .collect(),
    };
    upsert_budget_plan(db, user, year, month, request).await.unwrap();
}
