//! Persistence of generated transaction batches.
//!
//! Rows are inserted one at a time with bounded retry on transient
//! connection errors. A failure after partial persistence leaves the earlier
//! rows committed; callers must treat batch submission as at-least-once and
//! detect duplicates on resubmit.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::{debug, instrument};
use uuid::Uuid;

use model::entities::{account, transaction};

use crate::error::{ComputeError, Result};
use crate::recurrence::TransactionDraft;
use crate::retry::{with_retry, RetryPolicy};

/// Inserts the drafts in order, verifying first that every referenced
/// account belongs to the drafts' user.
#[instrument(skip(db, drafts), fields(count = drafts.len()))]
pub async fn insert_drafts(
    db: &DatabaseConnection,
    drafts: Vec<TransactionDraft>,
    policy: RetryPolicy,
) -> Result<Vec<transaction::Model>> {
    let mut account_ids: Vec<i32> = drafts.iter().map(|d| d.account_id).collect();
    account_ids.sort_unstable();
    account_ids.dedup();
    for account_id in account_ids {
        let user_id = drafts
            .iter()
            .find(|d| d.account_id == account_id)
            .map(|d| d.user_id)
            .unwrap_or_default();
        require_account(db, user_id, account_id).await?;
    }

    let mut inserted = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let created_at = Utc::now();
        let row = with_retry(policy, || {
            draft.clone().into_active_model(created_at).insert(db)
        })
        .await?;
        inserted.push(row);
    }

    debug!("persisted {} generated transactions", inserted.len());
    Ok(inserted)
}

/// Fails with `NotFound` unless the account exists and is owned by the user.
async fn require_account(db: &DatabaseConnection, user_id: Uuid, account_id: i32) -> Result<()> {
    let found = account::Entity::find()
        .filter(account::Column::Id.eq(account_id))
        .filter(account::Column::UserId.eq(user_id))
        .one(db)
        .await?;

    match found {
        Some(_) => Ok(()),
        None => Err(ComputeError::NotFound {
            entity: "account",
            id: account_id,
        }),
    }
}
