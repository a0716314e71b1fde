//! Account transfer business logic.
//!
//! Source and destination must differ; this is checked before the write and
//! again by the `src_id <> dst_id` CHECK in the store.

use crate::{
    core::{check_amount, check_comment},
    entities::{AccountTransfer, account_transfer},
    errors::{Error, Result},
};
use sea_orm::{Condition, QueryOrder, Set, prelude::*};
use tracing::info;

/// Moves `src_amount` out of `src_id` and `dst_amount` into `dst_id`.
///
/// The two amounts differ when the accounts are held in different currencies.
///
/// # Errors
/// - `CheckViolation` if `src_id == dst_id`
/// - `InvalidAmount` / `TooLong` for out-of-range fields
/// - `ForeignKeyViolation` if an account does not exist
pub async fn create_transfer(
    db: &DatabaseConnection,
    src_id: i64,
    dst_id: i64,
    src_amount: f64,
    dst_amount: f64,
    date_issued: Option<DateTime>,
    comment: Option<String>,
) -> Result<account_transfer::Model> {
    if src_id == dst_id {
        return Err(Error::CheckViolation {
            constraint: "src_id != dst_id".to_string(),
        });
    }
    check_amount(src_amount)?;
    check_amount(dst_amount)?;
    check_comment(comment.as_deref())?;

    let transfer = account_transfer::ActiveModel {
        src_amount: Set(src_amount),
        dst_amount: Set(dst_amount),
        src_id: Set(src_id),
        dst_id: Set(dst_id),
        date_issued: Set(date_issued),
        comment: Set(comment),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        "Created transfer {} from account {} ({}) to account {} ({})",
        transfer.id, transfer.src_id, transfer.src_amount, transfer.dst_id, transfer.dst_amount
    );
    Ok(transfer)
}

/// Finds a transfer by id.
pub async fn get_transfer_by_id(
    db: &DatabaseConnection,
    transfer_id: i64,
) -> Result<Option<account_transfer::Model>> {
    AccountTransfer::find_by_id(transfer_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Transfers into or out of an account, ordered by id.
pub async fn list_transfers_for_account(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<Vec<account_transfer::Model>> {
    AccountTransfer::find()
        .filter(
            Condition::any()
                .add(account_transfer::Column::SrcId.eq(account_id))
                .add(account_transfer::Column::DstId.eq(account_id)),
        )
        .order_by_asc(account_transfer::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes a transfer.
pub async fn delete_transfer(db: &DatabaseConnection, transfer_id: i64) -> Result<()> {
    let result = AccountTransfer::delete_by_id(transfer_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "AccountTransfer",
            id: transfer_id,
        });
    }
    info!("Deleted transfer {}", transfer_id);
    Ok(())
}
