//! Currency business logic.

use crate::{
    core::check_len,
    entities::{Currency, currency},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Lists all currencies ordered by code.
pub async fn list_currencies(db: &DatabaseConnection) -> Result<Vec<currency::Model>> {
    Currency::find()
        .order_by_asc(currency::Column::Code)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a currency by id.
pub async fn get_currency_by_id(
    db: &DatabaseConnection,
    currency_id: i64,
) -> Result<Option<currency::Model>> {
    Currency::find_by_id(currency_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a currency by its code, compared case-sensitively.
pub async fn get_currency_by_code(
    db: &DatabaseConnection,
    code: &str,
) -> Result<Option<currency::Model>> {
    Currency::find()
        .filter(currency::Column::Code.eq(code))
        .one(db)
        .await
        .map_err(Into::into)
}

fn validate(code: &str, decimals: i32) -> Result<()> {
    if code.chars().count() != 3 {
        return Err(Error::CheckViolation {
            constraint: "length(code) = 3".to_string(),
        });
    }
    check_len("code", code, 3)?;
    if decimals < 0 {
        return Err(Error::CheckViolation {
            constraint: "decimals >= 0".to_string(),
        });
    }
    Ok(())
}

/// Creates a currency.
///
/// # Errors
/// - `CheckViolation` if `code` is not three characters or `decimals` is negative
/// - `UniqueViolation` if the code already exists
pub async fn create_currency(
    db: &DatabaseConnection,
    code: String,
    decimals: i32,
) -> Result<currency::Model> {
    validate(&code, decimals)?;

    let currency = currency::ActiveModel {
        code: Set(code),
        decimals: Set(decimals),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Created currency {} ({}) with {} decimals", currency.id, currency.code, currency.decimals);
    Ok(currency)
}

/// Changes the number of decimals used to render a currency.
pub async fn update_currency_decimals(
    db: &DatabaseConnection,
    currency_id: i64,
    decimals: i32,
) -> Result<currency::Model> {
    let mut currency: currency::ActiveModel = Currency::find_by_id(currency_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Currency",
            id: currency_id,
        })?
        .into();

    validate(currency.code.as_ref(), decimals)?;
    currency.decimals = Set(decimals);
    currency.update(db).await.map_err(Into::into)
}

/// Deletes a currency. Fails with `ForeignKeyViolation` while accounts or
/// transactions still use it.
pub async fn delete_currency(db: &DatabaseConnection, currency_id: i64) -> Result<()> {
    let result = Currency::delete_by_id(currency_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "Currency",
            id: currency_id,
        });
    }
    info!("Deleted currency {}", currency_id);
    Ok(())
}
