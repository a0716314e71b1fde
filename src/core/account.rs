//! Account business logic.
//!
//! Accounts are listed in their display `order`; [`move_account`] changes that
//! position without touching anything else.

use crate::{
    core::{check_amount, check_len},
    entities::{Account, account},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Lists all accounts by display order, then id.
pub async fn list_accounts(db: &DatabaseConnection) -> Result<Vec<account::Model>> {
    Account::find()
        .order_by_asc(account::Column::Order)
        .order_by_asc(account::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an account by id.
pub async fn get_account_by_id(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<Option<account::Model>> {
    Account::find_by_id(account_id)
        .one(db)
        .await
        .map_err(Into::into)
}

fn validate(desc: &str, color: &str, starting_saldo: f64) -> Result<()> {
    check_len("desc", desc, 64)?;
    check_len("color", color, 16)?;
    check_amount(starting_saldo)
}

/// Creates an account held in `currency_id`.
///
/// # Errors
/// - `TooLong` / `InvalidAmount` for out-of-range fields
/// - `UniqueViolation` if the description is taken
/// - `ForeignKeyViolation` if the currency does not exist
pub async fn create_account(
    db: &DatabaseConnection,
    desc: String,
    color: String,
    currency_id: i64,
    date_created: NaiveDate,
    starting_saldo: f64,
    order: i32,
) -> Result<account::Model> {
    let desc = desc.trim().to_string();
    validate(&desc, &color, starting_saldo)?;

    let account = account::ActiveModel {
        desc: Set(desc),
        color: Set(color),
        currency_id: Set(currency_id),
        date_created: Set(date_created),
        starting_saldo: Set(starting_saldo),
        order: Set(order),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        "Created account {} ({}) in currency {}",
        account.id, account.desc, account.currency_id
    );
    Ok(account)
}

/// Updates the descriptive fields and starting balance of an account.
pub async fn update_account(
    db: &DatabaseConnection,
    account_id: i64,
    desc: String,
    color: String,
    starting_saldo: f64,
) -> Result<account::Model> {
    let desc = desc.trim().to_string();
    validate(&desc, &color, starting_saldo)?;

    let mut account: account::ActiveModel = find_existing(db, account_id).await?.into();
    account.desc = Set(desc);
    account.color = Set(color);
    account.starting_saldo = Set(starting_saldo);
    account.update(db).await.map_err(Into::into)
}

/// Sets the display position of an account.
pub async fn move_account(
    db: &DatabaseConnection,
    account_id: i64,
    order: i32,
) -> Result<account::Model> {
    let mut account: account::ActiveModel = find_existing(db, account_id).await?.into();
    account.order = Set(order);
    account.update(db).await.map_err(Into::into)
}

/// Deletes an account no transaction or transfer references.
pub async fn delete_account(db: &DatabaseConnection, account_id: i64) -> Result<()> {
    let result = Account::delete_by_id(account_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "Account",
            id: account_id,
        });
    }
    info!("Deleted account {}", account_id);
    Ok(())
}

async fn find_existing(db: &DatabaseConnection, account_id: i64) -> Result<account::Model> {
    Account::find_by_id(account_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Account",
            id: account_id,
        })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_account_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let result = create_account(
            &db,
            "Checking".to_string(),
            "#1c7ed6".to_string(),
            1,
            day,
            f64::NAN,
            0,
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        let result = create_account(
            &db,
            "Checking".to_string(),
            "a color name that is too long".to_string(),
            1,
            day,
            0.0,
            0,
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::TooLong { field: "color", .. }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_account_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let eur = create_test_currency(&db, "EUR", 2).await?;

        let account = create_test_account(&db, "Checking", eur.id).await?;
        assert_eq!(account.currency_id, eur.id);
        assert_eq!(account.starting_saldo, 0.0);

        let retrieved = get_account_by_id(&db, account.id).await?.unwrap();
        assert_eq!(retrieved, account);

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_currency_is_foreign_key_violation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_test_account(&db, "Nowhere", 77).await;
        assert!(matches!(result.unwrap_err(), Error::ForeignKeyViolation { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_list_accounts_follows_order() -> Result<()> {
        let db = setup_test_db().await?;
        let eur = create_test_currency(&db, "EUR", 2).await?;
        let first = create_test_account(&db, "First", eur.id).await?;
        let second = create_test_account(&db, "Second", eur.id).await?;

        move_account(&db, first.id, 5).await?;
        let names: Vec<String> = list_accounts(&db)
            .await?
            .into_iter()
            .map(|a| a.desc)
            .collect();
        assert_eq!(names, vec![second.desc, "First".to_string()]);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_and_delete_account() -> Result<()> {
        let db = setup_test_db().await?;
        let eur = create_test_currency(&db, "EUR", 2).await?;
        let account = create_test_account(&db, "Wallet", eur.id).await?;

        let updated = update_account(
            &db,
            account.id,
            "Cash".to_string(),
            "#ff0000".to_string(),
            25.5,
        )
        .await?;
        assert_eq!(updated.desc, "Cash");
        assert_eq!(updated.starting_saldo, 25.5);

        delete_account(&db, account.id).await?;
        assert!(get_account_by_id(&db, account.id).await?.is_none());

        Ok(())
    }
}
