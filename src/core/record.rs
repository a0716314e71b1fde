//! Record business logic - category portions of a transaction.

use crate::{
    core::check_amount,
    entities::{Record, record},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Books `amount` of a transaction on a category.
///
/// # Errors
/// - `UniqueViolation` if the transaction already has a record for this category
/// - `ForeignKeyViolation` if the category or transaction does not exist
pub async fn create_record(
    db: &DatabaseConnection,
    trans_id: i64,
    category_id: i64,
    amount: f64,
) -> Result<record::Model> {
    check_amount(amount)?;

    let record = record::ActiveModel {
        amount: Set(amount),
        category_id: Set(category_id),
        trans_id: Set(trans_id),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        "Created record {} on category {} for transaction {}: amount={}",
        record.id, record.category_id, record.trans_id, record.amount
    );
    Ok(record)
}

/// Finds a record by id.
pub async fn get_record_by_id(
    db: &DatabaseConnection,
    record_id: i64,
) -> Result<Option<record::Model>> {
    Record::find_by_id(record_id).one(db).await.map_err(Into::into)
}

/// Records of a transaction, ordered by id.
pub async fn get_records_for_transaction(
    db: &DatabaseConnection,
    trans_id: i64,
) -> Result<Vec<record::Model>> {
    Record::find()
        .filter(record::Column::TransId.eq(trans_id))
        .order_by_asc(record::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Records booked on a category, ordered by id.
pub async fn get_records_for_category(
    db: &DatabaseConnection,
    category_id: i64,
) -> Result<Vec<record::Model>> {
    Record::find()
        .filter(record::Column::CategoryId.eq(category_id))
        .order_by_asc(record::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Changes the amount of a record.
pub async fn update_record_amount(
    db: &DatabaseConnection,
    record_id: i64,
    amount: f64,
) -> Result<record::Model> {
    check_amount(amount)?;

    let mut record: record::ActiveModel = Record::find_by_id(record_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Record",
            id: record_id,
        })?
        .into();
    record.amount = Set(amount);
    record.update(db).await.map_err(Into::into)
}

/// Deletes a record.
pub async fn delete_record(db: &DatabaseConnection, record_id: i64) -> Result<()> {
    let result = Record::delete_by_id(record_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "Record",
            id: record_id,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_second_record_for_same_category_fails() -> Result<()> {
        let (db, fixture) = setup_with_ledger().await?;

        // The fixture transaction already books 30.0 on groceries
        let result = create_record(&db, fixture.transaction.id, fixture.groceries.id, 1.0).await;
        assert!(matches!(result.unwrap_err(), Error::UniqueViolation { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_record_lookups() -> Result<()> {
        let (db, fixture) = setup_with_ledger().await?;

        let for_transaction = get_records_for_transaction(&db, fixture.transaction.id).await?;
        assert_eq!(for_transaction.len(), 2);
        assert_eq!(for_transaction[0].amount, 30.0);
        assert_eq!(for_transaction[1].amount, 70.0);

        let on_rent = get_records_for_category(&db, fixture.rent.id).await?;
        assert_eq!(on_rent.len(), 1);
        assert_eq!(on_rent[0].category_id, fixture.rent.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_record_for_unknown_transaction() -> Result<()> {
        let (db, fixture) = setup_with_ledger().await?;

        let result = create_record(&db, 9999, fixture.rent.id, 1.0).await;
        assert!(matches!(result.unwrap_err(), Error::ForeignKeyViolation { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_and_delete_record() -> Result<()> {
        let (db, fixture) = setup_with_ledger().await?;
        let record = get_records_for_category(&db, fixture.rent.id).await?.remove(0);

        let updated = update_record_amount(&db, record.id, 65.0).await?;
        assert_eq!(updated.amount, 65.0);

        delete_record(&db, record.id).await?;
        assert!(get_record_by_id(&db, record.id).await?.is_none());
        assert!(delete_record(&db, record.id).await.is_err());

        Ok(())
    }
}
