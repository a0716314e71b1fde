//! Transaction business logic - Handles transactions and their breakdowns.
//!
//! A transaction owns its records (category breakdown) and flows (counterparty
//! breakdown). Both are expected to sum to the transaction amount; the store does
//! not enforce this, so [`create_transaction_with_breakdown`] checks it before
//! writing and [`reconcile`] reports it for existing transactions. Deleting a
//! transaction takes its records and flows with it.

use crate::{
    core::{check_amount, check_comment},
    entities::{Currency, Flow, Record, Transaction, flow, record, transaction},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Fields of a transaction as supplied by the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionInput {
    /// Total amount
    pub amount: f64,
    /// Expense (true) or income (false)
    pub is_expense: bool,
    /// Currency the amount is stated in
    pub currency_id: i64,
    /// Account the transaction went through
    pub account_id: Option<i64>,
    /// Counterparty
    pub agent_id: i64,
    /// When it happened
    pub date_issued: DateTime,
    /// Free-form note, at most 120 characters
    pub comment: Option<String>,
}

/// One category portion of a transaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordInput {
    /// Category the portion is booked on
    pub category_id: i64,
    /// Portion amount
    pub amount: f64,
}

/// One counterparty portion of a transaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowInput {
    /// Counterparty of the portion
    pub agent_id: i64,
    /// Portion amount
    pub amount: f64,
    /// Owed (true) or settled (false)
    pub is_debt: bool,
}

/// Totals of a transaction's breakdowns compared to its amount.
#[derive(Clone, Debug, PartialEq)]
pub struct Reconciliation {
    /// Transaction amount
    pub amount: f64,
    /// Sum of record amounts
    pub records_total: f64,
    /// Sum of flow amounts
    pub flows_total: f64,
    /// Largest difference still considered equal: half a minor unit of the currency
    pub tolerance: f64,
}

impl Reconciliation {
    /// Whether the records sum to the amount.
    #[must_use]
    pub fn records_match(&self) -> bool {
        (self.records_total - self.amount).abs() < self.tolerance
    }

    /// Whether the flows sum to the amount.
    #[must_use]
    pub fn flows_match(&self) -> bool {
        (self.flows_total - self.amount).abs() < self.tolerance
    }

    /// Whether both breakdowns sum to the amount.
    #[must_use]
    pub fn is_reconciled(&self) -> bool {
        self.records_match() && self.flows_match()
    }
}

/// Half of the smallest representable unit for a currency with `decimals` digits.
#[must_use]
pub fn tolerance_for(decimals: i32) -> f64 {
    0.5 * 10f64.powi(-decimals)
}

fn validate(input: &TransactionInput) -> Result<()> {
    check_amount(input.amount)?;
    check_comment(input.comment.as_deref())
}

fn active_model(input: TransactionInput) -> transaction::ActiveModel {
    transaction::ActiveModel {
        amount: Set(input.amount),
        is_expense: Set(input.is_expense),
        currency_id: Set(input.currency_id),
        account_id: Set(input.account_id),
        agent_id: Set(input.agent_id),
        date_issued: Set(input.date_issued),
        comment: Set(input.comment),
        ..Default::default()
    }
}

/// Creates a transaction without breakdown.
///
/// # Errors
/// - `InvalidAmount` if the amount is not finite
/// - `TooLong` if the comment exceeds 120 characters
/// - `ForeignKeyViolation` if the currency, account or agent does not exist
pub async fn create_transaction(
    db: &DatabaseConnection,
    input: TransactionInput,
) -> Result<transaction::Model> {
    validate(&input)?;

    let transaction = active_model(input).insert(db).await?;
    info!(
        "Created transaction {} for agent {}: amount={}, expense={}",
        transaction.id, transaction.agent_id, transaction.amount, transaction.is_expense
    );
    Ok(transaction)
}

/// Creates a transaction together with its records and flows in one database transaction.
///
/// Records and flows must each sum to the transaction amount within half a minor
/// unit of the currency. Duplicate categories or agents in the breakdown are
/// rejected by the store and nothing is written.
pub async fn create_transaction_with_breakdown(
    db: &DatabaseConnection,
    input: TransactionInput,
    records: Vec<RecordInput>,
    flows: Vec<FlowInput>,
) -> Result<(transaction::Model, Vec<record::Model>, Vec<flow::Model>)> {
    validate(&input)?;
    for amount in records.iter().map(|r| r.amount).chain(flows.iter().map(|f| f.amount)) {
        check_amount(amount)?;
    }

    let txn = db.begin().await?;

    let currency = Currency::find_by_id(input.currency_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "Currency",
            id: input.currency_id,
        })?;

    let check = Reconciliation {
        amount: input.amount,
        records_total: records.iter().map(|r| r.amount).sum(),
        flows_total: flows.iter().map(|f| f.amount).sum(),
        tolerance: tolerance_for(currency.decimals),
    };
    if !check.records_match() {
        return Err(Error::Unreconciled {
            id: 0,
            part: "records",
            amount: check.amount,
            total: check.records_total,
        });
    }
    if !check.flows_match() {
        return Err(Error::Unreconciled {
            id: 0,
            part: "flows",
            amount: check.amount,
            total: check.flows_total,
        });
    }

    let transaction = active_model(input).insert(&txn).await?;

    let mut inserted_records = Vec::with_capacity(records.len());
    for r in records {
        let model = record::ActiveModel {
            amount: Set(r.amount),
            category_id: Set(r.category_id),
            trans_id: Set(transaction.id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        inserted_records.push(model);
    }

    let mut inserted_flows = Vec::with_capacity(flows.len());
    for f in flows {
        let model = flow::ActiveModel {
            amount: Set(f.amount),
            is_debt: Set(f.is_debt),
            agent_id: Set(f.agent_id),
            trans_id: Set(transaction.id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        inserted_flows.push(model);
    }

    txn.commit().await?;

    info!(
        "Created transaction {} with {} records and {} flows",
        transaction.id,
        inserted_records.len(),
        inserted_flows.len()
    );
    Ok((transaction, inserted_records, inserted_flows))
}

/// Retrieves a specific transaction by its unique ID.
pub async fn get_transaction_by_id(
    db: &DatabaseConnection,
    transaction_id: i64,
) -> Result<Option<transaction::Model>> {
    Transaction::find_by_id(transaction_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists all transactions, newest first.
pub async fn list_transactions(db: &DatabaseConnection) -> Result<Vec<transaction::Model>> {
    Transaction::find()
        .order_by_desc(transaction::Column::DateIssued)
        .order_by_desc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists the transactions that went through an account, newest first.
pub async fn list_transactions_for_account(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<Vec<transaction::Model>> {
    Transaction::find()
        .filter(transaction::Column::AccountId.eq(account_id))
        .order_by_desc(transaction::Column::DateIssued)
        .order_by_desc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Replaces all fields of an existing transaction. Records and flows are left alone.
pub async fn update_transaction(
    db: &DatabaseConnection,
    transaction_id: i64,
    input: TransactionInput,
) -> Result<transaction::Model> {
    validate(&input)?;

    let existing = Transaction::find_by_id(transaction_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Transaction",
            id: transaction_id,
        })?;

    let mut model: transaction::ActiveModel = existing.into();
    model.amount = Set(input.amount);
    model.is_expense = Set(input.is_expense);
    model.currency_id = Set(input.currency_id);
    model.account_id = Set(input.account_id);
    model.agent_id = Set(input.agent_id);
    model.date_issued = Set(input.date_issued);
    model.comment = Set(input.comment);

    let updated = model.update(db).await?;
    debug!("Updated transaction {}", updated.id);
    Ok(updated)
}

/// Compares a transaction's amount with the sums of its records and flows.
pub async fn reconcile(db: &DatabaseConnection, transaction_id: i64) -> Result<Reconciliation> {
    let transaction = Transaction::find_by_id(transaction_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Transaction",
            id: transaction_id,
        })?;
    let currency = Currency::find_by_id(transaction.currency_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Currency",
            id: transaction.currency_id,
        })?;

    let records = Record::find()
        .filter(record::Column::TransId.eq(transaction_id))
        .all(db)
        .await?;
    let flows = Flow::find()
        .filter(flow::Column::TransId.eq(transaction_id))
        .all(db)
        .await?;

    Ok(Reconciliation {
        amount: transaction.amount,
        records_total: records.iter().map(|r| r.amount).sum(),
        flows_total: flows.iter().map(|f| f.amount).sum(),
        tolerance: tolerance_for(currency.decimals),
    })
}

/// Deletes a transaction together with its records and flows.
///
/// The breakdown rows are removed explicitly inside the same database transaction,
/// so the delete cascades even where the store does not enforce `ON DELETE CASCADE`.
pub async fn delete_transaction(db: &DatabaseConnection, transaction_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let transaction = Transaction::find_by_id(transaction_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "Transaction",
            id: transaction_id,
        })?;

    let records = Record::delete_many()
        .filter(record::Column::TransId.eq(transaction_id))
        .exec(&txn)
        .await?;
    let flows = Flow::delete_many()
        .filter(flow::Column::TransId.eq(transaction_id))
        .exec(&txn)
        .await?;
    transaction.delete(&txn).await?;

    txn.commit().await?;
    info!(
        "Deleted transaction {} with {} records and {} flows",
        transaction_id, records.rows_affected, flows.rows_affected
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_transaction_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let mut input = transaction_input(1, None, 1, f64::INFINITY);
        let result = create_transaction(&db, input.clone()).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        input.amount = 10.0;
        input.comment = Some("c".repeat(121));
        let result = create_transaction(&db, input).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::TooLong { field: "comment", max: 120 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_transaction_unknown_agent() -> Result<()> {
        let db = setup_test_db().await?;
        let eur = create_test_currency(&db, "EUR", 2).await?;

        let result = create_transaction(&db, transaction_input(eur.id, None, 404, 5.0)).await;
        assert!(matches!(result.unwrap_err(), Error::ForeignKeyViolation { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_breakdown_is_written_atomically() -> Result<()> {
        let (db, fixture) = setup_with_ledger().await?;

        let (transaction, records, flows) = create_transaction_with_breakdown(
            &db,
            transaction_input(fixture.currency.id, Some(fixture.account.id), fixture.agent.id, 50.0),
            vec![
                RecordInput { category_id: fixture.groceries.id, amount: 20.0 },
                RecordInput { category_id: fixture.rent.id, amount: 30.0 },
            ],
            vec![FlowInput { agent_id: fixture.agent.id, amount: 50.0, is_debt: true }],
        )
        .await?;

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.trans_id == transaction.id));
        assert_eq!(flows.len(), 1);
        assert!(flows[0].is_debt);

        let check = reconcile(&db, transaction.id).await?;
        assert!(check.is_reconciled());
        assert_eq!(check.records_total, 50.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_breakdown_that_does_not_sum_is_rejected() -> Result<()> {
        let (db, fixture) = setup_with_ledger().await?;
        let before = list_transactions(&db).await?.len();

        let result = create_transaction_with_breakdown(
            &db,
            transaction_input(fixture.currency.id, None, fixture.agent.id, 100.0),
            vec![RecordInput { category_id: fixture.rent.id, amount: 99.0 }],
            vec![FlowInput { agent_id: fixture.agent.id, amount: 100.0, is_debt: false }],
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Unreconciled { part: "records", total, .. } if total == 99.0
        ));

        let result = create_transaction_with_breakdown(
            &db,
            transaction_input(fixture.currency.id, None, fixture.agent.id, 100.0),
            vec![RecordInput { category_id: fixture.rent.id, amount: 100.0 }],
            vec![],
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Unreconciled { part: "flows", .. }
        ));

        assert_eq!(list_transactions(&db).await?.len(), before);
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_category_in_breakdown_rolls_back() -> Result<()> {
        let (db, fixture) = setup_with_ledger().await?;
        let before = list_transactions(&db).await?.len();

        let result = create_transaction_with_breakdown(
            &db,
            transaction_input(fixture.currency.id, None, fixture.agent.id, 10.0),
            vec![
                RecordInput { category_id: fixture.rent.id, amount: 5.0 },
                RecordInput { category_id: fixture.rent.id, amount: 5.0 },
            ],
            vec![FlowInput { agent_id: fixture.agent.id, amount: 10.0, is_debt: false }],
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::UniqueViolation { .. }));
        assert_eq!(list_transactions(&db).await?.len(), before);

        Ok(())
    }

    #[tokio::test]
    async fn test_reconcile_within_tolerance() -> Result<()> {
        let (db, fixture) = setup_with_ledger().await?;

        let (transaction, _, _) = create_transaction_with_breakdown(
            &db,
            transaction_input(fixture.currency.id, None, fixture.agent.id, 0.3),
            vec![
                RecordInput { category_id: fixture.groceries.id, amount: 0.1 },
                RecordInput { category_id: fixture.rent.id, amount: 0.2 },
            ],
            vec![FlowInput { agent_id: fixture.agent.id, amount: 0.3, is_debt: false }],
        )
        .await?;

        assert!(reconcile(&db, transaction.id).await?.is_reconciled());
        assert_eq!(tolerance_for(2), 0.005);
        assert_eq!(tolerance_for(0), 0.5);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_transaction_cascades() -> Result<()> {
        let (db, fixture) = setup_with_ledger().await?;
        let trans_id = fixture.transaction.id;
        assert!(!Record::find().all(&db).await?.is_empty());

        delete_transaction(&db, trans_id).await?;

        assert!(get_transaction_by_id(&db, trans_id).await?.is_none());
        let records = Record::find()
            .filter(record::Column::TransId.eq(trans_id))
            .all(&db)
            .await?;
        let flows = Flow::find()
            .filter(flow::Column::TransId.eq(trans_id))
            .all(&db)
            .await?;
        assert!(records.is_empty());
        assert!(flows.is_empty());

        assert!(matches!(
            delete_transaction(&db, trans_id).await.unwrap_err(),
            Error::NotFound { entity: "Transaction", .. }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_and_list_transactions() -> Result<()> {
        let (db, fixture) = setup_with_ledger().await?;

        let mut input = transaction_input(
            fixture.currency.id,
            Some(fixture.account.id),
            fixture.agent.id,
            120.0,
        );
        input.comment = Some("corrected".to_string());
        let updated = update_transaction(&db, fixture.transaction.id, input).await?;
        assert_eq!(updated.amount, 120.0);
        assert_eq!(updated.comment.as_deref(), Some("corrected"));

        let for_account = list_transactions_for_account(&db, fixture.account.id).await?;
        assert_eq!(for_account, vec![updated]);

        // The breakdown was written for 100.0 and no longer matches
        let check = reconcile(&db, fixture.transaction.id).await?;
        assert!(!check.records_match());
        assert!(!check.flows_match());

        Ok(())
    }
}
