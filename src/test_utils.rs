//! Shared test utilities for the ledger.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.
#![allow(clippy::expect_used)]

use crate::{
    core::{
        account, agent, category, currency,
        transaction::{self, FlowInput, RecordInput, TransactionInput},
        transfer,
    },
    entities,
    errors::Result,
};
use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Day every test account is created on: 01.01.2023.
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid date")
}

/// Timestamp every test transaction is issued at: 24.12.2023 18:30.
pub fn test_timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 12, 24)
        .and_then(|d| d.and_hms_opt(18, 30, 0))
        .expect("valid timestamp")
}

/// Creates a test currency.
pub async fn create_test_currency(
    db: &DatabaseConnection,
    code: &str,
    decimals: i32,
) -> Result<entities::currency::Model> {
    currency::create_currency(db, code.to_string(), decimals).await
}

/// Creates a test agent.
pub async fn create_test_agent(db: &DatabaseConnection, desc: &str) -> Result<entities::agent::Model> {
    agent::create_agent(db, desc.to_string()).await
}

/// Creates a usable root category.
pub async fn create_test_category(
    db: &DatabaseConnection,
    desc: &str,
    is_expense: bool,
) -> Result<entities::category::Model> {
    category::create_category(db, desc.to_string(), is_expense, true, None).await
}

/// Creates a test account with sensible defaults.
///
/// # Defaults
/// * `color`: `"#1c7ed6"`
/// * `date_created`: [`test_date`]
/// * `starting_saldo`: 0.0
/// * `order`: 0
pub async fn create_test_account(
    db: &DatabaseConnection,
    desc: &str,
    currency_id: i64,
) -> Result<entities::account::Model> {
    account::create_account(
        db,
        desc.to_string(),
        "#1c7ed6".to_string(),
        currency_id,
        test_date(),
        0.0,
        0,
    )
    .await
}

/// Expense transaction input issued at [`test_timestamp`] without comment.
pub fn transaction_input(
    currency_id: i64,
    account_id: Option<i64>,
    agent_id: i64,
    amount: f64,
) -> TransactionInput {
    TransactionInput {
        amount,
        is_expense: true,
        currency_id,
        account_id,
        agent_id,
        date_issued: test_timestamp(),
        comment: None,
    }
}

/// A small but complete ledger.
pub struct LedgerFixture {
    /// EUR, 2 decimals
    pub currency: entities::currency::Model,
    /// CHF, 2 decimals
    pub chf: entities::currency::Model,
    /// "Landlord"
    pub agent: entities::agent::Model,
    /// Root expense category, not usable
    pub housing: entities::category::Model,
    /// Child of `housing`
    pub rent: entities::category::Model,
    /// Root expense category
    pub groceries: entities::category::Model,
    /// "Checking", in EUR
    pub account: entities::account::Model,
    /// "Savings", in CHF
    pub savings: entities::account::Model,
    /// 100.0 from `account` to `agent`
    pub transaction: entities::transaction::Model,
    /// 30.0 on `groceries`, 70.0 on `rent`
    pub records: Vec<entities::record::Model>,
    /// 100.0 settled with `agent`
    pub flows: Vec<entities::flow::Model>,
    /// 50.0 EUR from `account` to 48.0 CHF on `savings`
    pub transfer: entities::account_transfer::Model,
}

/// Sets up a database holding a [`LedgerFixture`].
pub async fn setup_with_ledger() -> Result<(DatabaseConnection, LedgerFixture)> {
    let db = setup_test_db().await?;

    let eur = create_test_currency(&db, "EUR", 2).await?;
    let chf = create_test_currency(&db, "CHF", 2).await?;
    let landlord = create_test_agent(&db, "Landlord").await?;

    let housing = category::create_category(&db, "Housing".to_string(), true, false, None).await?;
    let rent =
        category::create_category(&db, "Rent".to_string(), true, true, Some(housing.id)).await?;
    let groceries = create_test_category(&db, "Groceries", true).await?;

    let checking = create_test_account(&db, "Checking", eur.id).await?;
    let savings = create_test_account(&db, "Savings", chf.id).await?;

    let (trans, records, flows) = transaction::create_transaction_with_breakdown(
        &db,
        transaction_input(eur.id, Some(checking.id), landlord.id, 100.0),
        vec![
            RecordInput {
                category_id: groceries.id,
                amount: 30.0,
            },
            RecordInput {
                category_id: rent.id,
                amount: 70.0,
            },
        ],
        vec![FlowInput {
            agent_id: landlord.id,
            amount: 100.0,
            is_debt: false,
        }],
    )
    .await?;

    let moved = transfer::create_transfer(
        &db,
        checking.id,
        savings.id,
        50.0,
        48.0,
        Some(test_timestamp()),
        None,
    )
    .await?;

    Ok((
        db,
        LedgerFixture {
            currency: eur,
            chf,
            agent: landlord,
            housing,
            rent,
            groceries,
            account: checking,
            savings,
            transaction: trans,
            records,
            flows,
            transfer: moved,
        },
    ))
}
