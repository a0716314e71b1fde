//! Database configuration module for the ledger.
//!
//! This module handles `SQLite` database connection and schema creation using `SeaORM`.
//! Tables, column-level UNIQUE constraints and foreign keys are generated from the entity
//! definitions with `Schema::create_table_from_entity`. The CHECK constraints and composite
//! UNIQUE indexes the entities cannot express are added on top of the generated statements.

use crate::entities::{
    Account, AccountTransfer, Agent, Category, Currency, Flow, Record, Transaction,
    account_transfer, category, currency, flow, record,
};
use crate::errors::Result;
use sea_orm::sea_query::{Expr, Index, IndexCreateStatement, TableCreateStatement};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info};

/// Default database location when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/finnance.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a default local `SQLite` file if not found.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to a default local `SQLite` file if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    debug!("Connecting to database at {}", database_url);
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all ledger tables and their integrity constraints.
///
/// Besides what the entity definitions declare, this adds:
/// - `category`: CHECK `parent_id <> id`, UNIQUE (`desc`, `is_expense`)
/// - `currency`: CHECK `decimals >= 0`
/// - `account_transfer`: CHECK `src_id <> dst_id`
/// - `record`: UNIQUE (`category_id`, `trans_id`)
/// - `flow`: UNIQUE (`agent_id`, `trans_id`)
///
/// Tables are created with `IF NOT EXISTS`, so calling this on an initialised
/// database is a no-op.
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut currency_table = table_for(&schema, Currency);
    currency_table.check(Expr::col(currency::Column::Decimals).gte(0));

    let mut category_table = table_for(&schema, Category);
    category_table.check(Expr::col(category::Column::ParentId).ne(Expr::col(category::Column::Id)));

    let mut transfer_table = table_for(&schema, AccountTransfer);
    transfer_table.check(
        Expr::col(account_transfer::Column::SrcId).ne(Expr::col(account_transfer::Column::DstId)),
    );

    let tables = [
        currency_table,
        table_for(&schema, Agent),
        category_table,
        table_for(&schema, Account),
        table_for(&schema, Transaction),
        table_for(&schema, Record),
        table_for(&schema, Flow),
        transfer_table,
    ];
    for table in &tables {
        db.execute(builder.build(table)).await?;
    }

    let indexes = [
        unique_index(
            "idx-category-desc-is_expense-unique",
            Category,
            category::Column::Desc,
            category::Column::IsExpense,
        ),
        unique_index(
            "idx-record-category_id-trans_id-unique",
            Record,
            record::Column::CategoryId,
            record::Column::TransId,
        ),
        unique_index(
            "idx-flow-agent_id-trans_id-unique",
            Flow,
            flow::Column::AgentId,
            flow::Column::TransId,
        ),
    ];
    for index in &indexes {
        db.execute(builder.build(index)).await?;
    }

    info!(
        "Ledger schema ensured: {} tables, {} composite unique indexes",
        tables.len(),
        indexes.len()
    );
    Ok(())
}

fn table_for<E>(schema: &Schema, entity: E) -> TableCreateStatement
where
    E: EntityTrait,
{
    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    table
}

fn unique_index<E, C>(name: &str, entity: E, first: C, second: C) -> IndexCreateStatement
where
    E: EntityTrait,
    C: sea_orm::ColumnTrait,
{
    Index::create()
        .name(name)
        .table(entity)
        .col(first)
        .col(second)
        .unique()
        .if_not_exists()
        .to_owned()
}
