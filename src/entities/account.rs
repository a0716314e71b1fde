//! Account entity - A place money is held in one currency.
//!
//! Accounts are the source and destination of transfers and optionally the
//! account a transaction was paid from.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "account")]
pub struct Model {
    /// Unique identifier for the account
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique human-readable name (e.g., "Checking")
    #[sea_orm(column_type = "String(StringLen::N(64))", unique)]
    pub desc: String,
    /// Display color as a CSS hex string
    #[sea_orm(column_type = "String(StringLen::N(16))")]
    pub color: String,
    /// Currency the account is held in
    pub currency_id: i64,
    /// Day the account was opened
    pub date_created: Date,
    /// Balance on `date_created`
    pub starting_saldo: f64,
    /// Display position among accounts
    pub order: i32,
}

/// Defines relationships between Account and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each account belongs to one currency
    #[sea_orm(
        belongs_to = "super::currency::Entity",
        from = "Column::CurrencyId",
        to = "super::currency::Column::Id"
    )]
    Currency,
    /// One account pays many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::currency::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Currency.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
