//! Transaction entity - A single expense or income event.
//!
//! A transaction is paid to or received from an `agent_id`, optionally through an
//! `account_id`. Its amount is broken down by category into records and by
//! counterparty into flows; both breakdowns are expected to sum to `amount`.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trans")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Total amount, always stated positive; direction comes from `is_expense`
    pub amount: f64,
    /// Whether money left (true) or came in (false)
    pub is_expense: bool,
    /// Currency the amount is stated in
    pub currency_id: i64,
    /// Account the transaction went through, if any
    pub account_id: Option<i64>,
    /// Counterparty of the transaction
    pub agent_id: i64,
    /// When the transaction happened
    pub date_issued: DateTime,
    /// Free-form note
    #[sea_orm(column_type = "String(StringLen::N(120))", nullable)]
    pub comment: Option<String>,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction is stated in one currency
    #[sea_orm(
        belongs_to = "super::currency::Entity",
        from = "Column::CurrencyId",
        to = "super::currency::Column::Id"
    )]
    Currency,
    /// Each transaction optionally goes through one account
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,
    /// Each transaction has one counterparty
    #[sea_orm(
        belongs_to = "super::agent::Entity",
        from = "Column::AgentId",
        to = "super::agent::Column::Id"
    )]
    Agent,
    /// One transaction owns many records
    #[sea_orm(has_many = "super::record::Entity")]
    Records,
    /// One transaction owns many flows
    #[sea_orm(has_many = "super::flow::Entity")]
    Flows,
}

impl Related<super::currency::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Currency.def()
    }
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::agent::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Agent.def()
    }
}

impl Related<super::record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Records.def()
    }
}

impl Related<super::flow::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Flows.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
