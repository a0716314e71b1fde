//! Account transfer entity - Moves money from one account to another.
//!
//! Source and destination amounts are stored separately so transfers between
//! accounts in different currencies keep both sides exact.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account transfer database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "account_transfer")]
pub struct Model {
    /// Unique identifier for the transfer
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Amount leaving the source account, in its currency
    pub src_amount: f64,
    /// Amount arriving on the destination account, in its currency
    pub dst_amount: f64,
    /// Source account
    pub src_id: i64,
    /// Destination account, never equal to `src_id`
    pub dst_id: i64,
    /// When the transfer happened
    pub date_issued: Option<DateTime>,
    /// Free-form note
    #[sea_orm(column_type = "String(StringLen::N(120))", nullable)]
    pub comment: Option<String>,
}

/// Defines relationships between `AccountTransfer` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Account the money leaves
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::SrcId",
        to = "super::account::Column::Id"
    )]
    Src,
    /// Account the money arrives on
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::DstId",
        to = "super::account::Column::Id"
    )]
    Dst,
}

impl ActiveModelBehavior for ActiveModel {}
