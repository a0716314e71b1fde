//! Agent entity - A counterparty (person or organisation) money moves to or from.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Agent database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "agent")]
pub struct Model {
    /// Unique identifier for the agent
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique description (e.g., "Landlord", "Migros")
    #[sea_orm(column_type = "String(StringLen::N(64))", unique)]
    pub desc: String,
}

/// Defines relationships between Agent and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One agent is counterparty of many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
    /// One agent owes or is owed many flows
    #[sea_orm(has_many = "super::flow::Entity")]
    Flows,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::flow::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Flows.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
