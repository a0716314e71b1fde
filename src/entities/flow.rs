//! Flow entity - The part of a transaction's amount attributed to one counterparty.
//!
//! `is_debt` marks money still owed rather than settled. At most one flow exists
//! per (`agent_id`, `trans_id`) pair.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Flow database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "flow")]
pub struct Model {
    /// Unique identifier for the flow
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Partial amount attributed to the agent
    pub amount: f64,
    /// Whether the amount is owed (true) or settled (false)
    pub is_debt: bool,
    /// Counterparty of this portion
    pub agent_id: i64,
    /// Owning transaction
    pub trans_id: i64,
}

/// Defines relationships between Flow and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each flow is attributed to one agent
    #[sea_orm(
        belongs_to = "super::agent::Entity",
        from = "Column::AgentId",
        to = "super::agent::Column::Id"
    )]
    Agent,
    /// Each flow is owned by one transaction and goes away with it
    #[sea_orm(
        belongs_to = "super::transaction::Entity",
        from = "Column::TransId",
        to = "super::transaction::Column::Id",
        on_delete = "Cascade"
    )]
    Transaction,
}

impl Related<super::agent::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Agent.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
