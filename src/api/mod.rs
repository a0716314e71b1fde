//! Serialization of ledger entities into plain nested mappings for transport.
//!
//! Serialization works on a [`LedgerGraph`] snapshot and never writes to the store.
//! Each entity implements [`Api`]; `api(graph, false)` gives the shallow mapping
//! with related entities as ids, `api(graph, true)` the deep one.
//!
//! ```no_run
//! # async fn example(db: &sea_orm::DatabaseConnection) -> finnance_ledger::errors::Result<()> {
//! use finnance_ledger::api::{Api, LedgerGraph};
//!
//! let graph = LedgerGraph::load(db).await?;
//! let mapping = graph.transaction(1)?.api(&graph, true)?;
//! println!("{mapping}");
//! # Ok(())
//! # }
//! ```

pub mod graph;
pub mod views;

pub use graph::{GraphCounts, LedgerGraph};
pub use views::{
    AccountView, AgentView, Api, CategoryView, CurrencyView, FlowView, RecordView,
    TransactionView, TransferView,
};

use crate::errors::Result;
use sea_orm::DatabaseConnection;
use serde::Serialize;

/// Timestamp format used in mappings, e.g. `24.12.2023 18:30`.
pub const DATETIME_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Date format used in mappings, e.g. `24.12.2023`.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// A relationship field: either the related entity's id or its inlined view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Expand<T> {
    /// Reference by id
    Id(i64),
    /// Inline full value
    Full(Box<T>),
}

impl<T> Expand<T> {
    /// The id if this is a reference.
    #[must_use]
    pub const fn as_id(&self) -> Option<i64> {
        match self {
            Self::Id(id) => Some(*id),
            Self::Full(_) => None,
        }
    }

    /// The inlined view if this is a full value.
    #[must_use]
    pub fn as_full(&self) -> Option<&T> {
        match self {
            Self::Id(_) => None,
            Self::Full(view) => Some(view),
        }
    }
}

/// Loads a fresh graph and serializes the entity `M` with the given id.
///
/// ```no_run
/// # async fn example(db: &sea_orm::DatabaseConnection) -> finnance_ledger::errors::Result<()> {
/// use finnance_ledger::{api, entities::CategoryModel};
///
/// let mapping = api::api_by_id::<CategoryModel>(db, 3, false).await?;
/// # Ok(())
/// # }
/// ```
pub async fn api_by_id<M>(db: &DatabaseConnection, id: i64, deep: bool) -> Result<serde_json::Value>
where
    M: Api,
{
    let graph = LedgerGraph::load(db).await?;
    M::find(&graph, id)?.api(&graph, deep)
}
