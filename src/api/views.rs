//! Per-entity views: the mapping each entity serializes to.
//!
//! Shallow views reference related entities by id, deep views inline them. What
//! "inline" means differs per field and is reproduced exactly:
//!
//! - nested entities are always rendered with their own shallow view
//! - `Category.parent` is inlined even in a shallow view
//! - back-reference id lists (`Currency.accounts`, `Agent.flows`, ...) only appear in deep views
//! - `Transaction.currency` is read through the account when there is one

// View field names are the mapping keys.
#![allow(missing_docs)]

use super::{DATE_FORMAT, DATETIME_FORMAT, Expand, LedgerGraph};
use crate::{
    entities::{account, account_transfer, agent, category, currency, flow, record, transaction},
    errors::{Error, Result},
};
use serde::Serialize;
use std::collections::HashSet;

/// An entity that can be projected into a transport mapping.
pub trait Api {
    /// Typed form of the mapping
    type View: Serialize;

    /// Looks the entity up in a graph.
    fn find(graph: &LedgerGraph, id: i64) -> Result<&Self>;

    /// Builds the typed view of this entity.
    fn view(&self, graph: &LedgerGraph, deep: bool) -> Result<Self::View>;

    /// Builds the plain nested mapping of this entity.
    fn api(&self, graph: &LedgerGraph, deep: bool) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.view(graph, deep)?)?)
    }
}

fn expand<T, F>(deep: bool, id: i64, full: F) -> Result<Expand<T>>
where
    F: FnOnce() -> Result<T>,
{
    if deep {
        Ok(Expand::Full(Box::new(full()?)))
    } else {
        Ok(Expand::Id(id))
    }
}

fn expand_all<T, F>(deep: bool, ids: Vec<i64>, mut full: F) -> Result<Vec<Expand<T>>>
where
    F: FnMut(i64) -> Result<T>,
{
    ids.into_iter().map(|id| expand(deep, id, || full(id))).collect()
}

/// Serialized currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrencyView {
    pub id: i64,
    pub code: String,
    pub decimals: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accounts: Option<Vec<i64>>,
}

impl Api for currency::Model {
    type View = CurrencyView;

    fn find(graph: &LedgerGraph, id: i64) -> Result<&Self> {
        graph.currency(id)
    }

    fn view(&self, graph: &LedgerGraph, deep: bool) -> Result<CurrencyView> {
        Ok(CurrencyView {
            id: self.id,
            code: self.code.clone(),
            decimals: self.decimals,
            accounts: deep.then(|| graph.accounts_of_currency(self.id)),
        })
    }
}

/// Serialized agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentView {
    pub id: i64,
    pub desc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flows: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<i64>>,
}

impl Api for agent::Model {
    type View = AgentView;

    fn find(graph: &LedgerGraph, id: i64) -> Result<&Self> {
        graph.agent(id)
    }

    fn view(&self, graph: &LedgerGraph, deep: bool) -> Result<AgentView> {
        Ok(AgentView {
            id: self.id,
            desc: self.desc.clone(),
            flows: deep.then(|| graph.flows_of_agent(self.id)),
            transactions: deep.then(|| graph.transactions_of_agent(self.id)),
        })
    }
}

/// Serialized category. `parent` is always the parent's full shallow view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryView {
    pub id: i64,
    pub desc: String,
    pub is_expense: bool,
    pub usable: bool,
    pub parent: Option<Box<CategoryView>>,
    pub children: Vec<Expand<CategoryView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<i64>>,
}

// `ancestors` holds the categories whose view is being built further down the
// call stack; meeting one of them again means the parent chain loops.
fn category_view(
    graph: &LedgerGraph,
    category: &category::Model,
    deep: bool,
    ancestors: &mut HashSet<i64>,
) -> Result<CategoryView> {
    if !ancestors.insert(category.id) {
        return Err(Error::CategoryCycle { id: category.id });
    }

    let parent = match category.parent_id {
        Some(parent_id) => {
            let parent = graph.category(parent_id)?;
            Some(Box::new(category_view(graph, parent, false, ancestors)?))
        }
        None => None,
    };
    let children = expand_all(deep, graph.children_of_category(category.id), |id| {
        graph.category(id)?.view(graph, false)
    })?;

    ancestors.remove(&category.id);
    Ok(CategoryView {
        id: category.id,
        desc: category.desc.clone(),
        is_expense: category.is_expense,
        usable: category.usable,
        parent,
        children,
        records: deep.then(|| graph.records_of_category(category.id)),
    })
}

impl Api for category::Model {
    type View = CategoryView;

    fn find(graph: &LedgerGraph, id: i64) -> Result<&Self> {
        graph.category(id)
    }

    fn view(&self, graph: &LedgerGraph, deep: bool) -> Result<CategoryView> {
        category_view(graph, self, deep, &mut HashSet::new())
    }
}

/// Serialized account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountView {
    pub id: i64,
    pub desc: String,
    pub color: String,
    pub currency: Expand<CurrencyView>,
    pub date_created: String,
    pub starting_saldo: f64,
    pub order: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_transfers: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_transfers: Option<Vec<i64>>,
}

impl Api for account::Model {
    type View = AccountView;

    fn find(graph: &LedgerGraph, id: i64) -> Result<&Self> {
        graph.account(id)
    }

    fn view(&self, graph: &LedgerGraph, deep: bool) -> Result<AccountView> {
        Ok(AccountView {
            id: self.id,
            desc: self.desc.clone(),
            color: self.color.clone(),
            currency: expand(deep, self.currency_id, || {
                graph.currency(self.currency_id)?.view(graph, false)
            })?,
            date_created: self.date_created.format(DATE_FORMAT).to_string(),
            starting_saldo: self.starting_saldo,
            order: self.order,
            transactions: deep.then(|| graph.transactions_of_account(self.id)),
            in_transfers: deep.then(|| graph.in_transfers_of_account(self.id)),
            out_transfers: deep.then(|| graph.out_transfers_of_account(self.id)),
        })
    }
}

/// Serialized transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionView {
    pub id: i64,
    pub account: Option<Expand<AccountView>>,
    pub is_expense: bool,
    pub amount: f64,
    pub agent: Expand<AgentView>,
    pub comment: Option<String>,
    pub date_issued: String,
    pub currency: Expand<CurrencyView>,
    pub flows: Vec<Expand<FlowView>>,
    pub records: Vec<Expand<RecordView>>,
}

impl Api for transaction::Model {
    type View = TransactionView;

    fn find(graph: &LedgerGraph, id: i64) -> Result<&Self> {
        graph.transaction(id)
    }

    fn view(&self, graph: &LedgerGraph, deep: bool) -> Result<TransactionView> {
        let account = match self.account_id {
            Some(account_id) => Some(graph.account(account_id)?),
            None => None,
        };

        // Read through the account; only an account-less transaction uses its own currency
        let currency_id = account.map_or(self.currency_id, |a| a.currency_id);

        Ok(TransactionView {
            id: self.id,
            account: account
                .map(|a| expand(deep, a.id, || a.view(graph, false)))
                .transpose()?,
            is_expense: self.is_expense,
            amount: self.amount,
            agent: expand(deep, self.agent_id, || {
                graph.agent(self.agent_id)?.view(graph, false)
            })?,
            comment: self.comment.clone(),
            date_issued: self.date_issued.format(DATETIME_FORMAT).to_string(),
            currency: expand(deep, currency_id, || {
                graph.currency(currency_id)?.view(graph, false)
            })?,
            flows: expand_all(deep, graph.flows_of_transaction(self.id), |id| {
                graph.flow(id)?.view(graph, false)
            })?,
            records: expand_all(deep, graph.records_of_transaction(self.id), |id| {
                graph.record(id)?.view(graph, false)
            })?,
        })
    }
}

/// Serialized record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordView {
    pub id: i64,
    pub amount: f64,
    pub category: Expand<CategoryView>,
    pub transaction: Expand<TransactionView>,
}

impl Api for record::Model {
    type View = RecordView;

    fn find(graph: &LedgerGraph, id: i64) -> Result<&Self> {
        graph.record(id)
    }

    fn view(&self, graph: &LedgerGraph, deep: bool) -> Result<RecordView> {
        Ok(RecordView {
            id: self.id,
            amount: self.amount,
            category: expand(deep, self.category_id, || {
                graph.category(self.category_id)?.view(graph, false)
            })?,
            transaction: expand(deep, self.trans_id, || {
                graph.transaction(self.trans_id)?.view(graph, false)
            })?,
        })
    }
}

/// Serialized flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowView {
    pub id: i64,
    pub amount: f64,
    pub is_debt: bool,
    pub agent: Expand<AgentView>,
    pub transaction: Expand<TransactionView>,
}

impl Api for flow::Model {
    type View = FlowView;

    fn find(graph: &LedgerGraph, id: i64) -> Result<&Self> {
        graph.flow(id)
    }

    fn view(&self, graph: &LedgerGraph, deep: bool) -> Result<FlowView> {
        Ok(FlowView {
            id: self.id,
            amount: self.amount,
            is_debt: self.is_debt,
            agent: expand(deep, self.agent_id, || {
                graph.agent(self.agent_id)?.view(graph, false)
            })?,
            transaction: expand(deep, self.trans_id, || {
                graph.transaction(self.trans_id)?.view(graph, false)
            })?,
        })
    }
}

/// Serialized account transfer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferView {
    pub id: i64,
    pub src_amount: f64,
    pub dst_amount: f64,
    pub src: Expand<AccountView>,
    pub dst: Expand<AccountView>,
    pub date_issued: Option<String>,
    pub comment: Option<String>,
}

impl Api for account_transfer::Model {
    type View = TransferView;

    fn find(graph: &LedgerGraph, id: i64) -> Result<&Self> {
        graph.transfer(id)
    }

    fn view(&self, graph: &LedgerGraph, deep: bool) -> Result<TransferView> {
        Ok(TransferView {
            id: self.id,
            src_amount: self.src_amount,
            dst_amount: self.dst_amount,
            src: expand(deep, self.src_id, || {
                graph.account(self.src_id)?.view(graph, false)
            })?,
            dst: expand(deep, self.dst_id, || {
                graph.account(self.dst_id)?.view(graph, false)
            })?,
            date_issued: self
                .date_issued
                .map(|d| d.format(DATETIME_FORMAT).to_string()),
            comment: self.comment.clone(),
        })
    }
}
