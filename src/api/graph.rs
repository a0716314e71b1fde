//! In-memory snapshot of the ledger used for serialization.
//!
//! Every loaded model lives in an id-keyed arena. Relationships are followed by id,
//! and the reverse direction of each foreign key (agent to flows, category to
//! children, ...) is kept in an index that is updated whenever a model is inserted.
//! Index entries are ordered by ascending id.

use crate::{
    entities::{
        Account, AccountTransfer, Agent, Category, Currency, Flow, Record, Transaction, account,
        account_transfer, agent, category, currency, flow, record, transaction,
    },
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, EntityTrait};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

type Index = BTreeMap<i64, BTreeSet<i64>>;

fn link(index: &mut Index, key: i64, id: i64) {
    index.entry(key).or_default().insert(id);
}

fn unlink(index: &mut Index, key: i64, id: i64) {
    if let Some(ids) = index.get_mut(&key) {
        ids.remove(&id);
        if ids.is_empty() {
            index.remove(&key);
        }
    }
}

fn relink(index: &mut Index, old: Option<i64>, new: Option<i64>, id: i64) {
    if let Some(key) = old {
        unlink(index, key, id);
    }
    if let Some(key) = new {
        link(index, key, id);
    }
}

fn ids(index: &Index, key: i64) -> Vec<i64> {
    index
        .get(&key)
        .map(|ids| ids.iter().copied().collect())
        .unwrap_or_default()
}

fn get<'a, T>(arena: &'a BTreeMap<i64, T>, entity: &'static str, id: i64) -> Result<&'a T> {
    arena.get(&id).ok_or(Error::NotFound { entity, id })
}

/// Number of models held per entity.
#[allow(missing_docs)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GraphCounts {
    pub currencies: usize,
    pub agents: usize,
    pub categories: usize,
    pub accounts: usize,
    pub transactions: usize,
    pub records: usize,
    pub flows: usize,
    pub transfers: usize,
}

/// Arena of ledger models with reverse relationship indices.
#[derive(Debug, Default, Clone)]
pub struct LedgerGraph {
    currencies: BTreeMap<i64, currency::Model>,
    agents: BTreeMap<i64, agent::Model>,
    categories: BTreeMap<i64, category::Model>,
    accounts: BTreeMap<i64, account::Model>,
    transactions: BTreeMap<i64, transaction::Model>,
    records: BTreeMap<i64, record::Model>,
    flows: BTreeMap<i64, flow::Model>,
    transfers: BTreeMap<i64, account_transfer::Model>,

    accounts_by_currency: Index,
    transactions_by_account: Index,
    transactions_by_agent: Index,
    flows_by_agent: Index,
    children_by_category: Index,
    records_by_category: Index,
    records_by_transaction: Index,
    flows_by_transaction: Index,
    out_transfers_by_account: Index,
    in_transfers_by_account: Index,
}

impl LedgerGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots every ledger table into a graph.
    pub async fn load(db: &DatabaseConnection) -> Result<Self> {
        let mut graph = Self::new();
        for model in Currency::find().all(db).await? {
            graph.insert_currency(model);
        }
        for model in Agent::find().all(db).await? {
            graph.insert_agent(model);
        }
        for model in Category::find().all(db).await? {
            graph.insert_category(model);
        }
        for model in Account::find().all(db).await? {
            graph.insert_account(model);
        }
        for model in Transaction::find().all(db).await? {
            graph.insert_transaction(model);
        }
        for model in Record::find().all(db).await? {
            graph.insert_record(model);
        }
        for model in Flow::find().all(db).await? {
            graph.insert_flow(model);
        }
        for model in AccountTransfer::find().all(db).await? {
            graph.insert_transfer(model);
        }
        debug!("Loaded ledger graph: {:?}", graph.counts());
        Ok(graph)
    }

    /// Model counts per entity.
    #[must_use]
    pub fn counts(&self) -> GraphCounts {
        GraphCounts {
            currencies: self.currencies.len(),
            agents: self.agents.len(),
            categories: self.categories.len(),
            accounts: self.accounts.len(),
            transactions: self.transactions.len(),
            records: self.records.len(),
            flows: self.flows.len(),
            transfers: self.transfers.len(),
        }
    }

    /// Adds or replaces a currency.
    pub fn insert_currency(&mut self, model: currency::Model) {
        self.currencies.insert(model.id, model);
    }

    /// Adds or replaces an agent.
    pub fn insert_agent(&mut self, model: agent::Model) {
        self.agents.insert(model.id, model);
    }

    /// Adds or replaces a category, moving it between parents if needed.
    pub fn insert_category(&mut self, model: category::Model) {
        let old = self.categories.get(&model.id).and_then(|c| c.parent_id);
        relink(&mut self.children_by_category, old, model.parent_id, model.id);
        self.categories.insert(model.id, model);
    }

    /// Adds or replaces an account.
    pub fn insert_account(&mut self, model: account::Model) {
        let old = self.accounts.get(&model.id).map(|a| a.currency_id);
        relink(&mut self.accounts_by_currency, old, Some(model.currency_id), model.id);
        self.accounts.insert(model.id, model);
    }

    /// Adds or replaces a transaction.
    pub fn insert_transaction(&mut self, model: transaction::Model) {
        let old = self.transactions.get(&model.id);
        let (old_account, old_agent) = (old.and_then(|t| t.account_id), old.map(|t| t.agent_id));
        relink(&mut self.transactions_by_account, old_account, model.account_id, model.id);
        relink(&mut self.transactions_by_agent, old_agent, Some(model.agent_id), model.id);
        self.transactions.insert(model.id, model);
    }

    /// Adds or replaces a record.
    pub fn insert_record(&mut self, model: record::Model) {
        let old = self.records.get(&model.id);
        let (old_category, old_trans) = (old.map(|r| r.category_id), old.map(|r| r.trans_id));
        relink(&mut self.records_by_category, old_category, Some(model.category_id), model.id);
        relink(&mut self.records_by_transaction, old_trans, Some(model.trans_id), model.id);
        self.records.insert(model.id, model);
    }

    /// Adds or replaces a flow.
    pub fn insert_flow(&mut self, model: flow::Model) {
        let old = self.flows.get(&model.id);
        let (old_agent, old_trans) = (old.map(|f| f.agent_id), old.map(|f| f.trans_id));
        relink(&mut self.flows_by_agent, old_agent, Some(model.agent_id), model.id);
        relink(&mut self.flows_by_transaction, old_trans, Some(model.trans_id), model.id);
        self.flows.insert(model.id, model);
    }

    /// Adds or replaces a transfer.
    pub fn insert_transfer(&mut self, model: account_transfer::Model) {
        let old = self.transfers.get(&model.id);
        let (old_src, old_dst) = (old.map(|t| t.src_id), old.map(|t| t.dst_id));
        relink(&mut self.out_transfers_by_account, old_src, Some(model.src_id), model.id);
        relink(&mut self.in_transfers_by_account, old_dst, Some(model.dst_id), model.id);
        self.transfers.insert(model.id, model);
    }

    /// Currency by id.
    pub fn currency(&self, id: i64) -> Result<&currency::Model> {
        get(&self.currencies, "Currency", id)
    }

    /// Agent by id.
    pub fn agent(&self, id: i64) -> Result<&agent::Model> {
        get(&self.agents, "Agent", id)
    }

    /// Category by id.
    pub fn category(&self, id: i64) -> Result<&category::Model> {
        get(&self.categories, "Category", id)
    }

    /// Account by id.
    pub fn account(&self, id: i64) -> Result<&account::Model> {
        get(&self.accounts, "Account", id)
    }

    /// Transaction by id.
    pub fn transaction(&self, id: i64) -> Result<&transaction::Model> {
        get(&self.transactions, "Transaction", id)
    }

    /// Record by id.
    pub fn record(&self, id: i64) -> Result<&record::Model> {
        get(&self.records, "Record", id)
    }

    /// Flow by id.
    pub fn flow(&self, id: i64) -> Result<&flow::Model> {
        get(&self.flows, "Flow", id)
    }

    /// Transfer by id.
    pub fn transfer(&self, id: i64) -> Result<&account_transfer::Model> {
        get(&self.transfers, "AccountTransfer", id)
    }

    /// Ids of the accounts held in a currency.
    #[must_use]
    pub fn accounts_of_currency(&self, currency_id: i64) -> Vec<i64> {
        ids(&self.accounts_by_currency, currency_id)
    }

    /// Ids of the transactions that went through an account.
    #[must_use]
    pub fn transactions_of_account(&self, account_id: i64) -> Vec<i64> {
        ids(&self.transactions_by_account, account_id)
    }

    /// Ids of the transactions an agent is counterparty of.
    #[must_use]
    pub fn transactions_of_agent(&self, agent_id: i64) -> Vec<i64> {
        ids(&self.transactions_by_agent, agent_id)
    }

    /// Ids of the flows attributed to an agent.
    #[must_use]
    pub fn flows_of_agent(&self, agent_id: i64) -> Vec<i64> {
        ids(&self.flows_by_agent, agent_id)
    }

    /// Ids of the direct children of a category.
    #[must_use]
    pub fn children_of_category(&self, category_id: i64) -> Vec<i64> {
        ids(&self.children_by_category, category_id)
    }

    /// Ids of the records booked on a category.
    #[must_use]
    pub fn records_of_category(&self, category_id: i64) -> Vec<i64> {
        ids(&self.records_by_category, category_id)
    }

    /// Ids of the records of a transaction.
    #[must_use]
    pub fn records_of_transaction(&self, trans_id: i64) -> Vec<i64> {
        ids(&self.records_by_transaction, trans_id)
    }

    /// Ids of the flows of a transaction.
    #[must_use]
    pub fn flows_of_transaction(&self, trans_id: i64) -> Vec<i64> {
        ids(&self.flows_by_transaction, trans_id)
    }

    /// Ids of the transfers leaving an account.
    #[must_use]
    pub fn out_transfers_of_account(&self, account_id: i64) -> Vec<i64> {
        ids(&self.out_transfers_by_account, account_id)
    }

    /// Ids of the transfers arriving on an account.
    #[must_use]
    pub fn in_transfers_of_account(&self, account_id: i64) -> Vec<i64> {
        ids(&self.in_transfers_by_account, account_id)
    }
}
