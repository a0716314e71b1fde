//! Entity module - Contains all SeaORM entity definitions for the ledger tables.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod account;
pub mod account_transfer;
pub mod agent;
pub mod category;
pub mod currency;
pub mod flow;
pub mod record;
pub mod transaction;

// Re-export specific types to avoid conflicts
pub use account::{Column as AccountColumn, Entity as Account, Model as AccountModel};
pub use account_transfer::{
    Column as AccountTransferColumn, Entity as AccountTransfer, Model as AccountTransferModel,
};
pub use agent::{Column as AgentColumn, Entity as Agent, Model as AgentModel};
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use currency::{Column as CurrencyColumn, Entity as Currency, Model as CurrencyModel};
pub use flow::{Column as FlowColumn, Entity as Flow, Model as FlowModel};
pub use record::{Column as RecordColumn, Entity as Record, Model as RecordModel};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
