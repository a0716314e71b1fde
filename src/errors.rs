//! Unified error types for the ledger model.
//!
//! Store failures are classified on the way in so callers can tell a uniqueness conflict
//! from a broken foreign key or a failed CHECK without parsing messages themselves.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// All errors surfaced by the ledger.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Any store failure that is not a classified constraint violation
    #[error("Database error: {0}")]
    Database(#[source] DbErr),

    /// A UNIQUE constraint rejected the write
    #[error("Unique constraint violated: {message}")]
    UniqueViolation {
        /// Message reported by the store
        message: String,
    },

    /// A FOREIGN KEY constraint rejected the write
    #[error("Foreign key constraint violated: {message}")]
    ForeignKeyViolation {
        /// Message reported by the store
        message: String,
    },

    /// A CHECK constraint rejected the write, either in the store or before it
    #[error("Check constraint violated: {constraint}")]
    CheckViolation {
        /// The violated condition, e.g. `parent_id != id`
        constraint: String,
    },

    /// A string column exceeds its declared length
    #[error("Field `{field}` exceeds {max} characters")]
    TooLong {
        /// Column name
        field: &'static str,
        /// Declared maximum length
        max: usize,
    },

    /// Amount is NaN or infinite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// A referenced row does not exist
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity name
        entity: &'static str,
        /// Requested id
        id: i64,
    },

    /// Assigning or following a category parent would loop
    #[error("Category {id} is part of a parent cycle")]
    CategoryCycle {
        /// Category where the cycle was detected
        id: i64,
    },

    /// A transaction's breakdown does not sum to its amount
    #[error("Transaction {id}: {part} total {total} does not match amount {amount}")]
    Unreconciled {
        /// Transaction id, 0 if not yet inserted
        id: i64,
        /// `"records"` or `"flows"`
        part: &'static str,
        /// Transaction amount
        amount: f64,
        /// Sum of the breakdown
        total: f64,
    },

    /// A view could not be turned into a JSON mapping
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl From<DbErr> for Error {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(message)) => {
                return Self::UniqueViolation { message };
            }
            Some(SqlErr::ForeignKeyConstraintViolation(message)) => {
                return Self::ForeignKeyViolation { message };
            }
            _ => {}
        }

        // SQLite reports CHECK failures (and, on some paths, the others) only in the message
        let message = err.to_string();
        if message.contains("UNIQUE constraint failed") {
            Self::UniqueViolation { message }
        } else if message.contains("FOREIGN KEY constraint failed") {
            Self::ForeignKeyViolation { message }
        } else if let Some(pos) = message.find("CHECK constraint failed") {
            let constraint = message[pos + "CHECK constraint failed".len()..]
                .trim_start_matches(':')
                .trim()
                .to_string();
            Self::CheckViolation { constraint }
        } else {
            Self::Database(err)
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_failure_is_classified() {
        let err = DbErr::Custom("error returned from database: CHECK constraint failed: src_id <> dst_id".to_string());
        match Error::from(err) {
            Error::CheckViolation { constraint } => assert_eq!(constraint, "src_id <> dst_id"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unique_failure_is_classified_from_message() {
        let err = DbErr::Custom("UNIQUE constraint failed: agent.desc".to_string());
        assert!(matches!(Error::from(err), Error::UniqueViolation { .. }));
    }

    #[test]
    fn test_other_failures_stay_database_errors() {
        let err = DbErr::Custom("disk I/O error".to_string());
        assert!(matches!(Error::from(err), Error::Database(_)));
    }
}
