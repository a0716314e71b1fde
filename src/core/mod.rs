//! Core business logic - create, read, update and delete for every ledger entity.
//!
//! Write paths validate the declared constraints the store cannot report precisely
//! (lengths, CHECKs, finite amounts) before touching the database. Uniqueness and
//! foreign keys are left to the store and surface as classified [`Error`]s.

pub mod account;
pub mod agent;
pub mod category;
pub mod currency;
pub mod flow;
pub mod record;
pub mod seed;
pub mod transaction;
pub mod transfer;

use crate::errors::{Error, Result};

pub(crate) fn check_len(field: &'static str, value: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(Error::TooLong { field, max });
    }
    Ok(())
}

pub(crate) fn check_comment(comment: Option<&str>) -> Result<()> {
    comment.map_or(Ok(()), |c| check_len("comment", c, 120))
}

pub(crate) fn check_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}
