//! Currency entity - A currency accounts and transactions are denominated in.
//!
//! Each currency has a unique three-letter `code` and the number of `decimals`
//! amounts in it are rendered with.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Currency database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "currency")]
pub struct Model {
    /// Unique identifier for the currency
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Three-letter code (e.g., "EUR", "CHF")
    #[sea_orm(column_type = "String(StringLen::N(3))", unique)]
    pub code: String,
    /// Number of fractional digits, never negative
    pub decimals: i32,
}

impl Model {
    /// Renders `amount` with exactly `decimals` fractional digits and `,` thousands grouping.
    ///
    /// The output is locale-independent: `1234.5` with two decimals is `"1,234.50"`.
    #[must_use]
    pub fn format(&self, amount: f64) -> String {
        let precision = usize::try_from(self.decimals).unwrap_or(0);
        let body = format!("{amount:.precision$}");
        if !amount.is_finite() {
            return body;
        }

        let (sign, unsigned) = body
            .strip_prefix('-')
            .map_or(("", body.as_str()), |rest| ("-", rest));
        let (int_part, frac_part) = unsigned
            .split_once('.')
            .map_or((unsigned, None), |(i, f)| (i, Some(f)));

        let mut out = String::with_capacity(body.len() + int_part.len() / 3);
        out.push_str(sign);
        out.push_str(&group_digits(int_part));
        if let Some(frac) = frac_part {
            out.push('.');
            out.push_str(frac);
        }
        out
    }
}

fn group_digits(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Defines relationships between Currency and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One currency has many accounts
    #[sea_orm(has_many = "super::account::Entity")]
    Accounts,
    /// One currency has many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
