//! Seed data loading from config.toml
//!
//! This module loads the currencies, agents and category tree a fresh ledger
//! starts with. The file is parsed into plain structs here; inserting them is
//! done by [`crate::core::seed::seed_from_config`].

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Environment variable naming an alternative seed file.
pub const CONFIG_PATH_ENV: &str = "FINNANCE_CONFIG";

/// Seed file used when `FINNANCE_CONFIG` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct SeedConfig {
    /// Currencies to create
    #[serde(default)]
    pub currencies: Vec<CurrencyConfig>,
    /// Agents to create
    #[serde(default)]
    pub agents: Vec<AgentConfig>,
    /// Categories to create, parents before their children
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
}

/// Configuration for a single currency
#[derive(Debug, Deserialize, Clone)]
pub struct CurrencyConfig {
    /// Three-letter code
    pub code: String,
    /// Fractional digits
    pub decimals: i32,
}

/// Configuration for a single agent
#[derive(Debug, Deserialize, Clone)]
pub struct AgentConfig {
    /// Unique description
    pub desc: String,
}

/// Configuration for a single category
#[derive(Debug, Deserialize, Clone)]
pub struct CategoryConfig {
    /// Category name
    pub desc: String,
    /// Expense (true) or income (false) category
    pub is_expense: bool,
    /// Whether records may be booked on it directly
    #[serde(default = "default_usable")]
    pub usable: bool,
    /// Description of the parent category of the same kind, if any
    #[serde(default)]
    pub parent: Option<String>,
}

const fn default_usable() -> bool {
    true
}

/// Loads seed configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.as_ref().display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path.as_ref().display()),
    })
}

/// Resolves the seed file path from `FINNANCE_CONFIG`, defaulting to `./config.toml`.
#[must_use]
pub fn config_path() -> String {
    std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}
