//! Seeding of a fresh ledger from [`SeedConfig`].
//!
//! Seeding is idempotent: entries whose key (currency code, agent description,
//! category description and kind) already exists are skipped.

use crate::{
    config::seed::SeedConfig,
    core::{agent, category, currency},
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use tracing::{debug, info, instrument};

/// Number of rows inserted per entity by one seeding run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    /// Currencies inserted
    pub currencies: usize,
    /// Agents inserted
    pub agents: usize,
    /// Categories inserted
    pub categories: usize,
}

/// Inserts the configured currencies, agents and categories that do not exist yet.
///
/// Category parents are resolved by description among categories of the same
/// kind, so a parent must appear in the file before its children or already exist.
#[instrument(skip(db, config))]
pub async fn seed_from_config(db: &DatabaseConnection, config: &SeedConfig) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    for entry in &config.currencies {
        if currency::get_currency_by_code(db, &entry.code).await?.is_some() {
            debug!("Currency {} already present", entry.code);
            continue;
        }
        currency::create_currency(db, entry.code.clone(), entry.decimals).await?;
        summary.currencies += 1;
    }

    for entry in &config.agents {
        if agent::get_agent_by_desc(db, entry.desc.trim()).await?.is_some() {
            debug!("Agent {} already present", entry.desc);
            continue;
        }
        agent::create_agent(db, entry.desc.clone()).await?;
        summary.agents += 1;
    }

    for entry in &config.categories {
        if category::get_category_by_desc(db, entry.desc.trim(), entry.is_expense)
            .await?
            .is_some()
        {
            debug!("Category {} already present", entry.desc);
            continue;
        }

        let parent_id = match &entry.parent {
            Some(parent) => Some(
                category::get_category_by_desc(db, parent.trim(), entry.is_expense)
                    .await?
                    .ok_or_else(|| Error::Config {
                        message: format!(
                            "Parent category '{parent}' of '{}' is not defined before it",
                            entry.desc
                        ),
                    })?
                    .id,
            ),
            None => None,
        };
        category::create_category(
            db,
            entry.desc.clone(),
            entry.is_expense,
            entry.usable,
            parent_id,
        )
        .await?;
        summary.categories += 1;
    }

    info!(
        "Seeded {} currencies, {} agents, {} categories",
        summary.currencies, summary.agents, summary.categories
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    const SEED: &str = r#"
        [[currencies]]
        code = "EUR"
        decimals = 2

        [[agents]]
        desc = "Landlord"

        [[categories]]
        desc = "Housing"
        is_expense = true
        usable = false

        [[categories]]
        desc = "Rent"
        is_expense = true
        parent = "Housing"

        [[categories]]
        desc = "Salary"
        is_expense = false
    "#;

    #[tokio::test]
    async fn test_seed_builds_category_tree() -> Result<()> {
        let db = setup_test_db().await?;
        let config: SeedConfig = toml::from_str(SEED).unwrap();

        let summary = seed_from_config(&db, &config).await?;
        assert_eq!(
            summary,
            SeedSummary {
                currencies: 1,
                agents: 1,
                categories: 3
            }
        );

        let housing = category::get_category_by_desc(&db, "Housing", true).await?.unwrap();
        let rent = category::get_category_by_desc(&db, "Rent", true).await?.unwrap();
        assert_eq!(rent.parent_id, Some(housing.id));
        assert!(!housing.usable);

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_twice_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let config: SeedConfig = toml::from_str(SEED).unwrap();

        seed_from_config(&db, &config).await?;
        let second = seed_from_config(&db, &config).await?;
        assert_eq!(second, SeedSummary::default());
        assert_eq!(category::list_categories(&db).await?.len(), 3);
        assert_eq!(currency::list_currencies(&db).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_with_unknown_parent_fails() -> Result<()> {
        let db = setup_test_db().await?;
        let config: SeedConfig = toml::from_str(
            r#"
            [[categories]]
            desc = "Rent"
            is_expense = true
            parent = "Housing"
        "#,
        )
        .unwrap();

        let result = seed_from_config(&db, &config).await;
        assert!(matches!(result.unwrap_err(), Error::Config { .. }));

        Ok(())
    }
}
