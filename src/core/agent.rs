//! Agent business logic - counterparties of transactions and flows.

use crate::{
    core::check_len,
    entities::{Agent, agent},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Lists all agents ordered by description.
pub async fn list_agents(db: &DatabaseConnection) -> Result<Vec<agent::Model>> {
    Agent::find()
        .order_by_asc(agent::Column::Desc)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an agent by id.
pub async fn get_agent_by_id(db: &DatabaseConnection, agent_id: i64) -> Result<Option<agent::Model>> {
    Agent::find_by_id(agent_id).one(db).await.map_err(Into::into)
}

/// Finds an agent by its unique description.
pub async fn get_agent_by_desc(db: &DatabaseConnection, desc: &str) -> Result<Option<agent::Model>> {
    Agent::find()
        .filter(agent::Column::Desc.eq(desc))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates an agent. The description is trimmed and must be unique.
pub async fn create_agent(db: &DatabaseConnection, desc: String) -> Result<agent::Model> {
    let desc = desc.trim().to_string();
    check_len("desc", &desc, 64)?;

    let agent = agent::ActiveModel {
        desc: Set(desc),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Created agent {} ({})", agent.id, agent.desc);
    Ok(agent)
}

/// Renames an agent.
pub async fn rename_agent(
    db: &DatabaseConnection,
    agent_id: i64,
    desc: String,
) -> Result<agent::Model> {
    let desc = desc.trim().to_string();
    check_len("desc", &desc, 64)?;

    let mut agent: agent::ActiveModel = Agent::find_by_id(agent_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Agent",
            id: agent_id,
        })?
        .into();
    agent.desc = Set(desc);
    agent.update(db).await.map_err(Into::into)
}

/// Deletes an agent that no transaction or flow references.
pub async fn delete_agent(db: &DatabaseConnection, agent_id: i64) -> Result<()> {
    let result = Agent::delete_by_id(agent_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "Agent",
            id: agent_id,
        });
    }
    info!("Deleted agent {}", agent_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_agent_too_long() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_agent(&db, "x".repeat(65)).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::TooLong { field: "desc", max: 64 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_agent_desc_is_unique() -> Result<()> {
        let db = setup_test_db().await?;
        let landlord = create_agent(&db, "  Landlord ".to_string()).await?;
        assert_eq!(landlord.desc, "Landlord");

        let result = create_agent(&db, "Landlord".to_string()).await;
        assert!(matches!(result.unwrap_err(), Error::UniqueViolation { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_rename_and_lookup_agent() -> Result<()> {
        let db = setup_test_db().await?;
        let agent = create_agent(&db, "Shop".to_string()).await?;

        rename_agent(&db, agent.id, "Corner Shop".to_string()).await?;
        assert!(get_agent_by_desc(&db, "Shop").await?.is_none());
        let found = get_agent_by_desc(&db, "Corner Shop").await?.unwrap();
        assert_eq!(found.id, agent.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_agent() -> Result<()> {
        let db = setup_test_db().await?;
        let agent = create_agent(&db, "Temp".to_string()).await?;

        delete_agent(&db, agent.id).await?;
        assert!(get_agent_by_id(&db, agent.id).await?.is_none());
        assert!(matches!(
            delete_agent(&db, agent.id).await.unwrap_err(),
            Error::NotFound { entity: "Agent", .. }
        ));
        assert!(list_agents(&db).await?.is_empty());

        Ok(())
    }
}
