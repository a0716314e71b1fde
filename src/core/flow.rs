//! Flow business logic - counterparty portions of a transaction.
//!
//! Flows marked `is_debt` are money still owed; [`get_open_debts_for_agent`]
//! lists them and [`settle_flow`] clears the flag once the debt is paid.

use crate::{
    core::check_amount,
    entities::{Flow, flow},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Attributes `amount` of a transaction to an agent.
///
/// # Errors
/// - `UniqueViolation` if the transaction already has a flow for this agent
/// - `ForeignKeyViolation` if the agent or transaction does not exist
pub async fn create_flow(
    db: &DatabaseConnection,
    trans_id: i64,
    agent_id: i64,
    amount: f64,
    is_debt: bool,
) -> Result<flow::Model> {
    check_amount(amount)?;

    let flow = flow::ActiveModel {
        amount: Set(amount),
        is_debt: Set(is_debt),
        agent_id: Set(agent_id),
        trans_id: Set(trans_id),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        "Created flow {} to agent {} for transaction {}: amount={}, debt={}",
        flow.id, flow.agent_id, flow.trans_id, flow.amount, flow.is_debt
    );
    Ok(flow)
}

/// Finds a flow by id.
pub async fn get_flow_by_id(db: &DatabaseConnection, flow_id: i64) -> Result<Option<flow::Model>> {
    Flow::find_by_id(flow_id).one(db).await.map_err(Into::into)
}

/// Flows of a transaction, ordered by id.
pub async fn get_flows_for_transaction(
    db: &DatabaseConnection,
    trans_id: i64,
) -> Result<Vec<flow::Model>> {
    Flow::find()
        .filter(flow::Column::TransId.eq(trans_id))
        .order_by_asc(flow::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Flows of an agent still marked as debt, ordered by id.
pub async fn get_open_debts_for_agent(
    db: &DatabaseConnection,
    agent_id: i64,
) -> Result<Vec<flow::Model>> {
    Flow::find()
        .filter(flow::Column::AgentId.eq(agent_id))
        .filter(flow::Column::IsDebt.eq(true))
        .order_by_asc(flow::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Marks a debt flow as settled.
pub async fn settle_flow(db: &DatabaseConnection, flow_id: i64) -> Result<flow::Model> {
    let mut flow: flow::ActiveModel = Flow::find_by_id(flow_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Flow",
            id: flow_id,
        })?
        .into();
    flow.is_debt = Set(false);
    let flow = flow.update(db).await?;
    info!("Settled flow {}", flow.id);
    Ok(flow)
}

/// Deletes a flow.
pub async fn delete_flow(db: &DatabaseConnection, flow_id: i64) -> Result<()> {
    let result = Flow::delete_by_id(flow_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "Flow",
            id: flow_id,
        });
    }
    Ok(())
}
