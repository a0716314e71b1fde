//! Category entity - Hierarchical expense/income classification.
//!
//! Categories form a tree through the optional `parent_id`. The pair
//! (`desc`, `is_expense`) is unique and a category is never its own parent.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable name (e.g., "Groceries")
    #[sea_orm(column_type = "String(StringLen::N(64))")]
    pub desc: String,
    /// Whether this classifies expenses (true) or income (false)
    pub is_expense: bool,
    /// Whether records may be booked on this category directly
    pub usable: bool,
    /// Parent category, None for roots
    pub parent_id: Option<i64>,
}

/// Defines relationships between Category and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each category optionally belongs to a parent category
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id"
    )]
    Parent,
    /// One category has many records
    #[sea_orm(has_many = "super::record::Entity")]
    Records,
}

impl Related<super::record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Records.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
