//! Category business logic - the expense/income classification tree.
//!
//! The store enforces `parent_id <> id` and the (`desc`, `is_expense`) uniqueness.
//! Longer parent cycles are not expressible as a constraint, so
//! [`set_category_parent`] walks the ancestors of the new parent before writing.

use crate::{
    core::check_len,
    entities::{Category, category},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use std::collections::HashSet;
use tracing::{debug, info};

/// Lists all categories ordered by id.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>> {
    Category::find()
        .order_by_asc(category::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by id.
pub async fn get_category_by_id(
    db: &DatabaseConnection,
    category_id: i64,
) -> Result<Option<category::Model>> {
    Category::find_by_id(category_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by its (`desc`, `is_expense`) key.
pub async fn get_category_by_desc(
    db: &DatabaseConnection,
    desc: &str,
    is_expense: bool,
) -> Result<Option<category::Model>> {
    Category::find()
        .filter(category::Column::Desc.eq(desc))
        .filter(category::Column::IsExpense.eq(is_expense))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Direct children of a category, ordered by id.
pub async fn get_children(
    db: &DatabaseConnection,
    category_id: i64,
) -> Result<Vec<category::Model>> {
    Category::find()
        .filter(category::Column::ParentId.eq(category_id))
        .order_by_asc(category::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a category, optionally below `parent_id`.
///
/// # Errors
/// - `TooLong` if `desc` exceeds 64 characters
/// - `UniqueViolation` if (`desc`, `is_expense`) already exists
/// - `ForeignKeyViolation` if the parent does not exist
pub async fn create_category(
    db: &DatabaseConnection,
    desc: String,
    is_expense: bool,
    usable: bool,
    parent_id: Option<i64>,
) -> Result<category::Model> {
    let desc = desc.trim().to_string();
    check_len("desc", &desc, 64)?;

    let category = category::ActiveModel {
        desc: Set(desc),
        is_expense: Set(is_expense),
        usable: Set(usable),
        parent_id: Set(parent_id),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        "Created category {} ({}) under {:?}",
        category.id, category.desc, category.parent_id
    );
    Ok(category)
}

/// Updates the description and `usable` flag of a category.
pub async fn update_category(
    db: &DatabaseConnection,
    category_id: i64,
    desc: String,
    usable: bool,
) -> Result<category::Model> {
    let desc = desc.trim().to_string();
    check_len("desc", &desc, 64)?;

    let mut category: category::ActiveModel = find_existing(db, category_id).await?.into();
    category.desc = Set(desc);
    category.usable = Set(usable);
    category.update(db).await.map_err(Into::into)
}

/// Moves a category below `parent_id`, or to the root with `None`.
///
/// # Errors
/// - `CheckViolation` if `parent_id` is the category itself
/// - `CategoryCycle` if `parent_id` is one of its descendants
/// - `NotFound` if either category does not exist
pub async fn set_category_parent(
    db: &DatabaseConnection,
    category_id: i64,
    parent_id: Option<i64>,
) -> Result<category::Model> {
    if parent_id == Some(category_id) {
        return Err(Error::CheckViolation {
            constraint: "parent_id != id".to_string(),
        });
    }

    let category = find_existing(db, category_id).await?;

    let mut seen = HashSet::new();
    let mut ancestor = parent_id;
    while let Some(current) = ancestor {
        if current == category_id || !seen.insert(current) {
            return Err(Error::CategoryCycle { id: category_id });
        }
        ancestor = find_existing(db, current).await?.parent_id;
    }
    debug!("Ancestors of new parent checked: {:?}", seen);

    let mut category: category::ActiveModel = category.into();
    category.parent_id = Set(parent_id);
    let category = category.update(db).await?;
    info!("Moved category {} under {:?}", category.id, category.parent_id);
    Ok(category)
}

/// Deletes a category without children or records.
pub async fn delete_category(db: &DatabaseConnection, category_id: i64) -> Result<()> {
    let result = Category::delete_by_id(category_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "Category",
            id: category_id,
        });
    }
    info!("Deleted category {}", category_id);
    Ok(())
}

async fn find_existing(db: &DatabaseConnection, category_id: i64) -> Result<category::Model> {
    Category::find_by_id(category_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Category",
            id: category_id,
        })
}
