//! Menu catalog queries

use sqlx::SqlitePool;

use crate::db::models::MenuOption;
use crate::Result;

/// Interaction types registered for `department`, sorted ascending.
///
/// Department match is exact and case-sensitive; an unknown or empty
/// department yields an empty list.
pub async fn list_interaction_types(pool: &SqlitePool, department: &str) -> Result<Vec<String>> {
    if department.is_empty() {
        return Ok(Vec::new());
    }

    let types: Vec<String> = sqlx::query_scalar(
        "SELECT item_name FROM menus WHERE department = ? ORDER BY item_name ASC",
    )
    .bind(department)
    .fetch_all(pool)
    .await?;

    Ok(types)
}

/// Number of catalog rows
pub async fn count_menu_options(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menus")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Full catalog in insertion order
pub async fn list_menu_options(pool: &SqlitePool) -> Result<Vec<MenuOption>> {
    let options = sqlx::query_as::<_, MenuOption>(
        "SELECT id, department, item_name FROM menus ORDER BY id ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(options)
}
