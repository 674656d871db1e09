//! Table definitions for the tally store
//!
//! Column names `qType` and `item_name` match stores created by earlier
//! deployments of the desk form, so existing files open unchanged.

use sqlx::SqlitePool;
use tracing::info;

use crate::db::schema_sync::{ColumnDefinition, SchemaSync, TableSchema};
use crate::Result;

pub struct TalliesTableSchema;

impl TableSchema for TalliesTableSchema {
    fn table_name() -> &'static str {
        "tallies"
    }

    fn expected_columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("id", "INTEGER"),
            ColumnDefinition::new("department", "TEXT").not_null(),
            ColumnDefinition::new("qType", "TEXT").not_null(),
            ColumnDefinition::new("referral", "INTEGER").not_null().default("0"),
            ColumnDefinition::new("notes", "TEXT").not_null().default("''"),
            // Missing from stores written before feedback was collected
            ColumnDefinition::new("feedback", "TEXT").not_null().default("''"),
            ColumnDefinition::new("timestamp", "TEXT").not_null(),
        ]
    }
}

pub struct MenusTableSchema;

impl TableSchema for MenusTableSchema {
    fn table_name() -> &'static str {
        "menus"
    }

    fn expected_columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("id", "INTEGER"),
            ColumnDefinition::new("department", "TEXT").not_null(),
            ColumnDefinition::new("item_name", "TEXT").not_null(),
        ]
    }
}

/// Create both tables if missing and add any missing columns.
///
/// Idempotent; never drops or alters existing rows.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    create_tallies_table(pool).await?;
    info!("Table 'tallies' ready");

    create_menus_table(pool).await?;
    info!("Table 'menus' ready");

    SchemaSync::sync_table::<TalliesTableSchema>(pool).await?;
    SchemaSync::sync_table::<MenusTableSchema>(pool).await?;

    Ok(())
}

async fn create_tallies_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tallies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            department TEXT NOT NULL,
            qType TEXT NOT NULL,
            referral INTEGER NOT NULL DEFAULT 0,
            notes TEXT NOT NULL DEFAULT '',
            feedback TEXT NOT NULL DEFAULT '',
            timestamp TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_tallies_timestamp ON tallies(timestamp)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_menus_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS menus (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            department TEXT NOT NULL,
            item_name TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_menus_department ON menus(department)")
        .execute(pool)
        .await?;

    Ok(())
}
