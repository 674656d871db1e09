//! Automatic schema synchronization
//!
//! Tables are created with `CREATE TABLE IF NOT EXISTS`, which leaves stores
//! written by older deployments untouched. This module compares each table
//! against its declared column list and adds whatever is missing via
//! `ALTER TABLE ... ADD COLUMN`. Type and constraint differences are left
//! alone; existing data is never dropped or rewritten.

use crate::Result;
use sqlx::{Row, SqlitePool};
use tracing::{info, warn};

/// Column definition used when a column has to be added
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    /// Column name
    pub name: String,
    /// SQL type (e.g., "TEXT", "INTEGER")
    pub sql_type: String,
    /// NOT NULL constraint (only applied when a default is present)
    pub not_null: bool,
    /// DEFAULT value as an SQL literal
    pub default_value: Option<String>,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            not_null: false,
            default_value: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// `ALTER TABLE` statement adding this column to `table`
    fn add_column_sql(&self, table: &str) -> String {
        let mut sql = format!(
            "ALTER TABLE {} ADD COLUMN {} {}",
            table, self.name, self.sql_type
        );

        match (&self.default_value, self.not_null) {
            (Some(default), true) => sql.push_str(&format!(" NOT NULL DEFAULT {}", default)),
            (Some(default), false) => sql.push_str(&format!(" DEFAULT {}", default)),
            (None, true) => {
                // SQLite refuses NOT NULL without a default on ADD COLUMN
                warn!(
                    "Cannot add NOT NULL column {}.{} without DEFAULT; adding as nullable",
                    table, self.name
                );
            }
            (None, false) => {}
        }

        sql
    }
}

/// Declared schema for one table
pub trait TableSchema {
    fn table_name() -> &'static str;

    fn expected_columns() -> Vec<ColumnDefinition>;
}

/// Reads the live schema
pub struct SchemaIntrospector;

impl SchemaIntrospector {
    pub async fn table_exists(pool: &SqlitePool, table_name: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?)",
        )
        .bind(table_name)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Column names in declaration order
    pub async fn column_names(pool: &SqlitePool, table_name: &str) -> Result<Vec<String>> {
        let rows = sqlx::query(&format!("PRAGMA table_info({})", table_name))
            .fetch_all(pool)
            .await?;

        Ok(rows.iter().map(|row| row.get::<String, _>("name")).collect())
    }
}

pub struct SchemaSync;

impl SchemaSync {
    /// Add missing columns to `T`'s table.
    ///
    /// Returns the names of the columns that were added.
    pub async fn sync_table<T: TableSchema>(pool: &SqlitePool) -> Result<Vec<String>> {
        let table = T::table_name();

        if !SchemaIntrospector::table_exists(pool, table).await? {
            warn!("Schema sync: table '{}' does not exist yet", table);
            return Ok(Vec::new());
        }

        let actual = SchemaIntrospector::column_names(pool, table).await?;
        let mut added = Vec::new();

        for column in T::expected_columns() {
            if actual.iter().any(|name| name.eq_ignore_ascii_case(&column.name)) {
                continue;
            }

            info!("Schema sync: adding column {}.{} ({})", table, column.name, column.sql_type);

            match sqlx::query(&column.add_column_sql(table)).execute(pool).await {
                Ok(_) => added.push(column.name.clone()),
                Err(sqlx::Error::Database(db_err))
                    if db_err.message().contains("duplicate column") =>
                {
                    // Added concurrently by another process
                }
                Err(e) => return Err(e.into()),
            }
        }

        if added.is_empty() {
            info!("Schema sync: '{}' up to date", table);
        }

        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_column_sql_with_default() {
        let col = ColumnDefinition::new("feedback", "TEXT").not_null().default("''");
        assert_eq!(
            col.add_column_sql("tallies"),
            "ALTER TABLE tallies ADD COLUMN feedback TEXT NOT NULL DEFAULT ''"
        );
    }

    #[test]
    fn test_add_column_sql_nullable_default() {
        let col = ColumnDefinition::new("referral", "INTEGER").default("0");
        assert_eq!(
            col.add_column_sql("tallies"),
            "ALTER TABLE tallies ADD COLUMN referral INTEGER DEFAULT 0"
        );
    }

    #[test]
    fn test_add_column_sql_not_null_without_default_degrades() {
        let col = ColumnDefinition::new("timestamp", "TEXT").not_null();
        assert_eq!(
            col.add_column_sql("tallies"),
            "ALTER TABLE tallies ADD COLUMN timestamp TEXT"
        );
    }
}
