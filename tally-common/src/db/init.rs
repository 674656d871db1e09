//! Store initialization
//!
//! Startup sequence:
//! 1. Verify the store directory is writable and open (or create) the file.
//!    Failure here is fatal to the caller.
//! 2. Ensure the schema exists.
//! 3. Seed the default menu catalog when `menus` is empty.
//!
//! Steps 2 and 3 are best-effort inside [`initialize_store`]: failures are
//! logged and the pool is still returned so tally creation and listing keep
//! working.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{error, info, warn};

use crate::db::menus::count_menu_options;
use crate::db::schema::ensure_schema;
use crate::{Error, Result};

/// Built-in department → interaction type catalog
pub const DEFAULT_MENUS: &[(&str, &str)] = &[
    ("Adult Services", "Research Help"),
    ("Adult Services", "Patron Question"),
    ("Adult Services", "Programming"),
    ("Adult Services", "Room Bookings"),
    ("Adult Services", "Collections"),
    ("Youth Services", "Patron Question"),
    ("Youth Services", "Programming"),
    ("Circulation", "Check In / Check Out"),
    ("Circulation", "Library Card"),
    ("Circulation", "Fines Inquiry"),
    ("Circulation", "Hold Request"),
    ("IT Department", "Printer/Copier"),
    ("IT Department", "Tech Question"),
    ("IT Department", "1-on-1"),
    ("IT Department", "Other"),
];

const WRITE_PROBE_NAME: &str = ".tally-write-check";

/// Connection settings for the store pool
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub max_connections: u32,
    pub busy_timeout: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            max_connections: 5,
            busy_timeout: Duration::from_millis(5000),
        }
    }
}

/// Result of the default menu seed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Table was empty; this many rows were inserted
    Seeded(usize),
    /// Table already had this many rows; nothing inserted
    AlreadyPopulated(i64),
}

/// Open (creating if absent) the store file at `db_path`.
///
/// Returns [`Error::StoreUnavailable`] when the containing directory cannot
/// be created or written, or when SQLite cannot open the file.
pub async fn open_store(db_path: &Path, options: &StoreOptions) -> Result<SqlitePool> {
    let dir = store_directory(db_path);
    ensure_directory_writable(&dir)?;

    let newly_created = !db_path.exists();

    let connect_options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(options.busy_timeout);

    let pool = SqlitePoolOptions::new()
        .max_connections(options.max_connections.max(1))
        .connect_with(connect_options)
        .await
        .map_err(|e| {
            Error::StoreUnavailable(format!(
                "Could not open database {}: {}",
                db_path.display(),
                e
            ))
        })?;

    if newly_created {
        info!("Created new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    Ok(pool)
}

/// Seed the default catalog when `menus` is empty.
///
/// All rows are inserted in one transaction. The guard is table-wide: a
/// non-empty table is never topped up.
pub async fn seed_default_menus(pool: &SqlitePool) -> Result<SeedOutcome> {
    let count = count_menu_options(pool).await?;
    if count > 0 {
        info!("Menus table already has {} entries", count);
        return Ok(SeedOutcome::AlreadyPopulated(count));
    }

    info!("Seeding default department menu options...");

    let mut tx = pool.begin().await?;
    for (department, item_name) in DEFAULT_MENUS {
        sqlx::query("INSERT INTO menus (department, item_name) VALUES (?, ?)")
            .bind(*department)
            .bind(*item_name)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    info!("Default menus seeded ({} entries)", DEFAULT_MENUS.len());
    Ok(SeedOutcome::Seeded(DEFAULT_MENUS.len()))
}

/// Open the store, then ensure schema and seed.
///
/// Only the open step can fail; schema and seed errors are logged.
pub async fn initialize_store(db_path: &Path, options: &StoreOptions) -> Result<SqlitePool> {
    let pool = open_store(db_path, options).await?;

    match ensure_schema(&pool).await {
        Ok(()) => {
            if let Err(e) = seed_default_menus(&pool).await {
                error!("Menu seed failed: {}", e);
            }
        }
        Err(e) => error!("Schema initialization failed: {}", e),
    }

    Ok(pool)
}

fn store_directory(db_path: &Path) -> PathBuf {
    match db_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn ensure_directory_writable(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| {
        Error::StoreUnavailable(format!("Cannot create directory {}: {}", dir.display(), e))
    })?;

    let probe = dir.join(WRITE_PROBE_NAME);
    std::fs::write(&probe, b"").map_err(|e| {
        Error::StoreUnavailable(format!("Directory not writable: {} ({})", dir.display(), e))
    })?;
    if let Err(e) = std::fs::remove_file(&probe) {
        warn!("Could not remove write check file {}: {}", probe.display(), e);
    }

    Ok(())
}
