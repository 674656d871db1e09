//! Integration tests for store initialization and tally/menu queries
//!
//! Each test opens its own store file in a temporary directory.

use sqlx::SqlitePool;
use tally_common::db::{
    count_menu_options, ensure_schema, initialize_store, insert_tally, list_feedback,
    list_interaction_types, list_menu_options, list_tallies, open_store, seed_default_menus,
    NewTally, SeedOutcome, StoreOptions, TallyFilter, DEFAULT_MENUS,
};
use tally_common::Error;
use tempfile::TempDir;

async fn setup_store() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let pool = initialize_store(&dir.path().join("tally.db"), &StoreOptions::default())
        .await
        .expect("Should initialize store");
    (dir, pool)
}

fn tally(department: &str, interaction_type: &str, timestamp: &str) -> NewTally {
    NewTally {
        department: department.to_string(),
        interaction_type: interaction_type.to_string(),
        referral: false,
        notes: String::new(),
        feedback: String::new(),
        timestamp: timestamp.to_string(),
    }
}

// =============================================================================
// Initialization
// =============================================================================

#[tokio::test]
async fn test_store_file_created_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("tally.db");
    assert!(!db_path.exists());

    let pool = initialize_store(&db_path, &StoreOptions::default()).await;
    assert!(pool.is_ok(), "Initialization failed: {:?}", pool.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[cfg(unix)]
#[tokio::test]
async fn test_open_fails_for_read_only_directory() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let locked = dir.path().join("locked");
    std::fs::create_dir(&locked).unwrap();
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555)).unwrap();

    // Root ignores directory permissions; nothing to assert there
    let probe = locked.join("probe");
    if std::fs::write(&probe, b"").is_ok() {
        let _ = std::fs::remove_file(&probe);
        return;
    }

    let result = open_store(&locked.join("tally.db"), &StoreOptions::default()).await;
    assert!(matches!(result, Err(Error::StoreUnavailable(_))));

    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[tokio::test]
async fn test_fresh_store_seeded_with_catalog() {
    let (_dir, pool) = setup_store().await;

    let count = count_menu_options(&pool).await.unwrap();
    assert_eq!(count, DEFAULT_MENUS.len() as i64);

    let options = list_menu_options(&pool).await.unwrap();
    let pairs: Vec<(String, String)> = options
        .into_iter()
        .map(|o| (o.department, o.item_name))
        .collect();
    let expected: Vec<(String, String)> = DEFAULT_MENUS
        .iter()
        .map(|(d, i)| (d.to_string(), i.to_string()))
        .collect();
    assert_eq!(pairs, expected);
}

#[tokio::test]
async fn test_reinitialization_leaves_catalog_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("tally.db");

    let pool = initialize_store(&db_path, &StoreOptions::default()).await.unwrap();
    pool.close().await;

    let pool = initialize_store(&db_path, &StoreOptions::default()).await.unwrap();
    assert_eq!(count_menu_options(&pool).await.unwrap(), DEFAULT_MENUS.len() as i64);

    let outcome = seed_default_menus(&pool).await.unwrap();
    assert_eq!(outcome, SeedOutcome::AlreadyPopulated(DEFAULT_MENUS.len() as i64));
}

#[tokio::test]
async fn test_partial_catalog_is_not_topped_up() {
    let dir = tempfile::tempdir().unwrap();
    let pool = open_store(&dir.path().join("tally.db"), &StoreOptions::default())
        .await
        .unwrap();
    ensure_schema(&pool).await.unwrap();

    sqlx::query("INSERT INTO menus (department, item_name) VALUES ('Circulation', 'Library Card')")
        .execute(&pool)
        .await
        .unwrap();

    let outcome = seed_default_menus(&pool).await.unwrap();
    assert_eq!(outcome, SeedOutcome::AlreadyPopulated(1));
    assert_eq!(count_menu_options(&pool).await.unwrap(), 1);
}

#[tokio::test]
async fn test_schema_is_idempotent_and_keeps_rows() {
    let (_dir, pool) = setup_store().await;
    insert_tally(&pool, &tally("Circulation", "Library Card", "2024-01-15 10:00:00"))
        .await
        .unwrap();

    ensure_schema(&pool).await.unwrap();
    ensure_schema(&pool).await.unwrap();

    let rows = list_tallies(&pool, &TallyFilter::default()).await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_legacy_store_gains_feedback_column() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("tally.db");

    // Store layout from before feedback was collected
    let pool = open_store(&db_path, &StoreOptions::default()).await.unwrap();
    sqlx::query(
        "CREATE TABLE tallies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            department TEXT,
            qType TEXT,
            referral INTEGER,
            notes TEXT,
            timestamp TEXT
        )",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO tallies (department, qType, referral, notes, timestamp)
         VALUES ('IT Department', 'Tech Question', 1, NULL, '2023-05-01 09:15:00')",
    )
    .execute(&pool)
    .await
    .unwrap();
    pool.close().await;

    let pool = initialize_store(&db_path, &StoreOptions::default()).await.unwrap();
    let rows = list_tallies(&pool, &TallyFilter::default()).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].department, "IT Department");
    assert!(rows[0].referral);
    assert_eq!(rows[0].notes, "");
    assert_eq!(rows[0].feedback, "");
}

// =============================================================================
// Tally queries
// =============================================================================

#[tokio::test]
async fn test_insert_ids_strictly_increase() {
    let (_dir, pool) = setup_store().await;

    let mut last = 0;
    for i in 0..5 {
        let id = insert_tally(
            &pool,
            &tally("Adult Services", "Research Help", &format!("2024-02-0{} 12:00:00", i + 1)),
        )
        .await
        .unwrap();
        assert!(id > last, "id {} not greater than {}", id, last);
        last = id;
    }
}

#[tokio::test]
async fn test_list_orders_most_recent_first() {
    let (_dir, pool) = setup_store().await;

    for ts in ["2024-01-10 09:00:00", "2024-03-01 08:00:00", "2024-02-14 17:30:00"] {
        insert_tally(&pool, &tally("Circulation", "Hold Request", ts)).await.unwrap();
    }

    let rows = list_tallies(&pool, &TallyFilter::default()).await.unwrap();
    let stamps: Vec<&str> = rows.iter().map(|r| r.timestamp.as_str()).collect();
    assert_eq!(
        stamps,
        vec!["2024-03-01 08:00:00", "2024-02-14 17:30:00", "2024-01-10 09:00:00"]
    );
}

#[tokio::test]
async fn test_date_window_is_inclusive_by_calendar_day() {
    let (_dir, pool) = setup_store().await;

    for ts in [
        "2024-01-14 23:59:59",
        "2024-01-15 00:00:00",
        "2024-01-15 23:59:59",
        "2024-01-16 00:00:00",
    ] {
        insert_tally(&pool, &tally("Circulation", "Library Card", ts)).await.unwrap();
    }

    let filter = TallyFilter::from_params(Some("2024-01-15"), Some("2024-01-15"), None).unwrap();
    let rows = list_tallies(&pool, &filter).await.unwrap();

    let stamps: Vec<&str> = rows.iter().map(|r| r.timestamp.as_str()).collect();
    assert_eq!(stamps, vec!["2024-01-15 23:59:59", "2024-01-15 00:00:00"]);
}

#[tokio::test]
async fn test_open_ended_windows() {
    let (_dir, pool) = setup_store().await;

    for ts in ["2024-01-01 10:00:00", "2024-06-01 10:00:00", "2024-12-01 10:00:00"] {
        insert_tally(&pool, &tally("Youth Services", "Programming", ts)).await.unwrap();
    }

    let from_june = TallyFilter::from_params(Some("2024-06-01"), None, None).unwrap();
    assert_eq!(list_tallies(&pool, &from_june).await.unwrap().len(), 2);

    let until_june = TallyFilter::from_params(None, Some("2024-06-01"), None).unwrap();
    assert_eq!(list_tallies(&pool, &until_june).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_department_filter_exact_and_wildcard() {
    let (_dir, pool) = setup_store().await;

    insert_tally(&pool, &tally("Circulation", "Library Card", "2024-01-01 10:00:00")).await.unwrap();
    insert_tally(&pool, &tally("IT Department", "Other", "2024-01-02 10:00:00")).await.unwrap();
    insert_tally(&pool, &tally("Circulation", "Fines Inquiry", "2024-01-03 10:00:00")).await.unwrap();

    let circ = TallyFilter::from_params(None, None, Some("Circulation")).unwrap();
    let rows = list_tallies(&pool, &circ).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.department == "Circulation"));

    let all = TallyFilter::from_params(None, None, Some("ALL")).unwrap();
    assert_eq!(list_tallies(&pool, &all).await.unwrap().len(), 3);

    let lowercase = TallyFilter::from_params(None, None, Some("circulation")).unwrap();
    assert!(list_tallies(&pool, &lowercase).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_feedback_excludes_empty_rows() {
    let (_dir, pool) = setup_store().await;

    let mut with_feedback = tally("Adult Services", "Room Bookings", "2024-04-02 11:00:00");
    with_feedback.feedback = "Room was double-booked".to_string();
    insert_tally(&pool, &with_feedback).await.unwrap();
    insert_tally(&pool, &tally("Adult Services", "Collections", "2024-04-03 11:00:00")).await.unwrap();

    let entries = list_feedback(&pool, &TallyFilter::default()).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].feedback, "Room was double-booked");
    assert_eq!(entries[0].department, "Adult Services");
}

// =============================================================================
// Menu queries
// =============================================================================

#[tokio::test]
async fn test_interaction_types_sorted_and_exact() {
    let (_dir, pool) = setup_store().await;

    let types = list_interaction_types(&pool, "Circulation").await.unwrap();
    assert_eq!(
        types,
        vec!["Check In / Check Out", "Fines Inquiry", "Hold Request", "Library Card"]
    );

    assert!(list_interaction_types(&pool, "circulation").await.unwrap().is_empty());
    assert!(list_interaction_types(&pool, "Cataloging").await.unwrap().is_empty());
    assert!(list_interaction_types(&pool, "").await.unwrap().is_empty());
}
