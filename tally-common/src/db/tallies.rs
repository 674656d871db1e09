//! Tally queries
//!
//! Every listing is ordered most recent first; rows sharing a timestamp are
//! ordered by id, newest first.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::db::filters::TallyFilter;
use crate::db::models::{FeedbackEntry, NewTally, Tally};
use crate::Result;

// Columns written by older deployments may be NULL.
const TALLY_COLUMNS: &str = "id, \
     COALESCE(department, '') AS department, \
     COALESCE(qType, '') AS qType, \
     COALESCE(referral, 0) != 0 AS referral, \
     COALESCE(notes, '') AS notes, \
     COALESCE(feedback, '') AS feedback, \
     COALESCE(timestamp, '') AS timestamp";

const ORDER_RECENT_FIRST: &str = " ORDER BY timestamp DESC, id DESC";

/// Insert one tally and return its generated id
pub async fn insert_tally(pool: &SqlitePool, tally: &NewTally) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO tallies (department, qType, referral, notes, feedback, timestamp)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&tally.department)
    .bind(&tally.interaction_type)
    .bind(tally.referral)
    .bind(&tally.notes)
    .bind(&tally.feedback)
    .bind(&tally.timestamp)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    debug!("Inserted tally {} ({} / {})", id, tally.department, tally.interaction_type);
    Ok(id)
}

/// Tallies matching `filter`, most recent first
pub async fn list_tallies(pool: &SqlitePool, filter: &TallyFilter) -> Result<Vec<Tally>> {
    let mut qb = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {} FROM tallies WHERE 1=1",
        TALLY_COLUMNS
    ));
    filter.push_conditions(&mut qb);
    qb.push(ORDER_RECENT_FIRST);

    let rows = qb.build_query_as::<Tally>().fetch_all(pool).await?;
    Ok(rows)
}

/// Non-empty feedback matching `filter`, most recent first
pub async fn list_feedback(pool: &SqlitePool, filter: &TallyFilter) -> Result<Vec<FeedbackEntry>> {
    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT feedback, COALESCE(department, '') AS department, \
         COALESCE(timestamp, '') AS timestamp FROM tallies \
         WHERE feedback IS NOT NULL AND feedback != ''",
    );
    filter.push_conditions(&mut qb);
    qb.push(ORDER_RECENT_FIRST);

    let rows = qb.build_query_as::<FeedbackEntry>().fetch_all(pool).await?;
    Ok(rows)
}
