//! Feedback listing

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use tally_common::db::{self, FeedbackEntry};
use tally_common::time::display_date;

use crate::api::{ApiError, ReportQuery};
use crate::AppState;

/// One row of `GET /api/feedback`
#[derive(Debug, Serialize)]
pub struct FeedbackRow {
    pub feedback: String,
    pub department: String,
    /// `MM/DD/YYYY`
    pub timestamp: String,
}

impl From<FeedbackEntry> for FeedbackRow {
    fn from(entry: FeedbackEntry) -> Self {
        Self {
            timestamp: display_date(&entry.timestamp),
            feedback: entry.feedback,
            department: entry.department,
        }
    }
}

/// GET /api/feedback?start=&end=&department=
///
/// Same filters and ordering as the tally listing, restricted to rows with
/// non-empty feedback.
pub async fn list_feedback(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Vec<FeedbackRow>>, ApiError> {
    let filter = query.to_filter()?;
    let entries = db::list_feedback(&state.db, &filter).await?;

    Ok(Json(entries.into_iter().map(FeedbackRow::from).collect()))
}
