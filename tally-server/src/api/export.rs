//! Report download

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tally_common::db::{self, TallyFilter};
use tracing::info;

use crate::export::{ExportError, ExportFormat, TallyReport};
use crate::AppState;

/// Query parameters for `GET /api/tally/export`
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub department: Option<String>,
    /// `csv` (default), `xlsx` or `excel`
    pub format: Option<String>,
}

/// GET /api/tally/export?start=&end=&department=&format=
pub async fn export_tallies(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ExportError> {
    let format = ExportFormat::from_param(query.format.as_deref())?;

    let filter = TallyFilter::from_params(
        query.start.as_deref(),
        query.end.as_deref(),
        query.department.as_deref(),
    )
    .map_err(|e| match e {
        tally_common::Error::Validation(msg) => ExportError::InvalidFilter(msg),
        other => ExportError::Storage(other),
    })?;

    let tallies = db::list_tallies(&state.db, &filter).await?;
    let report = TallyReport::new(&tallies, filter.total_label());
    let body = report.render(format)?;

    info!(
        "Exported {} tallies as {} ({} bytes)",
        report.rows.len(),
        format.as_str(),
        body.len()
    );

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type()),
            (header::CONTENT_DISPOSITION, format.content_disposition()),
        ],
        body,
    )
        .into_response())
}
