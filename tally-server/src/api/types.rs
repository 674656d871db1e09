//! Interaction type lookup

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tally_common::db;
use tracing::error;

use crate::AppState;

/// GET /api/types/:department
///
/// Sorted interaction types for an exact department name. Unknown
/// departments get an empty list; a store failure gets an empty list with
/// status 500.
pub async fn list_types(
    State(state): State<AppState>,
    Path(department): Path<String>,
) -> Response {
    match db::list_interaction_types(&state.db, &department).await {
        Ok(types) => Json(types).into_response(),
        Err(e) => {
            error!("Menu fetch failed for '{}': {}", department, e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(Vec::<String>::new())).into_response()
        }
    }
}

/// GET /api/types/ (no department segment)
pub async fn list_types_without_department() -> Json<Vec<String>> {
    Json(Vec::new())
}
