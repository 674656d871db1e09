//! tally-server library - service desk tally reporting API
//!
//! Routes:
//! - `POST /api/tally` create a tally
//! - `GET  /api/tally` list tallies
//! - `GET  /api/tally/export` download CSV or XLSX report
//! - `GET  /api/feedback` list feedback
//! - `GET  /api/types/:department` interaction types for a department
//! - `GET  /health` health check

use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod export;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Store connection pool
    pub db: SqlitePool,
    /// Reject tallies that arrive without a timestamp
    pub require_timestamp: bool,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, require_timestamp: bool) -> Self {
        Self {
            db,
            require_timestamp,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let api = Router::new()
        .route("/api/tally", get(api::list_tallies).post(api::create_tally))
        .route("/api/tally/export", get(api::export_tallies))
        .route("/api/feedback", get(api::list_feedback))
        .route("/api/types/", get(api::list_types_without_department))
        .route("/api/types/:department", get(api::list_types));

    Router::new()
        .merge(api)
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
