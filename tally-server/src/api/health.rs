//! Liveness endpoint

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

const MODULE: &str = "tally-server";

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
}

impl HealthResponse {
    fn current() -> Self {
        Self {
            status: "ok",
            module: MODULE,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// GET /health
///
/// Answers without touching the store.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::current())
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
