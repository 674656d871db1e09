//! Failure payloads for the JSON endpoints
//!
//! Failures are reported as HTTP 200 with `{"success": false, "error": ...}`
//! so the desk form can show the message inline.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Handler-boundary error for JSON endpoints
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input
    #[error("{0}")]
    Validation(String),

    /// Store read/write failure
    #[error("{0}")]
    Storage(String),
}

/// Body of a failure response
#[derive(Debug, Serialize)]
pub struct FailureResponse {
    pub success: bool,
    pub error: String,
}

impl From<tally_common::Error> for ApiError {
    fn from(e: tally_common::Error) -> Self {
        match e {
            tally_common::Error::Validation(msg) => ApiError::Validation(msg),
            other => ApiError::Storage(other.client_message()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Validation(msg) => warn!("Rejected request: {}", msg),
            ApiError::Storage(msg) => error!("Store error: {}", msg),
        }

        let body = Json(FailureResponse {
            success: false,
            error: self.to_string(),
        });

        (StatusCode::OK, body).into_response()
    }
}
