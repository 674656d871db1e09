//! HTTP API handlers for tally-server

pub mod error;
pub mod export;
pub mod feedback;
pub mod health;
pub mod tally;
pub mod types;

pub use error::ApiError;
pub use export::export_tallies;
pub use feedback::list_feedback;
pub use health::health_routes;
pub use tally::{create_tally, list_tallies};
pub use types::{list_types, list_types_without_department};

use serde::Deserialize;
use tally_common::db::TallyFilter;

/// Report filter query parameters shared by listing endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    /// Inclusive lower bound (`YYYY-MM-DD`)
    pub start: Option<String>,
    /// Inclusive upper bound (`YYYY-MM-DD`)
    pub end: Option<String>,
    /// Department name, or `all`
    pub department: Option<String>,
}

impl ReportQuery {
    pub fn to_filter(&self) -> tally_common::Result<TallyFilter> {
        TallyFilter::from_params(
            self.start.as_deref(),
            self.end.as_deref(),
            self.department.as_deref(),
        )
    }
}
