//! Tabular tally reports (CSV and XLSX)
//!
//! Both formats share the column order in [`HEADERS`] and end with one
//! summary row: the total label followed by the row count.

mod delimited;
mod workbook;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tally_common::db::Tally;
use tally_common::time::display_date;
use thiserror::Error;
use tracing::error;

/// Column headers in output order
pub const HEADERS: [&str; 7] = [
    "ID",
    "Department",
    "Interaction Type",
    "Referral",
    "Notes",
    "Feedback",
    "Timestamp",
];

/// Supported download formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    /// Parse the `format` query parameter; absent means CSV
    pub fn from_param(raw: Option<&str>) -> Result<Self, ExportError> {
        match raw.map(|s| s.trim().to_ascii_lowercase()) {
            None => Ok(ExportFormat::Csv),
            Some(s) if s.is_empty() || s == "csv" => Ok(ExportFormat::Csv),
            Some(s) if s == "xlsx" || s == "excel" => Ok(ExportFormat::Xlsx),
            Some(s) => Err(ExportError::UnsupportedFormat(s)),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    pub fn content_disposition(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "attachment; filename=tally_report.csv",
            ExportFormat::Xlsx => "attachment; filename=tally_report.xlsx",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

/// One data row, already formatted for output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub id: i64,
    pub department: String,
    pub interaction_type: String,
    /// "Yes" / "No"
    pub referral: &'static str,
    pub notes: String,
    pub feedback: String,
    /// `MM/DD/YYYY`
    pub date: String,
}

impl From<&Tally> for ReportRow {
    fn from(t: &Tally) -> Self {
        Self {
            id: t.id,
            department: t.department.clone(),
            interaction_type: t.interaction_type.clone(),
            referral: if t.referral { "Yes" } else { "No" },
            notes: t.notes.clone(),
            feedback: t.feedback.clone(),
            date: display_date(&t.timestamp),
        }
    }
}

impl ReportRow {
    /// Cell text in [`HEADERS`] order
    pub fn cells(&self) -> [String; 7] {
        [
            self.id.to_string(),
            self.department.clone(),
            self.interaction_type.clone(),
            self.referral.to_string(),
            self.notes.clone(),
            self.feedback.clone(),
            self.date.clone(),
        ]
    }
}

/// Filtered, ordered rows plus the summary label
#[derive(Debug, Clone)]
pub struct TallyReport {
    pub rows: Vec<ReportRow>,
    pub total_label: String,
}

impl TallyReport {
    pub fn new(tallies: &[Tally], total_label: impl Into<String>) -> Self {
        Self {
            rows: tallies.iter().map(ReportRow::from).collect(),
            total_label: total_label.into(),
        }
    }

    /// Render the document bytes for `format`
    pub fn render(&self, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
        match format {
            ExportFormat::Csv => delimited::render_csv(self),
            ExportFormat::Xlsx => workbook::render_xlsx(self),
        }
    }
}

/// Export failures
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    InvalidFilter(String),

    #[error("Store error: {0}")]
    Storage(#[from] tally_common::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Render error: {0}")]
    Render(String),
}

impl IntoResponse for ExportError {
    fn into_response(self) -> Response {
        match self {
            ExportError::UnsupportedFormat(_) | ExportError::InvalidFilter(_) => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            other => {
                error!("Export failed: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, "Error generating export").into_response()
            }
        }
    }
}
