//! Timestamp utilities
//!
//! Tallies store their timestamp as `YYYY-MM-DD HH:MM:SS` text so that
//! lexical order in SQLite is chronological order. Reports display the
//! calendar date as `MM/DD/YYYY`.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

use crate::{Error, Result};

/// Storage encoding for tally timestamps
pub const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Report display format for tally dates
pub const DISPLAY_FORMAT: &str = "%m/%d/%Y";

/// Calendar date format accepted for filter bounds
pub const FILTER_DATE_FORMAT: &str = "%Y-%m-%d";

const NAIVE_INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Current local time in storage encoding
pub fn now_timestamp() -> String {
    format_storage(&Local::now().naive_local())
}

/// Encode a timestamp for storage
pub fn format_storage(ts: &NaiveDateTime) -> String {
    ts.format(STORAGE_FORMAT).to_string()
}

/// Parse a client-supplied timestamp.
///
/// Accepts the storage encoding, ISO `T`-separated forms with optional
/// seconds and fraction, RFC 3339 with an offset (converted to local time),
/// and a bare calendar date (midnight).
pub fn parse_client_timestamp(input: &str) -> Result<NaiveDateTime> {
    let s = input.trim();

    for fmt in NAIVE_INPUT_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ts);
        }
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Local).naive_local());
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, FILTER_DATE_FORMAT) {
        if let Some(ts) = date.and_hms_opt(0, 0, 0) {
            return Ok(ts);
        }
    }

    Err(Error::Validation(format!("Invalid timestamp: {}", input)))
}

/// Parse a `YYYY-MM-DD` filter bound
pub fn parse_filter_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), FILTER_DATE_FORMAT)
        .map_err(|_| Error::Validation(format!("Invalid date: {} (expected YYYY-MM-DD)", input)))
}

/// Render a stored timestamp as `MM/DD/YYYY`.
///
/// Rows written by older clients may hold other encodings; those are parsed
/// leniently. Text that cannot be parsed at all is returned unchanged.
pub fn display_date(stored: &str) -> String {
    match parse_client_timestamp(stored) {
        Ok(ts) => ts.format(DISPLAY_FORMAT).to_string(),
        Err(_) => stored.to_string(),
    }
}
