//! Report filters shared by tally listing, feedback listing and export
//!
//! Recognized options: `start` (calendar-date lower bound), `end`
//! (calendar-date upper bound), `department` (exact match, or the wildcard
//! `all` in any casing). All values reach SQL as bind parameters.

use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite};

use crate::time::{parse_filter_date, FILTER_DATE_FORMAT};
use crate::Result;

/// Department restriction for a report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DepartmentFilter {
    #[default]
    All,
    Exact(String),
}

impl DepartmentFilter {
    /// Interpret a raw `department` parameter.
    ///
    /// Absent, blank or `all` (case-insensitive) means no restriction.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some(value) if !value.trim().is_empty() && !value.trim().eq_ignore_ascii_case("all") => {
                DepartmentFilter::Exact(value.to_string())
            }
            _ => DepartmentFilter::All,
        }
    }
}

/// Inclusive calendar-date window plus department restriction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TallyFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub department: DepartmentFilter,
}

impl TallyFilter {
    /// Build a filter from raw query parameters.
    ///
    /// Blank date strings are treated as absent; malformed dates are a
    /// validation error.
    pub fn from_params(
        start: Option<&str>,
        end: Option<&str>,
        department: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            start: parse_optional_date(start)?,
            end: parse_optional_date(end)?,
            department: DepartmentFilter::from_param(department),
        })
    }

    /// Department name when a restriction applies
    pub fn department(&self) -> Option<&str> {
        match &self.department {
            DepartmentFilter::All => None,
            DepartmentFilter::Exact(name) => Some(name),
        }
    }

    /// Label for the trailing summary row of an export
    pub fn total_label(&self) -> String {
        match self.department() {
            Some(name) => format!("Total for {}", name),
            None => "Grand Total".to_string(),
        }
    }

    /// Append `AND ...` conditions to a query that already has a WHERE clause.
    ///
    /// Date bounds compare the calendar-date portion of the stored timestamp,
    /// which is the `[start 00:00:00, end 23:59:59]` window.
    pub fn push_conditions(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        if let Some(start) = self.start {
            qb.push(" AND date(timestamp) >= ")
                .push_bind(start.format(FILTER_DATE_FORMAT).to_string());
        }
        if let Some(end) = self.end {
            qb.push(" AND date(timestamp) <= ")
                .push_bind(end.format(FILTER_DATE_FORMAT).to_string());
        }
        if let Some(name) = self.department() {
            qb.push(" AND department = ").push_bind(name.to_string());
        }
    }
}

fn parse_optional_date(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    match raw {
        Some(value) if !value.trim().is_empty() => parse_filter_date(value).map(Some),
        _ => Ok(None),
    }
}
