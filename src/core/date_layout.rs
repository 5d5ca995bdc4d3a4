//! Wire date handling.
//!
//! `changeDate` travels in a configurable strftime layout, while the `dateFrom`
//! query filter is always strict RFC3339. Everything is stored and compared in UTC.

use crate::errors::{Error, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Layout used when the configuration does not name one (`2006-01-02T15:04:05Z`).
pub const DEFAULT_DATE_TIME_LAYOUT: &str = "%Y-%m-%dT%H:%M:%SZ";

const RFC3339: &str = "RFC3339";

/// A validated chrono strftime layout for `changeDate` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateLayout {
    layout: String,
}

impl DateLayout {
    /// Validates `layout` and wraps it.
    ///
    /// Returns `Error::Config` for an empty layout or one containing an
    /// unknown specifier.
    pub fn new(layout: &str) -> Result<Self> {
        if layout.trim().is_empty() {
            return Err(Error::Config {
                message: "date_time_layout cannot be empty".to_string(),
            });
        }
        if StrftimeItems::new(layout).any(|item| matches!(item, Item::Error)) {
            return Err(Error::Config {
                message: format!("date_time_layout {layout:?} is not a valid strftime layout"),
            });
        }
        Ok(Self {
            layout: layout.to_string(),
        })
    }

    /// Renders `date` in this layout.
    #[must_use]
    pub fn format(&self, date: &DateTime<Utc>) -> String {
        date.format(&self.layout).to_string()
    }

    /// Parses `value` in this layout.
    ///
    /// Layouts carrying an offset are converted to UTC. Layouts without one are
    /// read as UTC, and date-only layouts resolve to midnight.
    pub fn parse(&self, value: &str) -> Result<DateTime<Utc>> {
        if let Ok(date) = DateTime::parse_from_str(value, &self.layout) {
            return Ok(date.with_timezone(&Utc));
        }
        match NaiveDateTime::parse_from_str(value, &self.layout) {
            Ok(naive) => Ok(naive.and_utc()),
            Err(err) => NaiveDate::parse_from_str(value, &self.layout)
                .map(|date| date.and_time(chrono::NaiveTime::MIN).and_utc())
                .map_err(|_| Error::InvalidDate {
                    reason: format!("parsing time {value:?}: {err}"),
                    expected: self.layout.clone(),
                }),
        }
    }

    /// Parses an optional caller-supplied `changeDate`.
    ///
    /// Absent and empty values yield `None`; anything else must match the layout.
    pub fn parse_optional(&self, value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
        match value {
            Some(value) if !value.is_empty() => self.parse(value).map(Some),
            _ => Ok(None),
        }
    }
}

impl Default for DateLayout {
    fn default() -> Self {
        Self {
            layout: DEFAULT_DATE_TIME_LAYOUT.to_string(),
        }
    }
}

/// Parses a strict RFC3339 timestamp, as required for query filters.
pub fn parse_rfc3339(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|err| Error::InvalidDate {
            reason: format!("parsing time {value:?}: {err}"),
            expected: RFC3339.to_string(),
        })
}
