//! Query-range parsing and validation.
//!
//! All date handling is anchored to UTC. The store keys samples by UTC
//! epoch milliseconds, so resolving caller dates against a local clock
//! would silently shift every window by the operator's timezone offset,
//! an earlier production bug this module exists to prevent.

use crate::error::EngineError;
use crate::source::TimeRange;
use crate::types::ReportPeriod;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FMT: &str = "%Y-%m-%d";

/// Which bound of the window a date string is resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    /// Date-only input expands to 00:00:00.
    Start,
    /// Date-only input expands to 23:59:59.
    End,
}

/// A validated, inclusive UTC query window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl QueryRange {
    /// Parse and validate a `(from, until)` pair.
    ///
    /// Accepts `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD` per input; date-only
    /// inputs expand to full-day bounds. Rejects `from > until` before any
    /// store access.
    pub fn parse(from: &str, until: &str) -> Result<Self, EngineError> {
        let start = parse_bound(from, Bound::Start)?;
        let end = parse_bound(until, Bound::End)?;

        if start > end {
            return Err(EngineError::InvalidInput(format!(
                "'from' ({}) is after 'until' ({})",
                start.format(DATETIME_FMT),
                end.format(DATETIME_FMT),
            )));
        }
        Ok(Self { start, end })
    }

    /// Inclusive millisecond bounds for the store query.
    pub fn time_range(&self) -> TimeRange {
        TimeRange {
            start_ms: self.start.timestamp_millis(),
            end_ms: self.end.timestamp_millis(),
        }
    }

    /// The resolved window, echoed back on every report.
    pub fn period(&self) -> ReportPeriod {
        ReportPeriod {
            from: self.start.format(DATETIME_FMT).to_string(),
            until: self.end.format(DATETIME_FMT).to_string(),
        }
    }
}

fn parse_bound(input: &str, bound: Bound) -> Result<DateTime<Utc>, EngineError> {
    let trimmed = input.trim();

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, DATETIME_FMT) {
        return Ok(dt.and_utc());
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FMT) {
        let time = match bound {
            Bound::Start => NaiveTime::MIN,
            Bound::End => NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN),
        };
        return Ok(date.and_time(time).and_utc());
    }

    Err(EngineError::InvalidInput(format!(
        "Unrecognized date '{trimmed}' (expected '{DATE_FMT}' or '{DATETIME_FMT}')"
    )))
}
