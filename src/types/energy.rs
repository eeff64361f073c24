//! Energy segmentation types: load samples, on-intervals, runs, day segments.

use chrono::NaiveDate;

/// One percentage-load reading, already clamped to [0, 100].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadSample {
    pub ts_ms: i64,
    pub pct: f64,
}

/// The interval between one load sample and the next, carrying the load
/// percentage observed at its start. The final sample of a query has no
/// successor and therefore produces no interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnInterval {
    pub start_ms: i64,
    pub end_ms: i64,
    pub pct: f64,
    /// Whether the load exceeded the configured on-threshold.
    pub is_on: bool,
}

/// A maximal contiguous sequence of "on" intervals.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub id: usize,
    pub intervals: Vec<OnInterval>,
}

impl Run {
    pub fn start_ms(&self) -> i64 {
        self.intervals.first().map_or(0, |iv| iv.start_ms)
    }

    pub fn end_ms(&self) -> i64 {
        self.intervals.last().map_or(0, |iv| iv.end_ms)
    }
}

/// A slice of one run's interval clipped to a single UTC calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySegment {
    pub day: NaiveDate,
    pub run_id: usize,
    pub hours: f64,
    pub energy_kwh: f64,
}
