//! Alarm occurrences and merged incidents.

use chrono::{DateTime, Utc};

/// One decoded (code, text) pair from a raw alarm-log line.
///
/// The occurrence is "current" from its own timestamp until the next raw
/// line on the same channel supersedes it, so `valid_until` is the next
/// line's timestamp. Timestamps are floored to whole seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmOccurrence {
    pub code: String,
    pub text: String,
    /// Second the log line was emitted.
    pub start: i64,
    /// Second of the next surviving line on the channel (exclusive bound).
    pub valid_until: i64,
}

/// A maximal run of temporally-adjacent occurrences of one (code, text) pair,
/// treated as a single logical event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmIncident {
    pub code: String,
    pub text: String,
    /// Earliest occurrence timestamp in the island.
    pub start_time: DateTime<Utc>,
    /// Raw occurrences merged into this incident.
    pub occurrences: usize,
}
