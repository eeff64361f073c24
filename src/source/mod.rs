//! Signal source abstraction: the engine's only seam to the backing
//! time-series store.
//!
//! The store is a point-in-time-ordered, range-queryable collection of
//! numeric variable updates and string channel events. The engine issues
//! range-bounded queries, consumes ascending-timestamp rows, and performs no
//! writes. Implementations: [`MemorySource`] (fixtures) and [`JsonlSource`]
//! (event-log replay, the CLI's default backing store).

mod jsonl;
mod memory;

pub use jsonl::JsonlSource;
pub use memory::MemorySource;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inclusive millisecond range for a store query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl TimeRange {
    pub fn contains(&self, ts_ms: i64) -> bool {
        ts_ms >= self.start_ms && ts_ms <= self.end_ms
    }
}

/// One numeric variable update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSample {
    pub ts_ms: i64,
    pub variable_id: u32,
    pub value: f64,
}

/// One string-channel event (a raw alarm-log line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringEvent {
    pub ts_ms: i64,
    pub value: String,
}

/// Store access failures.
///
/// Any of these surfaces to the caller as `DataSourceUnavailable`; a store
/// that cannot answer is never reported as "no data".
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Timeout waiting for query response")]
    Timeout,

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait abstracting where raw signals come from.
///
/// All three methods return rows ascending by timestamp. Uniqueness of
/// `(timestamp, variable_id)` is assumed but not required; the aggregator
/// deduplicates locally if the store violates it.
#[async_trait]
pub trait SignalSource: Send + Sync {
    /// All float-variable updates in range.
    async fn numeric_samples(&self, range: TimeRange) -> Result<Vec<NumericSample>, SourceError>;

    /// Updates of one named variable in range.
    async fn load_samples(
        &self,
        variable: &str,
        range: TimeRange,
    ) -> Result<Vec<NumericSample>, SourceError>;

    /// String events on one channel in range.
    async fn string_events(
        &self,
        channel: u32,
        range: TimeRange,
    ) -> Result<Vec<StringEvent>, SourceError>;
}
