//! Aggregated per-second activity.

use serde::{Deserialize, Serialize};

/// One second of aggregated signal: how many distinct variables updated
/// during that second.
///
/// `second` is a Unix timestamp in whole seconds (UTC). Buckets produced by
/// the aggregator are unique and ascending by `second`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondBucket {
    pub second: i64,
    pub distinct_vars: u32,
}
