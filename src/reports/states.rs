//! State Classifier: idle-gap detection plus smoothed activity labelling.
//!
//! Two independent passes over the same bucket sequence:
//!
//! 1. **Gap pass**: any missing second between consecutive buckets is time
//!    the machine was fully off (a powered machine emits at least one update
//!    per second). Accumulated as TrueIdle.
//! 2. **Smoothing pass**: per UTC calendar day, a moving average over each
//!    bucket and its up-to-W−1 predecessors (bounded ring of the last W
//!    counts, no cross-day leakage). The first W−1 buckets of a day lack
//!    history and are warm-up: never classified, but they still participated
//!    in the gap pass above.
//!
//! Classified seconds fall into three activity levels via two thresholds
//! from the configured profile.

use crate::config::ActivityConfig;
use crate::types::{MachineState, SecondBucket, StateTimeRow};
use std::collections::VecDeque;

const SECONDS_PER_DAY: i64 = 86_400;

/// Raw second totals per state, before conversion to hours.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateTotals {
    pub idle_gap_seconds: i64,
    pub low_seconds: u64,
    pub intermediate_seconds: u64,
    pub high_seconds: u64,
    /// Buckets excluded from classification for lack of smoothing history.
    pub warmup_seconds: u64,
}

impl StateTotals {
    /// Report rows in fixed state order, hours = seconds / 3600.
    pub fn into_rows(self) -> Vec<StateTimeRow> {
        let hours = |secs: f64| secs / 3600.0;
        vec![
            StateTimeRow {
                state: MachineState::TrueIdle,
                total_hours: hours(self.idle_gap_seconds as f64),
            },
            StateTimeRow {
                state: MachineState::LowActivity,
                total_hours: hours(self.low_seconds as f64),
            },
            StateTimeRow {
                state: MachineState::IntermediateActivity,
                total_hours: hours(self.intermediate_seconds as f64),
            },
            StateTimeRow {
                state: MachineState::HighActivity,
                total_hours: hours(self.high_seconds as f64),
            },
        ]
    }
}

/// Classify a unique, ascending bucket sequence into state totals.
pub fn classify(buckets: &[SecondBucket], config: &ActivityConfig) -> StateTotals {
    let mut totals = StateTotals {
        idle_gap_seconds: idle_gap_seconds(buckets),
        ..StateTotals::default()
    };

    let window = config.smoothing_window.max(1);
    let (low_max, intermediate_max) = config.bounds();

    let mut ring: VecDeque<u32> = VecDeque::with_capacity(window);
    let mut current_day: Option<i64> = None;
    let mut row_in_day: usize = 0;

    for bucket in buckets {
        let day = bucket.second.div_euclid(SECONDS_PER_DAY);
        if current_day != Some(day) {
            current_day = Some(day);
            ring.clear();
            row_in_day = 0;
        }

        if ring.len() == window {
            ring.pop_front();
        }
        ring.push_back(bucket.distinct_vars);
        row_in_day += 1;

        if row_in_day < window {
            totals.warmup_seconds += 1;
            continue;
        }

        let smoothed = ring.iter().map(|&c| f64::from(c)).sum::<f64>() / ring.len() as f64;
        if smoothed <= low_max {
            totals.low_seconds += 1;
        } else if smoothed <= intermediate_max {
            totals.intermediate_seconds += 1;
        } else {
            totals.high_seconds += 1;
        }
    }

    totals
}

/// Sum of positive gaps between consecutive buckets.
///
/// For each pair, `gap = next.second − (prev.second + 1)`: adjacent seconds
/// produce zero, a hole of N missing seconds produces N.
fn idle_gap_seconds(buckets: &[SecondBucket]) -> i64 {
    buckets
        .windows(2)
        .map(|pair| (pair[1].second - (pair[0].second + 1)).max(0))
        .sum()
}
