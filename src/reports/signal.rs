//! Signal Aggregator: collapse raw variable updates into per-second
//! distinct-variable counts.

use crate::source::NumericSample;
use crate::types::SecondBucket;

/// Aggregate raw samples into one [`SecondBucket`] per distinct second.
///
/// The count is over *distinct* variables active that second: duplicate
/// `(timestamp, variable)` pairs collapse first, so a store that violates
/// its uniqueness contract cannot inflate activity. Output is ascending by
/// second; empty input yields an empty sequence.
pub fn aggregate_seconds(samples: &[NumericSample]) -> Vec<SecondBucket> {
    let mut keys: Vec<(i64, u32)> = samples
        .iter()
        .map(|s| (s.ts_ms.div_euclid(1000), s.variable_id))
        .collect();
    keys.sort_unstable();
    keys.dedup();

    let mut buckets: Vec<SecondBucket> = Vec::new();
    for (second, _var) in keys {
        match buckets.last_mut() {
            Some(bucket) if bucket.second == second => bucket.distinct_vars += 1,
            _ => buckets.push(SecondBucket {
                second,
                distinct_vars: 1,
            }),
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(ts_ms: i64, variable_id: u32) -> NumericSample {
        NumericSample {
            ts_ms,
            variable_id,
            value: 0.0,
        }
    }

    #[test]
    fn test_empty_input_yields_empty_buckets() {
        assert!(aggregate_seconds(&[]).is_empty());
    }

    #[test]
    fn test_counts_distinct_variables_per_second() {
        let buckets = aggregate_seconds(&[
            sample(1000, 1),
            sample(1200, 2),
            sample(1999, 3),
            sample(2000, 1),
        ]);
        assert_eq!(
            buckets,
            vec![
                SecondBucket {
                    second: 1,
                    distinct_vars: 3
                },
                SecondBucket {
                    second: 2,
                    distinct_vars: 1
                },
            ]
        );
    }

    #[test]
    fn test_duplicate_timestamp_variable_pairs_collapse() {
        // Same variable updating twice within one second counts once;
        // exact (ts, var) duplicates from a misbehaving store also collapse.
        let buckets = aggregate_seconds(&[
            sample(5000, 7),
            sample(5000, 7),
            sample(5500, 7),
            sample(5600, 9),
        ]);
        assert_eq!(
            buckets,
            vec![SecondBucket {
                second: 5,
                distinct_vars: 2
            }]
        );
    }

    #[test]
    fn test_unordered_input_yields_ascending_buckets() {
        let buckets = aggregate_seconds(&[sample(9000, 1), sample(3000, 1)]);
        assert_eq!(buckets[0].second, 3);
        assert_eq!(buckets[1].second, 9);
    }
}
