//! In-memory signal source for tests and demos.

use super::{NumericSample, SignalSource, SourceError, StringEvent, TimeRange};
use async_trait::async_trait;
use std::collections::HashMap;

/// Pre-loaded signal fixture. Rows are sorted at construction so queries
/// return ascending timestamps regardless of insertion order.
#[derive(Debug, Default)]
pub struct MemorySource {
    numeric: Vec<NumericSample>,
    named: HashMap<String, Vec<NumericSample>>,
    channels: HashMap<u32, Vec<StringEvent>>,
    fail: bool,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A source whose every query fails, for outage-propagation tests.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_numeric(mut self, mut samples: Vec<NumericSample>) -> Self {
        samples.sort_by_key(|s| (s.ts_ms, s.variable_id));
        self.numeric = samples;
        self
    }

    pub fn with_variable(mut self, name: &str, mut samples: Vec<NumericSample>) -> Self {
        samples.sort_by_key(|s| s.ts_ms);
        self.named.insert(name.to_string(), samples);
        self
    }

    pub fn with_channel(mut self, channel: u32, mut events: Vec<StringEvent>) -> Self {
        events.sort_by_key(|e| e.ts_ms);
        self.channels.insert(channel, events);
        self
    }

    fn check(&self) -> Result<(), SourceError> {
        if self.fail {
            return Err(SourceError::ConnectionFailed(
                "simulated store outage".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl SignalSource for MemorySource {
    async fn numeric_samples(&self, range: TimeRange) -> Result<Vec<NumericSample>, SourceError> {
        self.check()?;
        Ok(self
            .numeric
            .iter()
            .filter(|s| range.contains(s.ts_ms))
            .cloned()
            .collect())
    }

    async fn load_samples(
        &self,
        variable: &str,
        range: TimeRange,
    ) -> Result<Vec<NumericSample>, SourceError> {
        self.check()?;
        Ok(self
            .named
            .get(variable)
            .map(|rows| {
                rows.iter()
                    .filter(|s| range.contains(s.ts_ms))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn string_events(
        &self,
        channel: u32,
        range: TimeRange,
    ) -> Result<Vec<StringEvent>, SourceError> {
        self.check()?;
        Ok(self
            .channels
            .get(&channel)
            .map(|rows| {
                rows.iter()
                    .filter(|e| range.contains(e.ts_ms))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(ts_ms: i64, variable_id: u32, value: f64) -> NumericSample {
        NumericSample {
            ts_ms,
            variable_id,
            value,
        }
    }

    #[tokio::test]
    async fn test_range_filter_is_inclusive() {
        let source = MemorySource::new().with_numeric(vec![
            sample(999, 1, 0.0),
            sample(1000, 1, 0.0),
            sample(2000, 1, 0.0),
            sample(2001, 1, 0.0),
        ]);

        let rows = source
            .numeric_samples(TimeRange {
                start_ms: 1000,
                end_ms: 2000,
            })
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].ts_ms, 1000);
        assert_eq!(rows[1].ts_ms, 2000);
    }

    #[tokio::test]
    async fn test_unsorted_input_queries_ascending() {
        let source = MemorySource::new()
            .with_numeric(vec![sample(3000, 1, 0.0), sample(1000, 2, 0.0)]);
        let rows = source
            .numeric_samples(TimeRange {
                start_ms: 0,
                end_ms: 10_000,
            })
            .await
            .unwrap();
        assert_eq!(rows[0].ts_ms, 1000);
    }

    #[tokio::test]
    async fn test_failing_source_errors() {
        let source = MemorySource::failing();
        let err = source
            .numeric_samples(TimeRange {
                start_ms: 0,
                end_ms: 1,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::ConnectionFailed(_)));
    }
}
