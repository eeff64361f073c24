//! Event-log replay source.
//!
//! Reads one JSON event per line from a log file exported from the plant
//! historian. Two event shapes are accepted:
//!
//! ```text
//! {"ts":1700000000123,"var":630,"name":"MANDRINO_CONSUMO_VISUALIZADO","value":42.5}
//! {"ts":1700000000123,"channel":447,"text":"[\"PLC00123\",\"EMERGENCY STOP\",1,0,1]"}
//! ```
//!
//! `name` on numeric events is optional; events without it simply never
//! match a named-variable query. Malformed lines are skipped with a
//! warning; a corrupt export row must not take the whole replay down.

use super::{NumericSample, SignalSource, SourceError, StringEvent, TimeRange};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::warn;

/// One line of the event log.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawEvent {
    Numeric {
        ts: i64,
        var: u32,
        #[serde(default)]
        name: Option<String>,
        value: f64,
    },
    Text {
        ts: i64,
        channel: u32,
        text: String,
    },
}

/// File-backed replay source. The whole log is loaded and indexed at open
/// time; queries are in-memory range scans.
#[derive(Debug, Default)]
pub struct JsonlSource {
    numeric: Vec<NumericSample>,
    named: HashMap<String, Vec<NumericSample>>,
    channels: HashMap<u32, Vec<StringEvent>>,
}

impl JsonlSource {
    /// Load an event log. Returns `SourceError::Io` if the file cannot be
    /// read; individual malformed lines are skipped, not fatal.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let file = std::fs::File::open(path.as_ref())?;
        let reader = BufReader::new(file);

        let mut source = Self::default();
        let mut skipped: u64 = 0;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<RawEvent>(trimmed) {
                Ok(RawEvent::Numeric {
                    ts,
                    var,
                    name,
                    value,
                }) => {
                    let sample = NumericSample {
                        ts_ms: ts,
                        variable_id: var,
                        value,
                    };
                    if let Some(name) = name {
                        source.named.entry(name).or_default().push(sample.clone());
                    }
                    source.numeric.push(sample);
                }
                Ok(RawEvent::Text { ts, channel, text }) => {
                    source.channels.entry(channel).or_default().push(StringEvent {
                        ts_ms: ts,
                        value: text,
                    });
                }
                Err(e) => {
                    skipped += 1;
                    warn!(line = line_no + 1, error = %e, "Skipping malformed event-log line");
                }
            }
        }

        if skipped > 0 {
            warn!(skipped, "Event log contained malformed lines");
        }

        source.numeric.sort_by_key(|s| (s.ts_ms, s.variable_id));
        for rows in source.named.values_mut() {
            rows.sort_by_key(|s| s.ts_ms);
        }
        for rows in source.channels.values_mut() {
            rows.sort_by_key(|e| e.ts_ms);
        }
        Ok(source)
    }
}

#[async_trait]
impl SignalSource for JsonlSource {
    async fn numeric_samples(&self, range: TimeRange) -> Result<Vec<NumericSample>, SourceError> {
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
    use std::io::Write;

    fn write_log(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file
    }

    #[tokio::test]
    async fn test_loads_numeric_and_text_events() {
        let file = write_log(&[
            r#"{"ts":2000,"var":5,"value":1.0}"#,
            r#"{"ts":1000,"var":630,"name":"LOAD_PCT","value":42.5}"#,
            r#"{"ts":1500,"channel":447,"text":"alarm line"}"#,
        ]);
        let source = JsonlSource::open(file.path()).unwrap();

        let range = TimeRange {
            start_ms: 0,
            end_ms: 10_000,
        };
        let numeric = source.numeric_samples(range).await.unwrap();
        assert_eq!(numeric.len(), 2);
        assert_eq!(numeric[0].ts_ms, 1000);

        let named = source.load_samples("LOAD_PCT", range).await.unwrap();
        assert_eq!(named.len(), 1);
        assert!((named[0].value - 42.5).abs() < f64::EPSILON);

        let events = source.string_events(447, range).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].value, "alarm line");
    }

    #[tokio::test]
    async fn test_malformed_lines_are_skipped() {
        let file = write_log(&[
            r#"{"ts":1000,"var":1,"value":1.0}"#,
            "not json at all",
            r#"{"ts":"wrong type"}"#,
            r#"{"ts":2000,"var":1,"value":2.0}"#,
        ]);
        let source = JsonlSource::open(file.path()).unwrap();
        let numeric = source
            .numeric_samples(TimeRange {
                start_ms: 0,
                end_ms: 10_000,
            })
            .await
            .unwrap();
        assert_eq!(numeric.len(), 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = JsonlSource::open("/definitely/not/here.jsonl").unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
    }
}
