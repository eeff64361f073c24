//! Alarm Incident Extractor.
//!
//! Raw alarm-channel lines arrive as PLC log dumps; each line can encode
//! several `["CODE","TEXT",n,n,n]` tuples. The pipeline:
//!
//! 1. Discard lines matching the benign-code filter. Filtered lines also
//!    don't supersede real occurrences.
//! 2. Assign validity windows: an occurrence is "current" from its line's
//!    timestamp until the next surviving line on the channel. The final
//!    line has no successor and is dropped.
//! 3. Decode occurrences with the precompiled tuple pattern. A line that
//!    yields no tuple is a parse failure: skipped and counted, never fatal.
//! 4. Islands and gaps per (code, text): an occurrence continues the
//!    current incident iff the previous occurrence's validity window
//!    reaches its start.
//! 5. Aggregate per (code, text): incidents counted (not raw lines),
//!    `last_seen` = latest incident start.

use crate::config::AlarmConfig;
use crate::reports::islands::group_adjacent;
use crate::source::StringEvent;
use crate::types::{AlarmIncident, AlarmOccurrence, AlarmRow};
use chrono::DateTime;
use regex::{Regex, RegexSet};
use std::collections::BTreeMap;
use tracing::debug;

/// One occurrence tuple inside a raw line: `["CODE","TEXT",n,n,n]`.
const OCCURRENCE_PATTERN: &str = r#"\["([^"]+)","([^"]+)",([0-9]+),([0-9]+),([0-9]+)\]"#;

/// Result of decoding one channel's raw lines.
#[derive(Debug, Default)]
pub struct ExtractionOutcome {
    pub occurrences: Vec<AlarmOccurrence>,
    /// Non-benign lines that matched no occurrence tuple.
    pub skipped_lines: u64,
}

/// Precompiled decoder for one alarm channel.
pub struct AlarmExtractor {
    occurrence: Regex,
    benign: RegexSet,
}

impl AlarmExtractor {
    #[allow(clippy::expect_used)]
    pub fn new(config: &AlarmConfig) -> Self {
        Self {
            occurrence: Regex::new(OCCURRENCE_PATTERN)
                .expect("occurrence pattern is a valid regex"),
            benign: RegexSet::new(config.benign_codes.iter().map(|c| regex::escape(c)))
                .expect("escaped benign codes are valid regexes"),
        }
    }

    /// Decode raw channel lines into validity-windowed occurrences.
    ///
    /// `events` must be ascending by timestamp (the store contract).
    pub fn extract(&self, events: &[StringEvent]) -> ExtractionOutcome {
        let surviving: Vec<&StringEvent> = events
            .iter()
            .filter(|e| !self.benign.is_match(&e.value))
            .collect();

        let mut outcome = ExtractionOutcome::default();

        // The last line has no successor, so its validity is unknown; drop it.
        for pair in surviving.windows(2) {
            let (line, next) = (pair[0], pair[1]);
            let start = line.ts_ms.div_euclid(1000);
            let valid_until = next.ts_ms.div_euclid(1000);

            let mut matched = false;
            for caps in self.occurrence.captures_iter(&line.value) {
                matched = true;
                outcome.occurrences.push(AlarmOccurrence {
                    code: caps[1].to_string(),
                    text: caps[2].to_string(),
                    start,
                    valid_until,
                });
            }
            if !matched {
                outcome.skipped_lines += 1;
                debug!(ts = line.ts_ms, "Alarm line matched no occurrence tuple, skipped");
            }
        }

        outcome
    }
}

/// Merge occurrences into incidents, per (code, text).
///
/// Occurrences whose validity windows touch or overlap the next occurrence's
/// start belong to one incident; a true temporal gap starts a new one.
pub fn group_incidents(occurrences: Vec<AlarmOccurrence>) -> Vec<AlarmIncident> {
    let mut by_key: BTreeMap<(String, String), Vec<AlarmOccurrence>> = BTreeMap::new();
    for occ in occurrences {
        by_key
            .entry((occ.code.clone(), occ.text.clone()))
            .or_default()
            .push(occ);
    }

    let mut incidents = Vec::new();
    for ((code, text), mut occs) in by_key {
        occs.sort_by_key(|o| o.start);
        for island in group_adjacent(occs, |prev, cur| prev.valid_until >= cur.start) {
            // Occurrences are sorted, so the island's first start is its minimum.
            let Some(first) = island.first() else { continue };
            let Some(start_time) = DateTime::from_timestamp(first.start, 0) else {
                continue;
            };
            incidents.push(AlarmIncident {
                code: code.clone(),
                text: text.clone(),
                start_time,
                occurrences: island.len(),
            });
        }
    }
    incidents
}

/// Aggregate incidents into report rows: per (code, text), the number of
/// distinct incidents and the latest incident start. Ordered by incident
/// count descending, ties by code then text.
pub fn aggregate(incidents: &[AlarmIncident]) -> Vec<AlarmRow> {
    let mut by_key: BTreeMap<(&str, &str), AlarmRow> = BTreeMap::new();
    for incident in incidents {
        by_key
            .entry((&incident.code, &incident.text))
            .and_modify(|row| {
                row.occurrence_count += 1;
                row.last_seen = row.last_seen.max(incident.start_time);
            })
            .or_insert_with(|| AlarmRow {
                alarm_code: incident.code.clone(),
                alarm_text: incident.text.clone(),
                occurrence_count: 1,
                last_seen: incident.start_time,
            });
    }

    let mut rows: Vec<AlarmRow> = by_key.into_values().collect();
    rows.sort_by(|a, b| {
        b.occurrence_count
            .cmp(&a.occurrence_count)
            .then_with(|| a.alarm_code.cmp(&b.alarm_code))
            .then_with(|| a.alarm_text.cmp(&b.alarm_text))
    });
    rows
}
