//! Energy Segmenter: percentage-load signal → on/off runs → per-day kWh.
//!
//! Load samples are a percentage of the drive's nameplate power, so energy
//! is an estimate: `(pct / 100) × rated_kw × hours`. Each sample holds until
//! the next one, forming half-open intervals; the final sample has no
//! successor and is discarded (its duration is unknown). Intervals crossing
//! UTC midnight are split at every boundary so each calendar day is charged
//! exactly for the time that fell inside it; the split total always equals
//! the unsplit total.

use crate::config::EnergyConfig;
use crate::reports::islands::group_adjacent;
use crate::source::NumericSample;
use crate::types::{DaySegment, EnergyRow, LoadSample, OnInterval, Run};
use chrono::DateTime;
use std::collections::BTreeMap;

const MS_PER_DAY: i64 = 86_400_000;
const MS_PER_HOUR: f64 = 3_600_000.0;

/// Discard NaN readings and clamp the rest to [0, 100].
pub fn clamp_samples(samples: &[NumericSample]) -> Vec<LoadSample> {
    samples
        .iter()
        .filter(|s| !s.value.is_nan())
        .map(|s| LoadSample {
            ts_ms: s.ts_ms,
            pct: s.value.clamp(0.0, 100.0),
        })
        .collect()
}

/// Turn consecutive samples into half-open intervals carrying the load
/// observed at the interval start. Pairs with a non-advancing timestamp are
/// dropped, as is the open-ended final sample.
pub fn intervals(samples: &[LoadSample], on_threshold: f64) -> Vec<OnInterval> {
    samples
        .windows(2)
        .filter(|pair| pair[1].ts_ms > pair[0].ts_ms)
        .map(|pair| OnInterval {
            start_ms: pair[0].ts_ms,
            end_ms: pair[1].ts_ms,
            pct: pair[0].pct,
            is_on: pair[0].pct > on_threshold,
        })
        .collect()
}

/// Group consecutive "on" intervals into runs. An off interval between two
/// on intervals ends the run; off intervals themselves belong to no run.
pub fn group_runs(intervals: Vec<OnInterval>) -> Vec<Run> {
    group_adjacent(intervals, |prev, cur| prev.is_on && cur.is_on)
        .into_iter()
        .filter(|island| island.first().is_some_and(|iv| iv.is_on))
        .enumerate()
        .map(|(idx, island)| Run {
            id: idx + 1,
            intervals: island,
        })
        .collect()
}

/// Split one run into per-day segments, clipping each interval at every UTC
/// midnight it crosses. Zero-length clips (an interval ending exactly at
/// midnight) are skipped.
pub fn day_segments(run: &Run, rated_power_kw: f64) -> Vec<DaySegment> {
    let mut segments = Vec::new();
    for iv in &run.intervals {
        let first_day = iv.start_ms.div_euclid(MS_PER_DAY);
        let last_day = iv.end_ms.div_euclid(MS_PER_DAY);
        for day_index in first_day..=last_day {
            let day_start_ms = day_index * MS_PER_DAY;
            let seg_start = iv.start_ms.max(day_start_ms);
            let seg_end = iv.end_ms.min(day_start_ms + MS_PER_DAY);
            if seg_end <= seg_start {
                continue;
            }
            let Some(day) =
                DateTime::from_timestamp(day_index * 86_400, 0).map(|d| d.date_naive())
            else {
                continue;
            };
            let hours = (seg_end - seg_start) as f64 / MS_PER_HOUR;
            segments.push(DaySegment {
                day,
                run_id: run.id,
                hours,
                energy_kwh: (iv.pct / 100.0) * rated_power_kw * hours,
            });
        }
    }
    segments
}

/// Full pipeline: raw load samples to daily energy rows, ascending by day.
pub fn daily_energy(samples: &[NumericSample], config: &EnergyConfig) -> Vec<EnergyRow> {
    let clamped = clamp_samples(samples);
    let runs = group_runs(intervals(&clamped, config.on_threshold_pct));

    let mut per_day: BTreeMap<chrono::NaiveDate, f64> = BTreeMap::new();
    for run in &runs {
        for segment in day_segments(run, config.rated_power_kw) {
            *per_day.entry(segment.day).or_insert(0.0) += segment.energy_kwh;
        }
    }

    per_day
        .into_iter()
        .map(|(day, total_energy_kwh)| EnergyRow {
            day,
            total_energy_kwh,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR_MS: i64 = 3_600_000;

    fn sample(ts_ms: i64, value: f64) -> NumericSample {
        NumericSample {
            ts_ms,
            variable_id: 630,
            value,
        }
    }

    fn config() -> EnergyConfig {
        EnergyConfig::default()
    }

    #[test]
    fn test_clamp_and_nan_discard() {
        let clamped = clamp_samples(&[
            sample(0, -5.0),
            sample(1, 150.0),
            sample(2, f64::NAN),
            sample(3, 42.0),
        ]);
        assert_eq!(clamped.len(), 3);
        assert!(clamped[0].pct.abs() < f64::EPSILON);
        assert!((clamped[1].pct - 100.0).abs() < f64::EPSILON);
        assert!((clamped[2].pct - 42.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_open_ended_final_sample_is_discarded() {
        let samples = [
            LoadSample { ts_ms: 0, pct: 50.0 },
            LoadSample {
                ts_ms: HOUR_MS,
                pct: 80.0,
            },
        ];
        let ivs = intervals(&samples, 0.0);
        assert_eq!(ivs.len(), 1);
        assert!((ivs[0].pct - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_non_advancing_timestamps_produce_no_interval() {
        let samples = [
            LoadSample { ts_ms: 0, pct: 50.0 },
            LoadSample { ts_ms: 0, pct: 60.0 },
            LoadSample {
                ts_ms: HOUR_MS,
                pct: 70.0,
            },
        ];
        let ivs = intervals(&samples, 0.0);
        assert_eq!(ivs.len(), 1);
        assert_eq!(ivs[0].start_ms, 0);
        assert_eq!(ivs[0].end_ms, HOUR_MS);
    }

    #[test]
    fn test_zero_load_is_off_under_default_threshold() {
        let samples = [
            LoadSample { ts_ms: 0, pct: 0.0 },
            LoadSample {
                ts_ms: HOUR_MS,
                pct: 0.0,
            },
        ];
        let ivs = intervals(&samples, 0.0);
        assert!(!ivs[0].is_on);
    }

    #[test]
    fn test_on_threshold_is_strict() {
        let samples = [
            LoadSample { ts_ms: 0, pct: 10.0 },
            LoadSample {
                ts_ms: HOUR_MS,
                pct: 0.0,
            },
        ];
        assert!(!intervals(&samples, 10.0)[0].is_on);
        assert!(intervals(&samples, 9.9)[0].is_on);
    }

    #[test]
    fn test_off_interval_splits_runs() {
        let ivs = vec![
            OnInterval {
                start_ms: 0,
                end_ms: 10,
                pct: 50.0,
                is_on: true,
            },
            OnInterval {
                start_ms: 10,
                end_ms: 20,
                pct: 0.0,
                is_on: false,
            },
            OnInterval {
                start_ms: 20,
                end_ms: 30,
                pct: 60.0,
                is_on: true,
            },
        ];
        let runs = group_runs(ivs);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].id, 1);
        assert_eq!(runs[1].id, 2);
        assert_eq!(runs[1].start_ms(), 20);
    }

    #[test]
    fn test_midnight_split_energy() {
        // Constant 50% load from day-1 23:00 to day-2 01:00 at 15 kW:
        // two 1-hour segments of 7.5 kWh on consecutive days.
        let start = MS_PER_DAY - HOUR_MS; // 23:00 of day 0 (epoch day)
        let rows = daily_energy(
            &[
                sample(start, 50.0),
                sample(start + 2 * HOUR_MS, 0.0), // terminator at 01:00
            ],
            &config(),
        );

        assert_eq!(rows.len(), 2);
        assert!((rows[0].total_energy_kwh - 7.5).abs() < 1e-9);
        assert!((rows[1].total_energy_kwh - 7.5).abs() < 1e-9);
        assert_eq!(rows[0].day.succ_opt(), Some(rows[1].day));

        // Split total equals the unsplit integral.
        let total: f64 = rows.iter().map(|r| r.total_energy_kwh).sum();
        assert!((total - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_interval_ending_exactly_at_midnight_charges_one_day() {
        let start = MS_PER_DAY - HOUR_MS;
        let rows = daily_energy(
            &[sample(start, 100.0), sample(MS_PER_DAY, 0.0)],
            &config(),
        );
        assert_eq!(rows.len(), 1);
        assert!((rows[0].total_energy_kwh - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_multi_day_interval_splits_every_boundary() {
        // 48h continuous at 100%: spans three calendar days (12h + 24h + 12h).
        let start = MS_PER_DAY / 2;
        let rows = daily_energy(
            &[sample(start, 100.0), sample(start + 2 * MS_PER_DAY, 0.0)],
            &config(),
        );
        assert_eq!(rows.len(), 3);
        assert!((rows[0].total_energy_kwh - 15.0 * 12.0).abs() < 1e-9);
        assert!((rows[1].total_energy_kwh - 15.0 * 24.0).abs() < 1e-9);
        assert!((rows[2].total_energy_kwh - 15.0 * 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_off_time_contributes_nothing() {
        let rows = daily_energy(
            &[
                sample(0, 0.0),
                sample(HOUR_MS, 40.0),
                sample(2 * HOUR_MS, 0.0),
                sample(3 * HOUR_MS, 0.0),
            ],
            &config(),
        );
        assert_eq!(rows.len(), 1);
        // Only the 40% hour counts: 0.4 * 15 = 6 kWh.
        assert!((rows[0].total_energy_kwh - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input_yields_empty_report() {
        assert!(daily_energy(&[], &config()).is_empty());
        assert!(daily_energy(&[sample(0, 50.0)], &config()).is_empty());
    }
}
