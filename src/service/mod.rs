//! Report service: the query facade external collaborators talk to.
//!
//! One method per report. Every call validates its range before touching the
//! store, runs a single bounded batch pass, and returns a fixed-schema
//! report. Store failures always surface as typed errors; an outage is
//! never dressed up as an empty report. The three pipelines share no mutable
//! state; `&self` methods may run concurrently against the same source.

mod range;

pub use range::QueryRange;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::reports::{alarms, energy, signal, states};
use crate::source::SignalSource;
use crate::types::{AlarmReport, EnergyReport, StateTimesReport};
use tracing::{debug, info};

/// The engine facade: a signal source plus the configuration driving the
/// three pipelines.
pub struct ReportService<S> {
    source: S,
    config: EngineConfig,
}

impl<S: SignalSource> ReportService<S> {
    pub fn new(source: S, config: EngineConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Hours spent in each operating state over the window.
    pub async fn state_times(&self, from: &str, until: &str) -> Result<StateTimesReport, EngineError> {
        let range = QueryRange::parse(from, until)?;
        let samples = self.source.numeric_samples(range.time_range()).await?;
        debug!(samples = samples.len(), "State report: samples fetched");

        let buckets = signal::aggregate_seconds(&samples);
        let totals = states::classify(&buckets, &self.config.activity);
        info!(
            buckets = buckets.len(),
            idle_gap_seconds = totals.idle_gap_seconds,
            warmup_seconds = totals.warmup_seconds,
            "State report computed"
        );

        Ok(StateTimesReport {
            period: range.period(),
            states: totals.into_rows(),
        })
    }

    /// Merged alarm incidents per (code, text) over the window.
    pub async fn machine_alarms(&self, from: &str, until: &str) -> Result<AlarmReport, EngineError> {
        let range = QueryRange::parse(from, until)?;
        let events = self
            .source
            .string_events(self.config.alarms.channel, range.time_range())
            .await?;
        debug!(lines = events.len(), "Alarm report: raw lines fetched");

        let extractor = alarms::AlarmExtractor::new(&self.config.alarms);
        let outcome = extractor.extract(&events);
        let incidents = alarms::group_incidents(outcome.occurrences);
        let rows = alarms::aggregate(&incidents);
        info!(
            incidents = incidents.len(),
            rows = rows.len(),
            skipped_lines = outcome.skipped_lines,
            "Alarm report computed"
        );

        Ok(AlarmReport {
            period: range.period(),
            alarms: rows,
            skipped_lines: outcome.skipped_lines,
        })
    }

    /// Daily energy totals over the window.
    pub async fn energy_consumption(
        &self,
        from: &str,
        until: &str,
    ) -> Result<EnergyReport, EngineError> {
        let range = QueryRange::parse(from, until)?;
        let samples = self
            .source
            .load_samples(&self.config.energy.load_variable, range.time_range())
            .await?;
        debug!(samples = samples.len(), "Energy report: load samples fetched");

        let days = energy::daily_energy(&samples, &self.config.energy);
        info!(days = days.len(), "Energy report computed");

        Ok(EnergyReport {
            period: range.period(),
            days,
        })
    }
}
