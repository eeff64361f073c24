//! Fixed report schema exposed to external collaborators.
//!
//! Consumers get one versioned shape per report, no field-name sniffing.
//! Every row type serializes to a stable JSON layout; numeric totals survive
//! a serialize/parse round trip to at least two decimal places.

use crate::types::MachineState;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Schema version stamped into the CLI envelope.
pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// The resolved query window, echoed back on every report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub from: String,
    pub until: String,
}

// ============================================================================
// State times
// ============================================================================

/// Hours spent in one operating state over the queried window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateTimeRow {
    pub state: MachineState,
    pub total_hours: f64,
}

/// Per-state hour totals. Rows always cover all four states in a fixed
/// order, with zeroed hours when a state did not occur.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateTimesReport {
    pub period: ReportPeriod,
    pub states: Vec<StateTimeRow>,
}

// ============================================================================
// Alarms
// ============================================================================

/// Aggregated incident statistics for one (code, text) pair.
///
/// `occurrence_count` counts merged incidents, not raw log lines: the
/// difference between "the alarm fired 3 times" and "the PLC repeated the
/// line 4,000 times while it was active".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmRow {
    pub alarm_code: String,
    pub alarm_text: String,
    pub occurrence_count: u64,
    pub last_seen: DateTime<Utc>,
}

/// Alarm incidents over the queried window, ordered by incident count
/// descending (ties broken by code, then text).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmReport {
    pub period: ReportPeriod,
    pub alarms: Vec<AlarmRow>,
    /// Lines that failed occurrence decoding and were skipped.
    pub skipped_lines: u64,
}

// ============================================================================
// Energy
// ============================================================================

/// Integrated energy for one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyRow {
    pub day: NaiveDate,
    pub total_energy_kwh: f64,
}

/// Daily energy totals over the queried window, ordered by day ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyReport {
    pub period: ReportPeriod,
    pub days: Vec<EnergyRow>,
}
