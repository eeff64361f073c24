//! Core domain types for the report engine.
//!
//! Split per pipeline: machine state classification, alarm incidents,
//! energy segmentation, and the fixed report schema the facade emits.

mod alarm;
mod energy;
mod report;
mod signal;
mod state;

pub use alarm::{AlarmIncident, AlarmOccurrence};
pub use energy::{DaySegment, LoadSample, OnInterval, Run};
pub use report::{
    AlarmReport, AlarmRow, EnergyReport, EnergyRow, ReportPeriod, StateTimeRow, StateTimesReport,
    REPORT_SCHEMA_VERSION,
};
pub use signal::SecondBucket;
pub use state::MachineState;
