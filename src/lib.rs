//! CNC-Insight: CNC Machine Operational Intelligence
//!
//! Batch segmentation and classification engine over raw machine signal
//! logs. Three read-only report pipelines derive operating-state hours,
//! merged alarm incidents, and daily energy consumption from the plant
//! historian's per-variable update stream.
//!
//! ## Architecture
//!
//! - **Signal Aggregator**: per-second distinct-variable activity counts
//! - **State Classifier**: idle-gap detection + day-partitioned smoothing
//! - **Alarm Incident Extractor**: noise filter, regex decode, islands-and-gaps
//! - **Energy Segmenter**: on/off runs, midnight splitting, kWh integration
//! - **Report Service**: the query facade composing all three

pub mod config;
pub mod error;
pub mod reports;
pub mod service;
pub mod source;
pub mod types;

// Re-export the facade and its inputs
pub use config::EngineConfig;
pub use error::EngineError;
pub use service::{QueryRange, ReportService};
pub use source::{JsonlSource, MemorySource, SignalSource};

// Re-export commonly used types
pub use types::{
    AlarmIncident, AlarmOccurrence, AlarmReport, AlarmRow, EnergyReport, EnergyRow, MachineState,
    ReportPeriod, SecondBucket, StateTimeRow, StateTimesReport,
};
