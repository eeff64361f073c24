//! Operating-state label assigned to each classified second.

use serde::{Deserialize, Serialize};

/// Operating state of the machine over one second of signal.
///
/// `TrueIdle` is inferred from the total *absence* of samples: a powered
/// machine emits at least one variable update per second, so a gap in the
/// signal means the equipment was fully off. The three activity levels are
/// assigned from the smoothed distinct-variable count; a powered-but-quiet
/// machine lands in `LowActivity`, never `TrueIdle`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MachineState {
    #[serde(rename = "True Idle (Off)")]
    TrueIdle,
    #[serde(rename = "Low Activity")]
    LowActivity,
    #[serde(rename = "Intermediate Activity")]
    IntermediateActivity,
    #[serde(rename = "High Activity")]
    HighActivity,
}

impl MachineState {
    /// All states in report order.
    pub const ALL: [MachineState; 4] = [
        MachineState::TrueIdle,
        MachineState::LowActivity,
        MachineState::IntermediateActivity,
        MachineState::HighActivity,
    ];
}

impl std::fmt::Display for MachineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MachineState::TrueIdle => write!(f, "True Idle (Off)"),
            MachineState::LowActivity => write!(f, "Low Activity"),
            MachineState::IntermediateActivity => write!(f, "Intermediate Activity"),
            MachineState::HighActivity => write!(f, "High Activity"),
        }
    }
}
