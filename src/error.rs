//! Engine error surface.
//!
//! Two failure kinds cross the facade boundary: bad caller input and an
//! unreachable backing store. A store outage must never be flattened into
//! an empty report: callers distinguish "no data" from "no answer".

use crate::source::SourceError;
use thiserror::Error;

/// Errors returned by the report facade.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed date string or an inverted range (`from > until`).
    /// Rejected before any store access.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The backing time-series store could not answer the query.
    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(#[from] SourceError),
}

impl EngineError {
    /// Process exit code for the CLI collaborator.
    pub fn exit_code(&self) -> i32 {
        match self {
            EngineError::InvalidInput(_) => 2,
            EngineError::DataSourceUnavailable(_) => 1,
        }
    }
}
