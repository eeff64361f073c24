//! The three report pipelines and their shared primitives.
//!
//! Each pipeline is one bounded, strictly-ordered batch pass:
//!
//! - [`signal`] + [`states`]: per-second aggregation → idle-gap detection →
//!   day-partitioned smoothing → activity classification
//! - [`alarms`]: benign filter → occurrence decode → islands-and-gaps
//!   incident grouping → aggregation
//! - [`energy`]: clamp → intervals → on/off runs → midnight splitting →
//!   per-day integration
//!
//! [`islands`] holds the generic adjacency-grouping scan the alarm and
//! energy pipelines share.

pub mod alarms;
pub mod energy;
pub mod islands;
pub mod signal;
pub mod states;
