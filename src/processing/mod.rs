//! # Time-Series Synchronization and Calculation
//!
//! Turns the raw one-second instrument table of a test into the aligned,
//! derived result table.
//!
//! ## Steps
//!
//! 1. Exhaust temperature from °C to K
//! 2. Reject tests whose time column jumps by more than one second
//! 3. Baselines: mean O2/CO2/CO over the samples before the start event, or
//!    over the first 30 samples when the test has no start event
//! 4. Trim everything before the start event and re-base time to zero
//! 5. Shift each gas analyzer earlier by its transport delay and drop the
//!    rows at the end that no longer have all three gases
//! 6. Reject tests with negative duct pressure anywhere
//! 7. HRR and MFR for every sample; k_smoke for every sample when both
//!    photometer channels exist and are never negative, otherwise null for
//!    the whole test
//!
//! Every rejection applies to the whole test; rows are never recovered
//! individually.

mod config;
mod error;
mod sample;
mod synchronizer;

#[cfg(test)]
mod tests;

pub use config::ProcessingConfig;
pub use error::ProcessingError;
pub use sample::{Baselines, OpticalStatus, ProcessedData, ProcessedSample};
pub use synchronizer::{check_time_increments, Synchronizer, CELSIUS_TO_KELVIN, MAX_TIME_STEP_S};
