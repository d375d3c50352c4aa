use crate::table::TableError;

/// Errors that invalidate a whole test during alignment and calculation
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    /// The raw table lacks a channel the calculations need
    #[error("Table error: {0}")]
    TableError(#[from] TableError),

    /// Samples are not one second apart
    #[error("Time increments are not 1 second: gap of {gap} s after t = {time} s")]
    TimeIrregularity {
        /// Time of the sample before the gap (s)
        time: f64,
        /// Size of the gap (s)
        gap: f64,
    },

    /// Duct differential pressure below zero after alignment
    #[error("Negative delta_P found: {value} Pa at t = {time} s")]
    NegativePressure {
        /// Re-based time of the offending sample (s)
        time: f64,
        /// Pressure reading (Pa)
        value: f64,
    },
}
