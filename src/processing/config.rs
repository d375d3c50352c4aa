use serde::Deserialize;

use crate::formulas::DEFAULT_PATH_LENGTH_M;

/// Tuning for the synchronizer and the per-test acceptance check.
///
/// Delays and path length here are fallbacks: values carried by the test
/// metadata take precedence.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// O2 analyzer transport delay (s)
    pub o2_delay_s: f64,

    /// CO2 analyzer transport delay (s)
    pub co2_delay_s: f64,

    /// CO analyzer transport delay (s)
    pub co_delay_s: f64,

    /// Smoke photometer path length (m)
    pub path_length_m: f64,

    /// Tests with fewer aligned samples are rejected
    pub min_samples: usize,

    /// Baseline window when the test has no start event (samples)
    pub baseline_fallback_samples: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            o2_delay_s: 0.0,
            co2_delay_s: 0.0,
            co_delay_s: 0.0,
            path_length_m: DEFAULT_PATH_LENGTH_M,
            min_samples: 20,
            baseline_fallback_samples: 30,
        }
    }
}
