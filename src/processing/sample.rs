use std::fmt;

use serde::{Deserialize, Serialize};

/// One aligned one-second sample with its derived quantities.
///
/// Field names serialize to the CSV headers of the result table. Values that
/// could not be measured or computed are `None` (an empty CSV cell).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedSample {
    /// Time since test start (s)
    #[serde(rename = "Time (s)")]
    pub time_s: f64,

    /// O2 volume fraction, delay-corrected
    #[serde(rename = "O2 (Vol fr)")]
    pub o2: Option<f64>,

    /// CO2 volume fraction, delay-corrected
    #[serde(rename = "CO2 (Vol fr)")]
    pub co2: Option<f64>,

    /// CO volume fraction, delay-corrected
    #[serde(rename = "CO (Vol fr)")]
    pub co: Option<f64>,

    /// Heat release rate per unit area (kW/m²)
    #[serde(rename = "HRR (kW/m2)")]
    pub hrr_kw_per_m2: Option<f64>,

    /// Exhaust mass flow rate (kg/s)
    #[serde(rename = "MFR (kg/s)")]
    pub mfr_kg_per_s: Option<f64>,

    /// Smoke extinction coefficient (1/m)
    #[serde(rename = "k_smoke (1/m)")]
    pub k_smoke_per_m: Option<f64>,

    /// Specimen mass (g)
    #[serde(rename = "Mass (g)")]
    pub mass_g: Option<f64>,
}

/// Pre-test mean analyzer readings (volume fractions)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Baselines {
    /// O2 before the test
    pub o2: f64,
    /// CO2 before the test
    pub co2: f64,
    /// Not used by the heat release calculation
    pub co: f64,
}

/// Whether the smoke photometer channels could be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpticalStatus {
    /// k_smoke computed for every sample
    Valid,
    /// `Io (%)` or `I (%)` not present in the table
    Missing,
    /// A negative intensity somewhere in the aligned table
    Negative,
}

impl OpticalStatus {
    /// True when k_smoke was nulled for the whole test
    pub fn is_degraded(&self) -> bool {
        !matches!(self, OpticalStatus::Valid)
    }
}

impl fmt::Display for OpticalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpticalStatus::Valid => write!(f, "valid"),
            OpticalStatus::Missing => write!(f, "I_o or I not found in data"),
            OpticalStatus::Negative => write!(f, "I_o or I is negative"),
        }
    }
}

/// Output of the synchronizer for one test
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedData {
    /// Aligned samples, ascending in time
    pub samples: Vec<ProcessedSample>,
    /// Baselines the heat release was computed against
    pub baselines: Baselines,
    /// State of the smoke channels
    pub optical: OpticalStatus,
    /// Samples trimmed from the front for the test start
    pub start_offset: usize,
    /// O2, CO2 and CO delay shifts applied (samples)
    pub delays: [usize; 3],
}

impl ProcessedData {
    /// Number of aligned samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if alignment left no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Largest heat release rate in the test (kW/m²)
    pub fn peak_hrr(&self) -> Option<f64> {
        self.samples
            .iter()
            .filter_map(|s| s.hrr_kw_per_m2)
            .fold(None, |peak, v| Some(peak.map_or(v, |p: f64| p.max(v))))
    }
}
