use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::MetadataError;

/// A user-logged event during the test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Elapsed test time (s)
    pub time: f64,
    /// Free text entered by the operator
    pub event: String,
}

/// Per-test constants resolved from the metadata workbook.
///
/// Built once per test and never modified afterwards. Serialized field names
/// match the JSON layout consumed by downstream analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestMetadata {
    /// Orifice plate calibration constant
    pub c_factor: Option<f64>,

    /// Heat released per unit mass of oxygen consumed (MJ/kg)
    #[serde(rename = "e_mj/kg")]
    pub e_mj_per_kg: f64,

    /// Cone heater irradiance (kW/m²)
    #[serde(rename = "heat_flux_kW/m2")]
    pub heat_flux_kw_per_m2: Option<f64>,

    /// Whether the retainer grid was used
    pub grid: Option<bool>,

    /// Heater to specimen separation (mm)
    pub separation_mm: Option<f64>,

    /// Specimen mass before the test (g)
    pub initial_mass_g: Option<f64>,

    /// Specimen orientation (free text)
    pub orientation: Option<String>,

    /// Exposed specimen area (cm²)
    pub surface_area_cm2: f64,

    /// Test date and time of day. Always set by [`TestMetadata::resolve`];
    /// only hand-built records lack it, and those cannot be written out.
    pub date: Option<NaiveDateTime>,

    /// Operator name
    pub operator: Option<String>,
    /// Lab director name
    pub director: Option<String>,
    /// Free-text test comments
    pub comments: Option<String>,
    /// Specimen identifier as entered by the operator
    pub specimen_number: Option<String>,

    /// User events, absent when the workbook has no events sheet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<Event>>,

    /// Time of the last ignition event (s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_ignition_s: Option<f64>,

    /// Time of the last flameout event (s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_flameout_s: Option<f64>,

    /// Elapsed time at which the test proper begins (s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_start_time_s: Option<f64>,

    /// O2 analyzer transport delay (s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub o2_delay_time_s: Option<f64>,

    /// CO2 analyzer transport delay (s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2_delay_time_s: Option<f64>,

    /// CO analyzer transport delay (s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co_delay_time_s: Option<f64>,

    /// Smoke photometer path length (m)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_length_m: Option<f64>,
}

impl TestMetadata {
    /// Metadata with only the required area set and every optional field empty
    pub fn with_area(surface_area_cm2: f64) -> Self {
        Self {
            c_factor: None,
            e_mj_per_kg: super::DEFAULT_E_MJ_PER_KG,
            heat_flux_kw_per_m2: None,
            grid: None,
            separation_mm: None,
            initial_mass_g: None,
            orientation: None,
            surface_area_cm2,
            date: None,
            operator: None,
            director: None,
            comments: None,
            specimen_number: None,
            events: None,
            time_to_ignition_s: None,
            time_to_flameout_s: None,
            test_start_time_s: None,
            o2_delay_time_s: None,
            co2_delay_time_s: None,
            co_delay_time_s: None,
            path_length_m: None,
        }
    }

    /// Specimen area in m²
    pub fn surface_area_m2(&self) -> f64 {
        self.surface_area_cm2 / 10_000.0
    }

    /// Calendar year of the test, if the date is known
    pub fn year(&self) -> Option<i32> {
        self.date.map(|d| d.year())
    }

    /// Events in sheet order (empty if the sheet was absent)
    pub fn events(&self) -> &[Event] {
        self.events.as_deref().unwrap_or(&[])
    }

    /// Serialize to indented JSON
    pub fn to_json(&self) -> Result<String, MetadataError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, MetadataError> {
        Ok(serde_json::from_str(json)?)
    }
}
