use log::{debug, warn};

use super::{Baselines, OpticalStatus, ProcessedData, ProcessedSample, ProcessingConfig, ProcessingError};
use crate::formulas::{calculate_hrr, calculate_k, calculate_mfr};
use crate::metadata::TestMetadata;
use crate::table::{Channel, RawTable};

/// Offset from °C to K
pub const CELSIUS_TO_KELVIN: f64 = 273.15;

/// Largest allowed step between consecutive samples (s)
pub const MAX_TIME_STEP_S: f64 = 1.0;

/// Convert a time in seconds to a whole number of one-second samples.
///
/// Negative and non-finite values are treated as zero.
fn to_samples(seconds: f64) -> usize {
    if seconds.is_finite() && seconds > 0.0 {
        seconds.round() as usize
    } else {
        0
    }
}

/// Mean of the present (non-NaN) values, NaN if there are none
fn nan_mean(values: &[f64]) -> f64 {
    let (sum, count) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

fn present(value: f64) -> Option<f64> {
    (!value.is_nan()).then_some(value)
}

/// Fail on the first step between consecutive samples larger than one second
pub fn check_time_increments(time: &[f64]) -> Result<(), ProcessingError> {
    match time.windows(2).find(|w| w[1] - w[0] > MAX_TIME_STEP_S) {
        Some(w) => Err(ProcessingError::TimeIrregularity {
            time: w[0],
            gap: w[1] - w[0],
        }),
        None => Ok(()),
    }
}

/// Channel columns of one test, all of equal length
struct Columns {
    time: Vec<f64>,
    o2: Vec<f64>,
    co2: Vec<f64>,
    co: Vec<f64>,
    temperature_k: Vec<f64>,
    pressure: Vec<f64>,
    mass: Vec<f64>,
    optical: Option<(Vec<f64>, Vec<f64>)>,
}

impl Columns {
    fn from_table(table: &RawTable) -> Result<Self, ProcessingError> {
        let optical = match (
            table.channel(Channel::LightReference),
            table.channel(Channel::LightTransmitted),
        ) {
            (Some(i_o), Some(i)) => Some((i_o.to_vec(), i.to_vec())),
            _ => None,
        };

        Ok(Self {
            time: table.require(Channel::Time)?.to_vec(),
            o2: table.require(Channel::O2)?.to_vec(),
            co2: table.require(Channel::Co2)?.to_vec(),
            co: table.require(Channel::Co)?.to_vec(),
            temperature_k: table
                .require(Channel::ExhaustTemperature)?
                .iter()
                .map(|t| t + CELSIUS_TO_KELVIN)
                .collect(),
            pressure: table.require(Channel::DuctPressure)?.to_vec(),
            mass: table.require(Channel::SampleMass)?.to_vec(),
            optical,
        })
    }

    fn len(&self) -> usize {
        self.time.len()
    }

    fn all_mut(&mut self) -> Vec<&mut Vec<f64>> {
        let mut columns = vec![
            &mut self.time,
            &mut self.o2,
            &mut self.co2,
            &mut self.co,
            &mut self.temperature_k,
            &mut self.pressure,
            &mut self.mass,
        ];
        if let Some((i_o, i)) = self.optical.as_mut() {
            columns.push(i_o);
            columns.push(i);
        }
        columns
    }

    /// Drop the first `offset` samples of every channel
    fn advance(&mut self, offset: usize) {
        for column in self.all_mut() {
            let n = offset.min(column.len());
            column.drain(..n);
        }
    }

    /// Shift each gas channel earlier by its own delay and cut every channel
    /// to the rows all three still cover
    fn align_gases(&mut self, delays: [usize; 3]) {
        let max_delay = delays.iter().copied().max().unwrap_or(0);
        let rows = self.len().saturating_sub(max_delay);

        for (column, delay) in [&mut self.o2, &mut self.co2, &mut self.co]
            .into_iter()
            .zip(delays)
        {
            let n = delay.min(column.len());
            column.drain(..n);
        }
        for column in self.all_mut() {
            column.truncate(rows);
        }
    }
}

/// Aligns the channels of one test and derives HRR, MFR and k_smoke
#[derive(Debug, Clone)]
pub struct Synchronizer<'a> {
    metadata: &'a TestMetadata,
    config: &'a ProcessingConfig,
}

impl<'a> Synchronizer<'a> {
    /// Create a synchronizer for one test
    pub fn new(metadata: &'a TestMetadata, config: &'a ProcessingConfig) -> Self {
        Self { metadata, config }
    }

    /// Samples to trim from the front, from the start event
    pub fn start_offset(&self) -> usize {
        self.metadata.test_start_time_s.map_or(0, to_samples)
    }

    /// O2, CO2 and CO delays in samples
    pub fn delays(&self) -> [usize; 3] {
        let m = self.metadata;
        let c = self.config;
        [
            to_samples(m.o2_delay_time_s.unwrap_or(c.o2_delay_s)),
            to_samples(m.co2_delay_time_s.unwrap_or(c.co2_delay_s)),
            to_samples(m.co_delay_time_s.unwrap_or(c.co_delay_s)),
        ]
    }

    /// Photometer path length in meters
    pub fn path_length_m(&self) -> f64 {
        self.metadata.path_length_m.unwrap_or(self.config.path_length_m)
    }

    /// Run the full alignment and calculation on a raw table.
    ///
    /// The table is not modified; any fatal condition rejects the whole test.
    pub fn process(&self, table: &RawTable) -> Result<ProcessedData, ProcessingError> {
        let mut columns = Columns::from_table(table)?;
        check_time_increments(&columns.time)?;

        let start = self.start_offset();
        let delays = self.delays();

        let window = if start > 0 {
            start
        } else {
            self.config.baseline_fallback_samples
        };
        let window = window.min(columns.len());
        let baselines = Baselines {
            o2: nan_mean(&columns.o2[..window]),
            co2: nan_mean(&columns.co2[..window]),
            co: nan_mean(&columns.co[..window]),
        };
        debug!(
            "Baselines over {} samples: O2 {:.6}, CO2 {:.6}, CO {:.6}",
            window, baselines.o2, baselines.co2, baselines.co
        );

        columns.advance(start);
        if let Some(&origin) = columns.time.first() {
            let origin = if origin.is_nan() { start as f64 } else { origin };
            columns.time.iter_mut().for_each(|t| *t -= origin);
        }

        columns.align_gases(delays);

        if let Some(i) = columns.pressure.iter().position(|&p| p < 0.0) {
            return Err(ProcessingError::NegativePressure {
                time: columns.time[i],
                value: columns.pressure[i],
            });
        }

        let hrr = self.heat_release(&columns, &baselines);
        let mfr: Vec<Option<f64>> = columns
            .pressure
            .iter()
            .zip(&columns.temperature_k)
            .map(|(&dp, &te)| calculate_mfr(self.metadata.c_factor, dp, te))
            .collect();
        let (optical, k_smoke) = self.smoke_extinction(&columns);

        let samples = (0..columns.len())
            .map(|i| ProcessedSample {
                time_s: columns.time[i],
                o2: present(columns.o2[i]),
                co2: present(columns.co2[i]),
                co: present(columns.co[i]),
                hrr_kw_per_m2: hrr[i],
                mfr_kg_per_s: mfr[i],
                k_smoke_per_m: k_smoke.as_ref().and_then(|k| k[i]),
                mass_g: present(columns.mass[i]),
            })
            .collect();

        Ok(ProcessedData {
            samples,
            baselines,
            optical,
            start_offset: start,
            delays,
        })
    }

    fn heat_release(&self, columns: &Columns, baselines: &Baselines) -> Vec<Option<f64>> {
        let area_m2 = self.metadata.surface_area_m2();
        (0..columns.len())
            .map(|i| {
                calculate_hrr(
                    columns.o2[i],
                    columns.co2[i],
                    columns.co[i],
                    baselines.o2,
                    baselines.co2,
                    columns.pressure[i],
                    columns.temperature_k[i],
                    self.metadata.c_factor,
                    Some(self.metadata.e_mj_per_kg),
                    area_m2,
                )
            })
            .collect()
    }

    fn smoke_extinction(&self, columns: &Columns) -> (OpticalStatus, Option<Vec<Option<f64>>>) {
        let Some((i_o, i)) = columns.optical.as_ref() else {
            warn!("I_o or I not found in data, skipping k_smoke calculation");
            return (OpticalStatus::Missing, None);
        };
        if i_o.iter().chain(i).any(|&v| v < 0.0) {
            warn!("I_o or I is negative, skipping k_smoke calculation");
            return (OpticalStatus::Negative, None);
        }

        let path_length = self.path_length_m();
        let k = i_o
            .iter()
            .zip(i)
            .map(|(&i_o, &i)| calculate_k(i_o, i, path_length))
            .collect();
        (OpticalStatus::Valid, Some(k))
    }
}
