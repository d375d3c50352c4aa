//! Raw instrument table loading
//!
//! The cone calorimeter software exports one CSV per test with a header row of
//! channel names (optionally prefixed by the channel index, e.g.
//! `"3: O2 (Vol fr)"`) and one row per one-second sample. This module turns
//! that export into a rectangular [`RawTable`] of named `f64` columns, with
//! missing or non-numeric cells stored as `NaN`.

use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

use log::debug;
use regex::Regex;

/// Errors that can occur while loading a raw instrument table
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// I/O error reading the export
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// A channel the calculations depend on is not in the table
    #[error("Missing required channel: {0}")]
    MissingChannel(&'static str),

    /// Columns passed to [`RawTable::from_columns`] differ in length
    #[error("Column '{name}' has {actual} rows, expected {expected}")]
    RaggedColumn {
        /// Column name
        name: String,
        /// Row count of the first column
        expected: usize,
        /// Row count of this column
        actual: usize,
    },
}

/// Instrument channels the pipeline knows about, keyed by their export header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Elapsed test time (s)
    Time,
    /// Oxygen volume fraction
    O2,
    /// Carbon dioxide volume fraction
    Co2,
    /// Carbon monoxide volume fraction
    Co,
    /// Exhaust gas temperature (°C in the export)
    ExhaustTemperature,
    /// Orifice plate differential pressure (Pa)
    DuctPressure,
    /// Reference light intensity of the smoke photometer (%)
    LightReference,
    /// Transmitted light intensity of the smoke photometer (%)
    LightTransmitted,
    /// Specimen mass (g)
    SampleMass,
}

impl Channel {
    /// Channels without which no test can be processed
    pub const REQUIRED: [Channel; 7] = [
        Channel::Time,
        Channel::O2,
        Channel::Co2,
        Channel::Co,
        Channel::ExhaustTemperature,
        Channel::DuctPressure,
        Channel::SampleMass,
    ];

    /// Column header used by the instrument export, after prefix cleanup
    pub fn header(&self) -> &'static str {
        match self {
            Channel::Time => "Test Time (s)",
            Channel::O2 => "O2 (Vol fr)",
            Channel::Co2 => "CO2 (Vol fr)",
            Channel::Co => "CO (Vol fr)",
            Channel::ExhaustTemperature => "Te (°C)",
            Channel::DuctPressure => "Pe (Pa)",
            Channel::LightReference => "Io (%)",
            Channel::LightTransmitted => "I (%)",
            Channel::SampleMass => "SampMass (g)",
        }
    }
}

/// Strip numeric channel-index labels (`"12: "`) from a column header.
pub fn clean_header(header: &str) -> String {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    let prefix = PREFIX.get_or_init(|| Regex::new(r"\d+:\s*").expect("valid channel prefix pattern"));
    prefix.replace_all(header, "").trim().to_string()
}

/// Decode export bytes, falling back to Windows-1252 for non-UTF-8 files.
fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            let (text, _, _) = encoding_rs::WINDOWS_1252.decode(err.as_bytes());
            text.into_owned()
        }
    }
}

fn parse_cell(cell: &str) -> f64 {
    cell.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Rectangular table of named numeric columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    headers: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl RawTable {
    /// Load an instrument export from disk
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let bytes = fs::read(path)?;
        Self::from_text(&decode_text(bytes))
    }

    /// Load an instrument export from a reader
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, TableError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_text(&decode_text(bytes))
    }

    fn from_text(text: &str) -> Result<Self, TableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = csv_reader.headers()?.iter().map(clean_header).collect();
        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];

        // A row with only text in it (an operator note) is still a sample row
        let mut dropped = 0;
        for record in csv_reader.records() {
            let record = record?;
            if record.iter().all(|cell| cell.trim().is_empty()) {
                dropped += 1;
                continue;
            }
            for (i, column) in columns.iter_mut().enumerate() {
                column.push(record.get(i).map(parse_cell).unwrap_or(f64::NAN));
            }
        }
        if dropped > 0 {
            debug!("Dropped {} empty rows", dropped);
        }

        Ok(Self { headers, columns })
    }

    /// Build a table from named columns of equal length.
    ///
    /// Names go through the same header cleanup as a CSV export, and rows
    /// whose cells are all missing are dropped.
    pub fn from_columns<I, S>(columns: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: AsRef<str>,
    {
        let mut table = Self::default();
        for (name, values) in columns {
            let name = clean_header(name.as_ref());
            if let Some(first) = table.columns.first() {
                if first.len() != values.len() {
                    return Err(TableError::RaggedColumn {
                        name,
                        expected: first.len(),
                        actual: values.len(),
                    });
                }
            }
            table.headers.push(name);
            table.columns.push(values);
        }
        table.drop_empty_rows();
        Ok(table)
    }

    /// Remove rows in which every cell is missing, returning how many were removed
    fn drop_empty_rows(&mut self) -> usize {
        let rows = self.len();
        let keep: Vec<bool> = (0..rows)
            .map(|row| self.columns.iter().any(|column| !column[row].is_nan()))
            .collect();

        for column in &mut self.columns {
            let mut flags = keep.iter();
            column.retain(|_| flags.next().copied().unwrap_or(false));
        }
        rows - self.len()
    }

    /// Number of samples (rows)
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// True if the table has no samples
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cleaned column headers in file order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Look up a column by its cleaned header
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.headers
            .iter()
            .position(|h| h == name)
            .map(|i| self.columns[i].as_slice())
    }

    /// Look up an instrument channel
    pub fn channel(&self, channel: Channel) -> Option<&[f64]> {
        self.column(channel.header())
    }

    /// Look up an instrument channel that must be present
    pub fn require(&self, channel: Channel) -> Result<&[f64], TableError> {
        self.channel(channel)
            .ok_or(TableError::MissingChannel(channel.header()))
    }
}
