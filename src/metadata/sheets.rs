//! Metadata workbook exported as one CSV file per sheet.
//!
//! For a raw table `<dir>/<base>-scaled.csv` the workbook lives in
//! `<dir>/<base>-Output/`:
//!
//! - `Parameters.csv`: header row of keys, first data row holds the values
//! - `Info.csv`: no header, key in the first column and value in the second
//! - `User Events.csv` (optional): `Time (s)` and `Event Description` columns

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::debug;

use super::{MetadataError, MetadataReader, MetadataSource};

/// File name of the "Parameters" sheet export
pub const PARAMETERS_SHEET: &str = "Parameters.csv";
/// File name of the "Info" sheet export
pub const INFO_SHEET: &str = "Info.csv";
/// File name of the optional "User Events" sheet export
pub const EVENTS_SHEET: &str = "User Events.csv";

const EVENT_TIME_COLUMN: &str = "Time (s)";
const EVENT_DESCRIPTION_COLUMN: &str = "Event Description";

/// Directory of per-sheet CSV exports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetDirectory {
    root: PathBuf,
}

impl SheetDirectory {
    /// Use the given directory as the workbook
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Workbook directory belonging to a `-scaled.csv` raw table
    pub fn for_scaled_csv(path: &Path) -> Self {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let base = stem.strip_suffix("-scaled").unwrap_or(&stem);
        Self::new(path.with_file_name(format!("{}-Output", base)))
    }

    /// Workbook directory
    pub fn path(&self) -> &Path {
        &self.root
    }

    fn open_sheet(&self, name: &str) -> Result<BufReader<File>, MetadataError> {
        let path = self.root.join(name);
        if !path.is_file() {
            return Err(MetadataError::MissingMetadataFile(path));
        }
        Ok(BufReader::new(File::open(path)?))
    }

    fn optional_sheet(&self, name: &str) -> Result<Option<BufReader<File>>, MetadataError> {
        let path = self.root.join(name);
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(BufReader::new(File::open(path)?)))
    }
}

impl MetadataReader for SheetDirectory {
    fn read_source(&self) -> Result<MetadataSource, MetadataError> {
        if !self.root.is_dir() {
            return Err(MetadataError::MissingMetadataFile(self.root.clone()));
        }

        let mut source = MetadataSource::new();
        read_parameters(self.open_sheet(PARAMETERS_SHEET)?, &mut source)?;
        read_info(self.open_sheet(INFO_SHEET)?, &mut source)?;

        match self.optional_sheet(EVENTS_SHEET)? {
            Some(reader) => read_events(reader, &mut source)?,
            None => debug!("No '{}' in {}", EVENTS_SHEET, self.root.display()),
        }

        Ok(source)
    }
}

/// Parse a "Parameters" sheet: keys in the header row, values in the first row
pub fn read_parameters<R: BufRead>(reader: R, source: &mut MetadataSource) -> Result<(), MetadataError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let values = csv_reader.records().next().transpose()?;

    for (i, key) in headers.iter().enumerate() {
        let value = values.as_ref().and_then(|row| row.get(i)).map(str::trim);
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            source.insert_parameter(key.trim(), value);
        }
    }
    Ok(())
}

/// Parse an "Info" sheet: one key/value pair per row
pub fn read_info<R: BufRead>(reader: R, source: &mut MetadataSource) -> Result<(), MetadataError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(reader);

    for record in csv_reader.records() {
        let record = record?;
        let (Some(key), Some(value)) = (record.get(0), record.get(1)) else {
            continue;
        };
        let value = value.trim();
        if !key.trim().is_empty() && !value.is_empty() {
            source.insert_info(key, value);
        }
    }
    Ok(())
}

/// Parse a "User Events" sheet
pub fn read_events<R: BufRead>(reader: R, source: &mut MetadataSource) -> Result<(), MetadataError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or(MetadataError::MissingColumn {
                sheet: "User Events",
                column: name,
            })
    };
    let time_idx = column(EVENT_TIME_COLUMN)?;
    let description_idx = column(EVENT_DESCRIPTION_COLUMN)?;

    source.ensure_events_sheet();
    for record in csv_reader.records() {
        let record = record?;
        let time = record.get(time_idx).unwrap_or("").trim();
        let description = record.get(description_idx).unwrap_or("").trim();
        if time.is_empty() && description.is_empty() {
            continue;
        }
        source.push_event(time, description);
    }
    Ok(())
}
