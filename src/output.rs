//! Result files
//!
//! Each accepted test produces `<root>/<year>/<name>.json` (the resolved
//! metadata) and `<root>/<year>/<name>.csv` (the aligned samples). A record
//! without a date cannot be written.
//!
//! Files are written to a temporary file in the target directory and moved
//! into place once complete, so an interrupted run never leaves a truncated
//! result behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::metadata::{MetadataError, TestMetadata};
use crate::processing::ProcessedSample;

/// Column headers of the result table, in order
pub const RESULT_COLUMNS: [&str; 8] = [
    "Time (s)",
    "O2 (Vol fr)",
    "CO2 (Vol fr)",
    "CO (Vol fr)",
    "HRR (kW/m2)",
    "MFR (kg/s)",
    "k_smoke (1/m)",
    "Mass (g)",
];

/// Errors that can occur while writing results
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// I/O error creating directories or files
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// The record carries no test date to group it by
    #[error("Test has no date, cannot choose a year directory")]
    MissingDate,

    /// Metadata serialization error
    #[error("Metadata error: {0}")]
    MetadataError(#[from] MetadataError),
}

/// Paths of the two files written for a test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// `<name>.json`
    pub metadata: PathBuf,
    /// `<name>.csv`
    pub data: PathBuf,
}

/// Write the result table as CSV
pub fn write_samples<W: Write>(writer: W, samples: &[ProcessedSample]) -> Result<(), OutputError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(RESULT_COLUMNS)?;
    for sample in samples {
        csv_writer.serialize(sample)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Read a result table back
pub fn read_samples<R: std::io::Read>(reader: R) -> Result<Vec<ProcessedSample>, OutputError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let samples = csv_reader.deserialize().collect::<Result<Vec<_>, _>>()?;
    Ok(samples)
}

/// Writes result files under a root directory, grouped by test year
#[derive(Debug, Clone)]
pub struct ResultWriter {
    root: PathBuf,
}

impl ResultWriter {
    /// Create a writer rooted at `root`. Nothing is created until the first write.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Output root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory the results of a test go to
    pub fn year_dir(&self, metadata: &TestMetadata) -> Result<PathBuf, OutputError> {
        let year = metadata.year().ok_or(OutputError::MissingDate)?;
        Ok(self.root.join(year.to_string()))
    }

    /// Write the metadata JSON and sample CSV of a test
    pub fn write(
        &self,
        name: &str,
        metadata: &TestMetadata,
        samples: &[ProcessedSample],
    ) -> Result<OutputPaths, OutputError> {
        let dir = self.year_dir(metadata)?;
        fs::create_dir_all(&dir)?;

        let paths = OutputPaths {
            metadata: dir.join(format!("{}.json", name)),
            data: dir.join(format!("{}.csv", name)),
        };

        let json = metadata.to_json()?;
        write_atomic(&dir, &paths.metadata, |file| {
            file.write_all(json.as_bytes())?;
            Ok(())
        })?;
        write_atomic(&dir, &paths.data, |file| write_samples(file, samples))?;

        Ok(paths)
    }
}

fn write_atomic<F>(dir: &Path, path: &Path, fill: F) -> Result<(), OutputError>
where
    F: FnOnce(&mut NamedTempFile) -> Result<(), OutputError>,
{
    let mut temp_file = NamedTempFile::new_in(dir)?;
    fill(&mut temp_file)?;
    temp_file.as_file().sync_all()?;
    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
