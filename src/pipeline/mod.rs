//! # Per-Test Pipeline
//!
//! Wires the metadata resolver, the raw table loader and the synchronizer
//! together for one test, and drives whole directories of tests in
//! [`BatchProcessor`].
//!
//! Every per-test call returns its own [`RunStatistics`]. Batches merge them,
//! which keeps tests independent of each other and lets the `parallel`
//! feature process them on a thread pool.

mod batch;
mod error;
mod stats;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::metadata::{SheetDirectory, TestMetadata};
use crate::processing::{ProcessedData, ProcessingConfig, Synchronizer};
use crate::table::RawTable;

pub use batch::{BatchError, BatchProcessor, DEFAULT_INPUT_PATTERN, PROGRESS_INTERVAL};
pub use error::TestError;
pub use stats::{FailureKind, RunStatistics};

/// Location of one test's inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestInput {
    /// Raw instrument table (`*-scaled.csv`)
    pub raw_path: PathBuf,
    /// Base name shared by the result files
    pub name: String,
    /// Companion metadata workbook
    pub workbook: SheetDirectory,
}

impl TestInput {
    /// Inputs for a `<base>-scaled.csv` raw table
    pub fn from_scaled_csv<P: Into<PathBuf>>(path: P) -> Self {
        let raw_path = path.into();
        let stem = raw_path
            .file_stem()
            .map(|s| s.to_string_lossy().replace("-scaled", ""))
            .unwrap_or_default();
        let workbook = SheetDirectory::for_scaled_csv(&raw_path);
        Self {
            raw_path,
            name: stem,
            workbook,
        }
    }
}

/// An accepted test
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedTest {
    /// Base name for the result files
    pub name: String,
    /// Resolved metadata
    pub metadata: TestMetadata,
    /// Aligned samples and derived quantities
    pub data: ProcessedData,
}

/// Result of processing one test, with its contribution to the run counters
#[derive(Debug)]
pub struct TestOutcome {
    /// The accepted test, or why it was rejected
    pub result: Result<ProcessedTest, TestError>,
    /// Counters for this test alone
    pub stats: RunStatistics,
}

/// Processes single tests with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: ProcessingConfig,
}

impl Pipeline {
    /// Create a pipeline
    pub fn new(config: ProcessingConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    /// Align and calculate an already loaded test.
    ///
    /// Tests with fewer than `min_samples` aligned samples are rejected.
    pub fn process(
        &self,
        name: &str,
        metadata: TestMetadata,
        table: &RawTable,
    ) -> TestOutcome {
        let mut stats = RunStatistics::attempted();

        let result = match Synchronizer::new(&metadata, &self.config).process(table) {
            Ok(data) => {
                if data.optical.is_degraded() {
                    stats.record_bad_optical();
                }
                if data.len() < self.config.min_samples {
                    Err(TestError::InsufficientSamples {
                        count: data.len(),
                        required: self.config.min_samples,
                    })
                } else {
                    Ok(ProcessedTest {
                        name: name.to_string(),
                        metadata,
                        data,
                    })
                }
            }
            Err(e) => Err(e.into()),
        };

        match &result {
            Ok(_) => stats.record_success(),
            Err(e) => stats.record_failure(e),
        }
        TestOutcome { result, stats }
    }

    /// Resolve, load and process a test from disk.
    ///
    /// Metadata is resolved before the raw table is read, so a test without
    /// an area fails before any sample is touched.
    pub fn process_test(&self, input: &TestInput) -> TestOutcome {
        info!("Parsing {}", input.raw_path.display());

        let loaded = TestMetadata::from_reader(&input.workbook)
            .map_err(TestError::from)
            .and_then(|metadata| -> Result<_, TestError> {
                let table = RawTable::from_path(&input.raw_path)?;
                Ok((metadata, table))
            });

        match loaded {
            Ok((metadata, table)) => self.process(&input.name, metadata, &table),
            Err(e) => {
                let mut stats = RunStatistics::attempted();
                stats.record_failure(&e);
                TestOutcome { result: Err(e), stats }
            }
        }
    }

    /// Process a test given the path of its raw table
    pub fn process_path(&self, path: &Path) -> TestOutcome {
        self.process_test(&TestInput::from_scaled_csv(path))
    }
}

/// Log the outcome of a test the way a batch run reports it
pub(crate) fn log_outcome(input: &TestInput, outcome: &TestOutcome) {
    match &outcome.result {
        Ok(test) => info!(
            "Parsed {} successfully ({} samples)",
            test.name,
            test.data.len()
        ),
        Err(e) => warn!("Error parsing {}: {}", input.raw_path.display(), e),
    }
}
