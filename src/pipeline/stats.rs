use std::collections::BTreeMap;
use std::fmt;

use super::TestError;

/// Category of a rejected test
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FailureKind {
    /// No metadata workbook next to the raw table
    MissingMetadataFile,
    /// Specimen area, test date or test time not present
    MissingRequiredField,
    /// Test date and time present but not parseable
    InvalidDate,
    /// A required instrument channel is absent
    MissingChannel,
    /// Time column jumps by more than one second
    TimeIrregularity,
    /// Negative duct pressure after alignment
    NegativePressure,
    /// Too few aligned samples
    InsufficientSamples,
    /// I/O or CSV failure reading the inputs
    UnreadableInput,
    /// Results could not be written
    Output,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::MissingMetadataFile => "missing metadata file",
            FailureKind::MissingRequiredField => "missing required field",
            FailureKind::InvalidDate => "invalid test date",
            FailureKind::MissingChannel => "missing channel",
            FailureKind::TimeIrregularity => "time irregularity",
            FailureKind::NegativePressure => "negative delta_P",
            FailureKind::InsufficientSamples => "insufficient samples",
            FailureKind::UnreadableInput => "unreadable input",
            FailureKind::Output => "output error",
        };
        f.write_str(label)
    }
}

/// Counters for a batch run.
///
/// Each per-test call returns its own statistics, which the batch merges, so
/// no counter is shared between tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatistics {
    /// Tests attempted
    pub files_parsed: usize,
    /// Tests accepted and written
    pub files_succeeded: usize,
    /// Tests rejected for negative duct pressure
    pub negative_pressure_tests: usize,
    /// Tests whose k_smoke was nulled for missing or negative photometer data
    pub bad_optical_tests: usize,
    /// Rejected tests by category
    pub failures: BTreeMap<FailureKind, usize>,
}

impl RunStatistics {
    /// Statistics for one attempted test
    pub fn attempted() -> Self {
        Self {
            files_parsed: 1,
            ..Self::default()
        }
    }

    /// Count an accepted test
    pub fn record_success(&mut self) {
        self.files_succeeded += 1;
    }

    /// Count a rejected test
    pub fn record_failure(&mut self, error: &TestError) {
        let kind = error.kind();
        if kind == FailureKind::NegativePressure {
            self.negative_pressure_tests += 1;
        }
        *self.failures.entry(kind).or_insert(0) += 1;
    }

    /// Turn an accepted test into a rejected one, for results that could not be written
    pub fn record_write_failure(&mut self, error: &TestError) {
        self.files_succeeded = self.files_succeeded.saturating_sub(1);
        self.record_failure(error);
    }

    /// Count a test whose smoke extinction could not be computed
    pub fn record_bad_optical(&mut self) {
        self.bad_optical_tests += 1;
    }

    /// Add another set of counters to this one
    pub fn merge(&mut self, other: &RunStatistics) {
        self.files_parsed += other.files_parsed;
        self.files_succeeded += other.files_succeeded;
        self.negative_pressure_tests += other.negative_pressure_tests;
        self.bad_optical_tests += other.bad_optical_tests;
        for (kind, count) in &other.failures {
            *self.failures.entry(*kind).or_insert(0) += count;
        }
    }

    /// Tests rejected for any reason
    pub fn files_failed(&self) -> usize {
        self.files_parsed - self.files_succeeded
    }

    /// Accepted tests as a percentage of attempted tests
    pub fn success_rate(&self) -> f64 {
        if self.files_parsed > 0 {
            (self.files_succeeded as f64 / self.files_parsed as f64) * 100.0
        } else {
            0.0
        }
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Files parsed successfully: {}/{} ({:.1}%)",
            self.files_succeeded,
            self.files_parsed,
            self.success_rate()
        )
    }
}
