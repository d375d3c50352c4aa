use crate::metadata::MetadataError;
use crate::output::OutputError;
use crate::processing::ProcessingError;
use crate::table::TableError;

use super::FailureKind;

/// Errors that abort the processing of a single test.
///
/// None of these stop a batch run; the batch records the failure and moves
/// on to the next test.
#[derive(Debug, thiserror::Error)]
pub enum TestError {
    /// Metadata workbook missing or unusable
    #[error("Metadata error: {0}")]
    MetadataError(#[from] MetadataError),

    /// Raw table could not be read
    #[error("Table error: {0}")]
    TableError(#[from] TableError),

    /// Alignment or validity check failed
    #[error("Processing error: {0}")]
    ProcessingError(#[from] ProcessingError),

    /// Too few samples left after alignment
    #[error("Only {count} samples after alignment, at least {required} required")]
    InsufficientSamples {
        /// Aligned sample count
        count: usize,
        /// Minimum accepted sample count
        required: usize,
    },

    /// Results could not be written
    #[error("Output error: {0}")]
    OutputError(#[from] OutputError),
}

impl TestError {
    /// Failure category used in run statistics
    pub fn kind(&self) -> FailureKind {
        match self {
            TestError::MetadataError(MetadataError::MissingMetadataFile(_)) => {
                FailureKind::MissingMetadataFile
            }
            TestError::MetadataError(MetadataError::MissingRequiredField(_)) => {
                FailureKind::MissingRequiredField
            }
            TestError::MetadataError(MetadataError::InvalidDate { .. }) => FailureKind::InvalidDate,
            TestError::MetadataError(_) => FailureKind::UnreadableInput,
            TestError::TableError(TableError::MissingChannel(_))
            | TestError::ProcessingError(ProcessingError::TableError(TableError::MissingChannel(_))) => {
                FailureKind::MissingChannel
            }
            TestError::TableError(_) | TestError::ProcessingError(ProcessingError::TableError(_)) => {
                FailureKind::UnreadableInput
            }
            TestError::ProcessingError(ProcessingError::TimeIrregularity { .. }) => {
                FailureKind::TimeIrregularity
            }
            TestError::ProcessingError(ProcessingError::NegativePressure { .. }) => {
                FailureKind::NegativePressure
            }
            TestError::InsufficientSamples { .. } => FailureKind::InsufficientSamples,
            TestError::OutputError(_) => FailureKind::Output,
        }
    }
}
