use std::path::PathBuf;

/// Errors that can occur while resolving test metadata
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// I/O error reading a metadata sheet
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV parsing error in a metadata sheet
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// The companion metadata export for a raw table does not exist
    #[error("Missing metadata file: {}", .0.display())]
    MissingMetadataFile(PathBuf),

    /// A constant the calculations cannot do without is not resolvable
    #[error("Missing required metadata field: {0}")]
    MissingRequiredField(&'static str),

    /// The Info sheet date and time do not form a valid timestamp
    #[error("Invalid test date: '{date}' '{time}'")]
    InvalidDate {
        /// `Date` cell
        date: String,
        /// `Time` cell
        time: String,
    },

    /// A sheet is present but lacks a column it must have
    #[error("Sheet '{sheet}' is missing column '{column}'")]
    MissingColumn {
        /// Sheet name
        sheet: &'static str,
        /// Column header
        column: &'static str,
    },

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}
