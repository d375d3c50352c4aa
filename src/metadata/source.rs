use std::collections::HashMap;

use super::MetadataError;

/// One row of the "User Events" sheet, as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    /// Contents of the `Time (s)` cell
    pub time: String,
    /// Contents of the `Event Description` cell
    pub description: String,
}

/// Parsed metadata workbook for one test.
///
/// Holds the "Parameters" and "Info" sheets as flat key/value maps and the
/// optional "User Events" sheet as ordered rows. Only the first value seen
/// for a key is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataSource {
    parameters: HashMap<String, String>,
    info: HashMap<String, String>,
    events: Option<Vec<EventRow>>,
}

impl MetadataSource {
    /// Create an empty source with no events sheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a "Parameters" value
    pub fn insert_parameter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.parameters.entry(key.into()).or_insert_with(|| value.into());
    }

    /// Record an "Info" value. Colons are stripped from the key
    /// (`"Date:"` is stored as `"Date"`).
    pub fn insert_info(&mut self, key: &str, value: impl Into<String>) {
        self.info
            .entry(key.replace(':', "").trim().to_string())
            .or_insert_with(|| value.into());
    }

    /// Append a "User Events" row, creating the sheet if needed
    pub fn push_event(&mut self, time: impl Into<String>, description: impl Into<String>) {
        self.events.get_or_insert_with(Vec::new).push(EventRow {
            time: time.into(),
            description: description.into(),
        });
    }

    /// Mark the events sheet as present, even if it has no rows
    pub fn ensure_events_sheet(&mut self) {
        self.events.get_or_insert_with(Vec::new);
    }

    /// Builder form of [`insert_parameter`](Self::insert_parameter)
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_parameter(key, value);
        self
    }

    /// Builder form of [`insert_info`](Self::insert_info)
    pub fn with_info(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert_info(key, value);
        self
    }

    /// Builder form of [`push_event`](Self::push_event)
    pub fn with_event(mut self, time: impl Into<String>, description: impl Into<String>) -> Self {
        self.push_event(time, description);
        self
    }

    /// Raw "Parameters" value
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    /// Raw "Info" value
    pub fn info(&self, key: &str) -> Option<&str> {
        self.info.get(key).map(String::as_str)
    }

    /// "User Events" rows, or `None` if the sheet is absent
    pub fn events(&self) -> Option<&[EventRow]> {
        self.events.as_deref()
    }
}

/// Anything that can produce the metadata workbook of a test
pub trait MetadataReader {
    /// Read and flatten the workbook
    fn read_source(&self) -> Result<MetadataSource, MetadataError>;
}

impl MetadataReader for MetadataSource {
    fn read_source(&self) -> Result<MetadataSource, MetadataError> {
        Ok(self.clone())
    }
}
