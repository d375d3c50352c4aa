//! TOML configuration file support.
//!
//! Analyzer delays and acceptance thresholds can be set per lab instead of
//! per run:
//!
//! ```toml
//! # conedata.toml
//! [processing]
//! o2_delay_s = 12
//! co2_delay_s = 10
//! co_delay_s = 10
//! path_length_m = 0.11
//! min_samples = 20
//!
//! [input]
//! pattern = "**/*scaled.csv"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use conedata::processing::ProcessingConfig;

/// Root configuration structure for conedata.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Synchronizer settings; missing keys keep their defaults.
    #[serde(default)]
    pub processing: ProcessingConfig,

    /// Input discovery settings.
    #[serde(default)]
    pub input: InputConfig,
}

/// Configuration for locating raw tables.
#[derive(Debug, Default, Deserialize)]
pub struct InputConfig {
    /// Glob pattern relative to the input directory.
    pub pattern: Option<String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load `path` if given, otherwise use the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}
