use std::fs;
use std::path::{Path, PathBuf};
#[cfg(feature = "parallel")]
use std::sync::atomic::{AtomicUsize, Ordering};

use log::{info, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::{log_outcome, Pipeline, RunStatistics, TestError, TestInput};
use crate::output::ResultWriter;

/// Raw tables picked up under the input directory
pub const DEFAULT_INPUT_PATTERN: &str = "**/*scaled.csv";

/// Files between progress reports
pub const PROGRESS_INTERVAL: usize = 20;

/// True when a progress report is due after `done` files
pub(crate) fn progress_due(done: usize) -> bool {
    done > 0 && done % PROGRESS_INTERVAL == 0
}

/// Errors that stop a batch before any test is processed
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// The input pattern is not a valid glob
    #[error("Invalid input pattern: {0}")]
    PatternError(#[from] glob::PatternError),

    /// I/O error preparing the output directory
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Processes every raw table under a directory and writes the accepted ones
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    pipeline: Pipeline,
    writer: ResultWriter,
    pattern: String,
}

impl BatchProcessor {
    /// Create a batch processor using the default input pattern
    pub fn new(pipeline: Pipeline, writer: ResultWriter) -> Self {
        Self {
            pipeline,
            writer,
            pattern: DEFAULT_INPUT_PATTERN.to_string(),
        }
    }

    /// Use a different glob pattern, relative to the input directory
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    /// Raw tables under `input_dir`, sorted by path
    pub fn discover(&self, input_dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
        let base = glob::Pattern::escape(&input_dir.to_string_lossy());
        let pattern = format!("{}/{}", base.trim_end_matches('/'), self.pattern);

        let mut paths: Vec<PathBuf> = glob::glob(&pattern)?
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!("Skipping unreadable path: {}", e);
                    None
                }
            })
            .filter(|path| path.is_file())
            .collect();
        paths.sort();
        Ok(paths)
    }

    /// Process and write one test
    pub fn run_one(&self, path: &Path) -> RunStatistics {
        let input = TestInput::from_scaled_csv(path);
        let outcome = self.pipeline.process_test(&input);
        log_outcome(&input, &outcome);

        let mut stats = outcome.stats;
        if let Ok(test) = &outcome.result {
            if let Err(e) = self
                .writer
                .write(&test.name, &test.metadata, &test.data.samples)
            {
                let error = TestError::from(e);
                warn!("Error writing {}: {}", test.name, error);
                stats.record_write_failure(&error);
            }
        }
        stats
    }

    /// Process every test under `input_dir`.
    ///
    /// Individual test failures are counted, never returned.
    pub fn run(&self, input_dir: &Path) -> Result<RunStatistics, BatchError> {
        fs::create_dir_all(self.writer.root())?;
        let paths = self.discover(input_dir)?;
        info!("Found {} raw tables under {}", paths.len(), input_dir.display());

        #[cfg(feature = "parallel")]
        let stats = {
            // workers finish out of order, so only the count is reported
            let done = AtomicUsize::new(0);
            paths
                .par_iter()
                .map(|path| {
                    let stats = self.run_one(path);
                    let count = done.fetch_add(1, Ordering::Relaxed) + 1;
                    if progress_due(count) {
                        info!("Processed {} of {} files", count, paths.len());
                    }
                    stats
                })
                .reduce(RunStatistics::default, |mut total, stats| {
                    total.merge(&stats);
                    total
                })
        };

        #[cfg(not(feature = "parallel"))]
        let stats = {
            let mut total = RunStatistics::default();
            for path in &paths {
                total.merge(&self.run_one(path));
                if progress_due(total.files_parsed) {
                    info!("{}", total);
                }
            }
            total
        };

        Ok(stats)
    }
}
