use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use conedata::output::ResultWriter;
use conedata::pipeline::{BatchProcessor, Pipeline};

use super::summary;
use super::Config;

/// Process every raw table under `input` and write results under `output`
pub fn run(
    input: PathBuf,
    output: PathBuf,
    config: Option<PathBuf>,
    pattern: Option<String>,
) -> Result<()> {
    if !input.is_dir() {
        anyhow::bail!("Input directory does not exist: {}", input.display());
    }

    let config = Config::load(config.as_deref())?;
    let pattern = pattern.or(config.input.pattern);

    info!("conedata {}", conedata::VERSION);
    info!("Input:  {}", input.display());
    info!("Output: {}", output.display());
    info!("Processing: {:?}", config.processing);

    let mut processor = BatchProcessor::new(
        Pipeline::new(config.processing),
        ResultWriter::new(&output),
    );
    if let Some(pattern) = pattern {
        info!("Pattern: {}", pattern);
        processor = processor.with_pattern(pattern);
    }

    let stats = processor
        .run(&input)
        .with_context(|| format!("Failed to process {}", input.display()))?;

    println!("{}", summary::format_colored(&stats));

    Ok(())
}
