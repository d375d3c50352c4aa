//! # conedata
//!
//! Command-line front end for processing cone calorimeter exports.
//!
//! ## Usage
//!
//! ```bash
//! # Process every test under a directory
//! conedata parse /data/cone ./data/auto-processed/cone
//!
//! # Use lab-specific analyzer delays
//! conedata parse /data/cone --config conedata.toml
//!
//! # Inspect one test without writing anything
//! conedata -v check /data/cone/8-5-2019-PVC-1-scaled.csv
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
