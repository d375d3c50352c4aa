use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod check;
mod config;
mod parse;
mod summary;

pub use config::Config;

/// Default location for processed results
pub const DEFAULT_OUTPUT_DIR: &str = "./data/auto-processed/cone";

/// conedata - Cone Calorimeter Export Processor
#[derive(Parser)]
#[command(name = "conedata")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every raw table under a directory
    Parse {
        /// Directory searched for `*scaled.csv` raw tables
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Directory receiving `<year>/<name>.json` and `<year>/<name>.csv`
        #[arg(value_name = "OUTPUT", default_value = DEFAULT_OUTPUT_DIR)]
        output: PathBuf,

        /// TOML configuration file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Override the input glob pattern
        #[arg(short, long)]
        pattern: Option<String>,
    },

    /// Process a single raw table and report the result without writing it
    Check {
        /// Raw table (`<base>-scaled.csv`)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// TOML configuration file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Parse {
            input,
            output,
            config,
            pattern,
        } => parse::run(input, output, config, pattern),
        Commands::Check { file, config } => check::run(file, config),
    }
}
