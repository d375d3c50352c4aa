//! # conedata - Cone Calorimeter Data Processing
//!
//! `conedata` turns raw cone calorimeter instrument exports into normalized
//! time series and metadata records for downstream fire-science analysis.
//!
//! ## Pipeline
//!
//! 1. **Metadata resolution** ([`metadata`]): per-test constants (calibration
//!    factor, heat of combustion, specimen area, test date) and the event log
//!    are resolved from the metadata workbook written next to each run.
//!
//! 2. **Synchronization** ([`processing`]): the raw one-second channels are
//!    trimmed to the test start, shifted for analyzer transport delays, and
//!    checked for time gaps and negative duct pressure.
//!
//! 3. **Calculation** ([`formulas`]): heat release rate by oxygen consumption
//!    calorimetry, exhaust mass flow rate, and smoke extinction coefficient
//!    for every aligned sample.
//!
//! 4. **Output** ([`output`]): a JSON metadata record and a CSV result table per
//!    accepted test, grouped by test year.
//!
//! Any inconsistency in a test (time gap, negative pressure, missing area or
//! date, too few samples) rejects that whole test; a batch run keeps going and
//! reports the counts in [`pipeline::RunStatistics`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use conedata::metadata::{MetadataSource, TestMetadata};
//! use conedata::pipeline::Pipeline;
//! use conedata::table::RawTable;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = MetadataSource::new()
//!     .with_parameter("Cf", "0.042")
//!     .with_parameter("As", "88.4")
//!     .with_info("Date:", "08/05/2019")
//!     .with_info("Time:", "10:31:00")
//!     .with_event("30", "Start of test");
//! let metadata = TestMetadata::resolve(&source)?;
//!
//! let table = RawTable::from_path("8-5-2019-PVC-1-scaled.csv")?;
//! let outcome = Pipeline::default().process("8-5-2019-PVC-1", metadata, &table);
//!
//! let test = outcome.result?;
//! println!("{} samples, peak HRR {:?} kW/m2", test.data.len(), test.data.peak_hrr());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::missing_docs_in_private_items)]

pub mod formulas;
pub mod metadata;
pub mod output;
pub mod pipeline;
pub mod processing;
pub mod table;

/// Crate version, embedded in the CLI banner
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for common imports
pub mod prelude {
    pub use crate::formulas::{calculate_hrr, calculate_k, calculate_mfr};
    pub use crate::metadata::{MetadataError, MetadataSource, SheetDirectory, TestMetadata};
    pub use crate::output::ResultWriter;
    pub use crate::pipeline::{BatchProcessor, Pipeline, RunStatistics, TestError};
    pub use crate::processing::{ProcessedData, ProcessedSample, ProcessingConfig, Synchronizer};
    pub use crate::table::{Channel, RawTable};
}
