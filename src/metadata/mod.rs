//! # Test Metadata
//!
//! Resolves the per-test constants of a cone calorimeter run from the
//! metadata workbook the instrument software writes next to each raw table.
//!
//! The workbook has three sheets:
//!
//! 1. **Parameters**: calibration and specimen constants (`Cf`, `Ef`, `As`, ...)
//! 2. **Info**: operator-entered test information (date, operator, sample ID)
//! 3. **User Events** (optional): time-stamped operator events, used to find
//!    the test start, ignition and flame-out times
//!
//! [`MetadataSource`] is the in-memory form of the workbook and
//! [`TestMetadata::resolve`] turns it into the immutable [`TestMetadata`]
//! record. Only the specimen area is mandatory; everything else degrades to
//! `None` or a documented default.
//!
//! ## Unit heuristics
//!
//! Two instrument export conventions are corrected for:
//!
//! - `Ef` is normally in kJ/kg, but 13.1 and 12.54 are written in MJ/kg
//! - `As` is normally in cm², but values at or below 0.025 are in m²

mod error;
mod record;
mod resolve;
pub mod sheets;
mod source;


pub use error::MetadataError;
pub use record::{Event, TestMetadata};
pub use resolve::{
    get_bool, get_number, parse_test_date, resolve_e_mj_per_kg, resolve_surface_area_cm2,
    EventTimes, AREA_M2_THRESHOLD, DEFAULT_E_MJ_PER_KG, E_MJ_PER_KG_EXPORTS,
};
pub use sheets::SheetDirectory;
pub use source::{EventRow, MetadataReader, MetadataSource};
