use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use log::warn;

use super::{Event, MetadataError, MetadataReader, MetadataSource, TestMetadata};

/// Heat of combustion per unit O2 used when the workbook has no `Ef` (MJ/kg)
pub const DEFAULT_E_MJ_PER_KG: f64 = 13.1;

/// `Ef` values that the instrument software writes in MJ/kg rather than kJ/kg,
/// with the kJ/kg value they stand for
pub const E_MJ_PER_KG_EXPORTS: [(f64, f64); 2] = [(13.1, 13_100.0), (12.54, 12_540.0)];

/// Raw areas at or below this value are taken to be in m² instead of cm²
pub const AREA_M2_THRESHOLD: f64 = 0.025;

const CM2_PER_M2: f64 = 10_000.0;

// Month-first formats come before anything else so that 08/05/2019 is August 5th.
const DATE_FORMATS: &[&str] = &[
    "%m/%d/%Y",
    "%m/%d/%y",
    "%Y-%m-%d",
    "%m-%d-%Y",
    "%d-%b-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M:%S%.f", "%H:%M", "%I:%M:%S %p", "%I:%M %p"];

/// Parameters and Info sheet keys
mod keys {
    pub const C_FACTOR: &str = "Cf";
    pub const E: &str = "Ef";
    pub const HEAT_FLUX: &str = "CONEHEATFLUX";
    pub const GRID: &str = "Grid";
    pub const SEPARATION: &str = "Separation";
    pub const INITIAL_MASS: &str = "ISMass";
    pub const ORIENTATION: &str = "ORIENTATION";
    pub const AREA: &str = "As";

    pub const DATE: &str = "Date";
    pub const TIME: &str = "Time";
    pub const OPERATOR: &str = "Qualified Operator";
    pub const DIRECTOR: &str = "Test Director";
    pub const COMMENTS: &str = "Test Series information";
    pub const SPECIMEN: &str = "Sample ID";
}

/// Permissive numeric coercion: anything that is not a finite number is `None`.
pub fn get_number(value: Option<&str>) -> Option<f64> {
    value?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// `yes`/`true` and `no`/`false`, case-insensitive. Anything else is `None`.
pub fn get_bool(value: Option<&str>) -> Option<bool> {
    match value?.trim().to_lowercase().as_str() {
        "yes" | "true" => Some(true),
        "no" | "false" => Some(false),
        _ => None,
    }
}

/// Heat of combustion in MJ/kg from the raw `Ef` parameter.
///
/// The value is treated as kJ/kg and divided by 1000, except for the two
/// values the instrument writes already in MJ/kg.
pub fn resolve_e_mj_per_kg(raw: Option<f64>) -> f64 {
    let Some(raw) = raw else {
        warn!("Ef not defined in metadata, defaulting to {}", DEFAULT_E_MJ_PER_KG);
        return DEFAULT_E_MJ_PER_KG;
    };
    let kj_per_kg = E_MJ_PER_KG_EXPORTS
        .iter()
        .find(|(exported, _)| *exported == raw)
        .map_or(raw, |(_, kj)| *kj);
    kj_per_kg / 1000.0
}

/// Specimen area in cm² from the raw `As` parameter
pub fn resolve_surface_area_cm2(raw: f64) -> f64 {
    if raw <= AREA_M2_THRESHOLD {
        raw * CM2_PER_M2
    } else {
        raw
    }
}

/// Combine the separate date and time-of-day fields of the Info sheet.
///
/// A date cell carrying a trailing time (`2019-08-05 00:00:00`) is accepted
/// and the trailing part ignored.
pub fn parse_test_date(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = parse_date(date.trim())?;
    let time = parse_time(time.trim())?;
    Some(date.and_time(time))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS.iter().find_map(|fmt| {
        let (date, rest) = NaiveDate::parse_and_remainder(value, fmt).ok()?;
        // %Y happily reads "19" as year 19; two-digit years belong to %y
        let whole = rest.is_empty() || rest.starts_with(|c: char| c == ' ' || c == 'T');
        (whole && date.year() >= 1000).then_some(date)
    })
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    let parse = |v: &str| {
        TIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveTime::parse_from_str(v, fmt).ok())
    };
    // Spreadsheet time cells sometimes carry a placeholder date in front
    parse(value).or_else(|| parse(value.split_once(' ')?.1.trim()))
}

/// Reference times derived from the event log
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EventTimes {
    /// Last event mentioning ignition
    pub ignition_s: Option<f64>,
    /// Last event mentioning flame or fire out
    pub flameout_s: Option<f64>,
    /// Last event mentioning the start of the test
    pub start_s: Option<f64>,
}

impl EventTimes {
    /// Classify events by substring.
    ///
    /// Each event lands in the first category it matches (ignition, then
    /// flame-out, then start). When several events match the same category
    /// the last one wins.
    pub fn from_events(events: &[Event]) -> Self {
        let mut times = Self::default();
        for event in events {
            let lower = event.event.to_lowercase();
            if event.event.contains("Ignition") {
                times.ignition_s = Some(event.time);
            } else if lower.contains("flame out") || lower.contains("fire out") {
                times.flameout_s = Some(event.time);
            } else if event.event.contains("Start") {
                times.start_s = Some(event.time);
            }
        }
        times
    }
}

impl TestMetadata {
    /// Resolve the per-test constants from a metadata workbook.
    ///
    /// Fails when the specimen area or the test date cannot be resolved;
    /// every other field degrades to `None` (or its documented default).
    pub fn resolve(source: &MetadataSource) -> Result<Self, MetadataError> {
        let number = |key: &str| get_number(source.parameter(key));
        let text = |key: &str| source.info(key).map(str::to_string);

        let raw_area = number(keys::AREA).ok_or(MetadataError::MissingRequiredField("As"))?;

        let mut metadata = TestMetadata::with_area(resolve_surface_area_cm2(raw_area));
        metadata.c_factor = number(keys::C_FACTOR);
        metadata.e_mj_per_kg = resolve_e_mj_per_kg(number(keys::E));
        metadata.heat_flux_kw_per_m2 = number(keys::HEAT_FLUX);
        metadata.grid = get_bool(source.parameter(keys::GRID));
        metadata.separation_mm = number(keys::SEPARATION);
        metadata.initial_mass_g = number(keys::INITIAL_MASS);
        metadata.orientation = source.parameter(keys::ORIENTATION).map(str::to_string);

        let date = source
            .info(keys::DATE)
            .ok_or(MetadataError::MissingRequiredField("Date"))?;
        let time = source
            .info(keys::TIME)
            .ok_or(MetadataError::MissingRequiredField("Time"))?;
        let timestamp = parse_test_date(date, time).ok_or_else(|| MetadataError::InvalidDate {
            date: date.to_string(),
            time: time.to_string(),
        })?;
        metadata.date = Some(timestamp);
        metadata.operator = text(keys::OPERATOR);
        metadata.director = text(keys::DIRECTOR);
        metadata.comments = text(keys::COMMENTS);
        metadata.specimen_number = text(keys::SPECIMEN);

        let Some(rows) = source.events() else {
            return Ok(metadata);
        };

        let mut events = Vec::with_capacity(rows.len());
        for row in rows {
            match get_number(Some(&row.time)) {
                Some(time) => events.push(Event {
                    time,
                    event: row.description.clone(),
                }),
                None => warn!("Skipping event '{}' with time '{}'", row.description, row.time),
            }
        }

        let times = EventTimes::from_events(&events);
        metadata.time_to_ignition_s = times.ignition_s;
        metadata.time_to_flameout_s = times.flameout_s;
        metadata.test_start_time_s = times.start_s;
        metadata.events = Some(events);

        Ok(metadata)
    }

    /// Read a workbook and resolve it
    pub fn from_reader<R: MetadataReader + ?Sized>(reader: &R) -> Result<Self, MetadataError> {
        Self::resolve(&reader.read_source()?)
    }
}
