use super::*;
use crate::metadata::TestMetadata;
use crate::table::RawTable;

const BASE_O2: f64 = 0.2095;
const BASE_CO2: f64 = 0.0005;

// Reference values for O2 0.19, CO2 0.015, CO 0.0002 against the baselines
// above, delta_P 100 Pa, T_e 400 K, C 0.04, E 13.1 MJ/kg, area 100 cm²
const REF_MFR: f64 = 0.02;
const REF_HRR: f64 = 587.989_599_878_591_8;

fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("value should be computed");
    let err = ((actual - expected) / expected).abs();
    assert!(err < 1e-6, "expected {expected}, got {actual}");
}

/// `pre` samples of clean air followed by `burn` samples of combustion gases
fn two_phase_columns(pre: usize, burn: usize) -> Vec<(&'static str, Vec<f64>)> {
    let rows = pre + burn;
    let phase = |clean: f64, fire: f64| -> Vec<f64> {
        (0..rows).map(|i| if i < pre { clean } else { fire }).collect()
    };
    vec![
        ("1: Test Time (s)", (0..rows).map(|i| i as f64).collect()),
        ("2: O2 (Vol fr)", phase(BASE_O2, 0.19)),
        ("3: CO2 (Vol fr)", phase(BASE_CO2, 0.015)),
        ("4: CO (Vol fr)", phase(0.0, 0.0002)),
        ("5: Te (°C)", vec![400.0 - CELSIUS_TO_KELVIN; rows]),
        ("6: Pe (Pa)", vec![100.0; rows]),
        ("7: Io (%)", vec![100.0; rows]),
        ("8: I (%)", phase(100.0, 50.0)),
        ("9: SampMass (g)", (0..rows).map(|i| 50.0 - i as f64 * 0.1).collect()),
    ]
}

fn table(columns: Vec<(&'static str, Vec<f64>)>) -> RawTable {
    RawTable::from_columns(columns).unwrap()
}

fn without(mut columns: Vec<(&'static str, Vec<f64>)>, name: &str) -> Vec<(&'static str, Vec<f64>)> {
    columns.retain(|(n, _)| !n.ends_with(name));
    columns
}

fn metadata(start: Option<f64>) -> TestMetadata {
    let mut metadata = TestMetadata::with_area(100.0);
    metadata.c_factor = Some(0.04);
    metadata.test_start_time_s = start;
    metadata
}

fn run(table: &RawTable, metadata: &TestMetadata) -> Result<ProcessedData, ProcessingError> {
    let config = ProcessingConfig::default();
    Synchronizer::new(metadata, &config).process(table)
}

#[test]
fn test_reference_hrr_and_mfr() {
    let data = run(&table(two_phase_columns(10, 30)), &metadata(Some(10.0))).unwrap();

    assert_eq!(data.len(), 30);
    assert_eq!(data.start_offset, 10);
    assert!((data.baselines.o2 - BASE_O2).abs() < 1e-12);
    assert!((data.baselines.co2 - BASE_CO2).abs() < 1e-12);

    for sample in &data.samples {
        assert_close(sample.mfr_kg_per_s, REF_MFR);
        assert_close(sample.hrr_kw_per_m2, REF_HRR);
    }
    assert_close(data.peak_hrr(), REF_HRR);
}

#[test]
fn test_time_rebased_to_start() {
    let data = run(&table(two_phase_columns(10, 30)), &metadata(Some(10.0))).unwrap();

    let times: Vec<f64> = data.samples.iter().map(|s| s.time_s).collect();
    let expected: Vec<f64> = (0..30).map(|i| i as f64).collect();
    assert_eq!(times, expected);
    // the mass column moves with the table
    assert_eq!(data.samples[0].mass_g, Some(50.0 - 10.0 * 0.1));
}

#[test]
fn test_fallback_baseline_window() {
    // No start event: the first 30 samples form the baseline, which here
    // includes 10 samples of combustion gases
    let data = run(&table(two_phase_columns(20, 30)), &metadata(None)).unwrap();

    assert_eq!(data.len(), 50);
    assert_eq!(data.start_offset, 0);
    let expected_o2 = (20.0 * BASE_O2 + 10.0 * 0.19) / 30.0;
    assert!((data.baselines.o2 - expected_o2).abs() < 1e-12);
    assert_eq!(data.samples[0].time_s, 0.0);
}

#[test]
fn test_baseline_skips_missing_cells() {
    let mut columns = two_phase_columns(10, 30);
    columns[1].1[3] = f64::NAN;
    let data = run(&table(columns), &metadata(Some(10.0))).unwrap();
    assert!((data.baselines.o2 - BASE_O2).abs() < 1e-12);
}

#[test]
fn test_two_second_gap_is_rejected() {
    let mut columns = two_phase_columns(10, 30);
    for t in columns[0].1.iter_mut().skip(25) {
        *t += 1.0;
    }
    let err = run(&table(columns), &metadata(Some(10.0))).unwrap_err();
    match err {
        ProcessingError::TimeIrregularity { time, gap } => {
            assert_eq!(time, 24.0);
            assert_eq!(gap, 2.0);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_check_time_increments() {
    assert!(check_time_increments(&[0.0, 1.0, 2.0, 3.0]).is_ok());
    // repeated samples are not gaps
    assert!(check_time_increments(&[0.0, 1.0, 1.0, 2.0]).is_ok());
    assert!(check_time_increments(&[0.0, 1.0, 1.5, 3.0]).is_err());
    assert!(check_time_increments(&[]).is_ok());
}

#[test]
fn test_negative_pressure_is_rejected() {
    let mut columns = two_phase_columns(10, 30);
    columns[5].1[20] = -0.5;
    let err = run(&table(columns), &metadata(Some(10.0))).unwrap_err();
    match err {
        ProcessingError::NegativePressure { time, value } => {
            assert_eq!(time, 10.0);
            assert_eq!(value, -0.5);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_negative_pressure_before_start_is_ignored() {
    let mut columns = two_phase_columns(10, 30);
    columns[5].1[2] = -3.0;
    assert!(run(&table(columns), &metadata(Some(10.0))).is_ok());
}

#[test]
fn test_analyzer_delays() {
    let mut columns = two_phase_columns(10, 30);
    // mark each gas sample with its raw row index
    columns[1].1 = (0..40).map(|i| i as f64).collect();
    columns[2].1 = (0..40).map(|i| 100.0 + i as f64).collect();
    columns[3].1 = (0..40).map(|i| 200.0 + i as f64).collect();

    let mut metadata = metadata(Some(10.0));
    metadata.o2_delay_time_s = Some(3.0);
    metadata.co_delay_time_s = Some(1.0);

    let data = run(&table(columns), &metadata).unwrap();

    assert_eq!(data.delays, [3, 0, 1]);
    // 40 rows - 10 start - 3 max delay
    assert_eq!(data.len(), 27);
    let first = &data.samples[0];
    assert_eq!(first.o2, Some(13.0));
    assert_eq!(first.co2, Some(110.0));
    assert_eq!(first.co, Some(211.0));
    let last = data.samples.last().unwrap();
    assert_eq!(last.time_s, 26.0);
    assert_eq!(last.o2, Some(39.0));
}

#[test]
fn test_configured_delays_apply_when_metadata_has_none() {
    let config = ProcessingConfig {
        co2_delay_s: 2.0,
        ..ProcessingConfig::default()
    };
    let metadata = metadata(Some(10.0));
    let table = table(two_phase_columns(10, 30));
    let data = Synchronizer::new(&metadata, &config).process(&table).unwrap();

    assert_eq!(data.delays, [0, 2, 0]);
    assert_eq!(data.len(), 28);
}

#[test]
fn test_optical_channels_valid() {
    let data = run(&table(two_phase_columns(10, 30)), &metadata(Some(10.0))).unwrap();

    assert_eq!(data.optical, OpticalStatus::Valid);
    assert_close(data.samples[0].k_smoke_per_m, std::f64::consts::LN_2);
}

#[test]
fn test_optical_path_length_from_metadata() {
    let mut metadata = metadata(Some(10.0));
    metadata.path_length_m = Some(0.11);
    let data = run(&table(two_phase_columns(10, 30)), &metadata).unwrap();
    assert_close(data.samples[0].k_smoke_per_m, 6.301_338_005_090_412);
}

#[test]
fn test_optical_channels_missing() {
    let columns = without(two_phase_columns(10, 30), "I (%)");
    let data = run(&table(columns), &metadata(Some(10.0))).unwrap();

    assert_eq!(data.optical, OpticalStatus::Missing);
    assert!(data.optical.is_degraded());
    assert!(data.samples.iter().all(|s| s.k_smoke_per_m.is_none()));
    assert!(data.samples.iter().all(|s| s.hrr_kw_per_m2.is_some()));
}

#[test]
fn test_single_negative_intensity_nulls_every_row() {
    let mut columns = two_phase_columns(10, 30);
    columns[6].1[35] = -1.0;
    let data = run(&table(columns), &metadata(Some(10.0))).unwrap();

    assert_eq!(data.optical, OpticalStatus::Negative);
    assert!(data.samples.iter().all(|s| s.k_smoke_per_m.is_none()));
}

#[test]
fn test_zero_intensity_is_null_for_that_row() {
    let mut columns = two_phase_columns(10, 30);
    columns[7].1[15] = 0.0;
    let data = run(&table(columns), &metadata(Some(10.0))).unwrap();

    assert_eq!(data.optical, OpticalStatus::Valid);
    assert_eq!(data.samples[5].k_smoke_per_m, None);
    assert!(data.samples[6].k_smoke_per_m.is_some());
}

#[test]
fn test_missing_c_factor_nulls_hrr_and_mfr() {
    let mut metadata = metadata(Some(10.0));
    metadata.c_factor = None;
    let data = run(&table(two_phase_columns(10, 30)), &metadata).unwrap();

    assert!(data.samples.iter().all(|s| s.hrr_kw_per_m2.is_none()));
    assert!(data.samples.iter().all(|s| s.mfr_kg_per_s.is_none()));
    assert_eq!(data.peak_hrr(), None);
}

#[test]
fn test_missing_required_channel() {
    let columns = without(two_phase_columns(10, 30), "Pe (Pa)");
    let err = run(&table(columns), &metadata(Some(10.0))).unwrap_err();
    assert!(matches!(err, ProcessingError::TableError(_)));
}

#[test]
fn test_start_beyond_table_leaves_nothing() {
    let data = run(&table(two_phase_columns(10, 5)), &metadata(Some(60.0))).unwrap();
    assert!(data.is_empty());
}

#[test]
fn test_negative_start_is_ignored() {
    let data = run(&table(two_phase_columns(10, 30)), &metadata(Some(-5.0))).unwrap();
    assert_eq!(data.start_offset, 0);
    assert_eq!(data.len(), 40);
}

#[test]
fn test_processing_is_idempotent() {
    let table = table(two_phase_columns(10, 30));
    let metadata = metadata(Some(10.0));
    let first = run(&table, &metadata).unwrap();
    let second = run(&table, &metadata).unwrap();
    assert_eq!(first, second);
}
