use super::*;
use crate::metadata::sheets::{INFO_SHEET, PARAMETERS_SHEET};
use crate::processing::OpticalStatus;
use std::fs;
use tempfile::tempdir;

fn table(rows: usize) -> RawTable {
    RawTable::from_columns([
        ("Test Time (s)", (0..rows).map(|i| i as f64).collect()),
        ("O2 (Vol fr)", vec![0.2095; rows]),
        ("CO2 (Vol fr)", vec![0.0005; rows]),
        ("CO (Vol fr)", vec![0.0; rows]),
        ("Te (°C)", vec![25.0; rows]),
        ("Pe (Pa)", vec![80.0; rows]),
        ("SampMass (g)", vec![40.0; rows]),
    ])
    .unwrap()
}

fn metadata() -> TestMetadata {
    let mut metadata = TestMetadata::with_area(100.0);
    metadata.c_factor = Some(0.04);
    metadata.test_start_time_s = Some(5.0);
    metadata
}

#[test]
fn test_nineteen_samples_rejected() {
    let outcome = Pipeline::default().process("short", metadata(), &table(24));

    match outcome.result {
        Err(TestError::InsufficientSamples { count, required }) => {
            assert_eq!(count, 19);
            assert_eq!(required, 20);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(outcome.stats.files_parsed, 1);
    assert_eq!(outcome.stats.files_succeeded, 0);
    assert_eq!(
        outcome.stats.failures.get(&FailureKind::InsufficientSamples),
        Some(&1)
    );
}

#[test]
fn test_twenty_samples_accepted() {
    let outcome = Pipeline::default().process("ok", metadata(), &table(25));

    let test = outcome.result.unwrap();
    assert_eq!(test.name, "ok");
    assert_eq!(test.data.len(), 20);
    assert_eq!(outcome.stats.files_succeeded, 1);
    // no photometer channels in this table
    assert_eq!(test.data.optical, OpticalStatus::Missing);
    assert_eq!(outcome.stats.bad_optical_tests, 1);
}

#[test]
fn test_negative_pressure_counted() {
    let source = table(40);
    let mut columns: Vec<(String, Vec<f64>)> = source
        .headers()
        .iter()
        .map(|h| (h.clone(), source.column(h).unwrap().to_vec()))
        .collect();
    columns[5].1[30] = -1.0;
    let raw = RawTable::from_columns(columns).unwrap();

    let outcome = Pipeline::default().process("neg", metadata(), &raw);
    assert!(outcome.result.is_err());
    assert_eq!(outcome.stats.negative_pressure_tests, 1);
    assert_eq!(outcome.stats.bad_optical_tests, 0);
}

#[test]
fn test_statistics_merge() {
    let mut total = RunStatistics::default();
    total.merge(&Pipeline::default().process("a", metadata(), &table(40)).stats);
    total.merge(&Pipeline::default().process("b", metadata(), &table(10)).stats);

    assert_eq!(total.files_parsed, 2);
    assert_eq!(total.files_succeeded, 1);
    assert_eq!(total.files_failed(), 1);
    assert_eq!(total.bad_optical_tests, 2);
    assert_eq!(total.success_rate(), 50.0);
    assert_eq!(total.to_string(), "Files parsed successfully: 1/2 (50.0%)");
}

#[test]
fn test_empty_statistics() {
    let stats = RunStatistics::default();
    assert_eq!(stats.success_rate(), 0.0);
    assert_eq!(stats.files_failed(), 0);
}

#[test]
fn test_input_from_scaled_csv() {
    let input = TestInput::from_scaled_csv("/data/8-5-2019-PVC-1-scaled.csv");
    assert_eq!(input.name, "8-5-2019-PVC-1");
    assert_eq!(
        input.workbook.path(),
        Path::new("/data/8-5-2019-PVC-1-Output")
    );
}

#[test]
fn test_missing_workbook() {
    let dir = tempdir().unwrap();
    let raw = dir.path().join("t-scaled.csv");
    fs::write(&raw, "Test Time (s)\n0\n").unwrap();

    let outcome = Pipeline::default().process_path(&raw);
    let err = outcome.result.unwrap_err();
    assert_eq!(err.kind(), FailureKind::MissingMetadataFile);
    assert_eq!(outcome.stats.files_parsed, 1);
}

#[test]
fn test_missing_area_fails_before_table_is_read() {
    let dir = tempdir().unwrap();
    let workbook = dir.path().join("t-Output");
    fs::create_dir(&workbook).unwrap();
    fs::write(workbook.join(PARAMETERS_SHEET), "Cf\n0.04\n").unwrap();
    fs::write(workbook.join(INFO_SHEET), "Date:,1/1/2020\nTime:,09:00:00\n").unwrap();

    // the raw table does not even exist
    let outcome = Pipeline::default().process_path(&dir.path().join("t-scaled.csv"));
    assert_eq!(
        outcome.result.unwrap_err().kind(),
        FailureKind::MissingRequiredField
    );
}

#[test]
fn test_progress_interval() {
    assert!(!batch::progress_due(0));
    assert!(!batch::progress_due(PROGRESS_INTERVAL - 1));
    assert!(batch::progress_due(PROGRESS_INTERVAL));
    assert!(!batch::progress_due(PROGRESS_INTERVAL + 1));
    assert!(batch::progress_due(3 * PROGRESS_INTERVAL));
}
