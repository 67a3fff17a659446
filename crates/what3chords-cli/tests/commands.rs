//! End-to-end command tests against config and dataset files on disk.

use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::process::ExitCode;
use tempfile::TempDir;

use what3chords_cli::commands::{cell, check, config, decode, encode, survey};

/// Four single-voicing chords.
const DATASET: &str = r#"{
    "chords": {
        "C": [{ "key": "C", "suffix": "major", "positions": [
            { "frets": [-1, 3, 2, 0, 1, 0], "fingers": [0, 3, 2, 0, 1, 0], "baseFret": 1, "midi": [48, 52, 55, 60, 64] }
        ] }],
        "G": [{ "key": "G", "suffix": "major", "positions": [
            { "frets": [3, 2, 0, 0, 0, 3], "fingers": [2, 1, 0, 0, 0, 3], "baseFret": 1, "midi": [43, 47, 50, 55, 59, 67] }
        ] }],
        "A": [{ "key": "A", "suffix": "minor", "positions": [
            { "frets": [-1, 0, 2, 2, 1, 0], "fingers": [0, 0, 2, 3, 1, 0], "baseFret": 1, "midi": [45, 52, 57, 60, 64] }
        ] }],
        "F": [{ "key": "F", "suffix": "major", "positions": [
            { "frets": [1, 3, 3, 2, 1, 1], "fingers": [1, 3, 4, 2, 1, 1], "baseFret": 1, "capo": true, "midi": [41, 48, 53, 57, 60, 65] }
        ] }]
    }
}"#;

/// A 4-entry radix over an 8x8 grid: every index digit is a catalog position.
const SMALL_CONFIG: &str = r#"{
    "strategy": "coordinate_shuffle",
    "radix": 4,
    "shuffle": { "lon_steps": 8, "lat_steps": 8, "rounds": 4 }
}"#;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn fixture() -> (TempDir, String, String) {
    let tmp = tempfile::tempdir().unwrap();
    let catalog = write(&tmp, "chords.json", DATASET);
    let config = write(&tmp, "config.json", SMALL_CONFIG);
    (
        tmp,
        catalog.to_str().unwrap().to_string(),
        config.to_str().unwrap().to_string(),
    )
}

// ============================================================================
// encode / cell
// ============================================================================

#[test]
fn encode_with_catalog_succeeds() {
    let (_tmp, catalog, config) = fixture();
    for json in [false, true] {
        let code = encode::run(
            -73.99,
            40.75,
            Some(config.as_str()),
            None,
            Some(catalog.as_str()),
            json,
        )
        .unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }
}

#[test]
fn encode_with_full_preset_overruns_small_catalog() {
    let (_tmp, catalog, _config) = fixture();
    let code = encode::run(0.0, 0.0, None, None, Some(catalog.as_str()), true).unwrap();
    assert_eq!(code, ExitCode::from(1));
}

#[test]
fn encode_without_catalog_uses_default_preset() {
    let code = encode::run(13.405, 52.52, None, None, None, false).unwrap();
    assert_eq!(code, ExitCode::SUCCESS);
}

#[test]
fn encode_bad_config_file_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let config = write(&tmp, "config.json", "{ not json");
    let code = encode::run(0.0, 0.0, config.to_str(), None, None, true).unwrap();
    assert_eq!(code, ExitCode::from(1));
}

#[test]
fn cell_rejects_invalid_cell() {
    let code = cell::run("89ffffffffffffff", None, None, None, false).unwrap();
    assert_eq!(code, ExitCode::from(1));
}

// ============================================================================
// decode / check
// ============================================================================

#[test]
fn decode_seeded_is_stable_across_runs() {
    let a = decode::build("270.868.1499", None, Some(11), None, None);
    let b = decode::build("270.868.1499", None, Some(11), None, None);
    assert_eq!(a.result.unwrap().cell, b.result.unwrap().cell);
}

#[test]
fn decode_index_past_the_last_region_fails() {
    // under cell-exact, 2140.2140.2140 decodes to region 243
    let output = decode::build("2140.2140.2140", None, Some(1), None, Some("cell-exact"));
    assert!(!output.success);
    assert_eq!(output.errors[0].code, "CLI_009");
}

#[test]
fn check_reports_exit_codes() {
    assert_eq!(
        check::run("8a2a1072b59ffff", None, None, None, false).unwrap(),
        ExitCode::SUCCESS
    );
    assert_eq!(
        check::run("85283473fffffff", None, None, None, true).unwrap(),
        ExitCode::from(1)
    );
}

#[test]
fn check_json_carries_defect() {
    let output = check::build("85283473fffffff", Some(10), None, None);
    let result = output.result.unwrap();
    assert_eq!(result.defect.as_deref(), Some("digit group 5 decodes to 7"));
}

// ============================================================================
// survey / config
// ============================================================================

#[test]
fn survey_with_catalog_labels_top_entries() {
    let (_tmp, catalog, config) = fixture();
    let options = survey::SurveyOptions {
        cols: 8,
        rows: 8,
        top: 4,
        ..survey::SurveyOptions::default()
    };
    let output = survey::build(options, Some(config.as_str()), None, Some(catalog.as_str()));
    assert!(output.success, "{:?}", output.errors);
    let result = output.result.unwrap();
    assert_eq!(result.samples, 64);
    assert_eq!(result.catalog_len, 4);
    assert_eq!(result.out_of_range, 0);
    let labels: Vec<_> = result
        .top
        .iter()
        .filter_map(|hit| hit.label.clone())
        .collect();
    assert_eq!(labels.len(), result.top.len());
    assert!(labels
        .iter()
        .all(|l| ["Cmajor 0", "Gmajor 0", "Aminor 0", "Fmajor 0"].contains(&l.as_str())));
}

#[test]
fn config_against_small_catalog_warns() {
    let (_tmp, catalog, _config) = fixture();
    let output = config::build(None, Some("shuffle"), Some(catalog.as_str()));
    assert!(output.success);
    assert_eq!(output.warnings[0].code, "W003");
}

#[test]
fn config_file_round_trips_through_json_output() {
    let (_tmp, _catalog, config_path) = fixture();
    let output = config::build(Some(config_path.as_str()), None, None);
    let json = serde_json::to_string(&output).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["result"]["config"]["radix"], 4);
    assert_eq!(value["result"]["config"]["shuffle"]["rounds"], 4);
    assert_eq!(value["result"]["domain_size"], 64);
    assert_eq!(value["result"]["capacity"], 64);
}
