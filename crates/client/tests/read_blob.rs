use std::io::Write;

use collectible_core::{Identity, ProgressionState, StateStore};
use collectible_inspect::{inspect, read_blob, render_json};
use tempfile::NamedTempFile;

fn saved_store() -> StateStore {
    let mut store = StateStore::new();
    store.set(
        &Identity::new("Town", "Crawler", (10.0, 5.0)),
        ProgressionState::Collected,
    );
    store.set(
        &Identity::new("Ruins; East", "Sentry", (f32::NAN, -0.0)),
        ProgressionState::Collected,
    );
    store
}

#[test]
fn saved_file_round_trips_through_inspection() {
    let store = saved_store();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", store.serialize()).unwrap();

    let blob = read_blob(Some(file.path())).unwrap();
    let report = inspect(&blob).unwrap();

    assert_eq!(report.declared, 2);
    assert_eq!(report.collected(), 2);
    let mut reloaded = StateStore::new();
    reloaded.load(Some(blob.as_str())).unwrap();
    assert_eq!(reloaded, store);
}

#[test]
fn json_report_lists_identities() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", saved_store().serialize()).unwrap();

    let blob = read_blob(Some(file.path())).unwrap();
    let mut report = inspect(&blob).unwrap();
    report.retain_container("Town");

    let json: serde_json::Value = serde_json::from_str(&render_json(&report).unwrap()).unwrap();
    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["identity"]["local_name"], "Crawler");
    assert_eq!(entries[0]["state"], "Collected");
    assert_eq!(json["declared"], 2);
}

#[test]
fn json_report_keeps_non_finite_positions() {
    let blob = saved_store().serialize();
    let mut report = inspect(&blob).unwrap();
    report.retain_container("Ruins; East");

    let json: serde_json::Value = serde_json::from_str(&render_json(&report).unwrap()).unwrap();
    let spawn = &json["entries"][0]["identity"]["spawn"];
    assert!(!spawn["x"].is_null());
    assert!(!spawn["y"].is_null());

    let identity: Identity = serde_json::from_value(json["entries"][0]["identity"].clone()).unwrap();
    assert_eq!(identity, Identity::new("Ruins; East", "Sentry", (f32::NAN, -0.0)));
    assert!(identity.spawn.x.is_nan());
    assert!(identity.spawn.y.is_sign_negative());
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.txt");

    let err = read_blob(Some(&path)).unwrap_err();
    assert!(format!("{err:#}").contains("absent.txt"));
}
