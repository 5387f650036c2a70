//! Integration tests for directory crash restore.

use gzsalvage::{DEFAULT_PATTERN, RestoreStatus, decompress, restore_dir, restore_dir_with};
use gzsalvage_gzip::compress as gzip;
use std::fs;
use tempfile::TempDir;

fn noise(len: usize) -> Vec<u8> {
    let mut seed: u64 = 0x0F1E2D3C4B5A6978;
    (0..len)
        .map(|_| {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            (seed >> 32) as u8
        })
        .collect()
}

/// A directory laid out like a producer's working directory after a crash.
fn crashed_dir() -> (TempDir, Vec<u8>) {
    let dir = TempDir::new().expect("temp dir");
    let payload = noise(8000);

    let healthy = gzip(b"finished part").unwrap();
    let complete = gzip(&payload).unwrap();
    let truncated = &complete[..complete.len() - 300];

    fs::write(dir.path().join("a-healthy.gz"), &healthy).unwrap();
    fs::write(dir.path().join("b-truncated.gz"), truncated).unwrap();
    fs::write(dir.path().join("c-empty.gz"), b"").unwrap();
    fs::write(dir.path().join("d-garbage.gz"), b"not a gzip file").unwrap();
    fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();
    fs::create_dir(dir.path().join("nested.gz")).unwrap();

    (dir, payload)
}

#[test]
fn test_restore_dir_statuses() {
    let (dir, _) = crashed_dir();

    let report = restore_dir(dir.path(), DEFAULT_PATTERN).unwrap();

    let names: Vec<_> = report
        .files
        .iter()
        .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        ["a-healthy.gz", "b-truncated.gz", "c-empty.gz", "d-garbage.gz"]
    );

    assert_eq!(report.files[0].status, RestoreStatus::Healthy);
    assert!(matches!(
        report.files[1].status,
        RestoreStatus::Repaired { recovered } if recovered > 0
    ));
    assert_eq!(report.files[2].status, RestoreStatus::Skipped);
    assert!(matches!(report.files[3].status, RestoreStatus::Failed { .. }));

    assert_eq!(report.repaired(), 1);
    assert_eq!(report.failed(), 1);
}

#[test]
fn test_restore_dir_replaces_truncated_file() {
    let (dir, payload) = crashed_dir();
    let truncated = dir.path().join("b-truncated.gz");

    restore_dir(dir.path(), DEFAULT_PATTERN).unwrap();

    let out = dir.path().join("b.out");
    assert!(decompress(&truncated, &out).is_success());
    let recovered = fs::read(&out).unwrap();
    assert!(!recovered.is_empty());
    assert!(payload.starts_with(&recovered));

    // No temporary files left behind.
    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".repair"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_restore_dir_leaves_other_files_untouched() {
    let (dir, _) = crashed_dir();
    let healthy = fs::read(dir.path().join("a-healthy.gz")).unwrap();

    restore_dir(dir.path(), DEFAULT_PATTERN).unwrap();

    assert_eq!(fs::read(dir.path().join("a-healthy.gz")).unwrap(), healthy);
    assert_eq!(
        fs::read(dir.path().join("d-garbage.gz")).unwrap(),
        b"not a gzip file"
    );
    assert!(fs::read(dir.path().join("c-empty.gz")).unwrap().is_empty());
}

#[test]
fn test_restore_dir_is_idempotent() {
    let (dir, _) = crashed_dir();

    restore_dir(dir.path(), DEFAULT_PATTERN).unwrap();
    let second = restore_dir(dir.path(), DEFAULT_PATTERN).unwrap();

    assert_eq!(second.repaired(), 0);
    assert_eq!(second.files[1].status, RestoreStatus::Healthy);
}

#[test]
fn test_restore_dir_pattern_and_callback() {
    let (dir, _) = crashed_dir();
    let mut seen = Vec::new();

    let report =
        restore_dir_with(dir.path(), "b-*.gz", |file| seen.push(file.path.clone())).unwrap();

    assert_eq!(report.files.len(), 1);
    assert_eq!(seen, vec![dir.path().join("b-truncated.gz")]);
}

#[test]
fn test_restore_missing_dir() {
    let dir = TempDir::new().unwrap();
    let err = restore_dir(dir.path().join("gone"), DEFAULT_PATTERN).unwrap_err();
    assert_eq!(err.class(), gzsalvage::FaultClass::SourceUnavailable);
}

#[test]
fn test_report_json() {
    let (dir, _) = crashed_dir();
    let report = restore_dir(dir.path(), DEFAULT_PATTERN).unwrap();

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["files"][0]["status"], "healthy");
    assert_eq!(value["files"][1]["status"], "repaired");
    assert!(value["files"][1]["recovered"].as_u64().unwrap() > 0);
}
