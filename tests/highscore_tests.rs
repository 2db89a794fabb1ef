//! High score persistence. These share one file in the temp dir, so they run serially.

use std::fs;
use std::path::PathBuf;

use blocktris::{HighScoreError, HighScoreStore, HighScores};
use serial_test::serial;

fn scores_path() -> PathBuf {
    let path = std::env::temp_dir().join("blocktris_highscores_test.json");
    let _ = fs::remove_file(&path);
    path
}

#[test]
fn record_keeps_only_improvements() {
    let mut scores = HighScores::default();

    assert!(scores.record("ada", 300));
    assert!(!scores.record("ada", 120));
    assert!(!scores.record("ada", 300));
    assert!(scores.record("ada", 301));

    assert_eq!(scores.best("ada"), 301);
    assert_eq!(scores.best("grace"), 0);
}

#[test]
#[serial]
fn missing_file_loads_empty() {
    let path = scores_path();

    let store = HighScoreStore::open(&path).unwrap();

    assert_eq!(store.best("ada"), 0);
}

#[test]
#[serial]
fn new_best_is_written_to_disk() {
    let path = scores_path();

    let mut store = HighScoreStore::open(&path).unwrap();
    assert!(store.submit("ada", 1200).unwrap());
    assert!(store.submit("grace", 40).unwrap());
    assert!(!store.submit("ada", 800).unwrap());

    let reopened = HighScoreStore::open(&path).unwrap();
    assert_eq!(reopened.best("ada"), 1200);
    assert_eq!(reopened.best("grace"), 40);

    let text = fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed["ada"], 1200);

    fs::remove_file(&path).unwrap();
}

#[test]
#[serial]
fn corrupt_file_is_a_format_error() {
    let path = scores_path();
    fs::write(&path, "not json").unwrap();

    let result = HighScores::load(&path);

    assert!(matches!(result, Err(HighScoreError::Format { .. })));
    fs::remove_file(&path).unwrap();
}
