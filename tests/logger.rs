//! Integration tests for logger behavior.

use grade_lens::logger::{init_file_logging, set_level, set_level_from_str, Level};
use grade_lens::{debug, error, info, verbose, warn};
use tempfile::TempDir;

#[test]
fn level_parse_accepts_valid() {
    assert!(set_level_from_str("error"));
    assert!(set_level_from_str("warn"));
    assert!(set_level_from_str("info"));
    assert!(set_level_from_str("debug"));
}

#[test]
fn level_parse_rejects_invalid() {
    assert!(!set_level_from_str("invalid"));
    assert!(!set_level_from_str(""));
}

#[test]
fn logs_do_not_panic() {
    set_level(Level::Debug);
    info!("info integration");
    warn!("warn integration");
    error!("error integration");
    debug!("debug integration");
    verbose!("verbose integration");
}

#[test]
fn file_logging_creates_parent_dirs() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("logs").join("gradelens.log");

    if init_file_logging(&path) {
        error!("written to file");
        assert!(path.exists());
    }
}
