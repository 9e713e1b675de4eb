// Unit tests for logger module initialization logic

use crate::logger::{DEBUG_LEVEL, DEFAULT_LEVEL, initialize, level_for, open_log_file};

use crate::error::AppError;

use std::path::PathBuf;

/// **VALUE**: Verifies that calling initialize() multiple times doesn't panic or fail.
///
/// **WHY THIS MATTERS**: Tests and the binary may both reach initialization.
/// fern panics or errors if a global logger is set twice.
///
/// **BUG THIS CATCHES**: Would catch if the Once or AtomicBool guards are removed.
#[test]
fn given_logger_initialized_when_called_again_then_returns_ok() {
    // GIVEN: A writable log file location
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let log_file = temp_dir.path().join("gh-agent.log");

    // WHEN: Calling initialize twice
    let result1 = initialize(DEFAULT_LEVEL, Some(&log_file));
    let result2 = initialize(DEBUG_LEVEL, None);

    // THEN: Both should return Ok (second one logs warning but doesn't error)
    assert!(result1.is_ok(), "First initialization should succeed");
    assert!(result2.is_ok(), "Second initialization should succeed (idempotent)");
}

#[test]
fn given_unwritable_path_when_opening_log_file_then_returns_app_error() {
    // GIVEN: A path below a file, which can never be a directory
    let invalid = PathBuf::from("/dev/null/invalid-path/gh-agent.log");

    // WHEN
    let result = open_log_file(&invalid);

    // THEN
    let err = result.expect_err("unwritable");
    assert!(matches!(err, AppError::App { .. }));
    assert!(err.to_string().contains("Failed to create log file"));
}

#[test]
fn given_debug_toggle_when_choosing_level_then_debug_or_info() {
    assert_eq!(level_for(true), DEBUG_LEVEL);
    assert_eq!(level_for(false), DEFAULT_LEVEL);
}
