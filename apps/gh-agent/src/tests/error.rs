// Unit tests for error module

use crate::error::AppError;

use common::ErrorLocation;

use github_core::error::{OperationError, ToolError};

use std::panic::Location;

#[test]
fn given_app_error_when_displayed_then_prefix_message_and_location_present() {
    // GIVEN
    let err = AppError::App {
        message: String::from("Test"),
        location: ErrorLocation::from(Location::caller()),
    };

    // WHEN
    let text = err.to_string();

    // THEN
    assert!(text.starts_with("App Error: Test "), "{text}");
    assert!(text.contains("error.rs"), "{text}");
}

/// **VALUE**: Verifies wrapped core errors keep their own message.
///
/// **WHY THIS MATTERS**: The user sees `Error: {e}`; an extra wrapper prefix
/// would bury "Failed to get user info: Not Found" behind noise.
///
/// **BUG THIS CATCHES**: Would catch the `transparent` attribute being removed.
#[test]
fn given_core_error_when_converted_then_display_is_unchanged() {
    // GIVEN
    let inner = ToolError::from(OperationError::invalid_input("limit must be between 1 and 30"));
    let expected = inner.to_string();

    // WHEN
    let err = AppError::from(inner);

    // THEN
    assert_eq!(err.to_string(), expected);
    assert!(matches!(err, AppError::Tool(_)));
}
