// Unit tests for HttpStatusCode categorisation
// These drive retry eligibility in the GitHub client

use crate::HttpStatusCode;

/// **VALUE**: Verifies that transient failures are recognised by status alone.
///
/// **WHY THIS MATTERS**: The retry wrapper trusts `is_retryable()` for every
/// classification except the header-dependent 403 case.
///
/// **BUG THIS CATCHES**: Would catch if 5xx, timeouts or network failures
/// stopped being retried, or if plain 4xx started being retried.
#[test]
fn given_status_codes_when_checking_retryable_then_only_transient_ones_qualify() {
    for code in [0, 408, 429, 500, 502, 503, 504] {
        assert!(
            HttpStatusCode(code).is_retryable(),
            "{code} should be retryable"
        );
    }

    for code in [400, 401, 403, 404, 422] {
        assert!(
            !HttpStatusCode(code).is_retryable(),
            "{code} should not be retryable"
        );
    }
}

#[test]
fn given_status_ranges_when_categorised_then_match_http_classes() {
    assert!(HttpStatusCode(204).is_success());
    assert!(HttpStatusCode(404).is_client_error());
    assert!(!HttpStatusCode(404).is_server_error());
    assert!(HttpStatusCode(503).is_server_error());
    assert!(HttpStatusCode::NETWORK.is_network());
    assert_eq!(HttpStatusCode::TIMEOUT.0, 408);
}
