// Unit tests for status-code classification of failed GitHub responses

use crate::client::{RateLimitSnapshot, classify_response};
use crate::error::GithubClientError;

use common::HttpStatusCode;

fn exhausted() -> RateLimitSnapshot {
    RateLimitSnapshot {
        limit: Some(60),
        remaining: Some(0),
        reset: Some(1_700_000_000),
        used: Some(60),
    }
}

fn healthy() -> RateLimitSnapshot {
    RateLimitSnapshot {
        remaining: Some(42),
        ..RateLimitSnapshot::default()
    }
}

/// **VALUE**: Verifies that a 403 is split by the remaining-budget header.
///
/// **WHY THIS MATTERS**: GitHub reuses 403 both for "you may not see this"
/// and "you ran out of requests". Only the second is worth retrying.
///
/// **BUG THIS CATCHES**: Would catch retrying permission errors (wasting the
/// budget) or giving up immediately on a rate limit that is about to reset.
#[test]
fn given_403_when_remaining_is_zero_then_rate_limited_otherwise_forbidden() {
    // GIVEN: The same 403 body under two different budgets
    let body = r#"{"message":"API rate limit exceeded for 1.2.3.4."}"#;

    // WHEN: Classifying
    let limited = classify_response(HttpStatusCode(403), &exhausted(), body);
    let forbidden = classify_response(HttpStatusCode(403), &healthy(), body);

    // THEN: Exhausted budget is RateLimited (retryable) with the reset time
    assert!(matches!(
        limited,
        GithubClientError::RateLimited {
            reset: Some(1_700_000_000),
            ..
        }
    ));
    assert!(limited.is_retryable());
    assert!(limited.message().contains("2023-11-14T22:13:20Z"));

    // THEN: Otherwise Forbidden (not retryable)
    assert!(matches!(forbidden, GithubClientError::Forbidden { .. }));
    assert!(!forbidden.is_retryable());
    assert_eq!(forbidden.status_code(), HttpStatusCode(403));
}

#[test]
fn given_403_without_rate_limit_headers_when_classified_then_forbidden() {
    let error = classify_response(HttpStatusCode(403), &RateLimitSnapshot::default(), "");

    assert!(matches!(error, GithubClientError::Forbidden { .. }));
}

/// **VALUE**: Verifies that the status code alone drives classification.
///
/// **WHY THIS MATTERS**: Error bodies are sometimes HTML from a proxy or
/// empty. The category must not depend on being able to parse them.
///
/// **BUG THIS CATCHES**: Would catch a refactor that falls back to `Other`
/// whenever the body fails to parse.
#[test]
fn given_unparsable_bodies_when_classified_then_category_follows_status() {
    // GIVEN: A non-JSON body
    let body = "<html>oops</html>";
    let none = RateLimitSnapshot::default();

    // WHEN / THEN
    let cases: [(u16, &str); 8] = [
        (400, "bad_request"),
        (401, "invalid_credential"),
        (404, "not_found"),
        (422, "validation_failed"),
        (429, "rate_limited"),
        (500, "server_error"),
        (502, "server_error"),
        (503, "server_error"),
    ];
    for (status, category) in cases {
        let error = classify_response(HttpStatusCode(status), &none, body);
        assert_eq!(error.error_category(), category, "status {status}");
        assert_eq!(error.status_code(), HttpStatusCode(status));
        assert!(error.payload().is_none());
    }
}

#[test]
fn given_404_with_empty_body_when_classified_then_uses_fallback_message() {
    let error = classify_response(HttpStatusCode(404), &RateLimitSnapshot::default(), "");

    assert!(error.is_not_found());
    assert_eq!(error.message(), "resource not found");
    assert!(error.to_string().starts_with("Not Found: resource not found"));
}

#[test]
fn given_401_with_github_body_when_classified_then_upstream_message_and_payload_kept() {
    // GIVEN: GitHub's bad-credentials body
    let body = r#"{"message":"Bad credentials","documentation_url":"https://docs.github.com/rest"}"#;

    // WHEN
    let error = classify_response(HttpStatusCode(401), &RateLimitSnapshot::default(), body);

    // THEN
    assert!(matches!(error, GithubClientError::Unauthorized { .. }));
    assert!(error.to_string().starts_with("Invalid Credential: Bad credentials"));
    let payload = error.payload().expect("JSON payload kept");
    assert_eq!(payload["documentation_url"], "https://docs.github.com/rest");
}

/// **VALUE**: Verifies that 422 details are folded into the message.
///
/// **WHY THIS MATTERS**: "Validation Failed" on its own tells the user
/// nothing; the per-field entries say which qualifier was wrong.
///
/// **BUG THIS CATCHES**: Would catch dropping the `errors` array or losing
/// entries that have only resource/field/code instead of a message.
#[test]
fn given_422_with_field_errors_when_classified_then_details_are_aggregated() {
    // GIVEN: One entry with a message, one with only field and code
    let body = r#"{
        "message": "Validation Failed",
        "errors": [
            {"message": "The search is longer than 256 characters."},
            {"resource": "Search", "field": "q", "code": "missing"}
        ]
    }"#;

    // WHEN
    let error = classify_response(HttpStatusCode(422), &RateLimitSnapshot::default(), body);

    // THEN
    assert_eq!(
        error.message(),
        "Validation Failed: The search is longer than 256 characters.; Search.q missing"
    );
    assert!(!error.is_retryable());
}

#[test]
fn given_unlisted_status_when_classified_then_other_with_status_in_message() {
    // GIVEN: A status outside the table
    let none = RateLimitSnapshot::default();

    // WHEN
    let teapot = classify_response(HttpStatusCode(418), &none, "");
    let gateway = classify_response(HttpStatusCode(504), &none, "");

    // THEN: Other keeps the code; 5xx in Other is still retryable
    assert_eq!(teapot.message(), "GitHub API request failed with status 418");
    assert!(!teapot.is_retryable());
    assert!(matches!(gateway, GithubClientError::Other { .. }));
    assert!(gateway.is_retryable());
}

#[test]
fn given_rate_limited_response_with_overflowing_reset_when_classified_then_no_panic() {
    // GIVEN
    let snapshot = RateLimitSnapshot {
        reset: Some(u64::MAX),
        ..exhausted()
    };

    // WHEN
    let limited = classify_response(HttpStatusCode(403), &snapshot, "");
    let too_many = classify_response(HttpStatusCode(429), &snapshot, "");

    // THEN
    for error in [limited, too_many] {
        assert!(matches!(error, GithubClientError::RateLimited { .. }), "{error}");
        assert!(error.to_string().contains(&format!("resets at epoch {}", u64::MAX)));
    }
}
