// Unit tests for rate-limit header parsing

use crate::client::RateLimitSnapshot;
use crate::client::rate_limit::{
    RATE_LIMIT_LIMIT_HEADER, RATE_LIMIT_REMAINING_HEADER, RATE_LIMIT_RESET_HEADER,
};

use reqwest::header::{HeaderMap, HeaderValue};

#[test]
fn given_rate_limit_headers_when_parsed_then_snapshot_is_populated() {
    // GIVEN
    let mut headers = HeaderMap::new();
    headers.insert(RATE_LIMIT_LIMIT_HEADER, HeaderValue::from_static("5000"));
    headers.insert(RATE_LIMIT_REMAINING_HEADER, HeaderValue::from_static("3"));
    headers.insert(RATE_LIMIT_RESET_HEADER, HeaderValue::from_static("1700000000"));

    // WHEN
    let snapshot = RateLimitSnapshot::from_headers(&headers);

    // THEN
    assert_eq!(snapshot.limit, Some(5000));
    assert_eq!(snapshot.remaining, Some(3));
    assert_eq!(snapshot.reset, Some(1_700_000_000));
    assert_eq!(snapshot.used, None);
    assert!(snapshot.is_below(10));
    assert!(!snapshot.is_below(3));
    assert!(!snapshot.is_exhausted());
    assert_eq!(snapshot.reset_display(), "2023-11-14T22:13:20Z");
}

/// **VALUE**: Verifies that missing or garbled headers never count as "exhausted".
///
/// **WHY THIS MATTERS**: A 403 is only treated as rate limiting when the
/// remaining count is known to be zero.
///
/// **BUG THIS CATCHES**: Would catch defaulting a missing header to 0, which
/// would turn every permission error into a retried rate limit.
#[test]
fn given_missing_or_invalid_headers_when_parsed_then_values_are_unknown() {
    // GIVEN
    let mut headers = HeaderMap::new();
    headers.insert(RATE_LIMIT_REMAINING_HEADER, HeaderValue::from_static("lots"));

    // WHEN
    let snapshot = RateLimitSnapshot::from_headers(&headers);

    // THEN
    assert!(snapshot.is_empty());
    assert!(!snapshot.is_exhausted());
    assert!(!snapshot.is_below(10));
    assert_eq!(snapshot.reset_display(), "an unknown time");
}

/// **VALUE**: Verifies an absurd reset header degrades to text instead of panicking.
///
/// **WHY THIS MATTERS**: The header comes straight from the network. A proxy
/// or a broken server can send any number, and the value is formatted while
/// building rate-limit errors and warnings.
///
/// **BUG THIS CATCHES**: Would catch unchecked `SystemTime` addition or
/// formatting a year past 9999 through humantime.
#[test]
fn given_out_of_range_reset_when_displayed_then_raw_epoch_is_shown() {
    // GIVEN: One value that overflows SystemTime, one past year 9999, one at the edge
    let overflow = RateLimitSnapshot {
        reset: Some(u64::MAX),
        ..RateLimitSnapshot::default()
    };
    let far_future = RateLimitSnapshot {
        reset: Some(300_000_000_000),
        ..RateLimitSnapshot::default()
    };
    let last_second = RateLimitSnapshot {
        reset: Some(253_402_300_799),
        ..RateLimitSnapshot::default()
    };

    // WHEN / THEN
    assert_eq!(overflow.reset_time(), None);
    assert_eq!(overflow.reset_display(), format!("epoch {}", u64::MAX));
    assert_eq!(far_future.reset_display(), "epoch 300000000000");
    assert_eq!(last_second.reset_display(), "9999-12-31T23:59:59Z");
}
