// Unit tests for the classified retry loop
// Sleeps are recorded instead of awaited so the schedule can be asserted exactly

use crate::client::{RateLimitSnapshot, RetryPolicy, classify_response, retry_classified};
use crate::error::GithubClientError;

use common::HttpStatusCode;

use std::cell::RefCell;
use std::future::{Ready, ready};
use std::time::Duration;

fn status_error(code: u16) -> GithubClientError {
    classify_response(HttpStatusCode(code), &RateLimitSnapshot::default(), "")
}

/// Records each requested delay and returns immediately.
fn recording_sleep(log: &RefCell<Vec<Duration>>) -> impl FnMut(Duration) -> Ready<()> + '_ {
    move |delay| {
        log.borrow_mut().push(delay);
        ready(())
    }
}

#[test]
fn given_default_policy_when_schedule_computed_then_doubles_from_one_second() {
    let policy = RetryPolicy::default();

    assert_eq!(policy.max_attempts, 3);
    assert_eq!(
        policy.delays(),
        vec![Duration::from_millis(1_000), Duration::from_millis(2_000)]
    );
}

#[test]
fn given_many_attempts_when_schedule_computed_then_delays_cap_at_max() {
    // GIVEN: Enough attempts to pass the 10s cap
    let policy = RetryPolicy::default().with_max_attempts(7);

    // WHEN
    let delays = policy.delays();

    // THEN: 1, 2, 4, 8, then capped at 10
    let millis: Vec<u128> = delays.iter().map(Duration::as_millis).collect();
    assert_eq!(millis, vec![1_000, 2_000, 4_000, 8_000, 10_000, 10_000]);
}

/// **VALUE**: Verifies the retry count and delay order on transient failures.
///
/// **WHY THIS MATTERS**: Two 503s then a success must cost exactly two waits,
/// the second no shorter than the first, and return the successful value.
///
/// **BUG THIS CATCHES**: Would catch sleeping before the first attempt, an
/// off-by-one in the attempt budget, or a non-increasing schedule.
#[tokio::test]
async fn given_two_server_errors_then_success_when_retried_then_sleeps_twice_and_succeeds() {
    // GIVEN: An operation that fails twice with 503
    let sleeps = RefCell::new(Vec::new());
    let attempts = RefCell::new(Vec::new());

    // WHEN
    let result = retry_classified(
        &RetryPolicy::default(),
        |attempt| {
            attempts.borrow_mut().push(attempt);
            ready(if attempt < 3 {
                Err(status_error(503))
            } else {
                Ok("done")
            })
        },
        recording_sleep(&sleeps),
    )
    .await;

    // THEN
    assert_eq!(result.expect("third attempt succeeds"), "done");
    assert_eq!(*attempts.borrow(), vec![1, 2, 3]);
    let sleeps = sleeps.into_inner();
    assert_eq!(sleeps.len(), 2);
    assert!(sleeps[1] >= sleeps[0]);
}

/// **VALUE**: Verifies that client errors are returned after a single attempt.
///
/// **WHY THIS MATTERS**: Retrying a 404 or 401 can never succeed and burns
/// rate-limit budget and wall-clock time.
///
/// **BUG THIS CATCHES**: Would catch retrying every error regardless of class.
#[tokio::test]
async fn given_non_retryable_errors_when_retried_then_no_retry_happens() {
    for code in [400, 401, 403, 404, 422] {
        // GIVEN
        let sleeps = RefCell::new(Vec::new());
        let calls = RefCell::new(0);

        // WHEN
        let result: Result<(), _> = retry_classified(
            &RetryPolicy::default(),
            |_| {
                *calls.borrow_mut() += 1;
                ready(Err(status_error(code)))
            },
            recording_sleep(&sleeps),
        )
        .await;

        // THEN
        let error = result.expect_err("fails");
        assert_eq!(error.status_code(), HttpStatusCode(code));
        assert_eq!(*calls.borrow(), 1, "status {code} must not be retried");
        assert!(sleeps.borrow().is_empty());
    }
}

#[tokio::test]
async fn given_persistent_timeouts_when_retried_then_last_error_after_max_attempts() {
    // GIVEN: Every attempt times out
    let sleeps = RefCell::new(Vec::new());
    let calls = RefCell::new(0);

    // WHEN
    let result: Result<(), _> = retry_classified(
        &RetryPolicy::default(),
        |attempt| {
            *calls.borrow_mut() += 1;
            ready(Err(GithubClientError::timeout(Duration::from_millis(
                u64::from(attempt) * 100,
            ))))
        },
        recording_sleep(&sleeps),
    )
    .await;

    // THEN: Three attempts, two waits, and the third attempt's error
    let error = result.expect_err("all attempts fail");
    assert!(matches!(error, GithubClientError::Timeout { timeout_ms: 300, .. }));
    assert_eq!(error.status_code(), HttpStatusCode::TIMEOUT);
    assert_eq!(*calls.borrow(), 3);
    assert_eq!(sleeps.borrow().len(), 2);
}

#[tokio::test]
async fn given_rate_limit_and_network_failures_when_retried_then_both_are_retryable() {
    let sleeps = RefCell::new(Vec::new());

    let result = retry_classified(
        &RetryPolicy::default(),
        |attempt| {
            ready(match attempt {
                1 => Err(status_error(429)),
                2 => Err(GithubClientError::network("connection refused")),
                _ => Ok(attempt),
            })
        },
        recording_sleep(&sleeps),
    )
    .await;

    assert_eq!(result.expect("recovers"), 3);
    assert_eq!(sleeps.borrow().len(), 2);
}

#[tokio::test]
async fn given_single_attempt_policy_when_retryable_failure_then_returns_immediately() {
    let sleeps = RefCell::new(Vec::new());

    let result: Result<(), _> = retry_classified(
        &RetryPolicy::default().with_max_attempts(1),
        |_| ready(Err(status_error(500))),
        recording_sleep(&sleeps),
    )
    .await;

    assert!(result.is_err());
    assert!(sleeps.borrow().is_empty());
}
