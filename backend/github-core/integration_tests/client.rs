// Integration tests for GithubClient against a mock GitHub
// Covers headers, status classification, timeout, network failure and retry

use crate::helpers::{TEST_TOKEN, client_for, request_count, test_config, test_token};

use common::HttpStatusCode;
use github_core::client::{GITHUB_ACCEPT_HEADER_VALUE, GITHUB_API_VERSION};
use github_core::error::GithubClientError;
use github_core::{AppConfig, Endpoint, GithubClient, RequestOptions};

use std::net::TcpListener;
use std::time::Duration;

use reqwest::Method;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// **VALUE**: Verifies every request carries the fixed GitHub headers and a bearer token when given.
///
/// **WHY THIS MATTERS**: Without the media type and API-version headers
/// GitHub may serve a different payload shape. Without a User-Agent it
/// rejects the request outright.
///
/// **BUG THIS CATCHES**: Would catch a header being dropped during a refactor
/// of the request builder, or the token being sent in the wrong scheme.
#[tokio::test]
async fn given_credential_when_requesting_then_fixed_headers_and_bearer_token_sent() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .and(header("accept", GITHUB_ACCEPT_HEADER_VALUE))
        .and(header("x-github-api-version", GITHUB_API_VERSION))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "login": "octocat" })))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);
    let token = test_token();

    // WHEN
    let body = client
        .request("/users/octocat", RequestOptions::get(Some(&token)))
        .await
        .expect("request succeeds");

    // THEN
    assert_eq!(body, Some(json!({ "login": "octocat" })));
    let requests = server.received_requests().await.expect("recording enabled");
    let user_agent = requests[0]
        .headers
        .get("user-agent")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert!(user_agent.starts_with("gh-agent/"));
}

#[tokio::test]
async fn given_no_credential_when_requesting_then_authorization_header_absent() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rate_limit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    // WHEN
    client_for(&server)
        .request("/rate_limit", RequestOptions::default())
        .await
        .expect("request succeeds");

    // THEN
    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn given_204_when_requesting_then_returns_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/o/empty/contributors"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let body = client_for(&server)
        .request("/repos/o/empty/contributors", RequestOptions::default())
        .await
        .expect("request succeeds");

    assert_eq!(body, None);
}

#[tokio::test]
async fn given_write_method_with_body_when_requesting_then_json_body_sent() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/markdown"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "text": "**hi**" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    // WHEN
    let body = client_for(&server)
        .request(
            Endpoint::new(["markdown"]),
            RequestOptions::default()
                .with_method(Method::POST)
                .with_body(json!({ "text": "**hi**" })),
        )
        .await
        .expect("request succeeds");

    // THEN
    assert_eq!(body, Some(json!({ "ok": true })));
}

/// **VALUE**: Verifies classification of real HTTP responses, including headers.
///
/// **WHY THIS MATTERS**: The 403 split depends on a response header that only
/// exists on the wire, so it cannot be fully checked in a unit test.
///
/// **BUG THIS CATCHES**: Would catch the client ignoring rate-limit headers
/// when building the error.
#[tokio::test]
async fn given_403_with_exhausted_budget_when_requesting_then_rate_limited() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/code"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-limit", "60")
                .insert_header("x-ratelimit-remaining", "0")
                .insert_header("x-ratelimit-reset", "1700000000")
                .set_body_json(json!({ "message": "API rate limit exceeded" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/o/private"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-remaining", "4999")
                .set_body_json(json!({ "message": "Resource not accessible" })),
        )
        .mount(&server)
        .await;
    let client = client_for(&server);

    // WHEN
    let limited = client
        .request("/search/code", RequestOptions::default())
        .await
        .expect_err("403");
    let forbidden = client
        .request("/repos/o/private", RequestOptions::default())
        .await
        .expect_err("403");

    // THEN
    assert!(matches!(
        limited,
        GithubClientError::RateLimited {
            reset: Some(1_700_000_000),
            ..
        }
    ));
    assert!(forbidden.to_string().starts_with("Forbidden: Resource not accessible"));
}

#[tokio::test]
async fn given_401_when_requesting_then_invalid_credential_with_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Bad credentials" })),
        )
        .mount(&server)
        .await;

    let error = client_for(&server)
        .request("/user", RequestOptions::get(Some(&test_token())))
        .await
        .expect_err("401");

    assert_eq!(error.status_code(), HttpStatusCode(401));
    assert_eq!(error.message(), "Bad credentials");
    assert_eq!(error.payload(), Some(&json!({ "message": "Bad credentials" })));
}

/// **VALUE**: Verifies that a slow server becomes a 408 timeout error.
///
/// **WHY THIS MATTERS**: The per-call timeout is the only cancellation
/// mechanism. A hung request must end, and end as a retryable class.
///
/// **BUG THIS CATCHES**: Would catch the timeout not being applied to the
/// request, or timeouts being reported as generic network failures.
#[tokio::test]
async fn given_slow_response_when_timeout_elapses_then_timeout_error_408() {
    // GIVEN: A response delayed well past a 100 ms timeout
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(1_500)))
        .mount(&server)
        .await;
    let client = client_for(&server);

    // WHEN
    let error = client
        .request(
            "/slow",
            RequestOptions::default().with_timeout(Duration::from_millis(100)),
        )
        .await
        .expect_err("times out");

    // THEN
    assert!(matches!(error, GithubClientError::Timeout { timeout_ms: 100, .. }));
    assert_eq!(error.status_code(), HttpStatusCode::TIMEOUT);
    assert!(error.is_retryable());
}

#[tokio::test]
async fn given_nothing_listening_when_requesting_then_network_error_status_zero() {
    // GIVEN: A port that was free a moment ago
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let config = AppConfig {
        api_base_url: format!("http://127.0.0.1:{port}"),
        ..AppConfig::default()
    };
    let client = GithubClient::new(&config).expect("client builds");

    // WHEN
    let error = client
        .request("/users/octocat", RequestOptions::default())
        .await
        .expect_err("connection refused");

    // THEN
    assert!(matches!(error, GithubClientError::Network { .. }));
    assert_eq!(error.status_code(), HttpStatusCode::NETWORK);
    assert!(error.is_retryable());
}

/// **VALUE**: Verifies the retry wrapper end to end over HTTP.
///
/// **WHY THIS MATTERS**: GitHub returns sporadic 502/503s under load; two of
/// them in a row should still produce a result for the user.
///
/// **BUG THIS CATCHES**: Would catch the retry wrapper not re-sending the
/// request, or re-using a consumed request body.
#[tokio::test]
async fn given_two_503s_then_success_when_requesting_with_retry_then_succeeds_on_third_attempt() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/o/r"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/o/r"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "full_name": "o/r" })))
        .expect(1)
        .mount(&server)
        .await;

    // WHEN
    let body = client_for(&server)
        .request_with_retry("/repos/o/r", RequestOptions::default())
        .await
        .expect("third attempt succeeds");

    // THEN
    assert_eq!(body, Some(json!({ "full_name": "o/r" })));
    assert_eq!(request_count(&server).await, 3);
}

#[tokio::test]
async fn given_404_when_requesting_with_retry_then_single_attempt() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/o/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
        .expect(1)
        .mount(&server)
        .await;

    // WHEN
    let error = client_for(&server)
        .request_with_retry("/repos/o/missing", RequestOptions::default())
        .await
        .expect_err("404");

    // THEN
    assert!(error.is_not_found());
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn given_persistent_500_when_requesting_with_retry_then_gives_up_after_max_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let config = test_config(&server);

    let error = GithubClient::new(&config)
        .expect("client builds")
        .request_with_retry("/flaky", RequestOptions::default())
        .await
        .expect_err("always fails");

    assert_eq!(error.status_code(), HttpStatusCode(500));
    assert_eq!(request_count(&server).await, config.retry.max_attempts as usize);
}

#[tokio::test]
async fn given_absolute_url_target_when_requesting_then_used_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/elsewhere/thing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2])))
        .mount(&server)
        .await;
    let other_base = MockServer::start().await;

    let body = client_for(&other_base)
        .request(format!("{}/elsewhere/thing", server.uri()), RequestOptions::default())
        .await
        .expect("request succeeds");

    assert_eq!(body, Some(json!([1, 2])));
}
