// Integration tests for the search operation

use crate::helpers::{client_for, repository_json, request_count};

use github_core::error::{Operation, OperationError};
use github_core::github::{SearchItems, SearchParams, SearchType, search};

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// **VALUE**: Verifies that server total and returned count are reported separately.
///
/// **WHY THIS MATTERS**: An agent asked "how many Rust HTTP clients are
/// there" must answer with GitHub's total, not with the page size.
///
/// **BUG THIS CATCHES**: Would catch `total_count` being overwritten with the
/// number of items in the response.
#[tokio::test]
async fn given_large_result_set_when_searching_with_limit_then_total_and_showing_differ() {
    // GIVEN: GitHub reports 1208 matches and returns a page of 5
    let server = MockServer::start().await;
    let items: Vec<_> = (0..5)
        .map(|i| repository_json(&format!("owner/http-{i}"), 100 - i))
        .collect();
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(query_param("q", "http client language:rust"))
        .and(query_param("per_page", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 1208,
            "incomplete_results": false,
            "items": items
        })))
        .expect(1)
        .mount(&server)
        .await;

    // WHEN
    let params =
        SearchParams::new("http client language:rust", SearchType::Repositories).with_limit(5);
    let result = search(&client_for(&server), &params, None)
        .await
        .expect("search succeeds");

    // THEN
    assert_eq!(result.total_count, 1208);
    assert_eq!(result.showing, 5);
    match &result.items {
        SearchItems::Repositories(repos) => {
            assert_eq!(repos[0].full_name, "owner/http-0");
            assert_eq!(repos[0].stars, 100);
            assert_eq!(repos[0].language.as_deref(), Some("Rust"));
        }
        other => panic!("expected repositories, got {other:?}"),
    }
}

#[tokio::test]
async fn given_user_search_with_sort_when_searching_then_sort_and_order_sent() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/users"))
        .and(query_param("sort", "followers"))
        .and(query_param("order", "desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 1,
            "items": [{ "login": "torvalds", "type": "User", "html_url": "https://github.com/torvalds" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    // WHEN
    let params = SearchParams::new("linus", SearchType::Users).with_sort("followers");
    let result = search(&client_for(&server), &params, None)
        .await
        .expect("search succeeds");

    // THEN
    assert!(matches!(&result.items, SearchItems::Users(users) if users[0].login == "torvalds"));
    assert!(!result.incomplete_results);
}

#[tokio::test]
async fn given_code_search_when_searching_then_hits_carry_repository_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 2,
            "items": [{
                "name": "lib.rs",
                "path": "src/lib.rs",
                "html_url": "https://github.com/o/r/blob/main/src/lib.rs",
                "repository": { "full_name": "o/r" }
            }]
        })))
        .mount(&server)
        .await;

    let result = search(
        &client_for(&server),
        &SearchParams::new("fn main", SearchType::Code),
        None,
    )
    .await
    .expect("search succeeds");

    assert_eq!(result.total_count, 2);
    assert_eq!(result.showing, 1);
    assert!(matches!(&result.items, SearchItems::Code(hits) if hits[0].repository == "o/r"));
}

/// **VALUE**: Verifies input validation happens before any HTTP call.
///
/// **WHY THIS MATTERS**: Rejected input must not spend rate-limit budget.
///
/// **BUG THIS CATCHES**: Would catch validation being moved after the request.
#[tokio::test]
async fn given_out_of_range_limit_when_searching_then_invalid_input_and_no_request() {
    // GIVEN
    let server = MockServer::start().await;

    // WHEN
    let params = SearchParams::new("x", SearchType::Repositories).with_limit(31);
    let error = search(&client_for(&server), &params, None)
        .await
        .expect_err("limit rejected");

    // THEN
    assert!(matches!(error, OperationError::InvalidInput { .. }));
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn given_upstream_422_when_searching_then_error_names_the_operation() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Validation Failed",
            "errors": [{ "resource": "Search", "field": "q", "code": "invalid" }]
        })))
        .mount(&server)
        .await;

    // WHEN
    let error = search(
        &client_for(&server),
        &SearchParams::new("stars:>>", SearchType::Repositories),
        None,
    )
    .await
    .expect_err("422");

    // THEN
    assert!(matches!(
        error,
        OperationError::Request {
            operation: Operation::Search,
            ..
        }
    ));
    assert!(
        error
            .to_string()
            .starts_with("Failed to search GitHub: Validation Failed: Validation Failed: Search.q invalid")
    );
}
