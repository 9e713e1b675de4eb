// Integration tests for issue listing

use crate::helpers::client_for;

use github_core::github::{IssueSort, IssueState, ListIssuesParams, list_issues};

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn issue(number: u64, title: &str) -> Value {
    json!({
        "number": number,
        "title": title,
        "state": "open",
        "user": { "login": "octocat" },
        "labels": [{ "name": "bug" }],
        "comments": number,
        "html_url": format!("https://github.com/o/r/issues/{number}"),
        "created_at": "2024-01-01T00:00:00Z"
    })
}

/// **VALUE**: Verifies pull requests are dropped before counting.
///
/// **WHY THIS MATTERS**: GitHub's issues endpoint returns pull requests too.
/// Reporting them as issues inflates counts and confuses users.
///
/// **BUG THIS CATCHES**: Would catch the `pull_request` filter being removed,
/// or `total` being taken from the unfiltered page.
#[tokio::test]
async fn given_page_with_pull_requests_when_listing_then_only_issues_are_counted() {
    // GIVEN: Two issues and one pull request
    let server = MockServer::start().await;
    let mut pull = issue(3, "Add feature");
    pull["pull_request"] = json!({ "url": "https://api.github.com/repos/o/r/pulls/3" });
    Mock::given(method("GET"))
        .and(path("/repos/o/r/issues"))
        .and(query_param("state", "open"))
        .and(query_param("sort", "created"))
        .and(query_param("direction", "desc"))
        .and(query_param("per_page", "10"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([issue(1, "Crash"), pull, issue(2, "Typo")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    // WHEN
    let list = list_issues(&client_for(&server), &ListIssuesParams::new("o", "r"), None)
        .await
        .expect("listing succeeds");

    // THEN
    assert_eq!(list.total, 2);
    assert_eq!(list.repository, "o/r");
    let numbers: Vec<u64> = list.issues.iter().map(|i| i.number).collect();
    assert_eq!(numbers, [1, 2]);
    assert_eq!(list.issues[0].author.as_deref(), Some("octocat"));
    assert_eq!(list.issues[0].labels, ["bug"]);
}

#[tokio::test]
async fn given_filters_when_listing_then_state_sort_and_labels_sent() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/o/r/issues"))
        .and(query_param("state", "closed"))
        .and(query_param("sort", "updated"))
        .and(query_param("labels", "bug,help wanted"))
        .and(query_param("per_page", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    // WHEN
    let params = ListIssuesParams::new("o", "r")
        .with_state(IssueState::Closed)
        .with_sort(IssueSort::Updated)
        .with_labels(["bug", "help wanted"])
        .with_limit(50);
    let list = list_issues(&client_for(&server), &params, None)
        .await
        .expect("listing succeeds");

    // THEN
    assert_eq!(list.total, 0);
    assert_eq!(list.state, IssueState::Closed);
}

#[tokio::test]
async fn given_unknown_repository_when_listing_then_error_names_the_operation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/o/gone/issues"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let error = list_issues(&client_for(&server), &ListIssuesParams::new("o", "gone"), None)
        .await
        .expect_err("404");

    assert!(error.to_string().starts_with("Failed to list issues: Not Found"));
}
