// Integration tests for repository-info and its optional extensions

use crate::helpers::{client_for, repository_json, request_count};

use github_core::error::{Operation, OperationError};
use github_core::github::{RepositoryExtension, RepositoryParams, get_repository};
use github_core::present::{Presented, format_repository};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_base(server: &MockServer) {
    let mut body = repository_json("tokio-rs/tokio", 27_000);
    body["license"] = json!({ "spdx_id": "MIT", "name": "MIT License" });
    body["topics"] = json!(["async", "rust"]);
    body["default_branch"] = json!("master");

    Mock::given(method("GET"))
        .and(path("/repos/tokio-rs/tokio"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn given_no_extensions_when_fetching_then_extension_fields_are_omitted() {
    // GIVEN
    let server = MockServer::start().await;
    mount_base(&server).await;

    // WHEN
    let info = get_repository(
        &client_for(&server),
        &RepositoryParams::new("tokio-rs", "tokio"),
        None,
    )
    .await
    .expect("fetch succeeds");

    // THEN: Only the base request was made, and the JSON has no extension keys
    assert_eq!(info.full_name, "tokio-rs/tokio");
    assert_eq!(info.license.as_deref(), Some("MIT"));
    assert_eq!(info.topics, ["async", "rust"]);
    assert_eq!(request_count(&server).await, 1);

    let json = serde_json::to_value(&info).expect("serializes");
    for key in ["readme", "languages", "contributors", "latest_release"] {
        assert!(json.get(key).is_none(), "{key} should be omitted");
    }
    assert!(json.get("some_new_upstream_field").is_none());
}

/// **VALUE**: Verifies every extension is fetched and reshaped.
///
/// **WHY THIS MATTERS**: These are the fields an agent uses to answer "what
/// is this project written in and who maintains it".
///
/// **BUG THIS CATCHES**: Would catch an extension being silently skipped or
/// decoded incorrectly (e.g. README left as base64).
#[tokio::test]
async fn given_all_extensions_when_fetching_then_each_is_populated() {
    // GIVEN
    let server = MockServer::start().await;
    mount_base(&server).await;
    Mock::given(method("GET"))
        .and(path("/repos/tokio-rs/tokio/readme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "encoding": "base64",
            "content": BASE64.encode("# Tokio\nA runtime.")
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/tokio-rs/tokio/languages"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "Shell": 250, "Rust": 750 })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/tokio-rs/tokio/contributors"))
        .and(query_param("per_page", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "login": "carllerche", "contributions": 900, "html_url": "https://github.com/carllerche" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/tokio-rs/tokio/releases/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tag_name": "tokio-1.49.0",
            "name": "Tokio v1.49.0",
            "published_at": "2025-12-01T00:00:00Z",
            "html_url": "https://github.com/tokio-rs/tokio/releases/tag/tokio-1.49.0"
        })))
        .mount(&server)
        .await;

    // WHEN
    let params = RepositoryParams::new("tokio-rs", "tokio").with_include(RepositoryExtension::ALL);
    let info = get_repository(&client_for(&server), &params, None)
        .await
        .expect("fetch succeeds");

    // THEN
    assert_eq!(info.readme, Some(Some("# Tokio\nA runtime.".to_string())));
    let languages = info.languages.as_ref().expect("languages requested");
    assert_eq!(languages[0].name, "Rust");
    assert_eq!(languages[0].percentage, 75.0);
    assert_eq!(info.contributors.as_ref().map(Vec::len), Some(1));
    let release = info.latest_release.clone().flatten().expect("release present");
    assert_eq!(release.tag_name, "tokio-1.49.0");
    assert_eq!(request_count(&server).await, 5);

    let presented = Presented::new(info, format_repository);
    assert!(presented.formatted.contains("Rust: 75.0%"));
    assert!(presented.formatted.contains("Latest release: tokio-1.49.0"));
}

/// **VALUE**: Verifies "no releases" is an explicit `null`, not an error.
///
/// **WHY THIS MATTERS**: Most repositories never publish a release; GitHub
/// answers 404 for them. That must not fail the whole call.
///
/// **BUG THIS CATCHES**: Would catch the 404 propagating, or the key being
/// dropped so consumers cannot tell "not requested" from "none".
#[tokio::test]
async fn given_no_releases_when_release_requested_then_latest_release_is_null() {
    // GIVEN
    let server = MockServer::start().await;
    mount_base(&server).await;
    Mock::given(method("GET"))
        .and(path("/repos/tokio-rs/tokio/releases/latest"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
        .mount(&server)
        .await;

    // WHEN
    let params = RepositoryParams::new("tokio-rs", "tokio")
        .with_include([RepositoryExtension::Release]);
    let info = get_repository(&client_for(&server), &params, None)
        .await
        .expect("fetch succeeds");

    // THEN
    assert_eq!(info.latest_release, Some(None));
    let json = serde_json::to_value(&info).expect("serializes");
    assert_eq!(json.get("latest_release"), Some(&Value::Null));
}

/// **VALUE**: Verifies extension failures are isolated from the main result.
///
/// **WHY THIS MATTERS**: Losing the language breakdown to a transient 500
/// should not cost the user the repository summary they asked for.
///
/// **BUG THIS CATCHES**: Would catch an extension error being propagated with `?`.
#[tokio::test]
async fn given_failing_extension_when_fetching_then_result_degrades_to_empty() {
    // GIVEN
    let server = MockServer::start().await;
    mount_base(&server).await;
    Mock::given(method("GET"))
        .and(path("/repos/tokio-rs/tokio/languages"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/tokio-rs/tokio/readme"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    // WHEN
    let params = RepositoryParams::new("tokio-rs", "tokio")
        .with_include([RepositoryExtension::Languages, RepositoryExtension::Readme]);
    let info = get_repository(&client_for(&server), &params, None)
        .await
        .expect("base fetch still succeeds");

    // THEN
    assert_eq!(info.languages, Some(Vec::new()));
    assert_eq!(info.readme, Some(None));
    assert_eq!(info.stars, 27_000);
}

#[tokio::test]
async fn given_missing_repository_when_fetching_then_no_extension_requests_are_made() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/o/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
        .mount(&server)
        .await;

    // WHEN
    let params = RepositoryParams::new("o", "nope").with_include(RepositoryExtension::ALL);
    let error = get_repository(&client_for(&server), &params, None)
        .await
        .expect_err("404");

    // THEN
    assert!(matches!(
        error,
        OperationError::Request {
            operation: Operation::RepositoryInfo,
            ..
        }
    ));
    assert!(error.to_string().starts_with("Failed to get repository info: Not Found"));
    assert!(error.client_error().is_some_and(|e| e.is_not_found()));
    assert_eq!(request_count(&server).await, 1);
}
