// Integration tests for the tool registry and adapters

use crate::helpers::{TEST_TOKEN, client_for, repository_json, request_count, test_token};

use github_core::error::ToolError;
use github_core::tools::{ToolContext, ToolRegistry};

use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn registry_for(server: &MockServer) -> ToolRegistry {
    ToolRegistry::with_defaults(client_for(server))
}

#[tokio::test]
async fn given_default_registry_when_listing_then_all_tools_are_defined() {
    // GIVEN
    let server = MockServer::start().await;

    // WHEN
    let definitions = registry_for(&server).definitions();

    // THEN
    let ids: Vec<&str> = definitions.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(
        ids,
        ["get_repository", "get_system_metrics", "get_user", "list_issues", "search_github"]
    );
    for definition in &definitions {
        assert_eq!(definition.input_schema["type"], "object", "{}", definition.id);
        assert!(definition.output_schema["properties"]["formatted"].is_object());
        assert!(!definition.description.is_empty());
    }
}

/// **VALUE**: Verifies the declared input constraints match what is enforced.
///
/// **WHY THIS MATTERS**: Frameworks show the schema to the model. If the
/// schema says 30 but the code accepts 100, the model learns the wrong limit.
///
/// **BUG THIS CATCHES**: Would catch the schema and validation drifting apart.
#[tokio::test]
async fn given_tool_schemas_when_inspected_then_limits_and_enums_are_declared() {
    let server = MockServer::start().await;
    let registry = registry_for(&server);

    let search = registry.get("search_github").expect("registered").input_schema();
    let issues = registry.get("list_issues").expect("registered").input_schema();

    assert_eq!(search["properties"]["limit"]["minimum"], 1);
    assert_eq!(search["properties"]["limit"]["maximum"], 30);
    assert_eq!(search["properties"]["type"]["enum"], json!(["repositories", "users", "code"]));
    assert_eq!(search["required"], json!(["query"]));
    assert_eq!(issues["properties"]["limit"]["maximum"], 50);
    assert_eq!(issues["properties"]["state"]["enum"], json!(["open", "closed", "all"]));
}

#[tokio::test]
async fn given_unknown_tool_id_when_invoked_then_unknown_tool_error() {
    let server = MockServer::start().await;

    let error = registry_for(&server)
        .invoke("delete_repository", &ToolContext::default(), json!({}))
        .await
        .expect_err("not registered");

    assert!(matches!(error, ToolError::UnknownTool { ref id, .. } if id == "delete_repository"));
}

/// **VALUE**: Verifies bad tool input is rejected before any request.
///
/// **WHY THIS MATTERS**: Model-generated input is often slightly wrong. It
/// must come back as an input error the model can correct, without spending
/// the rate limit.
///
/// **BUG THIS CATCHES**: Would catch out-of-range limits or bad enum values
/// being forwarded to GitHub.
#[tokio::test]
async fn given_invalid_inputs_when_invoked_then_invalid_input_and_no_request() {
    // GIVEN
    let server = MockServer::start().await;
    let registry = registry_for(&server);
    let ctx = ToolContext::default();
    let cases: [(&str, Value); 6] = [
        ("search_github", json!({ "query": "x", "limit": 31 })),
        ("search_github", json!({ "query": "x", "limit": 0 })),
        ("search_github", json!({ "query": "x", "type": "issues" })),
        ("search_github", json!({ "limit": 5 })),
        ("list_issues", json!({ "owner": "o", "repo": "r", "limit": 51 })),
        ("get_repository", json!({ "owner": "o", "repo": "r", "include": ["stars"] })),
    ];

    for (id, input) in cases {
        // WHEN
        let error = registry
            .invoke(id, &ctx, input.clone())
            .await
            .expect_err("input rejected");

        // THEN
        assert!(
            matches!(error, ToolError::InvalidInput { .. }),
            "{id} {input}: {error}"
        );
        assert!(error.is_input_error());
    }
    assert_eq!(request_count(&server).await, 0);
}

/// **VALUE**: Verifies the tool result is the presented record, passed through unmodified.
///
/// **WHY THIS MATTERS**: The framework renders `formatted` and may read
/// individual fields; both must be present at the top level.
///
/// **BUG THIS CATCHES**: Would catch the adapter returning only the text or
/// only the data, or dropping the credential on the way to the client.
#[tokio::test]
async fn given_valid_search_input_when_invoked_then_returns_data_and_formatted_text() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(query_param("q", "tokio"))
        .and(query_param("per_page", "2"))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 77,
            "items": [repository_json("tokio-rs/tokio", 27_000), repository_json("a/b", 3)]
        })))
        .expect(1)
        .mount(&server)
        .await;
    let ctx = ToolContext::new(Some(test_token()));

    // WHEN
    let output = registry_for(&server)
        .invoke("search_github", &ctx, json!({ "query": "tokio", "limit": 2 }))
        .await
        .expect("invocation succeeds");

    // THEN
    assert_eq!(output["total_count"], 77);
    assert_eq!(output["showing"], 2);
    assert_eq!(output["items"][0]["full_name"], "tokio-rs/tokio");
    let formatted = output["formatted"].as_str().expect("formatted text");
    assert!(formatted.starts_with("Found 77 repositories for \"tokio\" (showing 2)"));
}

#[tokio::test]
async fn given_upstream_failure_when_invoked_then_operation_error_is_returned() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/nobody"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let error = registry_for(&server)
        .invoke("get_user", &ToolContext::default(), json!({ "username": "nobody" }))
        .await
        .expect_err("404");

    assert!(matches!(error, ToolError::Operation(_)));
    assert!(!error.is_input_error());
    assert!(error.to_string().starts_with("Failed to get user info"));
}

#[tokio::test]
async fn given_metrics_tool_when_invoked_then_reports_local_machine() {
    let server = MockServer::start().await;

    let output = registry_for(&server)
        .invoke("get_system_metrics", &ToolContext::default(), Value::Null)
        .await
        .expect("probe succeeds");

    assert!(output["cpu_count"].as_u64().is_some_and(|count| count > 0));
    assert!(output["total_memory_bytes"].as_u64().is_some());
    assert!(output["formatted"].as_str().is_some_and(|text| text.contains("Memory:")));
    assert_eq!(request_count(&server).await, 0);
}
