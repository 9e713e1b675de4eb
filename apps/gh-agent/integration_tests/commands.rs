// Integration tests for command dispatch against a mock GitHub

use crate::helpers::{TEST_TOKEN, command, test_config};

use gh_agent::commands::execute;
use gh_agent::error::AppError;

use github_core::error::{OperationError, ToolError};

use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_user(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": "octocat",
            "name": "The Octocat",
            "type": "User",
            "html_url": "https://github.com/octocat",
            "public_repos": 8,
            "followers": 20000,
            "following": 9
        })))
        .mount(server)
        .await;
}

/// **VALUE**: Verifies `--json` switches between text and the structured record.
///
/// **WHY THIS MATTERS**: Humans read the text; scripts parse the JSON. Both
/// must come from the same fetch and carry the same facts.
///
/// **BUG THIS CATCHES**: Would catch the flag being ignored, or the JSON
/// losing the `formatted` field.
#[tokio::test]
async fn given_user_command_when_executed_then_text_or_json_is_printed() {
    // GIVEN
    let server = MockServer::start().await;
    mount_user(&server).await;
    let config = test_config(&server);

    // WHEN
    let text = execute(command(&["gh-agent", "user", "octocat"]), &config, false)
        .await
        .expect("text output");
    let json = execute(command(&["gh-agent", "user", "octocat"]), &config, true)
        .await
        .expect("json output");

    // THEN
    assert!(text.contains("The Octocat"), "{text}");
    let value: Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(value["login"], "octocat");
    assert_eq!(value["followers"], 20000);
    assert_eq!(value["formatted"], text);
}

#[tokio::test]
async fn given_search_command_when_executed_then_query_options_reach_github() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(query_param("q", "http client"))
        .and(query_param("sort", "stars"))
        .and(query_param("order", "desc"))
        .and(query_param("per_page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 0,
            "items": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    // WHEN
    let output = execute(
        command(&["gh-agent", "search", "http client", "--sort", "stars", "--limit", "2"]),
        &test_config(&server),
        false,
    )
    .await
    .expect("search succeeds");

    // THEN
    assert!(output.starts_with("Found 0 repositories for \"http client\""), "{output}");
    assert!(output.ends_with("No results."), "{output}");
}

#[tokio::test]
async fn given_invalid_sort_when_executed_then_operation_input_error_and_no_request() {
    let server = MockServer::start().await;

    let error = execute(
        command(&["gh-agent", "search", "x", "--type", "code", "--sort", "stars"]),
        &test_config(&server),
        false,
    )
    .await
    .expect_err("sort rejected");

    assert!(matches!(error, AppError::Operation(OperationError::InvalidInput { .. })));
    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn given_missing_repository_when_executed_then_error_names_the_operation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/o/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
        .mount(&server)
        .await;

    let error = execute(command(&["gh-agent", "repo", "o", "gone"]), &test_config(&server), false)
        .await
        .expect_err("404");

    assert!(error.to_string().starts_with("Failed to get repository info: Not Found"));
}

#[tokio::test]
async fn given_tools_command_when_executed_then_definitions_are_listed_as_json() {
    let server = MockServer::start().await;

    let output = execute(command(&["gh-agent", "tools"]), &test_config(&server), false)
        .await
        .expect("tools listed");

    let definitions: Value = serde_json::from_str(&output).expect("valid json");
    let ids: Vec<&str> = definitions
        .as_array()
        .expect("array of definitions")
        .iter()
        .filter_map(|definition| definition["id"].as_str())
        .collect();
    assert_eq!(
        ids,
        ["get_repository", "get_system_metrics", "get_user", "list_issues", "search_github"]
    );
}

/// **VALUE**: Verifies `invoke` runs tools exactly as an agent framework would.
///
/// **WHY THIS MATTERS**: It is the manual way to reproduce what a model saw,
/// so the credential and the input must reach the tool unchanged.
///
/// **BUG THIS CATCHES**: Would catch the configured token not being placed in
/// the tool context, or `--json` not returning the full tool output.
#[tokio::test]
async fn given_invoke_command_when_executed_then_tool_output_is_printed() {
    // GIVEN
    let server = MockServer::start().await;
    mount_user(&server).await;
    let config = test_config(&server);
    let args = ["gh-agent", "invoke", "get_user", r#"{"username":"octocat"}"#];

    // WHEN
    let text = execute(command(&args), &config, false).await.expect("text output");
    let json = execute(command(&args), &config, true).await.expect("json output");

    // THEN
    assert!(text.contains("The Octocat"), "{text}");
    let value: Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(value["login"], "octocat");
    assert_eq!(value["formatted"], text);
}

#[tokio::test]
async fn given_unknown_tool_when_invoked_then_tool_error() {
    let server = MockServer::start().await;

    let error = execute(
        command(&["gh-agent", "invoke", "delete_repository"]),
        &test_config(&server),
        false,
    )
    .await
    .expect_err("unknown tool");

    assert!(matches!(error, AppError::Tool(ToolError::UnknownTool { .. })));
}

#[tokio::test]
async fn given_metrics_command_when_executed_then_local_snapshot_is_reported() {
    let server = MockServer::start().await;

    let output = execute(command(&["gh-agent", "metrics"]), &test_config(&server), true)
        .await
        .expect("probe succeeds");

    let value: Value = serde_json::from_str(&output).expect("valid json");
    assert!(value["cpu_count"].as_u64().is_some_and(|count| count > 0));
    assert!(value["formatted"].as_str().is_some_and(|text| text.contains("Memory:")));
}
