// End-to-end: config file → logger → command

use gh_agent::cli::Cli;
use gh_agent::error::AppError;
use gh_agent::run;

use clap::Parser;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// **VALUE**: Verifies `--config` is honoured by the whole pipeline.
///
/// **WHY THIS MATTERS**: Pointing the tool at GitHub Enterprise is done
/// through the config file; if `run` ignored it, requests would go to github.com.
///
/// **BUG THIS CATCHES**: Would catch `run` building its client from defaults.
#[tokio::test]
async fn given_config_file_when_running_then_requests_go_to_configured_base_url() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/o/r/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().expect("temp dir");
    let config_path = dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        format!("api_base_url = \"{}\"\ntimeout_ms = 2000\n", server.uri()),
    )
    .expect("config written");
    let config_arg = config_path.to_string_lossy().into_owned();

    // WHEN
    let cli = Cli::try_parse_from(["gh-agent", "issues", "o", "r", "--config", &config_arg])
        .expect("arguments parse");
    let output = run(cli).await.expect("run succeeds");

    // THEN
    assert!(output.starts_with("0 open issues in o/r"), "{output}");
}

#[tokio::test]
async fn given_missing_config_file_when_running_then_config_error() {
    let cli = Cli::try_parse_from([
        "gh-agent",
        "metrics",
        "--config",
        "/nonexistent/gh-agent/config.toml",
    ])
    .expect("arguments parse");

    let error = run(cli).await.expect_err("missing file");

    assert!(matches!(error, AppError::Config(_)));
}
