// Unit tests for argument-to-parameter mapping and output rendering

use crate::cli::{Cli, Command};
use crate::commands::{issues_params, parse_tool_input, render, search_params};
use crate::error::AppError;

use github_core::github::{IssueState, SearchType};
use github_core::present::Presented;

use clap::Parser;
use serde::Serialize;
use serde_json::{Value, json};

fn parse(args: &[&str]) -> Command {
    Cli::try_parse_from(args).expect("parses").command
}

#[test]
fn given_search_args_when_mapped_then_params_carry_sort_and_limit() {
    // GIVEN
    let Command::Search(args) =
        parse(&["gh-agent", "search", "linus", "--type", "users", "--sort", "followers", "--limit", "3"])
    else {
        panic!("expected search");
    };

    // WHEN
    let params = search_params(args);

    // THEN
    assert_eq!(params.search_type, SearchType::Users);
    assert_eq!(params.sort.as_deref(), Some("followers"));
    assert_eq!(params.limit, 3);
    assert!(params.validate().is_ok());
}

/// **VALUE**: Verifies CLI limits are validated by the same rules as tools.
///
/// **WHY THIS MATTERS**: clap accepts any u32; the range check lives in the
/// operation parameters, so the mapping must not bypass it.
///
/// **BUG THIS CATCHES**: Would catch the CLI clamping or dropping the limit.
#[test]
fn given_out_of_range_issue_limit_when_mapped_then_validation_rejects_it() {
    let Command::Issues(args) = parse(&["gh-agent", "issues", "o", "r", "--limit", "51"]) else {
        panic!("expected issues");
    };

    let params = issues_params(args);

    assert_eq!(params.state, IssueState::Open);
    assert!(params.validate().is_err());
}

#[test]
fn given_missing_or_blank_tool_input_when_parsed_then_empty_object() {
    assert_eq!(parse_tool_input(None).expect("empty input"), json!({}));
    assert_eq!(parse_tool_input(Some("  ")).expect("blank input"), json!({}));
    assert_eq!(
        parse_tool_input(Some(r#"{"username":"octocat"}"#)).expect("valid json"),
        json!({ "username": "octocat" })
    );
}

#[test]
fn given_malformed_tool_input_when_parsed_then_input_error() {
    let error = parse_tool_input(Some("{username: octocat}")).expect_err("not json");

    assert!(matches!(error, AppError::Input { .. }));
    assert!(error.to_string().starts_with("Input Error: Tool input is not valid JSON"));
}

#[derive(Serialize)]
struct Sample {
    name: &'static str,
    count: u32,
}

#[test]
fn given_presented_value_when_rendered_then_json_flag_selects_shape() {
    // GIVEN
    let make = || Presented::new(Sample { name: "tokio", count: 3 }, |s| format!("{} x{}", s.name, s.count));

    // WHEN
    let text = render(make(), false).expect("renders text");
    let json = render(make(), true).expect("renders json");

    // THEN
    assert_eq!(text, "tokio x3");
    let value: Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(value, json!({ "name": "tokio", "count": 3, "formatted": "tokio x3" }));
}
