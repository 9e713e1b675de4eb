// Unit tests for argument parsing

use crate::cli::{Cli, Command};

use github_core::github::{IssueSort, IssueState, RepositoryExtension, SearchType, UserExtension};

use clap::Parser;
use clap::error::ErrorKind;

#[test]
fn given_search_without_options_when_parsed_then_defaults_apply() {
    // GIVEN / WHEN
    let cli = Cli::try_parse_from(["gh-agent", "search", "tokio"]).expect("parses");

    // THEN
    assert!(!cli.json);
    assert!(!cli.debug);
    assert!(cli.config.is_none());
    match cli.command {
        Command::Search(args) => {
            assert_eq!(args.query, "tokio");
            assert_eq!(args.search_type, SearchType::Repositories);
            assert_eq!(args.sort, None);
            assert_eq!(args.limit, 10);
        }
        other => panic!("expected search, got {other:?}"),
    }
}

/// **VALUE**: Verifies comma-separated flags split into typed lists.
///
/// **WHY THIS MATTERS**: `--include readme,languages` is the documented way
/// to ask for extensions; a single unsplit string would be rejected.
///
/// **BUG THIS CATCHES**: Would catch `value_delimiter` being dropped.
#[test]
fn given_comma_separated_include_when_parsed_then_split_into_extensions() {
    // GIVEN / WHEN
    let repo = Cli::try_parse_from(["gh-agent", "repo", "o", "r", "--include", "readme,Languages"])
        .expect("parses");
    let user = Cli::try_parse_from(["gh-agent", "user", "octocat", "--include", "repos,orgs"])
        .expect("parses");

    // THEN
    match repo.command {
        Command::Repo(args) => assert_eq!(
            args.include,
            [RepositoryExtension::Readme, RepositoryExtension::Languages]
        ),
        other => panic!("expected repo, got {other:?}"),
    }
    match user.command {
        Command::User(args) => assert_eq!(args.include, UserExtension::ALL),
        other => panic!("expected user, got {other:?}"),
    }
}

#[test]
fn given_issue_filters_when_parsed_then_state_sort_and_labels_are_typed() {
    let cli = Cli::try_parse_from([
        "gh-agent", "issues", "o", "r", "--state", "closed", "--sort", "comments", "--labels",
        "bug,help wanted", "--limit", "25",
    ])
    .expect("parses");

    match cli.command {
        Command::Issues(args) => {
            assert_eq!(args.state, IssueState::Closed);
            assert_eq!(args.sort, IssueSort::Comments);
            assert_eq!(args.labels, ["bug", "help wanted"]);
            assert_eq!(args.limit, 25);
        }
        other => panic!("expected issues, got {other:?}"),
    }
}

#[test]
fn given_global_flags_after_subcommand_when_parsed_then_they_apply() {
    let cli = Cli::try_parse_from(["gh-agent", "metrics", "--json", "--debug", "--config", "a.toml"])
        .expect("parses");

    assert!(cli.json);
    assert!(cli.debug);
    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("a.toml")));
    assert!(matches!(cli.command, Command::Metrics));
}

/// **VALUE**: Verifies the exit-code contract for parse outcomes.
///
/// **WHY THIS MATTERS**: `main` exits 0 when clap says the error is not for
/// stderr (help, version) and 1 otherwise. Scripts depend on that.
///
/// **BUG THIS CATCHES**: Would catch help being reported as a failure, or an
/// unknown command or bad enum value being accepted.
#[test]
fn given_help_or_bad_arguments_when_parsed_then_error_kind_decides_exit_code() {
    // GIVEN / WHEN
    let help = Cli::try_parse_from(["gh-agent", "--help"]).expect_err("help short-circuits");
    let unknown = Cli::try_parse_from(["gh-agent", "delete"]).expect_err("unknown command");
    let bad_type =
        Cli::try_parse_from(["gh-agent", "search", "x", "--type", "issues"]).expect_err("bad type");
    let missing = Cli::try_parse_from(["gh-agent", "repo", "only-owner"]).expect_err("missing repo");

    // THEN
    assert_eq!(help.kind(), ErrorKind::DisplayHelp);
    assert!(!help.use_stderr());
    for error in [unknown, bad_type, missing] {
        assert!(error.use_stderr(), "{error}");
    }
}

#[test]
fn given_invoke_without_input_when_parsed_then_input_is_none() {
    let cli = Cli::try_parse_from(["gh-agent", "invoke", "get_system_metrics"]).expect("parses");

    match cli.command {
        Command::Invoke(args) => {
            assert_eq!(args.tool, "get_system_metrics");
            assert_eq!(args.input, None);
        }
        other => panic!("expected invoke, got {other:?}"),
    }
}
