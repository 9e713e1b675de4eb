//! Command dispatch: each subcommand maps onto one domain operation or the tool registry.

use crate::cli::{Command, InvokeArgs, IssuesArgs, RepoArgs, SearchArgs, UserArgs};
use crate::error::AppError;

use common::ErrorLocation;

use github_core::github::{
    ListIssuesParams, RepositoryParams, SearchParams, UserParams, get_repository, get_user,
    list_issues, search,
};
use github_core::present::{
    Presented, format_issues, format_repository, format_search, format_system, format_user,
};
use github_core::system::probe;
use github_core::tools::{ToolContext, ToolRegistry};
use github_core::{AppConfig, GithubClient};

use std::panic::Location;

use log::debug;
use serde::Serialize;
use serde_json::Value;

/// Run one command and return what should be printed on stdout.
///
/// # Errors
///
/// Returns [`AppError`] for invalid input or any failed operation.
pub async fn execute(command: Command, config: &AppConfig, json: bool) -> Result<String, AppError> {
    let client = GithubClient::new(config)?;
    let credential = config.token.as_ref();

    match command {
        Command::Search(args) => {
            let params = search_params(args);
            debug!("Searching {} for {:?}", params.search_type, params.query);
            let result = search(&client, &params, credential).await?;
            render(Presented::new(result, format_search), json)
        }
        Command::Repo(args) => {
            let params = repository_params(args);
            let info = get_repository(&client, &params, credential).await?;
            render(Presented::new(info, format_repository), json)
        }
        Command::Issues(args) => {
            let params = issues_params(args);
            let list = list_issues(&client, &params, credential).await?;
            render(Presented::new(list, format_issues), json)
        }
        Command::User(args) => {
            let params = user_params(args);
            let profile = get_user(&client, &params, credential).await?;
            render(Presented::new(profile, format_user), json)
        }
        Command::Metrics => {
            let snapshot = probe().await;
            render(Presented::new(snapshot, format_system), json)
        }
        Command::Tools => {
            let registry = ToolRegistry::with_defaults(client);
            to_pretty_json(&registry.definitions())
        }
        Command::Invoke(args) => invoke(client, config, args, json).await,
    }
}

pub(crate) fn search_params(args: SearchArgs) -> SearchParams {
    let params = SearchParams::new(args.query, args.search_type).with_limit(args.limit);
    match args.sort {
        Some(sort) => params.with_sort(sort),
        None => params,
    }
}

pub(crate) fn repository_params(args: RepoArgs) -> RepositoryParams {
    RepositoryParams::new(args.owner, args.repo).with_include(args.include)
}

pub(crate) fn issues_params(args: IssuesArgs) -> ListIssuesParams {
    ListIssuesParams::new(args.owner, args.repo)
        .with_state(args.state)
        .with_sort(args.sort)
        .with_labels(args.labels)
        .with_limit(args.limit)
}

pub(crate) fn user_params(args: UserArgs) -> UserParams {
    UserParams::new(args.username).with_include(args.include)
}

async fn invoke(
    client: GithubClient,
    config: &AppConfig,
    args: InvokeArgs,
    json: bool,
) -> Result<String, AppError> {
    let input = parse_tool_input(args.input.as_deref())?;
    let registry = ToolRegistry::with_defaults(client);
    let ctx = ToolContext::new(config.token.clone());

    let output = registry.invoke(&args.tool, &ctx, input).await?;

    match output.get("formatted").and_then(Value::as_str) {
        Some(text) if !json => Ok(text.to_string()),
        _ => to_pretty_json(&output),
    }
}

/// Parse the optional JSON argument of `invoke`; absent or blank means `{}`.
#[track_caller]
pub(crate) fn parse_tool_input(raw: Option<&str>) -> Result<Value, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Value::Object(Default::default())),
        Some(text) => serde_json::from_str(text).map_err(|e| AppError::Input {
            message: format!("Tool input is not valid JSON: {e}"),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}

pub(crate) fn render<T: Serialize>(presented: Presented<T>, json: bool) -> Result<String, AppError> {
    if json {
        to_pretty_json(&presented)
    } else {
        Ok(presented.formatted)
    }
}

#[track_caller]
fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::App {
        message: format!("Failed to serialize output: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })
}
