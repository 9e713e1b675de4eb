//! Command-line arguments.

use github_core::github::issues::DEFAULT_ISSUES_LIMIT;
use github_core::github::search::DEFAULT_SEARCH_LIMIT;
use github_core::github::{IssueSort, IssueState, RepositoryExtension, SearchType, UserExtension};

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Read-only GitHub tools for agents, usable from the shell.
///
/// Set GITHUB_TOKEN for authenticated requests and a higher rate limit.
#[derive(Debug, Parser)]
#[command(name = "gh-agent", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Print structured JSON instead of formatted text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging.
    #[arg(long, global = true)]
    pub debug: bool,

    /// Path to a TOML config file.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search repositories, users or code.
    Search(SearchArgs),

    /// Show a repository, optionally with README, languages, contributors and latest release.
    Repo(RepoArgs),

    /// List issues of a repository (pull requests are excluded).
    Issues(IssuesArgs),

    /// Show a user profile, optionally with top repositories and organizations.
    User(UserArgs),

    /// Report CPU, memory and load of this machine.
    Metrics,

    /// Print the tool definitions as JSON.
    Tools,

    /// Invoke a tool by id with a JSON input object.
    Invoke(InvokeArgs),
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// GitHub search query, qualifiers included (e.g. "http client language:rust").
    pub query: String,

    /// What to search.
    #[arg(long = "type", value_name = "TYPE", default_value = "repositories")]
    pub search_type: SearchType,

    /// Sort field; valid values depend on the search type.
    #[arg(long)]
    pub sort: Option<String>,

    /// Number of results (1-30).
    #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
    pub limit: u32,
}

#[derive(Debug, Args)]
pub struct RepoArgs {
    pub owner: String,
    pub repo: String,

    /// Extensions to fetch: readme, languages, contributors, release.
    #[arg(long, value_delimiter = ',')]
    pub include: Vec<RepositoryExtension>,
}

#[derive(Debug, Args)]
pub struct IssuesArgs {
    pub owner: String,
    pub repo: String,

    #[arg(long, default_value = "open")]
    pub state: IssueState,

    #[arg(long, default_value = "created")]
    pub sort: IssueSort,

    /// Only issues carrying all of these labels.
    #[arg(long, value_delimiter = ',')]
    pub labels: Vec<String>,

    /// Number of issues (1-50).
    #[arg(long, default_value_t = DEFAULT_ISSUES_LIMIT)]
    pub limit: u32,
}

#[derive(Debug, Args)]
pub struct UserArgs {
    pub username: String,

    /// Extensions to fetch: repos, orgs.
    #[arg(long, value_delimiter = ',')]
    pub include: Vec<UserExtension>,
}

#[derive(Debug, Args)]
pub struct InvokeArgs {
    /// Tool id, as printed by `gh-agent tools`.
    pub tool: String,

    /// JSON object with the tool input. Omitted means `{}`.
    pub input: Option<String>,
}
