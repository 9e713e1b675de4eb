use crate::client::GithubClient;
use crate::error::ToolError;
use crate::github::issues::{DEFAULT_ISSUES_LIMIT, MAX_ISSUES_LIMIT};
use crate::github::search::{DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT};
use crate::github::{
    IssueSort, IssueState, ListIssuesParams, RepositoryExtension, RepositoryParams, SearchParams,
    SearchType, UserExtension, UserParams, get_repository, get_user, list_issues, search,
};
use crate::present::{Presented, format_issues, format_repository, format_search, format_user};
use crate::tools::{Tool, ToolContext, input_error, parse_input, to_output};

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde::Deserialize;
use serde_json::{Value, json};

pub const SEARCH_TOOL_ID: &str = "search_github";
pub const REPOSITORY_TOOL_ID: &str = "get_repository";
pub const ISSUES_TOOL_ID: &str = "list_issues";
pub const USER_TOOL_ID: &str = "get_user";

fn default_search_limit() -> u32 {
    DEFAULT_SEARCH_LIMIT
}
fn default_issues_limit() -> u32 {
    DEFAULT_ISSUES_LIMIT
}

// ============================================
// search_github
// ============================================

#[derive(Debug, Deserialize)]
struct SearchInput {
    query: String,
    #[serde(default, rename = "type")]
    search_type: SearchType,
    #[serde(default)]
    sort: Option<String>,
    #[serde(default = "default_search_limit")]
    limit: u32,
}

pub struct SearchGithubTool {
    client: GithubClient,
}

impl SearchGithubTool {
    pub fn new(client: GithubClient) -> Self {
        Self { client }
    }
}

impl Tool for SearchGithubTool {
    fn id(&self) -> &'static str {
        SEARCH_TOOL_ID
    }

    fn description(&self) -> &'static str {
        "Search GitHub repositories, users or code. Reports the server-side total and how many results are shown."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "minLength": 1,
                    "description": "GitHub search query, qualifiers allowed (e.g. 'language:rust stars:>100')"
                },
                "type": {
                    "type": "string",
                    "enum": SearchType::ALL.map(|kind| kind.as_str()),
                    "default": SearchType::default().as_str()
                },
                "sort": {
                    "type": "string",
                    "description": "repositories: stars, forks, help-wanted-issues, updated; users: followers, repositories, joined; code: indexed"
                },
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": MAX_SEARCH_LIMIT,
                    "default": DEFAULT_SEARCH_LIMIT
                }
            },
            "required": ["query"]
        })
    }

    fn output_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "search_type": { "type": "string" },
                "query": { "type": "string" },
                "total_count": { "type": "integer" },
                "showing": { "type": "integer" },
                "incomplete_results": { "type": "boolean" },
                "items": { "type": "array" },
                "formatted": { "type": "string" }
            },
            "required": ["search_type", "query", "total_count", "showing", "items", "formatted"]
        })
    }

    fn invoke<'a>(
        &'a self,
        ctx: &'a ToolContext,
        input: Value,
    ) -> BoxFuture<'a, Result<Value, ToolError>> {
        async move {
            let input: SearchInput = parse_input(SEARCH_TOOL_ID, input)?;

            let mut params = SearchParams::new(input.query, input.search_type).with_limit(input.limit);
            params.sort = input.sort;
            params.validate().map_err(|e| input_error(SEARCH_TOOL_ID, e))?;

            let result = search(&self.client, &params, ctx.credential()).await?;
            to_output(&Presented::new(result, format_search))
        }
        .boxed()
    }
}

// ============================================
// get_repository
// ============================================

#[derive(Debug, Deserialize)]
struct RepositoryInput {
    owner: String,
    repo: String,
    #[serde(default)]
    include: Vec<RepositoryExtension>,
}

pub struct GetRepositoryTool {
    client: GithubClient,
}

impl GetRepositoryTool {
    pub fn new(client: GithubClient) -> Self {
        Self { client }
    }
}

impl Tool for GetRepositoryTool {
    fn id(&self) -> &'static str {
        REPOSITORY_TOOL_ID
    }

    fn description(&self) -> &'static str {
        "Get details about a GitHub repository, optionally with its README, languages, top contributors and latest release."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "owner": { "type": "string", "minLength": 1 },
                "repo": { "type": "string", "minLength": 1 },
                "include": {
                    "type": "array",
                    "items": {
                        "type": "string",
                        "enum": RepositoryExtension::ALL.map(|ext| ext.as_str())
                    },
                    "uniqueItems": true
                }
            },
            "required": ["owner", "repo"]
        })
    }

    fn output_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "full_name": { "type": "string" },
                "description": { "type": ["string", "null"] },
                "url": { "type": "string" },
                "language": { "type": ["string", "null"] },
                "stars": { "type": "integer" },
                "forks": { "type": "integer" },
                "open_issues": { "type": "integer" },
                "license": { "type": ["string", "null"] },
                "readme": { "type": ["string", "null"] },
                "languages": { "type": "array" },
                "contributors": { "type": "array" },
                "latest_release": { "type": ["object", "null"] },
                "formatted": { "type": "string" }
            },
            "required": ["full_name", "url", "stars", "forks", "formatted"]
        })
    }

    fn invoke<'a>(
        &'a self,
        ctx: &'a ToolContext,
        input: Value,
    ) -> BoxFuture<'a, Result<Value, ToolError>> {
        async move {
            let input: RepositoryInput = parse_input(REPOSITORY_TOOL_ID, input)?;

            let params = RepositoryParams::new(input.owner, input.repo).with_include(input.include);
            params.validate().map_err(|e| input_error(REPOSITORY_TOOL_ID, e))?;

            let info = get_repository(&self.client, &params, ctx.credential()).await?;
            to_output(&Presented::new(info, format_repository))
        }
        .boxed()
    }
}

// ============================================
// list_issues
// ============================================

#[derive(Debug, Deserialize)]
struct IssuesInput {
    owner: String,
    repo: String,
    #[serde(default)]
    state: IssueState,
    #[serde(default)]
    sort: IssueSort,
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default = "default_issues_limit")]
    limit: u32,
}

pub struct ListIssuesTool {
    client: GithubClient,
}

impl ListIssuesTool {
    pub fn new(client: GithubClient) -> Self {
        Self { client }
    }
}

impl Tool for ListIssuesTool {
    fn id(&self) -> &'static str {
        ISSUES_TOOL_ID
    }

    fn description(&self) -> &'static str {
        "List issues in a GitHub repository (pull requests excluded), filtered by state and labels."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "owner": { "type": "string", "minLength": 1 },
                "repo": { "type": "string", "minLength": 1 },
                "state": {
                    "type": "string",
                    "enum": ["open", "closed", "all"],
                    "default": IssueState::default().as_str()
                },
                "sort": {
                    "type": "string",
                    "enum": ["created", "updated", "comments"],
                    "default": IssueSort::default().as_str()
                },
                "labels": {
                    "type": "array",
                    "items": { "type": "string" }
                },
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": MAX_ISSUES_LIMIT,
                    "default": DEFAULT_ISSUES_LIMIT
                }
            },
            "required": ["owner", "repo"]
        })
    }

    fn output_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "repository": { "type": "string" },
                "state": { "type": "string" },
                "total": { "type": "integer" },
                "issues": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "number": { "type": "integer" },
                            "title": { "type": "string" },
                            "state": { "type": "string" },
                            "author": { "type": ["string", "null"] },
                            "labels": { "type": "array", "items": { "type": "string" } },
                            "comments": { "type": "integer" },
                            "url": { "type": "string" }
                        }
                    }
                },
                "formatted": { "type": "string" }
            },
            "required": ["repository", "state", "total", "issues", "formatted"]
        })
    }

    fn invoke<'a>(
        &'a self,
        ctx: &'a ToolContext,
        input: Value,
    ) -> BoxFuture<'a, Result<Value, ToolError>> {
        async move {
            let input: IssuesInput = parse_input(ISSUES_TOOL_ID, input)?;

            let params = ListIssuesParams::new(input.owner, input.repo)
                .with_state(input.state)
                .with_sort(input.sort)
                .with_labels(input.labels)
                .with_limit(input.limit);
            params.validate().map_err(|e| input_error(ISSUES_TOOL_ID, e))?;

            let list = list_issues(&self.client, &params, ctx.credential()).await?;
            to_output(&Presented::new(list, format_issues))
        }
        .boxed()
    }
}

// ============================================
// get_user
// ============================================

#[derive(Debug, Deserialize)]
struct UserInput {
    username: String,
    #[serde(default)]
    include: Vec<UserExtension>,
}

pub struct GetUserTool {
    client: GithubClient,
}

impl GetUserTool {
    pub fn new(client: GithubClient) -> Self {
        Self { client }
    }
}

impl Tool for GetUserTool {
    fn id(&self) -> &'static str {
        USER_TOOL_ID
    }

    fn description(&self) -> &'static str {
        "Get a GitHub user's profile, optionally with their top repositories by stars and their organizations."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "username": { "type": "string", "minLength": 1 },
                "include": {
                    "type": "array",
                    "items": {
                        "type": "string",
                        "enum": UserExtension::ALL.map(|ext| ext.as_str())
                    },
                    "uniqueItems": true
                }
            },
            "required": ["username"]
        })
    }

    fn output_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "login": { "type": "string" },
                "name": { "type": ["string", "null"] },
                "account_type": { "type": "string" },
                "bio": { "type": ["string", "null"] },
                "url": { "type": "string" },
                "public_repos": { "type": "integer" },
                "followers": { "type": "integer" },
                "following": { "type": "integer" },
                "top_repositories": { "type": "array" },
                "organizations": { "type": "array" },
                "formatted": { "type": "string" }
            },
            "required": ["login", "url", "formatted"]
        })
    }

    fn invoke<'a>(
        &'a self,
        ctx: &'a ToolContext,
        input: Value,
    ) -> BoxFuture<'a, Result<Value, ToolError>> {
        async move {
            let input: UserInput = parse_input(USER_TOOL_ID, input)?;

            let params = UserParams::new(input.username).with_include(input.include);
            params.validate().map_err(|e| input_error(USER_TOOL_ID, e))?;

            let profile = get_user(&self.client, &params, ctx.credential()).await?;
            to_output(&Presented::new(profile, format_user))
        }
        .boxed()
    }
}
