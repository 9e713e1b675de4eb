use crate::client::{GithubClient, RequestOptions};
use crate::endpoint::Endpoint;
use crate::error::{Operation, OperationError};
use crate::github::{check_limit, check_required};

use common::RedactedToken;

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MAX_ISSUES_LIMIT: u32 = 50;
pub const DEFAULT_ISSUES_LIMIT: u32 = 10;
const ISSUES_DIRECTION: &str = "desc";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    #[default]
    Open,
    Closed,
    All,
}

impl IssueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueState::Open => "open",
            IssueState::Closed => "closed",
            IssueState::All => "all",
        }
    }
}

impl Display for IssueState {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for IssueState {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(IssueState::Open),
            "closed" => Ok(IssueState::Closed),
            "all" => Ok(IssueState::All),
            _ => Err(format!("unknown issue state '{value}' (expected open, closed or all)")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSort {
    #[default]
    Created,
    Updated,
    Comments,
}

impl IssueSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueSort::Created => "created",
            IssueSort::Updated => "updated",
            IssueSort::Comments => "comments",
        }
    }
}

impl Display for IssueSort {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for IssueSort {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "created" => Ok(IssueSort::Created),
            "updated" => Ok(IssueSort::Updated),
            "comments" => Ok(IssueSort::Comments),
            _ => Err(format!(
                "unknown issue sort '{value}' (expected created, updated or comments)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListIssuesParams {
    pub owner: String,
    pub repo: String,
    pub state: IssueState,
    pub sort: IssueSort,
    pub labels: Vec<String>,
    pub limit: u32,
}

impl ListIssuesParams {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            state: IssueState::default(),
            sort: IssueSort::default(),
            labels: Vec::new(),
            limit: DEFAULT_ISSUES_LIMIT,
        }
    }

    pub fn with_state(mut self, state: IssueState) -> Self {
        self.state = state;
        self
    }

    pub fn with_sort(mut self, sort: IssueSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_labels(mut self, labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.labels.extend(labels.into_iter().map(Into::into));
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    #[track_caller]
    pub fn validate(&self) -> Result<(), OperationError> {
        check_required("owner", &self.owner)?;
        check_required("repo", &self.repo)?;
        check_limit(self.limit, MAX_ISSUES_LIMIT)
    }

    pub(crate) fn endpoint(&self) -> Endpoint {
        let labels: Vec<&str> = self
            .labels
            .iter()
            .map(|label| label.trim())
            .filter(|label| !label.is_empty())
            .collect();

        Endpoint::new(["repos", self.owner.as_str(), self.repo.as_str(), "issues"])
            .param("state", self.state)
            .param("sort", self.sort)
            .param("direction", ISSUES_DIRECTION)
            .param("per_page", self.limit)
            .param_opt("labels", (!labels.is_empty()).then(|| labels.join(",")))
    }
}

// ============================================
// OUTPUT
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueSummary {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub author: Option<String>,
    pub labels: Vec<String>,
    pub comments: u64,
    pub url: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub closed_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueList {
    /// `owner/repo`
    pub repository: String,
    pub state: IssueState,
    /// Issues returned after pull requests were filtered out.
    pub total: usize,
    pub issues: Vec<IssueSummary>,
}

// ============================================
// UPSTREAM SHAPES
// ============================================

#[derive(Debug, Default, Deserialize)]
struct RawUser {
    #[serde(default)]
    login: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawLabel {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawIssue {
    #[serde(default)]
    number: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    user: Option<RawUser>,
    #[serde(default)]
    labels: Vec<RawLabel>,
    #[serde(default)]
    comments: u64,
    #[serde(default)]
    html_url: String,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    closed_at: Option<String>,
    /// Present only when the item is a pull request.
    #[serde(default)]
    pull_request: Option<Value>,
}

impl RawIssue {
    fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

impl From<RawIssue> for IssueSummary {
    fn from(raw: RawIssue) -> Self {
        Self {
            number: raw.number,
            title: raw.title,
            state: raw.state,
            author: raw.user.map(|user| user.login).filter(|login| !login.is_empty()),
            labels: raw
                .labels
                .into_iter()
                .map(|label| label.name)
                .filter(|name| !name.is_empty())
                .collect(),
            comments: raw.comments,
            url: raw.html_url,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            closed_at: raw.closed_at,
        }
    }
}

// ============================================
// OPERATION
// ============================================

/// List a repository's issues, excluding pull requests.
///
/// GitHub's issues endpoint mixes pull requests into the page, so `total`
/// can be smaller than `limit` even when more issues exist.
pub async fn list_issues(
    client: &GithubClient,
    params: &ListIssuesParams,
    credential: Option<&RedactedToken>,
) -> Result<IssueList, OperationError> {
    params.validate()?;

    debug!(
        "Listing {} issues for {}/{} (sort {}, labels {:?}, limit {})",
        params.state, params.owner, params.repo, params.sort, params.labels, params.limit
    );

    let raw: Option<Vec<RawIssue>> = client
        .request_json(params.endpoint(), RequestOptions::get(credential))
        .await
        .map_err(|e| OperationError::request(Operation::IssueListing, e))?;

    let raw = raw.unwrap_or_default();
    let fetched = raw.len();

    let issues: Vec<IssueSummary> = raw
        .into_iter()
        .filter(|issue| !issue.is_pull_request())
        .take(params.limit as usize)
        .map(IssueSummary::from)
        .collect();

    debug!(
        "Kept {} issues, dropped {} pull requests",
        issues.len(),
        fetched - issues.len().min(fetched)
    );

    Ok(IssueList {
        repository: format!("{}/{}", params.owner, params.repo),
        state: params.state,
        total: issues.len(),
        issues,
    })
}
