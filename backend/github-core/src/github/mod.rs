//! Read-only GitHub domain operations.
//!
//! Each operation validates its input before touching the network, issues
//! one mandatory request for the base resource, then (only if that worked)
//! runs the requested extension fetches concurrently. An extension failure
//! is logged and degrades to an empty or absent value; a base failure is
//! returned as [`OperationError::Request`](crate::error::OperationError).
//!
//! Upstream payloads are decoded into private `Raw*` records with defaults
//! filled at the boundary, then reshaped into the public output records.
//! Unknown upstream fields are dropped.

pub mod issues;
pub mod repository;
pub mod search;
pub mod user;

pub use issues::{IssueList, IssueSort, IssueState, IssueSummary, ListIssuesParams, list_issues};
pub use repository::{
    Contributor, LanguageShare, Release, RepositoryExtension, RepositoryInfo, RepositoryParams,
    get_repository,
};
pub use search::{CodeHit, SearchItems, SearchParams, SearchResult, SearchType, UserHit, search};
pub use user::{Organization, UserExtension, UserParams, UserProfile, get_user};

use crate::error::{GithubClientError, Operation, OperationError};

use std::future::Future;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Repository summary shared by search results and user profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryHit {
    pub full_name: String,
    pub description: Option<String>,
    pub url: String,
    pub language: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawRepositoryHit {
    #[serde(default)]
    full_name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    html_url: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    open_issues_count: u64,
    #[serde(default)]
    updated_at: Option<String>,
}

impl From<RawRepositoryHit> for RepositoryHit {
    fn from(raw: RawRepositoryHit) -> Self {
        Self {
            full_name: raw.full_name,
            description: non_empty(raw.description),
            url: raw.html_url,
            language: non_empty(raw.language),
            stars: raw.stargazers_count,
            forks: raw.forks_count,
            open_issues: raw.open_issues_count,
            updated_at: raw.updated_at,
        }
    }
}

/// GitHub sends `""` for many unset profile fields; treat those as absent.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Inclusive bound check used by every operation that takes a `limit`.
#[track_caller]
pub(crate) fn check_limit(limit: u32, max: u32) -> Result<(), OperationError> {
    if !(1..=max).contains(&limit) {
        return Err(OperationError::invalid_input(format!(
            "limit must be between 1 and {max}, got {limit}"
        )));
    }
    Ok(())
}

#[track_caller]
pub(crate) fn check_required(name: &str, value: &str) -> Result<(), OperationError> {
    if value.trim().is_empty() {
        return Err(OperationError::invalid_input(format!("{name} is required")));
    }
    Ok(())
}

/// Run an optional sub-fetch, logging and swallowing its failure.
pub(crate) async fn optional_extension<T, Fut>(
    operation: Operation,
    extension: &str,
    fetch: Fut,
) -> Option<T>
where
    Fut: Future<Output = Result<T, GithubClientError>>,
{
    debug!("Fetching '{extension}' extension for {operation}");

    match fetch.await {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(
                "Optional '{extension}' fetch for {operation} failed ({}), leaving it empty: {e}",
                e.error_category()
            );
            None
        }
    }
}
