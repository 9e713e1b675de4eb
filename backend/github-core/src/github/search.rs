use crate::client::{GithubClient, RequestOptions};
use crate::endpoint::Endpoint;
use crate::error::{GithubClientError, Operation, OperationError};
use crate::github::{RawRepositoryHit, RepositoryHit, check_limit, check_required};

use common::RedactedToken;

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

pub const MAX_SEARCH_LIMIT: u32 = 30;
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;
const SEARCH_ORDER: &str = "desc";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    #[default]
    Repositories,
    Users,
    Code,
}

impl SearchType {
    pub const ALL: [SearchType; 3] = [SearchType::Repositories, SearchType::Users, SearchType::Code];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Repositories => "repositories",
            SearchType::Users => "users",
            SearchType::Code => "code",
        }
    }

    /// Sort keys GitHub accepts for this search type.
    pub fn valid_sorts(&self) -> &'static [&'static str] {
        match self {
            SearchType::Repositories => &["stars", "forks", "help-wanted-issues", "updated"],
            SearchType::Users => &["followers", "repositories", "joined"],
            SearchType::Code => &["indexed"],
        }
    }
}

impl Display for SearchType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for SearchType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SearchType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("unknown search type '{value}' (expected repositories, users or code)"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub query: String,
    pub search_type: SearchType,
    pub sort: Option<String>,
    pub limit: u32,
}

impl SearchParams {
    pub fn new(query: impl Into<String>, search_type: SearchType) -> Self {
        Self {
            query: query.into(),
            search_type,
            sort: None,
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    #[track_caller]
    pub fn validate(&self) -> Result<(), OperationError> {
        check_required("query", &self.query)?;
        check_limit(self.limit, MAX_SEARCH_LIMIT)?;

        if let Some(sort) = &self.sort
            && !self.search_type.valid_sorts().contains(&sort.as_str())
        {
            return Err(OperationError::invalid_input(format!(
                "sort '{sort}' is not valid for {} search (expected one of: {})",
                self.search_type,
                self.search_type.valid_sorts().join(", ")
            )));
        }

        Ok(())
    }

    pub(crate) fn endpoint(&self) -> Endpoint {
        Endpoint::new(["search", self.search_type.as_str()])
            .param("q", &self.query)
            .param("per_page", self.limit)
            .param_opt("sort", self.sort.as_deref())
            .param_opt("order", self.sort.as_ref().map(|_| SEARCH_ORDER))
    }
}

// ============================================
// OUTPUT
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserHit {
    pub login: String,
    pub account_type: String,
    pub url: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeHit {
    pub name: String,
    pub path: String,
    pub repository: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SearchItems {
    Repositories(Vec<RepositoryHit>),
    Users(Vec<UserHit>),
    Code(Vec<CodeHit>),
}

impl SearchItems {
    pub fn len(&self) -> usize {
        match self {
            SearchItems::Repositories(items) => items.len(),
            SearchItems::Users(items) => items.len(),
            SearchItems::Code(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub search_type: SearchType,
    pub query: String,
    /// Matches GitHub reports on the server.
    pub total_count: u64,
    /// Items actually included in this result.
    pub showing: usize,
    pub incomplete_results: bool,
    pub items: SearchItems,
}

// ============================================
// UPSTREAM SHAPES
// ============================================

#[derive(Debug, Deserialize)]
struct RawSearchResponse<T> {
    #[serde(default)]
    total_count: u64,
    #[serde(default)]
    incomplete_results: bool,
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
struct RawUserHit {
    #[serde(default)]
    login: String,
    #[serde(default, rename = "type")]
    account_type: String,
    #[serde(default)]
    html_url: String,
    #[serde(default)]
    avatar_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCodeRepository {
    #[serde(default)]
    full_name: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawCodeHit {
    #[serde(default)]
    name: String,
    #[serde(default)]
    path: String,
    #[serde(default)]
    html_url: String,
    #[serde(default)]
    repository: RawCodeRepository,
}

impl From<RawUserHit> for UserHit {
    fn from(raw: RawUserHit) -> Self {
        Self {
            login: raw.login,
            account_type: raw.account_type,
            url: raw.html_url,
            avatar_url: raw.avatar_url,
        }
    }
}

impl From<RawCodeHit> for CodeHit {
    fn from(raw: RawCodeHit) -> Self {
        Self {
            name: raw.name,
            path: raw.path,
            repository: raw.repository.full_name,
            url: raw.html_url,
        }
    }
}

// ============================================
// OPERATION
// ============================================

/// Search repositories, users or code.
///
/// # Errors
///
/// * [`OperationError::InvalidInput`] - empty query, limit outside 1..=30, or a
///   sort key the search type does not support
/// * [`OperationError::Request`] - the search request failed
pub async fn search(
    client: &GithubClient,
    params: &SearchParams,
    credential: Option<&RedactedToken>,
) -> Result<SearchResult, OperationError> {
    params.validate()?;

    debug!(
        "Searching {} for '{}' (limit {})",
        params.search_type, params.query, params.limit
    );

    let endpoint = params.endpoint();
    let options = RequestOptions::get(credential);
    let limit = params.limit as usize;
    let wrap = |e: GithubClientError| OperationError::request(Operation::Search, e);

    let (total_count, incomplete_results, items) = match params.search_type {
        SearchType::Repositories => {
            let raw: RawSearchResponse<RawRepositoryHit> =
                client.request_json(endpoint, options).await.map_err(wrap)?;
            let items = raw.items.into_iter().take(limit).map(RepositoryHit::from).collect();
            (raw.total_count, raw.incomplete_results, SearchItems::Repositories(items))
        }
        SearchType::Users => {
            let raw: RawSearchResponse<RawUserHit> =
                client.request_json(endpoint, options).await.map_err(wrap)?;
            let items = raw.items.into_iter().take(limit).map(UserHit::from).collect();
            (raw.total_count, raw.incomplete_results, SearchItems::Users(items))
        }
        SearchType::Code => {
            let raw: RawSearchResponse<RawCodeHit> =
                client.request_json(endpoint, options).await.map_err(wrap)?;
            let items = raw.items.into_iter().take(limit).map(CodeHit::from).collect();
            (raw.total_count, raw.incomplete_results, SearchItems::Code(items))
        }
    };

    let showing = items.len();
    debug!("Search returned {showing} of {total_count} matches");

    Ok(SearchResult {
        search_type: params.search_type,
        query: params.query.clone(),
        total_count,
        showing,
        incomplete_results,
        items,
    })
}
