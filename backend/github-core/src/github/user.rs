use crate::GITHUB_WEB_BASE_URL;
use crate::client::{GithubClient, RequestOptions};
use crate::endpoint::Endpoint;
use crate::error::{GithubClientError, Operation, OperationError};
use crate::github::{RawRepositoryHit, RepositoryHit, check_required, non_empty, optional_extension};

use common::RedactedToken;

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::str::FromStr;

use futures_util::future::OptionFuture;
use log::debug;
use serde::{Deserialize, Serialize};

pub const TOP_REPOSITORIES_LIMIT: usize = 5;
/// One page of owned repositories is ranked to pick the top entries.
const OWNED_REPOSITORIES_PAGE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserExtension {
    Repos,
    Orgs,
}

impl UserExtension {
    pub const ALL: [UserExtension; 2] = [UserExtension::Repos, UserExtension::Orgs];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserExtension::Repos => "repos",
            UserExtension::Orgs => "orgs",
        }
    }
}

impl Display for UserExtension {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for UserExtension {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        UserExtension::ALL
            .into_iter()
            .find(|ext| ext.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("unknown user extension '{value}' (expected repos or orgs)"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserParams {
    pub username: String,
    pub include: Vec<UserExtension>,
}

impl UserParams {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            include: Vec::new(),
        }
    }

    pub fn with_include(mut self, include: impl IntoIterator<Item = UserExtension>) -> Self {
        self.include.extend(include);
        self
    }

    pub fn wants(&self, extension: UserExtension) -> bool {
        self.include.contains(&extension)
    }

    #[track_caller]
    pub fn validate(&self) -> Result<(), OperationError> {
        check_required("username", &self.username)
    }

    pub(crate) fn base(&self) -> Endpoint {
        Endpoint::new(["users", self.username.as_str()])
    }
}

// ============================================
// OUTPUT
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Organization {
    pub login: String,
    pub description: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub login: String,
    pub name: Option<String>,
    pub account_type: String,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub blog: Option<String>,
    pub email: Option<String>,
    pub twitter_username: Option<String>,
    pub url: String,
    pub avatar_url: Option<String>,
    pub public_repos: u64,
    pub public_gists: u64,
    pub followers: u64,
    pub following: u64,
    pub created_at: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_repositories: Option<Vec<RepositoryHit>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizations: Option<Vec<Organization>>,
}

// ============================================
// UPSTREAM SHAPES
// ============================================

#[derive(Debug, Deserialize)]
struct RawUser {
    #[serde(default)]
    login: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "type")]
    account_type: String,
    #[serde(default)]
    bio: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    blog: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    twitter_username: Option<String>,
    #[serde(default)]
    html_url: String,
    #[serde(default)]
    avatar_url: Option<String>,
    #[serde(default)]
    public_repos: u64,
    #[serde(default)]
    public_gists: u64,
    #[serde(default)]
    followers: u64,
    #[serde(default)]
    following: u64,
    #[serde(default)]
    created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawOrganization {
    #[serde(default)]
    login: String,
    #[serde(default)]
    description: Option<String>,
}

impl From<RawUser> for UserProfile {
    fn from(raw: RawUser) -> Self {
        Self {
            login: raw.login,
            name: non_empty(raw.name),
            account_type: raw.account_type,
            bio: non_empty(raw.bio),
            company: non_empty(raw.company),
            location: non_empty(raw.location),
            blog: non_empty(raw.blog),
            email: non_empty(raw.email),
            twitter_username: non_empty(raw.twitter_username),
            url: raw.html_url,
            avatar_url: non_empty(raw.avatar_url),
            public_repos: raw.public_repos,
            public_gists: raw.public_gists,
            followers: raw.followers,
            following: raw.following,
            created_at: raw.created_at,
            top_repositories: None,
            organizations: None,
        }
    }
}

impl From<RawOrganization> for Organization {
    fn from(raw: RawOrganization) -> Self {
        // The orgs listing only carries API urls.
        let url = format!("{GITHUB_WEB_BASE_URL}/{}", raw.login);
        Self {
            login: raw.login,
            description: non_empty(raw.description),
            url,
        }
    }
}

/// Highest-starred repositories first, ties broken by name.
pub(crate) fn top_by_stars(mut repositories: Vec<RepositoryHit>, limit: usize) -> Vec<RepositoryHit> {
    repositories.sort_by(|a, b| {
        b.stars
            .cmp(&a.stars)
            .then_with(|| a.full_name.cmp(&b.full_name))
    });
    repositories.truncate(limit);
    repositories
}

// ============================================
// FETCHES
// ============================================

async fn fetch_top_repositories(
    client: &GithubClient,
    params: &UserParams,
    credential: Option<&RedactedToken>,
) -> Result<Vec<RepositoryHit>, GithubClientError> {
    let endpoint = params
        .base()
        .segment("repos")
        .param("type", "owner")
        .param("sort", "updated")
        .param("per_page", OWNED_REPOSITORIES_PAGE);

    let raw: Option<Vec<RawRepositoryHit>> = client
        .request_json(endpoint, RequestOptions::get(credential))
        .await?;

    let repositories = raw
        .unwrap_or_default()
        .into_iter()
        .map(RepositoryHit::from)
        .collect();

    Ok(top_by_stars(repositories, TOP_REPOSITORIES_LIMIT))
}

async fn fetch_organizations(
    client: &GithubClient,
    params: &UserParams,
    credential: Option<&RedactedToken>,
) -> Result<Vec<Organization>, GithubClientError> {
    let raw: Option<Vec<RawOrganization>> = client
        .request_json(params.base().segment("orgs"), RequestOptions::get(credential))
        .await?;

    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(Organization::from)
        .collect())
}

// ============================================
// OPERATION
// ============================================

/// Fetch a user profile, plus top repositories and organizations on request.
///
/// # Errors
///
/// * [`OperationError::InvalidInput`] - username missing
/// * [`OperationError::Request`] - the profile request failed (404 for unknown users)
pub async fn get_user(
    client: &GithubClient,
    params: &UserParams,
    credential: Option<&RedactedToken>,
) -> Result<UserProfile, OperationError> {
    params.validate()?;

    debug!("Fetching user {} (include: {:?})", params.username, params.include);

    let raw: RawUser = client
        .request_json(params.base(), RequestOptions::get(credential))
        .await
        .map_err(|e| OperationError::request(Operation::UserInfo, e))?;

    let mut profile = UserProfile::from(raw);
    let operation = Operation::UserInfo;

    let repositories = OptionFuture::from(params.wants(UserExtension::Repos).then(|| {
        optional_extension(operation, "repos", fetch_top_repositories(client, params, credential))
    }));
    let organizations = OptionFuture::from(params.wants(UserExtension::Orgs).then(|| {
        optional_extension(operation, "orgs", fetch_organizations(client, params, credential))
    }));

    let (repositories, organizations) = tokio::join!(repositories, organizations);

    profile.top_repositories = repositories.map(Option::unwrap_or_default);
    profile.organizations = organizations.map(Option::unwrap_or_default);

    Ok(profile)
}
