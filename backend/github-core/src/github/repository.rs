use crate::client::{GithubClient, RequestOptions};
use crate::endpoint::Endpoint;
use crate::error::{GithubClientError, Operation, OperationError};
use crate::github::{check_required, non_empty, optional_extension};

use common::RedactedToken;

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FormatResult};
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use futures_util::future::OptionFuture;
use log::debug;
use serde::{Deserialize, Serialize};

/// README text beyond this many characters is cut off.
pub const README_MAX_CHARS: usize = 5_000;
pub const CONTRIBUTORS_LIMIT: u32 = 10;
const README_TRUNCATION_MARKER: &str = "\n\n[README truncated]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryExtension {
    Readme,
    Languages,
    Contributors,
    Release,
}

impl RepositoryExtension {
    pub const ALL: [RepositoryExtension; 4] = [
        RepositoryExtension::Readme,
        RepositoryExtension::Languages,
        RepositoryExtension::Contributors,
        RepositoryExtension::Release,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RepositoryExtension::Readme => "readme",
            RepositoryExtension::Languages => "languages",
            RepositoryExtension::Contributors => "contributors",
            RepositoryExtension::Release => "release",
        }
    }
}

impl Display for RepositoryExtension {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for RepositoryExtension {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        RepositoryExtension::ALL
            .into_iter()
            .find(|ext| ext.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| {
                format!("unknown repository extension '{value}' (expected readme, languages, contributors or release)")
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryParams {
    pub owner: String,
    pub repo: String,
    pub include: Vec<RepositoryExtension>,
}

impl RepositoryParams {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            include: Vec::new(),
        }
    }

    pub fn with_include(mut self, include: impl IntoIterator<Item = RepositoryExtension>) -> Self {
        self.include.extend(include);
        self
    }

    pub fn wants(&self, extension: RepositoryExtension) -> bool {
        self.include.contains(&extension)
    }

    #[track_caller]
    pub fn validate(&self) -> Result<(), OperationError> {
        check_required("owner", &self.owner)?;
        check_required("repo", &self.repo)
    }

    pub(crate) fn base(&self) -> Endpoint {
        Endpoint::new(["repos", self.owner.as_str(), self.repo.as_str()])
    }
}

// ============================================
// OUTPUT
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageShare {
    pub name: String,
    pub bytes: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contributor {
    pub login: String,
    pub contributions: u64,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Release {
    pub tag_name: String,
    pub name: Option<String>,
    pub published_at: Option<String>,
    pub url: String,
}

/// Repository summary plus any requested extensions.
///
/// Extension fields are omitted entirely when not requested. When requested,
/// `readme` and `latest_release` are `null` if GitHub has none (or the fetch
/// failed) and the list fields are empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositoryInfo {
    pub full_name: String,
    pub owner: String,
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    pub homepage: Option<String>,
    pub language: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    pub watchers: u64,
    pub default_branch: String,
    pub topics: Vec<String>,
    pub license: Option<String>,
    pub archived: bool,
    pub fork: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub pushed_at: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub readme: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<LanguageShare>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributors: Option<Vec<Contributor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_release: Option<Option<Release>>,
}

// ============================================
// UPSTREAM SHAPES
// ============================================

#[derive(Debug, Default, Deserialize)]
struct RawOwner {
    #[serde(default)]
    login: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawLicense {
    #[serde(default)]
    spdx_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRepository {
    #[serde(default)]
    full_name: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    owner: RawOwner,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    html_url: String,
    #[serde(default)]
    homepage: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    open_issues_count: u64,
    #[serde(default)]
    subscribers_count: Option<u64>,
    #[serde(default)]
    watchers_count: u64,
    #[serde(default)]
    default_branch: String,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    license: Option<RawLicense>,
    #[serde(default)]
    archived: bool,
    #[serde(default)]
    fork: bool,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    pushed_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawReadme {
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: String,
}

#[derive(Debug, Deserialize)]
struct RawContributor {
    #[serde(default)]
    login: String,
    #[serde(default)]
    contributions: u64,
    #[serde(default)]
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct RawRelease {
    #[serde(default)]
    tag_name: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    html_url: String,
}

impl From<RawRepository> for RepositoryInfo {
    fn from(raw: RawRepository) -> Self {
        let license = raw.license.and_then(|license| {
            non_empty(license.spdx_id)
                .filter(|id| id != "NOASSERTION")
                .or(non_empty(license.name))
        });

        Self {
            full_name: raw.full_name,
            owner: raw.owner.login,
            name: raw.name,
            description: non_empty(raw.description),
            url: raw.html_url,
            homepage: non_empty(raw.homepage),
            language: non_empty(raw.language),
            stars: raw.stargazers_count,
            forks: raw.forks_count,
            open_issues: raw.open_issues_count,
            watchers: raw.subscribers_count.unwrap_or(raw.watchers_count),
            default_branch: raw.default_branch,
            topics: raw.topics,
            license,
            archived: raw.archived,
            fork: raw.fork,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            pushed_at: raw.pushed_at,
            readme: None,
            languages: None,
            contributors: None,
            latest_release: None,
        }
    }
}

impl From<RawContributor> for Contributor {
    fn from(raw: RawContributor) -> Self {
        Self {
            login: raw.login,
            contributions: raw.contributions,
            url: raw.html_url,
        }
    }
}

impl From<RawRelease> for Release {
    fn from(raw: RawRelease) -> Self {
        Self {
            tag_name: raw.tag_name,
            name: non_empty(raw.name),
            published_at: raw.published_at,
            url: raw.html_url,
        }
    }
}

/// Decode GitHub's base64 README payload, truncating very long files.
pub(crate) fn decode_readme(content: &str, encoding: &str) -> Option<String> {
    let text = if encoding.eq_ignore_ascii_case("base64") {
        let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = BASE64.decode(compact).ok()?;
        String::from_utf8_lossy(&bytes).into_owned()
    } else {
        content.to_string()
    };

    if text.chars().count() <= README_MAX_CHARS {
        return Some(text);
    }

    let truncated: String = text.chars().take(README_MAX_CHARS).collect();
    Some(format!("{truncated}{README_TRUNCATION_MARKER}"))
}

/// Language byte counts sorted largest first, with each share of the total.
pub(crate) fn language_shares(languages: BTreeMap<String, u64>) -> Vec<LanguageShare> {
    let total: u64 = languages.values().sum();
    let mut shares: Vec<LanguageShare> = languages
        .into_iter()
        .map(|(name, bytes)| LanguageShare {
            percentage: if total == 0 {
                0.0
            } else {
                ((bytes as f64 / total as f64) * 1000.0).round() / 10.0
            },
            name,
            bytes,
        })
        .collect();

    shares.sort_by(|a, b| b.bytes.cmp(&a.bytes).then_with(|| a.name.cmp(&b.name)));
    shares
}

// ============================================
// FETCHES
// ============================================

async fn fetch_readme(
    client: &GithubClient,
    params: &RepositoryParams,
    credential: Option<&RedactedToken>,
) -> Result<Option<String>, GithubClientError> {
    let readme: Option<RawReadme> = match client
        .request_json(params.base().segment("readme"), RequestOptions::get(credential))
        .await
    {
        Ok(readme) => readme,
        Err(e) if e.is_not_found() => None,
        Err(e) => return Err(e),
    };

    Ok(readme.and_then(|readme| decode_readme(&readme.content, &readme.encoding)))
}

async fn fetch_languages(
    client: &GithubClient,
    params: &RepositoryParams,
    credential: Option<&RedactedToken>,
) -> Result<Vec<LanguageShare>, GithubClientError> {
    let languages: Option<BTreeMap<String, u64>> = client
        .request_json(params.base().segment("languages"), RequestOptions::get(credential))
        .await?;

    Ok(language_shares(languages.unwrap_or_default()))
}

async fn fetch_contributors(
    client: &GithubClient,
    params: &RepositoryParams,
    credential: Option<&RedactedToken>,
) -> Result<Vec<Contributor>, GithubClientError> {
    let endpoint = params
        .base()
        .segment("contributors")
        .param("per_page", CONTRIBUTORS_LIMIT);

    // Empty repositories answer 204.
    let contributors: Option<Vec<RawContributor>> = client
        .request_json(endpoint, RequestOptions::get(credential))
        .await?;

    Ok(contributors
        .unwrap_or_default()
        .into_iter()
        .take(CONTRIBUTORS_LIMIT as usize)
        .map(Contributor::from)
        .collect())
}

async fn fetch_latest_release(
    client: &GithubClient,
    params: &RepositoryParams,
    credential: Option<&RedactedToken>,
) -> Result<Option<Release>, GithubClientError> {
    let endpoint = params.base().segment("releases").segment("latest");

    match client
        .request_json::<Option<RawRelease>>(endpoint, RequestOptions::get(credential))
        .await
    {
        Ok(release) => Ok(release.map(Release::from)),
        Err(e) if e.is_not_found() => {
            debug!("{}/{} has no published releases", params.owner, params.repo);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

// ============================================
// OPERATION
// ============================================

/// Fetch a repository and any requested extensions.
///
/// # Errors
///
/// * [`OperationError::InvalidInput`] - owner or repo missing
/// * [`OperationError::Request`] - the repository request itself failed
pub async fn get_repository(
    client: &GithubClient,
    params: &RepositoryParams,
    credential: Option<&RedactedToken>,
) -> Result<RepositoryInfo, OperationError> {
    params.validate()?;

    debug!(
        "Fetching repository {}/{} (include: {:?})",
        params.owner, params.repo, params.include
    );

    let raw: RawRepository = client
        .request_json(params.base(), RequestOptions::get(credential))
        .await
        .map_err(|e| OperationError::request(Operation::RepositoryInfo, e))?;

    let mut info = RepositoryInfo::from(raw);
    let operation = Operation::RepositoryInfo;

    let readme = OptionFuture::from(params.wants(RepositoryExtension::Readme).then(|| {
        optional_extension(operation, "readme", fetch_readme(client, params, credential))
    }));
    let languages = OptionFuture::from(params.wants(RepositoryExtension::Languages).then(|| {
        optional_extension(operation, "languages", fetch_languages(client, params, credential))
    }));
    let contributors = OptionFuture::from(params.wants(RepositoryExtension::Contributors).then(|| {
        optional_extension(operation, "contributors", fetch_contributors(client, params, credential))
    }));
    let release = OptionFuture::from(params.wants(RepositoryExtension::Release).then(|| {
        optional_extension(operation, "release", fetch_latest_release(client, params, credential))
    }));

    let (readme, languages, contributors, release) =
        tokio::join!(readme, languages, contributors, release);

    info.readme = readme.map(Option::flatten);
    info.languages = languages.map(Option::unwrap_or_default);
    info.contributors = contributors.map(Option::unwrap_or_default);
    info.latest_release = release.map(Option::flatten);

    Ok(info)
}
