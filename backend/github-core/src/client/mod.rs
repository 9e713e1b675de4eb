//! Single-request GitHub REST client.
//!
//! Every call goes through [`GithubClient::request`]: it resolves the target,
//! attaches the fixed GitHub headers (plus `Authorization` when a credential
//! is supplied), enforces the per-call timeout, records the rate-limit
//! headers, and either returns the parsed JSON body or a classified
//! [`GithubClientError`]. Retrying is opt-in through
//! [`GithubClient::request_with_retry`].

pub mod classify;
pub mod rate_limit;
pub mod retry;

pub use classify::classify_response;
pub use rate_limit::RateLimitSnapshot;
pub use retry::{RetryPolicy, retry_classified};

use crate::config::AppConfig;
use crate::endpoint::Endpoint;
use crate::error::GithubClientError;

use common::{HttpStatusCode, RedactedToken};

use std::time::Duration;

use log::{debug, trace, warn};
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::sleep as TokioSleep;
use url::Url;

pub const GITHUB_ACCEPT_HEADER_VALUE: &str = "application/vnd.github+json";
pub const GITHUB_API_VERSION_HEADER_KEY: &str = "x-github-api-version";
pub const GITHUB_API_VERSION: &str = "2022-11-28";
pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);
pub const DEFAULT_RATE_LIMIT_WARNING_THRESHOLD: u32 = 10;
const NO_CONTENT_STATUS: u16 = 204;

/// Where a request goes: a structured endpoint under the base URL, or an
/// absolute URL used verbatim (e.g. a `url` field from a previous payload).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestTarget {
    Endpoint(Endpoint),
    Absolute(String),
}

impl From<Endpoint> for RequestTarget {
    fn from(endpoint: Endpoint) -> Self {
        RequestTarget::Endpoint(endpoint)
    }
}

impl From<&str> for RequestTarget {
    fn from(target: &str) -> Self {
        if target.starts_with("http://") || target.starts_with("https://") {
            RequestTarget::Absolute(target.to_string())
        } else {
            RequestTarget::Endpoint(Endpoint::parse(target))
        }
    }
}

impl From<String> for RequestTarget {
    fn from(target: String) -> Self {
        RequestTarget::from(target.as_str())
    }
}

/// Per-call request settings. Defaults to an unauthenticated GET with the
/// client's configured timeout.
#[derive(Debug, Clone)]
pub struct RequestOptions<'a> {
    pub method: Method,
    pub body: Option<Value>,
    pub credential: Option<&'a RedactedToken>,
    pub timeout: Option<Duration>,
}

impl Default for RequestOptions<'_> {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            credential: None,
            timeout: None,
        }
    }
}

impl<'a> RequestOptions<'a> {
    pub fn get(credential: Option<&'a RedactedToken>) -> Self {
        Self {
            credential,
            ..Self::default()
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

fn is_read_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

#[derive(Clone)]
pub struct GithubClient {
    base_url: Url,
    client: Client,
    user_agent: String,
    default_timeout: Duration,
    rate_limit_warning_threshold: u32,
    retry_policy: RetryPolicy,
}

impl GithubClient {
    pub fn new(config: &AppConfig) -> Result<Self, GithubClientError> {
        let base_url = Url::parse(&config.api_base_url).map_err(|e| {
            GithubClientError::invalid_url(format!("{}: {e}", config.api_base_url))
        })?;

        let client = Client::builder()
            .build()
            .map_err(|e| GithubClientError::network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            client,
            user_agent: config.user_agent.clone(),
            default_timeout: config.timeout(),
            rate_limit_warning_threshold: config.rate_limit_warning_threshold,
            retry_policy: config.retry_policy(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Absolute URLs are used verbatim; endpoints are joined to the base URL.
    #[track_caller]
    pub fn resolve(&self, target: &RequestTarget) -> Result<Url, GithubClientError> {
        match target {
            RequestTarget::Absolute(url) => Url::parse(url)
                .map_err(|e| GithubClientError::invalid_url(format!("{url}: {e}"))),
            RequestTarget::Endpoint(endpoint) => endpoint.resolve(&self.base_url),
        }
    }

    /// Issue one request.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Value))` - 2xx with a JSON body
    /// * `Ok(None)` - 204, or a 2xx with an empty body
    /// * `Err(GithubClientError)` - classified HTTP failure, timeout (408) or network failure (0)
    pub async fn request(
        &self,
        target: impl Into<RequestTarget>,
        options: RequestOptions<'_>,
    ) -> Result<Option<Value>, GithubClientError> {
        let url = self.resolve(&target.into())?;
        let timeout = options.timeout.unwrap_or(self.default_timeout);

        debug!("GitHub {} {}", options.method, url);

        let mut request = self
            .client
            .request(options.method.clone(), url.clone())
            .header(ACCEPT, GITHUB_ACCEPT_HEADER_VALUE)
            .header(GITHUB_API_VERSION_HEADER_KEY, GITHUB_API_VERSION)
            .header(USER_AGENT, self.user_agent.as_str())
            .timeout(timeout);

        if let Some(token) = options.credential {
            request = request.bearer_auth(token.as_str());
        }

        if let Some(body) = &options.body {
            if is_read_method(&options.method) {
                debug!("Ignoring request body for {} {}", options.method, url);
            } else {
                let bytes = serde_json::to_vec(body)
                    .map_err(|e| GithubClientError::json(0, format!("failed to encode body: {e}")))?;
                request = request.header(CONTENT_TYPE, JSON_CONTENT_TYPE).body(bytes);
            }
        }

        let response = request
            .send()
            .await
            .map_err(|e| GithubClientError::from_transport(&e, timeout))?;

        let status = HttpStatusCode(response.status().as_u16());
        let rate_limit = RateLimitSnapshot::from_headers(response.headers());
        self.observe_rate_limit(&rate_limit);

        if status.is_success() {
            if status.0 == NO_CONTENT_STATUS {
                trace!("GitHub {} {} returned no content", options.method, url);
                return Ok(None);
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|e| GithubClientError::from_transport(&e, timeout))?;

            if bytes.iter().all(u8::is_ascii_whitespace) {
                return Ok(None);
            }

            let json: Value = serde_json::from_slice(&bytes)
                .map_err(|e| GithubClientError::json(status.0, e.to_string()))?;

            return Ok(Some(json));
        }

        let body = response.text().await.unwrap_or_default();
        let error = classify_response(status, &rate_limit, &body);

        debug!(
            "GitHub {} {} failed: {} (status {})",
            options.method,
            url,
            error.error_category(),
            status
        );

        Err(error)
    }

    /// Issue one request and decode the body into `T`.
    ///
    /// A no-content response decodes from JSON `null`.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        target: impl Into<RequestTarget>,
        options: RequestOptions<'_>,
    ) -> Result<T, GithubClientError> {
        let value = self.request(target, options).await?.unwrap_or(Value::Null);
        serde_json::from_value(value).map_err(|e| GithubClientError::json(200, e.to_string()))
    }

    /// [`request`](Self::request) retried under the client's configured policy.
    pub async fn request_with_retry(
        &self,
        target: impl Into<RequestTarget>,
        options: RequestOptions<'_>,
    ) -> Result<Option<Value>, GithubClientError> {
        let policy = self.retry_policy;
        self.request_with_policy(target, options, &policy).await
    }

    /// [`request`](Self::request) retried under an explicit policy.
    ///
    /// Retries 5xx, timeouts, network failures and rate limiting (403 with an
    /// exhausted budget, 429); any other 4xx is returned after the first attempt.
    pub async fn request_with_policy(
        &self,
        target: impl Into<RequestTarget>,
        options: RequestOptions<'_>,
        policy: &RetryPolicy,
    ) -> Result<Option<Value>, GithubClientError> {
        let target = target.into();
        let target = &target;
        let options = &options;

        retry_classified(
            policy,
            move |attempt| {
                trace!("GitHub request attempt {attempt}/{}", policy.max_attempts);
                self.request(target.clone(), options.clone())
            },
            TokioSleep,
        )
        .await
    }

    fn observe_rate_limit(&self, rate_limit: &RateLimitSnapshot) {
        if rate_limit.is_empty() {
            return;
        }

        trace!(
            "Rate limit: {:?}/{:?} remaining, resets at {}",
            rate_limit.remaining,
            rate_limit.limit,
            rate_limit.reset_display()
        );

        if rate_limit.is_below(self.rate_limit_warning_threshold) {
            warn!(
                "GitHub rate limit low: {} of {} requests remaining, resets at {}",
                rate_limit.remaining.unwrap_or_default(),
                rate_limit
                    .limit
                    .map(|limit| limit.to_string())
                    .unwrap_or_else(|| String::from("?")),
                rate_limit.reset_display()
            );
        }
    }
}
