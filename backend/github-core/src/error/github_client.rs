//! Classified errors produced by the GitHub client.
//!
//! Key design decisions:
//! - One variant per failure class, each with a fixed Display prefix
//! - HTTP status stored directly (`status_code()` never parses messages)
//! - Raw upstream error payload kept when the body was JSON
//! - `#[track_caller]` constructors capture where the error was raised

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum GithubClientError {
    #[error("Bad Request: {message} {location}")]
    BadRequest {
        message: String,
        payload: Option<Value>,
        location: ErrorLocation,
    },

    #[error("Invalid Credential: {message} {location}")]
    Unauthorized {
        message: String,
        payload: Option<Value>,
        location: ErrorLocation,
    },

    #[error("Forbidden: {message} {location}")]
    Forbidden {
        message: String,
        payload: Option<Value>,
        location: ErrorLocation,
    },

    #[error("Rate Limited: {message} {location}")]
    RateLimited {
        message: String,
        status_code: HttpStatusCode,
        reset: Option<u64>,
        payload: Option<Value>,
        location: ErrorLocation,
    },

    #[error("Not Found: {message} {location}")]
    NotFound {
        message: String,
        payload: Option<Value>,
        location: ErrorLocation,
    },

    #[error("Validation Failed: {message} {location}")]
    ValidationFailed {
        message: String,
        payload: Option<Value>,
        location: ErrorLocation,
    },

    #[error("GitHub Server Error ({status_code}): {message} {location}")]
    Server {
        message: String,
        status_code: HttpStatusCode,
        payload: Option<Value>,
        location: ErrorLocation,
    },

    #[error("HTTP Error ({status_code}): {message} {location}")]
    Other {
        message: String,
        status_code: HttpStatusCode,
        payload: Option<Value>,
        location: ErrorLocation,
    },

    #[error("Request Timeout: {message} {location}")]
    Timeout {
        message: String,
        timeout_ms: u64,
        location: ErrorLocation,
    },

    #[error("Network Error: {message} {location}")]
    Network {
        message: String,
        location: ErrorLocation,
    },

    #[error("URL Error: {message} {location}")]
    InvalidUrl {
        message: String,
        location: ErrorLocation,
    },

    #[error("JSON Error: {message} {location}")]
    Json {
        message: String,
        status_code: HttpStatusCode,
        location: ErrorLocation,
    },
}

impl GithubClientError {
    #[track_caller]
    pub fn timeout(timeout: Duration) -> Self {
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        GithubClientError::Timeout {
            message: format!("request aborted after {timeout_ms} ms"),
            timeout_ms,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn network(message: impl Into<String>) -> Self {
        GithubClientError::Network {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_url(message: impl Into<String>) -> Self {
        GithubClientError::InvalidUrl {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn json(status_code: u16, message: impl Into<String>) -> Self {
        GithubClientError::Json {
            message: message.into(),
            status_code: HttpStatusCode(status_code),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Categorise a transport failure from reqwest.
    ///
    /// Timeouts become status 408, everything else (DNS, refused, reset)
    /// becomes status 0.
    #[track_caller]
    pub fn from_transport(error: &reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            return Self::timeout(timeout);
        }

        if error.is_builder() {
            return Self::invalid_url(error.to_string());
        }

        Self::network(format!("could not reach GitHub: {error}"))
    }

    /// Numeric status: the HTTP status for classified responses, 408 for
    /// timeouts and 0 for failures that never produced a response.
    pub fn status_code(&self) -> HttpStatusCode {
        match self {
            GithubClientError::BadRequest { .. } => HttpStatusCode(400),
            GithubClientError::Unauthorized { .. } => HttpStatusCode(401),
            GithubClientError::Forbidden { .. } => HttpStatusCode(403),
            GithubClientError::RateLimited { status_code, .. } => *status_code,
            GithubClientError::NotFound { .. } => HttpStatusCode(404),
            GithubClientError::ValidationFailed { .. } => HttpStatusCode(422),
            GithubClientError::Server { status_code, .. } => *status_code,
            GithubClientError::Other { status_code, .. } => *status_code,
            GithubClientError::Timeout { .. } => HttpStatusCode::TIMEOUT,
            GithubClientError::Network { .. } => HttpStatusCode::NETWORK,
            GithubClientError::InvalidUrl { .. } => HttpStatusCode::NETWORK,
            GithubClientError::Json { status_code, .. } => *status_code,
        }
    }

    /// Check if this error is retryable based on its class, NOT message content.
    pub fn is_retryable(&self) -> bool {
        match self {
            GithubClientError::RateLimited { .. } => true,
            GithubClientError::Server { .. } => true,
            GithubClientError::Timeout { .. } => true,
            GithubClientError::Network { .. } => true,
            GithubClientError::Other { status_code, .. } => status_code.is_retryable(),

            GithubClientError::BadRequest { .. } => false,
            GithubClientError::Unauthorized { .. } => false,
            GithubClientError::Forbidden { .. } => false,
            GithubClientError::NotFound { .. } => false,
            GithubClientError::ValidationFailed { .. } => false,
            GithubClientError::InvalidUrl { .. } => false,
            GithubClientError::Json { .. } => false,
        }
    }

    /// Stable category name for logs.
    pub fn error_category(&self) -> &'static str {
        match self {
            GithubClientError::BadRequest { .. } => "bad_request",
            GithubClientError::Unauthorized { .. } => "invalid_credential",
            GithubClientError::Forbidden { .. } => "forbidden",
            GithubClientError::RateLimited { .. } => "rate_limited",
            GithubClientError::NotFound { .. } => "not_found",
            GithubClientError::ValidationFailed { .. } => "validation_failed",
            GithubClientError::Server { .. } => "server_error",
            GithubClientError::Other { .. } => "other",
            GithubClientError::Timeout { .. } => "timeout",
            GithubClientError::Network { .. } => "network",
            GithubClientError::InvalidUrl { .. } => "invalid_url",
            GithubClientError::Json { .. } => "json",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            GithubClientError::BadRequest { message, .. }
            | GithubClientError::Unauthorized { message, .. }
            | GithubClientError::Forbidden { message, .. }
            | GithubClientError::RateLimited { message, .. }
            | GithubClientError::NotFound { message, .. }
            | GithubClientError::ValidationFailed { message, .. }
            | GithubClientError::Server { message, .. }
            | GithubClientError::Other { message, .. }
            | GithubClientError::Timeout { message, .. }
            | GithubClientError::Network { message, .. }
            | GithubClientError::InvalidUrl { message, .. }
            | GithubClientError::Json { message, .. } => message,
        }
    }

    /// Raw upstream error body, when GitHub sent one as JSON.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            GithubClientError::BadRequest { payload, .. }
            | GithubClientError::Unauthorized { payload, .. }
            | GithubClientError::Forbidden { payload, .. }
            | GithubClientError::RateLimited { payload, .. }
            | GithubClientError::NotFound { payload, .. }
            | GithubClientError::ValidationFailed { payload, .. }
            | GithubClientError::Server { payload, .. }
            | GithubClientError::Other { payload, .. } => payload.as_ref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, GithubClientError::NotFound { .. })
    }
}
