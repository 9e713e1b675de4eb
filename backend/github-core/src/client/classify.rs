//! Turn a non-2xx GitHub response into a `GithubClientError`.

use crate::client::rate_limit::RateLimitSnapshot;
use crate::error::GithubClientError;

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

use serde::Deserialize;
use serde_json::Value;

/// GitHub's documented error body.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<FieldError>,
}

#[derive(Debug, Default, Deserialize)]
struct FieldError {
    #[serde(default)]
    resource: Option<String>,
    #[serde(default)]
    field: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl FieldError {
    fn describe(&self) -> Option<String> {
        if let Some(message) = self.message.as_deref().filter(|m| !m.is_empty()) {
            return Some(message.to_string());
        }

        let subject = match (&self.resource, &self.field) {
            (Some(resource), Some(field)) => format!("{resource}.{field}"),
            (None, Some(field)) => field.clone(),
            (Some(resource), None) => resource.clone(),
            (None, None) => return self.code.clone(),
        };

        Some(match &self.code {
            Some(code) => format!("{subject} {code}"),
            None => subject,
        })
    }
}

/// Classify a failed response by status code.
///
/// The body is parsed as GitHub's `{message, errors}` shape when possible;
/// an unparsable body never changes the classification, it only loses the
/// upstream message.
#[track_caller]
pub fn classify_response(
    status: HttpStatusCode,
    rate_limit: &RateLimitSnapshot,
    body: &str,
) -> GithubClientError {
    let location = ErrorLocation::from(Location::caller());
    let payload: Option<Value> = serde_json::from_str(body).ok();
    let parsed: ErrorBody = payload
        .as_ref()
        .and_then(|value| ErrorBody::deserialize(value).ok())
        .unwrap_or_default();

    let upstream = parsed
        .message
        .clone()
        .filter(|message| !message.trim().is_empty());

    match status.0 {
        400 => GithubClientError::BadRequest {
            message: upstream.unwrap_or_else(|| String::from("GitHub rejected the request")),
            payload,
            location,
        },
        401 => GithubClientError::Unauthorized {
            message: upstream.unwrap_or_else(|| String::from("Bad credentials")),
            payload,
            location,
        },
        403 if rate_limit.is_exhausted() => GithubClientError::RateLimited {
            message: format!(
                "{}; rate limit resets at {}",
                upstream.unwrap_or_else(|| String::from("API rate limit exceeded")),
                rate_limit.reset_display()
            ),
            status_code: status,
            reset: rate_limit.reset,
            payload,
            location,
        },
        403 => GithubClientError::Forbidden {
            message: upstream
                .unwrap_or_else(|| String::from("access to this resource is forbidden")),
            payload,
            location,
        },
        404 => GithubClientError::NotFound {
            message: upstream.unwrap_or_else(|| String::from("resource not found")),
            payload,
            location,
        },
        422 => {
            let details: Vec<String> = parsed.errors.iter().filter_map(FieldError::describe).collect();
            let base = upstream.unwrap_or_else(|| String::from("request validation failed"));
            let message = if details.is_empty() {
                base
            } else {
                format!("{base}: {}", details.join("; "))
            };
            GithubClientError::ValidationFailed {
                message,
                payload,
                location,
            }
        }
        429 => GithubClientError::RateLimited {
            message: format!(
                "{}; rate limit resets at {}",
                upstream.unwrap_or_else(|| String::from("too many requests")),
                rate_limit.reset_display()
            ),
            status_code: status,
            reset: rate_limit.reset,
            payload,
            location,
        },
        500 | 502 | 503 => GithubClientError::Server {
            message: upstream.unwrap_or_else(|| String::from("GitHub is having trouble")),
            status_code: status,
            payload,
            location,
        },
        _ => GithubClientError::Other {
            message: upstream
                .unwrap_or_else(|| format!("GitHub API request failed with status {status}")),
            status_code: status,
            payload,
            location,
        },
    }
}
