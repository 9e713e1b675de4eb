//! Point-in-time rate-limit budget read from GitHub response headers.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use humantime::format_rfc3339_seconds;
use reqwest::header::HeaderMap;
use serde::Serialize;

pub const RATE_LIMIT_LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const RATE_LIMIT_RESET_HEADER: &str = "x-ratelimit-reset";
pub const RATE_LIMIT_USED_HEADER: &str = "x-ratelimit-used";

/// 10000-01-01T00:00:00Z; humantime refuses to format anything from here on.
const MAX_RFC3339_EPOCH_SECONDS: u64 = 253_402_300_800;

/// Rate-limit headers from a single response. Any header GitHub omitted is `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RateLimitSnapshot {
    pub limit: Option<u32>,
    pub remaining: Option<u32>,
    /// Epoch seconds at which the budget resets.
    pub reset: Option<u64>,
    pub used: Option<u32>,
}

impl RateLimitSnapshot {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            limit: header_number(headers, RATE_LIMIT_LIMIT_HEADER),
            remaining: header_number(headers, RATE_LIMIT_REMAINING_HEADER),
            reset: header_number(headers, RATE_LIMIT_RESET_HEADER),
            used: header_number(headers, RATE_LIMIT_USED_HEADER),
        }
    }

    /// No rate-limit headers were present at all.
    pub fn is_empty(&self) -> bool {
        self.limit.is_none() && self.remaining.is_none() && self.reset.is_none() && self.used.is_none()
    }

    /// The remaining-count header reads zero.
    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    /// Remaining budget is known and strictly under `threshold`.
    pub fn is_below(&self, threshold: u32) -> bool {
        self.remaining.is_some_and(|remaining| remaining < threshold)
    }

    /// `None` without the header or when the value does not fit a `SystemTime`.
    pub fn reset_time(&self) -> Option<SystemTime> {
        self.reset
            .and_then(|seconds| UNIX_EPOCH.checked_add(Duration::from_secs(seconds)))
    }

    /// RFC 3339 reset time, the raw epoch value when it is past what RFC 3339
    /// can express, or `"an unknown time"` without the header.
    pub fn reset_display(&self) -> String {
        match self.reset {
            Some(seconds) if seconds < MAX_RFC3339_EPOCH_SECONDS => match self.reset_time() {
                Some(time) => format_rfc3339_seconds(time).to_string(),
                None => format!("epoch {seconds}"),
            },
            Some(seconds) => format!("epoch {seconds}"),
            None => String::from("an unknown time"),
        }
    }
}

fn header_number<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}
