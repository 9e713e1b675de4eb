//! HTTP status code utilities for error classification and retry logic.

/// Pseudo status used for transport failures that never produced a response.
pub const NETWORK_ERROR_STATUS: u16 = 0;

/// Status reported for calls aborted by the client-side timeout.
pub const TIMEOUT_STATUS: u16 = 408;

/// HTTP status code for error categorization.
///
/// Stored directly rather than parsed from error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HttpStatusCode(pub u16);

impl HttpStatusCode {
    pub const NETWORK: HttpStatusCode = HttpStatusCode(NETWORK_ERROR_STATUS);
    pub const TIMEOUT: HttpStatusCode = HttpStatusCode(TIMEOUT_STATUS);

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.0)
    }

    /// 4xx client errors (not retryable unless rate limited).
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.0)
    }

    /// 5xx server errors (retryable).
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.0)
    }

    /// No response was received at all.
    pub fn is_network(&self) -> bool {
        self.0 == NETWORK_ERROR_STATUS
    }

    /// Transient by status alone. A 403 can still be transient when the
    /// rate-limit budget is exhausted, which needs the headers to decide.
    pub fn is_retryable(&self) -> bool {
        self.is_server_error() || self.is_network() || matches!(self.0, TIMEOUT_STATUS | 429)
    }
}

impl From<u16> for HttpStatusCode {
    fn from(code: u16) -> Self {
        HttpStatusCode(code)
    }
}

impl std::fmt::Display for HttpStatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
