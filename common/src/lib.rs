//! Shared leaf types for gh-agent.
//!
//! Nothing in here talks to the network. These are the small value types
//! every other crate in the workspace leans on:
//!
//! - **ErrorLocation**: file/line/column captured with `#[track_caller]`
//! - **HttpStatusCode**: status categorisation used by error classification and retry
//! - **RedactedToken**: a credential that never shows up in logs or JSON

pub mod error;
pub mod http_status;
pub mod redacted_token;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use redacted_token::RedactedToken;

#[cfg(test)]
mod tests;
