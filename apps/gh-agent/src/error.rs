use common::ErrorLocation;

use github_core::error::{ConfigError, GithubClientError, OperationError, ToolError};

use thiserror::Error;

/// Errors surfaced by the `gh-agent` binary.
///
/// Every variant ends up as one `Error: ...` line on stderr and exit code 1.
#[derive(Debug, Error)]
pub enum AppError {
    /// Error from this App
    #[error("App Error: {message} {location}")]
    App {
        message: String,
        location: ErrorLocation,
    },

    /// Command-line input that parsed but cannot be used (bad JSON for `invoke`)
    #[error("Input Error: {message} {location}")]
    Input {
        message: String,
        location: ErrorLocation,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] GithubClientError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Tool(#[from] ToolError),
}
