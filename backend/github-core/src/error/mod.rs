pub mod auth;
pub mod config;
pub mod github_client;
pub mod operation;
pub mod tool;

pub use auth::AuthError;
pub use config::ConfigError;
pub use github_client::GithubClientError;
pub use operation::{Operation, OperationError};
pub use tool::ToolError;
