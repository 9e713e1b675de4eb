pub mod auth;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod github;
pub mod present;
pub mod system;
pub mod tools;

#[cfg(test)]
mod tests;

pub use client::{GithubClient, RequestOptions, RequestTarget};
pub use config::AppConfig;
pub use endpoint::Endpoint;

pub const APP_NAME: &str = "gh-agent";
pub const GITHUB_API_BASE_URL: &str = "https://api.github.com";
pub const GITHUB_WEB_BASE_URL: &str = "https://github.com";
pub const USER_AGENT: &str = const_format::concatcp!(APP_NAME, "/", env!("CARGO_PKG_VERSION"));
