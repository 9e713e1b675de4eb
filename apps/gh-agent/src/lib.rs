// Library exports for testing
// The binary (main.rs) is a thin wrapper around `run`

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;

#[cfg(test)]
mod tests;

use crate::cli::Cli;
use crate::error::AppError;
use crate::logger::{initialize as LoggerInitialize, level_for};

use github_core::AppConfig;
use github_core::auth::describe;

use log::debug;

/// Load configuration, install the logger and run the parsed command.
///
/// # Errors
///
/// Returns [`AppError`] if configuration, logging or the command fails.
pub async fn run(cli: Cli) -> Result<String, AppError> {
    let config = AppConfig::load(cli.config.as_deref())?;

    LoggerInitialize(level_for(cli.debug || config.debug), config.log_file.as_deref())?;

    debug!("gh-agent starting with command: {:?}", cli.command);
    debug!("GitHub credential: {}", describe(config.token.as_ref()));

    commands::execute(cli.command, &config, cli.json).await
}
