//! Logging for the gh-agent CLI.
//!
//! Colored records go to stderr so stdout stays clean for command output.
//! An optional plain-text log file receives the same records.

use crate::error::AppError;

use common::ErrorLocation;

use std::fs::File;
use std::io::stderr;
use std::panic::Location;
use std::path::Path;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::Color::{Blue, Green, Magenta, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use humantime::format_rfc3339;
use log::{LevelFilter, debug, warn};

/// Thread-safe initialization guard.
static INIT_LOGGER_ONCE: Once = Once::new();

/// Tracks if logger initialization was already attempted.
static LOGGER_ALREADY_CALLED: AtomicBool = AtomicBool::new(false);

const LOGGER_INITIALIZED_MESSAGE_PREFIX: &str = "Logger initialized with level: ";
const LOGGER_ALREADY_INITIALIZED_MESSAGE: &str = "Logger already initialized";

/// Level for normal runs.
pub const DEFAULT_LEVEL: LevelFilter = LevelFilter::Info;

/// Level when `--debug` or `GH_AGENT_DEBUG` is set.
pub const DEBUG_LEVEL: LevelFilter = LevelFilter::Debug;

pub fn level_for(debug: bool) -> LevelFilter {
    if debug { DEBUG_LEVEL } else { DEFAULT_LEVEL }
}

/// Install the global logger.
///
/// Safe to call more than once: later calls log a warning and return Ok.
///
/// # Errors
///
/// Returns [`AppError::App`] if the log file cannot be opened or the
/// dispatcher cannot be installed.
pub fn initialize(level: LevelFilter, log_file: Option<&Path>) -> Result<(), AppError> {
    if LOGGER_ALREADY_CALLED.swap(true, Ordering::SeqCst) {
        warn!("{LOGGER_ALREADY_INITIALIZED_MESSAGE}");
        return Ok(());
    }

    let mut result = Ok(());

    INIT_LOGGER_ONCE.call_once(|| {
        result = initialize_internal(level, log_file);
        if result.is_ok() {
            debug!("{LOGGER_INITIALIZED_MESSAGE_PREFIX}{level:?}");
        }
    });

    result
}

/// Open (or create) the log file in append mode.
#[track_caller]
pub(crate) fn open_log_file(path: &Path) -> Result<File, AppError> {
    fern::log_file(path).map_err(|e| AppError::App {
        message: format!("Failed to create log file {}: {e}", path.display()),
        location: ErrorLocation::from(Location::caller()),
    })
}

#[track_caller]
fn initialize_internal(level: LevelFilter, log_file: Option<&Path>) -> Result<(), AppError> {
    let color_configuration = ColoredLevelConfig::new()
        .debug(Blue)
        .info(Green)
        .warn(Yellow)
        .error(Red)
        .trace(Magenta);

    let stderr_dispatch = Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{date} - {level}] {message}",
                date = format_rfc3339(SystemTime::now()),
                level = color_configuration.color(record.level()),
                message = message,
            ))
        })
        .chain(stderr());

    let mut base_dispatch = Dispatch::new().level(level).chain(stderr_dispatch);

    if let Some(path) = log_file {
        let file = open_log_file(path)?;

        // Plain text, with source position for later digging.
        let file_dispatch = Dispatch::new()
            .format(move |out, message, record| {
                out.finish(format_args!(
                    "[{date} - {level}] {message} [{file}:{line}]",
                    date = format_rfc3339(SystemTime::now()),
                    level = record.level(),
                    message = message,
                    file = record.file().unwrap_or("unknown"),
                    line = record.line().unwrap_or(0)
                ))
            })
            .chain(file);

        base_dispatch = base_dispatch.chain(file_dispatch);
    }

    base_dispatch.apply().map_err(|e| AppError::App {
        message: format!("Failed to initialize logger: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    Ok(())
}
