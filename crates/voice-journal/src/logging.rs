//! Log output setup.

use crate::{AppError, AppResult};

use std::{panic::Location, path::Path};

use error_location::ErrorLocation;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Default filter when `RUST_LOG` is unset.
pub(crate) const DEFAULT_LOG_FILTER: &str = "voice_journal=info,voice_journal_core=info";

/// Daily rolling log file in `log_dir`, created if missing.
///
/// # Errors
///
/// Returns [`AppError::LoggingError`] if the directory cannot be created or
/// the log file cannot be opened.
#[track_caller]
pub(crate) fn file_appender(log_dir: &Path) -> AppResult<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("voice-journal")
        .filename_suffix("log")
        .build(log_dir)
        .map_err(|e| AppError::LoggingError {
            reason: format!("Failed to open log file in {:?}: {}", log_dir, e),
            location: ErrorLocation::from(Location::caller()),
        })
}
