use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

/// Failures raised by a platform capability (microphone or key-value store).
#[derive(Error, Debug)]
pub enum PlatformError {
    /// No audio input device found.
    #[error("No input device found {location}")]
    NoInputDevice {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio device operation failed.
    #[error("Audio device error: {reason} {location}")]
    Device {
        /// Description of the device error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Key-value storage operation failed.
    #[error("Storage error: {reason} {location}")]
    Storage {
        /// Description of the storage error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// IO error from filesystem operations.
    #[error("IO error: {source} {location}")]
    Io {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl From<std::io::Error> for PlatformError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        PlatformError::Io {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Recording session and journal errors with source location tracking.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Prompt set was constructed with no prompts.
    #[error("Prompt set must contain at least one prompt {location}")]
    EmptyPromptSet {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The platform refused to open a capture resource.
    #[error("Failed to start capture: {source} {location}")]
    CaptureStartFailed {
        /// Underlying platform error.
        #[source]
        source: PlatformError,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Finalizing a capture failed. The resource has been released.
    #[error("Failed to stop capture: {source} {location}")]
    CaptureStopFailed {
        /// Underlying platform error.
        #[source]
        source: PlatformError,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Reading the journal from storage failed.
    #[error("Failed to read journal key {key:?}: {source} {location}")]
    PersistenceReadFailed {
        /// Storage key that was read.
        key: String,
        /// Underlying platform error.
        #[source]
        source: PlatformError,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Stored journal value could not be parsed.
    #[error("Journal under key {key:?} is corrupted: {source} {location}")]
    PersistenceCorruption {
        /// Storage key holding the corrupted value.
        key: String,
        /// Parse error.
        #[source]
        source: serde_json::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Writing the journal back to storage failed.
    #[error("Failed to write journal key {key:?}: {source} {location}")]
    PersistenceWriteFailed {
        /// Storage key that was written.
        key: String,
        /// Underlying platform error.
        #[source]
        source: PlatformError,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Journal collection could not be serialized.
    #[error("Failed to serialize journal: {source} {location}")]
    Serialization {
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;

/// Result type alias for capability implementations.
pub type PlatformResult<T> = std::result::Result<T, PlatformError>;
