//! Capability interfaces consumed by the core, plus desktop implementations.
//!
//! The session controller and journal store only see [`AudioCapability`]
//! and [`KeyValueStore`]. Any host (desktop, mobile shell, tests) plugs in
//! by implementing these two traits.

pub(crate) mod cpal_audio;
mod file_store;
mod memory_store;

pub use {
    cpal_audio::{CpalAudioCapability, CpalCapture},
    file_store::FileKeyValueStore,
    memory_store::MemoryKeyValueStore,
};

use crate::error::PlatformResult;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Recording quality preset passed to [`AudioCapability::begin_capture`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    /// Full-resolution capture.
    #[default]
    High,
    /// Reduced sample depth.
    Low,
}

/// One-time audio session options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioMode {
    /// Whether the audio session may record at all.
    pub allows_recording: bool,
    /// Keep the session active when the device is in silent mode.
    pub plays_in_silent_mode: bool,
}

impl Default for AudioMode {
    fn default() -> Self {
        Self {
            allows_recording: true,
            plays_in_silent_mode: true,
        }
    }
}

/// Opaque, non-empty reference to recorded audio data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AudioLocation(String);

impl AudioLocation {
    /// Wraps a location string. Returns `None` for an empty string.
    pub fn new(location: impl Into<String>) -> Option<Self> {
        let location = location.into();
        if location.is_empty() {
            None
        } else {
            Some(Self(location))
        }
    }

    /// Borrow the location as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for AudioLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Microphone capability of the host platform.
///
/// `finalize_capture` takes the handle by value: once called, the capture
/// resource is released whether finalization succeeds or fails.
#[async_trait]
pub trait AudioCapability: Send + Sync {
    /// Live handle for an in-progress capture.
    type Handle: Send;

    /// Ask the platform for microphone access.
    async fn request_permission(&self) -> bool;

    /// Apply audio session options. Implementations must be idempotent.
    async fn configure_mode(&self, mode: AudioMode) -> PlatformResult<()>;

    /// Open a new capture resource.
    async fn begin_capture(&self, preset: QualityPreset) -> PlatformResult<Self::Handle>;

    /// Stop and release a capture resource, returning where its audio lives.
    async fn finalize_capture(&self, handle: Self::Handle) -> PlatformResult<AudioLocation>;
}

/// Durable string key-value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`, if any.
    async fn get(&self, key: &str) -> PlatformResult<Option<String>>;

    /// Replace the value stored under `key`.
    async fn set(&self, key: &str, value: String) -> PlatformResult<()>;
}
