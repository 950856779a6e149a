//! Voice Journal Core Library
//!
//! Recording-session state machine and append-only journal for a prompted
//! voice-journaling flow. The microphone and durable storage are consumed
//! through the [`AudioCapability`] and [`KeyValueStore`] traits.
//!
//! # Example
//!
//! ```no_run
//! use voice_journal_core::{
//!     CpalAudioCapability, FileKeyValueStore, JournalStore, PromptSet, QualityPreset,
//!     SessionController,
//! };
//!
//! # async fn run() -> voice_journal_core::CoreResult<()> {
//! let audio = CpalAudioCapability::new("recordings");
//! let journal = JournalStore::new(FileKeyValueStore::new("journal"));
//! let prompts = PromptSet::new(["What was the highlight of your day?"])?;
//! let (notice_tx, _notice_rx) = tokio::sync::mpsc::channel(32);
//!
//! let mut controller =
//!     SessionController::new(audio, journal, prompts, QualityPreset::High, notice_tx).await;
//!
//! controller.request_capture_permission().await;
//! controller.start_capture().await?;
//! tokio::time::sleep(std::time::Duration::from_secs(3)).await;
//! controller.stop_capture().await?;
//!
//! for entry in controller.journal().load_all().await? {
//!     println!("{} -> {}", entry.prompt_text(), entry.audio_location());
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod journal;
mod platform;
mod prompts;
mod session;

pub use {
    error::{CoreError, PlatformError, PlatformResult, Result as CoreResult},
    journal::{DEFAULT_JOURNAL_KEY, JournalEntry, JournalStore},
    platform::{
        AudioCapability, AudioLocation, AudioMode, CpalAudioCapability, CpalCapture,
        FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, QualityPreset,
    },
    prompts::PromptSet,
    session::{CaptureTransition, SessionController, SessionSnapshot, UserNotice},
};
