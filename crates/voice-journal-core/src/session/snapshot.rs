use crate::journal::JournalEntry;

use std::fmt;

/// Observable session state published to the UI after every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Current prompt pointer.
    pub prompt_index: usize,
    /// Text of the current prompt.
    pub prompt_text: String,
    /// Whether a capture is in progress.
    pub is_recording: bool,
    /// Whether `advance_prompt` would move the pointer.
    pub can_advance: bool,
    /// Entries appended by this controller since it was created.
    pub entries_recorded: usize,
}

impl SessionSnapshot {
    /// Short status line shown under the prompt.
    pub fn status_label(&self) -> &'static str {
        if self.is_recording {
            "recording"
        } else if self.prompt_index > 0 {
            "next question"
        } else {
            ""
        }
    }
}

/// User-visible alerts raised by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserNotice {
    /// Microphone access was refused.
    PermissionDenied,
    /// A capture could not be started or finalized.
    CaptureFailed {
        /// Human-readable failure description.
        reason: String,
    },
    /// Audio was recorded but its journal entry could not be saved.
    EntryNotSaved {
        /// Where the orphaned audio lives.
        audio_location: String,
    },
}

impl fmt::Display for UserNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserNotice::PermissionDenied => {
                f.write_str("Permission to access microphone is required!")
            }
            UserNotice::CaptureFailed { reason } => write!(f, "Recording failed: {}", reason),
            UserNotice::EntryNotSaved { audio_location } => write!(
                f,
                "Recording kept at {} but it could not be added to the journal",
                audio_location
            ),
        }
    }
}

/// Result of a capture command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureTransition {
    /// Idle -> Recording.
    Started,
    /// Recording -> Idle, with the persisted entry.
    Stopped(JournalEntry),
    /// Precondition not met; nothing changed.
    Ignored,
}
