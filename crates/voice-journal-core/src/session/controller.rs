use crate::{
    CoreError, CoreResult,
    journal::{JournalEntry, JournalStore},
    platform::{AudioCapability, AudioMode, KeyValueStore, QualityPreset},
    prompts::PromptSet,
    session::{
        CaptureTransition, SessionSnapshot, UserNotice,
        state::{ActiveCapture, CaptureState},
    },
};

use std::{panic::Location, time::Instant};

use chrono::Utc;
use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Owns the capture lifecycle and the prompt pointer.
///
/// States are `Idle` and `Recording`. `start_capture` moves Idle to
/// Recording, `stop_capture` moves Recording back to Idle and appends a
/// journal entry. Advancing the prompt is independent of the capture state
/// but refused while recording.
///
/// # Thread Safety
///
/// Mutating operations take `&mut self`; the controller expects a single
/// owner that processes commands one at a time. UI code observes state
/// through [`SessionController::subscribe`].
pub struct SessionController<A: AudioCapability, S> {
    audio: A,
    journal: JournalStore<S>,
    prompts: PromptSet,
    preset: QualityPreset,
    pointer: usize,
    state: CaptureState<A::Handle>,
    entries_recorded: usize,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    notice_tx: mpsc::Sender<UserNotice>,
}

impl<A, S> SessionController<A, S>
where
    A: AudioCapability,
    S: KeyValueStore,
{
    /// Create a controller and apply the one-time audio mode setup.
    ///
    /// A failed mode setup is logged and otherwise ignored; the platform
    /// will refuse captures it cannot serve.
    #[instrument(skip_all, fields(prompts = prompts.len(), ?preset))]
    pub async fn new(
        audio: A,
        journal: JournalStore<S>,
        prompts: PromptSet,
        preset: QualityPreset,
        notice_tx: mpsc::Sender<UserNotice>,
    ) -> Self {
        if let Err(e) = audio.configure_mode(AudioMode::default()).await {
            warn!(error = ?e, "Failed to configure audio mode");
        }

        let initial = SessionSnapshot {
            prompt_index: 0,
            prompt_text: prompts.get(0).unwrap_or_default().to_string(),
            is_recording: false,
            can_advance: prompts.last_index() > 0,
            entries_recorded: 0,
        };
        let (snapshot_tx, _) = watch::channel(initial);

        info!("SessionController initialized");

        Self {
            audio,
            journal,
            prompts,
            preset,
            pointer: 0,
            state: CaptureState::Idle,
            entries_recorded: 0,
            snapshot_tx,
            notice_tx,
        }
    }

    /// Ask the platform for microphone access.
    ///
    /// A denial raises [`UserNotice::PermissionDenied`]. It does not block
    /// later calls to this method or to `start_capture`.
    #[instrument(skip(self))]
    pub async fn request_capture_permission(&mut self) -> bool {
        let granted = self.audio.request_permission().await;

        if granted {
            info!("Microphone permission granted");
        } else {
            warn!("Microphone permission denied");
            self.notify(UserNotice::PermissionDenied);
        }

        granted
    }

    /// Begin recording an answer to the current prompt.
    ///
    /// Ignored while already recording.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CaptureStartFailed`] if the platform refuses;
    /// the controller stays idle.
    #[instrument(skip(self), fields(prompt_index = self.pointer))]
    pub async fn start_capture(&mut self) -> CoreResult<CaptureTransition> {
        if self.state.is_recording() {
            debug!("Start requested while already recording");
            return Ok(CaptureTransition::Ignored);
        }

        let handle = match self.audio.begin_capture(self.preset).await {
            Ok(handle) => handle,
            Err(source) => {
                error!(error = ?source, "Failed to start recording");
                self.notify(UserNotice::CaptureFailed {
                    reason: source.to_string(),
                });
                return Err(CoreError::CaptureStartFailed {
                    source,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        let session_id = Uuid::new_v4();
        self.state = CaptureState::Recording(ActiveCapture {
            handle,
            started_at: Instant::now(),
            session_id,
        });
        self.publish();

        info!(session_id = %session_id, "Recording started");

        Ok(CaptureTransition::Started)
    }

    /// Finish the current recording and append it to the journal.
    ///
    /// Ignored while idle. The capture resource is handed to the platform
    /// exactly once and the controller is idle afterwards on every path.
    ///
    /// # Errors
    ///
    /// - [`CoreError::CaptureStopFailed`] if finalizing fails; nothing is
    ///   appended and the resource is discarded.
    /// - Any journal error from the append. The audio exists on the platform
    ///   but has no journal entry; a [`UserNotice::EntryNotSaved`] names it.
    #[instrument(skip(self), fields(prompt_index = self.pointer))]
    pub async fn stop_capture(&mut self) -> CoreResult<CaptureTransition> {
        let Some(ActiveCapture {
            handle,
            started_at,
            session_id,
        }) = self.state.end()
        else {
            debug!("Stop requested while idle");
            return Ok(CaptureTransition::Ignored);
        };
        self.publish();

        let audio_location = match self.audio.finalize_capture(handle).await {
            Ok(location) => location,
            Err(source) => {
                error!(session_id = %session_id, error = ?source, "Failed to stop recording");
                self.notify(UserNotice::CaptureFailed {
                    reason: source.to_string(),
                });
                return Err(CoreError::CaptureStopFailed {
                    source,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        info!(
            session_id = %session_id,
            duration_ms = started_at.elapsed().as_millis(),
            audio_location = %audio_location,
            "Recording stopped"
        );

        let prompt_text = self.prompts.get(self.pointer).unwrap_or_default();
        let entry = JournalEntry::new(audio_location, prompt_text, self.pointer, Utc::now());

        match self.journal.append(entry.clone()).await {
            Ok(total) => {
                self.entries_recorded += 1;
                self.publish();
                info!(session_id = %session_id, total, "Journal entry saved");
                Ok(CaptureTransition::Stopped(entry))
            }
            Err(e) => {
                error!(
                    session_id = %session_id,
                    audio_location = entry.audio_location(),
                    error = ?e,
                    "Recording exists but its journal entry was not saved"
                );
                self.notify(UserNotice::EntryNotSaved {
                    audio_location: entry.audio_location().to_string(),
                });
                Err(e)
            }
        }
    }

    /// Microphone button: stop if recording, start otherwise.
    ///
    /// # Errors
    ///
    /// Same as [`start_capture`](Self::start_capture) or
    /// [`stop_capture`](Self::stop_capture).
    pub async fn toggle_capture(&mut self) -> CoreResult<CaptureTransition> {
        if self.state.is_recording() {
            self.stop_capture().await
        } else {
            self.start_capture().await
        }
    }

    /// Move to the next prompt.
    ///
    /// Returns `false` without changing anything while recording or at the
    /// last prompt.
    #[instrument(skip(self), fields(prompt_index = self.pointer))]
    pub fn advance_prompt(&mut self) -> bool {
        if !self.can_advance() {
            debug!(
                is_recording = self.state.is_recording(),
                "Advance ignored"
            );
            return false;
        }

        self.pointer += 1;
        self.publish();

        info!(prompt_index = self.pointer, "Advanced to next prompt");

        true
    }

    /// Stop an in-progress capture so its resource is released and its
    /// entry persisted before the process exits.
    ///
    /// # Errors
    ///
    /// Same as [`stop_capture`](Self::stop_capture).
    #[instrument(skip(self))]
    pub async fn shutdown(&mut self) -> CoreResult<()> {
        if self.state.is_recording() {
            info!("Stopping active recording before shutdown");
            self.stop_capture().await?;
        }
        Ok(())
    }

    /// Whether a capture is in progress.
    pub fn is_recording(&self) -> bool {
        self.state.is_recording()
    }

    /// Current prompt pointer.
    pub fn prompt_index(&self) -> usize {
        self.pointer
    }

    /// Text of the current prompt.
    pub fn current_prompt(&self) -> &str {
        self.prompts.get(self.pointer).unwrap_or_default()
    }

    /// Whether `advance_prompt` would move the pointer.
    pub fn can_advance(&self) -> bool {
        !self.state.is_recording() && self.pointer < self.prompts.last_index()
    }

    /// The journal this controller appends to.
    pub fn journal(&self) -> &JournalStore<S> {
        &self.journal
    }

    /// Current observable state.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            prompt_index: self.pointer,
            prompt_text: self.current_prompt().to_string(),
            is_recording: self.state.is_recording(),
            can_advance: self.can_advance(),
            entries_recorded: self.entries_recorded,
        }
    }

    /// Receive a snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_tx.subscribe()
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.snapshot());
    }

    fn notify(&self, notice: UserNotice) {
        if let Err(e) = self.notice_tx.try_send(notice) {
            warn!(error = %e, "Failed to deliver user notice");
        }
    }
}
