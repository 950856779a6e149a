use crate::{AppCommand, AppResult, ConsoleView};

use std::io::Write;

use tokio::sync::{mpsc, watch};
use tracing::{error, info, instrument, warn};
use voice_journal_core::{
    AudioCapability, CaptureTransition, KeyValueStore, SessionController, UserNotice,
};

/// Main application state.
///
/// Owns the session controller and processes commands strictly in arrival
/// order, so no two captures or journal appends ever overlap.
pub struct App<A: AudioCapability, S: KeyValueStore, W: Write> {
    pub(crate) controller: SessionController<A, S>,
    pub(crate) view: ConsoleView<W>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) notice_rx: mpsc::Receiver<UserNotice>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
}

impl<A, S, W> App<A, S, W>
where
    A: AudioCapability,
    S: KeyValueStore,
    W: Write,
{
    /// Run the main application event loop.
    ///
    /// Every command failure is logged and the loop keeps running; only a
    /// shutdown command or closed channels end it.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Voice Journal starting");

        self.controller.request_capture_permission().await;

        let mut snapshot_rx = self.controller.subscribe();
        let initial = snapshot_rx.borrow_and_update().clone();
        self.view.render_snapshot(&initial);
        self.view.render_help();

        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    if cmd == AppCommand::Shutdown {
                        info!("Shutdown requested");
                        break;
                    }
                    self.handle_command(cmd).await;
                }

                Some(notice) = self.notice_rx.recv() => {
                    self.view.render_notice(&notice);
                }

                Ok(()) = snapshot_rx.changed() => {
                    let snapshot = snapshot_rx.borrow_and_update().clone();
                    self.view.render_snapshot(&snapshot);
                }

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }
        }

        if let Err(e) = self.controller.shutdown().await {
            error!(error = ?e, "Failed to finish recording during shutdown");
        }
        while let Ok(notice) = self.notice_rx.try_recv() {
            self.view.render_notice(&notice);
        }

        let _ = self.shutdown_tx.send(true);
        info!("Voice Journal shut down successfully");

        Ok(())
    }

    /// Apply one command. Failures end here: they are logged, never raised.
    pub(crate) async fn handle_command(&mut self, cmd: AppCommand) {
        match cmd {
            AppCommand::ToggleRecording => match self.controller.toggle_capture().await {
                Ok(CaptureTransition::Stopped(entry)) => {
                    self.view
                        .render_line(&format!("Saved: {}", entry.audio_location()));
                }
                Ok(_) => {}
                Err(e) => error!(error = ?e, "Recording command failed"),
            },
            AppCommand::NextPrompt => {
                if !self.controller.advance_prompt() {
                    if self.controller.is_recording() {
                        self.view.render_line("Stop recording before moving on.");
                    } else {
                        self.view.render_line("That was the last question.");
                    }
                }
            }
            AppCommand::ListEntries => match self.controller.journal().load_all().await {
                Ok(entries) => self.view.render_entries(&entries),
                Err(e) => {
                    error!(error = ?e, "Failed to load journal");
                    self.view.render_line("Journal could not be read.");
                }
            },
            AppCommand::Help => self.view.render_help(),
            AppCommand::Shutdown => warn!("Shutdown must be handled by the event loop"),
        }
    }
}
