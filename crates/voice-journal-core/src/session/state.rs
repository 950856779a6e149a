use std::{mem, time::Instant};

use uuid::Uuid;

/// Capture lifecycle. A handle exists only in `Recording`, so "recording
/// without a resource" and "two resources at once" are unrepresentable.
pub(crate) enum CaptureState<H> {
    /// Not currently recording.
    Idle,
    /// Currently recording audio.
    Recording(ActiveCapture<H>),
}

/// Resource and bookkeeping for the capture in progress.
pub(crate) struct ActiveCapture<H> {
    pub(crate) handle: H,
    /// When recording started.
    pub(crate) started_at: Instant,
    /// Unique session ID for log correlation.
    pub(crate) session_id: Uuid,
}

impl<H> CaptureState<H> {
    pub(crate) fn is_recording(&self) -> bool {
        matches!(self, CaptureState::Recording(_))
    }

    /// Leave `Recording`, handing back ownership of the capture.
    pub(crate) fn end(&mut self) -> Option<ActiveCapture<H>> {
        match mem::replace(self, CaptureState::Idle) {
            CaptureState::Recording(active) => Some(active),
            CaptureState::Idle => None,
        }
    }
}
