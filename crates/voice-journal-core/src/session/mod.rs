mod controller;
mod snapshot;
mod state;

pub use {
    controller::SessionController,
    snapshot::{CaptureTransition, SessionSnapshot, UserNotice},
};
