//! Voice Journal: prompted voice journaling from the terminal.

mod app;
mod app_command;
mod config;
mod console_view;
mod error;
mod input_handler;
mod logging;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    console_view::ConsoleView,
    error::{AppError, Result as AppResult},
    input_handler::InputHandler,
};

use crate::{
    config::Config,
    logging::{DEFAULT_LOG_FILTER, file_appender},
};

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use voice_journal_core::{CpalAudioCapability, FileKeyValueStore, JournalStore, SessionController};

/// Application entry point.
fn main() {
    let log_dir = match Config::log_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Failed to resolve log directory: {}", e);
            std::process::exit(1);
        }
    };

    let appender = match file_appender(&log_dir) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Failed to set up logging: {}", e);
            std::process::exit(1);
        }
    };

    // Guard flushes the file writer on drop; keep it for the whole run.
    let (file_writer, _log_guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    let result = rt.block_on(run(config));

    // The stdin reader may still be parked in a blocking read.
    rt.shutdown_timeout(Duration::from_secs(1));

    if let Err(e) = result {
        error!(error = ?e, "App error");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> AppResult<()> {
    let prompts = config.prompt_set()?;
    let prompt_count = prompts.len();

    let audio = CpalAudioCapability::new(&config.journal.recordings_dir);
    let journal = JournalStore::with_key(
        FileKeyValueStore::new(&config.journal.storage_dir),
        config.journal.key.clone(),
    );

    let (notice_tx, notice_rx) = mpsc::channel(32);
    let controller =
        SessionController::new(audio, journal, prompts, config.audio.quality, notice_tx).await;

    let (command_tx, command_rx) = mpsc::channel(32);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let input_handler = InputHandler::new(command_tx);
    let app = App {
        controller,
        view: ConsoleView::new(std::io::stdout(), prompt_count),
        command_rx,
        notice_rx,
        shutdown_tx,
    };

    let (input_result, app_result) = tokio::join!(input_handler.run(shutdown_rx), app.run());

    if let Err(e) = input_result {
        error!(error = ?e, "Input handler error");
    }

    app_result
}
