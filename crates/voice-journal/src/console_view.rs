use std::io::Write;

use tracing::warn;
use voice_journal_core::{JournalEntry, SessionSnapshot, UserNotice};

/// Command reference printed on `help` or unknown input.
pub(crate) const HELP: &str = "Commands: r = record/stop, n = next question, l = list entries, q = quit";

/// Renders session state and journal contents as terminal text.
pub struct ConsoleView<W: Write> {
    out: W,
    prompt_count: usize,
}

impl<W: Write> ConsoleView<W> {
    /// Create a view writing to `out` for a set of `prompt_count` prompts.
    pub fn new(out: W, prompt_count: usize) -> Self {
        Self { out, prompt_count }
    }

    /// Print the current prompt, status and available actions.
    pub fn render_snapshot(&mut self, snapshot: &SessionSnapshot) {
        let text = format_snapshot(snapshot, self.prompt_count);
        self.emit(&text);
    }

    /// Print a user-visible alert.
    pub fn render_notice(&mut self, notice: &UserNotice) {
        self.emit(&format!("!! {}", notice));
    }

    /// Print the saved journal.
    pub fn render_entries(&mut self, entries: &[JournalEntry]) {
        let text = format_entries(entries);
        self.emit(&text);
    }

    /// Print the command reference.
    pub fn render_help(&mut self) {
        self.emit(HELP);
    }

    /// Print a single informational line.
    pub fn render_line(&mut self, line: &str) {
        self.emit(line);
    }

    /// Consume the view and return its writer.
    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text).and_then(|()| self.out.flush()) {
            warn!(error = %e, "Failed to write to terminal");
        }
    }
}

/// Snapshot as a short block: prompt line, optional status, action line.
pub(crate) fn format_snapshot(snapshot: &SessionSnapshot, prompt_count: usize) -> String {
    let mut text = format!(
        "\n[{}/{}] {}",
        snapshot.prompt_index + 1,
        prompt_count,
        snapshot.prompt_text
    );

    let status = snapshot.status_label();
    if !status.is_empty() {
        text.push_str(&format!("\n      ({})", status));
    }

    let action = if snapshot.is_recording {
        "r = stop recording"
    } else {
        "r = record"
    };
    text.push_str(&format!("\n      {}", action));
    if snapshot.can_advance {
        text.push_str(" | n = next question");
    }
    text.push_str(" | l = list | q = quit");

    text
}

/// Journal listing, one entry per block, oldest first.
pub(crate) fn format_entries(entries: &[JournalEntry]) -> String {
    if entries.is_empty() {
        return "No journal entries yet.".to_string();
    }

    entries
        .iter()
        .map(|entry| {
            format!(
                "{}  Q{}: {}\n    {}",
                entry.created_at().format("%Y-%m-%d %H:%M"),
                entry.prompt_index() + 1,
                entry.prompt_text(),
                entry.audio_location()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
