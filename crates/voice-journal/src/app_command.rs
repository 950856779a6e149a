/// Commands sent from the input handler to the main application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Start recording, or stop and save the current recording.
    ToggleRecording,
    /// Move to the next prompt.
    NextPrompt,
    /// Print every saved journal entry.
    ListEntries,
    /// Print the command reference.
    Help,
    /// Request application shutdown.
    Shutdown,
}

impl AppCommand {
    /// Parse one line of terminal input. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let word = line.trim().to_ascii_lowercase();

        let command = match word.as_str() {
            "" => return None,
            "r" | "record" | "stop" => AppCommand::ToggleRecording,
            "n" | "next" => AppCommand::NextPrompt,
            "l" | "list" => AppCommand::ListEntries,
            "q" | "quit" | "exit" => AppCommand::Shutdown,
            _ => AppCommand::Help,
        };

        Some(command)
    }
}
