mod audio_config;
#[allow(clippy::module_inception)]
mod config;
mod journal_config;
mod prompts_config;

pub(crate) use {
    audio_config::AudioConfig, config::Config, journal_config::JournalConfig,
    prompts_config::PromptsConfig,
};

pub(crate) const DEFAULT_CONFIG_FILE: &str = "config.toml";

pub(crate) const DEFAULT_QUESTIONS: [&str; 5] = [
    "Talk me through how today went, for you. How were you feeling physically and mentally?",
    "What was the highlight of your day?",
    "What challenged you today and how did you handle it?",
    "What are you grateful for today?",
    "How would you rate your energy levels throughout the day?",
];

pub(crate) fn default_journal_key() -> String {
    voice_journal_core::DEFAULT_JOURNAL_KEY.to_string()
}

pub(crate) fn default_questions() -> Vec<String> {
    DEFAULT_QUESTIONS.iter().map(|q| q.to_string()).collect()
}
