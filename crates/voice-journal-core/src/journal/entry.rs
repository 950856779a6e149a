use crate::platform::AudioLocation;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// One persisted answer: where the audio lives and which prompt it answers.
///
/// Field names and order match the stored JSON array. The legacy names
/// `uri` and `question` are accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    #[serde(rename = "audioLocation", alias = "uri")]
    audio_location: String,
    #[serde(rename = "promptText", alias = "question")]
    prompt_text: String,
    #[serde(rename = "date", with = "iso8601_millis")]
    created_at: DateTime<Utc>,
    #[serde(rename = "questionIndex")]
    prompt_index: usize,
}

impl JournalEntry {
    /// Timestamps are truncated to milliseconds, the precision of the stored
    /// format, so an entry compares equal to itself after a reload.
    pub(crate) fn new(
        audio_location: AudioLocation,
        prompt_text: impl Into<String>,
        prompt_index: usize,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            audio_location: audio_location.into_inner(),
            prompt_text: prompt_text.into(),
            created_at: created_at.trunc_subsecs(3),
            prompt_index,
        }
    }

    /// Reference to the recorded audio.
    pub fn audio_location(&self) -> &str {
        &self.audio_location
    }

    /// Prompt text shown while the answer was recorded.
    pub fn prompt_text(&self) -> &str {
        &self.prompt_text
    }

    /// Capture completion time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Index of the prompt at capture time.
    pub fn prompt_index(&self) -> usize {
        self.prompt_index
    }
}

/// `2024-05-01T18:30:00.000Z` style timestamps.
mod iso8601_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub(super) fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| D::Error::custom(format!("invalid date {:?}: {}", raw, e)))
    }
}
