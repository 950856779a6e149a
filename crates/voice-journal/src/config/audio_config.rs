use serde::{Deserialize, Serialize};
use voice_journal_core::QualityPreset;

/// Audio capture configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Recording quality preset (`high` or `low`).
    #[serde(default)]
    pub quality: QualityPreset,
}
