use crate::config::default_journal_key;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Journal storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalConfig {
    /// Directory holding the key-value files.
    pub storage_dir: PathBuf,

    /// Directory receiving recorded WAV files.
    pub recordings_dir: PathBuf,

    /// Storage key of the journal.
    #[serde(default = "default_journal_key")]
    pub key: String,
}
