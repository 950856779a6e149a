use crate::config::default_questions;

use serde::{Deserialize, Serialize};

/// Journaling prompts, asked in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptsConfig {
    /// Prompt texts.
    #[serde(default = "default_questions")]
    pub questions: Vec<String>,
}
