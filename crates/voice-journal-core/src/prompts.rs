use crate::{CoreError, CoreResult};

use std::panic::Location;

use error_location::ErrorLocation;

/// Fixed, non-empty, ordered list of journaling prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSet {
    prompts: Vec<String>,
}

impl PromptSet {
    /// Build a prompt set.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyPromptSet`] if `prompts` is empty.
    #[track_caller]
    pub fn new<I, S>(prompts: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prompts: Vec<String> = prompts.into_iter().map(Into::into).collect();

        if prompts.is_empty() {
            return Err(CoreError::EmptyPromptSet {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Self { prompts })
    }

    /// Prompt text at `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.prompts.get(index).map(String::as_str)
    }

    /// Number of prompts. Always at least one.
    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    /// Whether the set has no prompts. `false` for every constructed set.
    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    /// Highest valid prompt index.
    pub fn last_index(&self) -> usize {
        self.prompts.len().saturating_sub(1)
    }
}
