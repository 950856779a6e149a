mod entry;
mod store;

pub use {
    entry::JournalEntry,
    store::{DEFAULT_JOURNAL_KEY, JournalStore},
};
