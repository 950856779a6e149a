use crate::{
    error::{PlatformError, PlatformResult},
    platform::KeyValueStore,
};

use std::{
    fs,
    io::{ErrorKind, Write},
    panic::Location,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use error_location::ErrorLocation;
use tracing::{debug, instrument, warn};

/// Key-value store keeping one `<key>.json` file per key in a directory.
///
/// Writes go to a temporary file that is synced and then renamed over the
/// target, so a crash mid-write leaves the previous value intact. A failed
/// write removes its temporary file.
///
/// File access uses blocking `std::fs` calls on the calling task. Values are
/// small and the store expects a single owner issuing one call at a time.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[track_caller]
    fn path_for(&self, key: &str) -> PlatformResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');

        if !valid {
            return Err(PlatformError::Storage {
                reason: format!("Invalid storage key: {:?}", key),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> PlatformResult<Option<String>> {
        let path = self.path_for(key)?;

        match fs::read_to_string(&path) {
            Ok(contents) => {
                debug!(path = ?path, bytes = contents.len(), "Value loaded");
                Ok(Some(contents))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, value))]
    async fn set(&self, key: &str, value: String) -> PlatformResult<()> {
        let path = self.path_for(key)?;

        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
            debug!(dir = ?self.dir, "Created storage directory");
        }

        let temp_path = path.with_extension("json.tmp");

        if let Err(e) = write_replacing(&temp_path, &path, value.as_bytes()) {
            match fs::remove_file(&temp_path) {
                Ok(()) => debug!(path = ?temp_path, "Removed temp file of failed write"),
                Err(cleanup) if cleanup.kind() == ErrorKind::NotFound => {}
                Err(cleanup) => {
                    warn!(path = ?temp_path, error = %cleanup, "Failed to remove temp file")
                }
            }
            return Err(e.into());
        }

        debug!(path = ?path, bytes = value.len(), "Value saved (atomic write)");

        Ok(())
    }
}

fn write_replacing(temp_path: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut temp_file = fs::File::create(temp_path)?;
    temp_file.write_all(bytes)?;
    temp_file.sync_all()?;
    fs::rename(temp_path, path)
}
