//! File-backed key/value store for the personal best.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use game::{GameError, KeyValueStore};

const APP_DIR: &str = "coin-dash";

/// One file per key inside `dir`.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under the platform data directory, creating it if needed.
    pub fn open_default() -> Result<Self, GameError> {
        let dir = dirs::data_dir()
            .ok_or_else(|| GameError::Storage("no platform data directory".to_string()))?
            .join(APP_DIR);
        fs::create_dir_all(&dir)?;
        log::info!("personal best stored in {}", dir.display());
        Ok(Self::new(dir))
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.txt"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Some(value.trim().to_string()),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => {
                log::warn!("could not read {key}: {err}");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), GameError> {
        fs::write(self.path(key), value)?;
        Ok(())
    }
}
