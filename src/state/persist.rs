//! Local preference record.
//!
//! DESIGN
//! ======
//! Only two fields survive a restart: the dark-mode flag and the chat
//! session id. They live in one JSON record named [`STORAGE_NAME`], read
//! once when the store is built and rewritten whenever either changes.
//!
//! ERROR HANDLING
//! ==============
//! Loading never fails: a missing or unreadable record yields defaults.
//! Saving returns [`PersistError`]; the store logs it and carries on.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Record name; the file is `<dir>/reefwatch-storage.json`.
pub const STORAGE_NAME: &str = "reefwatch-storage";

const STORAGE_VERSION: u32 = 0;

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("preference file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("preference encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The persisted subset of application state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedPrefs {
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default)]
    pub chat_session_id: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    state: PersistedPrefs,
    #[serde(default)]
    version: u32,
}

#[derive(Clone, Debug)]
pub struct PrefsFile {
    path: PathBuf,
}

impl PrefsFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The standard record inside `dir`.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(format!("{STORAGE_NAME}.json")))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the record, falling back to defaults when absent or corrupt.
    #[must_use]
    pub fn load(&self) -> PersistedPrefs {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "no stored preferences");
                return PersistedPrefs::default();
            }
        };
        match serde_json::from_str::<Envelope>(&raw) {
            Ok(envelope) => envelope.state,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "ignoring unreadable preferences");
                PersistedPrefs::default()
            }
        }
    }

    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file written.
    pub fn save(&self, prefs: &PersistedPrefs) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let envelope = Envelope { state: prefs.clone(), version: STORAGE_VERSION };
        let json = serde_json::to_string(&envelope)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}
