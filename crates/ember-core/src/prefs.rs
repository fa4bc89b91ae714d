//! User preferences persisted as JSON.
//!
//! Stores the last-used project folder and port under a per-user
//! directory. Loading never fails the caller: a missing or unreadable
//! file falls back to the defaults so the application always starts.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

const CONFIG_DIR_NAME: &str = ".ember";
const CONFIG_FILE_NAME: &str = "config.json";

/// Errors from writing the preference file. Reads degrade to defaults
/// instead of erroring.
#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persisted user preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Last project folder served. Empty when none was chosen yet.
    pub last_project: String,
    /// Last port the dev server listened on.
    pub port: u16,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            last_project: String::new(),
            port: 8000,
        }
    }
}

/// On-disk preference store bound to one config directory.
pub struct PrefsStore {
    dir: PathBuf,
    pub data: Preferences,
}

impl PrefsStore {
    /// Open the store, loading whatever is on disk. `None` selects the
    /// default per-user directory.
    pub fn open(dir: Option<PathBuf>) -> Self {
        let dir = dir.unwrap_or_else(default_config_dir);
        let data = load_from(&dir.join(CONFIG_FILE_NAME));
        Self { dir, data }
    }

    fn file(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE_NAME)
    }

    /// Write the current preferences, creating the directory if needed.
    pub fn save(&self) -> Result<(), PrefsError> {
        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(&self.data)?;
        std::fs::write(self.file(), json)?;
        info!(file = %self.file().display(), "saved preferences");
        Ok(())
    }

    /// Remember a project folder and persist immediately.
    pub fn set_last_project(&mut self, path: &str) -> Result<(), PrefsError> {
        self.data.last_project = path.to_string();
        self.save()
    }

    /// Remember a port and persist immediately.
    pub fn set_port(&mut self, port: u16) -> Result<(), PrefsError> {
        self.data.port = port;
        self.save()
    }
}

fn load_from(file: &Path) -> Preferences {
    match std::fs::read_to_string(file) {
        Ok(text) => match serde_json::from_str(&text) {
            Ok(prefs) => {
                info!(file = %file.display(), "loaded preferences");
                prefs
            }
            Err(e) => {
                warn!(file = %file.display(), error = %e, "unreadable preference file, using defaults");
                Preferences::default()
            }
        },
        Err(_) => {
            info!("no preference file, using defaults");
            Preferences::default()
        }
    }
}

fn default_config_dir() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}
