//! Persisted player flags
//!
//! Shuffle and repeat survive restarts through a small key-value store. The
//! store never fails a load: a missing or unreadable file means defaults.

use crate::error::Result;
use encore_playback::PlayerSettings;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Storage for `PlayerSettings`
pub trait SettingsStore {
    /// Stored settings, or defaults when nothing usable is stored
    fn load(&self) -> PlayerSettings;

    /// Persist settings
    fn save(&self, settings: &PlayerSettings) -> Result<()>;
}

/// Settings kept as a JSON file
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> PlayerSettings {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No stored settings, using defaults");
                return PlayerSettings::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read settings");
                return PlayerSettings::default();
            }
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Corrupt settings file, using defaults");
            PlayerSettings::default()
        })
    }

    fn save(&self, settings: &PlayerSettings) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, serde_json::to_string_pretty(settings)?)?;
        debug!(path = %self.path.display(), "Settings saved");
        Ok(())
    }
}
