/// CLI configuration
use crate::error::{CliError, Result};
use encore_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "encore.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub settings: SettingsFile,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SettingsFile {
    #[serde(default = "default_settings_path")]
    pub path: PathBuf,
}

impl CliConfig {
    /// Load configuration from file and environment
    ///
    /// `path` must exist when given; otherwise `encore.toml` is read if
    /// present. Environment variables (`ENCORE_SERVER__URL`, ...) win.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, environment())
    }

    pub(crate) fn load_with(path: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        let config = settings.add_source(env).build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.url.trim().is_empty() {
            return Err(CliError::Config(
                "Server URL is required (set ENCORE_SERVER__URL)".to_string(),
            ));
        }

        if self.playback.history_size == 0 {
            return Err(CliError::Config(
                "History size must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("ENCORE")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

// Default values
impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            url: default_url(),
            token: None,
        }
    }
}

impl Default for SettingsFile {
    fn default() -> Self {
        Self {
            path: default_settings_path(),
        }
    }
}

fn default_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_settings_path() -> PathBuf {
    PathBuf::from("encore-settings.json")
}
