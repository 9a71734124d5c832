//! Configuration handling for tunl

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Base URL of the local Pritunl client daemon
pub const DEFAULT_DAEMON_URL: &str = "http://localhost:9770/";

/// Where the Pritunl desktop app keeps the daemon auth key
pub const DEFAULT_AUTH_KEY_PATH: &str = "/Applications/Pritunl.app/Contents/Resources/auth";

/// Keychain service name the Pritunl app stores profile secrets under
pub const DEFAULT_SECRET_SERVICE: &str = "pritunl";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub daemon: DaemonConfig,
    #[serde(default)]
    pub profiles: ProfilesConfig,
    #[serde(default)]
    pub secrets: SecretsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Base URL, endpoint names are appended to it
    pub url: String,
    /// File holding the value of the `Auth-Key` header
    pub auth_key_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilesConfig {
    /// Directory scanned for `*.conf` profile descriptors
    pub directory: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretsConfig {
    pub service: String,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DAEMON_URL.to_string(),
            auth_key_path: PathBuf::from(DEFAULT_AUTH_KEY_PATH),
        }
    }
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            directory: default_profiles_dir(),
        }
    }
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            service: DEFAULT_SECRET_SERVICE.to_string(),
        }
    }
}

/// Profile directory used by the Pritunl desktop app
///
/// `~/Library/Application Support/pritunl/profiles` on macOS,
/// `~/.config/pritunl/profiles` on Linux.
fn default_profiles_dir() -> PathBuf {
    if let Some(config) = dirs::config_dir() {
        return config.join("pritunl").join("profiles");
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join("pritunl")
            .join("profiles");
    }

    PathBuf::from("profiles")
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}
