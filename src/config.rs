//! Configuration loaded from YAML
//!
//! Every field is optional in the file; absent fields take the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_USER_AGENT};
use crate::error::ConfigError;
use crate::models::{Environment, KeyValueEntry, StoredRequest};

/// A fixed default header shown in every request editor
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetHeader {
    pub key: String,
    pub value: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl PresetHeader {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        PresetHeader {
            key: key.into(),
            value: value.into(),
            enabled: true,
        }
    }

    /// Fresh preset row; ids are minted per editor instance
    pub fn to_entry(&self) -> KeyValueEntry {
        KeyValueEntry::preset(self.key.clone(), self.value.clone(), self.enabled)
    }
}

pub fn default_preset_headers() -> Vec<PresetHeader> {
    vec![
        PresetHeader::new("User-Agent", DEFAULT_USER_AGENT),
        PresetHeader::new("Accept", "*/*"),
        PresetHeader::new("Accept-Encoding", "gzip, deflate, br"),
        PresetHeader::new("Connection", "keep-alive"),
    ]
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub preset_headers: Vec<PresetHeader>,
    pub environments: Vec<Environment>,
    pub requests: Vec<StoredRequest>,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            preset_headers: default_preset_headers(),
            environments: Vec::new(),
            requests: Vec::new(),
            log_file: None,
        }
    }
}

impl Config {
    /// `<config dir>/callisto/config.yaml`, falling back to the working directory
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    pub fn from_yaml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content, path)
    }

    /// Like [`Config::load`], but a missing file yields the defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }
}
