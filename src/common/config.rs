//! Configuration file handling

use serde::Deserialize;
use std::path::PathBuf;

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Remote store settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Local storage settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// New bill form settings
    #[serde(default)]
    pub new_bill: NewBillConfig,

    /// Rendering settings
    #[serde(default)]
    pub ui: UiConfig,
}

/// Remote store configuration
#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the bills API, with trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout for a single store request
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5678/".to_string()
}
fn default_request_timeout() -> u64 {
    30
}

/// Local storage configuration
#[derive(Debug, Deserialize, Default)]
pub struct StorageConfig {
    /// Override for the local storage file (defaults to the data directory)
    pub path: Option<PathBuf>,
}

/// New bill form configuration
#[derive(Debug, Deserialize, Clone)]
pub struct NewBillConfig {
    /// Proof file extensions accepted by the file input (case-insensitive)
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,

    /// VAT percentage used when the form leaves it blank
    #[serde(default = "default_pct")]
    pub default_pct: u32,
}

impl Default for NewBillConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: default_allowed_extensions(),
            default_pct: default_pct(),
        }
    }
}

fn default_allowed_extensions() -> Vec<String> {
    vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()]
}
fn default_pct() -> u32 {
    20
}

/// Rendering configuration
#[derive(Debug, Deserialize)]
pub struct UiConfig {
    /// Width of the proof modal in pixels
    #[serde(default = "default_modal_width")]
    pub modal_width: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            modal_width: default_modal_width(),
        }
    }
}

fn default_modal_width() -> u32 {
    800
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                let content = std::fs::read_to_string(&path).map_err(|e| {
                    super::Error::FileRead {
                        path: path.display().to_string(),
                        error: e.to_string(),
                    }
                })?;
                return Self::parse(&content);
            }
        }
        Ok(Self::default())
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }

    /// Resolve the local storage file path
    pub fn storage_path(&self) -> Option<PathBuf> {
        self.storage
            .path
            .clone()
            .or_else(super::paths::local_storage_path)
    }
}
