//! Configuration structures and loading logic.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub portal: PortalConfig,

    #[serde(default)]
    pub options: OptionsConfig,
}

/// Portal connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Portal base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Browser user agent string sent with every request. The origin
    /// rejects clients that do not look like a browser.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Total per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Seconds to wait for a course's materials listing to settle.
    #[serde(default = "default_page_wait")]
    pub page_wait_secs: u64,
}

/// Download options configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Base directory for downloaded materials.
    #[serde(default)]
    pub download_directory: Option<PathBuf>,

    /// Maximum in-flight downloads within one course.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_downloads: usize,

    /// Whether to show download progress.
    #[serde(default = "default_true")]
    pub show_downloads: bool,

    /// Whether to log skipped (already present) files.
    #[serde(default = "default_true")]
    pub show_skipped_downloads: bool,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout(),
            page_wait_secs: default_page_wait(),
        }
    }
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            download_directory: None,
            max_concurrent_downloads: default_max_concurrent(),
            show_downloads: true,
            show_skipped_downloads: true,
        }
    }
}

fn default_base_url() -> String {
    "https://portal.aiub.edu/".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string()
}

fn default_request_timeout() -> u64 {
    300
}

fn default_page_wait() -> u64 {
    10
}

fn default_max_concurrent() -> usize {
    8
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the effective download directory.
    pub fn download_directory(&self) -> PathBuf {
        self.options
            .download_directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("downloads"))
    }
}
