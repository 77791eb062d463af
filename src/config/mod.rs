//! Configuration management for the coach

pub mod progress;
pub mod session;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::coach::{DEFAULT_MODEL, Language};
use crate::theme::Theme;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model identifier sent to the coaching service
    pub model: String,

    /// Base URL of the OpenAI-compatible endpoint
    pub base_url: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Fall back to the system keyring when the variable is unset
    pub use_keyring: bool,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Optional cap on generated tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Language used when none is given on the command line
    pub default_language: Language,

    /// Path to the challenge catalog
    pub catalog_path: PathBuf,

    /// Credit points again when an already completed problem is validated
    pub allow_repeat_credit: bool,

    /// Selected theme name
    pub theme: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            use_keyring: true,
            request_timeout_secs: 120,
            max_tokens: None,
            default_language: Language::Python,
            catalog_path: PathBuf::from("challenges.json"),
            allow_repeat_credit: true,
            theme: "Tokyo Night".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from disk, or create default if not exists
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific file, creating it if missing
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;
            serde_json::from_str(&contents).with_context(|| "Failed to parse config.json")
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let contents =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("", "", "dsa-coach")
            .context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("", "", "dsa-coach")
            .context("Failed to determine data directory")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    /// Get the active theme
    pub fn active_theme(&self) -> Theme {
        Theme::by_name(&self.theme).unwrap_or_default()
    }
}

/// Path of the progress document inside a data directory
pub fn progress_path(data_dir: &Path) -> PathBuf {
    data_dir.join("progress.json")
}

/// Path of the session state inside a data directory
pub fn session_path(data_dir: &Path) -> PathBuf {
    data_dir.join("session.json")
}
