//! Bot configuration
//!
//! Loaded from `vbascout.toml` in the working directory (or the path given
//! with `--config`). Every key is optional.
//!
//! # Configuration Format
//!
//! ```toml
//! # vbascout.toml
//!
//! [paths]
//! scratch_dir = "repos"
//! exclusion_file = "exclusion.txt"
//! templates_dir = "templates"   # built-in templates when absent
//!
//! [search]
//! query = "VBA"
//! sort = "updated"
//! per_page = 30
//! pages = 1
//! page_delay_secs = 5
//!
//! [issues]
//! suppression_months = 3
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_CONFIG_FILE: &str = "vbascout.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub paths: PathsConfig,
    pub search: SearchConfig,
    pub issues: IssuesConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Where repositories are cloned
    pub scratch_dir: PathBuf,
    pub exclusion_file: PathBuf,
    /// Directory with `check_<x>.md` overrides
    pub templates_dir: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            scratch_dir: PathBuf::from("repos"),
            exclusion_file: PathBuf::from("exclusion.txt"),
            templates_dir: Some(PathBuf::from("templates")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub query: String,
    pub sort: String,
    pub per_page: u32,
    pub pages: u32,
    /// Pause between search pages
    pub page_delay_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            query: "VBA".to_string(),
            sort: "updated".to_string(),
            per_page: 30,
            pages: 1,
            page_delay_secs: 5,
        }
    }
}

impl SearchConfig {
    pub fn page_delay(&self) -> Duration {
        Duration::from_secs(self.page_delay_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssuesConfig {
    /// A closed issue blocks an identical new one for this many months
    pub suppression_months: u32,
}

impl Default for IssuesConfig {
    fn default() -> Self {
        Self {
            suppression_months: 3,
        }
    }
}

impl BotConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.search.per_page) {
            return Err(ConfigError::Invalid(format!(
                "search.per_page must be between 1 and 100, got {}",
                self.search.per_page
            )));
        }
        if self.search.query.trim().is_empty() {
            return Err(ConfigError::Invalid("search.query is empty".to_string()));
        }
        Ok(())
    }
}

/// Parse and validate a config file
pub fn load_toml_config(path: &Path) -> Result<BotConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: BotConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load the bot configuration.
///
/// A missing file gives the defaults; a broken one is reported and ignored.
pub fn load_bot_config(path: Option<&Path>) -> BotConfig {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    if !path.exists() {
        debug!("No config at {}, using defaults", path.display());
        return BotConfig::default();
    }

    match load_toml_config(path) {
        Ok(config) => {
            debug!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("Failed to load {}: {}", path.display(), e);
            BotConfig::default()
        }
    }
}

#[cfg(test)]
mod tests;
