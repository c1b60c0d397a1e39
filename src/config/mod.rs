//! Configuration module for vbascout
//!
//! This module handles:
//! - Bot configuration (vbascout.toml): paths, search and issue policy
//! - GitHub credentials from the environment (see [`crate::github`])

mod bot_config;

pub use bot_config::{
    load_bot_config, BotConfig, ConfigError, IssuesConfig, PathsConfig, SearchConfig,
    DEFAULT_CONFIG_FILE,
};
