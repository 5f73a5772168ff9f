//! UniVibe Configuration System
//!
//! TOML-backed settings for the story viewer plus a small key-value
//! preference store used for the visual theme.
//!
//! # Architecture
//!
//! - **Trait-based**: each section implements `ConfigSection`
//! - **Graceful degradation**: invalid files fall back to defaults with warnings
//! - **Atomic writes**: config and preference files are replaced via rename
//!
//! # Example
//!
//! ```rust,no_run
//! use univibe_config::{Config, ConfigManager};
//!
//! let manager = ConfigManager::new().expect("Failed to initialize config");
//! let config = manager.load().unwrap_or_else(|e| {
//!     eprintln!("Config error: {}, using defaults", e);
//!     Config::default()
//! });
//!
//! println!("Story duration: {} ms", config.story.story_duration_ms);
//! ```

mod error;
mod manager;
mod persistence;
mod validation;

// Config sections
pub mod app_config;
pub mod story_config;

pub mod theme;

pub use error::{ConfigError, ConfigResult, ValidationError};
pub use manager::ConfigManager;
pub use persistence::ConfigPersistence;
pub use validation::{ConfigSection, Validator};

pub use app_config::{AppConfig, LogLevel};
pub use story_config::StoryConfig;
pub use theme::{
    FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, ThemeMode, ThemeRecord,
    ThemeSerializer, ThemeStorageManager, THEME_STORAGE_KEY,
};

use serde::{Deserialize, Serialize};

/// Current config file format version
pub const CONFIG_VERSION: u32 = 1;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Config file format version
    pub version: u32,

    /// Application-level settings
    pub app: AppConfig,

    /// Story playback timing
    pub story: StoryConfig,
}

impl Config {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the entire configuration
    ///
    /// Returns all validation errors found across all sections.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(mut e) = self.app.validate() {
            errors.append(&mut e);
        }

        if let Err(mut e) = self.story.validate() {
            errors.append(&mut e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Merges this config with another, preferring values from `other`
    ///
    /// Override chain: defaults < file < env vars < CLI args
    pub fn merge(&mut self, other: Config) {
        self.app.merge(other.app);
        self.story.merge(other.story);
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            app: AppConfig::default(),
            story: StoryConfig::default(),
        }
    }
}
