//! Theme preference persistence
//!
//! The theme lives outside `config.toml` in a small string key-value store so
//! a host can back it with whatever preference storage the platform offers.
//! Records are JSON; decoding tolerates unknown fields and yields `None`
//! rather than an error when the stored value is unreadable.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tempfile::NamedTempFile;

/// Key under which the theme record is stored
pub const THEME_STORAGE_KEY: &str = "univibe.theme";

/// Visual theme selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    /// Follow the platform setting
    #[default]
    System,
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeMode::Light => write!(f, "light"),
            ThemeMode::Dark => write!(f, "dark"),
            ThemeMode::System => write!(f, "system"),
        }
    }
}

impl FromStr for ThemeMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            "system" | "auto" => Ok(ThemeMode::System),
            other => Err(ConfigError::ValidationError(format!(
                "unknown theme '{}', expected light, dark or system",
                other
            ))),
        }
    }
}

/// Persisted theme choice
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ThemeRecord {
    pub mode: ThemeMode,

    /// Optional accent colour as `#rrggbb`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
}

impl ThemeRecord {
    pub fn new(mode: ThemeMode) -> Self {
        Self {
            mode,
            accent_color: None,
        }
    }

    pub fn with_accent(mut self, accent: impl Into<String>) -> Self {
        self.accent_color = Some(accent.into());
        self
    }
}

/// JSON codec for `ThemeRecord`
pub struct ThemeSerializer;

impl ThemeSerializer {
    pub fn encode(record: &ThemeRecord) -> ConfigResult<String> {
        Ok(serde_json::to_string(record)?)
    }

    /// Decodes a stored record, returning `None` for anything unreadable
    pub fn decode(raw: &str) -> Option<ThemeRecord> {
        match serde_json::from_str(raw) {
            Ok(record) => Some(record),
            Err(e) => {
                log::debug!("Discarding unreadable theme record: {}", e);
                None
            }
        }
    }
}

/// String key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> ConfigResult<Option<String>>;
    fn set(&mut self, key: &str, value: String) -> ConfigResult<()>;
    fn remove(&mut self, key: &str) -> ConfigResult<()>;
}

/// In-memory store for tests and ephemeral sessions
#[derive(Debug, Default, Clone)]
pub struct MemoryKeyValueStore {
    entries: HashMap<String, String>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> ConfigResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> ConfigResult<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> ConfigResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object on disk
///
/// Every write replaces the whole file through a temp file and rename.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    path: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> ConfigResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| ConfigError::ReadError {
            path: self.path.clone(),
            source: e,
        })?;

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        Ok(serde_json::from_str(&contents)?)
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> ConfigResult<()> {
        let dir = self
            .path
            .parent()
            .ok_or_else(|| ConfigError::PathResolutionError {
                reason: "Preferences path has no parent directory".to_string(),
            })?;

        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| ConfigError::DirectoryCreationError {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(map)?;
        let mut temp_file = NamedTempFile::new_in(dir)?;
        temp_file.write_all(json.as_bytes())?;
        temp_file.flush()?;
        temp_file
            .persist(&self.path)
            .map_err(|e| ConfigError::WriteError {
                path: self.path.clone(),
                source: e.error,
            })?;

        log::debug!("Preferences saved to {}", self.path.display());
        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> ConfigResult<Option<String>> {
        Ok(self.read_map()?.remove(key))
    }

    fn set(&mut self, key: &str, value: String) -> ConfigResult<()> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value);
        self.write_map(&map)
    }

    fn remove(&mut self, key: &str) -> ConfigResult<()> {
        let mut map = self.read_map()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

/// Loads and saves the theme record through a `KeyValueStore`
pub struct ThemeStorageManager<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ThemeStorageManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the stored record, or `None` if absent or unreadable
    pub fn load(&self) -> Option<ThemeRecord> {
        match self.store.get(THEME_STORAGE_KEY) {
            Ok(Some(raw)) => ThemeSerializer::decode(&raw),
            Ok(None) => None,
            Err(e) => {
                log::warn!("Failed to read theme preference: {}", e);
                None
            }
        }
    }

    /// Stored mode, falling back to `ThemeMode::System`
    pub fn mode(&self) -> ThemeMode {
        self.load().map(|record| record.mode).unwrap_or_default()
    }

    pub fn save(&mut self, record: &ThemeRecord) -> ConfigResult<()> {
        let raw = ThemeSerializer::encode(record)?;
        self.store.set(THEME_STORAGE_KEY, raw)?;
        log::info!("Theme set to {}", record.mode);
        Ok(())
    }

    pub fn clear(&mut self) -> ConfigResult<()> {
        self.store.remove(THEME_STORAGE_KEY)
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
