//! Reading and writing `config.toml`
//!
//! Saves go through a sibling temp file that is renamed over the target, and
//! the previous file is kept as `config.toml.backup`.

use crate::{Config, ConfigError, ConfigResult, ValidationError, CONFIG_VERSION};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Owns the on-disk location of one config file
pub struct ConfigPersistence {
    config_path: PathBuf,
}

impl ConfigPersistence {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Reads the config file, falling back to defaults when it is absent.
    ///
    /// Blank files and files written by a newer release are errors. Values
    /// that fail validation are kept and only logged.
    pub fn load(&self) -> ConfigResult<Config> {
        let contents = match fs::read_to_string(&self.config_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!(
                    "No config at {}, using defaults",
                    self.config_path.display()
                );
                return Ok(Config::default());
            }
            Err(e) => return Err(self.read_error(e)),
        };

        if contents.trim().is_empty() {
            return Err(self.read_error(io::Error::new(
                io::ErrorKind::InvalidData,
                "config file is blank",
            )));
        }

        let config: Config = toml::from_str(&contents).map_err(|source| ConfigError::ParseError {
            path: self.config_path.clone(),
            source,
        })?;

        if config.version > CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
                supported: CONFIG_VERSION,
            });
        }

        if let Err(errors) = config.validate() {
            log::warn!(
                "{} has invalid settings: {}",
                self.config_path.display(),
                join_errors(&errors)
            );
        }

        Ok(config)
    }

    /// Rejects invalid configs, then replaces the file atomically
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        config
            .validate()
            .map_err(|errors| ConfigError::ValidationError(join_errors(&errors)))?;

        let dir = self
            .config_path
            .parent()
            .ok_or_else(|| ConfigError::PathResolutionError {
                reason: format!("{} has no parent directory", self.config_path.display()),
            })?;
        fs::create_dir_all(dir).map_err(|source| ConfigError::DirectoryCreationError {
            path: dir.to_path_buf(),
            source,
        })?;

        if self.config_path.exists() {
            let backup = self.config_path.with_extension("toml.backup");
            fs::copy(&self.config_path, &backup).map_err(|source| ConfigError::BackupError { source })?;
            log::debug!("Previous config kept at {}", backup.display());
        }

        let rendered = toml::to_string_pretty(config)?;
        self.replace_with(dir, &rendered)?;

        log::info!("Config saved to {}", self.config_path.display());
        Ok(())
    }

    /// Writes the default config over whatever is there
    pub fn generate_default(&self) -> ConfigResult<()> {
        self.save(&Config::default())?;
        log::info!("Generated default config at {}", self.config_path.display());
        Ok(())
    }

    fn replace_with(&self, dir: &Path, contents: &str) -> ConfigResult<()> {
        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(contents.as_bytes())?;
        staged.flush()?;
        staged
            .persist(&self.config_path)
            .map_err(|e| ConfigError::WriteError {
                path: self.config_path.clone(),
                source: e.error,
            })?;
        Ok(())
    }

    fn read_error(&self, source: io::Error) -> ConfigError {
        ConfigError::ReadError {
            path: self.config_path.clone(),
            source,
        }
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
