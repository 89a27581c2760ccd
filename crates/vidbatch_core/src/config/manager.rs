//! Config manager for loading settings files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::settings::Settings;
use crate::models::ConfigValidationError;

/// Errors that can occur during config operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value in '{}': {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: ConfigValidationError,
    },
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Loads a settings file.
pub struct ConfigManager {
    config_path: PathBuf,
    settings: Settings,
}

impl ConfigManager {
    /// Create a manager for the given path. Nothing is read until `load()`.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            settings: Settings::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Load and validate the config file. Missing file is an error.
    pub fn load(&mut self) -> ConfigResult<()> {
        let path = &self.config_path;
        if !path.exists() {
            return Err(ConfigError::NotFound(path.clone()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let settings: Settings = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        settings.validate().map_err(|source| ConfigError::Invalid {
            path: path.clone(),
            source,
        })?;

        tracing::debug!("Loaded config from {}", path.display());
        self.settings = settings;
        Ok(())
    }

    /// Settings from `path` when given, built-in defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Settings> {
        match path {
            Some(path) => {
                let mut manager = Self::new(path);
                manager.load()?;
                Ok(manager.settings)
            }
            None => Ok(Settings::default()),
        }
    }
}
