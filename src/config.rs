//! Configuration loading.
//!
//! The tool reads `.gcalsync.toml` from the working directory, falling back
//! to `<config dir>/gcalsync/.gcalsync.toml`.

use crate::error::{AppError, AppResult};
use log::{debug, info};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".gcalsync.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    pub google: GoogleConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    #[serde(default)]
    pub disable_reminders: bool,
    #[serde(default)]
    pub block_event_visibility: String,
    #[serde(default = "default_authorized_ports")]
    pub authorized_ports: Vec<u16>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            disable_reminders: false,
            block_event_visibility: String::new(),
            authorized_ports: default_authorized_ports(),
        }
    }
}

fn default_authorized_ports() -> Vec<u16> {
    vec![8080, 8081, 8082]
}

/// OAuth client credentials used to refresh account tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
}

impl Config {
    /// Locate the config file by name and load it.
    pub fn load(file_name: &str) -> AppResult<Self> {
        let path = locate(file_name)?;
        Self::from_path(&path)
    }

    pub fn from_path(path: &Path) -> AppResult<Self> {
        debug!("Reading config from {}", path.display());
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&contents).map_err(|e| {
            AppError::config(format!("failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn parse(contents: &str) -> AppResult<Self> {
        let config: Config = toml::from_str(contents)
            .map_err(|e| AppError::config(format!("invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.google.client_id.trim().is_empty() {
            return Err(AppError::config("google.client_id must not be empty"));
        }
        if self.google.client_secret.trim().is_empty() {
            return Err(AppError::config("google.client_secret must not be empty"));
        }
        Ok(())
    }
}

fn locate(file_name: &str) -> AppResult<PathBuf> {
    let local = PathBuf::from(file_name);
    if local.is_file() {
        return Ok(local);
    }

    if let Some(global) = dirs::config_dir().map(|dir| dir.join("gcalsync").join(file_name)) {
        if global.is_file() {
            return Ok(global);
        }
    }

    Err(AppError::config(format!(
        "{} not found in the current directory or the gcalsync config directory",
        file_name
    )))
}
