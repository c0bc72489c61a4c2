//! Where the task file and the log live.

use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Overrides the configuration directory when set and non-empty.
pub const CONFIG_DIR_ENV: &str = "TERMINALTASK_CONFIG_DIR";
pub const APP_DIR_NAME: &str = "terminaltask";
pub const TASKS_FILE_NAME: &str = "tasks.json";
pub const LOG_FILE_NAME: &str = "terminaltask.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot determine a config directory; set TERMINALTASK_CONFIG_DIR")]
    NoConfigDir,
    #[error("create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub config_dir: PathBuf,
    pub tasks_file: PathBuf,
    pub log_file: PathBuf,
}

impl Config {
    /// Resolve paths without touching the filesystem.
    ///
    /// `env` looks up environment variables and `user_config_dir` is the
    /// platform config directory, both passed in so callers control them.
    pub fn resolve(
        env: impl Fn(&str) -> Option<String>,
        user_config_dir: Option<PathBuf>,
        file_override: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let config_dir = match env(CONFIG_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => user_config_dir
                .ok_or(ConfigError::NoConfigDir)?
                .join(APP_DIR_NAME),
        };
        let tasks_file = file_override.unwrap_or_else(|| config_dir.join(TASKS_FILE_NAME));
        let log_file = config_dir.join(LOG_FILE_NAME);
        Ok(Config {
            config_dir,
            tasks_file,
            log_file,
        })
    }

    /// Resolve from the process environment and create the config directory.
    pub fn load(file_override: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config = Self::resolve(|key| std::env::var(key).ok(), dirs::config_dir(), file_override)?;
        config.ensure_dirs()?;
        Ok(config)
    }

    pub fn ensure_dirs(&self) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.config_dir).map_err(|source| ConfigError::CreateDir {
            path: self.config_dir.clone(),
            source,
        })
    }
}
