//! Locating and reading `~/.lode/config.ini`.

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use super::settings::ConfigFile;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// The file exists but could not be read or parsed as INI.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// A key holds a value outside its accepted range or format.
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigFile {
    /// Load configuration from the default path (`~/.lode/config.ini`).
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }
}

/// Get the path to the config directory (`~/.lode`).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".lode")
}

/// Get the path to the config file (`~/.lode/config.ini`).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::DEFAULT_PORT;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();

        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.server.backlog, 5);
        assert_eq!(config.server.accept_poll_ms, 1000);
        assert_eq!(config.server.write_timeout_ms, 5000);
        assert_eq!(config.logging.file, "lode.log");
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.ini");

        let config = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_server_config_conversion() {
        let mut config = ConfigFile::default();
        config.server.port = 5000;
        config.server.accept_poll_ms = 250;

        let server = config.server_config();
        assert_eq!(server.port, 5000);
        assert_eq!(server.backlog, 5);
        assert_eq!(server.accept_poll, Duration::from_millis(250));
        assert_eq!(server.write_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_config_paths() {
        assert!(config_directory().ends_with(".lode"));
        assert!(config_file_path().ends_with(".lode/config.ini"));
    }
}
