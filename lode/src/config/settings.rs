//! Settings structs, one per `[section]` of the INI file.

use std::path::PathBuf;
use std::time::Duration;

use crate::logging::{default_log_dir, default_log_file};
use crate::server::{
    ServerConfig, DEFAULT_ACCEPT_POLL, DEFAULT_BACKLOG, DEFAULT_PORT, DEFAULT_WRITE_TIMEOUT,
};

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigFile {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
}

/// `[server]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    /// TCP port clients connect to.
    pub port: u16,
    /// Listen backlog.
    pub backlog: u32,
    /// Upper bound on one accept wait, in milliseconds.
    pub accept_poll_ms: u64,
    /// Per-client write deadline, in milliseconds.
    pub write_timeout_ms: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            backlog: DEFAULT_BACKLOG,
            accept_poll_ms: DEFAULT_ACCEPT_POLL.as_millis() as u64,
            write_timeout_ms: DEFAULT_WRITE_TIMEOUT.as_millis() as u64,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: default_log_dir(),
            file: default_log_file().to_string(),
        }
    }
}

impl ConfigFile {
    /// Server configuration built from the `[server]` section.
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            port: self.server.port,
            backlog: self.server.backlog,
            accept_poll: Duration::from_millis(self.server.accept_poll_ms),
            write_timeout: Duration::from_millis(self.server.write_timeout_ms),
        }
    }
}
