//! CLI runner: config loading and logging setup shared by the whole run.

use tracing::info;

use crate::error::CliError;
use lode::config::ConfigFile;
use lode::logging::{init_logging, LoggingGuard};

/// Runner that owns the loaded configuration and keeps logging alive.
pub struct CliRunner {
    /// Logging guard - keeps the file writer flushing while the runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    config: ConfigFile,
}

impl CliRunner {
    /// Load `~/.lode/config.ini` (or defaults) and initialize logging.
    ///
    /// # Arguments
    ///
    /// * `console` - Mirror log lines to stderr
    /// * `debug_mode` - Default to debug-level logging when `RUST_LOG` is unset
    pub fn new(console: bool, debug_mode: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let logging_guard = init_logging(
            &config.logging.directory,
            &config.logging.file,
            console,
            debug_mode,
        )
        .map_err(CliError::LoggingInit)?;

        info!(
            version = lode::VERSION,
            log = %config.logging.directory.join(&config.logging.file).display(),
            "Lode starting"
        );

        Ok(Self {
            logging_guard,
            config,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }
}
