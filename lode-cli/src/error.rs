//! CLI error handling with user-friendly messages.
//!
//! Every failure before streaming starts ends the process with exit code 1.

use std::fmt;
use std::process;

use lode::config::ConfigFileError;
use lode::generator::{registry, GeneratorError};
use lode::server::ServerError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(std::io::Error),
    /// Config file could not be loaded
    Config(ConfigFileError),
    /// Generator could not be built or its file could not be loaded
    Source(GeneratorError),
    /// Listener could not be started
    Server(ServerError),
    /// Ctrl+C handler could not be installed
    Signal(String),
    /// Async runtime could not be created
    Runtime(std::io::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Source(
                GeneratorError::UnknownSource { .. }
                | GeneratorError::MissingParameter(_)
                | GeneratorError::UnknownParameter(_),
            ) => {
                eprintln!();
                eprintln!("Available sources:");
                for entry in registry::sources() {
                    eprintln!("  --source {:<48} {}", entry.usage(), entry.summary);
                }
            }
            CliError::Server(ServerError::Bind { port, .. }) => {
                eprintln!();
                eprintln!("Common issues:");
                eprintln!("  1. Another process is already listening on port {}", port);
                eprintln!("  2. Ports below 1024 need elevated privileges");
                eprintln!("  Try another port: lode-server <PORT> --source ...");
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!(
                    "Check {} or remove it to use defaults.",
                    lode::config::config_file_path().display()
                );
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Source(e) => write!(f, "Failed to create position source: {}", e),
            CliError::Server(e) => write!(f, "Failed to start server: {}", e),
            CliError::Signal(msg) => write!(f, "Failed to set signal handler: {}", msg),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::LoggingInit(e) => Some(e),
            CliError::Config(e) => Some(e),
            CliError::Source(e) => Some(e),
            CliError::Server(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            CliError::Signal(_) => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<GeneratorError> for CliError {
    fn from(e: GeneratorError) -> Self {
        CliError::Source(e)
    }
}

impl From<ServerError> for CliError {
    fn from(e: ServerError) -> Self {
        CliError::Server(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_wraps_source_error() {
        let err = CliError::from(GeneratorError::MissingParameter("lat"));
        assert_eq!(
            err.to_string(),
            "Failed to create position source: missing required parameter 'lat'"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_signal_error_has_no_source() {
        let err = CliError::Signal("already set".to_string());
        assert_eq!(err.to_string(), "Failed to set signal handler: already set");
        assert!(err.source().is_none());
    }
}
