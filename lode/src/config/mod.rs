//! User configuration loaded from `~/.lode/config.ini`.
//!
//! Every key is optional; a missing file or section leaves the defaults in
//! place.
//!
//! ```ini
//! [server]
//! port = 10110
//! backlog = 5
//! accept_poll_ms = 1000
//! write_timeout_ms = 5000
//!
//! [logging]
//! directory = ~/.lode/logs
//! file = lode.log
//! ```

mod file;
mod parser;
mod settings;

pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{ConfigFile, LoggingSettings, ServerSettings};
