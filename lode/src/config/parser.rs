//! INI parsing: maps `[section] key` pairs onto [`ConfigFile`] fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::file::ConfigFileError;
use super::settings::ConfigFile;

const PORT_REASON: &str = "must be a port number (0-65535)";
const COUNT_REASON: &str = "must be a positive integer";
const MILLIS_REASON: &str = "must be a positive integer (milliseconds)";

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [server] section
    if let Some(section) = ini.section(Some("server")) {
        if let Some(port) = parse_key::<u16>(section, "server", "port", PORT_REASON)? {
            config.server.port = port;
        }
        if let Some(backlog) = parse_key::<u32>(section, "server", "backlog", COUNT_REASON)? {
            if backlog == 0 {
                return Err(invalid("server", "backlog", "0", COUNT_REASON));
            }
            config.server.backlog = backlog;
        }
        if let Some(ms) = parse_key::<u64>(section, "server", "accept_poll_ms", MILLIS_REASON)? {
            if ms == 0 {
                return Err(invalid("server", "accept_poll_ms", "0", MILLIS_REASON));
            }
            config.server.accept_poll_ms = ms;
        }
        if let Some(ms) = parse_key::<u64>(section, "server", "write_timeout_ms", MILLIS_REASON)? {
            if ms == 0 {
                return Err(invalid("server", "write_timeout_ms", "0", MILLIS_REASON));
            }
            config.server.write_timeout_ms = ms;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if v.contains('/') || v.contains('\\') {
                return Err(invalid("logging", "file", v, "must be a file name, not a path"));
            }
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    Ok(config)
}

fn parse_key<T: FromStr>(
    section: &Properties,
    section_name: &str,
    key: &str,
    reason: &str,
) -> Result<Option<T>, ConfigFileError> {
    match section.get(key) {
        None => Ok(None),
        Some(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| invalid(section_name, key, v, reason)),
    }
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Expand a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
