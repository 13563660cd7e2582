//! Recorded NMEA log loader.
//!
//! One sentence per line. Lines that do not decode (unsupported sentence
//! types, void fixes, noise) are skipped, so a raw receiver dump can be
//! replayed as-is.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::{GeneratorError, RouteGenerator, SourceParams};
use crate::nmea;

pub(crate) const POSITIONAL: &[&str] = &["path"];
pub(crate) const OPTIONS: &[&str] = &["duration"];

/// Decode every usable line of an NMEA log, applying `duration` to each fix.
///
/// A log without a single decodable line yields an empty route.
pub fn load_nmea_log(
    path: impl AsRef<Path>,
    duration: f64,
) -> Result<RouteGenerator, GeneratorError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| GeneratorError::io(path, e))?;
    let content = String::from_utf8_lossy(&bytes);

    let mut positions = Vec::new();
    let mut skipped = 0usize;
    for (number, line) in content.lines().enumerate() {
        match nmea::decode(line) {
            Ok(mut position) => {
                position.duration = duration;
                positions.push(position);
            }
            Err(e) => {
                skipped += 1;
                debug!(line = number + 1, error = %e, "Skipping NMEA line");
            }
        }
    }

    debug!(
        path = %path.display(),
        points = positions.len(),
        skipped,
        "Loaded NMEA log"
    );
    Ok(RouteGenerator::new("nmea", positions))
}

pub(crate) fn from_params(params: &SourceParams) -> Result<RouteGenerator, GeneratorError> {
    let duration = params.named_f64("duration", 0.0)?;
    if !duration.is_finite() || duration < 0.0 {
        return Err(GeneratorError::InvalidParameter {
            name: "duration".to_string(),
            value: duration.to_string(),
            reason: "must be a non-negative number".to_string(),
        });
    }
    load_nmea_log(params.required("path")?, duration)
}
