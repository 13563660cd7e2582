//! CSV route loader.
//!
//! One fix per row:
//!
//! ```text
//! point_number,latitude,longitude,speed,elevation[,duration[,transition[,description]]]
//! 1,55.7522,37.6156,10.0,120.5,2.0,auto,"Moscow, center"
//! ```
//!
//! The point number is ignored; fixes are renumbered in file order. Blank rows
//! and rows starting with `#` are skipped. Fields are trimmed, and a quoted
//! field may contain commas.

use std::fs;
use std::path::Path;

use ::csv::{ReaderBuilder, StringRecord, Trim};
use chrono::Utc;
use tracing::debug;

use super::{GeneratorError, RouteGenerator, SourceParams};
use crate::position::{Position, Transition};

pub(crate) const POSITIONAL: &[&str] = &["path"];
pub(crate) const OPTIONS: &[&str] = &[];

const MIN_COLUMNS: usize = 5;

/// Load every row of a CSV route file.
///
/// All fixes share one timestamp taken when the file is read.
pub fn load_csv(path: impl AsRef<Path>) -> Result<RouteGenerator, GeneratorError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| GeneratorError::io(path, e))?;
    let loaded_at = Utc::now();

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_reader(content.as_bytes());

    let mut positions = Vec::new();
    let mut record = StringRecord::new();
    loop {
        let more = reader
            .read_record(&mut record)
            .map_err(|e| csv_error(path, e.position().map_or(0, |p| p.line()), e.to_string()))?;
        if !more {
            break;
        }
        if record.iter().all(str::is_empty) {
            continue;
        }

        let line = record_line(&content, reader.position().byte());
        let position = parse_row(&record).map_err(|reason| csv_error(path, line, reason))?;
        positions.push(Position {
            time: loaded_at,
            ..position
        });
    }

    if positions.is_empty() {
        return Err(GeneratorError::NoPoints(path.to_path_buf()));
    }

    debug!(path = %path.display(), points = positions.len(), "Loaded CSV route");
    Ok(RouteGenerator::new("csv", positions))
}

pub(crate) fn from_params(params: &SourceParams) -> Result<RouteGenerator, GeneratorError> {
    load_csv(params.required("path")?)
}

fn csv_error(path: &Path, line: u64, reason: String) -> GeneratorError {
    GeneratorError::Csv {
        path: path.to_path_buf(),
        line: line as usize,
        reason,
    }
}

/// 1-based line on which the record ending at byte `end` finishes.
///
/// The reader's own record position is taken before skipped blank and
/// comment lines, so the line is counted back from the end instead.
fn record_line(content: &str, end: u64) -> u64 {
    let end = usize::try_from(end).unwrap_or(usize::MAX).min(content.len());
    let consumed = content.get(..end).unwrap_or(content);
    let body = consumed.trim_end_matches(&['\r', '\n'][..]);
    body.matches('\n').count() as u64 + 1
}

fn parse_row(row: &StringRecord) -> Result<Position, String> {
    if row.len() < MIN_COLUMNS {
        return Err(format!(
            "need at least {} columns, found {}",
            MIN_COLUMNS,
            row.len()
        ));
    }

    let lat = number(row, 1, "latitude")?;
    let lon = number(row, 2, "longitude")?;
    let speed = number(row, 3, "speed")?;
    let elevation = number(row, 4, "elevation")?;

    let mut position = Position::new(0, lat, lon, speed, elevation, Utc::now());
    if let Some(duration) = optional(row, 5) {
        position.duration = parse_number(duration, "duration")?;
    }
    if let Some(transition) = optional(row, 6) {
        position.transition = transition
            .parse::<Transition>()
            .map_err(|e| e.to_string())?;
    }
    if let Some(description) = row.get(7) {
        position.description = description.to_string();
    }
    Ok(position)
}

fn optional(row: &StringRecord, column: usize) -> Option<&str> {
    row.get(column).filter(|value| !value.is_empty())
}

fn number(row: &StringRecord, column: usize, name: &str) -> Result<f64, String> {
    parse_number(row.get(column).unwrap_or_default(), name)
}

fn parse_number(value: &str, name: &str) -> Result<f64, String> {
    value
        .parse()
        .map_err(|_| format!("invalid {} '{}'", name, value))
}
