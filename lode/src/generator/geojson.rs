//! GeoJSON route loader.
//!
//! Reads a `FeatureCollection` and keeps its `Point` features in document
//! order. Per-fix data comes from the feature properties:
//!
//! ```json
//! {
//!   "type": "Feature",
//!   "geometry": { "type": "Point", "coordinates": [37.6156, 55.7522] },
//!   "properties": { "speed": 10, "elevation": "120.5", "transition": "manual" }
//! }
//! ```

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::debug;

use super::{GeneratorError, RouteGenerator, SourceParams};
use crate::position::{Position, Transition};

pub(crate) const POSITIONAL: &[&str] = &["path"];
pub(crate) const OPTIONS: &[&str] = &[];

/// Load the `Point` features of a GeoJSON document.
pub fn load_geojson(path: impl AsRef<Path>) -> Result<RouteGenerator, GeneratorError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| GeneratorError::io(path, e))?;
    let invalid = |reason: String| GeneratorError::GeoJson {
        path: path.to_path_buf(),
        reason,
    };

    let document: Value = serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;
    let root = document
        .as_object()
        .ok_or_else(|| invalid("top-level value is not an object".to_string()))?;
    let features = root
        .get("features")
        .ok_or_else(|| invalid("missing 'features'".to_string()))?
        .as_array()
        .ok_or_else(|| invalid("'features' is not an array".to_string()))?;

    let loaded_at = Utc::now();
    let mut positions = Vec::new();
    for (i, feature) in features.iter().enumerate() {
        let position = parse_feature(feature, loaded_at)
            .map_err(|e| invalid(format!("feature {}: {}", i, e)))?;
        positions.extend(position);
    }

    if positions.is_empty() {
        return Err(GeneratorError::NoPoints(path.to_path_buf()));
    }

    debug!(
        path = %path.display(),
        features = features.len(),
        points = positions.len(),
        "Loaded GeoJSON route"
    );
    Ok(RouteGenerator::new("geojson", positions))
}

pub(crate) fn from_params(params: &SourceParams) -> Result<RouteGenerator, GeneratorError> {
    load_geojson(params.required("path")?)
}

/// Returns `Ok(None)` for features that are not points.
fn parse_feature(feature: &Value, time: DateTime<Utc>) -> Result<Option<Position>, String> {
    let geometry = match feature.get("geometry") {
        Some(Value::Object(geometry)) => geometry,
        _ => return Ok(None),
    };
    if geometry.get("type").and_then(Value::as_str) != Some("Point") {
        return Ok(None);
    }

    let coordinates = geometry
        .get("coordinates")
        .and_then(Value::as_array)
        .filter(|c| c.len() >= 2)
        .ok_or("Point needs [lon, lat] coordinates")?;
    let lon = coordinates[0].as_f64().ok_or("longitude is not a number")?;
    let lat = coordinates[1].as_f64().ok_or("latitude is not a number")?;

    let empty = Map::new();
    let props = match feature.get("properties") {
        Some(Value::Object(props)) => props,
        _ => &empty,
    };

    let mut position = Position::new(
        0,
        lat,
        lon,
        number(props, "speed")?,
        number(props, "elevation")?,
        time,
    );
    position.duration = number(props, "duration")?;
    if let Some(value) = props.get("transition").filter(|v| !v.is_null()) {
        let text = value.as_str().ok_or("'transition' is not a string")?;
        position.transition = text.parse::<Transition>().map_err(|e| e.to_string())?;
    }
    position.description = match props.get("description") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    };

    Ok(Some(position))
}

/// Numeric property, accepting numbers and numeric strings. Absent means 0.
fn number(props: &Map<String, Value>, key: &str) -> Result<f64, String> {
    match props.get(key) {
        None | Some(Value::Null) => Ok(0.0),
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| format!("'{}' out of range", key)),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| format!("'{}' is not a number: {:?}", key, s)),
        Some(other) => Err(format!("'{}' is not a number: {}", key, other)),
    }
}
