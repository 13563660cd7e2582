//! Integration tests for file-replay sources.
//!
//! These tests verify, through the public registry:
//! - CSV, GeoJSON and NMEA-log files load into finite routes
//! - Exhaustion is permanent
//! - Encoding a replayed fix and decoding it again recovers the fix
//!
//! Run with: `cargo test --test replay_integration`

use std::path::{Path, PathBuf};

use serde_json::json;
use tempfile::TempDir;

use lode::generator::{registry, Generator, GeneratorError};
use lode::nmea::{decode, encode_gga, encode_rmc};
use lode::Transition;

// ============================================================================
// Test Helpers
// ============================================================================

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn create(source: &str, path: &Path) -> Result<Generator, GeneratorError> {
    registry::create(source, &[path.to_str().unwrap()])
}

fn assert_exhausted(generator: &mut Generator) {
    for _ in 0..3 {
        assert!(generator.next().is_none(), "generator resurrected");
    }
    assert_eq!(generator.remaining(), Some(0));
}

// ============================================================================
// CSV
// ============================================================================

#[test]
fn test_csv_route_replays_then_exhausts() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "route.csv",
        "# point,lat,lon,speed,elevation,duration,transition,description\n\
         10,55.7522,37.6156,10.0,120.5,2.0,auto,\"Moscow, center\"\n\
         20,55.7530,37.6200,15.0,125.0,1.0,manual\n\
         30,55.7540,37.6250,20.0,130.0\n",
    );

    let mut generator = create("csv", &path).unwrap();
    assert_eq!(generator.source(), "csv");
    assert_eq!(generator.remaining(), Some(3));

    let first = generator.next().unwrap();
    assert_eq!(first.index, 1);
    assert_eq!(first.description, "Moscow, center");
    assert_eq!(first.duration, 2.0);

    let second = generator.next().unwrap();
    assert_eq!(second.index, 2);
    assert_eq!(second.transition, Transition::Manual);

    let third = generator.next().unwrap();
    assert_eq!(third.index, 3);
    assert_eq!(third.duration, 0.0);
    assert_eq!(third.transition, Transition::Auto);
    assert!(third.description.is_empty());

    assert_exhausted(&mut generator);
}

#[test]
fn test_csv_four_columns_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "short.csv", "1,55.75,37.61,10.0\n");

    match create("csv", &path) {
        Err(GeneratorError::Csv { line, reason, .. }) => {
            assert_eq!(line, 1);
            assert!(reason.contains("at least 5 columns"), "{}", reason);
        }
        other => panic!("expected CSV error, got {:?}", other.map(|g| g.source())),
    }
}

#[test]
fn test_csv_without_rows_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "empty.csv", "# nothing here\n");
    assert!(matches!(create("csv", &path), Err(GeneratorError::NoPoints(_))));
}

// ============================================================================
// GeoJSON
// ============================================================================

#[test]
fn test_geojson_points_only() {
    let dir = TempDir::new().unwrap();
    let document = json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [37.6156, 55.7522] },
                "properties": { "speed": 10, "duration": 1.5, "description": "start" }
            },
            {
                "type": "Feature",
                "geometry": { "type": "LineString", "coordinates": [[37.6, 55.7], [37.7, 55.8]] },
                "properties": {}
            },
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [37.6200, 55.7530] },
                "properties": { "elevation": "130", "transition": "manual" }
            }
        ]
    });
    let path = write_file(&dir, "route.geojson", &document.to_string());

    let mut generator = create("geojson", &path).unwrap();
    assert_eq!(generator.remaining(), Some(2));

    let first = generator.next().unwrap();
    assert_eq!((first.index, first.lat, first.lon), (1, 55.7522, 37.6156));
    assert_eq!(first.description, "start");

    let second = generator.next().unwrap();
    assert_eq!(second.index, 2);
    assert_eq!(second.elevation, 130.0);
    assert!(second.is_manual());

    assert_exhausted(&mut generator);
}

#[test]
fn test_geojson_without_features_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "bad.geojson", r#"{"type": "FeatureCollection"}"#);
    assert!(matches!(create("geojson", &path), Err(GeneratorError::GeoJson { .. })));
}

// ============================================================================
// NMEA log
// ============================================================================

#[test]
fn test_nmea_log_skips_garbage() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "track.nmea",
        "$GPRMC,081836.000,A,3751.650000,S,14507.360000,E,10.0,0.0,130998,,,A*7B\n\
         ~~ line noise ~~\n",
    );

    let mut generator = create("nmea", &path).unwrap();
    let only = generator.next().unwrap();
    assert_eq!(only.index, 1);
    assert!((only.lat + 37.860_833).abs() < 1e-6);
    assert!((only.lon - 145.122_666).abs() < 1e-6);
    assert!((only.speed - 18.52).abs() < 1e-9);
    assert_exhausted(&mut generator);
}

#[test]
fn test_nmea_log_duration_option() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "track.nmea",
        "$GNGGA,081836.000,3751.650000,S,14507.360000,E,1,08,1.0,12.5,M,0.0,M,,*58\n",
    );

    let mut generator =
        registry::create("nmea", &[path.to_str().unwrap(), "duration=0.5"]).unwrap();
    let fix = generator.next().unwrap();
    assert_eq!(fix.duration, 0.5);
    assert_eq!(fix.elevation, 12.5);
    assert_eq!(fix.speed, 0.0);
}

#[test]
fn test_nmea_log_without_valid_lines_is_empty() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "void.nmea", "$GPRMC,081836.000,V,,,,,,,130998,,,N*00\n");

    let mut generator = create("nmea", &path).unwrap();
    assert_eq!(generator.remaining(), Some(0));
    assert_exhausted(&mut generator);
}

// ============================================================================
// Codec round trip on replayed data
// ============================================================================

#[test]
fn test_replayed_fix_survives_encode_decode() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "route.csv", "1,-33.5,151.25,42.0,58.3\n");
    let fix = create("csv", &path).unwrap().next().unwrap();

    let from_rmc = decode(&encode_rmc(&fix)).unwrap();
    assert!((from_rmc.lat - fix.lat).abs() < 1e-6);
    assert!((from_rmc.lon - fix.lon).abs() < 1e-6);
    // Knots are written with one decimal.
    assert!((from_rmc.speed - fix.speed).abs() < 0.1);
    assert_eq!(from_rmc.elevation, 0.0);

    let from_gga = decode(&encode_gga(&fix)).unwrap();
    assert!((from_gga.lat - fix.lat).abs() < 1e-6);
    assert!((from_gga.lon - fix.lon).abs() < 1e-6);
    assert!((from_gga.elevation - fix.elevation).abs() < 0.05);
    assert_eq!(from_gga.speed, 0.0);
}
