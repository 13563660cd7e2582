//! RMC/GGA sentence encoding.

use super::{seal, SentencePair, KMH_TO_KNOTS};
use crate::position::Position;

/// GGA fix quality (1 = GPS fix).
const GGA_FIX_QUALITY: &str = "1";

/// GGA satellites in use.
const GGA_NUM_SATELLITES: &str = "08";

/// GGA horizontal dilution of precision.
const GGA_HDOP: &str = "1.0";

/// GGA geoid separation in meters.
const GGA_GEOID_SEPARATION: &str = "0.0";

/// RMC course over ground; the simulator does not report a track.
const RMC_COURSE: &str = "0.0";

/// Latitude and longitude rendered as NMEA `ddmm.mmmmmm` / `dddmm.mmmmmm` fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NmeaCoords {
    pub lat: String,
    pub lat_dir: char,
    pub lon: String,
    pub lon_dir: char,
}

/// Format a coordinate pair for RMC/GGA sentences.
///
/// Degrees are truncated toward zero and the minutes are the absolute
/// remainder, so `-33.5` becomes `3330.000000` with hemisphere `S`.
pub fn format_coords(lat: f64, lon: f64) -> NmeaCoords {
    NmeaCoords {
        lat: format_angle(lat, 2),
        lat_dir: if lat >= 0.0 { 'N' } else { 'S' },
        lon: format_angle(lon, 3),
        lon_dir: if lon >= 0.0 { 'E' } else { 'W' },
    }
}

fn format_angle(value: f64, degree_digits: usize) -> String {
    let degrees = value.trunc();
    let minutes = ((value - degrees) * 60.0).abs();
    format!(
        "{:0width$}{:09.6}",
        degrees.abs() as u32,
        minutes,
        width = degree_digits
    )
}

/// Generate an RMC sentence (time, position, speed in knots, date).
pub fn encode_rmc(position: &Position) -> String {
    let time = position.time.format("%H%M%S%.3f");
    let date = position.time.format("%d%m%y");
    let coords = format_coords(position.lat, position.lon);
    let speed_knots = position.speed * KMH_TO_KNOTS;

    let body = format!(
        "GPRMC,{},A,{},{},{},{},{:.1},{},{},,,A",
        time,
        coords.lat,
        coords.lat_dir,
        coords.lon,
        coords.lon_dir,
        speed_knots,
        RMC_COURSE,
        date
    );
    seal(&body)
}

/// Generate a GGA sentence (time, position, fix constants, elevation).
pub fn encode_gga(position: &Position) -> String {
    let time = position.time.format("%H%M%S%.3f");
    let coords = format_coords(position.lat, position.lon);

    let body = format!(
        "GPGGA,{},{},{},{},{},{},{},{},{:.1},M,{},M,,",
        time,
        coords.lat,
        coords.lat_dir,
        coords.lon,
        coords.lon_dir,
        GGA_FIX_QUALITY,
        GGA_NUM_SATELLITES,
        GGA_HDOP,
        position.elevation,
        GGA_GEOID_SEPARATION
    );
    seal(&body)
}

/// Encode both sentences for one fix.
pub fn encode_pair(position: &Position) -> SentencePair {
    SentencePair {
        rmc: encode_rmc(position),
        gga: encode_gga(position),
    }
}
