//! Lenient RMC/GGA decoding for NMEA log replay.
//!
//! The checksum suffix is stripped but never verified. RMC carries no
//! elevation and GGA carries no speed; both default to `0.0`.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use thiserror::Error;

use super::KNOTS_TO_KMH;
use crate::position::Position;

/// Minimum number of comma-separated fields (talker id included) for RMC and GGA.
const MIN_FIELDS: usize = 10;

/// Century assumed for two-digit RMC years.
const RMC_CENTURY: i32 = 2000;

/// Errors produced while decoding a sentence.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NmeaError {
    /// The line does not begin with `$`.
    #[error("not an NMEA sentence (missing '$')")]
    MissingStart,

    /// Talker/sentence id is not one of the supported RMC/GGA variants.
    #[error("unsupported sentence type '{0}'")]
    UnsupportedSentence(String),

    /// Fewer fields than the sentence type requires.
    #[error("{kind} sentence has {found} fields, need at least 10")]
    TooFewFields { kind: &'static str, found: usize },

    /// RMC status flag is not `A` (data valid).
    #[error("RMC status is '{0}', expected 'A'")]
    InvalidStatus(String),

    /// A numeric field failed to parse.
    #[error("invalid {field} value '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    /// Time or date fields are missing or out of range.
    #[error("invalid timestamp (time '{time}', date '{date}')")]
    InvalidTimestamp { time: String, date: String },
}

/// Decode an RMC or GGA sentence into a [`Position`].
///
/// Accepts `GPRMC`/`RMC`/`GNRMC` and `GPGGA`/`GGA`/`GNGGA`. The returned
/// position has index 0, no pacing delay and an automatic transition; callers
/// that replay logs assign their own indices.
pub fn decode(sentence: &str) -> Result<Position, NmeaError> {
    if !sentence.starts_with('$') {
        return Err(NmeaError::MissingStart);
    }
    let sentence = sentence.trim_end();
    let body = match sentence.find('*') {
        Some(end) => &sentence[1..end],
        None => &sentence[1..],
    };
    let fields: Vec<&str> = body.split(',').collect();

    match fields[0] {
        "GPRMC" | "RMC" | "GNRMC" => decode_rmc(&fields),
        "GPGGA" | "GGA" | "GNGGA" => decode_gga(&fields),
        other => Err(NmeaError::UnsupportedSentence(other.to_string())),
    }
}

fn decode_rmc(fields: &[&str]) -> Result<Position, NmeaError> {
    if fields.len() < MIN_FIELDS {
        return Err(NmeaError::TooFewFields {
            kind: "RMC",
            found: fields.len(),
        });
    }
    if fields[2] != "A" {
        return Err(NmeaError::InvalidStatus(fields[2].to_string()));
    }

    let lat = parse_coordinate(fields[3], fields[4], 2, "S", "latitude")?;
    let lon = parse_coordinate(fields[5], fields[6], 3, "W", "longitude")?;
    let speed = parse_optional(fields[7], "speed")? * KNOTS_TO_KMH;
    let time = parse_timestamp(fields[1], fields[9])?;

    Ok(Position::new(0, lat, lon, speed, 0.0, time))
}

fn decode_gga(fields: &[&str]) -> Result<Position, NmeaError> {
    if fields.len() < MIN_FIELDS {
        return Err(NmeaError::TooFewFields {
            kind: "GGA",
            found: fields.len(),
        });
    }

    let lat = parse_coordinate(fields[2], fields[3], 2, "S", "latitude")?;
    let lon = parse_coordinate(fields[4], fields[5], 3, "W", "longitude")?;
    let elevation = parse_optional(fields[9], "elevation")?;
    let time = parse_timestamp(fields[1], "")?;

    Ok(Position::new(0, lat, lon, 0.0, elevation, time))
}

/// Parse `ddmm.mmmm` / `dddmm.mmmm` plus hemisphere into signed degrees.
///
/// An empty value or hemisphere yields 0.0.
fn parse_coordinate(
    value: &str,
    hemisphere: &str,
    degree_digits: usize,
    negative: &str,
    field: &'static str,
) -> Result<f64, NmeaError> {
    if value.is_empty() || hemisphere.is_empty() {
        return Ok(0.0);
    }
    let invalid = || NmeaError::InvalidNumber {
        field,
        value: value.to_string(),
    };

    let degrees: u32 = value
        .get(..degree_digits)
        .and_then(|d| d.parse().ok())
        .ok_or_else(invalid)?;
    let minutes: f64 = value
        .get(degree_digits..)
        .and_then(|m| m.parse().ok())
        .ok_or_else(invalid)?;

    let angle = degrees as f64 + minutes / 60.0;
    Ok(if hemisphere == negative { -angle } else { angle })
}

/// Parse an optional numeric field; empty means 0.0.
fn parse_optional(value: &str, field: &'static str) -> Result<f64, NmeaError> {
    if value.is_empty() {
        return Ok(0.0);
    }
    value.parse().map_err(|_| NmeaError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// Combine `hhmmss[.sss]` with an optional `ddmmyy` date.
///
/// Without a date the current UTC date is used.
fn parse_timestamp(time: &str, date: &str) -> Result<DateTime<Utc>, NmeaError> {
    let invalid = || NmeaError::InvalidTimestamp {
        time: time.to_string(),
        date: date.to_string(),
    };

    let time_of_day = parse_time_of_day(time).ok_or_else(invalid)?;
    let day = if date.is_empty() {
        Utc::now().date_naive()
    } else {
        parse_date(date).ok_or_else(invalid)?
    };

    Ok(day.and_time(time_of_day).and_utc())
}

fn parse_time_of_day(time: &str) -> Option<NaiveTime> {
    if time.is_empty() {
        return None;
    }
    let hour: u32 = time.get(0..2)?.parse().ok()?;
    let minute: u32 = time.get(2..4)?.parse().ok()?;
    let second: u32 = time.get(4..6)?.parse().ok()?;
    let micro = match time.split('.').nth(1) {
        Some(fraction) => {
            let fraction: f64 = format!("0.{}", fraction).parse().ok()?;
            (fraction * 1e6) as u32
        }
        None => 0,
    };
    NaiveTime::from_hms_micro_opt(hour, minute, second, micro)
}

fn parse_date(date: &str) -> Option<NaiveDate> {
    let day: u32 = date.get(0..2)?.parse().ok()?;
    let month: u32 = date.get(2..4)?.parse().ok()?;
    let year: i32 = date.get(4..6)?.parse().ok()?;
    NaiveDate::from_ymd_opt(RMC_CENTURY + year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nmea::{encode_gga, encode_rmc};
    use crate::position::Transition;
    use chrono::{Datelike, TimeZone, Timelike};

    const RMC: &str = "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A";
    const GGA: &str = "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47";

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() < tolerance,
            "expected {} within {} of {}",
            actual,
            tolerance,
            expected
        );
    }

    #[test]
    fn test_decode_rmc() {
        let p = decode(RMC).unwrap();
        assert_eq!(p.index, 0);
        assert_close(p.lat, 48.1173, 1e-9);
        assert_close(p.lon, 11.0 + 31.0 / 60.0, 1e-9);
        assert_close(p.speed, 22.4 * 1.852, 1e-9);
        assert_eq!(p.elevation, 0.0);
        assert_eq!(p.time, Utc.with_ymd_and_hms(2094, 3, 23, 12, 35, 19).unwrap());
        assert_eq!(p.duration, 0.0);
        assert_eq!(p.transition, Transition::Auto);
        assert!(p.description.is_empty());
    }

    #[test]
    fn test_decode_gga_uses_today() {
        let p = decode(GGA).unwrap();
        assert_close(p.lat, 48.1173, 1e-9);
        assert_eq!(p.speed, 0.0);
        assert_close(p.elevation, 545.4, 1e-9);
        assert_eq!((p.time.hour(), p.time.minute(), p.time.second()), (12, 35, 19));

        let today = Utc::now().date_naive();
        // Tolerate a run straddling midnight UTC.
        assert!((today - p.time.date_naive()).num_days().abs() <= 1);
    }

    #[test]
    fn test_decode_talker_variants() {
        for talker in ["RMC", "GNRMC"] {
            let line = RMC.replacen("GPRMC", talker, 1);
            assert!(decode(&line).is_ok(), "{} should decode", talker);
        }
        for talker in ["GGA", "GNGGA"] {
            let line = GGA.replacen("GPGGA", talker, 1);
            assert!(decode(&line).is_ok(), "{} should decode", talker);
        }
    }

    #[test]
    fn test_decode_ignores_checksum_and_line_ending() {
        let wrong = RMC.replace("*6A", "*00");
        assert!(decode(&wrong).is_ok());

        let without = &RMC[..RMC.find('*').unwrap()];
        assert!(decode(without).is_ok());

        assert!(decode(&format!("{}\r\n", RMC)).is_ok());
    }

    #[test]
    fn test_decode_southern_western() {
        let p = decode("$GPGGA,000000,3330.000,S,15115.000,W,1,08,1.0,0.0,M,0.0,M,,").unwrap();
        assert_close(p.lat, -33.5, 1e-12);
        assert_close(p.lon, -151.25, 1e-12);
    }

    #[test]
    fn test_decode_empty_coordinates_default_to_zero() {
        let p = decode("$GPGGA,120000,,,,,0,00,,,M,,M,,").unwrap();
        assert_eq!(p.lat, 0.0);
        assert_eq!(p.lon, 0.0);
        assert_eq!(p.elevation, 0.0);
    }

    #[test]
    fn test_decode_fractional_seconds() {
        let p = decode("$GPRMC,081836.250,A,3751.65,S,14507.36,E,000.0,360.0,130998,011.3,E")
            .unwrap();
        assert_eq!(p.time.nanosecond(), 250_000_000);
        assert_eq!(p.time.year(), 2098);
        assert_eq!((p.time.month(), p.time.day()), (9, 13));
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(decode("GPRMC,123519,A"), Err(NmeaError::MissingStart));
        assert_eq!(
            decode("$GPVTG,054.7,T,034.4,M,005.5,N,010.2,K"),
            Err(NmeaError::UnsupportedSentence("GPVTG".to_string()))
        );
        assert_eq!(
            decode("$GPRMC,123519,A,4807.038,N"),
            Err(NmeaError::TooFewFields {
                kind: "RMC",
                found: 5
            })
        );
        assert_eq!(
            decode(&RMC.replacen(",A,", ",V,", 1)),
            Err(NmeaError::InvalidStatus("V".to_string()))
        );
        assert!(matches!(
            decode("$GPGGA,123519,48x7.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,"),
            Err(NmeaError::InvalidNumber {
                field: "latitude",
                ..
            })
        ));
        assert!(matches!(
            decode("$GPGGA,,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,"),
            Err(NmeaError::InvalidTimestamp { .. })
        ));
        assert!(matches!(
            decode(&RMC.replacen("230394", "320394", 1)),
            Err(NmeaError::InvalidTimestamp { .. })
        ));
        assert!(decode("$").is_err());
    }

    #[test]
    fn test_rmc_round_trip() {
        let time = Utc.with_ymd_and_hms(2024, 6, 1, 8, 15, 30).unwrap();
        let original = Position::new(7, -33.868820, 151.209296, 42.0, 0.0, time);

        let decoded = decode(&encode_rmc(&original)).unwrap();

        assert_close(decoded.lat, original.lat, 1e-6);
        assert_close(decoded.lon, original.lon, 1e-6);
        // One decimal of knots is at most 0.05 kn = ~0.093 km/h off.
        assert_close(decoded.speed, original.speed, 0.1);
        assert_eq!(decoded.time, time);
    }

    #[test]
    fn test_gga_round_trip() {
        let time = Utc.with_ymd_and_hms(2024, 6, 1, 8, 15, 30).unwrap();
        let original = Position::new(3, 59.9343, -30.3351, 25.0, 153.2, time);

        let decoded = decode(&encode_gga(&original)).unwrap();

        assert_close(decoded.lat, original.lat, 1e-6);
        assert_close(decoded.lon, original.lon, 1e-6);
        assert_close(decoded.elevation, original.elevation, 0.05);
        assert_eq!(decoded.speed, 0.0);
    }
}
