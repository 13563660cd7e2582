//! NMEA-0183 sentence codec.
//!
//! Encodes [`Position`](crate::position::Position) records into `$GPRMC` /
//! `$GPGGA` sentences and decodes RMC/GGA sentences (any common talker id)
//! back into positions for log replay.
//!
//! # Sentence layout
//!
//! ```text
//! $GPRMC,123519.123,A,5545.132000,N,03736.936000,E,5.4,0.0,150324,,,A*6F\r\n
//! $GPGGA,123519.123,5545.132000,N,03736.936000,E,1,08,1.0,120.5,M,0.0,M,,*62\r\n
//! ```
//!
//! The checksum is the XOR of every byte between `$` and `*`, written as two
//! uppercase hex digits.

mod decode;
mod encode;

pub use decode::{decode, NmeaError};
pub use encode::{encode_gga, encode_pair, encode_rmc, format_coords, NmeaCoords};

/// Conversion factor: km/h to knots.
pub const KMH_TO_KNOTS: f64 = 0.539957;

/// Conversion factor: knots to km/h.
pub const KNOTS_TO_KMH: f64 = 1.852;

/// The RMC and GGA sentences encoded for one fix, ready for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentencePair {
    /// `$GPRMC,...*HH\r\n`
    pub rmc: String,
    /// `$GPGGA,...*HH\r\n`
    pub gga: String,
}

impl SentencePair {
    pub fn new(rmc: impl Into<String>, gga: impl Into<String>) -> Self {
        Self {
            rmc: rmc.into(),
            gga: gga.into(),
        }
    }

    /// Total number of bytes written to a client for this pair.
    pub fn wire_len(&self) -> usize {
        self.rmc.len() + self.gga.len()
    }
}

/// XOR of every byte in the sentence body (the text between `$` and `*`).
pub fn checksum(body: &str) -> u8 {
    body.bytes().fold(0u8, |acc, b| acc ^ b)
}

/// Checksum of `body` as two uppercase hexadecimal digits.
pub fn checksum_hex(body: &str) -> String {
    format!("{:02X}", checksum(body))
}

/// Strictly check the `*HH` suffix of a sentence against its body.
///
/// [`decode`] never verifies checksums; this is for callers that want to.
/// Returns `false` when the sentence has no `$` prefix or no checksum field.
pub fn verify_checksum(sentence: &str) -> bool {
    let Some(rest) = sentence.trim_end().strip_prefix('$') else {
        return false;
    };
    let Some((body, expected)) = rest.split_once('*') else {
        return false;
    };
    match u8::from_str_radix(expected, 16) {
        Ok(value) => expected.len() == 2 && value == checksum(body),
        Err(_) => false,
    }
}

/// Wrap a body as a complete sentence: `$<body>*<checksum>\r\n`.
pub(crate) fn seal(body: &str) -> String {
    format!("${}*{}\r\n", body, checksum_hex(body))
}
