//! Position record shared by generators, the NMEA codec and the pacing loop.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// How the pacing loop moves on from a position once its duration elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Transition {
    /// Continue as soon as the duration has elapsed.
    #[default]
    Auto,
    /// Wait for an external advance signal (e.g. an operator keypress).
    Manual,
}

impl Transition {
    /// Lowercase name used in files and command-line parameters.
    pub fn as_str(&self) -> &'static str {
        match self {
            Transition::Auto => "auto",
            Transition::Manual => "manual",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a transition name is neither `auto` nor `manual`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown transition '{0}' (expected 'auto' or 'manual')")]
pub struct ParseTransitionError(pub String);

impl FromStr for Transition {
    type Err = ParseTransitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Transition::Auto),
            "manual" => Ok(Transition::Manual),
            _ => Err(ParseTransitionError(s.to_string())),
        }
    }
}

/// A single navigation fix.
///
/// Positions are created by a generator and never mutated afterwards; the
/// codec and console display only read them.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    /// Sequence number within one generator, starting at 1.
    pub index: u64,
    /// Latitude in decimal degrees, south negative.
    pub lat: f64,
    /// Longitude in decimal degrees, west negative.
    pub lon: f64,
    /// Speed over ground in km/h.
    pub speed: f64,
    /// Elevation in meters.
    pub elevation: f64,
    /// UTC time of the fix.
    pub time: DateTime<Utc>,
    /// Seconds to hold this fix before producing the next one (0 = no delay).
    pub duration: f64,
    /// What happens after `duration` has elapsed.
    pub transition: Transition,
    /// Free-text annotation, possibly empty.
    pub description: String,
}

impl Position {
    /// Create a position with default pacing (no delay, automatic transition).
    pub fn new(
        index: u64,
        lat: f64,
        lon: f64,
        speed: f64,
        elevation: f64,
        time: DateTime<Utc>,
    ) -> Self {
        Self {
            index,
            lat,
            lon,
            speed,
            elevation,
            time,
            duration: 0.0,
            transition: Transition::Auto,
            description: String::new(),
        }
    }

    /// Hold time as a `Duration`. Negative or non-finite values map to zero.
    pub fn pause(&self) -> Duration {
        if self.duration.is_finite() && self.duration > 0.0 {
            Duration::try_from_secs_f64(self.duration).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        }
    }

    /// Whether the pacing loop must wait for an advance signal after this fix.
    pub fn is_manual(&self) -> bool {
        self.transition == Transition::Manual
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_parse_is_case_insensitive() {
        assert_eq!("auto".parse::<Transition>().unwrap(), Transition::Auto);
        assert_eq!("Manual".parse::<Transition>().unwrap(), Transition::Manual);
        assert_eq!(" MANUAL ".parse::<Transition>().unwrap(), Transition::Manual);
    }

    #[test]
    fn test_transition_rejects_unknown() {
        let err = "key".parse::<Transition>().unwrap_err();
        assert_eq!(err, ParseTransitionError("key".to_string()));
        assert!(err.to_string().contains("'key'"));
    }

    #[test]
    fn test_transition_display_round_trips() {
        for t in [Transition::Auto, Transition::Manual] {
            assert_eq!(t.to_string().parse::<Transition>().unwrap(), t);
        }
    }

    #[test]
    fn test_new_uses_default_pacing() {
        let p = Position::new(1, 55.75, 37.61, 10.0, 120.5, Utc::now());
        assert_eq!(p.duration, 0.0);
        assert_eq!(p.transition, Transition::Auto);
        assert!(p.description.is_empty());
        assert!(!p.is_manual());
    }

    #[test]
    fn test_pause_clamps_invalid_durations() {
        let mut p = Position::new(1, 0.0, 0.0, 0.0, 0.0, Utc::now());
        p.duration = 2.5;
        assert_eq!(p.pause(), Duration::from_millis(2500));

        p.duration = -1.0;
        assert_eq!(p.pause(), Duration::ZERO);

        p.duration = f64::NAN;
        assert_eq!(p.pause(), Duration::ZERO);
    }
}
