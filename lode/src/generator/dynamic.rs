//! Synthetic circular motion around a computed center point.
//!
//! The initial point is placed on a circle of the configured radius: the
//! center lies `radius` km due north of it, so the initial point is reached
//! from the center at bearing 180°. Each step advances the bearing from the
//! center by the arc covered at `speed` during `duration`, and the position
//! is recomputed with the spherical direct formula.

use std::f64::consts::{PI, TAU};
use std::iter::FusedIterator;

use chrono::Utc;

use super::{GeneratorError, SourceParams};
use crate::geo::{angular_distance, destination, LatLonRad};
use crate::position::{Position, Transition};

/// Positional parameters for the `dynamic` source.
pub(crate) const POSITIONAL: &[&str] = &["lat", "lon"];

/// Named options for the `dynamic` source.
pub(crate) const OPTIONS: &[&str] = &["speed", "duration", "transition", "radius"];

/// Motion parameters for [`DynamicGenerator`].
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicConfig {
    /// Ground speed in km/h.
    pub speed: f64,
    /// Seconds between fixes.
    pub duration: f64,
    /// Transition attached to every fix.
    pub transition: Transition,
    /// Circle radius in km. Zero keeps the position fixed.
    pub radius: f64,
}

impl Default for DynamicConfig {
    fn default() -> Self {
        Self {
            speed: 10.0,
            duration: 1.0,
            transition: Transition::Auto,
            radius: 0.1,
        }
    }
}

impl DynamicConfig {
    /// Read the named options of a `dynamic` source, keeping defaults for absent ones.
    pub fn from_params(params: &SourceParams) -> Result<Self, GeneratorError> {
        let defaults = Self::default();
        let config = Self {
            speed: params.named_f64("speed", defaults.speed)?,
            duration: params.named_f64("duration", defaults.duration)?,
            transition: params.named_transition("transition", defaults.transition)?,
            radius: params.named_f64("radius", defaults.radius)?,
        };

        for (name, value) in [("duration", config.duration), ("radius", config.radius)] {
            if !value.is_finite() || value < 0.0 {
                return Err(GeneratorError::InvalidParameter {
                    name: name.to_string(),
                    value: value.to_string(),
                    reason: "must be a non-negative number".to_string(),
                });
            }
        }
        Ok(config)
    }
}

/// Endless generator moving around a circle at constant speed.
#[derive(Debug, Clone)]
pub struct DynamicGenerator {
    config: DynamicConfig,
    center: LatLonRad,
    angular_radius: f64,
    angle_step: f64,
    angle: f64,
    index: u64,
}

impl DynamicGenerator {
    /// Start a circle passing through `(lat, lon)`.
    pub fn new(lat: f64, lon: f64, config: DynamicConfig) -> Self {
        let angular_radius = angular_distance(config.radius);
        let initial = LatLonRad::from_degrees(lat, lon);
        // Traveling back along bearing 180° means heading north from the initial point.
        let center = destination(initial, 0.0, angular_radius);

        let circumference = TAU * config.radius;
        let angle_step = if circumference > 0.0 {
            (config.speed * config.duration / 3600.0) / circumference * TAU
        } else {
            0.0
        };

        Self {
            config,
            center,
            angular_radius,
            angle_step,
            // The initial point sits due south of the center.
            angle: PI,
            index: 0,
        }
    }

    /// Build from `dynamic` source parameters (`lat lon [key=value...]`).
    pub fn from_params(params: &SourceParams) -> Result<Self, GeneratorError> {
        let lat = params.required_f64("lat")?;
        let lon = params.required_f64("lon")?;
        Ok(Self::new(lat, lon, DynamicConfig::from_params(params)?))
    }

    pub fn config(&self) -> &DynamicConfig {
        &self.config
    }

    /// Center of the circle in decimal degrees.
    pub fn center(&self) -> (f64, f64) {
        self.center.to_degrees()
    }

    /// Bearing increment per fix, in radians.
    pub fn angle_step(&self) -> f64 {
        self.angle_step
    }

    fn point_at(&self, angle: f64) -> (f64, f64) {
        destination(self.center, angle, self.angular_radius).to_degrees()
    }
}

impl Iterator for DynamicGenerator {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        self.angle = (self.angle + self.angle_step).rem_euclid(TAU);
        let (lat, lon) = self.point_at(self.angle);
        self.index += 1;

        Some(Position {
            index: self.index,
            lat,
            lon,
            speed: self.config.speed,
            elevation: 0.0,
            time: Utc::now(),
            duration: self.config.duration,
            transition: self.config.transition,
            description: String::new(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl FusedIterator for DynamicGenerator {}
