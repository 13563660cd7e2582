//! Great-circle helpers on a spherical Earth.
//!
//! Angles are passed in radians and distances as angular distances
//! (arc length divided by [`EARTH_RADIUS_KM`]). No normalization of the
//! resulting longitude is performed.

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point on the sphere, both angles in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLonRad {
    pub lat: f64,
    pub lon: f64,
}

impl LatLonRad {
    /// Build from decimal degrees.
    pub fn from_degrees(lat: f64, lon: f64) -> Self {
        Self {
            lat: lat.to_radians(),
            lon: lon.to_radians(),
        }
    }

    /// Convert back to `(lat, lon)` in decimal degrees.
    pub fn to_degrees(self) -> (f64, f64) {
        (self.lat.to_degrees(), self.lon.to_degrees())
    }
}

/// Angular distance for an arc of `distance_km` on the Earth's surface.
pub fn angular_distance(distance_km: f64) -> f64 {
    distance_km / EARTH_RADIUS_KM
}

/// Destination reached from `start` after traveling `angular_distance`
/// along the initial `bearing` (radians, 0 = north, clockwise).
///
/// Spherical law of cosines form of the direct geodesic problem.
pub fn destination(start: LatLonRad, bearing: f64, angular_distance: f64) -> LatLonRad {
    let sin_lat1 = start.lat.sin();
    let cos_lat1 = start.lat.cos();
    let sin_d = angular_distance.sin();
    let cos_d = angular_distance.cos();

    let lat2 = (sin_lat1 * cos_d + cos_lat1 * sin_d * bearing.cos()).asin();
    let lon2 =
        start.lon + (bearing.sin() * sin_d * cos_lat1).atan2(cos_d - sin_lat1 * lat2.sin());

    LatLonRad {
        lat: lat2,
        lon: lon2,
    }
}

/// Great-circle distance in kilometers between two points in decimal degrees.
///
/// Uses the haversine formula.
pub fn distance_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = from;
    let (lat2, lon2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}
