//! Distance primitives shared by snapping, damage, and search heuristics.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Mean earth radius used by the haversine formula, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Approximate length of one degree of latitude, in meters.
///
/// Scales the planar A* heuristic so it is commensurable with edge lengths.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// Geographic coordinate in decimal degrees.
///
/// Serialises as a `[lat, lon]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Great-circle distance to `other` in meters.
    pub fn haversine_to(&self, other: &GeoPoint) -> f64 {
        haversine_m(*self, *other)
    }

    /// Arithmetic midpoint in degree space.
    pub fn midpoint(&self, other: &GeoPoint) -> GeoPoint {
        GeoPoint::new((self.lat + other.lat) / 2.0, (self.lon + other.lon) / 2.0)
    }

    /// Planar point with `x = lon`, `y = lat`.
    pub fn to_geo(self) -> geo::Point<f64> {
        geo::Point::new(self.lon, self.lat)
    }

    pub fn from_geo(point: geo::Point<f64>) -> Self {
        GeoPoint::new(point.y(), point.x())
    }

    /// Position on the unit sphere. Chord length between two of these grows
    /// monotonically with great-circle distance.
    pub fn unit_sphere(&self) -> [f64; 3] {
        let lat = self.lat.to_radians();
        let lon = self.lon.to_radians();
        [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from(value: [f64; 2]) -> Self {
        GeoPoint::new(value[0], value[1])
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(value: GeoPoint) -> Self {
        [value.lat, value.lon]
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lon)
    }
}

/// Error returned when parsing a `LAT,LON` string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseGeoPointError(String);

impl fmt::Display for ParseGeoPointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected 'lat,lon' but got '{}'", self.0)
    }
}

impl std::error::Error for ParseGeoPointError {}

impl FromStr for GeoPoint {
    type Err = ParseGeoPointError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let err = || ParseGeoPointError(s.to_string());
        let (lat, lon) = s.split_once(',').ok_or_else(err)?;
        let lat: f64 = lat.trim().parse().map_err(|_| err())?;
        let lon: f64 = lon.trim().parse().map_err(|_| err())?;
        let point = GeoPoint::new(lat, lon);
        if !point.is_finite() {
            return Err(err());
        }
        Ok(point)
    }
}

/// Great-circle distance between two coordinates in meters.
pub fn haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();
    let h = (dlat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Planar Euclidean distance in degree space multiplied by `scale`.
///
/// Used as the A* heuristic and as the fallback-target selector.
pub fn planar_distance(a: GeoPoint, b: GeoPoint, scale: f64) -> f64 {
    (a.lat - b.lat).hypot(a.lon - b.lon) * scale
}
