//! Geographic point type for generated map entities.

use serde::{Deserialize, Serialize};

/// A geographic point in decimal degrees, ordered latitude first.
///
/// Points serialize as a two-element array `[lat, lon]`, which is the layout
/// clients and the bucket store both expect.
///
/// # Examples
///
/// ```
/// use spawngrid_types::geo::GeoPoint;
///
/// let sf = GeoPoint::new(37.7749, -122.4194);
/// assert_eq!(sf.lat(), 37.7749);
/// assert_eq!(sf.lon(), -122.4194);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

impl GeoPoint {
    #[inline]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    #[inline]
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Returns a new point shifted by the given deltas in degrees.
    #[inline]
    pub fn offset(&self, d_lat: f64, d_lon: f64) -> Self {
        Self::new(self.lat + d_lat, self.lon + d_lon)
    }

    /// Planar distance in degrees, treating lat/lon as a flat grid.
    ///
    /// Only meaningful for the short ranges a single bucket spans.
    pub fn planar_distance(&self, other: &GeoPoint) -> f64 {
        (self.lat - other.lat).hypot(self.lon - other.lon)
    }

    /// True when both components are finite.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self::new(lat, lon)
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(point: GeoPoint) -> Self {
        [point.lat, point.lon]
    }
}
