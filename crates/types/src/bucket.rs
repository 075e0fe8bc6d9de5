//! Grid cells and the records cached per cell.

use crate::geo::GeoPoint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Integer cell coordinate in the lat/lon grid.
///
/// `x` indexes latitude and `y` indexes longitude. The textual form
/// `"x:y"` doubles as the cache key for the cell.
///
/// # Examples
///
/// ```
/// use spawngrid_types::bucket::BucketCoordinate;
///
/// let cell = BucketCoordinate::new(-3, 12);
/// assert_eq!(cell.to_string(), "-3:12");
/// assert_eq!("-3:12".parse::<BucketCoordinate>().unwrap(), cell);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BucketCoordinate {
    pub x: i64,
    pub y: i64,
}

impl BucketCoordinate {
    #[inline]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Neighbouring cell at the given offset. Saturates at the grid edge.
    #[inline]
    pub fn offset(&self, dx: i64, dy: i64) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// Chebyshev distance in cells.
    pub fn chebyshev(&self, other: &BucketCoordinate) -> u64 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

impl fmt::Display for BucketCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.x, self.y)
    }
}

/// Error returned when a bucket key is not of the form `"x:y"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBucketKeyError {
    key: String,
}

impl ParseBucketKeyError {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for ParseBucketKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed bucket key '{}', expected \"x:y\"", self.key)
    }
}

impl std::error::Error for ParseBucketKeyError {}

impl FromStr for BucketCoordinate {
    type Err = ParseBucketKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseBucketKeyError { key: s.to_string() };
        let (x, y) = s.split_once(':').ok_or_else(err)?;
        let x = x.parse().map_err(|_| err())?;
        let y = y.parse().map_err(|_| err())?;
        Ok(Self::new(x, y))
    }
}

/// The generated contents of one bucket.
///
/// Records are always written whole: the two point lists and the timestamp
/// change together. Field names on the wire follow the layout shared by the
/// store and the HTTP response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketRecord {
    #[serde(rename = "ZombieCoordinates")]
    pub hazards: Vec<GeoPoint>,

    #[serde(rename = "LootboxCoordinates")]
    pub items: Vec<GeoPoint>,

    #[serde(rename = "Timestamp")]
    pub generated_at: DateTime<Utc>,

    #[serde(rename = "CoordinateBucket")]
    pub id: String,
}

impl BucketRecord {
    /// Build a record for `coordinate`; the id is derived from it.
    pub fn new(
        coordinate: BucketCoordinate,
        hazards: Vec<GeoPoint>,
        items: Vec<GeoPoint>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            hazards,
            items,
            generated_at,
            id: coordinate.to_string(),
        }
    }

    /// An empty record used as the accumulator for aggregated answers.
    pub fn empty(coordinate: BucketCoordinate, generated_at: DateTime<Utc>) -> Self {
        Self::new(coordinate, Vec::new(), Vec::new(), generated_at)
    }

    /// Append another record's points to this one.
    pub fn absorb(&mut self, other: &BucketRecord) {
        self.hazards.extend_from_slice(&other.hazards);
        self.items.extend_from_slice(&other.items);
    }

    pub fn point_count(&self) -> usize {
        self.hazards.len() + self.items.len()
    }
}
