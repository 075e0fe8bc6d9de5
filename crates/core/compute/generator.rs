//! Area-uniform random points inside a disk.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHasher;
use spawngrid_types::bucket::BucketCoordinate;
use spawngrid_types::config::LongitudeCorrection;
use spawngrid_types::geo::GeoPoint;
use std::f64::consts::TAU;
use std::hash::{Hash, Hasher};

/// Kind of entity a point list represents. Each kind draws from its own
/// random stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Hazard,
    Item,
}

/// Draws `count` points uniformly by area within `radius` degrees of `center`.
///
/// The radial component is `radius * sqrt(u)`; sampling `radius * u` would
/// pile points up near the center. The sampled offset is stretched by
/// `correction` before being added, so the returned points are within
/// `radius` of `center` only once the correction is undone.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use spawngrid::compute::generator::generate_points;
/// use spawngrid_types::config::LongitudeCorrection;
/// use spawngrid_types::geo::GeoPoint;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let points = generate_points(
///     &mut rng,
///     GeoPoint::new(0.0, 0.0),
///     0.00676,
///     5,
///     LongitudeCorrection::Latitude,
/// );
/// assert_eq!(points.len(), 5);
/// ```
pub fn generate_points<R: Rng + ?Sized>(
    rng: &mut R,
    center: GeoPoint,
    radius: f64,
    count: usize,
    correction: LongitudeCorrection,
) -> Vec<GeoPoint> {
    let mut points = Vec::with_capacity(count);
    for _ in 0..count {
        let u1: f64 = rng.r#gen();
        let u2: f64 = rng.r#gen();

        let r = radius * u1.sqrt();
        let theta = TAU * u2;
        let (d_lat, d_lon) =
            correction.apply(center.lat(), center.lon(), r * theta.cos(), r * theta.sin());

        points.push(center.offset(d_lat, d_lon));
    }
    points
}

/// Point generator bound to a radius and correction strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateGenerator {
    radius: f64,
    correction: LongitudeCorrection,
}

impl CoordinateGenerator {
    pub fn new(radius: f64, correction: LongitudeCorrection) -> Self {
        Self { radius, correction }
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        center: GeoPoint,
        count: usize,
    ) -> Vec<GeoPoint> {
        generate_points(rng, center, self.radius, count, self.correction)
    }

    /// Sampled (uncorrected) distance of `point` from `center`.
    pub fn sampled_distance(&self, center: GeoPoint, point: GeoPoint) -> f64 {
        let (d_lat, d_lon) = self.correction.uncorrect(
            center.lat(),
            center.lon(),
            point.lat() - center.lat(),
            point.lon() - center.lon(),
        );
        d_lat.hypot(d_lon)
    }
}

/// Random stream for one entity kind of one bucket generation.
///
/// With a seed the stream is derived from the seed, the cell, the kind and
/// the generation time, so a replay at the same clock reproduces the same
/// points. Without one it is seeded from OS entropy.
pub fn stream_rng(
    seed: Option<u64>,
    cell: BucketCoordinate,
    kind: EntityKind,
    generated_at: DateTime<Utc>,
) -> StdRng {
    match seed {
        Some(seed) => {
            let mut hasher = FxHasher::default();
            seed.hash(&mut hasher);
            cell.hash(&mut hasher);
            kind.hash(&mut hasher);
            generated_at.timestamp_micros().hash(&mut hasher);
            StdRng::seed_from_u64(hasher.finish())
        }
        None => StdRng::from_entropy(),
    }
}
