use serde::{Deserialize, Serialize};

/// Side length of one grid cell in degrees (about 1500 m).
pub const RADIUS_IN_DEGREES: f64 = 0.0136;

/// Radius around a cell's nominal center that generated points fall within
/// (about 750 m, half the cell size).
pub const GENERATION_RADIUS_IN_DEGREES: f64 = 0.00676;

/// Number of points generated per entity kind for each bucket.
pub const POINTS_PER_KIND: usize = 5;

/// Seconds a generated bucket stays fresh.
pub const FRESHNESS_WINDOW_SECS: u64 = 24 * 60 * 60;

/// Latitude beyond which the longitude stretch stops growing. Past it the
/// stretch stays at `1 / cos(85°)` (about 11.5), so points generated for
/// cells near the poles stay within a tenth of a degree of their center.
const MAX_CORRECTED_LATITUDE: f64 = 85.0;

/// How a sampled (lat, lon) offset is stretched before it is added to the
/// bucket center.
///
/// Lines of longitude converge away from the equator, so an unstretched disk
/// renders as an ellipse on a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LongitudeCorrection {
    /// Divide the longitude offset by `cos(center latitude)`.
    #[default]
    Latitude,
    /// Divide the latitude offset by `cos(center longitude)`, feeding the
    /// degree value to `cos` unconverted. Matches the first deployed
    /// generator and is kept for comparing against its stored buckets.
    Legacy,
    /// Use the sampled offset unchanged.
    Disabled,
}

impl LongitudeCorrection {
    /// Stretch an offset sampled around `center_lat`/`center_lon`.
    pub fn apply(&self, center_lat: f64, center_lon: f64, d_lat: f64, d_lon: f64) -> (f64, f64) {
        match self {
            Self::Latitude => (d_lat, d_lon / latitude_factor(center_lat)),
            Self::Legacy => (d_lat / center_lon.cos(), d_lon),
            Self::Disabled => (d_lat, d_lon),
        }
    }

    /// Inverse of [`apply`](Self::apply): recover the sampled offset from a
    /// corrected one.
    pub fn uncorrect(
        &self,
        center_lat: f64,
        center_lon: f64,
        d_lat: f64,
        d_lon: f64,
    ) -> (f64, f64) {
        match self {
            Self::Latitude => (d_lat, d_lon * latitude_factor(center_lat)),
            Self::Legacy => (d_lat * center_lon.cos(), d_lon),
            Self::Disabled => (d_lat, d_lon),
        }
    }
}

fn latitude_factor(center_lat: f64) -> f64 {
    center_lat
        .abs()
        .min(MAX_CORRECTED_LATITUDE)
        .to_radians()
        .cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equator_latitude_correction_is_identity() {
        let (d_lat, d_lon) = LongitudeCorrection::Latitude.apply(0.0, 45.0, 0.001, 0.002);
        assert!((d_lat - 0.001).abs() < 1e-15);
        assert!((d_lon - 0.002).abs() < 1e-15);
    }

    #[test]
    fn test_latitude_correction_widens_longitude_at_sixty_degrees() {
        let (d_lat, d_lon) = LongitudeCorrection::Latitude.apply(60.0, 10.0, 0.001, 0.001);
        assert!((d_lat - 0.001).abs() < 1e-15);
        assert!((d_lon - 0.002).abs() < 1e-9);
    }

    #[test]
    fn test_uncorrect_inverts_apply() {
        for correction in [
            LongitudeCorrection::Latitude,
            LongitudeCorrection::Legacy,
            LongitudeCorrection::Disabled,
        ] {
            let (lat, lon) = correction.apply(48.85, 2.35, 0.003, -0.004);
            let (d_lat, d_lon) = correction.uncorrect(48.85, 2.35, lat, lon);
            assert!((d_lat - 0.003).abs() < 1e-12, "{correction:?}");
            assert!((d_lon + 0.004).abs() < 1e-12, "{correction:?}");
        }
    }

    #[test]
    fn test_pole_stays_finite() {
        let (_, d_lon) = LongitudeCorrection::Latitude.apply(90.0, 0.0, 0.0, 0.001);
        assert!(d_lon.is_finite());
    }

    #[test]
    fn test_stretch_capped_near_pole() {
        let radius = GENERATION_RADIUS_IN_DEGREES;
        for lat in [89.99, -89.99, 85.0] {
            let (_, d_lon) = LongitudeCorrection::Latitude.apply(lat, 179.9, 0.0, radius);
            assert!(d_lon <= radius / 85f64.to_radians().cos() + 1e-12, "{lat}: {d_lon}");
            assert!(d_lon < 0.1, "{lat}: {d_lon}");
        }

        let (_, d_lon) = LongitudeCorrection::Latitude.apply(89.99, 0.0, 0.0, radius);
        let (_, back) = LongitudeCorrection::Latitude.uncorrect(89.99, 0.0, 0.0, d_lon);
        assert!((back - radius).abs() < 1e-15);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&LongitudeCorrection::Legacy).unwrap();
        assert_eq!(json, "\"legacy\"");
        let parsed: LongitudeCorrection = serde_json::from_str("\"latitude\"").unwrap();
        assert_eq!(parsed, LongitudeCorrection::Latitude);
    }
}
