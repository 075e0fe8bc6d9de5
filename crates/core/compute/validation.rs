//! Parsing and validation of raw query coordinates.

use crate::error::{Result, SpawnError};
use percent_encoding::percent_decode_str;

pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";

/// Percent-decode and parse a raw coordinate string.
///
/// # Examples
///
/// ```
/// use spawngrid::compute::validation::parse_coordinate;
///
/// assert_eq!(parse_coordinate("longitude", "%2D122.4194").unwrap(), -122.4194);
/// assert!(parse_coordinate("latitude", "abc").is_err());
/// ```
pub fn parse_coordinate(field: &'static str, raw: &str) -> Result<f64> {
    let decoded = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|e| SpawnError::invalid_input(field, raw, format!("not valid UTF-8: {}", e)))?;

    let value: f64 = decoded
        .parse()
        .map_err(|e| SpawnError::invalid_input(field, decoded.as_ref(), format!("{}", e)))?;

    if !value.is_finite() {
        return Err(SpawnError::invalid_input(
            field,
            decoded.as_ref(),
            "must be finite",
        ));
    }

    Ok(value)
}

/// Check a parsed coordinate pair.
///
/// Values must be finite. With `check_range`, latitude must lie in
/// [-90, 90] and longitude in [-180, 180].
pub fn validate_coordinates(latitude: f64, longitude: f64, check_range: bool) -> Result<()> {
    for (field, value, bound) in [(LATITUDE, latitude, 90.0), (LONGITUDE, longitude, 180.0)] {
        if !value.is_finite() {
            return Err(SpawnError::invalid_input(
                field,
                value.to_string(),
                "must be finite",
            ));
        }

        if check_range && !(-bound..=bound).contains(&value) {
            return Err(SpawnError::invalid_input(
                field,
                value.to_string(),
                format!("out of range [{}, {}]", -bound, bound),
            ));
        }
    }

    Ok(())
}

/// Parse and validate a raw `(latitude, longitude)` pair.
pub fn parse_query(raw_latitude: &str, raw_longitude: &str, check_range: bool) -> Result<(f64, f64)> {
    let latitude = parse_coordinate(LATITUDE, raw_latitude)?;
    let longitude = parse_coordinate(LONGITUDE, raw_longitude)?;
    validate_coordinates(latitude, longitude, check_range)?;
    Ok((latitude, longitude))
}
