use serde::Deserialize;
use thiserror::Error;

use crate::features::hazards::models::GeoPoint;

/// Location as it arrives at the boundary: either the canonical point or a
/// raw `"lat,lng"` string. Never carried past validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LocationInput {
    Point(GeoPoint),
    Raw(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Invalid location format. Use 'lat,lng'")]
    InvalidFormat,

    #[error("Invalid location numbers. Must be numeric lat,lng")]
    InvalidValue,
}

/// Normalize a location input to the canonical point.
///
/// An already-canonical point passes through unchanged. A raw string is
/// trimmed, has one matching pair of surrounding quotes stripped, and is split
/// on a comma into exactly `lat,lng`; both halves must parse as finite floats.
/// The output coordinates are `[longitude, latitude]` — reversed from the
/// input order. Latitude/longitude bounds are not checked.
pub fn normalize_location(input: LocationInput) -> Result<GeoPoint, LocationError> {
    match input {
        LocationInput::Point(point) => Ok(point),
        LocationInput::Raw(raw) => parse_lat_lng(&raw),
    }
}

fn parse_lat_lng(raw: &str) -> Result<GeoPoint, LocationError> {
    let mut value = raw.trim();

    if value.len() >= 2 {
        let quoted = (value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\''));
        if quoted {
            value = &value[1..value.len() - 1];
        }
    }

    let parts: Vec<&str> = value.split(',').collect();
    if parts.len() != 2 {
        return Err(LocationError::InvalidFormat);
    }

    let lat = parse_finite(parts[0])?;
    let lng = parse_finite(parts[1])?;

    Ok(GeoPoint::new(lng, lat))
}

fn parse_finite(part: &str) -> Result<f64, LocationError> {
    let number: f64 = part
        .trim()
        .parse()
        .map_err(|_| LocationError::InvalidValue)?;
    if number.is_finite() {
        Ok(number)
    } else {
        Err(LocationError::InvalidValue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(s: &str) -> LocationInput {
        LocationInput::Raw(s.to_string())
    }

    #[test]
    fn parses_plain_lat_lng() {
        let point = normalize_location(raw("34.05, -118.25")).unwrap();
        assert_eq!(point.coordinates, [-118.25, 34.05]);
    }

    #[test]
    fn coordinates_are_reversed_from_input_order() {
        // Input is lat,lng; output is [lng, lat]
        let point = normalize_location(raw("1.5,2.5")).unwrap();
        assert_eq!(point.longitude(), 2.5);
        assert_eq!(point.latitude(), 1.5);
    }

    #[test]
    fn strips_one_matching_quote_pair() {
        let double = normalize_location(raw("\"41.2132,-124.0046\"")).unwrap();
        assert_eq!(double.coordinates, [-124.0046, 41.2132]);

        let single = normalize_location(raw("'38.5556, -121.4689'")).unwrap();
        assert_eq!(single.coordinates, [-121.4689, 38.5556]);
    }

    #[test]
    fn mismatched_quotes_are_not_stripped() {
        assert_eq!(
            normalize_location(raw("\"34.05,-118.25'")),
            Err(LocationError::InvalidValue)
        );
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let point = normalize_location(raw("  7.5 , 112.0  ")).unwrap();
        assert_eq!(point.coordinates, [112.0, 7.5]);
    }

    #[test]
    fn single_part_is_a_format_error() {
        assert_eq!(
            normalize_location(raw("34.05")),
            Err(LocationError::InvalidFormat)
        );
    }

    #[test]
    fn three_parts_are_a_format_error() {
        assert_eq!(
            normalize_location(raw("1,2,3")),
            Err(LocationError::InvalidFormat)
        );
    }

    #[test]
    fn non_numeric_parts_are_a_value_error() {
        assert_eq!(
            normalize_location(raw("not,numbers")),
            Err(LocationError::InvalidValue)
        );
    }

    #[test]
    fn empty_part_is_a_value_error() {
        assert_eq!(
            normalize_location(raw("34.05,")),
            Err(LocationError::InvalidValue)
        );
    }

    #[test]
    fn non_finite_numbers_are_a_value_error() {
        assert_eq!(
            normalize_location(raw("NaN,1.0")),
            Err(LocationError::InvalidValue)
        );
        assert_eq!(
            normalize_location(raw("1.0,inf")),
            Err(LocationError::InvalidValue)
        );
    }

    #[test]
    fn canonical_point_passes_through_unchanged() {
        let input = LocationInput::Point(GeoPoint::new(-118.25, 34.05));
        let point = normalize_location(input).unwrap();
        assert_eq!(point.coordinates, [-118.25, 34.05]);
    }

    #[test]
    fn no_range_validation_is_performed() {
        // Out-of-range lat/lng is an accepted limitation, not an error
        let point = normalize_location(raw("999.0,-999.0")).unwrap();
        assert_eq!(point.coordinates, [-999.0, 999.0]);
    }
}
