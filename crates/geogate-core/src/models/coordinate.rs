//! WGS84 coordinate value type.

use crate::error::{GeogateError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A WGS84 position in decimal degrees
///
/// Construction through [`Coordinate::new`] does not validate, so values read
/// from external sources can be represented and rejected later. Use
/// [`Coordinate::try_new`] or [`Coordinate::validate`] wherever the range
/// invariant must hold: latitude in `[-90, 90]`, longitude in `[-180, 180]`,
/// both finite. Out-of-range values are never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Create a coordinate, rejecting non-finite or out-of-range values
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self> {
        Self::new(latitude, longitude).validate()
    }

    /// Return the coordinate unchanged if it satisfies the range invariant
    pub fn validate(self) -> Result<Self> {
        match self.invalid_reason() {
            None => Ok(self),
            Some(reason) => Err(GeogateError::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
                reason: reason.to_string(),
            }),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.invalid_reason().is_none()
    }

    fn invalid_reason(&self) -> Option<&'static str> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            Some("coordinates must be finite")
        } else if !(-90.0..=90.0).contains(&self.latitude) {
            Some("latitude must be within [-90, 90]")
        } else if !(-180.0..=180.0).contains(&self.longitude) {
            Some("longitude must be within [-180, 180]")
        } else {
            None
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

impl Coordinate {
    /// Parse `"lat,lon"` without checking the range invariant
    pub fn parse_unchecked(s: &str) -> Result<Self> {
        let (lat, lon) = s.split_once(',').ok_or_else(|| GeogateError::ConfigInvalid {
            key: "coordinate".to_string(),
            reason: format!("expected 'latitude,longitude', got '{}'", s),
        })?;

        let parse = |part: &str, axis: &str| {
            part.trim().parse::<f64>().map_err(|_| GeogateError::ConfigInvalid {
                key: "coordinate".to_string(),
                reason: format!("{} '{}' is not a number", axis, part.trim()),
            })
        };

        Ok(Coordinate::new(parse(lat, "latitude")?, parse(lon, "longitude")?))
    }
}

/// Parses `"lat,lon"` and validates the result
impl FromStr for Coordinate {
    type Err = GeogateError;

    fn from_str(s: &str) -> Result<Self> {
        Coordinate::parse_unchecked(s)?.validate()
    }
}
