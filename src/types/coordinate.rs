use crate::error::{Error, Result};
use std::fmt;

/// A validated observer position on Earth
///
/// Latitude is in degrees north (`[-90, 90]`), longitude in degrees east
/// (`[-180, 180]`), both bounds inclusive. Construction goes through
/// [`Coordinate::new`], which rejects out-of-range values, so holding a
/// `Coordinate` implies validity — every downstream calculation accepts
/// the type without re-checking ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Create a coordinate from latitude/longitude in degrees
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinate`] if either component is out of
    /// range or not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
        let lon_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);
        if !lat_ok || !lon_ok {
            return Err(Error::InvalidCoordinate {
                latitude,
                longitude,
            });
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees north
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees east
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.latitude < 0.0 { 'S' } else { 'N' };
        let ew = if self.longitude < 0.0 { 'W' } else { 'E' };
        write!(
            f,
            "{:.4}°{ns}, {:.4}°{ew}",
            self.latitude.abs(),
            self.longitude.abs()
        )
    }
}
