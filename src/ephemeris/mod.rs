//! The raw astronomy seam
//!
//! Everything upstream of the visibility calculation goes through the
//! [`Ephemeris`] trait: raw lunar position, illumination and same-day
//! rise/set times. The calculator consumes these outputs and owns the
//! unit conversions, so providers report in their native convention —
//! radians, with azimuth referenced to *south* (positive westward), the
//! way most ephemeris sources hand them out.

mod meeus;

pub use meeus::MeeusEphemeris;

use crate::error::Result;
use crate::types::Coordinate;
use chrono::{DateTime, Utc};

/// Raw horizon-relative lunar position
///
/// Both angles are in radians. The azimuth is measured from south,
/// positive toward the west; the calculator re-references it to a
/// north-based compass bearing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawMoonPosition {
    pub altitude: f64,
    pub azimuth: f64,
}

/// Lunar illumination at an instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonIllumination {
    /// Fraction of the lunar cycle elapsed since new moon, `[0, 1)`
    pub phase: f64,
    /// Illuminated fraction of the visible disc, `[0, 1]`
    pub fraction: f64,
}

/// Rise and set times for the calendar day containing the queried instant
///
/// Either event may be absent: at high latitudes, or simply because the
/// roughly 24.8-hour lunar day skips a rise or set on some calendar days
/// everywhere on Earth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiseSet {
    pub rise: Option<DateTime<Utc>>,
    pub set: Option<DateTime<Utc>>,
}

/// Source of raw lunar ephemeris data
///
/// Implementations may be local computations (see [`MeeusEphemeris`]) or
/// remote services; a failing provider aborts the whole observation, so
/// fallible implementations should map their errors to
/// [`Error::EphemerisUnavailable`](crate::Error::EphemerisUnavailable).
pub trait Ephemeris {
    /// Horizon-relative position of the moon at `time` for `coordinate`
    fn position(&self, time: DateTime<Utc>, coordinate: &Coordinate) -> Result<RawMoonPosition>;

    /// Phase and illuminated fraction at `time`
    ///
    /// Illumination is a property of the instant alone; it does not
    /// depend on the observer's position.
    fn illumination(&self, time: DateTime<Utc>) -> Result<MoonIllumination>;

    /// Rise/set events for the UTC calendar day containing `time`
    fn rise_set(&self, time: DateTime<Utc>, coordinate: &Coordinate) -> Result<RiseSet>;
}

impl<E: Ephemeris + ?Sized> Ephemeris for &E {
    fn position(&self, time: DateTime<Utc>, coordinate: &Coordinate) -> Result<RawMoonPosition> {
        (**self).position(time, coordinate)
    }

    fn illumination(&self, time: DateTime<Utc>) -> Result<MoonIllumination> {
        (**self).illumination(time)
    }

    fn rise_set(&self, time: DateTime<Utc>, coordinate: &Coordinate) -> Result<RiseSet> {
        (**self).rise_set(time, coordinate)
    }
}
