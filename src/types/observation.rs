use crate::types::{CompassPoint, MoonPhase};
use chrono::{DateTime, Utc};

/// The computed lunar snapshot for one `(time, coordinate)` pair
///
/// An observation is a value object: recomputed on every refresh tick or
/// location change and always replaced wholesale, never mutated.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MoonObservation {
    /// True iff the moon is strictly above the horizon
    ///
    /// An altitude of exactly 0° counts as *not* visible. The boundary is
    /// horizon-exclusive on purpose and covered by a dedicated test.
    pub is_visible: bool,
    /// Altitude above (+) or below (−) the local horizon, degrees
    pub altitude: f64,
    /// Compass bearing in degrees, `[0, 360)`, 0 = true north, clockwise
    pub azimuth: f64,
    /// Fraction of the lunar cycle elapsed since new moon, `[0, 1)`
    pub phase: f64,
    /// Fraction of the visible disc lit by the sun, `[0, 1]`
    pub illuminated_fraction: f64,
    /// Next rise strictly after the query time, if one exists within the
    /// search horizon
    pub next_rise: Option<DateTime<Utc>>,
    /// Next set strictly after the query time, if one exists within the
    /// search horizon
    pub next_set: Option<DateTime<Utc>>,
    /// The instant this observation was computed for
    pub computed_at: DateTime<Utc>,
}

impl MoonObservation {
    /// Phase label for this observation
    pub fn phase_label(&self) -> MoonPhase {
        MoonPhase::from_fraction(self.phase)
    }

    /// Compass point the moon currently bears toward
    pub fn compass_point(&self) -> CompassPoint {
        CompassPoint::from_azimuth(self.azimuth)
    }
}

/// Whole hours and remaining minutes until a future event
///
/// Produced by [`time_remaining`](crate::time_remaining) with floor
/// semantics: 30 seconds out is `0h 0m`, not `0h 1m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TimeRemaining {
    pub hours: i64,
    pub minutes: i64,
}
