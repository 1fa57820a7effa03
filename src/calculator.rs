//! Visibility determination and event forecasting
//!
//! [`VisibilityCalculator`] turns raw ephemeris output into a
//! [`MoonObservation`]: unit conversion, azimuth re-referencing, the
//! horizon test and the bounded forward search for the next rise/set
//! event. The free functions at the bottom are the pure derived helpers
//! a display layer builds its labels from.

use crate::ephemeris::Ephemeris;
use crate::error::Result;
use crate::types::{Coordinate, MajorPhase, MoonObservation, TimeRemaining};
use crate::utils::angle::{normalize_degrees, normalize_fraction};
use chrono::{DateTime, Duration, Utc};

/// Mean length of the synodic month, days
pub const SYNODIC_MONTH_DAYS: f64 = 29.53;

/// How many day-offsets past the query day the rise/set search covers
///
/// Near the poles the moon can fail to rise or set on a given calendar
/// day; a week of forward queries always brackets the next event where
/// one exists, while capping the cost when none does.
pub const SEARCH_HORIZON_DAYS: i64 = 7;

#[derive(Clone, Copy)]
enum EventKind {
    Rise,
    Set,
}

/// Computes [`MoonObservation`] snapshots from an [`Ephemeris`] source
///
/// The calculator itself is stateless; it holds only the provider it
/// queries. Observations are value objects, recomputed wholesale on
/// every refresh.
#[derive(Debug, Clone)]
pub struct VisibilityCalculator<E> {
    ephemeris: E,
}

impl<E: Ephemeris> VisibilityCalculator<E> {
    pub fn new(ephemeris: E) -> Self {
        Self { ephemeris }
    }

    /// Reference to the underlying ephemeris provider
    pub fn ephemeris(&self) -> &E {
        &self.ephemeris
    }

    /// Compute the lunar snapshot for one `(time, coordinate)` pair
    ///
    /// The raw south-referenced azimuth is rotated to a north-based
    /// bearing in `[0°, 360°)`, and the moon counts as visible only when
    /// strictly above the horizon — an altitude of exactly 0° does not.
    ///
    /// `next_rise`/`next_set` are resolved independently: today's event
    /// is used when it is still ahead of `time`, otherwise the provider
    /// is queried day by day up to [`SEARCH_HORIZON_DAYS`] offsets
    /// forward. The two events may well land on different days.
    ///
    /// # Errors
    ///
    /// Any provider failure aborts the whole computation; no partial
    /// observation is ever returned.
    pub fn compute_observation(
        &self,
        time: DateTime<Utc>,
        coordinate: &Coordinate,
    ) -> Result<MoonObservation> {
        let position = self.ephemeris.position(time, coordinate)?;
        let illumination = self.ephemeris.illumination(time)?;

        let altitude = position.altitude.to_degrees();
        let azimuth = normalize_degrees(position.azimuth.to_degrees() + 180.0);

        let next_rise = self.next_event(time, coordinate, EventKind::Rise)?;
        let next_set = self.next_event(time, coordinate, EventKind::Set)?;

        Ok(MoonObservation {
            is_visible: altitude > 0.0,
            altitude,
            azimuth,
            phase: illumination.phase,
            illuminated_fraction: illumination.fraction,
            next_rise,
            next_set,
            computed_at: time,
        })
    }

    /// First rise or set event strictly after `time`, if any
    fn next_event(
        &self,
        time: DateTime<Utc>,
        coordinate: &Coordinate,
        kind: EventKind,
    ) -> Result<Option<DateTime<Utc>>> {
        for offset in 0..=SEARCH_HORIZON_DAYS {
            let candidate_day = time + Duration::days(offset);
            let events = self.ephemeris.rise_set(candidate_day, coordinate)?;
            let event = match kind {
                EventKind::Rise => events.rise,
                EventKind::Set => events.set,
            };
            if let Some(stamp) = event.filter(|stamp| *stamp > time) {
                return Ok(Some(stamp));
            }
        }

        Ok(None)
    }
}

/// Age of the moon in days since new, rounded to one decimal
pub fn moon_age_days(phase: f64) -> f64 {
    (normalize_fraction(phase) * SYNODIC_MONTH_DAYS * 10.0).round() / 10.0
}

/// The nearest principal phase strictly ahead of `phase`, with its
/// estimated date
///
/// Targets are the quarter points of the cycle; a fraction in the last
/// quarter wraps forward to the coming new moon. The date estimate
/// converts the remaining cycle fraction to days via the mean synodic
/// month.
pub fn next_major_phase(phase: f64, now: DateTime<Utc>) -> (MajorPhase, DateTime<Utc>) {
    const TARGETS: [(f64, MajorPhase); 4] = [
        (0.25, MajorPhase::FirstQuarter),
        (0.5, MajorPhase::FullMoon),
        (0.75, MajorPhase::LastQuarter),
        (1.0, MajorPhase::NewMoon),
    ];

    let phase = normalize_fraction(phase);
    let (target, label) = TARGETS
        .into_iter()
        .find(|(target, _)| *target > phase)
        .unwrap_or((1.0, MajorPhase::NewMoon));

    let days_ahead = (target - phase) * SYNODIC_MONTH_DAYS;
    let date = now + Duration::milliseconds((days_ahead * 86_400_000.0) as i64);
    (label, date)
}

/// Whole hours and minutes until `target`, floor semantics
///
/// `None` when the target is absent or not in the future; a target 30
/// seconds ahead yields `0h 0m`.
pub fn time_remaining(target: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<TimeRemaining> {
    let target = target?;
    if target <= now {
        return None;
    }

    let minutes = (target - now).num_minutes();
    Some(TimeRemaining {
        hours: minutes / 60,
        minutes: minutes % 60,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use claims::{assert_none, assert_some_eq};

    #[test]
    fn test_moon_age_at_new_moon() {
        assert_eq!(moon_age_days(0.0), 0.0);
    }

    #[test]
    fn test_moon_age_at_full_moon() {
        // 0.5 × 29.53 = 14.765, rounded to one decimal.
        assert!((moon_age_days(0.5) - 14.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_moon_age_rounding() {
        assert_eq!(moon_age_days(0.1), 3.0);
        assert_eq!(moon_age_days(0.25), 7.4);
    }

    #[test]
    fn test_next_major_phase_targets() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        assert_eq!(next_major_phase(0.0, now).0, MajorPhase::FirstQuarter);
        assert_eq!(next_major_phase(0.3, now).0, MajorPhase::FullMoon);
        assert_eq!(next_major_phase(0.6, now).0, MajorPhase::LastQuarter);
        assert_eq!(next_major_phase(0.8, now).0, MajorPhase::NewMoon);
    }

    #[test]
    fn test_next_major_phase_is_strictly_ahead() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        // Sitting exactly on a quarter point advances to the next one.
        assert_eq!(next_major_phase(0.25, now).0, MajorPhase::FullMoon);
        assert_eq!(next_major_phase(0.75, now).0, MajorPhase::NewMoon);
    }

    #[test]
    fn test_next_major_phase_date() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        // A quarter of the cycle ahead: 0.25 × 29.53 days.
        let (_, date) = next_major_phase(0.25, now);
        let expected = now + Duration::milliseconds((0.25 * SYNODIC_MONTH_DAYS * 86_400_000.0) as i64);
        assert_eq!(date, expected);
    }

    #[test]
    fn test_time_remaining_none_for_past_or_absent() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();

        assert_none!(time_remaining(None, now));
        assert_none!(time_remaining(Some(now), now));
        assert_none!(time_remaining(Some(now - Duration::minutes(5)), now));
    }

    #[test]
    fn test_time_remaining_floors() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();

        // 30 seconds out floors to zero, it does not round up.
        assert_some_eq!(
            time_remaining(Some(now + Duration::seconds(30)), now),
            TimeRemaining {
                hours: 0,
                minutes: 0
            }
        );
        assert_some_eq!(
            time_remaining(Some(now + Duration::minutes(90)), now),
            TimeRemaining {
                hours: 1,
                minutes: 30
            }
        );
        assert_some_eq!(
            time_remaining(Some(now + Duration::minutes(119) + Duration::seconds(59)), now),
            TimeRemaining {
                hours: 1,
                minutes: 59
            }
        );
    }
}
