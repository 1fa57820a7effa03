//! Built-in low-precision lunar ephemeris
//!
//! Position comes from truncated periodic-term series after Jean Meeus,
//! *Astronomical Algorithms* (2nd ed.), Ch. 47, keeping the dominant
//! terms of Tables 47.A and 47.B plus the planetary correction terms.
//! Phase and illumination use a low-precision solar longitude and the
//! sun–moon elongation. Rise/set times come from an altitude scan over
//! the UTC day refined by bisection.
//!
//! Accuracy is display-grade: ~0.3° in position, a few minutes in
//! rise/set times.

use crate::ephemeris::{Ephemeris, MoonIllumination, RawMoonPosition, RiseSet};
use crate::error::Result;
use crate::types::Coordinate;
use crate::utils::angle::{normalize_degrees, normalize_fraction};
use chrono::{DateTime, Duration, NaiveTime, Utc};

/// Julian day of the Unix epoch
const JD_UNIX_EPOCH: f64 = 2_440_587.5;
/// Julian day of the J2000.0 epoch (2000-01-01 12:00 TT)
const JD_J2000: f64 = 2_451_545.0;

/// Apparent altitude at which the upper limb rises or sets, degrees
///
/// Net effect of refraction and the moon's parallax and semi-diameter.
const RISE_SET_ALTITUDE_DEG: f64 = 0.125;

/// Altitude-scan step when bracketing horizon crossings
const SCAN_STEP_MINUTES: i64 = 10;

/// Built-in [`Ephemeris`] implementation
///
/// Stateless and infallible: every trait method returns `Ok`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeeusEphemeris;

impl Ephemeris for MeeusEphemeris {
    fn position(&self, time: DateTime<Utc>, coordinate: &Coordinate) -> Result<RawMoonPosition> {
        let (altitude, azimuth) = horizontal_position(time, coordinate);
        Ok(RawMoonPosition { altitude, azimuth })
    }

    fn illumination(&self, time: DateTime<Utc>) -> Result<MoonIllumination> {
        let t = julian_centuries(julian_day(time));
        let moon = moon_ecliptic(t);
        let sun_lon = sun_ecliptic_longitude(julian_day(time));

        let elongation = normalize_degrees(moon.longitude - sun_lon);
        let phase = normalize_fraction(elongation / 360.0);

        // Illuminated fraction from the geocentric elongation angle.
        let psi = (moon.latitude.to_radians().cos() * elongation.to_radians().cos()).acos();
        let fraction = (1.0 - psi.cos()) / 2.0;

        Ok(MoonIllumination { phase, fraction })
    }

    fn rise_set(&self, time: DateTime<Utc>, coordinate: &Coordinate) -> Result<RiseSet> {
        let day_start = time.date_naive().and_time(NaiveTime::MIN).and_utc();

        let mut rise = None;
        let mut set = None;

        let step = Duration::minutes(SCAN_STEP_MINUTES);
        let mut prev_time = day_start;
        let mut prev_alt = altitude_degrees(prev_time, coordinate);

        let samples = 24 * 60 / SCAN_STEP_MINUTES;
        for i in 1..=samples {
            let cur_time = day_start + step * i as i32;
            let cur_alt = altitude_degrees(cur_time, coordinate);

            if prev_alt < RISE_SET_ALTITUDE_DEG && cur_alt >= RISE_SET_ALTITUDE_DEG {
                rise.get_or_insert_with(|| refine_crossing(prev_time, cur_time, coordinate));
            } else if prev_alt >= RISE_SET_ALTITUDE_DEG && cur_alt < RISE_SET_ALTITUDE_DEG {
                set.get_or_insert_with(|| refine_crossing(prev_time, cur_time, coordinate));
            }

            prev_time = cur_time;
            prev_alt = cur_alt;
        }

        Ok(RiseSet { rise, set })
    }
}

/// Geocentric ecliptic coordinates of the moon
#[derive(Debug, Clone, Copy)]
struct MoonEcliptic {
    /// Ecliptic longitude, degrees
    longitude: f64,
    /// Ecliptic latitude, degrees
    latitude: f64,
    /// Distance from Earth's center, km
    distance_km: f64,
}

fn julian_day(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / 86_400_000.0 + JD_UNIX_EPOCH
}

fn julian_centuries(jd: f64) -> f64 {
    (jd - JD_J2000) / 36_525.0
}

// Periodic terms for longitude and distance (Table 47.A, dominant terms).
// Each entry: multiples of (D, M, M', F), then the sine coefficient for
// longitude (1e-6 degrees) and the cosine coefficient for distance
// (1e-3 km).
const TERMS_LON_DIST: [(i8, i8, i8, i8, f64, f64); 20] = [
    (0, 0, 1, 0, 6_288_774.0, -20_905_355.0),
    (2, 0, -1, 0, 1_274_027.0, -3_699_111.0),
    (2, 0, 0, 0, 658_314.0, -2_955_968.0),
    (0, 0, 2, 0, 213_618.0, -569_925.0),
    (0, 1, 0, 0, -185_116.0, 48_888.0),
    (0, 0, 0, 2, -114_332.0, -3_149.0),
    (2, 0, -2, 0, 58_793.0, 246_158.0),
    (2, -1, -1, 0, 57_066.0, -152_138.0),
    (2, 0, 1, 0, 53_322.0, -170_733.0),
    (2, -1, 0, 0, 45_758.0, -204_586.0),
    (0, 1, -1, 0, -40_923.0, -129_620.0),
    (1, 0, 0, 0, -34_720.0, 108_743.0),
    (0, 1, 1, 0, -30_383.0, 104_755.0),
    (2, 0, 0, -2, 15_327.0, 10_321.0),
    (0, 0, 1, 2, -12_528.0, 0.0),
    (0, 0, 1, -2, 10_980.0, 79_661.0),
    (4, 0, -1, 0, 10_675.0, -34_782.0),
    (0, 0, 3, 0, 10_034.0, -23_210.0),
    (4, 0, -2, 0, 8_548.0, -21_636.0),
    (2, 1, -1, 0, -7_888.0, 24_208.0),
];

// Periodic terms for latitude (Table 47.B, dominant terms).
// Each entry: multiples of (D, M, M', F) and the sine coefficient
// (1e-6 degrees).
const TERMS_LAT: [(i8, i8, i8, i8, f64); 20] = [
    (0, 0, 0, 1, 5_128_122.0),
    (0, 0, 1, 1, 280_602.0),
    (0, 0, 1, -1, 277_693.0),
    (2, 0, 0, -1, 173_237.0),
    (2, 0, -1, 1, 55_413.0),
    (2, 0, -1, -1, 46_271.0),
    (2, 0, 0, 1, 32_573.0),
    (0, 0, 2, 1, 17_198.0),
    (2, 0, 1, -1, 9_266.0),
    (0, 0, 2, -1, 8_822.0),
    (2, -1, 0, -1, 8_216.0),
    (2, 0, -2, -1, 4_324.0),
    (2, 0, 1, 1, 4_200.0),
    (2, 1, 0, -1, -3_359.0),
    (2, -1, -1, 1, 2_463.0),
    (2, -1, 0, 1, 2_211.0),
    (2, -1, -1, -1, 2_065.0),
    (0, 1, -1, -1, -1_870.0),
    (4, 0, -1, -1, 1_828.0),
    (0, 1, 0, 1, -1_794.0),
];

/// Truncated Ch. 47 lunar theory, evaluated at `t` Julian centuries
/// since J2000.0
fn moon_ecliptic(t: f64) -> MoonEcliptic {
    // Fundamental arguments, degrees (47.1–47.5).
    let lp = normalize_degrees(
        218.316_447_7 + 481_267.881_234_21 * t - 0.001_578_6 * t * t + t * t * t / 538_841.0,
    );
    let d = normalize_degrees(
        297.850_192_1 + 445_267.111_403_4 * t - 0.001_881_9 * t * t + t * t * t / 545_868.0,
    );
    let m = normalize_degrees(357.529_109_2 + 35_999.050_290_9 * t - 0.000_153_6 * t * t);
    let mp = normalize_degrees(
        134.963_396_4 + 477_198.867_505_5 * t + 0.008_741_4 * t * t + t * t * t / 69_699.0,
    );
    let f = normalize_degrees(93.272_095_0 + 483_202.017_523_3 * t - 0.003_653_9 * t * t);

    // Eccentricity damping for terms involving the sun's anomaly (47.6).
    let e = 1.0 - 0.002_516 * t - 0.000_007_4 * t * t;

    let mut sum_l = 0.0;
    let mut sum_r = 0.0;
    for &(td, tm, tmp, tf, coeff_l, coeff_r) in &TERMS_LON_DIST {
        let arg = (td as f64 * d + tm as f64 * m + tmp as f64 * mp + tf as f64 * f).to_radians();
        let damping = e.powi(tm.abs() as i32);
        sum_l += coeff_l * damping * arg.sin();
        sum_r += coeff_r * damping * arg.cos();
    }

    let mut sum_b = 0.0;
    for &(td, tm, tmp, tf, coeff_b) in &TERMS_LAT {
        let arg = (td as f64 * d + tm as f64 * m + tmp as f64 * mp + tf as f64 * f).to_radians();
        let damping = e.powi(tm.abs() as i32);
        sum_b += coeff_b * damping * arg.sin();
    }

    // Planetary perturbations and the flattening term (47.x additives).
    let a1 = normalize_degrees(119.75 + 131.849 * t).to_radians();
    let a2 = normalize_degrees(53.09 + 479_264.290 * t).to_radians();
    let a3 = normalize_degrees(313.45 + 481_266.484 * t).to_radians();
    sum_l += 3_958.0 * a1.sin()
        + 1_962.0 * (lp - f).to_radians().sin()
        + 318.0 * a2.sin();
    sum_b += -2_235.0 * lp.to_radians().sin()
        + 382.0 * a3.sin()
        + 175.0 * (a1 - f.to_radians()).sin()
        + 175.0 * (a1 + f.to_radians()).sin()
        + 127.0 * (lp - mp).to_radians().sin()
        - 115.0 * (lp + mp).to_radians().sin();

    MoonEcliptic {
        longitude: normalize_degrees(lp + sum_l / 1_000_000.0),
        latitude: sum_b / 1_000_000.0,
        distance_km: 385_000.56 + sum_r / 1_000.0,
    }
}

/// Low-precision solar ecliptic longitude, degrees
///
/// Mean-elements formula; only used for the phase and illumination
/// calculation, where ~0.01° is ample.
fn sun_ecliptic_longitude(jd: f64) -> f64 {
    let n = jd - JD_J2000;
    let mean_longitude = normalize_degrees(280.460 + 0.985_647_4 * n);
    let mean_anomaly = normalize_degrees(357.528 + 0.985_600_3 * n).to_radians();
    normalize_degrees(
        mean_longitude + 1.915 * mean_anomaly.sin() + 0.020 * (2.0 * mean_anomaly).sin(),
    )
}

/// Mean obliquity of the ecliptic, degrees
fn mean_obliquity(t: f64) -> f64 {
    23.439_291_1 - 0.013_004_2 * t - 0.000_000_164 * t * t
}

/// Greenwich mean sidereal time, degrees
fn sidereal_time(jd: f64) -> f64 {
    let t = julian_centuries(jd);
    normalize_degrees(
        280.460_618_37 + 360.985_647_366_29 * (jd - JD_J2000) + 0.000_387_933 * t * t
            - t * t * t / 38_710_000.0,
    )
}

/// Altitude and south-referenced azimuth of the moon, radians
fn horizontal_position(time: DateTime<Utc>, coordinate: &Coordinate) -> (f64, f64) {
    let jd = julian_day(time);
    let t = julian_centuries(jd);
    let moon = moon_ecliptic(t);

    // Ecliptic → equatorial.
    let eps = mean_obliquity(t).to_radians();
    let lambda = moon.longitude.to_radians();
    let beta = moon.latitude.to_radians();
    let ra = (lambda.sin() * eps.cos() - beta.tan() * eps.sin()).atan2(lambda.cos());
    let dec = (beta.sin() * eps.cos() + beta.cos() * eps.sin() * lambda.sin()).asin();

    // Local hour angle.
    let h = (sidereal_time(jd) + coordinate.longitude() - ra.to_degrees()).to_radians();

    let lat = coordinate.latitude().to_radians();
    let altitude = (lat.sin() * dec.sin() + lat.cos() * dec.cos() * h.cos()).asin();
    // Azimuth measured from south, positive toward the west.
    let azimuth = h.sin().atan2(h.cos() * lat.sin() - dec.tan() * lat.cos());

    (altitude, azimuth)
}

fn altitude_degrees(time: DateTime<Utc>, coordinate: &Coordinate) -> f64 {
    horizontal_position(time, coordinate).0.to_degrees()
}

/// Narrow a bracketed horizon crossing down to the second
fn refine_crossing(
    mut below: DateTime<Utc>,
    mut above: DateTime<Utc>,
    coordinate: &Coordinate,
) -> DateTime<Utc> {
    // `below`/`above` name the bracket order, not the altitude sign; for
    // a setting moon the times arrive with the altitudes swapped.
    let start_sign = altitude_degrees(below, coordinate) >= RISE_SET_ALTITUDE_DEG;

    while (above - below) > Duration::seconds(1) {
        let mid = below + (above - below) / 2;
        let mid_sign = altitude_degrees(mid, coordinate) >= RISE_SET_ALTITUDE_DEG;
        if mid_sign == start_sign {
            below = mid;
        } else {
            above = mid;
        }
    }

    above
}
