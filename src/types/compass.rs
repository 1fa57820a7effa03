use crate::utils::angle::normalize_degrees;
use std::fmt;

/// 16-wind compass rose
///
/// Each point covers a 22.5° slice centered on its heading; an azimuth is
/// mapped by rounding `azimuth / 22.5` to the nearest slice, so 11.24°
/// is still north while 11.25° tips over to north-northeast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CompassPoint {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
}

const POINTS: [CompassPoint; 16] = [
    CompassPoint::N,
    CompassPoint::NNE,
    CompassPoint::NE,
    CompassPoint::ENE,
    CompassPoint::E,
    CompassPoint::ESE,
    CompassPoint::SE,
    CompassPoint::SSE,
    CompassPoint::S,
    CompassPoint::SSW,
    CompassPoint::SW,
    CompassPoint::WSW,
    CompassPoint::W,
    CompassPoint::WNW,
    CompassPoint::NW,
    CompassPoint::NNW,
];

impl CompassPoint {
    /// Map a north-referenced azimuth in degrees to the nearest point
    ///
    /// The azimuth is reduced into `[0, 360)` first, so any finite input
    /// is accepted.
    pub fn from_azimuth(azimuth: f64) -> Self {
        let azimuth = normalize_degrees(azimuth);
        let index = (azimuth / 22.5).round() as usize % 16;
        POINTS[index]
    }

    /// Abbreviated label, e.g. `"NNE"`
    pub fn abbreviation(&self) -> &'static str {
        match self {
            CompassPoint::N => "N",
            CompassPoint::NNE => "NNE",
            CompassPoint::NE => "NE",
            CompassPoint::ENE => "ENE",
            CompassPoint::E => "E",
            CompassPoint::ESE => "ESE",
            CompassPoint::SE => "SE",
            CompassPoint::SSE => "SSE",
            CompassPoint::S => "S",
            CompassPoint::SSW => "SSW",
            CompassPoint::SW => "SW",
            CompassPoint::WSW => "WSW",
            CompassPoint::W => "W",
            CompassPoint::WNW => "WNW",
            CompassPoint::NW => "NW",
            CompassPoint::NNW => "NNW",
        }
    }
}

impl fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}
