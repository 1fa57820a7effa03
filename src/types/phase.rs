use crate::utils::angle::normalize_fraction;
use std::fmt;

/// Eight-label lunar phase classification
///
/// Derived from the cycle fraction via fixed threshold bands, half-open
/// on the upper edge and wrapping at the new-moon boundary: a fraction of
/// exactly 0.03 is already [`WaxingCrescent`](MoonPhase::WaxingCrescent),
/// and `[0.97, 1)` wraps back to [`NewMoon`](MoonPhase::NewMoon).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum MoonPhase {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    /// Classify a cycle fraction
    ///
    /// The input is reduced into `[0, 1)` first, so callers may pass an
    /// unnormalized fraction.
    pub fn from_fraction(fraction: f64) -> Self {
        let f = normalize_fraction(fraction);
        match f {
            f if f < 0.03 => MoonPhase::NewMoon,
            f if f < 0.22 => MoonPhase::WaxingCrescent,
            f if f < 0.28 => MoonPhase::FirstQuarter,
            f if f < 0.47 => MoonPhase::WaxingGibbous,
            f if f < 0.53 => MoonPhase::FullMoon,
            f if f < 0.72 => MoonPhase::WaningGibbous,
            f if f < 0.78 => MoonPhase::LastQuarter,
            f if f < 0.97 => MoonPhase::WaningCrescent,
            _ => MoonPhase::NewMoon,
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            MoonPhase::NewMoon => "New Moon",
            MoonPhase::WaxingCrescent => "Waxing Crescent",
            MoonPhase::FirstQuarter => "First Quarter",
            MoonPhase::WaxingGibbous => "Waxing Gibbous",
            MoonPhase::FullMoon => "Full Moon",
            MoonPhase::WaningGibbous => "Waning Gibbous",
            MoonPhase::LastQuarter => "Last Quarter",
            MoonPhase::WaningCrescent => "Waning Crescent",
        }
    }
}

impl fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The four principal phases used for "next phase" forecasting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum MajorPhase {
    NewMoon,
    FirstQuarter,
    FullMoon,
    LastQuarter,
}

impl MajorPhase {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            MajorPhase::NewMoon => "New Moon",
            MajorPhase::FirstQuarter => "First Quarter",
            MajorPhase::FullMoon => "Full Moon",
            MajorPhase::LastQuarter => "Last Quarter",
        }
    }
}

impl fmt::Display for MajorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries_are_half_open() {
        // Each boundary value belongs to the band it opens, not the one
        // it closes.
        assert_eq!(MoonPhase::from_fraction(0.0), MoonPhase::NewMoon);
        assert_eq!(MoonPhase::from_fraction(0.03), MoonPhase::WaxingCrescent);
        assert_eq!(MoonPhase::from_fraction(0.22), MoonPhase::FirstQuarter);
        assert_eq!(MoonPhase::from_fraction(0.28), MoonPhase::WaxingGibbous);
        assert_eq!(MoonPhase::from_fraction(0.47), MoonPhase::FullMoon);
        assert_eq!(MoonPhase::from_fraction(0.53), MoonPhase::WaningGibbous);
        assert_eq!(MoonPhase::from_fraction(0.72), MoonPhase::LastQuarter);
        assert_eq!(MoonPhase::from_fraction(0.78), MoonPhase::WaningCrescent);
        assert_eq!(MoonPhase::from_fraction(0.97), MoonPhase::NewMoon);
    }

    #[test]
    fn test_band_interiors() {
        assert_eq!(MoonPhase::from_fraction(0.01), MoonPhase::NewMoon);
        assert_eq!(MoonPhase::from_fraction(0.15), MoonPhase::WaxingCrescent);
        assert_eq!(MoonPhase::from_fraction(0.25), MoonPhase::FirstQuarter);
        assert_eq!(MoonPhase::from_fraction(0.40), MoonPhase::WaxingGibbous);
        assert_eq!(MoonPhase::from_fraction(0.50), MoonPhase::FullMoon);
        assert_eq!(MoonPhase::from_fraction(0.60), MoonPhase::WaningGibbous);
        assert_eq!(MoonPhase::from_fraction(0.75), MoonPhase::LastQuarter);
        assert_eq!(MoonPhase::from_fraction(0.90), MoonPhase::WaningCrescent);
        assert_eq!(MoonPhase::from_fraction(0.99), MoonPhase::NewMoon);
    }

    #[test]
    fn test_wrapping_input() {
        assert_eq!(MoonPhase::from_fraction(1.0), MoonPhase::NewMoon);
        assert_eq!(MoonPhase::from_fraction(1.5), MoonPhase::FullMoon);
        assert_eq!(MoonPhase::from_fraction(-0.5), MoonPhase::FullMoon);
    }

    #[test]
    fn test_every_fraction_has_exactly_one_label() {
        // Sweep the cycle in fine steps; `from_fraction` is total.
        let mut i = 0;
        while i < 1000 {
            let f = i as f64 / 1000.0;
            let _ = MoonPhase::from_fraction(f);
            i += 1;
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(MoonPhase::FullMoon.to_string(), "Full Moon");
        assert_eq!(MajorPhase::LastQuarter.to_string(), "Last Quarter");
    }
}
