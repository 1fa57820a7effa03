/// Errors surfaced by the calculator and scheduler
///
/// The enum is `Clone` so a failure can be published through the
/// scheduler's `watch` channel and observed by any number of consumers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Latitude or longitude outside the valid range
    ///
    /// Validation happens before any ephemeris call. This error is never
    /// retried automatically; the caller must supply a corrected
    /// coordinate.
    #[error("invalid coordinate: latitude {latitude}, longitude {longitude} (expected [-90, 90] / [-180, 180])")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// The ephemeris provider failed; the whole computation is aborted
    #[error("ephemeris unavailable: {0}")]
    EphemerisUnavailable(String),

    /// Device geolocation denied, unsupported or timed out
    #[error("location unavailable: {0}")]
    LocationUnavailable(String),

    /// Reverse geocoding failed (non-fatal; display falls back to raw coordinates)
    #[error("reverse geocoding unavailable: {0}")]
    GeocodeUnavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;
