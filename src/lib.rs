#![doc = include_str!("../README.md")]

pub use crate::calculator::{
    SEARCH_HORIZON_DAYS, SYNODIC_MONTH_DAYS, VisibilityCalculator, moon_age_days,
    next_major_phase, time_remaining,
};
pub use crate::ephemeris::MeeusEphemeris;
pub use crate::error::{Error, Result};
pub use crate::scheduler::{
    DisplayState, LocationProvider, MoonSnapshot, NoGeocoder, REFRESH_INTERVAL, RefreshScheduler,
    ReverseGeocoder, StaticLocation,
};
pub use crate::types::*;

mod calculator;
pub mod ephemeris;
mod error;
mod scheduler;
mod types;
pub mod utils;
