//! # Sun Moon
//!
//! Solar and lunar positions, twilight events, solar dates and solar periods for any
//! location on Earth.
//!
//! The crate answers questions such as "when is civil dawn in Ithaca on 1 October 2020",
//! "which solar day does this recording belong to" or "is this instant morning or evening
//! nautical twilight". Event times come from a discrete search over the Sun's twilight
//! band (night, astronomical, nautical, civil, day) and its side of the meridian, so
//! they are found by bisection against the ephemeris rather than by closed-form
//! approximations.
//!
//! ## Basic Usage
//!
//! ```
//! use chrono::{NaiveDate, TimeZone};
//! use chrono_tz::US::Eastern;
//! use sun_moon::{AstronomicalCalculator, EventName, Location, NameFilter};
//!
//! let mut calculator = AstronomicalCalculator::new();
//! let ithaca = Location::new(42.431964, -76.501656).unwrap();
//! let date = NaiveDate::from_ymd_opt(2020, 10, 1).unwrap();
//!
//! // Events of the solar day: from the solar midnight opening it through its noon
//! // and evening twilight.
//! let events = calculator
//!     .get_solar_events(&ithaca, Eastern, date, &NameFilter::All, true)
//!     .unwrap();
//! for event in &events {
//!     println!("{:<18} {}", event.name, event.time);
//! }
//!
//! let sunrise = calculator
//!     .get_solar_event_time(&ithaca, Eastern, date, EventName::Sunrise, true)
//!     .unwrap();
//! assert!(sunrise.is_some());
//!
//! // Where the Sun is at that moment
//! let at = Eastern.with_ymd_and_hms(2020, 10, 1, 12, 0, 0).unwrap();
//! let position = calculator.get_solar_position(&ithaca, Eastern, &at);
//! println!("altitude {:.2}°, azimuth {:.2}°", position.altitude, position.azimuth);
//! ```
//!
//! Positions come from the built-in analytic [`Ephemeris`]; any other source can be
//! plugged in through [`PositionProvider`].

mod cache;
mod calculator;
mod config;
mod ephemeris;
mod geo;
mod math;
mod moon;
mod naming;
mod period;
mod search;
mod sun;
mod sun_moon;
mod time;
mod types;


use thiserror::Error;

pub use calculator::AstronomicalCalculator;
pub use config::CalculatorConfig;
pub use ephemeris::{Body, Ephemeris, Position, PositionProvider};
pub use search::{find_discrete, transit_parity, twilight_band, Transition, TWILIGHT_THRESHOLDS};
pub use sun_moon::SunMoon;
pub use time::{get_delta_t, parse_instant};
pub use types::{Event, EventName, Location, NameFilter, SolarPeriod};

/// Errors that can occur during solar and lunar calculations.
///
/// Usage errors (`NaiveInstant`, `UnknownEventName`, `UnknownPeriodName`,
/// `InvalidInterval`, `InvalidConfig`) and input validation errors are the caller's to
/// fix. `PolarLocation` marks queries that have no answer exactly at a pole.
/// `TransitCount` and `UnexpectedTransition` mean the event search broke an invariant
/// and its result cannot be trusted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalculationError {
    /// A timestamp without a UTC offset
    #[error("Timestamp {0:?} has no UTC offset")]
    NaiveInstant(String),

    /// Not one of the ten event names
    #[error("Unknown event name {0:?}")]
    UnknownEventName(String),

    /// Not one of the eight solar period names
    #[error("Unknown solar period {0:?}")]
    UnknownPeriodName(String),

    /// Interval start not before its end, or a non-positive search step
    #[error("Interval start must be before its end")]
    InvalidInterval,

    /// A configuration value outside its valid range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// Latitude out of valid range [-90, 90] degrees
    #[error("Latitude out of range")]
    LatitudeOutOfRange,

    /// Longitude out of valid range [-180, 180] degrees
    #[error("Longitude out of range")]
    LongitudeOutOfRange,

    /// Error converting between time representations
    #[error("Time conversion error")]
    TimeConversionError,

    /// Date, event and period queries are undefined at |latitude| = 90
    #[error("{operation} is undefined at the poles")]
    PolarLocation { operation: &'static str },

    /// The transit search window did not contain exactly three transits
    #[error("Expected 3 solar transits in the search window, found {found}")]
    TransitCount { found: usize },

    /// The twilight band changed between non-adjacent bands
    #[error("Unexpected twilight band transition {from} -> {to}")]
    UnexpectedTransition { from: u8, to: u8 },
}
