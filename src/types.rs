use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono_tz::Tz;

use crate::CalculationError;

/// An observer on the Earth's surface at sea level.
///
/// Latitude is in degrees north (-90 to 90) and longitude in degrees east (-180 to 180).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    latitude: f64,
    longitude: f64,
}

impl Location {
    /// Creates a location, validating both coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::LatitudeOutOfRange`] or
    /// [`CalculationError::LongitudeOutOfRange`] for coordinates outside their range
    /// (including NaN).
    ///
    /// # Example
    ///
    /// ```
    /// use sun_moon::Location;
    ///
    /// let ithaca = Location::new(42.431964, -76.501656).unwrap();
    /// assert!(!ithaca.is_polar());
    /// assert!(Location::new(91.0, 0.0).is_err());
    /// ```
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CalculationError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CalculationError::LatitudeOutOfRange);
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CalculationError::LongitudeOutOfRange);
        }
        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// True exactly at either geographic pole, where solar days are undefined.
    pub fn is_polar(&self) -> bool {
        self.latitude.abs() == 90.0
    }
}

/// The ten named solar events: eight twilight boundaries and two meridian transits.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventName {
    SolarMidnight,
    AstronomicalDawn,
    NauticalDawn,
    CivilDawn,
    Sunrise,
    SolarNoon,
    Sunset,
    CivilDusk,
    NauticalDusk,
    AstronomicalDusk,
}

impl EventName {
    pub const ALL: [EventName; 10] = [
        EventName::SolarMidnight,
        EventName::AstronomicalDawn,
        EventName::NauticalDawn,
        EventName::CivilDawn,
        EventName::Sunrise,
        EventName::SolarNoon,
        EventName::Sunset,
        EventName::CivilDusk,
        EventName::NauticalDusk,
        EventName::AstronomicalDusk,
    ];

    /// Canonical display name, e.g. `"Civil Dawn"`.
    pub fn as_str(self) -> &'static str {
        match self {
            EventName::SolarMidnight => "Solar Midnight",
            EventName::AstronomicalDawn => "Astronomical Dawn",
            EventName::NauticalDawn => "Nautical Dawn",
            EventName::CivilDawn => "Civil Dawn",
            EventName::Sunrise => "Sunrise",
            EventName::SolarNoon => "Solar Noon",
            EventName::Sunset => "Sunset",
            EventName::CivilDusk => "Civil Dusk",
            EventName::NauticalDusk => "Nautical Dusk",
            EventName::AstronomicalDusk => "Astronomical Dusk",
        }
    }

    /// Solar Noon or Solar Midnight.
    pub fn is_transit(self) -> bool {
        matches!(self, EventName::SolarNoon | EventName::SolarMidnight)
    }

    /// Dawn events and sunrise.
    pub fn is_morning(self) -> bool {
        matches!(
            self,
            EventName::AstronomicalDawn | EventName::NauticalDawn | EventName::CivilDawn | EventName::Sunrise
        )
    }

    /// Sunset and dusk events.
    pub fn is_evening(self) -> bool {
        matches!(
            self,
            EventName::Sunset | EventName::CivilDusk | EventName::NauticalDusk | EventName::AstronomicalDusk
        )
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for EventName {
    type Err = CalculationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| CalculationError::UnknownEventName(s.to_string()))
    }
}

/// The period of the solar day an instant falls in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolarPeriod {
    Night,
    MorningAstronomicalTwilight,
    MorningNauticalTwilight,
    MorningCivilTwilight,
    Day,
    EveningCivilTwilight,
    EveningNauticalTwilight,
    EveningAstronomicalTwilight,
}

impl SolarPeriod {
    pub const ALL: [SolarPeriod; 8] = [
        SolarPeriod::Night,
        SolarPeriod::MorningAstronomicalTwilight,
        SolarPeriod::MorningNauticalTwilight,
        SolarPeriod::MorningCivilTwilight,
        SolarPeriod::Day,
        SolarPeriod::EveningCivilTwilight,
        SolarPeriod::EveningNauticalTwilight,
        SolarPeriod::EveningAstronomicalTwilight,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SolarPeriod::Night => "Night",
            SolarPeriod::MorningAstronomicalTwilight => "Morning Astronomical Twilight",
            SolarPeriod::MorningNauticalTwilight => "Morning Nautical Twilight",
            SolarPeriod::MorningCivilTwilight => "Morning Civil Twilight",
            SolarPeriod::Day => "Day",
            SolarPeriod::EveningCivilTwilight => "Evening Civil Twilight",
            SolarPeriod::EveningNauticalTwilight => "Evening Nautical Twilight",
            SolarPeriod::EveningAstronomicalTwilight => "Evening Astronomical Twilight",
        }
    }

    /// Period for a twilight band code (0 to 4) and the direction the Sun is moving.
    pub(crate) fn from_band(band: u8, rising: bool) -> Self {
        match (band, rising) {
            (0, _) => SolarPeriod::Night,
            (1, true) => SolarPeriod::MorningAstronomicalTwilight,
            (1, false) => SolarPeriod::EveningAstronomicalTwilight,
            (2, true) => SolarPeriod::MorningNauticalTwilight,
            (2, false) => SolarPeriod::EveningNauticalTwilight,
            (3, true) => SolarPeriod::MorningCivilTwilight,
            (3, false) => SolarPeriod::EveningCivilTwilight,
            _ => SolarPeriod::Day,
        }
    }
}

impl fmt::Display for SolarPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SolarPeriod {
    type Err = CalculationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SolarPeriod::ALL
            .into_iter()
            .find(|period| period.as_str() == s)
            .ok_or_else(|| CalculationError::UnknownPeriodName(s.to_string()))
    }
}

/// A named solar event at a time-zone-aware instant.
///
/// Events order by time, then by name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Event {
    pub time: DateTime<Tz>,
    pub name: EventName,
}

impl Event {
    pub fn new(time: DateTime<Tz>, name: EventName) -> Self {
        Self { time, name }
    }

    /// The same event with its time expressed in `time_zone`.
    pub fn in_time_zone(&self, time_zone: Tz) -> Self {
        Self {
            time: self.time.with_timezone(&time_zone),
            name: self.name,
        }
    }
}

/// Selects which events a query returns.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum NameFilter {
    #[default]
    All,
    One(EventName),
    Set(BTreeSet<EventName>),
}

impl NameFilter {
    /// Builds a filter from canonical event names.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::UnknownEventName`] for the first name that is not one of
    /// the ten canonical names.
    pub fn parse<I, S>(names: I) -> Result<Self, CalculationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|name| name.as_ref().parse::<EventName>())
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(NameFilter::Set(names))
    }

    pub fn matches(&self, name: EventName) -> bool {
        match self {
            NameFilter::All => true,
            NameFilter::One(only) => *only == name,
            NameFilter::Set(names) => names.contains(&name),
        }
    }

    /// Whether any transit name can pass the filter.
    pub(crate) fn wants_transits(&self) -> bool {
        [EventName::SolarNoon, EventName::SolarMidnight]
            .into_iter()
            .any(|name| self.matches(name))
    }

    /// Whether any twilight name can pass the filter.
    pub(crate) fn wants_twilight(&self) -> bool {
        EventName::ALL
            .into_iter()
            .filter(|name| !name.is_transit())
            .any(|name| self.matches(name))
    }
}

impl From<EventName> for NameFilter {
    fn from(name: EventName) -> Self {
        NameFilter::One(name)
    }
}

impl From<BTreeSet<EventName>> for NameFilter {
    fn from(names: BTreeSet<EventName>) -> Self {
        NameFilter::Set(names)
    }
}

impl<const N: usize> From<[EventName; N]> for NameFilter {
    fn from(names: [EventName; N]) -> Self {
        NameFilter::Set(names.into_iter().collect())
    }
}
