use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone};
use chrono_tz::Tz;
use lru::LruCache;

use crate::cache::LocationKey;
use crate::config::CalculatorConfig;
use crate::ephemeris::{Ephemeris, Position, PositionProvider};
use crate::sun_moon::SunMoon;
use crate::types::{Event, EventName, Location, NameFilter, SolarPeriod};
use crate::CalculationError;

/// Entry point for solar and lunar queries at any number of locations.
///
/// Keeps one [`SunMoon`] context per (latitude, longitude) in a bounded LRU cache. The
/// time zone passed with a location is only used when its context is first created; a
/// later query for the same coordinates with a different zone reuses the existing
/// context unchanged.
///
/// # Example
///
/// ```
/// use chrono::TimeZone;
/// use chrono_tz::US::Eastern;
/// use sun_moon::{AstronomicalCalculator, Location, SolarPeriod};
///
/// let mut calculator = AstronomicalCalculator::new();
/// let ithaca = Location::new(42.431964, -76.501656).unwrap();
///
/// let morning = Eastern.with_ymd_and_hms(2020, 10, 1, 7, 9, 0).unwrap();
/// let period = calculator.get_solar_period_name(&ithaca, Eastern, &morning).unwrap();
/// assert_eq!(period, SolarPeriod::Day);
/// ```
pub struct AstronomicalCalculator {
    config: CalculatorConfig,
    event_capacity: NonZeroUsize,
    provider: Arc<dyn PositionProvider>,
    contexts: LruCache<LocationKey, SunMoon>,
}

impl fmt::Debug for AstronomicalCalculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AstronomicalCalculator")
            .field("config", &self.config)
            .field("locations", &self.contexts.len())
            .finish_non_exhaustive()
    }
}

impl Default for AstronomicalCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl AstronomicalCalculator {
    /// A calculator with default settings, backed by the shared [`Ephemeris`].
    pub fn new() -> Self {
        let config = CalculatorConfig::default();
        let location_capacity = NonZeroUsize::new(config.location_cache_size).unwrap_or(NonZeroUsize::MIN);
        let event_capacity = NonZeroUsize::new(config.event_cache_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            config,
            event_capacity,
            provider: Ephemeris::shared(),
            contexts: LruCache::new(location_capacity),
        }
    }

    /// A calculator with explicit settings, backed by the shared [`Ephemeris`].
    ///
    /// # Errors
    ///
    /// [`CalculationError::InvalidConfig`] if `config` fails validation.
    pub fn with_config(config: CalculatorConfig) -> Result<Self, CalculationError> {
        Self::with_provider(config, Ephemeris::shared())
    }

    /// A calculator with explicit settings and position provider.
    pub fn with_provider(
        config: CalculatorConfig,
        provider: Arc<dyn PositionProvider>,
    ) -> Result<Self, CalculationError> {
        config.validate()?;
        Ok(Self {
            event_capacity: config.event_capacity()?,
            contexts: LruCache::new(config.location_capacity()?),
            config,
            provider,
        })
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Number of location contexts currently cached.
    pub fn cached_locations(&self) -> usize {
        self.contexts.len()
    }

    /// The cached context for `location`, created on first use with `time_zone`.
    pub fn sun_moon(&mut self, location: &Location, time_zone: Tz) -> &mut SunMoon {
        let key = LocationKey::from(location);
        if self.contexts.contains(&key) {
            log::trace!("location cache hit for ({}, {})", location.latitude(), location.longitude());
        }
        let config = &self.config;
        let event_capacity = self.event_capacity;
        let provider = &self.provider;
        self.contexts.get_or_insert_mut(key, || {
            SunMoon::from_parts(*location, time_zone, config, event_capacity, Arc::clone(provider))
        })
    }

    pub fn get_solar_position<Z: TimeZone>(&mut self, location: &Location, time_zone: Tz, at: &DateTime<Z>) -> Position {
        self.sun_moon(location, time_zone).get_solar_position(at)
    }

    pub fn get_solar_positions<Z: TimeZone>(
        &mut self,
        location: &Location,
        time_zone: Tz,
        times: &[DateTime<Z>],
    ) -> Vec<Position> {
        self.sun_moon(location, time_zone).get_solar_positions(times)
    }

    pub fn get_lunar_position<Z: TimeZone>(&mut self, location: &Location, time_zone: Tz, at: &DateTime<Z>) -> Position {
        self.sun_moon(location, time_zone).get_lunar_position(at)
    }

    pub fn get_lunar_positions<Z: TimeZone>(
        &mut self,
        location: &Location,
        time_zone: Tz,
        times: &[DateTime<Z>],
    ) -> Vec<Position> {
        self.sun_moon(location, time_zone).get_lunar_positions(times)
    }

    pub fn get_lunar_illumination<Z: TimeZone>(&mut self, location: &Location, time_zone: Tz, at: &DateTime<Z>) -> f64 {
        self.sun_moon(location, time_zone).get_lunar_illumination(at)
    }

    pub fn get_lunar_illuminations<Z: TimeZone>(
        &mut self,
        location: &Location,
        time_zone: Tz,
        times: &[DateTime<Z>],
    ) -> Vec<f64> {
        self.sun_moon(location, time_zone).get_lunar_illuminations(times)
    }

    /// See [`SunMoon::get_solar_events_in_interval`].
    pub fn get_solar_events_in_interval<Z: TimeZone>(
        &mut self,
        location: &Location,
        time_zone: Tz,
        start: &DateTime<Z>,
        end: &DateTime<Z>,
        filter: &NameFilter,
    ) -> Result<Vec<Event>, CalculationError> {
        self.sun_moon(location, time_zone)
            .get_solar_events_in_interval(start, end, filter)
    }

    pub fn get_solar_date<Z: TimeZone>(
        &mut self,
        location: &Location,
        time_zone: Tz,
        at: &DateTime<Z>,
        day: bool,
    ) -> Result<NaiveDate, CalculationError> {
        self.sun_moon(location, time_zone).get_solar_date(at, day)
    }

    pub fn get_solar_dates<Z: TimeZone>(
        &mut self,
        location: &Location,
        time_zone: Tz,
        times: &[DateTime<Z>],
        day: bool,
    ) -> Result<Vec<NaiveDate>, CalculationError> {
        self.sun_moon(location, time_zone).get_solar_dates(times, day)
    }

    /// See [`SunMoon::get_solar_events`].
    pub fn get_solar_events(
        &mut self,
        location: &Location,
        time_zone: Tz,
        date: NaiveDate,
        filter: &NameFilter,
        day: bool,
    ) -> Result<Vec<Event>, CalculationError> {
        self.sun_moon(location, time_zone)
            .get_solar_events(date, filter, day)
    }

    pub fn get_solar_event_time(
        &mut self,
        location: &Location,
        time_zone: Tz,
        date: NaiveDate,
        name: EventName,
        day: bool,
    ) -> Result<Option<DateTime<Tz>>, CalculationError> {
        self.sun_moon(location, time_zone)
            .get_solar_event_time(date, name, day)
    }

    pub fn get_solar_period_name<Z: TimeZone>(
        &mut self,
        location: &Location,
        time_zone: Tz,
        at: &DateTime<Z>,
    ) -> Result<SolarPeriod, CalculationError> {
        self.sun_moon(location, time_zone).get_solar_period_name(at)
    }

    pub fn get_solar_period_names<Z: TimeZone>(
        &mut self,
        location: &Location,
        time_zone: Tz,
        times: &[DateTime<Z>],
    ) -> Result<Vec<SolarPeriod>, CalculationError> {
        self.sun_moon(location, time_zone)
            .get_solar_period_names(times)
    }
}
