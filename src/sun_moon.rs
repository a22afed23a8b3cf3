use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use crate::cache::{DayKey, EventCache};
use crate::config::CalculatorConfig;
use crate::ephemeris::{Body, Ephemeris, Position, PositionProvider};
use crate::naming::{name_transit, name_twilight_transitions};
use crate::period::classify_period;
use crate::search::{find_discrete, transit_parity, twilight_band};
use crate::time::civil_midnight;
use crate::types::{Event, EventName, Location, NameFilter, SolarPeriod};
use crate::CalculationError;

// ============================================================================
// Search window constants
// ============================================================================

/// Offset from civil midnight to the start of the transit window of a solar day.
const DAY_WINDOW_OFFSET_HOURS: i64 = -4;

/// Offset from civil midnight to the start of the transit window of a solar night.
const NIGHT_WINDOW_OFFSET_HOURS: i64 = 8;

/// Length of the transit window; always spans exactly three transits.
const TRANSIT_WINDOW_HOURS: i64 = 32;

/// Padding around twilight searches, and the distance from the middle transit beyond
/// which a morning or evening event belongs to a neighbouring day.
const PADDING_HOURS: i64 = 1;

/// Solar computations for one location.
///
/// Owns its caches, so every query takes `&mut self`. Position and illumination queries
/// work everywhere; date, event and period queries fail with
/// [`CalculationError::PolarLocation`] exactly at the poles.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use sun_moon::{EventName, Location, NameFilter, SunMoon};
///
/// let ithaca = Location::new(42.431964, -76.501656).unwrap();
/// let mut sun_moon = SunMoon::new(ithaca, chrono_tz::US::Eastern, true).unwrap();
///
/// let date = NaiveDate::from_ymd_opt(2020, 10, 1).unwrap();
/// let events = sun_moon.get_solar_events(date, &NameFilter::All, true).unwrap();
/// assert_eq!(events.first().map(|event| event.name), Some(EventName::SolarMidnight));
/// ```
pub struct SunMoon {
    location: Location,
    time_zone: Tz,
    result_times_local: bool,
    twilight_search_step: TimeDelta,
    transit_search_step: TimeDelta,
    provider: Arc<dyn PositionProvider>,
    cache: EventCache,
}

impl fmt::Debug for SunMoon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SunMoon")
            .field("location", &self.location)
            .field("time_zone", &self.time_zone)
            .field("result_times_local", &self.result_times_local)
            .finish_non_exhaustive()
    }
}

impl SunMoon {
    /// Creates a context with default settings and the shared [`Ephemeris`].
    ///
    /// # Arguments
    ///
    /// * `location` - Observer position (sea level)
    /// * `time_zone` - Zone whose civil midnight anchors transit searches
    /// * `result_times_local` - Return event times in `time_zone` instead of UTC
    pub fn new(location: Location, time_zone: Tz, result_times_local: bool) -> Result<Self, CalculationError> {
        let config = CalculatorConfig::default().with_result_times_local(result_times_local);
        Self::with_config(location, time_zone, &config, Ephemeris::shared())
    }

    /// Creates a context with explicit settings and position provider.
    ///
    /// # Errors
    ///
    /// [`CalculationError::InvalidConfig`] if `config` fails validation.
    pub fn with_config(
        location: Location,
        time_zone: Tz,
        config: &CalculatorConfig,
        provider: Arc<dyn PositionProvider>,
    ) -> Result<Self, CalculationError> {
        config.validate()?;
        Ok(Self::from_parts(location, time_zone, config, config.event_capacity()?, provider))
    }

    pub(crate) fn from_parts(
        location: Location,
        time_zone: Tz,
        config: &CalculatorConfig,
        event_capacity: NonZeroUsize,
        provider: Arc<dyn PositionProvider>,
    ) -> Self {
        log::debug!(
            "new solar context at ({}, {}) in {}",
            location.latitude(),
            location.longitude(),
            time_zone.name()
        );
        Self {
            location,
            time_zone,
            result_times_local: config.result_times_local,
            twilight_search_step: config.twilight_search_step,
            transit_search_step: config.transit_search_step,
            provider,
            cache: EventCache::new(event_capacity),
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    pub fn result_times_local(&self) -> bool {
        self.result_times_local
    }

    // ========================================================================
    // Positions and illumination
    // ========================================================================

    /// Apparent position of the Sun at `at`. Scalar lookups are cached.
    pub fn get_solar_position<Z: TimeZone>(&mut self, at: &DateTime<Z>) -> Position {
        self.position(Body::Sun, at.with_timezone(&Utc))
    }

    /// Apparent positions of the Sun for each instant, in order. Never cached.
    pub fn get_solar_positions<Z: TimeZone>(&self, times: &[DateTime<Z>]) -> Vec<Position> {
        self.provider
            .apparent_positions(Body::Sun, &self.location, &to_utc(times))
    }

    /// Apparent position of the Moon at `at`. Scalar lookups are cached.
    pub fn get_lunar_position<Z: TimeZone>(&mut self, at: &DateTime<Z>) -> Position {
        self.position(Body::Moon, at.with_timezone(&Utc))
    }

    /// Apparent positions of the Moon for each instant, in order. Never cached.
    pub fn get_lunar_positions<Z: TimeZone>(&self, times: &[DateTime<Z>]) -> Vec<Position> {
        self.provider
            .apparent_positions(Body::Moon, &self.location, &to_utc(times))
    }

    /// Illuminated fraction of the Moon's disc at `at`, in `[0, 1]`.
    pub fn get_lunar_illumination<Z: TimeZone>(&self, at: &DateTime<Z>) -> f64 {
        self.provider
            .illuminated_fraction(Body::Moon, &at.with_timezone(&Utc))
    }

    pub fn get_lunar_illuminations<Z: TimeZone>(&self, times: &[DateTime<Z>]) -> Vec<f64> {
        times
            .iter()
            .map(|at| self.get_lunar_illumination(at))
            .collect()
    }

    fn position(&mut self, body: Body, at: DateTime<Utc>) -> Position {
        if let Some(position) = self.cache.position(body, &at) {
            log::trace!("position cache hit for {body:?} at {at}");
            return position;
        }
        let position = self.provider.apparent_position(body, &self.location, &at);
        self.cache.put_position(body, at, position);
        position
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Events in `[start, end)`, in time order.
    ///
    /// The search runs over the interval padded by an hour on each side so that changes
    /// near the edges are bracketed, then trims to the requested interval. A filter that
    /// only admits transit names skips the twilight search, and the other way round.
    ///
    /// # Errors
    ///
    /// [`CalculationError::InvalidInterval`] unless `start < end`;
    /// [`CalculationError::PolarLocation`] at the poles.
    pub fn get_solar_events_in_interval<Z: TimeZone>(
        &mut self,
        start: &DateTime<Z>,
        end: &DateTime<Z>,
        filter: &NameFilter,
    ) -> Result<Vec<Event>, CalculationError> {
        self.ensure_not_polar("get_solar_events_in_interval")?;
        let start = start.with_timezone(&Utc);
        let end = end.with_timezone(&Utc);
        if start >= end {
            return Err(CalculationError::InvalidInterval);
        }

        let padding = TimeDelta::hours(PADDING_HOURS);
        let search_start = start - padding;
        let search_end = end + padding;
        log::debug!("searching events between {start} and {end}");

        let mut events = Vec::new();
        if filter.wants_twilight() {
            events.extend(self.find_twilight_events(&search_start, &search_end)?);
        }
        if filter.wants_transits() {
            events.extend(self.find_transit_events(&search_start, &search_end)?);
        }
        events.retain(|event| {
            let time = event.time.with_timezone(&Utc);
            start <= time && time < end && filter.matches(event.name)
        });
        events.sort();
        Ok(self.present(events))
    }

    /// Events of the solar day (`day == true`) or solar night of `date`, in time order.
    ///
    /// A solar day runs from the solar midnight near the start of `date` to the next one
    /// and contains its opening midnight and its noon; a solar night runs from noon to
    /// noon and contains its opening noon and its midnight.
    ///
    /// # Errors
    ///
    /// [`CalculationError::PolarLocation`] at the poles, or an internal consistency
    /// error if the transit search misbehaves.
    pub fn get_solar_events(
        &mut self,
        date: NaiveDate,
        filter: &NameFilter,
        day: bool,
    ) -> Result<Vec<Event>, CalculationError> {
        self.ensure_not_polar("get_solar_events")?;
        let events = self.day_events(DayKey::new(date, day))?;
        let selected = events
            .into_iter()
            .filter(|event| filter.matches(event.name))
            .collect();
        Ok(self.present(selected))
    }

    /// Time of the event called `name` in the solar day or night of `date`, if it occurs.
    pub fn get_solar_event_time(
        &mut self,
        date: NaiveDate,
        name: EventName,
        day: bool,
    ) -> Result<Option<DateTime<Tz>>, CalculationError> {
        self.ensure_not_polar("get_solar_event_time")?;
        let key = DayKey::new(date, day);
        if self.cache.event_times(&key).is_none() {
            let times = self
                .day_events(key)?
                .into_iter()
                .map(|event| (event.name, event.time.with_timezone(&Utc)))
                .collect::<HashMap<_, _>>();
            self.cache.put_event_times(key, times);
        }
        let time = self
            .cache
            .event_times(&key)
            .and_then(|times| times.get(&name).copied());
        Ok(time.map(|time| self.present_time(time)))
    }

    // ========================================================================
    // Solar dates and periods
    // ========================================================================

    /// The solar day (or night) containing `at`, named by its calendar date.
    ///
    /// The calendar date of `at` in the location's time zone is the first guess; the
    /// three transits of that date decide whether `at` belongs to it or to a neighbour.
    pub fn get_solar_date<Z: TimeZone>(&mut self, at: &DateTime<Z>, day: bool) -> Result<NaiveDate, CalculationError> {
        self.ensure_not_polar("get_solar_date")?;
        self.resolve_solar_date(at.with_timezone(&Utc), day)
    }

    pub fn get_solar_dates<Z: TimeZone>(
        &mut self,
        times: &[DateTime<Z>],
        day: bool,
    ) -> Result<Vec<NaiveDate>, CalculationError> {
        self.ensure_not_polar("get_solar_dates")?;
        times
            .iter()
            .map(|at| self.resolve_solar_date(at.with_timezone(&Utc), day))
            .collect()
    }

    /// The [`SolarPeriod`] at `at`.
    pub fn get_solar_period_name<Z: TimeZone>(&self, at: &DateTime<Z>) -> Result<SolarPeriod, CalculationError> {
        self.ensure_not_polar("get_solar_period_name")?;
        Ok(classify_period(&at.with_timezone(&Utc), |t| self.solar_altitude(t)))
    }

    pub fn get_solar_period_names<Z: TimeZone>(
        &self,
        times: &[DateTime<Z>],
    ) -> Result<Vec<SolarPeriod>, CalculationError> {
        self.ensure_not_polar("get_solar_period_names")?;
        Ok(times
            .iter()
            .map(|at| classify_period(&at.with_timezone(&Utc), |t| self.solar_altitude(t)))
            .collect())
    }

    fn resolve_solar_date(&mut self, at: DateTime<Utc>, day: bool) -> Result<NaiveDate, CalculationError> {
        let date = at.with_timezone(&self.time_zone).date_naive();
        let transits = self.transit_events(DayKey::new(date, day))?;
        let (first, last) = match transits.as_slice() {
            [first, _, last] => (first.time.with_timezone(&Utc), last.time.with_timezone(&Utc)),
            other => return Err(CalculationError::TransitCount { found: other.len() }),
        };
        let resolved = if at < first {
            date.pred_opt()
        } else if at >= last {
            date.succ_opt()
        } else {
            Some(date)
        };
        resolved.ok_or(CalculationError::TimeConversionError)
    }

    // ========================================================================
    // Searches
    // ========================================================================

    /// The three transits around the solar day or night of `key`.
    fn transit_events(&mut self, key: DayKey) -> Result<Vec<Event>, CalculationError> {
        if let Some(transits) = self.cache.transits(&key) {
            log::trace!("transit cache hit for {key:?}");
            return Ok(transits.clone());
        }

        let midnight = civil_midnight(&self.time_zone, key.date)?;
        let offset = if key.day {
            DAY_WINDOW_OFFSET_HOURS
        } else {
            NIGHT_WINDOW_OFFSET_HOURS
        };
        let start = midnight + TimeDelta::hours(offset);
        let end = start + TimeDelta::hours(TRANSIT_WINDOW_HOURS);
        log::debug!("searching transits for {key:?} between {start} and {end}");

        let transits = self.find_transit_events(&start, &end)?;
        if transits.len() != 3 {
            log::warn!("expected 3 transits for {key:?}, found {}", transits.len());
            return Err(CalculationError::TransitCount { found: transits.len() });
        }
        self.cache.put_transits(key, transits.clone());
        Ok(transits)
    }

    /// Twilight events and the two opening transits of the solar day or night of `key`.
    fn day_events(&mut self, key: DayKey) -> Result<Vec<Event>, CalculationError> {
        if let Some(events) = self.cache.events(&key) {
            log::trace!("event cache hit for {key:?}");
            return Ok(events.clone());
        }

        let transits = self.transit_events(key)?;
        let (first, middle, last) = match transits.as_slice() {
            [first, middle, last] => (
                first.time.with_timezone(&Utc),
                middle.time.with_timezone(&Utc),
                last.time.with_timezone(&Utc),
            ),
            other => return Err(CalculationError::TransitCount { found: other.len() }),
        };

        let padding = TimeDelta::hours(PADDING_HOURS);
        log::debug!("searching twilight for {key:?}");
        let mut events: Vec<Event> = self
            .find_twilight_events(&(first - padding), &(last + padding))?
            .into_iter()
            .filter(|event| !belongs_to_neighbour(event, middle, key.day))
            .collect();
        events.extend(transits.into_iter().take(2));
        events.sort();

        self.cache.put_events(key, events.clone());
        Ok(events)
    }

    fn find_transit_events(&self, start: &DateTime<Utc>, end: &DateTime<Utc>) -> Result<Vec<Event>, CalculationError> {
        let transitions = find_discrete(start, end, self.transit_search_step, |t| {
            transit_parity(
                self.provider
                    .apparent_position(Body::Sun, &self.location, t)
                    .azimuth,
            )
        })?;
        Ok(transitions
            .into_iter()
            .map(|transition| Event::new(transition.time.with_timezone(&Tz::UTC), name_transit(transition.code)))
            .collect())
    }

    fn find_twilight_events(&self, start: &DateTime<Utc>, end: &DateTime<Utc>) -> Result<Vec<Event>, CalculationError> {
        let transitions = find_discrete(start, end, self.twilight_search_step, |t| {
            twilight_band(self.solar_altitude(t))
        })?;
        let names = name_twilight_transitions(&transitions, |transition| self.solar_altitude(&transition.time))?;
        Ok(transitions
            .iter()
            .zip(names)
            .map(|(transition, name)| Event::new(transition.time.with_timezone(&Tz::UTC), name))
            .collect())
    }

    fn solar_altitude(&self, at: &DateTime<Utc>) -> f64 {
        self.provider
            .apparent_position(Body::Sun, &self.location, at)
            .altitude
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn ensure_not_polar(&self, operation: &'static str) -> Result<(), CalculationError> {
        if self.location.is_polar() {
            return Err(CalculationError::PolarLocation { operation });
        }
        Ok(())
    }

    fn present(&self, events: Vec<Event>) -> Vec<Event> {
        if self.result_times_local {
            events
                .iter()
                .map(|event| event.in_time_zone(self.time_zone))
                .collect()
        } else {
            events
        }
    }

    fn present_time(&self, time: DateTime<Utc>) -> DateTime<Tz> {
        if self.result_times_local {
            time.with_timezone(&self.time_zone)
        } else {
            time.with_timezone(&Tz::UTC)
        }
    }

    #[cfg(test)]
    pub(crate) fn cache_lens(&self) -> (usize, usize, usize, usize) {
        self.cache.lens()
    }
}

/// Whether a twilight event found in the padded window belongs to the previous or next
/// solar day or night rather than the one centred on `middle`.
///
/// In a solar day morning events precede noon and evening events follow it; in a solar
/// night evening events precede midnight and morning events follow it.
fn belongs_to_neighbour(event: &Event, middle: DateTime<Utc>, day: bool) -> bool {
    let time = event.time.with_timezone(&Utc);
    let padding = TimeDelta::hours(PADDING_HOURS);
    let (leading, trailing) = if day {
        (event.name.is_morning(), event.name.is_evening())
    } else {
        (event.name.is_evening(), event.name.is_morning())
    };
    (leading && time >= middle + padding) || (trailing && time <= middle - padding)
}

fn to_utc<Z: TimeZone>(times: &[DateTime<Z>]) -> Vec<DateTime<Utc>> {
    times.iter().map(|at| at.with_timezone(&Utc)).collect()
}
