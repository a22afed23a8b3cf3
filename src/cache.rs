//! Bounded least-recently-used caches owned by each location context.

use std::collections::HashMap;
use std::num::NonZeroUsize;

use chrono::{DateTime, NaiveDate, Utc};
use lru::LruCache;

use crate::ephemeris::{Body, Position};
use crate::types::{Event, EventName, Location};

/// A solar day (`day == true`) or solar night of a calendar date.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct DayKey {
    pub date: NaiveDate,
    pub day: bool,
}

impl DayKey {
    pub fn new(date: NaiveDate, day: bool) -> Self {
        Self { date, day }
    }
}

/// Bit-exact latitude/longitude key for the location cache.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct LocationKey {
    latitude_bits: u64,
    longitude_bits: u64,
}

impl From<&Location> for LocationKey {
    fn from(location: &Location) -> Self {
        Self {
            latitude_bits: location.latitude().to_bits(),
            longitude_bits: location.longitude().to_bits(),
        }
    }
}

/// The four caches of a location context.
///
/// Every cached value is a pure function of its key, so an eviction only costs a
/// recomputation. Event times are stored in UTC and localised on the way out.
pub(crate) struct EventCache {
    positions: LruCache<(Body, DateTime<Utc>), Position>,
    transits: LruCache<DayKey, Vec<Event>>,
    events: LruCache<DayKey, Vec<Event>>,
    event_times: LruCache<DayKey, HashMap<EventName, DateTime<Utc>>>,
}

impl EventCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            positions: LruCache::new(capacity),
            transits: LruCache::new(capacity),
            events: LruCache::new(capacity),
            event_times: LruCache::new(capacity),
        }
    }

    pub fn position(&mut self, body: Body, at: &DateTime<Utc>) -> Option<Position> {
        self.positions.get(&(body, *at)).copied()
    }

    pub fn put_position(&mut self, body: Body, at: DateTime<Utc>, position: Position) {
        self.positions.put((body, at), position);
    }

    pub fn transits(&mut self, key: &DayKey) -> Option<&Vec<Event>> {
        self.transits.get(key)
    }

    pub fn put_transits(&mut self, key: DayKey, transits: Vec<Event>) {
        self.transits.put(key, transits);
    }

    pub fn events(&mut self, key: &DayKey) -> Option<&Vec<Event>> {
        self.events.get(key)
    }

    pub fn put_events(&mut self, key: DayKey, events: Vec<Event>) {
        self.events.put(key, events);
    }

    pub fn event_times(&mut self, key: &DayKey) -> Option<&HashMap<EventName, DateTime<Utc>>> {
        self.event_times.get(key)
    }

    pub fn put_event_times(&mut self, key: DayKey, times: HashMap<EventName, DateTime<Utc>>) {
        self.event_times.put(key, times);
    }

    /// Entries currently held, as (positions, transits, events, event times).
    #[cfg(test)]
    pub fn lens(&self) -> (usize, usize, usize, usize) {
        (
            self.positions.len(),
            self.transits.len(),
            self.events.len(),
            self.event_times.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chrono::TimeZone;

    fn position(altitude: f64) -> Position {
        Position {
            altitude,
            azimuth: 0.0,
            distance: 1.0,
        }
    }

    #[test]
    fn evicts_least_recently_used_positions() {
        let mut cache = EventCache::new(NonZeroUsize::new(2).unwrap());
        let t0 = Utc.with_ymd_and_hms(2020, 10, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2020, 10, 1, 1, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2020, 10, 1, 2, 0, 0).unwrap();

        cache.put_position(Body::Sun, t0, position(0.0));
        cache.put_position(Body::Sun, t1, position(1.0));
        // Touch t0 so t1 becomes the eviction candidate.
        assert!(cache.position(Body::Sun, &t0).is_some());
        cache.put_position(Body::Sun, t2, position(2.0));

        assert!(cache.position(Body::Sun, &t1).is_none());
        assert_eq!(cache.position(Body::Sun, &t0), Some(position(0.0)));
        assert_eq!(cache.position(Body::Sun, &t2), Some(position(2.0)));
        assert!(cache.position(Body::Moon, &t2).is_none());
    }

    #[test]
    fn day_and_night_keys_are_distinct() {
        let mut cache = EventCache::new(NonZeroUsize::new(4).unwrap());
        let date = NaiveDate::from_ymd_opt(2020, 10, 1).unwrap();
        cache.put_events(DayKey::new(date, true), Vec::new());
        assert!(cache.events(&DayKey::new(date, true)).is_some());
        assert!(cache.events(&DayKey::new(date, false)).is_none());
        assert_eq!(cache.lens(), (0, 0, 1, 0));
    }

    #[test]
    fn location_keys_compare_bits() {
        let a = Location::new(42.431964, -76.501656).unwrap();
        let b = Location::new(42.431964, -76.501656).unwrap();
        let c = Location::new(42.431965, -76.501656).unwrap();
        assert_eq!(LocationKey::from(&a), LocationKey::from(&b));
        assert_ne!(LocationKey::from(&a), LocationKey::from(&c));
    }
}
