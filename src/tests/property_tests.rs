//! Property tests over random locations and dates.
//!
//! Each location is paired with the fixed-offset zone nearest its mean solar time, so
//! civil midnight stays within half an hour of solar midnight. Latitudes poleward of
//! 60° get their own block, where twilight bands may be skipped for months.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use chrono_tz::Tz;
use proptest::prelude::*;

use super::zone_for_longitude;
use crate::{EventName, Location, NameFilter, SolarPeriod, SunMoon};

prop_compose! {
    fn arb_location()(latitude in -60.0f64..60.0, longitude in -180.0f64..180.0) -> Location {
        Location::new(latitude, longitude).unwrap()
    }
}

prop_compose! {
    fn arb_high_latitude_location()(
        magnitude in 60.0f64..89.999,
        north in any::<bool>(),
        longitude in -180.0f64..180.0,
    ) -> Location {
        let latitude = if north { magnitude } else { -magnitude };
        Location::new(latitude, longitude).unwrap()
    }
}

prop_compose! {
    fn arb_date()(year in 1950i32..2050, month in 1u32..=12, day in 1u32..=28) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }
}

fn context(location: Location) -> SunMoon {
    SunMoon::new(location, zone_for_longitude(location.longitude()), false).unwrap()
}

fn utc(time: &DateTime<Tz>) -> DateTime<Utc> {
    time.with_timezone(&Utc)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn events_are_ordered_and_bracketed_by_two_transits(
        location in arb_location(),
        date in arb_date(),
        day in any::<bool>(),
    ) {
        let mut sun_moon = context(location);
        let events = sun_moon.get_solar_events(date, &NameFilter::All, day).unwrap();

        for pair in events.windows(2) {
            prop_assert!(
                pair[0].time < pair[1].time,
                "events out of order at ({}, {}) on {date}: {:?}",
                location.latitude(), location.longitude(), pair
            );
        }

        let transits: Vec<EventName> = events
            .iter()
            .filter(|event| event.name.is_transit())
            .map(|event| event.name)
            .collect();
        let expected = if day {
            vec![EventName::SolarMidnight, EventName::SolarNoon]
        } else {
            vec![EventName::SolarNoon, EventName::SolarMidnight]
        };
        prop_assert_eq!(transits, expected);
        prop_assert_eq!(events.first().map(|event| event.name.is_transit()), Some(true));

        let names: BTreeSet<EventName> = events.iter().map(|event| event.name).collect();
        prop_assert_eq!(names.len(), events.len(), "a name appears twice: {:?}", events);
    }

    #[test]
    fn instants_between_events_belong_to_their_solar_day(
        location in arb_location(),
        date in arb_date(),
        day in any::<bool>(),
    ) {
        let mut sun_moon = context(location);
        let events = sun_moon.get_solar_events(date, &NameFilter::All, day).unwrap();

        for pair in events.windows(2) {
            let middle = utc(&pair[0].time) + (utc(&pair[1].time) - utc(&pair[0].time)) / 2;
            prop_assert_eq!(sun_moon.get_solar_date(&middle, day).unwrap(), date);
        }
    }

    #[test]
    fn every_instant_has_a_period(
        location in arb_location(),
        date in arb_date(),
        minutes in 0i64..1440,
    ) {
        let sun_moon = context(location);
        let midnight = date.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let at = midnight + TimeDelta::minutes(minutes);

        let period = sun_moon.get_solar_period_name(&at).unwrap();
        prop_assert!(SolarPeriod::ALL.contains(&period));

        let altitude = sun_moon.get_solar_positions(&[at])[0].altitude;
        if altitude >= -0.8333 {
            prop_assert_eq!(period, SolarPeriod::Day);
        } else if altitude < -18.0 {
            prop_assert_eq!(period, SolarPeriod::Night);
        }
    }

    #[test]
    fn vector_queries_match_scalar_queries(
        location in arb_location(),
        date in arb_date(),
        offsets in prop::collection::vec(0i64..86_400, 1..6),
    ) {
        let mut sun_moon = context(location);
        let start = date.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let times: Vec<DateTime<Utc>> = offsets
            .iter()
            .map(|seconds| start + TimeDelta::seconds(*seconds))
            .collect();

        let solar = sun_moon.get_solar_positions(&times);
        let lunar = sun_moon.get_lunar_positions(&times);
        let illuminations = sun_moon.get_lunar_illuminations(&times);
        let periods = sun_moon.get_solar_period_names(&times).unwrap();
        let dates = sun_moon.get_solar_dates(&times, true).unwrap();

        prop_assert_eq!(solar.len(), times.len());
        for (i, at) in times.iter().enumerate() {
            prop_assert_eq!(solar[i], sun_moon.get_solar_position(at));
            prop_assert_eq!(lunar[i], sun_moon.get_lunar_position(at));
            prop_assert_eq!(illuminations[i], sun_moon.get_lunar_illumination(at));
            prop_assert_eq!(periods[i], sun_moon.get_solar_period_name(at).unwrap());
            prop_assert_eq!(dates[i], sun_moon.get_solar_date(at, true).unwrap());
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn filtered_events_are_a_subset_of_all_events(
        location in arb_location(),
        date in arb_date(),
        mask in 0u16..1024,
    ) {
        let mut sun_moon = context(location);
        let all = sun_moon.get_solar_events(date, &NameFilter::All, true).unwrap();

        let wanted: BTreeSet<EventName> = EventName::ALL
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, name)| *name)
            .collect();
        let filter = NameFilter::from(wanted.clone());
        let filtered = sun_moon.get_solar_events(date, &filter, true).unwrap();

        let expected: Vec<_> = all.into_iter().filter(|event| wanted.contains(&event.name)).collect();
        prop_assert_eq!(filtered, expected);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn high_latitude_days_and_nights_are_well_formed(
        location in arb_high_latitude_location(),
        year in 2000i32..2040,
        ordinal in 1u32..=365,
        day in any::<bool>(),
    ) {
        let date = NaiveDate::from_yo_opt(year, ordinal).unwrap();
        let mut sun_moon = context(location);
        let events = sun_moon.get_solar_events(date, &NameFilter::All, day).unwrap();

        for pair in events.windows(2) {
            prop_assert!(
                pair[0].time < pair[1].time,
                "events out of order at ({}, {}) on {date}: {:?}",
                location.latitude(), location.longitude(), pair
            );
        }

        let names: BTreeSet<EventName> = events.iter().map(|event| event.name).collect();
        prop_assert_eq!(names.len(), events.len(), "a name appears twice: {:?}", events);

        let transits: Vec<EventName> = events
            .iter()
            .filter(|event| event.name.is_transit())
            .map(|event| event.name)
            .collect();
        let expected = if day {
            vec![EventName::SolarMidnight, EventName::SolarNoon]
        } else {
            vec![EventName::SolarNoon, EventName::SolarMidnight]
        };
        prop_assert_eq!(transits, expected);

        let midnight = date.and_hms_opt(0, 0, 0).unwrap().and_utc();
        for hour in (0..24).step_by(3) {
            let at = midnight + TimeDelta::hours(hour);
            let period = sun_moon.get_solar_period_name(&at);
            prop_assert!(
                period.is_ok(),
                "no period at ({}, {}) at {at}: {:?}",
                location.latitude(), location.longitude(), period
            );
        }
        for event in &events {
            prop_assert!(sun_moon.get_solar_period_name(&utc(&event.time)).is_ok());
        }
    }
}
