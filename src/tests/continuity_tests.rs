//! Continuity tests for event times.
//!
//! These tests verify that event times drift smoothly from one solar day to the next
//! and don't exhibit sudden jumps from a misplaced search window or a misnamed
//! transition.

use chrono::{DateTime, Days, NaiveDate, TimeDelta};
use chrono_tz::Tz;
use proptest::prelude::*;

use super::zone_for_longitude;
use crate::{EventName, Location, SunMoon};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn event_times_change_smoothly_over_consecutive_days(
        latitude in -55.0f64..=55.0,
        longitude in -180.0f64..=180.0,
        day_number in 0i64..36_500,
    ) {
        let location = Location::new(latitude, longitude).unwrap();
        let mut sun_moon = SunMoon::new(location, zone_for_longitude(longitude), false).unwrap();
        let start = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap() + TimeDelta::days(day_number);

        let mut prev_noon: Option<DateTime<Tz>> = None;
        let mut prev_sunrise: Option<DateTime<Tz>> = None;

        for day_offset in 0..5 {
            let date = start.checked_add_days(Days::new(day_offset)).unwrap();
            let noon = sun_moon.get_solar_event_time(date, EventName::SolarNoon, true).unwrap();
            let sunrise = sun_moon.get_solar_event_time(date, EventName::Sunrise, true).unwrap();

            // Below 55° the Sun rises and sets every day.
            prop_assert!(noon.is_some(), "no solar noon on {date}");
            prop_assert!(sunrise.is_some(), "no sunrise on {date}");
            let (noon, sunrise) = (noon.unwrap(), sunrise.unwrap());

            if let Some(prev) = prev_noon {
                let drift = (noon - prev - TimeDelta::days(1)).abs();
                prop_assert!(
                    drift < TimeDelta::seconds(60),
                    "Solar noon moved {}s between {} and {}",
                    drift.num_seconds(), prev, noon
                );
            }
            if let Some(prev) = prev_sunrise {
                let drift = (sunrise - prev - TimeDelta::days(1)).abs();
                prop_assert!(
                    drift < TimeDelta::minutes(10),
                    "Sunrise moved {}s between {} and {}",
                    drift.num_seconds(), prev, sunrise
                );
            }

            prev_noon = Some(noon);
            prev_sunrise = Some(sunrise);
        }
    }
}
