//! Queries exactly at the poles.

use chrono::TimeZone;
use chrono_tz::Tz;

use super::october_first;
use crate::{AstronomicalCalculator, CalculationError, EventName, Location, NameFilter, SunMoon};

fn poles() -> [Location; 2] {
    [Location::new(90.0, 0.0).unwrap(), Location::new(-90.0, 0.0).unwrap()]
}

fn is_polar_error<T: std::fmt::Debug>(result: Result<T, CalculationError>) -> bool {
    matches!(result, Err(CalculationError::PolarLocation { .. }))
}

#[test]
fn event_date_and_period_queries_fail_at_the_poles() {
    let at = Tz::UTC.with_ymd_and_hms(2020, 10, 1, 12, 0, 0).unwrap();
    let later = Tz::UTC.with_ymd_and_hms(2020, 10, 2, 12, 0, 0).unwrap();

    for pole in poles() {
        let mut sun_moon = SunMoon::new(pole, Tz::UTC, false).unwrap();
        assert!(is_polar_error(sun_moon.get_solar_events(october_first(), &NameFilter::All, true)));
        assert!(is_polar_error(sun_moon.get_solar_event_time(
            october_first(),
            EventName::Sunrise,
            false
        )));
        assert!(is_polar_error(sun_moon.get_solar_events_in_interval(&at, &later, &NameFilter::All)));
        assert!(is_polar_error(sun_moon.get_solar_date(&at, true)));
        assert!(is_polar_error(sun_moon.get_solar_dates(&[at], false)));
        assert!(is_polar_error(sun_moon.get_solar_period_name(&at)));
        assert!(is_polar_error(sun_moon.get_solar_period_names(&[at])));
    }
}

#[test]
fn polar_error_names_the_operation() {
    let mut calculator = AstronomicalCalculator::new();
    let result = calculator.get_solar_events(&poles()[0], Tz::UTC, october_first(), &NameFilter::All, true);
    assert_eq!(
        result,
        Err(CalculationError::PolarLocation {
            operation: "get_solar_events"
        })
    );
    assert_eq!(
        result.unwrap_err().to_string(),
        "get_solar_events is undefined at the poles"
    );
}

#[test]
fn positions_and_illumination_work_at_the_poles() {
    let at = Tz::UTC.with_ymd_and_hms(2020, 6, 21, 12, 0, 0).unwrap();
    for (pole, sign) in poles().into_iter().zip([1.0, -1.0]) {
        let mut sun_moon = SunMoon::new(pole, Tz::UTC, false).unwrap();
        let sun = sun_moon.get_solar_position(&at);
        // At a pole the solar altitude is the declination, seen from the right hemisphere.
        assert!((sign * sun.altitude - 23.4).abs() < 0.5, "altitude {}", sun.altitude);

        let moon = sun_moon.get_lunar_position(&at);
        assert!(moon.altitude.abs() <= 90.0);
        assert_eq!(sun_moon.get_lunar_positions(&[at]), vec![moon]);

        let illumination = sun_moon.get_lunar_illumination(&at);
        assert!((0.0..=1.0).contains(&illumination));
    }
}

#[test]
fn near_polar_locations_are_not_rejected() {
    let location = Location::new(89.9, 0.0).unwrap();
    let sun_moon = SunMoon::new(location, Tz::UTC, false).unwrap();
    let at = Tz::UTC.with_ymd_and_hms(2020, 6, 21, 12, 0, 0).unwrap();
    assert!(sun_moon.get_solar_period_name(&at).is_ok());
}
