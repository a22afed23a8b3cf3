//! Apparent positions of the Sun and Moon for a sea-level observer.
//!
//! [`PositionProvider`] is the seam the event engine consumes; [`Ephemeris`] is the
//! built-in analytic implementation of it.

use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Utc};

use crate::geo::{
    aberration_correction, ecliptic_mean_obliquity, ecliptic_true_obliquity, geocentric_declination,
    geocentric_right_ascension, greenwich_apparent_sidereal_time, greenwich_mean_sidereal_time,
    nutation_longitude_and_obliquity, observer_hour_angle, topocentric_azimuth, topocentric_coordinates,
    topocentric_elevation_angle,
};
use crate::moon::lunar_ecliptic;
use crate::sun::{solar_ecliptic, AU_KM};
use crate::time::{days_since_j2000, get_delta_t, julian_century, SECONDS_PER_DAY};
use crate::types::Location;

/// A body the ephemeris can place.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Body {
    Sun,
    Moon,
}

/// Apparent topocentric position of a body.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Geometric altitude above the horizon in degrees (no refraction)
    pub altitude: f64,
    /// Azimuth in degrees, clockwise from north (0 = N, 90 = E)
    pub azimuth: f64,
    /// Observer-to-body distance in kilometres
    pub distance: f64,
}

/// Source of apparent positions and lunar illumination.
///
/// Implementations must be deterministic: the same inputs always produce the same output.
pub trait PositionProvider: Send + Sync {
    /// Position of `body` as seen from `observer` at `at`.
    fn apparent_position(&self, body: Body, observer: &Location, at: &DateTime<Utc>) -> Position;

    /// Positions for each instant in `times`, in input order.
    fn apparent_positions(&self, body: Body, observer: &Location, times: &[DateTime<Utc>]) -> Vec<Position> {
        times
            .iter()
            .map(|at| self.apparent_position(body, observer, at))
            .collect()
    }

    /// Fraction of the body's disc that is illuminated, in `[0, 1]`.
    fn illuminated_fraction(&self, body: Body, at: &DateTime<Utc>) -> f64;
}

/// Geocentric apparent ecliptic coordinates plus the quantities needed to reach the horizon frame.
#[derive(Copy, Clone, Debug)]
struct ApparentEcliptic {
    longitude: f64,
    latitude: f64,
    distance_km: f64,
    true_obliquity: f64,
    nutation_longitude: f64,
}

/// Built-in analytic ephemeris.
///
/// The Sun comes from a low-precision solar theory (about 0.01°) and the Moon from a
/// truncated lunar theory (about 0.3°). Both are corrected for nutation, the Sun for
/// aberration, and both for topocentric parallax.
#[derive(Clone, Debug, Default)]
pub struct Ephemeris {
    _private: (),
}

impl Ephemeris {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide ephemeris, built on first use and never torn down.
    pub fn shared() -> Arc<Ephemeris> {
        static SHARED: OnceLock<Arc<Ephemeris>> = OnceLock::new();
        SHARED
            .get_or_init(|| {
                log::debug!("initialising shared ephemeris");
                Arc::new(Ephemeris::new())
            })
            .clone()
    }

    fn apparent_ecliptic(&self, body: Body, julian_century_tt: f64) -> ApparentEcliptic {
        let (nutation_longitude, nutation_obliquity) = nutation_longitude_and_obliquity(julian_century_tt);
        let true_obliquity =
            ecliptic_true_obliquity(nutation_obliquity, ecliptic_mean_obliquity(julian_century_tt));

        let (longitude, latitude, distance_km) = match body {
            Body::Sun => {
                let sun = solar_ecliptic(julian_century_tt);
                (
                    sun.longitude + nutation_longitude + aberration_correction(sun.distance_au),
                    0.0,
                    sun.distance_au * AU_KM,
                )
            }
            Body::Moon => {
                let moon = lunar_ecliptic(julian_century_tt);
                (moon.longitude + nutation_longitude, moon.latitude, moon.distance_km)
            }
        };

        ApparentEcliptic {
            longitude,
            latitude,
            distance_km,
            true_obliquity,
            nutation_longitude,
        }
    }
}

/// Days since J2000 on the UT scale and Julian centuries on the TT scale.
fn time_arguments(at: &DateTime<Utc>) -> (f64, f64) {
    let days_ut = days_since_j2000(at);
    let days_tt = days_ut + get_delta_t(at) / SECONDS_PER_DAY;
    (days_ut, julian_century(days_tt))
}

impl PositionProvider for Ephemeris {
    fn apparent_position(&self, body: Body, observer: &Location, at: &DateTime<Utc>) -> Position {
        let (days_ut, julian_century_tt) = time_arguments(at);
        let ecliptic = self.apparent_ecliptic(body, julian_century_tt);

        let right_ascension =
            geocentric_right_ascension(ecliptic.longitude, ecliptic.true_obliquity, ecliptic.latitude);
        let declination = geocentric_declination(ecliptic.latitude, ecliptic.true_obliquity, ecliptic.longitude);

        let sidereal_time = greenwich_apparent_sidereal_time(
            greenwich_mean_sidereal_time(days_ut, julian_century(days_ut)),
            ecliptic.nutation_longitude,
            ecliptic.true_obliquity,
        );
        let hour_angle = observer_hour_angle(sidereal_time, observer.longitude(), right_ascension);

        let (hour_angle_prime, declination_prime, distance) =
            topocentric_coordinates(observer.latitude(), hour_angle, declination, ecliptic.distance_km);

        Position {
            altitude: topocentric_elevation_angle(observer.latitude(), declination_prime, hour_angle_prime),
            azimuth: topocentric_azimuth(hour_angle_prime, observer.latitude(), declination_prime),
            distance,
        }
    }

    fn illuminated_fraction(&self, body: Body, at: &DateTime<Utc>) -> f64 {
        if body == Body::Sun {
            return 1.0;
        }
        let (_, julian_century_tt) = time_arguments(at);
        let sun = self.apparent_ecliptic(Body::Sun, julian_century_tt);
        let moon = self.apparent_ecliptic(Body::Moon, julian_century_tt);

        // Geocentric elongation, then the Sun-Moon-Earth phase angle.
        let cos_elongation =
            moon.latitude.to_radians().cos() * (moon.longitude - sun.longitude).to_radians().cos();
        let elongation = cos_elongation.clamp(-1.0, 1.0).acos();
        let phase_angle = (sun.distance_km * elongation.sin()).atan2(moon.distance_km - sun.distance_km * elongation.cos());

        ((1.0 + phase_angle.cos()) / 2.0).clamp(0.0, 1.0)
    }
}
