//! Coordinate transformations shared by the solar and lunar theories.
//!
//! Everything here works in degrees. Angles are converted to radians only
//! inside the trigonometry.

use crate::math::{normalize_degrees_360, polynomial};

// ============================================================================
// Constants
// ============================================================================

/// Earth's equatorial radius in kilometers
pub(crate) const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6_378.14;

/// Earth's flattening factor (ratio of polar to equatorial radius)
const EARTH_FLATTENING_FACTOR: f64 = 0.99664719;

/// Constant for aberration correction calculation (in arcseconds)
const ABERRATION_CONSTANT: f64 = 20.4898;

/// Conversion factor from arcseconds to degrees
const ARCSECONDS_TO_DEGREES: f64 = 1.0 / 3600.0;

/// Mean rate of increase of Greenwich sidereal time (degrees per day)
const SIDEREAL_TIME_RATE: f64 = 360.98564736629;

/// Base Greenwich mean sidereal time at J2000.0 epoch (degrees)
const GREENWICH_MEAN_SIDEREAL_TIME_BASE: f64 = 280.46061837;

// ============================================================================
// Fundamental Arguments
// ============================================================================

/// Mean elongation of the Moon from the Sun, in degrees.
pub(crate) fn mean_elongation_moon_sun(julian_century: f64) -> f64 {
    normalize_degrees_360(polynomial(
        &[297.850_192_1, 445_267.111_403_4, -0.001_881_9, 1.0 / 545_868.0, -1.0 / 113_065_000.0],
        julian_century,
    ))
}

/// Mean anomaly of the Sun, in degrees.
pub(crate) fn mean_anomaly_sun(julian_century: f64) -> f64 {
    normalize_degrees_360(polynomial(
        &[357.529_109_2, 35_999.050_290_9, -0.000_153_6, 1.0 / 24_490_000.0],
        julian_century,
    ))
}

/// Mean anomaly of the Moon, in degrees.
pub(crate) fn mean_anomaly_moon(julian_century: f64) -> f64 {
    normalize_degrees_360(polynomial(
        &[134.963_396_4, 477_198.867_505_5, 0.008_741_4, 1.0 / 69_699.0, -1.0 / 14_712_000.0],
        julian_century,
    ))
}

/// Argument of latitude of the Moon, in degrees.
pub(crate) fn argument_latitude_moon(julian_century: f64) -> f64 {
    normalize_degrees_360(polynomial(
        &[93.272_095_0, 483_202.017_523_3, -0.003_653_9, -1.0 / 3_526_000.0, 1.0 / 863_310_000.0],
        julian_century,
    ))
}

/// Longitude of the ascending node of the Moon's mean orbit, in degrees.
pub(crate) fn ascending_longitude_moon(julian_century: f64) -> f64 {
    normalize_degrees_360(polynomial(
        &[125.044_52, -1_934.136_261, 0.002_070_8, 1.0 / 450_000.0],
        julian_century,
    ))
}

// ============================================================================
// Ecliptic and Nutation
// ============================================================================

/// Nutation in longitude and obliquity, in degrees.
///
/// Uses the four dominant terms, good to about half an arcsecond, which is
/// far below the accuracy of the solar and lunar theories fed by it.
pub(crate) fn nutation_longitude_and_obliquity(julian_century: f64) -> (f64, f64) {
    let omega = ascending_longitude_moon(julian_century).to_radians();
    let sun_mean_longitude = (280.4665 + 36_000.7698 * julian_century).to_radians();
    let moon_mean_longitude = (218.3165 + 481_267.8813 * julian_century).to_radians();

    let longitude = -17.20 * omega.sin() - 1.32 * (2.0 * sun_mean_longitude).sin()
        - 0.23 * (2.0 * moon_mean_longitude).sin()
        + 0.21 * (2.0 * omega).sin();
    let obliquity = 9.20 * omega.cos() + 0.57 * (2.0 * sun_mean_longitude).cos()
        + 0.10 * (2.0 * moon_mean_longitude).cos()
        - 0.09 * (2.0 * omega).cos();

    (longitude * ARCSECONDS_TO_DEGREES, obliquity * ARCSECONDS_TO_DEGREES)
}

/// Mean obliquity of the ecliptic, in arcseconds.
pub(crate) fn ecliptic_mean_obliquity(julian_century: f64) -> f64 {
    let u = julian_century / 100.0;
    polynomial(
        &[
            84_381.448, -4_680.93, -1.55, 1_999.25, -51.38, -249.67, -39.05, 7.12, 27.87, 5.79, 2.45,
        ],
        u,
    )
}

/// True obliquity of the ecliptic, in degrees.
pub(crate) fn ecliptic_true_obliquity(nutation_obliquity: f64, mean_obliquity: f64) -> f64 {
    nutation_obliquity + mean_obliquity * ARCSECONDS_TO_DEGREES
}

/// Aberration correction for the Sun's apparent longitude, in degrees.
pub(crate) fn aberration_correction(earth_sun_distance_au: f64) -> f64 {
    -ABERRATION_CONSTANT / (3600.0 * earth_sun_distance_au)
}

// ============================================================================
// Sidereal Time
// ============================================================================

/// Greenwich mean sidereal time in degrees (0° to 360°).
pub(crate) fn greenwich_mean_sidereal_time(days_since_j2000: f64, julian_century: f64) -> f64 {
    normalize_degrees_360(
        GREENWICH_MEAN_SIDEREAL_TIME_BASE
            + SIDEREAL_TIME_RATE * days_since_j2000
            + julian_century * julian_century * (0.000387933 - julian_century / 38_710_000.0),
    )
}

/// Greenwich apparent sidereal time: mean sidereal time plus the equation of the equinoxes.
pub(crate) fn greenwich_apparent_sidereal_time(
    mean_sidereal_time: f64,
    nutation_longitude: f64,
    true_obliquity: f64,
) -> f64 {
    mean_sidereal_time + nutation_longitude * true_obliquity.to_radians().cos()
}

// ============================================================================
// Equatorial Coordinates
// ============================================================================

/// Geocentric right ascension in degrees (0° to 360°).
pub(crate) fn geocentric_right_ascension(ecliptic_longitude: f64, true_obliquity: f64, ecliptic_latitude: f64) -> f64 {
    let longitude_rad = ecliptic_longitude.to_radians();
    let obliquity_rad = true_obliquity.to_radians();
    let latitude_rad = ecliptic_latitude.to_radians();

    normalize_degrees_360(
        (longitude_rad.sin() * obliquity_rad.cos() - latitude_rad.tan() * obliquity_rad.sin())
            .atan2(longitude_rad.cos())
            .to_degrees(),
    )
}

/// Geocentric declination in degrees (-90° to +90°).
pub(crate) fn geocentric_declination(ecliptic_latitude: f64, true_obliquity: f64, ecliptic_longitude: f64) -> f64 {
    let latitude_rad = ecliptic_latitude.to_radians();
    let obliquity_rad = true_obliquity.to_radians();
    let longitude_rad = ecliptic_longitude.to_radians();

    (latitude_rad.sin() * obliquity_rad.cos() + latitude_rad.cos() * obliquity_rad.sin() * longitude_rad.sin())
        .asin()
        .to_degrees()
}

/// Observer's local hour angle in degrees (0° to 360°).
pub(crate) fn observer_hour_angle(greenwich_sidereal_time: f64, longitude: f64, right_ascension: f64) -> f64 {
    normalize_degrees_360(greenwich_sidereal_time + longitude - right_ascension)
}

// ============================================================================
// Parallax and Topocentric Coordinates
// ============================================================================

/// Equatorial horizontal parallax of a body at `distance_km`, in degrees.
pub(crate) fn equatorial_horizontal_parallax(distance_km: f64) -> f64 {
    (EARTH_EQUATORIAL_RADIUS_KM / distance_km).asin().to_degrees()
}

/// Geocentric position of a sea-level observer as (ρ·sin φ', ρ·cos φ').
fn observer_geocentric_terms(latitude: f64) -> (f64, f64) {
    let u = (EARTH_FLATTENING_FACTOR * latitude.to_radians().tan()).atan();
    (EARTH_FLATTENING_FACTOR * u.sin(), u.cos())
}

/// Topocentric coordinates of a body for a sea-level observer.
///
/// Returns `(hour_angle_prime, declination_prime, distance_prime_km)`.
pub(crate) fn topocentric_coordinates(
    latitude: f64,
    geocentric_hour_angle: f64,
    geocentric_declination: f64,
    distance_km: f64,
) -> (f64, f64, f64) {
    let parallax_rad = equatorial_horizontal_parallax(distance_km).to_radians();
    let hour_angle_rad = geocentric_hour_angle.to_radians();
    let declination_rad = geocentric_declination.to_radians();
    let (rho_sin_phi_prime, rho_cos_phi_prime) = observer_geocentric_terms(latitude);

    let parallax_correction_to_right_ascension_rad = (-rho_cos_phi_prime * parallax_rad.sin() * hour_angle_rad.sin())
        .atan2(declination_rad.cos() - rho_cos_phi_prime * parallax_rad.sin() * hour_angle_rad.cos());

    let topocentric_declination_rad = ((declination_rad.sin() - rho_sin_phi_prime * parallax_rad.sin())
        * parallax_correction_to_right_ascension_rad.cos())
    .atan2(declination_rad.cos() - rho_cos_phi_prime * parallax_rad.sin() * hour_angle_rad.cos());

    // Observer offset subtracted from the geocentric vector, in the hour-angle frame.
    let x = distance_km * declination_rad.cos() * hour_angle_rad.cos()
        - EARTH_EQUATORIAL_RADIUS_KM * rho_cos_phi_prime;
    let y = distance_km * declination_rad.cos() * hour_angle_rad.sin();
    let z = distance_km * declination_rad.sin() - EARTH_EQUATORIAL_RADIUS_KM * rho_sin_phi_prime;

    (
        geocentric_hour_angle - parallax_correction_to_right_ascension_rad.to_degrees(),
        topocentric_declination_rad.to_degrees(),
        (x * x + y * y + z * z).sqrt(),
    )
}

/// Topocentric elevation angle in degrees.
pub(crate) fn topocentric_elevation_angle(latitude: f64, declination_prime: f64, hour_angle_prime: f64) -> f64 {
    let latitude_rad = latitude.to_radians();
    let declination_rad = declination_prime.to_radians();
    let hour_angle_rad = hour_angle_prime.to_radians();

    (latitude_rad.sin() * declination_rad.sin() + latitude_rad.cos() * declination_rad.cos() * hour_angle_rad.cos())
        .asin()
        .to_degrees()
}

/// Topocentric azimuth in degrees, measured from north through east (0° to 360°).
pub(crate) fn topocentric_azimuth(hour_angle_prime: f64, latitude: f64, declination_prime: f64) -> f64 {
    let hour_angle_rad = hour_angle_prime.to_radians();
    let latitude_rad = latitude.to_radians();
    let declination_rad = declination_prime.to_radians();

    // Astronomers' azimuth is measured from the south; rotate it to north.
    let azimuth_astro = hour_angle_rad
        .sin()
        .atan2(hour_angle_rad.cos() * latitude_rad.sin() - declination_rad.tan() * latitude_rad.cos())
        .to_degrees();
    normalize_degrees_360(azimuth_astro + 180.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_obliquity_at_j2000() {
        // 23° 26' 21.448"
        let obliquity = ecliptic_mean_obliquity(0.0) * ARCSECONDS_TO_DEGREES;
        assert!((obliquity - 23.439_291).abs() < 1e-6);
    }

    #[test]
    fn sidereal_time_at_j2000() {
        assert!((greenwich_mean_sidereal_time(0.0, 0.0) - 280.460_618_37).abs() < 1e-9);
    }

    #[test]
    fn body_on_the_meridian_is_due_south_for_northern_observer() {
        let azimuth = topocentric_azimuth(0.0, 45.0, 10.0);
        assert!((azimuth - 180.0).abs() < 1e-9);
        let elevation = topocentric_elevation_angle(45.0, 10.0, 0.0);
        assert!((elevation - 55.0).abs() < 1e-9);
    }

    #[test]
    fn west_of_meridian_has_azimuth_above_180() {
        assert!(topocentric_azimuth(15.0, 45.0, 10.0) > 180.0);
        assert!(topocentric_azimuth(345.0, 45.0, 10.0) < 180.0);
    }

    #[test]
    fn lunar_parallax_lowers_the_moon() {
        let (hour_angle, declination, distance) = topocentric_coordinates(0.0, 90.0, 0.0, 384_400.0);
        assert!(declination.abs() < 1e-6);
        assert!(hour_angle > 90.0 && hour_angle < 91.5);
        assert!(distance > 384_400.0);

        let (_, _, overhead) = topocentric_coordinates(0.0, 0.0, 0.0, 384_400.0);
        assert!((overhead - (384_400.0 - EARTH_EQUATORIAL_RADIUS_KM)).abs() < 1.0);
    }
}
