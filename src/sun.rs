//! Low-precision solar theory (mean elements plus equation of centre).

use crate::math::{normalize_degrees_360, polynomial};

/// Kilometres per astronomical unit.
pub(crate) const AU_KM: f64 = 149_597_870.7;

/// Geometric geocentric ecliptic coordinates of the Sun, referred to the mean equinox of date.
#[derive(Copy, Clone, Debug)]
pub(crate) struct SolarEcliptic {
    /// True geometric longitude in degrees
    pub longitude: f64,
    /// Earth-Sun distance in AU
    pub distance_au: f64,
}

/// Sun's geometric longitude and radius vector at `julian_century` (TT).
pub(crate) fn solar_ecliptic(julian_century: f64) -> SolarEcliptic {
    let t = julian_century;
    let mean_longitude = polynomial(&[280.466_46, 36_000.769_83, 0.000_303_2], t);
    let mean_anomaly = polynomial(&[357.529_11, 35_999.050_29, -0.000_153_7], t);
    let eccentricity = polynomial(&[0.016_708_634, -0.000_042_037, -0.000_000_126_7], t);

    let m = mean_anomaly.to_radians();
    let equation_of_centre = m.sin() * polynomial(&[1.914_602, -0.004_817, -0.000_014], t)
        + (2.0 * m).sin() * (0.019_993 - 0.000_101 * t)
        + (3.0 * m).sin() * 0.000_289;

    let true_anomaly = (mean_anomaly + equation_of_centre).to_radians();
    let distance_au = 1.000_001_018 * (1.0 - eccentricity * eccentricity) / (1.0 + eccentricity * true_anomaly.cos());

    SolarEcliptic {
        longitude: normalize_degrees_360(mean_longitude + equation_of_centre),
        distance_au,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meeus_example_25a() {
        // 1992 October 13.0 TD
        let t = -0.072_183_436;
        let sun = solar_ecliptic(t);
        assert!((sun.longitude - 199.909_88).abs() < 1e-3, "longitude {}", sun.longitude);
        assert!((sun.distance_au - 0.997_66).abs() < 1e-4, "distance {}", sun.distance_au);
    }

    #[test]
    fn perihelion_and_aphelion_distances() {
        // Early January and early July 2020
        let january = solar_ecliptic(7_308.5 / 36_525.0);
        let july = solar_ecliptic(7_490.5 / 36_525.0);
        assert!(january.distance_au < 0.984);
        assert!(july.distance_au > 1.016);
    }
}
