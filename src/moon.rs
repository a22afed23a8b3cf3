//! Truncated lunar theory with the leading periodic terms of Meeus chapter 47.

use crate::geo::{argument_latitude_moon, mean_anomaly_moon, mean_anomaly_sun, mean_elongation_moon_sun};
use crate::math::{normalize_degrees_360, polynomial};

/// Geocentric ecliptic coordinates of the Moon, referred to the mean equinox of date.
#[derive(Copy, Clone, Debug)]
pub(crate) struct LunarEcliptic {
    pub longitude: f64,
    pub latitude: f64,
    pub distance_km: f64,
}

/// Multiples of (D, M, M', F) with longitude (1e-6°) and distance (1e-3 km) amplitudes.
const LONGITUDE_DISTANCE_TERMS: [(i8, i8, i8, i8, f64, f64); 20] = [
    (0, 0, 1, 0, 6_288_774.0, -20_905_355.0),
    (2, 0, -1, 0, 1_274_027.0, -3_699_111.0),
    (2, 0, 0, 0, 658_314.0, -2_955_968.0),
    (0, 0, 2, 0, 213_618.0, -569_925.0),
    (0, 1, 0, 0, -185_116.0, 48_888.0),
    (0, 0, 0, 2, -114_332.0, -3_149.0),
    (2, 0, -2, 0, 58_793.0, 246_158.0),
    (2, -1, -1, 0, 57_066.0, -152_138.0),
    (2, 0, 1, 0, 53_322.0, -170_733.0),
    (2, -1, 0, 0, 45_758.0, -204_586.0),
    (0, 1, -1, 0, -40_923.0, -129_620.0),
    (1, 0, 0, 0, -34_720.0, 108_743.0),
    (0, 1, 1, 0, -30_383.0, 104_755.0),
    (2, 0, 0, -2, 15_327.0, 10_321.0),
    (0, 0, 1, 2, -12_528.0, 0.0),
    (0, 0, 1, -2, 10_980.0, 79_661.0),
    (4, 0, -1, 0, 10_675.0, -34_782.0),
    (0, 0, 3, 0, 10_034.0, -23_210.0),
    (4, 0, -2, 0, 8_548.0, -21_636.0),
    (2, 1, -1, 0, -7_888.0, 24_208.0),
];

/// Multiples of (D, M, M', F) with latitude amplitudes (1e-6°).
const LATITUDE_TERMS: [(i8, i8, i8, i8, f64); 20] = [
    (0, 0, 0, 1, 5_128_122.0),
    (0, 0, 1, 1, 280_602.0),
    (0, 0, 1, -1, 277_693.0),
    (2, 0, 0, -1, 173_237.0),
    (2, 0, -1, 1, 55_413.0),
    (2, 0, -1, -1, 46_271.0),
    (2, 0, 0, 1, 32_573.0),
    (0, 0, 2, 1, 17_198.0),
    (2, 0, 1, -1, 9_266.0),
    (0, 0, 2, -1, 8_822.0),
    (2, -1, 0, -1, 8_216.0),
    (2, 0, -2, -1, 4_324.0),
    (2, 0, 1, 1, 4_200.0),
    (2, 1, 0, -1, -3_359.0),
    (2, -1, -1, 1, 2_463.0),
    (2, -1, 0, 1, 2_211.0),
    (2, -1, -1, -1, 2_065.0),
    (0, 1, -1, -1, -1_870.0),
    (4, 0, -1, -1, 1_828.0),
    (0, 1, 0, 1, -1_794.0),
];

/// Argument and eccentricity factor shared by both term tables.
fn term_argument(multiples: (i8, i8, i8, i8), elements: [f64; 4], eccentricity: f64) -> (f64, f64) {
    let (d, m, mp, f) = multiples;
    let argument = f64::from(d) * elements[0]
        + f64::from(m) * elements[1]
        + f64::from(mp) * elements[2]
        + f64::from(f) * elements[3];
    let factor = match m.unsigned_abs() {
        1 => eccentricity,
        2 => eccentricity * eccentricity,
        _ => 1.0,
    };
    (argument.to_radians(), factor)
}

/// Moon's geocentric longitude, latitude and distance at `julian_century` (TT).
pub(crate) fn lunar_ecliptic(julian_century: f64) -> LunarEcliptic {
    let t = julian_century;
    let mean_longitude = normalize_degrees_360(polynomial(
        &[218.316_447_7, 481_267.881_234_21, -0.001_578_6, 1.0 / 538_841.0, -1.0 / 65_194_000.0],
        t,
    ));
    let elements = [
        mean_elongation_moon_sun(t),
        mean_anomaly_sun(t),
        mean_anomaly_moon(t),
        argument_latitude_moon(t),
    ];
    let eccentricity = polynomial(&[1.0, -0.002_516, -0.000_007_4], t);

    let mut sum_longitude = 0.0;
    let mut sum_distance = 0.0;
    for &(d, m, mp, f, longitude, distance) in &LONGITUDE_DISTANCE_TERMS {
        let (argument, factor) = term_argument((d, m, mp, f), elements, eccentricity);
        sum_longitude += longitude * factor * argument.sin();
        sum_distance += distance * factor * argument.cos();
    }

    let mut sum_latitude = 0.0;
    for &(d, m, mp, f, latitude) in &LATITUDE_TERMS {
        let (argument, factor) = term_argument((d, m, mp, f), elements, eccentricity);
        sum_latitude += latitude * factor * argument.sin();
    }

    // Venus, Jupiter and flattening corrections
    let a1 = (119.75 + 131.849 * t).to_radians();
    let a2 = (53.09 + 479_264.290 * t).to_radians();
    let a3 = (313.45 + 481_266.484 * t).to_radians();
    let lp = mean_longitude.to_radians();
    let mp = elements[2].to_radians();
    let f = elements[3].to_radians();

    sum_longitude += 3_958.0 * a1.sin() + 1_962.0 * (lp - f).sin() + 318.0 * a2.sin();
    sum_latitude += -2_235.0 * lp.sin() + 382.0 * a3.sin() + 175.0 * (a1 - f).sin() + 175.0 * (a1 + f).sin()
        + 127.0 * (lp - mp).sin()
        - 115.0 * (lp + mp).sin();

    LunarEcliptic {
        longitude: normalize_degrees_360(mean_longitude + sum_longitude / 1_000_000.0),
        latitude: sum_latitude / 1_000_000.0,
        distance_km: 385_000.56 + sum_distance / 1_000.0,
    }
}
