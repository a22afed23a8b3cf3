use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::CalculationError;

/// Unix timestamp of the J2000.0 epoch (2000-01-01 12:00:00 UT).
pub(crate) const J2000_UNIX_SECONDS: i64 = 946_728_000;

pub(crate) const SECONDS_PER_DAY: f64 = 86_400.0;

const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// Days elapsed since J2000.0 on the UT scale, including the fractional day.
///
/// Relative to J2000 an `f64` resolves well below a microsecond, which the
/// period classifier's probe needs.
pub(crate) fn days_since_j2000(at: &DateTime<Utc>) -> f64 {
    let seconds = (at.timestamp() - J2000_UNIX_SECONDS) as f64 + f64::from(at.timestamp_subsec_nanos()) * 1e-9;
    seconds / SECONDS_PER_DAY
}

/// Julian century (T) from days since J2000.0.
pub(crate) fn julian_century(days: f64) -> f64 {
    days / DAYS_PER_JULIAN_CENTURY
}

/// Seconds since the Unix epoch as a float, used by the discrete-event search.
pub(crate) fn unix_seconds(at: &DateTime<Utc>) -> f64 {
    at.timestamp() as f64 + f64::from(at.timestamp_subsec_nanos()) * 1e-9
}

/// Inverse of [`unix_seconds`], rounded to the microsecond.
pub(crate) fn from_unix_seconds(seconds: f64) -> Result<DateTime<Utc>, CalculationError> {
    if !seconds.is_finite() {
        return Err(CalculationError::TimeConversionError);
    }
    let mut whole = seconds.floor();
    let mut micros = ((seconds - whole) * 1e6).round();
    if micros >= 1e6 {
        whole += 1.0;
        micros = 0.0;
    }
    DateTime::from_timestamp(whole as i64, micros as u32 * 1_000).ok_or(CalculationError::TimeConversionError)
}

/// Calculate ΔT (Terrestrial Time minus Universal Time) in seconds.
///
/// Piecewise polynomial fits cover 1900 through 2150; outside that span the
/// long-term parabola is used.
pub fn get_delta_t(at: &DateTime<Utc>) -> f64 {
    let year = f64::from(at.year()) + (f64::from(at.month()) - 0.5) / 12.0;

    match year {
        y if (1900.0..1920.0).contains(&y) => {
            let t = y - 1900.0;
            -2.79 + 1.494119 * t - 0.0598939 * t.powi(2) + 0.0061966 * t.powi(3) - 0.000197 * t.powi(4)
        }
        y if (1920.0..1941.0).contains(&y) => {
            let t = y - 1920.0;
            21.20 + 0.84493 * t - 0.076100 * t.powi(2) + 0.0020936 * t.powi(3)
        }
        y if (1941.0..1961.0).contains(&y) => {
            let t = y - 1950.0;
            29.07 + 0.407 * t - t.powi(2) / 233.0 + t.powi(3) / 2547.0
        }
        y if (1961.0..1986.0).contains(&y) => {
            let t = y - 1975.0;
            45.45 + 1.067 * t - t.powi(2) / 260.0 - t.powi(3) / 718.0
        }
        y if (1986.0..2005.0).contains(&y) => {
            let t = y - 2000.0;
            63.86 + 0.3345 * t - 0.060374 * t.powi(2)
                + 0.0017275 * t.powi(3)
                + 0.000651814 * t.powi(4)
                + 0.00002373599 * t.powi(5)
        }
        y if (2005.0..2050.0).contains(&y) => {
            let t = y - 2000.0;
            62.92 + 0.32217 * t + 0.005589 * t.powi(2)
        }
        y if (2050.0..2150.0).contains(&y) => {
            let u = (y - 1820.0) / 100.0;
            -20.0 + 32.0 * u * u - 0.5628 * (2150.0 - y)
        }
        y => {
            let u = (y - 1820.0) / 100.0;
            -20.0 + 32.0 * u * u
        }
    }
}

/// Parse an RFC 3339 timestamp that carries an explicit UTC offset.
///
/// Timestamps without an offset (for example `2020-10-01T05:25:00`) are
/// rejected with [`CalculationError::NaiveInstant`] rather than being silently
/// interpreted in some zone.
///
/// ```
/// use sun_moon::{parse_instant, CalculationError};
///
/// assert!(parse_instant("2020-10-01T05:25:00-04:00").is_ok());
/// assert!(matches!(
///     parse_instant("2020-10-01T05:25:00"),
///     Err(CalculationError::NaiveInstant(_))
/// ));
/// ```
pub fn parse_instant(text: &str) -> Result<DateTime<FixedOffset>, CalculationError> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(text.trim()) {
        return Ok(instant);
    }
    let naive = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .any(|format| NaiveDateTime::parse_from_str(text.trim(), format).is_ok());
    if naive {
        Err(CalculationError::NaiveInstant(text.to_string()))
    } else {
        Err(CalculationError::TimeConversionError)
    }
}

/// The UTC instant of local civil midnight starting `date` in `time_zone`.
///
/// When a daylight-saving transition skips midnight the first valid local time
/// of the day is used; when midnight is ambiguous the earlier instant wins.
pub(crate) fn civil_midnight(time_zone: &Tz, date: NaiveDate) -> Result<DateTime<Utc>, CalculationError> {
    let mut local = date.and_time(NaiveTime::MIN);
    for _ in 0..4 {
        if let Some(instant) = time_zone.from_local_datetime(&local).earliest() {
            return Ok(instant.with_timezone(&Utc));
        }
        local += chrono::TimeDelta::minutes(30);
    }
    Err(CalculationError::TimeConversionError)
}
