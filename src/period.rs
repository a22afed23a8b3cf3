//! Classification of an instant into a [`SolarPeriod`].

use chrono::{DateTime, TimeDelta, Utc};

use crate::search::twilight_band;
use crate::types::SolarPeriod;

/// Half-width of the first symmetric altitude probe, in nanoseconds.
const INITIAL_PROBE_NANOS: i64 = 1_000_000_000;

/// Each retry shrinks the probe tenfold, ending at one microsecond.
const PROBE_ATTEMPTS: u32 = 7;

/// Period of the solar day at `at`, given a function returning solar altitude in degrees.
///
/// Bands 0 and 4 are Night and Day outright. Inside a twilight band the Sun's direction
/// decides between Morning and Evening. Altitudes are compared at `at ± δ` for δ from one
/// second down to one microsecond; if none of those brackets is strictly monotonic the
/// instant is at an altitude extremum and the one-second forward difference decides.
/// That last step can misjudge instants within about a microsecond of the extremum.
pub(crate) fn classify_period<F>(at: &DateTime<Utc>, mut altitude_at: F) -> SolarPeriod
where
    F: FnMut(&DateTime<Utc>) -> f64,
{
    let altitude = altitude_at(at);
    let band = twilight_band(altitude);
    if band == 0 || band == 4 {
        return SolarPeriod::from_band(band, false);
    }

    let mut probe_nanos = INITIAL_PROBE_NANOS;
    for _ in 0..PROBE_ATTEMPTS {
        let delta = TimeDelta::nanoseconds(probe_nanos);
        let before = altitude_at(&(*at - delta));
        let after = altitude_at(&(*at + delta));
        if before < altitude && altitude < after {
            return SolarPeriod::from_band(band, true);
        }
        if before > altitude && altitude > after {
            return SolarPeriod::from_band(band, false);
        }
        probe_nanos /= 10;
    }

    log::trace!("altitude extremum near {at}, using forward difference");
    let later = altitude_at(&(*at + TimeDelta::seconds(1)));
    SolarPeriod::from_band(band, later > altitude)
}
