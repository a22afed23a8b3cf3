//! Discrete-event search over integer step functions of time.

use chrono::{DateTime, TimeDelta, Utc};

use crate::time::{from_unix_seconds, unix_seconds};
use crate::CalculationError;

/// Altitude thresholds in degrees separating the five twilight bands.
pub const TWILIGHT_THRESHOLDS: [f64; 4] = [-18.0, -12.0, -6.0, -0.8333];

/// Bisection stops once a change is bracketed to this many seconds.
const RESOLUTION_SECONDS: f64 = 1e-3;

const MAX_BISECTIONS: u32 = 64;

/// Shortest accepted sampling step; finer steps could not be told apart by the bisection.
pub(crate) const MIN_STEP_MILLISECONDS: i64 = 1;

/// An instant at which a step function changes value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    /// First instant (to the millisecond) with the new code
    pub time: DateTime<Utc>,
    /// Code immediately after the change
    pub code: u8,
}

/// Twilight band for a solar altitude: 0 is night, 4 is day.
///
/// The band is the number of thresholds in [`TWILIGHT_THRESHOLDS`] the altitude meets or
/// exceeds.
pub fn twilight_band(altitude: f64) -> u8 {
    TWILIGHT_THRESHOLDS
        .iter()
        .filter(|threshold| altitude >= **threshold)
        .count() as u8
}

/// 1 while the body is west of the meridian, 0 while it is east.
///
/// A change 0 → 1 is an upper transit (solar noon), 1 → 0 a lower transit (solar midnight).
pub fn transit_parity(azimuth: f64) -> u8 {
    u8::from(azimuth.to_radians().sin() < 0.0)
}

/// Finds every change of `step_function` between `start` and `end`.
///
/// The function is sampled at evenly spaced instants no more than `step` apart. Each
/// sample pair with differing codes is bisected down to a millisecond. Changes that
/// reverse within a single step are not seen, so `step` must be shorter than the
/// shortest interval between changes.
///
/// # Errors
///
/// Returns [`CalculationError::InvalidInterval`] unless `start < end` and `step` is at
/// least a millisecond.
pub fn find_discrete<F>(
    start: &DateTime<Utc>,
    end: &DateTime<Utc>,
    step: TimeDelta,
    mut step_function: F,
) -> Result<Vec<Transition>, CalculationError>
where
    F: FnMut(&DateTime<Utc>) -> u8,
{
    if start >= end || step < TimeDelta::milliseconds(MIN_STEP_MILLISECONDS) {
        return Err(CalculationError::InvalidInterval);
    }

    let t_start = unix_seconds(start);
    let t_end = unix_seconds(end);
    let step_seconds = step.as_seconds_f64();
    let samples = ((t_end - t_start) / step_seconds).ceil().max(1.0) as usize;
    let spacing = (t_end - t_start) / samples as f64;

    let mut code_at = |seconds: f64| -> Result<u8, CalculationError> {
        let at = from_unix_seconds(seconds)?;
        Ok(step_function(&at))
    };

    let mut transitions = Vec::new();
    let mut t_a = t_start;
    let mut code_a = code_at(t_a)?;
    for i in 1..=samples {
        let t_b = if i == samples { t_end } else { t_start + spacing * i as f64 };
        let code_b = code_at(t_b)?;

        // More than one change can hide in a step; peel them off left to right.
        let mut t_lo = t_a;
        let mut code_lo = code_a;
        while code_lo != code_b {
            let (t_change, code_change) = bisect_change(t_lo, code_lo, t_b, code_b, &mut code_at)?;
            transitions.push(Transition {
                time: from_unix_seconds(t_change)?,
                code: code_change,
            });
            t_lo = t_change;
            code_lo = code_change;
        }

        t_a = t_b;
        code_a = code_b;
    }

    log::trace!(
        "discrete search over {samples} steps found {} transitions",
        transitions.len()
    );
    Ok(transitions)
}

/// Narrows `(t_lo, t_hi]` to the first change away from `code_lo`.
///
/// Returns the earliest sampled instant carrying a different code, and that code.
fn bisect_change<F>(
    mut t_lo: f64,
    code_lo: u8,
    mut t_hi: f64,
    mut code_hi: u8,
    code_at: &mut F,
) -> Result<(f64, u8), CalculationError>
where
    F: FnMut(f64) -> Result<u8, CalculationError>,
{
    for _ in 0..MAX_BISECTIONS {
        if t_hi - t_lo <= RESOLUTION_SECONDS {
            break;
        }
        let t_mid = 0.5 * (t_lo + t_hi);
        let code_mid = code_at(t_mid)?;
        if code_mid == code_lo {
            t_lo = t_mid;
        } else {
            t_hi = t_mid;
            code_hi = code_mid;
        }
    }
    Ok((t_hi, code_hi))
}
