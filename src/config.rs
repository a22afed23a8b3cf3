use std::num::NonZeroUsize;

use chrono::TimeDelta;

use crate::search::MIN_STEP_MILLISECONDS;
use crate::CalculationError;

/// Tuning knobs for [`AstronomicalCalculator`](crate::AstronomicalCalculator) and
/// [`SunMoon`](crate::SunMoon).
///
/// # Example
///
/// ```
/// use chrono::TimeDelta;
/// use sun_moon::CalculatorConfig;
///
/// let config = CalculatorConfig::default()
///     .with_result_times_local(true)
///     .with_twilight_search_step(TimeDelta::minutes(5));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CalculatorConfig {
    /// Number of per-location contexts the calculator keeps
    pub location_cache_size: usize,
    /// Capacity of each of the four caches inside a location context
    pub event_cache_size: usize,
    /// Return event times in the location's time zone instead of UTC
    pub result_times_local: bool,
    /// Coarse sampling step of the twilight-band search
    pub twilight_search_step: TimeDelta,
    /// Coarse sampling step of the meridian-transit search
    pub transit_search_step: TimeDelta,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            location_cache_size: 100,
            event_cache_size: 1000,
            result_times_local: false,
            twilight_search_step: TimeDelta::minutes(10),
            transit_search_step: TimeDelta::hours(1),
        }
    }
}

impl CalculatorConfig {
    pub fn with_location_cache_size(mut self, size: usize) -> Self {
        self.location_cache_size = size;
        self
    }

    pub fn with_event_cache_size(mut self, size: usize) -> Self {
        self.event_cache_size = size;
        self
    }

    pub fn with_result_times_local(mut self, local: bool) -> Self {
        self.result_times_local = local;
        self
    }

    pub fn with_twilight_search_step(mut self, step: TimeDelta) -> Self {
        self.twilight_search_step = step;
        self
    }

    pub fn with_transit_search_step(mut self, step: TimeDelta) -> Self {
        self.transit_search_step = step;
        self
    }

    /// Checks every field.
    ///
    /// Cache sizes must be non-zero. The twilight step must lie between one millisecond
    /// and one hour, the transit step between one millisecond and six hours; longer steps
    /// could skip over a pair of changes.
    ///
    /// # Errors
    ///
    /// [`CalculationError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<(), CalculationError> {
        if self.location_cache_size == 0 {
            return Err(CalculationError::InvalidConfig("location_cache_size must be non-zero"));
        }
        if self.event_cache_size == 0 {
            return Err(CalculationError::InvalidConfig("event_cache_size must be non-zero"));
        }
        let min_step = TimeDelta::milliseconds(MIN_STEP_MILLISECONDS);
        if self.twilight_search_step < min_step || self.twilight_search_step > TimeDelta::hours(1) {
            return Err(CalculationError::InvalidConfig("twilight_search_step must be in [1ms, 1h]"));
        }
        if self.transit_search_step < min_step || self.transit_search_step > TimeDelta::hours(6) {
            return Err(CalculationError::InvalidConfig("transit_search_step must be in [1ms, 6h]"));
        }
        Ok(())
    }

    pub(crate) fn location_capacity(&self) -> Result<NonZeroUsize, CalculationError> {
        NonZeroUsize::new(self.location_cache_size)
            .ok_or(CalculationError::InvalidConfig("location_cache_size must be non-zero"))
    }

    pub(crate) fn event_capacity(&self) -> Result<NonZeroUsize, CalculationError> {
        NonZeroUsize::new(self.event_cache_size)
            .ok_or(CalculationError::InvalidConfig("event_cache_size must be non-zero"))
    }
}
