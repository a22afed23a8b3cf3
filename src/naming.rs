//! Names for twilight-band and transit-parity transitions.

use crate::search::Transition;
use crate::types::EventName;
use crate::CalculationError;

/// Altitudes (degrees) that split bands 1 to 3 into their dawn and dusk halves.
///
/// Entering a band from below happens at its lower edge, from above at its upper edge;
/// each value sits between the two.
const DAWN_DUSK_SPLIT: [f64; 3] = [-15.0, -9.0, -3.0];

/// Name of a twilight transition.
///
/// `previous` is the band before the change. For the first transition of a search
/// window it is unknown (`None`) and the name is inferred from the new band, consulting
/// `altitude` (the solar altitude at the transition) only for bands 1 to 3.
///
/// # Errors
///
/// [`CalculationError::UnexpectedTransition`] if the pair of bands is not adjacent.
pub(crate) fn name_twilight_transition<F>(
    previous: Option<u8>,
    code: u8,
    altitude: F,
) -> Result<EventName, CalculationError>
where
    F: FnOnce() -> f64,
{
    let Some(previous) = previous else {
        return first_twilight_name(code, altitude);
    };
    let name = match (previous, code) {
        (0, 1) => EventName::AstronomicalDawn,
        (1, 2) => EventName::NauticalDawn,
        (2, 3) => EventName::CivilDawn,
        (3, 4) => EventName::Sunrise,
        (4, 3) => EventName::Sunset,
        (3, 2) => EventName::CivilDusk,
        (2, 1) => EventName::NauticalDusk,
        (1, 0) => EventName::AstronomicalDusk,
        (from, to) => {
            log::warn!("twilight band jumped from {from} to {to}");
            return Err(CalculationError::UnexpectedTransition { from, to });
        }
    };
    Ok(name)
}

fn first_twilight_name<F>(code: u8, altitude: F) -> Result<EventName, CalculationError>
where
    F: FnOnce() -> f64,
{
    let name = match code {
        0 => EventName::AstronomicalDusk,
        4 => EventName::Sunrise,
        1..=3 => {
            let rising = altitude() < DAWN_DUSK_SPLIT[usize::from(code - 1)];
            match (code, rising) {
                (1, true) => EventName::AstronomicalDawn,
                (1, false) => EventName::NauticalDusk,
                (2, true) => EventName::NauticalDawn,
                (2, false) => EventName::CivilDusk,
                (3, true) => EventName::CivilDawn,
                _ => EventName::Sunset,
            }
        }
        to => {
            log::warn!("twilight band {to} out of range");
            return Err(CalculationError::UnexpectedTransition { from: u8::MAX, to });
        }
    };
    Ok(name)
}

/// Names a whole run of twilight transitions, chaining each code into the next lookup.
pub(crate) fn name_twilight_transitions<F>(
    transitions: &[Transition],
    mut altitude_at: F,
) -> Result<Vec<EventName>, CalculationError>
where
    F: FnMut(&Transition) -> f64,
{
    let mut previous = None;
    transitions
        .iter()
        .map(|transition| {
            let name = name_twilight_transition(previous, transition.code, || altitude_at(transition))?;
            previous = Some(transition.code);
            Ok(name)
        })
        .collect()
}

/// Solar Noon when the Sun moves west of the meridian, Solar Midnight when it moves east.
pub(crate) fn name_transit(code: u8) -> EventName {
    if code == 1 {
        EventName::SolarNoon
    } else {
        EventName::SolarMidnight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unused_altitude() -> f64 {
        f64::NAN
    }

    #[test]
    fn adjacent_pairs_name_both_directions() {
        let rising = [(0, 1), (1, 2), (2, 3), (3, 4)];
        let names = rising
            .iter()
            .map(|&(from, to)| name_twilight_transition(Some(from), to, unused_altitude))
            .collect::<Result<Vec<_>, _>>();
        assert_eq!(
            names,
            Ok(vec![
                EventName::AstronomicalDawn,
                EventName::NauticalDawn,
                EventName::CivilDawn,
                EventName::Sunrise
            ])
        );

        assert_eq!(name_twilight_transition(Some(4), 3, unused_altitude), Ok(EventName::Sunset));
        assert_eq!(name_twilight_transition(Some(1), 0, unused_altitude), Ok(EventName::AstronomicalDusk));
    }

    #[test]
    fn jumps_are_internal_errors() {
        assert_eq!(
            name_twilight_transition(Some(1), 3, unused_altitude),
            Err(CalculationError::UnexpectedTransition { from: 1, to: 3 })
        );
        assert_eq!(
            name_twilight_transition(Some(2), 2, unused_altitude),
            Err(CalculationError::UnexpectedTransition { from: 2, to: 2 })
        );
    }

    #[test]
    fn first_transition_into_extreme_bands_ignores_altitude() {
        assert_eq!(name_twilight_transition(None, 0, unused_altitude), Ok(EventName::AstronomicalDusk));
        assert_eq!(name_twilight_transition(None, 4, unused_altitude), Ok(EventName::Sunrise));
    }

    #[test]
    fn first_transition_into_middle_bands_uses_altitude() {
        assert_eq!(name_twilight_transition(None, 1, || -18.0), Ok(EventName::AstronomicalDawn));
        assert_eq!(name_twilight_transition(None, 1, || -12.0), Ok(EventName::NauticalDusk));
        assert_eq!(name_twilight_transition(None, 2, || -12.0), Ok(EventName::NauticalDawn));
        assert_eq!(name_twilight_transition(None, 2, || -6.0), Ok(EventName::CivilDusk));
        assert_eq!(name_twilight_transition(None, 3, || -6.0), Ok(EventName::CivilDawn));
        assert_eq!(name_twilight_transition(None, 3, || -0.8333), Ok(EventName::Sunset));
    }

    #[test]
    fn runs_chain_the_previous_code() {
        let time = chrono::DateTime::UNIX_EPOCH;
        let transitions: Vec<_> = [3u8, 2, 1, 0]
            .into_iter()
            .map(|code| Transition { time, code })
            .collect();
        let names = name_twilight_transitions(&transitions, |_| -0.8333);
        assert_eq!(
            names,
            Ok(vec![
                EventName::Sunset,
                EventName::CivilDusk,
                EventName::NauticalDusk,
                EventName::AstronomicalDusk
            ])
        );
    }

    #[test]
    fn transit_codes_name_noon_and_midnight() {
        assert_eq!(name_transit(1), EventName::SolarNoon);
        assert_eq!(name_transit(0), EventName::SolarMidnight);
    }
}
