//! Modal sampling interval.
//!
//! The expected cadence of a track is the most frequent positive difference between
//! consecutive non-null timestamps, compared by exact value. Zero differences (repeated
//! timestamps) and negative ones (ordering defects) never count as a cadence.
//!
//! Ties go to the difference encountered first in sequence order.

use std::collections::HashMap;

use contracts::{ContractError, Step, TimeUnit, Track};
use ordered_float::OrderedFloat;

/// Most frequent positive successive difference of `times`, in `unit`.
pub fn modal_step(times: &[f64], unit: TimeUnit) -> Result<Step, ContractError> {
    if times.len() < 2 {
        return Err(ContractError::insufficient_data(
            "modal step",
            2,
            times.len(),
        ));
    }

    // difference -> (count, first position)
    let mut tally: HashMap<OrderedFloat<f64>, (usize, usize)> = HashMap::new();
    for (pos, pair) in times.windows(2).enumerate() {
        let delta = pair[1] - pair[0];
        if delta > 0.0 && delta.is_finite() {
            tally.entry(OrderedFloat(delta)).or_insert((0, pos)).0 += 1;
        }
    }

    let (delta, _) = tally
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .ok_or_else(|| ContractError::insufficient_data("modal step (positive intervals)", 1, 0))?;

    Step::new(delta.into_inner(), unit)
}

/// Modal step over a track's non-null timestamps.
pub fn track_modal_step(track: &Track) -> Result<Step, ContractError> {
    modal_step(&track.time_values(), track.time_unit())
}

/// Step magnitude in the track's unit: the supplied step converted, or the modal step.
pub(crate) fn step_in_track_unit(track: &Track, step: Option<Step>) -> Result<f64, ContractError> {
    let step = match step {
        Some(step) => step,
        None => track_modal_step(track)?,
    };
    Ok(step.in_unit(track.time_unit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{CoordinateSystem, Observation};

    #[test]
    fn test_modal_step_most_frequent() {
        let step = modal_step(&[0.0, 10.0, 20.0, 25.0, 35.0, 45.0], TimeUnit::Seconds).unwrap();
        assert_eq!(step.magnitude(), 10.0);
        assert_eq!(step.unit(), TimeUnit::Seconds);
    }

    #[test]
    fn test_modal_step_tie_takes_first_encountered() {
        // 2 and 3 both occur twice; 3 comes first
        let step = modal_step(&[0.0, 3.0, 5.0, 8.0, 10.0], TimeUnit::Milliseconds).unwrap();
        assert_eq!(step.magnitude(), 3.0);
        assert_eq!(step.unit(), TimeUnit::Milliseconds);
    }

    #[test]
    fn test_modal_step_ignores_zero_and_negative_deltas() {
        // deltas: 1, 0, 0, 0, 2, -1, 2
        let step = modal_step(&[0.0, 1.0, 1.0, 1.0, 1.0, 3.0, 2.0, 4.0], TimeUnit::Seconds)
            .unwrap();
        assert_eq!(step.magnitude(), 2.0);
    }

    #[test]
    fn test_modal_step_insufficient() {
        let err = modal_step(&[1.0], TimeUnit::Seconds).unwrap_err();
        assert!(err.is_insufficient_data());

        let err = modal_step(&[1.0, 1.0, 1.0], TimeUnit::Seconds).unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_step_in_track_unit_converts_supplied_step() {
        let track = Track::new(
            CoordinateSystem::Planar,
            TimeUnit::Milliseconds,
            vec![
                Observation::new("a", Some(0.0), Some(0.0), Some(0.0)),
                Observation::new("a", None, Some(0.0), Some(0.0)),
                Observation::new("a", Some(500.0), Some(0.0), Some(0.0)),
            ],
        )
        .unwrap();

        assert_eq!(step_in_track_unit(&track, None).unwrap(), 500.0);
        let supplied = Step::new(0.25, TimeUnit::Seconds).unwrap();
        assert!((step_in_track_unit(&track, Some(supplied)).unwrap() - 250.0).abs() < 1e-9);
    }
}
