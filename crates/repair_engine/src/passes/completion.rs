//! Re-gridding onto the expected regular timeline.

use std::cmp::Ordering;

use contracts::{
    CompletionConfig, ContractError, ErrorLabel, Observation, PassKind, PassReport, Track,
};
use tracing::{debug, instrument};

use super::fill_missing_locations;
use crate::modal::step_in_track_unit;

/// Upper bound on the number of timeline slots
pub const MAX_TIMELINE_SLOTS: usize = 10_000_000;
/// Slot-count rounding slack, in steps
const SLOT_EPSILON: f64 = 1e-9;

/// Outer-join the track with `begin, begin + step, …, end` and fill the new gaps.
///
/// Slots with no observation within `1e-9·step` become rows tagged `MISSING`. Existing
/// observations are kept as they are, including off-grid and untimed ones; the result is
/// ordered by time with untimed rows last. Positions missing afterwards are interpolated,
/// tagging `locNA` only on rows that were not inserted here.
#[instrument(
    name = "complete_missing_observations",
    skip(track, config),
    fields(track_id = %track.id(), observations = track.len())
)]
pub fn complete_missing_observations(
    track: &mut Track,
    config: &CompletionConfig,
) -> Result<PassReport, ContractError> {
    track.validate()?;

    let range = track.time_range();
    let begin = config
        .begin
        .or(range.map(|r| r.0))
        .ok_or_else(|| ContractError::insufficient_data("observation completion", 1, 0))?;
    let end = config
        .end
        .or(range.map(|r| r.1))
        .ok_or_else(|| ContractError::insufficient_data("observation completion", 1, 0))?;

    if !(begin.is_finite() && end.is_finite()) {
        return Err(ContractError::invalid_parameter(
            "begin/end",
            "timeline bounds must be finite",
        ));
    }
    if begin > end {
        return Err(ContractError::invalid_parameter(
            "begin",
            format!("begin {begin} is after end {end}"),
        ));
    }

    let step = step_in_track_unit(track, config.step)?;
    let slots = timeline_len(begin, end, step)?;
    let tolerance = SLOT_EPSILON * step;

    let mut existing = track.observations().to_vec();
    existing.sort_by(|a, b| match (a.time, b.time) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    let id = track.id().clone();
    let mut merged = Vec::with_capacity(existing.len() + slots);
    let mut rest = existing.into_iter().peekable();
    let mut inserted = 0;

    for k in 0..slots {
        let slot = begin + k as f64 * step;
        let mut matched = false;
        while let Some(obs) = rest.next_if(|o| o.time.is_some_and(|t| t <= slot + tolerance)) {
            matched |= obs.time.is_some_and(|t| (t - slot).abs() <= tolerance);
            merged.push(obs);
        }
        if !matched {
            merged.push(Observation::empty_at(
                id.clone(),
                slot,
                ErrorLabel::Missing.into(),
            ));
            inserted += 1;
        }
    }
    merged.extend(rest);

    track.replace_observations(merged)?;

    let mut report = fill_missing_locations(
        track,
        config.interpolation,
        PassKind::CompleteObservations,
        |o| !o.error.contains(ErrorLabel::Missing),
    );
    report.inserted = inserted;

    debug!(
        slots,
        inserted,
        step,
        unresolved = report.unresolved,
        "observations completed"
    );
    Ok(report)
}

/// Number of slots in `[begin, end]` at `step`
fn timeline_len(begin: f64, end: f64, step: f64) -> Result<usize, ContractError> {
    let steps = ((end - begin) / step + SLOT_EPSILON).floor();
    if !steps.is_finite() || steps >= MAX_TIMELINE_SLOTS as f64 {
        return Err(ContractError::invalid_parameter(
            "step",
            format!("timeline from {begin} to {end} exceeds {MAX_TIMELINE_SLOTS} slots"),
        ));
    }
    Ok(steps as usize + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{CoordinateSystem, ErrorLabels, Step, TimeUnit};

    fn track(rows: &[(Option<f64>, Option<f64>)]) -> Track {
        let observations = rows
            .iter()
            .map(|(t, x)| Observation::new("a", *t, *x, x.map(|v| v * 2.0)))
            .collect();
        Track::new(CoordinateSystem::Planar, TimeUnit::Seconds, observations).unwrap()
    }

    fn regular() -> Track {
        track(&[
            (Some(0.0), Some(0.0)),
            (Some(10.0), Some(1.0)),
            (Some(20.0), Some(2.0)),
            (Some(30.0), Some(3.0)),
        ])
    }

    #[test]
    fn test_complete_track_unchanged() {
        let mut t = regular();
        let before = t.clone();
        let config = CompletionConfig {
            begin: Some(0.0),
            end: Some(30.0),
            ..Default::default()
        };
        let report = complete_missing_observations(&mut t, &config).unwrap();
        assert_eq!(report.inserted, 0);
        assert_eq!(t, before);
    }

    #[test]
    fn test_extended_end_adds_missing_rows() {
        let mut t = regular();
        let config = CompletionConfig {
            begin: Some(0.0),
            end: Some(50.0),
            ..Default::default()
        };
        let report = complete_missing_observations(&mut t, &config).unwrap();

        assert_eq!(report.inserted, 2);
        assert_eq!(t.len(), 6);
        assert_eq!(t.observations()[4].time, Some(40.0));
        assert_eq!(t.observations()[5].time, Some(50.0));
        for obs in &t.observations()[4..] {
            assert_eq!(obs.error, ErrorLabels::from(ErrorLabel::Missing));
            assert!(!obs.has_location());
        }
        assert_eq!(report.unresolved, 2);
    }

    #[test]
    fn test_interior_gap_inserted_and_interpolated() {
        let mut t = track(&[
            (Some(0.0), Some(0.0)),
            (Some(10.0), Some(1.0)),
            (Some(40.0), Some(4.0)),
            (Some(50.0), Some(5.0)),
        ]);
        let report = complete_missing_observations(&mut t, &Default::default()).unwrap();

        assert_eq!(report.inserted, 2);
        assert_eq!(
            t.times(),
            (0..6).map(|k| Some(k as f64 * 10.0)).collect::<Vec<_>>()
        );
        let filled = &t.observations()[2];
        assert_eq!(filled.x, Some(2.0));
        assert_eq!(filled.y, Some(4.0));
        assert_eq!(filled.error, ErrorLabels::from(ErrorLabel::Missing));
    }

    #[test]
    fn test_off_grid_and_untimed_kept() {
        let mut t = track(&[
            (Some(0.0), Some(0.0)),
            (None, Some(9.0)),
            (Some(10.0), Some(1.0)),
            (Some(15.0), Some(1.5)),
            (Some(20.0), None),
        ]);
        let config = CompletionConfig {
            step: Some(Step::new(10.0, TimeUnit::Seconds).unwrap()),
            ..Default::default()
        };
        let report = complete_missing_observations(&mut t, &config).unwrap();

        assert_eq!(report.inserted, 0);
        assert_eq!(
            t.times(),
            vec![Some(0.0), Some(10.0), Some(15.0), Some(20.0), None]
        );
        // pre-existing gap is a locNA case
        assert!(t.observations()[3].error.contains(ErrorLabel::LocNa));
        assert_eq!(report.flagged, 1);
    }

    #[test]
    fn test_step_in_other_unit() {
        let mut t = regular();
        let config = CompletionConfig {
            step: Some(Step::new(5000.0, TimeUnit::Milliseconds).unwrap()),
            ..Default::default()
        };
        let report = complete_missing_observations(&mut t, &config).unwrap();
        assert_eq!(report.inserted, 3);
        assert_eq!(t.len(), 7);
        assert_eq!(t.observations()[1].x, Some(0.5));
    }

    #[test]
    fn test_begin_after_end_rejected() {
        let mut t = regular();
        let config = CompletionConfig {
            begin: Some(40.0),
            end: Some(0.0),
            ..Default::default()
        };
        let err = complete_missing_observations(&mut t, &config).unwrap_err();
        assert!(matches!(err, ContractError::InvalidParameter { .. }));
    }

    #[test]
    fn test_oversized_timeline_rejected() {
        let mut t = regular();
        let config = CompletionConfig {
            end: Some(1e12),
            ..Default::default()
        };
        let err = complete_missing_observations(&mut t, &config).unwrap_err();
        assert!(matches!(err, ContractError::InvalidParameter { .. }));
    }
}
