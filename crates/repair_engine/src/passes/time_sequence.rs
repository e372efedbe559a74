//! Timestamp sequence correction.
//!
//! Elapsed time should grow linearly with position in the sequence. A Huber fit of elapsed
//! time against position gives residuals whose square roots are screened with the two-sided
//! `median ± s·IQR` rule; flagged observations are re-timed from their predecessor.

use contracts::{ContractError, ErrorLabel, PassKind, PassReport, TimestampSequenceConfig, Track};
use tracing::{debug, instrument};

use super::{shift_from_predecessor, Shift, TimeIndex};
use crate::modal::step_in_track_unit;
use crate::regression::HuberRegression;
use crate::stats::{OutlierBounds, OutlierRule};

const MIN_TIMESTAMPS: usize = 4;
/// Residuals below this fraction of the elapsed span count as exact zeros
const RESIDUAL_ZERO_TOLERANCE: f64 = 1e-9;

#[instrument(
    name = "correct_timestamp_sequence",
    skip(track, config),
    fields(track_id = %track.id(), observations = track.len())
)]
pub fn correct_timestamp_sequence(
    track: &mut Track,
    config: &TimestampSequenceConfig,
) -> Result<PassReport, ContractError> {
    track.validate()?;
    if !(config.outlier_scale.is_finite() && config.outlier_scale > 0.0) {
        return Err(ContractError::invalid_parameter(
            "outlier_scale",
            format!("must be a positive number, got {}", config.outlier_scale),
        ));
    }

    let mut report = PassReport::new(PassKind::TimestampSequence);
    let flagged = sequence_outliers(track, config.outlier_scale)?;
    if flagged.is_empty() {
        debug!("timestamps consistent with sequence");
        return Ok(report);
    }

    let step = step_in_track_unit(track, config.step)?;
    let observations = track.observations_mut();
    let mut index = TimeIndex::new(observations);

    for i in flagged {
        report.flagged += 1;
        match shift_from_predecessor(observations, i, step, ErrorLabel::TimeSeq, &mut index)? {
            Shift::Resolved => report.corrected += 1,
            Shift::Unresolved => report.unresolved += 1,
        }
    }

    debug!(
        flagged = report.flagged,
        corrected = report.corrected,
        unresolved = report.unresolved,
        "timestamp sequence corrected"
    );
    Ok(report)
}

/// Positions (ascending, never 0) whose timestamps break the linear progression
fn sequence_outliers(track: &Track, scale: f64) -> Result<Vec<usize>, ContractError> {
    let points: Vec<(usize, f64)> = track
        .observations()
        .iter()
        .enumerate()
        .filter_map(|(i, o)| o.time.map(|t| (i, t)))
        .collect();

    if points.len() < MIN_TIMESTAMPS {
        return Err(ContractError::insufficient_data(
            "timestamp sequence correction",
            MIN_TIMESTAMPS,
            points.len(),
        ));
    }

    let origin = points[0].1;
    let x: Vec<f64> = points.iter().map(|(i, _)| *i as f64).collect();
    let elapsed: Vec<f64> = points.iter().map(|(_, t)| t - origin).collect();

    let fit = HuberRegression::default().fit(&x, &elapsed)?;
    let span = elapsed.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    let tolerance = RESIDUAL_ZERO_TOLERANCE * (1.0 + span);

    let transformed: Vec<f64> = fit
        .residuals(&x, &elapsed)
        .into_iter()
        .map(|r| if r.abs() <= tolerance { 0.0 } else { r.abs().sqrt() })
        .collect();

    let Some(bounds) = OutlierBounds::from_values(&transformed, scale) else {
        return Ok(Vec::new());
    };

    Ok(points
        .iter()
        .zip(&transformed)
        .filter(|((i, _), z)| *i > 0 && bounds.is_outlier(**z, OutlierRule::TwoSided))
        .map(|((i, _), _)| *i)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{CoordinateSystem, Observation, Step, TimeUnit};

    fn track(times: &[Option<f64>]) -> Track {
        let observations = times
            .iter()
            .map(|t| Observation::new("a", *t, Some(0.0), Some(0.0)))
            .collect();
        Track::new(CoordinateSystem::Planar, TimeUnit::Seconds, observations).unwrap()
    }

    fn jittered(n: usize) -> Vec<Option<f64>> {
        (0..n)
            .map(|i| {
                let noise = ((i * 7919) % 101) as f64 / 101.0 - 0.5;
                Some(10.0 * i as f64 + noise)
            })
            .collect()
    }

    #[test]
    fn test_single_corrupted_timestamp_retimed() {
        let mut times: Vec<Option<f64>> = (0..10).map(|i| Some(10.0 * i as f64)).collect();
        times[4] = Some(500.0);
        let mut t = track(&times);

        let report = correct_timestamp_sequence(&mut t, &Default::default()).unwrap();
        assert_eq!((report.flagged, report.corrected), (1, 1));
        assert_eq!(t.observations()[4].time, Some(40.0));
        assert!(t.observations()[4].error.contains(ErrorLabel::TimeSeq));
        assert!(t.observations().iter().enumerate().all(|(i, o)| i == 4 || o.error.is_ok()));
    }

    #[test]
    fn test_regular_clock_not_flagged() {
        let times: Vec<Option<f64>> = (0..50).map(|i| Some(0.1 * i as f64)).collect();
        let mut t = track(&times);
        let report = correct_timestamp_sequence(&mut t, &Default::default()).unwrap();
        assert_eq!(report.flagged, 0);
    }

    #[test]
    fn test_jittered_clock_flags_only_jump() {
        let mut t = track(&jittered(40));
        let clean = correct_timestamp_sequence(&mut t, &Default::default()).unwrap();
        assert_eq!(clean.flagged, 0);

        let mut times = jittered(40);
        times[20] = times[20].map(|v| v - 60.0);
        let mut t = track(&times);
        let report = correct_timestamp_sequence(&mut t, &Default::default()).unwrap();
        assert_eq!(report.flagged, 1);
        assert!(t.observations()[20].error.contains(ErrorLabel::TimeSeq));
    }

    #[test]
    fn test_collision_nulls_and_withdraws_label() {
        // with a 20 s step the candidate for 4 is 50, already held by 5
        let mut times: Vec<Option<f64>> = (0..10).map(|i| Some(10.0 * i as f64)).collect();
        times[4] = Some(500.0);
        let mut t = track(&times);
        let config = TimestampSequenceConfig {
            step: Some(Step::new(20.0, TimeUnit::Seconds).unwrap()),
            ..Default::default()
        };

        let report = correct_timestamp_sequence(&mut t, &config).unwrap();
        assert_eq!((report.flagged, report.unresolved), (1, 1));
        assert_eq!(t.observations()[4].time, None);
        assert!(t.observations()[4].error.is_ok());
    }

    #[test]
    fn test_too_few_timestamps() {
        let mut t = track(&[Some(0.0), None, Some(1.0), Some(2.0)]);
        let err = correct_timestamp_sequence(&mut t, &Default::default()).unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_rejects_non_positive_scale() {
        let mut t = track(&jittered(10));
        let config = TimestampSequenceConfig {
            outlier_scale: 0.0,
            ..Default::default()
        };
        let err = correct_timestamp_sequence(&mut t, &config).unwrap_err();
        assert!(matches!(err, ContractError::InvalidParameter { .. }));
    }
}
