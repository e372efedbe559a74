//! Location sequence correction.
//!
//! Each axis is smoothed against time with a local quadratic fit, refitted once with weights
//! inversely proportional to the first-round residuals, and screened with the one-sided
//! `median + s·IQR` rule on the square-rooted residuals. Fixes flagged on either axis are
//! replaced by interpolation from the remaining ones.

use std::collections::BTreeSet;

use contracts::{
    Axis, ContractError, ErrorLabel, LocationSequenceConfig, PassKind, PassReport, Track,
};
use tracing::{debug, instrument};

use super::missing_location::axis_interpolator;
use crate::local_fit::LocalQuadratic;
use crate::stats::{OutlierBounds, OutlierRule};

const MIN_LOCATED: usize = 4;
const MIN_LOCAL_POINTS: usize = 4;

#[instrument(
    name = "correct_location_sequence",
    skip(track, config),
    fields(track_id = %track.id(), observations = track.len())
)]
pub fn correct_location_sequence(
    track: &mut Track,
    config: &LocationSequenceConfig,
) -> Result<PassReport, ContractError> {
    track.validate()?;
    check_config(config)?;

    let mut report = PassReport::new(PassKind::LocationSequence);
    let flagged = location_outliers(track, config)?;
    report.flagged = flagged.len();
    if flagged.is_empty() {
        debug!("locations consistent with local path");
        return Ok(report);
    }

    let observations = track.observations_mut();
    let mut newly_tagged = Vec::with_capacity(flagged.len());
    for &i in &flagged {
        observations[i].clear_location();
        newly_tagged.push(observations[i].error.merge(ErrorLabel::LocSeq));
    }

    let [fx, fy] =
        Axis::BOTH.map(|axis| axis_interpolator(observations, axis, config.interpolation));
    for (i, newly) in flagged.into_iter().zip(newly_tagged) {
        let obs = &mut observations[i];
        let filled = obs.time.and_then(|t| Some((fx.eval(t)?, fy.eval(t)?)));
        match filled {
            Some((x, y)) => {
                obs.x = Some(x);
                obs.y = Some(y);
                report.corrected += 1;
            }
            None => {
                debug!(index = i, "location outlier without bracketing anchors");
                if newly {
                    obs.error.downgrade(ErrorLabel::LocSeq);
                }
                report.unresolved += 1;
            }
        }
    }

    debug!(
        flagged = report.flagged,
        corrected = report.corrected,
        unresolved = report.unresolved,
        "location sequence corrected"
    );
    Ok(report)
}

fn check_config(config: &LocationSequenceConfig) -> Result<(), ContractError> {
    if !(config.outlier_scale.is_finite() && config.outlier_scale > 0.0) {
        return Err(ContractError::invalid_parameter(
            "outlier_scale",
            format!("must be a positive number, got {}", config.outlier_scale),
        ));
    }
    if !(config.local_fit_span > 0.0 && config.local_fit_span <= 1.0) {
        return Err(ContractError::invalid_parameter(
            "local_fit_span",
            format!("must be in (0, 1], got {}", config.local_fit_span),
        ));
    }
    if config.local_fit_min_points < MIN_LOCAL_POINTS {
        return Err(ContractError::invalid_parameter(
            "local_fit_min_points",
            format!(
                "must be at least {MIN_LOCAL_POINTS}, got {}",
                config.local_fit_min_points
            ),
        ));
    }
    Ok(())
}

/// Observation indices flagged on either axis
fn location_outliers(
    track: &Track,
    config: &LocationSequenceConfig,
) -> Result<BTreeSet<usize>, ContractError> {
    let located: Vec<usize> = track
        .observations()
        .iter()
        .enumerate()
        .filter(|(_, o)| o.time.is_some() && o.has_location())
        .map(|(i, _)| i)
        .collect();

    if located.len() < MIN_LOCATED {
        return Err(ContractError::insufficient_data(
            "location sequence correction",
            MIN_LOCATED,
            located.len(),
        ));
    }

    let observations = track.observations();
    let times: Vec<f64> = located
        .iter()
        .filter_map(|&i| observations[i].time)
        .collect();
    let smoother = LocalQuadratic::new(config.local_fit_span, config.local_fit_min_points);

    let mut flagged = BTreeSet::new();
    for axis in Axis::BOTH {
        let values: Vec<f64> = located
            .iter()
            .filter_map(|&i| observations[i].coord(axis))
            .collect();

        let first = smoother.fit(&times, &values, &vec![1.0; values.len()])?;
        let weights = inverse_residual_weights(&values, &first);
        let second = smoother.fit(&times, &values, &weights)?;

        let transformed: Vec<f64> = values
            .iter()
            .zip(&second)
            .map(|(v, f)| (v - f).abs().sqrt())
            .collect();
        let Some(bounds) = OutlierBounds::from_values(&transformed, config.outlier_scale) else {
            continue;
        };

        let before = flagged.len();
        flagged.extend(
            located
                .iter()
                .zip(&transformed)
                .filter(|(_, z)| bounds.is_outlier(**z, OutlierRule::UpperOnly))
                .map(|(i, _)| *i),
        );
        debug!(axis = ?axis, flagged = flagged.len() - before, "axis screened");
    }
    Ok(flagged)
}

/// `1 / |residual|`, exact zeros replaced by the smallest non-zero residual
fn inverse_residual_weights(values: &[f64], fitted: &[f64]) -> Vec<f64> {
    let residuals: Vec<f64> = values.iter().zip(fitted).map(|(v, f)| (v - f).abs()).collect();
    let floor = residuals
        .iter()
        .copied()
        .filter(|r| *r > 0.0)
        .fold(f64::INFINITY, f64::min);

    if !floor.is_finite() {
        return vec![1.0; residuals.len()];
    }
    residuals
        .into_iter()
        .map(|r| 1.0 / if r > 0.0 { r } else { floor })
        .collect()
}
