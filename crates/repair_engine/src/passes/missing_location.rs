//! Missing location interpolation.

use contracts::{
    Axis, ContractError, ErrorLabel, InterpolationMethod, MissingLocationConfig, Observation,
    PassKind, PassReport, Track,
};
use tracing::{debug, instrument};

use crate::interpolate::{Anchors, Interpolator};

/// Treat a fix missing either axis as missing both, tag it `locNA` and interpolate both
/// coordinates against time.
///
/// Re-gridded `MISSING` rows are filled but not tagged.
#[instrument(
    name = "interpolate_missing_locations",
    skip(track, config),
    fields(track_id = %track.id(), observations = track.len())
)]
pub fn interpolate_missing_locations(
    track: &mut Track,
    config: &MissingLocationConfig,
) -> Result<PassReport, ContractError> {
    track.validate()?;
    let report = fill_missing_locations(
        track,
        config.interpolation,
        PassKind::MissingLocations,
        |o| !o.error.contains(ErrorLabel::Missing),
    );
    debug!(
        flagged = report.flagged,
        corrected = report.corrected,
        unresolved = report.unresolved,
        "missing locations interpolated"
    );
    Ok(report)
}

/// Shared by the missing-location pass and re-gridding.
///
/// Every observation without a full position is nulled on both axes; those accepted by
/// `should_tag` get `locNA` and count as flagged when the tag is new. Positions are then
/// interpolated against time from the fully located observations. Observations without a
/// time, or outside the anchor range, stay null.
pub(crate) fn fill_missing_locations(
    track: &mut Track,
    method: InterpolationMethod,
    pass: PassKind,
    should_tag: impl Fn(&Observation) -> bool,
) -> PassReport {
    let mut report = PassReport::new(pass);
    let observations = track.observations_mut();

    let targets: Vec<usize> = observations
        .iter()
        .enumerate()
        .filter(|(_, o)| !o.has_location())
        .map(|(i, _)| i)
        .collect();
    if targets.is_empty() {
        return report;
    }

    for &i in &targets {
        let obs = &mut observations[i];
        obs.clear_location();
        if should_tag(obs) && obs.error.merge(ErrorLabel::LocNa) {
            report.flagged += 1;
        }
    }

    let [fx, fy] = Axis::BOTH.map(|axis| axis_interpolator(observations, axis, method));
    for i in targets {
        let obs = &mut observations[i];
        let filled = obs
            .time
            .and_then(|t| Some((fx.eval(t)?, fy.eval(t)?)));
        match filled {
            Some((x, y)) => {
                obs.x = Some(x);
                obs.y = Some(y);
                report.corrected += 1;
            }
            None => {
                debug!(index = i, time = ?obs.time, "no bracketing locations");
                report.unresolved += 1;
            }
        }
    }
    report
}

/// Interpolator of one axis against time over the located, timed observations
pub(crate) fn axis_interpolator(
    observations: &[Observation],
    axis: Axis,
    method: InterpolationMethod,
) -> Interpolator {
    let anchors = Anchors::new(
        observations
            .iter()
            .filter(|o| o.has_location())
            .filter_map(|o| Some((o.time?, o.coord(axis)?))),
    );
    Interpolator::new(method, anchors)
}
