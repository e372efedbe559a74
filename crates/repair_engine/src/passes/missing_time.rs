//! Missing timestamp interpolation.

use contracts::{ContractError, ErrorLabel, MissingTimestampConfig, PassKind, PassReport, Track};
use tracing::{debug, instrument};

use crate::interpolate::{Anchors, Interpolator};

/// Tag every null timestamp `timeNA` and interpolate it from its position in the sequence.
///
/// Nulls before the first or after the last timed observation stay null but keep the tag.
/// Only observations tagged by this call count as flagged.
#[instrument(
    name = "interpolate_missing_timestamps",
    skip(track, config),
    fields(track_id = %track.id(), observations = track.len())
)]
pub fn interpolate_missing_timestamps(
    track: &mut Track,
    config: &MissingTimestampConfig,
) -> Result<PassReport, ContractError> {
    track.validate()?;
    let mut report = PassReport::new(PassKind::MissingTimestamps);

    let anchors = Anchors::new(
        track
            .observations()
            .iter()
            .enumerate()
            .filter_map(|(i, o)| o.time.map(|t| (i as f64, t))),
    );
    let interpolator = Interpolator::new(config.interpolation, anchors);

    for (i, obs) in track.observations_mut().iter_mut().enumerate() {
        if obs.time.is_some() {
            continue;
        }
        if obs.error.merge(ErrorLabel::TimeNa) {
            report.flagged += 1;
        }

        match interpolator.eval(i as f64) {
            Some(t) => {
                obs.time = Some(t);
                report.corrected += 1;
            }
            None => {
                debug!(index = i, "no bracketing timestamps");
                report.unresolved += 1;
            }
        }
    }

    debug!(
        flagged = report.flagged,
        corrected = report.corrected,
        unresolved = report.unresolved,
        "missing timestamps interpolated"
    );
    Ok(report)
}
