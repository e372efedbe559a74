//! Duplicate timestamp resolution.

use std::collections::HashSet;

use contracts::{
    ContractError, DuplicateTimestampConfig, ErrorLabel, PassKind, PassReport, Track,
};
use ordered_float::OrderedFloat;
use tracing::{debug, instrument};

use super::{shift_from_predecessor, Shift, TimeIndex};
use crate::modal::step_in_track_unit;

/// Re-time every repeated timestamp to `predecessor + step`.
///
/// The first occurrence of a time (in sequence order) is kept; later ones are tagged
/// `timeDUP`. A duplicate whose candidate time is already taken, or whose predecessor
/// has no time, is nulled and its `timeDUP` withdrawn.
#[instrument(
    name = "resolve_duplicate_timestamps",
    skip(track, config),
    fields(track_id = %track.id(), observations = track.len())
)]
pub fn resolve_duplicate_timestamps(
    track: &mut Track,
    config: &DuplicateTimestampConfig,
) -> Result<PassReport, ContractError> {
    track.validate()?;
    let mut report = PassReport::new(PassKind::DuplicateTimestamps);

    let mut seen = HashSet::new();
    let duplicates: Vec<usize> = track
        .observations()
        .iter()
        .enumerate()
        .filter_map(|(i, o)| {
            let t = o.time?;
            (!seen.insert(OrderedFloat(t))).then_some(i)
        })
        .collect();

    if duplicates.is_empty() {
        debug!("no duplicate timestamps");
        return Ok(report);
    }

    let step = step_in_track_unit(track, config.step)?;
    let observations = track.observations_mut();
    let mut index = TimeIndex::new(observations);

    for i in duplicates {
        report.flagged += 1;
        match shift_from_predecessor(observations, i, step, ErrorLabel::TimeDup, &mut index)? {
            Shift::Resolved => report.corrected += 1,
            Shift::Unresolved => report.unresolved += 1,
        }
    }

    debug!(
        flagged = report.flagged,
        corrected = report.corrected,
        unresolved = report.unresolved,
        step,
        "duplicate timestamps resolved"
    );
    Ok(report)
}
