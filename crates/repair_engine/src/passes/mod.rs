//! Repair passes. Each pass mutates one track in place and reports what it did.

mod completion;
mod duplicates;
mod location_sequence;
mod missing_location;
mod missing_time;
mod time_sequence;

use std::collections::HashMap;

use contracts::{ContractError, ErrorLabel, Observation};
use ordered_float::OrderedFloat;
use tracing::debug;

pub use completion::complete_missing_observations;
pub use duplicates::resolve_duplicate_timestamps;
pub use location_sequence::correct_location_sequence;
pub use missing_location::interpolate_missing_locations;
pub use missing_time::interpolate_missing_timestamps;
pub use time_sequence::correct_timestamp_sequence;

pub(crate) use missing_location::fill_missing_locations;

/// Multiset of the current non-null timestamps
#[derive(Debug, Default)]
pub(crate) struct TimeIndex {
    counts: HashMap<OrderedFloat<f64>, usize>,
}

impl TimeIndex {
    pub(crate) fn new(observations: &[Observation]) -> Self {
        let mut index = Self::default();
        for t in observations.iter().filter_map(|o| o.time) {
            index.insert(t);
        }
        index
    }

    fn insert(&mut self, t: f64) {
        *self.counts.entry(OrderedFloat(t)).or_insert(0) += 1;
    }

    fn remove(&mut self, t: f64) {
        if let Some(count) = self.counts.get_mut(&OrderedFloat(t)) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(&OrderedFloat(t));
            }
        }
    }

    /// Whether `t` is held by an observation other than the one currently at `own`
    pub(crate) fn held_elsewhere(&self, t: f64, own: Option<f64>) -> bool {
        let count = self.counts.get(&OrderedFloat(t)).copied().unwrap_or(0);
        let mine = usize::from(own == Some(t));
        count > mine
    }

    pub(crate) fn update(&mut self, old: Option<f64>, new: Option<f64>) {
        if let Some(t) = old {
            self.remove(t);
        }
        if let Some(t) = new {
            self.insert(t);
        }
    }
}

/// Outcome of re-timing one flagged observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shift {
    Resolved,
    Unresolved,
}

/// Tag observation `i` with `label` and move it to `predecessor time + step`.
///
/// When the predecessor has no time, or the candidate is already held by another
/// observation, the time is nulled instead and `label` is withdrawn if this call added it.
pub(crate) fn shift_from_predecessor(
    observations: &mut [Observation],
    i: usize,
    step: f64,
    label: ErrorLabel,
    index: &mut TimeIndex,
) -> Result<Shift, ContractError> {
    if i == 0 || i >= observations.len() {
        return Err(ContractError::invalid_parameter(
            "index",
            format!("observation {i} has no predecessor"),
        ));
    }

    let newly_tagged = observations[i].error.merge(label);
    let own = observations[i].time;
    let candidate = observations[i - 1]
        .time
        .map(|t| t + step)
        .filter(|c| c.is_finite() && !index.held_elsewhere(*c, own));

    match candidate {
        Some(t) => {
            index.update(own, Some(t));
            observations[i].time = Some(t);
            Ok(Shift::Resolved)
        }
        None => {
            debug!(index = i, label = %label, "timestamp left unresolved");
            index.update(own, None);
            observations[i].time = None;
            if newly_tagged {
                observations[i].error.downgrade(label);
            }
            Ok(Shift::Unresolved)
        }
    }
}
