//! Track - the ordered observations of one trajectory
//!
//! Invariants held by every `Track` value:
//! - at least one observation
//! - a single `TrackId` across all observations
//! - one coordinate convention and one time unit for the whole track
//!
//! Observations are reachable mutably (repair passes rewrite fields in place), so the id
//! invariant is re-checked with [`Track::validate`] at the start of every pass.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{ContractError, ErrorLabel, Observation, TimeUnit, TrackId};

/// Coordinate convention of a track
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSystem {
    /// Planar x / y
    #[default]
    Planar,
    /// Geographic longitude / latitude
    Geographic,
}

/// Ordered observations of a single trajectory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTrack")]
pub struct Track {
    coordinates: CoordinateSystem,
    time_unit: TimeUnit,
    observations: Vec<Observation>,
}

#[derive(Deserialize)]
struct RawTrack {
    #[serde(default)]
    coordinates: CoordinateSystem,
    #[serde(default)]
    time_unit: TimeUnit,
    observations: Vec<Observation>,
}

impl TryFrom<RawTrack> for Track {
    type Error = ContractError;

    fn try_from(raw: RawTrack) -> Result<Self, Self::Error> {
        Track::new(raw.coordinates, raw.time_unit, raw.observations)
    }
}

impl Track {
    /// Build a track, checking the single-id and non-empty invariants.
    pub fn new(
        coordinates: CoordinateSystem,
        time_unit: TimeUnit,
        observations: Vec<Observation>,
    ) -> Result<Self, ContractError> {
        let track = Self {
            coordinates,
            time_unit,
            observations,
        };
        track.validate()?;
        Ok(track)
    }

    /// Split a multi-id observation list into one track per id.
    ///
    /// Tracks come out in first-seen id order; each keeps its observations in input order.
    pub fn group_by_id(
        coordinates: CoordinateSystem,
        time_unit: TimeUnit,
        observations: Vec<Observation>,
    ) -> Result<Vec<Self>, ContractError> {
        let mut order: Vec<TrackId> = Vec::new();
        let mut groups: std::collections::HashMap<TrackId, Vec<Observation>> =
            std::collections::HashMap::new();

        for obs in observations {
            if !groups.contains_key(&obs.id) {
                order.push(obs.id.clone());
            }
            groups.entry(obs.id.clone()).or_default().push(obs);
        }

        order
            .into_iter()
            .filter_map(|id| groups.remove(&id))
            .map(|group| Self::new(coordinates, time_unit, group))
            .collect()
    }

    /// Check the track invariants against the current observations.
    pub fn validate(&self) -> Result<(), ContractError> {
        let first = self.observations.first().ok_or(ContractError::EmptyTrack)?;

        let mut ids: Vec<&TrackId> = vec![&first.id];
        for obs in &self.observations[1..] {
            if !ids.contains(&&obs.id) {
                ids.push(&obs.id);
            }
        }

        if ids.len() > 1 {
            return Err(ContractError::MultipleTrackIds {
                count: ids.len(),
                ids: ids.iter().map(|id| id.to_string()).collect(),
            });
        }
        Ok(())
    }

    pub fn id(&self) -> &TrackId {
        // Non-empty by construction; `replace_observations` re-validates.
        &self.observations[0].id
    }

    pub fn coordinates(&self) -> CoordinateSystem {
        self.coordinates
    }

    pub fn time_unit(&self) -> TimeUnit {
        self.time_unit
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Mutable access to the observations; the count cannot change through this handle.
    pub fn observations_mut(&mut self) -> &mut [Observation] {
        &mut self.observations
    }

    /// Swap in a new observation list (used when re-gridding adds rows).
    ///
    /// On failure the track is left unchanged.
    pub fn replace_observations(
        &mut self,
        observations: Vec<Observation>,
    ) -> Result<(), ContractError> {
        let previous = std::mem::replace(&mut self.observations, observations);
        if let Err(e) = self.validate() {
            self.observations = previous;
            return Err(e);
        }
        Ok(())
    }

    pub fn into_observations(self) -> Vec<Observation> {
        self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Timestamp column, nulls included
    pub fn times(&self) -> Vec<Option<f64>> {
        self.observations.iter().map(|o| o.time).collect()
    }

    /// Non-null timestamps in sequence order
    pub fn time_values(&self) -> Vec<f64> {
        self.observations.iter().filter_map(|o| o.time).collect()
    }

    /// Earliest and latest non-null timestamp
    pub fn time_range(&self) -> Option<(f64, f64)> {
        self.observations
            .iter()
            .filter_map(|o| o.time)
            .fold(None, |acc, t| match acc {
                None => Some((t, t)),
                Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
            })
    }

    pub fn null_time_count(&self) -> usize {
        self.observations.iter().filter(|o| o.time.is_none()).count()
    }

    /// Observations missing at least one axis
    pub fn null_location_count(&self) -> usize {
        self.observations
            .iter()
            .filter(|o| !o.has_location())
            .count()
    }

    /// Number of observations carrying each label, plus the `OK` count
    pub fn label_counts(&self) -> (usize, BTreeMap<ErrorLabel, usize>) {
        let mut ok = 0;
        let mut counts = BTreeMap::new();
        for obs in &self.observations {
            if obs.error.is_ok() {
                ok += 1;
            }
            for label in obs.error.iter() {
                *counts.entry(label).or_insert(0) += 1;
            }
        }
        (ok, counts)
    }
}
