//! Repair reports - engine output alongside the repaired track

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TrackId;

/// The six repair passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassKind {
    DuplicateTimestamps,
    TimestampSequence,
    MissingTimestamps,
    LocationSequence,
    MissingLocations,
    CompleteObservations,
}

impl PassKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PassKind::DuplicateTimestamps => "duplicate_timestamps",
            PassKind::TimestampSequence => "timestamp_sequence",
            PassKind::MissingTimestamps => "missing_timestamps",
            PassKind::LocationSequence => "location_sequence",
            PassKind::MissingLocations => "missing_locations",
            PassKind::CompleteObservations => "complete_observations",
        }
    }
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one pass over one track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassReport {
    pub pass: PassKind,
    /// Observations detected as defective by this pass
    pub flagged: usize,
    /// Flagged observations that received a repaired value
    pub corrected: usize,
    /// Flagged observations left null
    pub unresolved: usize,
    /// Rows added (re-gridding only)
    pub inserted: usize,
}

impl PassReport {
    pub fn new(pass: PassKind) -> Self {
        Self {
            pass,
            flagged: 0,
            corrected: 0,
            unresolved: 0,
            inserted: 0,
        }
    }
}

/// All pass outcomes for one track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairReport {
    pub track_id: TrackId,
    pub observations_in: usize,
    pub observations_out: usize,
    pub passes: Vec<PassReport>,
}

impl RepairReport {
    pub fn total_flagged(&self) -> usize {
        self.passes.iter().map(|p| p.flagged).sum()
    }

    pub fn total_unresolved(&self) -> usize {
        self.passes.iter().map(|p| p.unresolved).sum()
    }
}
