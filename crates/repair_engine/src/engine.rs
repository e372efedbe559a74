//! Repair engine: an ordered list of passes applied to one track at a time.

use contracts::{ContractError, PassConfig, PassReport, RepairBlueprint, RepairReport, Track};
use tracing::{debug, instrument, warn};

use crate::passes::{
    complete_missing_observations, correct_location_sequence, correct_timestamp_sequence,
    interpolate_missing_locations, interpolate_missing_timestamps, resolve_duplicate_timestamps,
};

/// Configured repair pipeline
///
/// The engine holds no per-track state; one instance can repair any number of tracks,
/// including from several threads at once.
#[derive(Debug, Clone)]
pub struct RepairEngine {
    passes: Vec<PassConfig>,
}

impl RepairEngine {
    pub fn new(passes: Vec<PassConfig>) -> Self {
        Self { passes }
    }

    pub fn from_blueprint(blueprint: &RepairBlueprint) -> Self {
        Self::new(blueprint.passes.clone())
    }

    pub fn passes(&self) -> &[PassConfig] {
        &self.passes
    }

    /// Apply every pass in order.
    ///
    /// Stops at the first failing pass; the track keeps the changes made by the
    /// passes that completed before it.
    #[instrument(
        name = "repair_track",
        skip(self, track),
        fields(track_id = %track.id(), observations = track.len())
    )]
    pub fn run(&self, track: &mut Track) -> Result<RepairReport, ContractError> {
        let observations_in = track.len();
        let mut passes = Vec::with_capacity(self.passes.len());

        for config in &self.passes {
            match apply_pass(config, track) {
                Ok(report) => {
                    observability::record_pass_report(&report);
                    passes.push(report);
                }
                Err(e) => {
                    if e.is_insufficient_data() {
                        warn!(pass = %config.kind(), error = %e, "pass skipped track");
                    }
                    return Err(e);
                }
            }
        }

        let report = RepairReport {
            track_id: track.id().clone(),
            observations_in,
            observations_out: track.len(),
            passes,
        };
        debug!(
            flagged = report.total_flagged(),
            unresolved = report.total_unresolved(),
            observations_out = report.observations_out,
            "track repaired"
        );
        Ok(report)
    }
}

/// Run a single configured pass.
pub fn apply_pass(config: &PassConfig, track: &mut Track) -> Result<PassReport, ContractError> {
    match config {
        PassConfig::DuplicateTimestamps(c) => resolve_duplicate_timestamps(track, c),
        PassConfig::TimestampSequence(c) => correct_timestamp_sequence(track, c),
        PassConfig::MissingTimestamps(c) => interpolate_missing_timestamps(track, c),
        PassConfig::LocationSequence(c) => correct_location_sequence(track, c),
        PassConfig::MissingLocations(c) => interpolate_missing_locations(track, c),
        PassConfig::CompleteObservations(c) => complete_missing_observations(track, c),
    }
}
