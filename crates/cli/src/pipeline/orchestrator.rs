//! Batch orchestrator - repairs many tracks concurrently.
//!
//! Each track is repaired on a blocking worker; a semaphore bounds how many run at once.
//! Tracks come back in input order whether or not their repair succeeded.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use contracts::{ContractError, RepairReport, Track};
use repair_engine::RepairEngine;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::PipelineStats;

/// Batch repair pipeline
pub struct Pipeline {
    engine: Arc<RepairEngine>,
    max_concurrent: usize,
}

/// What a worker hands back for one track
struct TrackOutcome {
    index: usize,
    track: Track,
    result: Result<RepairReport, ContractError>,
}

impl Pipeline {
    pub fn new(engine: RepairEngine, max_concurrent: usize) -> Self {
        Self {
            engine: Arc::new(engine),
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Repair every track.
    ///
    /// A track whose repair fails is returned with its original observations and
    /// counted in the stats; only infrastructure failures (a panicked worker) abort the run.
    pub async fn run(&self, tracks: Vec<Track>) -> Result<(Vec<Track>, PipelineStats)> {
        let start = Instant::now();
        let mut stats = PipelineStats {
            tracks_total: tracks.len(),
            observations_in: tracks.iter().map(Track::len).sum(),
            ..Default::default()
        };

        info!(
            tracks = stats.tracks_total,
            passes = self.engine.passes().len(),
            max_concurrent = self.max_concurrent,
            "Starting batch repair"
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut workers = JoinSet::new();

        for (index, track) in tracks.into_iter().enumerate() {
            let engine = Arc::clone(&self.engine);
            let semaphore = Arc::clone(&semaphore);

            workers.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .context("Repair semaphore closed")?;

                tokio::task::spawn_blocking(move || {
                    let mut working = track.clone();
                    match engine.run(&mut working) {
                        Ok(report) => TrackOutcome {
                            index,
                            track: working,
                            result: Ok(report),
                        },
                        Err(e) => TrackOutcome {
                            index,
                            track,
                            result: Err(e),
                        },
                    }
                })
                .await
                .context("Repair worker panicked")
            });
        }

        let mut slots: Vec<Option<Track>> = Vec::new();
        slots.resize_with(stats.tracks_total, || None);

        while let Some(joined) = workers.join_next().await {
            let outcome = joined.context("Repair task failed")??;

            match outcome.result {
                Ok(report) => {
                    debug!(
                        track_id = %report.track_id,
                        flagged = report.total_flagged(),
                        "track repaired"
                    );
                    observability::record_track_repaired(&report);
                    stats.metrics.update(&report);
                    stats.tracks_repaired += 1;
                }
                Err(e) => {
                    warn!(track_id = %outcome.track.id(), error = %e, "track left unrepaired");
                    observability::record_track_failed();
                    stats.metrics.record_failure();
                    stats
                        .failures
                        .push((outcome.track.id().to_string(), e.to_string()));
                    stats.tracks_failed += 1;
                }
            }
            slots[outcome.index] = Some(outcome.track);
        }

        let repaired: Vec<Track> = slots.into_iter().flatten().collect();
        stats.observations_out = repaired.iter().map(Track::len).sum();
        stats.duration = start.elapsed();

        info!(
            repaired = stats.tracks_repaired,
            failed = stats.tracks_failed,
            duration_secs = stats.duration.as_secs_f64(),
            "Batch repair finished"
        );

        Ok((repaired, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{CoordinateSystem, ErrorLabel, Observation, PassConfig, PassKind, TimeUnit};

    fn track(id: &str, times: &[f64]) -> Track {
        let observations = times
            .iter()
            .map(|t| Observation::new(id, Some(*t), Some(*t), Some(0.0)))
            .collect();
        Track::new(CoordinateSystem::Planar, TimeUnit::Seconds, observations).unwrap()
    }

    #[tokio::test]
    async fn test_batch_keeps_order_and_isolates_failures() {
        let engine = RepairEngine::new(vec![
            PassConfig::default_for(PassKind::DuplicateTimestamps),
            PassConfig::default_for(PassKind::TimestampSequence),
        ]);
        let pipeline = Pipeline::new(engine, 2);

        let tracks = vec![
            track("a", &[0.0, 10.0, 10.0, 30.0, 40.0, 50.0]),
            // too short for the sequence pass
            track("b", &[0.0, 10.0, 10.0]),
            track("c", &[0.0, 10.0, 20.0, 30.0, 40.0]),
        ];

        let (repaired, stats) = pipeline.run(tracks).await.unwrap();

        let ids: Vec<&str> = repaired.iter().map(|t| t.id().as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(stats.tracks_repaired, 2);
        assert_eq!(stats.tracks_failed, 1);
        assert_eq!(stats.failures[0].0, "b");

        assert_eq!(repaired[0].observations()[2].time, Some(20.0));
        assert!(repaired[0].observations()[2].error.contains(ErrorLabel::TimeDup));

        // the failed track comes back as it went in, without the duplicate fix
        assert_eq!(repaired[1].observations()[2].time, Some(10.0));
        assert!(repaired[1].observations()[2].error.is_ok());
        assert_eq!(stats.observations_in, stats.observations_out);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let pipeline = Pipeline::new(RepairEngine::new(Vec::new()), 4);
        let (repaired, stats) = pipeline.run(Vec::new()).await.unwrap();
        assert!(repaired.is_empty());
        assert_eq!(stats.tracks_total, 0);
    }
}
