//! `run` command implementation.

use anyhow::{Context, Result};
use contracts::RepairBlueprint;
use repair_engine::RepairEngine;
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::pipeline::Pipeline;
use crate::track_io::{self, TrackFile};

/// Execute the `run` command
pub async fn run_repair(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    let mut blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if let Some(max_concurrent) = args.max_concurrent {
        info!(max_concurrent, "Overriding max_concurrent_tracks from CLI");
        blueprint.batch.max_concurrent_tracks = max_concurrent;
        config_loader::ConfigLoader::validate(&blueprint)
            .context("Invalid --max-concurrent override")?;
    }

    let file = track_io::read_track_file(&args.input)?;
    let (time_unit, coordinates) = (file.time_unit, file.coordinates);
    let tracks = file
        .into_tracks()
        .with_context(|| format!("Invalid tracks in {}", args.input.display()))?;

    info!(
        passes = blueprint.passes.len(),
        tracks = tracks.len(),
        time_unit = %time_unit.symbol(),
        "Configuration and tracks loaded"
    );

    if args.dry_run {
        info!("Dry run mode - configuration and input are valid, exiting");
        print_plan(&blueprint, tracks.len());
        return Ok(());
    }

    if args.metrics_port != 0 {
        observability::serve_metrics(args.metrics_port)?;
    }

    let pipeline = Pipeline::new(
        RepairEngine::from_blueprint(&blueprint),
        blueprint.batch.max_concurrent_tracks,
    );

    let (repaired, stats) = tokio::select! {
        result = pipeline.run(tracks) => result.context("Batch repair failed")?,
        _ = shutdown_signal() => {
            warn!("Received shutdown signal, no output written");
            anyhow::bail!("Interrupted");
        }
    };

    let output = TrackFile::from_tracks(time_unit, coordinates, repaired);
    track_io::write_track_file(&output, args.output.as_deref())?;
    if let Some(ref path) = args.output {
        info!(path = %path.display(), "Repaired tracks written");
    }

    stats.print_summary();

    if stats.tracks_failed > 0 {
        return Err(CliError::TracksFailed {
            failed: stats.tracks_failed,
            total: stats.tracks_total,
        }
        .into());
    }
    Ok(())
}

/// Resolve on Ctrl+C; never resolves if the handler cannot be installed
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}

/// Print the repair plan for dry-run mode
fn print_plan(blueprint: &RepairBlueprint, tracks: usize) {
    println!("\n=== Repair Plan ===\n");
    println!("Tracks: {}", tracks);
    println!(
        "Max concurrent tracks: {}",
        blueprint.batch.max_concurrent_tracks
    );
    println!("\nPasses ({}):", blueprint.passes.len());
    for (i, pass) in blueprint.passes.iter().enumerate() {
        println!("  {}. {}", i + 1, pass.kind());
    }
    println!();
}
