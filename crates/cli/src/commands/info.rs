//! `info` command implementation.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use contracts::Track;
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::track_io;

/// Track file info for JSON output
#[derive(Serialize)]
struct FileInfo {
    time_unit: String,
    coordinates: String,
    tracks: Vec<TrackInfo>,
}

#[derive(Serialize)]
struct TrackInfo {
    id: String,
    observations: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_range: Option<(f64, f64)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    modal_step: Option<String>,
    null_times: usize,
    null_locations: usize,
    ok: usize,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    labels: BTreeMap<String, usize>,
}

impl TrackInfo {
    fn from_track(track: &Track) -> Self {
        let (ok, labels) = track.label_counts();
        Self {
            id: track.id().to_string(),
            observations: track.len(),
            time_range: track.time_range(),
            // fewer than two increasing timestamps have no step
            modal_step: repair_engine::track_modal_step(track)
                .ok()
                .map(|s| s.to_string()),
            null_times: track.null_time_count(),
            null_locations: track.null_location_count(),
            ok,
            labels: labels
                .into_iter()
                .map(|(label, count)| (label.to_string(), count))
                .collect(),
        }
    }
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(input = %args.input.display(), "Loading track file");

    let file = track_io::read_track_file(&args.input)?;
    let (time_unit, coordinates) = (file.time_unit, file.coordinates);
    let tracks = file
        .into_tracks()
        .with_context(|| format!("Invalid tracks in {}", args.input.display()))?;

    let info = FileInfo {
        time_unit: time_unit.symbol().to_string(),
        coordinates: format!("{:?}", coordinates).to_lowercase(),
        tracks: tracks.iter().map(TrackInfo::from_track).collect(),
    };

    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize track info")?;
        println!("{}", json);
    } else {
        print_info(&info);
    }

    Ok(())
}

fn print_info(info: &FileInfo) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                      Track File Summary                      ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("📍 File");
    println!("   ├─ Time unit: {}", info.time_unit);
    println!("   ├─ Coordinates: {}", info.coordinates);
    println!("   └─ Tracks: {}", info.tracks.len());

    println!("\n🧭 Tracks ({})", info.tracks.len());
    for (i, track) in info.tracks.iter().enumerate() {
        let is_last = i == info.tracks.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        let child = if is_last { "   " } else { "│  " };

        println!("   {} {} ({} observations)", prefix, track.id, track.observations);
        match track.time_range {
            Some((begin, end)) => println!("   {}  ├─ Time range: {} .. {}", child, begin, end),
            None => println!("   {}  ├─ Time range: (no timestamps)", child),
        }
        println!(
            "   {}  ├─ Modal step: {}",
            child,
            track.modal_step.as_deref().unwrap_or("(undetermined)")
        );
        println!(
            "   {}  ├─ Null times: {}, null locations: {}",
            child, track.null_times, track.null_locations
        );
        if track.labels.is_empty() {
            println!("   {}  └─ Labels: all OK", child);
        } else {
            let labels: Vec<String> = track
                .labels
                .iter()
                .map(|(label, count)| format!("{}={}", label, count))
                .collect();
            println!(
                "   {}  └─ Labels: OK={}, {}",
                child,
                track.ok,
                labels.join(", ")
            );
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{CoordinateSystem, ErrorLabel, Observation, TimeUnit};

    #[test]
    fn test_track_info() {
        let mut observations = vec![
            Observation::new("a", Some(0.0), Some(0.0), Some(0.0)),
            Observation::new("a", Some(10.0), None, None),
            Observation::new("a", None, Some(2.0), Some(2.0)),
            Observation::new("a", Some(20.0), Some(3.0), Some(3.0)),
            Observation::new("a", Some(30.0), Some(4.0), Some(4.0)),
        ];
        observations[1].error.merge(ErrorLabel::LocNa);
        observations[2].error.merge(ErrorLabel::TimeNa);
        let track =
            Track::new(CoordinateSystem::Planar, TimeUnit::Seconds, observations).unwrap();

        let info = TrackInfo::from_track(&track);
        assert_eq!(info.observations, 5);
        assert_eq!(info.time_range, Some((0.0, 30.0)));
        assert!(info.modal_step.is_some());
        assert_eq!((info.null_times, info.null_locations), (1, 1));
        assert_eq!(info.ok, 3);
        assert_eq!(info.labels.get("locNA"), Some(&1));
    }

    #[test]
    fn test_info_without_step() {
        let track = Track::new(
            CoordinateSystem::Planar,
            TimeUnit::Seconds,
            vec![Observation::new("a", Some(5.0), Some(0.0), Some(0.0))],
        )
        .unwrap();

        let info = TrackInfo::from_track(&track);
        assert_eq!(info.modal_step, None);
        assert!(info.labels.is_empty());
    }
}
