//! Track file reading and writing.
//!
//! A track file is a JSON document holding the observations of one or more tracks:
//!
//! ```json
//! {
//!   "time_unit": "seconds",
//!   "coordinates": "planar",
//!   "observations": [
//!     { "id": "a", "time": 0.0, "x": 1.0, "y": 2.0, "error": "OK" }
//!   ]
//! }
//! ```

use std::io::Write;
use std::path::Path;

use contracts::{ContractError, CoordinateSystem, Observation, TimeUnit, Track};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CliError, Result};

/// Observations of one or more tracks sharing a time unit and coordinate system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackFile {
    #[serde(default)]
    pub time_unit: TimeUnit,
    #[serde(default)]
    pub coordinates: CoordinateSystem,
    pub observations: Vec<Observation>,
}

impl TrackFile {
    /// Flatten tracks back into one observation list, track after track
    pub fn from_tracks(
        time_unit: TimeUnit,
        coordinates: CoordinateSystem,
        tracks: Vec<Track>,
    ) -> Self {
        Self {
            time_unit,
            coordinates,
            observations: tracks
                .into_iter()
                .flat_map(Track::into_observations)
                .collect(),
        }
    }

    /// Group observations into one track per id, in first-seen order
    pub fn into_tracks(self) -> std::result::Result<Vec<Track>, ContractError> {
        Track::group_by_id(self.coordinates, self.time_unit, self.observations)
    }
}

pub fn read_track_file(path: &Path) -> Result<TrackFile> {
    if !path.exists() {
        return Err(CliError::input_not_found(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    let file: TrackFile = serde_json::from_str(&content)
        .map_err(|e| CliError::malformed_track_file(path.display().to_string(), e.to_string()))?;

    debug!(
        path = %path.display(),
        observations = file.observations.len(),
        "track file loaded"
    );
    Ok(file)
}

/// Write a track file as pretty JSON, to stdout when no path is given
pub fn write_track_file(file: &TrackFile, path: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(file).map_err(std::io::Error::from)?;

    match path {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))?;
            debug!(path = %path.display(), "track file written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}
