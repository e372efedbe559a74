//! Observation - one positional fix of a track

use serde::{Deserialize, Serialize};

use crate::{ErrorLabels, TrackId};

/// Coordinate axis of a fix
///
/// For geographic tracks `X` is longitude and `Y` latitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub const BOTH: [Axis; 2] = [Axis::X, Axis::Y];
}

/// A single time-stamped fix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Trajectory identifier
    pub id: TrackId,

    /// Timestamp in the track's time unit (None = missing)
    #[serde(default)]
    pub time: Option<f64>,

    /// x / longitude
    #[serde(default)]
    pub x: Option<f64>,

    /// y / latitude
    #[serde(default)]
    pub y: Option<f64>,

    /// Accumulated defect labels
    #[serde(default)]
    pub error: ErrorLabels,
}

impl Observation {
    pub fn new(id: impl Into<TrackId>, time: Option<f64>, x: Option<f64>, y: Option<f64>) -> Self {
        Self {
            id: id.into(),
            time,
            x,
            y,
            error: ErrorLabels::ok(),
        }
    }

    /// Row with no position, used for slots inserted while re-gridding
    pub fn empty_at(id: TrackId, time: f64, error: ErrorLabels) -> Self {
        Self {
            id,
            time: Some(time),
            x: None,
            y: None,
            error,
        }
    }

    pub fn coord(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Both axes present
    pub fn has_location(&self) -> bool {
        self.x.is_some() && self.y.is_some()
    }

    pub fn clear_location(&mut self) {
        self.x = None;
        self.y = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorLabel;

    #[test]
    fn test_coord_access() {
        let mut obs = Observation::new("a", Some(1.0), Some(2.0), None);
        assert_eq!(obs.coord(Axis::X), Some(2.0));
        assert!(!obs.has_location());

        obs.y = Some(3.0);
        assert!(obs.has_location());

        obs.clear_location();
        assert_eq!(obs.coord(Axis::X), None);
        assert_eq!(obs.coord(Axis::Y), None);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let obs: Observation = serde_json::from_str(r#"{"id": "a", "time": 4.0}"#).unwrap();
        assert_eq!(obs.time, Some(4.0));
        assert_eq!(obs.x, None);
        assert!(obs.error.is_ok());

        let obs: Observation =
            serde_json::from_str(r#"{"id": "a", "time": null, "x": 1.0, "y": 2.0, "error": "timeNA"}"#)
                .unwrap();
        assert!(obs.error.contains(ErrorLabel::TimeNa));
    }
}
