//! Repair pass configuration contracts shared across crates.

use serde::{Deserialize, Serialize};

use crate::{PassKind, Step};

/// How gaps are filled between anchors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationMethod {
    /// Piecewise linear between the bracketing anchors
    #[default]
    Linear,
    /// Natural cubic spline through all anchors
    Spline,
}

/// Duplicate timestamp resolution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuplicateTimestampConfig {
    /// Expected cadence (None = modal step of the track)
    pub step: Option<Step>,
}

/// Timestamp sequence correction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimestampSequenceConfig {
    /// IQR multiplier of the two-sided outlier rule
    pub outlier_scale: f64,
    /// Expected cadence (None = modal step of the track)
    pub step: Option<Step>,
}

impl Default for TimestampSequenceConfig {
    fn default() -> Self {
        Self {
            outlier_scale: 3.0,
            step: None,
        }
    }
}

/// Missing timestamp interpolation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissingTimestampConfig {
    pub interpolation: InterpolationMethod,
}

/// Location sequence correction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationSequenceConfig {
    /// IQR multiplier of the one-sided outlier rule
    pub outlier_scale: f64,
    /// Fraction of observations in each local fit
    pub local_fit_span: f64,
    /// Lower bound on the number of observations in each local fit
    pub local_fit_min_points: usize,
    pub interpolation: InterpolationMethod,
}

impl Default for LocationSequenceConfig {
    fn default() -> Self {
        Self {
            outlier_scale: 6.0,
            local_fit_span: 0.05,
            local_fit_min_points: 15,
            interpolation: InterpolationMethod::Linear,
        }
    }
}

/// Missing location interpolation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissingLocationConfig {
    pub interpolation: InterpolationMethod,
}

/// Re-gridding onto the expected regular timeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// First slot, in the track's time unit (None = earliest timestamp)
    pub begin: Option<f64>,
    /// Last slot, in the track's time unit (None = latest timestamp)
    pub end: Option<f64>,
    /// Slot spacing (None = modal step of the track)
    pub step: Option<Step>,
    pub interpolation: InterpolationMethod,
}

/// One entry of a repair pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "pass", rename_all = "snake_case")]
pub enum PassConfig {
    DuplicateTimestamps(DuplicateTimestampConfig),
    TimestampSequence(TimestampSequenceConfig),
    MissingTimestamps(MissingTimestampConfig),
    LocationSequence(LocationSequenceConfig),
    MissingLocations(MissingLocationConfig),
    CompleteObservations(CompletionConfig),
}

impl PassConfig {
    pub fn kind(&self) -> PassKind {
        match self {
            PassConfig::DuplicateTimestamps(_) => PassKind::DuplicateTimestamps,
            PassConfig::TimestampSequence(_) => PassKind::TimestampSequence,
            PassConfig::MissingTimestamps(_) => PassKind::MissingTimestamps,
            PassConfig::LocationSequence(_) => PassKind::LocationSequence,
            PassConfig::MissingLocations(_) => PassKind::MissingLocations,
            PassConfig::CompleteObservations(_) => PassKind::CompleteObservations,
        }
    }

    /// Default-parameter configuration for a pass
    pub fn default_for(kind: PassKind) -> Self {
        match kind {
            PassKind::DuplicateTimestamps => Self::DuplicateTimestamps(Default::default()),
            PassKind::TimestampSequence => Self::TimestampSequence(Default::default()),
            PassKind::MissingTimestamps => Self::MissingTimestamps(Default::default()),
            PassKind::LocationSequence => Self::LocationSequence(Default::default()),
            PassKind::MissingLocations => Self::MissingLocations(Default::default()),
            PassKind::CompleteObservations => Self::CompleteObservations(Default::default()),
        }
    }
}
