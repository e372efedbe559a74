//! Time units and sampling steps.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ContractError;

/// Unit of a track's timestamps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    #[default]
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Length of one unit in seconds
    pub fn seconds(self) -> f64 {
        match self {
            TimeUnit::Nanoseconds => 1e-9,
            TimeUnit::Microseconds => 1e-6,
            TimeUnit::Milliseconds => 1e-3,
            TimeUnit::Seconds => 1.0,
            TimeUnit::Minutes => 60.0,
            TimeUnit::Hours => 3_600.0,
            TimeUnit::Days => 86_400.0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "ns",
            TimeUnit::Microseconds => "us",
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "s",
            TimeUnit::Minutes => "min",
            TimeUnit::Hours => "h",
            TimeUnit::Days => "d",
        }
    }
}

/// Expected interval between consecutive observations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStep")]
pub struct Step {
    magnitude: f64,
    unit: TimeUnit,
}

#[derive(Deserialize)]
struct RawStep {
    magnitude: f64,
    #[serde(default)]
    unit: TimeUnit,
}

impl TryFrom<RawStep> for Step {
    type Error = ContractError;

    fn try_from(raw: RawStep) -> Result<Self, Self::Error> {
        Step::new(raw.magnitude, raw.unit)
    }
}

impl Step {
    /// Create a step; `magnitude` must be finite and strictly positive.
    pub fn new(magnitude: f64, unit: TimeUnit) -> Result<Self, ContractError> {
        if !magnitude.is_finite() || magnitude <= 0.0 {
            return Err(ContractError::InvalidStep {
                message: format!("magnitude must be finite and > 0, got {magnitude}"),
            });
        }
        Ok(Self { magnitude, unit })
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Magnitude expressed as a count of `unit`
    pub fn in_unit(&self, unit: TimeUnit) -> f64 {
        if unit == self.unit {
            self.magnitude
        } else {
            self.magnitude * self.unit.seconds() / unit.seconds()
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit.symbol())
    }
}
