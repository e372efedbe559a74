//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace: the track data model,
//! defect labels, time units, pass configuration and reports.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Time Model
//! - A track stores timestamps as `f64` counts of its own [`TimeUnit`]
//! - A [`Step`] carries its own unit and is converted before being applied to a track

mod blueprint;
mod error;
mod label;
mod observation;
mod repair_config;
mod report;
mod time;
mod track;
mod track_id;

pub use blueprint::*;
pub use error::*;
pub use label::{ErrorLabel, ErrorLabels};
pub use observation::{Axis, Observation};
pub use repair_config::*;
pub use report::*;
pub use time::{Step, TimeUnit};
pub use track::{CoordinateSystem, Track};
pub use track_id::TrackId;
