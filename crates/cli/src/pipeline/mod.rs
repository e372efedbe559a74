//! Batch repair pipeline module.

mod orchestrator;
mod stats;

pub use orchestrator::Pipeline;
pub use stats::PipelineStats;
