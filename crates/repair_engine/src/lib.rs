//! # Repair Engine
//!
//! 轨迹数据修复引擎。
//!
//! 负责：
//! - 重复时间戳修正 / 时间序列异常修正 / 缺失时间戳插值
//! - 位置异常修正 / 缺失位置插值
//! - 按期望步长补全缺失观测
//! - 每个步骤输出 `PassReport`，并在观测的 `error` 列上累积标签
//!
//! ## 使用示例
//!
//! ```ignore
//! use repair_engine::{PassConfig, PassKind, RepairEngine};
//!
//! let engine = RepairEngine::new(vec![
//!     PassConfig::default_for(PassKind::DuplicateTimestamps),
//!     PassConfig::default_for(PassKind::LocationSequence),
//! ]);
//!
//! let report = engine.run(&mut track)?;
//! println!("flagged {} observations", report.total_flagged());
//! ```
//!
//! Passes can also be called one by one without the engine:
//!
//! ```ignore
//! let report = repair_engine::resolve_duplicate_timestamps(&mut track, &Default::default())?;
//! ```

mod engine;
mod interpolate;
mod local_fit;
mod modal;
mod passes;
mod regression;
mod stats;

pub use engine::{apply_pass, RepairEngine};
pub use interpolate::{Anchors, Interpolator};
pub use local_fit::LocalQuadratic;
pub use modal::{modal_step, track_modal_step};
pub use passes::{
    complete_missing_observations, correct_location_sequence, correct_timestamp_sequence,
    interpolate_missing_locations, interpolate_missing_timestamps, resolve_duplicate_timestamps,
};
pub use regression::{HuberRegression, LinearFit};
pub use stats::{median, quantile, OutlierBounds, OutlierRule};

// Re-export contracts types
pub use contracts::{
    CompletionConfig, DuplicateTimestampConfig, InterpolationMethod, LocationSequenceConfig,
    MissingLocationConfig, MissingTimestampConfig, PassConfig, PassKind, PassReport,
    RepairReport, TimestampSequenceConfig,
};
