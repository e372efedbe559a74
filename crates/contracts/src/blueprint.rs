//! RepairBlueprint - Config Loader 输出
//!
//! 描述完整的修复配置：按顺序执行的修复步骤、批处理并发度。

use serde::{Deserialize, Serialize};

use crate::PassConfig;

/// 配置版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// 完整的修复配置蓝图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairBlueprint {
    /// 配置版本
    #[serde(default)]
    pub version: ConfigVersion,

    /// 修复步骤 (按顺序执行)
    pub passes: Vec<PassConfig>,

    /// 批处理配置
    #[serde(default)]
    pub batch: BatchConfig,
}

/// 批处理配置：多条轨迹相互独立，可并行修复
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// 同时修复的轨迹数上限
    #[serde(default = "default_max_concurrent_tracks")]
    pub max_concurrent_tracks: usize,
}

fn default_max_concurrent_tracks() -> usize {
    4
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_tracks: default_max_concurrent_tracks(),
        }
    }
}
