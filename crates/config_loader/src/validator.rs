//! 配置校验模块
//!
//! 校验规则：
//! - 至少一个修复步骤
//! - outlier_scale 为有限正数
//! - local_fit_span ∈ (0, 1]
//! - local_fit_min_points >= 4
//! - 补全步骤 begin <= end
//! - max_concurrent_tracks >= 1
//!
//! 步长 (step) 在反序列化时已校验为有限正数。

use contracts::{ContractError, PassConfig, RepairBlueprint};

/// 局部拟合所需的最少点数
const MIN_LOCAL_FIT_POINTS: usize = 4;

/// 校验 RepairBlueprint 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(blueprint: &RepairBlueprint) -> Result<(), ContractError> {
    validate_passes_present(blueprint)?;
    for (idx, pass) in blueprint.passes.iter().enumerate() {
        validate_pass(idx, pass)?;
    }
    validate_batch(blueprint)?;
    Ok(())
}

fn validate_passes_present(blueprint: &RepairBlueprint) -> Result<(), ContractError> {
    if blueprint.passes.is_empty() {
        return Err(ContractError::config_validation(
            "passes",
            "at least one repair pass is required",
        ));
    }
    Ok(())
}

/// 校验单个步骤的参数
fn validate_pass(idx: usize, pass: &PassConfig) -> Result<(), ContractError> {
    let field = |name: &str| format!("passes[{idx}].{name}");

    match pass {
        PassConfig::TimestampSequence(c) => {
            validate_scale(&field("outlier_scale"), c.outlier_scale)?;
        }
        PassConfig::LocationSequence(c) => {
            validate_scale(&field("outlier_scale"), c.outlier_scale)?;
            if !(c.local_fit_span > 0.0 && c.local_fit_span <= 1.0) {
                return Err(ContractError::config_validation(
                    field("local_fit_span"),
                    format!("local_fit_span must be in (0, 1], got {}", c.local_fit_span),
                ));
            }
            if c.local_fit_min_points < MIN_LOCAL_FIT_POINTS {
                return Err(ContractError::config_validation(
                    field("local_fit_min_points"),
                    format!(
                        "local_fit_min_points must be >= {MIN_LOCAL_FIT_POINTS}, got {}",
                        c.local_fit_min_points
                    ),
                ));
            }
        }
        PassConfig::CompleteObservations(c) => {
            for (name, value) in [("begin", c.begin), ("end", c.end)] {
                if value.is_some_and(|v| !v.is_finite()) {
                    return Err(ContractError::config_validation(
                        field(name),
                        format!("{name} must be finite"),
                    ));
                }
            }
            if let (Some(begin), Some(end)) = (c.begin, c.end) {
                if begin > end {
                    return Err(ContractError::config_validation(
                        format!("passes[{idx}].begin / passes[{idx}].end"),
                        format!("begin ({begin}) must be <= end ({end})"),
                    ));
                }
            }
        }
        PassConfig::DuplicateTimestamps(_)
        | PassConfig::MissingTimestamps(_)
        | PassConfig::MissingLocations(_) => {}
    }
    Ok(())
}

fn validate_scale(field: &str, scale: f64) -> Result<(), ContractError> {
    if !(scale.is_finite() && scale > 0.0) {
        return Err(ContractError::config_validation(
            field,
            format!("outlier_scale must be a finite number > 0, got {scale}"),
        ));
    }
    Ok(())
}

/// 校验批处理配置
fn validate_batch(blueprint: &RepairBlueprint) -> Result<(), ContractError> {
    if blueprint.batch.max_concurrent_tracks == 0 {
        return Err(ContractError::config_validation(
            "batch.max_concurrent_tracks",
            "max_concurrent_tracks must be >= 1",
        ));
    }
    Ok(())
}
