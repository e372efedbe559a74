//! 轨迹修复指标收集模块
//!
//! 基于 PassReport / RepairReport 记录修复过程的计数与分布。

use std::collections::BTreeMap;

use contracts::{PassKind, PassReport, RepairReport};
use metrics::{counter, histogram};

/// 记录单个修复步骤的结果
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_pass_report;
///
/// let report = resolve_duplicate_timestamps(&mut track, &config)?;
/// record_pass_report(&report);
/// ```
pub fn record_pass_report(report: &PassReport) {
    let pass = report.pass.as_str();

    counter!("track_repair_passes_total", "pass" => pass).increment(1);

    if report.flagged > 0 {
        counter!("track_repair_flagged_total", "pass" => pass).increment(report.flagged as u64);
    }
    if report.corrected > 0 {
        counter!("track_repair_corrected_total", "pass" => pass)
            .increment(report.corrected as u64);
    }
    if report.unresolved > 0 {
        counter!("track_repair_unresolved_total", "pass" => pass)
            .increment(report.unresolved as u64);
    }
    if report.inserted > 0 {
        counter!("track_repair_inserted_total").increment(report.inserted as u64);
    }
}

/// 记录修复成功的轨迹
pub fn record_track_repaired(report: &RepairReport) {
    counter!("track_repair_tracks_total", "status" => "ok").increment(1);
    histogram!("track_repair_track_observations").record(report.observations_out as f64);
}

/// 记录修复失败的轨迹
pub fn record_track_failed() {
    counter!("track_repair_tracks_total", "status" => "failed").increment(1);
}

/// 单个步骤的累计值
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassTotals {
    pub runs: u64,
    pub flagged: u64,
    pub corrected: u64,
    pub unresolved: u64,
    pub inserted: u64,
}

/// 修复指标聚合器
///
/// 在内存中聚合各轨迹的修复报告，便于输出摘要。
#[derive(Debug, Clone, Default)]
pub struct RepairMetricsAggregator {
    /// 修复成功的轨迹数
    pub tracks_repaired: u64,

    /// 修复失败的轨迹数
    pub tracks_failed: u64,

    /// 各步骤累计
    pub passes: BTreeMap<PassKind, PassTotals>,

    /// 输出轨迹长度统计
    pub track_length: RunningStats,

    /// 新增观测行统计 (每条轨迹)
    pub inserted_per_track: RunningStats,
}

impl RepairMetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 累加一条轨迹的修复报告
    pub fn update(&mut self, report: &RepairReport) {
        self.tracks_repaired += 1;
        self.track_length.push(report.observations_out as f64);

        let mut inserted = 0;
        for pass in &report.passes {
            let totals = self.passes.entry(pass.pass).or_default();
            totals.runs += 1;
            totals.flagged += pass.flagged as u64;
            totals.corrected += pass.corrected as u64;
            totals.unresolved += pass.unresolved as u64;
            totals.inserted += pass.inserted as u64;
            inserted += pass.inserted;
        }
        self.inserted_per_track.push(inserted as f64);
    }

    pub fn record_failure(&mut self) {
        self.tracks_failed += 1;
    }

    /// 生成摘要报告
    pub fn summary(&self) -> RepairMetricsSummary {
        let total = self.tracks_repaired + self.tracks_failed;
        RepairMetricsSummary {
            tracks_repaired: self.tracks_repaired,
            tracks_failed: self.tracks_failed,
            failure_rate: if total > 0 {
                self.tracks_failed as f64 / total as f64 * 100.0
            } else {
                0.0
            },
            passes: self.passes.clone(),
            track_length: StatsSummary::from(&self.track_length),
            inserted_per_track: StatsSummary::from(&self.inserted_per_track),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default)]
pub struct RepairMetricsSummary {
    pub tracks_repaired: u64,
    pub tracks_failed: u64,
    pub failure_rate: f64,
    pub passes: BTreeMap<PassKind, PassTotals>,
    pub track_length: StatsSummary,
    pub inserted_per_track: StatsSummary,
}

impl std::fmt::Display for RepairMetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Track Repair Summary ===")?;
        writeln!(f, "Tracks repaired: {}", self.tracks_repaired)?;
        writeln!(
            f,
            "Tracks failed: {} ({:.2}%)",
            self.tracks_failed, self.failure_rate
        )?;
        writeln!(f, "Track length: {}", self.track_length)?;
        writeln!(f, "Inserted rows per track: {}", self.inserted_per_track)?;

        if !self.passes.is_empty() {
            writeln!(f, "Passes:")?;
            for (pass, totals) in &self.passes {
                writeln!(
                    f,
                    "  {}: runs={} flagged={} corrected={} unresolved={} inserted={}",
                    pass,
                    totals.runs,
                    totals.flagged,
                    totals.corrected,
                    totals.unresolved,
                    totals.inserted
                )?;
            }
        }

        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.1}, max={:.1}, mean={:.2}, std={:.2} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
            return;
        }

        self.min = self.min.min(value);
        self.max = self.max.max(value);
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 样本方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
