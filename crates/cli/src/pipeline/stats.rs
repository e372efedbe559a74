//! Pipeline statistics.

use std::time::Duration;

use observability::RepairMetricsAggregator;

/// Statistics from a batch repair run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Tracks in the input file
    pub tracks_total: usize,

    /// Tracks where every pass completed
    pub tracks_repaired: usize,

    /// Tracks left unrepaired because a pass failed
    pub tracks_failed: usize,

    /// `(track id, error)` for every failed track
    pub failures: Vec<(String, String)>,

    /// Observations read
    pub observations_in: usize,

    /// Observations written, including rows inserted by completion
    pub observations_out: usize,

    /// Total duration of the batch
    pub duration: Duration,

    /// Per-pass totals
    pub metrics: RepairMetricsAggregator,
}

impl PipelineStats {
    /// Tracks repaired per second
    pub fn throughput(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.tracks_total as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary to stderr
    ///
    /// stdout may be carrying the repaired track file.
    pub fn print_summary(&self) {
        eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
        eprintln!("║                    Track Repair Statistics                   ║");
        eprintln!("╚══════════════════════════════════════════════════════════════╝\n");

        eprintln!("📊 Overview");
        eprintln!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        eprintln!("   ├─ Tracks: {}", self.tracks_total);
        eprintln!("   ├─ Repaired: {}", self.tracks_repaired);
        eprintln!("   ├─ Failed: {}", self.tracks_failed);
        eprintln!(
            "   ├─ Observations: {} in, {} out",
            self.observations_in, self.observations_out
        );
        eprintln!("   └─ Throughput: {:.2} tracks/s", self.throughput());

        let summary = self.metrics.summary();
        if !summary.passes.is_empty() {
            eprintln!("\n📈 Passes");
            let last = summary.passes.len() - 1;
            for (i, (pass, totals)) in summary.passes.iter().enumerate() {
                let branch = if i == last { "└─" } else { "├─" };
                eprintln!(
                    "   {} {}: flagged={} corrected={} unresolved={} inserted={}",
                    branch,
                    pass,
                    totals.flagged,
                    totals.corrected,
                    totals.unresolved,
                    totals.inserted
                );
            }
        }

        if !self.failures.is_empty() {
            eprintln!("\n⚠️  Failed Tracks");
            for (id, error) in &self.failures {
                eprintln!("   ├─ {}: {}", id, error);
            }
        }

        eprintln!();
    }
}
