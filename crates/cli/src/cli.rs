//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Track Repair - detect and repair defects in trajectory data
#[derive(Parser, Debug)]
#[command(
    name = "track-repair",
    author,
    version,
    about = "Trajectory data repair pipeline",
    long_about = "Detects and repairs defects in timestamped trajectory data.\n\n\
                  Reads a track file, runs the configured repair passes on every track \n\
                  and writes the repaired observations with their defect labels."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "TRACK_REPAIR_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "TRACK_REPAIR_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Repair every track in a track file
    Run(RunArgs),

    /// Validate a repair configuration without running it
    Validate(ValidateArgs),

    /// Describe the tracks in a track file
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to repair configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "repair.toml",
        env = "TRACK_REPAIR_CONFIG"
    )]
    pub config: PathBuf,

    /// Track file to repair (JSON)
    #[arg(short, long, env = "TRACK_REPAIR_INPUT")]
    pub input: PathBuf,

    /// Where to write the repaired track file (stdout when omitted)
    #[arg(short, long, env = "TRACK_REPAIR_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Override `batch.max_concurrent_tracks` from configuration
    #[arg(long, env = "TRACK_REPAIR_MAX_CONCURRENT")]
    pub max_concurrent: Option<usize>,

    /// Load configuration and input, print the plan and exit
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "TRACK_REPAIR_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to repair configuration file to validate
    #[arg(short, long, default_value = "repair.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Track file to describe (JSON)
    #[arg(short, long, env = "TRACK_REPAIR_INPUT")]
    pub input: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}
