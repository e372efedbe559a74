//! # Track Repair CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 修复配置加载与验证
//! - 轨迹文件读取、批量修复与写出
//! - 轨迹文件概览

mod cli;
mod commands;
mod error;
mod pipeline;
mod track_io;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_info, run_repair, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli)?;

    info!(version = env!("CARGO_PKG_VERSION"), "track-repair starting");

    let result = match &cli.command {
        Commands::Run(args) => run_repair(args).await,
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Initialize logging based on CLI options
///
/// `RUST_LOG` takes precedence over the verbosity flags.
fn init_logging(cli: &Cli) -> Result<()> {
    let default_log_level = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    observability::init_with_config(ObservabilityConfig {
        log_format: match cli.log_format {
            cli::LogFormat::Json => observability::LogFormat::Json,
            cli::LogFormat::Pretty => observability::LogFormat::Pretty,
            cli::LogFormat::Compact => observability::LogFormat::Compact,
        },
        metrics_port: None,
        default_log_level: default_log_level.to_string(),
    })
}
