//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{PassKind, RepairBlueprint};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    passes: Vec<String>,
    max_concurrent_tracks: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", blueprint.version),
                    passes: blueprint
                        .passes
                        .iter()
                        .map(|p| p.kind().to_string())
                        .collect(),
                    max_concurrent_tracks: blueprint.batch.max_concurrent_tracks,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &RepairBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();
    let kinds: Vec<PassKind> = blueprint.passes.iter().map(|p| p.kind()).collect();

    for (i, kind) in kinds.iter().enumerate() {
        if kinds[..i].contains(kind) {
            warnings.push(format!("Pass '{}' is configured more than once", kind));
        }
    }

    // passes that null timestamps leave gaps unless missing_timestamps runs after them
    if let Some(fill) = kinds.iter().position(|k| *k == PassKind::MissingTimestamps) {
        for kind in &kinds[fill + 1..] {
            if matches!(
                kind,
                PassKind::DuplicateTimestamps | PassKind::TimestampSequence
            ) {
                warnings.push(format!(
                    "Pass '{}' runs after missing_timestamps - timestamps it cannot fix stay null",
                    kind
                ));
            }
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Max concurrent tracks: {}", summary.max_concurrent_tracks);
            println!("  Passes:");
            for (i, pass) in summary.passes.iter().enumerate() {
                println!("    {}. {}", i + 1, pass);
            }
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
