//! Validation command for profile documents.

use crate::cli::common::{CliError, CliResult};
use crate::config::Config;
use crate::services::ProfileService;
use clap::Args;
use std::path::PathBuf;

/// Check a document against device limits without writing anything
#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    /// Path to the YAML profile document
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Directory searched first for external templates
    #[arg(short, long, value_name = "DIR")]
    pub templates_dir: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Treat warnings as errors (exit non-zero)
    #[arg(long)]
    pub strict: bool,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> CliResult<()> {
        let templates_dir = self
            .templates_dir
            .clone()
            .or_else(|| Config::load().ok().and_then(|config| config.paths.templates_dir));

        let report = ProfileService::check(&self.input, templates_dir.as_deref())?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else {
            if report.is_valid() {
                println!("✓ Validation passed");
            } else {
                println!("✗ Validation failed");
            }

            if !report.errors.is_empty() || !report.warnings.is_empty() {
                println!("\nIssues:");
                for error in &report.errors {
                    println!("  ✗ {}", error.message);
                    if let Some(suggestion) = &error.suggestion {
                        println!("    → {suggestion}");
                    }
                }
                for warning in &report.warnings {
                    println!("  ⚠ {}", warning.message);
                }
            }
        }

        if !report.is_valid() {
            return Err(CliError::validation("Validation failed"));
        }

        if self.strict && !report.warnings.is_empty() {
            return Err(CliError::validation("Warnings found in strict mode"));
        }

        Ok(())
    }
}
