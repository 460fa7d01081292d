//! Generate command: document in, profile folders out.

use crate::cli::common::{CliError, CliResult};
use crate::config::Config;
use crate::firmware::generator::GeneratorOptions;
use crate::services::ProfileService;
use clap::Args;
use std::path::PathBuf;

/// Generate duckyPad Pro profile folders from a YAML document
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Path to the YAML profile document
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Output directory (defaults to build.output_dir from the config)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Directory searched first for external templates
    #[arg(short, long, value_name = "DIR")]
    pub templates_dir: Option<PathBuf>,

    /// Number profiles from this index and use numeric GOTO_PROFILE targets;
    /// the last profile must still fit the device's 64 slots
    #[arg(long, value_name = "N")]
    pub profile_index: Option<u32>,

    /// Do not write README.md files
    #[arg(long)]
    pub no_readme: bool,

    /// Generate and validate, but write nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Use this config file instead of the platform default
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl GenerateArgs {
    /// Execute the generate command
    pub fn execute(&self) -> CliResult<()> {
        if !self.input.exists() {
            return Err(CliError::validation(format!(
                "Input file not found: {}",
                self.input.display()
            )));
        }

        let config = match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
        .map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))?;

        let templates_dir = self
            .templates_dir
            .clone()
            .or_else(|| config.paths.templates_dir.clone());
        let output_dir = self
            .output
            .clone()
            .unwrap_or_else(|| config.build.output_dir.clone());

        let mut options =
            GeneratorOptions::default().with_readme(config.build.write_readme && !self.no_readme);
        if let Some(index) = self.profile_index {
            options = options.with_profile_index(index);
        }

        if self.dry_run {
            let generated = ProfileService::generate(&self.input, templates_dir.as_deref(), options)?;
            for profile in &generated.profiles {
                println!(
                    "{} -> {} ({} files)",
                    profile.name,
                    output_dir.join(&profile.dir_name).display(),
                    profile.files.len()
                );
            }
            print_warnings(generated.warnings.iter().map(ToString::to_string));
            return Ok(());
        }

        let output = ProfileService::build(
            &self.input,
            templates_dir.as_deref(),
            &output_dir,
            options,
        )?;

        for profile in &output.written {
            println!(
                "✓ {} -> {} ({} files)",
                profile.name,
                profile.path.display(),
                profile.files.len()
            );
        }
        print_warnings(output.generated.warnings.iter().map(ToString::to_string));

        Ok(())
    }
}

fn print_warnings(warnings: impl Iterator<Item = String>) {
    for warning in warnings {
        eprintln!("⚠ {warning}");
    }
}
