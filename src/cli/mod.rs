//! CLI command handlers for padforge.
//!
//! This module provides headless, scriptable access to generation and
//! validation for automation and CI use.

pub mod common;
pub mod config;
pub mod generate;
pub mod validate;

// Re-export types used by main.rs and tests
pub use common::{CliError, CliResult, ExitCode};
pub use config::ConfigArgs;
pub use generate::GenerateArgs;
pub use validate::ValidateArgs;
