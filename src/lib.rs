//! padforge library
//!
//! Compiles layered YAML macro-pad documents into duckyPad Pro profile
//! folders: key-spec expansion, template and `extends` resolution,
//! layer-switch and key-action compilation, limit checks, and writing.
//!
//! The usual entry point is [`services::ProfileService`]:
//!
//! ```no_run
//! use std::path::Path;
//! use padforge::firmware::GeneratorOptions;
//! use padforge::services::ProfileService;
//!
//! let output = ProfileService::build(
//!     Path::new("work.yaml"),
//!     None,
//!     Path::new("profiles"),
//!     GeneratorOptions::default(),
//! )?;
//! println!("{} profiles written", output.written.len());
//! # Ok::<(), padforge::error::CompileError>(())
//! ```

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod firmware;
pub mod models;
pub mod parser;
pub mod services;

// Re-export commonly used types
pub use config::Config;
pub use error::{CompileError, CompileResult};
pub use firmware::{GeneratedProfiles, GeneratorOptions};
pub use models::{Document, KeyDefinition, LayerType, Orientation};
pub use services::{ProfileService, ResolvedDocument};
