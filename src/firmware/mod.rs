//! Profile code generation.
//!
//! This module compiles resolved key maps into duckyScript files and
//! per-profile `config.txt`, checks device limits, and writes the result.

pub mod generator;
pub mod key_action;
pub mod layer_switch;
pub mod script;
pub mod validator;
pub mod writer;

// Re-export firmware types
pub use generator::{
    CompiledKey, CompiledProfile, GeneratedProfiles, GeneratorOptions, KeyRole, ProfileArtifacts,
    ProfileGenerator,
};
pub use script::{Instruction, KeyScripts, Script};
pub use validator::{DuckyPadLimits, LimitValidator, ProfileValidator, ValidationReport};
pub use writer::{write_profiles, WrittenProfile};
