//! Service layer for resolution logic.
//!
//! This module contains the template store, the resolution engine, the
//! switcher index, and the pipeline service that ties parsing, resolution,
//! generation, and writing together.

pub mod layer_refs;
pub mod profiles;
pub mod resolver;
pub mod templates;

// Re-export commonly used types and functions
pub use layer_refs::{SwitcherIndex, SwitcherRef};
pub use profiles::{BuildOutput, ProfileService};
pub use resolver::{resolve_document, ResolvedDocument, ResolvedProfile, Resolver};
pub use templates::{TemplateKeys, TemplateStore};
