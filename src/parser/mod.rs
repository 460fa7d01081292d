//! Parsing of authored YAML documents.
//!
//! This module loads documents and template files and expands key specs and
//! shorthand definitions into normalized key maps.

pub mod document;
pub mod key_spec;

pub use document::{load_document, load_template_file, parse_document};
pub use key_spec::{expand, expand_key_map, normalize_definition, KeySpec};
