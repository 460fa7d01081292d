//! Export functionality for generated profiles.
//!
//! Currently a per-profile markdown README with a configuration summary and
//! a key table.

pub mod readme;

pub use readme::{describe_key, render_readme};
