//! Data models for documents, profiles, layers, templates, and keys.
//!
//! Models hold authored data after shorthand normalization. They carry no
//! resolution or code-generation logic.

use std::collections::BTreeMap;

pub mod key;
pub mod layer;
pub mod profile;
pub mod rgb;
pub mod template;

pub use key::{KeyCategory, KeyDefinition};
pub use layer::{Layer, LayerType};
pub use profile::{Document, Orientation, Profile, ProfileConfig};
pub use rgb::{ColorResolver, ColorValue, NamedColors, RgbColor};
pub use template::{OrientedTemplate, Template};

/// Key index to normalized definition, iterated in ascending key order.
pub type KeyMap = BTreeMap<u8, KeyDefinition>;
