//! Profiles, their configuration block, and the document root.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::models::layer::Layer;
use crate::models::rgb::ColorValue;
use crate::models::template::Template;
use crate::models::KeyMap;

/// Physical orientation of the device.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Orientation {
    /// Tall layout (default).
    #[default]
    Portrait,
    /// Wide layout; tighter label limits.
    Landscape,
}

impl Orientation {
    /// The value as written in documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
        }
    }
}

impl From<String> for Orientation {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case("landscape") {
            Self::Landscape
        } else {
            Self::Portrait
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration block of a profile or layer.
///
/// Every field is optional so a layer's block can be merged over its
/// parent's field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Device orientation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    /// Background color of unlit keys.
    #[serde(default, alias = "bg_color", skip_serializing_if = "Option::is_none")]
    pub background_color: Option<ColorValue>,
    /// Color shown while a key is held down.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keydown_color: Option<ColorValue>,
    /// Dim keys without an action.
    #[serde(default, alias = "dim_unused_keys", skip_serializing_if = "Option::is_none")]
    pub dim_unused: Option<bool>,
}

impl ProfileConfig {
    /// Merges `self` over `base`: fields set here win.
    #[must_use]
    pub fn merged_over(&self, base: &Self) -> Self {
        Self {
            orientation: self.orientation.or(base.orientation),
            background_color: self
                .background_color
                .clone()
                .or_else(|| base.background_color.clone()),
            keydown_color: self
                .keydown_color
                .clone()
                .or_else(|| base.keydown_color.clone()),
            dim_unused: self.dim_unused.or(base.dim_unused),
        }
    }

    /// Effective orientation, defaulting to portrait.
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation.unwrap_or_default()
    }

    /// Returns true if unused keys should be dimmed.
    #[must_use]
    pub fn dim_unused(&self) -> bool {
        self.dim_unused.unwrap_or(false)
    }
}

/// The main profile of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    /// Profile name, also the output directory name.
    pub name: String,
    /// Configuration block.
    pub config: ProfileConfig,
    /// Templates to apply, in order.
    pub templates: Vec<String>,
    /// Explicitly authored keys.
    pub keys: KeyMap,
    /// Layers in declaration order.
    pub layers: Vec<Layer>,
}

impl Profile {
    /// Creates an empty profile.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Finds a layer by identifier.
    #[must_use]
    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    /// Position of a layer in declaration order.
    #[must_use]
    pub fn layer_position(&self, id: &str) -> Option<usize> {
        self.layers.iter().position(|layer| layer.id == id)
    }
}

/// Root of one authored document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// Inline templates by name.
    pub templates: BTreeMap<String, Template>,
    /// The single profile.
    pub profile: Profile,
    /// Path the document was loaded from, when it came from a file.
    pub source_path: Option<PathBuf>,
}
