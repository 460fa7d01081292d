//! Layers and the switching disciplines that reach them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::profile::ProfileConfig;
use crate::models::KeyMap;

/// Switching discipline carried by a switcher key's `layer_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerType {
    /// Hold a modifier while the layer is active; release returns home.
    ModifierHold,
    /// Press to enter, press the mirrored key to leave.
    Toggle,
    /// Enter for exactly one subsequent action.
    Oneshot,
    /// Active only while the switcher is held.
    Momentary,
    /// Behaves as `Toggle`; hold-vs-tap disambiguation is not modeled.
    HoldToggle,
}

impl LayerType {
    /// All layer types, in documentation order.
    pub const ALL: [Self; 5] = [
        Self::ModifierHold,
        Self::Toggle,
        Self::Oneshot,
        Self::Momentary,
        Self::HoldToggle,
    ];

    /// Parses a `layer_type` value. Returns `None` for unknown values.
    ///
    /// ```
    /// use padforge::models::LayerType;
    ///
    /// assert_eq!(LayerType::parse("oneshot"), Some(LayerType::Oneshot));
    /// assert_eq!(LayerType::parse("sticky"), None);
    /// ```
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str().eq_ignore_ascii_case(value))
    }

    /// The value as written in documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ModifierHold => "modifier_hold",
            Self::Toggle => "toggle",
            Self::Oneshot => "oneshot",
            Self::Momentary => "momentary",
            Self::HoldToggle => "hold_toggle",
        }
    }

    /// Returns true if the target layer gets a mirrored return key.
    #[must_use]
    pub const fn has_mirror(self) -> bool {
        matches!(self, Self::ModifierHold | Self::Toggle | Self::HoldToggle)
    }
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named layer of a profile, as authored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layer {
    /// Identifier used by `layer:` references and `extends` lists.
    pub id: String,
    /// Profile name for the generated layer profile.
    pub name: Option<String>,
    /// Layer-level configuration, merged over the parent's.
    pub config: ProfileConfig,
    /// Inheritance sources in application order: `parent`, templates, or layers.
    pub extends: Vec<String>,
    /// Templates to apply, in order.
    pub templates: Vec<String>,
    /// Explicitly authored keys.
    pub keys: KeyMap,
}

impl Layer {
    /// The token that makes a layer inherit the parent profile.
    pub const PARENT: &'static str = "parent";

    /// Creates an empty layer with the given identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Profile name of this layer: its own `name`, else `<parent>-<id>`.
    #[must_use]
    pub fn profile_name(&self, parent_name: &str) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("{parent_name}-{}", self.id))
    }

    /// Returns true if any `extends` entry is `parent`.
    #[must_use]
    pub fn extends_parent(&self) -> bool {
        self.extends.iter().any(|source| source == Self::PARENT)
    }
}
