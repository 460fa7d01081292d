//! Reusable key-definition sets.

use std::collections::BTreeMap;

use crate::models::key::KeyDefinition;
use crate::models::profile::Orientation;
use crate::models::KeyMap;

/// A named template body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Template {
    /// Key indices mapped directly to definitions.
    Flat(KeyMap),
    /// Abstract key names placed per orientation.
    Oriented(OrientedTemplate),
}

/// Template whose key positions depend on the device orientation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrientedTemplate {
    /// Definitions by abstract key name.
    pub key_definitions: BTreeMap<String, KeyDefinition>,
    /// Per orientation, abstract key names and the index each lands on,
    /// in declaration order.
    pub key_positions: BTreeMap<Orientation, Vec<(String, u8)>>,
    /// Orientations the author declared support for. Empty means any.
    pub supported_orientations: Vec<Orientation>,
}

impl OrientedTemplate {
    /// Returns true if `orientation` is declared supported, or nothing is declared.
    #[must_use]
    pub fn supports(&self, orientation: Orientation) -> bool {
        self.supported_orientations.is_empty() || self.supported_orientations.contains(&orientation)
    }
}

impl Template {
    /// Returns true for oriented templates.
    #[must_use]
    pub const fn is_oriented(&self) -> bool {
        matches!(self, Self::Oriented(_))
    }
}
