//! Error types for document loading, resolution, and profile generation.
//!
//! Fatal kinds abort compilation of the whole document. The non-fatal kinds
//! are collected as warnings on [`crate::services::ResolvedDocument`] and
//! [`crate::firmware::GeneratedProfiles`] instead of being returned.

use std::path::PathBuf;

use thiserror::Error;

use crate::firmware::validator::LimitViolation;

/// Result alias used throughout the compilation pipeline.
pub type CompileResult<T> = std::result::Result<T, CompileError>;

/// Errors produced while expanding, resolving, or compiling a document.
#[derive(Debug, Error)]
pub enum CompileError {
    /// A range spec was paired with a definition list of a different length.
    #[error("range {spec} has {keys} keys but {definitions} definitions")]
    SpecMismatch {
        /// The range spec as written, e.g. `"6-10"`.
        spec: String,
        /// Number of indices covered by the range.
        keys: usize,
        /// Number of list elements supplied.
        definitions: usize,
    },

    /// A shorthand definition could not be normalized.
    #[error("invalid key definition for {spec}: {reason}")]
    InvalidDefinition {
        /// Key spec the definition was attached to.
        spec: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A key spec token is not an index, digit string, or `N-M` range.
    #[error("invalid key spec '{spec}': {reason}")]
    InvalidKeySpec {
        /// The offending token.
        spec: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A key index falls outside the device's key slots.
    #[error("key {index} in spec '{spec}' is outside the valid range 1-{max}")]
    KeyOutOfRange {
        /// The offending spec token.
        spec: String,
        /// The index that is out of range.
        index: u32,
        /// Highest valid key index.
        max: u8,
    },

    /// A layer `extends` entry names nothing known. Non-fatal.
    #[error("layer '{layer}' extends unknown source '{source_name}'")]
    UnknownExtendsSource {
        /// Layer whose `extends` list contains the entry.
        layer: String,
        /// The unknown name.
        source_name: String,
    },

    /// A `templates` entry names no inline or external template. Non-fatal.
    #[error("{target} references unknown template '{template}'")]
    UnknownTemplate {
        /// Profile or layer that referenced the template.
        target: String,
        /// The unknown template name.
        template: String,
    },

    /// A switcher carries an unrecognized `layer_type`. Non-fatal.
    #[error("key {index} in '{profile}' has unknown layer_type '{layer_type}', using modifier_hold")]
    UnknownLayerType {
        /// Profile containing the switcher.
        profile: String,
        /// Key index of the switcher.
        index: u8,
        /// The unrecognized value.
        layer_type: String,
    },

    /// An oriented template has no position table for the active orientation. Non-fatal.
    #[error("template '{template}' has no key positions for {orientation} orientation")]
    MissingOrientation {
        /// Template name.
        template: String,
        /// Orientation that was requested.
        orientation: String,
    },

    /// An oriented template is used in an orientation it does not declare
    /// in `supported_orientations`. Its positions are still applied. Non-fatal.
    #[error("template '{template}' does not list {orientation} in supported_orientations")]
    UnsupportedOrientation {
        /// Template name.
        template: String,
        /// Orientation that was requested.
        orientation: String,
    },

    /// A `key_positions` entry names a key missing from `key_definitions`. Non-fatal.
    #[error("template '{template}': key '{key_name}' in key_positions not found in key_definitions")]
    UnknownPositionName {
        /// Template name.
        template: String,
        /// Abstract key name that could not be found.
        key_name: String,
    },

    /// A layer's return key takes the slot of an authored action. Non-fatal.
    #[error("key {index} in '{layer}' is replaced by the {layer_type} return key for the switcher in {switcher_home}")]
    MirrorConflict {
        /// Profile name of the layer.
        layer: String,
        /// Key index of the return key.
        index: u8,
        /// Layer type of the governing switcher.
        layer_type: String,
        /// Where the governing switcher lives, e.g. `the main profile`.
        switcher_home: String,
    },

    /// Layers extend each other in a cycle. Non-fatal.
    #[error("layer '{layer}' extends '{source_name}', which is part of an extends cycle; it contributes no keys")]
    CyclicExtends {
        /// Layer being resolved.
        layer: String,
        /// Layer that could not be resolved first.
        source_name: String,
    },

    /// A color value could not be turned into an RGB triple.
    #[error("invalid color {value}: {reason}")]
    InvalidColor {
        /// The value as written.
        value: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A device limit was exceeded. The message is passed through unmodified.
    #[error(transparent)]
    Limit(#[from] LimitViolation),

    /// The document or a template file is structurally invalid.
    #[error("{}: {message}", path_display(.path.as_ref()))]
    Parse {
        /// File being parsed, when known.
        path: Option<PathBuf>,
        /// Human-readable error message.
        message: String,
    },

    /// Reading or writing a file failed.
    #[error("{message}: {source}")]
    Io {
        /// What was being attempted.
        message: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl CompileError {
    /// Creates a parse error with an optional file path.
    pub fn parse(path: Option<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path,
            message: message.into(),
        }
    }

    /// Creates an I/O error with context.
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Returns true for the kinds that only produce a warning.
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::UnknownExtendsSource { .. }
                | Self::UnknownTemplate { .. }
                | Self::UnknownLayerType { .. }
                | Self::MissingOrientation { .. }
                | Self::UnsupportedOrientation { .. }
                | Self::UnknownPositionName { .. }
                | Self::CyclicExtends { .. }
                | Self::MirrorConflict { .. }
        )
    }
}

/// Appends a warning unless one with the same message is already recorded.
pub(crate) fn push_unique(warnings: &mut Vec<CompileError>, warning: CompileError) {
    let text = warning.to_string();
    if !warnings.iter().any(|existing| existing.to_string() == text) {
        tracing::warn!("{}", text);
        warnings.push(warning);
    }
}

fn path_display(path: Option<&PathBuf>) -> String {
    path.map_or_else(|| "<document>".to_string(), |p| p.display().to_string())
}
