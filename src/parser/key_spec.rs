//! Key-spec expansion.
//!
//! A `keys:` block maps key specs to raw definitions:
//!
//! ```yaml
//! keys:
//!   1: A                    # string shorthand
//!   2: [B, Back]            # [key, label line 1]
//!   3: [C, Copy, All]       # [key, label line 1, label line 2]
//!   "6-10": [A, E, 1, 2, 3] # one definition per index
//!   "11-12": { key: X }     # replicated to every index
//!   13: { string: hello }   # already normalized
//! ```
//!
//! Expansion turns each entry into one normalized [`KeyDefinition`] per key
//! index.

use std::fmt;
use std::ops::RangeInclusive;

use serde_yml::{Mapping, Value};

use crate::constants::TOTAL_KEYS;
use crate::error::{CompileError, CompileResult};
use crate::models::key::scalar_to_string;
use crate::models::{KeyDefinition, KeyMap};

/// A parsed key spec: one index or an inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySpec {
    /// A single key index.
    Single(u8),
    /// An inclusive `N-M` range.
    Range {
        /// First index.
        start: u8,
        /// Last index.
        end: u8,
    },
}

impl KeySpec {
    /// Parses a spec token: `"7"`, `"6-10"`.
    ///
    /// ```
    /// use padforge::parser::KeySpec;
    ///
    /// assert_eq!(KeySpec::parse("7").unwrap(), KeySpec::Single(7));
    /// assert_eq!(KeySpec::parse("6-10").unwrap().len(), 5);
    /// assert!(KeySpec::parse("0").is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `InvalidKeySpec` for malformed tokens and `KeyOutOfRange` for
    /// indices outside 1..=26.
    pub fn parse(token: &str) -> CompileResult<Self> {
        let token = token.trim();

        if let Some((start, end)) = token.split_once('-') {
            let start = parse_index(token, start)?;
            let end = parse_index(token, end)?;
            if start > end {
                return Err(CompileError::InvalidKeySpec {
                    spec: token.to_string(),
                    reason: "range start is greater than range end".to_string(),
                });
            }
            return Ok(Self::Range { start, end });
        }

        parse_index(token, token).map(Self::Single)
    }

    /// Parses a spec from a YAML mapping key, which may be an integer or a string.
    pub fn from_value(value: &Value) -> CompileResult<Self> {
        match value {
            Value::Number(_) | Value::String(_) => {
                let token = scalar_to_string(value).unwrap_or_default();
                Self::parse(&token)
            }
            other => Err(CompileError::InvalidKeySpec {
                spec: format!("{other:?}"),
                reason: "key specs must be an index or an N-M range".to_string(),
            }),
        }
    }

    /// Indices covered, ascending.
    #[must_use]
    pub const fn indices(&self) -> RangeInclusive<u8> {
        match *self {
            Self::Single(index) => index..=index,
            Self::Range { start, end } => start..=end,
        }
    }

    /// Number of indices covered.
    #[must_use]
    pub fn len(&self) -> usize {
        match *self {
            Self::Single(_) => 1,
            Self::Range { start, end } => usize::from(end - start) + 1,
        }
    }

    /// Always false; a spec covers at least one key.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Returns true for `N-M` specs.
    #[must_use]
    pub const fn is_range(&self) -> bool {
        matches!(self, Self::Range { .. })
    }
}

impl fmt::Display for KeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(index) => write!(f, "{index}"),
            Self::Range { start, end } => write!(f, "{start}-{end}"),
        }
    }
}

/// Parses one key index and checks it against the device's key slots.
pub fn parse_index(spec: &str, part: &str) -> CompileResult<u8> {
    let part = part.trim();
    let index: u32 = part.parse().map_err(|_| CompileError::InvalidKeySpec {
        spec: spec.to_string(),
        reason: format!("'{part}' is not a key number"),
    })?;

    match u8::try_from(index) {
        Ok(index) if (1..=TOTAL_KEYS).contains(&index) => Ok(index),
        _ => Err(CompileError::KeyOutOfRange {
            spec: spec.to_string(),
            index,
            max: TOTAL_KEYS,
        }),
    }
}

/// Normalizes one raw definition (string, 1-3 element list, or mapping).
///
/// # Errors
///
/// Returns `InvalidDefinition` for lists of any other length, mappings that
/// do not match the key-definition fields, and non-definition values.
pub fn normalize_definition(spec: &str, raw: &Value) -> CompileResult<KeyDefinition> {
    let invalid = |reason: String| CompileError::InvalidDefinition {
        spec: spec.to_string(),
        reason,
    };

    match raw {
        Value::String(_) | Value::Number(_) | Value::Bool(_) => {
            Ok(KeyDefinition::key(scalar_to_string(raw).unwrap_or_default()))
        }
        Value::Sequence(items) => {
            let text = |value: &Value| match value {
                Value::Null => Ok(String::new()),
                other => scalar_to_string(other)
                    .ok_or_else(|| invalid("list shorthand items must be strings".to_string())),
            };

            let (key, labels) = match items.as_slice() {
                [key] => (text(key)?, Vec::new()),
                [key, line1] => (text(key)?, vec![text(line1)?]),
                [key, line1, line2] => (text(key)?, vec![text(line1)?, text(line2)?]),
                _ => {
                    return Err(invalid(format!(
                        "list shorthand needs 1 to 3 elements, got {}",
                        items.len()
                    )))
                }
            };

            Ok(KeyDefinition::key(key).with_label(labels))
        }
        Value::Mapping(_) => serde_yml::from_value(raw.clone()).map_err(|e| invalid(e.to_string())),
        Value::Null => Err(invalid("definition is empty".to_string())),
        Value::Tagged(_) => Err(invalid("tagged values are not supported".to_string())),
    }
}

/// Expands one `spec: definition` entry.
///
/// A range paired with a list maps element `i` to the `i`-th index of the
/// range. A range paired with anything else replicates the definition.
///
/// # Errors
///
/// Returns `SpecMismatch` when a range and its list differ in length.
pub fn expand(spec: KeySpec, raw: &Value) -> CompileResult<Vec<(u8, KeyDefinition)>> {
    let spec_text = spec.to_string();

    match (spec.is_range(), raw) {
        (true, Value::Sequence(items)) => {
            if items.len() != spec.len() {
                return Err(CompileError::SpecMismatch {
                    spec: spec_text,
                    keys: spec.len(),
                    definitions: items.len(),
                });
            }

            spec.indices()
                .zip(items)
                .map(|(index, item)| {
                    normalize_definition(&index.to_string(), item).map(|def| (index, def))
                })
                .collect()
        }
        _ => {
            let def = normalize_definition(&spec_text, raw)?;
            Ok(spec.indices().map(|index| (index, def.clone())).collect())
        }
    }
}

/// Expands a whole `keys:` mapping. Later entries overwrite earlier ones
/// that cover the same index.
pub fn expand_key_map(keys: &Mapping) -> CompileResult<KeyMap> {
    let mut expanded = KeyMap::new();

    for (raw_spec, raw_def) in keys {
        let spec = KeySpec::from_value(raw_spec)?;
        for (index, def) in expand(spec, raw_def)? {
            if expanded.insert(index, def).is_some() {
                tracing::debug!("Key {} redefined by spec {}", index, spec);
            }
        }
    }

    Ok(expanded)
}
