//! Normalized key definitions and their categorization.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yml::Value;

use crate::models::rgb::ColorValue;

/// One fully normalized key definition: the unit of resolution.
///
/// Mapping definitions in the document deserialize straight into this type.
/// String and list shorthands are turned into it by the key-spec expander.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDefinition {
    /// Literal character or named key token (`"A"`, `"ENTER"`, `"CTRL"`).
    #[serde(default, deserialize_with = "opt_scalar", skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Literal text to type.
    #[serde(default, deserialize_with = "opt_scalar", skip_serializing_if = "Option::is_none")]
    pub string: Option<String>,
    /// Modifier combined with `key`, or held by a `modifier_hold` switcher.
    #[serde(default, deserialize_with = "opt_scalar", skip_serializing_if = "Option::is_none")]
    pub modifier: Option<String>,
    /// Emit as press/hold rather than a tap.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hold: bool,
    /// Up to two label lines.
    #[serde(default, deserialize_with = "string_or_seq", skip_serializing_if = "Vec::is_empty")]
    pub label: Vec<String>,
    /// Key color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorValue>,
    /// Suppress auto-repeat while held.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub no_repeat: bool,
    /// Allow the script to be aborted by another key press.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub allow_abort: bool,
    /// Target layer identifier for a switcher key.
    #[serde(default, deserialize_with = "opt_scalar", skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    /// Switching discipline, kept as written so unknown values can be reported.
    #[serde(default, deserialize_with = "opt_scalar", skip_serializing_if = "Option::is_none")]
    pub layer_type: Option<String>,
    /// `media` or `custom`.
    #[serde(default, deserialize_with = "opt_scalar", skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Media command for `action: media`.
    #[serde(default, deserialize_with = "opt_scalar", skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Script lines for `action: custom`.
    #[serde(default, deserialize_with = "string_or_seq", skip_serializing_if = "Vec::is_empty")]
    pub script: Vec<String>,
}

/// What a key definition does, in categorization priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCategory<'a> {
    /// Switches to another layer.
    Switcher {
        /// Target layer identifier.
        layer: &'a str,
        /// Raw `layer_type`, if given.
        layer_type: Option<&'a str>,
    },
    /// Media command.
    Media {
        /// Command token, if given.
        command: Option<&'a str>,
    },
    /// Author-supplied script lines.
    Custom {
        /// Lines to emit verbatim.
        script: &'a [String],
    },
    /// Literal text from `string`.
    Text(&'a str),
    /// A key token, possibly with a modifier.
    Plain(&'a str),
    /// Metadata only; no instructions.
    LabelOnly,
}

impl KeyDefinition {
    /// Creates a definition that presses a single key token.
    pub fn key(token: impl Into<String>) -> Self {
        Self {
            key: Some(token.into()),
            ..Self::default()
        }
    }

    /// Sets the label lines.
    #[must_use]
    pub fn with_label<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.label = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Categorizes the definition.
    ///
    /// `layer` wins over `action`, which wins over `string`, then `key`.
    /// A definition with none of them is label-only.
    #[must_use]
    pub fn category(&self) -> KeyCategory<'_> {
        if let Some(layer) = self.layer.as_deref() {
            return KeyCategory::Switcher {
                layer,
                layer_type: self.layer_type.as_deref(),
            };
        }

        match self.action.as_deref() {
            Some("media") => {
                return KeyCategory::Media {
                    command: self.command.as_deref(),
                }
            }
            Some("custom") => {
                return KeyCategory::Custom {
                    script: &self.script,
                }
            }
            _ => {}
        }

        if !self.script.is_empty() {
            return KeyCategory::Custom {
                script: &self.script,
            };
        }

        if let Some(text) = self.string.as_deref() {
            return KeyCategory::Text(text);
        }

        match self.key.as_deref() {
            Some(token) if !token.is_empty() => KeyCategory::Plain(token),
            _ => KeyCategory::LabelOnly,
        }
    }

    /// Returns true if this key switches layers.
    #[must_use]
    pub fn is_switcher(&self) -> bool {
        self.layer.is_some()
    }

    /// Returns true if pressing the key does something beyond showing metadata.
    #[must_use]
    pub fn produces_action(&self) -> bool {
        !matches!(self.category(), KeyCategory::LabelOnly)
    }

    /// Label lines joined for human-readable output, skipping blanks.
    #[must_use]
    pub fn label_text(&self, separator: &str) -> String {
        self.label
            .iter()
            .filter(|line| !line.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// First label line, or empty.
    #[must_use]
    pub fn label_line(&self, line: usize) -> &str {
        self.label.get(line).map_or("", String::as_str)
    }
}

/// Converts a YAML scalar into the string the author meant.
///
/// YAML reads `key: 1` as an integer; it still names the `1` key.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn opt_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => scalar_to_string(&value)
            .map(Some)
            .ok_or_else(|| D::Error::custom("expected a string or number")),
    }
}

fn string_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => Ok(String::new()),
                other => scalar_to_string(other)
                    .ok_or_else(|| D::Error::custom("list items must be strings or numbers")),
            })
            .collect(),
        other => scalar_to_string(&other)
            .map(|text| vec![text])
            .ok_or_else(|| D::Error::custom("expected a string or a list of strings")),
    }
}
