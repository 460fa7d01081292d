//! RGB color handling: hex parsing, named colors, and config formatting.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CompileError, CompileResult};

/// RGB color value.
///
/// Represents a color using red, green, and blue channels (0-255 each).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RgbColor {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl RgbColor {
    /// Creates a new `RgbColor` from individual channel values.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses an `RgbColor` from a hex string.
    ///
    /// Supports formats: "#RRGGBB", "RRGGBB", "#rrggbb", "rrggbb"
    ///
    /// # Examples
    ///
    /// ```
    /// use padforge::models::RgbColor;
    ///
    /// let color = RgbColor::from_hex("#FF0000").unwrap();
    /// assert_eq!(color, RgbColor::new(255, 0, 0));
    ///
    /// let color = RgbColor::from_hex("00FF00").unwrap();
    /// assert_eq!(color, RgbColor::new(0, 255, 0));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid hex color format.
    pub fn from_hex(hex: &str) -> CompileResult<Self> {
        let trimmed = hex.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

        if digits.len() != 6 || !digits.is_ascii() {
            return Err(CompileError::InvalidColor {
                value: hex.to_string(),
                reason: "expected 6 hex digits (RRGGBB)".to_string(),
            });
        }

        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| CompileError::InvalidColor {
                value: hex.to_string(),
                reason: format!("invalid {name} channel"),
            })
        };

        Ok(Self::new(
            channel(0..2, "red")?,
            channel(2..4, "green")?,
            channel(4..6, "blue")?,
        ))
    }

    /// Converts the color to a hex string in the format "#RRGGBB" (uppercase).
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Formats the color as the space-separated triple used by `config.txt`.
    ///
    /// ```
    /// use padforge::models::RgbColor;
    ///
    /// assert_eq!(RgbColor::new(255, 0, 128).to_config_triple(), "255 0 128");
    /// ```
    #[must_use]
    pub fn to_config_triple(&self) -> String {
        format!("{} {} {}", self.r, self.g, self.b)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Default for RgbColor {
    /// Default color is white (#FFFFFF).
    fn default() -> Self {
        Self::new(255, 255, 255)
    }
}

/// A color as written in the document: a name, a hex string, or an RGB triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    /// `[r, g, b]`
    Rgb([u8; 3]),
    /// `"red"`, `"dark_blue"`, `"#FF8800"`
    Name(String),
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb([r, g, b]) => write!(f, "[{r}, {g}, {b}]"),
            Self::Name(name) => write!(f, "'{name}'"),
        }
    }
}

/// Turns authored color values into RGB triples.
pub trait ColorResolver {
    /// Resolves one color value.
    fn resolve(&self, value: &ColorValue) -> CompileResult<RgbColor>;
}

/// Resolver backed by a fixed table of common web color names.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamedColors;

/// Separator-free aliases that do not follow the "strip underscores" rule.
const COLOR_ALIASES: &[(&str, &str)] = &[
    ("navyblue", "navy"),
    ("dkblue", "darkblue"),
    ("ltblue", "lightblue"),
    ("dkred", "darkred"),
    ("dkgreen", "darkgreen"),
    ("ltgreen", "lightgreen"),
    ("dkgray", "darkgray"),
    ("ltgray", "lightgray"),
    ("dkgrey", "darkgrey"),
    ("ltgrey", "lightgrey"),
];

const NAMED_COLORS: &[(&str, RgbColor)] = &[
    ("red", RgbColor::new(255, 0, 0)),
    ("green", RgbColor::new(0, 128, 0)),
    ("blue", RgbColor::new(0, 0, 255)),
    ("yellow", RgbColor::new(255, 255, 0)),
    ("cyan", RgbColor::new(0, 255, 255)),
    ("magenta", RgbColor::new(255, 0, 255)),
    ("white", RgbColor::new(255, 255, 255)),
    ("black", RgbColor::new(0, 0, 0)),
    ("orange", RgbColor::new(255, 165, 0)),
    ("purple", RgbColor::new(128, 0, 128)),
    ("pink", RgbColor::new(255, 192, 203)),
    ("gray", RgbColor::new(128, 128, 128)),
    ("grey", RgbColor::new(128, 128, 128)),
    ("lime", RgbColor::new(0, 255, 0)),
    ("navy", RgbColor::new(0, 0, 128)),
    ("teal", RgbColor::new(0, 128, 128)),
    ("maroon", RgbColor::new(128, 0, 0)),
    ("olive", RgbColor::new(128, 128, 0)),
    ("aqua", RgbColor::new(0, 255, 255)),
    ("silver", RgbColor::new(192, 192, 192)),
    ("gold", RgbColor::new(255, 215, 0)),
    ("coral", RgbColor::new(255, 127, 80)),
    ("salmon", RgbColor::new(250, 128, 114)),
    ("tomato", RgbColor::new(255, 99, 71)),
    ("crimson", RgbColor::new(220, 20, 60)),
    ("violet", RgbColor::new(238, 130, 238)),
    ("indigo", RgbColor::new(75, 0, 130)),
    ("darkblue", RgbColor::new(0, 0, 139)),
    ("darkred", RgbColor::new(139, 0, 0)),
    ("darkgreen", RgbColor::new(0, 100, 0)),
    ("darkcyan", RgbColor::new(0, 139, 139)),
    ("darkgray", RgbColor::new(169, 169, 169)),
    ("darkgrey", RgbColor::new(169, 169, 169)),
    ("darkmagenta", RgbColor::new(139, 0, 139)),
    ("darkorange", RgbColor::new(255, 140, 0)),
    ("darkviolet", RgbColor::new(148, 0, 211)),
    ("lightblue", RgbColor::new(173, 216, 230)),
    ("lightgreen", RgbColor::new(144, 238, 144)),
    ("lightgray", RgbColor::new(211, 211, 211)),
    ("lightgrey", RgbColor::new(211, 211, 211)),
    ("lightcyan", RgbColor::new(224, 255, 255)),
    ("lightpink", RgbColor::new(255, 182, 193)),
    ("lightyellow", RgbColor::new(255, 255, 224)),
    ("skyblue", RgbColor::new(135, 206, 235)),
    ("steelblue", RgbColor::new(70, 130, 180)),
    ("royalblue", RgbColor::new(65, 105, 225)),
    ("hotpink", RgbColor::new(255, 105, 180)),
    ("deeppink", RgbColor::new(255, 20, 147)),
    ("forestgreen", RgbColor::new(34, 139, 34)),
    ("limegreen", RgbColor::new(50, 205, 50)),
    ("seagreen", RgbColor::new(46, 139, 87)),
    ("midnightblue", RgbColor::new(25, 25, 112)),
    ("dodgerblue", RgbColor::new(30, 144, 255)),
    ("cornflowerblue", RgbColor::new(100, 149, 237)),
];

impl NamedColors {
    /// Normalizes a color name: lowercase, separators removed, aliases applied.
    fn normalize(name: &str) -> String {
        let squashed: String = name
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect();

        COLOR_ALIASES
            .iter()
            .find(|(alias, _)| *alias == squashed)
            .map_or(squashed, |(_, target)| (*target).to_string())
    }

    /// Looks up a color by name.
    #[must_use]
    pub fn lookup(name: &str) -> Option<RgbColor> {
        let normalized = Self::normalize(name);
        NAMED_COLORS
            .iter()
            .find(|(candidate, _)| *candidate == normalized)
            .map(|(_, color)| *color)
    }
}

impl ColorResolver for NamedColors {
    fn resolve(&self, value: &ColorValue) -> CompileResult<RgbColor> {
        match value {
            ColorValue::Rgb([r, g, b]) => Ok(RgbColor::new(*r, *g, *b)),
            ColorValue::Name(text) => {
                let trimmed = text.trim();
                let looks_hex = trimmed.starts_with('#')
                    || (trimmed.len() == 6 && trimmed.chars().all(|c| c.is_ascii_hexdigit()));
                if looks_hex {
                    return RgbColor::from_hex(trimmed);
                }

                Self::lookup(trimmed).ok_or_else(|| CompileError::InvalidColor {
                    value: value.to_string(),
                    reason: "unknown color name; use a common web color name, '#RRGGBB', or [r, g, b]"
                        .to_string(),
                })
            }
        }
    }
}
