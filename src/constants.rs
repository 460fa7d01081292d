//! Application-wide constants.
//!
//! Device limits for the duckyPad Pro live here so the validator, the
//! key-spec expander, and the generator agree on them.

/// The display name of the application.
pub const APP_NAME: &str = "padforge";

/// Directory name used under the platform config directory.
pub const APP_CONFIG_DIR: &str = "padforge";

/// Physical keys in the switch grid.
pub const PHYSICAL_KEYS: u8 = 20;

/// Total addressable key slots, including the rotary-encoder events.
pub const TOTAL_KEYS: u8 = 26;

/// Maximum number of profiles the firmware will load.
pub const MAX_PROFILES: usize = 64;

/// Maximum characters in a profile (or layer) name.
pub const MAX_PROFILE_NAME_LENGTH: usize = 16;

/// Label limits in portrait orientation: (per line, total).
pub const PORTRAIT_LABEL_LIMITS: (usize, usize) = (5, 10);

/// Label limits in landscape orientation: (per line, total).
pub const LANDSCAPE_LABEL_LIMITS: (usize, usize) = (4, 8);
