//! Device limit validation before generation.
//!
//! This module checks profile names, key labels, the profile count, and
//! numbered profile slots against the duckyPad Pro's limits. Single checks fail fast with a
//! [`LimitViolation`]; [`ProfileValidator`] collects every problem into a
//! [`ValidationReport`] for the `validate` command.

// Allow format! appended to String - more readable for building messages
#![allow(clippy::format_push_string)]

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::constants::{
    LANDSCAPE_LABEL_LIMITS, MAX_PROFILES, MAX_PROFILE_NAME_LENGTH, PORTRAIT_LABEL_LIMITS,
};
use crate::error::CompileError;
use crate::models::Orientation;
use crate::services::{ResolvedDocument, ResolvedProfile};

/// Characters that cannot appear in a profile folder name.
pub const INVALID_FOLDER_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// A device limit was exceeded. Carries the user-facing message verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LimitViolation {
    message: String,
}

impl LimitViolation {
    /// Creates a violation with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Limit checks required before profiles are written.
pub trait LimitValidator {
    /// Checks a profile (or layer) name.
    fn validate_profile_name(&self, name: &str) -> Result<(), LimitViolation>;

    /// Checks the two label lines of key `index` for `orientation`.
    fn validate_key_label(
        &self,
        index: u8,
        line1: &str,
        line2: &str,
        orientation: Orientation,
    ) -> Result<(), LimitViolation>;

    /// Checks the number of profiles generated from one document.
    fn validate_profile_count(&self, count: usize) -> Result<(), LimitViolation>;

    /// Checks that `count` profiles numbered from `start` fit the device's slots.
    fn validate_profile_slots(&self, start: u32, count: usize) -> Result<(), LimitViolation>;
}

/// The duckyPad Pro's limits.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuckyPadLimits;

impl DuckyPadLimits {
    /// Per-line and total label limits for an orientation.
    #[must_use]
    pub const fn label_limits(orientation: Orientation) -> (usize, usize) {
        match orientation {
            Orientation::Portrait => PORTRAIT_LABEL_LIMITS,
            Orientation::Landscape => LANDSCAPE_LABEL_LIMITS,
        }
    }
}

impl LimitValidator for DuckyPadLimits {
    fn validate_profile_name(&self, name: &str) -> Result<(), LimitViolation> {
        if name.trim().is_empty() {
            return Err(LimitViolation::new("Profile name cannot be empty"));
        }

        let count = name.chars().count();
        if count > MAX_PROFILE_NAME_LENGTH {
            return Err(LimitViolation::new(format!(
                "Profile name \"{name}\" exceeds {MAX_PROFILE_NAME_LENGTH} character limit ({count} chars)"
            )));
        }

        let found: Vec<String> = name
            .chars()
            .filter(|c| INVALID_FOLDER_CHARS.contains(c))
            .map(|c| format!("'{c}'"))
            .collect();
        if !found.is_empty() {
            return Err(LimitViolation::new(format!(
                "Profile name \"{name}\" contains invalid filesystem characters: {}",
                found.join(", ")
            )));
        }

        Ok(())
    }

    fn validate_key_label(
        &self,
        index: u8,
        line1: &str,
        line2: &str,
        orientation: Orientation,
    ) -> Result<(), LimitViolation> {
        let (per_line, total) = Self::label_limits(orientation);
        let count1 = line1.chars().count();
        let count2 = line2.chars().count();

        if count1 > per_line {
            return Err(LimitViolation::new(format!(
                "Key {index} label line 1 \"{line1}\" exceeds {per_line} character limit for {orientation} ({count1} chars)"
            )));
        }
        if count2 > per_line {
            return Err(LimitViolation::new(format!(
                "Key {index} label line 2 \"{line2}\" exceeds {per_line} character limit for {orientation} ({count2} chars)"
            )));
        }
        if count1 + count2 > total {
            return Err(LimitViolation::new(format!(
                "Key {index} label total \"{line1}/{line2}\" exceeds {total} character limit for {orientation} ({} chars total)",
                count1 + count2
            )));
        }

        Ok(())
    }

    fn validate_profile_count(&self, count: usize) -> Result<(), LimitViolation> {
        if count > MAX_PROFILES {
            return Err(LimitViolation::new(format!(
                "Total profiles ({count}) exceeds maximum limit of {MAX_PROFILES}"
            )));
        }
        Ok(())
    }

    fn validate_profile_slots(&self, start: u32, count: usize) -> Result<(), LimitViolation> {
        let first = usize::try_from(start).unwrap_or(usize::MAX);
        let last = first.saturating_add(count.saturating_sub(1));
        if last > MAX_PROFILES {
            return Err(LimitViolation::new(format!(
                "Profile indices {start}-{last} exceed the device's {MAX_PROFILES} profile slots"
            )));
        }
        Ok(())
    }
}

/// One violation per profile whose name collides with an earlier one once
/// case is ignored, as on the SD card's FAT filesystem.
#[must_use]
pub fn duplicate_names(document: &ResolvedDocument) -> Vec<LimitViolation> {
    let mut seen: Vec<(String, &str)> = Vec::new();
    let mut duplicates = Vec::new();

    for profile in document.profiles() {
        let folded = profile.name.to_lowercase();
        match seen.iter().find(|(existing, _)| *existing == folded) {
            Some((_, first)) => duplicates.push(LimitViolation::new(format!(
                "Profile name \"{}\" is already used by \"{first}\"; profile names must be unique ignoring case",
                profile.name
            ))),
            None => seen.push((folded, profile.name.as_str())),
        }
    }

    duplicates
}

/// Validation result with specific errors and warnings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    /// Limit violations that prevent generation
    pub errors: Vec<ValidationError>,
    /// Non-critical warnings
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// Creates a new empty validation report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Returns true if there are no errors (warnings are allowed).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Adds an error to the report.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Adds a warning to the report.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Formats the report as a user-friendly error message.
    #[must_use]
    pub fn format_message(&self) -> String {
        let mut message = String::new();

        if !self.errors.is_empty() {
            message.push_str(&format!("❌ {} validation errors:\n", self.errors.len()));
            for (idx, error) in self.errors.iter().enumerate() {
                message.push_str(&format!("  {}. {}\n", idx + 1, error));
            }
        }

        if !self.warnings.is_empty() {
            message.push_str(&format!("\n⚠️  {} warnings:\n", self.warnings.len()));
            for (idx, warning) in self.warnings.iter().enumerate() {
                message.push_str(&format!("  {}. {}\n", idx + 1, warning));
            }
        }

        message
    }
}

/// Validation error with context.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationError {
    /// Type of validation error
    pub kind: ValidationErrorKind,
    /// Profile where the error occurred
    pub profile: Option<String>,
    /// Key index where the error occurred
    pub key: Option<u8>,
    /// Human-readable error message
    pub message: String,
    /// Optional suggestion for fixing the error
    pub suggestion: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            profile: None,
            key: None,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Sets the profile context.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Sets the key context.
    #[must_use]
    pub const fn with_key(mut self, key: u8) -> Self {
        self.key = Some(key);
        self
    }

    /// Sets a suggestion for fixing the error.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(profile) = &self.profile {
            write!(f, "[{profile}] {}: {}", self.kind, self.message)?;
        } else {
            write!(f, "{}: {}", self.kind, self.message)?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n    → {suggestion}")?;
        }

        Ok(())
    }
}

/// Types of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// Profile name empty, too long, or not a valid folder name
    ProfileName,
    /// Key label exceeds the orientation's limits
    KeyLabel,
    /// More profiles than the device loads, or numbering past its last slot
    ProfileCount,
    /// Two profiles would share a name and folder
    DuplicateName,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProfileName => write!(f, "Profile Name"),
            Self::KeyLabel => write!(f, "Key Label"),
            Self::ProfileCount => write!(f, "Profile Count"),
            Self::DuplicateName => write!(f, "Duplicate Name"),
        }
    }
}

/// Validation warning (non-blocking).
#[derive(Debug, Clone, Serialize)]
pub struct ValidationWarning {
    /// Warning message
    pub message: String,
}

impl ValidationWarning {
    /// Creates a new validation warning
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<&CompileError> for ValidationWarning {
    fn from(error: &CompileError) -> Self {
        Self::new(error.to_string())
    }
}

/// Runs every limit check over a resolved document.
pub struct ProfileValidator<'a, V: LimitValidator> {
    limits: &'a V,
    profile_index: Option<u32>,
}

impl<'a, V: LimitValidator> ProfileValidator<'a, V> {
    /// Creates a validator using `limits`.
    #[must_use]
    pub const fn new(limits: &'a V) -> Self {
        Self {
            limits,
            profile_index: None,
        }
    }

    /// Also checks numbered slots when profiles are numbered from `index`.
    #[must_use]
    pub const fn with_profile_index(mut self, index: Option<u32>) -> Self {
        self.profile_index = index;
        self
    }

    /// Fails on the first violation, in generation order: profile count,
    /// numbered slots, duplicate names, then each profile's name and labels.
    ///
    /// # Errors
    ///
    /// Returns the first [`LimitViolation`] found.
    pub fn require_valid(&self, document: &ResolvedDocument) -> Result<(), LimitViolation> {
        self.limits.validate_profile_count(document.profile_count())?;
        if let Some(start) = self.profile_index {
            self.limits
                .validate_profile_slots(start, document.profile_count())?;
        }
        if let Some(duplicate) = duplicate_names(document).into_iter().next() {
            return Err(duplicate);
        }
        for profile in document.profiles() {
            self.limits.validate_profile_name(&profile.name)?;
            for (&index, def) in &profile.keys {
                self.limits.validate_key_label(
                    index,
                    def.label_line(0),
                    def.label_line(1),
                    profile.orientation(),
                )?;
            }
        }
        Ok(())
    }

    /// Collects every violation into a report. Resolution warnings are
    /// carried over as report warnings.
    #[must_use]
    pub fn validate(&self, document: &ResolvedDocument) -> ValidationReport {
        let mut report = ValidationReport::new();

        if let Err(violation) = self.limits.validate_profile_count(document.profile_count()) {
            report.add_error(
                ValidationError::new(ValidationErrorKind::ProfileCount, violation.message())
                    .with_suggestion("Split the document or remove layers"),
            );
        }

        if let Some(start) = self.profile_index {
            if let Err(violation) = self
                .limits
                .validate_profile_slots(start, document.profile_count())
            {
                report.add_error(
                    ValidationError::new(ValidationErrorKind::ProfileCount, violation.message())
                        .with_suggestion("Use a lower starting profile index"),
                );
            }
        }

        for duplicate in duplicate_names(document) {
            report.add_error(
                ValidationError::new(ValidationErrorKind::DuplicateName, duplicate.message())
                    .with_suggestion("Give each layer a distinct name"),
            );
        }

        for profile in document.profiles() {
            self.validate_profile(&mut report, profile);
        }

        for warning in &document.warnings {
            report.add_warning(warning.into());
        }

        report
    }

    fn validate_profile(&self, report: &mut ValidationReport, profile: &ResolvedProfile) {
        if let Err(violation) = self.limits.validate_profile_name(&profile.name) {
            report.add_error(
                ValidationError::new(ValidationErrorKind::ProfileName, violation.message())
                    .with_profile(&profile.name)
                    .with_suggestion("Shorten or rename the profile in your YAML file"),
            );
        }

        for (&index, def) in &profile.keys {
            if let Err(violation) = self.limits.validate_key_label(
                index,
                def.label_line(0),
                def.label_line(1),
                profile.orientation(),
            ) {
                report.add_error(
                    ValidationError::new(ValidationErrorKind::KeyLabel, violation.message())
                        .with_profile(&profile.name)
                        .with_key(index)
                        .with_suggestion("Shorten the label in your YAML file"),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landscape_label_limits() {
        let limits = DuckyPadLimits;
        let err = limits
            .validate_key_label(3, "ABCDEF", "", Orientation::Landscape)
            .unwrap_err();
        assert_eq!(
            err.message(),
            "Key 3 label line 1 \"ABCDEF\" exceeds 4 character limit for landscape (6 chars)"
        );

        assert!(limits
            .validate_key_label(3, "ABCD", "EFGH", Orientation::Landscape)
            .is_ok());
    }

    #[test]
    fn test_portrait_label_limits() {
        let limits = DuckyPadLimits;
        assert!(limits
            .validate_key_label(1, "ABCDE", "FGHIJ", Orientation::Portrait)
            .is_ok());
        assert!(limits
            .validate_key_label(1, "ABCDE", "FGHIJK", Orientation::Portrait)
            .is_err());
    }

    #[test]
    fn test_profile_name_limits() {
        let limits = DuckyPadLimits;
        assert!(limits.validate_profile_name("Photoshop").is_ok());
        assert!(limits.validate_profile_name("").is_err());

        let long = limits.validate_profile_name("ABCDEFGHIJKLMNOPQ").unwrap_err();
        assert_eq!(
            long.message(),
            "Profile name \"ABCDEFGHIJKLMNOPQ\" exceeds 16 character limit (17 chars)"
        );

        let bad = limits.validate_profile_name("a/b").unwrap_err();
        assert!(bad.message().contains("'/'"));
    }

    #[test]
    fn test_profile_count_limit() {
        let limits = DuckyPadLimits;
        assert!(limits.validate_profile_count(64).is_ok());
        assert_eq!(
            limits.validate_profile_count(65).unwrap_err().message(),
            "Total profiles (65) exceeds maximum limit of 64"
        );
    }

    #[test]
    fn test_profile_slot_limit() {
        let limits = DuckyPadLimits;
        assert!(limits.validate_profile_slots(62, 3).is_ok());
        assert_eq!(
            limits.validate_profile_slots(63, 3).unwrap_err().message(),
            "Profile indices 63-65 exceed the device's 64 profile slots"
        );
        assert!(limits.validate_profile_slots(u32::MAX, 2).is_err());
    }

    fn resolved(names: &[&str]) -> ResolvedDocument {
        let profile = |layer_id: Option<&str>, name: &str| ResolvedProfile {
            layer_id: layer_id.map(str::to_string),
            name: name.to_string(),
            config: crate::models::ProfileConfig::default(),
            keys: crate::models::KeyMap::new(),
        };
        ResolvedDocument {
            main: profile(None, names[0]),
            layers: names[1..]
                .iter()
                .enumerate()
                .map(|(i, name)| profile(Some(format!("l{i}").as_str()), *name))
                .collect(),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_duplicate_names_ignore_case() {
        assert!(duplicate_names(&resolved(&["Pad", "Pad-a", "Pad-b"])).is_empty());

        let duplicates = duplicate_names(&resolved(&["Pad", "Same", "pad", "SAME"]));
        assert_eq!(duplicates.len(), 2);
        assert!(duplicates[0].message().contains("\"pad\" is already used by \"Pad\""));
        assert!(duplicates[1].message().contains("\"SAME\" is already used by \"Same\""));
    }

    #[test]
    fn test_require_valid_checks_slots_and_duplicates() {
        let limits = DuckyPadLimits;
        let doc = resolved(&["Pad", "Nav"]);
        assert!(ProfileValidator::new(&limits).require_valid(&doc).is_ok());
        assert!(ProfileValidator::new(&limits)
            .with_profile_index(Some(64))
            .require_valid(&doc)
            .is_err());

        let report = ProfileValidator::new(&limits)
            .with_profile_index(Some(64))
            .validate(&resolved(&["Pad", "pad"]));
        let kinds: Vec<_> = report.errors.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![ValidationErrorKind::ProfileCount, ValidationErrorKind::DuplicateName]
        );
    }

    #[test]
    fn test_report_format_message() {
        let mut report = ValidationReport::new();
        assert!(report.is_valid());

        report.add_error(
            ValidationError::new(ValidationErrorKind::KeyLabel, "too long")
                .with_profile("Test")
                .with_key(2),
        );
        report.add_warning(ValidationWarning::new("unknown template"));

        assert!(!report.is_valid());
        let message = report.format_message();
        assert!(message.contains("1 validation errors"));
        assert!(message.contains("[Test] Key Label: too long"));
        assert!(message.contains("unknown template"));
    }
}
