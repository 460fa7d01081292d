//! Writes generated profiles to disk.
//!
//! Each profile becomes one folder under the output directory. Files left
//! over from an earlier run (a key that no longer exists, a README that is
//! now disabled) are removed so the folder matches the current document.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{CompileError, CompileResult};
use crate::firmware::generator::{GeneratedProfiles, ProfileArtifacts};

/// Result of writing one profile folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenProfile {
    /// Profile name.
    pub name: String,
    /// Folder that was written.
    pub path: PathBuf,
    /// Files written, in write order.
    pub files: Vec<PathBuf>,
    /// Stale files removed.
    pub removed: Vec<PathBuf>,
}

/// Writes every profile under `output_dir`, main profile first.
///
/// # Errors
///
/// Returns an I/O error if a folder cannot be created or a file cannot be
/// written or removed.
pub fn write_profiles(
    generated: &GeneratedProfiles,
    output_dir: &Path,
) -> CompileResult<Vec<WrittenProfile>> {
    fs::create_dir_all(output_dir).map_err(|e| {
        CompileError::io(
            format!("Failed to create output directory {}", output_dir.display()),
            e,
        )
    })?;

    generated
        .profiles
        .iter()
        .map(|profile| write_profile(profile, output_dir))
        .collect()
}

/// Writes one profile folder.
///
/// # Errors
///
/// Returns an I/O error on any filesystem failure.
pub fn write_profile(profile: &ProfileArtifacts, output_dir: &Path) -> CompileResult<WrittenProfile> {
    let dir = output_dir.join(&profile.dir_name);
    fs::create_dir_all(&dir).map_err(|e| {
        CompileError::io(format!("Failed to create directory {}", dir.display()), e)
    })?;

    let removed = remove_stale_files(profile, &dir)?;

    let mut files = Vec::with_capacity(profile.files.len());
    for (name, content) in &profile.files {
        let path = dir.join(name);
        fs::write(&path, content)
            .map_err(|e| CompileError::io(format!("Failed to write {}", path.display()), e))?;
        debug!("Wrote {}", path.display());
        files.push(path);
    }

    info!(
        "Wrote profile '{}' to {} ({} files)",
        profile.name,
        dir.display(),
        files.len()
    );

    Ok(WrittenProfile {
        name: profile.name.clone(),
        path: dir,
        files,
        removed,
    })
}

/// File names this tool owns inside a profile folder.
fn is_generated_name(name: &str) -> bool {
    if name == "config.txt" || name == "README.md" {
        return true;
    }
    let Some(stem) = name.strip_prefix("key").and_then(|s| s.strip_suffix(".txt")) else {
        return false;
    };
    let digits = stem.strip_suffix("-release").unwrap_or(stem);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn remove_stale_files(profile: &ProfileArtifacts, dir: &Path) -> CompileResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .map_err(|e| CompileError::io(format!("Failed to read directory {}", dir.display()), e))?;

    let mut removed = Vec::new();
    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if !is_generated_name(name) || profile.files.contains_key(name) {
            continue;
        }

        let path = entry.path();
        fs::remove_file(&path)
            .map_err(|e| CompileError::io(format!("Failed to remove {}", path.display()), e))?;
        debug!("Removed stale {}", path.display());
        removed.push(path);
    }
    removed.sort();
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn artifacts(files: &[(&str, &str)]) -> ProfileArtifacts {
        ProfileArtifacts {
            name: "Main".to_string(),
            dir_name: "Main".to_string(),
            files: files
                .iter()
                .map(|(name, content)| ((*name).to_string(), (*content).to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn test_generated_names() {
        assert!(is_generated_name("key1.txt"));
        assert!(is_generated_name("key26-release.txt"));
        assert!(is_generated_name("config.txt"));
        assert!(!is_generated_name("key.txt"));
        assert!(!is_generated_name("keyboard.txt"));
        assert!(!is_generated_name("notes.txt"));
    }

    #[test]
    fn test_write_removes_stale_keys_only() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("Main");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("key9.txt"), "old").unwrap();
        fs::write(dir.join("notes.md"), "mine").unwrap();

        let profile = artifacts(&[("config.txt", ""), ("key1.txt", "REM Key 1\n")]);
        let written = write_profile(&profile, temp.path()).unwrap();

        assert_eq!(written.files.len(), 2);
        assert_eq!(written.removed, vec![dir.join("key9.txt")]);
        assert!(!dir.join("key9.txt").exists());
        assert!(dir.join("notes.md").exists());
        assert_eq!(fs::read_to_string(dir.join("key1.txt")).unwrap(), "REM Key 1\n");
    }
}
