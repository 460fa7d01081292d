//! Shared test fixtures for integration and CLI tests.
#![allow(dead_code)] // Not every test file uses every fixture

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The canonical two-profile document: `Test` with a `ctrl` layer entered
/// by holding key 1.
pub const MODIFIER_HOLD_DOC: &str = "\
profile:
  name: Test
  keys:
    1: { layer: ctrl, layer_type: modifier_hold, modifier: CTRL, label: [Ctrl] }
    2: { key: c, label: [Copy] }
  layers:
    ctrl:
      extends: [parent]
      keys:
        2: { key: c, modifier: CTRL, label: [Copy] }
";

/// Inline templates, an oriented template, and a layer chain.
pub const TEMPLATED_DOC: &str = "\
templates:
  nav:
    keys:
      1: { key: UP, label: [Up] }
      2: { key: DOWN, label: [Down] }
      3: { key: LEFT, label: [Left] }
  nav_alt:
    keys:
      3: { key: HOME, label: [Home] }
      4: { key: END, label: [End] }
  wheel:
    key_definitions:
      cw: { key: VOLUP, label: [Vol+] }
      ccw: { key: VOLDOWN, label: [Vol-] }
    key_positions:
      portrait: { cw: 21, ccw: 22 }
      landscape: { cw: 23, ccw: 24 }
profile:
  name: Work
  templates: [nav, nav_alt, wheel]
  keys:
    1: { key: F1, label: [Help] }
    6-10: { key: a }
    11-12:
      - { key: x, label: [X] }
      - { key: y, label: [Y] }
    20: { layer: sym, layer_type: toggle, label: [Sym] }
  layers:
    base:
      extends: [parent]
      keys:
        2: { string: hello }
    sym:
      extends: [base, nav]
      config:
        orientation: landscape
      templates: [wheel]
      keys:
        1: { key: '!' }
";

/// Writes a document into a fresh temporary directory.
///
/// Returns the document path and the directory guard.
pub fn write_doc(contents: &str) -> (PathBuf, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("profile.yaml");
    fs::write(&path, contents).expect("Failed to write document");
    (path, temp_dir)
}

/// Writes an external template file `<dir>/<name>.yaml`.
pub fn write_template(dir: &Path, name: &str, body: &str) -> PathBuf {
    fs::create_dir_all(dir).expect("Failed to create template dir");
    let path = dir.join(format!("{name}.yaml"));
    fs::write(&path, body).expect("Failed to write template");
    path
}

/// Reads a generated file, panicking with a readable message if absent.
pub fn read_output(dir: &Path, profile: &str, file: &str) -> String {
    let path = dir.join(profile).join(file);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Missing {}: {e}", path.display()))
}

/// Lists the file names in a generated profile folder, sorted.
pub fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("Failed to read dir")
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Snapshot of every file under `dir` as (relative path, contents).
pub fn snapshot(dir: &Path) -> Vec<(String, String)> {
    let mut files = Vec::new();
    for profile in list_files(dir) {
        let profile_dir = dir.join(&profile);
        for name in list_files(&profile_dir) {
            let contents = fs::read_to_string(profile_dir.join(&name)).expect("read");
            files.push((format!("{profile}/{name}"), contents));
        }
    }
    files
}
