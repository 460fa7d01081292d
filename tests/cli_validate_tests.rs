//! End-to-end tests for `padforge validate`.

use std::process::Command;

mod fixtures;
use fixtures::*;

/// Path to the padforge binary
fn padforge_bin() -> &'static str {
    env!("CARGO_BIN_EXE_padforge")
}

#[test]
fn test_validate_valid_document() {
    let (doc, _temp_dir) = write_doc(TEMPLATED_DOC);

    let output = Command::new(padforge_bin())
        .args(["validate", doc.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("✓ Validation passed"));
}

#[test]
fn test_validate_reports_every_label_problem_as_json() {
    let (doc, _temp_dir) = write_doc(
        "\
profile:
  name: Pad
  config:
    orientation: landscape
  keys:
    1: { key: a, label: [TOOLONG] }
    2: { key: b, label: [ABCD, EFGHIJ] }
",
    );

    let output = Command::new(padforge_bin())
        .args(["validate", doc.to_str().unwrap(), "--json"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let result: serde_json::Value =
        serde_json::from_str(&stdout).expect("Should parse JSON output");
    let errors = result["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0]["kind"], "key_label");
    assert_eq!(errors[0]["key"], 1);
    assert_eq!(errors[1]["key"], 2);
}

#[test]
fn test_validate_strict_fails_on_warnings() {
    let (doc, _temp_dir) = write_doc("profile:\n  name: Pad\n  templates: [missing]\n");

    let output = Command::new(padforge_bin())
        .args(["validate", doc.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("missing"));

    let output = Command::new(padforge_bin())
        .args(["validate", doc.to_str().unwrap(), "--strict"])
        .output()
        .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_validate_parse_error() {
    let (doc, _temp_dir) = write_doc("profile:\n  keys: [1, 2\n");

    let output = Command::new(padforge_bin())
        .args(["validate", doc.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("Error:"));
}

#[test]
fn test_validate_strict_reports_replaced_layer_key() {
    let (doc, _temp_dir) = write_doc(
        "\
profile:
  name: Pad
  keys:
    4: { layer: fn, layer_type: toggle }
  layers:
    fn:
      keys:
        4: { key: b }
",
    );

    let output = Command::new(padforge_bin())
        .args(["validate", doc.to_str().unwrap(), "--strict", "--json"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let result: serde_json::Value = serde_json::from_slice(&output.stdout).expect("Should parse JSON output");
    let warnings = result["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0]["message"]
        .as_str()
        .unwrap()
        .contains("key 4 in 'Pad-fn' is replaced"));
}

#[test]
fn test_validate_reports_duplicate_names() {
    let (doc, _temp_dir) = write_doc(
        "\
profile:
  name: Pad
  layers:
    nav:
      name: pad
",
    );

    let output = Command::new(padforge_bin())
        .args(["validate", doc.to_str().unwrap(), "--json"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let result: serde_json::Value = serde_json::from_slice(&output.stdout).expect("Should parse JSON output");
    assert_eq!(result["errors"][0]["kind"], "duplicate_name");
}
