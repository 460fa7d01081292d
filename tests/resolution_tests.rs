//! Integration tests for template and `extends` resolution.

mod fixtures;
use fixtures::*;

use padforge::error::CompileError;
use padforge::models::KeyDefinition;
use padforge::services::ProfileService;

fn key_token(def: Option<&KeyDefinition>) -> Option<&str> {
    def.and_then(|def| def.key.as_deref())
}

#[test]
fn test_explicit_keys_beat_templates() {
    let (path, _temp) = write_doc(TEMPLATED_DOC);
    let resolved = ProfileService::resolve(&path, None).unwrap();

    assert_eq!(key_token(resolved.main.keys.get(&1)), Some("F1"));
    assert_eq!(key_token(resolved.main.keys.get(&2)), Some("DOWN"));
    assert!(resolved.warnings.is_empty(), "{:?}", resolved.warnings);
}

#[test]
fn test_last_listed_template_wins() {
    let (path, _temp) = write_doc(TEMPLATED_DOC);
    let resolved = ProfileService::resolve(&path, None).unwrap();

    assert_eq!(key_token(resolved.main.keys.get(&3)), Some("HOME"));
    assert_eq!(key_token(resolved.main.keys.get(&4)), Some("END"));
}

#[test]
fn test_ranges_expand_to_every_index() {
    let (path, _temp) = write_doc(TEMPLATED_DOC);
    let resolved = ProfileService::resolve(&path, None).unwrap();

    for index in 6..=10 {
        assert_eq!(key_token(resolved.main.keys.get(&index)), Some("a"), "key {index}");
    }
    assert_eq!(key_token(resolved.main.keys.get(&11)), Some("x"));
    assert_eq!(key_token(resolved.main.keys.get(&12)), Some("y"));
}

#[test]
fn test_oriented_template_follows_orientation() {
    let (path, _temp) = write_doc(TEMPLATED_DOC);
    let resolved = ProfileService::resolve(&path, None).unwrap();

    assert_eq!(key_token(resolved.main.keys.get(&21)), Some("VOLUP"));
    assert!(!resolved.main.keys.contains_key(&23));

    let sym = resolved.layer("sym").unwrap();
    assert_eq!(key_token(sym.keys.get(&23)), Some("VOLUP"));
    assert_eq!(key_token(sym.keys.get(&24)), Some("VOLDOWN"));
}

#[test]
fn test_layer_chain_inherits_in_order() {
    let (path, _temp) = write_doc(TEMPLATED_DOC);
    let resolved = ProfileService::resolve(&path, None).unwrap();

    let base = resolved.layer("base").unwrap();
    assert_eq!(base.name, "Work-base");
    assert_eq!(base.keys[&2].string.as_deref(), Some("hello"));
    assert_eq!(key_token(base.keys.get(&1)), Some("F1"));

    // sym: explicit, then base (which already holds hello), then nav
    let sym = resolved.layer("sym").unwrap();
    assert_eq!(key_token(sym.keys.get(&1)), Some("!"));
    assert_eq!(sym.keys[&2].string.as_deref(), Some("hello"));
    assert_eq!(key_token(sym.keys.get(&3)), Some("HOME"));
    assert_eq!(sym.orientation().as_str(), "landscape");
}

#[test]
fn test_unknown_sources_are_warnings() {
    let (path, _temp) = write_doc(
        "\
profile:
  name: Pad
  templates: [missing]
  keys:
    1: { key: a }
  layers:
    extra:
      extends: [nowhere]
",
    );
    let resolved = ProfileService::resolve(&path, None).unwrap();

    assert_eq!(resolved.main.keys.len(), 1);
    assert!(resolved.layer("extra").unwrap().keys.is_empty());
    assert!(resolved
        .warnings
        .iter()
        .any(|w| matches!(w, CompileError::UnknownTemplate { template, .. } if template == "missing")));
    assert!(resolved.warnings.iter().any(
        |w| matches!(w, CompileError::UnknownExtendsSource { source_name, .. } if source_name == "nowhere")
    ));
    assert!(resolved.warnings.iter().all(CompileError::is_warning));
}

#[test]
fn test_extends_cycle_resolves_with_warning() {
    let (path, _temp) = write_doc(
        "\
profile:
  name: Pad
  layers:
    a:
      extends: [b]
      keys:
        1: { key: a }
    b:
      extends: [a]
      keys:
        2: { key: b }
",
    );
    let resolved = ProfileService::resolve(&path, None).unwrap();

    assert!(resolved
        .warnings
        .iter()
        .any(|w| matches!(w, CompileError::CyclicExtends { .. })));
    assert!(resolved.layer("a").unwrap().keys.contains_key(&1));
    assert!(resolved.layer("b").unwrap().keys.contains_key(&2));
}

#[test]
fn test_external_template_file() {
    let (path, temp) = write_doc(
        "\
profile:
  name: Pad
  templates: [shared]
  keys:
    1: { key: a }
",
    );
    write_template(
        &temp.path().join("templates"),
        "shared",
        "template:\n  keys:\n    1: { key: z }\n    2: { key: b }\n",
    );

    let resolved = ProfileService::resolve(&path, None).unwrap();
    assert_eq!(key_token(resolved.main.keys.get(&1)), Some("a"));
    assert_eq!(key_token(resolved.main.keys.get(&2)), Some("b"));
}

#[test]
fn test_inline_template_shadows_external() {
    let (path, temp) = write_doc(
        "\
templates:
  shared:
    keys:
      2: { key: inline }
profile:
  name: Pad
  templates: [shared]
",
    );
    write_template(
        &temp.path().join("templates"),
        "shared",
        "template:\n  keys:\n    2: { key: external }\n",
    );

    let resolved = ProfileService::resolve(&path, None).unwrap();
    assert_eq!(key_token(resolved.main.keys.get(&2)), Some("inline"));
}

#[test]
fn test_structural_errors_are_fatal() {
    let (path, _temp) = write_doc(
        "\
profile:
  name: Pad
  keys:
    1-3: [{ key: a }, { key: b }]
",
    );
    assert!(matches!(
        ProfileService::resolve(&path, None),
        Err(CompileError::SpecMismatch { .. })
    ));

    let (path, _temp) = write_doc("profile:\n  name: Pad\n  keys:\n    27: { key: a }\n");
    assert!(matches!(
        ProfileService::resolve(&path, None),
        Err(CompileError::KeyOutOfRange { index: 27, .. })
    ));

    let (path, _temp) = write_doc("profile:\n  name: Pad\n  keys:\n    5-2: { key: a }\n");
    assert!(matches!(
        ProfileService::resolve(&path, None),
        Err(CompileError::InvalidKeySpec { .. })
    ));
}
