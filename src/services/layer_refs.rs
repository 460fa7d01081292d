//! Layer reference tracking.
//!
//! Indexes every switcher key across the resolved profiles so the generator
//! can find, for each layer:
//! - the governing switcher (which decides mirroring and oneshot return)
//! - the profile a mirrored key returns to
//! - slots where a mirror would replace an authored action

use std::collections::BTreeMap;

use crate::error::{push_unique, CompileError};
use crate::firmware::layer_switch::parse_layer_type;
use crate::models::{KeyDefinition, LayerType};
use crate::services::resolver::{ResolvedDocument, ResolvedProfile};

/// A switcher key found in some profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitcherRef {
    /// Layer id of the profile holding the key; `None` for the main profile.
    pub home: Option<String>,
    /// Key index of the switcher.
    pub index: u8,
    /// Target layer id as written.
    pub target: String,
    /// Effective layer type (unknown values already fell back).
    pub layer_type: LayerType,
    /// Modifier held by `modifier_hold`.
    pub modifier: Option<String>,
}

impl SwitcherRef {
    fn from_definition(home: Option<&str>, index: u8, def: &KeyDefinition) -> Option<Self> {
        let target = def.layer.clone()?;
        let (layer_type, _) = parse_layer_type(def.layer_type.as_deref());
        Some(Self {
            home: home.map(str::to_string),
            index,
            target,
            layer_type,
            modifier: def.modifier.clone(),
        })
    }
}

/// Reverse index from target layer id to the switchers reaching it.
#[derive(Debug, Clone, Default)]
pub struct SwitcherIndex {
    by_target: BTreeMap<String, Vec<SwitcherRef>>,
}

impl SwitcherIndex {
    /// Builds the index and reports unknown layer types and return keys
    /// that replace authored actions.
    ///
    /// References are ordered main profile first, then layers in declaration
    /// order, each by ascending key index. A layer's keys that target the
    /// layer itself are mirrors, not references, and are skipped.
    pub fn build(document: &ResolvedDocument, warnings: &mut Vec<CompileError>) -> Self {
        let mut by_target: BTreeMap<String, Vec<SwitcherRef>> = BTreeMap::new();
        let mut reported: Vec<(u8, &KeyDefinition)> = Vec::new();

        for profile in document.profiles() {
            let home = profile.layer_id.as_deref();
            for (&index, def) in &profile.keys {
                let Some(target) = def.layer.as_deref() else {
                    continue;
                };

                // Copies inherited through `extends` are reported once.
                if !reported.contains(&(index, def))
                    && report_unknown_layer_type(profile, index, def, warnings)
                {
                    reported.push((index, def));
                }

                if home == Some(target) {
                    continue;
                }

                if let Some(switcher) = SwitcherRef::from_definition(home, index, def) {
                    by_target.entry(target.to_string()).or_default().push(switcher);
                }
            }
        }

        let index = Self { by_target };
        for layer in &document.layers {
            let conflict = layer
                .layer_id
                .as_deref()
                .and_then(|id| index.governing(id))
                .and_then(|switcher| check_mirror_conflict(layer, switcher));
            if let Some(conflict) = conflict {
                push_unique(warnings, conflict);
            }
        }
        index
    }

    /// All switchers targeting `layer_id`, in priority order.
    #[must_use]
    pub fn refs_to(&self, layer_id: &str) -> &[SwitcherRef] {
        self.by_target.get(layer_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// The switcher that governs `layer_id`: the first reference to it.
    #[must_use]
    pub fn governing(&self, layer_id: &str) -> Option<&SwitcherRef> {
        self.refs_to(layer_id).first()
    }

    /// Returns true if the layer is entered as a oneshot layer.
    #[must_use]
    pub fn is_oneshot(&self, layer_id: &str) -> bool {
        self.governing(layer_id)
            .is_some_and(|switcher| switcher.layer_type == LayerType::Oneshot)
    }
}

fn report_unknown_layer_type(
    profile: &ResolvedProfile,
    index: u8,
    def: &KeyDefinition,
    warnings: &mut Vec<CompileError>,
) -> bool {
    let (_, known) = parse_layer_type(def.layer_type.as_deref());
    if known {
        return false;
    }

    push_unique(
        warnings,
        CompileError::UnknownLayerType {
            profile: profile.name.clone(),
            index,
            layer_type: def.layer_type.clone().unwrap_or_default(),
        },
    );
    true
}

/// Checks whether a mirror at `index` would replace an authored action in
/// the layer.
///
/// Returns a [`CompileError::MirrorConflict`] warning if the layer's own
/// definition at that slot does something other than switch back.
#[must_use]
pub fn check_mirror_conflict(
    layer: &ResolvedProfile,
    switcher: &SwitcherRef,
) -> Option<CompileError> {
    if !switcher.layer_type.has_mirror() {
        return None;
    }

    let def = layer.keys.get(&switcher.index)?;
    if def.layer.is_some() || !def.produces_action() {
        return None;
    }

    Some(CompileError::MirrorConflict {
        layer: layer.name.clone(),
        index: switcher.index,
        layer_type: switcher.layer_type.to_string(),
        switcher_home: switcher
            .home
            .as_deref()
            .map_or_else(|| "the main profile".to_string(), |id| format!("layer '{id}'")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{KeyMap, ProfileConfig};

    fn switcher(layer: &str, layer_type: &str) -> KeyDefinition {
        KeyDefinition {
            layer: Some(layer.to_string()),
            layer_type: Some(layer_type.to_string()),
            ..KeyDefinition::default()
        }
    }

    fn profile(layer_id: Option<&str>, keys: KeyMap) -> ResolvedProfile {
        ResolvedProfile {
            layer_id: layer_id.map(str::to_string),
            name: layer_id.unwrap_or("Main").to_string(),
            config: ProfileConfig::default(),
            keys,
        }
    }

    fn document(main: KeyMap, layers: Vec<(&str, KeyMap)>) -> ResolvedDocument {
        ResolvedDocument {
            main: profile(None, main),
            layers: layers
                .into_iter()
                .map(|(id, keys)| profile(Some(id), keys))
                .collect(),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_main_switchers_govern_first() {
        let doc = document(
            KeyMap::from([(5, switcher("fn", "toggle")), (2, switcher("fn", "oneshot"))]),
            vec![
                ("nav", KeyMap::from([(1, switcher("fn", "momentary"))])),
                ("fn", KeyMap::new()),
            ],
        );

        let mut warnings = Vec::new();
        let index = SwitcherIndex::build(&doc, &mut warnings);

        let refs = index.refs_to("fn");
        assert_eq!(refs.len(), 3);
        assert_eq!(refs[0].index, 2);
        assert_eq!(refs[0].home, None);
        assert_eq!(refs[2].home.as_deref(), Some("nav"));
        assert!(index.is_oneshot("fn"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_self_references_are_skipped() {
        let doc = document(
            KeyMap::new(),
            vec![("fn", KeyMap::from([(1, switcher("fn", "toggle"))]))],
        );

        let mut warnings = Vec::new();
        let index = SwitcherIndex::build(&doc, &mut warnings);
        assert!(index.governing("fn").is_none());
    }

    #[test]
    fn test_unknown_layer_type_falls_back_with_warning() {
        let doc = document(KeyMap::from([(1, switcher("fn", "sticky"))]), vec![]);

        let mut warnings = Vec::new();
        let index = SwitcherIndex::build(&doc, &mut warnings);

        assert_eq!(index.governing("fn").unwrap().layer_type, LayerType::ModifierHold);
        assert!(matches!(
            warnings.as_slice(),
            [CompileError::UnknownLayerType { index: 1, .. }]
        ));
    }

    #[test]
    fn test_inherited_unknown_layer_type_reported_once() {
        let doc = document(
            KeyMap::from([(1, switcher("fn", "sticky"))]),
            vec![
                ("nav", KeyMap::from([(1, switcher("fn", "sticky"))])),
                ("sym", KeyMap::from([(1, switcher("fn", "sticky"))])),
                ("fn", KeyMap::from([(2, switcher("nav", "bouncy"))])),
            ],
        );

        let mut warnings = Vec::new();
        SwitcherIndex::build(&doc, &mut warnings);

        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].to_string().contains("'sticky'"));
        assert!(warnings[1].to_string().contains("'bouncy'"));
    }

    #[test]
    fn test_check_mirror_conflict() {
        let doc = document(
            KeyMap::from([(1, switcher("fn", "toggle"))]),
            vec![(
                "fn",
                KeyMap::from([(1, KeyDefinition::key("X")), (2, KeyDefinition::key("Y"))]),
            )],
        );
        let mut warnings = Vec::new();
        let index = SwitcherIndex::build(&doc, &mut warnings);
        let governing = index.governing("fn").unwrap();

        let message = check_mirror_conflict(doc.layer("fn").unwrap(), governing)
            .unwrap()
            .to_string();
        assert!(message.contains("key 1 in 'fn'"));
        assert!(message.contains("main profile"));
        assert!(matches!(
            warnings.as_slice(),
            [CompileError::MirrorConflict { index: 1, .. }]
        ));

        let label_only = document(
            KeyMap::from([(1, switcher("fn", "toggle"))]),
            vec![(
                "fn",
                KeyMap::from([(1, KeyDefinition::default().with_label(["Back"]))]),
            )],
        );
        assert!(check_mirror_conflict(label_only.layer("fn").unwrap(), governing).is_none());
    }
}
