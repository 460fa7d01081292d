//! Resolution engine: explicit keys, then `extends` sources, then templates.
//!
//! Every target (the main profile and each layer) is resolved in three
//! passes. Later passes only fill key slots that are still empty:
//!
//! 1. the target's own `keys:` block,
//! 2. `extends` sources in list order (layers only),
//! 3. templates. Where two templates define the same key, the template
//!    listed last wins.
//!
//! Layers may extend other layers. Each layer is resolved once, after the
//! layers it extends, and later readers copy its cached key map. Layers in
//! an `extends` cycle see their cyclic sources as empty.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::error::{push_unique, CompileError};
use crate::models::{Document, KeyMap, Layer, Orientation, ProfileConfig};
use crate::services::templates::TemplateStore;

/// One fully resolved profile: the main profile or one layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProfile {
    /// Layer identifier, `None` for the main profile.
    pub layer_id: Option<String>,
    /// Profile name written to disk and used by `GOTO_PROFILE`.
    pub name: String,
    /// Effective configuration.
    pub config: ProfileConfig,
    /// Resolved key map.
    pub keys: KeyMap,
}

impl ResolvedProfile {
    /// Returns true for the main profile.
    #[must_use]
    pub const fn is_main(&self) -> bool {
        self.layer_id.is_none()
    }

    /// Effective orientation.
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.config.orientation()
    }
}

/// The resolution result for a whole document.
#[derive(Debug)]
pub struct ResolvedDocument {
    /// The main profile.
    pub main: ResolvedProfile,
    /// Layers in declaration order.
    pub layers: Vec<ResolvedProfile>,
    /// Non-fatal problems found while resolving.
    pub warnings: Vec<CompileError>,
}

impl ResolvedDocument {
    /// Main profile followed by layers.
    pub fn profiles(&self) -> impl Iterator<Item = &ResolvedProfile> {
        std::iter::once(&self.main).chain(self.layers.iter())
    }

    /// Finds a resolved layer by identifier.
    #[must_use]
    pub fn layer(&self, id: &str) -> Option<&ResolvedProfile> {
        self.layers
            .iter()
            .find(|layer| layer.layer_id.as_deref() == Some(id))
    }

    /// Total number of generated profiles.
    #[must_use]
    pub fn profile_count(&self) -> usize {
        1 + self.layers.len()
    }
}

/// What an `extends` entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtendsSource<'a> {
    Parent,
    Template(&'a str),
    Layer(&'a str),
    Unknown(&'a str),
}

/// Resolves documents against a template store.
pub struct Resolver<'a> {
    document: &'a Document,
    store: &'a TemplateStore,
    warnings: Vec<CompileError>,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver.
    #[must_use]
    pub const fn new(document: &'a Document, store: &'a TemplateStore) -> Self {
        Self {
            document,
            store,
            warnings: Vec::new(),
        }
    }

    /// Resolves the main profile and every layer.
    #[must_use]
    pub fn resolve(mut self) -> ResolvedDocument {
        let document = self.document;
        let profile = &document.profile;
        let main_orientation = profile.config.orientation();

        let mut main_keys = profile.keys.clone();
        self.apply_templates(
            &format!("profile '{}'", profile.name),
            &profile.templates,
            main_orientation,
            &mut main_keys,
        );
        info!("Resolved main profile '{}' ({} keys)", profile.name, main_keys.len());

        let main = ResolvedProfile {
            layer_id: None,
            name: profile.name.clone(),
            config: profile.config.clone(),
            keys: main_keys,
        };

        let mut resolved: BTreeMap<&str, KeyMap> = BTreeMap::new();
        for layer in self.resolution_order() {
            let keys = self.resolve_layer(layer, &main.keys, &resolved);
            resolved.insert(layer.id.as_str(), keys);
        }

        let layers = profile
            .layers
            .iter()
            .map(|layer| ResolvedProfile {
                layer_id: Some(layer.id.clone()),
                name: layer.profile_name(&profile.name),
                config: layer.config.merged_over(&profile.config),
                keys: resolved.remove(layer.id.as_str()).unwrap_or_default(),
            })
            .collect();

        ResolvedDocument {
            main,
            layers,
            warnings: self.warnings,
        }
    }

    fn classify<'s>(&self, source: &'s str) -> ExtendsSource<'s> {
        if source == Layer::PARENT {
            ExtendsSource::Parent
        } else if self.store.contains(source) {
            ExtendsSource::Template(source)
        } else if self.document.profile.layer(source).is_some() {
            ExtendsSource::Layer(source)
        } else {
            ExtendsSource::Unknown(source)
        }
    }

    /// Orders layers so every layer comes after the layers it extends.
    /// Layers stuck in a cycle are appended in declaration order.
    fn resolution_order(&self) -> Vec<&'a Layer> {
        let layers = &self.document.profile.layers;
        let mut order: Vec<&'a Layer> = Vec::with_capacity(layers.len());
        let mut pending: Vec<&'a Layer> = layers.iter().collect();

        loop {
            let before = pending.len();
            let mut index = 0;
            while index < pending.len() {
                let layer = pending[index];
                let ready = layer.extends.iter().all(|source| match self.classify(source) {
                    ExtendsSource::Layer(id) => order.iter().any(|done| done.id == id),
                    _ => true,
                });
                if ready {
                    order.push(pending.remove(index));
                } else {
                    index += 1;
                }
            }

            if pending.is_empty() || pending.len() == before {
                break;
            }
        }

        order.extend(pending);
        order
    }

    fn resolve_layer(
        &mut self,
        layer: &Layer,
        main_keys: &KeyMap,
        resolved: &BTreeMap<&str, KeyMap>,
    ) -> KeyMap {
        let orientation = layer
            .config
            .orientation
            .or(self.document.profile.config.orientation)
            .unwrap_or_default();

        let mut keys = layer.keys.clone();

        for source in &layer.extends {
            let source_keys = match self.classify(source) {
                ExtendsSource::Parent => Some(main_keys.clone()),
                ExtendsSource::Template(name) => self.template_keys(name, orientation),
                ExtendsSource::Layer(id) => {
                    let cached = resolved.get(id).cloned();
                    if cached.is_none() {
                        self.warn(CompileError::CyclicExtends {
                            layer: layer.id.clone(),
                            source_name: id.to_string(),
                        });
                    }
                    cached
                }
                ExtendsSource::Unknown(name) => {
                    self.warn(CompileError::UnknownExtendsSource {
                        layer: layer.id.clone(),
                        source_name: name.to_string(),
                    });
                    None
                }
            };

            for (index, def) in source_keys.unwrap_or_default() {
                if let Entry::Vacant(slot) = keys.entry(index) {
                    debug!("Layer '{}' key {} inherited from '{}'", layer.id, index, source);
                    slot.insert(def);
                }
            }
        }

        self.apply_templates(
            &format!("layer '{}'", layer.id),
            &layer.templates,
            orientation,
            &mut keys,
        );
        info!("Resolved layer '{}' ({} keys)", layer.id, keys.len());
        keys
    }

    /// Fills empty slots from `templates`; the last template defining a key wins.
    fn apply_templates(
        &mut self,
        target: &str,
        templates: &[String],
        orientation: Orientation,
        keys: &mut KeyMap,
    ) {
        let mut combined = KeyMap::new();

        for name in templates {
            match self.template_keys(name, orientation) {
                Some(template_keys) => {
                    for (index, def) in template_keys {
                        debug!("{} key {} from template '{}'", target, index, name);
                        combined.insert(index, def);
                    }
                }
                None => self.warn(CompileError::UnknownTemplate {
                    target: target.to_string(),
                    template: name.clone(),
                }),
            }
        }

        for (index, def) in combined {
            keys.entry(index).or_insert(def);
        }
    }

    fn template_keys(&mut self, name: &str, orientation: Orientation) -> Option<KeyMap> {
        let mut found = Vec::new();
        let keys = self.store.keys_for(name, orientation, &mut found);
        for warning in found {
            self.warn(warning);
        }
        keys
    }

    /// Records a warning once, however many targets run into it.
    fn warn(&mut self, warning: CompileError) {
        push_unique(&mut self.warnings, warning);
    }
}

/// Resolves a document with the given template store.
#[must_use]
pub fn resolve_document(document: &Document, store: &TemplateStore) -> ResolvedDocument {
    Resolver::new(document, store).resolve()
}
