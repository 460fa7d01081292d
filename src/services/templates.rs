//! Template store: inline and external templates, looked up by name.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CompileError, CompileResult};
use crate::models::{Document, KeyMap, Orientation, OrientedTemplate, Template};
use crate::parser::load_template_file;

/// Produces concrete key indices for one orientation.
///
/// Flat templates ignore the orientation; oriented templates map abstract
/// key names through their position table.
pub trait TemplateKeys {
    /// Keys this template contributes. Problems are pushed onto `warnings`.
    fn keys_for(
        &self,
        name: &str,
        orientation: Orientation,
        warnings: &mut Vec<CompileError>,
    ) -> KeyMap;
}

impl TemplateKeys for Template {
    fn keys_for(
        &self,
        name: &str,
        orientation: Orientation,
        warnings: &mut Vec<CompileError>,
    ) -> KeyMap {
        match self {
            Self::Flat(keys) => keys.clone(),
            Self::Oriented(oriented) => oriented.keys_for(name, orientation, warnings),
        }
    }
}

impl TemplateKeys for OrientedTemplate {
    fn keys_for(
        &self,
        name: &str,
        orientation: Orientation,
        warnings: &mut Vec<CompileError>,
    ) -> KeyMap {
        let Some(positions) = self
            .key_positions
            .get(&orientation)
            .filter(|positions| !positions.is_empty())
        else {
            warnings.push(CompileError::MissingOrientation {
                template: name.to_string(),
                orientation: orientation.to_string(),
            });
            return KeyMap::new();
        };

        if !self.supports(orientation) {
            warnings.push(CompileError::UnsupportedOrientation {
                template: name.to_string(),
                orientation: orientation.to_string(),
            });
        }

        let mut keys = KeyMap::new();
        for (key_name, index) in positions {
            match self.key_definitions.get(key_name) {
                Some(def) => {
                    keys.insert(*index, def.clone());
                }
                None => warnings.push(CompileError::UnknownPositionName {
                    template: name.to_string(),
                    key_name: key_name.clone(),
                }),
            }
        }
        keys
    }
}

/// Named templates available to one document.
///
/// Inline templates shadow external ones with the same name.
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    inline: BTreeMap<String, Template>,
    external: BTreeMap<String, Template>,
    search_dirs: Vec<PathBuf>,
}

impl TemplateStore {
    /// Creates a store holding the document's inline templates.
    #[must_use]
    pub fn from_document(document: &Document) -> Self {
        Self {
            inline: document.templates.clone(),
            ..Self::default()
        }
    }

    /// Adds a directory to search for `<name>.yaml` template files.
    #[must_use]
    pub fn with_search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dirs.push(dir.into());
        self
    }

    /// Standard search directories for a document at `document_path`:
    /// `<dir>/../templates`, then `<dir>/templates`.
    #[must_use]
    pub fn default_search_dirs(document_path: &Path) -> Vec<PathBuf> {
        let dir = document_path.parent().unwrap_or_else(|| Path::new("."));
        let mut dirs = Vec::new();
        if let Some(parent) = dir.parent() {
            dirs.push(parent.join("templates"));
        }
        dirs.push(dir.join("templates"));
        dirs
    }

    /// Looks up a template by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.inline.get(name).or_else(|| self.external.get(name))
    }

    /// Returns true if a template with this name is known.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Loads every external template the document refers to.
    ///
    /// Names that are inline templates, layer ids, or `parent` are skipped.
    /// Names with no file in any search directory are left unknown; the
    /// resolver reports them.
    ///
    /// # Errors
    ///
    /// Returns an error if a template file exists but cannot be read or parsed.
    pub fn load_referenced(&mut self, document: &Document) -> CompileResult<()> {
        for name in referenced_template_names(document) {
            if self.contains(&name) {
                continue;
            }

            let Some(path) = self.find_file(&name) else {
                debug!("No template file for '{}' in {:?}", name, self.search_dirs);
                continue;
            };

            debug!("Loading template '{}' from {}", name, path.display());
            let template = load_template_file(&name, &path)?;
            self.external.insert(name, template);
        }
        Ok(())
    }

    fn find_file(&self, name: &str) -> Option<PathBuf> {
        self.search_dirs
            .iter()
            .map(|dir| dir.join(format!("{name}.yaml")))
            .find(|path| path.is_file())
    }

    /// Keys contributed by `name` in `orientation`, or `None` if unknown.
    pub fn keys_for(
        &self,
        name: &str,
        orientation: Orientation,
        warnings: &mut Vec<CompileError>,
    ) -> Option<KeyMap> {
        self.get(name)
            .map(|template| template.keys_for(name, orientation, warnings))
    }
}

/// Template names used by the profile, its layers, and layer `extends` lists.
fn referenced_template_names(document: &Document) -> Vec<String> {
    let profile = &document.profile;
    let mut names: Vec<String> = Vec::new();
    let mut push = |name: &String| {
        if !names.contains(name) {
            names.push(name.clone());
        }
    };

    profile.templates.iter().for_each(&mut push);
    for layer in &profile.layers {
        layer.templates.iter().for_each(&mut push);
        layer
            .extends
            .iter()
            .filter(|source| {
                source.as_str() != crate::models::Layer::PARENT && profile.layer(source).is_none()
            })
            .for_each(&mut push);
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KeyDefinition;
    use crate::parser::parse_document;
    use tempfile::TempDir;

    fn oriented() -> OrientedTemplate {
        let mut template = OrientedTemplate::default();
        template
            .key_definitions
            .insert("copy".to_string(), KeyDefinition::key("C"));
        template.key_positions.insert(
            Orientation::Portrait,
            vec![("copy".to_string(), 1), ("paste".to_string(), 2)],
        );
        template
    }

    #[test]
    fn test_oriented_template_maps_positions() {
        let mut warnings = Vec::new();
        let keys = oriented().keys_for("clip", Orientation::Portrait, &mut warnings);

        assert_eq!(keys.len(), 1);
        assert_eq!(keys[&1], KeyDefinition::key("C"));
        assert!(matches!(
            warnings.as_slice(),
            [CompileError::UnknownPositionName { key_name, .. }] if key_name == "paste"
        ));
    }

    #[test]
    fn test_oriented_template_missing_orientation() {
        let mut warnings = Vec::new();
        let keys = oriented().keys_for("clip", Orientation::Landscape, &mut warnings);

        assert!(keys.is_empty());
        assert!(matches!(
            warnings.as_slice(),
            [CompileError::MissingOrientation { .. }]
        ));
    }

    #[test]
    fn test_oriented_template_undeclared_orientation_still_applies() {
        let mut template = oriented();
        template.supported_orientations = vec![Orientation::Landscape];

        let mut warnings = Vec::new();
        let keys = template.keys_for("clip", Orientation::Portrait, &mut warnings);

        assert_eq!(keys[&1], KeyDefinition::key("C"));
        assert!(matches!(
            warnings.first(),
            Some(CompileError::UnsupportedOrientation { orientation, .. }) if orientation == "portrait"
        ));

        template.supported_orientations.push(Orientation::Portrait);
        let mut warnings = Vec::new();
        template.keys_for("clip", Orientation::Portrait, &mut warnings);
        assert!(!warnings
            .iter()
            .any(|w| matches!(w, CompileError::UnsupportedOrientation { .. })));
    }

    #[test]
    fn test_load_referenced_external_template() {
        let temp = TempDir::new().unwrap();
        let templates = temp.path().join("templates");
        std::fs::create_dir_all(&templates).unwrap();
        std::fs::write(
            templates.join("numpad.yaml"),
            "template:\n  keys:\n    \"1-3\": [\"1\", \"2\", \"3\"]\n",
        )
        .unwrap();

        let document = parse_document(
            "profile:\n  name: P\n  templates: [numpad, missing]\n",
            None,
        )
        .unwrap();

        let mut store = TemplateStore::from_document(&document).with_search_dir(&templates);
        store.load_referenced(&document).unwrap();

        assert!(store.contains("numpad"));
        assert!(!store.contains("missing"));

        let mut warnings = Vec::new();
        let keys = store
            .keys_for("numpad", Orientation::Portrait, &mut warnings)
            .unwrap();
        assert_eq!(keys[&3], KeyDefinition::key("3"));
    }

    #[test]
    fn test_inline_shadows_external() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("nav.yaml"),
            "template:\n  keys:\n    1: EXTERNAL\n",
        )
        .unwrap();

        let document = parse_document(
            "templates:\n  nav:\n    keys:\n      1: INLINE\nprofile:\n  name: P\n  templates: [nav]\n",
            None,
        )
        .unwrap();

        let mut store = TemplateStore::from_document(&document).with_search_dir(temp.path());
        store.load_referenced(&document).unwrap();

        let mut warnings = Vec::new();
        let keys = store
            .keys_for("nav", Orientation::Portrait, &mut warnings)
            .unwrap();
        assert_eq!(keys[&1], KeyDefinition::key("INLINE"));
    }

    #[test]
    fn test_default_search_dirs() {
        let dirs = TemplateStore::default_search_dirs(Path::new("/work/profiles/main.yaml"));
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/work/templates"),
                PathBuf::from("/work/profiles/templates")
            ]
        );
    }
}
