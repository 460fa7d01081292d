//! Profile generation: resolved key maps to per-profile file contents.
//!
//! Generation happens entirely in memory. Limits are checked before any
//! script is compiled, so a rejected document never reaches the writer.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use tracing::{debug, info};

use crate::error::{CompileError, CompileResult};
use crate::export::readme::render_readme;
use crate::firmware::key_action::{compile_action, ActionContext};
use crate::firmware::layer_switch::{compile_home, compile_mirror, parse_layer_type, Switch};
use crate::firmware::script::KeyScripts;
use crate::firmware::validator::{LimitValidator, LimitViolation, ProfileValidator};
use crate::models::{ColorResolver, KeyDefinition, LayerType, Orientation, ProfileConfig};
use crate::services::layer_refs::{SwitcherIndex, SwitcherRef};
use crate::services::{ResolvedDocument, ResolvedProfile};

/// Generation options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// When set, `GOTO_PROFILE` uses numeric indices (main = this value,
    /// layers follow in declaration order) and folders get a
    /// `profile<N>_` prefix.
    pub profile_index: Option<u32>,
    /// Write a README.md into every profile folder.
    pub write_readme: bool,
    /// Name of the source document, shown in READMEs.
    pub source_name: Option<String>,
}

impl GeneratorOptions {
    /// Sets the starting profile index.
    #[must_use]
    pub const fn with_profile_index(mut self, index: u32) -> Self {
        self.profile_index = Some(index);
        self
    }

    /// Enables or disables README generation.
    #[must_use]
    pub const fn with_readme(mut self, enabled: bool) -> Self {
        self.write_readme = enabled;
        self
    }

    /// Sets the source document name.
    #[must_use]
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }
}

/// What a compiled key does, for summaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyRole {
    /// A regular action key.
    Action,
    /// Switches to another layer.
    Switch {
        /// Switching discipline.
        layer_type: LayerType,
        /// Target layer id.
        target: String,
    },
    /// Mirrored return key inside a layer.
    Return {
        /// Discipline of the switcher being mirrored.
        layer_type: LayerType,
        /// Profile name returned to.
        home: String,
    },
}

/// One key after compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledKey {
    /// Key index.
    pub index: u8,
    /// Definition supplying label, color, and flags.
    pub definition: KeyDefinition,
    /// What the key does.
    pub role: KeyRole,
    /// Press and optional release scripts.
    pub scripts: KeyScripts,
}

impl CompiledKey {
    /// Header text for the key's scripts: `Key N: label` or `Key N`.
    #[must_use]
    pub fn header(&self) -> String {
        let label = self.definition.label_text(" - ");
        if label.is_empty() {
            format!("Key {}", self.index)
        } else {
            format!("Key {}: {}", self.index, label)
        }
    }
}

/// One profile after compilation, before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledProfile {
    /// Profile name.
    pub name: String,
    /// Layer identifier, `None` for the main profile.
    pub layer_id: Option<String>,
    /// Output folder name.
    pub dir_name: String,
    /// Effective configuration.
    pub config: ProfileConfig,
    /// Keys in ascending index order.
    pub keys: Vec<CompiledKey>,
}

/// Rendered files for one profile folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileArtifacts {
    /// Profile name.
    pub name: String,
    /// Output folder name.
    pub dir_name: String,
    /// File name to contents, in a stable order.
    pub files: BTreeMap<String, String>,
}

impl ProfileArtifacts {
    /// Contents of one file, if generated.
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }
}

/// Everything produced from one document.
#[derive(Debug)]
pub struct GeneratedProfiles {
    /// Main profile first, then layers in declaration order.
    pub profiles: Vec<ProfileArtifacts>,
    /// Non-fatal problems from resolution and generation.
    pub warnings: Vec<CompileError>,
}

impl GeneratedProfiles {
    /// Finds a profile by name.
    #[must_use]
    pub fn profile(&self, name: &str) -> Option<&ProfileArtifacts> {
        self.profiles.iter().find(|profile| profile.name == name)
    }
}

/// Compiles resolved documents into profile artifacts.
pub struct ProfileGenerator<'a, V: LimitValidator, C: ColorResolver> {
    limits: &'a V,
    colors: &'a C,
    options: GeneratorOptions,
}

impl<'a, V: LimitValidator, C: ColorResolver> ProfileGenerator<'a, V, C> {
    /// Creates a generator.
    #[must_use]
    pub const fn new(limits: &'a V, colors: &'a C, options: GeneratorOptions) -> Self {
        Self {
            limits,
            colors,
            options,
        }
    }

    /// Validates limits, then compiles and renders every profile.
    ///
    /// # Errors
    ///
    /// Returns the first limit violation or invalid color. Nothing is
    /// produced in that case.
    pub fn generate(&self, mut document: ResolvedDocument) -> CompileResult<GeneratedProfiles> {
        ProfileValidator::new(self.limits)
            .with_profile_index(self.options.profile_index)
            .require_valid(&document)?;

        let mut warnings = std::mem::take(&mut document.warnings);
        let switchers = SwitcherIndex::build(&document, &mut warnings);
        let targets = ProfileTargets::new(&document, self.options.profile_index)?;

        let mut profiles = Vec::with_capacity(document.profile_count());
        for profile in document.profiles() {
            let compiled = compile_profile(profile, &switchers, &targets, &document);
            profiles.push(self.render(&compiled)?);
            info!(
                "Generated profile '{}' ({} keys)",
                compiled.name,
                compiled.keys.len()
            );
        }

        Ok(GeneratedProfiles { profiles, warnings })
    }

    fn render(&self, profile: &CompiledProfile) -> CompileResult<ProfileArtifacts> {
        let mut files = BTreeMap::new();
        files.insert("config.txt".to_string(), render_config(profile, self.colors)?);

        for key in &profile.keys {
            let header = key.header();
            files.insert(
                format!("key{}.txt", key.index),
                key.scripts.press.render(&header),
            );
            if let Some(release) = &key.scripts.release {
                files.insert(
                    format!("key{}-release.txt", key.index),
                    release.render(&header),
                );
            }
        }

        if self.options.write_readme {
            files.insert(
                "README.md".to_string(),
                render_readme(profile, self.options.source_name.as_deref(), self.colors)?,
            );
        }

        Ok(ProfileArtifacts {
            name: profile.name.clone(),
            dir_name: profile.dir_name.clone(),
            files,
        })
    }
}

/// `GOTO_PROFILE` arguments and folder names for every profile.
struct ProfileTargets {
    main: String,
    layers: BTreeMap<String, (String, String)>,
    main_dir: String,
}

impl ProfileTargets {
    fn new(document: &ResolvedDocument, start: Option<u32>) -> CompileResult<Self> {
        let naming = |offset: u32, name: &str| -> CompileResult<(String, String)> {
            let Some(start) = start else {
                return Ok((name.to_string(), name.to_string()));
            };
            let number = start.checked_add(offset).ok_or_else(|| {
                LimitViolation::new(format!(
                    "Profile index {start} leaves no room for profile \"{name}\""
                ))
            })?;
            Ok((number.to_string(), format!("profile{number}_{name}")))
        };

        let (main, main_dir) = naming(0, &document.main.name)?;
        let mut layers = BTreeMap::new();
        for (layer, offset) in document.layers.iter().zip(1u32..) {
            if let Some(id) = &layer.layer_id {
                layers.insert(id.clone(), naming(offset, &layer.name)?);
            }
        }

        Ok(Self {
            main,
            layers,
            main_dir,
        })
    }

    /// Target for a layer id; undefined layers are left as the literal id.
    fn layer<'s>(&'s self, id: &'s str) -> &'s str {
        self.layers.get(id).map_or(id, |(target, _)| target.as_str())
    }

    /// Target for the profile a switcher lives in.
    fn home<'s>(&'s self, home: Option<&'s str>) -> &'s str {
        home.map_or(self.main.as_str(), |id| self.layer(id))
    }

    fn dir_name(&self, profile: &ResolvedProfile) -> String {
        profile.layer_id.as_deref().map_or_else(
            || self.main_dir.clone(),
            |id| {
                self.layers
                    .get(id)
                    .map_or_else(|| profile.name.clone(), |(_, dir)| dir.clone())
            },
        )
    }
}

fn compile_profile(
    profile: &ResolvedProfile,
    switchers: &SwitcherIndex,
    targets: &ProfileTargets,
    document: &ResolvedDocument,
) -> CompiledProfile {
    let own_id = profile.layer_id.as_deref();
    let own_target = targets.home(own_id);
    let governing = own_id.and_then(|id| switchers.governing(id));
    let return_home = governing.map_or(targets.main.as_str(), |g| targets.home(g.home.as_deref()));

    let oneshot_ctx = match own_id {
        Some(id) if switchers.is_oneshot(id) => ActionContext::oneshot(return_home),
        _ => ActionContext::default(),
    };

    let mirror_index = governing
        .filter(|g| g.layer_type.has_mirror())
        .map(|g| g.index);

    let mut indices: Vec<u8> = profile.keys.keys().copied().collect();
    if let Some(index) = mirror_index {
        if !indices.contains(&index) {
            indices.push(index);
            indices.sort_unstable();
        }
    }

    let mut keys = Vec::with_capacity(indices.len());
    for index in indices {
        let own_def = profile.keys.get(&index);

        let targets_self = own_def
            .and_then(|def| def.layer.as_deref())
            .is_some_and(|target| Some(target) == own_id);
        let switches_away = own_def.is_some_and(|def| def.layer.is_some()) && !targets_self;

        // Return key: a self-targeting switcher, or the governing switcher's slot.
        if targets_self || (mirror_index == Some(index) && !switches_away) {
            let (layer_type, modifier, meta) = match own_def {
                Some(def) if targets_self => {
                    let (layer_type, _) = parse_layer_type(def.layer_type.as_deref());
                    (layer_type, def.modifier.clone(), def.clone())
                }
                _ => {
                    let Some(switcher) = governing else { continue };
                    let meta = own_def
                        .filter(|def| !def.label.is_empty() || def.color.is_some())
                        .cloned()
                        .unwrap_or_else(|| switcher_definition(document, switcher));
                    (switcher.layer_type, switcher.modifier.clone(), meta)
                }
            };

            let switch = Switch {
                layer_type,
                modifier: modifier.as_deref(),
                target: own_target,
                home: return_home,
            };
            match compile_mirror(&switch) {
                Some(scripts) => keys.push(CompiledKey {
                    index,
                    definition: meta,
                    role: KeyRole::Return {
                        layer_type,
                        home: return_home.to_string(),
                    },
                    scripts,
                }),
                None => debug!(
                    "Key {} in '{}' dropped: {} layers have no return key",
                    index, profile.name, layer_type
                ),
            }
            continue;
        }

        let Some(def) = own_def else { continue };
        if !def.produces_action() && def.label.is_empty() && def.color.is_none() {
            debug!("Key {} in '{}' is empty, skipped", index, profile.name);
            continue;
        }

        if let Some(target_id) = def.layer.as_deref() {
            let (layer_type, _) = parse_layer_type(def.layer_type.as_deref());
            let switch = Switch {
                layer_type,
                modifier: def.modifier.as_deref(),
                target: targets.layer(target_id),
                home: own_target,
            };
            keys.push(CompiledKey {
                index,
                definition: def.clone(),
                role: KeyRole::Switch {
                    layer_type,
                    target: target_id.to_string(),
                },
                scripts: compile_home(&switch),
            });
            continue;
        }

        keys.push(CompiledKey {
            index,
            definition: def.clone(),
            role: KeyRole::Action,
            scripts: compile_action(def, &oneshot_ctx),
        });
    }

    CompiledProfile {
        name: profile.name.clone(),
        layer_id: profile.layer_id.clone(),
        dir_name: targets.dir_name(profile),
        config: profile.config.clone(),
        keys,
    }
}

/// The switcher's own definition, for label and color metadata.
fn switcher_definition(document: &ResolvedDocument, switcher: &SwitcherRef) -> KeyDefinition {
    let home = match switcher.home.as_deref() {
        Some(id) => document.layer(id),
        None => Some(&document.main),
    };
    home.and_then(|profile| profile.keys.get(&switcher.index))
        .cloned()
        .unwrap_or_default()
}

/// Renders `config.txt`.
///
/// Label lines must precede `IS_LANDSCAPE` or the firmware misreads them.
///
/// # Errors
///
/// Returns `InvalidColor` for colors the resolver cannot handle.
pub fn render_config<C: ColorResolver>(
    profile: &CompiledProfile,
    colors: &C,
) -> CompileResult<String> {
    let mut lines: Vec<String> = Vec::new();

    for key in &profile.keys {
        let (line1, line2) = (key.definition.label_line(0), key.definition.label_line(1));
        if !line1.is_empty() {
            lines.push(format!("z{} {}", key.index, line1));
        }
        if !line2.is_empty() {
            lines.push(format!("x{} {}", key.index, line2));
        }
        if key.definition.no_repeat {
            lines.push(format!("dr {}", key.index));
        }
    }

    if let Some(color) = &profile.config.background_color {
        lines.push(format!("BG_COLOR {}", colors.resolve(color)?.to_config_triple()));
    }

    if profile.config.orientation() == Orientation::Landscape {
        lines.push("IS_LANDSCAPE 1".to_string());
    }

    for key in &profile.keys {
        if let Some(color) = &key.definition.color {
            lines.push(format!(
                "SWCOLOR_{} {}",
                key.index,
                colors.resolve(color)?.to_config_triple()
            ));
        }
    }

    if profile.config.dim_unused() {
        lines.push("DIM_UNUSED_KEYS 1".to_string());
    }

    if let Some(color) = &profile.config.keydown_color {
        lines.push(format!(
            "KEYDOWN_COLOR {}",
            colors.resolve(color)?.to_config_triple()
        ));
    }

    for key in &profile.keys {
        if key.definition.allow_abort {
            lines.push(format!("ab {}", key.index));
        }
    }

    let mut out = String::new();
    for line in lines {
        let _ = writeln!(out, "{line}");
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firmware::validator::DuckyPadLimits;
    use crate::models::{ColorValue, KeyMap, NamedColors};

    fn def(yaml: &str) -> KeyDefinition {
        serde_yml::from_str(yaml).unwrap()
    }

    fn resolved(main: KeyMap, layers: Vec<(&str, KeyMap)>) -> ResolvedDocument {
        ResolvedDocument {
            main: ResolvedProfile {
                layer_id: None,
                name: "Main".to_string(),
                config: ProfileConfig::default(),
                keys: main,
            },
            layers: layers
                .into_iter()
                .map(|(id, keys)| ResolvedProfile {
                    layer_id: Some(id.to_string()),
                    name: format!("Main-{id}"),
                    config: ProfileConfig::default(),
                    keys,
                })
                .collect(),
            warnings: Vec::new(),
        }
    }

    fn generate(document: ResolvedDocument, options: GeneratorOptions) -> GeneratedProfiles {
        ProfileGenerator::new(&DuckyPadLimits, &NamedColors, options)
            .generate(document)
            .unwrap()
    }

    #[test]
    fn test_toggle_layer_gets_return_key_without_inheriting() {
        let doc = resolved(
            KeyMap::from([(4, def("{ layer: fn, layer_type: toggle, label: [Fn] }"))]),
            vec![("fn", KeyMap::from([(1, KeyDefinition::key("F1"))]))],
        );

        let generated = generate(doc, GeneratorOptions::default());
        let layer = generated.profile("Main-fn").unwrap();

        assert_eq!(
            layer.file("key4.txt").unwrap(),
            "REM Key 4: Fn\nDEFAULTDELAY 0\nGOTO_PROFILE Main\n"
        );
        assert!(layer.file("config.txt").unwrap().contains("z4 Fn\n"));
    }

    #[test]
    fn test_profile_index_numbers_targets_and_folders() {
        let doc = resolved(
            KeyMap::from([(1, def("{ layer: nav, layer_type: momentary }"))]),
            vec![("nav", KeyMap::new())],
        );

        let generated = generate(doc, GeneratorOptions::default().with_profile_index(3));
        assert_eq!(generated.profiles[0].dir_name, "profile3_Main");
        assert_eq!(generated.profiles[1].dir_name, "profile4_Main-nav");

        let main = &generated.profiles[0];
        assert!(main.file("key1.txt").unwrap().ends_with("GOTO_PROFILE 4\n"));
        assert!(main
            .file("key1-release.txt")
            .unwrap()
            .ends_with("GOTO_PROFILE 3\n"));
    }

    #[test]
    fn test_profile_index_past_last_slot_is_rejected() {
        let doc = || {
            resolved(
                KeyMap::from([(1, def("{ layer: nav, layer_type: toggle }"))]),
                vec![("nav", KeyMap::new())],
            )
        };

        for start in [64, u32::MAX] {
            let result = ProfileGenerator::new(
                &DuckyPadLimits,
                &NamedColors,
                GeneratorOptions::default().with_profile_index(start),
            )
            .generate(doc());
            assert!(matches!(result, Err(CompileError::Limit(_))), "start {start}");
        }

        let last = generate(doc(), GeneratorOptions::default().with_profile_index(63));
        assert_eq!(last.profiles[1].dir_name, "profile64_Main-nav");
    }

    #[test]
    fn test_profile_targets_overflow_is_an_error() {
        let doc = resolved(KeyMap::new(), vec![("nav", KeyMap::new())]);
        assert!(ProfileTargets::new(&doc, Some(u32::MAX)).is_err());
        assert!(ProfileTargets::new(&doc, Some(1)).is_ok());
    }

    #[test]
    fn test_undefined_layer_target_is_literal() {
        let doc = resolved(
            KeyMap::from([(2, def("{ layer: ghost, layer_type: toggle }"))]),
            vec![],
        );
        let generated = generate(doc, GeneratorOptions::default());
        assert!(generated.profiles[0]
            .file("key2.txt")
            .unwrap()
            .ends_with("GOTO_PROFILE ghost\n"));
    }

    #[test]
    fn test_config_directive_order() {
        let mut main = KeyMap::from([
            (1, def("{ key: A, label: [Al, pha], no_repeat: true, color: red, allow_abort: true }")),
            (2, def("{ key: B, label: [Bee] }")),
        ]);
        main.insert(3, KeyDefinition::default());
        let mut doc = resolved(main, vec![]);
        doc.main.config = ProfileConfig {
            orientation: Some(Orientation::Landscape),
            background_color: Some(ColorValue::Rgb([1, 2, 3])),
            keydown_color: Some(ColorValue::Name("white".to_string())),
            dim_unused: Some(true),
        };

        let generated = generate(doc, GeneratorOptions::default());
        assert!(generated.profiles[0].file("key3.txt").is_none());
        assert_eq!(
            generated.profiles[0].file("config.txt").unwrap(),
            "z1 Al\nx1 pha\ndr 1\nz2 Bee\nBG_COLOR 1 2 3\nIS_LANDSCAPE 1\nSWCOLOR_1 255 0 0\n\
             DIM_UNUSED_KEYS 1\nKEYDOWN_COLOR 255 255 255\nab 1\n"
        );
    }

    #[test]
    fn test_invalid_color_is_fatal() {
        let doc = resolved(KeyMap::from([(1, def("{ key: A, color: blurple }"))]), vec![]);
        let result = ProfileGenerator::new(&DuckyPadLimits, &NamedColors, GeneratorOptions::default())
            .generate(doc);
        assert!(matches!(result, Err(CompileError::InvalidColor { .. })));
    }

    #[test]
    fn test_readme_only_when_enabled() {
        let doc = resolved(KeyMap::from([(1, KeyDefinition::key("A"))]), vec![]);
        let without = generate(doc, GeneratorOptions::default());
        assert!(without.profiles[0].file("README.md").is_none());

        let doc = resolved(KeyMap::from([(1, KeyDefinition::key("A"))]), vec![]);
        let with = generate(doc, GeneratorOptions::default().with_readme(true));
        assert!(with.profiles[0].file("README.md").is_some());
    }
}
