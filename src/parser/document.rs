//! YAML document and template file loading.
//!
//! Documents are parsed into a generic YAML tree first so mapping order is
//! kept and shorthand key definitions can be expanded with precise errors.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_yml::{Mapping, Value};

use crate::error::{CompileError, CompileResult};
use crate::models::key::scalar_to_string;
use crate::models::{
    Document, Layer, Orientation, OrientedTemplate, Profile, ProfileConfig, Template,
};
use crate::parser::key_spec::{expand_key_map, normalize_definition, parse_index};

/// Template keys that describe the template rather than a key slot.
const TEMPLATE_METADATA_KEYS: &[&str] = &["name", "description", "supported_orientations"];

/// Loads a document from a YAML file.
///
/// # Errors
///
/// Returns `Io` if the file cannot be read and `Parse` or an expansion error
/// if its contents are invalid.
pub fn load_document(path: &Path) -> CompileResult<Document> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CompileError::io(format!("Failed to read {}", path.display()), e))?;
    let mut document = parse_document(&text, Some(path))?;
    document.source_path = Some(path.to_path_buf());
    Ok(document)
}

/// Parses a document from YAML text.
pub fn parse_document(text: &str, path: Option<&Path>) -> CompileResult<Document> {
    let ctx = Ctx::new(path);
    let root: Value = serde_yml::from_str(text).map_err(|e| ctx.error(e.to_string()))?;
    let root = ctx.mapping(&root, "document")?;

    let mut templates = BTreeMap::new();
    if let Some(inline) = get(root, "templates") {
        for (name, body) in ctx.mapping(inline, "templates")? {
            let name = ctx.name(name, "template name")?;
            let template = parse_template_body(&ctx, &name, body)?;
            templates.insert(name, template);
        }
    }

    let profile = get(root, "profile").ok_or_else(|| ctx.error("missing 'profile' key"))?;
    let profile = parse_profile(&ctx, profile)?;

    Ok(Document {
        templates,
        profile,
        source_path: path.map(Path::to_path_buf),
    })
}

/// Loads an external template file with a top-level `template:` body.
pub fn load_template_file(name: &str, path: &Path) -> CompileResult<Template> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CompileError::io(format!("Failed to read template {}", path.display()), e))?;

    let ctx = Ctx::new(Some(path));
    let root: Value = serde_yml::from_str(&text).map_err(|e| ctx.error(e.to_string()))?;
    let body = ctx
        .mapping(&root, "template file")
        .ok()
        .and_then(|root| get(root, "template"))
        .ok_or_else(|| ctx.error("template file is missing the top-level 'template' key"))?;

    parse_template_body(&ctx, name, body)
}

fn parse_profile(ctx: &Ctx, value: &Value) -> CompileResult<Profile> {
    let body = ctx.mapping(value, "profile")?;

    let name = get(body, "name")
        .ok_or_else(|| ctx.error("profile is missing 'name'"))
        .and_then(|name| ctx.name(name, "profile name"))?;

    let mut layers = Vec::new();
    if let Some(raw_layers) = get(body, "layers") {
        for (id, layer_body) in ctx.mapping(raw_layers, "profile.layers")? {
            let id = ctx.name(id, "layer id")?;
            layers.push(parse_layer(ctx, id, layer_body)?);
        }
    }

    Ok(Profile {
        config: ctx.typed(get(body, "config"), "profile.config")?,
        templates: ctx.string_list(get(body, "templates"), "profile.templates")?,
        keys: ctx.keys(get(body, "keys"), "profile.keys")?,
        name,
        layers,
    })
}

fn parse_layer(ctx: &Ctx, id: String, value: &Value) -> CompileResult<Layer> {
    if value.is_null() {
        return Ok(Layer::new(id));
    }

    let section = format!("layers.{id}");
    let body = ctx.mapping(value, &section)?;

    let name = get(body, "name")
        .map(|name| ctx.name(name, "layer name"))
        .transpose()?;
    let config: ProfileConfig = ctx.typed(get(body, "config"), &format!("{section}.config"))?;

    Ok(Layer {
        name,
        config,
        extends: ctx.string_list(get(body, "extends"), &format!("{section}.extends"))?,
        templates: ctx.string_list(get(body, "templates"), &format!("{section}.templates"))?,
        keys: ctx.keys(get(body, "keys"), &format!("{section}.keys"))?,
        id,
    })
}

fn parse_template_body(ctx: &Ctx, name: &str, value: &Value) -> CompileResult<Template> {
    let section = format!("template '{name}'");
    if value.is_null() {
        return Ok(Template::Flat(BTreeMap::new()));
    }
    let body = ctx.mapping(value, &section)?;

    if let (Some(definitions), Some(positions)) =
        (get(body, "key_definitions"), get(body, "key_positions"))
    {
        let mut oriented = OrientedTemplate::default();

        for (key_name, raw) in ctx.mapping(definitions, &format!("{section}.key_definitions"))? {
            let key_name = ctx.name(key_name, "key name")?;
            let def = normalize_definition(&key_name, raw)?;
            oriented.key_definitions.insert(key_name, def);
        }

        for (orientation, table) in ctx.mapping(positions, &format!("{section}.key_positions"))? {
            let orientation = Orientation::from(ctx.name(orientation, "orientation")?);
            let mut placed = Vec::new();
            if !table.is_null() {
                for (key_name, index) in ctx.mapping(table, &format!("{section}.key_positions"))? {
                    let key_name = ctx.name(key_name, "key name")?;
                    let token = scalar_to_string(index).unwrap_or_default();
                    placed.push((key_name, parse_index(&token, &token)?));
                }
            }
            oriented.key_positions.insert(orientation, placed);
        }

        oriented.supported_orientations = ctx
            .string_list(get(body, "supported_orientations"), &section)?
            .into_iter()
            .map(Orientation::from)
            .collect();

        return Ok(Template::Oriented(oriented));
    }

    if let Some(keys) = get(body, "keys") {
        return ctx.keys(Some(keys), &format!("{section}.keys")).map(Template::Flat);
    }

    // Bare `spec: definition` mapping.
    let bare: Mapping = body
        .iter()
        .filter(|(key, _)| {
            key.as_str()
                .is_none_or(|key| !TEMPLATE_METADATA_KEYS.contains(&key))
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    expand_key_map(&bare).map(Template::Flat)
}

fn get<'a>(mapping: &'a Mapping, key: &str) -> Option<&'a Value> {
    mapping.get(key).filter(|value| !value.is_null())
}

/// Parse context: knows which file errors belong to.
struct Ctx {
    path: Option<PathBuf>,
}

impl Ctx {
    fn new(path: Option<&Path>) -> Self {
        Self {
            path: path.map(Path::to_path_buf),
        }
    }

    fn error(&self, message: impl Into<String>) -> CompileError {
        CompileError::parse(self.path.clone(), message)
    }

    fn mapping<'a>(&self, value: &'a Value, what: &str) -> CompileResult<&'a Mapping> {
        value
            .as_mapping()
            .ok_or_else(|| self.error(format!("{what} must be a mapping")))
    }

    fn name(&self, value: &Value, what: &str) -> CompileResult<String> {
        scalar_to_string(value).ok_or_else(|| self.error(format!("{what} must be a string")))
    }

    fn typed<T: DeserializeOwned + Default>(
        &self,
        value: Option<&Value>,
        what: &str,
    ) -> CompileResult<T> {
        value.map_or_else(
            || Ok(T::default()),
            |value| {
                serde_yml::from_value(value.clone())
                    .map_err(|e| self.error(format!("{what}: {e}")))
            },
        )
    }

    fn string_list(&self, value: Option<&Value>, what: &str) -> CompileResult<Vec<String>> {
        match value {
            None => Ok(Vec::new()),
            Some(Value::Sequence(items)) => items
                .iter()
                .map(|item| self.name(item, &format!("{what} entry")))
                .collect(),
            Some(single) => self.name(single, what).map(|name| vec![name]),
        }
    }

    fn keys(&self, value: Option<&Value>, what: &str) -> CompileResult<crate::models::KeyMap> {
        match value {
            None => Ok(BTreeMap::new()),
            Some(value) => expand_key_map(self.mapping(value, what)?),
        }
    }
}
