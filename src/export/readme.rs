//! Per-profile README generator.
//!
//! Produces a markdown summary of one generated profile: its configuration
//! and a table of every key with its label and a short action description.

use std::fmt::Write as _;

use crate::constants::PHYSICAL_KEYS;
use crate::error::CompileResult;
use crate::firmware::generator::{CompiledKey, CompiledProfile, KeyRole};
use crate::models::{ColorResolver, KeyCategory, LayerType};

/// Renders `README.md` for a compiled profile.
///
/// # Errors
///
/// Returns `InvalidColor` if the background color cannot be resolved.
pub fn render_readme<C: ColorResolver>(
    profile: &CompiledProfile,
    source: Option<&str>,
    colors: &C,
) -> CompileResult<String> {
    let mut output = String::new();

    let _ = writeln!(output, "# {}\n", profile.name);
    if let Some(source) = source {
        let _ = writeln!(output, "Generated from `{source}`.\n");
    }

    output.push_str("## Configuration\n\n");
    let _ = writeln!(
        output,
        "- **Orientation**: {}",
        profile.config.orientation()
    );
    if let Some(color) = &profile.config.background_color {
        let rgb = colors.resolve(color)?;
        let _ = writeln!(
            output,
            "- **Background Color**: RGB({}, {}, {})",
            rgb.r, rgb.g, rgb.b
        );
    }
    if profile.config.dim_unused() {
        output.push_str("- **Dim Unused Keys**: Yes\n");
    }

    output.push_str("\n## Keys\n\n");
    output.push_str("| Key | Label | Action |\n");
    output.push_str("|-----|-------|--------|\n");
    for key in &profile.keys {
        let label = key.definition.label_text("<br>");
        let _ = writeln!(
            output,
            "| {} | {} | {} |",
            key_cell(key.index),
            if label.is_empty() { "-" } else { label.as_str() },
            describe_key(key)
        );
    }

    Ok(output)
}

/// Key column text; encoder events are named.
fn key_cell(index: u8) -> String {
    if index <= PHYSICAL_KEYS {
        return index.to_string();
    }
    let offset = index - PHYSICAL_KEYS - 1;
    let event = match offset % 3 {
        0 => "CW",
        1 => "CCW",
        _ => "press",
    };
    format!("{index} (knob {} {event})", offset / 3 + 1)
}

/// One-line description of what a key does.
#[must_use]
pub fn describe_key(key: &CompiledKey) -> String {
    match &key.role {
        KeyRole::Switch { layer_type, target } => {
            describe_switch(*layer_type, key.definition.modifier.as_deref(), target)
        }
        KeyRole::Return { layer_type, home } => match layer_type {
            LayerType::ModifierHold => format!("Release to `{home}`"),
            _ => format!("Return to `{home}`"),
        },
        KeyRole::Action => describe_action(key),
    }
}

fn describe_switch(layer_type: LayerType, modifier: Option<&str>, target: &str) -> String {
    match layer_type {
        LayerType::ModifierHold => modifier.map_or_else(
            || format!("Switch to `{target}`"),
            |modifier| format!("Hold {modifier}, switch to `{target}`"),
        ),
        LayerType::Toggle | LayerType::HoldToggle => format!("Toggle `{target}` layer"),
        LayerType::Oneshot => format!("Oneshot to `{target}`"),
        LayerType::Momentary => format!("Momentary `{target}`"),
    }
}

fn describe_action(key: &CompiledKey) -> String {
    let def = &key.definition;
    match def.category() {
        KeyCategory::Media { command } => {
            format!("Media: {}", command.unwrap_or("MUTE").to_uppercase())
        }
        KeyCategory::Custom { .. } => "Custom script".to_string(),
        KeyCategory::Text(text) => format!("Type `{text}`"),
        KeyCategory::Plain(token) => {
            if def.hold {
                format!("Hold `{token}`")
            } else if let Some(modifier) = &def.modifier {
                format!("`{modifier}+{token}`")
            } else {
                format!("`{token}`")
            }
        }
        KeyCategory::Switcher { .. } | KeyCategory::LabelOnly => "Display only".to_string(),
    }
}
