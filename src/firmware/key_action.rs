//! Key-action compilation for keys without layer semantics.

use crate::firmware::script::{Instruction, KeyScripts, Script};
use crate::models::{KeyCategory, KeyDefinition};

/// Modifier names that are pressed and released like single keys.
pub const MODIFIER_KEYS: &[&str] = &[
    "SHIFT", "CTRL", "ALT", "COMMAND", "WINDOWS", "OPTION", "RSHIFT", "RCTRL", "RALT",
    "RCOMMAND", "RWINDOWS", "ROPTION",
];

/// Named keys that are valid duckyScript commands on their own.
pub const NAMED_KEYS: &[&str] = &[
    "ESC", "ESCAPE", "ENTER", "RETURN", "TAB", "SPACE", "BACKSPACE", "DELETE", "INSERT", "HOME",
    "END", "PAGEUP", "PAGEDOWN", "PAUSE", "BREAK", "UP", "DOWN", "LEFT", "RIGHT", "UPARROW",
    "DOWNARROW", "LEFTARROW", "RIGHTARROW", "CAPSLOCK", "NUMLOCK", "SCROLLLOCK", "PRINTSCREEN",
    "MENU", "APP", "POWER", "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11",
    "F12", "F13", "F14", "F15", "F16", "F17", "F18", "F19", "F20", "F21", "F22", "F23", "F24",
    "KP_SLASH", "KP_ASTERISK", "KP_MINUS", "KP_PLUS", "KP_ENTER", "KP_DOT", "KP_EQUAL", "KP_0",
    "KP_1", "KP_2", "KP_3", "KP_4", "KP_5", "KP_6", "KP_7", "KP_8", "KP_9",
];

/// Media command used when `action: media` has no `command`.
pub const DEFAULT_MEDIA_COMMAND: &str = "MUTE";

/// Where the key being compiled lives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionContext<'a> {
    /// Set when the key lives in a oneshot layer: the profile to return to
    /// after the key's own action.
    pub oneshot_home: Option<&'a str>,
}

impl<'a> ActionContext<'a> {
    /// Context for a key in a oneshot layer returning to `home`.
    #[must_use]
    pub const fn oneshot(home: &'a str) -> Self {
        Self {
            oneshot_home: Some(home),
        }
    }
}

/// Returns true if `token` names a modifier key.
#[must_use]
pub fn is_modifier(token: &str) -> bool {
    MODIFIER_KEYS.iter().any(|m| m.eq_ignore_ascii_case(token))
}

/// Returns true if `token` names a single-shot key.
#[must_use]
pub fn is_named_key(token: &str) -> bool {
    NAMED_KEYS.iter().any(|k| k.eq_ignore_ascii_case(token))
}

/// Compiles a non-switcher key definition.
///
/// Switchers are compiled by [`crate::firmware::layer_switch`]; passing one
/// here yields empty scripts.
#[must_use]
pub fn compile_action(def: &KeyDefinition, ctx: &ActionContext<'_>) -> KeyScripts {
    let mut scripts = match def.category() {
        KeyCategory::Switcher { .. } => return KeyScripts::default(),
        KeyCategory::Text(text) => {
            KeyScripts::press_only(Script::from_iter([Instruction::Text(text.to_string())]))
        }
        KeyCategory::Media { command } => {
            let command = command
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map_or_else(|| DEFAULT_MEDIA_COMMAND.to_string(), str::to_uppercase);
            KeyScripts::press_only(Script::from_iter([Instruction::Command(command)]))
        }
        KeyCategory::Custom { script } => {
            let press = if script.is_empty() {
                Script::from_iter([Instruction::Rem("Empty script".to_string())])
            } else {
                script.iter().cloned().map(Instruction::Raw).collect()
            };
            KeyScripts::press_only(press)
        }
        KeyCategory::Plain(token) => compile_plain(token, def),
        KeyCategory::LabelOnly => KeyScripts::default(),
    };

    if let Some(home) = ctx.oneshot_home {
        scripts.press.push(Instruction::GotoProfile(home.to_string()));
    }

    scripts
}

fn compile_plain(token: &str, def: &KeyDefinition) -> KeyScripts {
    let modifier = def
        .modifier
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty());

    if let Some(modifier) = modifier {
        return KeyScripts::press_only(Script::from_iter([Instruction::Combo {
            modifier: modifier.to_uppercase(),
            key: token.to_lowercase(),
        }]));
    }

    let is_mod = is_modifier(token);
    let is_named = is_named_key(token);
    let single_char = token.chars().count() == 1;

    if def.hold || single_char || is_mod {
        let held = if is_mod || is_named {
            token.to_uppercase()
        } else {
            token.to_string()
        };
        return KeyScripts::paired(
            Script::from_iter([Instruction::KeyDown(held.clone())]),
            Script::from_iter([Instruction::KeyUp(held)]),
        );
    }

    if is_named {
        return KeyScripts::press_only(Script::from_iter([Instruction::Command(
            token.to_uppercase(),
        )]));
    }

    KeyScripts::press_only(Script::from_iter([Instruction::Text(token.to_string())]))
}
