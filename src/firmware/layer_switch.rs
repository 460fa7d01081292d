//! Layer-switch code generation.
//!
//! The firmware only knows "run this script" and "switch to that profile".
//! A switcher key therefore compiles to scripts in two places: the key's
//! slot in its home profile, and (for some layer types) a mirrored return
//! key at the same slot in the target layer.
//!
//! | layer_type      | home press          | home release  | layer press | layer release       |
//! |-----------------|---------------------|---------------|-------------|---------------------|
//! | `modifier_hold` | hold mod, go layer  | release mod   | hold mod    | release mod, go home|
//! | `toggle`        | go layer            |               | go home     |                     |
//! | `oneshot`       | go layer            |               | (no mirror) |                     |
//! | `momentary`     | go layer            | go home       | (no mirror) |                     |
//! | `hold_toggle`   | go layer            |               | go home     |                     |

use crate::firmware::script::{Instruction, KeyScripts, Script};
use crate::models::LayerType;

/// A switcher ready for compilation, with profile names already resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Switch<'a> {
    /// Switching discipline.
    pub layer_type: LayerType,
    /// Modifier held by `modifier_hold`.
    pub modifier: Option<&'a str>,
    /// `GOTO_PROFILE` argument for the target layer.
    pub target: &'a str,
    /// `GOTO_PROFILE` argument for the profile the switcher lives in.
    pub home: &'a str,
}

/// Reads a raw `layer_type`.
///
/// A missing value means `modifier_hold`. An unknown value also falls back
/// to `modifier_hold`; the second element is then `false` so the caller can
/// report it.
#[must_use]
pub fn parse_layer_type(raw: Option<&str>) -> (LayerType, bool) {
    match raw {
        None => (LayerType::ModifierHold, true),
        Some(value) => LayerType::parse(value).map_or((LayerType::ModifierHold, false), |t| (t, true)),
    }
}

fn modifier_token(modifier: Option<&str>) -> Option<String> {
    modifier
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_uppercase)
}

fn switch_script() -> Script {
    let mut script = Script::new();
    script.push(Instruction::DefaultDelay(0));
    script
}

/// Compiles the switcher at its home slot.
#[must_use]
pub fn compile_home(switch: &Switch<'_>) -> KeyScripts {
    let goto_target = Instruction::GotoProfile(switch.target.to_string());
    let mut press = switch_script();

    match switch.layer_type {
        LayerType::ModifierHold => {
            let modifier = modifier_token(switch.modifier);
            if let Some(modifier) = &modifier {
                press.push(Instruction::KeyDown(modifier.clone()));
            }
            press.push(goto_target);

            let mut release = switch_script();
            if let Some(modifier) = modifier {
                release.push(Instruction::KeyUp(modifier));
            }
            KeyScripts::paired(press, release)
        }
        LayerType::Toggle => {
            press.push(goto_target);
            KeyScripts::press_only(press)
        }
        LayerType::Oneshot => {
            press.push(Instruction::Rem("Oneshot layer".to_string()));
            press.push(goto_target);
            KeyScripts::press_only(press)
        }
        LayerType::Momentary => {
            press.push(goto_target);
            let mut release = switch_script();
            release.push(Instruction::GotoProfile(switch.home.to_string()));
            KeyScripts::paired(press, release)
        }
        LayerType::HoldToggle => {
            press.push(Instruction::Rem(
                "hold_toggle behaves as toggle; hold detection is not supported".to_string(),
            ));
            press.push(goto_target);
            KeyScripts::press_only(press)
        }
    }
}

/// Compiles the mirrored return key inside the target layer.
///
/// Returns `None` for layer types without a mirror (`oneshot`, `momentary`).
#[must_use]
pub fn compile_mirror(switch: &Switch<'_>) -> Option<KeyScripts> {
    let goto_home = Instruction::GotoProfile(switch.home.to_string());
    let mut press = switch_script();

    match switch.layer_type {
        LayerType::ModifierHold => {
            let modifier = modifier_token(switch.modifier);
            if let Some(modifier) = &modifier {
                press.push(Instruction::KeyDown(modifier.clone()));
            }

            let mut release = switch_script();
            if let Some(modifier) = modifier {
                release.push(Instruction::KeyUp(modifier));
            }
            release.push(goto_home);
            Some(KeyScripts::paired(press, release))
        }
        LayerType::Toggle | LayerType::HoldToggle => {
            press.push(goto_home);
            Some(KeyScripts::press_only(press))
        }
        LayerType::Oneshot | LayerType::Momentary => None,
    }
}
