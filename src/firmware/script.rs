//! duckyScript instruction model.
//!
//! Compilers build [`Script`] values; only [`Script::render`] decides how
//! they look on disk.

use std::fmt;

/// One line of a duckyScript file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `REM <text>`
    Rem(String),
    /// `DEFAULTDELAY <ms>`
    DefaultDelay(u32),
    /// `KEYDOWN <key>`
    KeyDown(String),
    /// `KEYUP <key>`
    KeyUp(String),
    /// `GOTO_PROFILE <target>`
    GotoProfile(String),
    /// `STRING <text>`
    Text(String),
    /// A bare command: named key (`ENTER`) or media command (`VOLUME_UP`).
    Command(String),
    /// `<MODIFIER> <key>` combination.
    Combo {
        /// Modifier token, upper-cased.
        modifier: String,
        /// Key token, lower-cased.
        key: String,
    },
    /// An author-supplied line, emitted verbatim.
    Raw(String),
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rem(text) => write!(f, "REM {text}"),
            Self::DefaultDelay(ms) => write!(f, "DEFAULTDELAY {ms}"),
            Self::KeyDown(key) => write!(f, "KEYDOWN {key}"),
            Self::KeyUp(key) => write!(f, "KEYUP {key}"),
            Self::GotoProfile(target) => write!(f, "GOTO_PROFILE {target}"),
            Self::Text(text) => write!(f, "STRING {text}"),
            Self::Command(command) | Self::Raw(command) => f.write_str(command),
            Self::Combo { modifier, key } => write!(f, "{modifier} {key}"),
        }
    }
}

/// An ordered instruction sequence for one key event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    instructions: Vec<Instruction>,
}

impl Script {
    /// Creates an empty script.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            instructions: Vec::new(),
        }
    }

    /// Appends one instruction.
    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Instructions in order.
    #[must_use]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Returns true if the script has no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Last instruction, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Instruction> {
        self.instructions.last()
    }

    /// Returns true if any instruction equals `instruction`.
    #[must_use]
    pub fn contains(&self, instruction: &Instruction) -> bool {
        self.instructions.contains(instruction)
    }

    /// Renders the file contents: one instruction per line, newline-terminated.
    ///
    /// `header` is written first as a `REM` line.
    #[must_use]
    pub fn render(&self, header: &str) -> String {
        let mut out = format!("{}\n", Instruction::Rem(header.to_string()));
        for instruction in &self.instructions {
            out.push_str(&instruction.to_string());
            out.push('\n');
        }
        out
    }
}

impl Extend<Instruction> for Script {
    fn extend<T: IntoIterator<Item = Instruction>>(&mut self, iter: T) {
        self.instructions.extend(iter);
    }
}

impl FromIterator<Instruction> for Script {
    fn from_iter<T: IntoIterator<Item = Instruction>>(iter: T) -> Self {
        Self {
            instructions: iter.into_iter().collect(),
        }
    }
}

/// Press script plus the release script, when one is required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyScripts {
    /// Runs on key down.
    pub press: Script,
    /// Runs on key up. `None` means no `-release` file is written.
    pub release: Option<Script>,
}

impl KeyScripts {
    /// Scripts with no release.
    #[must_use]
    pub const fn press_only(press: Script) -> Self {
        Self {
            press,
            release: None,
        }
    }

    /// Scripts with both press and release.
    #[must_use]
    pub const fn paired(press: Script, release: Script) -> Self {
        Self {
            press,
            release: Some(release),
        }
    }
}
