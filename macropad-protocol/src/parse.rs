//! Symbolic key-sequence syntax
//!
//! ```text
//! A                       → [A]
//! LCTRL+C                 → [LCTRL+C]
//! LCTRL+LSHIFT+F5,ENTER   → [LCTRL+LSHIFT+F5, ENTER]
//! LGUI                    → [LGUI + no key]
//! 5 / KEY_5               → [KEY_5]
//! ```
//!
//! Keystrokes are separated by `,`, tokens within a keystroke by `+`.
//! Each token is tried as a modifier first (`NONE` counts as one), then as
//! a key name, then as `KEY_<token>`. A second key in one keystroke
//! replaces the first.

use std::fmt;
use std::str::FromStr;

use crate::codec::{KeyCode, KeyStroke, Modifiers};
use crate::error::{MacropadError, Result};

/// Separator between keystrokes
pub const STROKE_SEPARATOR: char = ',';
/// Separator between tokens in one keystroke
pub const TOKEN_SEPARATOR: char = '+';

/// Ordered keystrokes typed by one slot
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeySequence(Vec<KeyStroke>);

impl KeySequence {
    pub fn new(strokes: Vec<KeyStroke>) -> Self {
        Self(strokes)
    }

    pub fn strokes(&self) -> &[KeyStroke] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<KeyStroke> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<KeyStroke>> for KeySequence {
    fn from(strokes: Vec<KeyStroke>) -> Self {
        Self(strokes)
    }
}

impl From<KeySequence> for Vec<KeyStroke> {
    fn from(seq: KeySequence) -> Self {
        seq.0
    }
}

impl fmt::Display for KeySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stroke) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{STROKE_SEPARATOR}")?;
            }
            write!(f, "{stroke}")?;
        }
        Ok(())
    }
}

impl FromStr for KeySequence {
    type Err = MacropadError;

    fn from_str(s: &str) -> Result<Self> {
        parse_key_sequence(s)
    }
}

impl FromStr for KeyStroke {
    type Err = MacropadError;

    fn from_str(s: &str) -> Result<Self> {
        parse_keystroke(&s.to_ascii_uppercase())
    }
}

impl FromStr for Modifiers {
    type Err = MacropadError;

    fn from_str(s: &str) -> Result<Self> {
        parse_modifiers(s)
    }
}

fn unknown(token: &str) -> MacropadError {
    MacropadError::UnknownSymbol(token.to_string())
}

/// Resolve a key token: key name, then `KEY_<token>`
fn lookup_key(token: &str) -> Option<KeyCode> {
    token
        .parse::<KeyCode>()
        .ok()
        .or_else(|| format!("KEY_{token}").parse::<KeyCode>().ok())
}

/// Parse one keystroke; `upper` is already upper-cased
fn parse_keystroke(upper: &str) -> Result<KeyStroke> {
    let mut stroke = KeyStroke::NOOP;

    for token in upper.trim().split(TOKEN_SEPARATOR).map(str::trim) {
        if token.is_empty() {
            return Err(unknown(upper.trim()));
        }
        if let Some(m) = Modifiers::lookup(token) {
            stroke.modifiers |= m;
        } else if let Some(key) = lookup_key(token) {
            stroke.key = key;
        } else {
            return Err(unknown(token));
        }
    }

    Ok(stroke)
}

/// Parse `"LCTRL+LSHIFT+F5,ENTER"` into keystrokes
pub fn parse_key_sequence(input: &str) -> Result<KeySequence> {
    let upper = input.to_ascii_uppercase();
    upper
        .split(STROKE_SEPARATOR)
        .map(|stroke| {
            if stroke.trim().is_empty() {
                // Name the whole input; an empty stroke has nothing to show
                return Err(unknown(upper.trim()));
            }
            parse_keystroke(stroke)
        })
        .collect::<Result<Vec<_>>>()
        .map(KeySequence)
}

/// Parse a `+`-joined modifier list such as `"LCTRL+LALT"`
pub fn parse_modifiers(input: &str) -> Result<Modifiers> {
    let upper = input.to_ascii_uppercase();
    upper
        .split(TOKEN_SEPARATOR)
        .map(str::trim)
        .try_fold(Modifiers::NONE, |acc, token| {
            if token.is_empty() {
                return Err(unknown(upper.trim()));
            }
            Modifiers::lookup(token)
                .map(|m| acc | m)
                .ok_or_else(|| unknown(token))
        })
}
