//! Keypad profiles: several slot assignments programmed in one run.
//!
//! Profiles are TOML. Every symbol is resolved when the profile is loaded,
//! so a typo never leaves the keypad half-programmed.
//!
//! # Example TOML
//!
//! ```toml
//! led = "breathe"
//!
//! [[slot]]
//! action = "button_1"
//! keys = "LCTRL+LSHIFT+F5,ENTER"
//!
//! [[slot]]
//! action = "knob_1_cw"
//! media = "volume_up"
//!
//! [[slot]]
//! action = "button_3"
//! mouse = "left"
//! modifiers = "LCTRL"
//! ```

use macropad_protocol::{
    parse_key_sequence, parse_modifiers, Assignment, ConfigIntent, InputAction, Layer, LedMode,
    MacropadError, MediaKey, Modifiers, MouseButton,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from loading a profile
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse profile: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("slot {index}: {source}")]
    Symbol {
        index: usize,
        #[source]
        source: MacropadError,
    },

    #[error("slot {index}: exactly one of keys, media, mouse is required")]
    Assignment { index: usize },

    #[error("slot {index}: modifiers only apply to mouse slots (put them in keys for key slots)")]
    StrayModifiers { index: usize },

    #[error("led: {0}")]
    Led(#[source] MacropadError),
}

// ── TOML definition types ────────────────────────────────────────────

/// Profile as written in TOML
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileDef {
    /// LED mode name or number
    pub led: Option<String>,
    #[serde(default, rename = "slot")]
    pub slots: Vec<SlotDef>,
}

/// One `[[slot]]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlotDef {
    pub action: String,
    #[serde(default)]
    pub layer: u8,
    pub keys: Option<String>,
    pub media: Option<String>,
    pub mouse: Option<String>,
    pub modifiers: Option<String>,
}

impl SlotDef {
    fn resolve(&self, index: usize) -> Result<ConfigIntent, ProfileError> {
        let symbol = move |source: MacropadError| ProfileError::Symbol { index, source };

        let action = self.action.parse::<InputAction>().map_err(symbol)?;

        if self.modifiers.is_some() && self.mouse.is_none() {
            return Err(ProfileError::StrayModifiers { index });
        }

        let assignment = match (&self.keys, &self.media, &self.mouse) {
            (Some(keys), None, None) => {
                Assignment::Keys(parse_key_sequence(keys).map_err(symbol)?.into_vec())
            }
            (None, Some(media), None) => Assignment::Media(media.parse::<MediaKey>().map_err(symbol)?),
            (None, None, Some(mouse)) => Assignment::Mouse {
                button: mouse.parse::<MouseButton>().map_err(symbol)?,
                modifiers: match &self.modifiers {
                    Some(m) => parse_modifiers(m).map_err(symbol)?,
                    None => Modifiers::NONE,
                },
            },
            _ => return Err(ProfileError::Assignment { index }),
        };

        Ok(ConfigIntent::Assign {
            action,
            layer: Layer(self.layer),
            assignment,
        })
    }
}

// ── Resolved profile ─────────────────────────────────────────────────

/// A profile with every symbol resolved, in programming order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub intents: Vec<ConfigIntent>,
}

impl Profile {
    /// Resolve a parsed definition: slots in file order, LED last
    pub fn resolve(def: &ProfileDef) -> Result<Self, ProfileError> {
        let mut intents = def
            .slots
            .iter()
            .enumerate()
            .map(|(i, slot)| slot.resolve(i + 1))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(led) = &def.led {
            let mode: LedMode = led.parse().map_err(ProfileError::Led)?;
            intents.push(ConfigIntent::Led {
                layer: Layer::default(),
                mode,
            });
        }

        Ok(Self { intents })
    }

    /// Parse and resolve TOML text
    pub fn from_toml(text: &str) -> Result<Self, ProfileError> {
        let def: ProfileDef = toml::from_str(text)?;
        Self::resolve(&def)
    }

    /// Load a profile file
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let text = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

/// Path to the default profile file
pub fn default_profile_path() -> PathBuf {
    config_dir().join("keypad.toml")
}

fn config_dir() -> PathBuf {
    if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(config).join("macropad")
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".config/macropad")
    } else {
        PathBuf::from("/tmp/macropad")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macropad_protocol::{KeyCode, KeyStroke};

    const SAMPLE: &str = r#"
led = "breathe"

[[slot]]
action = "button_1"
keys = "LCTRL+LSHIFT+F5,ENTER"

[[slot]]
action = "knob_1_cw"
layer = 0
media = "volume_up"

[[slot]]
action = "BUTTON_3"
mouse = "left"
modifiers = "lctrl"
"#;

    #[test]
    fn sample_resolves_in_order() {
        let p = Profile::from_toml(SAMPLE).unwrap();
        assert_eq!(p.len(), 4);
        assert_eq!(
            p.intents[0],
            ConfigIntent::Assign {
                action: InputAction::Button1,
                layer: Layer(0),
                assignment: Assignment::Keys(vec![
                    KeyStroke::new(KeyCode::F5, Modifiers::LCTRL | Modifiers::LSHIFT),
                    KeyStroke::from(KeyCode::Enter),
                ]),
            }
        );
        assert_eq!(
            p.intents[2],
            ConfigIntent::Assign {
                action: InputAction::Button3,
                layer: Layer(0),
                assignment: Assignment::Mouse {
                    button: MouseButton::Left,
                    modifiers: Modifiers::LCTRL,
                },
            }
        );
        assert_eq!(
            p.intents[3],
            ConfigIntent::Led {
                layer: Layer(0),
                mode: LedMode::Breathe,
            }
        );
    }

    #[test]
    fn empty_profile() {
        let p = Profile::from_toml("").unwrap();
        assert!(p.is_empty());
    }

    #[test]
    fn led_by_number() {
        let p = Profile::from_toml("led = \"4\"").unwrap();
        assert_eq!(
            p.intents,
            vec![ConfigIntent::Led {
                layer: Layer(0),
                mode: LedMode::Vendor(4),
            }]
        );
    }

    #[test]
    fn unknown_key_names_slot_and_token() {
        let err = Profile::from_toml(
            r#"
[[slot]]
action = "button_1"
keys = "A"

[[slot]]
action = "button_2"
keys = "LCTRL+FOO"
"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "slot 2: Unknown symbol: FOO");
    }

    #[test]
    fn slot_needs_exactly_one_assignment() {
        let none = "[[slot]]\naction = \"button_1\"\n";
        assert!(matches!(
            Profile::from_toml(none),
            Err(ProfileError::Assignment { index: 1 })
        ));

        let both = "[[slot]]\naction = \"button_1\"\nkeys = \"A\"\nmedia = \"mute\"\n";
        assert!(matches!(
            Profile::from_toml(both),
            Err(ProfileError::Assignment { index: 1 })
        ));
    }

    #[test]
    fn modifiers_only_with_mouse() {
        let text = "[[slot]]\naction = \"button_1\"\nmedia = \"mute\"\nmodifiers = \"LCTRL\"\n";
        assert!(matches!(
            Profile::from_toml(text),
            Err(ProfileError::StrayModifiers { index: 1 })
        ));
    }

    #[test]
    fn unknown_fields_rejected() {
        let text = "[[slot]]\naction = \"button_1\"\nkey = \"A\"\n";
        assert!(matches!(Profile::from_toml(text), Err(ProfileError::Toml(_))));
    }

    #[test]
    fn bad_action_and_led() {
        let text = "[[slot]]\naction = \"button_9\"\nkeys = \"A\"\n";
        assert!(matches!(
            Profile::from_toml(text),
            Err(ProfileError::Symbol { index: 1, source: MacropadError::UnknownSymbol(_) })
        ));
        assert!(matches!(
            Profile::from_toml("led = \"disco\""),
            Err(ProfileError::Led(_))
        ));
    }

    #[test]
    fn default_path_ends_with_file_name() {
        assert!(default_profile_path().ends_with("macropad/keypad.toml"));
    }
}
