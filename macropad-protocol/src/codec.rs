//! Field codec: on-wire codes for slots, keys, modifiers, media keys,
//! mouse buttons and LED modes.
//!
//! Encoding is total over each closed set. Decoding from a symbolic name
//! is case-insensitive and fails with [`MacropadError::UnknownSymbol`]
//! carrying the offending token.

use bitflags::bitflags;
use std::fmt;
use std::str::FromStr;

use crate::error::MacropadError;

/// Defines a closed code table: the enum, its wire code, canonical name,
/// accepted aliases, `Display` and `FromStr`.
macro_rules! code_table {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident: $repr:ty {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $code:literal, $label:literal $(| $alias:literal)*;
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every value, in code order
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire code
            pub fn code(self) -> $repr {
                match self {
                    $(Self::$variant => $code,)+
                }
            }

            /// Value for a wire code
            pub fn from_code(code: $repr) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Canonical upper-case name
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }

            fn lookup(upper: &str) -> Option<Self> {
                match upper {
                    $($label $(| $alias)* => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $name {
            type Err = MacropadError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let token = s.trim();
                Self::lookup(&token.to_ascii_uppercase())
                    .ok_or_else(|| MacropadError::UnknownSymbol(token.to_string()))
            }
        }
    };
}

code_table! {
    /// A programmable slot on the 3-button 1-knob keypad
    pub enum InputAction: u8 {
        Button1 = 1, "BUTTON_1";
        Button2 = 2, "BUTTON_2";
        Button3 = 3, "BUTTON_3";
        KnobCw = 4, "KNOB_1_CW" | "KNOB_CW";
        KnobCcw = 5, "KNOB_1_CCW" | "KNOB_CCW";
        KnobPress = 6, "KNOB_1_PRESS" | "KNOB_PRESS";
    }
}

impl TryFrom<u8> for InputAction {
    type Error = MacropadError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_code(value).ok_or(MacropadError::InvalidAction(value))
    }
}

code_table! {
    /// Function-report type tag (byte 1, low nibble)
    pub enum KeyType: u8 {
        Basic = 0, "BASIC";
        Multimedia = 1, "MULTIMEDIA";
        Led = 2, "LED";
    }
}

bitflags! {
    /// HID keyboard modifier byte
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const LCTRL = 0x01;
        const LSHIFT = 0x02;
        const LALT = 0x04;
        const LGUI = 0x08;
        const RCTRL = 0x10;
        const RSHIFT = 0x20;
        const RALT = 0x40;
        const RGUI = 0x80;
    }
}

impl Modifiers {
    pub const NONE: Self = Self::empty();

    /// Single modifier token (`NONE` included), upper-case
    pub(crate) fn lookup(upper: &str) -> Option<Self> {
        if upper == "NONE" {
            return Some(Self::NONE);
        }
        Self::from_name(upper)
    }

    /// Token names accepted by [`Modifiers::lookup`], `NONE` first
    pub fn names() -> impl Iterator<Item = &'static str> {
        std::iter::once("NONE").chain(Self::all().iter_names().map(|(name, _)| name))
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NONE");
        }
        for (i, (name, _)) in self.iter_names().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

code_table! {
    /// USB HID keyboard usage (page 0x07)
    pub enum KeyCode: u8 {
        None = 0x00, "NONE";
        A = 0x04, "A";
        B = 0x05, "B";
        C = 0x06, "C";
        D = 0x07, "D";
        E = 0x08, "E";
        F = 0x09, "F";
        G = 0x0A, "G";
        H = 0x0B, "H";
        I = 0x0C, "I";
        J = 0x0D, "J";
        K = 0x0E, "K";
        L = 0x0F, "L";
        M = 0x10, "M";
        N = 0x11, "N";
        O = 0x12, "O";
        P = 0x13, "P";
        Q = 0x14, "Q";
        R = 0x15, "R";
        S = 0x16, "S";
        T = 0x17, "T";
        U = 0x18, "U";
        V = 0x19, "V";
        W = 0x1A, "W";
        X = 0x1B, "X";
        Y = 0x1C, "Y";
        Z = 0x1D, "Z";
        Key1 = 0x1E, "KEY_1" | "1";
        Key2 = 0x1F, "KEY_2" | "2";
        Key3 = 0x20, "KEY_3" | "3";
        Key4 = 0x21, "KEY_4" | "4";
        Key5 = 0x22, "KEY_5" | "5";
        Key6 = 0x23, "KEY_6" | "6";
        Key7 = 0x24, "KEY_7" | "7";
        Key8 = 0x25, "KEY_8" | "8";
        Key9 = 0x26, "KEY_9" | "9";
        Key0 = 0x27, "KEY_0" | "0";
        Enter = 0x28, "ENTER";
        Esc = 0x29, "ESC";
        Backspace = 0x2A, "BACKSPACE";
        Tab = 0x2B, "TAB";
        Space = 0x2C, "SPACE";
        Minus = 0x2D, "MINUS";
        Equal = 0x2E, "EQUAL";
        LeftBrace = 0x2F, "LEFTBRACE";
        RightBrace = 0x30, "RIGHTBRACE";
        Backslash = 0x31, "BACKSLASH";
        Semicolon = 0x33, "SEMICOLON";
        Apostrophe = 0x34, "APOSTROPHE";
        Grave = 0x35, "GRAVE";
        Comma = 0x36, "COMMA";
        Dot = 0x37, "DOT";
        Slash = 0x38, "SLASH";
        CapsLock = 0x39, "CAPSLOCK";
        F1 = 0x3A, "F1";
        F2 = 0x3B, "F2";
        F3 = 0x3C, "F3";
        F4 = 0x3D, "F4";
        F5 = 0x3E, "F5";
        F6 = 0x3F, "F6";
        F7 = 0x40, "F7";
        F8 = 0x41, "F8";
        F9 = 0x42, "F9";
        F10 = 0x43, "F10";
        F11 = 0x44, "F11";
        F12 = 0x45, "F12";
        PrintScreen = 0x46, "PRINTSCREEN";
        ScrollLock = 0x47, "SCROLLLOCK";
        Pause = 0x48, "PAUSE";
        Insert = 0x49, "INSERT";
        Home = 0x4A, "HOME";
        PageUp = 0x4B, "PAGEUP";
        Delete = 0x4C, "DELETE";
        End = 0x4D, "END";
        PageDown = 0x4E, "PAGEDOWN";
        Right = 0x4F, "RIGHT";
        Left = 0x50, "LEFT";
        Down = 0x51, "DOWN";
        Up = 0x52, "UP";
    }
}

code_table! {
    /// Consumer-control key
    pub enum MediaKey: u16 {
        PlayPause = 0xE8, "PLAY_PAUSE";
        Stop = 0xE9, "STOP";
        NextTrack = 0xEB, "NEXT_TRACK";
        PrevTrack = 0xEC, "PREV_TRACK";
        VolumeUp = 0xEF, "VOLUME_UP";
        VolumeDown = 0xF0, "VOLUME_DOWN";
        Mute = 0xF1, "MUTE";
    }
}

code_table! {
    /// Mouse button or scroll direction
    pub enum MouseButton: u8 {
        Left = 0x01, "LEFT";
        Right = 0x02, "RIGHT";
        Middle = 0x04, "MIDDLE";
        ScrollUp = 0x10, "SCROLL_UP";
        ScrollDown = 0x20, "SCROLL_DOWN";
    }
}

impl MouseButton {
    /// Scroll directions go in the wheel byte, buttons in the button byte
    pub fn is_scroll(self) -> bool {
        matches!(self, Self::ScrollUp | Self::ScrollDown)
    }
}

/// Backlight mode
///
/// Codes above 2 exist on newer firmware and are only reachable by number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedMode {
    Off,
    On,
    Breathe,
    Vendor(u8),
}

impl LedMode {
    /// Named modes
    pub const ALL: &'static [Self] = &[Self::Off, Self::On, Self::Breathe];

    /// Highest mode code the legacy protocol accepts
    pub const MAX_LEGACY: u8 = 2;

    /// Get mode from numeric value
    pub fn from_code(value: u8) -> Self {
        match value {
            0 => Self::Off,
            1 => Self::On,
            2 => Self::Breathe,
            n => Self::Vendor(n),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::On => 1,
            Self::Breathe => 2,
            Self::Vendor(n) => n,
        }
    }
}

impl fmt::Display for LedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => f.write_str("OFF"),
            Self::On => f.write_str("ON"),
            Self::Breathe => f.write_str("BREATHE"),
            Self::Vendor(n) => write!(f, "{n}"),
        }
    }
}

impl FromStr for LedMode {
    type Err = MacropadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        match token.to_ascii_uppercase().as_str() {
            "OFF" => Ok(Self::Off),
            "ON" => Ok(Self::On),
            "BREATHE" => Ok(Self::Breathe),
            other => other
                .parse::<u8>()
                .map(Self::from_code)
                .map_err(|_| MacropadError::UnknownSymbol(token.to_string())),
        }
    }
}

/// One keystroke: a key plus the modifiers held with it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyStroke {
    pub key: KeyCode,
    pub modifiers: Modifiers,
}

impl Default for KeyCode {
    fn default() -> Self {
        Self::None
    }
}

impl KeyStroke {
    /// Keystroke with no key and no modifiers
    pub const NOOP: Self = Self {
        key: KeyCode::None,
        modifiers: Modifiers::NONE,
    };

    pub fn new(key: KeyCode, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }
}

impl From<KeyCode> for KeyStroke {
    fn from(key: KeyCode) -> Self {
        Self::new(key, Modifiers::NONE)
    }
}

impl fmt::Display for KeyStroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.modifiers.is_empty(), self.key) {
            (true, key) => write!(f, "{key}"),
            (false, KeyCode::None) => write!(f, "{}", self.modifiers),
            (false, key) => write!(f, "{}+{key}", self.modifiers),
        }
    }
}

/// Configuration bank a slot assignment belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Layer(pub u8);

impl Layer {
    pub fn index(self) -> u8 {
        self.0
    }
}

impl From<u8> for Layer {
    fn from(n: u8) -> Self {
        Self(n)
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Layer {
    type Err = MacropadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        token
            .parse::<u8>()
            .map(Self)
            .map_err(|_| MacropadError::UnknownSymbol(token.to_string()))
    }
}
