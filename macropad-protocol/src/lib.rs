//! Protocol layer for 0x1189 macro keypads
//!
//! Turns configuration intents (which slot, which layer, what it should do)
//! into ordered batches of 64-byte HID output reports and sends them
//! through a [`macropad_transport::Transport`].
//!
//! - [`codec`]: wire codes and symbolic names
//! - [`parse`]: `"LCTRL+LSHIFT+F5,ENTER"` key-sequence syntax
//! - [`encoder`]: legacy (v0) report batches, extended (v1) stub
//! - [`device`]: the [`MacroPad`] session

pub mod codec;
pub mod device;
pub mod encoder;
pub mod error;
pub mod parse;
pub mod report;

pub use codec::{InputAction, KeyCode, KeyStroke, KeyType, Layer, LedMode, MediaKey, Modifiers, MouseButton};
pub use device::MacroPad;
pub use encoder::{
    select_encoder, Assignment, ConfigIntent, ExtendedProtocol, LegacyProtocol, ReportEncoder,
    MAX_KEY_SEQUENCE,
};
pub use error::{MacropadError, Result};
pub use parse::{parse_key_sequence, parse_modifiers, KeySequence};
pub use report::Report;
