//! Host-side configuration for 3-button 1-knob macro keypads (VID 0x1189).
//!
//! The protocol and transport layers live in their own crates and are
//! re-exported here; this crate adds TOML keypad profiles.

pub mod profile;

pub use macropad_protocol as protocol;
pub use macropad_transport as transport;
