//! Tests against a real keypad.
//!
//! These tests require a 3-button 1-knob keypad to be connected and
//! rewrite its button 1 and LED settings.
//! Run with: cargo test -p macropad-protocol --test hardware -- --ignored --nocapture

use macropad_protocol::{parse_key_sequence, InputAction, Layer, LedMode, MacroPad};
use macropad_transport::{HidDiscovery, ProtocolVersion};

fn open_pad() -> MacroPad {
    MacroPad::open(&HidDiscovery::new()).expect("No keypad found — plug in a supported device")
}

#[test]
#[ignore] // requires hardware
fn negotiates_legacy_protocol() {
    let pad = open_pad();
    assert_eq!(pad.protocol(), Some(ProtocolVersion::Legacy));
    println!("{} ({})", pad.device_info().display_name(), pad.device_info().id_string());
}

#[test]
#[ignore] // requires hardware
fn program_button_and_led() {
    let pad = open_pad();
    let seq = parse_key_sequence("LCTRL+C").unwrap();
    pad.set_key_sequence(InputAction::Button1, seq.strokes(), Layer(0))
        .unwrap();
    pad.set_led_mode(LedMode::On, Layer(0)).unwrap();
}
