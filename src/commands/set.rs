//! Programming commands

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info};

use macropad::profile::{default_profile_path, Profile};
use macropad::protocol::{
    parse_key_sequence, parse_modifiers, InputAction, Layer, LedMode, MediaKey, Modifiers,
    MouseButton,
};

use super::{open_pad, parse_symbol};
use crate::cli::DeviceArgs;

fn parse_action(action: &str) -> Result<InputAction> {
    parse_symbol("action", action, InputAction::ALL)
}

/// Assign a key sequence
pub fn set_key(args: &DeviceArgs, action: &str, keys: &str, layer: u8) -> Result<()> {
    let action = parse_action(action)?;
    let sequence = parse_key_sequence(keys)
        .context("Invalid key sequence (see `macropad names keys` and `macropad names modifiers`)")?;

    let pad = open_pad(args)?;
    pad.set_key_sequence(action, sequence.strokes(), Layer(layer))?;
    println!("Successfully configured {action}");
    Ok(())
}

/// Assign a media key
pub fn set_media(args: &DeviceArgs, action: &str, media_key: &str, layer: u8) -> Result<()> {
    let action = parse_action(action)?;
    let media_key = parse_symbol::<MediaKey>("media key", media_key, MediaKey::ALL)?;

    let pad = open_pad(args)?;
    pad.set_media_key(action, media_key, Layer(layer))?;
    println!("Successfully configured {action} with {media_key}");
    Ok(())
}

/// Assign a mouse button or scroll direction
pub fn set_mouse(
    args: &DeviceArgs,
    action: &str,
    button: &str,
    modifiers: Option<&str>,
    layer: u8,
) -> Result<()> {
    let action = parse_action(action)?;
    let button = parse_symbol::<MouseButton>("mouse button", button, MouseButton::ALL)?;
    let modifiers = match modifiers {
        Some(m) => parse_modifiers(m).with_context(|| {
            format!(
                "Invalid modifier in '{m}'\nValid modifiers: {}",
                Modifiers::names().collect::<Vec<_>>().join(", ")
            )
        })?,
        None => Modifiers::NONE,
    };

    let pad = open_pad(args)?;
    pad.set_mouse_button(action, button, modifiers, Layer(layer))?;
    println!("Successfully configured {action} with {button}");
    Ok(())
}

/// Set the LED mode
pub fn set_led(args: &DeviceArgs, mode: &str, layer: u8) -> Result<()> {
    let mode = parse_symbol::<LedMode>("LED mode", mode, LedMode::ALL)?;

    let pad = open_pad(args)?;
    pad.set_led_mode(mode, Layer(layer))?;
    println!("Successfully set LED mode to {mode}");
    Ok(())
}

/// Program a whole profile; everything is resolved before the device is opened
pub fn apply(args: &DeviceArgs, file: Option<PathBuf>) -> Result<()> {
    let path = file.unwrap_or_else(default_profile_path);
    let profile = Profile::load(&path)
        .with_context(|| format!("Failed to load profile {}", path.display()))?;

    info!("Loaded profile {} ({} assignments)", path.display(), profile.len());

    if profile.is_empty() {
        println!("Profile {} has nothing to program", path.display());
        return Ok(());
    }

    let pad = open_pad(args)?;
    for (i, intent) in profile.intents.iter().enumerate() {
        debug!("Step {}/{}: {:?}", i + 1, profile.len(), intent);
        pad.apply(intent)
            .with_context(|| format!("Step {} of {} failed", i + 1, profile.len()))?;
    }
    println!(
        "Successfully applied {} assignment(s) from {}",
        profile.len(),
        path.display()
    );
    Ok(())
}
