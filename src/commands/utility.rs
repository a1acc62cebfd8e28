//! Utility commands: device listing and symbol tables

use anyhow::{bail, Result};

use macropad::protocol::{InputAction, KeyCode, LedMode, MediaKey, Modifiers, MouseButton};

use super::discovery;
use crate::cli::{DeviceArgs, NameKind};

/// List connected keypads
pub fn list(args: &DeviceArgs, json: bool) -> Result<()> {
    let devices = discovery(args).list_devices()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&devices)?);
        return Ok(());
    }

    if devices.is_empty() {
        bail!("No macro keypad devices found");
    }

    println!("Available macro keypad devices:");
    for (i, dev) in devices.iter().enumerate() {
        let info = &dev.info;
        println!("\n{}. {}", i + 1, info.display_name());
        println!("   VID:PID = {}", info.id_string());
        println!("   Protocol version: {}", info.protocol_version);
        println!("   Path: {}", info.device_path);
    }
    Ok(())
}

fn print_table<I, S>(title: &str, names: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    println!("{title}:");
    let names: Vec<String> = names
        .into_iter()
        .map(|n| n.as_ref().to_lowercase())
        .collect();
    for chunk in names.chunks(8) {
        println!("  {}", chunk.join(", "));
    }
}

/// Print the valid names for one table, or all of them
pub fn names(kind: Option<NameKind>) -> Result<()> {
    let kinds = match kind {
        Some(k) => vec![k],
        None => vec![
            NameKind::Actions,
            NameKind::Keys,
            NameKind::Modifiers,
            NameKind::Media,
            NameKind::Mouse,
            NameKind::Led,
        ],
    };

    for (i, kind) in kinds.into_iter().enumerate() {
        if i > 0 {
            println!();
        }
        match kind {
            NameKind::Actions => print_table("Actions", InputAction::ALL.iter().map(|a| a.name())),
            NameKind::Keys => print_table("Keys", KeyCode::ALL.iter().map(|k| k.name())),
            NameKind::Modifiers => print_table("Modifiers", Modifiers::names()),
            NameKind::Media => print_table("Media keys", MediaKey::ALL.iter().map(|m| m.name())),
            NameKind::Mouse => print_table("Mouse buttons", MouseButton::ALL.iter().map(|b| b.name())),
            NameKind::Led => print_table(
                "LED modes (or a mode number)",
                LedMode::ALL.iter().map(|m| m.to_string()),
            ),
        }
    }
    Ok(())
}
