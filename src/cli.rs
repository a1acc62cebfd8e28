// CLI definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "macropad")]
#[command(author, version, about = "Configure 3-button 1-knob USB macro keypads")]
#[command(propagate_version = true)]
#[command(after_help = "\
Examples:
  macropad list
  macropad set-key button_1 \"LCTRL+LSHIFT+F5,ENTER\"
  macropad set-media knob_1_cw volume_up
  macropad set-mouse button_3 left -m LCTRL
  macropad set-led breathe
  macropad apply ~/.config/macropad/keypad.toml

Actions: button_1, button_2, button_3, knob_1_cw, knob_1_ccw, knob_1_press")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub device: DeviceArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which device to talk to and how to show traffic
#[derive(Args, Debug, Clone, Default)]
pub struct DeviceArgs {
    /// Vendor ID in hex (e.g. 1189); requires --pid
    #[arg(long, global = true, value_parser = parse_hex_u16, requires = "pid")]
    pub vid: Option<u16>,

    /// Product ID in hex (e.g. 8890); requires --vid
    #[arg(long, global = true, value_parser = parse_hex_u16, requires = "vid")]
    pub pid: Option<u16>,

    /// Print every report while sending it
    #[arg(long, global = true)]
    pub monitor: bool,

    /// Print reports without opening a device
    #[arg(long, global = true, conflicts_with = "monitor")]
    pub dry_run: bool,

    /// Dump all 64 payload bytes in monitor/dry-run output
    #[arg(long, global = true)]
    pub hex: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List connected keypads
    #[command(visible_alias = "ls")]
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Assign a key sequence to a button or knob
    #[command(visible_alias = "key")]
    SetKey {
        /// Button/knob action (e.g. button_1, knob_1_cw)
        action: String,
        /// Key sequence (e.g. "LCTRL+A,ENTER")
        keys: String,
        #[arg(short, long, default_value_t = 0)]
        layer: u8,
    },

    /// Assign a media key to a button or knob
    #[command(visible_alias = "media")]
    SetMedia {
        /// Button/knob action
        action: String,
        /// Media key (e.g. play_pause, volume_up)
        media_key: String,
        #[arg(short, long, default_value_t = 0)]
        layer: u8,
    },

    /// Assign a mouse button or scroll direction to a button or knob
    #[command(visible_alias = "mouse")]
    SetMouse {
        /// Button/knob action
        action: String,
        /// Mouse button (left, right, middle, scroll_up, scroll_down)
        button: String,
        /// Modifiers held with the click (e.g. "LCTRL+LSHIFT")
        #[arg(short, long)]
        modifiers: Option<String>,
        #[arg(short, long, default_value_t = 0)]
        layer: u8,
    },

    /// Set the LED mode (off, on, breathe, or a mode number)
    #[command(visible_alias = "led")]
    SetLed {
        mode: String,
        #[arg(short, long, default_value_t = 0)]
        layer: u8,
    },

    /// Program every slot in a TOML profile
    Apply {
        /// Profile file (default: $XDG_CONFIG_HOME/macropad/keypad.toml)
        file: Option<PathBuf>,
    },

    /// List valid symbolic names
    Names {
        #[arg(value_enum)]
        kind: Option<NameKind>,
    },
}

/// Symbol tables that `names` can print
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum NameKind {
    Actions,
    Keys,
    Modifiers,
    Media,
    Mouse,
    Led,
}

/// Parse a hex ID with or without a `0x` prefix
pub fn parse_hex_u16(s: &str) -> Result<u16, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u16::from_str_radix(digits, 16).map_err(|e| format!("invalid hex ID '{s}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn hex_ids() {
        assert_eq!(parse_hex_u16("1189"), Ok(0x1189));
        assert_eq!(parse_hex_u16("0x8890"), Ok(0x8890));
        assert!(parse_hex_u16("zz").is_err());
    }

    #[test]
    fn set_mouse_args() {
        let cli = Cli::try_parse_from([
            "macropad", "set-mouse", "button_3", "left", "-m", "LCTRL", "--dry-run",
        ])
        .unwrap();
        assert!(cli.device.dry_run);
        match cli.command {
            Commands::SetMouse {
                action,
                button,
                modifiers,
                layer,
            } => {
                assert_eq!(action, "button_3");
                assert_eq!(button, "left");
                assert_eq!(modifiers.as_deref(), Some("LCTRL"));
                assert_eq!(layer, 0);
            }
            _ => panic!("wrong subcommand"),
        }
    }

    #[test]
    fn vid_requires_pid() {
        assert!(Cli::try_parse_from(["macropad", "--vid", "1189", "list"]).is_err());
        let cli = Cli::try_parse_from(["macropad", "list", "--vid", "1189", "--pid", "8890"]).unwrap();
        assert_eq!(cli.device.vid, Some(0x1189));
        assert_eq!(cli.device.pid, Some(0x8890));
    }
}
