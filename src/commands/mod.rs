//! Command handlers for the CLI application.
//!
//! - `set`: programming commands (set-key, set-media, set-mouse, set-led, apply)
//! - `utility`: device listing and symbol tables (list, names)

pub mod set;
pub mod utility;

use anyhow::{Context, Result};
use std::fmt::Display;
use std::str::FromStr;

use macropad::protocol::{MacroPad, MacropadError};
use macropad::transport::device_registry::PID_3_BUTTON_1_KNOB;
use macropad::transport::{
    dry_run_info, HidDiscovery, PrinterConfig, PrinterTransport, TransportError, VENDOR_ID,
};

use crate::cli::DeviceArgs;

/// Discovery narrowed by `--vid/--pid`, wrapped with a printer under `--monitor`
pub fn discovery(args: &DeviceArgs) -> HidDiscovery {
    let discovery = match (args.vid, args.pid) {
        (Some(vid), Some(pid)) => HidDiscovery::for_device(vid, pid),
        _ => HidDiscovery::new(),
    };
    if args.monitor {
        discovery.with_printer_config(printer_config(args))
    } else {
        discovery
    }
}

fn printer_config(args: &DeviceArgs) -> PrinterConfig {
    PrinterConfig::default().with_hex(args.hex)
}

/// Open a negotiated session: the real device, or a printer under `--dry-run`
pub fn open_pad(args: &DeviceArgs) -> Result<MacroPad> {
    if args.dry_run {
        let info = dry_run_info(
            args.vid.unwrap_or(VENDOR_ID),
            args.pid.unwrap_or(PID_3_BUTTON_1_KNOB),
        );
        let mut pad = MacroPad::new(PrinterTransport::dry_run_as(info, printer_config(args)));
        pad.negotiate().context("Dry run")?;
        return Ok(pad);
    }

    MacroPad::open(&discovery(args)).map_err(|e| match e {
        MacropadError::Transport(TransportError::HidPermissionDenied(msg)) => anyhow::anyhow!(
            "Could not open device: permission denied ({msg})\n\
             Add a udev rule for VID 1189 or run with elevated privileges"
        ),
        other => anyhow::Error::new(other).context("Could not connect to device"),
    })
}

/// Parse a symbolic argument, listing the valid names on failure
pub fn parse_symbol<T>(kind: &str, token: &str, valid: &[T]) -> Result<T>
where
    T: FromStr<Err = MacropadError> + Display,
{
    token.parse::<T>().map_err(|_| {
        let names: Vec<String> = valid.iter().map(|v| v.to_string().to_lowercase()).collect();
        anyhow::anyhow!(
            "Invalid {kind} '{token}'\nValid {kind}s: {}",
            names.join(", ")
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use macropad::protocol::{InputAction, MediaKey};

    #[test]
    fn parse_symbol_lists_choices() {
        let err = parse_symbol::<MediaKey>("media key", "louder", MediaKey::ALL).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Invalid media key 'louder'"));
        assert!(msg.contains("volume_up"));

        let action = parse_symbol::<InputAction>("action", "Knob_1_Press", InputAction::ALL).unwrap();
        assert_eq!(action, InputAction::KnobPress);
    }

    #[test]
    fn dry_run_opens_without_hardware() {
        let args = DeviceArgs {
            dry_run: true,
            ..Default::default()
        };
        let pad = open_pad(&args).unwrap();
        assert_eq!(pad.device_info().pid, PID_3_BUTTON_1_KNOB);
    }

    #[test]
    fn dry_run_as_extended_device_fails() {
        let args = DeviceArgs {
            dry_run: true,
            vid: Some(0x1189),
            pid: Some(0x8860),
            ..Default::default()
        };
        assert!(open_pad(&args).is_err());
    }
}
