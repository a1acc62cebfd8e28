//! Device registry - known keypads and the protocol revision each one speaks
//!
//! All supported keypads share one vendor ID. The vendor-defined output
//! endpoint lives on a specific HID interface, which on Windows shows up
//! as an `MI_xx` fragment in the device path.

use crate::types::ProtocolVersion;

/// Vendor ID shared by the keypad family
pub const VENDOR_ID: u16 = 0x1189;

/// A keypad model the tool knows how to program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownDevice {
    pub vid: u16,
    pub pid: u16,
    /// HID interface carrying the vendor output report (`None` = any)
    pub interface: Option<i32>,
    pub protocol: ProtocolVersion,
    pub description: &'static str,
}

pub const KNOWN_DEVICES: &[KnownDevice] = &[
    KnownDevice {
        vid: VENDOR_ID,
        pid: 0x8860,
        interface: Some(1),
        protocol: ProtocolVersion::Extended,
        description: "extended-protocol keypad",
    },
    KnownDevice {
        vid: VENDOR_ID,
        pid: 0x8890,
        interface: Some(1),
        protocol: ProtocolVersion::Legacy,
        description: "3-button 1-knob keypad",
    },
    KnownDevice {
        vid: VENDOR_ID,
        pid: 0x8830,
        interface: Some(0),
        protocol: ProtocolVersion::Extended,
        description: "extended-protocol keypad (interface 0)",
    },
];

/// PID of the 3-button 1-knob keypad, the only legacy model
pub const PID_3_BUTTON_1_KNOB: u16 = 0x8890;

/// Find a registry entry by exact VID/PID
pub fn find_known(vid: u16, pid: u16) -> Option<&'static KnownDevice> {
    KNOWN_DEVICES.iter().find(|d| d.vid == vid && d.pid == pid)
}

/// Registry entry for a VID/PID, or a legacy-protocol entry for
/// devices the registry has never seen.
pub fn lookup_or_default(vid: u16, pid: u16) -> KnownDevice {
    find_known(vid, pid).copied().unwrap_or(KnownDevice {
        vid,
        pid,
        interface: None,
        protocol: ProtocolVersion::Legacy,
        description: "unlisted device",
    })
}

/// Check whether a HID interface matches the one a registry entry expects.
///
/// hidapi reports interface numbers on Linux and macOS; Windows paths carry
/// the interface as `MI_01` etc., so both are checked (case-insensitive).
pub fn interface_matches(expected: Option<i32>, interface_number: i32, path: &str) -> bool {
    let Some(expected) = expected else {
        return true;
    };
    if interface_number == expected {
        return true;
    }
    let fragment = format!("MI_{expected:02}");
    path.to_ascii_uppercase().contains(&fragment)
}
