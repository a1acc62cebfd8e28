//! Common types for transport layer

use serde::Serialize;
use std::fmt;

/// Firmware protocol revision, fixed per product ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u8")]
pub enum ProtocolVersion {
    /// Multi-report programming with a trailing flash commit (3 buttons + 1 knob)
    Legacy,
    /// Single extended report per assignment (larger keypads)
    Extended,
}

impl ProtocolVersion {
    /// Wire revision number
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Legacy => 0,
            Self::Extended => 1,
        }
    }

    /// Map a revision number; unknown revisions are `None`
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Legacy),
            1 => Some(Self::Extended),
            _ => None,
        }
    }
}

impl From<ProtocolVersion> for u8 {
    fn from(v: ProtocolVersion) -> Self {
        v.as_u8()
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "0 (legacy)"),
            Self::Extended => write!(f, "1 (extended)"),
        }
    }
}

/// Device identification information
#[derive(Debug, Clone, Serialize)]
pub struct TransportDeviceInfo {
    /// USB Vendor ID
    pub vid: u16,
    /// USB Product ID
    pub pid: u16,
    /// HID interface number, when the platform reports one
    pub interface: Option<i32>,
    /// Device path (platform-specific)
    pub device_path: String,
    /// Manufacturer string if available
    pub manufacturer: Option<String>,
    /// Product name if available
    pub product_name: Option<String>,
    /// Serial number if available
    pub serial: Option<String>,
    /// Protocol revision the firmware speaks
    pub protocol_version: ProtocolVersion,
}

impl TransportDeviceInfo {
    /// "VID:PID" in upper-case hex
    pub fn id_string(&self) -> String {
        format!("{:04X}:{:04X}", self.vid, self.pid)
    }

    /// Manufacturer and product joined for display
    pub fn display_name(&self) -> String {
        match (&self.manufacturer, &self.product_name) {
            (Some(m), Some(p)) => format!("{m} {p}"),
            (None, Some(p)) => p.clone(),
            (Some(m), None) => m.clone(),
            (None, None) => "Unknown device".to_string(),
        }
    }
}

/// Discovered device that can be opened
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveredDevice {
    /// Device information
    #[serde(flatten)]
    pub info: TransportDeviceInfo,
}
