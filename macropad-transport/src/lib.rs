//! Transport layer for 0x1189 macro keypads
//!
//! The keypads are programmed by writing vendor-defined HID output reports.
//! This crate finds the right HID interface, opens it, and writes reports:
//!
//! - HID output (direct USB connection via hidapi)
//! - Printer (monitor wrapper, or stand-alone dry run with no hardware)
//!
//! The device never answers; every transport here is write-only.

pub mod device_registry;
pub mod error;
pub mod protocol;
pub mod types;

mod discovery;
mod hid_output;
mod printer;

pub use device_registry::{KnownDevice, KNOWN_DEVICES, VENDOR_ID};
pub use discovery::HidDiscovery;
pub use error::TransportError;
pub use hid_output::HidOutputTransport;
pub use printer::{dry_run_info, PrinterConfig, PrinterTransport};
pub use protocol::{DEFAULT_REPORT_ID, PAYLOAD_SIZE, REPORT_SIZE};
pub use types::{DiscoveredDevice, ProtocolVersion, TransportDeviceInfo};

/// The core transport trait - all backends implement this
///
/// Writes are synchronous: each call blocks until the OS accepted the
/// report or failed. The caller owns the transport exclusively; dropping
/// it releases the device handle.
pub trait Transport: Send {
    /// Write one output report
    ///
    /// # Arguments
    /// * `report_id` - HID report ID (0 for the supported family)
    /// * `payload` - Report payload, without the report ID byte
    fn write_report(
        &self,
        report_id: u8,
        payload: &[u8; PAYLOAD_SIZE],
    ) -> Result<(), TransportError>;

    /// Get device information
    fn device_info(&self) -> &TransportDeviceInfo;
}

/// Type alias for a boxed transport
pub type BoxedTransport = Box<dyn Transport>;
