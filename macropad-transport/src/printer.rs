//! PrinterTransport middleware for watching outgoing reports
//!
//! Two modes:
//!
//! - **monitor**: wraps a real transport, prints each report, then forwards it
//! - **dry run**: stands alone, prints each report and reports success
//!
//! Output goes to stderr so stdout stays clean for `list --json`.
//!
//! ```ignore
//! use macropad_transport::{HidDiscovery, PrinterConfig, PrinterTransport};
//!
//! let transport = HidDiscovery::new().open_first()?;
//! let monitored = PrinterTransport::wrap(transport, PrinterConfig::default());
//! ```

use crossterm::style::Stylize;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::device_registry::{PID_3_BUTTON_1_KNOB, VENDOR_ID};
use crate::protocol::{trimmed_len, PAYLOAD_SIZE};
use crate::types::TransportDeviceInfo;
use crate::{BoxedTransport, Transport, TransportError};

/// Configuration for the PrinterTransport
#[derive(Debug, Clone, Default)]
pub struct PrinterConfig {
    /// Dump all 64 payload bytes instead of trimming trailing zeros
    pub show_hex: bool,
}

impl PrinterConfig {
    /// Create config with hex output setting
    pub fn with_hex(mut self, show: bool) -> Self {
        self.show_hex = show;
        self
    }
}

/// Transport middleware that prints every report written through it
pub struct PrinterTransport {
    inner: Option<BoxedTransport>,
    info: TransportDeviceInfo,
    config: PrinterConfig,
    sent: AtomicUsize,
}

impl PrinterTransport {
    /// Wrap a transport with printing middleware
    pub fn wrap(transport: BoxedTransport, config: PrinterConfig) -> BoxedTransport {
        let info = transport.device_info().clone();
        Box::new(Self {
            inner: Some(transport),
            info,
            config,
            sent: AtomicUsize::new(0),
        })
    }

    /// Printer with no device behind it; every write succeeds
    pub fn dry_run(config: PrinterConfig) -> BoxedTransport {
        Self::dry_run_as(dry_run_info(VENDOR_ID, PID_3_BUTTON_1_KNOB), config)
    }

    /// Dry run that pretends to be a specific device
    pub fn dry_run_as(info: TransportDeviceInfo, config: PrinterConfig) -> BoxedTransport {
        Box::new(Self {
            inner: None,
            info,
            config,
            sent: AtomicUsize::new(0),
        })
    }

    /// Render one report as `#seq id=.. [bytes]`
    fn format_report(&self, seq: usize, report_id: u8, payload: &[u8; PAYLOAD_SIZE]) -> String {
        let shown = if self.config.show_hex {
            &payload[..]
        } else {
            &payload[..trimmed_len(payload)]
        };
        let bytes = shown
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(" ");
        format!("#{seq} id={report_id:02x} [{bytes}]")
    }

    fn print_report(&self, seq: usize, report_id: u8, payload: &[u8; PAYLOAD_SIZE]) {
        let tag = if self.inner.is_some() { "OUT" } else { "DRY" };
        eprintln!(
            "{} {}  {}",
            ">>>".cyan(),
            tag.cyan().bold(),
            self.format_report(seq, report_id, payload)
        );
    }
}

impl Transport for PrinterTransport {
    fn write_report(
        &self,
        report_id: u8,
        payload: &[u8; PAYLOAD_SIZE],
    ) -> Result<(), TransportError> {
        let seq = self.sent.fetch_add(1, Ordering::Relaxed);
        self.print_report(seq, report_id, payload);

        let Some(inner) = &self.inner else {
            return Ok(());
        };
        let result = inner.write_report(report_id, payload);
        if let Err(e) = &result {
            eprintln!("{} {}  {}", "<<<".red(), "ERR".red().bold(), e);
        }
        result
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }
}

/// Device info for a dry run of the given VID/PID
pub fn dry_run_info(vid: u16, pid: u16) -> TransportDeviceInfo {
    let known = crate::device_registry::lookup_or_default(vid, pid);
    TransportDeviceInfo {
        vid,
        pid,
        interface: known.interface,
        device_path: "dry-run".to_string(),
        manufacturer: None,
        product_name: Some(format!("{} (dry run)", known.description)),
        serial: None,
        protocol_version: known.protocol,
    }
}
