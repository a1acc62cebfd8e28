//! HID output-report transport for direct USB connection

use hidapi::HidDevice;
use parking_lot::Mutex;
use tracing::debug;

use crate::error::TransportError;
use crate::protocol::{build_output_report, trimmed_len, PAYLOAD_SIZE};
use crate::types::TransportDeviceInfo;
use crate::Transport;

/// HID transport for a keypad's vendor interface
///
/// Reports go out through the interrupt OUT endpoint (`hid_write`), not
/// as feature reports. The firmware does not acknowledge them.
pub struct HidOutputTransport {
    device: Mutex<HidDevice>,
    info: TransportDeviceInfo,
}

impl HidOutputTransport {
    /// Wrap an opened HID device
    pub fn new(device: HidDevice, info: TransportDeviceInfo) -> Self {
        Self {
            device: Mutex::new(device),
            info,
        }
    }
}

impl Transport for HidOutputTransport {
    fn write_report(
        &self,
        report_id: u8,
        payload: &[u8; PAYLOAD_SIZE],
    ) -> Result<(), TransportError> {
        let buf = build_output_report(report_id, payload);
        debug!(
            "Writing report id={} data={:02X?}",
            report_id,
            &payload[..trimmed_len(payload)]
        );

        let device = self.device.lock();
        // Byte counts differ per OS (Windows may report the padded report
        // size); any non-error return means the report was queued.
        let written = device.write(&buf)?;
        debug!("Wrote {} bytes", written);
        Ok(())
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }
}

impl Drop for HidOutputTransport {
    fn drop(&mut self) {
        debug!("Closing {} ({})", self.info.id_string(), self.info.device_path);
    }
}
