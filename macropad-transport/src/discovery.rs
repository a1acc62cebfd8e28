//! Device discovery for 0x1189 macro keypads

use hidapi::{DeviceInfo, HidApi};
use tracing::{debug, error, info};

use crate::device_registry::{self, KnownDevice, KNOWN_DEVICES};
use crate::error::TransportError;
use crate::hid_output::HidOutputTransport;
use crate::printer::{PrinterConfig, PrinterTransport};
use crate::types::{DiscoveredDevice, TransportDeviceInfo};
use crate::BoxedTransport;

/// HID discovery for keypads on the vendor output interface
pub struct HidDiscovery {
    /// Registry entries to look for, in search order
    targets: Vec<KnownDevice>,
    /// Optional printer config for monitoring mode - wraps transports automatically
    printer_config: Option<PrinterConfig>,
}

impl Default for HidDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

impl HidDiscovery {
    /// Search every model in the registry
    pub fn new() -> Self {
        Self {
            targets: KNOWN_DEVICES.to_vec(),
            printer_config: None,
        }
    }

    /// Search a single VID/PID
    ///
    /// A pair that is not in the registry is assumed to speak the legacy
    /// protocol and may match on any interface.
    pub fn for_device(vid: u16, pid: u16) -> Self {
        Self {
            targets: vec![device_registry::lookup_or_default(vid, pid)],
            printer_config: None,
        }
    }

    /// Wrap every transport opened by this discovery with a printer
    pub fn with_printer_config(mut self, config: PrinterConfig) -> Self {
        self.printer_config = Some(config);
        self
    }

    fn describe(target: &KnownDevice, d: &DeviceInfo) -> TransportDeviceInfo {
        TransportDeviceInfo {
            vid: d.vendor_id(),
            pid: d.product_id(),
            interface: Some(d.interface_number()).filter(|&n| n >= 0),
            device_path: d.path().to_string_lossy().to_string(),
            manufacturer: d.manufacturer_string().map(|s| s.to_string()),
            product_name: d.product_string().map(|s| s.to_string()),
            serial: d.serial_number().map(|s| s.to_string()),
            protocol_version: target.protocol,
        }
    }

    fn scan(&self, api: &HidApi) -> Vec<DiscoveredDevice> {
        let mut devices: Vec<DiscoveredDevice> = Vec::new();

        for target in &self.targets {
            debug!("Searching for device {:04X}:{:04X}", target.vid, target.pid);

            for d in api.device_list() {
                if d.vendor_id() != target.vid || d.product_id() != target.pid {
                    continue;
                }

                let path = d.path().to_string_lossy();
                if !device_registry::interface_matches(target.interface, d.interface_number(), &path)
                {
                    continue;
                }

                // hidapi lists one entry per usage on some platforms
                if devices.iter().any(|e| e.info.device_path == path) {
                    continue;
                }

                let info = Self::describe(target, d);
                debug!(
                    "Found device: {} interface={:?} protocol={} path={}",
                    info.id_string(),
                    info.interface,
                    info.protocol_version,
                    info.device_path
                );
                devices.push(DiscoveredDevice { info });
            }
        }

        devices
    }

    /// List matching devices currently attached
    pub fn list_devices(&self) -> Result<Vec<DiscoveredDevice>, TransportError> {
        let api = HidApi::new()?;
        let devices = self.scan(&api);
        info!("Found {} devices", devices.len());
        Ok(devices)
    }

    /// Open a specific discovered device
    pub fn open_device(&self, device: &DiscoveredDevice) -> Result<BoxedTransport, TransportError> {
        let api = HidApi::new()?;
        self.open_with(&api, device)
    }

    fn open_with(
        &self,
        api: &HidApi,
        device: &DiscoveredDevice,
    ) -> Result<BoxedTransport, TransportError> {
        let path = std::ffi::CString::new(device.info.device_path.as_str())
            .map_err(|e| TransportError::Internal(format!("Bad device path: {e}")))?;
        let hid = api.open_path(&path)?;

        let mut info = device.info.clone();
        // Strings from the open handle are more reliable than enumeration on Windows
        if let Ok(Some(m)) = hid.get_manufacturer_string() {
            info.manufacturer = Some(m);
        }
        if let Ok(Some(p)) = hid.get_product_string() {
            info.product_name = Some(p);
        }

        info!("Connected to: {}", info.display_name());
        info!("VID:PID = {}", info.id_string());
        info!("Protocol version: {}", info.protocol_version);

        let transport: BoxedTransport = Box::new(HidOutputTransport::new(hid, info));

        Ok(match &self.printer_config {
            Some(config) => PrinterTransport::wrap(transport, config.clone()),
            None => transport,
        })
    }

    /// Open the first matching device that can be opened
    ///
    /// Devices that fail to open are logged and skipped. When none can be
    /// opened, the last open error is returned (permission problems stay
    /// visible), or `DeviceNotFound` when nothing matched at all.
    pub fn open_first(&self) -> Result<BoxedTransport, TransportError> {
        let api = HidApi::new()?;
        let mut last_err = None;

        for device in self.scan(&api) {
            match self.open_with(&api, &device) {
                Ok(transport) => return Ok(transport),
                Err(e) => {
                    error!("Failed to open device {}: {}", device.info.device_path, e);
                    last_err = Some(e);
                }
            }
        }

        error!("No compatible macro keypad found");
        Err(last_err.unwrap_or_else(|| {
            TransportError::DeviceNotFound(self.describe_targets())
        }))
    }

    fn describe_targets(&self) -> String {
        self.targets
            .iter()
            .map(|t| format!("{:04X}:{:04X}", t.vid, t.pid))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
