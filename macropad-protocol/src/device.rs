//! Device session: an open keypad plus the encoder for its protocol

use macropad_transport::{BoxedTransport, HidDiscovery, ProtocolVersion, TransportDeviceInfo};
use tracing::{debug, error, info};

use crate::codec::{InputAction, KeyStroke, Layer, LedMode, MediaKey, Modifiers, MouseButton};
use crate::encoder::{select_encoder, Assignment, ConfigIntent, ReportEncoder, MAX_KEY_SEQUENCE};
use crate::error::{MacropadError, Result};
use crate::parse::KeySequence;
use crate::report::Report;

/// The part of `sequence` the device keeps
fn stored_sequence(sequence: &[KeyStroke]) -> KeySequence {
    KeySequence::new(sequence[..sequence.len().min(MAX_KEY_SEQUENCE)].to_vec())
}

/// An exclusively owned keypad connection
///
/// Dropping the session drops the transport, which closes the device.
pub struct MacroPad {
    transport: BoxedTransport,
    encoder: Option<Box<dyn ReportEncoder>>,
}

impl MacroPad {
    /// Session with no protocol yet; call [`negotiate`](Self::negotiate)
    pub fn new(transport: BoxedTransport) -> Self {
        Self {
            transport,
            encoder: None,
        }
    }

    /// Session that uses `encoder` as-is, skipping negotiation
    pub fn with_encoder(transport: BoxedTransport, encoder: Box<dyn ReportEncoder>) -> Self {
        Self {
            transport,
            encoder: Some(encoder),
        }
    }

    /// Open the first matching keypad and negotiate its protocol
    pub fn open(discovery: &HidDiscovery) -> Result<Self> {
        let mut pad = Self::new(discovery.open_first()?);
        pad.negotiate()?;
        Ok(pad)
    }

    /// Pick the encoder for the device's protocol revision
    ///
    /// Fails with `NotImplemented` for extended-protocol devices and leaves
    /// the session un-negotiated.
    pub fn negotiate(&mut self) -> Result<ProtocolVersion> {
        let version = self.transport.device_info().protocol_version;
        match version {
            ProtocolVersion::Legacy => {
                self.encoder = Some(select_encoder(version));
                info!("Using legacy protocol (version {})", version.as_u8());
                Ok(version)
            }
            ProtocolVersion::Extended => {
                self.encoder = None;
                error!("Extended protocol not yet implemented");
                Err(MacropadError::NotImplemented(format!(
                    "protocol version {} on {}",
                    version,
                    self.transport.device_info().id_string()
                )))
            }
        }
    }

    /// Negotiated protocol, if any
    pub fn protocol(&self) -> Option<ProtocolVersion> {
        self.encoder.as_ref().map(|e| e.version())
    }

    pub fn device_info(&self) -> &TransportDeviceInfo {
        self.transport.device_info()
    }

    fn encoder(&self) -> Result<&dyn ReportEncoder> {
        self.encoder
            .as_deref()
            .ok_or(MacropadError::ProtocolNotInitialized)
    }

    /// Write reports strictly in order, stopping at the first failure
    ///
    /// Reports written before the failure may already have reached the
    /// device; nothing is rolled back and nothing is retried.
    pub fn send_reports(&self, reports: &[Report]) -> Result<()> {
        let total = reports.len();
        for (index, report) in reports.iter().enumerate() {
            debug!("Sending {}/{}: {}", index + 1, total, report);
            self.transport
                .write_report(report.report_id(), report.payload())
                .map_err(|source| {
                    error!("Failed to send report {}/{}: {}", index + 1, total, source);
                    MacropadError::TransportWriteFailed {
                        index,
                        total,
                        source,
                    }
                })?;
        }
        Ok(())
    }

    /// Assign a key sequence (at most 5 keystrokes are stored)
    pub fn set_key_sequence(
        &self,
        action: InputAction,
        sequence: &[KeyStroke],
        layer: Layer,
    ) -> Result<()> {
        let reports = self.encoder()?.encode_keys(action, layer, sequence)?;
        self.send_reports(&reports)?;
        info!(
            "Configured {} with key sequence: {}",
            action,
            stored_sequence(sequence)
        );
        Ok(())
    }

    pub fn set_media_key(&self, action: InputAction, key: MediaKey, layer: Layer) -> Result<()> {
        let reports = self.encoder()?.encode_media(action, layer, key)?;
        self.send_reports(&reports)?;
        info!("Configured {} with media key: {}", action, key);
        Ok(())
    }

    pub fn set_mouse_button(
        &self,
        action: InputAction,
        button: MouseButton,
        modifiers: Modifiers,
        layer: Layer,
    ) -> Result<()> {
        let reports = self
            .encoder()?
            .encode_mouse(action, layer, button, modifiers)?;
        self.send_reports(&reports)?;
        info!("Configured {} with mouse: {}", action, button);
        Ok(())
    }

    pub fn set_led_mode(&self, mode: LedMode, layer: Layer) -> Result<()> {
        let reports = self.encoder()?.encode_led(layer, mode)?;
        self.send_reports(&reports)?;
        info!("Set LED mode to: {}", mode);
        Ok(())
    }

    /// Encode and send one intent
    pub fn apply(&self, intent: &ConfigIntent) -> Result<()> {
        match intent {
            ConfigIntent::Assign {
                action,
                layer,
                assignment,
            } => match assignment {
                Assignment::Keys(keys) => self.set_key_sequence(*action, keys, *layer),
                Assignment::Media(key) => self.set_media_key(*action, *key, *layer),
                Assignment::Mouse { button, modifiers } => {
                    self.set_mouse_button(*action, *button, *modifiers, *layer)
                }
            },
            ConfigIntent::Led { layer, mode } => self.set_led_mode(*mode, *layer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::KeyCode;
    use macropad_transport::{dry_run_info, PrinterConfig, PrinterTransport};

    #[test]
    fn extended_device_stays_uninitialized() {
        let info = dry_run_info(0x1189, 0x8860);
        let mut pad = MacroPad::new(PrinterTransport::dry_run_as(info, PrinterConfig::default()));
        assert!(matches!(
            pad.negotiate(),
            Err(MacropadError::NotImplemented(_))
        ));
        assert_eq!(pad.protocol(), None);
        assert!(matches!(
            pad.set_led_mode(LedMode::On, Layer(0)),
            Err(MacropadError::ProtocolNotInitialized)
        ));
    }

    #[test]
    fn logged_sequence_is_what_the_device_stores() {
        let long = vec![KeyStroke::from(KeyCode::X); 8];
        assert_eq!(stored_sequence(&long).len(), MAX_KEY_SEQUENCE);
        assert_eq!(stored_sequence(&long).to_string(), "X,X,X,X,X");

        let short = [KeyStroke::new(KeyCode::A, Modifiers::LCTRL)];
        assert_eq!(stored_sequence(&short).to_string(), "LCTRL+A");
    }

    #[test]
    fn legacy_device_negotiates() {
        let mut pad = MacroPad::new(PrinterTransport::dry_run(PrinterConfig::default()));
        assert_eq!(pad.negotiate().unwrap(), ProtocolVersion::Legacy);
        assert_eq!(pad.protocol(), Some(ProtocolVersion::Legacy));
        pad.set_media_key(InputAction::KnobCw, MediaKey::VolumeUp, Layer(0))
            .unwrap();
    }
}
