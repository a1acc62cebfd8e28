//! Protocol encoders: configuration intent → ordered report batch
//!
//! # Legacy protocol (v0) report layout
//!
//! ```text
//! layer select  [0x01, layer]                          (report id != 0 only)
//! key header    [action, BASIC,  N, 0, mods(entry 0), 0]
//! key entry i   [action, BASIC,  N, i, mods(i-1), key(i-1)]   i = 1..=N
//! media         [action, MULTIMEDIA, code lo, code hi (0 on report id 0)]
//! mouse         [action, MULTIMEDIA, button, scroll, mods]
//! led           [0xB0, mode, 0]
//! commit        [0xFF]  (0xFE after an LED change)
//! ```
//!
//! On report id != 0 the layer also goes into the high nibble of the
//! type byte. The device ignores everything until the commit arrives.

use macropad_transport::{ProtocolVersion, DEFAULT_REPORT_ID};
use tracing::warn;

use crate::codec::{InputAction, KeyStroke, KeyType, Layer, LedMode, MediaKey, Modifiers, MouseButton};
use crate::error::{MacropadError, Result};
use crate::report::Report;

/// Longest key sequence the 3-button 1-knob firmware stores
pub const MAX_KEY_SEQUENCE: usize = 5;

/// Stands in for an empty key sequence
const NOOP_SEQUENCE: &[KeyStroke] = &[KeyStroke::NOOP];

/// Command bytes outside the slot-addressed reports
pub mod cmd {
    pub const SELECT_LAYER: u8 = 0x01;
    pub const LED: u8 = 0xB0;
    pub const COMMIT_LED: u8 = 0xFE;
    pub const COMMIT: u8 = 0xFF;
}

/// What a slot should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    Keys(Vec<KeyStroke>),
    Media(MediaKey),
    Mouse {
        button: MouseButton,
        modifiers: Modifiers,
    },
}

/// One unit of device configuration, encoded into one committed batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIntent {
    Assign {
        action: InputAction,
        layer: Layer,
        assignment: Assignment,
    },
    Led {
        layer: Layer,
        mode: LedMode,
    },
}

/// Encodes configuration for one firmware protocol revision
///
/// Encoders are stateless: every call returns a complete batch ending in
/// a commit report, or an error before any report is built.
pub trait ReportEncoder: Send + Sync {
    fn version(&self) -> ProtocolVersion;

    fn encode_keys(
        &self,
        action: InputAction,
        layer: Layer,
        sequence: &[KeyStroke],
    ) -> Result<Vec<Report>>;

    fn encode_media(&self, action: InputAction, layer: Layer, key: MediaKey) -> Result<Vec<Report>>;

    fn encode_mouse(
        &self,
        action: InputAction,
        layer: Layer,
        button: MouseButton,
        modifiers: Modifiers,
    ) -> Result<Vec<Report>>;

    fn encode_led(&self, layer: Layer, mode: LedMode) -> Result<Vec<Report>>;

    /// Dispatch an intent to the matching operation
    fn encode(&self, intent: &ConfigIntent) -> Result<Vec<Report>> {
        match intent {
            ConfigIntent::Assign {
                action,
                layer,
                assignment,
            } => match assignment {
                Assignment::Keys(keys) => self.encode_keys(*action, *layer, keys),
                Assignment::Media(key) => self.encode_media(*action, *layer, *key),
                Assignment::Mouse { button, modifiers } => {
                    self.encode_mouse(*action, *layer, *button, *modifiers)
                }
            },
            ConfigIntent::Led { layer, mode } => self.encode_led(*layer, *mode),
        }
    }
}

/// Multi-report protocol of the 3-button 1-knob keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LegacyProtocol {
    pub report_id: u8,
}

impl LegacyProtocol {
    pub fn new(report_id: u8) -> Self {
        Self { report_id }
    }

    /// Report id 0 addresses a single-layer device
    fn multi_layer(&self) -> bool {
        self.report_id != 0
    }

    fn report(&self, head: &[u8]) -> Report {
        Report::new(self.report_id, head)
    }

    fn layer_select(&self, layer: Layer) -> Option<Report> {
        self.multi_layer()
            .then(|| self.report(&[cmd::SELECT_LAYER, layer.index()]))
    }

    fn type_byte(&self, kind: KeyType, layer: Layer) -> u8 {
        if self.multi_layer() {
            kind.code() | (layer.index() << 4)
        } else {
            kind.code()
        }
    }

    fn commit(&self) -> Report {
        self.report(&[cmd::COMMIT])
    }

    /// Layer select (if any), then `body`, then commit
    fn batch(&self, layer: Layer, body: impl IntoIterator<Item = Report>) -> Vec<Report> {
        self.layer_select(layer)
            .into_iter()
            .chain(body)
            .chain(std::iter::once(self.commit()))
            .collect()
    }
}

impl ReportEncoder for LegacyProtocol {
    fn version(&self) -> ProtocolVersion {
        ProtocolVersion::Legacy
    }

    fn encode_keys(
        &self,
        action: InputAction,
        layer: Layer,
        sequence: &[KeyStroke],
    ) -> Result<Vec<Report>> {
        let sequence = match sequence.len() {
            0 => NOOP_SEQUENCE,
            n if n > MAX_KEY_SEQUENCE => {
                warn!(
                    "{} holds at most {} keystrokes, dropping {}",
                    action,
                    MAX_KEY_SEQUENCE,
                    n - MAX_KEY_SEQUENCE
                );
                &sequence[..MAX_KEY_SEQUENCE]
            }
            _ => sequence,
        };

        let kind = self.type_byte(KeyType::Basic, layer);
        let total = sequence.len() as u8;

        // Header repeats entry 0's modifiers with a zero key; the firmware expects it
        let header = self.report(&[
            action.code(),
            kind,
            total,
            0,
            sequence[0].modifiers.bits(),
            0,
        ]);
        let entries = sequence.iter().zip(1u8..).map(|(stroke, index)| {
            self.report(&[
                action.code(),
                kind,
                total,
                index,
                stroke.modifiers.bits(),
                stroke.key.code(),
            ])
        });

        Ok(self.batch(layer, std::iter::once(header).chain(entries)))
    }

    fn encode_media(&self, action: InputAction, layer: Layer, key: MediaKey) -> Result<Vec<Report>> {
        let code = key.code();
        let high = if self.multi_layer() { (code >> 8) as u8 } else { 0 };
        let report = self.report(&[
            action.code(),
            self.type_byte(KeyType::Multimedia, layer),
            (code & 0xFF) as u8,
            high,
        ]);
        Ok(self.batch(layer, [report]))
    }

    fn encode_mouse(
        &self,
        action: InputAction,
        layer: Layer,
        button: MouseButton,
        modifiers: Modifiers,
    ) -> Result<Vec<Report>> {
        let (click, scroll) = if button.is_scroll() {
            (0, button.code())
        } else {
            (button.code(), 0)
        };
        let report = self.report(&[
            action.code(),
            self.type_byte(KeyType::Multimedia, layer),
            click,
            scroll,
            modifiers.bits(),
        ]);
        Ok(self.batch(layer, [report]))
    }

    /// LED commands are global: no layer select, no slot byte
    fn encode_led(&self, _layer: Layer, mode: LedMode) -> Result<Vec<Report>> {
        if !self.multi_layer() && mode.code() > LedMode::MAX_LEGACY {
            warn!("LED mode {} not supported on protocol {}", mode, self.version());
            return Err(MacropadError::UnsupportedOnProtocol {
                feature: format!("LED mode {mode}"),
                version: self.version(),
            });
        }

        Ok(vec![
            self.report(&[cmd::LED, mode.code(), 0]),
            self.report(&[cmd::COMMIT_LED]),
        ])
    }
}

/// Single-report protocol of the larger keypads; not implemented
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtendedProtocol;

impl ExtendedProtocol {
    fn unimplemented<T>(&self) -> Result<T> {
        Err(MacropadError::NotImplemented(
            "extended protocol (version 1)".to_string(),
        ))
    }
}

impl ReportEncoder for ExtendedProtocol {
    fn version(&self) -> ProtocolVersion {
        ProtocolVersion::Extended
    }

    fn encode_keys(&self, _: InputAction, _: Layer, _: &[KeyStroke]) -> Result<Vec<Report>> {
        self.unimplemented()
    }

    fn encode_media(&self, _: InputAction, _: Layer, _: MediaKey) -> Result<Vec<Report>> {
        self.unimplemented()
    }

    fn encode_mouse(
        &self,
        _: InputAction,
        _: Layer,
        _: MouseButton,
        _: Modifiers,
    ) -> Result<Vec<Report>> {
        self.unimplemented()
    }

    fn encode_led(&self, _: Layer, _: LedMode) -> Result<Vec<Report>> {
        self.unimplemented()
    }
}

/// Encoder for a negotiated protocol revision
pub fn select_encoder(version: ProtocolVersion) -> Box<dyn ReportEncoder> {
    match version {
        ProtocolVersion::Legacy => Box::new(LegacyProtocol::new(DEFAULT_REPORT_ID)),
        ProtocolVersion::Extended => Box::new(ExtendedProtocol),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::KeyCode;

    fn bytes(reports: &[Report]) -> Vec<Vec<u8>> {
        reports.iter().map(|r| r.significant().to_vec()).collect()
    }

    fn stroke(key: KeyCode) -> KeyStroke {
        KeyStroke::from(key)
    }

    #[test]
    fn empty_sequence_becomes_noop() {
        let enc = LegacyProtocol::new(0);
        for &action in InputAction::ALL {
            let reports = enc.encode_keys(action, Layer(0), &[]).unwrap();
            assert_eq!(reports.len(), 3);
            assert_eq!(&reports[0].payload()[..6], &[action.code(), 0, 1, 0, 0, 0]);
            assert_eq!(&reports[1].payload()[..6], &[action.code(), 0, 1, 1, 0, 0]);
            assert_eq!(bytes(&reports[2..]), vec![vec![cmd::COMMIT]]);
        }
    }

    #[test]
    fn sequence_lengths_one_to_five() {
        let enc = LegacyProtocol::new(0);
        let keys = [KeyCode::A, KeyCode::B, KeyCode::C, KeyCode::D, KeyCode::E];
        for n in 1..=MAX_KEY_SEQUENCE {
            let seq: Vec<_> = keys[..n].iter().copied().map(stroke).collect();
            let reports = enc.encode_keys(InputAction::Button2, Layer(0), &seq).unwrap();
            assert_eq!(reports.len(), n + 2);
            for (i, r) in reports[..=n].iter().enumerate() {
                assert_eq!(r.payload()[2], n as u8);
                assert_eq!(r.payload()[3], i as u8);
            }
            assert_eq!(reports[n + 1].significant(), &[cmd::COMMIT]);
        }
    }

    #[test]
    fn long_sequence_truncated() {
        let enc = LegacyProtocol::new(0);
        let seq = vec![stroke(KeyCode::X); 8];
        let reports = enc.encode_keys(InputAction::Button1, Layer(0), &seq).unwrap();
        assert_eq!(reports.len(), MAX_KEY_SEQUENCE + 2);
        assert_eq!(reports[0].payload()[2], MAX_KEY_SEQUENCE as u8);
    }

    #[test]
    fn header_mirrors_entry_zero_modifiers() {
        let enc = LegacyProtocol::new(0);
        let seq = [
            KeyStroke::new(KeyCode::Q, Modifiers::RALT | Modifiers::LGUI),
            KeyStroke::new(KeyCode::W, Modifiers::LSHIFT),
        ];
        let reports = enc.encode_keys(InputAction::KnobPress, Layer(0), &seq).unwrap();
        assert_eq!(reports[0].payload()[4], 0x48);
        assert_eq!(reports[0].payload()[5], 0);
        assert_eq!(reports[1].payload()[4], 0x48);
        assert_eq!(reports[1].payload()[5], KeyCode::Q.code());
    }

    #[test]
    fn button_one_ctrl_shift_f5_then_enter() {
        let enc = LegacyProtocol::new(0);
        let seq = [
            KeyStroke::new(KeyCode::F5, Modifiers::LCTRL | Modifiers::LSHIFT),
            KeyStroke::new(KeyCode::Enter, Modifiers::NONE),
        ];
        let reports = enc.encode_keys(InputAction::Button1, Layer(0), &seq).unwrap();
        assert_eq!(
            bytes(&reports),
            vec![
                vec![1, 0, 2, 0, 0x03],
                vec![1, 0, 2, 1, 0x03, 0x3E],
                vec![1, 0, 2, 2, 0x00, 0x28],
                vec![0xFF],
            ]
        );
        assert!(reports.iter().all(|r| r.report_id() == 0));
    }

    #[test]
    fn media_high_byte_zero_on_v0() {
        let enc = LegacyProtocol::new(0);
        for &key in MediaKey::ALL {
            let reports = enc.encode_media(InputAction::KnobCw, Layer(0), key).unwrap();
            assert_eq!(reports.len(), 2);
            let p = reports[0].payload();
            assert_eq!(p[1], KeyType::Multimedia.code());
            assert_eq!(p[2], (key.code() & 0xFF) as u8);
            assert_eq!(p[3], 0);
            assert_eq!(reports[1].significant(), &[cmd::COMMIT]);
        }
    }

    #[test]
    fn mouse_button_and_scroll_bytes_disjoint() {
        let enc = LegacyProtocol::new(0);
        for &button in MouseButton::ALL {
            let reports = enc
                .encode_mouse(InputAction::Button3, Layer(0), button, Modifiers::LCTRL)
                .unwrap();
            let p = reports[0].payload();
            assert_eq!(p[1], KeyType::Multimedia.code());
            assert!((p[2] == 0) != (p[3] == 0), "{button}: {p:02X?}");
            if button.is_scroll() {
                assert_eq!(p[3], button.code());
            } else {
                assert_eq!(p[2], button.code());
            }
            assert_eq!(p[4], 0x01);
        }
    }

    #[test]
    fn led_breathe() {
        let enc = LegacyProtocol::new(0);
        let reports = enc.encode_led(Layer(0), LedMode::Breathe).unwrap();
        assert_eq!(bytes(&reports), vec![vec![0xB0, 0x02], vec![0xFE]]);
        assert_eq!(&reports[0].payload()[..3], &[0xB0, 0x02, 0x00]);
    }

    #[test]
    fn led_vendor_mode_rejected_on_v0() {
        let enc = LegacyProtocol::new(0);
        let err = enc.encode_led(Layer(0), LedMode::Vendor(3)).unwrap_err();
        assert!(matches!(
            err,
            MacropadError::UnsupportedOnProtocol {
                version: ProtocolVersion::Legacy,
                ..
            }
        ));
    }

    #[test]
    fn multi_layer_report_id() {
        let enc = LegacyProtocol::new(2);
        let reports = enc
            .encode_media(InputAction::Button1, Layer(3), MediaKey::Mute)
            .unwrap();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].significant(), &[cmd::SELECT_LAYER, 3]);
        assert_eq!(reports[1].payload()[1], 0x31);
        assert!(reports.iter().all(|r| r.report_id() == 2));

        let reports = enc
            .encode_keys(InputAction::Button1, Layer(1), &[stroke(KeyCode::A)])
            .unwrap();
        assert_eq!(reports.len(), 4);
        assert_eq!(reports[1].payload()[1], 0x10);

        // Vendor LED modes pass when the device addresses layers
        let reports = enc.encode_led(Layer(1), LedMode::Vendor(4)).unwrap();
        assert_eq!(bytes(&reports), vec![vec![0xB0, 4], vec![0xFE]]);
    }

    #[test]
    fn encode_dispatches_intent() {
        let enc = LegacyProtocol::new(0);
        let intent = ConfigIntent::Assign {
            action: InputAction::Button3,
            layer: Layer(0),
            assignment: Assignment::Mouse {
                button: MouseButton::ScrollUp,
                modifiers: Modifiers::NONE,
            },
        };
        let reports = enc.encode(&intent).unwrap();
        assert_eq!(bytes(&reports), vec![vec![3, 1, 0, 0x10], vec![0xFF]]);

        let led = ConfigIntent::Led {
            layer: Layer(0),
            mode: LedMode::Off,
        };
        assert_eq!(bytes(&enc.encode(&led).unwrap()), vec![vec![0xB0], vec![0xFE]]);
    }

    #[test]
    fn extended_fails_fast() {
        let enc = select_encoder(ProtocolVersion::Extended);
        assert_eq!(enc.version(), ProtocolVersion::Extended);
        assert!(matches!(
            enc.encode_led(Layer(0), LedMode::On),
            Err(MacropadError::NotImplemented(_))
        ));
        assert!(matches!(
            enc.encode_keys(InputAction::Button1, Layer(0), &[]),
            Err(MacropadError::NotImplemented(_))
        ));
    }

    #[test]
    fn select_legacy() {
        let enc = select_encoder(ProtocolVersion::Legacy);
        assert_eq!(enc.version(), ProtocolVersion::Legacy);
        let reports = enc.encode_led(Layer(0), LedMode::On).unwrap();
        assert!(reports.iter().all(|r| r.report_id() == DEFAULT_REPORT_ID));
    }
}
