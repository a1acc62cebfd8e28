//! Report model
//!
//! A [`Report`] is one 64-byte HID output payload plus its report id.
//! Only the encoder builds them; once built they are read-only.

use macropad_transport::protocol::trimmed_len;
use macropad_transport::PAYLOAD_SIZE;
use std::fmt;

/// One HID output report, zero-padded to 64 bytes
#[derive(Clone, PartialEq, Eq)]
pub struct Report {
    report_id: u8,
    payload: [u8; PAYLOAD_SIZE],
}

impl Report {
    /// Build a report from its leading bytes; the rest stays zero
    ///
    /// `head` must not exceed 64 bytes (all callers pass fixed short arrays).
    pub(crate) fn new(report_id: u8, head: &[u8]) -> Self {
        let mut payload = [0u8; PAYLOAD_SIZE];
        let n = head.len().min(PAYLOAD_SIZE);
        payload[..n].copy_from_slice(&head[..n]);
        Self { report_id, payload }
    }

    pub fn report_id(&self) -> u8 {
        self.report_id
    }

    pub fn payload(&self) -> &[u8; PAYLOAD_SIZE] {
        &self.payload
    }

    /// Payload without trailing zero bytes (at least one byte)
    pub fn significant(&self) -> &[u8] {
        &self.payload[..trimmed_len(&self.payload)]
    }
}

impl fmt::Debug for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Report")
            .field("report_id", &self.report_id)
            .field("payload", &format_args!("{:02X?}", self.significant()))
            .finish()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:02x}]", self.report_id)?;
        for b in self.significant() {
            write!(f, " {b:02x}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_padded() {
        let r = Report::new(0, &[0xB0, 0x02, 0x00]);
        assert_eq!(r.report_id(), 0);
        assert_eq!(r.payload().len(), 64);
        assert_eq!(&r.payload()[..3], &[0xB0, 0x02, 0x00]);
        assert!(r.payload()[3..].iter().all(|&b| b == 0));
        assert_eq!(r.significant(), &[0xB0, 0x02]);
    }

    #[test]
    fn display_is_hex() {
        let r = Report::new(0, &[1, 0, 2, 1, 3, 0x3E]);
        assert_eq!(r.to_string(), "[00] 01 00 02 01 03 3e");
        assert_eq!(Report::new(0, &[0xFF]).to_string(), "[00] ff");
    }
}
