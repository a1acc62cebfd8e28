//! HID framing for vendor output reports

/// Output report size on the wire (report ID + payload)
pub const REPORT_SIZE: usize = 65;

/// Payload bytes per report
pub const PAYLOAD_SIZE: usize = 64;

/// HID output endpoint report ID used by the whole keypad family
pub const DEFAULT_REPORT_ID: u8 = 0;

/// Build an output report buffer
///
/// Format: `[report_id] [payload; 64]`
pub fn build_output_report(report_id: u8, payload: &[u8; PAYLOAD_SIZE]) -> [u8; REPORT_SIZE] {
    let mut buf = [0u8; REPORT_SIZE];
    buf[0] = report_id;
    buf[1..].copy_from_slice(payload);
    buf
}

/// Length of `payload` with trailing zero bytes removed (at least 1)
pub fn trimmed_len(payload: &[u8]) -> usize {
    payload
        .iter()
        .rposition(|&b| b != 0)
        .map_or(1, |i| i + 1)
        .min(payload.len())
}
