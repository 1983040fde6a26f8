//! Protocol constants and report framing for CM6206 register access
//!
//! Every transaction uses a 5-byte HID report:
//!
//! | Offset | Read request | Write request | Read reply |
//! |--------|--------------|---------------|------------|
//! | 0      | report id 0  | report id 0   | status     |
//! | 1      | `0x30`       | `0x20`        | data low   |
//! | 2      | `0x00`       | value low     | data high  |
//! | 3      | `0x00`       | value high    | -          |
//! | 4      | register     | register      | -          |

use tracing::warn;

use crate::error::TransportError;

/// Size of request reports, including the report ID byte
pub const REPORT_SIZE: usize = 5;

/// Minimum number of meaningful bytes in a read reply
pub const MIN_REPLY_SIZE: usize = 3;

/// HID report ID used for all requests
pub const REPORT_ID: u8 = 0x00;

/// Request opcodes (byte 1 of a request)
pub mod opcode {
    pub const READ: u8 = 0x30;
    pub const WRITE: u8 = 0x20;

    /// Get human-readable name for opcode byte
    pub fn name(op: u8) -> &'static str {
        match op {
            READ => "READ",
            WRITE => "WRITE",
            _ => "UNKNOWN",
        }
    }
}

/// Read reply status byte layout
pub mod status {
    /// Bits of the status byte that carry the reply type
    pub const MARKER_MASK: u8 = 0xE0;
    /// Reply type value for "register data follows"
    pub const READ_REPLY: u8 = 0x20;
}

/// USB identity of supported devices
pub mod device {
    /// C-Media Electronics
    pub const VENDOR_ID: u16 = 0x0d8c;
    /// CM6206 (sold under many brands as "7.1 USB sound card")
    pub const PRODUCT_ID: u16 = 0x0102;
}

/// How to treat a read reply whose status byte lacks the read-reply marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerPolicy {
    /// Reject the reply with [`TransportError::Framing`]
    #[default]
    Strict,
    /// Log a warning and decode the data bytes anyway
    Lenient,
}

impl MarkerPolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            Self::Strict
        } else {
            Self::Lenient
        }
    }
}

/// Build a register read request
pub fn encode_read(register: u8) -> [u8; REPORT_SIZE] {
    [REPORT_ID, opcode::READ, 0x00, 0x00, register]
}

/// Build a register write request (value little-endian)
pub fn encode_write(register: u8, value: u16) -> [u8; REPORT_SIZE] {
    let [lo, hi] = value.to_le_bytes();
    [REPORT_ID, opcode::WRITE, lo, hi, register]
}

/// Check the status byte of a read reply for the register-data marker
#[inline]
pub fn has_read_marker(status_byte: u8) -> bool {
    (status_byte & status::MARKER_MASK) == status::READ_REPLY
}

/// Decode the register value carried by a read reply
///
/// The reply must hold at least [`MIN_REPLY_SIZE`] bytes: the status byte
/// followed by the data word in little-endian order.
pub fn decode_read_response(reply: &[u8], policy: MarkerPolicy) -> Result<u16, TransportError> {
    if reply.len() < MIN_REPLY_SIZE {
        return Err(TransportError::ReadShort {
            expected: MIN_REPLY_SIZE,
            actual: reply.len(),
        });
    }

    let status_byte = reply[0];
    if !has_read_marker(status_byte) {
        match policy {
            MarkerPolicy::Strict => return Err(TransportError::Framing { status: status_byte }),
            MarkerPolicy::Lenient => {
                warn!(
                    "Read reply status 0x{:02X} lacks register marker, decoding anyway",
                    status_byte
                );
            }
        }
    }

    Ok(u16::from_le_bytes([reply[1], reply[2]]))
}

/// A request frame decoded back into its meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedRequest {
    Read { register: u8 },
    Write { register: u8, value: u16 },
}

/// Parse an outgoing request frame (used by monitoring and test devices)
pub fn try_parse_request(frame: &[u8]) -> Option<ParsedRequest> {
    if frame.len() < REPORT_SIZE || frame[0] != REPORT_ID {
        return None;
    }
    let register = frame[4];
    match frame[1] {
        opcode::READ => Some(ParsedRequest::Read { register }),
        opcode::WRITE => Some(ParsedRequest::Write {
            register,
            value: u16::from_le_bytes([frame[2], frame[3]]),
        }),
        _ => None,
    }
}
