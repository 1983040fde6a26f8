//! Transport error types

use thiserror::Error;

/// Errors that can occur during transport operations
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("HID error: {0}")]
    HidError(String),

    #[error("HID permission denied: {0}")]
    HidPermissionDenied(String),

    /// The device accepted fewer bytes than the report length
    #[error("Short write: sent {actual} of {expected} bytes")]
    WriteShort { expected: usize, actual: usize },

    /// The device answered with fewer bytes than a read reply needs
    #[error("Short read: got {actual} bytes, need at least {expected}")]
    ReadShort { expected: usize, actual: usize },

    /// Read reply status byte lacks the register-data marker
    #[error("Framing error: status byte 0x{status:02X} is not a register read reply")]
    Framing { status: u8 },
}

impl From<hidapi::HidError> for TransportError {
    fn from(e: hidapi::HidError) -> Self {
        let msg = e.to_string();
        if msg.contains("Permission denied") || msg.contains("EPERM") {
            TransportError::HidPermissionDenied(msg)
        } else {
            TransportError::HidError(msg)
        }
    }
}
