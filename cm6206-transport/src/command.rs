//! Register transactions built on top of a raw [`Transport`]
//!
//! A transaction is one request report followed, for reads, by one reply
//! report. Nothing here retries: a dropped or truncated report is surfaced
//! to the caller as-is.

use tracing::debug;

use crate::error::TransportError;
use crate::protocol::{self, MarkerPolicy, REPORT_SIZE};
use crate::Transport;

/// Typed register access for any transport
pub trait TransportExt: Transport {
    /// Send one full request report, failing if the device took fewer bytes
    fn send_report(&mut self, frame: &[u8; REPORT_SIZE]) -> Result<(), TransportError> {
        let written = self.send(frame)?;
        if written < frame.len() {
            return Err(TransportError::WriteShort {
                expected: frame.len(),
                actual: written,
            });
        }
        Ok(())
    }

    /// Read one register: send a read request and decode the reply
    fn read_register(&mut self, register: u8, policy: MarkerPolicy) -> Result<u16, TransportError> {
        let frame = protocol::encode_read(register);
        debug!("Reading register {}: {:02X?}", register, frame);
        self.send_report(&frame)?;

        let mut reply = [0u8; REPORT_SIZE];
        let len = self.receive(&mut reply)?;
        debug!("Reply for register {}: {:02X?}", register, &reply[..len]);

        protocol::decode_read_response(&reply[..len], policy)
    }

    /// Write one register (no read-back)
    fn write_register(&mut self, register: u8, value: u16) -> Result<(), TransportError> {
        let frame = protocol::encode_write(register, value);
        debug!(
            "Writing register {} = 0x{:04X}: {:02X?}",
            register, value, frame
        );
        self.send_report(&frame)
    }
}

impl<T: Transport + ?Sized> TransportExt for T {}
