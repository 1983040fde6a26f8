//! Scripted in-memory device for tests
//!
//! [`MockDevice`] behaves like a CM6206 on the wire: read requests queue a
//! reply carrying the register value, write requests update the register.
//! Faults can be injected per register to exercise error paths.

use std::collections::HashSet;

use crate::error::TransportError;
use crate::protocol::{self, ParsedRequest};
use crate::types::TransportDeviceInfo;
use crate::Transport;

/// Simulated register device
#[derive(Debug, Clone)]
pub struct MockDevice {
    info: TransportDeviceInfo,
    registers: Vec<u16>,
    /// Per-register bits that ignore writes (status bits)
    read_only: Vec<u16>,
    status_byte: u8,
    pending_reply: Option<Vec<u8>>,
    sent: Vec<Vec<u8>>,
    short_write_to: HashSet<u8>,
    short_reply_for: HashSet<u8>,
}

impl MockDevice {
    /// Create a device holding the given register values
    pub fn new(registers: Vec<u16>) -> Self {
        let read_only = vec![0; registers.len()];
        Self {
            info: TransportDeviceInfo::virtual_device(
                protocol::device::VENDOR_ID,
                protocol::device::PRODUCT_ID,
                "mock",
            ),
            registers,
            read_only,
            status_byte: protocol::status::READ_REPLY,
            pending_reply: None,
            sent: Vec::new(),
            short_write_to: HashSet::new(),
            short_reply_for: HashSet::new(),
        }
    }

    /// Use a different status byte in read replies
    pub fn with_status_byte(mut self, status: u8) -> Self {
        self.status_byte = status;
        self
    }

    /// Mark bits of a register as read-only
    pub fn with_read_only_bits(mut self, register: u8, mask: u16) -> Self {
        self.read_only[register as usize] = mask;
        self
    }

    /// Make write requests to `register` get accepted only partially
    pub fn fail_write_to(mut self, register: u8) -> Self {
        self.short_write_to.insert(register);
        self
    }

    /// Make read replies for `register` come back truncated
    pub fn short_reply_for(mut self, register: u8) -> Self {
        self.short_reply_for.insert(register);
        self
    }

    /// Current register contents
    pub fn registers(&self) -> &[u16] {
        &self.registers
    }

    /// Every frame passed to `send`, including rejected ones
    pub fn sent(&self) -> &[Vec<u8>] {
        &self.sent
    }

    /// Decoded requests in the order they were sent
    pub fn requests(&self) -> Vec<ParsedRequest> {
        self.sent
            .iter()
            .filter_map(|f| protocol::try_parse_request(f))
            .collect()
    }

    /// Registers targeted by write requests, in order
    pub fn write_targets(&self) -> Vec<u8> {
        self.requests()
            .into_iter()
            .filter_map(|r| match r {
                ParsedRequest::Write { register, .. } => Some(register),
                ParsedRequest::Read { .. } => None,
            })
            .collect()
    }

    /// Registers targeted by read requests, in order
    pub fn read_targets(&self) -> Vec<u8> {
        self.requests()
            .into_iter()
            .filter_map(|r| match r {
                ParsedRequest::Read { register } => Some(register),
                ParsedRequest::Write { .. } => None,
            })
            .collect()
    }

    fn register_slot(&self, register: u8) -> Result<usize, TransportError> {
        let idx = register as usize;
        if idx < self.registers.len() {
            Ok(idx)
        } else {
            Err(TransportError::HidError(format!(
                "mock device has no register {register}"
            )))
        }
    }
}

impl Transport for MockDevice {
    fn send(&mut self, report: &[u8]) -> Result<usize, TransportError> {
        self.sent.push(report.to_vec());

        match protocol::try_parse_request(report) {
            Some(ParsedRequest::Read { register }) => {
                let idx = self.register_slot(register)?;
                let [lo, hi] = self.registers[idx].to_le_bytes();
                let reply = if self.short_reply_for.contains(&register) {
                    vec![self.status_byte, lo]
                } else {
                    vec![self.status_byte, lo, hi]
                };
                self.pending_reply = Some(reply);
                Ok(report.len())
            }
            Some(ParsedRequest::Write { register, value }) => {
                if self.short_write_to.contains(&register) {
                    return Ok(report.len() / 2);
                }
                let idx = self.register_slot(register)?;
                let keep = self.read_only[idx];
                self.registers[idx] = (self.registers[idx] & keep) | (value & !keep);
                Ok(report.len())
            }
            None => Err(TransportError::HidError("malformed request".into())),
        }
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        match self.pending_reply.take() {
            Some(reply) => {
                let len = reply.len().min(buf.len());
                buf[..len].copy_from_slice(&reply[..len]);
                Ok(len)
            }
            // Nothing was asked for: behaves like a read timeout
            None => Ok(0),
        }
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }
}
