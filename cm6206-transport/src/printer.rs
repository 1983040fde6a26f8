//! PrinterTransport middleware for monitoring transport operations
//!
//! Wraps any [`Transport`] and prints every request and reply report passing
//! through it to stderr, so that normal command output on stdout stays clean.
//!
//! # Example
//!
//! ```ignore
//! use cm6206_transport::{HidDiscovery, PrinterConfig, PrinterTransport};
//!
//! let transport = HidDiscovery::new()?.open_first()?;
//! let monitored = PrinterTransport::wrap(transport, PrinterConfig::default());
//! // Now all reports will be printed
//! ```

use std::fmt::Write as _;

use crossterm::style::Stylize;

use crate::protocol::{self, opcode, ParsedRequest};
use crate::{Transport, TransportDeviceInfo, TransportError};

/// Configuration for the PrinterTransport
#[derive(Debug, Clone)]
pub struct PrinterConfig {
    /// Show raw hex dump alongside decoded output
    pub show_hex: bool,
    /// Use ANSI colors for the direction tags
    pub color: bool,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            show_hex: true,
            color: true,
        }
    }
}

impl PrinterConfig {
    /// Create config with hex output setting
    pub fn with_hex(mut self, show: bool) -> Self {
        self.show_hex = show;
        self
    }

    /// Create config with color setting
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }
}

/// Transport middleware that prints all requests and replies
pub struct PrinterTransport<T: Transport> {
    inner: T,
    config: PrinterConfig,
}

impl<T: Transport> PrinterTransport<T> {
    /// Wrap a transport with printing middleware
    pub fn wrap(transport: T, config: PrinterConfig) -> Self {
        Self {
            inner: transport,
            config,
        }
    }

    /// Unwrap back into the inner transport
    pub fn into_inner(self) -> T {
        self.inner
    }

    fn tag(&self, text: &'static str, tx: bool) -> String {
        match (self.config.color, tx) {
            (false, _) => text.to_string(),
            (true, true) => text.cyan().to_string(),
            (true, false) => text.green().to_string(),
        }
    }

    fn print_line(&self, tag: String, decoded: String, bytes: &[u8]) {
        let mut line = format!("{tag} {decoded}");
        if self.config.show_hex {
            let _ = write!(line, "  [{}]", hex_dump(bytes));
        }
        eprintln!("{line}");
    }
}

/// Describe an outgoing request frame
pub fn describe_request(frame: &[u8]) -> String {
    match protocol::try_parse_request(frame) {
        Some(ParsedRequest::Read { register }) => {
            format!("{:<5} reg {}", opcode::name(opcode::READ), register)
        }
        Some(ParsedRequest::Write { register, value }) => format!(
            "{:<5} reg {} = 0x{:04X}",
            opcode::name(opcode::WRITE),
            register,
            value
        ),
        None => "unrecognized request".to_string(),
    }
}

/// Describe an incoming reply frame
pub fn describe_reply(reply: &[u8]) -> String {
    if reply.len() < protocol::MIN_REPLY_SIZE {
        return format!("short reply ({} bytes)", reply.len());
    }
    let marker = if protocol::has_read_marker(reply[0]) {
        ""
    } else {
        " (no read marker)"
    };
    format!(
        "value 0x{:04X} status 0x{:02X}{}",
        u16::from_le_bytes([reply[1], reply[2]]),
        reply[0],
        marker
    )
}

fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

impl<T: Transport> Transport for PrinterTransport<T> {
    fn send(&mut self, report: &[u8]) -> Result<usize, TransportError> {
        self.print_line(self.tag("TX", true), describe_request(report), report);
        self.inner.send(report)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        let len = self.inner.receive(buf)?;
        self.print_line(self.tag("RX", false), describe_reply(&buf[..len]), &buf[..len]);
        Ok(len)
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        self.inner.device_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDevice;
    use crate::TransportExt;

    #[test]
    fn test_describe_request() {
        assert_eq!(describe_request(&protocol::encode_read(4)), "READ  reg 4");
        assert_eq!(
            describe_request(&protocol::encode_write(0, 0x8000)),
            "WRITE reg 0 = 0x8000"
        );
        assert_eq!(describe_request(&[1, 2, 3]), "unrecognized request");
    }

    #[test]
    fn test_describe_reply() {
        assert_eq!(
            describe_reply(&[0x20, 0x02, 0x30]),
            "value 0x3002 status 0x20"
        );
        assert_eq!(
            describe_reply(&[0x00, 0x02, 0x30]),
            "value 0x3002 status 0x00 (no read marker)"
        );
        assert_eq!(describe_reply(&[0x20]), "short reply (1 bytes)");
    }

    #[test]
    fn test_hex_dump() {
        assert_eq!(hex_dump(&[0x00, 0x30, 0xAB]), "00 30 AB");
        assert_eq!(hex_dump(&[]), "");
    }

    #[test]
    fn test_wrapper_is_transparent() {
        let device = MockDevice::new(vec![0x2000, 0x3002]);
        let mut printer = PrinterTransport::wrap(
            device,
            PrinterConfig::default().with_color(false),
        );
        printer.write_register(1, 0x1234).unwrap();
        let value = printer
            .read_register(1, protocol::MarkerPolicy::Strict)
            .unwrap();
        assert_eq!(value, 0x1234);

        let device = printer.into_inner();
        assert_eq!(device.sent().len(), 2);
    }
}
