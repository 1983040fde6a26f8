//! Transport layer for CM6206 register access
//!
//! This crate provides the pieces below the register model:
//!
//! - the [`Transport`] trait, a blocking report channel to one device
//! - the report codec in [`protocol`] and typed transactions in [`TransportExt`]
//! - a hidapi backend with device discovery
//! - a [`PrinterTransport`] middleware that prints every report
//! - a scripted in-memory device behind the `mock` feature

pub mod command;
pub mod error;
pub mod printer;
pub mod protocol;
pub mod types;

mod discovery;
mod hid;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use command::TransportExt;
pub use discovery::HidDiscovery;
pub use error::TransportError;
pub use hid::HidTransport;
pub use printer::{PrinterConfig, PrinterTransport};
pub use protocol::{
    decode_read_response, encode_read, encode_write, MarkerPolicy, ParsedRequest, REPORT_SIZE,
};
pub use types::{DiscoveredDevice, TransportDeviceInfo};

/// The core transport trait - all backends implement this
///
/// Transactions are strictly request/reply, so the trait is synchronous and
/// takes `&mut self`: a transport is owned by exactly one caller.
pub trait Transport {
    /// Send one output report
    ///
    /// # Returns
    /// Number of bytes the device accepted
    fn send(&mut self, report: &[u8]) -> Result<usize, TransportError>;

    /// Receive one input report into `buf`, blocking up to the backend timeout
    ///
    /// # Returns
    /// Number of bytes received (0 on timeout)
    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, TransportError>;

    /// Get device information
    fn device_info(&self) -> &TransportDeviceInfo;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, report: &[u8]) -> Result<usize, TransportError> {
        (**self).send(report)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        (**self).receive(buf)
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        (**self).device_info()
    }
}

/// Type alias for a boxed transport
pub type BoxedTransport = Box<dyn Transport>;
