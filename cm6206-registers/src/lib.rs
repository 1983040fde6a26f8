//! Register engine for CM6206 USB sound cards
//!
//! This crate provides the register model and bitfield decoder on top of any
//! [`Transport`]:
//!
//! - [`layout`]: register count, factory defaults and field tables
//! - [`model`]: masked read-modify-write and batch transactions
//! - [`decode`]: rendering raw values as labeled, default-aware fields

pub mod decode;
pub mod error;
pub mod field;
pub mod layout;
pub mod model;

pub use decode::{Decoder, FieldLine, HeaderLine, RegisterView};
pub use error::RegisterError;
pub use field::{BitField, FieldKind};
pub use layout::{RegisterMap, FACTORY_DEFAULTS, INIT_PROFILE, REGISTER_COUNT};
pub use model::{compute_masked_value, RegisterIndex, WriteRequest, FULL_MASK};

use cm6206_transport::{MarkerPolicy, Transport, TransportDeviceInfo};
use tracing::info;

/// High-level register interface using any transport
///
/// Owns the transport for the lifetime of the session. Holds no register
/// values: every call goes to the device.
pub struct Cm6206<T: Transport> {
    transport: T,
    map: RegisterMap,
    policy: MarkerPolicy,
}

impl<T: Transport> Cm6206<T> {
    /// Create an interface for the CM6206 register map
    ///
    /// Fails with a configuration error if the map's field tables are invalid.
    pub fn new(transport: T) -> Result<Self, RegisterError> {
        Self::with_map(transport, RegisterMap::cm6206())
    }

    /// Create an interface for a custom register map
    pub fn with_map(transport: T, map: RegisterMap) -> Result<Self, RegisterError> {
        map.validate()?;
        Ok(Self {
            transport,
            map,
            policy: MarkerPolicy::default(),
        })
    }

    /// Set how read replies without the register marker are treated
    pub fn with_marker_policy(mut self, policy: MarkerPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn marker_policy(&self) -> MarkerPolicy {
        self.policy
    }

    /// Get the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    pub fn device_info(&self) -> &TransportDeviceInfo {
        self.transport.device_info()
    }

    pub fn map(&self) -> &RegisterMap {
        &self.map
    }

    /// Decoder for this device's register map
    pub fn decoder(&self) -> Decoder {
        Decoder::new(self.map)
    }

    // === Transactions ===

    /// Read all registers in ascending order
    pub fn read_all(&mut self) -> Result<[u16; REGISTER_COUNT], RegisterError> {
        model::read_all(&mut self.transport, self.policy)
    }

    /// Write one whole register
    pub fn write(&mut self, index: RegisterIndex, value: u16) -> Result<(), RegisterError> {
        model::write(&mut self.transport, index, value)
    }

    /// Apply a masked write given the register's current value
    ///
    /// # Returns
    /// The value actually sent to the device
    pub fn write_masked(
        &mut self,
        request: WriteRequest,
        current: u16,
    ) -> Result<u16, RegisterError> {
        let new_value = request.resolve(current);
        info!(
            "Register {}: 0x{:04X} -> 0x{:04X} (value 0x{:04X}, mask 0x{:04X})",
            request.index, current, new_value, request.value, request.mask
        );
        self.write(request.index, new_value)?;
        Ok(new_value)
    }

    /// Write an initialization table to every register, then read back
    pub fn apply_bulk_defaults(
        &mut self,
        table: &[u16; REGISTER_COUNT],
    ) -> Result<[u16; REGISTER_COUNT], RegisterError> {
        model::apply_bulk_defaults(&mut self.transport, table, self.policy)
    }
}
