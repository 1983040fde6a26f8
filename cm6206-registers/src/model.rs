//! Register model: indices, masked read-modify-write, batch transactions
//!
//! Every function here is either pure or performs exactly the transactions
//! its name says. Nothing caches register values; that is the caller's job.

use std::fmt;

use cm6206_transport::{MarkerPolicy, Transport, TransportExt};
use tracing::{debug, info};

use crate::error::{RegisterError, Result};
use crate::layout::REGISTER_COUNT;

/// Mask selecting every bit of a register
pub const FULL_MASK: u16 = 0xFFFF;

/// A register number known to be in range
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegisterIndex(u8);

impl RegisterIndex {
    pub fn new(index: u8) -> Result<Self> {
        if usize::from(index) < REGISTER_COUNT {
            Ok(Self(index))
        } else {
            Err(RegisterError::Range(format!(
                "register {index} out of range [0;{}]",
                REGISTER_COUNT - 1
            )))
        }
    }

    /// All registers in ascending order
    pub fn all() -> impl Iterator<Item = Self> {
        (0..REGISTER_COUNT as u8).map(Self)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn as_usize(self) -> usize {
        usize::from(self.0)
    }
}

impl fmt::Display for RegisterIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for RegisterIndex {
    type Error = RegisterError;

    fn try_from(index: u8) -> Result<Self> {
        Self::new(index)
    }
}

/// Replace the bits selected by `mask` with those of `write_value`
///
/// `(current & !mask) | (write_value & mask)`
#[inline]
pub fn compute_masked_value(current: u16, write_value: u16, mask: u16) -> u16 {
    (current & !mask) | (write_value & mask)
}

/// A write of some bits of one register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteRequest {
    pub index: RegisterIndex,
    pub value: u16,
    pub mask: u16,
}

impl WriteRequest {
    /// Write a whole register
    pub fn new(index: RegisterIndex, value: u16) -> Self {
        Self {
            index,
            value,
            mask: FULL_MASK,
        }
    }

    pub fn with_mask(mut self, mask: u16) -> Self {
        self.mask = mask;
        self
    }

    /// Value to put on the wire given the register's current contents
    pub fn resolve(&self, current: u16) -> u16 {
        compute_masked_value(current, self.value, self.mask)
    }
}

/// Read every register, ascending from 0
///
/// The first failed transaction aborts the batch; nothing read so far is
/// returned.
pub fn read_all<T: Transport + ?Sized>(
    transport: &mut T,
    policy: MarkerPolicy,
) -> Result<[u16; REGISTER_COUNT]> {
    let mut values = [0u16; REGISTER_COUNT];
    for index in RegisterIndex::all() {
        values[index.as_usize()] = transport.read_register(index.get(), policy)?;
    }
    debug!("Read all registers: {:04X?}", values);
    Ok(values)
}

/// Write one register. The hardware may not echo the value back exactly
/// (status bits), so callers wanting the real state must read again.
pub fn write<T: Transport + ?Sized>(
    transport: &mut T,
    index: RegisterIndex,
    value: u16,
) -> Result<()> {
    transport.write_register(index.get(), value)?;
    Ok(())
}

/// Write a whole initialization table in register order, then read back
///
/// Stops at the first failed write. Registers written before the failure
/// keep their new values and no read-back happens.
pub fn apply_bulk_defaults<T: Transport + ?Sized>(
    transport: &mut T,
    table: &[u16; REGISTER_COUNT],
    policy: MarkerPolicy,
) -> Result<[u16; REGISTER_COUNT]> {
    info!("Writing initialization table {:04X?}", table);
    for index in RegisterIndex::all() {
        transport
            .write_register(index.get(), table[index.as_usize()])
            .map_err(|source| RegisterError::BulkWrite {
                index: index.get(),
                source,
            })?;
    }
    read_all(transport, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cm6206_transport::mock::MockDevice;
    use cm6206_transport::TransportError;

    use crate::layout::{FACTORY_DEFAULTS, INIT_PROFILE};

    fn device() -> MockDevice {
        MockDevice::new(FACTORY_DEFAULTS.to_vec())
    }

    #[test]
    fn test_register_index_range() {
        assert_eq!(RegisterIndex::new(5).unwrap().get(), 5);
        assert!(matches!(
            RegisterIndex::new(6),
            Err(RegisterError::Range(_))
        ));
        assert!(RegisterIndex::try_from(255).is_err());
        let all: Vec<u8> = RegisterIndex::all().map(RegisterIndex::get).collect();
        assert_eq!(all, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_masked_value() {
        assert_eq!(compute_masked_value(0x2000, 0x8000, 0x8000), 0xA000);
        assert_eq!(compute_masked_value(0xA000, 0x0000, 0x8000), 0x2000);
        assert_eq!(compute_masked_value(0x1234, 0xABCD, 0xFFFF), 0xABCD);
        assert_eq!(compute_masked_value(0x1234, 0xABCD, 0x0000), 0x1234);
    }

    #[test]
    fn test_write_request_default_mask() {
        let index = RegisterIndex::new(2).unwrap();
        let req = WriteRequest::new(index, 0x0F0F);
        assert_eq!(req.mask, FULL_MASK);
        assert_eq!(req.resolve(0xFFFF), 0x0F0F);
        assert_eq!(req.with_mask(0x00FF).resolve(0xFFFF), 0xFF0F);
    }

    #[test]
    fn test_read_all_order() {
        let mut dev = device();
        let values = read_all(&mut dev, MarkerPolicy::Strict).unwrap();
        assert_eq!(values, FACTORY_DEFAULTS);
        assert_eq!(dev.read_targets(), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_read_all_aborts_on_failure() {
        let mut dev = device().short_reply_for(3);
        let err = read_all(&mut dev, MarkerPolicy::Strict).unwrap_err();
        assert!(matches!(
            err,
            RegisterError::Transport(TransportError::ReadShort { .. })
        ));
        assert_eq!(dev.read_targets(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_write_does_not_read_back() {
        let mut dev = device();
        write(&mut dev, RegisterIndex::new(0).unwrap(), 0xA000).unwrap();
        assert_eq!(dev.registers()[0], 0xA000);
        assert!(dev.read_targets().is_empty());
    }

    #[test]
    fn test_bulk_defaults() {
        let mut dev = device();
        let values = apply_bulk_defaults(&mut dev, &INIT_PROFILE, MarkerPolicy::Strict).unwrap();
        assert_eq!(values, INIT_PROFILE);
        assert_eq!(dev.write_targets(), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(dev.read_targets(), vec![0, 1, 2, 3, 4, 5]);
    }
}
