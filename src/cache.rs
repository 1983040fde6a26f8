//! In-process copy of the device registers
//!
//! Each slot is `None` until the register has been read, so a register that
//! really holds 0x0000 is never confused with one that was never fetched.

use cm6206_registers::{RegisterIndex, REGISTER_COUNT};
use thiserror::Error;

/// Register was requested before any successful read
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("register {0} has not been read from the device")]
pub struct StaleRegister(pub u8);

#[derive(Debug, Clone, Default)]
pub struct RegisterCache {
    values: [Option<u16>; REGISTER_COUNT],
}

impl RegisterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every slot with a fresh full read
    pub fn store_all(&mut self, values: [u16; REGISTER_COUNT]) {
        self.values = values.map(Some);
    }

    /// Forget everything, e.g. after a write whose outcome is unknown
    pub fn invalidate(&mut self) {
        self.values = [None; REGISTER_COUNT];
    }

    pub fn get(&self, index: RegisterIndex) -> Option<u16> {
        self.values[index.as_usize()]
    }

    pub fn require(&self, index: RegisterIndex) -> Result<u16, StaleRegister> {
        self.get(index).ok_or(StaleRegister(index.get()))
    }

    /// All values, if every register has been read
    pub fn snapshot(&self) -> Result<[u16; REGISTER_COUNT], StaleRegister> {
        let mut out = [0u16; REGISTER_COUNT];
        for index in RegisterIndex::all() {
            out[index.as_usize()] = self.require(index)?;
        }
        Ok(out)
    }

    pub fn is_complete(&self) -> bool {
        self.values.iter().all(Option::is_some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reg(i: u8) -> RegisterIndex {
        RegisterIndex::new(i).unwrap()
    }

    #[test]
    fn test_empty_cache_is_stale() {
        let cache = RegisterCache::new();
        assert_eq!(cache.get(reg(4)), None);
        assert_eq!(cache.require(reg(4)), Err(StaleRegister(4)));
        assert_eq!(cache.snapshot(), Err(StaleRegister(0)));
        assert!(!cache.is_complete());
    }

    #[test]
    fn test_zero_is_a_real_value() {
        let mut cache = RegisterCache::new();
        cache.store_all([0x2000, 0x3002, 0x6004, 0x147F, 0x0000, 0x3000]);
        assert_eq!(cache.require(reg(4)), Ok(0x0000));
        assert!(cache.is_complete());
    }

    #[test]
    fn test_invalidate() {
        let mut cache = RegisterCache::new();
        cache.store_all([1, 2, 3, 4, 5, 6]);
        assert_eq!(cache.snapshot(), Ok([1, 2, 3, 4, 5, 6]));
        cache.invalidate();
        assert_eq!(cache.get(reg(0)), None);
    }
}
