//! HID transport implementation for a directly attached CM6206

use hidapi::HidDevice;
use tracing::debug;

use crate::error::TransportError;
use crate::types::TransportDeviceInfo;
use crate::Transport;

/// Default time to wait for an input report (ms)
pub const DEFAULT_READ_TIMEOUT_MS: i32 = 1000;

/// HID transport over the device's interrupt endpoints
///
/// Requests go out as output reports, replies arrive as input reports.
pub struct HidTransport {
    device: HidDevice,
    /// Device information
    info: TransportDeviceInfo,
    /// Time to wait for a reply before reporting an empty read
    read_timeout_ms: i32,
}

impl HidTransport {
    /// Create a new transport from an opened HID device
    pub fn new(device: HidDevice, info: TransportDeviceInfo) -> Self {
        Self {
            device,
            info,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
        }
    }

    /// Set the reply timeout (-1 blocks forever)
    pub fn set_read_timeout(&mut self, ms: i32) {
        self.read_timeout_ms = ms;
    }
}

impl Transport for HidTransport {
    fn send(&mut self, report: &[u8]) -> Result<usize, TransportError> {
        let written = self.device.write(report)?;
        debug!("HID write {} of {} bytes", written, report.len());
        Ok(written)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        let read = self.device.read_timeout(buf, self.read_timeout_ms)?;
        if read == 0 {
            debug!("HID read timed out after {} ms", self.read_timeout_ms);
        }
        Ok(read)
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }
}

impl Drop for HidTransport {
    fn drop(&mut self) {
        // HidDevice closes itself
        debug!("Closing HID device {}", self.info.device_path);
    }
}
