//! Device discovery for CM6206 sound cards

use std::ffi::CString;

use hidapi::HidApi;
use tracing::{debug, info};

use crate::error::TransportError;
use crate::hid::HidTransport;
use crate::protocol::device;
use crate::types::{DiscoveredDevice, TransportDeviceInfo};

/// HID device discovery for one VID/PID pair
pub struct HidDiscovery {
    api: HidApi,
    vendor_id: u16,
    product_id: u16,
}

impl HidDiscovery {
    /// Create a discovery instance for the stock CM6206 IDs
    pub fn new() -> Result<Self, TransportError> {
        Self::with_ids(device::VENDOR_ID, device::PRODUCT_ID)
    }

    /// Create a discovery instance for a board with non-standard IDs
    pub fn with_ids(vendor_id: u16, product_id: u16) -> Result<Self, TransportError> {
        let api = HidApi::new()?;
        Ok(Self {
            api,
            vendor_id,
            product_id,
        })
    }

    /// The VID/PID pair this instance looks for
    pub fn ids(&self) -> (u16, u16) {
        (self.vendor_id, self.product_id)
    }

    /// List currently attached matching devices
    pub fn list_devices(&self) -> Vec<DiscoveredDevice> {
        let devices: Vec<DiscoveredDevice> = self
            .api
            .device_list()
            .filter(|d| d.vendor_id() == self.vendor_id && d.product_id() == self.product_id)
            .map(|d| DiscoveredDevice {
                info: TransportDeviceInfo {
                    vid: d.vendor_id(),
                    pid: d.product_id(),
                    device_path: d.path().to_string_lossy().into_owned(),
                    serial: d.serial_number().map(str::to_string),
                    manufacturer: d.manufacturer_string().map(str::to_string),
                    product_name: d.product_string().map(str::to_string),
                },
            })
            .collect();
        debug!(
            "Found {} device(s) with ID {:04X}:{:04X}",
            devices.len(),
            self.vendor_id,
            self.product_id
        );
        devices
    }

    /// Open a specific device
    pub fn open_device(&self, device: &DiscoveredDevice) -> Result<HidTransport, TransportError> {
        let path = CString::new(device.info.device_path.as_str())
            .map_err(|_| TransportError::DeviceNotFound(device.info.device_path.clone()))?;
        let hid = self.api.open_path(&path)?;
        info!("Opened {}", device.info.device_path);
        Ok(HidTransport::new(hid, device.info.clone()))
    }

    /// Open the first matching device
    pub fn open_first(&self) -> Result<HidTransport, TransportError> {
        let devices = self.list_devices();
        let first = devices.first().ok_or_else(|| {
            TransportError::DeviceNotFound(format!(
                "no USB device with ID {:04X}:{:04X}",
                self.vendor_id, self.product_id
            ))
        })?;
        self.open_device(first)
    }
}
