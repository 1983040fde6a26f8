//! Utility command handlers.

use cm6206_transport::HidDiscovery;
use cm6206ctl::output;

/// Print matching devices
pub fn list(discovery: &HidDiscovery) -> anyhow::Result<()> {
    let devices = discovery.list_devices();
    println!("{}", output::format_device_list(&devices, discovery.ids()));
    Ok(())
}
