//! Command handlers for the CLI application.
//!
//! - `session`: open the sound card and run register commands
//! - `utility`: device listing

pub mod session;
pub mod utility;

use cm6206_transport::{
    BoxedTransport, HidDiscovery, MarkerPolicy, PrinterConfig, PrinterTransport, Transport,
};
use cm6206ctl::{Config, OutputStyle};
use tracing::debug;

use crate::cli::Cli;

/// Flags merged with the config file; flags win
#[derive(Debug, Clone)]
pub struct Settings {
    pub vendor_id: u16,
    pub product_id: u16,
    pub read_timeout_ms: i32,
    pub marker_policy: MarkerPolicy,
    pub style: OutputStyle,
    pub printer: Option<PrinterConfig>,
}

impl Settings {
    pub fn resolve(cli: &Cli, config: &Config) -> Self {
        let color = config.color && !cli.no_color;
        let strict = config.strict_marker && !cli.lenient_marker;
        Self {
            vendor_id: config.device.vendor_id,
            product_id: config.device.product_id,
            read_timeout_ms: config.read_timeout_ms,
            marker_policy: MarkerPolicy::from_strict(strict),
            style: OutputStyle { color },
            printer: cli
                .monitor
                .then(|| PrinterConfig::default().with_color(color)),
        }
    }

    pub fn discovery(&self) -> anyhow::Result<HidDiscovery> {
        Ok(HidDiscovery::with_ids(self.vendor_id, self.product_id)?)
    }
}

/// Open the first matching sound card.
/// If monitoring is on, the transport is wrapped with the printer.
pub fn open_transport(
    discovery: &HidDiscovery,
    settings: &Settings,
) -> anyhow::Result<BoxedTransport> {
    let mut hid = discovery.open_first()?;
    hid.set_read_timeout(settings.read_timeout_ms);
    debug!("Opened {}", hid.device_info().device_path);

    let transport: BoxedTransport = match &settings.printer {
        Some(config) => Box::new(PrinterTransport::wrap(hid, config.clone())),
        None => Box::new(hid),
    };
    Ok(transport)
}
