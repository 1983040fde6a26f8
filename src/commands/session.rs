//! Register session: open the device and execute one invocation's intent.

use std::io::Write;

use anyhow::Context;
use cm6206_registers::Cm6206;
use cm6206ctl::{Controller, Intent, OutputOptions};
use tracing::info;

use super::{open_transport, utility, Settings};

/// Open, list devices (unless quiet), read all registers, then run the intent
pub fn run(settings: &Settings, intent: &Intent, options: OutputOptions) -> anyhow::Result<()> {
    let discovery = settings.discovery()?;
    if !options.quiet {
        utility::list(&discovery)?;
    }

    let transport = open_transport(&discovery, settings).context("Opening device")?;
    let chip = Cm6206::new(transport)?.with_marker_policy(settings.marker_policy);
    info!(
        "Using {} ({:?} marker check)",
        chip.device_info().device_path,
        chip.marker_policy()
    );

    let mut controller = Controller::start(chip, options)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    controller.execute(intent, &mut out)?;
    out.flush()?;
    Ok(())
}
