//! Text rendering of decoded registers and device lists
//!
//! Lines that differ from the reset value are printed bold, register headers
//! cyan. With color off the text is identical minus the escape codes.

use crossterm::style::Stylize;

use cm6206_registers::{FieldLine, HeaderLine, RegisterView};
use cm6206_transport::DiscoveredDevice;

/// Column where field values start
const VALUE_COLUMN: usize = 42;
/// Column where verbose legends start
const LEGEND_COLUMN: usize = 66;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputStyle {
    pub color: bool,
}

impl OutputStyle {
    pub fn plain() -> Self {
        Self { color: false }
    }

    fn emphasize(&self, text: String, changed: bool) -> String {
        if self.color && changed {
            text.bold().to_string()
        } else {
            text
        }
    }

    fn heading(&self, text: String) -> String {
        if self.color {
            text.cyan().to_string()
        } else {
            text
        }
    }
}

pub fn format_header(header: &HeaderLine, style: OutputStyle) -> String {
    let title = style.heading(format!("== REG{} ==", header.index));
    let raw = style.emphasize(format!("Raw value: 0x{:04X}", header.raw), header.changed);
    format!(
        "{title}\n{raw}       (Reset value: 0x{:04X})",
        header.default
    )
}

pub fn format_field(field: &FieldLine, style: OutputStyle) -> String {
    let label = format!("{} {}", field.bits, field.name);
    let mut line = format!("{label:<VALUE_COLUMN$} {}", field.value);
    if let Some(legend) = &field.legend {
        line = format!("{line:<LEGEND_COLUMN$} {legend}");
    }
    style.emphasize(line, field.changed)
}

/// Header and field lines of one register, newline separated
pub fn format_register(view: &RegisterView, style: OutputStyle) -> String {
    let mut out = format_header(&view.header, style);
    for field in &view.fields {
        out.push('\n');
        out.push_str(&format_field(field, style));
    }
    out
}

/// Device listing in the form printed before commands
pub fn format_device_list(devices: &[DiscoveredDevice], ids: (u16, u16)) -> String {
    let mut out = String::from("Devices:");
    if devices.is_empty() {
        out.push_str(&format!(
            "\n Found no USB devices with ID {:04X}:{:04X}",
            ids.0, ids.1
        ));
        return out;
    }
    for device in devices {
        let info = &device.info;
        out.push_str(&format!(
            "\n [{}] Serial: {}, Manufacturer: {}, Product: {}",
            info.device_path,
            info.serial.as_deref().unwrap_or("-"),
            info.manufacturer.as_deref().unwrap_or("-"),
            info.product_name.as_deref().unwrap_or("-"),
        ));
    }
    out
}
