// CM6206 USB sound card control - shared library
// Register cache, configuration, output formatting and command orchestration

pub mod cache;
pub mod config;
pub mod controller;
pub mod output;

pub use cache::{RegisterCache, StaleRegister};
pub use config::{Config, DeviceConfig};
pub use controller::{Controller, Intent, OutputOptions, ReadIntent};
pub use output::OutputStyle;
