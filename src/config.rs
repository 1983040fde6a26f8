//! Configuration file for cm6206ctl
//!
//! Stored as TOML, by default at `~/.config/cm6206ctl/config.toml`. Every
//! field is optional; command line flags override file values.

use std::path::{Path, PathBuf};

use anyhow::Context;
use cm6206_registers::{RegisterError, INIT_PROFILE, REGISTER_COUNT};
use cm6206_transport::protocol::device;
use serde::{Deserialize, Serialize};

/// USB identity to look for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    #[serde(default = "default_vendor_id")]
    pub vendor_id: u16,
    #[serde(default = "default_product_id")]
    pub product_id: u16,
}

fn default_vendor_id() -> u16 {
    device::VENDOR_ID
}
fn default_product_id() -> u16 {
    device::PRODUCT_ID
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            vendor_id: default_vendor_id(),
            product_id: default_product_id(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Register values written by `--init`, one per register
    #[serde(default = "default_init_profile")]
    pub init_profile: Vec<u16>,
    /// Reject read replies without the register marker
    #[serde(default = "default_true")]
    pub strict_marker: bool,
    /// Emphasize changed values with ANSI colors
    #[serde(default = "default_true")]
    pub color: bool,
    /// Reply timeout in milliseconds
    #[serde(default = "default_read_timeout")]
    pub read_timeout_ms: i32,
    #[serde(default)]
    pub device: DeviceConfig,
}

fn default_init_profile() -> Vec<u16> {
    INIT_PROFILE.to_vec()
}
fn default_true() -> bool {
    true
}
fn default_read_timeout() -> i32 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            init_profile: default_init_profile(),
            strict_marker: true,
            color: true,
            read_timeout_ms: default_read_timeout(),
            device: DeviceConfig::default(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cm6206ctl")
            .join("config.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Self::parse(&content).with_context(|| format!("parsing {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate TOML text
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.init_table()?;
        Ok(config)
    }

    /// Save config to a file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The initialization profile as a per-register table
    pub fn init_table(&self) -> Result<[u16; REGISTER_COUNT], RegisterError> {
        <[u16; REGISTER_COUNT]>::try_from(self.init_profile.as_slice()).map_err(|_| {
            RegisterError::Configuration(format!(
                "init_profile has {} values, expected {}",
                self.init_profile.len(),
                REGISTER_COUNT
            ))
        })
    }
}
