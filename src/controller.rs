//! Command orchestration on top of the register engine
//!
//! The controller owns the register cache. It reads every register once
//! when it starts and again after any write, so commands always see the
//! device's real state rather than what was sent.

use std::io::Write;

use anyhow::Context;
use cm6206_registers::{Cm6206, RegisterIndex, WriteRequest, FULL_MASK, REGISTER_COUNT};
use cm6206_transport::Transport;
use tracing::info;

use crate::cache::RegisterCache;
use crate::output::{self, OutputStyle};

/// Print one register's value under a mask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadIntent {
    pub index: RegisterIndex,
    pub mask: u16,
}

impl ReadIntent {
    pub fn new(index: RegisterIndex) -> Self {
        Self {
            index,
            mask: FULL_MASK,
        }
    }
}

/// Everything one invocation asks for, executed in field order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Intent {
    /// Write the initialization profile to all registers
    pub init: Option<[u16; REGISTER_COUNT]>,
    pub write: Option<WriteRequest>,
    pub read: Option<ReadIntent>,
    /// Print every register decoded
    pub decode_all: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputOptions {
    /// Only print requested values
    pub quiet: bool,
    /// Add value legends to decoded fields
    pub verbose: bool,
    /// Print decoded registers as JSON
    pub json: bool,
    pub style: OutputStyle,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            quiet: false,
            verbose: false,
            json: false,
            style: OutputStyle::plain(),
        }
    }
}

pub struct Controller<T: Transport> {
    chip: Cm6206<T>,
    cache: RegisterCache,
    options: OutputOptions,
}

impl<T: Transport> Controller<T> {
    /// Take over a device and read all registers
    pub fn start(chip: Cm6206<T>, options: OutputOptions) -> anyhow::Result<Self> {
        let mut controller = Self {
            chip,
            cache: RegisterCache::new(),
            options,
        };
        controller.refresh()?;
        Ok(controller)
    }

    pub fn cache(&self) -> &RegisterCache {
        &self.cache
    }

    pub fn chip(&self) -> &Cm6206<T> {
        &self.chip
    }

    pub fn into_chip(self) -> Cm6206<T> {
        self.chip
    }

    /// Re-read every register into the cache
    pub fn refresh(&mut self) -> anyhow::Result<()> {
        self.cache.invalidate();
        let values = self.chip.read_all().context("Reading registers")?;
        self.cache.store_all(values);
        Ok(())
    }

    /// Run an intent: init, then write, then read, then decode
    pub fn execute(&mut self, intent: &Intent, out: &mut impl Write) -> anyhow::Result<()> {
        if let Some(table) = &intent.init {
            self.init(table, out)?;
        }
        if let Some(request) = intent.write {
            self.write(request, out)?;
        }
        if let Some(read) = intent.read {
            self.read(read, out)?;
        }
        if intent.decode_all {
            self.decode_all(out)?;
        }
        Ok(())
    }

    /// Write an initialization table; the cache holds the read-back values
    pub fn init(
        &mut self,
        table: &[u16; REGISTER_COUNT],
        out: &mut impl Write,
    ) -> anyhow::Result<()> {
        if !self.options.quiet {
            writeln!(out, "Initializing registers...")?;
        }
        self.cache.invalidate();
        let values = self
            .chip
            .apply_bulk_defaults(table)
            .context("Initializing registers")?;
        self.cache.store_all(values);
        info!("Registers initialized");
        Ok(())
    }

    /// Masked write against the cached value, followed by a full re-read
    pub fn write(&mut self, request: WriteRequest, out: &mut impl Write) -> anyhow::Result<()> {
        let current = self.cache.require(request.index)?;
        if !self.options.quiet {
            writeln!(
                out,
                "Writing to Register {}, Value 0x{:04X}, Mask 0x{:04X}",
                request.index, request.value, request.mask
            )?;
        }
        self.cache.invalidate();
        self.chip
            .write_masked(request, current)
            .with_context(|| format!("Writing register {}", request.index))?;
        self.refresh()
    }

    /// Print a register's masked value in decimal
    pub fn read(&self, intent: ReadIntent, out: &mut impl Write) -> anyhow::Result<()> {
        let value = self.cache.require(intent.index)?;
        if !self.options.quiet {
            writeln!(
                out,
                "Reading from Register {}, Value 0x{:04X}, Mask 0x{:04X}",
                intent.index, value, intent.mask
            )?;
        }
        writeln!(out, "{}", value & intent.mask)?;
        Ok(())
    }

    /// Print every register decoded, as text or JSON
    pub fn decode_all(&self, out: &mut impl Write) -> anyhow::Result<()> {
        let values = self.cache.snapshot()?;
        let views = self
            .chip
            .decoder()
            .render_all(&values, self.options.verbose);

        if self.options.json {
            serde_json::to_writer_pretty(&mut *out, &views)?;
            writeln!(out)?;
        } else {
            for view in &views {
                writeln!(out, "{}", output::format_register(view, self.options.style))?;
            }
        }
        Ok(())
    }
}
