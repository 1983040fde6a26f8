// CLI definitions using clap

use clap::Parser;
use std::path::PathBuf;

use cm6206_registers::{RegisterIndex, WriteRequest, REGISTER_COUNT};
use cm6206ctl::{Intent, ReadIntent};

/// DMA master select bit in register 0
const DMA_MASTER_MASK: u16 = 0x8000;

#[derive(Parser, Debug)]
#[command(name = "cm6206ctl")]
#[command(
    version,
    about = "Read and control registers of USB sound cards with the CM6206 chip"
)]
#[command(after_help = "Examples:
  cm6206ctl -A -v                   Print all registers decoded, with value legends
  cm6206ctl -r 0                    Read register 0
  cm6206ctl -r 2 -m 0x6000 -q       Print only the masked bits (headphone source)
  cm6206ctl -r 0 -m 0x8000 -w 0x8000  Set bit 15 of register 0")]
pub struct Cli {
    /// Print all registers in decoded form
    #[arg(short = 'A', long = "all")]
    pub all: bool,

    /// Register to read or write
    #[arg(short, long = "reg", value_parser = parse_register)]
    pub reg: Option<u8>,

    /// Bit mask for reading/writing only some bits (e.g. 0x8000)
    #[arg(short, long, value_parser = parse_u16)]
    pub mask: Option<u16>,

    /// Write value to the selected register
    #[arg(short, long = "write", value_parser = parse_u16)]
    pub write: Option<u16>,

    /// Only output requested values
    #[arg(short, long)]
    pub quiet: bool,

    /// Show all possible values of decoded fields
    #[arg(short, long)]
    pub verbose: bool,

    /// Initialize all registers to the configured profile (same as the Linux driver by default)
    #[arg(long)]
    pub init: bool,

    /// Set DMA master to S/PDIF (same as '-r 0 -m 0x8000 -w 0x8000')
    #[arg(long, conflicts_with_all = ["write", "mask", "dma_dac"])]
    pub dma_spdif: bool,

    /// Set DMA master to DAC (same as '-r 0 -m 0x8000 -w 0x0000')
    #[arg(long, conflicts_with_all = ["write", "mask"])]
    pub dma_dac: bool,

    /// List matching USB devices and exit
    #[arg(long)]
    pub list: bool,

    /// Print every HID report sent and received
    #[arg(long)]
    pub monitor: bool,

    /// Print decoded registers as JSON (with -A)
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Accept read replies without the register marker (warn only)
    #[arg(long)]
    pub lenient_marker: bool,

    /// Config file (default: ~/.config/cm6206ctl/config.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Turn flags into an intent; `init_table` is used when `--init` is given
    pub fn intent(&self, init_table: [u16; REGISTER_COUNT]) -> Result<Intent, String> {
        let reg = self.reg.map(register_index).transpose()?;

        let write = if self.dma_spdif || self.dma_dac {
            let value = if self.dma_spdif { DMA_MASTER_MASK } else { 0 };
            Some(WriteRequest::new(register_index(0)?, value).with_mask(DMA_MASTER_MASK))
        } else {
            match (self.write, reg) {
                (Some(value), Some(index)) => {
                    let request = WriteRequest::new(index, value);
                    Some(match self.mask {
                        Some(mask) => request.with_mask(mask),
                        None => request,
                    })
                }
                (Some(_), None) => return Err("-w requires a register (-r)".into()),
                (None, _) => None,
            }
        };

        if self.mask.is_some() && reg.is_none() {
            return Err("-m requires a register (-r)".into());
        }

        let read = reg.map(|index| {
            let read = ReadIntent::new(index);
            match self.mask {
                Some(mask) => ReadIntent { mask, ..read },
                None => read,
            }
        });

        Ok(Intent {
            init: self.init.then_some(init_table),
            write,
            read,
            decode_all: self.all,
        })
    }
}

fn register_index(index: u8) -> Result<RegisterIndex, String> {
    RegisterIndex::new(index).map_err(|e| e.to_string())
}

/// Parse an integer the way C's strtol with base 0 does:
/// `0x` hex, `0b` binary, leading `0` octal, otherwise decimal
pub fn parse_number(s: &str) -> Result<u32, String> {
    let s = s.trim();
    let (digits, radix) = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (hex, 16)
    } else if let Some(bin) = s.strip_prefix("0b").or_else(|| s.strip_prefix("0B")) {
        (bin, 2)
    } else if s.len() > 1 && s.starts_with('0') {
        (&s[1..], 8)
    } else {
        (s, 10)
    };
    u32::from_str_radix(digits, radix).map_err(|e| format!("invalid number \"{s}\": {e}"))
}

fn parse_u16(s: &str) -> Result<u16, String> {
    let value = parse_number(s)?;
    u16::try_from(value).map_err(|_| format!("value {s} out of range [0;0xFFFF]"))
}

fn parse_register(s: &str) -> Result<u8, String> {
    let value = parse_number(s)?;
    match u8::try_from(value) {
        Ok(v) if usize::from(v) < REGISTER_COUNT => Ok(v),
        _ => Err(format!(
            "register {s} out of range [0;{}]",
            REGISTER_COUNT - 1
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cm6206_registers::{FULL_MASK, INIT_PROFILE};

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["cm6206ctl"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn intent(args: &[&str]) -> Result<Intent, String> {
        parse(args).intent(INIT_PROFILE)
    }

    #[test]
    fn test_parse_number_bases() {
        assert_eq!(parse_number("42"), Ok(42));
        assert_eq!(parse_number("0x8000"), Ok(0x8000));
        assert_eq!(parse_number("0XfF"), Ok(0xFF));
        assert_eq!(parse_number("0b101"), Ok(5));
        assert_eq!(parse_number("017"), Ok(15));
        assert_eq!(parse_number("0"), Ok(0));
        assert!(parse_number("zz").is_err());
        assert!(parse_number("-1").is_err());
    }

    #[test]
    fn test_value_ranges() {
        assert_eq!(parse_u16("0xFFFF"), Ok(0xFFFF));
        assert!(parse_u16("0x10000").is_err());
        assert_eq!(parse_register("5"), Ok(5));
        assert!(parse_register("6").is_err());
        assert!(parse_register("300").is_err());
    }

    #[test]
    fn test_out_of_range_rejected_by_clap() {
        assert!(Cli::try_parse_from(["cm6206ctl", "-r", "6"]).is_err());
        assert!(Cli::try_parse_from(["cm6206ctl", "-r", "0", "-w", "70000"]).is_err());
    }

    #[test]
    fn test_read_defaults_to_full_mask() {
        let intent = intent(&["-r", "2"]).unwrap();
        let read = intent.read.unwrap();
        assert_eq!(read.index.get(), 2);
        assert_eq!(read.mask, FULL_MASK);
        assert!(intent.write.is_none());
    }

    #[test]
    fn test_masked_write_also_reads() {
        let intent = intent(&["-r", "0", "-m", "0x8000", "-w", "0x8000"]).unwrap();
        let write = intent.write.unwrap();
        assert_eq!((write.index.get(), write.value, write.mask), (0, 0x8000, 0x8000));
        assert_eq!(intent.read.unwrap().mask, 0x8000);
    }

    #[test]
    fn test_dma_shortcuts() {
        let spdif = intent(&["--dma-spdif"]).unwrap().write.unwrap();
        assert_eq!((spdif.index.get(), spdif.value, spdif.mask), (0, 0x8000, 0x8000));

        let dac = intent(&["--dma-dac"]).unwrap();
        let write = dac.write.unwrap();
        assert_eq!((write.value, write.mask), (0x0000, 0x8000));
        assert!(dac.read.is_none());

        assert!(Cli::try_parse_from(["cm6206ctl", "--dma-dac", "-w", "1"]).is_err());
    }

    #[test]
    fn test_write_requires_register() {
        assert!(intent(&["-w", "0x10"]).is_err());
        assert!(intent(&["-m", "0x10"]).is_err());
    }

    #[test]
    fn test_init_and_all() {
        let intent = intent(&["--init", "-A", "-v"]).unwrap();
        assert_eq!(intent.init, Some(INIT_PROFILE));
        assert!(intent.decode_all);
        assert!(intent.read.is_none());
    }
}
