//! CM6206 register map: factory defaults and per-register field layouts
//!
//! Field names and labels follow the C-Media CM6206 datasheet. A few values
//! the datasheet marks as reserved are listed because they work in practice
//! (44.1 kHz and 32 kHz S/PDIF rates).

use crate::error::{RegisterError, Result};
use crate::field::BitField;

/// Number of registers on the device
pub const REGISTER_COUNT: usize = 6;

/// Register values after hardware reset
pub const FACTORY_DEFAULTS: [u16; REGISTER_COUNT] =
    [0x2000, 0x3002, 0x6004, 0x147F, 0x0000, 0x3000];

/// Known-good operating configuration (same as the Linux snd-usb-audio quirk)
///
/// - REG0: do not assert copyright
/// - REG1: enable S/PDIF out
/// - REG2: enable drivers, mute headphone, disable BTL
pub const INIT_PROFILE: [u16; REGISTER_COUNT] = [0x2004, 0x3000, 0xF800, 0x147F, 0x0000, 0x3000];

const SPDIF_OUT_RATES: &[(u16, &str)] = &[
    (0, "44.1 kHz"),
    (2, "48 kHz"),
    (3, "32 kHz"),
    (6, "96 kHz"),
];

const SPDIF_IN_RATES: &[(u16, &str)] = &[(0, "44.1 kHz"), (2, "48 kHz"), (3, "32 kHz")];

const HEADPHONE_SOURCES: &[(u16, &str)] = &[
    (0, "Side"),
    (1, "Rear"),
    (2, "Center/Subwoofer"),
    (3, "Front"),
];

const MCU_CLOCKS: &[(u16, &str)] = &[(0, "1.5 MHz"), (1, "3 MHz")];

const SPDIF_OUT_CHANNELS: &[(u16, &str)] = &[(0, "Front"), (1, "Side"), (2, "Center"), (3, "Rear")];

const AD_FILTER_SOURCES: &[(u16, &str)] = &[
    (0, "Normal"),
    (4, "Front"),
    (5, "Side"),
    (6, "Center"),
    (7, "Rear"),
];

const REG0_FIELDS: &[BitField] = &[
    BitField::boolean(15, "DMA Master", "SPDIF Out", "DAC"),
    BitField::enumerated(12, 3, "SPDIF Out sample rate", SPDIF_OUT_RATES, "Reserved"),
    BitField::numeric(4, 8, "Category code"),
    BitField::boolean(3, "Emphasis", "CD_Type", "None"),
    BitField::boolean(2, "Copyright", "Not Asserted", "Asserted"),
    BitField::boolean(1, "Non-audio", "non-PCM (e.g. AC3)", "PCM"),
    BitField::boolean(0, "Professional/Consumer", "Professional", "Consumer"),
];

const REG1_FIELDS: &[BitField] = &[
    BitField::reserved(15, 1),
    BitField::boolean(14, "SEL Clk (test)", "22.58 MHz", "24.576 MHz"),
    BitField::flag(13, "PLL binary search Enable"),
    BitField::flag(12, "Soft Mute Enable"),
    BitField::flag(11, "GPIO4 Out Status"),
    BitField::flag(10, "GPIO4 Out Enable"),
    BitField::flag(9, "GPIO3 Out Status"),
    BitField::flag(8, "GPIO3 Out Enable"),
    BitField::flag(7, "GPIO2 Out Status"),
    BitField::flag(6, "GPIO2 Out Enable"),
    BitField::flag(5, "GPIO1 Out Status"),
    BitField::flag(4, "GPIO1 Out Enable"),
    BitField::flag(3, "SPDIF Out Valid"),
    BitField::flag(2, "SPDIF Loop-back Enable"),
    BitField::flag(1, "SPDIF Out Disable"),
    BitField::flag(0, "SPDIF In Mix Enable"),
];

const REG2_FIELDS: &[BitField] = &[
    BitField::flag(15, "Driver On"),
    BitField::enumerated(13, 2, "Headphone Source channels", HEADPHONE_SOURCES, "<Reserved>"),
    BitField::flag(12, "Mute Headphone Right"),
    BitField::flag(11, "Mute Headphone Left"),
    BitField::flag(10, "Mute Rear Surround Right"),
    BitField::flag(9, "Mute Rear Surround Left"),
    BitField::flag(8, "Mute Side Surround Right"),
    BitField::flag(7, "Mute Side Surround Left"),
    BitField::flag(6, "Mute Subwoofer"),
    BitField::flag(5, "Mute Center"),
    BitField::flag(4, "Mute Front Right"),
    BitField::flag(3, "Mute Front Left"),
    BitField::flag(2, "BTL mode enable"),
    BitField::enumerated(0, 2, "MCU Clock Frequency", MCU_CLOCKS, "<Reserved>"),
];

const REG3_FIELDS: &[BitField] = &[
    BitField::reserved(14, 2),
    BitField::numeric(11, 3, "Sensitivity to FLY tuner volume"),
    BitField::boolean(10, "Microphone bias voltage", "2.25 V", "4.5 V"),
    BitField::boolean(9, "Mix MIC/Line In to", "All 8 Channels", "Front Out Only"),
    BitField::enumerated(7, 2, "SPDIF In sample rate", SPDIF_IN_RATES, "Reserved"),
    BitField::boolean(6, "Package size", "48 pins", "100 pins"),
    BitField::flag(5, "Front Out Enable"),
    BitField::flag(4, "Rear Out Enable"),
    BitField::flag(3, "Center Out Enable"),
    BitField::flag(2, "Line Out Enable"),
    BitField::flag(1, "Headphone Out Enable"),
    BitField::flag(0, "SPDIF In can be recorded"),
];

const REG4_FIELDS: &[BitField] = &[
    BitField::flag(15, "GPIO12 Out Status"),
    BitField::flag(14, "GPIO12 Out Enable"),
    BitField::flag(13, "GPIO11 Out Status"),
    BitField::flag(12, "GPIO11 Out Enable"),
    BitField::flag(11, "GPIO10 Out Status"),
    BitField::flag(10, "GPIO10 Out Enable"),
    BitField::flag(9, "GPIO9 Out Status"),
    BitField::flag(8, "GPIO9 Out Enable"),
    BitField::flag(7, "GPIO8 Out Status"),
    BitField::flag(6, "GPIO8 Out Enable"),
    BitField::flag(5, "GPIO7 Out Status"),
    BitField::flag(4, "GPIO7 Out Enable"),
    BitField::flag(3, "GPIO6 Out Status"),
    BitField::flag(2, "GPIO6 Out Enable"),
    BitField::flag(1, "GPIO5 Out Enable"),
    BitField::flag(0, "GPIO5 Out Status"),
];

const REG5_FIELDS: &[BitField] = &[
    BitField::reserved(14, 2),
    BitField::flag(13, "DAC Not Reset"),
    BitField::flag(12, "ADC Not Reset"),
    BitField::flag(11, "ADC to SPDIF Out"),
    BitField::enumerated(9, 2, "SPDIF Out select", SPDIF_OUT_CHANNELS, "<Reserved>"),
    BitField::boolean(8, "USB/CODEC Mode", "CODEC", "USB"),
    BitField::flag(7, "DAC high pass filter"),
    BitField::flag(6, "Loopback ADC to Rear DAC"),
    BitField::flag(5, "Loopback ADC to Center DAC"),
    BitField::flag(4, "Loopback ADC to Side DAC"),
    BitField::flag(3, "Loopback ADC to Front DAC"),
    BitField::enumerated(0, 3, "Input source to AD digital filter", AD_FILTER_SOURCES, "<Reserved>"),
];

/// Field layouts of all CM6206 registers, indexed by register number
pub const CM6206_LAYOUTS: [&[BitField]; REGISTER_COUNT] = [
    REG0_FIELDS,
    REG1_FIELDS,
    REG2_FIELDS,
    REG3_FIELDS,
    REG4_FIELDS,
    REG5_FIELDS,
];

/// Defaults and field layouts for every register of a device
#[derive(Debug, Clone, Copy)]
pub struct RegisterMap {
    defaults: [u16; REGISTER_COUNT],
    layouts: [&'static [BitField]; REGISTER_COUNT],
}

impl RegisterMap {
    /// The CM6206 map
    pub const fn cm6206() -> Self {
        Self {
            defaults: FACTORY_DEFAULTS,
            layouts: CM6206_LAYOUTS,
        }
    }

    /// Build a map from custom tables; call [`RegisterMap::validate`] before use
    pub const fn new(
        defaults: [u16; REGISTER_COUNT],
        layouts: [&'static [BitField]; REGISTER_COUNT],
    ) -> Self {
        Self { defaults, layouts }
    }

    pub fn default_value(&self, index: usize) -> Option<u16> {
        self.defaults.get(index).copied()
    }

    pub fn defaults(&self) -> &[u16; REGISTER_COUNT] {
        &self.defaults
    }

    pub fn fields(&self, index: usize) -> Option<&'static [BitField]> {
        self.layouts.get(index).copied()
    }

    /// Check every field fits in 16 bits and no two fields of a register overlap
    pub fn validate(&self) -> Result<()> {
        for (index, fields) in self.layouts.iter().enumerate() {
            let mut used = 0u16;
            for field in fields.iter() {
                field
                    .check()
                    .map_err(|e| RegisterError::Configuration(format!("REG{index}: {e}")))?;
                let span = field.span_mask();
                if used & span != 0 {
                    return Err(RegisterError::Configuration(format!(
                        "REG{index}: field \"{}\" {} overlaps another field",
                        field.name,
                        field.bit_label()
                    )));
                }
                used |= span;
            }
        }
        Ok(())
    }
}

impl Default for RegisterMap {
    fn default() -> Self {
        Self::cm6206()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cm6206_map_is_valid() {
        RegisterMap::cm6206().validate().unwrap();
    }

    #[test]
    fn test_cm6206_layouts_cover_all_bits() {
        for (index, fields) in CM6206_LAYOUTS.iter().enumerate() {
            let covered = fields.iter().fold(0u16, |acc, f| acc | f.span_mask());
            assert_eq!(covered, 0xFFFF, "REG{index} leaves bits undescribed");
        }
    }

    #[test]
    fn test_overlap_detected() {
        const OVERLAP: &[BitField] = &[
            BitField::numeric(4, 4, "low"),
            BitField::flag(7, "clash"),
        ];
        let map = RegisterMap::new(FACTORY_DEFAULTS, [OVERLAP, &[], &[], &[], &[], &[]]);
        let err = map.validate().unwrap_err();
        assert!(matches!(err, RegisterError::Configuration(ref m) if m.contains("clash")));
    }

    #[test]
    fn test_out_of_range_detected() {
        const TOO_WIDE: &[BitField] = &[BitField::numeric(14, 3, "wide")];
        let map = RegisterMap::new(FACTORY_DEFAULTS, [&[], &[], TOO_WIDE, &[], &[], &[]]);
        let err = map.validate().unwrap_err();
        assert!(matches!(err, RegisterError::Configuration(ref m) if m.starts_with("REG2")));
    }

    #[test]
    fn test_defaults() {
        let map = RegisterMap::cm6206();
        assert_eq!(map.default_value(0), Some(0x2000));
        assert_eq!(map.default_value(3), Some(0x147F));
        assert_eq!(map.default_value(6), None);
        assert!(map.fields(6).is_none());
        assert_eq!(map.fields(0).map(<[BitField]>::len), Some(7));
    }
}
