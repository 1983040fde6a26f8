//! Declarative bitfield descriptors
//!
//! A register layout is an ordered list of [`BitField`]s. The order is the
//! order fields are described in, not bit order.

use std::fmt::Write as _;

/// Labels used by generic single-bit flags
pub const FLAG_ON: &str = "Yes";
pub const FLAG_OFF: &str = "No";

/// Name given to reserved placeholder fields
pub const RESERVED_NAME: &str = "<Reserved>";

/// How a field's bits are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single bit with a label for each state
    Boolean {
        on: &'static str,
        off: &'static str,
    },
    /// Value looked up in a label table; `fallback` covers unlisted values
    Enumerated {
        labels: &'static [(u16, &'static str)],
        fallback: &'static str,
    },
    /// Plain unsigned number
    Numeric,
    /// Placeholder with no meaning attached
    Reserved,
}

/// A contiguous run of bits inside a 16-bit register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    pub name: &'static str,
    pub first_bit: u8,
    pub num_bits: u8,
    pub kind: FieldKind,
}

impl BitField {
    /// Single-bit flag rendered as Yes/No
    pub const fn flag(bit: u8, name: &'static str) -> Self {
        Self::boolean(bit, name, FLAG_ON, FLAG_OFF)
    }

    /// Single-bit field with custom on/off labels
    pub const fn boolean(bit: u8, name: &'static str, on: &'static str, off: &'static str) -> Self {
        Self {
            name,
            first_bit: bit,
            num_bits: 1,
            kind: FieldKind::Boolean { on, off },
        }
    }

    pub const fn enumerated(
        first_bit: u8,
        num_bits: u8,
        name: &'static str,
        labels: &'static [(u16, &'static str)],
        fallback: &'static str,
    ) -> Self {
        Self {
            name,
            first_bit,
            num_bits,
            kind: FieldKind::Enumerated { labels, fallback },
        }
    }

    pub const fn numeric(first_bit: u8, num_bits: u8, name: &'static str) -> Self {
        Self {
            name,
            first_bit,
            num_bits,
            kind: FieldKind::Numeric,
        }
    }

    pub const fn reserved(first_bit: u8, num_bits: u8) -> Self {
        Self {
            name: RESERVED_NAME,
            first_bit,
            num_bits,
            kind: FieldKind::Reserved,
        }
    }

    /// Mask for the field's width, not shifted into position
    pub fn width_mask(&self) -> u16 {
        match self.num_bits {
            0 => 0,
            n if n >= 16 => 0xFFFF,
            n => (1u16 << n) - 1,
        }
    }

    /// Mask selecting the field's bits within the register
    pub fn span_mask(&self) -> u16 {
        self.width_mask()
            .checked_shl(u32::from(self.first_bit))
            .unwrap_or(0)
    }

    /// Extract the field's value from a register value
    pub fn extract(&self, raw: u16) -> u16 {
        raw.checked_shr(u32::from(self.first_bit)).unwrap_or(0) & self.width_mask()
    }

    /// Highest bit covered by the field
    pub fn last_bit(&self) -> u8 {
        (self.first_bit + self.num_bits).saturating_sub(1)
    }

    /// Bit position label: `[NN]` for one bit, `[HI:LO]` for a range
    pub fn bit_label(&self) -> String {
        if self.num_bits == 1 {
            format!("[{:02}]", self.first_bit)
        } else {
            format!("[{:02}:{:02}]", self.last_bit(), self.first_bit)
        }
    }

    /// Check position, width and kind constraints of a single field
    pub fn check(&self) -> Result<(), String> {
        if self.num_bits == 0 {
            return Err(format!("field \"{}\" has no bits", self.name));
        }
        if u16::from(self.first_bit) + u16::from(self.num_bits) > 16 {
            return Err(format!(
                "field \"{}\" at bit {} with {} bits exceeds 16 bits",
                self.name, self.first_bit, self.num_bits
            ));
        }
        match self.kind {
            FieldKind::Boolean { .. } if self.num_bits != 1 => Err(format!(
                "boolean field \"{}\" must be a single bit",
                self.name
            )),
            FieldKind::Enumerated { labels, .. } => {
                match labels.iter().find(|(v, _)| *v > self.width_mask()) {
                    Some((v, label)) => Err(format!(
                        "label \"{}\" = {} does not fit in {}-bit field \"{}\"",
                        label, v, self.num_bits, self.name
                    )),
                    None => Ok(()),
                }
            }
            _ => Ok(()),
        }
    }

    /// Legend listing every possible labeled value, e.g. `{0="No", 1="Yes"}`
    ///
    /// Numeric and reserved fields have no legend.
    pub fn legend(&self) -> Option<String> {
        match self.kind {
            FieldKind::Boolean { on, off } => Some(format!("{{0=\"{off}\", 1=\"{on}\"}}")),
            FieldKind::Enumerated { labels, .. } => {
                let mut out = String::from("{");
                for (i, (value, label)) in labels.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    let _ = write!(out, "{value}=\"{label}\"");
                }
                out.push('}');
                Some(out)
            }
            FieldKind::Numeric | FieldKind::Reserved => None,
        }
    }
}

/// Resolve an enumerated value; the first matching entry wins
pub fn resolve_label(
    labels: &[(u16, &'static str)],
    fallback: &'static str,
    value: u16,
) -> &'static str {
    labels
        .iter()
        .find(|(v, _)| *v == value)
        .map(|(_, label)| *label)
        .unwrap_or(fallback)
}
