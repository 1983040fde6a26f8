//! Bitfield decoder: raw register values to labeled field lines
//!
//! Rendering is a pure function of (value, field table, verbose flag). Each
//! line records whether it differs from the factory default so the
//! presentation layer can emphasize it.

use serde::Serialize;

use crate::field::{resolve_label, BitField, FieldKind};
use crate::layout::{RegisterMap, REGISTER_COUNT};
use crate::model::RegisterIndex;

/// First line of a decoded register
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderLine {
    pub index: u8,
    pub raw: u16,
    pub default: u16,
    /// Whole register differs from its reset value
    pub changed: bool,
}

/// One decoded field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldLine {
    /// `[NN]` or `[HI:LO]`
    pub bits: String,
    pub name: &'static str,
    /// Label, number, or empty for reserved fields
    pub value: String,
    /// All labeled values, only when rendering verbosely
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<String>,
    /// Field bits differ from the reset value
    pub changed: bool,
}

/// A decoded register
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterView {
    pub header: HeaderLine,
    pub fields: Vec<FieldLine>,
}

/// Renders registers using a register map's defaults and layouts
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    map: RegisterMap,
}

impl Decoder {
    pub fn new(map: RegisterMap) -> Self {
        Self { map }
    }

    pub fn map(&self) -> &RegisterMap {
        &self.map
    }

    fn default_of(&self, index: RegisterIndex) -> u16 {
        self.map.default_value(index.as_usize()).unwrap_or_default()
    }

    /// True when the field's bits in `raw` equal those of the reset value
    pub fn classify_default(&self, index: RegisterIndex, raw: u16, field: &BitField) -> bool {
        field.extract(raw) == field.extract(self.default_of(index))
    }

    pub fn render_field(
        &self,
        index: RegisterIndex,
        raw: u16,
        field: &BitField,
        verbose: bool,
    ) -> FieldLine {
        let extracted = field.extract(raw);
        let value = match field.kind {
            FieldKind::Boolean { on, off } => {
                if extracted != 0 {
                    on.to_string()
                } else {
                    off.to_string()
                }
            }
            FieldKind::Enumerated { labels, fallback } => {
                resolve_label(labels, fallback, extracted).to_string()
            }
            FieldKind::Numeric => extracted.to_string(),
            FieldKind::Reserved => String::new(),
        };

        FieldLine {
            bits: field.bit_label(),
            name: field.name,
            value,
            legend: if verbose { field.legend() } else { None },
            changed: !self.classify_default(index, raw, field),
        }
    }

    /// Header plus every field of one register, in layout order
    pub fn render_register(&self, index: RegisterIndex, raw: u16, verbose: bool) -> RegisterView {
        let default = self.default_of(index);
        let fields = self
            .map
            .fields(index.as_usize())
            .unwrap_or_default()
            .iter()
            .map(|field| self.render_field(index, raw, field, verbose))
            .collect();

        RegisterView {
            header: HeaderLine {
                index: index.get(),
                raw,
                default,
                changed: raw != default,
            },
            fields,
        }
    }

    /// Render all registers from a full set of values
    pub fn render_all(&self, values: &[u16; REGISTER_COUNT], verbose: bool) -> Vec<RegisterView> {
        RegisterIndex::all()
            .map(|index| self.render_register(index, values[index.as_usize()], verbose))
            .collect()
    }
}
