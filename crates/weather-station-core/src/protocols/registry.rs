use std::sync::LazyLock;

use crate::Measurement;

use super::common::FieldError;
use super::gtwt01;
use super::mapping::CodeEntry;

/// Payload layouts the decoder knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLayout {
    /// Globaltronics GT-WT-01.
    GtWt01,
    /// Globaltronics GT-WT-01 variant with a 12-bit sensor id.
    GtWt01Variant,
}

impl FieldLayout {
    pub fn decode(self, bits: &str) -> Result<Measurement, FieldError> {
        match self {
            FieldLayout::GtWt01 => gtwt01::decode_fields(bits, &gtwt01::layout::WEATHER12),
            FieldLayout::GtWt01Variant => {
                gtwt01::decode_fields(bits, &gtwt01::layout::WEATHER15)
            }
        }
    }
}

/// Static description of one supported radio protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolDescriptor {
    /// Short name used in configuration files (e.g., `weather12`).
    pub name: &'static str,
    /// Human-readable device label.
    pub device: &'static str,
    /// Accepted token-sequence lengths.
    pub token_lengths: &'static [usize],
    /// Nominal pulse lengths in microseconds, ascending.
    pub pulse_lengths: &'static [u32],
    pub code_table: &'static [CodeEntry],
    pub layout: FieldLayout,
}

pub const WEATHER12: ProtocolDescriptor = ProtocolDescriptor {
    name: "weather12",
    device: "Globaltronics GT-WT-01",
    token_lengths: gtwt01::layout::TOKEN_LENGTHS,
    pulse_lengths: gtwt01::layout::PULSE_LENGTHS,
    code_table: gtwt01::layout::CODE_TABLE,
    layout: FieldLayout::GtWt01,
};

pub const WEATHER15: ProtocolDescriptor = ProtocolDescriptor {
    name: "weather15",
    device: "Globaltronics GT-WT-01 variant",
    token_lengths: gtwt01::layout::TOKEN_LENGTHS,
    pulse_lengths: gtwt01::layout::PULSE_LENGTHS,
    code_table: gtwt01::layout::CODE_TABLE,
    layout: FieldLayout::GtWt01Variant,
};

/// Built-in protocols in matching order.
pub const BUILTIN_PROTOCOLS: &[ProtocolDescriptor] = &[WEATHER12, WEATHER15];

static BUILTIN: LazyLock<ProtocolRegistry> =
    LazyLock::new(|| ProtocolRegistry::new(BUILTIN_PROTOCOLS.to_vec()));

/// Ordered, immutable set of protocol descriptors.
///
/// # Examples
/// ```
/// use weather_station_core::protocols::ProtocolRegistry;
///
/// let registry = ProtocolRegistry::builtin();
/// let names: Vec<_> = registry.iter().map(|p| p.name).collect();
/// assert_eq!(names, ["weather12", "weather15"]);
/// assert!(registry.get("weather15").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolRegistry {
    descriptors: Vec<ProtocolDescriptor>,
}

impl ProtocolRegistry {
    pub fn new(descriptors: Vec<ProtocolDescriptor>) -> Self {
        Self { descriptors }
    }

    /// Process-wide registry of the built-in protocols.
    pub fn builtin() -> &'static ProtocolRegistry {
        &BUILTIN
    }

    pub fn descriptors(&self) -> &[ProtocolDescriptor] {
        &self.descriptors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProtocolDescriptor> {
        self.descriptors.iter()
    }

    pub fn get(&self, name: &str) -> Option<&ProtocolDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.descriptors.iter().map(|d| d.name).collect()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl<'a> IntoIterator for &'a ProtocolRegistry {
    type Item = &'a ProtocolDescriptor;
    type IntoIter = std::slice::Iter<'a, ProtocolDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
