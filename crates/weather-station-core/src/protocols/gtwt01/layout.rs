use std::ops::{Range, RangeInclusive};

use crate::protocols::mapping::CodeEntry;

pub const TOKEN_LENGTHS: &[usize] = &[76];
pub const PULSE_LENGTHS: &[u32] = &[496, 2048, 4068, 8960];

pub const CODE_TABLE: &[CodeEntry] = &[
    CodeEntry::new("01", "0"),
    CodeEntry::new("02", "1"),
    CodeEntry::new("03", ""),
];

/// The radio encodes channels starting at zero.
pub const CHANNEL_BASE: u8 = 1;
/// Temperature is transmitted in tenths of a degree Celsius.
pub const TEMPERATURE_SCALE: f64 = 10.0;

/// Bit positions of one GT-WT-01 payload variant.
///
/// The temperature range is inclusive: sign bit first, eleven magnitude bits
/// after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOffsets {
    pub sensor_id: Range<usize>,
    pub low_battery: usize,
    pub channel: Range<usize>,
    pub temperature: RangeInclusive<usize>,
    pub humidity: Range<usize>,
}

impl FieldOffsets {
    /// Shortest bit string holding every field.
    pub fn min_len(&self) -> usize {
        [
            self.sensor_id.end,
            self.low_battery + 1,
            self.channel.end,
            *self.temperature.end() + 1,
            self.humidity.end,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

/// GT-WT-01 (rfcontroljs `weather12`).
pub const WEATHER12: FieldOffsets = FieldOffsets {
    sensor_id: 0..8,
    low_battery: 8,
    channel: 10..12,
    temperature: 12..=23,
    humidity: 24..31,
};

/// GT-WT-01 variant (rfcontroljs `weather15`).
pub const WEATHER15: FieldOffsets = FieldOffsets {
    sensor_id: 0..12,
    low_battery: 12,
    channel: 14..16,
    temperature: 16..=27,
    humidity: 28..36,
};
