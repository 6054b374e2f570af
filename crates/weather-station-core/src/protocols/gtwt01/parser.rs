use crate::Measurement;
use crate::protocols::common::{BitReader, FieldError};

use super::layout::{self, FieldOffsets};

/// Decode a GT-WT-01 binary payload laid out as `offsets`.
///
/// # Errors
/// Returns `FieldError` when the bit string is shorter than the layout or a
/// field holds a character other than `0`/`1`.
pub fn decode_fields(bits: &str, offsets: &FieldOffsets) -> Result<Measurement, FieldError> {
    let reader = BitReader::new(bits);
    reader.require_len(offsets.min_len())?;

    let sensor_id = reader.read_unsigned(offsets.sensor_id.clone())?;
    let low_battery = reader.read_flag(offsets.low_battery)?;
    let channel = reader.read_unsigned(offsets.channel.clone())?;
    let temperature = reader.read_signed(offsets.temperature.clone())?;
    let humidity = reader.read_unsigned(offsets.humidity.clone())?;

    // Field widths (12, 2 and 8 bits at most) fit the narrower types.
    Ok(Measurement {
        sensor_id: sensor_id as u32,
        channel: channel as u8 + layout::CHANNEL_BASE,
        temperature: temperature as f64 / layout::TEMPERATURE_SCALE,
        humidity: humidity as u8,
        low_battery,
    })
}
