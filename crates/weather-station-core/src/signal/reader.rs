use super::error::SignalError;
use super::layout;

/// Whitespace-separated view over a raw capture line.
///
/// The token sequence is always the last field and the pulse-length slots are
/// the eight fields right before it; anything earlier is ignored.
pub struct CaptureReader<'a> {
    fields: Vec<&'a str>,
}

impl<'a> CaptureReader<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            fields: raw.split_whitespace().collect(),
        }
    }

    pub fn require_fields(&self) -> Result<(), SignalError> {
        if self.fields.len() < layout::FIELD_COUNT {
            return Err(SignalError::TooFewFields {
                needed: layout::FIELD_COUNT,
                actual: self.fields.len(),
            });
        }
        Ok(())
    }

    /// Number of leading fields that are not part of the capture.
    pub fn skipped_fields(&self) -> usize {
        self.fields.len().saturating_sub(layout::FIELD_COUNT)
    }

    pub fn read_slots(&self) -> Result<[u32; layout::SLOT_COUNT], SignalError> {
        self.require_fields()?;
        let start = self.skipped_fields();
        let mut slots = [layout::UNUSED_SLOT; layout::SLOT_COUNT];
        for (slot, field) in self.fields[start..start + layout::SLOT_COUNT]
            .iter()
            .enumerate()
        {
            slots[slot] = field
                .parse()
                .map_err(|_| SignalError::InvalidPulseLength {
                    slot,
                    value: field.to_string(),
                })?;
        }
        Ok(slots)
    }

    pub fn read_tokens(&self) -> Result<&'a str, SignalError> {
        self.require_fields()?;
        self.fields
            .last()
            .copied()
            .ok_or(SignalError::TooFewFields {
                needed: layout::FIELD_COUNT,
                actual: 0,
            })
    }
}
