/// Number of pulse-length slots reported by the relay for every capture.
pub const SLOT_COUNT: usize = 8;
/// Slots plus the trailing token sequence.
pub const FIELD_COUNT: usize = SLOT_COUNT + 1;

pub const TOKEN_RADIX: u32 = 10;
/// Slot value the relay uses for an unused pulse bucket.
pub const UNUSED_SLOT: u32 = 0;
