use std::fmt;

use tracing::debug;

use super::error::SignalError;
use super::layout;
use super::reader::CaptureReader;

/// A normalized capture: ascending pulse-length table and the token sequence
/// re-indexed against it.
///
/// Every token is a single digit smaller than `pulse_lengths.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    pub pulse_lengths: Vec<u32>,
    pub tokens: String,
}

/// Canonical wire form: eight slots (unused ones as `0`) and the tokens.
impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for slot in 0..layout::SLOT_COUNT {
            let length = self
                .pulse_lengths
                .get(slot)
                .copied()
                .unwrap_or(layout::UNUSED_SLOT);
            write!(f, "{length} ")?;
        }
        f.write_str(&self.tokens)
    }
}

/// Normalize a raw capture `"L0 L1 L2 L3 L4 L5 L6 L7 SEQ"`.
///
/// Unused slots are dropped, the remaining pulse lengths are sorted ascending
/// and every token is rewritten to the rank of the slot it referred to. Equal
/// pulse lengths keep their original slot order.
///
/// # Examples
/// ```
/// use weather_station_core::signal::normalize;
///
/// let signal = normalize("516 9112 4152 2116 0 0 0 0 01020203").unwrap();
/// assert_eq!(signal.pulse_lengths, vec![516, 2116, 4152, 9112]);
/// assert_eq!(signal.tokens, "03020201");
/// ```
///
/// # Errors
/// Returns `SignalError` when the capture has too few fields, a slot is not a
/// non-negative integer, every slot is unused, or a token is not a digit
/// naming a retained slot.
pub fn normalize(raw: &str) -> Result<Signal, SignalError> {
    let reader = CaptureReader::new(raw);
    let slots = reader.read_slots()?;
    let tokens = reader.read_tokens()?;
    if reader.skipped_fields() > 0 {
        debug!(
            skipped = reader.skipped_fields(),
            "ignoring leading fields before pulse lengths"
        );
    }

    let retained: Vec<u32> = slots
        .into_iter()
        .filter(|&length| length != layout::UNUSED_SLOT)
        .collect();
    if retained.is_empty() {
        return Err(SignalError::NoPulseLengths);
    }

    let ranks = rank_ascending(&retained);
    let tokens = rewrite_tokens(tokens, &ranks)?;
    let mut pulse_lengths = retained;
    pulse_lengths.sort_unstable();

    Ok(Signal {
        pulse_lengths,
        tokens,
    })
}

/// Rank of each slot in ascending order of length; ties keep slot order.
fn rank_ascending(lengths: &[u32]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..lengths.len()).collect();
    order.sort_by_key(|&slot| lengths[slot]);

    let mut ranks = vec![0; lengths.len()];
    for (rank, slot) in order.into_iter().enumerate() {
        ranks[slot] = rank;
    }
    ranks
}

fn rewrite_tokens(tokens: &str, ranks: &[usize]) -> Result<String, SignalError> {
    tokens
        .chars()
        .enumerate()
        .map(|(position, token)| {
            let index = token
                .to_digit(layout::TOKEN_RADIX)
                .ok_or(SignalError::InvalidToken { position, token })?
                as usize;
            let rank = ranks.get(index).ok_or(SignalError::DanglingToken {
                position,
                index,
                available: ranks.len(),
            })?;
            // At most SLOT_COUNT ranks, so always a single digit.
            Ok(char::from(b'0' + *rank as u8))
        })
        .collect()
}
