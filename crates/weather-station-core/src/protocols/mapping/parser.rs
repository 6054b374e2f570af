use super::error::MappingError;

/// One rule of a code table: a token substring and the bits it stands for.
///
/// An empty `bits` string marks a sync or separator pulse pair that carries no
/// data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeEntry {
    pub tokens: &'static str,
    pub bits: &'static str,
}

impl CodeEntry {
    pub const fn new(tokens: &'static str, bits: &'static str) -> Self {
        Self { tokens, bits }
    }
}

/// Rewrite a token sequence into a binary string.
///
/// Scans left to right; at each position the first entry whose key starts
/// there wins and the cursor advances by the key length. Nothing is skipped:
/// a position no key covers fails the whole mapping.
///
/// # Examples
/// ```
/// use weather_station_core::protocols::mapping::{CodeEntry, map_tokens};
///
/// let table = [
///     CodeEntry::new("01", "0"),
///     CodeEntry::new("02", "1"),
///     CodeEntry::new("03", ""),
/// ];
/// assert_eq!(map_tokens("020101020201020201010103", &table).unwrap(), "10011011000");
/// ```
///
/// # Errors
/// Returns `MappingError::Unmapped` with the offset of the first uncovered
/// position.
pub fn map_tokens(tokens: &str, code_table: &[CodeEntry]) -> Result<String, MappingError> {
    let mut bits = String::with_capacity(tokens.len() / 2);
    let mut cursor = 0;

    while cursor < tokens.len() {
        let rest = &tokens[cursor..];
        let entry = code_table
            .iter()
            .find(|entry| !entry.tokens.is_empty() && rest.starts_with(entry.tokens))
            .ok_or_else(|| MappingError::Unmapped {
                offset: cursor,
                remaining: rest.to_string(),
            })?;
        bits.push_str(entry.bits);
        cursor += entry.tokens.len();
    }

    Ok(bits)
}
