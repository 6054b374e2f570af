use thiserror::Error;

/// Errors returned while extracting fields from a binary string.
///
/// # Examples
/// ```
/// use weather_station_core::protocols::common::{BitReader, FieldError};
///
/// let err = BitReader::new("1112").read_unsigned(0..4).unwrap_err();
/// assert_eq!(err, FieldError::InvalidBit { offset: 3, bit: '2' });
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("bit string too short: need {needed} bits, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error("invalid bit '{bit}' at offset {offset}")]
    InvalidBit { offset: usize, bit: char },
}
