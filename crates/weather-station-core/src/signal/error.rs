use thiserror::Error;

/// Errors returned while normalizing a raw capture.
///
/// # Examples
/// ```
/// use weather_station_core::signal::{SignalError, normalize};
///
/// let err = normalize("516 2116 4152").unwrap_err();
/// assert_eq!(err, SignalError::TooFewFields { needed: 9, actual: 3 });
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    #[error("too few fields: need {needed}, got {actual}")]
    TooFewFields { needed: usize, actual: usize },
    #[error("invalid pulse length in slot {slot}: '{value}'")]
    InvalidPulseLength { slot: usize, value: String },
    #[error("no non-zero pulse length")]
    NoPulseLengths,
    #[error("invalid token '{token}' at position {position}")]
    InvalidToken { position: usize, token: char },
    #[error("token {index} at position {position} refers to none of the {available} pulse lengths")]
    DanglingToken {
        position: usize,
        index: usize,
        available: usize,
    },
}
