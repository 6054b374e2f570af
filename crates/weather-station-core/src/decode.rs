//! Engine entry points.
//!
//! `decode` answers "what does this capture say": the measurement from the
//! first matching protocol that decodes cleanly. `candidates` answers "what
//! could this capture be": one outcome per matching protocol. Picking between
//! candidates is left to the caller (see `station`).

use thiserror::Error;
use tracing::debug;

use crate::Measurement;
use crate::matcher::matching_protocols;
use crate::protocols::common::FieldError;
use crate::protocols::mapping::{MappingError, map_tokens};
use crate::protocols::{ProtocolDescriptor, ProtocolRegistry};
use crate::signal::{Signal, SignalError, normalize};

/// Errors from a single decode attempt. None of them is fatal; the offending
/// capture is simply discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed capture: {0}")]
    InputFormat(#[from] SignalError),
    #[error("token mapping failed: {0}")]
    TokenMapping(#[from] MappingError),
    #[error("field parse failed: {0}")]
    FieldParse(#[from] FieldError),
}

impl DecodeError {
    /// Stable label used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeError::InputFormat(_) => "input_format",
            DecodeError::TokenMapping(_) => "token_mapping",
            DecodeError::FieldParse(_) => "field_parse",
        }
    }
}

/// A measurement and the protocol that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub protocol: &'static str,
    pub device: &'static str,
    pub measurement: Measurement,
}

/// Outcome of decoding a capture with one matching protocol.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub protocol: &'static str,
    pub device: &'static str,
    pub result: Result<Measurement, DecodeError>,
}

/// Map and decode an already-matched signal with `descriptor`.
pub fn decode_with(
    signal: &Signal,
    descriptor: &ProtocolDescriptor,
) -> Result<Measurement, DecodeError> {
    let bits = map_tokens(&signal.tokens, descriptor.code_table)?;
    Ok(descriptor.layout.decode(&bits)?)
}

/// Decoder bound to a protocol registry.
///
/// Decoding is pure; a `Decoder` can be copied freely and shared across
/// threads.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'r> {
    registry: &'r ProtocolRegistry,
}

impl Default for Decoder<'static> {
    fn default() -> Self {
        Self::new(ProtocolRegistry::builtin())
    }
}

impl<'r> Decoder<'r> {
    pub fn new(registry: &'r ProtocolRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r ProtocolRegistry {
        self.registry
    }

    /// Decode a raw capture.
    ///
    /// Returns `Ok(None)` when no protocol matches the signal.
    ///
    /// # Errors
    /// Returns `DecodeError::InputFormat` for a malformed capture. When
    /// protocols match but none decodes, returns the first protocol's error.
    pub fn decode(&self, raw: &str) -> Result<Option<Decoded>, DecodeError> {
        let signal = normalize(raw)?;
        self.decode_signal(&signal)
    }

    pub fn decode_signal(&self, signal: &Signal) -> Result<Option<Decoded>, DecodeError> {
        let mut first_error = None;
        for descriptor in matching_protocols(signal, self.registry) {
            match decode_with(signal, descriptor) {
                Ok(measurement) => {
                    return Ok(Some(Decoded {
                        protocol: descriptor.name,
                        device: descriptor.device,
                        measurement,
                    }));
                }
                Err(err) => {
                    debug!(protocol = descriptor.name, error = %err, "matching protocol failed to decode");
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(None),
        }
    }

    /// Decode a raw capture with every matching protocol.
    ///
    /// # Errors
    /// Returns `DecodeError::InputFormat` for a malformed capture; decoding
    /// failures of individual protocols are reported per candidate.
    pub fn candidates(&self, raw: &str) -> Result<Vec<Candidate>, DecodeError> {
        let signal = normalize(raw)?;
        Ok(self.candidates_signal(&signal))
    }

    pub fn candidates_signal(&self, signal: &Signal) -> Vec<Candidate> {
        matching_protocols(signal, self.registry)
            .into_iter()
            .map(|descriptor| Candidate {
                protocol: descriptor.name,
                device: descriptor.device,
                result: decode_with(signal, descriptor),
            })
            .collect()
    }
}

/// Decode a raw capture against the built-in protocols.
///
/// # Examples
/// ```
/// use weather_station_core::decode;
///
/// let raw = "616 1996 4048 9044 0 0 0 0 0102010202010202010101010101010102010202020102020102020102010202020102020103";
/// let decoded = decode(raw).unwrap().expect("matching protocol");
/// assert_eq!(decoded.protocol, "weather12");
/// assert_eq!(decoded.measurement.sensor_id, 91);
/// assert_eq!(decoded.measurement.temperature, 18.7);
/// ```
pub fn decode(raw: &str) -> Result<Option<Decoded>, DecodeError> {
    Decoder::default().decode(raw)
}

/// Enumerate the decodings of a raw capture under every matching built-in
/// protocol.
pub fn candidates(raw: &str) -> Result<Vec<Candidate>, DecodeError> {
    Decoder::default().candidates(raw)
}
