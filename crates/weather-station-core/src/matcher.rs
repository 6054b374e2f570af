//! Timing-template matching.
//!
//! A signal matches a descriptor when its token count is allowed, it has as
//! many pulse lengths as the template, and every observed length lies within
//! 40% of itself from the nominal one. The bound is relative to the observed
//! length, so it is not symmetric in observed/expected.

use tracing::trace;

use crate::protocols::{ProtocolDescriptor, ProtocolRegistry};
use crate::signal::Signal;

/// Allowed deviation as a fraction of the observed length (4/10).
pub const TOLERANCE_NUMERATOR: u64 = 4;
pub const TOLERANCE_DENOMINATOR: u64 = 10;

/// Check whether `signal` fits the timing profile of `descriptor`.
///
/// # Examples
/// ```
/// use weather_station_core::matcher::matches;
/// use weather_station_core::protocols::registry::WEATHER15;
/// use weather_station_core::signal::Signal;
///
/// let signal = Signal {
///     pulse_lengths: vec![516, 2116, 4152, 9112],
///     tokens: "01".repeat(37) + "03",
/// };
/// assert!(matches(&signal, &WEATHER15));
/// ```
pub fn matches(signal: &Signal, descriptor: &ProtocolDescriptor) -> bool {
    if !descriptor.token_lengths.contains(&signal.tokens.len()) {
        return false;
    }
    if signal.pulse_lengths.len() != descriptor.pulse_lengths.len() {
        return false;
    }
    signal
        .pulse_lengths
        .iter()
        .zip(descriptor.pulse_lengths)
        .all(|(&observed, &expected)| within_tolerance(observed, expected))
}

/// `|observed - expected| <= 0.4 * observed`, in exact integer arithmetic.
pub fn within_tolerance(observed: u32, expected: u32) -> bool {
    let delta = u64::from(observed.abs_diff(expected));
    delta * TOLERANCE_DENOMINATOR <= u64::from(observed) * TOLERANCE_NUMERATOR
}

/// Every descriptor of `registry` matching `signal`, in registry order.
///
/// More than one match is a normal outcome: protocol variants sharing a
/// timing profile cannot be told apart before decoding.
pub fn matching_protocols<'r>(
    signal: &Signal,
    registry: &'r ProtocolRegistry,
) -> Vec<&'r ProtocolDescriptor> {
    let matching: Vec<_> = registry
        .iter()
        .filter(|descriptor| matches(signal, descriptor))
        .collect();
    trace!(
        pulse_lengths = ?signal.pulse_lengths,
        tokens = signal.tokens.len(),
        matches = matching.len(),
        "matched signal against registry"
    );
    matching
}
