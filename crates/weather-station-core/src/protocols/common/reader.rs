use std::ops::{Range, RangeInclusive};

use super::error::FieldError;

/// Checked access to a string of `'0'`/`'1'` characters.
pub struct BitReader<'a> {
    bits: &'a [u8],
}

impl<'a> BitReader<'a> {
    pub fn new(bits: &'a str) -> Self {
        Self {
            bits: bits.as_bytes(),
        }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn require_len(&self, needed: usize) -> Result<(), FieldError> {
        if self.bits.len() < needed {
            return Err(FieldError::TooShort {
                needed,
                actual: self.bits.len(),
            });
        }
        Ok(())
    }

    pub fn read_bit(&self, offset: usize) -> Result<u8, FieldError> {
        let bit = self.bits.get(offset).copied().ok_or(FieldError::TooShort {
            needed: offset + 1,
            actual: self.bits.len(),
        })?;
        match bit {
            b'0' => Ok(0),
            b'1' => Ok(1),
            other => Err(FieldError::InvalidBit {
                offset,
                bit: char::from(other),
            }),
        }
    }

    /// Unsigned big-endian value of `bits[range]`.
    pub fn read_unsigned(&self, range: Range<usize>) -> Result<u64, FieldError> {
        self.require_len(range.end)?;
        (range.start..range.end).try_fold(0u64, |value, offset| -> Result<u64, FieldError> {
            Ok((value << 1) | u64::from(self.read_bit(offset)?))
        })
    }

    /// Signed value whose sign bit is at `range.start()`, followed by the
    /// magnitude bits through `range.end()` inclusive.
    ///
    /// A set sign bit seeds the accumulator with all ones, so each following
    /// bit is shifted into a sign-extended `i64`.
    pub fn read_signed(&self, range: RangeInclusive<usize>) -> Result<i64, FieldError> {
        let (sign_offset, last) = range.into_inner();
        self.require_len(sign_offset.max(last) + 1)?;

        let seed: i64 = if self.read_bit(sign_offset)? == 1 { -1 } else { 0 };
        (sign_offset + 1..=last).try_fold(seed, |value, offset| -> Result<i64, FieldError> {
            Ok((value << 1) | i64::from(self.read_bit(offset)?))
        })
    }

    pub fn read_flag(&self, offset: usize) -> Result<bool, FieldError> {
        Ok(self.read_bit(offset)? == 1)
    }
}
