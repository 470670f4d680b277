//! Base-85 decoding for RFC 1924 IPv6 addresses
//!
//! A base-85 address is exactly 20 characters; a range is two such strings
//! joined by `»`, and a zone follows `§` instead of `%` because `%` is part
//! of the alphabet.

use crate::digits::base85_value;

/// Characters in one base-85 IPv6 address.
pub const BASE85_LENGTH: usize = 20;

/// Range separator for base-85 ranges (`»`, U+00BB).
pub const BASE85_RANGE_SEPARATOR: char = '\u{bb}';

/// Zone separator for base-85 addresses (`§`, U+00A7).
pub const BASE85_ZONE_SEPARATOR: char = '\u{a7}';

/// Why a base-85 string failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Base85Error {
    /// Byte at this offset (relative to the input) is not in the alphabet.
    InvalidDigit(usize),
    /// The value exceeds 128 bits.
    Overflow,
}

/// Decode 20 base-85 characters to a 128-bit value.
///
/// The caller guarantees `digits.len() == BASE85_LENGTH`.
pub(crate) fn decode(digits: &[u8]) -> Result<u128, Base85Error> {
    digits.iter().enumerate().try_fold(0u128, |acc, (i, &b)| {
        let digit = base85_value(b).ok_or(Base85Error::InvalidDigit(i))?;
        acc.checked_mul(85)
            .and_then(|v| v.checked_add(u128::from(digit)))
            .ok_or(Base85Error::Overflow)
    })
}

/// Whether every byte of `digits` belongs to the base-85 alphabet.
#[must_use]
pub(crate) fn is_base85(digits: &[u8]) -> bool {
    digits.len() == BASE85_LENGTH && digits.iter().all(|&b| base85_value(b).is_some())
}
