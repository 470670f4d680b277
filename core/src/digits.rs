//! Digit tables — character to digit-value maps
//!
//! One table serves every radix from 2 to 16 (a digit is valid when its
//! value is below the radix); a second table maps the RFC 1924 base-85
//! alphabet.

/// Marker for bytes that are not digits.
const NO_DIGIT: u8 = 0xff;

/// RFC 1924 alphabet, in digit order.
pub(crate) const BASE85_ALPHABET: &[u8; 85] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz!#$%&()*+-;<=>?@^_`{|}~";

static HEX_VALUES: [u8; 128] = build_hex_table();
static BASE85_VALUES: [u8; 128] = build_base85_table();

const fn build_hex_table() -> [u8; 128] {
    let mut table = [NO_DIGIT; 128];
    let mut i = 0;
    while i < 10 {
        table[b'0' as usize + i] = i as u8;
        i += 1;
    }
    let mut i = 0;
    while i < 6 {
        table[b'a' as usize + i] = 10 + i as u8;
        table[b'A' as usize + i] = 10 + i as u8;
        i += 1;
    }
    table
}

const fn build_base85_table() -> [u8; 128] {
    let mut table = [NO_DIGIT; 128];
    let mut i = 0;
    while i < BASE85_ALPHABET.len() {
        table[BASE85_ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

/// Value of `b` as a digit in `radix` (2..=16).
#[must_use]
pub(crate) fn digit_value(b: u8, radix: u32) -> Option<u32> {
    let v = *HEX_VALUES.get(usize::from(b))?;
    (v != NO_DIGIT && u32::from(v) < radix).then_some(u32::from(v))
}

/// Value of `b` in the base-85 alphabet.
#[must_use]
pub(crate) fn base85_value(b: u8) -> Option<u32> {
    let v = *BASE85_VALUES.get(usize::from(b))?;
    (v != NO_DIGIT).then_some(u32::from(v))
}

#[must_use]
pub(crate) fn is_hex_digit(b: u8) -> bool {
    digit_value(b, 16).is_some()
}

/// Largest value representable in `bits` bits.
#[must_use]
pub(crate) fn max_value(bits: u32) -> u128 {
    if bits >= 128 {
        u128::MAX
    } else {
        (1u128 << bits) - 1
    }
}

/// Number of `radix` digits needed to write the largest `bits`-bit value.
///
/// IPv4 octets: 3 decimal, 3 octal, 2 hex, 8 binary. A full 32-bit single
/// segment: 10 decimal, 11 octal, 8 hex, 32 binary.
#[must_use]
pub(crate) fn max_digit_count(radix: u32, bits: u32) -> usize {
    let radix = u128::from(radix.max(2));
    let mut remaining = max_value(bits);
    let mut count = 1;
    while remaining >= radix {
        remaining /= radix;
        count += 1;
    }
    count
}
