//! Segment scanning — digits, wildcards and ranges within one segment

use crate::digits::digit_value;
use crate::error::{AddressStringError, ErrorKey};
use crate::parse_data::{Bound, SegmentEntry, SegmentFlags};
use crate::params::{Ipv4FormatParams, Ipv6FormatParams, MacFormatParams, RangeParams};

/// The segment rules of one address family, flattened for the scanner.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SegmentFormat {
    pub(crate) range: RangeParams,
    pub(crate) range_separator: u8,
    pub(crate) radix: u32,
    pub(crate) leading_zeros: bool,
    pub(crate) binary: bool,
    pub(crate) inet_aton_hex: bool,
    pub(crate) inet_aton_octal: bool,
    pub(crate) inet_aton_leading_zeros: bool,
}

impl SegmentFormat {
    pub(crate) fn ipv4(params: &Ipv4FormatParams) -> Self {
        let format = params.format();
        Self {
            range: format.range(),
            range_separator: b'-',
            radix: 10,
            leading_zeros: format.allows_leading_zeros(),
            binary: format.allows_binary(),
            inet_aton_hex: params.allows_inet_aton_hex(),
            inet_aton_octal: params.allows_inet_aton_octal(),
            inet_aton_leading_zeros: params.allows_inet_aton_leading_zeros(),
        }
    }

    pub(crate) fn ipv6(params: &Ipv6FormatParams) -> Self {
        let format = params.format();
        Self {
            range: format.range(),
            range_separator: b'-',
            radix: 16,
            leading_zeros: format.allows_leading_zeros(),
            binary: format.allows_binary(),
            inet_aton_hex: false,
            inet_aton_octal: false,
            inet_aton_leading_zeros: false,
        }
    }

    pub(crate) fn mac(params: &MacFormatParams, range_separator: u8) -> Self {
        let format = params.format();
        Self {
            range: format.range(),
            range_separator,
            radix: 16,
            leading_zeros: format.allows_leading_zeros(),
            binary: false,
            inet_aton_hex: false,
            inet_aton_octal: false,
            inet_aton_leading_zeros: false,
        }
    }
}

/// Scan `text[start..end]` as one segment.
///
/// Upper bounds of `*` and of open ranges are left at zero; the structural
/// check fills them once the segment's width is known.
pub(crate) fn parse_segment(
    format: &SegmentFormat,
    text: &str,
    start: usize,
    end: usize,
) -> Result<SegmentEntry, AddressStringError> {
    let bytes = &text.as_bytes()[start..end];
    if bytes.is_empty() {
        return Err(AddressStringError::at(ErrorKey::EmptySegment, text, start));
    }

    if bytes == b"*" {
        if !format.range.allows_wildcard() {
            return Err(AddressStringError::at(ErrorKey::WildcardNotAllowed, text, start));
        }
        let bound = Bound {
            value: 0,
            start,
            digits_start: start,
            significant_start: start,
            end,
            radix: format.radix,
        };
        let mut entry = SegmentEntry::single(bound);
        entry.flags.wildcard = true;
        return Ok(entry);
    }
    if let Some(i) = bytes.iter().position(|&b| b == b'*') {
        let key = if format.range.allows_wildcard() {
            ErrorKey::InvalidWildcardPosition
        } else {
            ErrorKey::WildcardNotAllowed
        };
        return Err(AddressStringError::at(key, text, start + i));
    }

    let Some(split) = bytes.iter().position(|&b| b == format.range_separator) else {
        let (lower, upper) = parse_bound(format, text, start, end, true)?;
        let mut entry = SegmentEntry::single(lower);
        if let Some(upper) = upper {
            entry.upper.value = upper;
            entry.flags.single_wildcard = true;
        }
        return Ok(entry);
    };

    let sep = start + split;
    if !format.range.allows_range_separator() {
        return Err(AddressStringError::at(ErrorKey::RangeNotAllowed, text, sep));
    }
    if let Some(j) = bytes[split + 1..]
        .iter()
        .position(|&b| b == format.range_separator)
    {
        return Err(AddressStringError::at(
            ErrorKey::InvalidCharacter,
            text,
            sep + 1 + j,
        ));
    }

    let mut flags = SegmentFlags {
        range: true,
        ..SegmentFlags::default()
    };
    let lower = if sep == start {
        if !format.range.allows_inferred_boundary() {
            return Err(AddressStringError::at(
                ErrorKey::InferredBoundaryNotAllowed,
                text,
                start,
            ));
        }
        flags.inferred_lower = true;
        Bound::inferred(start, 0, format.radix)
    } else {
        parse_bound(format, text, start, sep, false)?.0
    };
    let upper = if sep + 1 == end {
        if !format.range.allows_inferred_boundary() {
            return Err(AddressStringError::at(
                ErrorKey::InferredBoundaryNotAllowed,
                text,
                sep,
            ));
        }
        flags.inferred_upper = true;
        Bound::inferred(end, 0, format.radix)
    } else {
        parse_bound(format, text, sep + 1, end, false)?.0
    };

    let (lower, upper) = if !flags.inferred_upper && lower.value > upper.value {
        if !format.range.allows_reverse_range() {
            return Err(AddressStringError::at(ErrorKey::InvalidRange, text, start));
        }
        (upper, lower)
    } else {
        (lower, upper)
    };
    Ok(SegmentEntry {
        lower,
        upper,
        flags,
    })
}

/// Scan one bound. Returns the bound and, for trailing `_` digits, the
/// upper value of the expanded range.
fn parse_bound(
    format: &SegmentFormat,
    text: &str,
    start: usize,
    end: usize,
    single_wildcard: bool,
) -> Result<(Bound, Option<u128>), AddressStringError> {
    let bytes = text.as_bytes();
    let (radix, digits_start) = select_radix(format, text, start, end)?;
    if digits_start == end {
        return Err(AddressStringError::at(
            ErrorKey::InvalidCharacter,
            text,
            end - 1,
        ));
    }

    let radix_wide = u128::from(radix);
    let mut value: u128 = 0;
    let mut first_nonzero = None;
    let mut wildcards: u32 = 0;
    for (pos, &b) in bytes.iter().enumerate().take(end).skip(digits_start) {
        if b == b'_' {
            if !single_wildcard {
                return Err(AddressStringError::at(
                    ErrorKey::InvalidWildcardPosition,
                    text,
                    pos,
                ));
            }
            if !format.range.allows_single_wildcard() {
                return Err(AddressStringError::at(
                    ErrorKey::SingleWildcardNotAllowed,
                    text,
                    pos,
                ));
            }
            wildcards += 1;
            continue;
        }
        if wildcards > 0 {
            return Err(AddressStringError::at(
                ErrorKey::InvalidWildcardPosition,
                text,
                pos - 1,
            ));
        }
        let digit = digit_value(b, radix)
            .ok_or_else(|| AddressStringError::at(ErrorKey::InvalidCharacter, text, pos))?;
        if digit != 0 && first_nonzero.is_none() {
            first_nonzero = Some(pos);
        }
        value = value
            .checked_mul(radix_wide)
            .and_then(|v| v.checked_add(u128::from(digit)))
            .ok_or_else(|| AddressStringError::at(ErrorKey::SegmentTooLarge, text, start))?;
    }

    let digits_end = end - wildcards as usize;
    let significant_start =
        first_nonzero.unwrap_or_else(|| digits_end.saturating_sub(1).max(digits_start));
    if significant_start > digits_start {
        let marked = digits_start > start && radix != 2;
        if marked && !format.inet_aton_leading_zeros {
            return Err(AddressStringError::at(
                ErrorKey::LeadingZerosNotAllowed,
                text,
                digits_start,
            ));
        }
        if !marked && !format.leading_zeros {
            return Err(AddressStringError::at(
                ErrorKey::LeadingZerosNotAllowed,
                text,
                start,
            ));
        }
    }

    let bound = Bound {
        value,
        start,
        digits_start,
        significant_start,
        end,
        radix,
    };
    if wildcards == 0 {
        return Ok((bound, None));
    }
    let too_large = || AddressStringError::at(ErrorKey::SegmentTooLarge, text, start);
    let span = radix_wide.checked_pow(wildcards).ok_or_else(too_large)?;
    let lower = value.checked_mul(span).ok_or_else(too_large)?;
    let upper = lower.checked_add(span - 1).ok_or_else(too_large)?;
    Ok((Bound { value: lower, ..bound }, Some(upper)))
}

/// Pick the radix from the bound's prefix. Returns the radix and the offset
/// of the first digit after any radix marker.
fn select_radix(
    format: &SegmentFormat,
    text: &str,
    start: usize,
    end: usize,
) -> Result<(u32, usize), AddressStringError> {
    let s = &text.as_bytes()[start..end];
    let marker = |c: u8| s.len() >= 2 && s[0] == b'0' && s[1].to_ascii_lowercase() == c;

    if format.radix == 10 {
        if marker(b'x') {
            if !format.inet_aton_hex {
                return Err(AddressStringError::at(ErrorKey::HexNotAllowed, text, start));
            }
            return Ok((16, start + 2));
        }
        if marker(b'b') {
            if !format.binary {
                return Err(AddressStringError::at(ErrorKey::BinaryNotAllowed, text, start));
            }
            return Ok((2, start + 2));
        }
        if format.inet_aton_octal && s.len() >= 2 && s[0] == b'0' && s[1].is_ascii_digit() {
            return Ok((8, start + 1));
        }
        return Ok((10, start));
    }

    // `0b11` is also valid hex; binary needs more digits than a hex segment holds.
    if format.binary
        && marker(b'b')
        && s.len() > 4
        && s[2..].iter().all(|b| matches!(b, b'0' | b'1' | b'_'))
    {
        return Ok((2, start + 2));
    }
    Ok((format.radix, start))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ipv4() -> SegmentFormat {
        SegmentFormat::ipv4(&Ipv4FormatParams::default())
    }

    fn inet_aton() -> SegmentFormat {
        SegmentFormat::ipv4(&Ipv4FormatParams::builder().allow_inet_aton(true).build())
    }

    fn ipv6() -> SegmentFormat {
        SegmentFormat::ipv6(&Ipv6FormatParams::default())
    }

    fn parse(format: &SegmentFormat, text: &str) -> Result<SegmentEntry, AddressStringError> {
        parse_segment(format, text, 0, text.len())
    }

    #[test]
    fn decimal_values() {
        for v in 0..=255u128 {
            let entry = parse(&ipv4(), &v.to_string()).unwrap();
            assert_eq!((entry.lower(), entry.upper()), (v, v));
            assert_eq!(entry.lower_bound().radix(), 10);
        }
    }

    #[test]
    fn leading_zeros_recorded() {
        let entry = parse(&ipv4(), "007").unwrap();
        assert_eq!(entry.lower(), 7);
        assert_eq!(entry.lower_bound().leading_zeros(), 2);
        assert_eq!(entry.lower_bound().digit_count(), 3);

        let strict = SegmentFormat {
            leading_zeros: false,
            ..ipv4()
        };
        let err = parse(&strict, "007").unwrap_err();
        assert_eq!(err.key(), ErrorKey::LeadingZerosNotAllowed);
        assert!(parse(&strict, "0").is_ok());
    }

    #[test]
    fn inet_aton_radixes() {
        assert_eq!(parse(&inet_aton(), "0x1f").unwrap().lower(), 31);
        assert_eq!(parse(&inet_aton(), "010").unwrap().lower(), 8);
        assert_eq!(parse(&ipv4(), "010").unwrap().lower(), 10);
        assert_eq!(parse(&ipv4(), "0b101").unwrap().lower(), 5);

        let err = parse(&ipv4(), "0x1f").unwrap_err();
        assert_eq!(err.key(), ErrorKey::HexNotAllowed);
        let err = parse(&inet_aton(), "08").unwrap_err();
        assert_eq!(err.key(), ErrorKey::InvalidCharacter);
        assert_eq!(err.index(), Some(1));
    }

    #[test]
    fn ipv6_binary_needs_length() {
        assert_eq!(parse(&ipv6(), "0b11").unwrap().lower(), 0x0b11);
        assert_eq!(parse(&ipv6(), "0b1010").unwrap().lower(), 0b1010);
    }

    #[test]
    fn wildcard() {
        let entry = parse(&ipv4(), "*").unwrap();
        assert!(entry.flags().wildcard);
        let err = parse(&ipv4(), "1*").unwrap_err();
        assert_eq!(err.key(), ErrorKey::InvalidWildcardPosition);

        let none = SegmentFormat {
            range: RangeParams::NO_RANGE,
            ..ipv4()
        };
        assert_eq!(
            parse(&none, "*").unwrap_err().key(),
            ErrorKey::WildcardNotAllowed
        );
    }

    #[test]
    fn single_wildcards_expand() {
        let entry = parse(&ipv4(), "1__").unwrap();
        assert_eq!((entry.lower(), entry.upper()), (100, 199));
        assert!(entry.flags().single_wildcard);

        let entry = parse(&ipv6(), "ab__").unwrap();
        assert_eq!((entry.lower(), entry.upper()), (0xab00, 0xabff));

        let err = parse(&ipv4(), "1_2").unwrap_err();
        assert_eq!(err.key(), ErrorKey::InvalidWildcardPosition);
    }

    #[test]
    fn ranges() {
        let entry = parse(&ipv4(), "10-20").unwrap();
        assert_eq!((entry.lower(), entry.upper()), (10, 20));
        assert!(entry.flags().range);

        let entry = parse(&ipv4(), "20-10").unwrap();
        assert_eq!((entry.lower(), entry.upper()), (10, 20));

        let entry = parse(&ipv4(), "-20").unwrap();
        assert!(entry.flags().inferred_lower);
        assert_eq!(entry.lower(), 0);

        let entry = parse(&ipv4(), "20-").unwrap();
        assert!(entry.flags().inferred_upper);

        let err = parse(&ipv4(), "1-2-3").unwrap_err();
        assert_eq!(err.key(), ErrorKey::InvalidCharacter);
        assert_eq!(err.index(), Some(3));
    }

    #[test]
    fn range_rules_enforced() {
        let wildcard_only = SegmentFormat {
            range: RangeParams::WILDCARD_ONLY,
            ..ipv4()
        };
        assert_eq!(
            parse(&wildcard_only, "1-2").unwrap_err().key(),
            ErrorKey::RangeNotAllowed
        );
        let no_reverse = SegmentFormat {
            range: RangeParams::builder().allow_reverse_range(false).build(),
            ..ipv4()
        };
        assert_eq!(
            parse(&no_reverse, "2-1").unwrap_err().key(),
            ErrorKey::InvalidRange
        );
        let explicit = SegmentFormat {
            range: RangeParams::builder().allow_inferred_boundary(false).build(),
            ..ipv4()
        };
        assert_eq!(
            parse(&explicit, "2-").unwrap_err().key(),
            ErrorKey::InferredBoundaryNotAllowed
        );
    }

    #[test]
    fn overflow_is_too_large() {
        let err = parse(&ipv4(), "9999999999999999999999999999999999999999999").unwrap_err();
        assert_eq!(err.key(), ErrorKey::SegmentTooLarge);
    }
}
