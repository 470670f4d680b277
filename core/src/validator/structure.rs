//! Structural checks run once the segment count is known
//!
//! Decides how missing segments are accounted for (IPv6 compression,
//! wildcard separators, inet_aton joining), then fills deferred upper
//! bounds and re-checks every segment against the width it ended up with.

use crate::digits::{max_digit_count, max_value};
use crate::error::{AddressStringError, ErrorKey};
use crate::params::{FormatParams, IpAddressStringParams};
use crate::parse_data::{AddressParseData, ParsedIpAddress, SegmentEntry};
use crate::IpVersion;

pub(super) fn check(
    params: &IpAddressStringParams,
    text: &str,
    parsed: &mut ParsedIpAddress,
) -> Result<(), AddressStringError> {
    let Some(version) = parsed.version else {
        return Ok(());
    };
    let data = &mut parsed.data;
    if data.base85 {
        return Ok(());
    }
    match version {
        IpVersion::V4 => check_ipv4(params, text, data),
        IpVersion::V6 => check_ipv6(params, text, data),
    }
}

fn check_ipv4(
    params: &IpAddressStringParams,
    text: &str,
    data: &mut AddressParseData,
) -> Result<(), AddressStringError> {
    let format = params.ipv4();
    let expected = IpVersion::V4.segment_count();
    let count = data.segments.len();

    if let Some(extra) = data.segments.get(expected) {
        return Err(AddressStringError::at(
            ErrorKey::TooManySegments,
            text,
            extra.start(),
        ));
    }
    let missing = expected - count;
    if data.single_segment {
        if !format.allows_inet_aton_joined_segments() {
            return Err(AddressStringError::at(
                ErrorKey::TooFewSegments,
                text,
                data.end,
            ));
        }
    } else if missing > 0 {
        if let Some(index) = wildcard_separator(&format.format(), data) {
            data.wildcard_separator_index = Some(index);
            data.wildcard_separator_span = missing;
        } else if format.allows_inet_aton_joined_segments() {
            data.joined_missing = missing;
        } else {
            return Err(AddressStringError::at(
                ErrorKey::TooFewSegments,
                text,
                data.end,
            ));
        }
    }
    check_values(IpVersion::V4, &format.format(), text, data)
}

fn check_ipv6(
    params: &IpAddressStringParams,
    text: &str,
    data: &mut AddressParseData,
) -> Result<(), AddressStringError> {
    let format = params.ipv6();
    let expected = IpVersion::V6.segment_count();
    let mixed = if data.mixed.is_some() { 2 } else { 0 };
    let count = data.segments.len() + mixed;

    if data.single_segment {
        // one 128-bit segment
    } else if data.compressed_index.is_some() {
        if count >= expected {
            return Err(AddressStringError::at(
                ErrorKey::InvalidCompression,
                text,
                data.compressed_offset,
            ));
        }
    } else if count > expected {
        let at = data
            .segments
            .get(expected - mixed)
            .map_or(data.end, SegmentEntry::start);
        return Err(AddressStringError::at(ErrorKey::TooManySegments, text, at));
    } else if count < expected {
        let Some(index) = wildcard_separator(&format.format(), data) else {
            return Err(AddressStringError::at(
                ErrorKey::TooFewSegments,
                text,
                data.end,
            ));
        };
        data.wildcard_separator_index = Some(index);
        data.wildcard_separator_span = expected - count;
    }
    check_values(IpVersion::V6, &format.format(), text, data)
}

fn wildcard_separator(format: &FormatParams, data: &AddressParseData) -> Option<usize> {
    if !format.allows_wildcarded_separator() {
        return None;
    }
    data.segments.iter().position(SegmentEntry::is_full_wildcard)
}

/// Fill deferred upper bounds, then check digit lengths and values against
/// each segment's final width.
fn check_values(
    version: IpVersion,
    format: &FormatParams,
    text: &str,
    data: &mut AddressParseData,
) -> Result<(), AddressStringError> {
    let unlimited = format.allows_unlimited_leading_zeros();
    for index in 0..data.segments.len() {
        let bits = data.segment_bits(version, index);
        let max = max_value(bits);
        let seg = &mut data.segments.as_mut_slice()[index];

        if seg.flags.wildcard || seg.flags.inferred_upper {
            seg.upper.value = max;
        }
        if seg.flags.single_wildcard && only_single_wildcards(text, seg) {
            seg.upper.value = seg.upper.value.min(max);
        }

        if !seg.flags.wildcard {
            for bound in [&seg.lower, &seg.upper] {
                if bound.is_inferred() {
                    continue;
                }
                let digits = if unlimited {
                    bound.digit_count() - bound.leading_zeros()
                } else {
                    bound.digit_count()
                };
                if digits > max_digit_count(bound.radix, bits) {
                    return Err(AddressStringError::at(
                        ErrorKey::SegmentTooLong,
                        text,
                        bound.start,
                    ));
                }
            }
        }
        if seg.lower.value > max || seg.upper.value > max {
            return Err(AddressStringError::at(
                ErrorKey::SegmentTooLarge,
                text,
                seg.start(),
            ));
        }
        data.has_wildcard |= seg.is_multiple();
    }
    Ok(())
}

/// `___` covers the whole segment, so its upper bound is capped rather than rejected.
fn only_single_wildcards(text: &str, seg: &SegmentEntry) -> bool {
    text.as_bytes()
        .get(seg.lower.digits_start..seg.lower.end)
        .is_some_and(|digits| digits.iter().all(|&b| b == b'_'))
}
