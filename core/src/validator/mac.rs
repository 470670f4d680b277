//! MAC address validation
//!
//! Notation is fixed by the separators present: `:` colon, `.` dotted
//! (`aabb.ccdd.eeff`), ` ` space, a single `-` single-dashed
//! (`aabbcc-ddeeff`), several `-` dashed, none a single segment. Dashed
//! forms use `|` as their range separator, everything else `-`.

use std::fmt;

use super::segment::{parse_segment, SegmentFormat};
use crate::digits::max_value;
use crate::error::{AddressStringError, ErrorKey};
use crate::params::{MacAddressStringParams, MacSize};
use crate::parse_data::{SegmentEntry, Segments};

/// How a MAC address string was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacFormat {
    /// `aa:bb:cc:dd:ee:ff`
    Colon,
    /// `aa-bb-cc-dd-ee-ff`
    Dash,
    /// `aabbcc-ddeeff`
    SingleDash,
    /// `aabb.ccdd.eeff`
    Dotted,
    /// `aa bb cc dd ee ff`
    Space,
    /// `aabbccddeeff`
    SingleSegment,
}

impl MacFormat {
    #[must_use]
    pub fn separator(self) -> Option<u8> {
        match self {
            Self::Colon => Some(b':'),
            Self::Dash | Self::SingleDash => Some(b'-'),
            Self::Dotted => Some(b'.'),
            Self::Space => Some(b' '),
            Self::SingleSegment => None,
        }
    }

    fn range_separator(self) -> u8 {
        match self {
            Self::Dash | Self::SingleDash => b'|',
            _ => b'-',
        }
    }

    fn from_text(bytes: &[u8]) -> Self {
        let has = |c: u8| bytes.contains(&c);
        if has(b':') {
            Self::Colon
        } else if has(b'.') {
            Self::Dotted
        } else if has(b' ') {
            Self::Space
        } else if bytes.iter().filter(|&&b| b == b'-').count() == 1 {
            Self::SingleDash
        } else if has(b'-') {
            Self::Dash
        } else {
            Self::SingleSegment
        }
    }

    fn allowed(self, params: &MacAddressStringParams) -> bool {
        match self {
            Self::Colon => params.allows_colon_delimited(),
            Self::Dash => params.allows_dashed(),
            Self::SingleDash => params.allows_single_dashed(),
            Self::Dotted => params.allows_dotted(),
            Self::Space => params.allows_space_delimited(),
            Self::SingleSegment => params.allows_single_segment(),
        }
    }
}

impl fmt::Display for MacFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Colon => "colon",
            Self::Dash => "dash",
            Self::SingleDash => "single-dash",
            Self::Dotted => "dotted",
            Self::Space => "space",
            Self::SingleSegment => "single-segment",
        };
        f.write_str(name)
    }
}

/// A validated MAC address string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParsedMacAddress {
    format: Option<MacFormat>,
    segments: Segments,
    widths: [u32; 8],
    bit_count: Option<u32>,
    all: bool,
}

impl ParsedMacAddress {
    fn empty() -> Self {
        Self {
            format: None,
            segments: Segments::default(),
            widths: [0; 8],
            bit_count: None,
            all: false,
        }
    }

    /// `None` for the empty and all-addresses strings.
    #[must_use]
    pub fn format(&self) -> Option<MacFormat> {
        self.format
    }

    #[must_use]
    pub fn segments(&self) -> &[SegmentEntry] {
        self.segments.as_slice()
    }

    /// Width in bits of segment `index`.
    #[must_use]
    pub fn segment_bits(&self, index: usize) -> u32 {
        self.widths.get(index).copied().unwrap_or(0)
    }

    /// 48 or 64; `None` when empty, or `*` under [`MacSize::Any`].
    #[must_use]
    pub fn bit_count(&self) -> Option<u32> {
        self.bit_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.format.is_none() && !self.all
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        self.all
    }

    #[must_use]
    pub fn is_multiple(&self) -> bool {
        self.all || self.segments.iter().any(SegmentEntry::is_multiple)
    }

    #[must_use]
    pub fn lower_value(&self) -> Option<u64> {
        if self.all {
            return Some(0);
        }
        self.fold(SegmentEntry::lower)
    }

    #[must_use]
    pub fn upper_value(&self) -> Option<u64> {
        if self.all {
            return self.bit_count.and_then(|bits| u64::try_from(max_value(bits)).ok());
        }
        self.fold(SegmentEntry::upper)
    }

    fn fold(&self, bound: impl Fn(&SegmentEntry) -> u128) -> Option<u64> {
        if self.is_empty() {
            return None;
        }
        let value = self
            .segments
            .iter()
            .zip(self.widths)
            .fold(0u128, |acc, (seg, bits)| (acc << bits) | bound(seg));
        u64::try_from(value).ok()
    }
}

/// Validate a MAC address string.
///
/// ```
/// use ipstr::{validate_mac_address, MacAddressStringParams, MacFormat};
///
/// let mac = validate_mac_address(&MacAddressStringParams::default(), "0a:1b:2c:3d:4e:5f")?;
/// assert_eq!(mac.format(), Some(MacFormat::Colon));
/// assert_eq!(mac.bit_count(), Some(48));
/// assert_eq!(mac.lower_value(), Some(0x0a1b_2c3d_4e5f));
/// # Ok::<(), ipstr::AddressStringError>(())
/// ```
///
/// # Errors
///
/// Returns the first rule the string violates.
pub fn validate_mac_address(
    params: &MacAddressStringParams,
    text: &str,
) -> Result<ParsedMacAddress, AddressStringError> {
    let err = |key, at| AddressStringError::at(key, text, at);
    if text.is_empty() {
        if !params.allows_empty() {
            return Err(err(ErrorKey::EmptyNotAllowed, 0));
        }
        return Ok(ParsedMacAddress::empty());
    }
    if text == "*" {
        if !params.allows_all() {
            return Err(err(ErrorKey::AllNotAllowed, 0));
        }
        let bit_count = match params.address_size() {
            MacSize::Mac48 => Some(48),
            MacSize::Eui64 => Some(64),
            MacSize::Any => None,
        };
        return Ok(ParsedMacAddress {
            bit_count,
            all: true,
            ..ParsedMacAddress::empty()
        });
    }

    let bytes = text.as_bytes();
    let format = MacFormat::from_text(bytes);
    if !format.allowed(params) {
        return Err(err(ErrorKey::MacFormatNotAllowed, 0));
    }
    if let Some(at) = bytes
        .iter()
        .position(|&b| matches!(b, b':' | b'.' | b' ') && Some(b) != format.separator())
    {
        return Err(err(ErrorKey::MixedSeparators, at));
    }

    let segment_format = SegmentFormat::mac(&params.format(), format.range_separator());
    let limit = segment_limit(format, params.address_size());
    let mut entries = Vec::with_capacity(limit);
    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if Some(b) == format.separator() {
            if entries.len() == limit - 1 {
                return Err(err(ErrorKey::TooManySegments, i + 1));
            }
            entries.push(parse_segment(&segment_format, text, start, i)?);
            start = i + 1;
        }
    }
    entries.push(parse_segment(&segment_format, text, start, text.len())?);

    let widths = layout(params, format, text, &mut entries)?;
    let bit_count: u32 = widths.iter().sum();
    if !params.address_size().allows_bits(bit_count) {
        let key = if bit_count > 48 {
            ErrorKey::TooManySegments
        } else {
            ErrorKey::TooFewSegments
        };
        return Err(err(key, 0));
    }

    let short_ok = params.format().allows_short_segments()
        && matches!(format, MacFormat::Colon | MacFormat::Dash | MacFormat::Space);
    let mut segments = Segments::default();
    let mut segment_widths = [0; 8];
    for (index, (mut entry, bits)) in entries.into_iter().zip(widths.iter().copied()).enumerate() {
        check_segment(&mut entry, bits, short_ok, text)?;
        if !segments.push(entry) {
            return Err(err(ErrorKey::TooManySegments, entry.start()));
        }
        segment_widths[index] = bits;
    }

    Ok(ParsedMacAddress {
        format: Some(format),
        segments,
        widths: segment_widths,
        bit_count: Some(bit_count),
        all: false,
    })
}

/// Most segments `format` may have under `size`.
fn segment_limit(format: MacFormat, size: MacSize) -> usize {
    let per = match format {
        MacFormat::SingleSegment => return 1,
        MacFormat::SingleDash => return 2,
        MacFormat::Dotted => 16,
        MacFormat::Colon | MacFormat::Dash | MacFormat::Space => 8,
    };
    let bits = if size == MacSize::Mac48 { 48 } else { 64 };
    bits / per
}

/// Settle the segment count and each segment's width, expanding a
/// wildcarded separator where segments are missing.
fn layout(
    params: &MacAddressStringParams,
    format: MacFormat,
    text: &str,
    entries: &mut Vec<SegmentEntry>,
) -> Result<Vec<u32>, AddressStringError> {
    let size = params.address_size();
    match format {
        MacFormat::SingleSegment => {
            let digits = bound_digits(&entries[0]);
            let bits = match digits {
                Some(12) => 48,
                Some(16) => 64,
                None if size == MacSize::Eui64 => 64,
                None => 48,
                Some(n) if n > 16 => {
                    return Err(AddressStringError::at(ErrorKey::SegmentTooLong, text, 0));
                }
                Some(_) => {
                    return Err(AddressStringError::at(ErrorKey::SegmentTooShort, text, 0));
                }
            };
            Ok(vec![bits])
        }
        MacFormat::SingleDash => {
            let right = &entries[1];
            let bits = match bound_digits(right) {
                Some(6) => 24,
                Some(10) => 40,
                None if size == MacSize::Eui64 => 40,
                None => 24,
                Some(n) if n > 10 => {
                    return Err(AddressStringError::at(
                        ErrorKey::SegmentTooLong,
                        text,
                        right.start(),
                    ));
                }
                Some(_) => {
                    return Err(AddressStringError::at(
                        ErrorKey::SegmentTooShort,
                        text,
                        right.start(),
                    ));
                }
            };
            Ok(vec![24, bits])
        }
        MacFormat::Colon | MacFormat::Dash | MacFormat::Space | MacFormat::Dotted => {
            let small = segment_limit(format, MacSize::Mac48);
            let large = segment_limit(format, MacSize::Eui64);
            let count = entries.len();
            let limit = segment_limit(format, size);
            let per: u32 = if format == MacFormat::Dotted { 16 } else { 8 };
            if count > limit {
                return Err(AddressStringError::at(
                    ErrorKey::TooManySegments,
                    text,
                    entries[limit].start(),
                ));
            }
            let target = if count > small || size == MacSize::Eui64 {
                large
            } else {
                small
            };
            if count < target {
                let wildcard = params
                    .format()
                    .format()
                    .allows_wildcarded_separator()
                    .then(|| entries.iter().position(SegmentEntry::is_full_wildcard))
                    .flatten();
                let Some(index) = wildcard else {
                    return Err(AddressStringError::at(
                        ErrorKey::TooFewSegments,
                        text,
                        text.len(),
                    ));
                };
                let filler = entries[index];
                for _ in count..target {
                    entries.insert(index, filler);
                }
            }
            Ok(vec![per; target])
        }
    }
}

/// Digits in the longest written bound, `None` for `*`.
fn bound_digits(entry: &SegmentEntry) -> Option<usize> {
    if entry.flags().wildcard {
        return None;
    }
    [entry.lower_bound(), entry.upper_bound()]
        .into_iter()
        .filter(|b| !b.is_inferred())
        .map(|b| b.digit_count())
        .max()
}

fn check_segment(
    entry: &mut SegmentEntry,
    bits: u32,
    short_ok: bool,
    text: &str,
) -> Result<(), AddressStringError> {
    let max = max_value(bits);
    if entry.flags.wildcard || entry.flags.inferred_upper {
        entry.upper.value = max;
    }
    if entry.flags.single_wildcard {
        entry.upper.value = entry.upper.value.min(max);
    }
    if !entry.flags.wildcard {
        let digits = (bits / 4) as usize;
        for bound in [&entry.lower, &entry.upper] {
            if bound.is_inferred() {
                continue;
            }
            if bound.digit_count() > digits {
                return Err(AddressStringError::at(
                    ErrorKey::SegmentTooLong,
                    text,
                    bound.start,
                ));
            }
            if bound.digit_count() < digits && !short_ok {
                return Err(AddressStringError::at(
                    ErrorKey::SegmentTooShort,
                    text,
                    bound.start,
                ));
            }
        }
    }
    if entry.lower.value > max || entry.upper.value > max {
        return Err(AddressStringError::at(
            ErrorKey::SegmentTooLarge,
            text,
            entry.start(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{MacFormatParams, RangeParams};

    fn parse(text: &str) -> Result<ParsedMacAddress, AddressStringError> {
        validate_mac_address(&MacAddressStringParams::default(), text)
    }

    #[test]
    fn every_notation_denotes_the_same_address() {
        for text in [
            "0a:1b:2c:3d:4e:5f",
            "0a-1b-2c-3d-4e-5f",
            "0a 1b 2c 3d 4e 5f",
            "0a1b.2c3d.4e5f",
            "0a1b2c-3d4e5f",
            "0a1b2c3d4e5f",
        ] {
            let mac = parse(text).unwrap();
            assert_eq!(mac.bit_count(), Some(48), "{text}");
            assert_eq!(mac.lower_value(), Some(0x0a1b_2c3d_4e5f), "{text}");
        }
    }

    #[test]
    fn formats_detected() {
        assert_eq!(parse("0a:1b:2c:3d:4e:5f").unwrap().format(), Some(MacFormat::Colon));
        assert_eq!(parse("0a-1b-2c-3d-4e-5f").unwrap().format(), Some(MacFormat::Dash));
        assert_eq!(parse("0a1b2c-3d4e5f").unwrap().format(), Some(MacFormat::SingleDash));
        assert_eq!(parse("0a1b.2c3d.4e5f").unwrap().format(), Some(MacFormat::Dotted));
        assert_eq!(parse("0a1b2c3d4e5f").unwrap().format(), Some(MacFormat::SingleSegment));
    }

    #[test]
    fn eui64_forms() {
        let mac = parse("00:11:22:33:44:55:66:77").unwrap();
        assert_eq!(mac.bit_count(), Some(64));
        assert_eq!(mac.segments().len(), 8);
        assert_eq!(mac.lower_value(), Some(0x0011_2233_4455_6677));

        assert_eq!(parse("0011.2233.4455.6677").unwrap().bit_count(), Some(64));
        assert_eq!(parse("001122-3344556677").unwrap().bit_count(), Some(64));
        assert_eq!(parse("0011223344556677").unwrap().bit_count(), Some(64));
    }

    #[test]
    fn segment_counts() {
        assert_eq!(parse("0a:1b:2c:3d:4e").unwrap_err().key(), ErrorKey::TooFewSegments);
        assert_eq!(
            parse("0:1:2:3:4:5:6:7:8").unwrap_err().key(),
            ErrorKey::TooManySegments
        );
        // seven segments need an eighth
        assert_eq!(
            parse("0:1:2:3:4:5:6").unwrap_err().key(),
            ErrorKey::TooFewSegments
        );
    }

    #[test]
    fn segment_scan_stops_at_limit() {
        let text = format!("{}0", "0:".repeat(10_000));
        let err = parse(&text).unwrap_err();
        assert_eq!(err.key(), ErrorKey::TooManySegments);
        assert_eq!(err.index(), Some(16));

        // a bad segment past the limit is never read
        let err = parse("0:1:2:3:4:5:6:7:8:zz").unwrap_err();
        assert_eq!(err.key(), ErrorKey::TooManySegments);

        let err = parse("0:1:2:3:4:5:6:7:8:9").unwrap_err();
        assert_eq!(err.key(), ErrorKey::TooManySegments);
        assert_eq!(err.index(), Some(16));

        let err = parse("0.1.2.3.4").unwrap_err();
        assert_eq!(err.key(), ErrorKey::TooManySegments);
        assert_eq!(err.index(), Some(8));
    }

    #[test]
    fn address_size_restricts() {
        let params = MacAddressStringParams::builder()
            .address_size(MacSize::Mac48)
            .build();
        let err = validate_mac_address(&params, "0:1:2:3:4:5:6:7").unwrap_err();
        assert_eq!(err.key(), ErrorKey::TooManySegments);
        assert_eq!(err.index(), Some(12));

        let params = MacAddressStringParams::builder()
            .address_size(MacSize::Eui64)
            .build();
        let err = validate_mac_address(&params, "0:1:2:3:4:5").unwrap_err();
        assert_eq!(err.key(), ErrorKey::TooFewSegments);
    }

    #[test]
    fn short_segments() {
        let mac = parse("a:b:c:d:e:f").unwrap();
        assert_eq!(mac.lower_value(), Some(0x0a0b_0c0d_0e0f));

        let params = MacAddressStringParams::builder()
            .format(MacFormatParams::builder().allow_short_segments(false).build())
            .build();
        let err = validate_mac_address(&params, "a:bb:cc:dd:ee:ff").unwrap_err();
        assert_eq!(err.key(), ErrorKey::SegmentTooShort);
        assert_eq!(err.index(), Some(0));

        assert_eq!(parse("a1b.2c3d.4e5f").unwrap_err().key(), ErrorKey::SegmentTooShort);
        assert_eq!(parse("abc:1:2:3:4:5").unwrap_err().key(), ErrorKey::SegmentTooLong);
    }

    #[test]
    fn mixed_separators_rejected() {
        let err = parse("0a:1b.2c3d:4e:5f").unwrap_err();
        assert_eq!(err.key(), ErrorKey::MixedSeparators);
        assert_eq!(err.index(), Some(5));
    }

    #[test]
    fn disallowed_format() {
        let params = MacAddressStringParams::builder().allow_dotted(false).build();
        let err = validate_mac_address(&params, "0a1b.2c3d.4e5f").unwrap_err();
        assert_eq!(err.key(), ErrorKey::MacFormatNotAllowed);
    }

    #[test]
    fn ranges_use_family_separator() {
        let mac = parse("0a:1b:2c:3d:4e:00-7f").unwrap();
        assert!(mac.is_multiple());
        assert_eq!(mac.upper_value(), Some(0x0a1b_2c3d_4e7f));

        let mac = parse("0a-1b-2c-3d-4e-00|7f").unwrap();
        assert_eq!(mac.upper_value(), Some(0x0a1b_2c3d_4e7f));
    }

    #[test]
    fn wildcards() {
        let mac = parse("0a:1b:2c:*:4e:5f").unwrap();
        assert_eq!(mac.lower_value(), Some(0x0a1b_2c00_4e5f));
        assert_eq!(mac.upper_value(), Some(0x0a1b_2cff_4e5f));

        let mac = parse("0a:1b:*").unwrap();
        assert_eq!(mac.segments().len(), 6);
        assert_eq!(mac.lower_value(), Some(0x0a1b_0000_0000));
        assert_eq!(mac.upper_value(), Some(0x0a1b_ffff_ffff));

        let params = MacAddressStringParams::builder()
            .range(RangeParams::NO_RANGE)
            .build();
        let err = validate_mac_address(&params, "0a:1b:2c:*:4e:5f").unwrap_err();
        assert_eq!(err.key(), ErrorKey::WildcardNotAllowed);
    }

    #[test]
    fn empty_and_all() {
        assert!(parse("").unwrap().is_empty());
        let all = parse("*").unwrap();
        assert!(all.is_all());
        assert_eq!(all.bit_count(), None);

        let params = MacAddressStringParams::builder()
            .allow_empty(false)
            .allow_all(false)
            .build();
        assert_eq!(
            validate_mac_address(&params, "").unwrap_err().key(),
            ErrorKey::EmptyNotAllowed
        );
        assert_eq!(
            validate_mac_address(&params, "*").unwrap_err().key(),
            ErrorKey::AllNotAllowed
        );
    }

    #[test]
    fn invalid_digits() {
        let err = parse("0a:1b:2c:3d:4e:5g").unwrap_err();
        assert_eq!(err.key(), ErrorKey::InvalidCharacter);
        assert_eq!(err.index(), Some(16));
    }
}
