//! Validator — scans address strings into [`ParsedIpAddress`] records
//!
//! One left-to-right pass over `text[start..end]`. The first separator
//! fixes the family (`.` IPv4, `:` IPv6); a `.` after IPv6 segments starts
//! the embedded IPv4 section, parsed as a nested address. Failure returns
//! at the first offending byte; nothing partial is kept.

mod mac;
mod segment;
mod structure;

pub use mac::{validate_mac_address, MacFormat, ParsedMacAddress};
use segment::{parse_segment, SegmentFormat};

use crate::base85::{self, Base85Error, BASE85_LENGTH, BASE85_RANGE_SEPARATOR, BASE85_ZONE_SEPARATOR};
use crate::error::{AddressStringError, ErrorKey};
use crate::params::IpAddressStringParams;
use crate::parse_data::{AddressParseData, Bound, ParsedIpAddress, SegmentEntry, SegmentFlags};
use crate::qualifier::{parse_qualifier, Qualifier};
use crate::IpVersion;

/// Validate the bare address `text[start..end]`, with no qualifier.
///
/// Offsets in errors are relative to the whole of `text`.
///
/// # Errors
///
/// Returns the first rule the substring violates.
pub fn validate_address(
    params: &IpAddressStringParams,
    text: &str,
    start: usize,
    end: usize,
) -> Result<ParsedIpAddress, AddressStringError> {
    let parsed = parse_body(params, text, start, end)?;
    if parsed.is_empty() && !params.allows_empty() {
        return Err(AddressStringError::at(ErrorKey::EmptyNotAllowed, text, start));
    }
    Ok(parsed)
}

/// Validate a whole address string: the address and its `/prefix`,
/// `/mask` or `%zone` qualifier.
///
/// ```
/// use ipstr::{validate_ip_address_string, IpAddressStringParams, IpVersion};
///
/// let (address, qualifier) =
///     validate_ip_address_string(&IpAddressStringParams::default(), "fe80::1%eth0/64")?;
/// assert_eq!(address.version(), Some(IpVersion::V6));
/// assert_eq!(qualifier.zone(), Some("eth0"));
/// assert_eq!(qualifier.prefix_len(), Some(64));
/// # Ok::<(), ipstr::AddressStringError>(())
/// ```
///
/// # Errors
///
/// Returns the first rule the string violates.
pub fn validate_ip_address_string(
    params: &IpAddressStringParams,
    text: &str,
) -> Result<(ParsedIpAddress, Qualifier), AddressStringError> {
    parse_address_string(params, text, 0, text.len())
}

pub(crate) fn parse_address_string(
    params: &IpAddressStringParams,
    text: &str,
    start: usize,
    end: usize,
) -> Result<(ParsedIpAddress, Qualifier), AddressStringError> {
    let body_end = body_end(params, text, start, end);
    let parsed = parse_body(params, text, start, body_end)?;
    let qualifier = if body_end < end {
        parse_qualifier(params, text, body_end, end, parsed.version())?
    } else {
        Qualifier::default()
    };
    check_address_only_rules(params, text, start, &parsed, &qualifier)?;
    Ok((parsed, qualifier))
}

/// Rules that depend on the body and qualifier together.
fn check_address_only_rules(
    params: &IpAddressStringParams,
    text: &str,
    start: usize,
    parsed: &ParsedIpAddress,
    qualifier: &Qualifier,
) -> Result<(), AddressStringError> {
    if parsed.version().is_none() {
        if let Some(version) = qualifier.implied_version() {
            if !params.allows_version(version) {
                return Err(AddressStringError::at(not_allowed(version), text, start));
            }
        }
    }
    if !parsed.is_empty() {
        return Ok(());
    }
    if qualifier.zone().is_some() {
        return Err(AddressStringError::at(
            ErrorKey::QualifierWithoutAddress,
            text,
            start,
        ));
    }
    if qualifier.prefix_len().is_some() || qualifier.mask().is_some() {
        if !params.allows_prefix_only() {
            return Err(AddressStringError::at(
                ErrorKey::PrefixOnlyNotAllowed,
                text,
                start,
            ));
        }
        if qualifier.network_prefix_len().is_none() {
            return Err(AddressStringError::at(ErrorKey::InvalidMask, text, start + 1));
        }
        return Ok(());
    }
    if !params.allows_empty() {
        return Err(AddressStringError::at(ErrorKey::EmptyNotAllowed, text, start));
    }
    Ok(())
}

/// Where the address body ends and the qualifier begins.
fn body_end(params: &IpAddressStringParams, text: &str, start: usize, end: usize) -> usize {
    let bytes = &text.as_bytes()[start..end];
    let slash = bytes
        .iter()
        .position(|&b| b == b'/')
        .map_or(end, |i| start + i);
    if allows_base85(params) {
        let zone = find_char(&bytes[..slash - start], BASE85_ZONE_SEPARATOR).map_or(slash, |i| start + i);
        if looks_like_base85(&text.as_bytes()[start..zone]) {
            return zone;
        }
    }
    bytes[..slash - start]
        .iter()
        .position(|&b| b == b'%')
        .map_or(slash, |i| start + i)
}

fn allows_base85(params: &IpAddressStringParams) -> bool {
    params.ipv6().allows_base85() && params.allows_ipv6()
}

fn find_char(bytes: &[u8], c: char) -> Option<usize> {
    let mut buf = [0u8; 4];
    let needle = c.encode_utf8(&mut buf).as_bytes();
    bytes.windows(needle.len()).position(|w| w == needle)
}

/// 20 base-85 characters, or two such runs joined by `»`.
fn looks_like_base85(body: &[u8]) -> bool {
    if base85::is_base85(body) {
        return true;
    }
    let mut buf = [0u8; 4];
    let sep = BASE85_RANGE_SEPARATOR.encode_utf8(&mut buf).as_bytes();
    body.len() == 2 * BASE85_LENGTH + sep.len()
        && base85::is_base85(&body[..BASE85_LENGTH])
        && &body[BASE85_LENGTH..BASE85_LENGTH + sep.len()] == sep
        && base85::is_base85(&body[BASE85_LENGTH + sep.len()..])
}

/// Scan and structurally check `text[start..end]`. Empty bodies succeed
/// here; the callers decide whether empty is allowed.
pub(crate) fn parse_body(
    params: &IpAddressStringParams,
    text: &str,
    start: usize,
    end: usize,
) -> Result<ParsedIpAddress, AddressStringError> {
    if start > end || end > text.len() {
        return Err(AddressStringError::at(
            ErrorKey::InvalidCharacter,
            text,
            start.min(text.len()),
        ));
    }
    if start == end {
        return Ok(ParsedIpAddress::empty(start));
    }
    let scanned = Scanner {
        params,
        text,
        start,
        end,
    }
    .scan()
    .and_then(|mut parsed| {
        structure::check(params, text, &mut parsed)?;
        Ok(parsed)
    });

    // The base-85 alphabet overlaps range and wildcard notation, so base 85
    // is only a fallback for bodies the segment scanner cannot read.
    let body = &text.as_bytes()[start..end];
    if scanned.is_ok() || !looks_like_base85(body) || body.iter().all(u8::is_ascii_digit) {
        return scanned;
    }
    if !allows_base85(params) {
        return Err(AddressStringError::at(ErrorKey::Base85NotAllowed, text, start));
    }
    parse_base85(params, text, start, end)
}

fn parse_base85(
    params: &IpAddressStringParams,
    text: &str,
    start: usize,
    end: usize,
) -> Result<ParsedIpAddress, AddressStringError> {
    let decode = |at: usize| {
        base85::decode(&text.as_bytes()[at..at + BASE85_LENGTH]).map_err(|e| match e {
            Base85Error::InvalidDigit(i) => {
                AddressStringError::at(ErrorKey::InvalidCharacter, text, at + i)
            }
            Base85Error::Overflow => AddressStringError::at(ErrorKey::SegmentTooLarge, text, at),
        })
    };
    let bound = |at: usize, value: u128| Bound {
        value,
        start: at,
        digits_start: at,
        significant_start: at,
        end: at + BASE85_LENGTH,
        radix: 85,
    };

    let lower = bound(start, decode(start)?);
    let mut entry = SegmentEntry::single(lower);
    if end - start > BASE85_LENGTH {
        let range = params.ipv6().format().range();
        if !range.allows_range_separator() {
            return Err(AddressStringError::at(
                ErrorKey::RangeNotAllowed,
                text,
                start + BASE85_LENGTH,
            ));
        }
        let upper_start = end - BASE85_LENGTH;
        let upper = bound(upper_start, decode(upper_start)?);
        let (lower, upper) = if lower.value > upper.value {
            if !range.allows_reverse_range() {
                return Err(AddressStringError::at(ErrorKey::InvalidRange, text, start));
            }
            (upper, lower)
        } else {
            (lower, upper)
        };
        entry = SegmentEntry {
            lower,
            upper,
            flags: SegmentFlags {
                range: true,
                ..SegmentFlags::default()
            },
        };
    }

    let mut data = AddressParseData::new(start, end);
    data.base85 = true;
    data.single_segment = true;
    data.has_wildcard = entry.is_multiple();
    data.segments.push(entry);
    Ok(ParsedIpAddress {
        version: Some(IpVersion::V6),
        data,
    })
}

struct Scanner<'a> {
    params: &'a IpAddressStringParams,
    text: &'a str,
    start: usize,
    end: usize,
}

impl Scanner<'_> {
    fn error(&self, key: ErrorKey, at: usize) -> AddressStringError {
        AddressStringError::at(key, self.text, at)
    }

    fn scan(&self) -> Result<ParsedIpAddress, AddressStringError> {
        let bytes = self.text.as_bytes();
        let mut data = AddressParseData::new(self.start, self.end);
        let mut version = None;
        let mut seg_start = self.start;
        let mut i = self.start;

        while i < self.end {
            match bytes[i] {
                b'.' => {
                    if version == Some(IpVersion::V6) {
                        data.mixed = Some(Box::new(self.parse_mixed(seg_start)?));
                        seg_start = self.end;
                        break;
                    }
                    if version.is_none() {
                        version = Some(self.require(IpVersion::V4, i)?);
                    }
                    self.push_segment(&mut data, IpVersion::V4, seg_start, i)?;
                    seg_start = i + 1;
                }
                b':' => {
                    match version {
                        Some(IpVersion::V4) => {
                            return Err(self.error(ErrorKey::InvalidCharacter, i));
                        }
                        None => version = Some(self.require(IpVersion::V6, i)?),
                        Some(IpVersion::V6) => {}
                    }
                    if i + 1 < self.end && bytes[i + 1] == b':' {
                        if data.compressed_index.is_some() {
                            return Err(self.error(ErrorKey::InvalidCompression, i));
                        }
                        if seg_start < i {
                            self.push_segment(&mut data, IpVersion::V6, seg_start, i)?;
                        }
                        data.compressed_index = Some(data.segments.len());
                        data.compressed_offset = i;
                        i += 2;
                        seg_start = i;
                        continue;
                    }
                    if seg_start == i {
                        let key = if i == self.start {
                            ErrorKey::LeadingSeparator
                        } else if data.compressed_index.is_some() && data.compressed_offset + 2 == i {
                            ErrorKey::InvalidCompression
                        } else {
                            ErrorKey::EmptySegment
                        };
                        return Err(self.error(key, i));
                    }
                    self.push_segment(&mut data, IpVersion::V6, seg_start, i)?;
                    seg_start = i + 1;
                }
                _ => {}
            }
            i += 1;
        }

        let Some(version) = version else {
            return self.scan_single_segment(data);
        };
        if seg_start < self.end {
            self.push_segment(&mut data, version, seg_start, self.end)?;
        } else if data.mixed.is_none() {
            let trailing_compression =
                data.compressed_index.is_some() && data.compressed_offset + 2 == self.end;
            if !trailing_compression {
                return Err(self.error(ErrorKey::TrailingSeparator, self.end - 1));
            }
        }
        Ok(ParsedIpAddress {
            version: Some(version),
            data,
        })
    }

    /// No separators at all: `*`, or a single-segment address of either family.
    fn scan_single_segment(
        &self,
        mut data: AddressParseData,
    ) -> Result<ParsedIpAddress, AddressStringError> {
        let body = &self.text.as_bytes()[self.start..self.end];
        if body == b"*" {
            if !self.params.allows_all() {
                return Err(self.error(ErrorKey::AllNotAllowed, self.start));
            }
            return Ok(ParsedIpAddress::all(self.start, self.end));
        }
        let version = self.require(single_segment_version(body), self.start)?;
        if !self.params.allows_single_segment() {
            return Err(self.error(ErrorKey::SingleSegmentNotAllowed, self.start));
        }
        self.push_segment(&mut data, version, self.start, self.end)?;
        data.single_segment = true;
        Ok(ParsedIpAddress {
            version: Some(version),
            data,
        })
    }

    fn require(&self, version: IpVersion, at: usize) -> Result<IpVersion, AddressStringError> {
        if self.params.allows_version(version) {
            return Ok(version);
        }
        Err(self.error(not_allowed(version), at))
    }

    fn push_segment(
        &self,
        data: &mut AddressParseData,
        version: IpVersion,
        start: usize,
        end: usize,
    ) -> Result<(), AddressStringError> {
        let format = match version {
            IpVersion::V4 => SegmentFormat::ipv4(&self.params.ipv4()),
            IpVersion::V6 => SegmentFormat::ipv6(&self.params.ipv6()),
        };
        let entry = parse_segment(&format, self.text, start, end)?;
        let flags = entry.flags();
        data.has_wildcard |= flags.wildcard || flags.single_wildcard || flags.range;
        if !data.segments.push(entry) {
            return Err(self.error(ErrorKey::TooManySegments, start));
        }
        Ok(())
    }

    /// The IPv4 section starting at `start`, which runs to the end of the body.
    fn parse_mixed(&self, start: usize) -> Result<ParsedIpAddress, AddressStringError> {
        if !self.params.ipv6().allows_mixed() {
            return Err(self.error(ErrorKey::MixedNotAllowed, start));
        }
        let embedded = self.params.embedded_ipv4_params();
        parse_body(&embedded, self.text, start, self.end).map_err(|cause| {
            AddressStringError::wrapping(ErrorKey::InvalidMixedAddress, self.text, start, cause)
        })
    }
}

fn not_allowed(version: IpVersion) -> ErrorKey {
    match version {
        IpVersion::V4 => ErrorKey::Ipv4NotAllowed,
        IpVersion::V6 => ErrorKey::Ipv6NotAllowed,
    }
}

/// Family of a separator-free segment: IPv6 needs 32 hex digits or
/// `0b` and 128 binary digits in one of its bounds; anything else is an
/// inet_aton IPv4 segment.
fn single_segment_version(body: &[u8]) -> IpVersion {
    let ipv6_bound = |bound: &[u8]| {
        let hex = bound.len() == 32
            && bound
                .iter()
                .all(|&b| b == b'_' || crate::digits::is_hex_digit(b));
        let binary = bound.len() == 130
            && bound[..2].eq_ignore_ascii_case(b"0b")
            && bound[2..].iter().all(|b| matches!(b, b'0' | b'1' | b'_'));
        hex || binary
    };
    if body.split(|&b| b == b'-').any(ipv6_bound) {
        IpVersion::V6
    } else {
        IpVersion::V4
    }
}
