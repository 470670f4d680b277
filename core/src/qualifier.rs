//! `Qualifier` — what follows the address: prefix, mask, zone, port, service
//!
//! ```text
//! fe80::1%eth0/64        zone "eth0", prefix 64
//! 1.2.3.4/255.255.0.0    mask (nested address), network prefix 16
//! /16                    prefix only
//! example.com:http       service (host strings only)
//! [::1]:8080             port (host strings only)
//! ```

use crate::base85::BASE85_ZONE_SEPARATOR;
use crate::error::{AddressStringError, ErrorKey};
use crate::params::IpAddressStringParams;
use crate::parse_data::ParsedIpAddress;
use crate::validator::parse_body;
use crate::IpVersion;

/// Longest service name.
pub const MAX_SERVICE_LENGTH: usize = 15;

/// Parsed suffix of an address or host string.
///
/// At most one of prefix length and mask is set; a zone may accompany
/// either. Ports and services only appear on host strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Qualifier {
    pub(crate) prefix_len: Option<u8>,
    pub(crate) mask: Option<Box<ParsedIpAddress>>,
    pub(crate) zone: Option<String>,
    pub(crate) port: Option<u16>,
    pub(crate) service: Option<String>,
}

impl Qualifier {
    /// The `/NN` prefix length, after any clamping.
    #[must_use]
    pub fn prefix_len(&self) -> Option<u8> {
        self.prefix_len
    }

    #[must_use]
    pub fn mask(&self) -> Option<&ParsedIpAddress> {
        self.mask.as_deref()
    }

    #[must_use]
    pub fn zone(&self) -> Option<&str> {
        self.zone.as_deref()
    }

    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    #[must_use]
    pub fn service(&self) -> Option<&str> {
        self.service.as_deref()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Prefix length equivalent to the mask, when the mask is a contiguous
    /// run of ones followed by zeros.
    #[must_use]
    pub fn mask_prefix_len(&self) -> Option<u8> {
        let mask = self.mask.as_deref()?;
        let bits = mask.version()?.bit_count();
        let aligned = mask.lower_value() << (128 - bits);
        let ones = aligned.leading_ones();
        let rest = aligned.checked_shl(ones).unwrap_or(0);
        (rest == 0).then_some(ones).and_then(|n| u8::try_from(n).ok())
    }

    /// The prefix length, or the one implied by a contiguous mask.
    #[must_use]
    pub fn network_prefix_len(&self) -> Option<u8> {
        self.prefix_len.or_else(|| self.mask_prefix_len())
    }

    /// The IP version the qualifier alone implies: a zone means IPv6, a mask
    /// means its own version, and a prefix beyond 32 means IPv6.
    #[must_use]
    pub fn implied_version(&self) -> Option<IpVersion> {
        if self.zone.is_some() {
            return Some(IpVersion::V6);
        }
        if let Some(mask) = &self.mask {
            return mask.version();
        }
        match self.prefix_len {
            Some(p) if u32::from(p) > IpVersion::V4.bit_count() => Some(IpVersion::V6),
            _ => None,
        }
    }
}

/// Parse the qualifier in `text[start..end]`, which begins at a `%`, `§`
/// or `/`. `version` is the version of the address before it, if known.
///
/// # Errors
///
/// Returns the first rule the qualifier violates. A failed mask wraps the
/// nested error as its cause.
pub fn parse_qualifier(
    params: &IpAddressStringParams,
    text: &str,
    start: usize,
    end: usize,
    version: Option<IpVersion>,
) -> Result<Qualifier, AddressStringError> {
    let bytes = text.as_bytes();
    let mut qualifier = Qualifier::default();
    let mut pos = start;

    let zone_marker = zone_marker_len(&bytes[pos..end]);
    if zone_marker > 0 {
        let zone_end = bytes[pos..end]
            .iter()
            .position(|&b| b == b'/')
            .map_or(end, |i| pos + i);
        qualifier.zone = Some(parse_zone(params, text, pos, pos + zone_marker, zone_end, version)?);
        pos = zone_end;
    }
    if pos == end {
        return Ok(qualifier);
    }
    if bytes[pos] != b'/' {
        return Err(AddressStringError::at(ErrorKey::InvalidCharacter, text, pos));
    }

    let suffix = pos + 1;
    if suffix == end {
        return Err(AddressStringError::at(ErrorKey::InvalidPrefix, text, suffix));
    }
    if bytes[suffix..end].iter().all(u8::is_ascii_digit) {
        parse_prefix_len(params, text, pos, end, version, &mut qualifier)?;
    } else {
        qualifier.mask = Some(Box::new(parse_mask(params, text, pos, end, version)?));
    }
    Ok(qualifier)
}

fn zone_marker_len(bytes: &[u8]) -> usize {
    let mut buf = [0u8; 4];
    let base85 = BASE85_ZONE_SEPARATOR.encode_utf8(&mut buf).as_bytes();
    if bytes.first() == Some(&b'%') {
        1
    } else if bytes.starts_with(base85) {
        base85.len()
    } else {
        0
    }
}

fn parse_zone(
    params: &IpAddressStringParams,
    text: &str,
    marker: usize,
    start: usize,
    end: usize,
    version: Option<IpVersion>,
) -> Result<String, AddressStringError> {
    if version == Some(IpVersion::V4) {
        return Err(AddressStringError::at(ErrorKey::ZoneRequiresIpv6, text, marker));
    }
    let ipv6 = params.ipv6();
    if !ipv6.allows_zone() {
        return Err(AddressStringError::at(ErrorKey::ZoneNotAllowed, text, marker));
    }
    if start == end && !ipv6.allows_empty_zone() {
        return Err(AddressStringError::at(ErrorKey::EmptyZone, text, marker));
    }
    let zone = text
        .get(start..end)
        .ok_or_else(|| AddressStringError::at(ErrorKey::InvalidZone, text, start))?;
    if let Some((i, _)) = zone
        .char_indices()
        .find(|&(_, c)| c.is_whitespace() || c.is_control() || matches!(c, '%' | '[' | ']'))
    {
        return Err(AddressStringError::at(ErrorKey::InvalidZone, text, start + i));
    }
    Ok(zone.to_owned())
}

/// `/NN` where `slash` is the offset of `/`.
fn parse_prefix_len(
    params: &IpAddressStringParams,
    text: &str,
    slash: usize,
    end: usize,
    version: Option<IpVersion>,
    qualifier: &mut Qualifier,
) -> Result<(), AddressStringError> {
    let start = slash + 1;
    if !params.allows_prefix() {
        return Err(AddressStringError::at(ErrorKey::PrefixNotAllowed, text, slash));
    }
    let digits = &text.as_bytes()[start..end];
    if digits.len() > 1 && digits[0] == b'0' {
        let allowed = match version {
            Some(IpVersion::V4) => params.ipv4().allows_prefix_length_leading_zeros(),
            Some(IpVersion::V6) => params.ipv6().allows_prefix_length_leading_zeros(),
            None => {
                params.ipv4().allows_prefix_length_leading_zeros()
                    && params.ipv6().allows_prefix_length_leading_zeros()
            }
        };
        if !allowed {
            return Err(AddressStringError::at(ErrorKey::PrefixLeadingZeros, text, start));
        }
    }
    let value = digits.iter().try_fold(0u64, |acc, &b| {
        acc.checked_mul(10)?.checked_add(u64::from(b - b'0'))
    });

    let (bits, beyond) = match version {
        Some(IpVersion::V4) => (32, params.ipv4().allows_prefixes_beyond_address_size()),
        Some(IpVersion::V6) => (128, params.ipv6().allows_prefixes_beyond_address_size()),
        None => (
            128,
            params.ipv4().allows_prefixes_beyond_address_size()
                || params.ipv6().allows_prefixes_beyond_address_size(),
        ),
    };
    match value {
        Some(v) if v <= bits => {
            qualifier.prefix_len = u8::try_from(v).ok();
            Ok(())
        }
        Some(v)
            if version == Some(IpVersion::V4)
                && params.ipv4().allows_inet_aton_single_segment_mask()
                && u32::try_from(v).is_ok() =>
        {
            qualifier.mask = Some(Box::new(single_segment_mask(start, end, v)));
            Ok(())
        }
        _ if beyond => {
            qualifier.prefix_len = u8::try_from(bits).ok();
            Ok(())
        }
        Some(v)
            if version == Some(IpVersion::V4)
                && v > 128
                && !params.ipv4().allows_inet_aton_single_segment_mask() =>
        {
            Err(AddressStringError::at(
                ErrorKey::SingleSegmentMaskNotAllowed,
                text,
                start,
            ))
        }
        _ => Err(AddressStringError::at(ErrorKey::PrefixTooLarge, text, start)),
    }
}

/// `/4294901760` read as the inet_aton single-segment mask `255.255.0.0`.
fn single_segment_mask(start: usize, end: usize, value: u64) -> ParsedIpAddress {
    use crate::parse_data::{AddressParseData, Bound, SegmentEntry};

    let mut data = AddressParseData::new(start, end);
    data.single_segment = true;
    data.segments.push(SegmentEntry::single(Bound {
        value: u128::from(value),
        start,
        digits_start: start,
        significant_start: start,
        end,
        radix: 10,
    }));
    ParsedIpAddress {
        version: Some(IpVersion::V4),
        data,
    }
}

/// `/address` where `slash` is the offset of `/`.
fn parse_mask(
    params: &IpAddressStringParams,
    text: &str,
    slash: usize,
    end: usize,
    version: Option<IpVersion>,
) -> Result<ParsedIpAddress, AddressStringError> {
    let start = slash + 1;
    if !params.allows_mask() {
        return Err(AddressStringError::at(ErrorKey::MaskNotAllowed, text, slash));
    }
    let mask = parse_body(&params.mask_params(), text, start, end)
        .map_err(|cause| AddressStringError::wrapping(ErrorKey::InvalidMask, text, start, cause))?;
    if mask.is_empty() || mask.is_all() || mask.is_multiple() {
        return Err(AddressStringError::at(ErrorKey::MaskNotSingleAddress, text, start));
    }
    if let (Some(address), Some(mask_version)) = (version, mask.version()) {
        if address != mask_version {
            return Err(AddressStringError::at(ErrorKey::MaskVersionMismatch, text, start));
        }
    }
    Ok(mask)
}

/// A port in `text[start..end]`: decimal, 1 through 65535.
///
/// # Errors
///
/// [`ErrorKey::InvalidPort`] for anything else.
pub fn parse_port(text: &str, start: usize, end: usize) -> Result<u16, AddressStringError> {
    let invalid = || AddressStringError::at(ErrorKey::InvalidPort, text, start);
    let digits = text.as_bytes().get(start..end).ok_or_else(invalid)?;
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }
    let value = digits
        .iter()
        .try_fold(0u32, |acc, &b| {
            acc.checked_mul(10)?.checked_add(u32::from(b - b'0'))
        })
        .filter(|v| (1..=u32::from(u16::MAX)).contains(v))
        .ok_or_else(invalid)?;
    u16::try_from(value).map_err(|_| invalid())
}

/// A service name in `text[start..end]`: letters, digits and single inner
/// hyphens, at most 15 characters, at least one letter.
///
/// # Errors
///
/// [`ErrorKey::InvalidService`] at the first offending character.
pub fn parse_service(text: &str, start: usize, end: usize) -> Result<String, AddressStringError> {
    let invalid = |at: usize| AddressStringError::at(ErrorKey::InvalidService, text, at);
    let name = text.get(start..end).ok_or_else(|| invalid(start))?;
    if name.is_empty() || name.len() > MAX_SERVICE_LENGTH {
        return Err(invalid(start));
    }
    let bytes = name.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        let ok = match b {
            b'-' => i > 0 && i + 1 < bytes.len() && bytes[i - 1] != b'-',
            _ => b.is_ascii_alphanumeric(),
        };
        if !ok {
            return Err(invalid(start + i));
        }
    }
    if !bytes.iter().any(u8::is_ascii_alphabetic) {
        return Err(invalid(start));
    }
    Ok(name.to_owned())
}
