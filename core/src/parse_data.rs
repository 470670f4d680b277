//! Parse data — fixed-capacity per-segment records filled by the scanner
//!
//! Segments live in a `[SegmentEntry; 8]`; no parse allocates per segment.
//! A record describes the string: compressed IPv6 zeros, joined inet_aton
//! segments and wildcard separators stay implicit until the bounds are
//! materialized with [`ParsedIpAddress::lower_value`] and friends.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::digits::max_value;
use crate::IpVersion;

/// Most segments any address form can hold (IPv6).
pub const MAX_SEGMENTS: usize = 8;

/// One bound of a segment: its value and where its digits sit in the string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bound {
    pub(crate) value: u128,
    pub(crate) start: usize,
    pub(crate) digits_start: usize,
    pub(crate) significant_start: usize,
    pub(crate) end: usize,
    pub(crate) radix: u32,
}

impl Bound {
    /// A bound with no text of its own, positioned at `at`.
    pub(crate) fn inferred(at: usize, value: u128, radix: u32) -> Self {
        Self {
            value,
            start: at,
            digits_start: at,
            significant_start: at,
            end: at,
            radix,
        }
    }

    #[must_use]
    pub fn value(&self) -> u128 {
        self.value
    }

    /// Offset of the bound's first character, radix marker included.
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Offset where the leading-zero run begins (after any `0x`/`0b`/`0` marker).
    #[must_use]
    pub fn leading_zero_start(&self) -> usize {
        self.digits_start
    }

    #[must_use]
    pub fn leading_zeros(&self) -> usize {
        self.significant_start - self.digits_start
    }

    /// Digits after the radix marker, leading zeros and `_` included.
    #[must_use]
    pub fn digit_count(&self) -> usize {
        self.end - self.digits_start
    }

    #[must_use]
    pub fn radix(&self) -> u32 {
        self.radix
    }

    pub(crate) fn is_inferred(&self) -> bool {
        self.start == self.end
    }
}

/// How a segment was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SegmentFlags {
    /// `*`
    pub wildcard: bool,
    /// trailing `_` digits
    pub single_wildcard: bool,
    /// `lower-upper`
    pub range: bool,
    /// `-upper`
    pub inferred_lower: bool,
    /// `lower-`
    pub inferred_upper: bool,
}

/// One parsed segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SegmentEntry {
    pub(crate) lower: Bound,
    pub(crate) upper: Bound,
    pub(crate) flags: SegmentFlags,
}

impl SegmentEntry {
    pub(crate) fn single(bound: Bound) -> Self {
        Self {
            lower: bound,
            upper: bound,
            flags: SegmentFlags::default(),
        }
    }

    #[must_use]
    pub fn lower(&self) -> u128 {
        self.lower.value
    }

    #[must_use]
    pub fn upper(&self) -> u128 {
        self.upper.value
    }

    #[must_use]
    pub fn lower_bound(&self) -> &Bound {
        &self.lower
    }

    #[must_use]
    pub fn upper_bound(&self) -> &Bound {
        &self.upper
    }

    #[must_use]
    pub fn flags(&self) -> SegmentFlags {
        self.flags
    }

    #[must_use]
    pub fn start(&self) -> usize {
        self.lower.start.min(self.upper.start)
    }

    #[must_use]
    pub fn end(&self) -> usize {
        self.lower.end.max(self.upper.end)
    }

    /// Whether the segment covers more than one value.
    #[must_use]
    pub fn is_multiple(&self) -> bool {
        self.lower.value != self.upper.value
    }

    /// A lone `*`, which may stand for several segments.
    pub(crate) fn is_full_wildcard(&self) -> bool {
        self.flags.wildcard && !self.flags.range && !self.flags.single_wildcard
    }
}

/// Fixed-capacity segment storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Segments {
    entries: [SegmentEntry; MAX_SEGMENTS],
    len: usize,
}

impl Segments {
    /// Append a segment. Returns `false` when full.
    pub(crate) fn push(&mut self, entry: SegmentEntry) -> bool {
        match self.entries.get_mut(self.len) {
            Some(slot) => {
                *slot = entry;
                self.len += 1;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SegmentEntry> {
        self.as_slice().get(index)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[SegmentEntry] {
        &self.entries[..self.len]
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [SegmentEntry] {
        &mut self.entries[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SegmentEntry> {
        self.as_slice().iter()
    }
}

impl<'a> IntoIterator for &'a Segments {
    type Item = &'a SegmentEntry;
    type IntoIter = std::slice::Iter<'a, SegmentEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Address-level results of one scan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct AddressParseData {
    pub(crate) segments: Segments,
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) empty: bool,
    pub(crate) all: bool,
    pub(crate) has_wildcard: bool,
    pub(crate) compressed_index: Option<usize>,
    pub(crate) compressed_offset: usize,
    pub(crate) wildcard_separator_index: Option<usize>,
    pub(crate) wildcard_separator_span: usize,
    pub(crate) single_segment: bool,
    pub(crate) base85: bool,
    pub(crate) joined_missing: usize,
    pub(crate) mixed: Option<Box<ParsedIpAddress>>,
}

impl AddressParseData {
    pub(crate) fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn segments(&self) -> &Segments {
        &self.segments
    }

    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        self.all
    }

    #[must_use]
    pub fn has_wildcard(&self) -> bool {
        self.has_wildcard
    }

    /// Number of written segments preceding `::`.
    #[must_use]
    pub fn compressed_index(&self) -> Option<usize> {
        self.compressed_index
    }

    /// Index of the `*` segment standing in for missing segments.
    #[must_use]
    pub fn wildcard_separator_index(&self) -> Option<usize> {
        self.wildcard_separator_index
    }

    #[must_use]
    pub fn is_single_segment(&self) -> bool {
        self.single_segment
    }

    #[must_use]
    pub fn is_base85(&self) -> bool {
        self.base85
    }

    /// Segments absorbed by the last segment of a joined inet_aton IPv4 address.
    #[must_use]
    pub fn joined_missing(&self) -> usize {
        self.joined_missing
    }

    /// The embedded IPv4 section of a mixed IPv6 address.
    #[must_use]
    pub fn mixed(&self) -> Option<&ParsedIpAddress> {
        self.mixed.as_deref()
    }

    /// Bit width of written segment `index`.
    pub(crate) fn segment_bits(&self, version: IpVersion, index: usize) -> u32 {
        let per_segment = version.bits_per_segment();
        if self.single_segment {
            return version.bit_count();
        }
        if self.wildcard_separator_index == Some(index) {
            return per_segment * (1 + self.wildcard_separator_span as u32);
        }
        if version.is_ipv4() && index + 1 == self.segments.len() {
            return per_segment * (1 + self.joined_missing as u32);
        }
        per_segment
    }
}

/// A scanned address body with its version.
///
/// The version is `None` only for empty strings and the all-addresses `*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ParsedIpAddress {
    pub(crate) version: Option<IpVersion>,
    pub(crate) data: AddressParseData,
}

impl ParsedIpAddress {
    pub(crate) fn empty(at: usize) -> Self {
        let mut data = AddressParseData::new(at, at);
        data.empty = true;
        Self {
            version: None,
            data,
        }
    }

    pub(crate) fn all(start: usize, end: usize) -> Self {
        let mut data = AddressParseData::new(start, end);
        data.all = true;
        data.has_wildcard = true;
        Self {
            version: None,
            data,
        }
    }

    #[must_use]
    pub fn version(&self) -> Option<IpVersion> {
        self.version
    }

    #[must_use]
    pub fn data(&self) -> &AddressParseData {
        &self.data
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.empty
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        self.data.all
    }

    #[must_use]
    pub fn segments(&self) -> &[SegmentEntry] {
        self.data.segments.as_slice()
    }

    #[must_use]
    pub fn is_compressed(&self) -> bool {
        self.data.compressed_index.is_some()
    }

    #[must_use]
    pub fn is_mixed(&self) -> bool {
        self.data.mixed.is_some()
    }

    /// Zero segments that `::` stands for.
    #[must_use]
    pub fn implicit_zero_segments(&self) -> usize {
        if self.data.compressed_index.is_none() {
            return 0;
        }
        let mixed = if self.is_mixed() { 2 } else { 0 };
        IpVersion::V6
            .segment_count()
            .saturating_sub(self.data.segments.len() + mixed)
    }

    /// Whether the string denotes more than one address.
    #[must_use]
    pub fn is_multiple(&self) -> bool {
        self.data.all || self.lower_value() != self.upper_value()
    }

    /// Lowest address as an integer. Zero for empty strings.
    #[must_use]
    pub fn lower_value(&self) -> u128 {
        self.value(false)
    }

    /// Highest address as an integer.
    #[must_use]
    pub fn upper_value(&self) -> u128 {
        self.value(true)
    }

    #[must_use]
    pub fn lower_address(&self) -> Option<IpAddr> {
        self.address(false)
    }

    #[must_use]
    pub fn upper_address(&self) -> Option<IpAddr> {
        self.address(true)
    }

    fn address(&self, upper: bool) -> Option<IpAddr> {
        if self.data.empty {
            return None;
        }
        to_ip_addr(self.version?, self.value(upper))
    }

    fn value(&self, upper: bool) -> u128 {
        let Some(version) = self.version else {
            return 0;
        };
        let data = &self.data;
        if data.all {
            return if upper { max_value(version.bit_count()) } else { 0 };
        }
        let pick = |seg: &SegmentEntry| if upper { seg.upper() } else { seg.lower() };
        let zeros = self.implicit_zero_segments() as u32 * version.bits_per_segment();
        let len = data.segments.len();

        let mut acc = 0u128;
        for (i, seg) in data.segments.iter().enumerate() {
            if data.compressed_index == Some(i) {
                acc = shift(acc, zeros);
            }
            acc = shift(acc, data.segment_bits(version, i)) | pick(seg);
        }
        if data.compressed_index == Some(len) {
            acc = shift(acc, zeros);
        }
        if let Some(mixed) = &data.mixed {
            acc = shift(acc, IpVersion::V4.bit_count()) | mixed.value(upper);
        }
        acc
    }
}

fn shift(value: u128, bits: u32) -> u128 {
    value.checked_shl(bits).unwrap_or(0)
}

pub(crate) fn to_ip_addr(version: IpVersion, value: u128) -> Option<IpAddr> {
    match version {
        IpVersion::V4 => u32::try_from(value)
            .ok()
            .map(|v| IpAddr::V4(Ipv4Addr::from(v))),
        IpVersion::V6 => Some(IpAddr::V6(Ipv6Addr::from(value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(value: u128) -> SegmentEntry {
        SegmentEntry::single(Bound {
            value,
            radix: 10,
            ..Bound::default()
        })
    }

    fn parsed(version: IpVersion, values: &[u128]) -> ParsedIpAddress {
        let mut data = AddressParseData::new(0, 0);
        for v in values {
            assert!(data.segments.push(seg(*v)));
        }
        ParsedIpAddress {
            version: Some(version),
            data,
        }
    }

    #[test]
    fn segments_reject_ninth_push() {
        let mut segments = Segments::default();
        for _ in 0..MAX_SEGMENTS {
            assert!(segments.push(seg(0)));
        }
        assert!(!segments.push(seg(0)));
        assert_eq!(segments.len(), MAX_SEGMENTS);
    }

    #[test]
    fn ipv4_fold() {
        let p = parsed(IpVersion::V4, &[192, 168, 1, 1]);
        assert_eq!(
            p.lower_address(),
            Some(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1)))
        );
        assert!(!p.is_multiple());
    }

    #[test]
    fn joined_last_segment_is_wide() {
        // `1.515`: two segments written, two missing, last covers 24 bits
        let mut p = parsed(IpVersion::V4, &[1, 0x0203]);
        p.data.joined_missing = 2;
        assert_eq!(p.lower_value(), 0x0100_0203);

        let mut p = parsed(IpVersion::V4, &[1, 2, 0x0304]);
        p.data.joined_missing = 1;
        assert_eq!(p.lower_value(), 0x0102_0304);
    }

    #[test]
    fn compression_inserts_zeros() {
        let mut p = parsed(IpVersion::V6, &[1]);
        p.data.compressed_index = Some(0);
        assert_eq!(p.implicit_zero_segments(), 7);
        assert_eq!(p.lower_value(), 1);

        let mut p = parsed(IpVersion::V6, &[0xfe80, 1]);
        p.data.compressed_index = Some(1);
        let expected: Ipv6Addr = "fe80::1".parse().unwrap();
        assert_eq!(p.lower_address(), Some(IpAddr::V6(expected)));
    }

    #[test]
    fn mixed_section_fills_low_bits() {
        let mut p = parsed(IpVersion::V6, &[0xffff]);
        p.data.compressed_index = Some(0);
        p.data.mixed = Some(Box::new(parsed(IpVersion::V4, &[1, 2, 3, 4])));
        assert_eq!(p.implicit_zero_segments(), 5);
        let expected: Ipv6Addr = "::ffff:1.2.3.4".parse().unwrap();
        assert_eq!(p.lower_value(), u128::from(expected));
    }

    #[test]
    fn empty_has_no_address() {
        let p = ParsedIpAddress::empty(0);
        assert!(p.is_empty());
        assert_eq!(p.lower_address(), None);
    }
}
