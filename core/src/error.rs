//! `AddressStringError` — Positioned, keyed validation failures
//!
//! Every failure carries the offending string, a stable [`ErrorKey`]
//! (whose [`key()`](ErrorKey::key) is suitable as a localization lookup),
//! an optional byte offset into the string, and an optional nested cause
//! for mask and embedded-IPv4 sub-parses.

use std::fmt;

/// Taxonomy of validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// Disallowed or unexpected character or notation.
    Syntax,
    /// Too few or too many segments for the address version.
    SegmentCount,
    /// A segment value exceeds the family or radix maximum.
    SegmentValue,
    /// A digit run exceeds the policy-derived maximum (or minimum).
    SegmentLength,
    /// The syntax implies a version contradicted by options, mask or zone.
    VersionConflict,
    /// Malformed prefix, mask, zone, port or service.
    Qualifier,
    /// An empty or all-addresses string is not permitted.
    EmptyOrAllNotAllowed,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Syntax => "syntax error",
            Self::SegmentCount => "segment count error",
            Self::SegmentValue => "segment value error",
            Self::SegmentLength => "segment length error",
            Self::VersionConflict => "version conflict",
            Self::Qualifier => "qualifier error",
            Self::EmptyOrAllNotAllowed => "empty or all not allowed",
        };
        f.write_str(name)
    }
}

/// Stable identifier of a specific validation rule.
///
/// The dotted [`key()`](Self::key) never changes between releases; the
/// English [`message()`](Self::message) may.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ErrorKey {
    // Syntax
    InvalidCharacter,
    EmptySegment,
    WildcardNotAllowed,
    InvalidWildcardPosition,
    SingleWildcardNotAllowed,
    RangeNotAllowed,
    InvalidRange,
    InferredBoundaryNotAllowed,
    LeadingZerosNotAllowed,
    HexNotAllowed,
    BinaryNotAllowed,
    InvalidCompression,
    LeadingSeparator,
    TrailingSeparator,
    MixedNotAllowed,
    InvalidMixedAddress,
    Base85NotAllowed,
    MixedSeparators,
    MacFormatNotAllowed,

    // Segment count
    TooFewSegments,
    TooManySegments,
    SingleSegmentNotAllowed,

    // Segment value
    SegmentTooLarge,

    // Segment length
    SegmentTooLong,
    SegmentTooShort,

    // Version
    Ipv4NotAllowed,
    Ipv6NotAllowed,
    MaskVersionMismatch,
    ZoneRequiresIpv6,

    // Qualifier
    PrefixNotAllowed,
    PrefixOnlyNotAllowed,
    InvalidPrefix,
    PrefixTooLarge,
    PrefixLeadingZeros,
    MaskNotAllowed,
    InvalidMask,
    MaskNotSingleAddress,
    SingleSegmentMaskNotAllowed,
    ZoneNotAllowed,
    EmptyZone,
    InvalidZone,
    QualifierWithoutAddress,
    PortNotAllowed,
    InvalidPort,
    ServiceNotAllowed,
    InvalidService,

    // Empty / all
    EmptyNotAllowed,
    AllNotAllowed,

    // Host names
    HostTooLong,
    LabelTooLong,
    TooManyLabels,
    EmptyLabel,
    InvalidHostCharacter,
    IpAddressNotAllowed,
    BracketedNotAllowed,
    UnterminatedBracket,
}

impl ErrorKey {
    /// Stable dotted message key.
    #[must_use]
    pub fn key(self) -> &'static str {
        self.parts().1
    }

    /// English description of the violated rule.
    #[must_use]
    pub fn message(self) -> &'static str {
        self.parts().2
    }

    /// The taxonomy bucket this rule belongs to.
    #[must_use]
    pub fn kind(self) -> ErrorKind {
        self.parts().0
    }

    #[allow(clippy::too_many_lines)]
    fn parts(self) -> (ErrorKind, &'static str, &'static str) {
        use ErrorKind::{
            EmptyOrAllNotAllowed, Qualifier, SegmentCount, SegmentLength, SegmentValue, Syntax,
            VersionConflict,
        };
        match self {
            Self::InvalidCharacter => (
                Syntax,
                "ipaddress.error.invalid.character",
                "invalid character",
            ),
            Self::EmptySegment => (Syntax, "ipaddress.error.empty.segment", "empty segment"),
            Self::WildcardNotAllowed => (
                Syntax,
                "ipaddress.error.no.wildcard",
                "wildcards are not allowed",
            ),
            Self::InvalidWildcardPosition => (
                Syntax,
                "ipaddress.error.wildcard.position",
                "a wildcard must make up the whole segment",
            ),
            Self::SingleWildcardNotAllowed => (
                Syntax,
                "ipaddress.error.no.single.wildcard",
                "single-digit wildcards are not allowed",
            ),
            Self::RangeNotAllowed => (
                Syntax,
                "ipaddress.error.no.range",
                "range separators are not allowed",
            ),
            Self::InvalidRange => (
                Syntax,
                "ipaddress.error.invalidRange",
                "range lower bound exceeds upper bound",
            ),
            Self::InferredBoundaryNotAllowed => (
                Syntax,
                "ipaddress.error.no.inferred.boundary",
                "range boundaries must be explicit",
            ),
            Self::LeadingZerosNotAllowed => (
                Syntax,
                "ipaddress.error.segment.leading.zeros",
                "leading zeros are not allowed",
            ),
            Self::HexNotAllowed => (
                Syntax,
                "ipaddress.error.ipv4.segment.hex",
                "hexadecimal IPv4 segments are not allowed",
            ),
            Self::BinaryNotAllowed => (
                Syntax,
                "ipaddress.error.binary",
                "binary segments are not allowed",
            ),
            Self::InvalidCompression => (
                Syntax,
                "ipaddress.error.ipv6.compression",
                "invalid use of IPv6 compression",
            ),
            Self::LeadingSeparator => (
                Syntax,
                "ipaddress.error.ipv6.cannot.start.with.single.separator",
                "IPv6 address cannot start with a single separator",
            ),
            Self::TrailingSeparator => (
                Syntax,
                "ipaddress.error.cannot.end.with.single.separator",
                "address cannot end with a single separator",
            ),
            Self::MixedNotAllowed => (
                Syntax,
                "ipaddress.error.no.mixed",
                "embedded IPv4 segments are not allowed",
            ),
            Self::InvalidMixedAddress => (
                Syntax,
                "ipaddress.error.invalid.mixed",
                "invalid embedded IPv4 section",
            ),
            Self::Base85NotAllowed => (
                Syntax,
                "ipaddress.error.no.base85",
                "base 85 addresses are not allowed",
            ),
            Self::MixedSeparators => (
                Syntax,
                "ipaddress.error.mac.mixed.separators",
                "MAC address mixes separators",
            ),
            Self::MacFormatNotAllowed => (
                Syntax,
                "ipaddress.error.mac.format",
                "MAC address format is not allowed",
            ),
            Self::TooFewSegments => (
                SegmentCount,
                "ipaddress.error.too.few.segments",
                "too few segments",
            ),
            Self::TooManySegments => (
                SegmentCount,
                "ipaddress.error.too.many.segments",
                "too many segments",
            ),
            Self::SingleSegmentNotAllowed => (
                SegmentCount,
                "ipaddress.error.single.segment",
                "single segment addresses are not allowed",
            ),
            Self::SegmentTooLarge => (
                SegmentValue,
                "ipaddress.error.segment.too.large",
                "segment value too large",
            ),
            Self::SegmentTooLong => (
                SegmentLength,
                "ipaddress.error.segment.too.long",
                "segment has too many digits",
            ),
            Self::SegmentTooShort => (
                SegmentLength,
                "ipaddress.error.segment.too.short",
                "segment has too few digits",
            ),
            Self::Ipv4NotAllowed => (
                VersionConflict,
                "ipaddress.error.ipv4",
                "IPv4 addresses are not allowed",
            ),
            Self::Ipv6NotAllowed => (
                VersionConflict,
                "ipaddress.error.ipv6",
                "IPv6 addresses are not allowed",
            ),
            Self::MaskVersionMismatch => (
                VersionConflict,
                "ipaddress.error.ipMismatch",
                "mask version does not match address version",
            ),
            Self::ZoneRequiresIpv6 => (
                VersionConflict,
                "ipaddress.error.only.ipv6.has.zone",
                "only IPv6 addresses have zones",
            ),
            Self::PrefixNotAllowed => (
                Qualifier,
                "ipaddress.error.prefix.not.allowed",
                "prefix lengths are not allowed",
            ),
            Self::PrefixOnlyNotAllowed => (
                Qualifier,
                "ipaddress.error.prefix.only",
                "a prefix length without an address is not allowed",
            ),
            Self::InvalidPrefix => (
                Qualifier,
                "ipaddress.error.invalidCIDRPrefix",
                "invalid prefix length",
            ),
            Self::PrefixTooLarge => (
                Qualifier,
                "ipaddress.error.prefixSize",
                "prefix length exceeds address size",
            ),
            Self::PrefixLeadingZeros => (
                Qualifier,
                "ipaddress.error.prefix.leading.zeros",
                "prefix length has leading zeros",
            ),
            Self::MaskNotAllowed => (
                Qualifier,
                "ipaddress.error.mask.not.allowed",
                "masks are not allowed",
            ),
            Self::InvalidMask => (Qualifier, "ipaddress.error.invalidMask", "invalid mask"),
            Self::MaskNotSingleAddress => (
                Qualifier,
                "ipaddress.error.mask.single.address",
                "mask must be a single address",
            ),
            Self::SingleSegmentMaskNotAllowed => (
                Qualifier,
                "ipaddress.error.mask.single.segment",
                "single segment masks are not allowed",
            ),
            Self::ZoneNotAllowed => (Qualifier, "ipaddress.error.no.zone", "zones are not allowed"),
            Self::EmptyZone => (Qualifier, "ipaddress.error.empty.zone", "zone is empty"),
            Self::InvalidZone => (
                Qualifier,
                "ipaddress.error.invalid.zone",
                "invalid character in zone",
            ),
            Self::QualifierWithoutAddress => (
                Qualifier,
                "ipaddress.error.qualifier.without.address",
                "qualifier has no address",
            ),
            Self::PortNotAllowed => (
                Qualifier,
                "host.error.port.not.allowed",
                "ports are not allowed",
            ),
            Self::InvalidPort => (Qualifier, "host.error.invalidPort", "invalid port"),
            Self::ServiceNotAllowed => (
                Qualifier,
                "host.error.service.not.allowed",
                "service names are not allowed",
            ),
            Self::InvalidService => (
                Qualifier,
                "host.error.invalidService",
                "invalid service name",
            ),
            Self::EmptyNotAllowed => (
                EmptyOrAllNotAllowed,
                "ipaddress.error.empty",
                "empty address is not allowed",
            ),
            Self::AllNotAllowed => (
                EmptyOrAllNotAllowed,
                "ipaddress.error.all",
                "all-addresses wildcard is not allowed",
            ),
            Self::HostTooLong => (SegmentLength, "host.error.host.too.long", "host too long"),
            Self::LabelTooLong => (
                SegmentLength,
                "host.error.segment.too.long",
                "host label too long",
            ),
            Self::TooManyLabels => (
                SegmentCount,
                "host.error.too.many.segments",
                "too many host labels",
            ),
            Self::EmptyLabel => (Syntax, "host.error.empty.segment", "empty host label"),
            Self::InvalidHostCharacter => (
                Syntax,
                "host.error.invalid.character",
                "invalid character in host label",
            ),
            Self::IpAddressNotAllowed => (
                Syntax,
                "host.error.ipaddress",
                "IP addresses are not allowed as host",
            ),
            Self::BracketedNotAllowed => (
                Syntax,
                "host.error.bracketed.not.allowed",
                "bracketed address is not allowed",
            ),
            Self::UnterminatedBracket => (
                Syntax,
                "host.error.bracketed.missing.end",
                "missing closing bracket",
            ),
        }
    }
}

impl fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A failed validation of an address or host string.
///
/// Nested failures (a malformed mask, an invalid embedded IPv4 section) are
/// reachable through [`std::error::Error::source`] and [`cause()`](Self::cause).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}{}: \"{text}\"", message(.key), at_index(.index))]
pub struct AddressStringError {
    key: ErrorKey,
    text: String,
    index: Option<usize>,
    #[source]
    cause: Option<Box<AddressStringError>>,
}

fn message(key: &ErrorKey) -> &'static str {
    key.message()
}

fn at_index(index: &Option<usize>) -> String {
    index.map_or_else(String::new, |i| format!(" at index {i}"))
}

impl AddressStringError {
    /// Failure without a position.
    #[must_use]
    pub fn new(key: ErrorKey, text: &str) -> Self {
        Self {
            key,
            text: text.to_owned(),
            index: None,
            cause: None,
        }
    }

    /// Failure at byte offset `index` of `text`.
    #[must_use]
    pub fn at(key: ErrorKey, text: &str, index: usize) -> Self {
        Self {
            key,
            text: text.to_owned(),
            index: Some(index),
            cause: None,
        }
    }

    /// Failure of a sub-parse starting at `index`, wrapping the inner error.
    #[must_use]
    pub fn wrapping(key: ErrorKey, text: &str, index: usize, cause: AddressStringError) -> Self {
        Self {
            key,
            text: text.to_owned(),
            index: Some(index),
            cause: Some(Box::new(cause)),
        }
    }

    /// The violated rule.
    #[must_use]
    pub fn key(&self) -> ErrorKey {
        self.key
    }

    /// The taxonomy bucket of the violated rule.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.key.kind()
    }

    /// The string that failed validation.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte offset of the offending character, when known.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// The nested failure of a mask or embedded-address sub-parse.
    #[must_use]
    pub fn cause(&self) -> Option<&AddressStringError> {
        self.cause.as_deref()
    }
}
