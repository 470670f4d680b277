//! `IpVersion` — IPv4 or IPv6

use std::fmt;

/// An IP address version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IpVersion {
    /// 32-bit addresses, four 8-bit segments.
    #[cfg_attr(feature = "serde", serde(rename = "ipv4"))]
    V4,
    /// 128-bit addresses, eight 16-bit segments.
    #[cfg_attr(feature = "serde", serde(rename = "ipv6"))]
    V6,
}

impl IpVersion {
    /// Total address bits.
    #[must_use]
    pub const fn bit_count(self) -> u32 {
        match self {
            Self::V4 => 32,
            Self::V6 => 128,
        }
    }

    /// Segments in the standard notation.
    #[must_use]
    pub const fn segment_count(self) -> usize {
        match self {
            Self::V4 => 4,
            Self::V6 => 8,
        }
    }

    /// Bits per standard segment.
    #[must_use]
    pub const fn bits_per_segment(self) -> u32 {
        match self {
            Self::V4 => 8,
            Self::V6 => 16,
        }
    }

    /// Default radix of a segment.
    #[must_use]
    pub const fn default_radix(self) -> u32 {
        match self {
            Self::V4 => 10,
            Self::V6 => 16,
        }
    }

    /// Segment separator character.
    #[must_use]
    pub const fn separator(self) -> u8 {
        match self {
            Self::V4 => b'.',
            Self::V6 => b':',
        }
    }

    #[must_use]
    pub const fn is_ipv4(self) -> bool {
        matches!(self, Self::V4)
    }

    #[must_use]
    pub const fn is_ipv6(self) -> bool {
        matches!(self, Self::V6)
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4 => f.write_str("IPv4"),
            Self::V6 => f.write_str("IPv6"),
        }
    }
}
