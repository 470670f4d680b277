//! Per-family segment format parameters
//!
//! [`FormatParams`] is the leaf shared by every family. The IPv4 and IPv6
//! params compose it with their own extras instead of inheriting from it.

use super::RangeParams;

/// Segment format rules common to IPv4, IPv6 and MAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct FormatParams {
    range: RangeParams,
    wildcarded_separator: bool,
    leading_zeros: bool,
    unlimited_leading_zeros: bool,
    binary: bool,
}

impl FormatParams {
    #[must_use]
    pub fn builder() -> FormatParamsBuilder {
        FormatParamsBuilder {
            params: Self::default(),
        }
    }

    #[must_use]
    pub fn to_builder(&self) -> FormatParamsBuilder {
        FormatParamsBuilder { params: *self }
    }

    #[must_use]
    pub fn range(&self) -> RangeParams {
        self.range
    }

    /// Whether a full `*` segment may stand in for several segments
    /// (`1.2.*` for `1.2.*.*`).
    #[must_use]
    pub fn allows_wildcarded_separator(&self) -> bool {
        self.wildcarded_separator
    }

    #[must_use]
    pub fn allows_leading_zeros(&self) -> bool {
        self.leading_zeros
    }

    /// Whether leading zeros may push a segment beyond its digit budget.
    #[must_use]
    pub fn allows_unlimited_leading_zeros(&self) -> bool {
        self.unlimited_leading_zeros
    }

    /// Whether `0b`-prefixed binary segments are allowed.
    #[must_use]
    pub fn allows_binary(&self) -> bool {
        self.binary
    }
}

impl Default for FormatParams {
    fn default() -> Self {
        Self {
            range: RangeParams::default(),
            wildcarded_separator: true,
            leading_zeros: true,
            unlimited_leading_zeros: false,
            binary: true,
        }
    }
}

/// Builder for [`FormatParams`].
#[derive(Debug, Clone, Copy)]
pub struct FormatParamsBuilder {
    params: FormatParams,
}

impl FormatParamsBuilder {
    #[must_use]
    pub fn range(mut self, range: RangeParams) -> Self {
        self.params.range = range;
        self
    }

    #[must_use]
    pub fn allow_wildcarded_separator(mut self, allow: bool) -> Self {
        self.params.wildcarded_separator = allow;
        self
    }

    #[must_use]
    pub fn allow_leading_zeros(mut self, allow: bool) -> Self {
        self.params.leading_zeros = allow;
        self
    }

    #[must_use]
    pub fn allow_unlimited_leading_zeros(mut self, allow: bool) -> Self {
        self.params.unlimited_leading_zeros = allow;
        self
    }

    #[must_use]
    pub fn allow_binary(mut self, allow: bool) -> Self {
        self.params.binary = allow;
        self
    }

    #[must_use]
    pub fn build(self) -> FormatParams {
        self.params
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// IPv4
// ═══════════════════════════════════════════════════════════════════════════════

/// IPv4 segment format, including the legacy inet_aton notations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct Ipv4FormatParams {
    format: FormatParams,
    inet_aton_hex: bool,
    inet_aton_octal: bool,
    inet_aton_joined_segments: bool,
    inet_aton_leading_zeros: bool,
    inet_aton_single_segment_mask: bool,
    prefix_length_leading_zeros: bool,
    prefixes_beyond_address_size: bool,
}

impl Ipv4FormatParams {
    #[must_use]
    pub fn builder() -> Ipv4FormatParamsBuilder {
        Ipv4FormatParamsBuilder {
            params: Self::default(),
        }
    }

    #[must_use]
    pub fn to_builder(&self) -> Ipv4FormatParamsBuilder {
        Ipv4FormatParamsBuilder { params: *self }
    }

    #[must_use]
    pub fn format(&self) -> FormatParams {
        self.format
    }

    /// `0xff` segments.
    #[must_use]
    pub fn allows_inet_aton_hex(&self) -> bool {
        self.inet_aton_hex
    }

    /// `0377` segments.
    #[must_use]
    pub fn allows_inet_aton_octal(&self) -> bool {
        self.inet_aton_octal
    }

    /// `1.2.3`, `1.2` and `1` where the last segment covers the missing ones.
    #[must_use]
    pub fn allows_inet_aton_joined_segments(&self) -> bool {
        self.inet_aton_joined_segments
    }

    /// Extra zeros after the `0x` or octal `0` marker (`0x00ff`, `00377`).
    #[must_use]
    pub fn allows_inet_aton_leading_zeros(&self) -> bool {
        self.inet_aton_leading_zeros
    }

    /// `/4294901760` as a mask rather than a prefix length.
    #[must_use]
    pub fn allows_inet_aton_single_segment_mask(&self) -> bool {
        self.inet_aton_single_segment_mask
    }

    #[must_use]
    pub fn allows_prefix_length_leading_zeros(&self) -> bool {
        self.prefix_length_leading_zeros
    }

    /// Clamp `/33` and beyond to `/32` instead of rejecting it.
    #[must_use]
    pub fn allows_prefixes_beyond_address_size(&self) -> bool {
        self.prefixes_beyond_address_size
    }

    /// Whether any inet_aton notation is enabled.
    #[must_use]
    pub fn allows_any_inet_aton(&self) -> bool {
        self.inet_aton_hex || self.inet_aton_octal || self.inet_aton_joined_segments
    }
}

impl Default for Ipv4FormatParams {
    fn default() -> Self {
        Self {
            format: FormatParams::default(),
            inet_aton_hex: false,
            inet_aton_octal: false,
            inet_aton_joined_segments: false,
            inet_aton_leading_zeros: true,
            inet_aton_single_segment_mask: false,
            prefix_length_leading_zeros: true,
            prefixes_beyond_address_size: false,
        }
    }
}

/// Builder for [`Ipv4FormatParams`].
#[derive(Debug, Clone, Copy)]
pub struct Ipv4FormatParamsBuilder {
    params: Ipv4FormatParams,
}

impl Ipv4FormatParamsBuilder {
    #[must_use]
    pub fn format(mut self, format: FormatParams) -> Self {
        self.params.format = format;
        self
    }

    /// Shorthand for replacing only the range rules of the format.
    #[must_use]
    pub fn range(mut self, range: RangeParams) -> Self {
        self.params.format = self.params.format.to_builder().range(range).build();
        self
    }

    /// Toggle hex, octal and joined segments together.
    #[must_use]
    pub fn allow_inet_aton(self, allow: bool) -> Self {
        self.allow_inet_aton_hex(allow)
            .allow_inet_aton_octal(allow)
            .allow_inet_aton_joined_segments(allow)
    }

    #[must_use]
    pub fn allow_inet_aton_hex(mut self, allow: bool) -> Self {
        self.params.inet_aton_hex = allow;
        self
    }

    #[must_use]
    pub fn allow_inet_aton_octal(mut self, allow: bool) -> Self {
        self.params.inet_aton_octal = allow;
        self
    }

    #[must_use]
    pub fn allow_inet_aton_joined_segments(mut self, allow: bool) -> Self {
        self.params.inet_aton_joined_segments = allow;
        self
    }

    #[must_use]
    pub fn allow_inet_aton_leading_zeros(mut self, allow: bool) -> Self {
        self.params.inet_aton_leading_zeros = allow;
        self
    }

    #[must_use]
    pub fn allow_inet_aton_single_segment_mask(mut self, allow: bool) -> Self {
        self.params.inet_aton_single_segment_mask = allow;
        self
    }

    #[must_use]
    pub fn allow_prefix_length_leading_zeros(mut self, allow: bool) -> Self {
        self.params.prefix_length_leading_zeros = allow;
        self
    }

    #[must_use]
    pub fn allow_prefixes_beyond_address_size(mut self, allow: bool) -> Self {
        self.params.prefixes_beyond_address_size = allow;
        self
    }

    #[must_use]
    pub fn build(self) -> Ipv4FormatParams {
        self.params
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// IPv6
// ═══════════════════════════════════════════════════════════════════════════════

/// IPv6 segment format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct Ipv6FormatParams {
    format: FormatParams,
    mixed: bool,
    zone: bool,
    empty_zone: bool,
    base85: bool,
    prefix_length_leading_zeros: bool,
    prefixes_beyond_address_size: bool,
    embedded_ipv4: Ipv4FormatParams,
}

impl Ipv6FormatParams {
    #[must_use]
    pub fn builder() -> Ipv6FormatParamsBuilder {
        Ipv6FormatParamsBuilder {
            params: Self::default(),
        }
    }

    #[must_use]
    pub fn to_builder(&self) -> Ipv6FormatParamsBuilder {
        Ipv6FormatParamsBuilder { params: *self }
    }

    #[must_use]
    pub fn format(&self) -> FormatParams {
        self.format
    }

    /// `::ffff:1.2.3.4`.
    #[must_use]
    pub fn allows_mixed(&self) -> bool {
        self.mixed
    }

    /// `fe80::1%eth0`.
    #[must_use]
    pub fn allows_zone(&self) -> bool {
        self.zone
    }

    /// `fe80::1%`.
    #[must_use]
    pub fn allows_empty_zone(&self) -> bool {
        self.empty_zone
    }

    /// RFC 1924 single-segment base-85 addresses.
    #[must_use]
    pub fn allows_base85(&self) -> bool {
        self.base85
    }

    #[must_use]
    pub fn allows_prefix_length_leading_zeros(&self) -> bool {
        self.prefix_length_leading_zeros
    }

    #[must_use]
    pub fn allows_prefixes_beyond_address_size(&self) -> bool {
        self.prefixes_beyond_address_size
    }

    /// Format of the IPv4 section of a mixed address.
    ///
    /// The section always spans four segments; joined segments are never
    /// applied to it.
    #[must_use]
    pub fn embedded_ipv4(&self) -> Ipv4FormatParams {
        self.embedded_ipv4
    }
}

impl Default for Ipv6FormatParams {
    fn default() -> Self {
        Self {
            format: FormatParams::default(),
            mixed: true,
            zone: true,
            empty_zone: false,
            base85: true,
            prefix_length_leading_zeros: true,
            prefixes_beyond_address_size: false,
            embedded_ipv4: Ipv4FormatParams::default(),
        }
    }
}

/// Builder for [`Ipv6FormatParams`].
#[derive(Debug, Clone, Copy)]
pub struct Ipv6FormatParamsBuilder {
    params: Ipv6FormatParams,
}

impl Ipv6FormatParamsBuilder {
    #[must_use]
    pub fn format(mut self, format: FormatParams) -> Self {
        self.params.format = format;
        self
    }

    /// Replace the range rules of both the IPv6 format and its embedded IPv4 format.
    #[must_use]
    pub fn range(mut self, range: RangeParams) -> Self {
        self.params.format = self.params.format.to_builder().range(range).build();
        self.params.embedded_ipv4 = self.params.embedded_ipv4.to_builder().range(range).build();
        self
    }

    #[must_use]
    pub fn allow_mixed(mut self, allow: bool) -> Self {
        self.params.mixed = allow;
        self
    }

    #[must_use]
    pub fn allow_zone(mut self, allow: bool) -> Self {
        self.params.zone = allow;
        self
    }

    #[must_use]
    pub fn allow_empty_zone(mut self, allow: bool) -> Self {
        self.params.empty_zone = allow;
        self
    }

    #[must_use]
    pub fn allow_base85(mut self, allow: bool) -> Self {
        self.params.base85 = allow;
        self
    }

    #[must_use]
    pub fn allow_prefix_length_leading_zeros(mut self, allow: bool) -> Self {
        self.params.prefix_length_leading_zeros = allow;
        self
    }

    #[must_use]
    pub fn allow_prefixes_beyond_address_size(mut self, allow: bool) -> Self {
        self.params.prefixes_beyond_address_size = allow;
        self
    }

    #[must_use]
    pub fn embedded_ipv4(mut self, embedded: Ipv4FormatParams) -> Self {
        self.params.embedded_ipv4 = embedded;
        self
    }

    #[must_use]
    pub fn build(self) -> Ipv6FormatParams {
        self.params
    }
}
