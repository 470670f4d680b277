//! `IpAddressStringParams` — top-level rules for IP address strings

use super::{FormatParams, Ipv4FormatParams, Ipv6FormatParams, RangeParams};
use crate::IpVersion;

/// What an empty address string denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum EmptyStrategy {
    /// Valid, but there is no address behind it.
    NoAddress,
    /// `0.0.0.0` or `::`.
    ZeroAddress,
    /// `127.0.0.1` or `::1`.
    #[default]
    Loopback,
}

/// What the all-addresses string `*` denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum AllStrategy {
    /// Every address of the inferred version.
    #[default]
    All,
    /// Valid syntax that resolves to the invalid provider.
    Invalid,
}

/// Which IP address notations a string may use.
///
/// Built once and shared. All fields are `Copy`, so nested parses derive
/// their own params (mask, embedded IPv4) by value.
///
/// ```
/// use ipstr::{IpAddressStringParams, RangeParams};
///
/// let strict = IpAddressStringParams::builder()
///     .range(RangeParams::NO_RANGE)
///     .allow_empty(false)
///     .build();
/// assert!(!strict.allows_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct IpAddressStringParams {
    ipv4: Ipv4FormatParams,
    ipv6: Ipv6FormatParams,
    empty: bool,
    all: bool,
    single_segment: bool,
    prefix: bool,
    mask: bool,
    prefix_only: bool,
    empty_parsed_as: EmptyStrategy,
    all_parsed_as: AllStrategy,
    preferred_version: Option<IpVersion>,
    ipv4_allowed: bool,
    ipv6_allowed: bool,
}

impl IpAddressStringParams {
    #[must_use]
    pub fn builder() -> IpAddressStringParamsBuilder {
        IpAddressStringParamsBuilder {
            params: Self::default(),
        }
    }

    #[must_use]
    pub fn to_builder(&self) -> IpAddressStringParamsBuilder {
        IpAddressStringParamsBuilder { params: *self }
    }

    #[must_use]
    pub fn ipv4(&self) -> Ipv4FormatParams {
        self.ipv4
    }

    #[must_use]
    pub fn ipv6(&self) -> Ipv6FormatParams {
        self.ipv6
    }

    #[must_use]
    pub fn allows_empty(&self) -> bool {
        self.empty
    }

    /// Whether a lone `*` denotes all addresses.
    #[must_use]
    pub fn allows_all(&self) -> bool {
        self.all
    }

    /// Whether an address may be written without separators.
    #[must_use]
    pub fn allows_single_segment(&self) -> bool {
        self.single_segment
    }

    #[must_use]
    pub fn allows_prefix(&self) -> bool {
        self.prefix
    }

    #[must_use]
    pub fn allows_mask(&self) -> bool {
        self.mask
    }

    /// Whether `/16` or `/255.255.0.0` with no address is valid.
    #[must_use]
    pub fn allows_prefix_only(&self) -> bool {
        self.prefix_only
    }

    #[must_use]
    pub fn empty_parsed_as(&self) -> EmptyStrategy {
        self.empty_parsed_as
    }

    #[must_use]
    pub fn all_parsed_as(&self) -> AllStrategy {
        self.all_parsed_as
    }

    #[must_use]
    pub fn preferred_version(&self) -> Option<IpVersion> {
        self.preferred_version
    }

    #[must_use]
    pub fn allows_ipv4(&self) -> bool {
        self.ipv4_allowed
    }

    #[must_use]
    pub fn allows_ipv6(&self) -> bool {
        self.ipv6_allowed
    }

    #[must_use]
    pub fn allows_version(&self, version: IpVersion) -> bool {
        match version {
            IpVersion::V4 => self.ipv4_allowed,
            IpVersion::V6 => self.ipv6_allowed,
        }
    }

    /// The only permitted version, if exactly one is permitted.
    #[must_use]
    pub fn single_allowed_version(&self) -> Option<IpVersion> {
        match (self.ipv4_allowed, self.ipv6_allowed) {
            (true, false) => Some(IpVersion::V4),
            (false, true) => Some(IpVersion::V6),
            _ => None,
        }
    }

    /// Whether these are exactly the default params.
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Params for the address after `/` in `1.2.3.4/255.255.0.0`.
    ///
    /// A mask is one plain address: no wildcards, qualifiers, zones or
    /// empty strings.
    pub(crate) fn mask_params(&self) -> Self {
        fn plain(format: FormatParams) -> FormatParams {
            format
                .to_builder()
                .range(RangeParams::NO_RANGE)
                .allow_wildcarded_separator(false)
                .build()
        }
        let ipv4 = self.ipv4.to_builder().format(plain(self.ipv4.format())).build();
        let embedded = self.ipv6.embedded_ipv4();
        let ipv6 = self
            .ipv6
            .to_builder()
            .format(plain(self.ipv6.format()))
            .allow_zone(false)
            .allow_base85(false)
            .embedded_ipv4(embedded.to_builder().format(plain(embedded.format())).build())
            .build();
        Self {
            ipv4,
            ipv6,
            empty: false,
            all: false,
            single_segment: false,
            prefix: false,
            mask: false,
            prefix_only: false,
            ipv4_allowed: true,
            ipv6_allowed: true,
            ..*self
        }
    }

    /// Params for the IPv4 section of a mixed IPv6 address.
    pub(crate) fn embedded_ipv4_params(&self) -> Self {
        let ipv4 = self
            .ipv6
            .embedded_ipv4()
            .to_builder()
            .allow_inet_aton_joined_segments(false)
            .build();
        Self {
            ipv4,
            empty: false,
            all: false,
            single_segment: false,
            prefix: false,
            mask: false,
            prefix_only: false,
            ipv4_allowed: true,
            ipv6_allowed: false,
            ..*self
        }
    }
}

impl Default for IpAddressStringParams {
    fn default() -> Self {
        Self {
            ipv4: Ipv4FormatParams::default(),
            ipv6: Ipv6FormatParams::default(),
            empty: true,
            all: true,
            single_segment: true,
            prefix: true,
            mask: true,
            prefix_only: true,
            empty_parsed_as: EmptyStrategy::default(),
            all_parsed_as: AllStrategy::default(),
            preferred_version: None,
            ipv4_allowed: true,
            ipv6_allowed: true,
        }
    }
}

/// Builder for [`IpAddressStringParams`].
#[derive(Debug, Clone, Copy)]
pub struct IpAddressStringParamsBuilder {
    params: IpAddressStringParams,
}

impl IpAddressStringParamsBuilder {
    #[must_use]
    pub fn ipv4(mut self, ipv4: Ipv4FormatParams) -> Self {
        self.params.ipv4 = ipv4;
        self
    }

    #[must_use]
    pub fn ipv6(mut self, ipv6: Ipv6FormatParams) -> Self {
        self.params.ipv6 = ipv6;
        self
    }

    /// Replace the range rules of every family, embedded IPv4 included.
    #[must_use]
    pub fn range(mut self, range: RangeParams) -> Self {
        self.params.ipv4 = self.params.ipv4.to_builder().range(range).build();
        self.params.ipv6 = self.params.ipv6.to_builder().range(range).build();
        self
    }

    /// Toggle the inet_aton hex, octal and joined notations for IPv4.
    #[must_use]
    pub fn allow_inet_aton(mut self, allow: bool) -> Self {
        self.params.ipv4 = self.params.ipv4.to_builder().allow_inet_aton(allow).build();
        self
    }

    /// Toggle wildcarded separators for both families.
    #[must_use]
    pub fn allow_wildcarded_separator(mut self, allow: bool) -> Self {
        let v4 = self.params.ipv4.format();
        let v6 = self.params.ipv6.format();
        self.params.ipv4 = self
            .params
            .ipv4
            .to_builder()
            .format(v4.to_builder().allow_wildcarded_separator(allow).build())
            .build();
        self.params.ipv6 = self
            .params
            .ipv6
            .to_builder()
            .format(v6.to_builder().allow_wildcarded_separator(allow).build())
            .build();
        self
    }

    #[must_use]
    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.params.empty = allow;
        self
    }

    #[must_use]
    pub fn allow_all(mut self, allow: bool) -> Self {
        self.params.all = allow;
        self
    }

    #[must_use]
    pub fn allow_single_segment(mut self, allow: bool) -> Self {
        self.params.single_segment = allow;
        self
    }

    #[must_use]
    pub fn allow_prefix(mut self, allow: bool) -> Self {
        self.params.prefix = allow;
        self
    }

    #[must_use]
    pub fn allow_mask(mut self, allow: bool) -> Self {
        self.params.mask = allow;
        self
    }

    #[must_use]
    pub fn allow_prefix_only(mut self, allow: bool) -> Self {
        self.params.prefix_only = allow;
        self
    }

    #[must_use]
    pub fn empty_parsed_as(mut self, strategy: EmptyStrategy) -> Self {
        self.params.empty_parsed_as = strategy;
        self
    }

    #[must_use]
    pub fn all_parsed_as(mut self, strategy: AllStrategy) -> Self {
        self.params.all_parsed_as = strategy;
        self
    }

    #[must_use]
    pub fn preferred_version(mut self, version: impl Into<Option<IpVersion>>) -> Self {
        self.params.preferred_version = version.into();
        self
    }

    #[must_use]
    pub fn allow_ipv4(mut self, allow: bool) -> Self {
        self.params.ipv4_allowed = allow;
        self
    }

    #[must_use]
    pub fn allow_ipv6(mut self, allow: bool) -> Self {
        self.params.ipv6_allowed = allow;
        self
    }

    #[must_use]
    pub fn build(self) -> IpAddressStringParams {
        self.params
    }
}
