//! `IpAddressProvider` — what a validated address string denotes
//!
//! A provider is a description, not an address: bounds are materialized
//! into `std::net` types only when asked for. Providers for the common
//! default-params cases come from the process-wide [`ProviderCache`].

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

use crate::cache::ProviderCache;
use crate::digits::max_value;
use crate::params::{AllStrategy, EmptyStrategy, IpAddressStringParams};
use crate::parse_data::{to_ip_addr, ParsedIpAddress};
use crate::qualifier::Qualifier;
use crate::IpVersion;

/// One deferred outcome of a successful parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IpAddressProvider {
    /// Valid syntax that denotes no usable address (`*` under
    /// [`AllStrategy::Invalid`]).
    Invalid,
    /// The empty string.
    Empty {
        strategy: EmptyStrategy,
        version: Option<IpVersion>,
    },
    /// `*`, possibly qualified (`*%eth0`, `*/64`).
    AllAddresses {
        version: Option<IpVersion>,
        qualifier: Qualifier,
    },
    /// A prefix or mask with no address (`/16`, `/255.255.0.0`).
    Mask { version: IpVersion, prefix_len: u8 },
    /// An address, range or wildcard with its qualifier.
    Parsed {
        address: Box<ParsedIpAddress>,
        qualifier: Qualifier,
    },
}

impl IpAddressProvider {
    #[must_use]
    pub fn version(&self) -> Option<IpVersion> {
        match self {
            Self::Invalid => None,
            Self::Empty { version, .. } | Self::AllAddresses { version, .. } => *version,
            Self::Mask { version, .. } => Some(*version),
            Self::Parsed { address, .. } => address.version(),
        }
    }

    #[must_use]
    pub fn qualifier(&self) -> Option<&Qualifier> {
        match self {
            Self::AllAddresses { qualifier, .. } | Self::Parsed { qualifier, .. } => Some(qualifier),
            _ => None,
        }
    }

    /// Network prefix length, from `/NN` or a contiguous mask.
    #[must_use]
    pub fn prefix_len(&self) -> Option<u8> {
        match self {
            Self::Mask { prefix_len, .. } => Some(*prefix_len),
            _ => self.qualifier().and_then(Qualifier::network_prefix_len),
        }
    }

    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::AllAddresses { .. })
    }

    #[must_use]
    pub fn is_mask(&self) -> bool {
        matches!(self, Self::Mask { .. })
    }

    /// Whether more than one address is denoted.
    #[must_use]
    pub fn is_multiple(&self) -> bool {
        match self {
            Self::AllAddresses { .. } => true,
            Self::Parsed { address, .. } => address.is_multiple(),
            _ => false,
        }
    }

    /// The (lowest) address denoted.
    ///
    /// An empty string with no inferable version materializes as IPv4.
    #[must_use]
    pub fn address(&self) -> Option<IpAddr> {
        match self {
            Self::Invalid
            | Self::Empty {
                strategy: EmptyStrategy::NoAddress,
                ..
            } => None,
            Self::Empty {
                strategy: EmptyStrategy::ZeroAddress,
                version,
            } => to_ip_addr(version.unwrap_or(IpVersion::V4), 0),
            Self::Empty {
                strategy: EmptyStrategy::Loopback,
                version,
            } => Some(loopback_address(version.unwrap_or(IpVersion::V4))),
            Self::AllAddresses { version, .. } => to_ip_addr((*version)?, 0),
            Self::Mask {
                version,
                prefix_len,
            } => Some(mask_address(*version, *prefix_len)),
            Self::Parsed { address, .. } => address.lower_address(),
        }
    }

    /// The highest address denoted.
    #[must_use]
    pub fn upper_address(&self) -> Option<IpAddr> {
        match self {
            Self::AllAddresses { version, .. } => {
                let version = (*version)?;
                to_ip_addr(version, max_value(version.bit_count()))
            }
            Self::Parsed { address, .. } => address.upper_address(),
            _ => self.address(),
        }
    }
}

/// `127.0.0.1` or `::1`.
#[must_use]
pub fn loopback_address(version: IpVersion) -> IpAddr {
    match version {
        IpVersion::V4 => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpVersion::V6 => IpAddr::V6(Ipv6Addr::LOCALHOST),
    }
}

/// The network mask with `prefix_len` leading ones.
#[must_use]
pub fn mask_address(version: IpVersion, prefix_len: u8) -> IpAddr {
    let bits = version.bit_count();
    let ones = u32::from(prefix_len).min(bits);
    let value = max_value(bits) & !max_value(bits - ones);
    match version {
        IpVersion::V4 => IpAddr::V4(Ipv4Addr::from(u32::try_from(value).unwrap_or(u32::MAX))),
        IpVersion::V6 => IpAddr::V6(Ipv6Addr::from(value)),
    }
}

/// Version inference: segments, then qualifier, then the one allowed
/// family, then the preferred version.
pub(crate) fn infer_version(
    params: &IpAddressStringParams,
    parsed: &ParsedIpAddress,
    qualifier: &Qualifier,
) -> Option<IpVersion> {
    parsed
        .version()
        .or_else(|| qualifier.implied_version())
        .or_else(|| params.single_allowed_version())
        .or_else(|| params.preferred_version())
}

/// Classify a validated address and qualifier.
///
/// Default-params prefix-only masks, empty loopback strings and invalid
/// providers are shared through [`ProviderCache::global`].
#[must_use]
pub fn choose_provider(
    params: &IpAddressStringParams,
    parsed: ParsedIpAddress,
    qualifier: Qualifier,
) -> Arc<IpAddressProvider> {
    let cache = ProviderCache::global();
    let version = infer_version(params, &parsed, &qualifier);

    if parsed.is_empty() {
        if let Some(prefix_len) = qualifier.network_prefix_len() {
            let version = version.unwrap_or(if u32::from(prefix_len) > IpVersion::V4.bit_count() {
                IpVersion::V6
            } else {
                IpVersion::V4
            });
            if params.is_default() {
                return cache.mask(version, prefix_len);
            }
            return Arc::new(IpAddressProvider::Mask {
                version,
                prefix_len,
            });
        }
        let strategy = params.empty_parsed_as();
        if params.is_default() {
            return cache.loopback(version);
        }
        return Arc::new(IpAddressProvider::Empty { strategy, version });
    }

    if parsed.is_all() {
        if params.all_parsed_as() == AllStrategy::Invalid {
            return cache.invalid();
        }
        return Arc::new(IpAddressProvider::AllAddresses { version, qualifier });
    }

    Arc::new(IpAddressProvider::Parsed {
        address: Box::new(parsed),
        qualifier,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate_ip_address_string;

    fn provider(params: &IpAddressStringParams, text: &str) -> Arc<IpAddressProvider> {
        let (parsed, qualifier) = validate_ip_address_string(params, text).unwrap();
        choose_provider(params, parsed, qualifier)
    }

    fn default_provider(text: &str) -> Arc<IpAddressProvider> {
        provider(&IpAddressStringParams::default(), text)
    }

    #[test]
    fn parsed_address() {
        let p = default_provider("192.168.1.1");
        assert_eq!(p.version(), Some(IpVersion::V4));
        assert_eq!(p.address(), Some("192.168.1.1".parse().unwrap()));
        assert!(!p.is_multiple());
    }

    #[test]
    fn all_addresses_take_preferred_version() {
        let params = IpAddressStringParams::builder()
            .preferred_version(IpVersion::V6)
            .build();
        let p = provider(&params, "*");
        assert!(p.is_all());
        assert_eq!(p.version(), Some(IpVersion::V6));
        assert_eq!(p.address(), Some("::".parse().unwrap()));
        assert_eq!(
            p.upper_address(),
            Some("ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff".parse().unwrap())
        );
    }

    #[test]
    fn all_addresses_version_from_zone() {
        let p = default_provider("*%eth0");
        assert_eq!(p.version(), Some(IpVersion::V6));
        assert_eq!(p.qualifier().and_then(Qualifier::zone), Some("eth0"));
    }

    #[test]
    fn all_as_invalid() {
        let params = IpAddressStringParams::builder()
            .all_parsed_as(AllStrategy::Invalid)
            .build();
        let p = provider(&params, "*");
        assert!(p.is_invalid());
        assert_eq!(p.address(), None);
    }

    #[test]
    fn empty_is_loopback() {
        let p = default_provider("");
        assert!(p.is_empty());
        assert_eq!(p.address(), Some(IpAddr::V4(Ipv4Addr::LOCALHOST)));

        let params = IpAddressStringParams::builder()
            .preferred_version(IpVersion::V6)
            .build();
        let p = provider(&params, "");
        assert_eq!(p.address(), Some(IpAddr::V6(Ipv6Addr::LOCALHOST)));

        let params = IpAddressStringParams::builder().allow_ipv4(false).build();
        let p = provider(&params, "");
        assert_eq!(p.version(), Some(IpVersion::V6));
        assert_eq!(p.address(), Some(IpAddr::V6(Ipv6Addr::LOCALHOST)));
    }

    #[test]
    fn empty_strategies() {
        let params = IpAddressStringParams::builder()
            .empty_parsed_as(EmptyStrategy::NoAddress)
            .build();
        assert_eq!(provider(&params, "").address(), None);

        let params = IpAddressStringParams::builder()
            .empty_parsed_as(EmptyStrategy::ZeroAddress)
            .build();
        assert_eq!(
            provider(&params, "").address(),
            Some(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
        );
    }

    #[test]
    fn prefix_only_is_mask() {
        let p = default_provider("/16");
        assert!(p.is_mask());
        assert_eq!(p.prefix_len(), Some(16));
        assert_eq!(p.address(), Some("255.255.0.0".parse().unwrap()));

        let p = default_provider("/64");
        assert_eq!(p.version(), Some(IpVersion::V6));
        assert_eq!(p.address(), Some("ffff:ffff:ffff:ffff::".parse().unwrap()));

        let p = default_provider("/255.255.255.0");
        assert_eq!(p.version(), Some(IpVersion::V4));
        assert_eq!(p.prefix_len(), Some(24));
    }

    #[test]
    fn default_masks_are_shared() {
        let a = default_provider("/24");
        let b = default_provider("/24");
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn mask_addresses() {
        assert_eq!(mask_address(IpVersion::V4, 0), IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(mask_address(IpVersion::V4, 32), IpAddr::V4(Ipv4Addr::BROADCAST));
        assert_eq!(mask_address(IpVersion::V4, 12), "255.240.0.0".parse::<IpAddr>().unwrap());
        assert_eq!(mask_address(IpVersion::V6, 128), "ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn qualified_prefix() {
        let p = default_provider("1.2.3.4/255.255.0.0");
        assert_eq!(p.prefix_len(), Some(16));
        assert_eq!(p.qualifier().and_then(Qualifier::prefix_len), None);
        let q = default_provider("1.2.3.4/16");
        assert_eq!(q.prefix_len(), p.prefix_len());
        assert_eq!(q.address(), p.address());
    }
}
