//! ipstr-test: Conformance domain for ipstr
//!
//! Reduces any validation outcome (IP, MAC or host) to a flat
//! [`Observation`] that fixtures can compare field by field.
//!
//! # Example
//!
//! ```
//! use ipstr_test::prelude::*;
//!
//! let seen = Family::Ip.observe_default("10.0.0.0/8");
//! assert!(seen.valid);
//! assert_eq!(seen.prefix_len, Some(8));
//! assert_eq!(seen.address.as_deref(), Some("10.0.0.0"));
//!
//! let seen = Family::Ip.observe_default("1.2.3.256");
//! assert_eq!(seen.error, Some(ErrorKey::SegmentTooLarge));
//! assert_eq!(seen.index, Some(6));
//! ```

use ipstr::prelude::*;
use ipstr::{validate_host, validate_mac_address, HostKind};

#[cfg(feature = "fixtures")]
pub mod fixture;

/// Which validator a string goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "fixtures",
    derive(serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Family {
    Ip,
    Mac,
    Host,
}

/// Everything a fixture may assert about one string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Observation {
    pub valid: bool,
    pub error: Option<ErrorKey>,
    pub kind: Option<ErrorKind>,
    pub index: Option<usize>,
    pub cause: Option<ErrorKey>,
    pub version: Option<IpVersion>,
    /// Lowest address, in `std::net` display form (or hex for MAC).
    pub address: Option<String>,
    pub upper: Option<String>,
    pub prefix_len: Option<u8>,
    pub zone: Option<String>,
    pub port: Option<u16>,
    pub service: Option<String>,
    pub name: Option<String>,
    pub bits: Option<u32>,
    pub multiple: bool,
}

impl Observation {
    fn failed(err: &AddressStringError) -> Self {
        Self {
            error: Some(err.key()),
            kind: Some(err.kind()),
            index: err.index(),
            cause: err.cause().map(AddressStringError::key),
            ..Self::default()
        }
    }

    fn from_provider(provider: &IpAddressProvider) -> Self {
        let qualifier = provider.qualifier();
        Self {
            valid: true,
            version: provider.version(),
            address: provider.address().map(|a| a.to_string()),
            upper: provider.upper_address().map(|a| a.to_string()),
            prefix_len: provider.prefix_len(),
            zone: qualifier.and_then(|q| q.zone()).map(str::to_owned),
            multiple: provider.is_multiple(),
            ..Self::default()
        }
    }
}

impl Family {
    /// Validate `text` under default params.
    #[must_use]
    pub fn observe_default(self, text: &str) -> Observation {
        match self {
            Self::Ip => observe_ip(&IpAddressStringParams::default(), text),
            Self::Mac => observe_mac(&MacAddressStringParams::default(), text),
            Self::Host => observe_host(&HostNameParams::default(), text),
        }
    }
}

/// Validate an IP address string and record the outcome.
#[must_use]
pub fn observe_ip(params: &IpAddressStringParams, text: &str) -> Observation {
    let s = IpAddressString::with_params(text, *params);
    match s.provider() {
        Ok(provider) => Observation::from_provider(provider),
        Err(err) => Observation::failed(&err),
    }
}

/// Validate a MAC address string and record the outcome.
#[must_use]
pub fn observe_mac(params: &MacAddressStringParams, text: &str) -> Observation {
    match validate_mac_address(params, text) {
        Ok(mac) => Observation {
            valid: true,
            address: mac.lower_value().map(|v| format!("{v:x}")),
            upper: mac.upper_value().map(|v| format!("{v:x}")),
            bits: mac.bit_count(),
            multiple: mac.is_multiple(),
            ..Observation::default()
        },
        Err(err) => Observation::failed(&err),
    }
}

/// Validate a host string and record the outcome.
#[must_use]
pub fn observe_host(params: &HostNameParams, text: &str) -> Observation {
    let host = match validate_host(params, text) {
        Ok(host) => host,
        Err(err) => return Observation::failed(&err),
    };
    let mut seen = match host.kind() {
        HostKind::Address(provider) => Observation::from_provider(provider),
        HostKind::Name(name) => Observation {
            valid: true,
            name: Some(name.clone()),
            ..Observation::default()
        },
        HostKind::Empty { loopback } => Observation {
            valid: true,
            address: loopback.map(|a| a.to_string()),
            ..Observation::default()
        },
    };
    seen.port = host.port();
    seen.service = host.service().map(str::to_owned);
    seen
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{observe_host, observe_ip, observe_mac, Family, Observation};
    pub use ipstr::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ip_observation() {
        let seen = observe_ip(&IpAddressStringParams::default(), "fe80::1%eth0/64");
        assert!(seen.valid);
        assert_eq!(seen.version, Some(IpVersion::V6));
        assert_eq!(seen.zone.as_deref(), Some("eth0"));
        assert_eq!(seen.prefix_len, Some(64));
    }

    #[test]
    fn failure_observation() {
        let seen = Family::Ip.observe_default("::ffff:1.2.3.999");
        assert!(!seen.valid);
        assert_eq!(seen.error, Some(ErrorKey::InvalidMixedAddress));
        assert_eq!(seen.cause, Some(ErrorKey::SegmentTooLarge));
    }

    #[test]
    fn mac_observation() {
        let seen = Family::Mac.observe_default("aa:bb:cc:dd:ee:ff");
        assert_eq!(seen.address.as_deref(), Some("aabbccddeeff"));
        assert_eq!(seen.bits, Some(48));
    }

    #[test]
    fn host_observation() {
        let seen = Family::Host.observe_default("Example.org:http");
        assert_eq!(seen.name.as_deref(), Some("example.org"));
        assert_eq!(seen.service.as_deref(), Some("http"));

        let seen = Family::Host.observe_default("[::1]:443");
        assert_eq!(seen.address.as_deref(), Some("::1"));
        assert_eq!(seen.port, Some(443));
    }
}
