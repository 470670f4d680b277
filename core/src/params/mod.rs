//! Parameter model — which notations a string may use
//!
//! Every params type is a flat `Copy` value with a builder. Leaf params
//! ([`RangeParams`], [`FormatParams`]) are composed into the family params,
//! which are composed into the top-level address, MAC and host params.
//!
//! ```text
//! HostNameParams
//!   └─ IpAddressStringParams
//!        ├─ Ipv4FormatParams ─ FormatParams ─ RangeParams
//!        └─ Ipv6FormatParams ─ FormatParams ─ RangeParams
//!             └─ Ipv4FormatParams (embedded)
//! MacAddressStringParams
//!   └─ MacFormatParams ─ FormatParams ─ RangeParams
//! ```
//!
//! With the `serde` feature every type deserializes from JSON or YAML, and
//! missing fields take their defaults.

mod format;
mod host;
mod ip;
mod mac;
mod range;

pub use format::{
    FormatParams, FormatParamsBuilder, Ipv4FormatParams, Ipv4FormatParamsBuilder,
    Ipv6FormatParams, Ipv6FormatParamsBuilder,
};
pub use host::{HostNameParams, HostNameParamsBuilder};
pub use ip::{AllStrategy, EmptyStrategy, IpAddressStringParams, IpAddressStringParamsBuilder};
pub use mac::{
    MacAddressStringParams, MacAddressStringParamsBuilder, MacFormatParams,
    MacFormatParamsBuilder, MacSize,
};
pub use range::{RangeParams, RangeParamsBuilder};

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let params: IpAddressStringParams =
            serde_json::from_str(r#"{"ipv4": {"inet_aton_octal": true}}"#).unwrap();
        assert!(params.ipv4().allows_inet_aton_octal());
        assert!(!params.ipv4().allows_inet_aton_hex());
        assert!(params.allows_prefix());
    }

    #[test]
    fn yaml_host_params() {
        let yaml = "
expect_port: true
address:
  preferred_version: ipv6
  empty_parsed_as: zero_address
";
        let params: HostNameParams = serde_yaml::from_str(yaml).unwrap();
        assert!(params.expects_port());
        assert_eq!(
            params.address().preferred_version(),
            Some(crate::IpVersion::V6)
        );
        assert_eq!(params.address().empty_parsed_as(), EmptyStrategy::ZeroAddress);
    }

    #[test]
    fn unknown_fields_rejected() {
        let result: Result<RangeParams, _> = serde_json::from_str(r#"{"wildcards": true}"#);
        assert!(result.is_err());
    }
}
