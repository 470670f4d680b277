//! ipstr - validating parser for IP address, MAC address and host name strings
//!
//! Strings go in, one of two things comes out: a positioned, keyed
//! [`AddressStringError`], or a lightweight description of what the string
//! denotes. Nothing is materialized into `std::net` types until asked for.
//!
//! # Architecture
//!
//! - [`params`] — immutable, builder-made options for every family
//! - [`validate_ip_address_string`] — single-pass scanner producing a
//!   [`ParsedIpAddress`] and its [`Qualifier`] (prefix, mask, zone)
//! - [`choose_provider`] — classifies the result as an [`IpAddressProvider`],
//!   sharing common outcomes through the [`ProviderCache`]
//! - [`validate_mac_address`] and [`validate_host`] for the other families
//! - [`IpAddressString`], [`MacAddressString`], [`HostName`] — wrappers that
//!   validate lazily, once, from any thread
//!
//! # Example
//!
//! ```
//! use ipstr::prelude::*;
//!
//! let addr = IpAddressString::new("192.168.0.0/16");
//! assert_eq!(addr.version(), Some(IpVersion::V4));
//! assert_eq!(addr.prefix_len(), Some(16));
//!
//! let err = IpAddressString::new("1.2.3.256").validate().unwrap_err();
//! assert_eq!(err.key(), ErrorKey::SegmentTooLarge);
//! assert_eq!(err.index(), Some(6));
//!
//! let strict = IpAddressStringParams::builder()
//!     .range(RangeParams::NO_RANGE)
//!     .build();
//! assert!(!IpAddressString::with_params("1.*.3.4", strict).is_valid());
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod address_string;
mod base85;
mod cache;
mod digits;
mod error;
mod host;
pub mod params;
mod parse_data;
mod provider;
mod qualifier;
mod validator;
mod version;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Wrappers
pub use address_string::{HostName, IpAddressString, MacAddressString};

// Validation
pub use host::{validate_host, HostKind, ParsedHost};
pub use qualifier::{parse_port, parse_qualifier, parse_service, Qualifier};
pub use validator::{
    validate_address, validate_ip_address_string, validate_mac_address, MacFormat,
    ParsedMacAddress,
};

// Parse results
pub use parse_data::{
    AddressParseData, Bound, ParsedIpAddress, SegmentEntry, SegmentFlags, Segments, MAX_SEGMENTS,
};
pub use provider::{choose_provider, loopback_address, mask_address, IpAddressProvider};
pub use cache::ProviderCache;

// Errors
pub use error::{AddressStringError, ErrorKey, ErrorKind};

// Options
pub use params::{
    AllStrategy, EmptyStrategy, FormatParams, HostNameParams, IpAddressStringParams,
    Ipv4FormatParams, Ipv6FormatParams, MacAddressStringParams, MacFormatParams, MacSize,
    RangeParams,
};
pub use version::IpVersion;

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use ipstr::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Errors
        AddressStringError,
        ErrorKey,
        ErrorKind,
        // Wrappers
        HostName,
        // Options
        HostNameParams,
        IpAddressProvider,
        IpAddressString,
        IpAddressStringParams,
        IpVersion,
        MacAddressString,
        MacAddressStringParams,
        RangeParams,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum length of a host string in bytes.
pub const MAX_HOST_LENGTH: usize = 253;

/// Maximum length of one DNS label.
pub const MAX_LABEL_LENGTH: usize = 63;

/// Maximum number of DNS labels in a host name.
pub const MAX_LABEL_COUNT: usize = 127;
