//! String wrappers with lazy, memoized validation
//!
//! [`IpAddressString`], [`MacAddressString`] and [`HostName`] hold the text
//! and its params. The first query validates and stores the outcome in a
//! [`OnceLock`]; later queries, from any thread, read the stored outcome.
//! `FromStr` validates eagerly with default params.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use crate::error::AddressStringError;
use crate::host::{validate_host, ParsedHost};
use crate::params::{HostNameParams, IpAddressStringParams, MacAddressStringParams};
use crate::provider::{choose_provider, IpAddressProvider};
use crate::validator::{validate_ip_address_string, validate_mac_address, ParsedMacAddress};
use crate::IpVersion;

fn rejected(kind: &'static str, text: &str, err: &AddressStringError) {
    tracing::debug!(kind, text, key = %err.key(), index = ?err.index(), "validation failed");
}

// ═══════════════════════════════════════════════════════════════════════════════
// IP addresses
// ═══════════════════════════════════════════════════════════════════════════════

/// An IP address string.
///
/// ```
/// use ipstr::IpAddressString;
///
/// let s = IpAddressString::new("10.0.0.0/8");
/// assert!(s.is_valid());
/// assert_eq!(s.prefix_len(), Some(8));
/// assert_eq!(s.to_address(), Some("10.0.0.0".parse().unwrap()));
/// ```
#[derive(Debug, Clone)]
pub struct IpAddressString {
    text: String,
    params: IpAddressStringParams,
    outcome: OnceLock<Result<Arc<IpAddressProvider>, AddressStringError>>,
}

impl IpAddressString {
    /// Wrap `text` under default params. Nothing is validated yet.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_params(text, IpAddressStringParams::default())
    }

    #[must_use]
    pub fn with_params(text: impl Into<String>, params: IpAddressStringParams) -> Self {
        Self {
            text: text.into(),
            params,
            outcome: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn params(&self) -> &IpAddressStringParams {
        &self.params
    }

    fn outcome(&self) -> &Result<Arc<IpAddressProvider>, AddressStringError> {
        self.outcome.get_or_init(|| {
            validate_ip_address_string(&self.params, &self.text)
                .map(|(parsed, qualifier)| choose_provider(&self.params, parsed, qualifier))
                .inspect_err(|err| rejected("ip", &self.text, err))
        })
    }

    /// Validate, once.
    ///
    /// # Errors
    ///
    /// The first rule the string violates.
    pub fn validate(&self) -> Result<(), AddressStringError> {
        self.outcome().as_ref().map(|_| ()).map_err(Clone::clone)
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.outcome().is_ok()
    }

    /// # Errors
    ///
    /// The validation failure, when the string is invalid.
    pub fn provider(&self) -> Result<&Arc<IpAddressProvider>, AddressStringError> {
        self.outcome().as_ref().map_err(Clone::clone)
    }

    #[must_use]
    pub fn version(&self) -> Option<IpVersion> {
        self.provider().ok()?.version()
    }

    #[must_use]
    pub fn prefix_len(&self) -> Option<u8> {
        self.provider().ok()?.prefix_len()
    }

    /// The (lowest) address, or `None` when invalid or addressless.
    #[must_use]
    pub fn to_address(&self) -> Option<IpAddr> {
        self.provider().ok()?.address()
    }

    #[must_use]
    pub fn to_upper_address(&self) -> Option<IpAddr> {
        self.provider().ok()?.upper_address()
    }
}

impl FromStr for IpAddressString {
    type Err = AddressStringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Self::new(s);
        value.validate()?;
        Ok(value)
    }
}

impl fmt::Display for IpAddressString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// MAC addresses
// ═══════════════════════════════════════════════════════════════════════════════

/// A MAC address string.
#[derive(Debug, Clone)]
pub struct MacAddressString {
    text: String,
    params: MacAddressStringParams,
    outcome: OnceLock<Result<ParsedMacAddress, AddressStringError>>,
}

impl MacAddressString {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_params(text, MacAddressStringParams::default())
    }

    #[must_use]
    pub fn with_params(text: impl Into<String>, params: MacAddressStringParams) -> Self {
        Self {
            text: text.into(),
            params,
            outcome: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn params(&self) -> &MacAddressStringParams {
        &self.params
    }

    fn outcome(&self) -> &Result<ParsedMacAddress, AddressStringError> {
        self.outcome.get_or_init(|| {
            validate_mac_address(&self.params, &self.text)
                .inspect_err(|err| rejected("mac", &self.text, err))
        })
    }

    /// # Errors
    ///
    /// The first rule the string violates.
    pub fn validate(&self) -> Result<(), AddressStringError> {
        self.outcome().as_ref().map(|_| ()).map_err(Clone::clone)
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.outcome().is_ok()
    }

    /// # Errors
    ///
    /// The validation failure, when the string is invalid.
    pub fn parsed(&self) -> Result<&ParsedMacAddress, AddressStringError> {
        self.outcome().as_ref().map_err(Clone::clone)
    }

    /// The (lowest) address as an integer.
    #[must_use]
    pub fn to_value(&self) -> Option<u64> {
        self.parsed().ok()?.lower_value()
    }
}

impl FromStr for MacAddressString {
    type Err = AddressStringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Self::new(s);
        value.validate()?;
        Ok(value)
    }
}

impl fmt::Display for MacAddressString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Host names
// ═══════════════════════════════════════════════════════════════════════════════

/// A host string: name, address or empty, with optional port or service.
#[derive(Debug, Clone)]
pub struct HostName {
    text: String,
    params: HostNameParams,
    outcome: OnceLock<Result<ParsedHost, AddressStringError>>,
}

impl HostName {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_params(text, HostNameParams::default())
    }

    #[must_use]
    pub fn with_params(text: impl Into<String>, params: HostNameParams) -> Self {
        Self {
            text: text.into(),
            params,
            outcome: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn params(&self) -> &HostNameParams {
        &self.params
    }

    fn outcome(&self) -> &Result<ParsedHost, AddressStringError> {
        self.outcome.get_or_init(|| {
            validate_host(&self.params, &self.text)
                .inspect_err(|err| rejected("host", &self.text, err))
        })
    }

    /// # Errors
    ///
    /// The first rule the string violates.
    pub fn validate(&self) -> Result<(), AddressStringError> {
        self.outcome().as_ref().map(|_| ()).map_err(Clone::clone)
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.outcome().is_ok()
    }

    /// # Errors
    ///
    /// The validation failure, when the string is invalid.
    pub fn parsed(&self) -> Result<&ParsedHost, AddressStringError> {
        self.outcome().as_ref().map_err(Clone::clone)
    }

    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.parsed().ok()?.port()
    }

    /// The address the host denotes without a DNS lookup.
    #[must_use]
    pub fn to_address(&self) -> Option<IpAddr> {
        self.parsed().ok()?.address()
    }
}

impl FromStr for HostName {
    type Err = AddressStringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Self::new(s);
        value.validate()?;
        Ok(value)
    }
}

impl fmt::Display for HostName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
