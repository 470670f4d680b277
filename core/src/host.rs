//! Host name validation
//!
//! A host string is a DNS name, an IP address (bracketed or not, with an
//! optional prefix or mask) or empty, followed by an optional `:port` or
//! `:service`.
//!
//! # Port versus prefix
//!
//! `1.2.3.4/16:80` carries both a prefix and a port. When ports are
//! allowed, a `/` tail whose last `:` part is all digits ends with a port;
//! the port is split off first and the rest is the prefix or mask.

use std::net::IpAddr;
use std::sync::Arc;

use crate::error::{AddressStringError, ErrorKey};
use crate::params::{HostNameParams, IpAddressStringParams};
use crate::provider::{choose_provider, infer_version, loopback_address, IpAddressProvider};
use crate::qualifier::{parse_port, parse_qualifier, parse_service};
use crate::validator::parse_address_string;
use crate::{IpVersion, MAX_HOST_LENGTH, MAX_LABEL_COUNT, MAX_LABEL_LENGTH};

/// What a host string names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HostKind {
    /// The empty string; `loopback` is set when it stands for the local host.
    Empty { loopback: Option<IpAddr> },
    /// An IP address, possibly bracketed.
    Address(Arc<IpAddressProvider>),
    /// A DNS name, lowercased unless normalization is off, without a
    /// trailing dot.
    Name(String),
}

/// A validated host string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParsedHost {
    kind: HostKind,
    port: Option<u16>,
    service: Option<String>,
}

impl ParsedHost {
    #[must_use]
    pub fn kind(&self) -> &HostKind {
        &self.kind
    }

    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    #[must_use]
    pub fn service(&self) -> Option<&str> {
        self.service.as_deref()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self.kind, HostKind::Empty { .. })
    }

    #[must_use]
    pub fn is_address(&self) -> bool {
        matches!(self.kind, HostKind::Address(_))
    }

    #[must_use]
    pub fn provider(&self) -> Option<&Arc<IpAddressProvider>> {
        match &self.kind {
            HostKind::Address(provider) => Some(provider),
            _ => None,
        }
    }

    /// The DNS name, when the host is one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            HostKind::Name(name) => Some(name),
            _ => None,
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.name().into_iter().flat_map(|name| name.split('.'))
    }

    /// The address denoted, without DNS resolution.
    #[must_use]
    pub fn address(&self) -> Option<IpAddr> {
        match &self.kind {
            HostKind::Empty { loopback } => *loopback,
            HostKind::Address(provider) => provider.address(),
            HostKind::Name(_) => None,
        }
    }
}

/// Validate a host string.
///
/// ```
/// use ipstr::{validate_host, HostNameParams};
///
/// let host = validate_host(&HostNameParams::default(), "Example.COM:443")?;
/// assert_eq!(host.name(), Some("example.com"));
/// assert_eq!(host.port(), Some(443));
///
/// let host = validate_host(&HostNameParams::default(), "[::1]:8080")?;
/// assert_eq!(host.address(), Some("::1".parse().unwrap()));
/// # Ok::<(), ipstr::AddressStringError>(())
/// ```
///
/// # Errors
///
/// Returns the first rule the string violates.
pub fn validate_host(params: &HostNameParams, text: &str) -> Result<ParsedHost, AddressStringError> {
    let err = |key, at| AddressStringError::at(key, text, at);
    if text.is_empty() {
        if !params.allows_empty() {
            return Err(err(ErrorKey::EmptyNotAllowed, 0));
        }
        let loopback = params.empty_is_loopback().then(|| {
            let address = params.address();
            let version = address
                .single_allowed_version()
                .or_else(|| address.preferred_version())
                .unwrap_or(IpVersion::V4);
            loopback_address(version)
        });
        return Ok(ParsedHost {
            kind: HostKind::Empty { loopback },
            port: None,
            service: None,
        });
    }
    if text.len() > MAX_HOST_LENGTH {
        return Err(err(ErrorKey::HostTooLong, MAX_HOST_LENGTH));
    }
    if text.starts_with('[') {
        return validate_bracketed(params, text);
    }

    let bytes = text.as_bytes();
    let colons = bytes.iter().filter(|&&b| b == b':').count();
    let port_colon = match colons {
        0 => None,
        1 => bytes.iter().position(|&b| b == b':'),
        _ => port_after_prefix(params, text, 0, text.len()).or_else(|| {
            if params.expects_port() {
                trailing_port(bytes)
            } else {
                None
            }
        }),
    };
    let (host_end, port, service) = match port_colon {
        Some(colon) => {
            let (port, service) = port_or_service(params, text, colon)?;
            (colon, port, service)
        }
        None => (text.len(), None, None),
    };

    let kind = if looks_like_address(&bytes[..host_end]) {
        if !params.allows_ip_address() {
            return Err(err(ErrorKey::IpAddressNotAllowed, 0));
        }
        let address = params.address();
        let (parsed, qualifier) = parse_address_string(&address, text, 0, host_end)?;
        HostKind::Address(provider(&address, parsed, qualifier, port, service.clone()))
    } else {
        HostKind::Name(validate_name(params, text, host_end)?)
    };
    Ok(ParsedHost {
        kind,
        port,
        service,
    })
}

fn validate_bracketed(params: &HostNameParams, text: &str) -> Result<ParsedHost, AddressStringError> {
    let err = |key, at| AddressStringError::at(key, text, at);
    let close = text
        .find(']')
        .ok_or_else(|| err(ErrorKey::UnterminatedBracket, 0))?;
    if !params.allows_ip_address() {
        return Err(err(ErrorKey::IpAddressNotAllowed, 0));
    }
    let address = params.address();
    let (parsed, mut qualifier) = parse_address_string(&address, text, 1, close)?;
    if parsed.is_empty() && qualifier.is_empty() {
        return Err(err(ErrorKey::EmptyNotAllowed, 1));
    }
    let version = infer_version(&address, &parsed, &qualifier);
    let bracket_allowed = match version {
        Some(IpVersion::V4) => params.allows_bracketed_ipv4(),
        Some(IpVersion::V6) | None => params.allows_bracketed_ipv6(),
    };
    if !bracket_allowed {
        return Err(err(ErrorKey::BracketedNotAllowed, 0));
    }

    let rest = close + 1;
    let (port, service) = match text.as_bytes().get(rest) {
        None => (None, None),
        Some(b':') => port_or_service(params, text, rest)?,
        Some(b'/') => {
            if qualifier.prefix_len().is_some() || qualifier.mask().is_some() {
                return Err(err(ErrorKey::InvalidCharacter, rest));
            }
            let colon = port_after_prefix(params, text, rest, text.len());
            let suffix_end = colon.unwrap_or(text.len());
            let suffix = parse_qualifier(&address, text, rest, suffix_end, parsed.version())?;
            qualifier.prefix_len = suffix.prefix_len;
            qualifier.mask = suffix.mask;
            match colon {
                Some(colon) => port_or_service(params, text, colon)?,
                None => (None, None),
            }
        }
        Some(_) => return Err(err(ErrorKey::InvalidCharacter, rest)),
    };

    let provider = provider(&address, parsed, qualifier, port, service.clone());
    Ok(ParsedHost {
        kind: HostKind::Address(provider),
        port,
        service,
    })
}

fn provider(
    params: &IpAddressStringParams,
    parsed: crate::ParsedIpAddress,
    mut qualifier: crate::Qualifier,
    port: Option<u16>,
    service: Option<String>,
) -> Arc<IpAddressProvider> {
    qualifier.port = port;
    qualifier.service = service;
    choose_provider(params, parsed, qualifier)
}

/// The `:` that starts a port inside a `/` tail of `text[start..end]`.
fn port_after_prefix(params: &HostNameParams, text: &str, start: usize, end: usize) -> Option<usize> {
    if !params.allows_port() {
        return None;
    }
    let bytes = &text.as_bytes()[start..end];
    let slash = bytes.iter().position(|&b| b == b'/')?;
    let colon = slash + bytes[slash..].iter().rposition(|&b| b == b':')?;
    let tail = &bytes[colon + 1..];
    (!tail.is_empty() && tail.iter().all(u8::is_ascii_digit)).then_some(start + colon)
}

/// The last `:` when only digits follow it.
fn trailing_port(bytes: &[u8]) -> Option<usize> {
    let colon = bytes.iter().rposition(|&b| b == b':')?;
    let tail = &bytes[colon + 1..];
    (!tail.is_empty() && tail.iter().all(u8::is_ascii_digit)).then_some(colon)
}

fn port_or_service(
    params: &HostNameParams,
    text: &str,
    colon: usize,
) -> Result<(Option<u16>, Option<String>), AddressStringError> {
    let start = colon + 1;
    let tail = &text.as_bytes()[start..];
    if tail.is_empty() || tail.iter().all(u8::is_ascii_digit) {
        if !params.allows_port() {
            return Err(AddressStringError::at(ErrorKey::PortNotAllowed, text, colon));
        }
        return Ok((Some(parse_port(text, start, text.len())?), None));
    }
    if !params.allows_service() {
        return Err(AddressStringError::at(ErrorKey::ServiceNotAllowed, text, colon));
    }
    Ok((None, Some(parse_service(text, start, text.len())?)))
}

/// Addresses: `*`, anything with `:`, `/` or `%`, or a last label that
/// starts with a digit or a wildcard character.
fn looks_like_address(host: &[u8]) -> bool {
    if host.iter().any(|&b| matches!(b, b':' | b'/' | b'%' | b'*')) {
        return true;
    }
    let last = host.rsplit(|&b| b == b'.').next().unwrap_or(host);
    last.first()
        .is_some_and(|&b| b.is_ascii_digit() || b == b'_' || b == b'-')
}

fn validate_name(params: &HostNameParams, text: &str, end: usize) -> Result<String, AddressStringError> {
    let err = |key, at| AddressStringError::at(key, text, at);
    let bytes = &text.as_bytes()[..end];
    let end = if end > 1 && bytes[end - 1] == b'.' { end - 1 } else { end };

    let mut labels = 0;
    let mut label_start = 0;
    for i in 0..=end {
        if i < end && bytes[i] != b'.' {
            let b = bytes[i];
            if !(b.is_ascii_alphanumeric() || b == b'-') {
                return Err(err(ErrorKey::InvalidHostCharacter, i));
            }
            continue;
        }
        let len = i - label_start;
        if len == 0 {
            return Err(err(ErrorKey::EmptyLabel, i));
        }
        if len > MAX_LABEL_LENGTH {
            return Err(err(ErrorKey::LabelTooLong, label_start));
        }
        if bytes[label_start] == b'-' {
            return Err(err(ErrorKey::InvalidHostCharacter, label_start));
        }
        if bytes[i - 1] == b'-' {
            return Err(err(ErrorKey::InvalidHostCharacter, i - 1));
        }
        labels += 1;
        if labels > MAX_LABEL_COUNT {
            return Err(err(ErrorKey::TooManyLabels, label_start));
        }
        label_start = i + 1;
    }

    let name = &text[..end];
    Ok(if params.normalizes_to_lowercase() {
        name.to_ascii_lowercase()
    } else {
        name.to_owned()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(text: &str) -> Result<ParsedHost, AddressStringError> {
        validate_host(&HostNameParams::default(), text)
    }

    fn key(text: &str) -> ErrorKey {
        host(text).unwrap_err().key()
    }

    #[test]
    fn names_normalize_to_lowercase() {
        let h = host("WWW.Example.Com").unwrap();
        assert_eq!(h.name(), Some("www.example.com"));
        assert_eq!(h.labels().collect::<Vec<_>>(), ["www", "example", "com"]);

        let params = HostNameParams::builder().normalize_to_lowercase(false).build();
        let h = validate_host(&params, "WWW.Example.Com").unwrap();
        assert_eq!(h.name(), Some("WWW.Example.Com"));
    }

    #[test]
    fn trailing_dot_is_dropped() {
        assert_eq!(host("example.com.").unwrap().name(), Some("example.com"));
        assert_eq!(key("."), ErrorKey::EmptyLabel);
        assert_eq!(key("a..b"), ErrorKey::EmptyLabel);
    }

    #[test]
    fn label_rules() {
        let long = "a".repeat(64);
        let err = host(&format!("x.{long}.com")).unwrap_err();
        assert_eq!(err.key(), ErrorKey::LabelTooLong);
        assert_eq!(err.index(), Some(2));
        assert!(host(&format!("x.{}.com", "a".repeat(63))).is_ok());

        assert_eq!(key("-a.com"), ErrorKey::InvalidHostCharacter);
        assert_eq!(key("a-.com"), ErrorKey::InvalidHostCharacter);
        assert_eq!(key("a_b.com"), ErrorKey::InvalidHostCharacter);
        assert!(host("a-b.com").is_ok());
    }

    #[test]
    fn host_length_limit() {
        let labels = vec!["abcdefghi"; 26].join(".");
        assert_eq!(labels.len(), 259);
        let err = host(&labels).unwrap_err();
        assert_eq!(err.key(), ErrorKey::HostTooLong);
        assert_eq!(err.index(), Some(MAX_HOST_LENGTH));
    }

    #[test]
    fn ports_and_services() {
        let h = host("example.com:8080").unwrap();
        assert_eq!(h.port(), Some(8080));
        let h = host("example.com:https").unwrap();
        assert_eq!(h.service(), Some("https"));
        assert_eq!(key("example.com:0"), ErrorKey::InvalidPort);
        assert_eq!(key("example.com:65536"), ErrorKey::InvalidPort);
        assert_eq!(key("example.com:"), ErrorKey::InvalidPort);

        let params = HostNameParams::builder().allow_port(false).build();
        assert_eq!(
            validate_host(&params, "example.com:80").unwrap_err().key(),
            ErrorKey::PortNotAllowed
        );
        let params = HostNameParams::builder().allow_service(false).build();
        assert_eq!(
            validate_host(&params, "example.com:http").unwrap_err().key(),
            ErrorKey::ServiceNotAllowed
        );
    }

    #[test]
    fn ipv4_hosts() {
        let h = host("192.168.1.1:80").unwrap();
        assert!(h.is_address());
        assert_eq!(h.address(), Some("192.168.1.1".parse().unwrap()));
        assert_eq!(h.port(), Some(80));
        let provider = h.provider().unwrap();
        assert_eq!(provider.qualifier().and_then(crate::Qualifier::port), Some(80));

        assert_eq!(key("1.2.3.256"), ErrorKey::SegmentTooLarge);
    }

    #[test]
    fn port_before_prefix() {
        let h = host("1.2.3.4/16:80").unwrap();
        assert_eq!(h.port(), Some(80));
        assert_eq!(h.provider().unwrap().prefix_len(), Some(16));

        let h = host("[::1]/64:443").unwrap();
        assert_eq!(h.port(), Some(443));
        assert_eq!(h.provider().unwrap().prefix_len(), Some(64));
    }

    #[test]
    fn bracketed_addresses() {
        let h = host("[::1]:8080").unwrap();
        assert_eq!(h.address(), Some("::1".parse().unwrap()));
        assert_eq!(h.port(), Some(8080));

        let h = host("[fe80::1%eth0]").unwrap();
        let q = h.provider().unwrap().qualifier().unwrap();
        assert_eq!(q.zone(), Some("eth0"));

        assert!(host("[1.2.3.4]").is_ok());
        assert_eq!(key("[::1"), ErrorKey::UnterminatedBracket);
        assert_eq!(key("[::1]x"), ErrorKey::InvalidCharacter);
        assert_eq!(key("[]"), ErrorKey::EmptyNotAllowed);

        let params = HostNameParams::builder().allow_bracketed_ipv4(false).build();
        assert_eq!(
            validate_host(&params, "[1.2.3.4]").unwrap_err().key(),
            ErrorKey::BracketedNotAllowed
        );
    }

    #[test]
    fn bracketed_base85() {
        let h = host("[4)+k&C#VzJ4br>0wv%Yp]").unwrap();
        assert_eq!(h.address(), Some("1080::8:800:200c:417a".parse().unwrap()));
    }

    #[test]
    fn unbracketed_ipv6() {
        let h = host("::1").unwrap();
        assert_eq!(h.address(), Some("::1".parse().unwrap()));
        assert_eq!(h.port(), None);

        let params = HostNameParams::builder().expect_port(true).build();
        let h = validate_host(&params, "::1:80").unwrap();
        assert_eq!(h.address(), Some("::1".parse().unwrap()));
        assert_eq!(h.port(), Some(80));
    }

    #[test]
    fn addresses_can_be_refused() {
        let params = HostNameParams::builder().allow_ip_address(false).build();
        assert_eq!(
            validate_host(&params, "10.0.0.1").unwrap_err().key(),
            ErrorKey::IpAddressNotAllowed
        );
        assert!(validate_host(&params, "example.com").is_ok());
    }

    #[test]
    fn empty_host() {
        let h = host("").unwrap();
        assert!(h.is_empty());
        assert_eq!(h.address(), Some("127.0.0.1".parse().unwrap()));

        let params = HostNameParams::builder().empty_is_loopback(false).build();
        assert_eq!(validate_host(&params, "").unwrap().address(), None);

        let params = HostNameParams::builder().allow_empty(false).build();
        assert_eq!(
            validate_host(&params, "").unwrap_err().key(),
            ErrorKey::EmptyNotAllowed
        );
    }
}
