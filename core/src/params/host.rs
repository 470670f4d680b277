//! Host name params

use super::IpAddressStringParams;

/// Which host name notations a string may use.
///
/// Addresses inside a host string follow [`address()`](Self::address).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct HostNameParams {
    address: IpAddressStringParams,
    empty: bool,
    empty_is_loopback: bool,
    bracketed_ipv4: bool,
    bracketed_ipv6: bool,
    normalize_to_lowercase: bool,
    ip_address: bool,
    port: bool,
    service: bool,
    expect_port: bool,
}

impl HostNameParams {
    #[must_use]
    pub fn builder() -> HostNameParamsBuilder {
        HostNameParamsBuilder {
            params: Self::default(),
        }
    }

    #[must_use]
    pub fn to_builder(&self) -> HostNameParamsBuilder {
        HostNameParamsBuilder { params: *self }
    }

    #[must_use]
    pub fn address(&self) -> IpAddressStringParams {
        self.address
    }

    #[must_use]
    pub fn allows_empty(&self) -> bool {
        self.empty
    }

    #[must_use]
    pub fn empty_is_loopback(&self) -> bool {
        self.empty_is_loopback
    }

    /// `[1.2.3.4]`.
    #[must_use]
    pub fn allows_bracketed_ipv4(&self) -> bool {
        self.bracketed_ipv4
    }

    /// `[::1]`.
    #[must_use]
    pub fn allows_bracketed_ipv6(&self) -> bool {
        self.bracketed_ipv6
    }

    #[must_use]
    pub fn normalizes_to_lowercase(&self) -> bool {
        self.normalize_to_lowercase
    }

    #[must_use]
    pub fn allows_ip_address(&self) -> bool {
        self.ip_address
    }

    #[must_use]
    pub fn allows_port(&self) -> bool {
        self.port
    }

    #[must_use]
    pub fn allows_service(&self) -> bool {
        self.service
    }

    /// Whether an unbracketed IPv6 host with a trailing `:digits` is read
    /// as address plus port (`::1:80` is `::1` port 80).
    #[must_use]
    pub fn expects_port(&self) -> bool {
        self.expect_port
    }
}

impl Default for HostNameParams {
    fn default() -> Self {
        Self {
            address: IpAddressStringParams::default(),
            empty: true,
            empty_is_loopback: true,
            bracketed_ipv4: true,
            bracketed_ipv6: true,
            normalize_to_lowercase: true,
            ip_address: true,
            port: true,
            service: true,
            expect_port: false,
        }
    }
}

/// Builder for [`HostNameParams`].
#[derive(Debug, Clone, Copy)]
pub struct HostNameParamsBuilder {
    params: HostNameParams,
}

impl HostNameParamsBuilder {
    #[must_use]
    pub fn address(mut self, address: IpAddressStringParams) -> Self {
        self.params.address = address;
        self
    }

    #[must_use]
    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.params.empty = allow;
        self
    }

    #[must_use]
    pub fn empty_is_loopback(mut self, loopback: bool) -> Self {
        self.params.empty_is_loopback = loopback;
        self
    }

    #[must_use]
    pub fn allow_bracketed_ipv4(mut self, allow: bool) -> Self {
        self.params.bracketed_ipv4 = allow;
        self
    }

    #[must_use]
    pub fn allow_bracketed_ipv6(mut self, allow: bool) -> Self {
        self.params.bracketed_ipv6 = allow;
        self
    }

    #[must_use]
    pub fn normalize_to_lowercase(mut self, normalize: bool) -> Self {
        self.params.normalize_to_lowercase = normalize;
        self
    }

    #[must_use]
    pub fn allow_ip_address(mut self, allow: bool) -> Self {
        self.params.ip_address = allow;
        self
    }

    #[must_use]
    pub fn allow_port(mut self, allow: bool) -> Self {
        self.params.port = allow;
        self
    }

    #[must_use]
    pub fn allow_service(mut self, allow: bool) -> Self {
        self.params.service = allow;
        self
    }

    #[must_use]
    pub fn expect_port(mut self, expect: bool) -> Self {
        self.params.expect_port = expect;
        self
    }

    #[must_use]
    pub fn build(self) -> HostNameParams {
        self.params
    }
}
