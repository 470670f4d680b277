//! MAC address string params

use super::{FormatParams, RangeParams};

/// MAC segment format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct MacFormatParams {
    format: FormatParams,
    short_segments: bool,
}

impl MacFormatParams {
    #[must_use]
    pub fn builder() -> MacFormatParamsBuilder {
        MacFormatParamsBuilder {
            params: Self::default(),
        }
    }

    #[must_use]
    pub fn to_builder(&self) -> MacFormatParamsBuilder {
        MacFormatParamsBuilder { params: *self }
    }

    #[must_use]
    pub fn format(&self) -> FormatParams {
        self.format
    }

    /// Whether `a:b:c:d:e:f` may drop the leading zero of each byte.
    #[must_use]
    pub fn allows_short_segments(&self) -> bool {
        self.short_segments
    }
}

impl Default for MacFormatParams {
    fn default() -> Self {
        Self {
            format: FormatParams::builder().allow_binary(false).build(),
            short_segments: true,
        }
    }
}

/// Builder for [`MacFormatParams`].
#[derive(Debug, Clone, Copy)]
pub struct MacFormatParamsBuilder {
    params: MacFormatParams,
}

impl MacFormatParamsBuilder {
    #[must_use]
    pub fn format(mut self, format: FormatParams) -> Self {
        self.params.format = format;
        self
    }

    #[must_use]
    pub fn range(mut self, range: RangeParams) -> Self {
        self.params.format = self.params.format.to_builder().range(range).build();
        self
    }

    #[must_use]
    pub fn allow_short_segments(mut self, allow: bool) -> Self {
        self.params.short_segments = allow;
        self
    }

    #[must_use]
    pub fn build(self) -> MacFormatParams {
        self.params
    }
}

/// Which MAC address lengths are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum MacSize {
    /// 48 bits, six bytes.
    Mac48,
    /// 64 bits, eight bytes.
    Eui64,
    #[default]
    Any,
}

impl MacSize {
    #[must_use]
    pub fn allows_bits(self, bits: u32) -> bool {
        match self {
            Self::Mac48 => bits == 48,
            Self::Eui64 => bits == 64,
            Self::Any => bits == 48 || bits == 64,
        }
    }
}

/// Which MAC address notations a string may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct MacAddressStringParams {
    format: MacFormatParams,
    empty: bool,
    all: bool,
    single_segment: bool,
    address_size: MacSize,
    dashed: bool,
    single_dashed: bool,
    colon_delimited: bool,
    dotted: bool,
    space_delimited: bool,
}

impl MacAddressStringParams {
    #[must_use]
    pub fn builder() -> MacAddressStringParamsBuilder {
        MacAddressStringParamsBuilder {
            params: Self::default(),
        }
    }

    #[must_use]
    pub fn to_builder(&self) -> MacAddressStringParamsBuilder {
        MacAddressStringParamsBuilder { params: *self }
    }

    #[must_use]
    pub fn format(&self) -> MacFormatParams {
        self.format
    }

    #[must_use]
    pub fn allows_empty(&self) -> bool {
        self.empty
    }

    #[must_use]
    pub fn allows_all(&self) -> bool {
        self.all
    }

    /// `aabbccddeeff`.
    #[must_use]
    pub fn allows_single_segment(&self) -> bool {
        self.single_segment
    }

    #[must_use]
    pub fn address_size(&self) -> MacSize {
        self.address_size
    }

    /// `aa-bb-cc-dd-ee-ff`.
    #[must_use]
    pub fn allows_dashed(&self) -> bool {
        self.dashed
    }

    /// `aabbcc-ddeeff`.
    #[must_use]
    pub fn allows_single_dashed(&self) -> bool {
        self.single_dashed
    }

    /// `aa:bb:cc:dd:ee:ff`.
    #[must_use]
    pub fn allows_colon_delimited(&self) -> bool {
        self.colon_delimited
    }

    /// `aabb.ccdd.eeff`.
    #[must_use]
    pub fn allows_dotted(&self) -> bool {
        self.dotted
    }

    /// `aa bb cc dd ee ff`.
    #[must_use]
    pub fn allows_space_delimited(&self) -> bool {
        self.space_delimited
    }
}

impl Default for MacAddressStringParams {
    fn default() -> Self {
        Self {
            format: MacFormatParams::default(),
            empty: true,
            all: true,
            single_segment: true,
            address_size: MacSize::Any,
            dashed: true,
            single_dashed: true,
            colon_delimited: true,
            dotted: true,
            space_delimited: true,
        }
    }
}

/// Builder for [`MacAddressStringParams`].
#[derive(Debug, Clone, Copy)]
pub struct MacAddressStringParamsBuilder {
    params: MacAddressStringParams,
}

impl MacAddressStringParamsBuilder {
    #[must_use]
    pub fn format(mut self, format: MacFormatParams) -> Self {
        self.params.format = format;
        self
    }

    #[must_use]
    pub fn range(mut self, range: RangeParams) -> Self {
        self.params.format = self.params.format.to_builder().range(range).build();
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
    pub fn address_size(mut self, size: MacSize) -> Self {
        self.params.address_size = size;
        self
    }

    #[must_use]
    pub fn allow_dashed(mut self, allow: bool) -> Self {
        self.params.dashed = allow;
        self
    }

    #[must_use]
    pub fn allow_single_dashed(mut self, allow: bool) -> Self {
        self.params.single_dashed = allow;
        self
    }

    #[must_use]
    pub fn allow_colon_delimited(mut self, allow: bool) -> Self {
        self.params.colon_delimited = allow;
        self
    }

    #[must_use]
    pub fn allow_dotted(mut self, allow: bool) -> Self {
        self.params.dotted = allow;
        self
    }

    #[must_use]
    pub fn allow_space_delimited(mut self, allow: bool) -> Self {
        self.params.space_delimited = allow;
        self
    }

    #[must_use]
    pub fn build(self) -> MacAddressStringParams {
        self.params
    }
}
