//! `RangeParams` — which wildcard and range notations a segment may use

/// Permitted wildcard and range notations within a segment.
///
/// | Notation | Example | Toggle |
/// |----------|---------|--------|
/// | full wildcard | `1.*.3.4` | `wildcard` |
/// | single-digit wildcard | `1.2.3._` , `1.2.3.1__` | `single_wildcard` |
/// | range | `1.2.3.4-5` | `range_separator` |
/// | reversed range | `1.2.3.5-4` | `reverse_range` |
/// | open range | `1.2.3.-5`, `1.2.3.4-` | `inferred_boundary` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct RangeParams {
    wildcard: bool,
    range_separator: bool,
    reverse_range: bool,
    single_wildcard: bool,
    inferred_boundary: bool,
}

impl RangeParams {
    /// No wildcards, no ranges.
    pub const NO_RANGE: Self = Self {
        wildcard: false,
        range_separator: false,
        reverse_range: false,
        single_wildcard: false,
        inferred_boundary: false,
    };

    /// `*` and `_` wildcards, but no `-` ranges.
    pub const WILDCARD_ONLY: Self = Self {
        wildcard: true,
        range_separator: false,
        reverse_range: false,
        single_wildcard: true,
        inferred_boundary: false,
    };

    /// Every wildcard and range notation.
    pub const WILDCARD_AND_RANGE: Self = Self {
        wildcard: true,
        range_separator: true,
        reverse_range: true,
        single_wildcard: true,
        inferred_boundary: true,
    };

    #[must_use]
    pub fn builder() -> RangeParamsBuilder {
        RangeParamsBuilder {
            params: Self::default(),
        }
    }

    /// Seed a builder with these values.
    #[must_use]
    pub fn to_builder(&self) -> RangeParamsBuilder {
        RangeParamsBuilder { params: *self }
    }

    #[must_use]
    pub fn allows_wildcard(&self) -> bool {
        self.wildcard
    }

    #[must_use]
    pub fn allows_range_separator(&self) -> bool {
        self.range_separator
    }

    #[must_use]
    pub fn allows_reverse_range(&self) -> bool {
        self.reverse_range
    }

    #[must_use]
    pub fn allows_single_wildcard(&self) -> bool {
        self.single_wildcard
    }

    #[must_use]
    pub fn allows_inferred_boundary(&self) -> bool {
        self.inferred_boundary
    }

    /// Whether no wildcard or range notation is allowed at all.
    #[must_use]
    pub fn is_no_range(&self) -> bool {
        !(self.wildcard || self.range_separator || self.single_wildcard)
    }
}

impl Default for RangeParams {
    fn default() -> Self {
        Self::WILDCARD_AND_RANGE
    }
}

/// Builder for [`RangeParams`].
#[derive(Debug, Clone, Copy)]
pub struct RangeParamsBuilder {
    params: RangeParams,
}

impl RangeParamsBuilder {
    #[must_use]
    pub fn allow_wildcard(mut self, allow: bool) -> Self {
        self.params.wildcard = allow;
        self
    }

    #[must_use]
    pub fn allow_range_separator(mut self, allow: bool) -> Self {
        self.params.range_separator = allow;
        self
    }

    #[must_use]
    pub fn allow_reverse_range(mut self, allow: bool) -> Self {
        self.params.reverse_range = allow;
        self
    }

    #[must_use]
    pub fn allow_single_wildcard(mut self, allow: bool) -> Self {
        self.params.single_wildcard = allow;
        self
    }

    #[must_use]
    pub fn allow_inferred_boundary(mut self, allow: bool) -> Self {
        self.params.inferred_boundary = allow;
        self
    }

    #[must_use]
    pub fn build(self) -> RangeParams {
        self.params
    }
}
