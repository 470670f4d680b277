//! `ProviderCache` — shared providers for default-params strings
//!
//! Prefix-only masks (`/0` through `/128` per family), the empty-string
//! loopback and the invalid provider are immutable values that many
//! strings resolve to. Each lives in its own [`OnceLock`] slot, so
//! publication is race-free: concurrent callers may both compute, one
//! value wins, and every caller receives the winner.

use std::sync::{Arc, OnceLock};

use crate::params::EmptyStrategy;
use crate::provider::IpAddressProvider;
use crate::IpVersion;

const MASK_SLOTS: usize = 129;

type Slot = OnceLock<Arc<IpAddressProvider>>;

/// Process-wide provider cache. See [`ProviderCache::global`].
#[derive(Debug)]
pub struct ProviderCache {
    masks: [[Slot; MASK_SLOTS]; 2],
    loopback: [Slot; 3],
    invalid: Slot,
}

#[allow(clippy::declare_interior_mutable_const)]
const EMPTY_SLOT: Slot = OnceLock::new();
#[allow(clippy::declare_interior_mutable_const)]
const EMPTY_MASKS: [Slot; MASK_SLOTS] = [EMPTY_SLOT; MASK_SLOTS];

static GLOBAL: ProviderCache = ProviderCache::new();

impl ProviderCache {
    /// An empty cache. Every slot starts unpublished.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            masks: [EMPTY_MASKS; 2],
            loopback: [EMPTY_SLOT; 3],
            invalid: EMPTY_SLOT,
        }
    }

    /// The cache shared by every default-params parse in the process.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Prefix-only provider for `version`/`prefix_len`.
    ///
    /// A length beyond the family's bit count is never cached.
    #[must_use]
    pub fn mask(&self, version: IpVersion, prefix_len: u8) -> Arc<IpAddressProvider> {
        let compute = || IpAddressProvider::Mask {
            version,
            prefix_len,
        };
        if u32::from(prefix_len) > version.bit_count() {
            return Arc::new(compute());
        }
        let family = usize::from(version.is_ipv6());
        let slot = &self.masks[family][usize::from(prefix_len)];
        publish(slot, compute, || {
            tracing::trace!(%version, prefix_len, "published mask provider");
        })
    }

    /// Empty-string provider under the loopback strategy.
    #[must_use]
    pub fn loopback(&self, version: Option<IpVersion>) -> Arc<IpAddressProvider> {
        let index = match version {
            None => 0,
            Some(IpVersion::V4) => 1,
            Some(IpVersion::V6) => 2,
        };
        publish(
            &self.loopback[index],
            || IpAddressProvider::Empty {
                strategy: EmptyStrategy::Loopback,
                version,
            },
            || tracing::trace!(?version, "published loopback provider"),
        )
    }

    /// The shared [`IpAddressProvider::Invalid`].
    #[must_use]
    pub fn invalid(&self) -> Arc<IpAddressProvider> {
        publish(
            &self.invalid,
            || IpAddressProvider::Invalid,
            || tracing::trace!("published invalid provider"),
        )
    }
}

impl Default for ProviderCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute outside the slot, offer the value, then hand back whatever won.
fn publish(
    slot: &Slot,
    compute: impl FnOnce() -> IpAddressProvider,
    on_publish: impl FnOnce(),
) -> Arc<IpAddressProvider> {
    if let Some(existing) = slot.get() {
        return Arc::clone(existing);
    }
    let candidate = Arc::new(compute());
    if slot.set(Arc::clone(&candidate)).is_ok() {
        on_publish();
    }
    slot.get().map_or(candidate, Arc::clone)
}
