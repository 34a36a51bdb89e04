//! Allocator-wide tuning knobs.

/// Number of size buckets in [`crate::alloc::Allocator`]'s `size_chain`,
/// one per `floor(log2(size))` value a `usize` can hold.
pub const SIZE_BUCKETS: usize = usize::BITS as usize;

/// Tuning knobs for an [`crate::alloc::Allocator`].
///
/// Build-time switches for things like a custom global allocator
/// override, text codec, at-rest encryption, or compression are
/// external-collaborator concerns this crate's scope does not implement;
/// `Config` only carries the knobs this crate itself acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Size in bytes of a pool's backing region when a chain must create a
    /// fresh one. Must be a power of two.
    pub default_pool_size: usize,
    /// Smallest request size the allocator will serve; anything smaller is
    /// rounded up to this before routing and pool-carving.
    pub minimal_allocation: usize,
    /// Alignment every allocation satisfies, in bytes. Must be a power of
    /// two no smaller than the platform pointer alignment.
    pub alignment: usize,
    /// When `true`, freed pools are kept around empty rather than released
    /// back to the system allocator immediately; `Allocator::collect_garbage`
    /// becomes the only thing that reclaims them.
    pub managed_memory: bool,
}

impl Config {
    /// `default_pool_size = 1 MiB`, `minimal_allocation = 8`,
    /// `alignment = size_of::<usize>()`, `managed_memory = true`.
    pub const fn new() -> Self {
        Self {
            default_pool_size: 1024 * 1024,
            minimal_allocation: 8,
            alignment: std::mem::size_of::<usize>(),
            managed_memory: true,
        }
    }

    /// Smaller pools and immediate release, for memory-constrained or
    /// short-lived allocator instances.
    pub const fn minimal() -> Self {
        Self {
            default_pool_size: 64 * 1024,
            minimal_allocation: 8,
            alignment: std::mem::size_of::<usize>(),
            managed_memory: false,
        }
    }

    pub const fn with_default_pool_size(mut self, bytes: usize) -> Self {
        self.default_pool_size = bytes;
        self
    }

    pub const fn with_minimal_allocation(mut self, bytes: usize) -> Self {
        self.minimal_allocation = bytes;
        self
    }

    pub const fn with_alignment(mut self, bytes: usize) -> Self {
        self.alignment = bytes;
        self
    }

    pub const fn with_managed_memory(mut self, managed: bool) -> Self {
        self.managed_memory = managed;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_spec_constants() {
        let cfg = Config::new();
        assert_eq!(cfg.default_pool_size, 1024 * 1024);
        assert_eq!(cfg.minimal_allocation, 8);
    }

    #[test]
    fn builder_overrides_apply() {
        let cfg = Config::new().with_default_pool_size(4096).with_managed_memory(false);
        assert_eq!(cfg.default_pool_size, 4096);
        assert!(!cfg.managed_memory);
    }
}
