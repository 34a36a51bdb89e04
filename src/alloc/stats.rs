//! Optional allocator-wide counters, gated behind the `stats` feature.

use std::fmt;

/// Format bytes as a human-readable string.
fn format_bytes(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;
    const GB: usize = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Snapshot of an [`crate::alloc::Allocator`]'s pool population and,
/// when the `stats` feature is enabled (on by default), request counts.
/// `pools`/`bytes_reserved` are always populated; with `stats` off, the
/// request-counter fields (`allocate_calls`, `deallocate_calls`,
/// `live_allocations`, `bytes_in_use`, `pools_collected`) stay at zero —
/// see [`crate::alloc::Allocator::stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocatorStats {
    pub pools: usize,
    pub live_allocations: usize,
    pub bytes_reserved: usize,
    pub bytes_in_use: usize,
    pub allocate_calls: usize,
    pub deallocate_calls: usize,
    pub pools_collected: usize,
}

impl fmt::Display for AllocatorStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pools={} live={} reserved={} in_use={} allocs={} frees={} collected={}",
            self.pools,
            self.live_allocations,
            format_bytes(self.bytes_reserved),
            format_bytes(self.bytes_in_use),
            self.allocate_calls,
            self.deallocate_calls,
            self.pools_collected
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_human_readable() {
        let stats = AllocatorStats {
            pools: 2,
            live_allocations: 5,
            ..Default::default()
        };
        let rendered = stats.to_string();
        assert!(rendered.contains("pools=2"));
        assert!(rendered.contains("live=5"));
    }
}
