//! Diagnostic emission for pool exhaustion, garbage collection, and rehash.
//!
//! These are advisory, not part of the error channel: a pool creating a new
//! backing region, or a hash table doubling its capacity, is normal
//! operation, but callers tuning allocator sizing want visibility into it.
//! Emission is routed through the `log` crate when the `log` feature is
//! enabled, and otherwise is a no-op in release builds; under
//! `debug_assertions` (or the `diagnostics` feature) it always writes to
//! stderr as well.

use std::sync::atomic::{AtomicBool, Ordering};

static SUPPRESSED: AtomicBool = AtomicBool::new(false);

/// Suppress all diagnostic output (used by tests that exercise pool
/// exhaustion deliberately).
pub fn suppress(suppress: bool) {
    SUPPRESSED.store(suppress, Ordering::Relaxed);
}

fn is_suppressed() -> bool {
    SUPPRESSED.load(Ordering::Relaxed)
}

/// A single diagnostic event, identified by a stable code so callers can
/// match on it without parsing the message.
#[derive(Debug, Clone, Copy)]
pub struct Event {
    pub code: &'static str,
    pub message: &'static str,
}

macro_rules! event {
    ($name:ident, $code:literal, $message:literal) => {
        pub const $name: Event = Event {
            code: $code,
            message: $message,
        };
    };
}

event!(POOL_CREATED, "CC-001", "pool created a new backing region");
event!(POOL_EXHAUSTED, "CC-002", "pool chain exhausted, falling back to a fresh pool");
event!(GC_COLLECTED, "CC-003", "garbage collection reclaimed an empty pool");
event!(TABLE_REHASHED, "CC-004", "hash table rehashed to a larger capacity");
event!(PROBE_OVERFLOW, "CC-005", "probe distance saturated the info byte, forcing a rehash");

/// Emit a diagnostic event with a bit of numeric context (byte count, new
/// capacity, etc. — whatever is relevant to the event).
pub fn emit(event: Event, context: usize) {
    if is_suppressed() {
        return;
    }

    #[cfg(feature = "log")]
    {
        log::debug!("[{}] {} (context: {})", event.code, event.message, context);
    }

    #[cfg(all(not(feature = "log"), any(debug_assertions, feature = "diagnostics")))]
    {
        eprintln!("[{}] {} (context: {})", event.code, event.message, context);
    }

    let _ = context;
}
