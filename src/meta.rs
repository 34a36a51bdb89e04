//! The RTTI contract this crate consumes.
//!
//! The type registry is treated as an external collaborator: each element
//! type is described by a token providing size, alignment, and a
//! pool-routing hint. This crate has no external registry to depend on, so
//! [`ElemMeta`] is a small, local implementation of that same contract,
//! built out of generic functions monomorphized per element type rather
//! than a runtime class hierarchy.
//!
//! A single `'static` `ElemMeta` exists per concrete `T`, handed out by
//! [`ElemMeta::of`]. Construction and comparison primitives (clone, move,
//! equality, hashing) are not carried on this token — every container that
//! needs them reaches for Rust's own `Clone`/`PartialEq`/`Hash` trait
//! machinery directly (see [`crate::intent`] for how constructors recover
//! the right one from an [`crate::intent::IntentSource`]), so a parallel
//! vtable of function pointers here would just duplicate what the
//! compiler already dispatches for free. `ElemMeta` carries only what
//! [`crate::alloc::Allocator`] needs for pool routing and diagnostics: a
//! size, an alignment, and a [`PoolTactic`].
//!
//! The `Type`-tactic pool-routing hint is *not* stored on this token:
//! `ElemMeta` is process-global (one instance per monomorphized `T`,
//! shared by every [`crate::alloc::Allocator`] in the program), so a
//! per-allocator routing decision lives on the allocator instead — see
//! `Allocator`'s `type_chains` map. `ElemMeta` only identifies the type; it
//! does not remember which allocator last used it.

use std::any::type_name;
use std::sync::OnceLock;

/// Opaque identifier for a pool within an [`crate::alloc::Allocator`]'s
/// per-type chain. `None` until a `Type`-tactic allocation first creates a
/// pool for this element type.
pub type PoolId = usize;

/// How the allocator should route allocations for a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolTactic {
    /// Route to the allocator's single default chain.
    Default,
    /// Route to the chain bucketed by `floor(log2(size))`.
    Size,
    /// Route to a chain dedicated to this exact type.
    Type,
}

/// The RTTI token for one element type: size, alignment, and a
/// pool-routing hint — everything [`crate::alloc::Allocator`] and
/// [`crate::block::Block`] need to route and size an allocation without
/// hard-coding a concrete `T`.
#[derive(Debug)]
pub struct ElemMeta {
    pub name: &'static str,
    pub size: usize,
    pub align: usize,
    pub is_pod: bool,
    pub is_nullifiable: bool,
    pub pool_tactic: PoolTactic,
}

impl ElemMeta {
    /// The token for `T`, routed by the allocator's default chain.
    pub fn of<T: 'static>() -> &'static ElemMeta {
        // One `OnceLock` per monomorphization of this function: every
        // concrete `T` gets its own static storage.
        static CELL: OnceLock<ElemMeta> = OnceLock::new();
        CELL.get_or_init(new_meta::<T>)
    }

    /// The token for `T`, routed by the allocator's `Size` tactic instead
    /// of `Default` — for element types whose only shared trait is
    /// roughly-similar allocation size.
    pub fn of_sized<T: 'static>() -> &'static ElemMeta {
        static CELL: OnceLock<ElemMeta> = OnceLock::new();
        CELL.get_or_init(|| {
            let mut meta = new_meta::<T>();
            meta.pool_tactic = PoolTactic::Size;
            meta
        })
    }

    /// The token for `T`, routed by the allocator's `Type` tactic: this
    /// type gets a pool chain dedicated to it alone.
    pub fn of_typed<T: 'static>() -> &'static ElemMeta {
        static CELL: OnceLock<ElemMeta> = OnceLock::new();
        CELL.get_or_init(|| {
            let mut meta = new_meta::<T>();
            meta.pool_tactic = PoolTactic::Type;
            meta
        })
    }

    /// Stable identity for this token, usable as a hash map key by any
    /// allocator that needs to associate per-instance state (such as a
    /// `Type`-tactic chain head) with a type without the token itself
    /// carrying that state.
    pub fn key(&'static self) -> usize {
        self as *const ElemMeta as usize
    }
}

fn new_meta<T: 'static>() -> ElemMeta {
    ElemMeta {
        name: type_name::<T>(),
        size: std::mem::size_of::<T>(),
        align: std::mem::align_of::<T>(),
        is_pod: !std::mem::needs_drop::<T>(),
        is_nullifiable: false,
        pool_tactic: PoolTactic::Default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_reports_size_and_layout() {
        let meta = ElemMeta::of::<i32>();
        assert_eq!(meta.size, std::mem::size_of::<i32>());
        assert_eq!(meta.align, std::mem::align_of::<i32>());
        assert_eq!(meta.pool_tactic, PoolTactic::Default);
    }

    #[test]
    fn same_type_shares_one_instance() {
        let a = ElemMeta::of::<u64>();
        let b = ElemMeta::of::<u64>();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn sized_and_typed_tokens_carry_their_tactic() {
        let sized = ElemMeta::of_sized::<u32>();
        assert_eq!(sized.pool_tactic, PoolTactic::Size);
        let typed = ElemMeta::of_typed::<u16>();
        assert_eq!(typed.pool_tactic, PoolTactic::Type);
        // Default-tier tokens are unaffected.
        assert_eq!(ElemMeta::of::<u32>().pool_tactic, PoolTactic::Default);
    }

    #[test]
    fn key_is_stable_and_unique_per_type() {
        struct MarkerA;
        struct MarkerB;
        let a1 = ElemMeta::of::<MarkerA>();
        let a2 = ElemMeta::of::<MarkerA>();
        let b = ElemMeta::of::<MarkerB>();
        assert_eq!(a1.key(), a2.key());
        assert_ne!(a1.key(), b.key());
    }

    #[test]
    fn pod_types_are_flagged_as_needing_no_drop_glue() {
        assert!(ElemMeta::of::<i32>().is_pod);
        assert!(!ElemMeta::of::<String>().is_pod);
    }
}
