//! The allocator facade: three pool chains (default, per-size-bucket,
//! per-type) routed by an element's [`PoolTactic`].

use std::cell::RefCell;
use std::collections::HashMap;

use crate::alloc::config::{Config, SIZE_BUCKETS};
use crate::alloc::header::Allocation;
use crate::alloc::pool::{band_capacity, Pool};
use crate::alloc::stats::AllocatorStats;
use crate::diagnostics;
use crate::error::{ContainError, ContainResult};
use crate::meta::{ElemMeta, PoolId, PoolTactic};

fn size_bucket(size: usize) -> usize {
    let size = size.max(1);
    let bucket = usize::BITS - size.leading_zeros() - 1;
    (bucket as usize).min(SIZE_BUCKETS - 1)
}

struct AllocatorInner {
    config: Config,
    pools: Vec<Option<Pool>>,
    default_chain: Option<PoolId>,
    size_chain: Vec<Option<PoolId>>,
    /// `Type`-tactic chain heads, keyed by `ElemMeta::key()`. Kept on the
    /// allocator instance rather than on the (process-global) `ElemMeta`
    /// token itself, so distinct `Allocator`s routing the same type don't
    /// collide on one shared chain.
    type_chains: HashMap<usize, Option<PoolId>>,
    type_metas: Vec<&'static ElemMeta>,
    last_found_pool: Option<PoolId>,
    stats: AllocatorStats,
}

/// A pool-backed allocator: the thing every container in
/// [`crate::container`] and [`crate::ptr`] allocates through.
///
/// Single-threaded by design — wrap in an `Rc` to share
/// between containers, or behind a `Mutex`/`RwLock` at the call site if a
/// program genuinely needs cross-thread sharing; this crate makes no
/// attempt to do that internally.
pub struct Allocator {
    inner: RefCell<AllocatorInner>,
}

impl Allocator {
    /// Build an allocator with the given tuning.
    pub fn new(config: Config) -> Self {
        Self {
            inner: RefCell::new(AllocatorInner {
                config,
                pools: Vec::new(),
                default_chain: None,
                size_chain: vec![None; SIZE_BUCKETS],
                type_chains: HashMap::new(),
                type_metas: Vec::new(),
                last_found_pool: None,
                stats: AllocatorStats::default(),
            }),
        }
    }

    /// The tuning this allocator was built with.
    pub fn config(&self) -> Config {
        self.inner.borrow().config
    }

    /// Request `size` bytes, routed by `meta`'s [`PoolTactic`] (or the
    /// default chain if `meta` is `None`).
    pub fn allocate(&self, size: usize, meta: Option<&'static ElemMeta>) -> ContainResult<Allocation> {
        let mut inner = self.inner.borrow_mut();
        let size = size.max(inner.config.minimal_allocation);
        let tactic = meta.map(|m| m.pool_tactic).unwrap_or(PoolTactic::Default);

        let result = match tactic {
            PoolTactic::Default => {
                let head = inner.default_chain;
                let (alloc, new_head) = inner.allocate_from_chain(head, size, None);
                inner.default_chain = new_head;
                alloc
            }
            PoolTactic::Size => {
                let bucket = size_bucket(size);
                let head = inner.size_chain[bucket];
                let (alloc, new_head) = inner.allocate_from_chain(head, size, None);
                inner.size_chain[bucket] = new_head;
                alloc
            }
            PoolTactic::Type => {
                let meta = meta.expect("Type tactic requires an ElemMeta");
                let key = meta.key();
                let head = inner.type_chains.get(&key).copied().flatten();
                let was_new = head.is_none();
                let (alloc, new_head) = inner.allocate_from_chain(head, size, Some(meta));
                inner.type_chains.insert(key, new_head);
                if was_new && new_head.is_some() {
                    inner.type_metas.push(meta);
                }
                alloc
            }
        };

        if let Some(alloc) = result {
            #[cfg(feature = "stats")]
            {
                inner.stats.allocate_calls += 1;
                inner.stats.live_allocations += 1;
                inner.stats.bytes_in_use += alloc.allocated_bytes();
            }
            Ok(alloc)
        } else {
            Err(ContainError::allocate("pool allocator exhausted"))
        }
    }

    /// Grow or shrink an allocation in place, without moving it. Returns
    /// `false` if the request exceeds the allocation's band capacity — the
    /// caller (typically [`crate::block::Block`]) must then allocate fresh
    /// and move the element contents over.
    pub fn try_resize_in_place(&self, allocation: Allocation, new_size: usize) -> bool {
        let mut inner = self.inner.borrow_mut();
        let pool_id = allocation.pool_id();
        let old_size = allocation.allocated_bytes();
        let pool = inner.pools[pool_id].as_mut().expect("allocation's pool was collected while live");
        let ok = pool.reallocate(allocation, new_size);
        #[cfg(feature = "stats")]
        if ok {
            inner.stats.bytes_in_use = inner.stats.bytes_in_use.saturating_sub(old_size) + new_size;
        }
        ok
    }

    /// Release one reference. Once the count reaches zero, the slot
    /// returns to its pool's free list.
    pub fn deallocate(&self, allocation: Allocation) {
        let pool_id = allocation.pool_id();
        let freed_bytes = allocation.allocated_bytes();
        if allocation.free() > 0 {
            return;
        }
        let mut inner = self.inner.borrow_mut();
        let pool = inner.pools[pool_id].as_mut().expect("allocation's pool was collected while live");
        pool.deallocate(allocation);
        let pool_now_empty = pool.is_empty();
        #[cfg(feature = "stats")]
        {
            inner.stats.deallocate_calls += 1;
            inner.stats.live_allocations = inner.stats.live_allocations.saturating_sub(1);
            inner.stats.bytes_in_use = inner.stats.bytes_in_use.saturating_sub(freed_bytes);
        }
        #[cfg(not(feature = "stats"))]
        let _ = freed_bytes;

        // `managed_memory == false` means pools are not meant to linger
        // empty between explicit `collect_garbage` calls — reclaim this
        // one immediately instead.
        if pool_now_empty && !inner.config.managed_memory {
            drop(inner);
            self.collect_garbage();
        }
    }

    /// Find the allocation whose user region contains `ptr`, if any pool
    /// owned by this allocator holds it.
    pub fn find(&self, ptr: *const u8) -> Option<Allocation> {
        let mut inner = self.inner.borrow_mut();
        if let Some(id) = inner.last_found_pool {
            if let Some(pool) = inner.pools[id].as_ref() {
                if let Some(a) = pool.find(ptr) {
                    return Some(a);
                }
            }
        }
        for id in 0..inner.pools.len() {
            if let Some(pool) = inner.pools[id].as_ref() {
                if let Some(a) = pool.find(ptr) {
                    inner.last_found_pool = Some(id);
                    return Some(a);
                }
            }
        }
        None
    }

    /// Whether `ptr` falls inside memory owned by this allocator — the
    /// check [`crate::ptr::Ref`] runs before trusting a raw pointer came
    /// from here.
    pub fn check_authority(&self, ptr: *const u8) -> bool {
        self.find(ptr).is_some()
    }

    /// Reclaim every pool, across all three chains, that has no live
    /// allocations left. Returns the number of pools reclaimed.
    pub fn collect_garbage(&self) -> usize {
        let mut inner = self.inner.borrow_mut();
        let mut total = 0usize;

        let head = inner.default_chain;
        let (new_head, n) = inner.collect_chain(head);
        inner.default_chain = new_head;
        total += n;

        for bucket in 0..SIZE_BUCKETS {
            let head = inner.size_chain[bucket];
            let (new_head, n) = inner.collect_chain(head);
            inner.size_chain[bucket] = new_head;
            total += n;
        }

        let type_metas = inner.type_metas.clone();
        for meta in type_metas {
            let key = meta.key();
            let head = inner.type_chains.get(&key).copied().flatten();
            let (new_head, n) = inner.collect_chain(head);
            inner.type_chains.insert(key, new_head);
            total += n;
        }
        let type_chains = inner.type_chains.clone();
        inner.type_metas.retain(|m| type_chains.get(&m.key()).copied().flatten().is_some());

        if total > 0 {
            #[cfg(feature = "stats")]
            {
                inner.stats.pools_collected += total;
            }
            diagnostics::emit(diagnostics::GC_COLLECTED, total);
        }
        total
    }

    /// A snapshot of pool population and, when the `stats` feature is
    /// enabled, request counters. `pools`/`bytes_reserved` are always
    /// computed fresh from the live pool list regardless of the feature,
    /// since they cost nothing beyond a scan already paid for elsewhere;
    /// `allocate_calls`/`deallocate_calls`/`live_allocations`/
    /// `bytes_in_use`/`pools_collected` stay at zero unless `stats` is on.
    pub fn stats(&self) -> AllocatorStats {
        let inner = self.inner.borrow();
        let mut snapshot = inner.stats;
        snapshot.pools = inner.pools.iter().filter(|p| p.is_some()).count();
        snapshot.bytes_reserved = inner.pools.iter().flatten().map(|p| p.backend_bytes()).sum();
        snapshot
    }
}

impl Default for Allocator {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl AllocatorInner {
    /// Walk `head`'s chain looking for a pool that can serve `size`
    /// bytes; if none can, carve a fresh pool and prepend it. Returns the
    /// allocation (if any) and the chain's new head.
    fn allocate_from_chain(
        &mut self,
        head: Option<PoolId>,
        size: usize,
        type_meta: Option<&'static ElemMeta>,
    ) -> (Option<Allocation>, Option<PoolId>) {
        let mut cursor = head;
        while let Some(id) = cursor {
            let pool = self.pools[id].as_mut().expect("chain points at a collected pool");
            if pool.can_contain(size) {
                return (pool.allocate(size), head);
            }
            cursor = pool.next();
        }

        let mut pool_bytes = self.config.default_pool_size;
        while band_capacity(pool_bytes.next_power_of_two(), 0) < size {
            pool_bytes *= 2;
        }

        let id = self.next_pool_slot();
        let mut pool = Pool::new(id, pool_bytes, self.config.alignment, type_meta);
        let alloc = pool.allocate(size);
        pool.set_next(head);
        self.pools[id] = Some(pool);
        diagnostics::emit(diagnostics::POOL_CREATED, pool_bytes);

        (alloc, Some(id))
    }

    /// Find an empty slot in `pools` to reuse (left behind by a collected
    /// pool), or grow the vector.
    fn next_pool_slot(&mut self) -> PoolId {
        if let Some(id) = self.pools.iter().position(|p| p.is_none()) {
            return id;
        }
        self.pools.push(None);
        self.pools.len() - 1
    }

    /// Drop every empty pool reachable from `head`, re-linking survivors,
    /// and return the (possibly new) head plus how many were collected.
    fn collect_chain(&mut self, head: Option<PoolId>) -> (Option<PoolId>, usize) {
        let mut collected = 0;
        let mut new_head = None;
        let mut tail: Option<PoolId> = None;
        let mut cursor = head;

        while let Some(id) = cursor {
            let pool = self.pools[id].as_ref().expect("chain points at a collected pool");
            let next = pool.next();
            if pool.is_empty() {
                self.pools[id] = None;
                collected += 1;
            } else {
                if new_head.is_none() {
                    new_head = Some(id);
                }
                if let Some(t) = tail {
                    self.pools[t].as_mut().unwrap().set_next(Some(id));
                }
                tail = Some(id);
            }
            cursor = next;
        }

        if let Some(t) = tail {
            self.pools[t].as_mut().unwrap().set_next(None);
        }

        (new_head, collected)
    }
}
