//! End-to-end scenarios exercising the allocator, containers, and
//! ref-counted pointer together.

use std::rc::Rc;

use contain_core::container::{Many, Map};
use contain_core::ptr::Ref;
use contain_core::{Allocator, Config};

#[test]
fn sequential_container_push_and_pop_front() {
    let mut v: Many<i32> = Many::new();
    for i in 1..=5 {
        v.push_back(i).unwrap();
    }
    let front = v.pop_front().unwrap();
    assert_eq!(front, 1);
    assert_eq!(v.len(), 4);
    assert_eq!(v.as_slice(), &[2, 3, 4, 5]);
    assert_eq!(v.allocator().stats().live_allocations, 1);
}

#[test]
fn clone_of_shared_sequential_container_is_independent() {
    let allocator = Rc::new(Allocator::default());
    let mut original: Many<i32> = Many::with_allocator(Rc::clone(&allocator));
    for i in [1, 2, 3] {
        original.push_back(i).unwrap();
    }

    let mut cloned = original.clone();
    assert_eq!(cloned.as_slice(), original.as_slice());

    cloned.push_back(4).unwrap();
    assert_eq!(original.as_slice(), &[1, 2, 3]);
    assert_eq!(cloned.as_slice(), &[1, 2, 3, 4]);
}

#[test]
fn hash_map_lookup_and_absent_key() {
    let mut m: Map<String, i32> = Map::new();
    m.insert("five hundred".to_string(), 555).unwrap();

    assert_eq!(m.get(&"five hundred".to_string()), Some(&555));
    assert_eq!(m.get(&"missing".to_string()), None);

    let ordered: Map<String, i32> = {
        let mut om = Map::ordered(Rc::new(Allocator::default()));
        om.insert("five hundred".to_string(), 555).unwrap();
        om
    };
    assert_eq!(m, ordered);
    assert_eq!(hash_of(&m), hash_of(&ordered));
}

fn hash_of<H: std::hash::Hash>(value: &H) -> u64 {
    use std::hash::Hasher;
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn hash_map_insert_many_then_remove_some() {
    let pairs = [
        "VulkanLayer",
        "VulkanRenderer",
        "VulkanCamera",
        "Platform",
        "Vulkan",
        "Window",
        "VulkanLight",
        "Monitor",
        "VulkanRenderable",
        "Cursor",
    ];
    let mut m: Map<String, i32> = Map::new();
    for (i, name) in pairs.iter().enumerate() {
        m.insert(name.to_string(), i as i32).unwrap();
    }

    let removed = [
        "VulkanRenderer",
        "VulkanCamera",
        "Vulkan",
        "VulkanRenderable",
        "VulkanLight",
        "VulkanLayer",
    ];
    for name in removed {
        assert!(m.remove(&name.to_string()).is_some());
    }

    assert_eq!(m.len(), 4);
    for name in removed {
        assert!(m.get(&name.to_string()).is_none());
    }
    for name in ["Platform", "Window", "Monitor", "Cursor"] {
        assert!(m.get(&name.to_string()).is_some());
    }
}

#[test]
fn ref_copies_and_garbage_collection_keep_live_pools() {
    let allocator = Rc::new(Allocator::new(Config::minimal()));
    let mut refs: Vec<Ref<i32>> = Vec::new();
    for i in 0..10 {
        refs.push(Ref::new(Rc::clone(&allocator), i).unwrap());
    }

    let copies: Vec<Ref<i32>> = refs.iter().cloned().collect();
    for r in &refs {
        assert_eq!(r.strong_count(), 2);
    }
    drop(copies);
    for r in &refs {
        assert_eq!(r.strong_count(), 1);
    }

    let reclaimed = allocator.collect_garbage();
    assert_eq!(reclaimed, 0, "every allocation is still referenced");
}

#[test]
fn ref_lifecycle_frees_the_allocation_on_last_drop() {
    let allocator = Rc::new(Allocator::default());
    let r = Ref::new(Rc::clone(&allocator), 42).unwrap();
    let ptr = r.get() as *const i32 as *const u8;
    assert!(allocator.check_authority(ptr));

    let copy = r.clone();
    assert_eq!(r.strong_count(), 2);
    drop(r);
    assert_eq!(copy.strong_count(), 1);
    drop(copy);

    assert!(!allocator.check_authority(ptr));
}
