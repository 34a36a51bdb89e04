//! # contain-core
//!
//! Pool-backed containers with an intent-based construction protocol.
//!
//! The crate is built around three layers:
//!
//! - [`alloc`] — a hierarchical, segregated-fit pool allocator
//!   ([`alloc::Pool`], [`alloc::Allocator`]) with inline ref-counted
//!   allocation headers.
//! - [`block`] — a single, generic container descriptor
//!   ([`block::Block`]) that every higher-level container is built from.
//! - [`container`] and [`ptr`] — typed, zero-cost views over a `Block`
//!   ([`container::Many`], [`container::Map`], [`container::Set`],
//!   [`container::Pair`]) plus owned/ref-counted smart pointers
//!   ([`ptr::Own`], [`ptr::Ref`]).
//!
//! All of it is driven by the [`intent::Intent`] protocol: every
//! construction and assignment states up front whether the source should
//! be shared, deep-copied, moved, or handed over without bookkeeping.
//!
//! ## Quick start
//!
//! ```
//! use contain_core::container::Many;
//!
//! let mut v: Many<i32> = Many::new();
//! v.push_back(1).unwrap();
//! v.push_back(2).unwrap();
//! v.push_front(0).unwrap();
//! assert_eq!(v.as_slice(), &[0, 1, 2]);
//! ```

#[allow(dead_code)]
pub mod alloc;
pub mod block;
pub mod container;
pub mod diagnostics;
pub mod error;
pub mod intent;
pub mod meta;
pub mod ptr;

pub use alloc::{Allocator, Config, Pool};
pub use error::{ContainError, ErrorKind};
pub use intent::Intent;
