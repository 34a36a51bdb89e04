//! Error taxonomy shared by every allocator and container operation.
//!
//! Every fallible entry point in this crate returns [`ContainResult`]. Errors
//! are kind-tagged rather than stringly-typed so callers can match on
//! `error.kind()` without parsing messages, mirroring the abstract error
//! kinds the allocator/container contract commits to: out-of-memory,
//! type mismatch, unsupported intent, out-of-range access, mutation of an
//! immutable container, and conversion failure.

use std::fmt;

/// The six error kinds surfaced by this crate. Names are the abstract kinds;
/// no other taxonomy is exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The allocator could not fulfill a request (pool and fallback both
    /// exhausted).
    Allocate,
    /// A type-constrained container was asked to hold an incompatible
    /// element on insert or assign. No call site in this crate raises it:
    /// a typed `Block<T>` can't hold the wrong element type by
    /// construction, so the failure this kind names is a compile error
    /// here rather than a runtime one. Kept in the taxonomy for parity
    /// with the abstract error kinds this crate's containers mirror.
    Mutate,
    /// The element type does not support the requested [`crate::Intent`]
    /// (e.g. `Clone` of a non-clonable type). Like `Mutate`, unreachable
    /// at runtime in this crate: [`crate::intent::IntentSource`]'s impls
    /// bound the capability they need (`Cloned<T>`/`&T` require
    /// `T: Clone`), so an unsupported intent fails to compile instead.
    Construct,
    /// A mutation was attempted on a [`crate::block::Block`] marked
    /// constant via [`crate::block::Block::freeze`]. The one kind in this
    /// taxonomy with a real runtime trigger.
    Destruct,
    /// An index or offset fell outside `[0, count)`.
    Access,
    /// A text/byte conversion failed.
    Convert,
}

impl ErrorKind {
    /// Short code used in `Display` output, one letter family per kind.
    pub const fn code(self) -> &'static str {
        match self {
            ErrorKind::Allocate => "E-ALLOC",
            ErrorKind::Mutate => "E-MUTATE",
            ErrorKind::Construct => "E-CONSTRUCT",
            ErrorKind::Destruct => "E-DESTRUCT",
            ErrorKind::Access => "E-ACCESS",
            ErrorKind::Convert => "E-CONVERT",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A kind-tagged error with a static description.
///
/// Every operation that returns this error leaves the container's
/// observable state unchanged: count, type, state flags, and ref-count are
/// exactly what they were before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainError {
    kind: ErrorKind,
    message: &'static str,
}

impl ContainError {
    /// Build an error of the given kind with a static message.
    pub const fn new(kind: ErrorKind, message: &'static str) -> Self {
        Self { kind, message }
    }

    /// Out-of-memory: the allocator could not satisfy the request.
    pub const fn allocate(message: &'static str) -> Self {
        Self::new(ErrorKind::Allocate, message)
    }

    /// Incompatible element type on insert/assign into a constrained
    /// container.
    pub const fn mutate(message: &'static str) -> Self {
        Self::new(ErrorKind::Mutate, message)
    }

    /// The element type does not support the requested intent.
    pub const fn construct(message: &'static str) -> Self {
        Self::new(ErrorKind::Construct, message)
    }

    /// Mutation attempted on an immutable container.
    pub const fn destruct(message: &'static str) -> Self {
        Self::new(ErrorKind::Destruct, message)
    }

    /// Index or offset out of `[0, count)`.
    pub const fn access(message: &'static str) -> Self {
        Self::new(ErrorKind::Access, message)
    }

    /// A text/byte conversion failed.
    pub const fn convert(message: &'static str) -> Self {
        Self::new(ErrorKind::Convert, message)
    }

    /// The abstract kind of this error.
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The static message describing this error.
    pub const fn message(&self) -> &'static str {
        self.message
    }
}

impl fmt::Display for ContainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.code(), self.message)
    }
}

impl std::error::Error for ContainError {}

/// Convenience alias used by every fallible entry point in this crate.
pub type ContainResult<T> = Result<T, ContainError>;
