//! Stack identifiers and their generators

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use serde::{Deserialize, Serialize};

/// Opaque identifier of a single stack entry.
///
/// A fresh id is minted every time an empty slot receives items; ids are never
/// reused within a session.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StackId {
    bits: u64,
}

impl StackId {
    /// Create an id from its raw value
    #[inline]
    pub const fn from_raw(bits: u64) -> Self {
        Self { bits }
    }

    /// Create a null/invalid id
    #[inline]
    pub const fn null() -> Self {
        Self { bits: u64::MAX }
    }

    /// Check if this id is null
    #[inline]
    pub const fn is_null(&self) -> bool {
        self.bits == u64::MAX
    }

    /// Get the raw value
    #[inline]
    pub const fn to_raw(&self) -> u64 {
        self.bits
    }
}

impl fmt::Debug for StackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "StackId(null)")
        } else {
            write!(f, "StackId({})", self.bits)
        }
    }
}

impl fmt::Display for StackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "null")
        } else {
            write!(f, "stk-{}", self.bits)
        }
    }
}

/// Anything that can mint fresh stack ids.
///
/// Engine operations that create entries borrow an `IdSource` for the
/// duration of the call so tests can inject a deterministic one.
pub trait IdSource {
    /// Produce an id never returned before by this source
    fn next_stack_id(&self) -> StackId;
}

impl<T: IdSource + ?Sized> IdSource for &T {
    fn next_stack_id(&self) -> StackId {
        (**self).next_stack_id()
    }
}

/// Thread-safe monotonic id generator
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    /// Create a new generator starting at zero
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    /// Create a generator whose first id is `start`
    pub const fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }

    /// Generate the next unique id
    pub fn next(&self) -> StackId {
        let bits = self.next.fetch_add(1, Ordering::Relaxed);
        // u64::MAX is the null sentinel; a session will never get there
        debug_assert!(bits != u64::MAX, "stack id space exhausted");
        StackId::from_raw(bits)
    }

    /// Peek at the value the next call to [`IdGenerator::next`] will use
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl IdSource for IdGenerator {
    fn next_stack_id(&self) -> StackId {
        self.next()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGenerator").field("next", &self.peek()).finish()
    }
}
