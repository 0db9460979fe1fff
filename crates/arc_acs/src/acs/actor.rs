//! # Actor Identity
//!
//! Actors are opaque, never-reused 64-bit handles. The raw value doubles as
//! the sparse index into every component array, so the index width is fixed
//! here instead of being derived by masking:
//! - Component arrays index with [`ActorIndex`] (`u32`)
//! - [`ActorId::MAX_INDEX`] is the highest id an `ActorManager` hands out
//! - `ActorIndex::MAX` is reserved as the empty-slot sentinel

use std::fmt;

/// Sparse index type used by component arrays.
pub type ActorIndex = u32;

/// Unique identifier for an actor.
///
/// Ids are allocated monotonically and are never reused within one
/// manager, so no generation counter is needed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ActorId(u64);

impl ActorId {
    /// Highest index an actor may use; `ActorIndex::MAX` is the sentinel.
    pub const MAX_INDEX: ActorIndex = ActorIndex::MAX - 1;

    /// Null/invalid actor ID.
    pub const NULL: Self = Self(ActorIndex::MAX as u64);

    /// Creates an actor ID from its component-array index.
    #[inline]
    #[must_use]
    pub const fn from_index(index: ActorIndex) -> Self {
        Self(index as u64)
    }

    /// Returns the index used to address component arrays.
    #[inline]
    #[must_use]
    pub const fn index(self) -> ActorIndex {
        // Lossless: every constructor goes through `ActorIndex`.
        self.0 as ActorIndex
    }

    /// Returns the raw 64-bit value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Checks if this actor ID is null/invalid.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == Self::NULL.0
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("actor#null")
        } else {
            write!(f, "actor#{}", self.0)
        }
    }
}

/// Where an actor is in its lifecycle.
///
/// `Unborn → Spawning → Alive → Destroyed`. `Spawning` only exists while a
/// blueprint runs inside `ActorManager::spawn` and is never observable from
/// outside it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActorLifecycle {
    /// The id has not been allocated yet.
    Unborn,
    /// Construction finished and creation events were flushed.
    Alive,
    /// The actor was destroyed; its id is retired for good.
    Destroyed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_id_roundtrip() {
        let id = ActorId::from_index(12_345);
        assert_eq!(id.index(), 12_345);
        assert_eq!(id.raw(), 12_345);
        assert!(!id.is_null());
    }

    #[test]
    fn test_null_actor() {
        assert!(ActorId::default().is_null());
        assert_eq!(ActorId::NULL.index(), ActorIndex::MAX);
        assert!(ActorId::MAX_INDEX < ActorId::NULL.index());
        assert_eq!(ActorId::NULL.to_string(), "actor#null");
        assert_eq!(ActorId::from_index(3).to_string(), "actor#3");
    }
}
