//! # Entity Management
//!
//! Entities are bare `u32` identifiers handed out by a monotonic counter.
//! Id 0 is reserved as the null entity, and ids are never recycled: once the
//! counter reaches the configured maximum the allocator fails closed.

use std::fmt;

use bytemuck::{Pod, Zeroable};

use crate::error::{StoreError, StoreResult};

/// Opaque entity identifier.
///
/// An entity carries no data of its own; it exists exactly as long as some
/// sparse set holds a component for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct Entity(u32);

impl Entity {
    /// Null/invalid entity.
    pub const NULL: Self = Self(0);

    /// Wraps a raw id.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw id.
    #[inline]
    #[must_use]
    pub const fn to_raw(self) -> u32 {
        self.0
    }

    /// Returns the id as a sparse-table index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Checks if this is the null entity.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// One-shot entity id allocator.
///
/// Hands out `1, 2, 3, ...` up to `max_entities - 1`. There is no free list.
#[derive(Clone, Debug)]
pub struct EntityAllocator {
    /// Next id to hand out.
    next: u32,
    /// Exclusive upper bound on ids (size of every sparse table).
    max_entities: u32,
}

impl EntityAllocator {
    /// Creates an allocator for ids in `1..max_entities`.
    #[must_use]
    pub const fn new(max_entities: u32) -> Self {
        Self {
            next: 1,
            max_entities,
        }
    }

    /// Returns the exclusive upper bound on ids.
    #[inline]
    #[must_use]
    pub const fn max_entities(&self) -> u32 {
        self.max_entities
    }

    /// Returns how many ids have been handed out so far.
    #[inline]
    #[must_use]
    pub const fn allocated_count(&self) -> u32 {
        self.next - 1
    }

    /// Returns how many ids are still available.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.max_entities.saturating_sub(self.next)
    }

    /// Returns `true` if `entity` was handed out by this allocator.
    #[inline]
    #[must_use]
    pub const fn is_allocated(&self, entity: Entity) -> bool {
        !entity.is_null() && entity.0 < self.next
    }

    /// Allocates the next id.
    ///
    /// # Returns
    ///
    /// The new entity, or [`Entity::NULL`] if the id space is exhausted.
    #[inline]
    pub fn allocate(&mut self) -> Entity {
        self.try_allocate().unwrap_or(Entity::NULL)
    }

    /// Allocates the next id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CapacityExhausted`] once every id below
    /// `max_entities` has been used.
    pub fn try_allocate(&mut self) -> StoreResult<Entity> {
        if self.next >= self.max_entities {
            tracing::warn!(
                "EntityAllocator: id space exhausted ({} ids)",
                self.max_entities
            );
            return Err(StoreError::CapacityExhausted {
                max_entities: self.max_entities,
            });
        }

        let entity = Entity(self.next);
        self.next += 1;
        Ok(entity)
    }
}
