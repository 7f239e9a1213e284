//! # Sparse Set
//!
//! Component storage for a single component type.
//!
//! ```text
//! sparse:  [ -, 2, -, 0, -, 1, ... ]   entity id -> dense slot (fixed size)
//! dense:   [ e3, e5, e1 ]              dense slot -> entity id
//! data:    [ c3, c5, c1 ]              dense slot -> component
//! ```
//!
//! - Add / remove / lookup are O(1)
//! - `dense` and `data` stay packed, so iteration is a linear scan
//! - Removal swaps the last live slot into the hole: dense order is NOT
//!   insertion order and may change on any removal

use crate::ecs::entity::Entity;
use crate::error::{StoreError, StoreResult};
use crate::memory::DynamicArray;

/// Sentinel stored in the sparse table for absent entities.
const INVALID_INDEX: u32 = u32::MAX;

/// Maps entities to at most one `T` each, keeping values contiguous.
///
/// # Invariants
///
/// - For every live slot `i < len()`: `sparse[dense[i]] == i`
/// - `dense` and `data` always have the same length
/// - `sparse[e]` is either a live slot or [`INVALID_INDEX`]
///
/// # Example
///
/// ```rust,ignore
/// let mut healths: SparseSet<f32> = SparseSet::new(10_000, 64)?;
/// healths.add(Entity::from_raw(7), 100.0)?;
/// if let Some(health) = healths.get_mut(Entity::from_raw(7)) {
///     *health -= 10.0;
/// }
/// ```
#[derive(Clone, Debug)]
pub struct SparseSet<T> {
    /// Entity id -> dense slot. Sized to `max_entities` up front.
    sparse: DynamicArray<u32>,
    /// Dense slot -> entity id.
    dense: DynamicArray<Entity>,
    /// Dense slot -> component value.
    data: DynamicArray<T>,
    /// Exclusive upper bound on accepted entity ids.
    max_entities: u32,
    /// Dense capacity allocated by the first growth.
    initial_capacity: usize,
}

impl<T> SparseSet<T> {
    /// Creates an empty set accepting entity ids in `1..max_entities`.
    ///
    /// The sparse table is allocated immediately; the dense arrays are
    /// allocated on the first insertion (`initial_capacity` slots, then
    /// doubling).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AllocationFailed`] if the sparse table cannot be
    /// allocated.
    pub fn new(max_entities: u32, initial_capacity: usize) -> StoreResult<Self> {
        Ok(Self {
            sparse: DynamicArray::from_elem(INVALID_INDEX, max_entities as usize)?,
            dense: DynamicArray::new(),
            data: DynamicArray::new(),
            max_entities,
            initial_capacity: initial_capacity.max(1),
        })
    }

    /// Returns the exclusive upper bound on accepted entity ids.
    #[inline]
    #[must_use]
    pub const fn max_entities(&self) -> u32 {
        self.max_entities
    }

    /// Returns the number of live components.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Alias of [`len`](Self::len).
    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.dense.len()
    }

    /// Returns `true` if no entity has this component.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Returns the number of components that fit without growing.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.dense.capacity().min(self.data.capacity())
    }

    /// Sparse-table slot for `entity`, or `None` for ids outside the table.
    #[inline]
    fn slot(&self, entity: Entity) -> Option<usize> {
        if entity.is_null() || entity.to_raw() >= self.max_entities {
            None
        } else {
            Some(entity.index())
        }
    }

    /// Returns the dense slot currently holding `entity`.
    ///
    /// The identity check against `dense` rejects stale sparse entries.
    #[inline]
    #[must_use]
    pub fn dense_index(&self, entity: Entity) -> Option<usize> {
        let slot = self.slot(entity)?;
        let index = *self.sparse.as_slice().get(slot)? as usize;
        (self.dense.as_slice().get(index) == Some(&entity)).then_some(index)
    }

    /// Returns `true` if `entity` has a component in this set.
    #[inline]
    #[must_use]
    pub fn has(&self, entity: Entity) -> bool {
        self.dense_index(entity).is_some()
    }

    /// Adds or overwrites the component for `entity`.
    ///
    /// Overwriting keeps the entity's dense slot; nothing is reordered.
    ///
    /// # Returns
    ///
    /// The previous value if the entity already had one, `None` otherwise.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidEntity`] for the null entity or ids `>= max_entities`
    /// - [`StoreError::AllocationFailed`] if the dense arrays cannot grow; the
    ///   set is unchanged
    pub fn add(&mut self, entity: Entity, value: T) -> StoreResult<Option<T>> {
        let Some(slot) = self.slot(entity) else {
            tracing::debug!(
                "SparseSet::add: rejected {entity} (max entities {})",
                self.max_entities
            );
            return Err(StoreError::InvalidEntity {
                entity: entity.to_raw(),
                max_entities: self.max_entities,
            });
        };

        if let Some(index) = self.dense_index(entity) {
            return Ok(Some(std::mem::replace(&mut self.data[index], value)));
        }

        self.grow_if_full()?;

        let index = self.dense.len();
        self.dense.push(entity)?;
        if let Err(err) = self.data.push(value) {
            self.dense.pop();
            return Err(err);
        }
        self.sparse[slot] = index as u32;
        Ok(None)
    }

    /// Grows both dense arrays when full: `initial_capacity` first, then doubling.
    fn grow_if_full(&mut self) -> StoreResult<()> {
        let capacity = self.capacity();
        let len = self.dense.len();
        if len < capacity {
            return Ok(());
        }

        let target = if capacity == 0 {
            self.initial_capacity
        } else {
            capacity.saturating_mul(2)
        };
        let target = target.min(self.max_entities as usize).max(len + 1);

        self.dense.reserve(target)?;
        self.data.reserve(target)
    }

    /// Removes the component for `entity` by swap-removal.
    ///
    /// The last live slot moves into the vacated one, so dense order changes.
    ///
    /// # Returns
    ///
    /// The removed value, or `None` if the entity had no component.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let index = self.dense_index(entity)?;
        let last = self.dense.len() - 1;

        self.dense.swap_remove(index).ok()?;
        let value = self.data.swap_remove(index).ok()?;

        if index != last {
            let moved = self.dense[index];
            self.sparse[moved.index()] = index as u32;
        }
        self.sparse[entity.index()] = INVALID_INDEX;

        Some(value)
    }

    /// Returns the component for `entity`.
    ///
    /// The reference must not be held across a mutating call.
    #[inline]
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&T> {
        let index = self.dense_index(entity)?;
        self.data.as_slice().get(index)
    }

    /// Returns the component for `entity` mutably.
    #[inline]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let index = self.dense_index(entity)?;
        self.data.as_mut_slice().get_mut(index)
    }

    /// Returns the entity in dense slot `index`.
    ///
    /// Valid only for `index < len()` and only until the next mutation.
    #[inline]
    #[must_use]
    pub fn entity_at(&self, index: usize) -> Option<Entity> {
        self.dense.as_slice().get(index).copied()
    }

    /// Returns the component in dense slot `index`.
    #[inline]
    #[must_use]
    pub fn data_at(&self, index: usize) -> Option<&T> {
        self.data.as_slice().get(index)
    }

    /// Returns the component in dense slot `index` mutably.
    #[inline]
    pub fn data_at_mut(&mut self, index: usize) -> Option<&mut T> {
        self.data.as_mut_slice().get_mut(index)
    }

    /// Live entities in dense order.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        self.dense.as_slice()
    }

    /// Live components in dense order.
    #[inline]
    #[must_use]
    pub fn data(&self) -> &[T] {
        self.data.as_slice()
    }

    /// Live components in dense order, mutably.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        self.data.as_mut_slice()
    }

    /// Iterates over `(entity, component)` pairs in dense order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.dense.iter().copied().zip(self.data.iter())
    }

    /// Iterates mutably over `(entity, component)` pairs in dense order.
    #[inline]
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.dense.iter().copied().zip(self.data.iter_mut())
    }

    /// Removes every component. Dense capacity is retained.
    pub fn clear(&mut self) {
        for entity in self.dense.iter() {
            self.sparse[entity.index()] = INVALID_INDEX;
        }
        self.dense.clear();
        self.data.clear();
    }

    /// Splits the set into the borrow the query engine iterates with.
    #[inline]
    pub fn dense_view(&mut self) -> DenseView<'_, T> {
        DenseView {
            sparse: self.sparse.as_slice(),
            entities: self.dense.as_slice(),
            data: self.data.as_mut_slice(),
        }
    }
}

/// Split borrow of a [`SparseSet`]: shared lookup tables, mutable components.
///
/// Lets a query read the driver's entity list while handing out `&mut`
/// components from the same set.
pub struct DenseView<'a, T> {
    sparse: &'a [u32],
    entities: &'a [Entity],
    data: &'a mut [T],
}

impl<'a, T> DenseView<'a, T> {
    /// Number of live components.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if the set is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Live entities in dense order, detached from this view's borrow.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &'a [Entity] {
        self.entities
    }

    /// Dense slot of `entity`, or `None` if absent.
    #[inline]
    #[must_use]
    pub fn index_of(&self, entity: Entity) -> Option<usize> {
        let index = *self.sparse.get(entity.index())? as usize;
        (self.entities.get(index) == Some(&entity)).then_some(index)
    }

    /// Component in a dense slot already proven live by the caller.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[inline]
    pub fn component_mut(&mut self, index: usize) -> &mut T {
        &mut self.data[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e(raw: u32) -> Entity {
        Entity::from_raw(raw)
    }

    /// Checks the sparse/dense inverse mapping over the live range.
    fn assert_consistent<T>(set: &SparseSet<T>) {
        assert_eq!(set.dense.len(), set.data.len());
        for (index, entity) in set.dense.iter().enumerate() {
            assert_eq!(set.sparse[entity.index()] as usize, index);
            assert!(set.has(*entity));
        }
    }

    #[test]
    fn test_add_get_has() {
        let mut set: SparseSet<i32> = SparseSet::new(100, 4).unwrap();
        assert_eq!(set.add(e(5), 50), Ok(None));
        assert_eq!(set.add(e(9), 90), Ok(None));

        assert!(set.has(e(5)));
        assert!(!set.has(e(6)));
        assert_eq!(set.get(e(9)), Some(&90));
        assert_eq!(set.len(), 2);
        assert_consistent(&set);
    }

    #[test]
    fn test_overwrite_is_in_place() {
        let mut set: SparseSet<&str> = SparseSet::new(100, 4).unwrap();
        set.add(e(1), "a").unwrap();
        set.add(e(2), "b").unwrap();

        assert_eq!(set.add(e(1), "c"), Ok(Some("a")));
        assert_eq!(set.len(), 2);
        assert_eq!(set.entity_at(0), Some(e(1)));
        assert_eq!(set.get(e(1)), Some(&"c"));
    }

    #[test]
    fn test_invalid_entities_rejected() {
        let mut set: SparseSet<u8> = SparseSet::new(10, 4).unwrap();
        assert_eq!(
            set.add(Entity::NULL, 1),
            Err(StoreError::InvalidEntity {
                entity: 0,
                max_entities: 10
            })
        );
        assert!(set.add(e(10), 1).is_err());
        assert!(set.add(e(u32::MAX), 1).is_err());
        assert!(set.is_empty());

        assert!(!set.has(e(10)));
        assert!(set.get(e(u32::MAX)).is_none());
        assert!(set.remove(e(10)).is_none());
        assert!(set.add(e(9), 1).is_ok());
    }

    #[test]
    fn test_swap_removal_preserves_other_values() {
        let mut set: SparseSet<u32> = SparseSet::new(100, 4).unwrap();
        for raw in 1..=5 {
            set.add(e(raw), raw * 10).unwrap();
        }

        assert_eq!(set.remove(e(2)), Some(20));
        assert_eq!(set.len(), 4);
        // The last live entity moved into the hole.
        assert_eq!(set.entity_at(1), Some(e(5)));
        for raw in [1, 3, 4, 5] {
            assert_eq!(set.get(e(raw)), Some(&(raw * 10)));
        }
        assert!(!set.has(e(2)));
        assert_consistent(&set);
    }

    #[test]
    fn test_remove_last_and_absent() {
        let mut set: SparseSet<u32> = SparseSet::new(100, 4).unwrap();
        set.add(e(1), 1).unwrap();
        set.add(e(2), 2).unwrap();

        assert_eq!(set.remove(e(2)), Some(2));
        assert_eq!(set.remove(e(2)), None);
        assert_eq!(set.remove(e(3)), None);
        assert_eq!(set.len(), 1);
        assert_consistent(&set);
    }

    #[test]
    fn test_stale_sparse_entry_rejected() {
        let mut set: SparseSet<u32> = SparseSet::new(100, 4).unwrap();
        set.add(e(1), 1).unwrap();
        set.add(e(2), 2).unwrap();
        set.remove(e(1)).unwrap();
        set.add(e(3), 3).unwrap();

        // Slot 0 and 1 are reused; e(1) must not resolve through them.
        assert!(!set.has(e(1)));
        assert_consistent(&set);
    }

    #[test]
    fn test_growth_schedule() {
        let mut set: SparseSet<u64> = SparseSet::new(1_000, 64).unwrap();
        assert_eq!(set.capacity(), 0);

        set.add(e(1), 1).unwrap();
        assert!(set.capacity() >= 64);

        for raw in 2..=65 {
            set.add(e(raw), u64::from(raw)).unwrap();
        }
        assert_eq!(set.len(), 65);
        assert!(set.capacity() >= 128);
        for raw in 1..=65 {
            assert_eq!(set.get(e(raw)), Some(&u64::from(raw)));
        }
        assert_consistent(&set);
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut set: SparseSet<u8> = SparseSet::new(100, 8).unwrap();
        for raw in 1..=8 {
            set.add(e(raw), 0).unwrap();
        }
        let capacity = set.capacity();

        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.capacity(), capacity);
        assert!((1..=8).all(|raw| !set.has(e(raw))));

        set.add(e(4), 4).unwrap();
        assert_eq!(set.dense_index(e(4)), Some(0));
        assert_consistent(&set);
    }

    #[test]
    fn test_iteration_pairs() {
        let mut set: SparseSet<u32> = SparseSet::new(100, 4).unwrap();
        for raw in [3, 7, 11] {
            set.add(e(raw), raw).unwrap();
        }
        for (_, value) in set.iter_mut() {
            *value += 1;
        }
        assert!(set.iter().all(|(entity, value)| *value == entity.to_raw() + 1));
        assert_eq!(set.entities(), &[e(3), e(7), e(11)]);
        assert_eq!(set.data(), &[4, 8, 12]);
    }

    #[test]
    fn test_dense_slot_access() {
        let mut set: SparseSet<u32> = SparseSet::new(100, 4).unwrap();
        set.add(e(2), 20).unwrap();
        set.add(e(9), 90).unwrap();

        assert_eq!(set.entity_at(1), Some(e(9)));
        assert_eq!(set.data_at(0), Some(&20));
        *set.data_at_mut(1).unwrap() += 5;
        assert_eq!(set.get(e(9)), Some(&95));

        assert_eq!(set.entity_at(2), None);
        assert_eq!(set.data_at(2), None);
        assert!(set.data_at_mut(2).is_none());
    }

    #[test]
    fn test_dense_view_lookup() {
        let mut set: SparseSet<u32> = SparseSet::new(100, 4).unwrap();
        set.add(e(4), 40).unwrap();
        set.add(e(6), 60).unwrap();

        let mut view = set.dense_view();
        assert_eq!(view.len(), 2);
        assert_eq!(view.index_of(e(6)), Some(1));
        assert_eq!(view.index_of(e(5)), None);
        assert_eq!(view.index_of(Entity::NULL), None);
        *view.component_mut(1) += 1;
        assert_eq!(set.get(e(6)), Some(&61));
    }
}
