//! # Dynamic Array
//!
//! An owning, contiguous, growable buffer with a fixed geometric growth
//! schedule and fallible allocation. This is the storage substrate for the
//! sparse sets.
//!
//! - Growth multiplies capacity by ~1.5 (`cap + cap / 2 + 1`) until the
//!   request fits, moving (never copying) existing elements
//! - Allocation failure is reported, and the array keeps its prior state
//! - Shrinking keeps capacity; growing default-fills every newly exposed slot
//! - Checked accessors return [`StoreError::OutOfBounds`] in every build

use std::io::{Read, Write};
use std::ops::{Index, IndexMut};

use bytemuck::Pod;

use crate::error::{StoreError, StoreResult};

/// Returns the capacity the growth schedule picks for `required` elements.
///
/// Starting from `current`, capacity grows by half plus one until it is at
/// least `required`. Saturates at `usize::MAX` instead of overflowing.
#[inline]
#[must_use]
pub fn grown_capacity(current: usize, required: usize) -> usize {
    let mut capacity = current;
    while capacity < required {
        capacity = capacity.saturating_add(capacity / 2).saturating_add(1);
    }
    capacity
}

/// Owning, resizable, contiguous buffer of `T`.
///
/// # Example
///
/// ```rust,ignore
/// let mut values: DynamicArray<u32> = DynamicArray::with_len(4)?;
/// values.set(2, 7)?;
/// values.resize(16)?; // slots 4..16 are default-filled
/// assert_eq!(values.get(2)?, &7);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DynamicArray<T> {
    /// Live elements; `Vec` capacity is the reserved growth headroom.
    data: Vec<T>,
}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DynamicArray<T> {
    /// Creates an empty array without allocating.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Creates an empty array with exactly `capacity` reserved slots.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AllocationFailed`] if the memory cannot be reserved.
    pub fn with_capacity(capacity: usize) -> StoreResult<Self> {
        let mut array = Self::new();
        array.reserve(capacity)?;
        Ok(array)
    }

    /// Returns the logical number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns the number of elements that fit without reallocating.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Returns `true` if the array holds no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Ensures the total capacity is at least `total` elements.
    ///
    /// Reserves exactly the requested amount; no growth factor is applied.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AllocationFailed`] if the allocation fails. The
    /// array is unchanged in that case.
    pub fn reserve(&mut self, total: usize) -> StoreResult<()> {
        if total <= self.data.capacity() {
            return Ok(());
        }

        let additional = total - self.data.len();
        self.data.try_reserve_exact(additional).map_err(|err| {
            tracing::warn!("DynamicArray: failed to allocate {total} elements: {err}");
            StoreError::AllocationFailed { requested: total }
        })
    }

    /// Grows capacity along the geometric schedule until `required` fits.
    fn grow_for(&mut self, required: usize) -> StoreResult<()> {
        if required <= self.data.capacity() {
            return Ok(());
        }
        self.reserve(grown_capacity(self.data.capacity(), required))
    }

    /// Appends an element, growing if the array is full.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AllocationFailed`] if growth fails.
    pub fn push(&mut self, value: T) -> StoreResult<()> {
        self.grow_for(self.data.len() + 1)?;
        self.data.push(value);
        Ok(())
    }

    /// Removes and returns the last element.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.data.pop()
    }

    /// Inserts `value` at `index`, shifting later elements right. O(n).
    ///
    /// # Errors
    ///
    /// - [`StoreError::OutOfBounds`] if `index > len`
    /// - [`StoreError::AllocationFailed`] if growth fails
    pub fn insert(&mut self, value: T, index: usize) -> StoreResult<()> {
        let len = self.data.len();
        if index > len {
            tracing::warn!("DynamicArray::insert: invalid index {index} (len {len})");
            return Err(StoreError::OutOfBounds { index, len });
        }

        self.grow_for(len + 1)?;
        self.data.insert(index, value);
        Ok(())
    }

    /// Removes the element at `index`, shifting later elements left. O(n).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OutOfBounds`] if `index >= len`.
    pub fn remove(&mut self, index: usize) -> StoreResult<T> {
        self.check_index(index)?;
        Ok(self.data.remove(index))
    }

    /// Removes the element at `index` by moving the last element into its
    /// slot. O(1), does not preserve order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OutOfBounds`] if `index >= len`.
    pub fn swap_remove(&mut self, index: usize) -> StoreResult<T> {
        self.check_index(index)?;
        Ok(self.data.swap_remove(index))
    }

    /// Shortens the array to `len` elements, keeping capacity.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        self.data.truncate(len);
    }

    /// Removes all elements. Capacity is retained.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Checked shared access.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OutOfBounds`] if `index >= len`.
    #[inline]
    pub fn get(&self, index: usize) -> StoreResult<&T> {
        let len = self.data.len();
        self.data
            .get(index)
            .ok_or(StoreError::OutOfBounds { index, len })
    }

    /// Checked mutable access.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OutOfBounds`] if `index >= len`.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> StoreResult<&mut T> {
        let len = self.data.len();
        self.data
            .get_mut(index)
            .ok_or(StoreError::OutOfBounds { index, len })
    }

    /// Overwrites the element at `index`, returning the previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OutOfBounds`] if `index >= len`.
    #[inline]
    pub fn set(&mut self, index: usize, value: T) -> StoreResult<T> {
        let slot = self.get_mut(index)?;
        Ok(std::mem::replace(slot, value))
    }

    /// Returns the live elements as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns the live elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Iterates over the live elements.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Iterates mutably over the live elements.
    #[inline]
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    #[inline]
    fn check_index(&self, index: usize) -> StoreResult<()> {
        let len = self.data.len();
        if index < len {
            Ok(())
        } else {
            Err(StoreError::OutOfBounds { index, len })
        }
    }
}

impl<T: Default> DynamicArray<T> {
    /// Creates an array of `len` default values with exactly `len` capacity.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AllocationFailed`] if the memory cannot be reserved.
    pub fn with_len(len: usize) -> StoreResult<Self> {
        let mut array = Self::with_capacity(len)?;
        array.data.resize_with(len, T::default);
        Ok(array)
    }

    /// Sets the logical length to `len`.
    ///
    /// Shrinking drops the tail and keeps capacity. Growing default-fills
    /// every new slot, reallocating along the growth schedule when `len`
    /// exceeds capacity.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AllocationFailed`] if growth fails. The array
    /// keeps its previous length, capacity and contents in that case.
    pub fn resize(&mut self, len: usize) -> StoreResult<()> {
        self.grow_for(len)?;
        self.data.resize_with(len, T::default);
        Ok(())
    }
}

impl<T: Clone> DynamicArray<T> {
    /// Creates an array of `len` copies of `value` with exactly `len` capacity.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AllocationFailed`] if the memory cannot be reserved.
    pub fn from_elem(value: T, len: usize) -> StoreResult<Self> {
        let mut array = Self::with_capacity(len)?;
        array.data.resize(len, value);
        Ok(array)
    }

    /// Overwrites every live element with `value`.
    #[inline]
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

// =============================================================================
// Raw byte-blob persistence (no schema, no versioning)
// =============================================================================

impl<T: Pod> DynamicArray<T> {
    /// Returns the live elements as raw bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// Writes the live elements as raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the writer fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> StoreResult<()> {
        writer.write_all(self.as_bytes()).map_err(|err| {
            tracing::warn!("DynamicArray::write_to: {err}");
            StoreError::from(err)
        })
    }

    /// Reads exactly `len` elements worth of raw bytes into the array.
    ///
    /// The length is not changed; callers size the array first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the reader fails or runs short. The
    /// array contents are untouched in that case.
    pub fn read_from<R: Read>(&mut self, mut reader: R) -> StoreResult<()> {
        let mut staging = vec![0u8; std::mem::size_of_val(self.data.as_slice())];
        reader.read_exact(&mut staging).map_err(|err| {
            tracing::warn!(
                "DynamicArray::read_from: expected {} bytes: {err}",
                staging.len()
            );
            StoreError::from(err)
        })?;

        let bytes: &mut [u8] = bytemuck::cast_slice_mut(self.data.as_mut_slice());
        bytes.copy_from_slice(&staging);
        Ok(())
    }
}

impl<T> Index<usize> for DynamicArray<T> {
    type Output = T;

    #[inline]
    #[track_caller]
    fn index(&self, index: usize) -> &T {
        match self.data.get(index) {
            Some(value) => value,
            None => panic!(
                "DynamicArray index {index} out of bounds (len {})",
                self.data.len()
            ),
        }
    }
}

impl<T> IndexMut<usize> for DynamicArray<T> {
    #[inline]
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.data.len();
        match self.data.get_mut(index) {
            Some(value) => value,
            None => panic!("DynamicArray index {index} out of bounds (len {len})"),
        }
    }
}

impl<'a, T> IntoIterator for &'a DynamicArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynamicArray<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_schedule() {
        assert_eq!(grown_capacity(0, 1), 1);
        assert_eq!(grown_capacity(0, 10), 11); // 0 -> 1 -> 2 -> 4 -> 7 -> 11
        assert_eq!(grown_capacity(64, 65), 97);
        assert_eq!(grown_capacity(64, 10), 64);
        assert_eq!(grown_capacity(usize::MAX - 1, usize::MAX), usize::MAX);
    }

    #[test]
    fn test_with_len_default_fill() {
        let array: DynamicArray<u32> = DynamicArray::with_len(5).unwrap();
        assert_eq!(array.len(), 5);
        assert_eq!(array.capacity(), 5);
        assert!(array.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_resize_grow_preserves_prefix() {
        let mut array: DynamicArray<u32> = DynamicArray::with_len(3).unwrap();
        array.set(0, 10).unwrap();
        array.set(2, 30).unwrap();

        array.resize(8).unwrap();
        assert_eq!(array.len(), 8);
        assert!(array.capacity() >= 8);
        assert_eq!(array.as_slice(), &[10, 0, 30, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_shrink_keeps_capacity_and_regrow_is_zeroed() {
        let mut array: DynamicArray<u32> = DynamicArray::from_elem(9, 6).unwrap();
        let capacity = array.capacity();

        array.resize(2).unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array.capacity(), capacity);

        // Slots exposed again must not leak the old values.
        array.resize(6).unwrap();
        assert_eq!(array.as_slice(), &[9, 9, 0, 0, 0, 0]);
        assert_eq!(array.capacity(), capacity);
    }

    #[test]
    fn test_allocation_failure_leaves_array_intact() {
        let mut array: DynamicArray<u64> = DynamicArray::new();
        array.push(1).unwrap();
        array.push(2).unwrap();
        let capacity = array.capacity();

        let err = array.resize(usize::MAX).unwrap_err();
        assert!(matches!(err, StoreError::AllocationFailed { .. }));
        assert_eq!(array.as_slice(), &[1, 2]);
        assert_eq!(array.capacity(), capacity);
    }

    #[test]
    fn test_checked_access() {
        let mut array: DynamicArray<i32> = DynamicArray::with_len(2).unwrap();
        assert_eq!(
            array.get(2),
            Err(StoreError::OutOfBounds { index: 2, len: 2 })
        );
        assert!(array.get_mut(5).is_err());
        assert!(array.set(2, 1).is_err());
        assert_eq!(array.set(1, 4), Ok(0));
        assert_eq!(array[1], 4);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_index_panics_past_len() {
        let array: DynamicArray<i32> = DynamicArray::with_len(1).unwrap();
        let _ = array[1];
    }

    #[test]
    fn test_insert_and_remove_shift() {
        let mut array: DynamicArray<char> = DynamicArray::new();
        array.insert('a', 0).unwrap();
        array.insert('c', 1).unwrap();
        array.insert('b', 1).unwrap();
        assert_eq!(array.as_slice(), &['a', 'b', 'c']);

        assert!(array.insert('z', 5).is_err());

        assert_eq!(array.remove(0), Ok('a'));
        assert_eq!(array.as_slice(), &['b', 'c']);
        assert!(array.remove(2).is_err());
    }

    #[test]
    fn test_swap_remove() {
        let mut array: DynamicArray<u8> = DynamicArray::new();
        for v in 0..4 {
            array.push(v).unwrap();
        }
        assert_eq!(array.swap_remove(1), Ok(1));
        assert_eq!(array.as_slice(), &[0, 3, 2]);
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut array: DynamicArray<u16> = DynamicArray::with_len(32).unwrap();
        array.clear();
        assert!(array.is_empty());
        assert_eq!(array.capacity(), 32);
    }

    #[test]
    fn test_truncate_keeps_prefix_and_capacity() {
        let mut array: DynamicArray<u16> = DynamicArray::with_len(8).unwrap();
        array.set(1, 7).unwrap();
        array.truncate(2);
        assert_eq!(array.as_slice(), &[0, 7]);
        assert_eq!(array.capacity(), 8);

        // Longer than len is a no-op.
        array.truncate(5);
        assert_eq!(array.len(), 2);
    }

    #[test]
    fn test_byte_dump_and_load() {
        let mut source: DynamicArray<u32> = DynamicArray::new();
        for v in [1u32, 2, 0xDEAD_BEEF] {
            source.push(v).unwrap();
        }

        let mut blob = Vec::new();
        source.write_to(&mut blob).unwrap();
        assert_eq!(blob.len(), 12);

        let mut target: DynamicArray<u32> = DynamicArray::with_len(3).unwrap();
        target.read_from(blob.as_slice()).unwrap();
        assert_eq!(target, source);
    }

    #[test]
    fn test_short_read_is_reported() {
        let mut target: DynamicArray<u32> = DynamicArray::from_elem(7, 2).unwrap();
        let err = target.read_from([1u8, 2, 3].as_slice()).unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
        assert_eq!(target.as_slice(), &[7, 7]);
    }
}
