//! # Grids
//!
//! Flattened 2D and 3D arrays for spatial data (tile maps, broad-phase
//! cells). Same ownership and resize contract as the dynamic array:
//! row-major `y * width + x` in 2D, slab-major `z * width * height + y *
//! width + x` in 3D. Resizing keeps the overlapping region and default-fills
//! the rest.
//!
//! Cells live in a [`DynamicArray`], so allocation failure is reported the
//! same way.

use crate::error::{StoreError, StoreResult};
use crate::memory::dynamic_array::DynamicArray;

/// Multiplies grid extents, treating overflow as an allocation failure.
fn cell_count(extents: &[usize]) -> StoreResult<usize> {
    extents
        .iter()
        .try_fold(1usize, |acc, &extent| acc.checked_mul(extent))
        .ok_or(StoreError::AllocationFailed {
            requested: usize::MAX,
        })
}

/// A two-dimensional grid stored row-major in one contiguous buffer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Grid2D<T> {
    cells: DynamicArray<T>,
    width: usize,
    height: usize,
}

impl<T: Default> Grid2D<T> {
    /// Creates a `width` x `height` grid of default values.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AllocationFailed`] if the cells cannot be allocated.
    pub fn new(width: usize, height: usize) -> StoreResult<Self> {
        let cells = DynamicArray::with_len(cell_count(&[width, height])?)?;
        Ok(Self {
            cells,
            width,
            height,
        })
    }

    /// Resizes the grid, keeping the overlapping sub-rectangle.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AllocationFailed`] if the new cells cannot be
    /// allocated. The grid is unchanged in that case.
    pub fn resize(&mut self, width: usize, height: usize) -> StoreResult<()> {
        let mut cells: DynamicArray<T> = DynamicArray::with_len(cell_count(&[width, height])?)?;

        let keep_x = width.min(self.width);
        let keep_y = height.min(self.height);
        for y in 0..keep_y {
            for x in 0..keep_x {
                cells[y * width + x] = std::mem::take(&mut self.cells[y * self.width + x]);
            }
        }

        self.cells = cells;
        self.width = width;
        self.height = height;
        Ok(())
    }
}

impl<T> Grid2D<T> {
    /// Grid width in cells.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the grid has no cells.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns `true` if `(x, y)` lies inside the grid.
    #[inline]
    #[must_use]
    pub const fn is_valid_coord(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Flattened offset of `(x, y)`, or `None` outside the grid.
    #[inline]
    #[must_use]
    pub const fn index_of(&self, x: usize, y: usize) -> Option<usize> {
        if self.is_valid_coord(x, y) {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    /// Checked shared access.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CoordinateOutOfBounds`] outside the grid.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> StoreResult<&T> {
        let index = self.checked_index(x, y)?;
        Ok(&self.cells[index])
    }

    /// Checked mutable access.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CoordinateOutOfBounds`] outside the grid.
    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> StoreResult<&mut T> {
        let index = self.checked_index(x, y)?;
        Ok(&mut self.cells[index])
    }

    /// Overwrites the cell at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CoordinateOutOfBounds`] outside the grid.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) -> StoreResult<()> {
        *self.get_mut(x, y)? = value;
        Ok(())
    }

    /// All cells in row-major order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        self.cells.as_slice()
    }

    fn checked_index(&self, x: usize, y: usize) -> StoreResult<usize> {
        self.index_of(x, y).ok_or(StoreError::CoordinateOutOfBounds {
            x,
            y,
            z: 0,
            width: self.width,
            height: self.height,
            depth: 1,
        })
    }
}

impl<T: Clone> Grid2D<T> {
    /// Overwrites every cell with `value`.
    #[inline]
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }
}

/// A three-dimensional grid stored slab-major in one contiguous buffer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Grid3D<T> {
    cells: DynamicArray<T>,
    width: usize,
    height: usize,
    depth: usize,
}

impl<T: Default> Grid3D<T> {
    /// Creates a `width` x `height` x `depth` grid of default values.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AllocationFailed`] if the cells cannot be allocated.
    pub fn new(width: usize, height: usize, depth: usize) -> StoreResult<Self> {
        let cells = DynamicArray::with_len(cell_count(&[width, height, depth])?)?;
        Ok(Self {
            cells,
            width,
            height,
            depth,
        })
    }

    /// Resizes the grid, keeping the overlapping sub-box.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AllocationFailed`] if the new cells cannot be
    /// allocated. The grid is unchanged in that case.
    pub fn resize(&mut self, width: usize, height: usize, depth: usize) -> StoreResult<()> {
        let len = cell_count(&[width, height, depth])?;
        let mut cells: DynamicArray<T> = DynamicArray::with_len(len)?;

        let keep_x = width.min(self.width);
        let keep_y = height.min(self.height);
        let keep_z = depth.min(self.depth);
        for z in 0..keep_z {
            for y in 0..keep_y {
                for x in 0..keep_x {
                    let old = z * self.width * self.height + y * self.width + x;
                    let new = z * width * height + y * width + x;
                    cells[new] = std::mem::take(&mut self.cells[old]);
                }
            }
        }

        self.cells = cells;
        self.width = width;
        self.height = height;
        self.depth = depth;
        Ok(())
    }
}

impl<T> Grid3D<T> {
    /// Grid width in cells.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Grid depth in cells.
    #[inline]
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Total number of cells.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the grid has no cells.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns `true` if `(x, y, z)` lies inside the grid.
    #[inline]
    #[must_use]
    pub const fn is_valid_coord(&self, x: usize, y: usize, z: usize) -> bool {
        x < self.width && y < self.height && z < self.depth
    }

    /// Flattened offset of `(x, y, z)`, or `None` outside the grid.
    #[inline]
    #[must_use]
    pub const fn index_of(&self, x: usize, y: usize, z: usize) -> Option<usize> {
        if self.is_valid_coord(x, y, z) {
            Some(z * self.width * self.height + y * self.width + x)
        } else {
            None
        }
    }

    /// Checked shared access.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CoordinateOutOfBounds`] outside the grid.
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> StoreResult<&T> {
        let index = self.checked_index(x, y, z)?;
        Ok(&self.cells[index])
    }

    /// Checked mutable access.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CoordinateOutOfBounds`] outside the grid.
    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize, z: usize) -> StoreResult<&mut T> {
        let index = self.checked_index(x, y, z)?;
        Ok(&mut self.cells[index])
    }

    /// Overwrites the cell at `(x, y, z)`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CoordinateOutOfBounds`] outside the grid.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: T) -> StoreResult<()> {
        *self.get_mut(x, y, z)? = value;
        Ok(())
    }

    /// All cells in slab-major order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        self.cells.as_slice()
    }

    fn checked_index(&self, x: usize, y: usize, z: usize) -> StoreResult<usize> {
        self.index_of(x, y, z)
            .ok_or(StoreError::CoordinateOutOfBounds {
                x,
                y,
                z,
                width: self.width,
                height: self.height,
                depth: self.depth,
            })
    }
}

impl<T: Clone> Grid3D<T> {
    /// Overwrites every cell with `value`.
    #[inline]
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }
}
