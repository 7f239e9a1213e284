//! # Memory Primitives
//!
//! Owning, contiguous buffers that every store layer is built on.
//!
//! ## Design Philosophy
//!
//! - Growth is amortized and reallocation moves elements, never copies
//! - Allocation failure is a reported error, not an abort
//! - Shrinking and clearing never release capacity

mod dynamic_array;
mod grid;

pub use dynamic_array::{grown_capacity, DynamicArray};
pub use grid::{Grid2D, Grid3D};
