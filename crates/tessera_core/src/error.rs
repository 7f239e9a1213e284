//! # Store Error Types
//!
//! All recoverable failures of the array primitives, the sparse sets and the
//! world registry. Failures are reported to the immediate caller and never
//! cross a query callback.

use thiserror::Error;

/// Errors that can occur in the entity component store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Checked access past the logical length of an array.
    #[error("index {index} out of bounds (len {len})")]
    OutOfBounds {
        /// The offending index.
        index: usize,
        /// The logical length at the time of access.
        len: usize,
    },

    /// Checked access outside the extent of a 2D or 3D grid.
    #[error("coordinate ({x}, {y}, {z}) outside {width}x{height}x{depth} grid")]
    CoordinateOutOfBounds {
        /// X coordinate.
        x: usize,
        /// Y coordinate.
        y: usize,
        /// Z coordinate (0 for 2D grids).
        z: usize,
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
        /// Grid depth (1 for 2D grids).
        depth: usize,
    },

    /// Growth could not obtain memory. The container is left unchanged.
    #[error("allocation of {requested} elements failed")]
    AllocationFailed {
        /// Total element capacity that was requested.
        requested: usize,
    },

    /// The null entity, or an id beyond the configured maximum.
    #[error("invalid entity {entity} (max entities {max_entities})")]
    InvalidEntity {
        /// Raw id of the rejected entity.
        entity: u32,
        /// Size of the sparse lookup tables.
        max_entities: u32,
    },

    /// The entity allocator has handed out every id it can.
    #[error("entity capacity exhausted ({max_entities} ids)")]
    CapacityExhausted {
        /// Size of the id space.
        max_entities: u32,
    },

    /// A query named the same component type more than once.
    #[error("component {component} requested more than once in a single query")]
    AliasedComponent {
        /// Name of the duplicated component type.
        component: &'static str,
    },

    /// Invalid configuration value or unparsable configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Raw buffer dump or load failed.
    #[error("i/o failure: {0}")]
    Io(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
