//! # World Configuration
//!
//! Sizes the store is created with, loadable from TOML:
//!
//! ```toml
//! max_entities = 10000
//! initial_dense_capacity = 64
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Store sizing, fixed for the lifetime of a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Exclusive upper bound on entity ids; also the size of every sparse table.
    pub max_entities: u32,
    /// Dense capacity allocated by a sparse set's first growth.
    pub initial_dense_capacity: usize,
}

impl WorldConfig {
    /// Default entity ceiling.
    pub const DEFAULT_MAX_ENTITIES: u32 = 10_000;
    /// Default first dense allocation.
    pub const DEFAULT_INITIAL_DENSE_CAPACITY: usize = 64;

    /// Parses and validates a TOML document.
    ///
    /// Missing keys take their default values.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidConfig`] on parse or validation failure.
    pub fn from_toml_str(text: &str) -> StoreResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|err| StoreError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Io`] if the file cannot be read
    /// - [`StoreError::InvalidConfig`] on parse or validation failure
    pub fn from_toml_file(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!("WorldConfig: loaded {}", path.display());
        Ok(config)
    }

    /// Serializes to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidConfig`] if serialization fails.
    pub fn to_toml_string(&self) -> StoreResult<String> {
        toml::to_string(self).map_err(|err| StoreError::InvalidConfig(err.to_string()))
    }

    /// Checks the values can back a usable world.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidConfig`] if `max_entities < 2` (only the
    /// null id would exist) or `initial_dense_capacity` is zero.
    pub fn validate(&self) -> StoreResult<()> {
        if self.max_entities < 2 {
            return Err(StoreError::InvalidConfig(format!(
                "max_entities must be at least 2, got {}",
                self.max_entities
            )));
        }
        if self.initial_dense_capacity == 0 {
            return Err(StoreError::InvalidConfig(
                "initial_dense_capacity must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            max_entities: Self::DEFAULT_MAX_ENTITIES,
            initial_dense_capacity: Self::DEFAULT_INITIAL_DENSE_CAPACITY,
        }
    }
}
