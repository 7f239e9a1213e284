//! # Tessera Core
//!
//! Sparse-set Entity Component System for 2D games:
//! - O(1) add / remove / lookup per component type
//! - Packed dense arrays for cache-friendly iteration
//! - N-ary queries driven by the smallest component set
//!
//! ## Architecture Rules
//!
//! 1. **Static component routing** - The component types are declared once with
//!    [`component_set!`]; no type-id maps, no dynamic dispatch
//! 2. **Fail explicitly** - Allocation failure and bad ids are `Result`s, never aborts
//! 3. **No structural change during a query** - Enforced by the borrow checker;
//!    use a [`CommandBuffer`] for deferred changes
//!
//! ## Example
//!
//! ```rust,ignore
//! use tessera_core::{GameWorld, Physics, Transform, WorldConfig};
//!
//! let mut world = GameWorld::new(WorldConfig::default())?;
//! let entity = world.create_entity();
//! world.add(entity, Transform::default())?;
//! world.add(entity, Physics::default())?;
//!
//! world.query::<(Transform, Physics)>()?.for_each(|_, transform, physics| {
//!     transform.position += physics.velocity * dt;
//! });
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod components;
pub mod config;
pub mod ecs;
pub mod error;
pub mod math;
pub mod memory;
pub mod sync;
pub mod systems;

pub use components::{
    Animation, Collider, CollisionLayers, CollisionState, Color, GameComponents, GameWorld,
    Physics, Player, Sprite, TextureId, Transform,
};
pub use config::WorldConfig;
pub use ecs::{
    CommandBuffer, Component, ComponentSet, DenseView, Entity, EntityAllocator, Query,
    SparseSet, World,
};
pub use error::{StoreError, StoreResult};
pub use math::Vec2;
pub use memory::{DynamicArray, Grid2D, Grid3D};
pub use sync::{FrameExchange, FrameGuard};
pub use systems::InstanceBuffers;
