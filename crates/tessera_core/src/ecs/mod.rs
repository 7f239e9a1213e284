//! # Entity Component System
//!
//! A sparse-set ECS: every component type lives in its own sparse set, and
//! queries intersect those sets on demand.
//!
//! ## Design Philosophy
//!
//! - Entities are plain ids; components hold all the data
//! - Component types are fixed at compile time, so routing is static
//! - Dense arrays stay packed for cache-friendly iteration
//! - Queries are driven by the smallest requested set
//! - Dense order is unstable: swap-removal reorders on every removal

mod command;
mod component;
mod entity;
mod query;
mod sparse_set;
mod world;

pub use command::CommandBuffer;
pub use component::{Component, ComponentSet};
pub use entity::{Entity, EntityAllocator};
pub use query::{Query, QueryView1, QueryView2, QueryView3, QueryView4, QueryView5, QueryView6};
pub use sparse_set::{DenseView, SparseSet};
pub use world::World;
