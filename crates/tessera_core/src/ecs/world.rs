//! # ECS World
//!
//! The entity registry: one sparse set per component type plus the entity
//! allocator. Typed operations are routed to the right set at compile time.

use crate::config::WorldConfig;
use crate::ecs::command::CommandBuffer;
use crate::ecs::component::{Component, ComponentSet};
use crate::ecs::entity::{Entity, EntityAllocator};
use crate::ecs::query::Query;
use crate::ecs::sparse_set::SparseSet;
use crate::error::StoreResult;

/// The ECS World - container for all entities and components.
///
/// `S` fixes the component types the world can store; declare it with
/// [`component_set!`](crate::component_set).
///
/// # Structural changes
///
/// [`query`](Self::query) borrows the world mutably for as long as the view
/// lives, so components cannot be added or removed mid-iteration. Record such
/// changes in a [`CommandBuffer`] and apply them after the query.
///
/// # Example
///
/// ```rust,ignore
/// let mut world = GameWorld::new(WorldConfig::default())?;
///
/// let player = world.create_entity();
/// world.add(player, Transform::default())?;
/// world.add(player, Physics::default())?;
///
/// world.query::<(Transform, Physics)>()?.for_each(|_, transform, physics| {
///     transform.position += physics.velocity * dt;
/// });
/// ```
pub struct World<S: ComponentSet> {
    /// One sparse set per component type.
    components: S,
    /// Hands out entity ids.
    allocator: EntityAllocator,
    /// Sizes every sparse set was created with.
    config: WorldConfig,
}

impl<S: ComponentSet> World<S> {
    /// Creates a world, allocating every sparse table up front.
    ///
    /// # Arguments
    ///
    /// * `config` - Entity ceiling and initial dense capacity
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidConfig`](crate::StoreError::InvalidConfig) if the config fails validation
    /// - [`StoreError::AllocationFailed`](crate::StoreError::AllocationFailed) if a sparse table cannot be allocated
    pub fn new(config: WorldConfig) -> StoreResult<Self> {
        config.validate()?;
        let components = S::from_config(&config)?;

        tracing::debug!(
            "World: created with {} component types, {} max entities",
            S::type_count(),
            config.max_entities
        );

        Ok(Self {
            components,
            allocator: EntityAllocator::new(config.max_entities),
            config,
        })
    }

    /// Returns the configuration the world was created with.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Returns the exclusive upper bound on entity ids.
    #[inline]
    #[must_use]
    pub const fn max_entities(&self) -> u32 {
        self.config.max_entities
    }

    /// Returns how many entities have ever been created.
    #[inline]
    #[must_use]
    pub const fn entities_created(&self) -> u32 {
        self.allocator.allocated_count()
    }

    /// Creates a new entity.
    ///
    /// # Returns
    ///
    /// The new entity, or [`Entity::NULL`] once the id space is exhausted.
    #[inline]
    pub fn create_entity(&mut self) -> Entity {
        self.allocator.allocate()
    }

    /// Creates a new entity.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CapacityExhausted`](crate::StoreError::CapacityExhausted)
    /// once the id space is exhausted.
    #[inline]
    pub fn try_create_entity(&mut self) -> StoreResult<Entity> {
        self.allocator.try_allocate()
    }

    /// Removes every component of `entity`.
    ///
    /// The id is not recycled.
    ///
    /// # Returns
    ///
    /// How many components were removed.
    pub fn destroy_entity(&mut self, entity: Entity) -> usize {
        let removed = self.components.remove_all(entity);
        tracing::debug!("World: destroyed {entity} ({removed} components)");
        removed
    }

    /// Adds or overwrites a component.
    ///
    /// # Returns
    ///
    /// The previous value, if the entity already had a `T`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidEntity`](crate::StoreError::InvalidEntity) for the null entity or an id past the ceiling
    /// - [`StoreError::AllocationFailed`](crate::StoreError::AllocationFailed) if the dense arrays cannot grow
    #[inline]
    pub fn add<T: Component<S>>(&mut self, entity: Entity, value: T) -> StoreResult<Option<T>> {
        T::storage_mut(&mut self.components).add(entity, value)
    }

    /// Removes a component, returning it if present.
    #[inline]
    pub fn remove<T: Component<S>>(&mut self, entity: Entity) -> Option<T> {
        T::storage_mut(&mut self.components).remove(entity)
    }

    /// Returns a component.
    #[inline]
    #[must_use]
    pub fn get<T: Component<S>>(&self, entity: Entity) -> Option<&T> {
        T::storage(&self.components).get(entity)
    }

    /// Returns a component mutably.
    #[inline]
    pub fn get_mut<T: Component<S>>(&mut self, entity: Entity) -> Option<&mut T> {
        T::storage_mut(&mut self.components).get_mut(entity)
    }

    /// Returns `true` if `entity` has a `T`.
    #[inline]
    #[must_use]
    pub fn has<T: Component<S>>(&self, entity: Entity) -> bool {
        T::storage(&self.components).has(entity)
    }

    /// Returns the sparse set storing `T`, for read-only dense iteration.
    #[inline]
    #[must_use]
    pub fn storage<T: Component<S>>(&self) -> &SparseSet<T> {
        T::storage(&self.components)
    }

    /// Returns how many entities have a `T`.
    #[inline]
    #[must_use]
    pub fn count<T: Component<S>>(&self) -> usize {
        T::storage(&self.components).len()
    }

    /// Starts a query over the component tuple `Q`.
    ///
    /// ```rust,ignore
    /// world.query::<(Transform, Physics)>()?.for_each(|entity, transform, physics| {
    ///     // ...
    /// });
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AliasedComponent`](crate::StoreError::AliasedComponent)
    /// if `Q` names a component type twice.
    #[inline]
    pub fn query<'w, Q: Query<'w, S>>(&'w mut self) -> StoreResult<Q::View> {
        Q::fetch(&mut self.components)
    }

    /// Removes every component from every entity. Capacity is kept and ids
    /// are not recycled.
    pub fn clear(&mut self) {
        self.components.clear_all();
        tracing::debug!("World: cleared all component sets");
    }

    /// Applies and drains recorded commands in recording order.
    ///
    /// A failing command does not stop the rest.
    ///
    /// # Returns
    ///
    /// The number of commands that succeeded.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered, after every command has run.
    pub fn apply_commands(&mut self, commands: &mut CommandBuffer<S>) -> StoreResult<usize> {
        let mut applied = 0;
        let mut first_error = None;

        for command in commands.drain() {
            match command(self) {
                Ok(()) => applied += 1,
                Err(err) => {
                    tracing::warn!("World: deferred command failed: {err}");
                    first_error.get_or_insert(err);
                }
            }
        }

        tracing::debug!("World: applied {applied} deferred commands");
        first_error.map_or(Ok(applied), Err)
    }
}
