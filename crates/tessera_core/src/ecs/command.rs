//! # Deferred Commands
//!
//! Structural changes recorded while a query holds the world, applied
//! afterwards with [`World::apply_commands`].

use crate::ecs::component::{Component, ComponentSet};
use crate::ecs::entity::Entity;
use crate::ecs::world::World;
use crate::error::StoreResult;

/// A recorded structural change.
pub(crate) type Command<S> = Box<dyn FnOnce(&mut World<S>) -> StoreResult<()>>;

/// Ordered list of deferred add / remove / destroy operations.
///
/// # Example
///
/// ```rust,ignore
/// let mut commands = CommandBuffer::new();
/// world.query::<(Player,)>()?.for_each(|entity, player| {
///     if player.health <= 0.0 {
///         commands.destroy(entity);
///     }
/// });
/// world.apply_commands(&mut commands)?;
/// ```
pub struct CommandBuffer<S: ComponentSet> {
    commands: Vec<Command<S>>,
}

impl<S: ComponentSet> Default for CommandBuffer<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ComponentSet> CommandBuffer<S> {
    /// Creates an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Number of recorded commands.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if nothing is recorded.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Records adding (or overwriting) a component.
    pub fn add<T: Component<S>>(&mut self, entity: Entity, value: T) {
        self.commands
            .push(Box::new(move |world: &mut World<S>| world.add(entity, value).map(drop)));
    }

    /// Records removing a component.
    pub fn remove<T: Component<S>>(&mut self, entity: Entity) {
        self.commands.push(Box::new(move |world: &mut World<S>| {
            world.remove::<T>(entity);
            Ok(())
        }));
    }

    /// Records destroying an entity.
    pub fn destroy(&mut self, entity: Entity) {
        self.commands.push(Box::new(move |world: &mut World<S>| {
            world.destroy_entity(entity);
            Ok(())
        }));
    }

    /// Discards every recorded command.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Takes the recorded commands in recording order.
    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, Command<S>> {
        self.commands.drain(..)
    }
}
