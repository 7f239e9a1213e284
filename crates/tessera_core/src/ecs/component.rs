//! # Component Sets
//!
//! A world stores one [`SparseSet`] per component type. The set of types is
//! fixed at compile time by a struct with one field per type, declared with
//! [`component_set!`](crate::component_set). Every lookup is resolved
//! statically: there is no type-id map and no dynamic dispatch.
//!
//! ```rust,ignore
//! component_set! {
//!     /// Storage for the demo game.
//!     pub struct DemoComponents {
//!         healths: Health,
//!         positions: Position,
//!     }
//!     /// Disjoint borrows of `DemoComponents`.
//!     pub struct DemoParts;
//! }
//! ```

use crate::config::WorldConfig;
use crate::ecs::entity::Entity;
use crate::ecs::sparse_set::SparseSet;
use crate::error::StoreResult;

/// A fixed collection of sparse sets, one per component type.
///
/// Implemented by [`component_set!`](crate::component_set); implementing it
/// by hand is possible but rarely useful.
pub trait ComponentSet: Sized {
    /// One `Option<&mut SparseSet<T>>` per component type.
    ///
    /// Each slot can be taken exactly once, which is how queries obtain
    /// several mutable sets at once and detect duplicated types.
    type Parts<'a>
    where
        Self: 'a;

    /// Allocates every sparse set with the configured sizes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AllocationFailed`](crate::StoreError::AllocationFailed)
    /// if any sparse table cannot be allocated.
    fn from_config(config: &WorldConfig) -> StoreResult<Self>;

    /// Removes `entity` from every set.
    ///
    /// # Returns
    ///
    /// How many components were removed.
    fn remove_all(&mut self, entity: Entity) -> usize;

    /// Clears every set, keeping capacity.
    fn clear_all(&mut self);

    /// Number of component types in the set.
    fn type_count() -> usize;

    /// Splits into disjoint mutable borrows of every set.
    fn split(&mut self) -> Self::Parts<'_>;
}

/// A type stored in the component set `S`.
///
/// Components carry no behavior and need no marker derive; the
/// [`component_set!`](crate::component_set) declaration is what makes a type
/// a component.
pub trait Component<S: ComponentSet>: Sized + 'static {
    /// Type name used in diagnostics.
    const NAME: &'static str;

    /// Returns the set storing this type.
    fn storage(set: &S) -> &SparseSet<Self>;

    /// Returns the set storing this type mutably.
    fn storage_mut(set: &mut S) -> &mut SparseSet<Self>;

    /// Takes this type's slot out of `parts`.
    ///
    /// Returns `None` if the slot was already taken.
    fn take<'a>(parts: &mut S::Parts<'a>) -> Option<&'a mut SparseSet<Self>>
    where
        S: 'a;
}

/// Declares a [`ComponentSet`] and implements [`Component`] for each type.
///
/// The first struct holds one sparse set per field; the second names the
/// generated [`ComponentSet::Parts`] type. Each component type may appear
/// only once.
///
/// ```rust,ignore
/// component_set! {
///     #[derive(Debug)]
///     pub struct Components {
///         positions: Position,
///         velocities: Velocity,
///     }
///     pub struct ComponentsParts;
/// }
/// ```
#[macro_export]
macro_rules! component_set {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$field_meta:meta])* $field:ident : $ty:ty ),+ $(,)?
        }
        $(#[$parts_meta:meta])*
        $parts_vis:vis struct $parts:ident;
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $(#[$field_meta])* $field: $crate::ecs::SparseSet<$ty>, )+
        }

        $(#[$parts_meta])*
        $parts_vis struct $parts<'a> {
            $( $field: ::core::option::Option<&'a mut $crate::ecs::SparseSet<$ty>>, )+
        }

        impl $crate::ecs::ComponentSet for $name {
            type Parts<'a> = $parts<'a> where Self: 'a;

            fn from_config(config: &$crate::config::WorldConfig) -> $crate::error::StoreResult<Self> {
                Ok(Self {
                    $(
                        $field: $crate::ecs::SparseSet::new(
                            config.max_entities,
                            config.initial_dense_capacity,
                        )?,
                    )+
                })
            }

            fn remove_all(&mut self, entity: $crate::ecs::Entity) -> usize {
                let mut removed = 0;
                $( removed += usize::from(self.$field.remove(entity).is_some()); )+
                removed
            }

            fn clear_all(&mut self) {
                $( self.$field.clear(); )+
            }

            fn type_count() -> usize {
                [$( stringify!($field) ),+].len()
            }

            fn split(&mut self) -> Self::Parts<'_> {
                $parts {
                    $( $field: ::core::option::Option::Some(&mut self.$field), )+
                }
            }
        }

        $(
            impl $crate::ecs::Component<$name> for $ty {
                const NAME: &'static str = stringify!($ty);

                #[inline]
                fn storage(set: &$name) -> &$crate::ecs::SparseSet<Self> {
                    &set.$field
                }

                #[inline]
                fn storage_mut(set: &mut $name) -> &mut $crate::ecs::SparseSet<Self> {
                    &mut set.$field
                }

                #[inline]
                fn take<'a>(
                    parts: &mut <$name as $crate::ecs::ComponentSet>::Parts<'a>,
                ) -> ::core::option::Option<&'a mut $crate::ecs::SparseSet<Self>>
                where
                    $name: 'a,
                {
                    parts.$field.take()
                }
            }
        )+
    };
}
