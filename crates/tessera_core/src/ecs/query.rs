//! # Queries
//!
//! N-ary intersection over sparse sets.
//!
//! ## Algorithm
//!
//! ```text
//! Query<(Transform, Physics, Player)>
//!
//!   Transform: 10,000 live   \
//!   Physics:    2,000 live    }-- driver = smallest set (Player)
//!   Player:         1 live   /
//!
//!   for entity in driver.dense:
//!       probe every other set; skip on first miss
//!       callback(entity, &mut t, &mut p, &mut pl)
//! ```
//!
//! Work is `O(min count)` probes. Visiting order is the driver's dense order,
//! which is not stable across mutations.
//!
//! One macro implements every arity from 1 to 6, so all arities share the
//! same driver selection and probe loop.

use crate::ecs::component::{Component, ComponentSet};
use crate::ecs::entity::Entity;
use crate::ecs::sparse_set::DenseView;
use crate::error::{StoreError, StoreResult};

/// A tuple of component types that can be queried on a set `S`.
///
/// `'w` is the lifetime of the world borrow the resulting view holds.
pub trait Query<'w, S: ComponentSet + 'w> {
    /// The matched view returned by [`World::query`](crate::ecs::World::query).
    type View;

    /// Borrows every requested set out of `set`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AliasedComponent`] if a type is named twice.
    fn fetch(set: &'w mut S) -> StoreResult<Self::View>;
}

macro_rules! impl_query {
    ($(#[$meta:meta])* $view:ident; $( $ty:ident => $var:ident / $idx:ident / $pos:literal ),+) => {
        $(#[$meta])*
        pub struct $view<'w, $($ty),+> {
            $( $var: DenseView<'w, $ty>, )+
        }

        impl<'w, S, $($ty),+> Query<'w, S> for ($($ty,)+)
        where
            S: ComponentSet + 'w,
            $( $ty: Component<S>, )+
        {
            type View = $view<'w, $($ty),+>;

            fn fetch(set: &'w mut S) -> StoreResult<Self::View> {
                let mut parts = set.split();
                $(
                    let $var = $ty::take(&mut parts).ok_or_else(|| {
                        tracing::warn!("Query: component {} named more than once", $ty::NAME);
                        StoreError::AliasedComponent { component: $ty::NAME }
                    })?;
                )+
                Ok($view {
                    $( $var: $var.dense_view(), )+
                })
            }
        }

        impl<'w, $($ty),+> $view<'w, $($ty),+> {
            /// Position of the smallest requested set; ties go to the first.
            fn driver_slot(&self) -> usize {
                let lens = [$( self.$var.len() ),+];
                let mut slot = 0;
                for (candidate, &len) in lens.iter().enumerate() {
                    if len < lens[slot] {
                        slot = candidate;
                    }
                }
                slot
            }

            /// Dense entity list of the smallest requested set.
            fn driver(&self) -> &'w [Entity] {
                let slot = self.driver_slot();
                $(
                    if slot == $pos {
                        return self.$var.entities();
                    }
                )+
                &[]
            }

            /// Size of the driver set: an upper bound on the number of matches.
            #[inline]
            #[must_use]
            pub fn driver_len(&self) -> usize {
                self.driver().len()
            }

            /// Returns `true` if `entity` has every requested component.
            #[inline]
            #[must_use]
            pub fn contains(&self, entity: Entity) -> bool {
                true $( && self.$var.index_of(entity).is_some() )+
            }

            /// Counts matching entities without touching component data.
            #[must_use]
            pub fn count(&self) -> usize {
                self.driver()
                    .iter()
                    .filter(|&&entity| self.contains(entity))
                    .count()
            }

            /// Collects matching entities in driver order.
            #[must_use]
            pub fn matching_entities(&self) -> Vec<Entity> {
                self.driver()
                    .iter()
                    .copied()
                    .filter(|&entity| self.contains(entity))
                    .collect()
            }

            /// Calls `callback` once for every entity holding all requested components.
            ///
            /// # Returns
            ///
            /// The number of callback invocations.
            pub fn for_each<Func>(&mut self, mut callback: Func) -> usize
            where
                Func: FnMut(Entity, $(&mut $ty),+),
            {
                let slot = self.driver_slot();
                let driver = self.driver();
                let mut visited = 0;

                for (dense, &entity) in driver.iter().enumerate() {
                    $(
                        let $idx = if slot == $pos {
                            dense
                        } else {
                            let Some(index) = self.$var.index_of(entity) else {
                                continue;
                            };
                            index
                        };
                    )+
                    callback(entity, $( self.$var.component_mut($idx) ),+);
                    visited += 1;
                }

                visited
            }
        }
    };
}

impl_query!(
    /// Matched view of a single-component query.
    QueryView1; A => a / ia / 0
);
impl_query!(
    /// Matched view of a two-component query.
    QueryView2; A => a / ia / 0, B => b / ib / 1
);
impl_query!(
    /// Matched view of a three-component query.
    QueryView3; A => a / ia / 0, B => b / ib / 1, C => c / ic / 2
);
impl_query!(
    /// Matched view of a four-component query.
    QueryView4; A => a / ia / 0, B => b / ib / 1, C => c / ic / 2, D => d / id / 3
);
impl_query!(
    /// Matched view of a five-component query.
    QueryView5; A => a / ia / 0, B => b / ib / 1, C => c / ic / 2, D => d / id / 3, E => e / ie / 4
);
impl_query!(
    /// Matched view of a six-component query.
    QueryView6; A => a / ia / 0, B => b / ib / 1, C => c / ic / 2, D => d / id / 3, E => e / ie / 4, F => f / i_f / 5
);
