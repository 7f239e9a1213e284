//! # Systems
//!
//! Per-frame passes over the built-in components. Each system is one query;
//! none of them changes which components an entity has.
//!
//! ```text
//! integrate_physics      {Transform, Physics}
//! advance_animations     {Animation}
//! tick_collision_timers  {CollisionState}
//! extract_instances      {Transform, Sprite} -> InstanceBuffers
//! ```

use crate::components::{Animation, CollisionState, Physics, Sprite, Transform};
use crate::ecs::{Component, ComponentSet, World};
use crate::error::{StoreError, StoreResult};
use crate::math::Vec2;
use crate::memory::DynamicArray;

/// Default downward gravity in pixels per second squared.
pub const DEFAULT_GRAVITY: Vec2 = Vec2::new(0.0, 980.0);

/// Integrates velocity and position for every {Transform, Physics} entity.
///
/// Kinematic bodies move by their velocity only. Dynamic bodies first apply
/// acceleration and scaled gravity, clamp their fall speed, then damping.
///
/// # Returns
///
/// The number of bodies updated.
///
/// # Errors
///
/// Propagates query construction errors.
pub fn integrate_physics<S>(world: &mut World<S>, dt: f32, gravity: Vec2) -> StoreResult<usize>
where
    S: ComponentSet,
    Transform: Component<S>,
    Physics: Component<S>,
{
    let updated = world
        .query::<(Transform, Physics)>()?
        .for_each(|_, transform, physics| {
            if !physics.is_kinematic {
                physics.velocity += (physics.acceleration + gravity * physics.gravity_scale) * dt;
                physics.velocity.y = physics.velocity.y.min(physics.max_fall_speed);
                if physics.linear_damping > 0.0 {
                    physics.velocity *= (1.0 - physics.linear_damping * dt).max(0.0);
                }
            }
            transform.position += physics.velocity * dt;
        });
    Ok(updated)
}

/// Steps every playing animation by `dt` seconds.
///
/// Looping animations wrap to frame 0; others stop on their last frame.
///
/// # Errors
///
/// Propagates query construction errors.
pub fn advance_animations<S>(world: &mut World<S>, dt: f32) -> StoreResult<usize>
where
    S: ComponentSet,
    Animation: Component<S>,
{
    let visited = world
        .query::<(Animation,)>()?
        .for_each(|_, animation| step_animation(animation, dt));
    Ok(visited)
}

fn step_animation(animation: &mut Animation, dt: f32) {
    if !animation.playing || animation.total_frames == 0 || animation.frame_time <= 0.0 {
        return;
    }

    animation.timer += dt;
    while animation.timer >= animation.frame_time {
        animation.timer -= animation.frame_time;

        if u16::from(animation.current_frame) + 1 < u16::from(animation.total_frames) {
            animation.current_frame += 1;
        } else if animation.looping {
            animation.current_frame = 0;
        } else {
            animation.playing = false;
            animation.timer = 0.0;
            break;
        }
    }
}

/// Advances the contact timers of every [`CollisionState`].
///
/// A timer resets while its contact holds and grows otherwise.
///
/// # Errors
///
/// Propagates query construction errors.
pub fn tick_collision_timers<S>(world: &mut World<S>, dt: f32) -> StoreResult<usize>
where
    S: ComponentSet,
    CollisionState: Component<S>,
{
    let visited = world.query::<(CollisionState,)>()?.for_each(|_, state| {
        if state.is_grounded {
            state.time_since_grounded = 0.0;
        } else {
            state.time_since_grounded += dt;
        }

        if state.is_touching_wall_left || state.is_touching_wall_right {
            state.time_since_wall_touch = 0.0;
        } else {
            state.time_since_wall_touch += dt;
        }
    });
    Ok(visited)
}

/// Flat per-instance render data: one entry per drawn sprite.
///
/// All three arrays are `Pod` and always the same length, so each can be
/// uploaded as a single byte slice.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InstanceBuffers {
    positions: DynamicArray<Vec2>,
    scales: DynamicArray<Vec2>,
    colors: DynamicArray<[f32; 4]>,
}

impl InstanceBuffers {
    /// Creates empty buffers.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            positions: DynamicArray::new(),
            scales: DynamicArray::new(),
            colors: DynamicArray::new(),
        }
    }

    /// Number of instances.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if there are no instances.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Removes every instance, keeping capacity.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.scales.clear();
        self.colors.clear();
    }

    /// Ensures room for `total` instances.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AllocationFailed`] if any buffer cannot grow.
    pub fn reserve(&mut self, total: usize) -> StoreResult<()> {
        self.positions.reserve(total)?;
        self.scales.reserve(total)?;
        self.colors.reserve(total)
    }

    /// Appends one instance.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AllocationFailed`] if a buffer cannot grow; the
    /// buffers are left unchanged.
    pub fn push(&mut self, position: Vec2, scale: Vec2, color: [f32; 4]) -> StoreResult<()> {
        self.positions.push(position)?;
        if let Err(err) = self.scales.push(scale) {
            self.positions.pop();
            return Err(err);
        }
        if let Err(err) = self.colors.push(color) {
            self.positions.pop();
            self.scales.pop();
            return Err(err);
        }
        Ok(())
    }

    /// Instance positions.
    #[inline]
    #[must_use]
    pub fn positions(&self) -> &[Vec2] {
        self.positions.as_slice()
    }

    /// Instance scales (sprite size times transform scale).
    #[inline]
    #[must_use]
    pub fn scales(&self) -> &[Vec2] {
        self.scales.as_slice()
    }

    /// Instance colors, normalized RGBA.
    #[inline]
    #[must_use]
    pub fn colors(&self) -> &[[f32; 4]] {
        self.colors.as_slice()
    }

    /// Raw bytes of the three buffers, in upload order.
    #[must_use]
    pub fn as_bytes(&self) -> [&[u8]; 3] {
        [
            self.positions.as_bytes(),
            self.scales.as_bytes(),
            self.colors.as_bytes(),
        ]
    }
}

/// Flattens every {Transform, Sprite} entity into `out`.
///
/// `out` is cleared first. Instances appear in the store's current dense
/// order, which is not stable between frames.
///
/// # Returns
///
/// The number of instances written.
///
/// # Errors
///
/// Returns [`StoreError::AllocationFailed`] if the buffers cannot grow.
pub fn extract_instances<S>(world: &mut World<S>, out: &mut InstanceBuffers) -> StoreResult<usize>
where
    S: ComponentSet,
    Transform: Component<S>,
    Sprite: Component<S>,
{
    out.clear();
    let mut view = world.query::<(Transform, Sprite)>()?;
    out.reserve(view.driver_len())?;

    let mut failure: Option<StoreError> = None;
    view.for_each(|_, transform, sprite| {
        if failure.is_some() {
            return;
        }
        let scale = Vec2::new(f32::from(sprite.width), f32::from(sprite.height)) * transform.scale;
        if let Err(err) = out.push(transform.position, scale, sprite.color.to_normalized()) {
            failure = Some(err);
        }
    });

    match failure {
        Some(err) => Err(err),
        None => Ok(out.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Color, GameWorld, Player};
    use crate::config::WorldConfig;

    fn world() -> GameWorld {
        GameWorld::new(WorldConfig::default()).unwrap()
    }

    #[test]
    fn test_dynamic_body_falls_and_clamps() {
        let mut world = world();
        let body = world.create_entity();
        world.add(body, Transform::default()).unwrap();
        world
            .add(
                body,
                Physics {
                    max_fall_speed: 100.0,
                    ..Physics::default()
                },
            )
            .unwrap();

        assert_eq!(integrate_physics(&mut world, 1.0, Vec2::new(0.0, 500.0)), Ok(1));

        let physics = world.get::<Physics>(body).unwrap();
        assert_eq!(physics.velocity, Vec2::new(0.0, 100.0));
        assert_eq!(world.get::<Transform>(body).unwrap().position, Vec2::new(0.0, 100.0));
    }

    #[test]
    fn test_kinematic_body_ignores_gravity() {
        let mut world = world();
        let body = world.create_entity();
        world.add(body, Transform::default()).unwrap();
        world
            .add(
                body,
                Physics {
                    velocity: Vec2::new(10.0, 0.0),
                    is_kinematic: true,
                    ..Physics::default()
                },
            )
            .unwrap();

        integrate_physics(&mut world, 0.5, DEFAULT_GRAVITY).unwrap();

        assert_eq!(world.get::<Physics>(body).unwrap().velocity, Vec2::new(10.0, 0.0));
        assert_eq!(world.get::<Transform>(body).unwrap().position, Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_damping_slows_body() {
        let mut world = world();
        let body = world.create_entity();
        world.add(body, Transform::default()).unwrap();
        world
            .add(
                body,
                Physics {
                    velocity: Vec2::new(100.0, 0.0),
                    linear_damping: 0.5,
                    gravity_scale: 0.0,
                    ..Physics::default()
                },
            )
            .unwrap();

        integrate_physics(&mut world, 1.0, DEFAULT_GRAVITY).unwrap();
        assert_eq!(world.get::<Physics>(body).unwrap().velocity, Vec2::new(50.0, 0.0));
    }

    #[test]
    fn test_animation_loops_and_stops() {
        let mut looping = Animation {
            total_frames: 3,
            current_frame: 2,
            ..Animation::default()
        };
        step_animation(&mut looping, 0.1);
        assert_eq!(looping.current_frame, 0);
        assert!(looping.playing);

        let mut once = Animation {
            total_frames: 3,
            current_frame: 2,
            looping: false,
            ..Animation::default()
        };
        step_animation(&mut once, 0.25);
        assert_eq!(once.current_frame, 2);
        assert!(!once.playing);
    }

    #[test]
    fn test_animation_frame_past_end() {
        let mut looping = Animation {
            total_frames: 200,
            current_frame: 255,
            ..Animation::default()
        };
        step_animation(&mut looping, 0.1);
        assert_eq!(looping.current_frame, 0);
        assert!(looping.playing);

        let mut once = Animation {
            total_frames: 255,
            current_frame: 255,
            looping: false,
            ..Animation::default()
        };
        step_animation(&mut once, 0.1);
        assert_eq!(once.current_frame, 255);
        assert!(!once.playing);
    }

    #[test]
    fn test_animation_through_world() {
        let mut world = world();
        let entity = world.create_entity();
        world
            .add(
                entity,
                Animation {
                    total_frames: 4,
                    frame_time: 0.5,
                    ..Animation::default()
                },
            )
            .unwrap();

        assert_eq!(advance_animations(&mut world, 1.25), Ok(1));
        let animation = world.get::<Animation>(entity).unwrap();
        assert_eq!(animation.current_frame, 2);
        assert!((animation.timer - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_collision_timers() {
        let mut world = world();
        let grounded = world.create_entity();
        let airborne = world.create_entity();
        world
            .add(
                grounded,
                CollisionState {
                    is_grounded: true,
                    time_since_grounded: 3.0,
                    ..CollisionState::default()
                },
            )
            .unwrap();
        world.add(airborne, CollisionState::default()).unwrap();

        assert_eq!(tick_collision_timers(&mut world, 0.5), Ok(2));
        assert_eq!(world.get::<CollisionState>(grounded).unwrap().time_since_grounded, 0.0);
        let airborne = world.get::<CollisionState>(airborne).unwrap();
        assert_eq!(airborne.time_since_grounded, 0.5);
        assert_eq!(airborne.time_since_wall_touch, 0.5);
    }

    #[test]
    fn test_extract_instances() {
        let mut world = world();
        let drawn = world.create_entity();
        let hidden = world.create_entity();
        world
            .add(
                drawn,
                Transform {
                    position: Vec2::new(4.0, 8.0),
                    scale: 2.0,
                    ..Transform::default()
                },
            )
            .unwrap();
        world
            .add(
                drawn,
                Sprite {
                    color: Color::rgba(255, 0, 0, 255),
                    width: 16,
                    height: 8,
                    ..Sprite::default()
                },
            )
            .unwrap();
        world.add(hidden, Transform::default()).unwrap();
        world.add(hidden, Player::default()).unwrap();

        let mut buffers = InstanceBuffers::new();
        assert_eq!(extract_instances(&mut world, &mut buffers), Ok(1));
        assert_eq!(buffers.positions(), &[Vec2::new(4.0, 8.0)]);
        assert_eq!(buffers.scales(), &[Vec2::new(32.0, 16.0)]);
        assert_eq!(buffers.colors(), &[[1.0, 0.0, 0.0, 1.0]]);

        let [positions, scales, colors] = buffers.as_bytes();
        assert_eq!(positions.len(), 8);
        assert_eq!(scales.len(), 8);
        assert_eq!(colors.len(), 16);

        // Extraction replaces the previous frame.
        world.remove::<Sprite>(drawn);
        assert_eq!(extract_instances(&mut world, &mut buffers), Ok(0));
        assert!(buffers.is_empty());
    }
}
