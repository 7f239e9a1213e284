//! # Game Components
//!
//! The built-in component types of a 2D platformer and the
//! [`GameComponents`] set that stores them.
//!
//! Components are plain data. Behavior lives in [`crate::systems`].

use crate::component_set;
use crate::ecs::{Entity, World};
use crate::math::Vec2;

/// Handle to a texture owned by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// 8-bit RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);

    /// Creates a color from channels.
    #[inline]
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Returns the channels scaled to `0.0..=1.0`.
    #[inline]
    #[must_use]
    pub fn to_normalized(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a].map(|channel| f32::from(channel) / 255.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Position, rotation and uniform scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// World position.
    pub position: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    /// Uniform scale factor.
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: 1.0,
        }
    }
}

/// Colored quad, optionally textured.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Sprite {
    /// Texture to sample, or `None` for a flat color.
    pub texture: Option<TextureId>,
    /// Tint color.
    pub color: Color,
    /// Width in pixels.
    pub width: u8,
    /// Height in pixels.
    pub height: u8,
}

/// Frame-based sprite sheet animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Animation {
    /// Sheet holding every frame.
    pub sprite_sheet: Option<TextureId>,
    /// Width of one frame in pixels.
    pub frame_width: u8,
    /// Height of one frame in pixels.
    pub frame_height: u8,
    /// Frame currently shown.
    pub current_frame: u8,
    /// Number of frames in the sheet.
    pub total_frames: u8,
    /// Seconds each frame is shown.
    pub frame_time: f32,
    /// Seconds accumulated on the current frame.
    pub timer: f32,
    /// Wrap to the first frame after the last one.
    pub looping: bool,
    /// Whether the animation advances.
    pub playing: bool,
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            sprite_sheet: None,
            frame_width: 0,
            frame_height: 0,
            current_frame: 0,
            total_frames: 0,
            frame_time: 0.1,
            timer: 0.0,
            looping: true,
            playing: true,
        }
    }
}

/// Rigid-body motion state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Physics {
    /// Pixels per second.
    pub velocity: Vec2,
    /// Pixels per second squared, applied on top of gravity.
    pub acceleration: Vec2,
    /// Multiplier on world gravity.
    pub gravity_scale: f32,
    /// Terminal downward speed.
    pub max_fall_speed: f32,
    /// Fraction of velocity lost per second.
    pub linear_damping: f32,
    /// Moved only by its velocity; ignores forces.
    pub is_kinematic: bool,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            gravity_scale: 1.0,
            max_fall_speed: 600.0,
            linear_damping: 0.0,
            is_kinematic: false,
        }
    }
}

/// Collision layer bits.
pub struct CollisionLayers;

impl CollisionLayers {
    /// Default layer.
    pub const DEFAULT: u16 = 1 << 0;
    /// Player characters.
    pub const PLAYER: u16 = 1 << 1;
    /// Enemies.
    pub const ENEMY: u16 = 1 << 2;
    /// Solid platforms.
    pub const PLATFORM: u16 = 1 << 3;
    /// Trigger volumes.
    pub const TRIGGER: u16 = 1 << 4;
    /// Every layer.
    pub const ALL: u16 = 0xFFFF;
}

/// Axis-aligned collision box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collider {
    /// Box size.
    pub size: Vec2,
    /// Offset from the transform position.
    pub offset: Vec2,
    /// Layer bits this collider occupies.
    pub layer: u16,
    /// Layer bits this collider reacts to.
    pub collides_with: u16,
    /// Reports overlaps without blocking.
    pub is_trigger: bool,
    /// Never moved by collision response.
    pub is_static: bool,
}

impl Collider {
    /// Returns `true` if this collider reacts to `other`'s layer.
    #[inline]
    #[must_use]
    pub const fn can_collide_with(&self, other: &Self) -> bool {
        self.collides_with & other.layer != 0
    }
}

impl Default for Collider {
    fn default() -> Self {
        Self {
            size: Vec2::ZERO,
            offset: Vec2::ZERO,
            layer: CollisionLayers::DEFAULT,
            collides_with: CollisionLayers::ALL,
            is_trigger: false,
            is_static: false,
        }
    }
}

/// Contacts found by the last collision pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionState {
    /// Standing on something.
    pub is_grounded: bool,
    /// Head against something.
    pub is_touching_ceiling: bool,
    /// Left side against a wall.
    pub is_touching_wall_left: bool,
    /// Right side against a wall.
    pub is_touching_wall_right: bool,
    /// Entity stood on, or [`Entity::NULL`].
    pub ground_entity: Entity,
    /// Surface normal of the ground.
    pub ground_normal: Vec2,
    /// Seconds since last grounded.
    pub time_since_grounded: f32,
    /// Seconds since last touching a wall.
    pub time_since_wall_touch: f32,
}

impl CollisionState {
    /// Resets the contact flags before a new collision pass.
    ///
    /// The timers are left alone.
    pub fn clear(&mut self) {
        self.is_grounded = false;
        self.is_touching_ceiling = false;
        self.is_touching_wall_left = false;
        self.is_touching_wall_right = false;
        self.ground_entity = Entity::NULL;
        self.ground_normal = Vec2::UP;
    }
}

impl Default for CollisionState {
    fn default() -> Self {
        Self {
            is_grounded: false,
            is_touching_ceiling: false,
            is_touching_wall_left: false,
            is_touching_wall_right: false,
            ground_entity: Entity::NULL,
            ground_normal: Vec2::UP,
            time_since_grounded: 0.0,
            time_since_wall_touch: 0.0,
        }
    }
}

/// Player-controlled character stats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    /// Hit points.
    pub health: f32,
    /// Run speed in pixels per second.
    pub speed: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            health: 100.0,
            speed: 200.0,
        }
    }
}

component_set! {
    /// Sparse sets for every built-in component type.
    #[derive(Clone, Debug)]
    pub struct GameComponents {
        transforms: Transform,
        sprites: Sprite,
        animations: Animation,
        physics: Physics,
        colliders: Collider,
        collision_states: CollisionState,
        players: Player,
    }
    /// Disjoint borrows of [`GameComponents`], used by queries.
    pub struct GameComponentsParts;
}

/// World over the built-in components.
pub type GameWorld = World<GameComponents>;
