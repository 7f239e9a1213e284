//! # World Scenario Tests
//!
//! End-to-end frames through the public API:
//!
//! 1. **Store scenarios**: intersection, removal, growth boundary, destroy
//! 2. **Frame loop**: simulate, extract, publish to a render thread
//! 3. **Configuration**: worlds sized from TOML
//!
//! Run with: cargo test --package tessera_core --test world_scenarios

use tessera_core::systems::{self, DEFAULT_GRAVITY};
use tessera_core::{
    Animation, Collider, CollisionState, CommandBuffer, Entity, FrameExchange, GameWorld,
    InstanceBuffers, Physics, Player, Sprite, Transform, Vec2, WorldConfig,
};

fn world() -> GameWorld {
    GameWorld::new(WorldConfig::default()).unwrap()
}

// ============================================================================
// STORE SCENARIOS
// ============================================================================

#[test]
fn test_transform_physics_intersection() {
    let mut world = world();
    for raw in 1..=5 {
        let entity = world.create_entity();
        assert_eq!(entity.to_raw(), raw);
        world.add(entity, Transform::default()).unwrap();
    }
    world.add(Entity::from_raw(2), Physics::default()).unwrap();
    world.add(Entity::from_raw(4), Physics::default()).unwrap();

    let mut seen = Vec::new();
    let visited = world
        .query::<(Transform, Physics)>()
        .unwrap()
        .for_each(|entity, _, _| seen.push(entity.to_raw()));

    seen.sort_unstable();
    assert_eq!(visited, 2);
    assert_eq!(seen, vec![2, 4]);
}

#[test]
fn test_remove_then_get_is_none() {
    let mut world = world();
    for _ in 0..7 {
        let entity = world.create_entity();
        world.add(entity, Transform::default()).unwrap();
    }
    let seventh = Entity::from_raw(7);
    let before = world.count::<Transform>();

    world.remove::<Transform>(seventh);

    assert!(world.get::<Transform>(seventh).is_none());
    assert_eq!(world.count::<Transform>(), before - 1);
}

#[test]
fn test_growth_past_initial_capacity() {
    let mut world = world();
    let total = world.config().initial_dense_capacity + 1;
    let entities: Vec<Entity> = (0..total).map(|_| world.create_entity()).collect();
    for &entity in &entities {
        world.add(entity, Player::default()).unwrap();
    }

    assert_eq!(world.count::<Player>(), total);
    assert!(entities.iter().all(|&entity| world.has::<Player>(entity)));
}

#[test]
fn test_destroy_clears_all_seven_types() {
    let mut world = world();
    let entity = world.create_entity();
    world.add(entity, Transform::default()).unwrap();
    world.add(entity, Sprite::default()).unwrap();
    world.add(entity, Animation::default()).unwrap();
    world.add(entity, Physics::default()).unwrap();
    world.add(entity, Collider::default()).unwrap();
    world.add(entity, CollisionState::default()).unwrap();
    world.add(entity, Player::default()).unwrap();

    assert_eq!(world.destroy_entity(entity), 7);
    assert!(!world.has::<Transform>(entity));
    assert!(!world.has::<Sprite>(entity));
    assert!(!world.has::<Animation>(entity));
    assert!(!world.has::<Physics>(entity));
    assert!(!world.has::<Collider>(entity));
    assert!(!world.has::<CollisionState>(entity));
    assert!(!world.has::<Player>(entity));
}

#[test]
fn test_six_component_query() {
    let mut world = world();
    let full = world.create_entity();
    let partial = world.create_entity();
    for entity in [full, partial] {
        world.add(entity, Transform::default()).unwrap();
        world.add(entity, Sprite::default()).unwrap();
        world.add(entity, Animation::default()).unwrap();
        world.add(entity, Physics::default()).unwrap();
        world.add(entity, Collider::default()).unwrap();
    }
    world.add(full, Player::default()).unwrap();

    let view = world
        .query::<(Transform, Sprite, Animation, Physics, Collider, Player)>()
        .unwrap();
    assert_eq!(view.driver_len(), 1);
    assert_eq!(view.matching_entities(), vec![full]);
}

// ============================================================================
// FRAME LOOP
// ============================================================================

#[test]
fn test_frame_loop_with_deferred_despawn() {
    let mut world = world();
    for i in 0..10 {
        let entity = world.create_entity();
        world
            .add(
                entity,
                Transform {
                    position: Vec2::new(i as f32 * 10.0, 0.0),
                    ..Transform::default()
                },
            )
            .unwrap();
        world.add(entity, Physics::default()).unwrap();
        world
            .add(
                entity,
                Sprite {
                    width: 8,
                    height: 8,
                    ..Sprite::default()
                },
            )
            .unwrap();
        world
            .add(
                entity,
                Player {
                    health: i as f32 * 10.0,
                    ..Player::default()
                },
            )
            .unwrap();
    }

    let exchange = FrameExchange::new();
    let mut scratch = InstanceBuffers::new();

    for _ in 0..3 {
        systems::integrate_physics(&mut world, 1.0 / 60.0, DEFAULT_GRAVITY).unwrap();
        systems::extract_instances(&mut world, &mut scratch).unwrap();
        exchange.publish(&mut scratch);
    }

    let mut commands = CommandBuffer::new();
    world.query::<(Player,)>().unwrap().for_each(|entity, player| {
        if player.health < 30.0 {
            commands.destroy(entity);
        }
    });
    assert_eq!(world.apply_commands(&mut commands), Ok(3));

    systems::extract_instances(&mut world, &mut scratch).unwrap();
    assert_eq!(exchange.publish(&mut scratch), 4);

    let frame = exchange.read();
    assert_eq!(frame.len(), 7);
    assert!(frame.positions().iter().all(|position| position.y > 0.0));
    assert!(frame.scales().iter().all(|&scale| scale == Vec2::new(8.0, 8.0)));
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[test]
fn test_world_from_toml() {
    let config = WorldConfig::from_toml_str(
        r"
        max_entities = 4
        initial_dense_capacity = 2
        ",
    )
    .unwrap();
    let mut world = GameWorld::new(config).unwrap();

    let ids: Vec<Entity> = (0..4).map(|_| world.create_entity()).collect();
    assert_eq!(ids[..3].iter().map(|e| e.to_raw()).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert!(ids[3].is_null());
}
