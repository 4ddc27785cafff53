//! Integration tests for the rapier-backed physics world.
//!
//! These run the real kinematic character controller, so positional checks use
//! tolerances of the order of the controller offset.

use game::character::CharacterStateId;
use game::physics::{
    BodyDesc, BodyHandle, ColliderShapeDef, PhysicsWorld, RapierPhysics, WorldStaticDef,
};
use game::{
    Character, ClipMixer, ControlScheme, InputEvent, Key, Level, ModelInfo, Quat,
    ThirdPersonControls, Transform, Vec3,
};

const DT: f32 = 1.0 / 60.0;

fn cuboid(id: u32, center: Vec3, half_extents: Vec3) -> WorldStaticDef {
    WorldStaticDef {
        id,
        translation: center,
        rotation: Quat::identity(),
        shape: ColliderShapeDef::Cuboid { half_extents },
    }
}

/// Floor with its top face at y = 0 and a wall whose near face is at z = 2.5.
fn arena() -> RapierPhysics {
    let mut physics = RapierPhysics::default();
    let handles = physics.insert_statics(vec![
        cuboid(2, Vec3::new(0.0, 2.5, 3.0), Vec3::new(5.0, 2.5, 0.5)),
        cuboid(1, Vec3::new(0.0, -0.5, 0.0), Vec3::new(20.0, 0.5, 20.0)),
    ]);
    assert_eq!(handles.len(), 2);
    physics
}

fn capsule_at(physics: &mut RapierPhysics, center: Vec3) -> BodyHandle {
    physics.create_body(BodyDesc::kinematic(
        ColliderShapeDef::CapsuleY {
            radius: 0.5,
            half_height: 0.7,
        },
        Transform::from_translation(center),
    ))
}

#[test]
fn free_fall_is_unobstructed() {
    let mut physics = arena();
    let body = capsule_at(&mut physics, Vec3::new(0.0, 5.0, -5.0));

    let desired = Vec3::new(0.0, -0.1, 0.0);
    let sweep = physics.sweep(body, desired, DT);
    assert!((sweep.applied - desired).norm() < 1e-4, "{sweep:?}");
    assert!(!sweep.collided);
}

#[test]
fn floor_stops_a_descending_capsule() {
    let mut physics = arena();
    let body = capsule_at(&mut physics, Vec3::new(0.0, 1.25, -5.0));

    let sweep = physics.sweep(body, Vec3::new(0.0, -0.5, 0.0), DT);
    assert!(sweep.collided);
    assert!(sweep.applied.y <= 0.0);
    assert!(sweep.applied.y > -0.06, "{sweep:?}");
}

#[test]
fn wall_blocks_forward_motion() {
    let mut physics = arena();
    let body = capsule_at(&mut physics, Vec3::new(0.0, 1.25, 0.0));

    let sweep = physics.sweep(body, Vec3::new(0.0, 0.0, 5.0), DT);
    assert!(sweep.collided);
    // Capsule front starts at z = 0.5, the wall face is at z = 2.5.
    assert!(sweep.applied.z <= 2.0 + 1e-3, "{sweep:?}");
    assert!(sweep.applied.z > 1.5, "{sweep:?}");
}

#[test]
fn sensors_and_kinematic_bodies_do_not_block() {
    let mut physics = arena();
    let body = capsule_at(&mut physics, Vec3::new(0.0, 1.25, -10.0));
    physics.create_body(
        BodyDesc::kinematic(
            ColliderShapeDef::Sphere { radius: 0.5 },
            Transform::from_translation(Vec3::new(0.0, 1.0, -9.0)),
        )
        .sensor(),
    );
    capsule_at(&mut physics, Vec3::new(0.0, 1.25, -8.0));
    physics.step(DT);

    let desired = Vec3::new(0.0, 0.0, 3.0);
    let sweep = physics.sweep(body, desired, DT);
    assert!((sweep.applied.z - desired.z).abs() < 1e-3, "{sweep:?}");
}

#[test]
fn removed_and_unknown_bodies_are_tolerated() {
    let mut physics = arena();
    let body = capsule_at(&mut physics, Vec3::new(0.0, 5.0, -5.0));
    assert!(physics.translation(body).is_some());

    physics.remove_body(body);
    physics.remove_body(body);
    assert!(physics.translation(body).is_none());

    let sweep = physics.sweep(body, Vec3::new(1.0, 0.0, 0.0), DT);
    assert_eq!(sweep.applied, Vec3::zeros());
    physics.set_translation(body, Vec3::new(1.0, 2.0, 3.0));
    assert!(physics.translation(body).is_none());
}

#[test]
fn kinematic_bodies_stay_where_they_are_put() {
    let mut physics = arena();
    let body = capsule_at(&mut physics, Vec3::new(0.0, 5.0, -5.0));
    physics.set_translation(body, Vec3::new(1.0, 6.0, -4.0));
    for _ in 0..30 {
        physics.step(DT);
    }
    let t = physics.translation(body).expect("body exists");
    assert!((t - Vec3::new(1.0, 6.0, -4.0)).norm() < 1e-5);
}

fn knight() -> ModelInfo {
    ModelInfo {
        name: "Knight".to_string(),
        size: Vec3::new(1.4, 2.4, 1.0),
        animations: game::character::CLIPS
            .iter()
            .map(|name| game::assets::ClipInfo {
                name: (*name).to_string(),
                duration: 1.0,
            })
            .collect(),
    }
}

#[test]
fn character_runs_into_the_large_cube() {
    let level = Level::default();
    let mut physics = RapierPhysics::default();
    level.generate(&mut physics);

    let model = knight();
    let mut character = Character::new(
        &mut physics,
        &model,
        level.spawn_point(),
        0.0,
        Box::new(ClipMixer::from_model(&model)),
    )
    .expect("valid character");
    let mut controls = ThirdPersonControls::new();
    controls.enable();
    controls.handle(InputEvent::KeyDown(Key::Forward));

    let mut elapsed = 0.0;
    for _ in 0..180 {
        elapsed += DT;
        physics.step(DT);
        controls.update();
        character.update(DT, elapsed, &mut physics, Some(&mut controls));
    }

    // The cube's near face sits at z = 14; the capsule radius is 0.5.
    let p = character.position();
    assert!(p.z < 14.0 - 0.4, "{p:?}");
    assert!(p.z > 12.5, "{p:?}");
    assert!((p.y - 1.2).abs() < 0.1, "{p:?}");
    assert_eq!(character.state_id(), Some(CharacterStateId::Running));
}

#[test]
fn jump_lands_on_the_floor_at_144_hz() {
    const FAST_DT: f32 = 1.0 / 144.0;
    let level = Level::default();
    let mut physics = RapierPhysics::default();
    level.generate(&mut physics);

    let model = knight();
    let mut character = Character::new(
        &mut physics,
        &model,
        level.spawn_point(),
        0.0,
        Box::new(ClipMixer::from_model(&model)),
    )
    .expect("valid character");
    let mut controls = ThirdPersonControls::new();
    controls.enable();
    controls.handle(InputEvent::KeyDown(Key::Jump));

    let mut elapsed = 0.0;
    let mut apex: f32 = 0.0;
    for _ in 0..1440 {
        elapsed += FAST_DT;
        physics.step(FAST_DT);
        controls.update();
        character.update(FAST_DT, elapsed, &mut physics, Some(&mut controls));
        controls.handle(InputEvent::KeyUp(Key::Jump));
        apex = apex.max(character.position().y);
        if character.state_id() == Some(CharacterStateId::LandingJump) {
            break;
        }
    }

    assert_eq!(character.state_id(), Some(CharacterStateId::LandingJump));
    assert!(apex > 1.2 + 0.1, "apex {apex}");
    let p = character.position();
    assert!((p.y - 1.2).abs() < 0.05, "landed at {p:?}");
    assert!(character.last_sweep().grounded);
}
