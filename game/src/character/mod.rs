/*!
Player character: a kinematic capsule driven by the controls and a locomotion state machine.

Per tick, in order:
1. Advance the animation mixer.
2. Turn toward the controls' facing.
3. Turn the movement intent into a world-space horizontal velocity.
4. Let the current state pick the final velocity (ground states add a constant fall,
   the jump state follows its arc).
5. Sweep the body through the physics world and adopt the allowed displacement.
6. Mirror the body onto the mesh (feet origin).
7. Update the state machine with the direction and the sweep result.
8. Let the controls move the camera.
*/

mod states;

pub use states::{
    CLIPS, CharacterContext, CharacterState, CharacterStateId, ClipSpec, Direction, JumpArc,
    LANDING_DURATION_S, STARTING_JUMP_DURATION_S,
};

use crate::animation::AnimationMixer;
use crate::assets::ModelInfo;
use crate::constants::{
    CHARACTER_RADIUS, CHARACTER_SPEED, HITBOX_HALF_WIDTH, ORIENTATION_SLERP_FACTOR,
};
use crate::controls::ControlScheme;
use crate::error::GameError;
use crate::fsm::StateMachine;
use crate::physics::{BodyDesc, BodyHandle, ColliderShapeDef, PhysicsWorld, Sweep};
use crate::types::{Aabb, Quat, Transform, Vec3};

pub struct Character {
    body: BodyHandle,
    half_extent: f32,
    /// Capsule center.
    transform: Transform,
    spawn_rotation: Quat,
    /// Rendered model, origin at the feet.
    mesh: Transform,
    mixer: Box<dyn AnimationMixer>,
    machine: StateMachine<CharacterState>,
    intent_velocity: Vec3,
    last_sweep: Sweep,
}

impl Character {
    /// Create the character with its feet at `feet`, rotated by `orientation` half-turns about +Y.
    pub fn new(
        physics: &mut dyn PhysicsWorld,
        model: &ModelInfo,
        feet: Vec3,
        orientation: f32,
        mixer: Box<dyn AnimationMixer>,
    ) -> Result<Self, GameError> {
        let half_extent = model.size.y * 0.5;
        if half_extent <= CHARACTER_RADIUS {
            return Err(GameError::DegenerateModel {
                model: model.name.clone(),
                height: model.size.y,
            });
        }
        if let Some(clip) = CLIPS.iter().find(|clip| !model.has_animation(clip)) {
            return Err(GameError::MissingAnimation {
                model: model.name.clone(),
                clip: (*clip).to_string(),
            });
        }

        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), std::f32::consts::PI * orientation);
        let transform = Transform::new(feet + Vec3::y() * half_extent, rotation);
        let body = physics.create_body(BodyDesc::kinematic(
            ColliderShapeDef::CapsuleY {
                radius: CHARACTER_RADIUS,
                half_height: half_extent - CHARACTER_RADIUS,
            },
            transform,
        ));

        let mut machine = StateMachine::new();
        CharacterState::register(&mut machine);

        let mut character = Self {
            body,
            half_extent,
            transform,
            spawn_rotation: rotation,
            mesh: transform,
            mixer,
            machine,
            intent_velocity: Vec3::zeros(),
            last_sweep: Sweep::default(),
        };
        character.sync_mesh();
        character.set_state(CharacterStateId::Idle);
        log::info!(
            "character `{}` spawned at {:?}",
            model.name,
            character.transform.translation
        );
        Ok(character)
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    pub fn half_extent(&self) -> f32 {
        self.half_extent
    }

    /// Capsule center.
    pub fn position(&self) -> Vec3 {
        self.transform.translation
    }

    pub fn rotation(&self) -> Quat {
        self.transform.rotation
    }

    pub fn mesh_transform(&self) -> &Transform {
        &self.mesh
    }

    pub fn state_id(&self) -> Option<CharacterStateId> {
        self.machine.current_id()
    }

    pub fn state(&self) -> Option<&CharacterState> {
        self.machine.current()
    }

    pub fn mixer(&self) -> &dyn AnimationMixer {
        self.mixer.as_ref()
    }

    pub fn last_sweep(&self) -> Sweep {
        self.last_sweep
    }

    /// Box used to gather coins: the capsule's height, a little wider than its radius.
    pub fn hitbox(&self) -> Aabb {
        Aabb::from_center_half_extents(
            self.transform.translation,
            Vec3::new(HITBOX_HALF_WIDTH, self.half_extent, HITBOX_HALF_WIDTH),
        )
    }

    pub fn update(
        &mut self,
        dt: f32,
        elapsed: f32,
        physics: &mut dyn PhysicsWorld,
        controls: Option<&mut dyn ControlScheme>,
    ) {
        self.mixer.advance(dt);

        let direction = match controls.as_deref() {
            Some(controls) => {
                self.handle_movement(dt, physics, controls);
                Direction::from_movement(&controls.movement_vector())
            }
            None => Direction::None,
        };

        let mut ctx = CharacterContext {
            mixer: self.mixer.as_mut(),
            direction,
            intent_velocity: self.intent_velocity,
            last_sweep: self.last_sweep,
        };
        self.machine.update(&mut ctx, dt, elapsed);

        if let Some(controls) = controls {
            controls.update_camera(&self.mesh);
        }
    }

    fn handle_movement(
        &mut self,
        dt: f32,
        physics: &mut dyn PhysicsWorld,
        controls: &dyn ControlScheme,
    ) {
        let facing = controls.facing();
        self.transform.rotation = self
            .transform
            .rotation
            .try_slerp(&facing, ORIENTATION_SLERP_FACTOR, 1.0e-6)
            .unwrap_or(facing);
        physics.set_rotation(self.body, self.transform.rotation);

        let intent = controls.movement_vector();
        self.intent_velocity =
            self.transform.rotation * Vec3::new(intent.x, 0.0, intent.z) * CHARACTER_SPEED;

        let velocity = self
            .machine
            .current()
            .map_or(self.intent_velocity, |state| state.velocity(self.intent_velocity));
        let sweep = physics.sweep(self.body, velocity * dt, dt);

        self.transform.translation += sweep.applied;
        physics.set_translation(self.body, self.transform.translation);
        self.last_sweep = sweep;
        self.sync_mesh();
    }

    /// Put the feet at `feet`, restore the spawn orientation and return to idle.
    pub fn teleport(&mut self, physics: &mut dyn PhysicsWorld, feet: Vec3) {
        self.transform = Transform::new(feet + Vec3::y() * self.half_extent, self.spawn_rotation);
        physics.set_translation(self.body, self.transform.translation);
        physics.set_rotation(self.body, self.transform.rotation);
        self.intent_velocity = Vec3::zeros();
        self.last_sweep = Sweep::default();
        self.sync_mesh();
        self.set_state(CharacterStateId::Idle);
    }

    fn set_state(&mut self, id: CharacterStateId) {
        let mut ctx = CharacterContext {
            mixer: self.mixer.as_mut(),
            direction: Direction::None,
            intent_velocity: self.intent_velocity,
            last_sweep: self.last_sweep,
        };
        self.machine.set_state(id, &mut ctx);
    }

    fn sync_mesh(&mut self) {
        self.mesh = Transform::new(
            self.transform.translation - Vec3::y() * self.half_extent,
            self.transform.rotation,
        );
    }
}

impl std::fmt::Debug for Character {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Character")
            .field("body", &self.body)
            .field("transform", &self.transform)
            .field("state", &self.machine.current_id())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::ClipMixer;
    use crate::assets::ClipInfo;
    use crate::controls::{InputEvent, Key, ThirdPersonControls};
    use crate::test_support::{FlatWorld, knight};

    const DT: f32 = 1.0 / 60.0;

    fn spawn(physics: &mut FlatWorld) -> Character {
        let model = knight();
        Character::new(
            physics,
            &model,
            Vec3::new(20.0, 0.0, 8.0),
            0.0,
            Box::new(ClipMixer::from_model(&model)),
        )
        .expect("knight is a valid character")
    }

    fn enabled_controls() -> ThirdPersonControls {
        let mut controls = ThirdPersonControls::new();
        controls.enable();
        controls
    }

    fn step(
        character: &mut Character,
        physics: &mut FlatWorld,
        controls: &mut ThirdPersonControls,
        t: &mut f32,
    ) {
        *t += DT;
        controls.update();
        character.update(DT, *t, physics, Some(controls));
    }

    #[test]
    fn spawns_standing_on_its_feet_in_idle() {
        let mut physics = FlatWorld::default();
        let character = spawn(&mut physics);
        assert_eq!(character.position(), Vec3::new(20.0, 1.2, 8.0));
        assert_eq!(character.mesh_transform().translation, Vec3::new(20.0, 0.0, 8.0));
        assert_eq!(character.state_id(), Some(CharacterStateId::Idle));
        assert_eq!(character.mixer().active_clip(), Some("Idle"));
        assert_eq!(physics.live_bodies(), 1);
    }

    #[test]
    fn rejects_models_without_required_clips() {
        let mut physics = FlatWorld::default();
        let mut model = knight();
        model.animations.retain(|clip| clip.name != "Jump_Land");
        let err = Character::new(
            &mut physics,
            &model,
            Vec3::zeros(),
            0.0,
            Box::new(ClipMixer::from_model(&model)),
        )
        .unwrap_err();
        assert!(matches!(err, GameError::MissingAnimation { clip, .. } if clip == "Jump_Land"));
    }

    #[test]
    fn rejects_models_too_short_for_the_capsule() {
        let mut physics = FlatWorld::default();
        let model = ModelInfo {
            size: Vec3::new(1.0, 0.8, 1.0),
            animations: vec![ClipInfo {
                name: "Idle".into(),
                duration: 1.0,
            }],
            ..knight()
        };
        let err = Character::new(
            &mut physics,
            &model,
            Vec3::zeros(),
            0.0,
            Box::new(ClipMixer::default()),
        );
        assert!(matches!(err, Err(GameError::DegenerateModel { .. })));
    }

    #[test]
    fn running_forward_moves_at_character_speed() {
        let mut physics = FlatWorld::default();
        let mut character = spawn(&mut physics);
        let mut controls = enabled_controls();
        let mut t = 0.0;

        controls.handle(InputEvent::KeyDown(Key::Forward));
        step(&mut character, &mut physics, &mut controls, &mut t);
        assert_eq!(character.state_id(), Some(CharacterStateId::Running));

        let before = character.position();
        step(&mut character, &mut physics, &mut controls, &mut t);
        let moved = character.position() - before;
        assert!((moved.z - CHARACTER_SPEED * DT).abs() < 1e-5);
        // Ground velocity pushes down, the floor holds.
        assert!(moved.y.abs() < 1e-5);
        assert_eq!(physics.translation(character.body()), Some(character.position()));
    }

    #[test]
    fn adopts_exactly_the_swept_displacement() {
        let mut physics = FlatWorld {
            wall_z: Some(8.6),
            ..FlatWorld::default()
        };
        let mut character = spawn(&mut physics);
        let mut controls = enabled_controls();
        let mut t = 0.0;

        controls.handle(InputEvent::KeyDown(Key::Forward));
        let mut blocked_ticks = 0;
        for _ in 0..30 {
            let before = character.position();
            step(&mut character, &mut physics, &mut controls, &mut t);
            let sweep = character.last_sweep();
            assert_eq!(character.position(), before + sweep.applied);
            if sweep.collided {
                blocked_ticks += 1;
            }
        }
        assert!(blocked_ticks > 0);
        assert!(character.position().z <= 8.1 + 1e-5);
        assert!(character.last_sweep().collided);
    }

    #[test]
    fn disabled_controls_keep_the_character_still() {
        let mut physics = FlatWorld::default();
        let mut character = spawn(&mut physics);
        let mut controls = ThirdPersonControls::new();
        let mut t = 0.0;

        controls.handle(InputEvent::KeyDown(Key::Forward));
        for _ in 0..10 {
            step(&mut character, &mut physics, &mut controls, &mut t);
        }
        assert_eq!(character.position(), Vec3::new(20.0, 1.2, 8.0));
        assert_eq!(character.state_id(), Some(CharacterStateId::Idle));
    }

    #[test]
    fn full_jump_returns_to_the_ground_and_to_idle() {
        let mut physics = FlatWorld::default();
        let mut character = spawn(&mut physics);
        let mut controls = enabled_controls();
        let mut t = 0.0;

        controls.handle(InputEvent::KeyDown(Key::Jump));
        step(&mut character, &mut physics, &mut controls, &mut t);
        controls.handle(InputEvent::KeyUp(Key::Jump));
        assert_eq!(character.state_id(), Some(CharacterStateId::StartingJump));

        let mut seen = vec![CharacterStateId::StartingJump];
        let mut apex: f32 = 0.0;
        for _ in 0..600 {
            step(&mut character, &mut physics, &mut controls, &mut t);
            apex = apex.max(character.position().y);
            if let Some(id) = character.state_id() {
                if seen.last() != Some(&id) {
                    seen.push(id);
                }
            }
            if character.state_id() == Some(CharacterStateId::Idle) {
                break;
            }
        }

        assert_eq!(
            seen,
            vec![
                CharacterStateId::StartingJump,
                CharacterStateId::Jumping,
                CharacterStateId::LandingJump,
                CharacterStateId::Idle,
            ]
        );
        assert!(apex > 1.2 + 0.5, "apex {apex}");
        assert!((character.position().y - 1.2).abs() < 1e-3);
    }

    #[test]
    fn lands_on_the_floor_at_high_tick_rates() {
        const FAST_DT: f32 = 1.0 / 144.0;
        let mut physics = FlatWorld::default();
        let mut character = spawn(&mut physics);
        let mut controls = enabled_controls();
        let mut t = 0.0;

        controls.handle(InputEvent::KeyDown(Key::Jump));
        let mut apex: f32 = 0.0;
        for _ in 0..1440 {
            t += FAST_DT;
            controls.update();
            character.update(FAST_DT, t, &mut physics, Some(&mut controls));
            controls.handle(InputEvent::KeyUp(Key::Jump));
            apex = apex.max(character.position().y);
            if character.state_id() == Some(CharacterStateId::LandingJump) {
                break;
            }
        }

        assert_eq!(character.state_id(), Some(CharacterStateId::LandingJump));
        assert!(apex > 1.2 + 0.1, "apex {apex}");
        let y = character.position().y;
        assert!((y - 1.2).abs() < 1e-3, "landed at {y}");
        assert!(character.last_sweep().grounded);
    }

    #[test]
    fn airborne_motion_keeps_the_launch_velocity() {
        let mut physics = FlatWorld::default();
        let mut character = spawn(&mut physics);
        let mut controls = enabled_controls();
        let mut t = 0.0;

        controls.handle(InputEvent::KeyDown(Key::Forward));
        controls.handle(InputEvent::KeyDown(Key::Jump));
        while character.state_id() != Some(CharacterStateId::Jumping) {
            step(&mut character, &mut physics, &mut controls, &mut t);
            assert!(t < 1.0);
        }
        controls.handle(InputEvent::KeyUp(Key::Forward));
        controls.handle(InputEvent::KeyUp(Key::Jump));

        let before = character.position();
        step(&mut character, &mut physics, &mut controls, &mut t);
        let moved = character.position() - before;
        assert!((moved.z - CHARACTER_SPEED * 1.25 * DT).abs() < 1e-4);
        assert!(moved.y > 0.0);
    }

    #[test]
    fn teleport_resets_position_orientation_and_state() {
        let mut physics = FlatWorld::default();
        let mut character = spawn(&mut physics);
        let mut controls = enabled_controls();
        let mut t = 0.0;

        controls.handle(InputEvent::PointerLockChanged { locked: true });
        controls.handle(InputEvent::PointerMoved { dx: 400.0 });
        controls.handle(InputEvent::KeyDown(Key::Left));
        for _ in 0..20 {
            step(&mut character, &mut physics, &mut controls, &mut t);
        }
        assert_ne!(character.rotation(), Quat::identity());

        character.teleport(&mut physics, Vec3::new(20.0, 0.0, 8.0));
        assert_eq!(character.position(), Vec3::new(20.0, 1.2, 8.0));
        assert_eq!(character.rotation(), Quat::identity());
        assert_eq!(character.state_id(), Some(CharacterStateId::Idle));
    }

    #[test]
    fn hitbox_spans_the_capsule_height() {
        let mut physics = FlatWorld::default();
        let character = spawn(&mut physics);
        let hitbox = character.hitbox();
        assert!((hitbox.min - Vec3::new(19.3, 0.0, 7.3)).norm() < 1e-5);
        assert!((hitbox.max - Vec3::new(20.7, 2.4, 8.7)).norm() < 1e-5);
    }
}
