//! Rapier-backed [`PhysicsWorld`].
//!
//! Fixed geometry, the character capsule and coin sensors all live in one Rapier scene.
//! Character sweeps run rapier's `KinematicCharacterController` against a borrowed query
//! pipeline filtered to fixed bodies, so coins and other kinematic bodies never block.
//!
//! Determinism
//! - Statics are sorted by `id` before insertion.
//! - Handles are allocated from a monotonic counter and never reused.

use std::collections::HashMap;

use rapier3d::control::KinematicCharacterController;
use rapier3d::na::Translation3;
use rapier3d::prelude::*;

use super::settings::KccSettings;
use super::shapes::{WorldStaticDef, collider_from_shape};
use super::{BodyDesc, BodyHandle, BodyKind, PhysicsWorld, Sweep};
use crate::types::{Quat, Vec3};

/// Differences below this (squared) between desired and applied displacement are not
/// reported as collisions.
const MIN_CORRECTION_SQ: f32 = 1.0e-8;

pub struct RapierPhysics {
    gravity: Vector<f32>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    controller: KinematicCharacterController,
    handles: HashMap<BodyHandle, RigidBodyHandle>,
    next_handle: u32,
}

impl Default for RapierPhysics {
    fn default() -> Self {
        Self::new(KccSettings::default())
    }
}

impl RapierPhysics {
    pub fn new(settings: KccSettings) -> Self {
        Self {
            gravity: vector![0.0, -9.81, 0.0],
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            controller: settings.controller(),
            handles: HashMap::new(),
            next_handle: 0,
        }
    }

    fn insert(&mut self, desc: &BodyDesc) -> BodyHandle {
        let iso = Isometry::from_parts(
            Translation3::from(desc.transform.translation),
            desc.transform.rotation,
        );
        let builder = match desc.kind {
            BodyKind::Kinematic => RigidBodyBuilder::kinematic_position_based(),
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
            BodyKind::Fixed => RigidBodyBuilder::fixed(),
        };
        let rb_handle = self.bodies.insert(builder.pose(iso).build());
        let collider = collider_from_shape(&desc.shape, desc.sensor);
        self.colliders
            .insert_with_parent(collider, rb_handle, &mut self.bodies);

        let handle = BodyHandle::from_raw(self.next_handle);
        self.next_handle += 1;
        self.handles.insert(handle, rb_handle);
        handle
    }

    fn body_mut(&mut self, body: BodyHandle) -> Option<&mut RigidBody> {
        let rb_handle = self.handles.get(&body).copied();
        let rb = rb_handle.and_then(|h| self.bodies.get_mut(h));
        if rb.is_none() {
            log::warn!("unknown body {body:?}");
        }
        rb
    }
}

impl PhysicsWorld for RapierPhysics {
    fn create_body(&mut self, desc: BodyDesc) -> BodyHandle {
        self.insert(&desc)
    }

    fn insert_statics(&mut self, mut defs: Vec<WorldStaticDef>) -> Vec<BodyHandle> {
        // Ensure deterministic insertion order.
        defs.sort_by_key(|d| d.id);

        let handles: Vec<BodyHandle> = defs
            .into_iter()
            .map(|def| {
                self.insert(&BodyDesc {
                    kind: BodyKind::Fixed,
                    shape: def.shape,
                    transform: crate::types::Transform::new(def.translation, def.rotation),
                    sensor: false,
                })
            })
            .collect();

        // Refresh the broad phase right away so sweeps see the statics before the first step.
        let mut collision_pipeline = CollisionPipeline::new();
        collision_pipeline.step(
            0.0,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &(),
            &(),
        );
        log::debug!("inserted {} static colliders", handles.len());
        handles
    }

    fn sweep(&self, body: BodyHandle, desired: Vec3, dt: f32) -> Sweep {
        let Some(rb) = self.handles.get(&body).and_then(|h| self.bodies.get(*h)) else {
            log::warn!("sweep requested for unknown body {body:?}");
            return Sweep::default();
        };
        let Some(collider) = rb.colliders().first().and_then(|h| self.colliders.get(*h)) else {
            log::warn!("body {body:?} has no collider");
            return Sweep::default();
        };

        let query_pipeline = self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            QueryFilter::only_fixed(),
        );
        let correction = self.controller.move_shape(
            dt,
            &query_pipeline,
            collider.shape(),
            rb.position(),
            desired,
            |_| {},
        );

        Sweep {
            applied: correction.translation,
            grounded: correction.grounded,
            collided: (correction.translation - desired).norm_squared() > MIN_CORRECTION_SQ,
        }
    }

    fn translation(&self, body: BodyHandle) -> Option<Vec3> {
        let rb_handle = self.handles.get(&body)?;
        self.bodies.get(*rb_handle).map(|rb| *rb.translation())
    }

    fn set_translation(&mut self, body: BodyHandle, translation: Vec3) {
        if let Some(rb) = self.body_mut(body) {
            rb.set_translation(translation, true);
        }
    }

    fn set_rotation(&mut self, body: BodyHandle, rotation: Quat) {
        if let Some(rb) = self.body_mut(body) {
            rb.set_rotation(rotation, true);
        }
    }

    fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &(),
        );
    }

    fn remove_body(&mut self, body: BodyHandle) {
        let Some(rb_handle) = self.handles.remove(&body) else {
            log::debug!("ignoring removal of unknown body {body:?}");
            return;
        };
        self.bodies.remove(
            rb_handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }
}
