//! Fakes shared by the in-crate tests.

use std::collections::HashMap;

use crate::assets::{ClipInfo, ModelInfo};
use crate::character::CLIPS;
use crate::physics::{BodyDesc, BodyHandle, PhysicsWorld, Sweep, WorldStaticDef};
use crate::types::{Quat, Vec3};

#[derive(Clone, Debug)]
pub(crate) struct FakeBody {
    pub translation: Vec3,
    pub rotation: Quat,
    pub desc: BodyDesc,
}

/// Infinite floor at `floor_y`; bodies cannot sink below it. An optional wall at
/// `wall_z` stops forward motion.
#[derive(Debug, Default)]
pub(crate) struct FlatWorld {
    pub bodies: HashMap<BodyHandle, FakeBody>,
    pub next: u32,
    pub floor_y: f32,
    pub wall_z: Option<f32>,
    pub removed: Vec<BodyHandle>,
    pub statics: usize,
}

impl FlatWorld {
    pub fn live_bodies(&self) -> usize {
        self.bodies.len()
    }
}

impl PhysicsWorld for FlatWorld {
    fn create_body(&mut self, desc: BodyDesc) -> BodyHandle {
        let handle = BodyHandle::from_raw(self.next);
        self.next += 1;
        self.bodies.insert(
            handle,
            FakeBody {
                translation: desc.transform.translation,
                rotation: desc.transform.rotation,
                desc,
            },
        );
        handle
    }

    fn insert_statics(&mut self, defs: Vec<WorldStaticDef>) -> Vec<BodyHandle> {
        self.statics += defs.len();
        Vec::new()
    }

    fn sweep(&self, body: BodyHandle, desired: Vec3, _dt: f32) -> Sweep {
        let Some(b) = self.bodies.get(&body) else {
            return Sweep::default();
        };
        let mut applied = desired;

        let bottom = b.translation.y - b.desc.shape.half_extent_y();
        let min_dy = self.floor_y - bottom;
        let grounded = applied.y <= min_dy;
        if grounded {
            applied.y = min_dy;
        }

        if let Some(wall) = self.wall_z {
            let radius = 0.5;
            let max_dz = wall - radius - b.translation.z;
            if applied.z > max_dz {
                applied.z = max_dz.max(0.0);
            }
        }

        Sweep {
            applied,
            grounded,
            collided: applied != desired,
        }
    }

    fn translation(&self, body: BodyHandle) -> Option<Vec3> {
        self.bodies.get(&body).map(|b| b.translation)
    }

    fn set_translation(&mut self, body: BodyHandle, translation: Vec3) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.translation = translation;
        }
    }

    fn set_rotation(&mut self, body: BodyHandle, rotation: Quat) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.rotation = rotation;
        }
    }

    fn step(&mut self, _dt: f32) {}

    fn remove_body(&mut self, body: BodyHandle) {
        if self.bodies.remove(&body).is_some() {
            self.removed.push(body);
        }
    }
}

/// Knight-sized model carrying every locomotion clip.
pub(crate) fn knight() -> ModelInfo {
    ModelInfo {
        name: "Knight".to_string(),
        size: Vec3::new(1.4, 2.4, 1.0),
        animations: CLIPS
            .iter()
            .map(|name| ClipInfo {
                name: (*name).to_string(),
                duration: 1.0,
            })
            .collect(),
    }
}
