/*!
Physics collaborator contract.

Gameplay code never talks to a physics engine directly. It creates bodies, asks for
collision-aware sweeps and mirrors positions through [`PhysicsWorld`]; the concrete world
is injected by the host. [`RapierPhysics`] is the production implementation.

Notes
- A sweep is a query: it reports how far a body may travel along a desired displacement
  and never moves the body. The caller adopts the result with `set_translation`.
- Character sweeps only collide with fixed geometry. Coins are sensors and never block.
*/

mod rapier_world;
mod settings;
mod shapes;

pub use rapier_world::RapierPhysics;
pub use settings::KccSettings;
pub use shapes::{ColliderShapeDef, WorldStaticDef};

use crate::types::{Quat, Transform, Vec3};

/// Opaque id of a body owned by a [`PhysicsWorld`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(u32);

impl BodyHandle {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    /// Moved explicitly by gameplay code, pushes nothing.
    Kinematic,
    Dynamic,
    Fixed,
}

/// Everything needed to create a body with one attached collider.
#[derive(Clone, Debug)]
pub struct BodyDesc {
    pub kind: BodyKind,
    pub shape: ColliderShapeDef,
    pub transform: Transform,
    pub sensor: bool,
}

impl BodyDesc {
    pub fn kinematic(shape: ColliderShapeDef, transform: Transform) -> Self {
        Self {
            kind: BodyKind::Kinematic,
            shape,
            transform,
            sensor: false,
        }
    }

    pub fn sensor(mut self) -> Self {
        self.sensor = true;
        self
    }
}

/// Result of a collision-aware sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Sweep {
    /// Displacement the body may actually perform.
    pub applied: Vec3,
    /// The body ended up supported by ground.
    pub grounded: bool,
    /// Something shortened or deflected the desired displacement.
    pub collided: bool,
}

impl Sweep {
    pub fn unobstructed(desired: Vec3) -> Self {
        Self {
            applied: desired,
            grounded: false,
            collided: false,
        }
    }
}

pub trait PhysicsWorld {
    fn create_body(&mut self, desc: BodyDesc) -> BodyHandle;

    /// Insert immutable world geometry as fixed bodies, in `id` order.
    fn insert_statics(&mut self, defs: Vec<WorldStaticDef>) -> Vec<BodyHandle>;

    /// How far `body` may move along `desired` during a tick of length `dt`.
    ///
    /// Unknown handles yield a zero displacement.
    fn sweep(&self, body: BodyHandle, desired: Vec3, dt: f32) -> Sweep;

    fn translation(&self, body: BodyHandle) -> Option<Vec3>;

    fn set_translation(&mut self, body: BodyHandle, translation: Vec3);

    fn set_rotation(&mut self, body: BodyHandle, rotation: Quat);

    /// Advance the simulation. Kinematic bodies stay where gameplay put them.
    fn step(&mut self, dt: f32);

    /// Remove `body` and its collider. Unknown handles are ignored.
    fn remove_body(&mut self, body: BodyHandle);
}
