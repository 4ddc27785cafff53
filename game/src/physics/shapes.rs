use rapier3d::prelude::*;

use crate::types::{Quat, Vec3};

/// Definition of an immutable world collider (floor tile, obstacle).
#[derive(Clone, Debug, PartialEq)]
pub struct WorldStaticDef {
    /// Stable unique identifier used to ensure deterministic insertion order.
    pub id: u32,
    /// World-space translation.
    pub translation: Vec3,
    /// World-space rotation (unit quaternion).
    pub rotation: Quat,
    /// Collider shape parameters.
    pub shape: ColliderShapeDef,
}

/// Supported collider shapes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColliderShapeDef {
    /// Oriented cuboid with given half-extents.
    Cuboid { half_extents: Vec3 },

    /// Sphere/ball.
    Sphere { radius: f32 },

    /// Y-aligned capsule. `half_height` excludes the hemispherical caps.
    CapsuleY { radius: f32, half_height: f32 },
}

impl ColliderShapeDef {
    /// Distance from the shape's center to its lowest point.
    pub fn half_extent_y(&self) -> f32 {
        match self {
            ColliderShapeDef::Cuboid { half_extents } => half_extents.y,
            ColliderShapeDef::Sphere { radius } => *radius,
            ColliderShapeDef::CapsuleY {
                radius,
                half_height,
            } => half_height + radius,
        }
    }
}

/// Build a Rapier collider for `shape`.
///
/// The pose lives on the parent rigid-body, so the collider has an identity local transform.
pub(crate) fn collider_from_shape(shape: &ColliderShapeDef, sensor: bool) -> Collider {
    let builder = match shape {
        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }

        ColliderShapeDef::Sphere { radius } => ColliderBuilder::ball(*radius),

        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => ColliderBuilder::capsule_y(*half_height, *radius),
    };
    builder.sensor(sensor).build()
}
