/*!
Math aliases and small value types shared by the gameplay modules.

Conventions
- Units are world units (the corridor is laid out in cells of `Level::cell_side`).
- +Y is up, +Z is "forward" for a character with identity rotation.
*/

use nalgebra as na;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;

/// Position + orientation pair, used for bodies, meshes and camera targets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Transform {
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self::new(translation, Quat::identity())
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::from_translation(Vec3::zeros())
    }
}

/// Axis-aligned box in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// True when the sphere touches or overlaps the box.
    pub fn intersects_sphere(&self, center: &Vec3, radius: f32) -> bool {
        let closest = Vec3::new(
            center.x.clamp(self.min.x, self.max.x),
            center.y.clamp(self.min.y, self.max.y),
            center.z.clamp(self.min.z, self.max.z),
        );
        (closest - center).norm_squared() <= radius * radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::from_center_half_extents(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.5, 1.0, 0.5))
    }

    #[test]
    fn box_is_centered_on_its_origin() {
        let b = unit_box();
        assert_eq!(b.center(), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(b.min, Vec3::new(-0.5, 0.0, -0.5));
        assert_eq!(b.max, Vec3::new(0.5, 2.0, 0.5));
    }

    #[test]
    fn sphere_overlap_uses_closest_point() {
        let b = unit_box();
        // Inside.
        assert!(b.intersects_sphere(&Vec3::new(0.0, 1.0, 0.0), 0.1));
        // Touching the +X face.
        assert!(b.intersects_sphere(&Vec3::new(1.0, 1.0, 0.0), 0.5));
        // Near a corner but out of reach diagonally.
        assert!(!b.intersects_sphere(&Vec3::new(1.0, 2.5, 1.0), 0.5));
        // Far away along Z.
        assert!(!b.intersects_sphere(&Vec3::new(0.0, 1.0, 3.0), 0.5));
    }
}
