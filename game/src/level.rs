/*!
Corridor level layout.

The level is a rectangle of square floor cells plus a couple of prototype cubes. Cell
coordinates are integers; world coordinates are `cell * cell_side`. Coins spawn at the far
Z edge and are discarded one cell past the near edge.
*/

use std::ops::RangeInclusive;

use crate::physics::{BodyHandle, ColliderShapeDef, PhysicsWorld, WorldStaticDef};
use crate::types::{Quat, Vec3};

/// Thickness of a floor tile; its top face sits at y = 0.
const FLOOR_THICKNESS: f32 = 1.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub model: &'static str,
    /// Cell the obstacle is centered on.
    pub cell: (i32, i32),
    pub half_extents: Vec3,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    pub cell_side: f32,
    /// Inclusive cell range along X.
    pub x_cells: RangeInclusive<i32>,
    /// Inclusive cell range along Z.
    pub z_cells: RangeInclusive<i32>,
    pub spawn_cell: (i32, i32),
    pub obstacles: Vec<Obstacle>,
}

impl Default for Level {
    fn default() -> Self {
        Self {
            cell_side: 4.0,
            x_cells: 0..=10,
            z_cells: 0..=12,
            spawn_cell: (5, 2),
            obstacles: vec![
                Obstacle {
                    model: "Cube_Prototype_Large_B",
                    cell: (5, 4),
                    half_extents: Vec3::new(2.0, 2.0, 2.0),
                },
                Obstacle {
                    model: "Cube_Prototype_Small",
                    cell: (7, 4),
                    half_extents: Vec3::new(1.0, 1.0, 1.0),
                },
            ],
        }
    }
}

impl Level {
    fn to_world(&self, cell: i32) -> f32 {
        cell as f32 * self.cell_side
    }

    /// Where the character's feet are placed at the start of a round.
    pub fn spawn_point(&self) -> Vec3 {
        Vec3::new(
            self.to_world(self.spawn_cell.0),
            0.0,
            self.to_world(self.spawn_cell.1),
        )
    }

    /// Integer world X values a coin may spawn at.
    pub fn coin_x_range(&self) -> RangeInclusive<i32> {
        let lo = self.to_world(*self.x_cells.start()).round() as i32;
        let hi = self.to_world(*self.x_cells.end()).round() as i32;
        lo..=hi
    }

    /// World Z coins spawn at.
    pub fn coin_spawn_z(&self) -> f32 {
        self.to_world(*self.z_cells.end())
    }

    /// Coins whose Z drops below this are discarded.
    pub fn coin_despawn_z(&self) -> f32 {
        self.to_world(*self.z_cells.start() - 1)
    }

    pub fn floor_tiles(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.x_cells
            .clone()
            .flat_map(move |x| self.z_cells.clone().map(move |z| (x, z)))
    }

    /// Collider definitions for the floor and obstacles.
    pub fn statics(&self) -> Vec<WorldStaticDef> {
        let tile = ColliderShapeDef::Cuboid {
            half_extents: Vec3::new(
                self.cell_side * 0.5,
                FLOOR_THICKNESS * 0.5,
                self.cell_side * 0.5,
            ),
        };
        let floor = self.floor_tiles().map(|(x, z)| WorldStaticDef {
            id: 0,
            translation: Vec3::new(self.to_world(x), -FLOOR_THICKNESS * 0.5, self.to_world(z)),
            rotation: Quat::identity(),
            shape: tile,
        });
        let obstacles = self.obstacles.iter().map(|o| WorldStaticDef {
            id: 0,
            translation: Vec3::new(self.to_world(o.cell.0), o.half_extents.y, self.to_world(o.cell.1)),
            rotation: Quat::identity(),
            shape: ColliderShapeDef::Cuboid {
                half_extents: o.half_extents,
            },
        });

        floor
            .chain(obstacles)
            .enumerate()
            .map(|(i, def)| WorldStaticDef { id: i as u32, ..def })
            .collect()
    }

    /// Insert the level's colliders into `physics`.
    pub fn generate(&self, physics: &mut dyn PhysicsWorld) -> Vec<BodyHandle> {
        let handles = physics.insert_statics(self.statics());
        log::info!(
            "level generated: {} floor tiles, {} obstacles",
            self.floor_tiles().count(),
            self.obstacles.len()
        );
        handles
    }
}
