//! Owns the gameplay core and ticks it once per frame.
//!
//! Everything else in the client either feeds input into [`Sim`] or mirrors its state
//! onto Bevy entities.

use bevy::prelude::*;
use game::assets::{CHARACTER_MODEL, ClipInfo, PROP_MODELS};
use game::character::CLIPS;
use game::{
    Game, GameConfig, KeyValueStore, MemoryStore, ModelInfo, PreloadedAssets, RapierPhysics,
    ThirdPersonControls,
};

use crate::storage::FileStore;

/// The game holds boxed trait objects that are not `Send`, so it lives as a non-send
/// resource and every system touching it runs on the main thread.
pub struct Sim(pub Game);

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    /// Forward input into the game.
    Input,
    Tick,
    /// Mirror game state onto entities.
    Present,
}

pub(super) fn plugin(app: &mut App) {
    app.insert_non_send_resource(Sim(build_game(GameConfig::default())));
    app.configure_sets(
        Update,
        (SimSet::Input, SimSet::Tick, SimSet::Present).chain(),
    );
    app.add_systems(Update, tick.in_set(SimSet::Tick));
}

fn build_game(config: GameConfig) -> Game {
    let store: Box<dyn KeyValueStore> = match FileStore::open_default() {
        Ok(store) => Box::new(store),
        Err(err) => {
            log::warn!("personal best will not be saved: {err}");
            Box::new(MemoryStore::default())
        }
    };
    Game::new(
        config.clone(),
        Box::new(RapierPhysics::new(config.kcc)),
        Box::new(model_catalog()),
        Box::new(ThirdPersonControls::new()),
        store,
    )
}

/// Metadata for the procedural meshes the client draws in place of the glTF models.
fn model_catalog() -> PreloadedAssets {
    let knight = ModelInfo {
        name: CHARACTER_MODEL.to_string(),
        size: game::Vec3::new(1.4, 2.4, 1.0),
        animations: CLIPS
            .iter()
            .map(|&name| ClipInfo {
                name: name.to_string(),
                duration: clip_duration(name),
            })
            .collect(),
    };

    let mut catalog = PreloadedAssets::new([knight]);
    for name in PROP_MODELS {
        let size = match name {
            "Floor_Dirt" => game::Vec3::new(4.0, 0.1, 4.0),
            "Cube_Prototype_Large_B" => game::Vec3::new(4.0, 4.0, 4.0),
            "Cube_Prototype_Small" => game::Vec3::new(2.0, 2.0, 2.0),
            _ => game::Vec3::new(1.0, 1.0, 0.2),
        };
        catalog.insert(ModelInfo {
            name: name.to_string(),
            size,
            animations: Vec::new(),
        });
    }
    catalog
}

fn clip_duration(clip: &str) -> f32 {
    match clip {
        "Idle" => 2.0,
        "Jump_Start" | "Jump_Land" => 0.4,
        "Jump_Idle" => 0.8,
        _ => 0.75,
    }
}

fn tick(time: Res<Time>, mut sim: NonSendMut<Sim>) {
    sim.0.tick(time.delta_secs());
}

pub fn to_vec3(v: game::Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub fn to_quat(q: game::Quat) -> Quat {
    let c = q.quaternion().coords;
    Quat::from_xyzw(c.x, c.y, c.z, c.w)
}

pub fn to_transform(t: &game::Transform) -> Transform {
    Transform::from_translation(to_vec3(t.translation)).with_rotation(to_quat(t.rotation))
}
