//! Procedural stand-ins for the level, the character and the coins.

use std::collections::HashMap;
use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;
use game::CoinKind;
use game::constants::{CHARACTER_RADIUS, COIN_RADIUS};
use game::physics::ColliderShapeDef;

use crate::sim::{Sim, SimSet, to_transform, to_vec3};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, (setup, spawn_level, spawn_character));
    app.add_systems(
        Update,
        (sync_character, sync_coins).in_set(SimSet::Present),
    );
}

#[derive(Component)]
struct CharacterModel;

#[derive(Component)]
struct CoinModel(u64);

#[derive(Resource)]
struct CoinAssets {
    mesh: Handle<Mesh>,
    materials: HashMap<CoinKind, Handle<StandardMaterial>>,
}

fn coin_color(kind: CoinKind) -> Color {
    match kind {
        CoinKind::High => Color::srgb(1.0, 0.78, 0.1),
        CoinKind::Mid => Color::srgb(0.8, 0.82, 0.85),
        CoinKind::Low => Color::srgb(0.72, 0.45, 0.2),
    }
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(30.0, 20.0, -10.0).looking_at(Vec3::new(20.0, 0.0, 24.0), Vec3::Y),
    ));

    let materials = CoinKind::ALL
        .into_iter()
        .map(|kind| {
            let material = materials.add(StandardMaterial {
                base_color: coin_color(kind),
                metallic: 0.9,
                perceptual_roughness: 0.3,
                ..default()
            });
            (kind, material)
        })
        .collect();
    commands.insert_resource(CoinAssets {
        mesh: meshes.add(Cylinder::new(COIN_RADIUS, 0.1)),
        materials,
    });
}

fn spawn_level(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    sim: NonSend<Sim>,
) {
    let floor = [
        materials.add(Color::srgb(0.42, 0.32, 0.22)),
        materials.add(Color::srgb(0.38, 0.29, 0.2)),
    ];
    let obstacle = materials.add(Color::srgb_u8(124, 144, 255));

    for def in sim.0.config().level.statics() {
        let ColliderShapeDef::Cuboid { half_extents } = def.shape else {
            continue;
        };
        let size = to_vec3(half_extents) * 2.0;
        let material = if def.translation.y < 0.0 {
            floor[def.id as usize % 2].clone()
        } else {
            obstacle.clone()
        };
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::from_size(size))),
            MeshMaterial3d(material),
            to_transform(&game::Transform::new(def.translation, def.rotation)),
        ));
    }
}

/// Capsule body plus a small block marking the front. The root sits at the feet.
fn spawn_character(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let height = 2.4;
    let body = meshes.add(Capsule3d::new(CHARACTER_RADIUS, height - 2.0 * CHARACTER_RADIUS));
    let visor = meshes.add(Cuboid::new(0.5, 0.2, 0.2));
    let armor = materials.add(Color::srgb(0.55, 0.58, 0.62));
    let trim = materials.add(Color::srgb(0.15, 0.2, 0.45));

    commands
        .spawn((CharacterModel, Transform::default(), Visibility::Hidden))
        .with_children(|parent| {
            parent.spawn((
                Mesh3d(body),
                MeshMaterial3d(armor),
                Transform::from_xyz(0.0, height * 0.5, 0.0),
            ));
            parent.spawn((
                Mesh3d(visor),
                MeshMaterial3d(trim),
                Transform::from_xyz(0.0, height * 0.8, CHARACTER_RADIUS),
            ));
        });
}

fn sync_character(
    character: Single<(&mut Transform, &mut Visibility), With<CharacterModel>>,
    sim: NonSend<Sim>,
) {
    let (mut transform, mut visibility) = character.into_inner();
    match sim.0.character() {
        Some(c) => {
            *transform = to_transform(c.mesh_transform());
            *visibility = Visibility::Inherited;
        }
        None => *visibility = Visibility::Hidden,
    }
}

/// Spawn, move and despawn coin entities so they match the game's live coins.
fn sync_coins(
    mut commands: Commands,
    mut models: Query<(Entity, &CoinModel, &mut Transform)>,
    assets: Res<CoinAssets>,
    sim: NonSend<Sim>,
) {
    let mut live: HashMap<u64, &game::Coin> = sim.0.coins().iter().map(|c| (c.id, c)).collect();
    let facing = Quat::from_rotation_x(FRAC_PI_2);

    for (entity, model, mut transform) in &mut models {
        match live.remove(&model.0) {
            Some(coin) => transform.translation = to_vec3(coin.position),
            None => commands.entity(entity).despawn(),
        }
    }

    for coin in live.into_values() {
        let Some(material) = assets.materials.get(&coin.kind) else {
            continue;
        };
        commands.spawn((
            CoinModel(coin.id),
            Mesh3d(assets.mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(to_vec3(coin.position)).with_rotation(facing),
        ));
    }
}
