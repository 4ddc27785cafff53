use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::prelude::*;

use crate::sim::{Sim, SimSet, to_vec3};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, add_camera);
    app.add_systems(Update, follow_rig.in_set(SimSet::Present));
}

fn add_camera(mut commands: Commands) {
    commands.spawn((
        Tonemapping::AcesFitted,
        Camera3d::default(),
        Transform::from_xyz(20.0, 4.0, 4.0).looking_at(Vec3::new(20.0, 0.0, 8.0), Vec3::Y),
        DistanceFog {
            color: Color::srgba(0.35, 0.48, 0.66, 1.0),
            directional_light_color: Color::srgba(1.0, 0.95, 0.85, 0.5),
            directional_light_exponent: 30.0,
            falloff: FogFalloff::from_visibility_colors(
                120.0, // Fog distance
                Color::srgb(0.35, 0.5, 0.66),
                Color::srgb(0.8, 0.8, 0.7),
            ),
        },
    ));
}

/// The game's rig already eases toward its target; the camera copies it as is.
fn follow_rig(mut camera: Single<&mut Transform, With<Camera3d>>, sim: NonSend<Sim>) {
    let rig = sim.0.camera();
    let position = to_vec3(rig.position);
    let look_at = to_vec3(rig.look_at);
    if position.distance_squared(look_at) < f32::EPSILON {
        return;
    }
    **camera = Transform::from_translation(position).looking_at(look_at, Vec3::Y);
}
