//! Debug/performance tooling for native dev builds.
//!
//! On top of the perf overlay this draws the character hitbox and the coin balls used by
//! the gather test, and prints the character state and active clip.

use bevy::diagnostic::{
    EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin, SystemInformationDiagnosticsPlugin,
};
use bevy::prelude::*;
use bevy::render::diagnostic::RenderDiagnosticsPlugin;
use game::constants::COIN_RADIUS;
use iyes_perf_ui::prelude::*;

use crate::sim::{Sim, SimSet, to_vec3};

/// Add debug/perf tooling (intended for `dev_native` builds only).
pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        FrameTimeDiagnosticsPlugin::default(),
        EntityCountDiagnosticsPlugin::default(),
        SystemInformationDiagnosticsPlugin::default(),
        RenderDiagnosticsPlugin,
        PerfUiPlugin,
    ));

    app.add_systems(Startup, (spawn_perf_ui, spawn_state_label));
    app.add_systems(
        Update,
        (draw_collision_volumes, update_state_label).in_set(SimSet::Present),
    );
}

#[derive(Component)]
struct StateLabel;

fn spawn_perf_ui(mut commands: Commands) {
    commands.spawn(PerfUiAllEntries::default());
}

fn spawn_state_label(mut commands: Commands) {
    commands.spawn((
        StateLabel,
        Text::default(),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(8.0),
            left: Val::Px(8.0),
            ..default()
        },
    ));
}

fn draw_collision_volumes(mut gizmos: Gizmos, sim: NonSend<Sim>) {
    if let Some(character) = sim.0.character() {
        let hitbox = character.hitbox();
        let size = to_vec3(hitbox.max - hitbox.min);
        gizmos.cuboid(
            Transform::from_translation(to_vec3(hitbox.center())).with_scale(size),
            Color::srgb(0.1, 1.0, 0.3),
        );
    }
    for coin in sim.0.coins() {
        gizmos.sphere(to_vec3(coin.position), COIN_RADIUS, Color::srgb(1.0, 0.3, 0.1));
    }
}

fn update_state_label(mut label: Single<&mut Text, With<StateLabel>>, sim: NonSend<Sim>) {
    let wanted = match sim.0.character() {
        Some(character) => format!(
            "{:?} / {:?} / clip {}",
            sim.0.phase(),
            character.state_id(),
            character.mixer().active_clip().unwrap_or("-"),
        ),
        None => format!("{:?}", sim.0.phase()),
    };
    if label.0 != wanted {
        label.0 = wanted;
    }
}
