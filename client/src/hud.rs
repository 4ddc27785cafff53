//! Bevy UI mirror of the game's panels and text slots.

use bevy::prelude::*;
use game::{Panel, TextSlot};

use crate::sim::{Sim, SimSet};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_hud);
    app.add_systems(
        Update,
        (sync_panels, sync_texts, show_failure).in_set(SimSet::Present),
    );
}

#[derive(Component)]
struct HudPanel(Panel);

/// Text fed from a game slot, shown after `label`.
#[derive(Component)]
struct HudText {
    slot: TextSlot,
    label: &'static str,
}

#[derive(Component)]
struct FailureText;

fn overlay(panel: Panel, justify: JustifyContent) -> impl Bundle {
    (
        HudPanel(panel),
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            flex_direction: FlexDirection::Column,
            justify_content: justify,
            align_items: AlignItems::Center,
            row_gap: Val::Px(12.0),
            padding: UiRect::all(Val::Px(24.0)),
            display: Display::None,
            ..default()
        },
    )
}

fn label(text: impl Into<String>, size: f32) -> impl Bundle {
    (
        Text::new(text),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(Color::WHITE),
    )
}

fn slot(slot: TextSlot, label_text: &'static str, size: f32) -> impl Bundle {
    (
        HudText {
            slot,
            label: label_text,
        },
        label(label_text, size),
    )
}

fn spawn_hud(mut commands: Commands) {
    commands
        .spawn(overlay(Panel::Loading, JustifyContent::Center))
        .with_children(|parent| {
            parent.spawn(label("Loading...", 40.0));
            parent.spawn((FailureText, label("", 20.0)));
        });

    commands
        .spawn((
            overlay(Panel::Start, JustifyContent::Center),
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.35)),
        ))
        .with_children(|parent| {
            parent.spawn(label("Coin Dash", 64.0));
            parent.spawn(label("Press Enter to start", 28.0));
            parent.spawn(label(
                "WASD or arrows to move, Space to jump, click to steer with the mouse",
                18.0,
            ));
            parent.spawn(slot(TextSlot::PersonalBest, "Personal best: ", 24.0));
        });

    commands
        .spawn(overlay(Panel::Playing, JustifyContent::FlexStart))
        .with_children(|parent| {
            parent.spawn(slot(TextSlot::Timer, "Time: ", 28.0));
            parent.spawn(slot(TextSlot::Score, "Score: ", 28.0));
        });

    commands
        .spawn((
            overlay(Panel::GameOver, JustifyContent::Center),
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
        ))
        .with_children(|parent| {
            parent.spawn(label("Game over", 64.0));
            parent.spawn(slot(TextSlot::Score, "Score: ", 32.0));
            parent.spawn(slot(TextSlot::PersonalBest, "Personal best: ", 24.0));
        });
}

fn sync_panels(mut panels: Query<(&HudPanel, &mut Node)>, sim: NonSend<Sim>) {
    for (panel, mut node) in &mut panels {
        let display = if sim.0.ui().is_visible(panel.0) {
            Display::Flex
        } else {
            Display::None
        };
        if node.display != display {
            node.display = display;
        }
    }
}

fn sync_texts(mut texts: Query<(&HudText, &mut Text)>, sim: NonSend<Sim>) {
    for (hud, mut text) in &mut texts {
        let value = sim.0.ui().text(hud.slot).unwrap_or_default();
        let wanted = format!("{}{value}", hud.label);
        if text.0 != wanted {
            text.0 = wanted;
        }
    }
}

fn show_failure(mut text: Single<&mut Text, With<FailureText>>, sim: NonSend<Sim>) {
    if let Some(err) = sim.0.failure() {
        let wanted = err.to_string();
        if text.0 != wanted {
            text.0 = wanted;
        }
    }
}
