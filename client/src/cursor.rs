//! Pointer lock: the window grabs the cursor on click while a round is running, and lets
//! it go on Escape or when the round ends. The game is told about every change.

use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow};
use game::{InputEvent, Phase};
use leafwing_input_manager::prelude::*;

use crate::input::InputAction;
use crate::sim::{Sim, SimSet};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (grab_on_click, release_on_request).in_set(SimSet::Input),
    );
}

fn set_grab(cursor: &mut CursorOptions, sim: &mut Sim, locked: bool) {
    if locked {
        cursor.grab_mode = CursorGrabMode::Locked;
        cursor.visible = false;
    } else {
        cursor.grab_mode = CursorGrabMode::None;
        cursor.visible = true;
    }
    sim.0.handle_input(InputEvent::PointerLockChanged { locked });
}

fn grab_on_click(
    actions: Res<ActionState<InputAction>>,
    mut cursor: Single<&mut CursorOptions, With<PrimaryWindow>>,
    mut sim: NonSendMut<Sim>,
) {
    if actions.just_pressed(&InputAction::LeftClick)
        && cursor.grab_mode == CursorGrabMode::None
        && sim.0.wants_pointer_lock()
    {
        set_grab(&mut cursor, &mut sim, true);
    }
}

fn release_on_request(
    actions: Res<ActionState<InputAction>>,
    mut cursor: Single<&mut CursorOptions, With<PrimaryWindow>>,
    mut sim: NonSendMut<Sim>,
) {
    if cursor.grab_mode == CursorGrabMode::None {
        return;
    }
    if actions.just_pressed(&InputAction::ReleaseCursor) || sim.0.phase() != Some(Phase::Playing)
    {
        set_grab(&mut cursor, &mut sim, false);
    }
}
