use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;
use game::{InputEvent, Key};
use leafwing_input_manager::prelude::*;

use crate::sim::{Sim, SimSet};

#[derive(Reflect, Actionlike, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputAction {
    Forward,
    Backward,
    Left,
    Right,
    Jump,
    Start,
    LeftClick,
    ReleaseCursor,
}

const MOVEMENT: [(InputAction, Key); 5] = [
    (InputAction::Forward, Key::Forward),
    (InputAction::Backward, Key::Backward),
    (InputAction::Left, Key::Left),
    (InputAction::Right, Key::Right),
    (InputAction::Jump, Key::Jump),
];

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(InputManagerPlugin::<InputAction>::default());

    app.register_type::<InputAction>();
    app.insert_resource(default_input_map());
    app.insert_resource(ActionState::<InputAction>::default());

    app.add_systems(
        Update,
        (forward_keys, forward_pointer_motion).in_set(SimSet::Input),
    );
}

fn default_input_map() -> InputMap<InputAction> {
    let mut input_map = InputMap::new([
        (InputAction::Forward, KeyCode::KeyW),
        (InputAction::Forward, KeyCode::ArrowUp),
        (InputAction::Backward, KeyCode::KeyS),
        (InputAction::Backward, KeyCode::ArrowDown),
        (InputAction::Left, KeyCode::KeyA),
        (InputAction::Left, KeyCode::ArrowLeft),
        (InputAction::Right, KeyCode::KeyD),
        (InputAction::Right, KeyCode::ArrowRight),
        (InputAction::Jump, KeyCode::Space),
        (InputAction::Start, KeyCode::Enter),
        (InputAction::ReleaseCursor, KeyCode::Escape),
    ]);
    input_map.insert(InputAction::LeftClick, MouseButton::Left);
    input_map
}

/// Translate action edges into key events; the game keeps its own held-key state.
fn forward_keys(actions: Res<ActionState<InputAction>>, mut sim: NonSendMut<Sim>) {
    for (action, key) in MOVEMENT {
        if actions.just_pressed(&action) {
            sim.0.handle_input(InputEvent::KeyDown(key));
        }
        if actions.just_released(&action) {
            sim.0.handle_input(InputEvent::KeyUp(key));
        }
    }

    if actions.just_pressed(&InputAction::Start) && sim.0.start() {
        log::info!("round started");
    }
}

fn forward_pointer_motion(motion: Res<AccumulatedMouseMotion>, mut sim: NonSendMut<Sim>) {
    if motion.delta.x != 0.0 {
        sim.0.handle_input(InputEvent::PointerMoved { dx: motion.delta.x });
    }
}
