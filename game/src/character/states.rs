/*!
Character locomotion states.

Transitions are driven by the single active [`Direction`], evaluated in a fixed order:
jump, then the state's own direction, then the other directions. Because at most one
direction is active, a locomotion state either starts a jump, stays, or drops to idle;
idle fans out to every locomotion state.

The jump has three phases:
- `StartingJump` plays the take-off clip for a fixed time, still on the ground.
- `Jumping` carries a launch velocity captured on entry. Vertical velocity starts at
  [`JUMP_LAUNCH_SPEED`] and loses [`JUMP_DECELERATION`] every tick down to
  [`FALLING_VELOCITY`]. Once descending, the jump ends on the first sweep that stops
  on the ground. A small free-air displacement near the apex is not a landing.
- `LandingJump` plays the landing clip for a fixed time.
*/

use crate::animation::{AnimationMixer, CrossFade, LoopMode, PlayParams};
use crate::constants::{FALLING_VELOCITY, JUMP_DECELERATION, JUMP_HORIZONTAL_BOOST, JUMP_LAUNCH_SPEED};
use crate::fsm::{State, StateMachine};
use crate::physics::Sweep;
use crate::types::Vec3;

/// Time spent in the take-off state before the character leaves the ground.
pub const STARTING_JUMP_DURATION_S: f32 = 0.2;
/// Time spent in the landing state before returning to idle.
pub const LANDING_DURATION_S: f32 = 0.1;

/// Clip names every character model must provide.
pub const CLIPS: [&str; 8] = [
    "Idle",
    "Running_A",
    "Running_Strafe_Left",
    "Running_Strafe_Right",
    "Walking_Backwards",
    "Jump_Start",
    "Jump_Idle",
    "Jump_Land",
];

/// The one movement direction currently requested.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    None,
    Jump,
    Forward,
    Backward,
    Left,
    Right,
}

impl Direction {
    /// Derive the exclusive direction from a control movement vector.
    /// Priority: jump, forward, backward, left, right.
    pub fn from_movement(v: &Vec3) -> Self {
        if v.y > 1.0 {
            Direction::Jump
        } else if v.z > 0.5 {
            Direction::Forward
        } else if v.z < -0.5 {
            Direction::Backward
        } else if v.x > 0.5 {
            Direction::Left
        } else if v.x < -0.5 {
            Direction::Right
        } else {
            Direction::None
        }
    }
}

/// Per-tick inputs handed to the character states.
pub struct CharacterContext<'a> {
    pub mixer: &'a mut dyn AnimationMixer,
    pub direction: Direction,
    /// World-space horizontal velocity the controls ask for this tick.
    pub intent_velocity: Vec3,
    /// Sweep performed earlier in this tick.
    pub last_sweep: Sweep,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CharacterStateId {
    Idle,
    Running,
    StrafingLeft,
    StrafingRight,
    WalkingBackward,
    StartingJump,
    Jumping,
    LandingJump,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct JumpArc {
    /// Horizontal velocity held for the whole jump.
    pub launch: Vec3,
    pub vertical_velocity: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CharacterState {
    Idle,
    Running,
    StrafingLeft,
    StrafingRight,
    WalkingBackward,
    StartingJump { elapsed: f32 },
    Jumping(JumpArc),
    LandingJump { elapsed: f32 },
}

/// Clip played by a state and how it is blended in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipSpec {
    pub name: &'static str,
    pub loop_mode: LoopMode,
    pub start_time: f32,
    pub transition: f32,
}

const fn looping(name: &'static str, transition: f32) -> ClipSpec {
    ClipSpec {
        name,
        loop_mode: LoopMode::Repeat,
        start_time: 0.0,
        transition,
    }
}

impl CharacterState {
    pub fn register(machine: &mut StateMachine<Self>) {
        machine
            .add_state(CharacterStateId::Idle, || CharacterState::Idle)
            .add_state(CharacterStateId::Running, || CharacterState::Running)
            .add_state(CharacterStateId::StrafingLeft, || CharacterState::StrafingLeft)
            .add_state(CharacterStateId::StrafingRight, || CharacterState::StrafingRight)
            .add_state(CharacterStateId::WalkingBackward, || {
                CharacterState::WalkingBackward
            })
            .add_state(CharacterStateId::StartingJump, || {
                CharacterState::StartingJump { elapsed: 0.0 }
            })
            .add_state(CharacterStateId::Jumping, || {
                CharacterState::Jumping(JumpArc::default())
            })
            .add_state(CharacterStateId::LandingJump, || {
                CharacterState::LandingJump { elapsed: 0.0 }
            });
    }

    pub fn clip(&self) -> ClipSpec {
        match self {
            CharacterState::Idle => looping("Idle", 0.2),
            CharacterState::Running => looping("Running_A", 0.2),
            CharacterState::StrafingLeft => looping("Running_Strafe_Left", 0.2),
            CharacterState::StrafingRight => looping("Running_Strafe_Right", 0.2),
            CharacterState::WalkingBackward => looping("Walking_Backwards", 0.2),
            CharacterState::StartingJump { .. } => ClipSpec {
                loop_mode: LoopMode::Once,
                ..looping("Jump_Start", 0.1)
            },
            CharacterState::Jumping(_) => looping("Jump_Idle", 0.1),
            CharacterState::LandingJump { .. } => ClipSpec {
                loop_mode: LoopMode::Once,
                start_time: 0.2,
                ..looping("Jump_Land", 0.1)
            },
        }
    }

    /// Velocity the character should sweep with this tick.
    pub fn velocity(&self, intent: Vec3) -> Vec3 {
        match self {
            CharacterState::Jumping(arc) => arc.launch + Vec3::y() * arc.vertical_velocity,
            _ => intent + Vec3::y() * FALLING_VELOCITY,
        }
    }

    pub fn jump_arc(&self) -> Option<&JumpArc> {
        match self {
            CharacterState::Jumping(arc) => Some(arc),
            _ => None,
        }
    }
}

/// Shared rule of the four locomotion states.
fn locomotion(direction: Direction, own: Direction) -> Option<CharacterStateId> {
    if direction == Direction::Jump {
        Some(CharacterStateId::StartingJump)
    } else if direction != own {
        Some(CharacterStateId::Idle)
    } else {
        None
    }
}

impl State for CharacterState {
    type Id = CharacterStateId;
    type Context<'a> = CharacterContext<'a>;

    fn id(&self) -> CharacterStateId {
        match self {
            CharacterState::Idle => CharacterStateId::Idle,
            CharacterState::Running => CharacterStateId::Running,
            CharacterState::StrafingLeft => CharacterStateId::StrafingLeft,
            CharacterState::StrafingRight => CharacterStateId::StrafingRight,
            CharacterState::WalkingBackward => CharacterStateId::WalkingBackward,
            CharacterState::StartingJump { .. } => CharacterStateId::StartingJump,
            CharacterState::Jumping(_) => CharacterStateId::Jumping,
            CharacterState::LandingJump { .. } => CharacterStateId::LandingJump,
        }
    }

    fn enter(&mut self, ctx: &mut CharacterContext<'_>, previous: Option<&Self>) {
        if let CharacterState::Jumping(arc) = self {
            arc.launch = ctx.intent_velocity * JUMP_HORIZONTAL_BOOST;
            arc.vertical_velocity = JUMP_LAUNCH_SPEED;
        }

        let clip = self.clip();
        let cross_fade = previous.map(|prev| CrossFade {
            from: prev.clip().name,
            duration: clip.transition,
        });
        // The clip offset only applies when coming from another state.
        let start_time = if previous.is_some() { clip.start_time } else { 0.0 };
        ctx.mixer.play(
            clip.name,
            PlayParams {
                start_time,
                loop_mode: clip.loop_mode,
                weight: 1.0,
                time_scale: 1.0,
                cross_fade,
            },
        );
    }

    fn update(
        &mut self,
        ctx: &mut CharacterContext<'_>,
        dt: f32,
        _elapsed: f32,
    ) -> Option<CharacterStateId> {
        let direction = ctx.direction;
        match self {
            CharacterState::Idle => match direction {
                Direction::Jump => Some(CharacterStateId::StartingJump),
                Direction::Forward => Some(CharacterStateId::Running),
                Direction::Backward => Some(CharacterStateId::WalkingBackward),
                Direction::Left => Some(CharacterStateId::StrafingLeft),
                Direction::Right => Some(CharacterStateId::StrafingRight),
                Direction::None => None,
            },
            CharacterState::Running => locomotion(direction, Direction::Forward),
            CharacterState::WalkingBackward => locomotion(direction, Direction::Backward),
            CharacterState::StrafingLeft => locomotion(direction, Direction::Left),
            CharacterState::StrafingRight => locomotion(direction, Direction::Right),
            CharacterState::StartingJump { elapsed } => {
                *elapsed += dt;
                (*elapsed > STARTING_JUMP_DURATION_S).then_some(CharacterStateId::Jumping)
            }
            CharacterState::Jumping(arc) => {
                if arc.vertical_velocity < 0.0 && ctx.last_sweep.grounded {
                    return Some(CharacterStateId::LandingJump);
                }
                arc.vertical_velocity =
                    (arc.vertical_velocity - JUMP_DECELERATION).max(FALLING_VELOCITY);
                None
            }
            CharacterState::LandingJump { elapsed } => {
                *elapsed += dt;
                (*elapsed > LANDING_DURATION_S).then_some(CharacterStateId::Idle)
            }
        }
    }
}
