/// Horizontal speed of the character while a locomotion key is held (units per second).
pub const CHARACTER_SPEED: f32 = 6.0;

/// Fraction of the remaining angle covered each tick when the character turns
/// toward the controls' facing.
pub const ORIENTATION_SLERP_FACTOR: f32 = 0.05;

/// Constant downward velocity applied in every grounded state and used as the
/// terminal velocity of a jump (units per second).
pub const FALLING_VELOCITY: f32 = -4.0;

/// Upward velocity given to the character when the jump state is entered.
pub const JUMP_LAUNCH_SPEED: f32 = 3.0;

/// Amount removed from the jump's vertical velocity on every tick.
///
/// Per tick rather than per second: the arc shape depends on the frame rate,
/// which is why the driver clamps `dt` to [`MAX_FRAME_DT_S`].
pub const JUMP_DECELERATION: f32 = 0.12;

/// Horizontal velocity captured at launch is scaled by this factor for the whole jump.
pub const JUMP_HORIZONTAL_BOOST: f32 = 1.25;

/// Radius of the character's capsule collider.
pub const CHARACTER_RADIUS: f32 = 0.5;

/// Half width (X and Z) of the box used to gather coins.
pub const HITBOX_HALF_WIDTH: f32 = 0.7;

/// Coins travel toward -Z at this speed (units per second).
pub const COIN_SPEED: f32 = 7.0;

/// Radius of a coin's sensor ball.
pub const COIN_RADIUS: f32 = 0.5;

/// Range of the delay between two coin spawns (seconds).
pub const COIN_SPAWN_INTERVAL_S: std::ops::Range<f32> = 0.5..1.0;

/// Inclusive range of integer heights a coin may spawn at.
pub const COIN_SPAWN_HEIGHT: std::ops::RangeInclusive<i32> = 1..=4;

/// Length of a round.
pub const PLAYING_DURATION_S: f32 = 60.0;

/// How long the game-over panel stays up before returning to idle.
pub const GAME_OVER_DURATION_S: f32 = 5.0;

/// Radians of yaw per pixel of pointer motion.
pub const MOUSE_SENSITIVITY: f32 = 0.003;

/// Per-tick interpolation factor of the follow camera.
pub const CAMERA_LERP: f32 = 0.05;

/// Largest frame delta fed to the simulation (seconds).
///
/// A stalled frame (window dragged, tab hidden) would otherwise make the character
/// and coins tunnel through geometry.
pub const MAX_FRAME_DT_S: f32 = 0.10;

/// Key under which the personal best is persisted.
pub const PERSONAL_BEST_KEY: &str = "personal-best";
