/*!
Third-person controls.

Translates raw input (logical keys, pointer motion) into:
- a movement vector in the character's local frame: `z = ±1` forward/backward,
  `x = ±1` left/right (left is +X), `y = 2` while jump is held;
- a facing quaternion driven by pointer yaw;
- a follow camera placed relative to the character.

Pressing a key clears its opposite (last pressed wins). Locked axes read as zero.
While disabled the movement vector is zero and the camera looks back at the character.
*/

use crate::constants::{CAMERA_LERP, MOUSE_SENSITIVITY};
use crate::types::{Quat, Transform, Vec3};

/// Logical movement keys. Hosts map physical keys onto these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Forward,
    Backward,
    Left,
    Right,
    Jump,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Horizontal pointer motion in pixels.
    PointerMoved { dx: f32 },
    PointerLockChanged { locked: bool },
}

/// Held movement keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirectionIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl DirectionIntent {
    pub fn press(&mut self, key: Key) {
        match key {
            Key::Forward => {
                self.forward = true;
                self.backward = false;
            }
            Key::Backward => {
                self.backward = true;
                self.forward = false;
            }
            Key::Left => {
                self.left = true;
                self.right = false;
            }
            Key::Right => {
                self.right = true;
                self.left = false;
            }
            Key::Jump => self.jump = true,
        }
    }

    pub fn release(&mut self, key: Key) {
        match key {
            Key::Forward => self.forward = false,
            Key::Backward => self.backward = false,
            Key::Left => self.left = false,
            Key::Right => self.right = false,
            Key::Jump => self.jump = false,
        }
    }

    /// Local-frame movement vector with `locks` applied.
    pub fn movement_vector(&self, locks: AxisLocks) -> Vec3 {
        let z = if self.forward {
            1.0
        } else if self.backward {
            -1.0
        } else {
            0.0
        };
        let x = if self.left {
            1.0
        } else if self.right {
            -1.0
        } else {
            0.0
        };
        let y = if self.jump { 2.0 } else { 0.0 };

        Vec3::new(
            if locks.x { 0.0 } else { x },
            if locks.y { 0.0 } else { y },
            if locks.z { 0.0 } else { z },
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AxisLocks {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl AxisLocks {
    pub const NONE: Self = Self {
        x: false,
        y: false,
        z: false,
    };
    pub const ALL: Self = Self {
        x: true,
        y: true,
        z: true,
    };
}

/// Follow camera. `look_at` is the point the camera is aimed at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraRig {
    pub position: Vec3,
    pub look_at: Vec3,
    /// Face the character from the front instead of following over the shoulder.
    pub look_backward: bool,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 4.0, -4.0),
            look_at: Vec3::zeros(),
            look_backward: true,
        }
    }
}

impl CameraRig {
    fn offsets(&self) -> (Vec3, Vec3) {
        if self.look_backward {
            (Vec3::new(0.0, 2.0, 5.0), Vec3::new(0.0, 0.0, -20.0))
        } else {
            (Vec3::new(-2.0, 4.0, -4.0), Vec3::new(0.0, 0.0, 20.0))
        }
    }

    /// Ease toward the target-relative offset.
    pub fn follow(&mut self, target: &Transform) {
        let (offset, look) = self.offsets();
        let desired = target.translation + target.rotation * offset;
        self.position = self.position.lerp(&desired, CAMERA_LERP);
        self.look_at = target.translation + target.rotation * look;
    }

    /// Jump straight to the target-relative offset.
    pub fn snap(&mut self, target: &Transform) {
        let (offset, look) = self.offsets();
        self.position = target.translation + target.rotation * offset;
        self.look_at = target.translation + target.rotation * look;
    }
}

/// What the character needs from a control scheme.
pub trait ControlScheme {
    fn enable(&mut self);

    fn disable(&mut self);

    fn set_axis_locks(&mut self, locks: AxisLocks);

    fn handle(&mut self, event: InputEvent);

    /// Recompute the movement vector from the held keys. Called once per tick.
    fn update(&mut self);

    fn movement_vector(&self) -> Vec3;

    fn facing(&self) -> Quat;

    /// Adopt `target`'s orientation as the facing and snap the camera onto it.
    fn assign_target(&mut self, target: &Transform);

    fn update_camera(&mut self, target: &Transform);

    fn camera(&self) -> &CameraRig;

    fn is_enabled(&self) -> bool;

    /// True when a click should capture the pointer.
    fn wants_pointer_lock(&self) -> bool;
}

#[derive(Clone, Debug)]
pub struct ThirdPersonControls {
    intent: DirectionIntent,
    locks: AxisLocks,
    enabled: bool,
    pointer_locked: bool,
    yaw: f32,
    movement: Vec3,
    camera: CameraRig,
}

impl Default for ThirdPersonControls {
    fn default() -> Self {
        let mut controls = Self {
            intent: DirectionIntent::default(),
            locks: AxisLocks::NONE,
            enabled: true,
            pointer_locked: false,
            yaw: 0.0,
            movement: Vec3::zeros(),
            camera: CameraRig::default(),
        };
        controls.disable();
        controls
    }
}

impl ThirdPersonControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }
}

impl ControlScheme for ThirdPersonControls {
    fn enable(&mut self) {
        self.enabled = true;
        self.locks = AxisLocks::NONE;
        self.camera.look_backward = false;
    }

    fn disable(&mut self) {
        self.enabled = false;
        self.locks = AxisLocks::ALL;
        self.movement = Vec3::zeros();
        self.camera.look_backward = true;
    }

    fn set_axis_locks(&mut self, locks: AxisLocks) {
        self.locks = locks;
    }

    fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(key) => self.intent.press(key),
            InputEvent::KeyUp(key) => self.intent.release(key),
            InputEvent::PointerMoved { dx } => {
                if self.enabled && self.pointer_locked {
                    self.yaw -= dx * MOUSE_SENSITIVITY;
                }
            }
            InputEvent::PointerLockChanged { locked } => self.pointer_locked = locked,
        }
    }

    fn update(&mut self) {
        self.movement = if self.enabled {
            self.intent.movement_vector(self.locks)
        } else {
            Vec3::zeros()
        };
    }

    fn movement_vector(&self) -> Vec3 {
        self.movement
    }

    fn facing(&self) -> Quat {
        Quat::from_axis_angle(&Vec3::y_axis(), self.yaw)
    }

    fn assign_target(&mut self, target: &Transform) {
        self.yaw = yaw_of(&target.rotation);
        self.camera.snap(target);
    }

    fn update_camera(&mut self, target: &Transform) {
        self.camera.follow(target);
    }

    fn camera(&self) -> &CameraRig {
        &self.camera
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn wants_pointer_lock(&self) -> bool {
        self.enabled && !self.pointer_locked
    }
}

/// Yaw (rotation about +Y) of `rotation`'s forward axis.
pub fn yaw_of(rotation: &Quat) -> f32 {
    let forward = rotation * Vec3::z();
    forward.x.atan2(forward.z)
}
