/*!
Kinematic character controller (KCC) settings.

Distances are world units, angles degrees. Defaults suit the knight capsule
(radius 0.5, total height ~2.4) walking on one-unit-thick floor tiles.
*/

use rapier3d::control::{CharacterAutostep, CharacterLength, KinematicCharacterController};

/// Tuning for rapier's [`KinematicCharacterController`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KccSettings {
    /// Gap kept between the character and surfaces.
    /// Too large creates visible gaps; too small risks jitter on contact.
    pub offset: f32,
    /// Steepest slope the character may walk up.
    pub max_slope_climb_deg: f32,
    /// Slopes steeper than this make the character slide down.
    pub min_slope_slide_deg: f32,
    /// Highest step climbed automatically; `0.0` disables autostep.
    pub autostep_max_height: f32,
    pub autostep_min_width: f32,
    /// Slide along obstacles instead of stopping dead.
    pub slide: bool,
    pub normal_nudge_factor: f32,
}

impl Default for KccSettings {
    fn default() -> Self {
        Self {
            offset: 0.01,
            max_slope_climb_deg: 45.0,
            min_slope_slide_deg: 30.0,
            autostep_max_height: 0.3,
            autostep_min_width: 0.2,
            slide: true,
            normal_nudge_factor: 1.0e-4,
        }
    }
}

impl KccSettings {
    pub fn controller(&self) -> KinematicCharacterController {
        let autostep = (self.autostep_max_height > 0.0).then_some(CharacterAutostep {
            max_height: CharacterLength::Absolute(self.autostep_max_height),
            min_width: CharacterLength::Absolute(self.autostep_min_width),
            include_dynamic_bodies: false,
        });

        KinematicCharacterController {
            offset: CharacterLength::Absolute(self.offset),
            slide: self.slide,
            autostep,
            max_slope_climb_angle: self.max_slope_climb_deg.to_radians(),
            min_slope_slide_angle: self.min_slope_slide_deg.to_radians(),
            // Jumps are scripted; snapping would cut the start of a descent short.
            snap_to_ground: None,
            normal_nudge_factor: self.normal_nudge_factor,
            ..KinematicCharacterController::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_step_height_disables_autostep() {
        let settings = KccSettings {
            autostep_max_height: 0.0,
            ..KccSettings::default()
        };
        assert!(settings.controller().autostep.is_none());
        assert!(KccSettings::default().controller().autostep.is_some());
    }

    #[test]
    fn angles_are_converted_to_radians() {
        let kcc = KccSettings::default().controller();
        assert!((kcc.max_slope_climb_angle - std::f32::consts::FRAC_PI_4).abs() < 1e-6);
    }
}
