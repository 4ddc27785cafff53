/*!
Animation mixer contract and a clip-time implementation.

The gameplay core does not sample skeletons. It tells the mixer which clip to play and how to
blend it in; the mixer tracks playback time and blend weights. Hosts read them back
(`ClipMixer::actions`) to drive whatever renderer they use.
*/

use std::collections::HashMap;

use crate::assets::ModelInfo;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopMode {
    Repeat,
    /// Play once and hold the last frame.
    Once,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrossFade {
    /// Clip being faded out.
    pub from: &'static str,
    pub duration: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayParams {
    pub start_time: f32,
    pub loop_mode: LoopMode,
    pub weight: f32,
    pub time_scale: f32,
    pub cross_fade: Option<CrossFade>,
}

impl Default for PlayParams {
    fn default() -> Self {
        Self {
            start_time: 0.0,
            loop_mode: LoopMode::Repeat,
            weight: 1.0,
            time_scale: 1.0,
            cross_fade: None,
        }
    }
}

pub trait AnimationMixer {
    /// Start `clip` from `params.start_time`, optionally cross-fading from another clip.
    fn play(&mut self, clip: &'static str, params: PlayParams);

    /// Advance every running clip by `dt` seconds.
    fn advance(&mut self, dt: f32);

    /// Most recently started clip.
    fn active_clip(&self) -> Option<&'static str>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Fade {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
}

/// Playback state of one clip.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipAction {
    pub clip: &'static str,
    pub time: f32,
    pub duration: f32,
    pub loop_mode: LoopMode,
    pub time_scale: f32,
    pub weight: f32,
    pub running: bool,
    fade: Option<Fade>,
}

impl ClipAction {
    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    fn fade_to(&mut self, weight: f32, duration: f32) {
        if duration <= 0.0 {
            self.weight = weight;
            self.fade = None;
            self.running = weight > 0.0;
            return;
        }
        self.fade = Some(Fade {
            from: self.weight,
            to: weight,
            elapsed: 0.0,
            duration,
        });
    }

    fn advance(&mut self, dt: f32) {
        if !self.running {
            return;
        }

        self.time += dt * self.time_scale;
        match self.loop_mode {
            LoopMode::Repeat if self.duration > 0.0 => self.time %= self.duration,
            LoopMode::Repeat => self.time = 0.0,
            LoopMode::Once => self.time = self.time.min(self.duration),
        }

        if let Some(fade) = self.fade.as_mut() {
            fade.elapsed += dt;
            let t = (fade.elapsed / fade.duration).min(1.0);
            self.weight = fade.from + (fade.to - fade.from) * t;
            if t >= 1.0 {
                self.fade = None;
                if self.weight <= 0.0 {
                    self.running = false;
                }
            }
        }
    }
}

/// Tracks clip time and linear cross-fade weights.
#[derive(Clone, Debug, Default)]
pub struct ClipMixer {
    durations: HashMap<String, f32>,
    actions: Vec<ClipAction>,
    active: Option<&'static str>,
}

impl ClipMixer {
    pub fn new<I, S>(clips: I) -> Self
    where
        I: IntoIterator<Item = (S, f32)>,
        S: Into<String>,
    {
        Self {
            durations: clips.into_iter().map(|(n, d)| (n.into(), d)).collect(),
            actions: Vec::new(),
            active: None,
        }
    }

    pub fn from_model(model: &ModelInfo) -> Self {
        Self::new(model.animations.iter().map(|a| (a.name.clone(), a.duration)))
    }

    pub fn action(&self, clip: &str) -> Option<&ClipAction> {
        self.actions.iter().find(|a| a.clip == clip)
    }

    /// Clips that currently contribute to the pose.
    pub fn actions(&self) -> impl Iterator<Item = &ClipAction> {
        self.actions.iter().filter(|a| a.running)
    }

    fn action_mut(&mut self, clip: &str) -> Option<&mut ClipAction> {
        self.actions.iter_mut().find(|a| a.clip == clip)
    }
}

impl AnimationMixer for ClipMixer {
    fn play(&mut self, clip: &'static str, params: PlayParams) {
        let Some(duration) = self.durations.get(clip).copied() else {
            log::warn!("cannot play unknown clip `{clip}`");
            return;
        };

        if let Some(fade) = params.cross_fade {
            if let Some(from) = self.action_mut(fade.from).filter(|a| a.clip != clip) {
                from.fade_to(0.0, fade.duration);
            }
        }

        if self.action(clip).is_none() {
            self.actions.push(ClipAction {
                clip,
                time: 0.0,
                duration,
                loop_mode: params.loop_mode,
                time_scale: params.time_scale,
                weight: 0.0,
                running: false,
                fade: None,
            });
        }
        let Some(action) = self.action_mut(clip) else {
            return;
        };
        action.time = params.start_time;
        action.loop_mode = params.loop_mode;
        action.time_scale = params.time_scale;
        action.running = true;
        match params.cross_fade {
            Some(fade) => {
                action.weight = 0.0;
                action.fade_to(params.weight, fade.duration);
            }
            None => {
                action.weight = params.weight;
                action.fade = None;
            }
        }
        self.active = Some(clip);
    }

    fn advance(&mut self, dt: f32) {
        for action in &mut self.actions {
            action.advance(dt);
        }
    }

    fn active_clip(&self) -> Option<&'static str> {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixer() -> ClipMixer {
        ClipMixer::new([("Idle", 2.0), ("Running_A", 0.8), ("Jump_Land", 0.5)])
    }

    fn fade_from(from: &'static str, duration: f32) -> PlayParams {
        PlayParams {
            cross_fade: Some(CrossFade { from, duration }),
            ..PlayParams::default()
        }
    }

    #[test]
    fn first_clip_plays_at_full_weight() {
        let mut m = mixer();
        m.play("Idle", PlayParams::default());
        let idle = m.action("Idle").unwrap();
        assert_eq!(idle.weight, 1.0);
        assert!(!idle.is_fading());
        assert_eq!(m.active_clip(), Some("Idle"));
    }

    #[test]
    fn cross_fade_is_linear_and_retires_the_old_clip() {
        let mut m = mixer();
        m.play("Idle", PlayParams::default());
        m.play("Running_A", fade_from("Idle", 0.2));

        m.advance(0.1);
        assert!((m.action("Idle").unwrap().weight - 0.5).abs() < 1e-5);
        assert!((m.action("Running_A").unwrap().weight - 0.5).abs() < 1e-5);

        m.advance(0.1);
        assert!(!m.action("Idle").unwrap().running);
        assert_eq!(m.action("Running_A").unwrap().weight, 1.0);
        assert_eq!(m.actions().count(), 1);
    }

    #[test]
    fn once_clips_hold_the_last_frame() {
        let mut m = mixer();
        m.play(
            "Jump_Land",
            PlayParams {
                start_time: 0.2,
                loop_mode: LoopMode::Once,
                ..PlayParams::default()
            },
        );
        assert_eq!(m.action("Jump_Land").unwrap().time, 0.2);
        m.advance(1.0);
        assert_eq!(m.action("Jump_Land").unwrap().time, 0.5);
    }

    #[test]
    fn repeating_clips_wrap() {
        let mut m = mixer();
        m.play("Running_A", PlayParams::default());
        m.advance(1.0);
        assert!((m.action("Running_A").unwrap().time - 0.2).abs() < 1e-5);
    }

    #[test]
    fn replaying_restarts_from_the_offset() {
        let mut m = mixer();
        m.play("Idle", PlayParams::default());
        m.advance(1.5);
        m.play("Idle", PlayParams::default());
        assert_eq!(m.action("Idle").unwrap().time, 0.0);
    }

    #[test]
    fn unknown_clip_is_ignored() {
        let mut m = mixer();
        m.play("Dance", PlayParams::default());
        assert!(m.active_clip().is_none());
        assert_eq!(m.actions().count(), 0);
    }
}
