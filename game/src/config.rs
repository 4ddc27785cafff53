use crate::constants::{GAME_OVER_DURATION_S, PLAYING_DURATION_S};
use crate::level::Level;
use crate::physics::KccSettings;

/// Knobs a host may override when building a [`crate::Game`].
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub level: Level,
    pub kcc: KccSettings,
    /// Seed for coin placement; `None` draws from entropy every round.
    pub coin_seed: Option<u64>,
    pub playing_duration: f32,
    pub game_over_duration: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            level: Level::default(),
            kcc: KccSettings::default(),
            coin_seed: None,
            playing_duration: PLAYING_DURATION_S,
            game_over_duration: GAME_OVER_DURATION_S,
        }
    }
}
