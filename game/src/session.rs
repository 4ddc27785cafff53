/*!
Game session state machine: `Loading -> Idle -> Playing -> GameOver -> Idle`.

- Loading requests the assets, and once they are ready builds the level and the character.
- Idle shows the start panel with the controls frozen. Leaving it is an external request
  ([`crate::Game::start`]).
- Playing resets the score, puts the character back on its spawn point, runs the coin
  spawner and counts the round down.
- GameOver shows its panel for a few seconds, then returns to idle.
*/

use std::task::Poll;

use crate::animation::ClipMixer;
use crate::assets::{AssetCategory, AssetLoader, CHARACTER_MODEL, PROP_MODELS};
use crate::character::Character;
use crate::coins::CoinManager;
use crate::config::GameConfig;
use crate::controls::ControlScheme;
use crate::error::GameError;
use crate::fsm::{State, StateMachine};
use crate::physics::PhysicsWorld;
use crate::score::Score;
use crate::ui::{Panel, TextSlot, Ui};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Loading,
    Idle,
    Playing,
    GameOver,
}

/// Collaborators borrowed by the session states for one call.
pub struct SessionContext<'a> {
    pub config: &'a GameConfig,
    pub physics: &'a mut dyn PhysicsWorld,
    pub assets: &'a mut dyn AssetLoader,
    pub controls: &'a mut dyn ControlScheme,
    pub ui: &'a mut dyn Ui,
    pub score: &'a mut Score,
    pub character: &'a mut Option<Character>,
    /// Set when loading fails; the driver stops ticking.
    pub failure: &'a mut Option<GameError>,
}

#[derive(Debug)]
pub struct Round {
    remaining: f32,
    coins: Option<CoinManager>,
}

impl Round {
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn coins(&self) -> Option<&CoinManager> {
        self.coins.as_ref()
    }
}

#[derive(Debug)]
pub enum SessionState {
    Loading,
    Idle,
    Playing(Round),
    GameOver { remaining: f32 },
}

impl SessionState {
    pub fn register(machine: &mut StateMachine<Self>) {
        machine
            .add_state(Phase::Loading, || SessionState::Loading)
            .add_state(Phase::Idle, || SessionState::Idle)
            .add_state(Phase::Playing, || {
                SessionState::Playing(Round {
                    remaining: 0.0,
                    coins: None,
                })
            })
            .add_state(Phase::GameOver, || SessionState::GameOver { remaining: 0.0 });
    }
}

fn finish_loading(ctx: &mut SessionContext<'_>) -> Result<(), GameError> {
    let model = ctx
        .assets
        .model(CHARACTER_MODEL)
        .cloned()
        .ok_or_else(|| GameError::MissingModel(CHARACTER_MODEL.to_string()))?;

    ctx.config.level.generate(ctx.physics);

    let mixer = ClipMixer::from_model(&model);
    let character = Character::new(
        ctx.physics,
        &model,
        ctx.config.level.spawn_point(),
        0.0,
        Box::new(mixer),
    )?;
    ctx.controls.assign_target(character.mesh_transform());
    *ctx.character = Some(character);
    ctx.score.render(ctx.ui);
    Ok(())
}

fn render_timer(ui: &mut dyn Ui, remaining: f32) {
    ui.set_text(TextSlot::Timer, &format!("{:.2}", remaining.max(0.0)));
}

impl State for SessionState {
    type Id = Phase;
    type Context<'a> = SessionContext<'a>;

    fn id(&self) -> Phase {
        match self {
            SessionState::Loading => Phase::Loading,
            SessionState::Idle => Phase::Idle,
            SessionState::Playing(_) => Phase::Playing,
            SessionState::GameOver { .. } => Phase::GameOver,
        }
    }

    fn enter(&mut self, ctx: &mut SessionContext<'_>, _previous: Option<&Self>) {
        log::info!("entering {:?}", self.id());
        match self {
            SessionState::Loading => {
                ctx.ui.set_visible(Panel::Loading, true);
                ctx.assets
                    .request(AssetCategory::Characters, &[CHARACTER_MODEL]);
                ctx.assets.request(AssetCategory::Props, &PROP_MODELS);
            }
            SessionState::Idle => {
                ctx.ui.set_visible(Panel::Start, true);
                ctx.controls.disable();
            }
            SessionState::Playing(round) => {
                ctx.score.reset();
                ctx.controls.enable();
                if let Some(character) = ctx.character.as_mut() {
                    character.teleport(ctx.physics, ctx.config.level.spawn_point());
                    ctx.controls.assign_target(character.mesh_transform());
                }
                round.remaining = ctx.config.playing_duration;
                round.coins = Some(CoinManager::with_seed(
                    &ctx.config.level,
                    ctx.config.coin_seed,
                ));
                ctx.ui.set_visible(Panel::Playing, true);
                ctx.score.render(ctx.ui);
                render_timer(ctx.ui, round.remaining);
            }
            SessionState::GameOver { remaining } => {
                *remaining = ctx.config.game_over_duration;
                ctx.ui.set_visible(Panel::GameOver, true);
            }
        }
    }

    fn update(&mut self, ctx: &mut SessionContext<'_>, dt: f32, elapsed: f32) -> Option<Phase> {
        match self {
            SessionState::Loading => match ctx.assets.poll() {
                Poll::Pending => None,
                Poll::Ready(result) => match result.and_then(|()| finish_loading(ctx)) {
                    Ok(()) => Some(Phase::Idle),
                    Err(err) => {
                        log::error!("loading failed: {err}");
                        *ctx.failure = Some(err);
                        None
                    }
                },
            },
            SessionState::Idle => None,
            SessionState::Playing(round) => {
                if let (Some(coins), Some(character)) = (round.coins.as_mut(), ctx.character.as_ref())
                {
                    let tick = coins.update(dt, elapsed, ctx.physics, &character.hitbox(), ctx.score);
                    if !tick.gathered.is_empty() {
                        ctx.score.render(ctx.ui);
                    }
                }

                round.remaining -= dt;
                render_timer(ctx.ui, round.remaining);
                (round.remaining <= 0.0).then_some(Phase::GameOver)
            }
            SessionState::GameOver { remaining } => {
                *remaining -= dt;
                (*remaining <= 0.0).then_some(Phase::Idle)
            }
        }
    }

    fn exit(&mut self, ctx: &mut SessionContext<'_>) {
        match self {
            SessionState::Loading => ctx.ui.set_visible(Panel::Loading, false),
            SessionState::Idle => ctx.ui.set_visible(Panel::Start, false),
            SessionState::Playing(round) => {
                if let Some(coins) = round.coins.take() {
                    coins.remove(ctx.physics);
                }
                log::info!("round over, score {}", ctx.score.value());
                ctx.ui.set_visible(Panel::Playing, false);
            }
            SessionState::GameOver { .. } => ctx.ui.set_visible(Panel::GameOver, false),
        }
    }
}
