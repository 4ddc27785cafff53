//! Frame driver.
//!
//! [`Game`] owns every collaborator and the session machine. Hosts call [`Game::tick`] once
//! per rendered frame and forward input to [`Game::handle_input`].

use crate::assets::AssetLoader;
use crate::character::Character;
use crate::coins::Coin;
use crate::config::GameConfig;
use crate::constants::MAX_FRAME_DT_S;
use crate::controls::{CameraRig, ControlScheme, InputEvent};
use crate::error::GameError;
use crate::fsm::StateMachine;
use crate::physics::PhysicsWorld;
use crate::score::{KeyValueStore, Score};
use crate::session::{Phase, Round, SessionContext, SessionState};
use crate::ui::UiSnapshot;

pub struct Game {
    config: GameConfig,
    physics: Box<dyn PhysicsWorld>,
    assets: Box<dyn AssetLoader>,
    controls: Box<dyn ControlScheme>,
    ui: UiSnapshot,
    score: Score,
    character: Option<Character>,
    failure: Option<GameError>,
    machine: StateMachine<SessionState>,
    elapsed: f32,
}

/// Borrow the session machine and a context over the remaining fields.
macro_rules! session {
    ($game:expr) => {{
        let Game {
            config,
            physics,
            assets,
            controls,
            ui,
            score,
            character,
            failure,
            machine,
            ..
        } = $game;
        (
            machine,
            SessionContext {
                config,
                physics: physics.as_mut(),
                assets: assets.as_mut(),
                controls: controls.as_mut(),
                ui,
                score,
                character,
                failure,
            },
        )
    }};
}

impl Game {
    /// Build the game and enter the loading phase.
    pub fn new(
        config: GameConfig,
        physics: Box<dyn PhysicsWorld>,
        assets: Box<dyn AssetLoader>,
        controls: Box<dyn ControlScheme>,
        store: Box<dyn KeyValueStore>,
    ) -> Self {
        let mut machine = StateMachine::new();
        SessionState::register(&mut machine);

        let mut game = Self {
            config,
            physics,
            assets,
            controls,
            ui: UiSnapshot::default(),
            score: Score::new(store),
            character: None,
            failure: None,
            machine,
            elapsed: 0.0,
        };
        let (machine, mut ctx) = session!(&mut game);
        machine.set_state(Phase::Loading, &mut ctx);
        game
    }

    /// Advance the simulation by one frame.
    ///
    /// `dt` is clamped to `0..=MAX_FRAME_DT_S`. Nothing happens after a loading failure.
    pub fn tick(&mut self, dt: f32) {
        if self.failure.is_some() {
            return;
        }
        let dt = dt.clamp(0.0, MAX_FRAME_DT_S);
        self.elapsed += dt;

        self.physics.step(dt);
        self.controls.update();
        if let Some(character) = self.character.as_mut() {
            character.update(
                dt,
                self.elapsed,
                self.physics.as_mut(),
                Some(self.controls.as_mut()),
            );
        }

        let elapsed = self.elapsed;
        let (machine, mut ctx) = session!(self);
        machine.update(&mut ctx, dt, elapsed);
    }

    /// Leave the idle phase and start a round. Returns `false` outside idle.
    pub fn start(&mut self) -> bool {
        if self.phase() != Some(Phase::Idle) {
            return false;
        }
        let (machine, mut ctx) = session!(self);
        machine.set_state(Phase::Playing, &mut ctx)
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        self.controls.handle(event);
    }

    pub fn phase(&self) -> Option<Phase> {
        self.machine.current_id()
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn failure(&self) -> Option<&GameError> {
        self.failure.as_ref()
    }

    pub fn ui(&self) -> &UiSnapshot {
        &self.ui
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn character(&self) -> Option<&Character> {
        self.character.as_ref()
    }

    pub fn camera(&self) -> &CameraRig {
        self.controls.camera()
    }

    pub fn wants_pointer_lock(&self) -> bool {
        self.controls.wants_pointer_lock()
    }

    pub fn physics(&self) -> &dyn PhysicsWorld {
        self.physics.as_ref()
    }

    fn round(&self) -> Option<&Round> {
        match self.machine.current() {
            Some(SessionState::Playing(round)) => Some(round),
            _ => None,
        }
    }

    /// Seconds left in the current round.
    pub fn remaining_time(&self) -> Option<f32> {
        self.round().map(Round::remaining)
    }

    pub fn coins(&self) -> &[Coin] {
        self.round()
            .and_then(Round::coins)
            .map(|coins| coins.coins())
            .unwrap_or_default()
    }
}
