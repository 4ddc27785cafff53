pub mod animation;
pub mod assets;
pub mod character;
pub mod coins;
pub mod config;
pub mod constants;
pub mod controls;
pub mod engine;
pub mod error;
pub mod fsm;
pub mod level;
pub mod physics;
pub mod score;
pub mod session;
pub mod types;
pub mod ui;

#[cfg(test)]
pub(crate) mod test_support;

pub use animation::{AnimationMixer, ClipMixer};
pub use assets::{AssetLoader, ModelInfo, PreloadedAssets};
pub use character::{Character, CharacterStateId};
pub use coins::{Coin, CoinKind};
pub use config::GameConfig;
pub use controls::{ControlScheme, InputEvent, Key, ThirdPersonControls};
pub use engine::Game;
pub use error::GameError;
pub use level::Level;
pub use physics::{KccSettings, PhysicsWorld, RapierPhysics};
pub use score::{KeyValueStore, MemoryStore, Score};
pub use session::Phase;
pub use types::{Quat, Transform, Vec3};
pub use ui::{Panel, TextSlot, UiSnapshot};
