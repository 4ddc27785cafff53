use thiserror::Error;

/// Failures surfaced by the gameplay core.
///
/// Everything else (a missing body handle, a store that refuses a write during play)
/// is logged and tolerated where it happens.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("model `{0}` has not been loaded")]
    MissingModel(String),

    #[error("model `{model}` has no `{clip}` animation")]
    MissingAnimation { model: String, clip: String },

    #[error("model `{model}` is too short ({height}) for a character capsule")]
    DegenerateModel { model: String, height: f32 },

    #[error("asset loading failed: {0}")]
    AssetLoad(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
