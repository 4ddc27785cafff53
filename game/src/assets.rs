//! Asset loading contract.
//!
//! The core only needs model metadata: bounding size and animation clip names/lengths.
//! Hosts load the actual meshes however they like and report readiness through [`AssetLoader::poll`].

use std::collections::HashMap;
use std::task::Poll;

use crate::error::GameError;
use crate::types::Vec3;

/// Model driven by the player.
pub const CHARACTER_MODEL: &str = "Knight";

/// Props needed by the level and the coin spawner.
pub const PROP_MODELS: [&str; 6] = [
    "Coin_A",
    "Coin_B",
    "Coin_C",
    "Floor_Dirt",
    "Cube_Prototype_Large_B",
    "Cube_Prototype_Small",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetCategory {
    Characters,
    Props,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClipInfo {
    pub name: String,
    /// Length in seconds.
    pub duration: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ModelInfo {
    pub name: String,
    /// Extents of the bounding box.
    pub size: Vec3,
    pub animations: Vec<ClipInfo>,
}

impl ModelInfo {
    pub fn has_animation(&self, clip: &str) -> bool {
        self.animations.iter().any(|a| a.name == clip)
    }
}

pub trait AssetLoader {
    /// Queue `names` for loading. Repeated requests are harmless.
    fn request(&mut self, category: AssetCategory, names: &[&str]);

    /// `Ready(Ok(()))` once everything requested so far is available.
    fn poll(&mut self) -> Poll<Result<(), GameError>>;

    fn model(&self, name: &str) -> Option<&ModelInfo>;
}

/// Loader over models that are already in memory.
///
/// Ready on the first poll. Requesting a model it does not hold fails the load.
#[derive(Clone, Debug, Default)]
pub struct PreloadedAssets {
    models: HashMap<String, ModelInfo>,
    requested: Vec<(AssetCategory, String)>,
}

impl PreloadedAssets {
    pub fn new(models: impl IntoIterator<Item = ModelInfo>) -> Self {
        Self {
            models: models.into_iter().map(|m| (m.name.clone(), m)).collect(),
            requested: Vec::new(),
        }
    }

    pub fn insert(&mut self, model: ModelInfo) {
        self.models.insert(model.name.clone(), model);
    }

    pub fn requested(&self) -> impl Iterator<Item = (AssetCategory, &str)> {
        self.requested.iter().map(|(c, n)| (*c, n.as_str()))
    }
}

impl AssetLoader for PreloadedAssets {
    fn request(&mut self, category: AssetCategory, names: &[&str]) {
        for name in names {
            if !self.requested.iter().any(|(_, n)| n == name) {
                self.requested.push((category, (*name).to_string()));
            }
        }
    }

    fn poll(&mut self) -> Poll<Result<(), GameError>> {
        let missing = self
            .requested
            .iter()
            .find(|(_, name)| !self.models.contains_key(name));
        Poll::Ready(match missing {
            Some((category, name)) => Err(GameError::AssetLoad(format!(
                "{category:?} model `{name}` is unavailable"
            ))),
            None => Ok(()),
        })
    }

    fn model(&self, name: &str) -> Option<&ModelInfo> {
        self.models.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(name: &str) -> ModelInfo {
        ModelInfo {
            name: name.to_string(),
            size: Vec3::new(1.0, 1.0, 1.0),
            animations: Vec::new(),
        }
    }

    #[test]
    fn ready_once_every_request_is_held() {
        let mut assets = PreloadedAssets::new([prop("Coin_A"), prop("Coin_B")]);
        assets.request(AssetCategory::Props, &["Coin_A", "Coin_B", "Coin_A"]);
        assert_eq!(assets.requested().count(), 2);
        assert!(matches!(assets.poll(), Poll::Ready(Ok(()))));
        assert!(assets.model("Coin_B").is_some());
    }

    #[test]
    fn missing_request_fails_the_load() {
        let mut assets = PreloadedAssets::new([prop("Coin_A")]);
        assets.request(AssetCategory::Characters, &[CHARACTER_MODEL]);
        match assets.poll() {
            Poll::Ready(Err(GameError::AssetLoad(msg))) => assert!(msg.contains("Knight")),
            other => panic!("unexpected poll result {other:?}"),
        }
    }
}
