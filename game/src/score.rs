//! Score and persisted personal best.

use std::collections::HashMap;

use crate::constants::PERSONAL_BEST_KEY;
use crate::error::GameError;
use crate::ui::{TextSlot, Ui};

/// String key/value persistence (browser local storage, a file, memory).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), GameError>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::default();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), GameError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub struct Score {
    value: u32,
    personal_best: u32,
    store: Box<dyn KeyValueStore>,
}

impl Score {
    /// Loads the personal best from `store`. Missing or unparsable values count as zero.
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        let personal_best = store
            .get(PERSONAL_BEST_KEY)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(0);
        log::debug!("personal best loaded: {personal_best}");
        Self {
            value: 0,
            personal_best,
            store,
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn personal_best(&self) -> u32 {
        self.personal_best
    }

    /// Add `points`; a new best is persisted immediately.
    pub fn increment_by(&mut self, points: u32) {
        self.value = self.value.saturating_add(points);
        if self.value > self.personal_best {
            self.personal_best = self.value;
            if let Err(err) = self
                .store
                .set(PERSONAL_BEST_KEY, &self.personal_best.to_string())
            {
                log::warn!("failed to persist personal best: {err}");
            }
        }
    }

    /// Zero the current score. The personal best is kept.
    pub fn reset(&mut self) {
        self.value = 0;
    }

    pub fn render(&self, ui: &mut dyn Ui) {
        ui.set_text(TextSlot::Score, &self.value.to_string());
        ui.set_text(TextSlot::PersonalBest, &self.personal_best.to_string());
    }
}

impl std::fmt::Debug for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Score")
            .field("value", &self.value)
            .field("personal_best", &self.personal_best)
            .finish_non_exhaustive()
    }
}
