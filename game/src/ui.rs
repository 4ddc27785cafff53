//! UI sink.
//!
//! The session shows and hides panels and writes a few text slots; it never reads UI state.
//! [`UiSnapshot`] records the latest values so a host can mirror them onto real widgets.

use std::collections::{HashMap, HashSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Panel {
    Loading,
    Start,
    Playing,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextSlot {
    Timer,
    Score,
    PersonalBest,
}

pub trait Ui {
    fn set_visible(&mut self, panel: Panel, visible: bool);
    fn set_text(&mut self, slot: TextSlot, text: &str);
}

#[derive(Clone, Debug, PartialEq)]
pub struct UiSnapshot {
    visible: HashSet<Panel>,
    texts: HashMap<TextSlot, String>,
}

impl Default for UiSnapshot {
    /// The loading panel is up before anything else runs.
    fn default() -> Self {
        Self {
            visible: HashSet::from([Panel::Loading]),
            texts: HashMap::new(),
        }
    }
}

impl UiSnapshot {
    pub fn is_visible(&self, panel: Panel) -> bool {
        self.visible.contains(&panel)
    }

    pub fn text(&self, slot: TextSlot) -> Option<&str> {
        self.texts.get(&slot).map(String::as_str)
    }
}

impl Ui for UiSnapshot {
    fn set_visible(&mut self, panel: Panel, visible: bool) {
        if visible {
            self.visible.insert(panel);
        } else {
            self.visible.remove(&panel);
        }
    }

    fn set_text(&mut self, slot: TextSlot, text: &str) {
        self.texts.insert(slot, text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_tracks_latest_values() {
        let mut ui = UiSnapshot::default();
        assert!(ui.is_visible(Panel::Loading));

        ui.set_visible(Panel::Loading, false);
        ui.set_visible(Panel::Start, true);
        ui.set_text(TextSlot::Score, "3");
        ui.set_text(TextSlot::Score, "5");

        assert!(!ui.is_visible(Panel::Loading));
        assert!(ui.is_visible(Panel::Start));
        assert_eq!(ui.text(TextSlot::Score), Some("5"));
        assert_eq!(ui.text(TextSlot::Timer), None);
    }
}
