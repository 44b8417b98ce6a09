//! Game settings and preferences
//!
//! Persisted separately from run progress in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::persistence::SaveStore;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Request narrator one-liners on start/win/fail
    pub narration: bool,

    // === Visuals ===
    /// Faint 40px background grid
    pub show_grid: bool,
    /// Soft glow around goal and hazard rectangles
    pub glow: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            narration: true,
            show_grid: true,
            glow: true,
            show_fps: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "stick_hero_settings";

    /// Load settings, falling back to defaults on missing or malformed data
    pub fn load(store: &dyn SaveStore) -> Self {
        if let Ok(Some(json)) = store.get(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from storage");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring malformed settings: {e}"),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Persist settings; failures are logged and otherwise ignored
    pub fn save(&self, store: &dyn SaveStore) {
        match serde_json::to_string(self) {
            Ok(json) => match store.set(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Could not save settings: {e:#}"),
            },
            Err(e) => log::warn!("Could not serialize settings: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults_when_missing() {
        let store = MemoryStore::new();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_roundtrip_through_store() {
        let store = MemoryStore::new();
        let settings = Settings {
            narration: false,
            show_fps: true,
            ..Default::default()
        };
        settings.save(&store);
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let store = MemoryStore::new();
        store
            .set(Settings::STORAGE_KEY, r#"{"show_grid":false}"#)
            .unwrap();
        let settings = Settings::load(&store);
        assert!(!settings.show_grid);
        assert!(settings.narration);
    }

    #[test]
    fn test_malformed_uses_defaults() {
        let store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, "[1,2,3").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }
}
