//! Catalog preferences
//!
//! The shape/color choices the formation is built from, persisted in
//! LocalStorage so an edit-mode selection survives a reload. Level layouts
//! themselves are deliberately not saved.

use serde::{Deserialize, Serialize};

use crate::sim::{BlockColor, ShapeKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Block shape used for the formation and for edit-mode placement
    pub shape: ShapeKind,
    /// Row color cycle, bottom to top
    pub palette: Vec<BlockColor>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            shape: ShapeKind::Square,
            palette: BlockColor::default_palette(),
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "sling_smash_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }

    /// Cycle to the next catalog shape (edit-mode shape button)
    pub fn next_shape(&mut self) {
        self.shape = match self.shape {
            ShapeKind::Square => ShapeKind::Wide,
            ShapeKind::Wide => ShapeKind::Tall,
            ShapeKind::Tall => ShapeKind::Square,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_roundtrip_json() {
        let mut settings = Settings::default();
        settings.next_shape();
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.shape, ShapeKind::Wide);
        assert_eq!(back.palette, settings.palette);
    }

    #[test]
    fn test_next_shape_cycles() {
        let mut settings = Settings::default();
        settings.next_shape();
        settings.next_shape();
        settings.next_shape();
        assert_eq!(settings.shape, ShapeKind::Square);
    }
}
