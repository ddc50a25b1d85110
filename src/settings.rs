//! Game settings and preferences
//!
//! Persisted separately from the leaderboard through the same store.

use serde::{Deserialize, Serialize};

use crate::persistence::{Store, StoreError};
use crate::scoring::TargetWindow;

/// Difficulty, chosen once at the menu and fixed for the playthrough
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Cells per side of the tofu block
    pub fn grid_size(&self) -> usize {
        match self {
            Difficulty::Easy => 3,
            Difficulty::Normal => 4,
            Difficulty::Hard => 5,
        }
    }

    /// Fill window that scores a perfect pour
    pub fn pour_window(&self) -> TargetWindow {
        match self {
            Difficulty::Easy => TargetWindow::new(60.0, 90.0),
            Difficulty::Normal => TargetWindow::new(65.0, 88.0),
            Difficulty::Hard => TargetWindow::new(70.0, 85.0),
        }
    }

    /// Whether the cutting tool must sweep along a gap to sever it
    pub fn oriented_tool(&self) -> bool {
        matches!(self, Difficulty::Hard)
    }
}

/// Which stage scores feed the final rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameVariant {
    /// Integrity, spirit pour and seasoning
    #[default]
    Classic,
    /// Classic plus the bottling seal
    Extended,
}

impl GameVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameVariant::Classic => "Classic",
            GameVariant::Extended => "Extended",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(GameVariant::Classic),
            "extended" => Some(GameVariant::Extended),
            _ => None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub variant: GameVariant,
    /// Forward feedback pulses to the haptic collaborator
    pub haptics: bool,
    /// Ask for motion permission when seasoning starts
    pub motion_input: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            variant: GameVariant::Classic,
            haptics: true,
            motion_input: true,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "meidoufu_settings";

    pub fn with_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Load settings; missing or malformed data yields defaults
    pub fn load(store: &dyn Store) -> Self {
        if let Ok(Some(json)) = store.read(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Settings malformed ({e}), using defaults"),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self, store: &mut dyn Store) -> Result<(), StoreError> {
        let json = serde_json::to_string(self)?;
        store.write(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("norm"), Some(Difficulty::Normal));
        assert_eq!(Difficulty::from_str("extreme"), None);
    }

    #[test]
    fn test_variant_from_str() {
        assert_eq!(GameVariant::from_str("Extended"), Some(GameVariant::Extended));
        assert_eq!(GameVariant::from_str(GameVariant::Classic.as_str()), Some(GameVariant::Classic));
        assert_eq!(GameVariant::from_str("bottled"), None);
    }

    #[test]
    fn test_difficulty_tuning() {
        assert_eq!(Difficulty::Easy.grid_size(), 3);
        assert_eq!(Difficulty::Hard.grid_size(), 5);
        assert!(Difficulty::Hard.pour_window().width() < Difficulty::Easy.pour_window().width());
        assert!(!Difficulty::Easy.oriented_tool());
    }

    #[test]
    fn test_settings_round_trip() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            difficulty: Difficulty::Normal,
            variant: GameVariant::Extended,
            haptics: false,
            motion_input: true,
        };
        settings.save(&mut store).unwrap();
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let mut store = MemoryStore::new();
        store
            .write(Settings::STORAGE_KEY, "{\"difficulty\":\"Hard\"}")
            .unwrap();
        let settings = Settings::load(&store);
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert!(settings.haptics);
    }

    #[test]
    fn test_malformed_settings_use_defaults() {
        let mut store = MemoryStore::new();
        store.write(Settings::STORAGE_KEY, "[]").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }
}
