//! Shared game state types
//!
//! The score record lives for one playthrough; stage-local state (grids,
//! drag sessions, bowls) lives inside each stage and is dropped with it.

use serde::{Deserialize, Serialize};

use crate::settings::{Difficulty, GameVariant, Settings};

/// Current phase of the game, strictly linear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, difficulty is chosen here
    Menu,
    /// Cut the mycelium between tofu cells
    Cutting,
    /// Carry each piece into the bowl
    Transfer,
    /// Pour spirit to the target level
    Pour,
    /// Add spices and shake
    Seasoning,
    /// Fill and seal the jar
    Bottling,
    /// Final rating and leaderboard save
    Result,
}

impl GamePhase {
    /// Next phase in the fixed sequence
    pub fn next(self) -> GamePhase {
        match self {
            GamePhase::Menu => GamePhase::Cutting,
            GamePhase::Cutting => GamePhase::Transfer,
            GamePhase::Transfer => GamePhase::Pour,
            GamePhase::Pour => GamePhase::Seasoning,
            GamePhase::Seasoning => GamePhase::Bottling,
            GamePhase::Bottling => GamePhase::Result,
            GamePhase::Result => GamePhase::Menu,
        }
    }

    pub fn is_stage(self) -> bool {
        !matches!(self, GamePhase::Menu | GamePhase::Result)
    }

    /// HUD step text
    pub fn step_text(self) -> &'static str {
        match self {
            GamePhase::Cutting => "Step 1: Cut Mycelium",
            GamePhase::Transfer => "Step 2: Transfer to Bowl",
            GamePhase::Pour => "Step 3: Add Spirit",
            GamePhase::Seasoning => "Step 4: Season & Shake",
            GamePhase::Bottling => "Step 5: Seal Jar",
            GamePhase::Menu | GamePhase::Result => "",
        }
    }
}

/// Score record field a stage writes on completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageKey {
    Integrity,
    AlcoholPrecision,
    FlavorBalance,
    BottlingScore,
}

/// Accumulated per-stage outcomes for one playthrough
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageScore {
    /// Tofu condition, starts at 100
    pub integrity: f32,
    pub alcohol_precision: f32,
    pub flavor_balance: f32,
    pub bottling_score: f32,
    pub flavor_title: String,
    pub difficulty: Difficulty,
    /// Which stages the final rating averages
    #[serde(default)]
    pub variant: GameVariant,
}

impl Default for StageScore {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}

impl StageScore {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            integrity: 100.0,
            alcohol_precision: 0.0,
            flavor_balance: 0.0,
            bottling_score: 0.0,
            flavor_title: String::new(),
            difficulty,
            variant: GameVariant::Classic,
        }
    }

    /// Fresh record for a run, freezing the menu choices
    pub fn for_run(settings: &Settings) -> Self {
        Self {
            variant: settings.variant,
            ..Self::new(settings.difficulty)
        }
    }

    pub fn get(&self, key: StageKey) -> f32 {
        match key {
            StageKey::Integrity => self.integrity,
            StageKey::AlcoholPrecision => self.alcohol_precision,
            StageKey::FlavorBalance => self.flavor_balance,
            StageKey::BottlingScore => self.bottling_score,
        }
    }

    /// Write a stage result; values are clamped to `[0, 100]`
    pub fn record(&mut self, completion: &StageCompletion) {
        let value = crate::clamp_score(completion.value);
        match completion.key {
            StageKey::Integrity => self.integrity = value,
            StageKey::AlcoholPrecision => self.alcohol_precision = value,
            StageKey::FlavorBalance => self.flavor_balance = value,
            StageKey::BottlingScore => self.bottling_score = value,
        }
        if let Some(label) = &completion.label {
            self.flavor_title = label.clone();
        }
    }
}

/// The single completion contract every stage reports through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageCompletion {
    pub key: StageKey,
    pub value: f32,
    pub label: Option<String>,
}

impl StageCompletion {
    pub fn new(key: StageKey, value: f32) -> Self {
        Self {
            key,
            value,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_sequence_wraps_to_menu() {
        let mut phase = GamePhase::Menu;
        let mut seen = vec![phase];
        for _ in 0..6 {
            phase = phase.next();
            seen.push(phase);
        }
        assert_eq!(seen.last(), Some(&GamePhase::Result));
        assert_eq!(phase.next(), GamePhase::Menu);
        assert_eq!(seen.iter().filter(|p| p.is_stage()).count(), 5);
    }

    #[test]
    fn test_record_clamps_and_labels() {
        let mut score = StageScore::new(Difficulty::Hard);
        score.record(&StageCompletion::new(StageKey::Integrity, -20.0));
        score.record(&StageCompletion::new(StageKey::AlcoholPrecision, 140.0));
        score.record(&StageCompletion::new(StageKey::FlavorBalance, 70.0).with_label("Numbing Not Spicy"));

        assert_eq!(score.get(StageKey::Integrity), 0.0);
        assert_eq!(score.get(StageKey::AlcoholPrecision), 100.0);
        assert_eq!(score.flavor_title, "Numbing Not Spicy");
        assert_eq!(score.bottling_score, 0.0);
        assert_eq!(score.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_for_run_copies_menu_choices() {
        let settings = Settings {
            variant: GameVariant::Extended,
            ..Settings::with_difficulty(Difficulty::Normal)
        };
        let score = StageScore::for_run(&settings);
        assert_eq!(score.difficulty, Difficulty::Normal);
        assert_eq!(score.variant, GameVariant::Extended);
        assert_eq!(score.integrity, 100.0);
    }
}
