//! Stage scoring policy
//!
//! Every function here is pure and clamps its output to `[0, 100]`.

use serde::{Deserialize, Serialize};

use crate::clamp_score;
use crate::consts::*;
use crate::settings::GameVariant;
use crate::sim::{Ingredient, IngredientCounts, StageScore};

/// Inclusive fill range that earns a perfect pour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetWindow {
    pub min: f32,
    pub max: f32,
}

impl TargetWindow {
    pub fn new(min: f32, max: f32) -> Self {
        debug_assert!(min <= max, "window min must not exceed max");
        Self { min, max }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn width(&self) -> f32 {
        self.max - self.min
    }

    /// Distance to the nearest window edge (0 inside)
    pub fn distance(&self, value: f32) -> f32 {
        if self.contains(value) {
            0.0
        } else {
            (value - self.min).abs().min((value - self.max).abs())
        }
    }
}

/// Pour accuracy: perfect inside the window, 4 points lost per unit outside
pub fn target_window_score(fill: f32, window: TargetWindow) -> f32 {
    if window.contains(fill) {
        return 100.0;
    }
    clamp_score(100.0 - POUR_PENALTY_PER_UNIT * window.distance(fill))
}

/// Flat penalty per incident (damage touch, dropped piece, missed lid)
pub fn incident_penalty(base: f32, incidents: u32) -> f32 {
    clamp_score(base - PENALTY_PER_INCIDENT * incidents as f32)
}

/// Seasoning balance
///
/// Starts at 100; loses points for too little variety, too much salt, and
/// more for no salt at all.
pub fn composition_score(counts: &IngredientCounts) -> f32 {
    let mut score = 100.0;
    if counts.variety() < MIN_VARIETY {
        score -= VARIETY_PENALTY;
    }
    let salt = counts.get(Ingredient::Salt);
    if salt > MAX_SALT {
        score -= SALT_EXCESS_PENALTY;
    }
    if salt == 0 {
        score -= SALT_MISSING_PENALTY;
    }
    clamp_score(score)
}

/// Descriptive label for the seasoning, e.g. "Mild Numbing Medium Spicy"
pub fn flavor_title(counts: &IngredientCounts) -> String {
    let numbing = match counts.get(Ingredient::Pepper) {
        0 => "No Numbing",
        1..=2 => "Mild Numbing",
        3..=4 => "Numbing",
        _ => "Extra Numbing",
    };
    let heat = match counts.get(Ingredient::Chili) {
        0 => "Not Spicy",
        1..=2 => "Mild Spicy",
        3..=4 => "Medium Spicy",
        _ => "Extra Spicy",
    };
    format!("{numbing} {heat}")
}

/// Stage scores that feed the final rating for a variant
pub fn variant_scores(score: &StageScore, variant: GameVariant) -> Vec<f32> {
    let mut scores = vec![
        score.integrity,
        score.alcohol_precision,
        score.flavor_balance,
    ];
    if variant == GameVariant::Extended {
        scores.push(score.bottling_score);
    }
    scores
}

/// Final rating: rounded mean of the variant's stage scores
pub fn final_score(score: &StageScore, variant: GameVariant) -> u32 {
    let scores = variant_scores(score, variant);
    let sum: f32 = scores.iter().copied().map(clamp_score).sum();
    let mean = sum / scores.len() as f32;
    mean.round() as u32
}

/// Discrete rating tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    GrandmasterChef,
    TofuArtisan,
    BeginnerMaker,
}

impl Rating {
    pub fn for_score(score: u32) -> Self {
        if score >= 90 {
            Rating::GrandmasterChef
        } else if score >= 70 {
            Rating::TofuArtisan
        } else {
            Rating::BeginnerMaker
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rating::GrandmasterChef => "Grandmaster Chef",
            Rating::TofuArtisan => "Tofu Artisan",
            Rating::BeginnerMaker => "Beginner Maker",
        }
    }

    pub fn stars(&self) -> u8 {
        match self {
            Rating::GrandmasterChef => 3,
            Rating::TofuArtisan => 2,
            Rating::BeginnerMaker => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn counts(chili: u32, pepper: u32, salt: u32) -> IngredientCounts {
        let mut c = IngredientCounts::default();
        for _ in 0..chili {
            c.add(Ingredient::Chili);
        }
        for _ in 0..pepper {
            c.add(Ingredient::Pepper);
        }
        for _ in 0..salt {
            c.add(Ingredient::Salt);
        }
        c
    }

    #[test]
    fn test_pour_scenarios() {
        let window = TargetWindow::new(70.0, 85.0);
        assert_eq!(target_window_score(78.0, window), 100.0);
        assert_eq!(target_window_score(90.0, window), 80.0);
        assert_eq!(target_window_score(60.0, window), 60.0);
        assert_eq!(target_window_score(0.0, window), 0.0);
    }

    #[test]
    fn test_window_edges_are_perfect() {
        let window = TargetWindow::new(60.0, 90.0);
        assert_eq!(target_window_score(60.0, window), 100.0);
        assert_eq!(target_window_score(90.0, window), 100.0);
    }

    #[test]
    fn test_incident_penalty_table() {
        for n in 0..10u32 {
            let expected = (100.0 - 15.0 * n as f32).clamp(0.0, 100.0);
            assert_eq!(incident_penalty(100.0, n), expected);
        }
        assert_eq!(incident_penalty(40.0, 3), 0.0);
    }

    #[test]
    fn test_composition_missing_salt_and_variety() {
        assert_eq!(composition_score(&counts(2, 1, 0)), 30.0);
    }

    #[test]
    fn test_composition_rules() {
        assert_eq!(composition_score(&counts(1, 1, 1)), 100.0);
        assert_eq!(composition_score(&counts(1, 1, 4)), 80.0);
        assert_eq!(composition_score(&counts(0, 0, 4)), 50.0);
        assert_eq!(composition_score(&counts(0, 0, 0)), 30.0);
    }

    #[test]
    fn test_flavor_title() {
        assert_eq!(flavor_title(&counts(3, 1, 1)), "Mild Numbing Medium Spicy");
        assert_eq!(flavor_title(&counts(0, 0, 2)), "No Numbing Not Spicy");
        assert_eq!(flavor_title(&counts(7, 5, 0)), "Extra Numbing Extra Spicy");
    }

    #[test]
    fn test_final_score_variants() {
        let score = StageScore {
            integrity: 85.0,
            alcohol_precision: 100.0,
            flavor_balance: 70.0,
            bottling_score: 40.0,
            ..StageScore::default()
        };
        assert_eq!(final_score(&score, GameVariant::Classic), 85);
        assert_eq!(final_score(&score, GameVariant::Extended), 74);
    }

    #[test]
    fn test_rating_bands() {
        assert_eq!(Rating::for_score(100), Rating::GrandmasterChef);
        assert_eq!(Rating::for_score(90), Rating::GrandmasterChef);
        assert_eq!(Rating::for_score(89), Rating::TofuArtisan);
        assert_eq!(Rating::for_score(70), Rating::TofuArtisan);
        assert_eq!(Rating::for_score(69).stars(), 1);
    }

    proptest! {
        #[test]
        fn prop_window_score_in_range(fill in -500.0f32..500.0, min in 0.0f32..100.0, width in 0.0f32..50.0) {
            let window = TargetWindow::new(min, min + width);
            let score = target_window_score(fill, window);
            prop_assert!((0.0..=100.0).contains(&score));
            if window.contains(fill) {
                prop_assert_eq!(score, 100.0);
            }
        }

        #[test]
        fn prop_window_score_non_increasing_with_distance(d1 in 0.0f32..200.0, extra in 0.0f32..200.0) {
            let window = TargetWindow::new(60.0, 90.0);
            let near_high = target_window_score(90.0 + d1, window);
            let far_high = target_window_score(90.0 + d1 + extra, window);
            prop_assert!(far_high <= near_high);
            let near_low = target_window_score(60.0 - d1, window);
            let far_low = target_window_score(60.0 - d1 - extra, window);
            prop_assert!(far_low <= near_low);
        }

        #[test]
        fn prop_final_score_moves_with_stage(
            a in 0.0f32..100.0,
            b in 0.0f32..100.0,
            c in 0.0f32..100.0,
            bump in 0.0f32..100.0,
        ) {
            let base = StageScore {
                integrity: a,
                alcohol_precision: b,
                flavor_balance: c,
                ..StageScore::default()
            };
            let raised = StageScore {
                integrity: (a + bump).min(100.0),
                ..base.clone()
            };
            let before = final_score(&base, GameVariant::Classic);
            let after = final_score(&raised, GameVariant::Classic);
            prop_assert!(after >= before);
            prop_assert!(after <= 100);
        }
    }
}
