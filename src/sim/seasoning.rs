//! Seasoning stage
//!
//! Spices are dragged from the shelf into the bowl, then the bowl is shaken
//! until fully mixed. Once mixing has started the shelf is locked.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::drag::{PointerDrag, PointerId, PressOutcome};
use super::hit_test::Rect;
use super::stage::Stage;
use super::state::{StageCompletion, StageKey};
use super::timer::SettleTimer;
use crate::consts::*;
use crate::platform::{FeedbackEvent, MotionSample};
use crate::scoring::{composition_score, flavor_title};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ingredient {
    Chili,
    Pepper,
    Salt,
}

impl Ingredient {
    pub const ALL: [Ingredient; 3] = [Ingredient::Chili, Ingredient::Pepper, Ingredient::Salt];

    pub fn as_str(&self) -> &'static str {
        match self {
            Ingredient::Chili => "chili",
            Ingredient::Pepper => "pepper",
            Ingredient::Salt => "salt",
        }
    }

    fn index(self) -> usize {
        match self {
            Ingredient::Chili => 0,
            Ingredient::Pepper => 1,
            Ingredient::Salt => 2,
        }
    }

    /// Shelf slot the spice is picked up from
    pub fn shelf_rect(self) -> Rect {
        let x = 24.0 + self.index() as f32 * 104.0;
        Rect::from_origin_size(Vec2::new(x, 16.0), Vec2::splat(64.0))
    }
}

/// How many spoonfuls of each spice went into the bowl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IngredientCounts {
    counts: [u32; 3],
}

impl IngredientCounts {
    pub fn add(&mut self, ingredient: Ingredient) {
        self.counts[ingredient.index()] += 1;
    }

    pub fn get(&self, ingredient: Ingredient) -> u32 {
        self.counts[ingredient.index()]
    }

    /// Number of distinct spices used
    pub fn variety(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }
}

/// Mixing bowl below the shelf
pub fn bowl_rect() -> Rect {
    Rect::from_origin_size(Vec2::new(60.0, 150.0), Vec2::new(200.0, 150.0))
}

#[derive(Debug, Clone)]
pub struct SeasoningPhase {
    counts: IngredientCounts,
    /// Mixing progress, 0 to 100
    mix: f32,
    drag: PointerDrag<Ingredient>,
    last_motion: Option<MotionSample>,
    completion: Option<SettleTimer<StageCompletion>>,
    events: Vec<FeedbackEvent>,
}

impl Default for SeasoningPhase {
    fn default() -> Self {
        Self::new()
    }
}

impl SeasoningPhase {
    pub fn new() -> Self {
        Self {
            counts: IngredientCounts::default(),
            mix: 0.0,
            drag: PointerDrag::new(),
            last_motion: None,
            completion: None,
            events: Vec::new(),
        }
    }

    pub fn counts(&self) -> &IngredientCounts {
        &self.counts
    }

    pub fn mix(&self) -> f32 {
        self.mix
    }

    /// The shelf is only open before the first shake
    pub fn shelf_open(&self) -> bool {
        self.mix <= 0.0
    }

    pub fn held(&self) -> Option<Ingredient> {
        self.drag.session().map(|s| s.payload)
    }

    pub fn cursor(&self) -> Vec2 {
        self.drag.cursor()
    }

    fn add_mix(&mut self, amount: f32) {
        if self.completion.is_some() {
            return;
        }
        self.mix = (self.mix + amount).min(100.0);
        self.events.push(FeedbackEvent::Shake);
        if self.mix >= 100.0 {
            self.finish();
        }
    }

    fn finish(&mut self) {
        let score = composition_score(&self.counts);
        let title = flavor_title(&self.counts);
        log::info!(
            "Seasoning mixed: chili {} pepper {} salt {}, balance {score} ({title})",
            self.counts.get(Ingredient::Chili),
            self.counts.get(Ingredient::Pepper),
            self.counts.get(Ingredient::Salt),
        );
        self.drag.cancel();
        self.completion = Some(SettleTimer::new(
            SEASONING_SETTLE,
            StageCompletion::new(StageKey::FlavorBalance, score).with_label(title),
        ));
    }
}

impl Stage for SeasoningPhase {
    fn press(&mut self, pointer: PointerId, point: Vec2) {
        if !self.shelf_open() {
            return;
        }
        let Some(ingredient) = Ingredient::ALL
            .into_iter()
            .find(|i| i.shelf_rect().contains(point))
        else {
            return;
        };
        if self.drag.press(pointer, point, ingredient) == PressOutcome::Started {
            self.events.push(FeedbackEvent::PickedUp);
        }
    }

    fn move_to(&mut self, point: Vec2) {
        self.drag.move_to(point);
    }

    fn release(&mut self, point: Vec2) {
        let Some(release) = self.drag.release(point) else {
            return;
        };
        if !self.shelf_open() {
            return;
        }
        if bowl_rect().contains(release.point) {
            self.counts.add(release.payload);
            log::debug!("Added {} ({} total)", release.payload.as_str(), self.counts.total());
            self.events.push(FeedbackEvent::Placed);
        }
    }

    fn tick(&mut self, dt: f32) -> Option<StageCompletion> {
        self.completion.as_mut()?.tick(dt)
    }

    fn take_events(&mut self) -> Vec<FeedbackEvent> {
        std::mem::take(&mut self.events)
    }

    fn is_settling(&self) -> bool {
        self.completion.is_some()
    }

    fn shake(&mut self) {
        self.add_mix(MANUAL_MIX_STEP);
    }

    fn motion(&mut self, sample: MotionSample) {
        if self.completion.is_some() {
            return;
        }
        let shaken = self
            .last_motion
            .replace(sample)
            .is_some_and(|previous| sample.delta(&previous) > SHAKE_THRESHOLD);
        if shaken {
            self.add_mix(MOTION_MIX_STEP);
        }
    }
}
