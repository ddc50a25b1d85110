//! Pour stage
//!
//! Holding the bottle pours spirit; letting go anywhere stops the pour for
//! good and scores the level against the difficulty's target window.

use glam::Vec2;

use super::drag::{PointerDrag, PointerId, PressOutcome};
use super::hit_test::Rect;
use super::stage::Stage;
use super::state::{StageCompletion, StageKey};
use super::timer::SettleTimer;
use crate::consts::*;
use crate::platform::FeedbackEvent;
use crate::scoring::{TargetWindow, target_window_score};

/// Spirit bottle above the jar
pub fn bottle_rect() -> Rect {
    Rect::from_origin_size(Vec2::new(200.0, 20.0), Vec2::new(80.0, 160.0))
}

#[derive(Debug, Clone)]
pub struct PourPhase {
    window: TargetWindow,
    /// Current level, 0 to `FILL_CAP`
    fill: f32,
    drag: PointerDrag<()>,
    /// Set once the bottle has been let go
    poured: bool,
    completion: Option<SettleTimer<StageCompletion>>,
    events: Vec<FeedbackEvent>,
}

impl PourPhase {
    pub fn new(window: TargetWindow) -> Self {
        Self {
            window,
            fill: 0.0,
            drag: PointerDrag::new(),
            poured: false,
            completion: None,
            events: Vec::new(),
        }
    }

    pub fn window(&self) -> TargetWindow {
        self.window
    }

    pub fn fill(&self) -> f32 {
        self.fill
    }

    pub fn is_pouring(&self) -> bool {
        self.drag.is_active()
    }

    pub fn is_poured(&self) -> bool {
        self.poured
    }

    /// Score the level would earn if the pour stopped now
    pub fn projected_score(&self) -> f32 {
        target_window_score(self.fill, self.window)
    }
}

impl Stage for PourPhase {
    fn press(&mut self, pointer: PointerId, point: Vec2) {
        if self.poured || !bottle_rect().contains(point) {
            return;
        }
        if self.drag.press(pointer, point, ()) == PressOutcome::Started {
            log::debug!("Pour started");
            self.events.push(FeedbackEvent::PickedUp);
        }
    }

    fn move_to(&mut self, point: Vec2) {
        self.drag.move_to(point);
    }

    fn release(&mut self, point: Vec2) {
        if self.drag.release(point).is_none() {
            return;
        }
        self.poured = true;
        let score = self.projected_score();
        log::info!(
            "Pour stopped at {:.1} (target {}-{}), precision {score}",
            self.fill,
            self.window.min,
            self.window.max
        );
        self.completion = Some(SettleTimer::new(
            POUR_SETTLE,
            StageCompletion::new(StageKey::AlcoholPrecision, score),
        ));
    }

    fn tick(&mut self, dt: f32) -> Option<StageCompletion> {
        if self.drag.is_active() && self.fill < FILL_CAP {
            self.fill = (self.fill + FILL_RATE * dt / FRAME_DT).min(FILL_CAP);
        }
        self.completion.as_mut()?.tick(dt)
    }

    fn take_events(&mut self) -> Vec<FeedbackEvent> {
        std::mem::take(&mut self.events)
    }

    fn is_settling(&self) -> bool {
        self.completion.is_some()
    }
}
