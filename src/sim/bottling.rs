//! Bottling stage
//!
//! Tap the jar to fill it, then drag the lid onto it. A lid let go away from
//! the jar springs back to its rest spot and counts as a miss.

use glam::Vec2;

use super::drag::{PointerDrag, PointerId, PressOutcome};
use super::hit_test::{Margins, Rect, contains};
use super::stage::Stage;
use super::state::{StageCompletion, StageKey};
use super::timer::SettleTimer;
use crate::consts::*;
use crate::platform::FeedbackEvent;
use crate::scoring::incident_penalty;

/// Slack around the jar mouth when dropping the lid
pub const LID_SLACK: f32 = 20.0;

pub fn jar_rect() -> Rect {
    Rect::from_origin_size(Vec2::new(100.0, 120.0), Vec2::new(120.0, 160.0))
}

/// Where the lid waits until it is picked up
pub fn lid_rest_rect() -> Rect {
    Rect::from_origin_size(Vec2::new(260.0, 20.0), Vec2::new(50.0, 30.0))
}

#[derive(Debug, Clone)]
pub struct BottlingPhase {
    filled: bool,
    sealed: bool,
    misses: u32,
    drag: PointerDrag<()>,
    completion: Option<SettleTimer<StageCompletion>>,
    events: Vec<FeedbackEvent>,
}

impl Default for BottlingPhase {
    fn default() -> Self {
        Self::new()
    }
}

impl BottlingPhase {
    pub fn new() -> Self {
        Self {
            filled: false,
            sealed: false,
            misses: 0,
            drag: PointerDrag::new(),
            completion: None,
            events: Vec::new(),
        }
    }

    pub fn is_filled(&self) -> bool {
        self.filled
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    /// Lid position: follows the pointer while held
    pub fn lid_position(&self) -> Vec2 {
        match self.drag.session() {
            Some(session) => session.current,
            None if self.sealed => jar_rect().center(),
            None => lid_rest_rect().center(),
        }
    }
}

impl Stage for BottlingPhase {
    fn press(&mut self, pointer: PointerId, point: Vec2) {
        if self.sealed {
            return;
        }
        if !self.filled {
            if jar_rect().contains(point) {
                self.filled = true;
                log::debug!("Jar filled");
                self.events.push(FeedbackEvent::Placed);
            }
            return;
        }
        if lid_rest_rect().contains(point)
            && self.drag.press(pointer, point, ()) == PressOutcome::Started
        {
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
        if !contains(&jar_rect(), release.point, Margins::uniform(LID_SLACK)) {
            self.misses += 1;
            log::debug!("Lid missed the jar ({} misses)", self.misses);
            self.events.push(FeedbackEvent::DropFailed);
            return;
        }

        self.sealed = true;
        let score = incident_penalty(100.0, self.misses);
        log::info!("Jar sealed after {} misses, bottling {score}", self.misses);
        self.events.push(FeedbackEvent::SealCompleted);
        self.completion = Some(SettleTimer::new(
            BOTTLING_SETTLE,
            StageCompletion::new(StageKey::BottlingScore, score),
        ));
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
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drop_lid(phase: &mut BottlingPhase, at: Vec2) {
        phase.press(0, lid_rest_rect().center());
        phase.move_to(at);
        phase.release(at);
    }

    #[test]
    fn test_fill_then_seal() {
        let mut phase = BottlingPhase::new();
        phase.press(0, jar_rect().center());
        phase.release(jar_rect().center());
        assert!(phase.is_filled());

        drop_lid(&mut phase, jar_rect().center());
        assert!(phase.is_sealed());
        assert_eq!(phase.lid_position(), jar_rect().center());

        let done = phase.tick(BOTTLING_SETTLE).unwrap();
        assert_eq!(done.key, StageKey::BottlingScore);
        assert_eq!(done.value, 100.0);
    }

    #[test]
    fn test_lid_locked_until_filled() {
        let mut phase = BottlingPhase::new();
        drop_lid(&mut phase, jar_rect().center());
        assert!(!phase.is_sealed());
        assert_eq!(phase.misses(), 0);
    }

    #[test]
    fn test_missed_lid_costs_fifteen() {
        let mut phase = BottlingPhase::new();
        phase.press(0, jar_rect().center());

        drop_lid(&mut phase, Vec2::new(10.0, 10.0));
        assert_eq!(phase.misses(), 1);
        assert_eq!(phase.lid_position(), lid_rest_rect().center());

        // Just outside the jar but within the slack
        let jar = jar_rect();
        drop_lid(&mut phase, Vec2::new(jar.max.x + LID_SLACK - 1.0, jar.center().y));
        assert!(phase.is_sealed());
        assert_eq!(phase.tick(BOTTLING_SETTLE).unwrap().value, 85.0);
    }
}
