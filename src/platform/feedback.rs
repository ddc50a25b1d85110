//! Haptic feedback collaborator
//!
//! Fire-and-forget pulses on notable events. Purely cosmetic: nothing in the
//! game reads feedback back.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Events that request a pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackEvent {
    /// A gap was severed
    CutMade,
    /// The tool touched a cell's meat
    CellDamaged,
    /// A piece, spice or lid was picked up
    PickedUp,
    /// Something landed on its target
    Placed,
    /// Something missed its target
    DropFailed,
    /// Mixing progressed
    Shake,
    /// The jar lid closed
    SealCompleted,
}

impl FeedbackEvent {
    /// Vibration length in milliseconds
    pub fn pulse_ms(&self) -> u32 {
        match self {
            FeedbackEvent::CutMade => 10,
            FeedbackEvent::CellDamaged => 50,
            FeedbackEvent::PickedUp => 20,
            FeedbackEvent::Placed => 30,
            FeedbackEvent::DropFailed => 100,
            FeedbackEvent::Shake => 50,
            FeedbackEvent::SealCompleted => 40,
        }
    }
}

pub trait Feedback {
    fn pulse(&mut self, event: FeedbackEvent);
}

/// Discards every pulse
#[derive(Debug, Default, Clone, Copy)]
pub struct NullFeedback;

impl Feedback for NullFeedback {
    fn pulse(&mut self, _event: FeedbackEvent) {}
}

/// Records pulses; clones share the same log
#[derive(Debug, Default, Clone)]
pub struct RecordingFeedback {
    log: Rc<RefCell<Vec<FeedbackEvent>>>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<FeedbackEvent> {
        self.log.borrow().clone()
    }

    pub fn count(&self, event: FeedbackEvent) -> usize {
        self.log.borrow().iter().filter(|&&e| e == event).count()
    }
}

impl Feedback for RecordingFeedback {
    fn pulse(&mut self, event: FeedbackEvent) {
        self.log.borrow_mut().push(event);
    }
}

/// `navigator.vibrate` in the browser
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct Vibrate;

#[cfg(target_arch = "wasm32")]
impl Feedback for Vibrate {
    fn pulse(&mut self, event: FeedbackEvent) {
        if let Some(window) = web_sys::window() {
            let _ = window.navigator().vibrate_with_duration(event.pulse_ms());
        }
    }
}
