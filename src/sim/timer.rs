//! Settle delays
//!
//! A stage that finishes keeps playing its closing animation for a moment
//! before the game advances. The timer is owned by the stage, so dropping the
//! stage cancels it, and its payload can only be taken once.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettleTimer<T> {
    remaining: f32,
    payload: Option<T>,
}

impl<T> SettleTimer<T> {
    pub fn new(delay: f32, payload: T) -> Self {
        Self {
            remaining: delay.max(0.0),
            payload: Some(payload),
        }
    }

    /// Advance by `dt` seconds; yields the payload exactly once when due
    pub fn tick(&mut self, dt: f32) -> Option<T> {
        self.payload.as_ref()?;
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.payload.take()
        } else {
            None
        }
    }

    pub fn is_pending(&self) -> bool {
        self.payload.is_some()
    }

    pub fn remaining(&self) -> f32 {
        self.remaining.max(0.0)
    }

    pub fn cancel(&mut self) {
        self.payload = None;
    }
}
