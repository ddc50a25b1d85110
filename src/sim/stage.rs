//! Common surface of the interactive stages
//!
//! The orchestrator forwards pointer input to whichever stage is mounted and
//! ticks it; a stage reports completion exactly once, from its settle timer.

use glam::Vec2;

use super::drag::PointerId;
use super::state::StageCompletion;
use crate::platform::{FeedbackEvent, MotionSample};

pub trait Stage {
    fn press(&mut self, pointer: PointerId, point: Vec2);

    fn move_to(&mut self, point: Vec2);

    fn release(&mut self, point: Vec2);

    /// Advance timers and continuous input by `dt` seconds
    fn tick(&mut self, dt: f32) -> Option<StageCompletion>;

    /// Feedback requested since the last call
    fn take_events(&mut self) -> Vec<FeedbackEvent>;

    /// The stage has finished and is only waiting for its settle delay
    fn is_settling(&self) -> bool;

    /// Manual mixing; stages without a mixing step ignore it
    fn shake(&mut self) {}

    /// Accelerometer input; stages without a mixing step ignore it
    fn motion(&mut self, _sample: MotionSample) {}
}
