//! Platform abstraction layer
//!
//! Collaborators the game core talks to without knowing the platform:
//! - Haptic feedback pulses
//! - Motion (accelerometer) input
//! - Browser adapter translating pointer events (wasm32)

pub mod feedback;
pub mod motion;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use feedback::{Feedback, FeedbackEvent, NullFeedback, RecordingFeedback};
pub use motion::{BufferedMotion, MotionPermission, MotionSample, MotionSource, NoMotion};
