//! Motion input collaborator
//!
//! Supplies acceleration samples for shaking the seasoning bowl. Access may
//! be permission-gated; anything other than `Granted` means the game falls
//! back to manual shaking with unchanged scoring.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// One acceleration sample (including gravity), m/s²
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl MotionSample {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Sum of per-axis absolute differences
    pub fn delta(&self, other: &MotionSample) -> f32 {
        (self.x - other.x).abs() + (self.y - other.y).abs() + (self.z - other.z).abs()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionPermission {
    /// Not asked yet
    Prompt,
    Granted,
    Denied,
    /// No sensor on this platform
    Unsupported,
}

impl MotionPermission {
    pub fn is_granted(self) -> bool {
        matches!(self, MotionPermission::Granted)
    }
}

pub trait MotionSource {
    fn permission(&self) -> MotionPermission;

    /// Ask for access; returns the resulting state
    fn request_permission(&mut self) -> MotionPermission;

    /// Samples received since the last poll (empty unless granted)
    fn poll(&mut self) -> Vec<MotionSample>;
}

/// No sensor available
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMotion;

impl MotionSource for NoMotion {
    fn permission(&self) -> MotionPermission {
        MotionPermission::Unsupported
    }

    fn request_permission(&mut self) -> MotionPermission {
        MotionPermission::Unsupported
    }

    fn poll(&mut self) -> Vec<MotionSample> {
        Vec::new()
    }
}

/// Samples pushed in by a platform adapter or a test script
#[derive(Debug, Clone)]
pub struct BufferedMotion {
    permission: MotionPermission,
    /// What `request_permission` resolves to
    grant: MotionPermission,
    pending: VecDeque<MotionSample>,
}

impl BufferedMotion {
    /// A source that grants access when asked
    pub fn granting() -> Self {
        Self {
            permission: MotionPermission::Prompt,
            grant: MotionPermission::Granted,
            pending: VecDeque::new(),
        }
    }

    /// A source whose permission request is refused
    pub fn denying() -> Self {
        Self {
            permission: MotionPermission::Prompt,
            grant: MotionPermission::Denied,
            pending: VecDeque::new(),
        }
    }

    /// Adopt the answer to a permission prompt shown by the host
    pub fn resolve(&mut self, granted: bool) {
        let outcome = if granted {
            MotionPermission::Granted
        } else {
            MotionPermission::Denied
        };
        self.grant = outcome;
        self.permission = outcome;
    }

    pub fn push(&mut self, sample: MotionSample) {
        self.pending.push_back(sample);
    }
}

impl MotionSource for BufferedMotion {
    fn permission(&self) -> MotionPermission {
        self.permission
    }

    fn request_permission(&mut self) -> MotionPermission {
        if self.permission == MotionPermission::Prompt {
            self.permission = self.grant;
        }
        self.permission
    }

    fn poll(&mut self) -> Vec<MotionSample> {
        if !self.permission.is_granted() {
            self.pending.clear();
            return Vec::new();
        }
        self.pending.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denied_source_yields_nothing() {
        let mut motion = BufferedMotion::denying();
        motion.push(MotionSample::new(1.0, 2.0, 3.0));
        assert_eq!(motion.request_permission(), MotionPermission::Denied);
        assert!(motion.poll().is_empty());
    }

    #[test]
    fn test_granted_source_drains() {
        let mut motion = BufferedMotion::granting();
        assert!(motion.poll().is_empty());
        motion.request_permission();
        motion.push(MotionSample::new(1.0, 0.0, 0.0));
        motion.push(MotionSample::new(0.0, 1.0, 0.0));
        assert_eq!(motion.poll().len(), 2);
        assert!(motion.poll().is_empty());
    }

    #[test]
    fn test_host_denial_overrides_grant() {
        let mut motion = BufferedMotion::granting();
        motion.resolve(false);
        assert_eq!(motion.permission(), MotionPermission::Denied);
        assert_eq!(motion.request_permission(), MotionPermission::Denied);
        motion.push(MotionSample::new(1.0, 0.0, 0.0));
        assert!(motion.poll().is_empty());

        motion.resolve(true);
        motion.push(MotionSample::new(1.0, 0.0, 0.0));
        assert_eq!(motion.poll().len(), 1);
    }

    #[test]
    fn test_sample_delta() {
        let a = MotionSample::new(0.0, 9.8, 0.0);
        let b = MotionSample::new(6.0, -2.2, 3.0);
        assert!((a.delta(&b) - 21.0).abs() < 1e-4);
    }
}
