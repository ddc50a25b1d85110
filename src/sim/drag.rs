//! Pointer press/move/release tracking shared by every interactive stage
//!
//! The platform layer translates its pointer events into these three calls;
//! the owning stage decides the payload and runs its own hit tests.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Identifies a pointer (mouse = 0, touches by their platform id)
pub type PointerId = u32;

/// One press-to-release interaction carrying a payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragSession<P> {
    pub pointer: PointerId,
    pub payload: P,
    /// Where the press happened
    pub origin: Vec2,
    /// Latest sampled point
    pub current: Vec2,
}

impl<P> DragSession<P> {
    /// Displacement since the press
    pub fn delta(&self) -> Vec2 {
        self.current - self.origin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    Started,
    /// A session was already active (first press wins)
    Ignored,
}

/// Resolution of a finished session
#[derive(Debug, Clone, PartialEq)]
pub struct DragRelease<P> {
    pub pointer: PointerId,
    pub payload: P,
    pub origin: Vec2,
    pub point: Vec2,
}

/// At most one live drag session plus the logical cursor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointerDrag<P> {
    session: Option<DragSession<P>>,
    /// Logical cursor, tracked even without an active session
    cursor: Vec2,
}

impl<P> Default for PointerDrag<P> {
    fn default() -> Self {
        Self {
            session: None,
            cursor: Vec2::ZERO,
        }
    }
}

impl<P> PointerDrag<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession<P>> {
        self.session.as_ref()
    }

    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    pub fn press(&mut self, pointer: PointerId, point: Vec2, payload: P) -> PressOutcome {
        self.cursor = point;
        if self.session.is_some() {
            return PressOutcome::Ignored;
        }
        self.session = Some(DragSession {
            pointer,
            payload,
            origin: point,
            current: point,
        });
        PressOutcome::Started
    }

    /// Update the cursor; returns the active session for hit testing
    pub fn move_to(&mut self, point: Vec2) -> Option<&DragSession<P>> {
        self.cursor = point;
        let session = self.session.as_mut()?;
        session.current = point;
        Some(session)
    }

    /// Finish the active session, `None` if there was nothing to release
    pub fn release(&mut self, point: Vec2) -> Option<DragRelease<P>> {
        self.cursor = point;
        let session = self.session.take()?;
        Some(DragRelease {
            pointer: session.pointer,
            payload: session.payload,
            origin: session.origin,
            point,
        })
    }

    /// Drop the session without resolving it
    pub fn cancel(&mut self) {
        self.session = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_move_release() {
        let mut drag: PointerDrag<u32> = PointerDrag::new();
        assert_eq!(drag.press(0, Vec2::new(1.0, 2.0), 7), PressOutcome::Started);
        assert!(drag.is_active());

        let session = drag.move_to(Vec2::new(4.0, 6.0)).unwrap();
        assert_eq!(session.delta(), Vec2::new(3.0, 4.0));

        let release = drag.release(Vec2::new(5.0, 5.0)).unwrap();
        assert_eq!(release.payload, 7);
        assert_eq!(release.point, Vec2::new(5.0, 5.0));
        assert!(!drag.is_active());
    }

    #[test]
    fn test_first_press_wins() {
        let mut drag: PointerDrag<&str> = PointerDrag::new();
        drag.press(0, Vec2::ZERO, "first");
        assert_eq!(drag.press(1, Vec2::ONE, "second"), PressOutcome::Ignored);
        assert_eq!(drag.session().unwrap().payload, "first");
        assert_eq!(drag.cursor(), Vec2::ONE);
    }

    #[test]
    fn test_release_without_session_is_noop() {
        let mut drag: PointerDrag<u8> = PointerDrag::new();
        assert!(drag.release(Vec2::new(9.0, 9.0)).is_none());
        assert!(drag.move_to(Vec2::new(3.0, 3.0)).is_none());
        assert_eq!(drag.cursor(), Vec2::new(3.0, 3.0));
    }

    #[test]
    fn test_cancel_drops_session() {
        let mut drag: PointerDrag<u8> = PointerDrag::new();
        drag.press(0, Vec2::ZERO, 1);
        drag.cancel();
        assert!(drag.release(Vec2::ZERO).is_none());
    }
}
