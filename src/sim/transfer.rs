//! Transfer stage
//!
//! Each cut piece is carried from the board into the bowl. A piece released
//! anywhere but over the bowl is dropped and counts against integrity.

use glam::Vec2;

use super::cutting::BoardLayout;
use super::drag::{PointerDrag, PointerId, PressOutcome};
use super::grid::{CellId, CellState, Grid};
use super::hit_test::{Margins, Rect, contains};
use super::scatter::{Placement, Scatter};
use super::stage::Stage;
use super::state::{StageCompletion, StageKey};
use super::timer::SettleTimer;
use crate::consts::*;
use crate::platform::FeedbackEvent;
use crate::scoring::incident_penalty;

/// How far above the bowl rim a release still counts as in the bowl
pub const BOWL_LIP: f32 = 50.0;

/// Bowl to the right of the board
pub fn bowl_rect() -> Rect {
    Rect::from_origin_size(Vec2::new(400.0, 120.0), Vec2::new(200.0, 160.0))
}

#[derive(Debug, Clone)]
pub struct TransferPhase {
    pieces: Grid,
    layout: BoardLayout,
    drag: PointerDrag<CellId>,
    /// Integrity carried in from cutting
    integrity: f32,
    dropped: u32,
    scatter: Scatter,
    placements: Vec<(CellId, Placement)>,
    completion: Option<SettleTimer<StageCompletion>>,
    events: Vec<FeedbackEvent>,
}

impl TransferPhase {
    pub fn new(n: usize, integrity: f32, seed: u64) -> Self {
        Self {
            pieces: Grid::new(n),
            layout: BoardLayout::new(n),
            drag: PointerDrag::new(),
            integrity,
            dropped: 0,
            scatter: Scatter::new(seed),
            placements: Vec::new(),
            completion: None,
            events: Vec::new(),
        }
    }

    pub fn pieces(&self) -> &Grid {
        &self.pieces
    }

    pub fn layout(&self) -> BoardLayout {
        self.layout
    }

    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Pieces in the bowl with their cosmetic placement, in landing order
    pub fn placements(&self) -> &[(CellId, Placement)] {
        &self.placements
    }

    pub fn held(&self) -> Option<CellId> {
        self.drag.session().map(|s| s.payload)
    }

    pub fn cursor(&self) -> Vec2 {
        self.drag.cursor()
    }

    /// Every piece is either in the bowl or on the floor
    pub fn all_processed(&self) -> bool {
        self.pieces.count_in(CellState::Fresh) == 0
    }

    fn piece_at(&self, point: Vec2) -> Option<CellId> {
        self.pieces
            .cells()
            .iter()
            .filter(|c| c.state == CellState::Fresh)
            .find(|c| self.layout.cell_rect(c.row, c.col).contains(point))
            .map(|c| c.id)
    }

    fn land(&mut self, id: CellId, point: Vec2) {
        if contains(&bowl_rect(), point, Margins::top(BOWL_LIP)) {
            if self.pieces.place_in_bowl(id).has_update() {
                let placement = self.scatter.next_placement();
                self.placements.push((id, placement));
                self.events.push(FeedbackEvent::Placed);
            }
        } else if self.pieces.damage(id).has_update() {
            self.dropped += 1;
            log::debug!("Piece {id} dropped ({} so far)", self.dropped);
            self.events.push(FeedbackEvent::DropFailed);
        }

        if self.all_processed() {
            let integrity = incident_penalty(self.integrity, self.dropped);
            log::info!(
                "Transfer complete: {} dropped, integrity {} -> {integrity}",
                self.dropped,
                self.integrity
            );
            self.completion = Some(SettleTimer::new(
                TRANSFER_SETTLE,
                StageCompletion::new(StageKey::Integrity, integrity),
            ));
        }
    }
}

impl Stage for TransferPhase {
    fn press(&mut self, pointer: PointerId, point: Vec2) {
        if self.completion.is_some() || self.drag.is_active() {
            return;
        }
        let Some(id) = self.piece_at(point) else {
            return;
        };
        if self.drag.press(pointer, point, id) == PressOutcome::Started {
            self.events.push(FeedbackEvent::PickedUp);
        }
    }

    fn move_to(&mut self, point: Vec2) {
        self.drag.move_to(point);
    }

    fn release(&mut self, point: Vec2) {
        if let Some(release) = self.drag.release(point) {
            self.land(release.payload, release.point);
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
}
