//! Cutting stage
//!
//! The player sweeps a spoon across the tofu block. Passing through a gap
//! severs the edge there; touching a cell's meat damages it. The stage is
//! done when every edge is severed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::drag::{PointerDrag, PointerId, PressOutcome};
use super::grid::{CellId, CellState, EdgeOrientation, Grid, SeverOutcome};
use super::hit_test::{Axis, EdgeWindow, Rect};
use super::stage::Stage;
use super::state::{StageCompletion, StageKey};
use super::timer::SettleTimer;
use crate::consts::*;
use crate::platform::FeedbackEvent;
use crate::scoring::incident_penalty;

/// Direction the cutting tool is being swept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolOrientation {
    Horizontal,
    Vertical,
}

impl ToolOrientation {
    /// Dominant axis of a displacement, `None` inside the deadzone
    pub fn from_delta(delta: Vec2, deadzone: f32) -> Option<Self> {
        if delta.length() < deadzone {
            return None;
        }
        if delta.y.abs() > delta.x.abs() {
            Some(ToolOrientation::Vertical)
        } else {
            Some(ToolOrientation::Horizontal)
        }
    }

    /// A tool cuts along a gap line, i.e. across the edge's neighbour axis
    pub fn cuts(self, edge: EdgeOrientation) -> bool {
        matches!(
            (self, edge),
            (ToolOrientation::Vertical, EdgeOrientation::Horizontal)
                | (ToolOrientation::Horizontal, EdgeOrientation::Vertical)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolMode {
    /// Any sample inside a gap window severs it
    #[default]
    Any,
    /// The sweep direction has to follow the gap line
    Oriented,
}

/// Board-space layout of an N×N block on the cutting board
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardLayout {
    pub n: usize,
    pub cell_size: f32,
}

impl BoardLayout {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            cell_size: BOARD_SIZE / n as f32,
        }
    }

    pub fn cell_rect(&self, row: usize, col: usize) -> Rect {
        Rect::from_origin_size(
            Vec2::new(col as f32, row as f32) * self.cell_size,
            Vec2::splat(self.cell_size),
        )
    }

    /// The part of a cell that gets damaged when touched
    pub fn meat_rect(&self, row: usize, col: usize) -> Rect {
        self.cell_rect(row, col).interior(CELL_PADDING * self.cell_size)
    }

    /// Hit window of the gap on the far side of `(row, col)`
    pub fn edge_window(&self, orientation: EdgeOrientation, row: usize, col: usize) -> EdgeWindow {
        let s = self.cell_size;
        let (midpoint, line) = match orientation {
            EdgeOrientation::Horizontal => (
                Vec2::new((col as f32 + 1.0) * s, (row as f32 + 0.5) * s),
                Axis::Vertical,
            ),
            EdgeOrientation::Vertical => (
                Vec2::new((col as f32 + 0.5) * s, (row as f32 + 1.0) * s),
                Axis::Horizontal,
            ),
        };
        EdgeWindow {
            midpoint,
            line,
            across: GAP_ACROSS * s,
            along: GAP_ALONG * s,
        }
    }
}

/// Result of one pointer sample against the block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CutSample {
    pub damaged: Vec<CellId>,
    pub severed: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct CuttingPhase {
    grid: Grid,
    layout: BoardLayout,
    drag: PointerDrag<()>,
    tool_mode: ToolMode,
    tool: Option<ToolOrientation>,
    /// Where the current orientation was last measured from
    anchor: Vec2,
    completion: Option<SettleTimer<StageCompletion>>,
    events: Vec<FeedbackEvent>,
}

impl CuttingPhase {
    pub fn new(n: usize, tool_mode: ToolMode) -> Self {
        Self {
            grid: Grid::new(n),
            layout: BoardLayout::new(n),
            drag: PointerDrag::new(),
            tool_mode,
            tool: None,
            anchor: Vec2::ZERO,
            completion: None,
            events: Vec::new(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn layout(&self) -> BoardLayout {
        self.layout
    }

    pub fn tool(&self) -> Option<ToolOrientation> {
        self.tool
    }

    pub fn tool_mode(&self) -> ToolMode {
        self.tool_mode
    }

    /// Spoon position for the cursor overlay
    pub fn cursor(&self) -> Vec2 {
        self.drag.cursor()
    }

    pub fn is_complete(&self) -> bool {
        self.grid.is_complete()
    }

    /// Integrity the stage reports: 15 points per damaged cell
    pub fn integrity(&self) -> f32 {
        incident_penalty(100.0, self.grid.damaged_count() as u32)
    }

    fn update_tool(&mut self, point: Vec2) {
        if let Some(orientation) = ToolOrientation::from_delta(point - self.anchor, TOOL_DEADZONE) {
            self.tool = Some(orientation);
            self.anchor = point;
        }
    }

    fn can_cut(&self, edge: EdgeOrientation) -> bool {
        match self.tool_mode {
            ToolMode::Any => true,
            ToolMode::Oriented => self.tool.is_some_and(|tool| tool.cuts(edge)),
        }
    }

    /// Run one drag sample: damage first, then sever
    fn apply_sample(&mut self, point: Vec2) -> CutSample {
        let mut sample = CutSample::default();

        let touched: Vec<CellId> = self
            .grid
            .cells()
            .iter()
            .filter(|c| {
                c.state == CellState::Fresh
                    && self.layout.meat_rect(c.row, c.col).contains_strict(point)
            })
            .map(|c| c.id)
            .collect();
        for id in touched {
            if self.grid.damage(id).has_update() {
                log::debug!("Cell {id} damaged at ({:.0}, {:.0})", point.x, point.y);
                self.events.push(FeedbackEvent::CellDamaged);
                sample.damaged.push(id);
            }
        }

        let hits: Vec<usize> = self
            .grid
            .edges()
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.severed && self.can_cut(e.orientation))
            .filter(|(_, e)| {
                let a = &self.grid.cells()[e.cell_a];
                self.layout.edge_window(e.orientation, a.row, a.col).hit(point)
            })
            .map(|(i, _)| i)
            .collect();
        for index in hits {
            let outcome = self.grid.sever(index);
            if outcome.has_update() {
                log::debug!("Edge {} severed", self.grid.edges()[index].id);
                self.events.push(FeedbackEvent::CutMade);
                sample.severed.push(index);
            }
            if outcome == SeverOutcome::Completed {
                self.finish();
            }
        }

        sample
    }

    fn finish(&mut self) {
        let integrity = self.integrity();
        log::info!(
            "Cutting complete: {} damaged cells, integrity {integrity}",
            self.grid.damaged_count()
        );
        self.drag.cancel();
        self.completion = Some(SettleTimer::new(
            CUT_SETTLE,
            StageCompletion::new(StageKey::Integrity, integrity),
        ));
    }
}

impl Stage for CuttingPhase {
    fn press(&mut self, pointer: PointerId, point: Vec2) {
        if self.is_complete() {
            return;
        }
        if self.drag.press(pointer, point, ()) == PressOutcome::Started {
            self.anchor = point;
        }
    }

    fn move_to(&mut self, point: Vec2) {
        if self.is_complete() || self.drag.move_to(point).is_none() {
            return;
        }
        self.update_tool(point);
        self.apply_sample(point);
    }

    fn release(&mut self, point: Vec2) {
        self.drag.release(point);
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
