//! Connectivity model of the tofu block
//!
//! An N×N grid of cells joined by severable edges. Cells only move forward
//! (`Fresh -> Damaged`, `Fresh -> InBowl`) and edges only go from unsevered
//! to severed; nothing is ever removed.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Row-major cell index, `row * n + col`
pub type CellId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Fresh,
    Damaged,
    InBowl,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub id: CellId,
    pub row: usize,
    pub col: usize,
    pub state: CellState,
}

/// Which neighbours an edge joins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeOrientation {
    /// Left/right neighbours; the gap line runs vertically
    Horizontal,
    /// Top/bottom neighbours; the gap line runs horizontally
    Vertical,
}

/// Stable edge identity, displayed as `h-row-col` / `v-row-col`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeId {
    pub orientation: EdgeOrientation,
    pub row: usize,
    pub col: usize,
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.orientation {
            EdgeOrientation::Horizontal => 'h',
            EdgeOrientation::Vertical => 'v',
        };
        write!(f, "{}-{}-{}", prefix, self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub cell_a: CellId,
    pub cell_b: CellId,
    pub orientation: EdgeOrientation,
    pub severed: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SeverOutcome {
    NoChange,
    Severed,
    /// This cut severed the last remaining edge
    Completed,
}

impl SeverOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, SeverOutcome::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, MarkOutcome::Changed)
    }
}

/// Separated sides of a cell (presentation helper for gap rendering)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GapSides {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    n: usize,
    cells: Vec<Cell>,
    edges: Vec<Edge>,
    severed_count: usize,
}

impl Grid {
    /// Build a fully connected `n`×`n` grid
    ///
    /// # Panics
    /// If `n < 2`.
    pub fn new(n: usize) -> Self {
        assert!(n >= 2, "grid size must be at least 2, got {n}");

        let cells = (0..n * n)
            .map(|id| Cell {
                id,
                row: id / n,
                col: id % n,
                state: CellState::Fresh,
            })
            .collect();

        let mut edges = Vec::with_capacity(2 * n * (n - 1));
        for row in 0..n {
            for col in 0..n - 1 {
                edges.push(Edge {
                    id: EdgeId {
                        orientation: EdgeOrientation::Horizontal,
                        row,
                        col,
                    },
                    cell_a: row * n + col,
                    cell_b: row * n + col + 1,
                    orientation: EdgeOrientation::Horizontal,
                    severed: false,
                });
            }
        }
        for row in 0..n - 1 {
            for col in 0..n {
                edges.push(Edge {
                    id: EdgeId {
                        orientation: EdgeOrientation::Vertical,
                        row,
                        col,
                    },
                    cell_a: row * n + col,
                    cell_b: (row + 1) * n + col,
                    orientation: EdgeOrientation::Vertical,
                    severed: false,
                });
            }
        }

        Self {
            n,
            cells,
            edges,
            severed_count: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id)
    }

    /// Position of an edge in `edges()`
    pub fn edge_index(&self, id: EdgeId) -> Option<usize> {
        let n = self.n;
        match id.orientation {
            EdgeOrientation::Horizontal if id.row < n && id.col + 1 < n => {
                Some(id.row * (n - 1) + id.col)
            }
            EdgeOrientation::Vertical if id.row + 1 < n && id.col < n => {
                Some(n * (n - 1) + id.row * n + id.col)
            }
            _ => None,
        }
    }

    /// Sever the edge at `index`; idempotent
    pub fn sever(&mut self, index: usize) -> SeverOutcome {
        let Some(edge) = self.edges.get_mut(index) else {
            return SeverOutcome::NoChange;
        };
        if edge.severed {
            return SeverOutcome::NoChange;
        }
        edge.severed = true;
        self.severed_count += 1;

        if self.is_complete() {
            SeverOutcome::Completed
        } else {
            SeverOutcome::Severed
        }
    }

    /// Mark a Fresh cell as damaged
    pub fn damage(&mut self, id: CellId) -> MarkOutcome {
        self.transition(id, CellState::Damaged)
    }

    /// Mark a Fresh cell as placed in the bowl
    pub fn place_in_bowl(&mut self, id: CellId) -> MarkOutcome {
        self.transition(id, CellState::InBowl)
    }

    fn transition(&mut self, id: CellId, to: CellState) -> MarkOutcome {
        match self.cells.get_mut(id) {
            Some(cell) if cell.state == CellState::Fresh => {
                cell.state = to;
                MarkOutcome::Changed
            }
            _ => MarkOutcome::NoChange,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.severed_count == self.edges.len()
    }

    pub fn severed_count(&self) -> usize {
        self.severed_count
    }

    pub fn count_in(&self, state: CellState) -> usize {
        self.cells.iter().filter(|c| c.state == state).count()
    }

    pub fn damaged_count(&self) -> usize {
        self.count_in(CellState::Damaged)
    }

    /// Which sides of a cell have been cut free
    pub fn gap_sides(&self, id: CellId) -> GapSides {
        let n = self.n;
        let Some(cell) = self.cells.get(id) else {
            return GapSides::default();
        };
        let severed = |orientation, row, col| {
            self.edge_index(EdgeId {
                orientation,
                row,
                col,
            })
            .map(|i| self.edges[i].severed)
            .unwrap_or(false)
        };
        GapSides {
            top: cell.row > 0 && severed(EdgeOrientation::Vertical, cell.row - 1, cell.col),
            bottom: cell.row + 1 < n && severed(EdgeOrientation::Vertical, cell.row, cell.col),
            left: cell.col > 0 && severed(EdgeOrientation::Horizontal, cell.row, cell.col - 1),
            right: cell.col + 1 < n && severed(EdgeOrientation::Horizontal, cell.row, cell.col),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_three_by_three_layout() {
        let grid = Grid::new(3);
        assert_eq!(grid.cells().len(), 9);
        assert_eq!(grid.edges().len(), 12);
        assert_eq!(grid.edges()[0].id.to_string(), "h-0-0");
        assert_eq!(grid.edges()[6].id.to_string(), "v-0-0");
        assert_eq!(grid.edges()[6].cell_b, 3);
        let cell = grid.cell(5).unwrap();
        assert_eq!((cell.row, cell.col), (1, 2));
    }

    #[test]
    #[should_panic]
    fn test_size_one_is_rejected() {
        Grid::new(1);
    }

    #[test]
    fn test_edge_index_matches_position() {
        let grid = Grid::new(4);
        for (i, edge) in grid.edges().iter().enumerate() {
            assert_eq!(grid.edge_index(edge.id), Some(i));
        }
        assert_eq!(
            grid.edge_index(EdgeId {
                orientation: EdgeOrientation::Horizontal,
                row: 0,
                col: 3
            }),
            None
        );
    }

    #[test]
    fn test_edge_ids_are_unique() {
        let grid = Grid::new(5);
        let ids: std::collections::HashSet<EdgeId> = grid.edges().iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), grid.edges().len());
    }

    #[test]
    fn test_sever_is_idempotent() {
        let mut grid = Grid::new(2);
        assert_eq!(grid.sever(0), SeverOutcome::Severed);
        assert_eq!(grid.sever(0), SeverOutcome::NoChange);
        assert_eq!(grid.severed_count(), 1);
        assert_eq!(grid.sever(99), SeverOutcome::NoChange);
    }

    #[test]
    fn test_damage_only_fresh_cells() {
        let mut grid = Grid::new(2);
        assert_eq!(grid.damage(1), MarkOutcome::Changed);
        assert_eq!(grid.damage(1), MarkOutcome::NoChange);
        assert_eq!(grid.place_in_bowl(1), MarkOutcome::NoChange);
        assert_eq!(grid.place_in_bowl(2), MarkOutcome::Changed);
        assert_eq!(grid.damaged_count(), 1);
        assert_eq!(grid.count_in(CellState::InBowl), 1);
    }

    #[test]
    fn test_gap_sides() {
        let mut grid = Grid::new(3);
        let right_of_center = grid
            .edge_index(EdgeId {
                orientation: EdgeOrientation::Horizontal,
                row: 1,
                col: 1,
            })
            .unwrap();
        grid.sever(right_of_center);
        let sides = grid.gap_sides(4);
        assert!(sides.right);
        assert!(!sides.left && !sides.top && !sides.bottom);
        assert!(grid.gap_sides(5).left);
    }

    proptest! {
        #[test]
        fn prop_fresh_grid_shape(n in 2usize..12) {
            let grid = Grid::new(n);
            prop_assert_eq!(grid.cells().len(), n * n);
            prop_assert_eq!(grid.edges().len(), 2 * n * (n - 1));
            prop_assert!(grid.cells().iter().all(|c| c.state == CellState::Fresh));
            prop_assert!(grid.edges().iter().all(|e| !e.severed));
            prop_assert!(!grid.is_complete());
        }

        #[test]
        fn prop_any_order_completes(order in (2usize..7).prop_flat_map(|n| {
            Just((0..2 * n * (n - 1)).collect::<Vec<_>>()).prop_shuffle().prop_map(move |o| (n, o))
        })) {
            let (n, order) = order;
            let mut grid = Grid::new(n);
            let last = order.len() - 1;
            for (step, &index) in order.iter().enumerate() {
                let outcome = grid.sever(index);
                if step == last {
                    prop_assert_eq!(outcome, SeverOutcome::Completed);
                } else {
                    prop_assert_eq!(outcome, SeverOutcome::Severed);
                    prop_assert!(!grid.is_complete());
                }
                // Re-cutting never double counts
                prop_assert_eq!(grid.sever(index), SeverOutcome::NoChange);
            }
            prop_assert!(grid.is_complete());
            prop_assert_eq!(grid.damaged_count(), 0);
        }
    }
}
