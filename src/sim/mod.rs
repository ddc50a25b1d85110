//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (cosmetic placement)
//! - Stable iteration order (row-major cells, horizontal edges first)
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod bottling;
pub mod cutting;
pub mod drag;
pub mod game;
pub mod grid;
pub mod pour;
pub mod scatter;
pub mod seasoning;
pub mod stage;
pub mod state;
pub mod timer;
pub mod transfer;

pub use autoplay::{Autoplay, AutoplayPlan};
pub use bottling::BottlingPhase;
pub use cutting::{BoardLayout, CuttingPhase, ToolMode, ToolOrientation};
pub use drag::{DragRelease, DragSession, PointerDrag, PointerId, PressOutcome};
pub use game::{ActiveStage, Game, RunSummary};
pub use grid::{Cell, CellId, CellState, Edge, EdgeId, EdgeOrientation, Grid, SeverOutcome};
pub use hit_test::{EdgeWindow, Margins, Rect, contains};
pub use pour::PourPhase;
pub use scatter::{Placement, Scatter};
pub use seasoning::{Ingredient, IngredientCounts, SeasoningPhase};
pub use stage::Stage;
pub use state::{GamePhase, StageCompletion, StageKey, StageScore};
pub use timer::SettleTimer;
pub use transfer::TransferPhase;
