//! Fermented Tofu Master - a stage-based fermenting mini-game
//!
//! Core modules:
//! - `sim`: Deterministic stage simulation (grid cutting, drag and drop, pouring, mixing)
//! - `scoring`: Per-stage scoring functions and the final rating
//! - `leaderboard`: Top 10 local records
//! - `persistence`: Key-value storage collaborator
//! - `platform`: Haptic feedback and motion input collaborators
//! - `settings`: Difficulty and preferences

pub mod error;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod scoring;
pub mod settings;
pub mod sim;

pub use error::{GameError, Result};
pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use settings::{Difficulty, GameVariant, Settings};

/// Game configuration constants
pub mod consts {
    /// Frame timestep the per-frame rates are tuned for (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Maximum frames simulated per `tick` call
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Side length of the square cutting board, in board units
    pub const BOARD_SIZE: f32 = 320.0;
    /// Padding around each cell's "meat", as a fraction of the cell side
    pub const CELL_PADDING: f32 = 0.14;
    /// Edge hit window half-extent across the cut line (fraction of cell side)
    pub const GAP_ACROSS: f32 = 0.28;
    /// Edge hit window half-extent along the cut line (fraction of cell side)
    pub const GAP_ALONG: f32 = 0.47;
    /// Minimum displacement before the cutting tool re-orients
    pub const TOOL_DEADZONE: f32 = 4.0;

    /// Score lost per incident (damaged cell, dropped piece, missed lid)
    pub const PENALTY_PER_INCIDENT: f32 = 15.0;
    /// Score lost per unit of fill outside the pour window
    pub const POUR_PENALTY_PER_UNIT: f32 = 4.0;

    /// Pour fill added per frame while the bottle is held
    pub const FILL_RATE: f32 = 0.4;
    /// Fill stops rising here even if the player keeps pouring
    pub const FILL_CAP: f32 = 105.0;

    /// Seasoning composition rules
    pub const MIN_VARIETY: usize = 3;
    pub const MAX_SALT: u32 = 3;
    pub const VARIETY_PENALTY: f32 = 30.0;
    pub const SALT_EXCESS_PENALTY: f32 = 20.0;
    pub const SALT_MISSING_PENALTY: f32 = 40.0;

    /// Mixing progress
    pub const SHAKE_THRESHOLD: f32 = 15.0;
    pub const MOTION_MIX_STEP: f32 = 2.0;
    pub const MANUAL_MIX_STEP: f32 = 5.0;

    /// Settle delays before a stage reports completion (seconds)
    pub const CUT_SETTLE: f32 = 1.5;
    pub const TRANSFER_SETTLE: f32 = 1.0;
    pub const POUR_SETTLE: f32 = 1.5;
    pub const SEASONING_SETTLE: f32 = 1.5;
    pub const BOTTLING_SETTLE: f32 = 1.5;
}

/// Clamp a stage score into the valid `[0, 100]` range
#[inline]
pub fn clamp_score(score: f32) -> f32 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}
