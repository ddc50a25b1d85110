//! Cosmetic placement of pieces that landed in the bowl
//!
//! Seeded per run, so a replay with the same seed piles the pieces the same
//! way. Nothing here affects scoring.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Offset from the bowl centre plus a tilt, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub offset: Vec2,
    pub rotation: f32,
}

/// Maximum offset from the bowl centre on each axis
pub const SCATTER_SPREAD: Vec2 = Vec2::new(40.0, 20.0);
/// Maximum tilt either way
pub const SCATTER_TILT: f32 = 45.0;

#[derive(Debug, Clone)]
pub struct Scatter {
    rng: Pcg32,
}

impl Scatter {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn next_placement(&mut self) -> Placement {
        Placement {
            offset: Vec2::new(
                self.rng.random_range(-SCATTER_SPREAD.x..=SCATTER_SPREAD.x),
                self.rng.random_range(-SCATTER_SPREAD.y..=SCATTER_SPREAD.y),
            ),
            rotation: self.rng.random_range(-SCATTER_TILT..=SCATTER_TILT),
        }
    }
}
