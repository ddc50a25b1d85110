//! Error types shared by the game core and its collaborators

use thiserror::Error;

use crate::persistence::StoreError;
use crate::sim::GamePhase;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("action not allowed during {0:?}")]
    WrongPhase(GamePhase),
    #[error("leaderboard name must not be empty")]
    EmptyName,
    #[error("result already saved to the leaderboard")]
    AlreadySaved,
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = core::result::Result<T, GameError>;
