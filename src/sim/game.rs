//! Phase orchestrator
//!
//! Owns the score record, mounts one stage at a time and advances through
//! the fixed phase sequence when the mounted stage reports completion.
//! Collaborators (storage, haptics, motion) are injected, never ambient.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bottling::BottlingPhase;
use super::cutting::{CuttingPhase, ToolMode};
use super::drag::PointerId;
use super::pour::PourPhase;
use super::seasoning::SeasoningPhase;
use super::stage::Stage;
use super::state::{GamePhase, StageCompletion, StageScore};
use super::transfer::TransferPhase;
use crate::consts::*;
use crate::error::{GameError, Result};
use crate::leaderboard::{Leaderboard, LeaderboardEntry, normalize_name};
use crate::persistence::Store;
use crate::platform::{Feedback, MotionSource};
use crate::scoring::{Rating, final_score};
use crate::settings::Settings;

/// The stage currently mounted
#[derive(Debug, Clone)]
pub enum ActiveStage {
    Cutting(CuttingPhase),
    Transfer(TransferPhase),
    Pour(PourPhase),
    Seasoning(SeasoningPhase),
    Bottling(BottlingPhase),
}

impl ActiveStage {
    pub fn phase(&self) -> GamePhase {
        match self {
            ActiveStage::Cutting(_) => GamePhase::Cutting,
            ActiveStage::Transfer(_) => GamePhase::Transfer,
            ActiveStage::Pour(_) => GamePhase::Pour,
            ActiveStage::Seasoning(_) => GamePhase::Seasoning,
            ActiveStage::Bottling(_) => GamePhase::Bottling,
        }
    }

    fn as_stage_mut(&mut self) -> &mut dyn Stage {
        match self {
            ActiveStage::Cutting(s) => s,
            ActiveStage::Transfer(s) => s,
            ActiveStage::Pour(s) => s,
            ActiveStage::Seasoning(s) => s,
            ActiveStage::Bottling(s) => s,
        }
    }

    fn as_stage(&self) -> &dyn Stage {
        match self {
            ActiveStage::Cutting(s) => s,
            ActiveStage::Transfer(s) => s,
            ActiveStage::Pour(s) => s,
            ActiveStage::Seasoning(s) => s,
            ActiveStage::Bottling(s) => s,
        }
    }
}

/// What the result screen shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u32,
    pub rating: Rating,
    /// The score would make the leaderboard
    pub high_score: bool,
    pub potential_rank: Option<usize>,
    pub flavor_title: String,
}

pub struct Game<S: Store, F: Feedback, M: MotionSource> {
    settings: Settings,
    store: S,
    feedback: F,
    motion: M,
    leaderboard: Leaderboard,
    phase: GamePhase,
    score: StageScore,
    stage: Option<ActiveStage>,
    /// Base seed for cosmetic randomness
    seed: u64,
    /// Completed `start` calls, mixed into the per-run seed
    runs: u64,
    accumulator: f32,
    saved: bool,
}

impl<S: Store, F: Feedback, M: MotionSource> Game<S, F, M> {
    /// Create a game at the menu, loading settings and leaderboard from `store`
    pub fn new(store: S, feedback: F, motion: M, seed: u64) -> Self {
        let settings = Settings::load(&store);
        let leaderboard = Leaderboard::load(&store);
        Self {
            score: StageScore::for_run(&settings),
            settings,
            store,
            feedback,
            motion,
            leaderboard,
            phase: GamePhase::Menu,
            stage: None,
            seed,
            runs: 0,
            accumulator: 0.0,
            saved: false,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> &StageScore {
        &self.score
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace and persist the settings
    ///
    /// Difficulty and variant are frozen into the score record at `start`, so
    /// a change mid-run only takes effect on the next playthrough.
    pub fn set_settings(&mut self, settings: Settings) -> Result<()> {
        settings.save(&mut self.store)?;
        if self.phase == GamePhase::Menu {
            self.score = StageScore::for_run(&settings);
        }
        self.settings = settings;
        Ok(())
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn stage(&self) -> Option<&ActiveStage> {
        self.stage.as_ref()
    }

    pub fn cutting(&self) -> Option<&CuttingPhase> {
        match &self.stage {
            Some(ActiveStage::Cutting(s)) => Some(s),
            _ => None,
        }
    }

    pub fn transfer(&self) -> Option<&TransferPhase> {
        match &self.stage {
            Some(ActiveStage::Transfer(s)) => Some(s),
            _ => None,
        }
    }

    pub fn pour(&self) -> Option<&PourPhase> {
        match &self.stage {
            Some(ActiveStage::Pour(s)) => Some(s),
            _ => None,
        }
    }

    pub fn seasoning(&self) -> Option<&SeasoningPhase> {
        match &self.stage {
            Some(ActiveStage::Seasoning(s)) => Some(s),
            _ => None,
        }
    }

    pub fn bottling(&self) -> Option<&BottlingPhase> {
        match &self.stage {
            Some(ActiveStage::Bottling(s)) => Some(s),
            _ => None,
        }
    }

    /// The mounted stage finished and is waiting out its settle delay
    pub fn is_settling(&self) -> bool {
        self.stage.as_ref().is_some_and(|s| s.as_stage().is_settling())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn motion_mut(&mut self) -> &mut M {
        &mut self.motion
    }

    /// Begin a playthrough from the menu
    pub fn start(&mut self) -> Result<()> {
        if self.phase != GamePhase::Menu {
            return Err(GameError::WrongPhase(self.phase));
        }
        self.runs += 1;
        self.score = StageScore::for_run(&self.settings);
        self.saved = false;
        self.accumulator = 0.0;
        log::info!(
            "Run {} started on {} ({:?})",
            self.runs,
            self.score.difficulty.as_str(),
            self.score.variant
        );
        self.enter(GamePhase::Cutting);
        Ok(())
    }

    /// Leave the result screen for the menu, discarding the run
    pub fn restart(&mut self) -> Result<()> {
        if self.phase != GamePhase::Result {
            return Err(GameError::WrongPhase(self.phase));
        }
        self.reset_to_menu();
        Ok(())
    }

    /// Drop whatever is in progress and return to the menu
    pub fn abort(&mut self) {
        if self.phase != GamePhase::Menu {
            log::info!("Run aborted during {:?}", self.phase);
        }
        self.reset_to_menu();
    }

    fn reset_to_menu(&mut self) {
        self.stage = None;
        self.score = StageScore::for_run(&self.settings);
        self.saved = false;
        self.accumulator = 0.0;
        self.phase = GamePhase::Menu;
    }

    pub fn press(&mut self, pointer: PointerId, point: Vec2) {
        if let Some(stage) = self.stage.as_mut() {
            stage.as_stage_mut().press(pointer, point);
        }
        self.flush_events();
    }

    pub fn move_to(&mut self, point: Vec2) {
        if let Some(stage) = self.stage.as_mut() {
            stage.as_stage_mut().move_to(point);
        }
        self.flush_events();
    }

    pub fn release(&mut self, point: Vec2) {
        if let Some(stage) = self.stage.as_mut() {
            stage.as_stage_mut().release(point);
        }
        self.flush_events();
    }

    /// Manual mixing (the on-screen shake button)
    pub fn shake(&mut self) {
        if let Some(stage) = self.stage.as_mut() {
            stage.as_stage_mut().shake();
        }
        self.flush_events();
    }

    /// Advance by `dt` seconds in fixed frames
    pub fn tick(&mut self, dt: f32) {
        if self.stage.is_none() || !dt.is_finite() {
            return;
        }

        if let Some(ActiveStage::Seasoning(seasoning)) = self.stage.as_mut() {
            for sample in self.motion.poll() {
                seasoning.motion(sample);
            }
        }

        self.accumulator += dt.clamp(0.0, 0.1);
        let mut substeps = 0;
        while self.accumulator >= FRAME_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= FRAME_DT;
            substeps += 1;

            let Some(stage) = self.stage.as_mut() else {
                break;
            };
            let completion = stage.as_stage_mut().tick(FRAME_DT);
            self.flush_events();
            if let Some(completion) = completion {
                self.complete_stage(completion);
            }
        }
    }

    fn flush_events(&mut self) {
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        let events = stage.as_stage_mut().take_events();
        if !self.settings.haptics {
            return;
        }
        for event in events {
            self.feedback.pulse(event);
        }
    }

    fn complete_stage(&mut self, completion: StageCompletion) {
        self.score.record(&completion);
        log::info!(
            "{:?} complete: {:?} = {}",
            self.phase,
            completion.key,
            self.score.get(completion.key)
        );
        self.enter(self.phase.next());
    }

    fn enter(&mut self, phase: GamePhase) {
        let difficulty = self.score.difficulty;
        let n = difficulty.grid_size();
        self.stage = match phase {
            GamePhase::Cutting => {
                let mode = if difficulty.oriented_tool() {
                    ToolMode::Oriented
                } else {
                    ToolMode::Any
                };
                Some(ActiveStage::Cutting(CuttingPhase::new(n, mode)))
            }
            GamePhase::Transfer => Some(ActiveStage::Transfer(TransferPhase::new(
                n,
                self.score.integrity,
                self.seed.wrapping_add(self.runs),
            ))),
            GamePhase::Pour => Some(ActiveStage::Pour(PourPhase::new(difficulty.pour_window()))),
            GamePhase::Seasoning => {
                if self.settings.motion_input {
                    let permission = self.motion.request_permission();
                    log::info!("Motion permission: {permission:?}");
                }
                Some(ActiveStage::Seasoning(SeasoningPhase::new()))
            }
            GamePhase::Bottling => Some(ActiveStage::Bottling(BottlingPhase::new())),
            GamePhase::Menu | GamePhase::Result => None,
        };
        self.phase = phase;

        if phase == GamePhase::Result {
            let score = final_score(&self.score, self.score.variant);
            log::info!(
                "Run finished: {score} ({})",
                Rating::for_score(score).label()
            );
        }
    }

    /// Final score, rating and high-score flag
    pub fn summary(&self) -> Result<RunSummary> {
        if self.phase != GamePhase::Result {
            return Err(GameError::WrongPhase(self.phase));
        }
        let score = final_score(&self.score, self.score.variant);
        Ok(RunSummary {
            score,
            rating: Rating::for_score(score),
            high_score: self.leaderboard.qualifies(score),
            potential_rank: self.leaderboard.potential_rank(score),
            flavor_title: self.score.flavor_title.clone(),
        })
    }

    /// Record the run under `name`, once per playthrough
    ///
    /// Returns the rank reached, `None` if the score did not make the list.
    pub fn save_result(&mut self, name: &str) -> Result<Option<usize>> {
        let summary = self.summary()?;
        if self.saved {
            return Err(GameError::AlreadySaved);
        }
        let name = normalize_name(name).ok_or(GameError::EmptyName)?;

        let mut titles = vec![summary.rating.label().to_string()];
        if !summary.flavor_title.is_empty() {
            titles.push(summary.flavor_title);
        }
        let entry = LeaderboardEntry {
            name,
            score: summary.score,
            date: chrono::Utc::now(),
            titles,
            difficulty: Some(self.score.difficulty),
        };

        // Only adopt the new board once it is stored
        let mut board = self.leaderboard.clone();
        let rank = board.insert(entry);
        board.save(&mut self.store)?;
        self.leaderboard = board;
        self.saved = true;
        log::info!("Saved score {} at rank {rank:?}", summary.score);
        Ok(rank)
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }
}
