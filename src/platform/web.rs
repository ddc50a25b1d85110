//! Browser adapter
//!
//! Exposes the game core to JavaScript. The page translates its pointer and
//! devicemotion events into board coordinates and calls in here; storage is
//! LocalStorage and haptics go through `navigator.vibrate`.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use super::feedback::Vibrate;
use super::motion::{BufferedMotion, MotionSample};
use crate::error::GameError;
use crate::persistence::LocalStorage;
use crate::settings::{Difficulty, GameVariant, Settings};
use crate::sim::Game;

/// Module start: panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger already set: {e}").into());
    }
}

fn to_js(err: GameError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

#[wasm_bindgen]
pub struct WebGame {
    game: Game<LocalStorage, Vibrate, BufferedMotion>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
        log::info!("Fermented Tofu Master starting (seed {seed})");
        WebGame {
            game: Game::new(LocalStorage, Vibrate, BufferedMotion::granting(), seed),
        }
    }

    pub fn start(&mut self) -> Result<(), JsValue> {
        self.game.start().map_err(to_js)
    }

    pub fn restart(&mut self) -> Result<(), JsValue> {
        self.game.restart().map_err(to_js)
    }

    pub fn abort(&mut self) {
        self.game.abort();
    }

    /// "easy", "normal" or "hard"; applies from the next start
    pub fn set_difficulty(&mut self, name: &str) -> Result<(), JsValue> {
        let difficulty = Difficulty::from_str(name)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown difficulty: {name}")))?;
        self.update_settings(|s| s.difficulty = difficulty)
    }

    /// "classic" or "extended"; applies from the next start
    pub fn set_variant(&mut self, name: &str) -> Result<(), JsValue> {
        let variant = GameVariant::from_str(name)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown variant: {name}")))?;
        self.update_settings(|s| s.variant = variant)
    }

    pub fn set_haptics(&mut self, enabled: bool) -> Result<(), JsValue> {
        self.update_settings(|s| s.haptics = enabled)
    }

    pub fn set_motion_input(&mut self, enabled: bool) -> Result<(), JsValue> {
        self.update_settings(|s| s.motion_input = enabled)
    }

    /// Outcome of `DeviceMotionEvent.requestPermission()` or its absence
    pub fn set_motion_permission(&mut self, granted: bool) {
        log::info!("Motion permission from page: {granted}");
        self.game.motion_mut().resolve(granted);
    }

    pub fn settings_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.game.settings()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn press(&mut self, pointer: u32, x: f32, y: f32) {
        self.game.press(pointer, Vec2::new(x, y));
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.game.move_to(Vec2::new(x, y));
    }

    pub fn release(&mut self, x: f32, y: f32) {
        self.game.release(Vec2::new(x, y));
    }

    pub fn shake(&mut self) {
        self.game.shake();
    }

    /// `accelerationIncludingGravity` from a devicemotion event
    pub fn push_motion(&mut self, x: f32, y: f32, z: f32) {
        self.game.motion_mut().push(MotionSample::new(x, y, z));
    }

    pub fn tick(&mut self, dt: f32) {
        self.game.tick(dt);
    }

    pub fn phase(&self) -> String {
        format!("{:?}", self.game.phase())
    }

    pub fn step_text(&self) -> String {
        self.game.phase().step_text().to_string()
    }

    /// Stage scores so far, as JSON
    pub fn score_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.game.score()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Result screen data, as JSON
    pub fn summary_json(&self) -> Result<String, JsValue> {
        let summary = self.game.summary().map_err(to_js)?;
        serde_json::to_string(&summary).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn leaderboard_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.game.leaderboard().entries())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Returns the rank reached (1-based), undefined if it missed the list
    pub fn save_result(&mut self, name: &str) -> Result<Option<u32>, JsValue> {
        let rank = self.game.save_result(name).map_err(to_js)?;
        Ok(rank.map(|r| r as u32))
    }
}

impl WebGame {
    fn update_settings(&mut self, change: impl FnOnce(&mut Settings)) -> Result<(), JsValue> {
        let mut settings = self.game.settings().clone();
        change(&mut settings);
        self.game.set_settings(settings).map_err(to_js)
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}
