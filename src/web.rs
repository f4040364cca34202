//! Browser facade
//!
//! Exposes the control surface to JavaScript. Event batches cross the boundary
//! as JSON arrays; the page owns rendering, navigation and audio.

use glam::Vec3;
use wasm_bindgen::prelude::*;

use crate::highscores::HighScoreStore;
use crate::settings::GameConfig;
use crate::sim::{AdversaryId, GameEvent, GameSession, TickInput};

/// High score kept in the browser's LocalStorage
pub struct LocalStorageHighScoreStore;

impl LocalStorageHighScoreStore {
    const STORAGE_KEY: &'static str = "maze_chase_highscore";

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

impl HighScoreStore for LocalStorageHighScoreStore {
    fn load_high_score(&self) -> u64 {
        let stored = Self::storage()
            .and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten())
            .and_then(|v| v.parse().ok());
        match stored {
            Some(score) => {
                log::info!("Loaded high score {}", score);
                score
            }
            None => {
                log::info!("No high score found, starting fresh");
                0
            }
        }
    }

    fn save_high_score(&mut self, score: u64) {
        match Self::storage() {
            Some(storage) => {
                if storage.set_item(Self::STORAGE_KEY, &score.to_string()).is_err() {
                    log::warn!("Could not save high score");
                }
            }
            None => log::warn!("LocalStorage unavailable, high score not saved"),
        }
    }
}

fn to_json(events: &[GameEvent]) -> String {
    serde_json::to_string(events).unwrap_or_else(|e| {
        log::warn!("Could not encode events: {}", e);
        "[]".to_string()
    })
}

/// One game session driven from JavaScript
#[wasm_bindgen]
pub struct MazeChaseWeb {
    session: GameSession,
    input: TickInput,
}

#[wasm_bindgen]
impl MazeChaseWeb {
    /// Build a session from an optional JSON config (empty string = defaults)
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<MazeChaseWeb, JsValue> {
        let mut config = if config_json.trim().is_empty() {
            GameConfig::default()
        } else {
            GameConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        config.seed = js_sys::Date::now() as u64;

        let session = GameSession::new(config, Box::new(LocalStorageHighScoreStore))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            session,
            input: TickInput::default(),
        })
    }

    pub fn start_new_game(&mut self) -> String {
        to_json(&self.session.start_new_game())
    }

    /// Report a ghost position from its navigation agent
    pub fn set_adversary_position(&mut self, id: usize, x: f32, y: f32, z: f32) {
        self.input
            .adversary_positions
            .push((AdversaryId(id), Vec3::new(x, y, z)));
    }

    /// Report that a ghost's navigation agent reached its destination
    pub fn arrived(&mut self, id: usize) {
        self.input.arrivals.push(AdversaryId(id));
    }

    /// Advance one tick with the player at (x, y, z); returns the event batch
    pub fn step(&mut self, x: f32, y: f32, z: f32) -> String {
        let mut input = std::mem::take(&mut self.input);
        input.agent_pos = Vec3::new(x, y, z);
        to_json(&self.session.step(&input))
    }

    /// Numeric mover speed per tier, as `{"normal":..,"frightened":..,"eaten":..}`
    pub fn speeds(&self) -> String {
        serde_json::to_string(&self.session.config().speeds).unwrap_or_else(|e| {
            log::warn!("Could not encode speeds: {}", e);
            "{}".to_string()
        })
    }

    pub fn score(&self) -> u64 {
        self.session.score()
    }

    pub fn high_score(&self) -> u64 {
        self.session.high_score()
    }

    pub fn lives(&self) -> u8 {
        self.session.lives()
    }
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Maze Chase starting...");
}
