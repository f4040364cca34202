//! Maze Chase - a grid maze arcade engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, pellets, ghosts, collisions, match flow)
//! - `settings`: Data-driven game configuration
//! - `maze`: The bundled default maze layout
//! - `highscores`: High score persistence collaborator
//!
//! Rendering, navigation-mesh movement and audio live outside this crate. The
//! engine talks to them only through [`sim::GameEvent`] batches and
//! [`sim::TickInput`] observations.

pub mod error;
pub mod highscores;
pub mod maze;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::ConfigError;
pub use highscores::{HighScoreStore, JsonFileHighScoreStore, MemoryHighScoreStore};
pub use settings::GameConfig;
pub use sim::{GameEvent, GameSession, MatchState, TickInput};

/// Default tuning constants (classic arcade feel)
pub mod consts {
    /// Wall-clock length of one simulation tick
    pub const TICK_MILLIS: u64 = 250;

    /// Maze dimensions
    pub const MAZE_ROWS: usize = 29;
    pub const MAZE_COLUMNS: usize = 26;

    /// World position of cell (0, 0) and distance between cell centres
    pub const ORIGIN_X: f32 = -6.4;
    pub const ORIGIN_Y: f32 = 0.8;
    pub const ORIGIN_Z: f32 = -7.3;
    pub const CELL_STEP: f32 = 0.515;

    /// Tunnel row and its end/interior columns
    pub const TUNNEL_ROW: usize = 13;
    pub const TUNNEL_LEFT_COLUMN: usize = 0;
    pub const TUNNEL_RIGHT_COLUMN: usize = 25;
    pub const TUNNEL_LEFT_INTERIOR: usize = 1;
    pub const TUNNEL_RIGHT_INTERIOR: usize = 24;

    /// Mode durations in ticks
    pub const FRIGHTENED_TICKS: u32 = 70;
    pub const FLASH_TICKS: u32 = 20;
    pub const SCATTER_TICKS: u32 = 90;
    pub const CHASE_TICKS: u32 = 80;

    /// Match flow delays in ticks (3 s, 1.5 s, 1 s)
    pub const READY_DELAY_TICKS: u64 = 12;
    pub const RESTART_DELAY_TICKS: u64 = 6;
    pub const DYING_DELAY_TICKS: u64 = 4;

    /// Ghost speeds handed to the mover
    pub const NORMAL_SPEED: f32 = 0.65;
    pub const FRIGHTENED_SPEED: f32 = 0.2;
    pub const EATEN_SPEED: f32 = 1.5;

    /// Axis-aligned agent/ghost proximity threshold
    pub const COLLISION_DISTANCE: f32 = 0.6;

    /// Scoring
    pub const PELLET_SCORE: u64 = 10;
    pub const POWER_ITEM_SCORE: u64 = 50;
    pub const GHOST_SCORE: u64 = 200;

    pub const STARTING_LIVES: u8 = 3;
}
