//! Game configuration
//!
//! Every tunable the engine reads lives here. Defaults reproduce the classic
//! arcade feel; a JSON file can override any subset of fields.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::maze;
use crate::sim::grid::{GridGeometry, GridMap, TunnelConfig};
use crate::sim::state::SpeedTier;

/// A (row, column) pair in the maze grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: usize,
    pub col: usize,
}

impl CellCoord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for CellCoord {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// Maze layout and its placement in the world
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    pub rows: usize,
    pub columns: usize,
    /// Flat cell values: negative wall, 0 road, 1 pellet, >= 2 power item
    pub cells: Vec<i32>,
    /// World position of cell (0, 0)
    pub origin: Vec3,
    /// Distance between neighbouring cell centres
    pub step: f32,
    pub tunnel: Option<TunnelConfig>,
    pub waypoints: Vec<CellCoord>,
    pub agent_start: CellCoord,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            rows: MAZE_ROWS,
            columns: MAZE_COLUMNS,
            cells: maze::default_cells(),
            origin: Vec3::new(ORIGIN_X, ORIGIN_Y, ORIGIN_Z),
            step: CELL_STEP,
            tunnel: Some(TunnelConfig::default()),
            waypoints: maze::DEFAULT_WAYPOINTS.iter().copied().map(CellCoord::from).collect(),
            agent_start: maze::DEFAULT_AGENT_START.into(),
        }
    }
}

/// Durations, all measured in ticks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub frightened: u32,
    /// Final frightened ticks during which ghosts flash
    pub flash_window: u32,
    pub scatter: u32,
    pub chase: u32,
    /// Delay between starting a game and movement being enabled
    pub ready_delay: u64,
    /// Delay between a life restart and movement being enabled
    pub restart_delay: u64,
    /// Death animation window
    pub dying_delay: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            frightened: FRIGHTENED_TICKS,
            flash_window: FLASH_TICKS,
            scatter: SCATTER_TICKS,
            chase: CHASE_TICKS,
            ready_delay: READY_DELAY_TICKS,
            restart_delay: RESTART_DELAY_TICKS,
            dying_delay: DYING_DELAY_TICKS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub pellet: u64,
    pub power_item: u64,
    /// Base score for a captured ghost, multiplied by its capture rank
    pub ghost: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            pellet: PELLET_SCORE,
            power_item: POWER_ITEM_SCORE,
            ghost: GHOST_SCORE,
        }
    }
}

/// Speeds handed to the external mover for each speed tier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    pub normal: f32,
    pub frightened: f32,
    pub eaten: f32,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            normal: NORMAL_SPEED,
            frightened: FRIGHTENED_SPEED,
            eaten: EATEN_SPEED,
        }
    }
}

impl SpeedConfig {
    /// Numeric speed for a directive's tier
    pub fn for_tier(&self, tier: SpeedTier) -> f32 {
        match tier {
            SpeedTier::Normal => self.normal,
            SpeedTier::Frightened => self.frightened,
            SpeedTier::Eaten => self.eaten,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdversaryConfig {
    pub name: String,
    pub home: CellCoord,
}

fn default_adversaries() -> Vec<AdversaryConfig> {
    maze::DEFAULT_GHOSTS
        .iter()
        .map(|(name, home)| AdversaryConfig {
            name: (*name).to_string(),
            home: (*home).into(),
        })
        .collect()
}

/// Complete engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub maze: MazeConfig,
    pub timing: TimingConfig,
    pub scoring: ScoringConfig,
    pub speeds: SpeedConfig,
    pub collision_distance: f32,
    pub starting_lives: u8,
    /// Seed for waypoint selection
    pub seed: u64,
    pub adversaries: Vec<AdversaryConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            maze: MazeConfig::default(),
            timing: TimingConfig::default(),
            scoring: ScoringConfig::default(),
            speeds: SpeedConfig::default(),
            collision_distance: COLLISION_DISTANCE,
            starting_lives: STARTING_LIVES,
            seed: 0x5eed,
            adversaries: default_adversaries(),
        }
    }
}

impl GameConfig {
    /// Parse a config from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a config file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Decode the maze described by this config
    pub fn build_grid(&self) -> Result<GridMap, ConfigError> {
        let maze = &self.maze;
        let geometry = GridGeometry {
            origin: maze.origin,
            step: maze.step,
            tunnel: maze.tunnel,
            waypoints: maze.waypoints.clone(),
        };
        GridMap::decode(&maze.cells, maze.rows, maze.columns, &geometry)
    }

    /// Check everything the session relies on; returns the decoded grid
    pub fn validate(&self) -> Result<GridMap, ConfigError> {
        if self.collision_distance <= 0.0 {
            return Err(ConfigError::NonPositive {
                what: "collision distance",
                value: self.collision_distance,
            });
        }
        for (what, value) in [
            ("normal speed", self.speeds.normal),
            ("frightened speed", self.speeds.frightened),
            ("eaten speed", self.speeds.eaten),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { what, value });
            }
        }
        if self.timing.scatter == 0 {
            return Err(ConfigError::ZeroDuration { what: "scatter phase" });
        }
        if self.timing.chase == 0 {
            return Err(ConfigError::ZeroDuration { what: "chase phase" });
        }
        if self.adversaries.is_empty() {
            return Err(ConfigError::NoAdversaries);
        }

        let grid = self.build_grid()?;
        grid.check_reachable("agent start", self.maze.agent_start)?;
        for adversary in &self.adversaries {
            grid.check_reachable("ghost home", adversary.home)?;
        }
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = GameConfig::default();
        let grid = config.validate().expect("default config is valid");
        assert_eq!(grid.rows(), MAZE_ROWS);
        assert_eq!(grid.columns(), MAZE_COLUMNS);
        assert_eq!(config.adversaries.len(), 4);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "starting_lives": 5, "scoring": { "ghost": 400 } }"#)
            .expect("parses");
        assert_eq!(config.starting_lives, 5);
        assert_eq!(config.scoring.ghost, 400);
        assert_eq!(config.scoring.pellet, PELLET_SCORE);
        assert_eq!(config.timing.frightened, FRIGHTENED_TICKS);
    }

    #[test]
    fn test_json_round_trip_preserves_maze() {
        let config = GameConfig::default();
        let json = config.to_json().expect("serializes");
        let parsed = GameConfig::from_json(&json).expect("parses");
        assert_eq!(parsed.maze.cells, config.maze.cells);
        assert_eq!(parsed.maze.waypoints, config.maze.waypoints);
    }

    #[test]
    fn test_speed_per_tier() {
        let speeds = SpeedConfig::default();
        assert_eq!(speeds.for_tier(SpeedTier::Normal), NORMAL_SPEED);
        assert_eq!(speeds.for_tier(SpeedTier::Frightened), FRIGHTENED_SPEED);
        assert_eq!(speeds.for_tier(SpeedTier::Eaten), EATEN_SPEED);
        assert!(speeds.for_tier(SpeedTier::Frightened) < speeds.for_tier(SpeedTier::Eaten));
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        assert!(matches!(
            GameConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_home_on_wall_rejected() {
        let mut config = GameConfig::default();
        config.adversaries[0].home = CellCoord::new(1, 1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CellIsWall { what: "ghost home", .. })
        ));
    }

    #[test]
    fn test_sealed_agent_start_rejected() {
        let mut config = GameConfig::default();
        config.maze.rows = 1;
        config.maze.columns = 5;
        config.maze.cells = vec![0, 0, 0, -1, 0];
        config.maze.tunnel = None;
        config.maze.waypoints = vec![CellCoord::new(0, 0)];
        config.maze.agent_start = CellCoord::new(0, 4);
        for adversary in &mut config.adversaries {
            adversary.home = CellCoord::new(0, 1);
        }
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Unreachable { what: "agent start", .. })
        ));

        config.maze.agent_start = CellCoord::new(0, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_no_adversaries_rejected() {
        let mut config = GameConfig::default();
        config.adversaries.clear();
        assert!(matches!(config.validate(), Err(ConfigError::NoAdversaries)));
    }

    #[test]
    fn test_zero_phase_rejected() {
        let mut config = GameConfig::default();
        config.timing.chase = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroDuration { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            GameConfig::load("/nonexistent/maze-chase.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
