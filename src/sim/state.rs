//! Shared simulation types
//!
//! Match phases, ghost modes and the event stream handed to presentation and
//! movement collaborators.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::pellets::Consumption;

/// Overall match phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchState {
    /// No game started yet
    Idle,
    /// Countdown before movement is enabled
    Ready,
    /// Active gameplay; the only phase in which `tick` does anything
    Playing,
    /// Death animation window
    Dying,
    /// Every pellet eaten
    Won,
    /// Out of lives
    Lost,
}

impl MatchState {
    pub fn is_over(self) -> bool {
        matches!(self, MatchState::Won | MatchState::Lost)
    }
}

/// Stable ghost identifier (index into the configured ghost list)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AdversaryId(pub usize);

/// Scatter/chase cycle position reported by the wave clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    Scatter,
    Chase,
}

/// Ghost behaviour mode; exactly one is active per ghost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdversaryMode {
    /// Roam between random waypoints
    Scatter,
    /// Head for the player's cell
    Chase,
    /// Vulnerable and slowed until the countdown runs out
    Frightened { ticks_left: u32 },
    /// Captured, returning home at high speed
    Eaten,
}

impl AdversaryMode {
    pub fn is_frightened(self) -> bool {
        matches!(self, AdversaryMode::Frightened { .. })
    }
}

impl From<WavePhase> for AdversaryMode {
    fn from(phase: WavePhase) -> Self {
        match phase {
            WavePhase::Scatter => AdversaryMode::Scatter,
            WavePhase::Chase => AdversaryMode::Chase,
        }
    }
}

/// How a ghost should look; derived from its mode, never drives it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisualState {
    Normal,
    Frightened,
    /// Frightened and about to recover (alternates every other tick)
    Flashing,
    Eaten,
}

/// Speed requested from the external mover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedTier {
    Normal,
    Frightened,
    Eaten,
}

/// Output of the engine, emitted in order within each batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    ScoreChanged { score: u64 },
    HighScoreChanged { high_score: u64 },
    PelletConsumed { cell: usize, kind: Consumption },
    LifeChanged { lives: u8 },
    MatchStateChanged { state: MatchState, win: Option<bool> },
    AdversaryVisualState { id: AdversaryId, state: VisualState },
    AdversaryEaten { id: AdversaryId, rank: u32 },
    /// New destination and speed for a ghost's mover
    AdversaryDirective {
        id: AdversaryId,
        destination: Vec3,
        speed: SpeedTier,
    },
    /// Ghost teleported (back home after a death or match end)
    AdversaryRelocated { id: AdversaryId, position: Vec3 },
    /// Player teleported (tunnel wrap or life restart)
    AgentRelocated { position: Vec3 },
}
