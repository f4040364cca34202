//! Collision detection between the player, ghosts and pellets
//!
//! Ghost contact uses an axis-aligned proximity box on the ground plane (x and
//! z tested independently); height is ignored. Pellet contact is simply the
//! cell the player stands in.

use glam::Vec3;

use super::grid::GridMap;
use super::state::AdversaryMode;

/// What a player/ghost contact means for the match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOutcome {
    /// Frightened ghost gets eaten
    Capture,
    /// Normal ghost catches the player
    AgentDies,
    /// Eaten ghosts pass through the player
    Ignored,
}

#[derive(Debug, Clone, Copy)]
pub struct CollisionDetector {
    threshold: f32,
}

impl CollisionDetector {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// True iff both the x and z separations are below the threshold
    pub fn agent_vs_adversary(&self, agent: Vec3, adversary: Vec3) -> bool {
        (agent.x - adversary.x).abs() < self.threshold && (agent.z - adversary.z).abs() < self.threshold
    }

    /// Cell whose pellet the player is touching
    pub fn agent_vs_pellet(&self, grid: &GridMap, agent: Vec3) -> usize {
        grid.world_to_cell(agent.x, agent.z)
    }

    pub fn resolve(&self, mode: AdversaryMode) -> CollisionOutcome {
        match mode {
            AdversaryMode::Frightened { .. } => CollisionOutcome::Capture,
            AdversaryMode::Scatter | AdversaryMode::Chase => CollisionOutcome::AgentDies,
            AdversaryMode::Eaten => CollisionOutcome::Ignored,
        }
    }
}
