//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick only; time-based transitions go through the scheduler
//! - Seeded RNG only
//! - Stable iteration order (by ghost id)
//! - No rendering, navigation or platform dependencies

pub mod adversary;
pub mod collision;
pub mod grid;
pub mod pellets;
pub mod schedule;
pub mod state;
pub mod tick;

pub use adversary::{Adversary, AdversaryController, AdvanceContext, WaveClock};
pub use collision::{CollisionDetector, CollisionOutcome};
pub use grid::{Cell, GridGeometry, GridMap, TunnelConfig};
pub use pellets::{Consumption, PelletRegistry};
pub use schedule::{Scheduler, TaskToken};
pub use state::{
    AdversaryId, AdversaryMode, GameEvent, MatchState, SpeedTier, VisualState, WavePhase,
};
pub use tick::{GameSession, TickInput};
