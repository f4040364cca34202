//! Match orchestration
//!
//! [`GameSession`] owns all mutable game state and advances it one fixed tick
//! at a time. Per-tick order inside `tick`:
//! 1. resolve the player's cell (tunnel wrap included)
//! 2. eat whatever is there
//! 3. advance each ghost, then test it against the player
//! 4. win check
//! 5. death check
//! 6. advance the wave clock (or the frightened countdown)
//!
//! Delayed transitions (ready countdown, death window) go through a
//! [`Scheduler`] driven by [`GameSession::advance_clock`].

use glam::Vec3;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

use super::adversary::{AdvanceContext, AdversaryController, WaveClock};
use super::collision::{CollisionDetector, CollisionOutcome};
use super::grid::GridMap;
use super::pellets::{Consumption, PelletRegistry};
use super::schedule::Scheduler;
use super::state::{AdversaryId, AdversaryMode, GameEvent, MatchState, VisualState};
use crate::error::ConfigError;
use crate::highscores::HighScoreStore;
use crate::settings::GameConfig;

/// Observations from the movement layer for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Player's current world position
    pub agent_pos: Vec3,
    /// Ghost positions reported by their movers; omitted ghosts keep their last known position
    pub adversary_positions: Vec<(AdversaryId, Vec3)>,
    /// Ghosts whose mover reached its destination since the last tick
    pub arrivals: Vec<AdversaryId>,
}

impl TickInput {
    pub fn new(agent_pos: Vec3) -> Self {
        Self {
            agent_pos,
            ..Default::default()
        }
    }

    pub fn with_adversary(mut self, id: AdversaryId, position: Vec3) -> Self {
        self.adversary_positions.push((id, position));
        self
    }

    pub fn with_arrival(mut self, id: AdversaryId) -> Self {
        self.arrivals.push(id);
        self
    }
}

/// Delayed match transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionTask {
    /// Ready countdown finished
    BeginPlay,
    /// Death animation finished
    ResolveDeath,
}

/// One player's game: score, lives, pellets, ghosts and match flow
pub struct GameSession {
    config: GameConfig,
    grid: GridMap,
    pellets: PelletRegistry,
    ghosts: AdversaryController,
    collision: CollisionDetector,
    scheduler: Scheduler<SessionTask>,
    store: Box<dyn HighScoreStore>,
    wave: WaveClock,
    /// Ticks left on the session-wide frightened period (pauses the wave clock)
    frightened_ticks: u32,
    score: u64,
    high_score: u64,
    lives: u8,
    state: MatchState,
    agent_cell: usize,
    agent_start: usize,
    time_ticks: u64,
}

impl GameSession {
    /// Build a session whose waypoint choices are seeded from `config.seed`
    pub fn new(config: GameConfig, store: Box<dyn HighScoreStore>) -> Result<Self, ConfigError> {
        let rng = Pcg32::seed_from_u64(config.seed);
        Self::with_rng(config, store, Box::new(rng))
    }

    /// Build a session with a caller-supplied random source
    pub fn with_rng(
        config: GameConfig,
        store: Box<dyn HighScoreStore>,
        rng: Box<dyn RngCore>,
    ) -> Result<Self, ConfigError> {
        let grid = config.validate()?;
        let agent_start = grid.check_walkable("agent start", config.maze.agent_start)?;

        let mut homes = Vec::with_capacity(config.adversaries.len());
        for adversary in &config.adversaries {
            let index = grid.check_walkable("ghost home", adversary.home)?;
            let home = grid
                .cell_world_position(index)
                .ok_or(ConfigError::NoRoadCells)?;
            homes.push((adversary.name.clone(), home));
        }

        let high_score = store.load_high_score();
        log::info!(
            "Session ready: {}x{} maze, {} ghosts, high score {}",
            grid.rows(),
            grid.columns(),
            homes.len(),
            high_score
        );

        Ok(Self {
            pellets: PelletRegistry::new(&grid),
            ghosts: AdversaryController::new(homes, &config.timing, config.collision_distance, rng),
            collision: CollisionDetector::new(config.collision_distance),
            scheduler: Scheduler::new(),
            store,
            wave: WaveClock::new(config.timing.scatter, config.timing.chase),
            frightened_ticks: 0,
            score: 0,
            high_score,
            lives: config.starting_lives,
            state: MatchState::Idle,
            agent_cell: agent_start,
            agent_start,
            time_ticks: 0,
            grid,
            config,
        })
    }

    /// Reset everything and begin the ready countdown.
    ///
    /// Valid in any state; pending delayed transitions are cancelled first.
    pub fn start_new_game(&mut self) -> Vec<GameEvent> {
        let cancelled = self.scheduler.cancel_all();
        if cancelled > 0 {
            log::debug!("New game cancelled {} pending task(s)", cancelled);
        }

        let mut events = Vec::new();
        self.lives = self.config.starting_lives;
        self.score = 0;
        self.pellets.reset(&self.grid);
        self.ghosts.reset(&mut events);
        self.wave.reset();
        self.frightened_ticks = 0;
        events.push(GameEvent::ScoreChanged { score: 0 });
        events.push(GameEvent::LifeChanged { lives: self.lives });
        log::info!("New game started ({} pellets)", self.pellets.remaining());

        self.begin_countdown(self.config.timing.ready_delay, &mut events);
        events
    }

    /// Advance the scheduler clock one tick and fire any due transitions
    pub fn advance_clock(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for (_, task) in self.scheduler.advance(1) {
            match task {
                SessionTask::BeginPlay => self.set_state(MatchState::Playing, None, &mut events),
                SessionTask::ResolveDeath => self.resolve_death(&mut events),
            }
        }
        events
    }

    /// `advance_clock` followed by `tick`: the host's usual per-frame call
    pub fn step(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let mut events = self.advance_clock();
        events.extend(self.tick(input));
        events
    }

    /// Advance gameplay by one tick. Outside `Playing` this does nothing.
    pub fn tick(&mut self, input: &TickInput) -> Vec<GameEvent> {
        if self.state != MatchState::Playing {
            return Vec::new();
        }
        self.time_ticks += 1;
        let mut events = Vec::new();

        // 1. Player cell, with tunnel wrap
        let mut agent_pos = input.agent_pos;
        let raw_cell = self.collision.agent_vs_pellet(&self.grid, agent_pos);
        let (row, col) = self.grid.row_col(raw_cell);
        let (row, col) = self.grid.resolve_tunnel(row, col);
        let cell = self.grid.index_of(row, col).unwrap_or(raw_cell);
        if cell != raw_cell {
            if let Some(position) = self.grid.cell_world_position(cell) {
                agent_pos = Vec3::new(position.x, agent_pos.y, position.z);
                events.push(GameEvent::AgentRelocated { position: agent_pos });
            }
        }
        self.agent_cell = cell;

        // 2. Pellets
        let consumed = self.pellets.consume_at(cell);
        match consumed {
            Consumption::None => {}
            Consumption::Pellet => {
                events.push(GameEvent::PelletConsumed { cell, kind: consumed });
                self.add_score(self.config.scoring.pellet, &mut events);
            }
            Consumption::PowerItem => {
                events.push(GameEvent::PelletConsumed { cell, kind: consumed });
                self.add_score(self.config.scoring.power_item, &mut events);
                self.ghosts.frighten_all();
                self.frightened_ticks = self.config.timing.frightened;
                log::debug!("Power item at cell {}: ghosts frightened", cell);
            }
        }

        // 3. Ghosts
        for &(id, position) in &input.adversary_positions {
            self.ghosts.observe_position(id, position);
        }
        let phase = self.wave.phase();
        let chase_target = self.grid.walkable_position(cell);
        let mut died = false;
        for index in 0..self.ghosts.len() {
            let id = AdversaryId(index);
            let ctx = AdvanceContext {
                phase,
                chase_target,
                arrived: input.arrivals.contains(&id),
            };
            self.ghosts.advance(index, &self.grid, ctx, &mut events);
            if died {
                continue;
            }

            let adversary = &self.ghosts.adversaries()[index];
            if !self.collision.agent_vs_adversary(agent_pos, adversary.position) {
                continue;
            }
            match self.collision.resolve(adversary.mode) {
                CollisionOutcome::Capture => {
                    let rank = self.ghosts.capture(index, &mut events);
                    events.push(GameEvent::AdversaryEaten { id, rank });
                    self.add_score(self.config.scoring.ghost * u64::from(rank), &mut events);
                }
                CollisionOutcome::AgentDies => died = true,
                CollisionOutcome::Ignored => {}
            }
        }

        // 4. Win
        if consumed != Consumption::None && self.pellets.is_cleared() {
            log::info!("All pellets eaten, score {}", self.score);
            self.finish(true, &mut events);
            return events;
        }

        // 5. Death
        if died {
            self.enter_dying(&mut events);
            return events;
        }

        // 6. Wave clock holds still while ghosts are frightened
        if self.frightened_ticks > 0 {
            self.frightened_ticks -= 1;
        } else {
            self.wave.advance();
        }

        events
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn remaining_pellets(&self) -> usize {
        self.pellets.remaining()
    }

    pub fn is_consumed(&self, cell: usize) -> Option<bool> {
        self.pellets.is_consumed(cell)
    }

    pub fn grid(&self) -> &GridMap {
        &self.grid
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn agent_cell(&self) -> usize {
        self.agent_cell
    }

    /// World position the player starts each life from
    pub fn agent_start_position(&self) -> Vec3 {
        self.grid
            .cell_world_position(self.agent_start)
            .unwrap_or_default()
    }

    pub fn adversary_mode(&self, id: AdversaryId) -> Option<AdversaryMode> {
        self.ghosts.adversaries().get(id.0).map(|a| a.mode)
    }

    pub fn adversary_visual(&self, id: AdversaryId) -> Option<VisualState> {
        self.ghosts
            .adversaries()
            .get(id.0)
            .map(|a| a.visual_state(self.config.timing.flash_window))
    }

    pub fn adversary_destination(&self, id: AdversaryId) -> Option<Vec3> {
        self.ghosts.adversaries().get(id.0).and_then(|a| a.destination())
    }

    pub fn adversary_home(&self, id: AdversaryId) -> Option<Vec3> {
        self.ghosts.adversaries().get(id.0).map(|a| a.home)
    }

    pub fn adversary_count(&self) -> usize {
        self.ghosts.len()
    }

    /// Position in the scatter/chase cycle
    pub fn wave_position(&self) -> u32 {
        self.wave.position()
    }

    /// Scheduled transitions not yet fired
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    fn add_score(&mut self, points: u64, events: &mut Vec<GameEvent>) {
        self.score += points;
        events.push(GameEvent::ScoreChanged { score: self.score });
    }

    fn set_state(&mut self, state: MatchState, win: Option<bool>, events: &mut Vec<GameEvent>) {
        log::info!("Match state {:?} -> {:?}", self.state, state);
        self.state = state;
        events.push(GameEvent::MatchStateChanged { state, win });
    }

    /// Put the player back at the start and queue the switch to `Playing`
    fn begin_countdown(&mut self, delay: u64, events: &mut Vec<GameEvent>) {
        self.agent_cell = self.agent_start;
        events.push(GameEvent::AgentRelocated {
            position: self.agent_start_position(),
        });
        self.set_state(MatchState::Ready, None, events);
        self.scheduler.cancel_all();
        self.scheduler.schedule(delay, SessionTask::BeginPlay);
    }

    /// Freeze the board: ghosts home, frightened cleared, wave clock rewound
    fn stop(&mut self, events: &mut Vec<GameEvent>) {
        self.ghosts.reset(events);
        self.frightened_ticks = 0;
        self.wave.reset();
    }

    fn enter_dying(&mut self, events: &mut Vec<GameEvent>) {
        log::info!("Player caught ({} lives left)", self.lives);
        self.stop(events);
        self.set_state(MatchState::Dying, None, events);
        self.scheduler.cancel_all();
        self.scheduler
            .schedule(self.config.timing.dying_delay, SessionTask::ResolveDeath);
    }

    fn resolve_death(&mut self, events: &mut Vec<GameEvent>) {
        self.lives = self.lives.saturating_sub(1);
        events.push(GameEvent::LifeChanged { lives: self.lives });
        if self.lives > 0 {
            self.begin_countdown(self.config.timing.restart_delay, events);
        } else {
            self.finish(false, events);
        }
    }

    /// Enter `Won` or `Lost` and record a new high score if one was set
    fn finish(&mut self, win: bool, events: &mut Vec<GameEvent>) {
        self.scheduler.cancel_all();
        self.stop(events);
        let state = if win { MatchState::Won } else { MatchState::Lost };
        self.set_state(state, Some(win), events);

        if self.score > self.high_score {
            self.high_score = self.score;
            self.store.save_high_score(self.high_score);
            events.push(GameEvent::HighScoreChanged {
                high_score: self.high_score,
            });
            log::info!("New high score: {}", self.high_score);
        }
    }
}
