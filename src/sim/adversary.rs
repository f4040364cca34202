//! Ghost behaviour
//!
//! Each ghost runs a small mode machine (scatter, chase, frightened, eaten)
//! and reports where it wants to go. Actually moving there is the external
//! mover's job; this module only decides destinations and speed tiers.

use glam::Vec3;
use rand::{Rng, RngCore};

use super::grid::GridMap;
use super::state::{AdversaryId, AdversaryMode, GameEvent, SpeedTier, VisualState, WavePhase};
use crate::settings::TimingConfig;

/// Global scatter/chase cycle
#[derive(Debug, Clone)]
pub struct WaveClock {
    position: u32,
    scatter: u32,
    chase: u32,
}

impl WaveClock {
    pub fn new(scatter: u32, chase: u32) -> Self {
        Self {
            position: 0,
            scatter,
            chase,
        }
    }

    pub fn phase(&self) -> WavePhase {
        if self.position < self.scatter {
            WavePhase::Scatter
        } else {
            WavePhase::Chase
        }
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn advance(&mut self) {
        self.position = (self.position + 1) % (self.scatter + self.chase);
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }
}

/// A single ghost
#[derive(Debug, Clone)]
pub struct Adversary {
    pub id: AdversaryId,
    pub name: String,
    /// Last position reported by the mover
    pub position: Vec3,
    pub home: Vec3,
    pub mode: AdversaryMode,
    /// Rank this ghost was captured at since the last power item (0 = not captured)
    pub capture_rank: u32,
    /// Current roaming or chase target
    destination: Option<Vec3>,
    last_directive: Option<(Vec3, SpeedTier)>,
    last_visual: VisualState,
}

impl Adversary {
    fn new(id: AdversaryId, name: String, home: Vec3) -> Self {
        Self {
            id,
            name,
            position: home,
            home,
            mode: AdversaryMode::Scatter,
            capture_rank: 0,
            destination: None,
            last_directive: None,
            last_visual: VisualState::Normal,
        }
    }

    pub fn speed_tier(&self) -> SpeedTier {
        match self.mode {
            AdversaryMode::Scatter | AdversaryMode::Chase => SpeedTier::Normal,
            AdversaryMode::Frightened { .. } => SpeedTier::Frightened,
            AdversaryMode::Eaten => SpeedTier::Eaten,
        }
    }

    /// Appearance for the current mode; flashes on even ticks near the end of frightened
    pub fn visual_state(&self, flash_window: u32) -> VisualState {
        match self.mode {
            AdversaryMode::Scatter | AdversaryMode::Chase => VisualState::Normal,
            AdversaryMode::Frightened { ticks_left } => {
                if ticks_left < flash_window && ticks_left % 2 == 0 {
                    VisualState::Flashing
                } else {
                    VisualState::Frightened
                }
            }
            AdversaryMode::Eaten => VisualState::Eaten,
        }
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    /// Whether the last reported position is on the home cell (x/z only)
    fn is_home(&self, tolerance: f32) -> bool {
        (self.position.x - self.home.x).abs() <= tolerance
            && (self.position.z - self.home.z).abs() <= tolerance
    }
}

/// Per-tick inputs for advancing one ghost
#[derive(Debug, Clone, Copy)]
pub struct AdvanceContext {
    pub phase: WavePhase,
    /// World position of the player's cell, if it is walkable
    pub chase_target: Option<Vec3>,
    /// The mover reported arrival at the previous destination
    pub arrived: bool,
}

/// Owns every ghost's mode state plus the shared capture rank
pub struct AdversaryController {
    adversaries: Vec<Adversary>,
    rng: Box<dyn RngCore>,
    frightened_ticks: u32,
    flash_window: u32,
    /// How close an eaten ghost must be to its home for an arrival to count
    home_tolerance: f32,
    capture_rank: u32,
}

impl std::fmt::Debug for AdversaryController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdversaryController")
            .field("adversaries", &self.adversaries)
            .field("capture_rank", &self.capture_rank)
            .finish_non_exhaustive()
    }
}

impl AdversaryController {
    /// `homes` are (name, world position) pairs in id order
    pub fn new(
        homes: Vec<(String, Vec3)>,
        timing: &TimingConfig,
        home_tolerance: f32,
        rng: Box<dyn RngCore>,
    ) -> Self {
        let adversaries = homes
            .into_iter()
            .enumerate()
            .map(|(i, (name, home))| Adversary::new(AdversaryId(i), name, home))
            .collect();
        Self {
            adversaries,
            rng,
            frightened_ticks: timing.frightened,
            flash_window: timing.flash_window,
            home_tolerance,
            capture_rank: 0,
        }
    }

    pub fn adversaries(&self) -> &[Adversary] {
        &self.adversaries
    }

    pub fn len(&self) -> usize {
        self.adversaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adversaries.is_empty()
    }

    pub fn capture_rank(&self) -> u32 {
        self.capture_rank
    }

    /// Record a position reported by the mover
    pub fn observe_position(&mut self, id: AdversaryId, position: Vec3) {
        if let Some(adversary) = self.adversaries.get_mut(id.0) {
            adversary.position = position;
        }
    }

    /// Send every ghost home in scatter mode, teleporting it there
    pub fn reset(&mut self, events: &mut Vec<GameEvent>) {
        self.capture_rank = 0;
        for adversary in &mut self.adversaries {
            adversary.mode = AdversaryMode::Scatter;
            adversary.capture_rank = 0;
            adversary.position = adversary.home;
            adversary.destination = None;
            adversary.last_directive = None;
            events.push(GameEvent::AdversaryRelocated {
                id: adversary.id,
                position: adversary.home,
            });
        }
        for i in 0..self.adversaries.len() {
            self.sync_visual(i, events);
        }
    }

    /// A power item was eaten: every ghost not already eaten becomes frightened
    /// and the capture chain restarts
    pub fn frighten_all(&mut self) {
        self.capture_rank = 0;
        for adversary in &mut self.adversaries {
            adversary.capture_rank = 0;
            if adversary.mode != AdversaryMode::Eaten {
                adversary.mode = AdversaryMode::Frightened {
                    ticks_left: self.frightened_ticks,
                };
            }
        }
    }

    /// Advance ghost `index` by one tick and emit any changed outputs
    pub fn advance(
        &mut self,
        index: usize,
        grid: &GridMap,
        ctx: AdvanceContext,
        events: &mut Vec<GameEvent>,
    ) {
        let Some(adversary) = self.adversaries.get_mut(index) else {
            return;
        };

        if ctx.arrived {
            if adversary.mode != AdversaryMode::Eaten {
                adversary.destination = None;
            } else if adversary.is_home(self.home_tolerance) {
                adversary.mode = ctx.phase.into();
                adversary.destination = None;
                log::debug!("{} is home, resuming {:?}", adversary.name, adversary.mode);
            } else {
                // Stale arrival from an earlier leg: send it home again
                adversary.last_directive = None;
                log::debug!("{} reported arrival away from home", adversary.name);
            }
        }

        match adversary.mode {
            AdversaryMode::Frightened { ticks_left } => {
                let ticks_left = ticks_left.saturating_sub(1);
                adversary.mode = if ticks_left == 0 {
                    ctx.phase.into()
                } else {
                    AdversaryMode::Frightened { ticks_left }
                };
            }
            AdversaryMode::Scatter | AdversaryMode::Chase => {
                let mode = AdversaryMode::from(ctx.phase);
                if mode != adversary.mode {
                    adversary.mode = mode;
                    adversary.destination = None;
                }
            }
            AdversaryMode::Eaten => {}
        }

        let destination = match adversary.mode {
            AdversaryMode::Eaten => Some(adversary.home),
            AdversaryMode::Chase => ctx.chase_target.or(adversary.destination),
            AdversaryMode::Scatter | AdversaryMode::Frightened { .. } => adversary.destination,
        };
        adversary.destination = destination.or_else(|| pick_waypoint(grid, self.rng.as_mut()));

        self.sync_outputs(index, events);
    }

    /// Capture a frightened ghost; returns its rank in the current chain
    pub fn capture(&mut self, index: usize, events: &mut Vec<GameEvent>) -> u32 {
        self.capture_rank += 1;
        let rank = self.capture_rank;
        if let Some(adversary) = self.adversaries.get_mut(index) {
            adversary.mode = AdversaryMode::Eaten;
            adversary.capture_rank = rank;
            adversary.destination = Some(adversary.home);
            log::debug!("{} captured at rank {}", adversary.name, rank);
        }
        self.sync_outputs(index, events);
        rank
    }

    fn sync_outputs(&mut self, index: usize, events: &mut Vec<GameEvent>) {
        self.sync_visual(index, events);
        let adversary = &mut self.adversaries[index];
        if let Some(destination) = adversary.destination {
            let directive = (destination, adversary.speed_tier());
            if adversary.last_directive != Some(directive) {
                adversary.last_directive = Some(directive);
                events.push(GameEvent::AdversaryDirective {
                    id: adversary.id,
                    destination,
                    speed: directive.1,
                });
            }
        }
    }

    fn sync_visual(&mut self, index: usize, events: &mut Vec<GameEvent>) {
        let adversary = &mut self.adversaries[index];
        let visual = adversary.visual_state(self.flash_window);
        if visual != adversary.last_visual {
            adversary.last_visual = visual;
            events.push(GameEvent::AdversaryVisualState {
                id: adversary.id,
                state: visual,
            });
        }
    }
}

/// Uniformly random scatter waypoint
fn pick_waypoint(grid: &GridMap, rng: &mut dyn RngCore) -> Option<Vec3> {
    let waypoints = grid.waypoints();
    if waypoints.is_empty() {
        return None;
    }
    let index = waypoints[rng.random_range(0..waypoints.len())];
    grid.walkable_position(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameConfig;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const SCATTER: AdvanceContext = AdvanceContext {
        phase: WavePhase::Scatter,
        chase_target: None,
        arrived: false,
    };

    fn setup() -> (GridMap, AdversaryController) {
        let config = GameConfig::default();
        let grid = config.build_grid().expect("default maze decodes");
        let homes = vec![
            ("a".to_string(), Vec3::new(0.0, 0.0, 0.0)),
            ("b".to_string(), Vec3::new(1.0, 0.0, 0.0)),
        ];
        let controller = AdversaryController::new(
            homes,
            &config.timing,
            config.collision_distance,
            Box::new(Pcg32::seed_from_u64(7)),
        );
        (grid, controller)
    }

    fn tick_all(grid: &GridMap, controller: &mut AdversaryController, ctx: AdvanceContext) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for i in 0..controller.len() {
            controller.advance(i, grid, ctx, &mut events);
        }
        events
    }

    #[test]
    fn test_wave_clock_cycles() {
        let mut clock = WaveClock::new(3, 2);
        let phases: Vec<_> = (0..6)
            .map(|_| {
                let p = clock.phase();
                clock.advance();
                p
            })
            .collect();
        use WavePhase::*;
        assert_eq!(phases, vec![Scatter, Scatter, Scatter, Chase, Chase, Scatter]);
        clock.reset();
        assert_eq!(clock.position(), 0);
    }

    #[test]
    fn test_starts_in_scatter_with_waypoint() {
        let (grid, mut controller) = setup();
        let events = tick_all(&grid, &mut controller, SCATTER);
        let waypoint_positions: Vec<Vec3> = grid
            .waypoints()
            .iter()
            .filter_map(|&i| grid.walkable_position(i))
            .collect();
        for adversary in controller.adversaries() {
            assert_eq!(adversary.mode, AdversaryMode::Scatter);
            let dest = adversary.destination().expect("has a destination");
            assert!(waypoint_positions.contains(&dest));
        }
        let directives = events
            .iter()
            .filter(|e| matches!(e, GameEvent::AdversaryDirective { speed: SpeedTier::Normal, .. }))
            .count();
        assert_eq!(directives, 2);
    }

    #[test]
    fn test_directive_only_on_change() {
        let (grid, mut controller) = setup();
        tick_all(&grid, &mut controller, SCATTER);
        let events = tick_all(&grid, &mut controller, SCATTER);
        assert!(events.is_empty());
    }

    #[test]
    fn test_chase_targets_agent() {
        let (grid, mut controller) = setup();
        let target = Vec3::new(2.0, 0.8, 3.0);
        tick_all(
            &grid,
            &mut controller,
            AdvanceContext {
                phase: WavePhase::Chase,
                chase_target: Some(target),
                arrived: false,
            },
        );
        for adversary in controller.adversaries() {
            assert_eq!(adversary.mode, AdversaryMode::Chase);
            assert_eq!(adversary.destination(), Some(target));
        }
    }

    #[test]
    fn test_frightened_countdown_flash_and_recovery() {
        let (grid, mut controller) = setup();
        tick_all(&grid, &mut controller, SCATTER);
        controller.frighten_all();

        let mut visuals = Vec::new();
        for _ in 0..70 {
            tick_all(&grid, &mut controller, SCATTER);
            visuals.push(controller.adversaries()[0].visual_state(20));
        }
        // Recovered on the 70th tick into the wave phase
        assert_eq!(controller.adversaries()[0].mode, AdversaryMode::Scatter);
        assert!(visuals[..50].iter().all(|v| *v == VisualState::Frightened));
        // ticks_left 18 is even and inside the window
        assert_eq!(visuals[51], VisualState::Flashing);
        assert_eq!(visuals[52], VisualState::Frightened);
        assert_eq!(visuals[69], VisualState::Normal);
    }

    #[test]
    fn test_frightened_resumes_current_phase() {
        let (grid, mut controller) = setup();
        controller.frighten_all();
        let chase = AdvanceContext {
            phase: WavePhase::Chase,
            chase_target: Some(Vec3::ONE),
            arrived: false,
        };
        for _ in 0..70 {
            tick_all(&grid, &mut controller, chase);
        }
        assert_eq!(controller.adversaries()[1].mode, AdversaryMode::Chase);
        assert_eq!(controller.adversaries()[1].destination(), Some(Vec3::ONE));
    }

    #[test]
    fn test_wave_change_suppressed_while_frightened() {
        let (grid, mut controller) = setup();
        controller.frighten_all();
        tick_all(
            &grid,
            &mut controller,
            AdvanceContext {
                phase: WavePhase::Chase,
                chase_target: Some(Vec3::ONE),
                arrived: false,
            },
        );
        assert!(controller.adversaries()[0].mode.is_frightened());
    }

    #[test]
    fn test_capture_ranks_and_reset_on_power_item() {
        let (grid, mut controller) = setup();
        controller.frighten_all();
        let mut events = Vec::new();
        assert_eq!(controller.capture(0, &mut events), 1);
        assert_eq!(controller.capture(1, &mut events), 2);
        assert_eq!(controller.adversaries()[1].capture_rank, 2);
        assert!(events.contains(&GameEvent::AdversaryDirective {
            id: AdversaryId(0),
            destination: Vec3::ZERO,
            speed: SpeedTier::Eaten,
        }));

        controller.frighten_all();
        assert_eq!(controller.capture_rank(), 0);
        assert!(controller.adversaries().iter().all(|a| a.capture_rank == 0));
        // Eaten ghosts stay eaten
        assert!(controller.adversaries().iter().all(|a| a.mode == AdversaryMode::Eaten));
        tick_all(&grid, &mut controller, SCATTER);
    }

    #[test]
    fn test_eaten_returns_home_then_resumes() {
        let (grid, mut controller) = setup();
        controller.frighten_all();
        let mut events = Vec::new();
        controller.capture(0, &mut events);

        // Still eaten while travelling; destination is home
        tick_all(&grid, &mut controller, SCATTER);
        assert_eq!(controller.adversaries()[0].mode, AdversaryMode::Eaten);
        assert_eq!(controller.adversaries()[0].destination(), Some(Vec3::ZERO));

        let mut events = Vec::new();
        controller.advance(
            0,
            &grid,
            AdvanceContext {
                phase: WavePhase::Chase,
                chase_target: Some(Vec3::ONE),
                arrived: true,
            },
            &mut events,
        );
        let adversary = &controller.adversaries()[0];
        assert_eq!(adversary.mode, AdversaryMode::Chase);
        assert_eq!(adversary.speed_tier(), SpeedTier::Normal);
        assert!(events.contains(&GameEvent::AdversaryVisualState {
            id: AdversaryId(0),
            state: VisualState::Normal,
        }));
    }

    #[test]
    fn test_arrival_rerolls_scatter_waypoint() {
        let (grid, mut controller) = setup();
        tick_all(&grid, &mut controller, SCATTER);
        let arrived = AdvanceContext {
            arrived: true,
            ..SCATTER
        };
        // With 28 waypoints a few rerolls must move somewhere new
        let first = controller.adversaries()[0].destination();
        let changed = (0..10).any(|_| {
            tick_all(&grid, &mut controller, arrived);
            controller.adversaries()[0].destination() != first
        });
        assert!(changed);
    }

    #[test]
    fn test_reset_relocates_home() {
        let (grid, mut controller) = setup();
        controller.frighten_all();
        tick_all(&grid, &mut controller, SCATTER);
        controller.observe_position(AdversaryId(1), Vec3::splat(5.0));

        let mut events = Vec::new();
        controller.reset(&mut events);
        assert!(events.contains(&GameEvent::AdversaryRelocated {
            id: AdversaryId(1),
            position: Vec3::new(1.0, 0.0, 0.0),
        }));
        assert!(events.contains(&GameEvent::AdversaryVisualState {
            id: AdversaryId(1),
            state: VisualState::Normal,
        }));
        assert_eq!(controller.adversaries()[1].position, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(controller.adversaries()[1].mode, AdversaryMode::Scatter);
    }
}
