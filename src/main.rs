//! Maze Chase entry point
//!
//! Native builds run a headless demo: the player walks a fixed loop through
//! the maze while a straight-line stand-in mover drives the ghosts. Every
//! engine event is logged (`RUST_LOG=info` or `debug`).
//!
//! Usage: `maze-chase [config.json]`

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec3;

    use maze_chase::consts::TICK_MILLIS;
    use maze_chase::sim::{AdversaryId, GameEvent, GameSession, TickInput};
    use maze_chase::{ConfigError, GameConfig, JsonFileHighScoreStore};

    /// Corners of the player's loop, as (row, column); consecutive corners share a row or column
    const ROUTE: [(usize, usize); 13] = [
        (22, 12),
        (22, 5),
        (25, 5),
        (25, 0),
        (28, 0),
        (28, 25),
        (25, 25),
        (25, 20),
        (19, 20),
        (4, 20),
        (4, 5),
        (22, 5),
        (22, 12),
    ];

    const MAX_TICKS: u32 = 2_000;
    const ARRIVAL_DISTANCE: f32 = 0.05;

    /// Expand the corner list into one cell per tick
    fn route_cells() -> Vec<(usize, usize)> {
        let mut cells = vec![ROUTE[0]];
        for pair in ROUTE.windows(2) {
            let (mut r, mut c) = pair[0];
            let (r2, c2) = pair[1];
            while (r, c) != (r2, c2) {
                if r != r2 {
                    r = if r < r2 { r + 1 } else { r - 1 };
                } else {
                    c = if c < c2 { c + 1 } else { c - 1 };
                }
                cells.push((r, c));
            }
        }
        cells
    }

    /// Stand-in for the navigation layer: glides straight to the destination
    struct GhostMover {
        position: Vec3,
        destination: Option<Vec3>,
        speed: f32,
    }

    impl GhostMover {
        /// Returns true on arrival
        fn update(&mut self, dt: f32) -> bool {
            let Some(dest) = self.destination else {
                return false;
            };
            let delta = dest - self.position;
            let travel = self.speed * dt;
            if delta.length() <= travel.max(ARRIVAL_DISTANCE) {
                self.position = dest;
                self.destination = None;
                true
            } else {
                self.position += delta.normalize() * travel;
                false
            }
        }
    }

    pub fn run() -> Result<(), ConfigError> {
        let config = match std::env::args().nth(1) {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };
        let speeds = config.speeds.clone();
        let store = JsonFileHighScoreStore::new("maze_chase_highscore.json");
        let mut session = GameSession::new(config, Box::new(store))?;

        let mut ghosts: Vec<GhostMover> = (0..session.adversary_count())
            .map(|i| GhostMover {
                position: session.adversary_home(AdversaryId(i)).unwrap_or_default(),
                destination: None,
                speed: speeds.normal,
            })
            .collect();

        let route = route_cells();
        let mut route_index = 0;
        let mut agent = session.agent_start_position();
        let dt = TICK_MILLIS as f32 / 1000.0;

        let mut events = session.start_new_game();
        for tick in 0..MAX_TICKS {
            for event in &events {
                log::info!("[{:>4}] {:?}", tick, event);
                match *event {
                    GameEvent::AdversaryDirective { id, destination, speed } => {
                        if let Some(ghost) = ghosts.get_mut(id.0) {
                            ghost.destination = Some(destination);
                            ghost.speed = speeds.for_tier(speed);
                        }
                    }
                    GameEvent::AdversaryRelocated { id, position } => {
                        if let Some(ghost) = ghosts.get_mut(id.0) {
                            ghost.position = position;
                            ghost.destination = None;
                        }
                    }
                    GameEvent::AgentRelocated { position } => {
                        agent = position;
                        route_index = 0;
                    }
                    _ => {}
                }
            }
            if session.state().is_over() {
                break;
            }

            let mut input = TickInput::new(agent);
            for (i, ghost) in ghosts.iter_mut().enumerate() {
                let arrived = ghost.update(dt);
                input = input.with_adversary(AdversaryId(i), ghost.position);
                if arrived {
                    input = input.with_arrival(AdversaryId(i));
                }
            }

            events = session.step(&input);

            if session.state() == maze_chase::MatchState::Playing {
                route_index = (route_index + 1) % route.len();
                let (row, col) = route[route_index];
                if let Some(next) = session
                    .grid()
                    .index_of(row, col)
                    .and_then(|i| session.grid().cell_world_position(i))
                {
                    agent = next;
                }
            }
        }

        log::info!(
            "Demo finished: {:?}, score {}, high score {}, {} pellets left",
            session.state(),
            session.score(),
            session.high_score(),
            session.remaining_pellets()
        );
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Maze Chase (native demo) starting...");

    if let Err(e) = demo::run() {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is maze_chase::web, this is just to satisfy the compiler
}
