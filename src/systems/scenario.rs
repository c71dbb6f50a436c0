//! Battle scenario built from one parameter draw.
//!
//! A single tracking robot faces a column of stationary obstacles. The
//! obstacle count grows with the square of the arena size, so larger arenas
//! also mean more targets to clear.

/// Rounds per battle.
pub const NUM_ROUNDS: u32 = 1;
/// Turns without damage before the engine starts penalising robots.
pub const INACTIVITY_TIME: u64 = 100;
pub const SENTRY_BORDER_SIZE: u32 = 50;
/// Obstacles per square pixel of arena.
pub const OBSTACLE_DENSITY: f64 = 0.000_01;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RobotRole {
    /// Aims and fires at the nearest target.
    Tracker,
    /// Never moves or fires.
    Obstacle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub role: RobotRole,
    pub x: f64,
    pub y: f64,
    pub heading: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scenario {
    /// Drawn arena side before truncation.
    pub arena_size: f64,
    /// Arena width and height in whole pixels (square arena).
    pub width: u32,
    pub height: u32,
    pub cooling_rate: f64,
    pub rounds: u32,
    pub inactivity_time: u64,
    pub sentry_border_size: u32,
    pub hide_enemy_names: bool,
    /// Tracker first, then obstacles top to bottom.
    pub robots: Vec<Placement>,
}

impl Scenario {
    /// Lay out the battle for a drawn `(arena_size, cooling_rate)`.
    ///
    /// The arena is truncated to whole pixels; robot positions use the
    /// untruncated size.
    pub fn for_draw(arena_size: f64, cooling_rate: f64) -> Self {
        let side = arena_size as u32;
        let n = obstacle_count(side);

        let mut robots = Vec::with_capacity(n + 1);
        robots.push(Placement {
            role: RobotRole::Tracker,
            x: 2.0 * arena_size / 3.0,
            y: arena_size / 2.0,
            heading: 0.0,
        });
        for i in 1..=n {
            robots.push(Placement {
                role: RobotRole::Obstacle,
                x: arena_size / 3.0,
                y: i as f64 * arena_size / (n + 1) as f64,
                heading: 0.0,
            });
        }

        Self {
            arena_size,
            width: side,
            height: side,
            cooling_rate,
            rounds: NUM_ROUNDS,
            inactivity_time: INACTIVITY_TIME,
            sentry_border_size: SENTRY_BORDER_SIZE,
            hide_enemy_names: false,
            robots,
        }
    }

    pub fn tracker(&self) -> Option<&Placement> {
        self.robots.iter().find(|r| r.role == RobotRole::Tracker)
    }

    pub fn obstacles(&self) -> impl Iterator<Item = &Placement> {
        self.robots.iter().filter(|r| r.role == RobotRole::Obstacle)
    }
}

/// floor(density * side²) on the whole-pixel side.
#[inline]
pub fn obstacle_count(side: u32) -> usize {
    let side = side as f64;
    (OBSTACLE_DENSITY * side * side) as usize
}
