use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::collision::{near_trail, out_of_bounds};
use crate::trail::Trail;
use crate::{Arena, Direction, Position, Seat};

/// Steps ahead that count as the danger zone.
const LOOK_AHEAD_STEPS: u32 = 6;

/// Probing stops after this many steps; anything beyond is "wide open".
const MAX_PROBE_STEPS: u32 = 200;

/// Default probability per tick of a random turn on open ground.
pub const DEFAULT_WANDER_CHANCE: f64 = 0.02;

/// Computer driver for a seat. Keeps going straight until the way ahead
/// closes in, then takes whichever side turn is more open. Never reverses.
pub struct Autopilot {
    rng: StdRng,
    wander_chance: f64,
}

impl Autopilot {
    pub fn new(seed: u64, wander_chance: f64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            wander_chance: wander_chance.clamp(0.0, 1.0),
        }
    }

    /// Heading to steer `seat` into this tick, or `None` to hold course.
    pub fn steer(&mut self, arena: &Arena, seat: Seat) -> Option<Direction> {
        if arena.is_over() {
            return None;
        }
        let heading = arena.competitor(seat)?.vehicle().heading();

        let straight = open_steps(arena, seat, heading);
        let left = open_steps(arena, seat, heading.turn_left());
        let right = open_steps(arena, seat, heading.turn_right());

        if straight <= LOOK_AHEAD_STEPS {
            let (best, open) = if left >= right {
                (heading.turn_left(), left)
            } else {
                (heading.turn_right(), right)
            };
            return (open > straight).then_some(best);
        }

        if self.rng.random_bool(self.wander_chance) {
            let roomy = |open: u32| open > LOOK_AHEAD_STEPS * 3;
            let pick = match (roomy(left), roomy(right)) {
                (true, true) => {
                    if self.rng.random_bool(0.5) {
                        heading.turn_left()
                    } else {
                        heading.turn_right()
                    }
                }
                (true, false) => heading.turn_left(),
                (false, true) => heading.turn_right(),
                (false, false) => return None,
            };
            tracing::trace!(?seat, ?pick, "Autopilot wandering");
            return Some(pick);
        }
        None
    }
}

/// Number of moves `seat` could make along `heading` before it would crash,
/// capped at `MAX_PROBE_STEPS`.
pub fn open_steps(arena: &Arena, seat: Seat, heading: Direction) -> u32 {
    let Some(competitor) = arena.competitor(seat) else {
        return 0;
    };
    let vehicle = competitor.vehicle();
    let opponent: &[Trail] = arena
        .competitor(seat.other())
        .map(|c| c.vehicle().trails())
        .unwrap_or_default();
    let check_own = !vehicle.allows_self_trail_collision();
    let (dx, dy) = heading.step(vehicle.speed().max(1));

    let mut probe = vehicle.position();
    for step in 0..MAX_PROBE_STEPS {
        probe = Position::new(probe.x + dx, probe.y + dy);
        if out_of_bounds(probe, arena.arena_width(), arena.arena_height())
            || near_trail(probe, opponent)
            || (check_own && vehicle.trails().iter().any(|t| t.position() == probe))
        {
            return step;
        }
    }
    MAX_PROBE_STEPS
}
