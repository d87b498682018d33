use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::{Direction, Position, Seat};

/// Number of levels in the progression.
pub const LEVEL_COUNT: usize = 10;
/// Side length of the first level's square arena.
pub const BASE_SIDE: i32 = 600;
/// How much the arena side shrinks per level.
pub const SIDE_STEP: i32 = 25;
/// Smallest arena side the progression reaches.
pub const MIN_SIDE: i32 = 375;
/// Speed counter the progression starts from, bumped before level 0 is built.
pub const BASE_SPEED: i32 = 3;
/// Speed increases on every level index divisible by this.
pub const SPEED_STEP_EVERY: usize = 3;
/// Levels above this index let vehicles cross their own trail.
pub const SELF_TRAIL_COLLISION_FROM: usize = 6;
/// Vertical offset of the second seat's start corner from the bottom edge.
pub const START_BOTTOM_MARGIN: i32 = 10;

/// Arena configuration for one level plus the clock of its current run.
#[derive(Debug, Clone)]
pub struct Level {
    speed: i32,
    width: i32,
    height: i32,
    allow_self_trail_collision: bool,
    started_at: Option<Instant>,
}

impl Level {
    pub fn new(speed: i32, width: i32, height: i32, allow_self_trail_collision: bool) -> Self {
        Self {
            speed,
            width,
            height,
            allow_self_trail_collision,
            started_at: None,
        }
    }

    /// Restart the level clock.
    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Wall-clock time since the level last started. Display only.
    pub fn elapsed(&self) -> Duration {
        self.started_at.map(|t| t.elapsed()).unwrap_or_default()
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn allows_self_trail_collision(&self) -> bool {
        self.allow_self_trail_collision
    }
}

/// Build the fixed level progression.
///
/// The speed counter is bumped before level 0 is assigned, so the first
/// level runs at 4 rather than 3. Arena sides shrink by 25 per level.
pub fn level_sequence() -> [Level; LEVEL_COUNT] {
    let mut speed = BASE_SPEED;
    std::array::from_fn(|i| {
        if i % SPEED_STEP_EVERY == 0 {
            speed += 1;
        }
        let side = (BASE_SIDE - SIDE_STEP * i as i32).max(MIN_SIDE);
        Level::new(speed, side, side, i > SELF_TRAIL_COLLISION_FROM)
    })
}

/// Where a seat starts and which way it faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartPoint {
    pub position: Position,
    pub heading: Direction,
}

/// Canonical start corner for a seat in an arena of the given size: seat One
/// at the origin heading right, seat Two at the opposite corner heading left.
pub fn start_point(seat: Seat, width: i32, height: i32) -> StartPoint {
    match seat {
        Seat::One => StartPoint {
            position: Position::new(0, 0),
            heading: Direction::Right,
        },
        Seat::Two => StartPoint {
            position: Position::new(width, height - START_BOTTOM_MARGIN),
            heading: Direction::Left,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sides_shrink_by_25() {
        let sides: Vec<i32> = level_sequence().iter().map(|l| l.width()).collect();
        assert_eq!(
            sides,
            vec![600, 575, 550, 525, 500, 475, 450, 425, 400, 375]
        );
        for level in level_sequence() {
            assert_eq!(level.width(), level.height(), "arenas are square");
            assert!(level.width() >= MIN_SIDE);
        }
    }

    #[test]
    fn speed_bumped_before_first_level() {
        // The counter starts at 3 but level 0 already runs at 4.
        let speeds: Vec<i32> = level_sequence().iter().map(|l| l.speed()).collect();
        assert_eq!(speeds, vec![4, 4, 4, 5, 5, 5, 6, 6, 6, 7]);
    }

    #[test]
    fn self_trail_collision_allowed_from_level_seven() {
        let allowed: Vec<bool> = level_sequence()
            .iter()
            .map(|l| l.allows_self_trail_collision())
            .collect();
        assert_eq!(
            allowed,
            vec![false, false, false, false, false, false, false, true, true, true]
        );
    }

    #[test]
    fn unstarted_level_reports_zero_elapsed() {
        let level = Level::new(4, 600, 600, false);
        assert_eq!(level.elapsed(), Duration::ZERO);
    }

    #[test]
    fn started_level_clock_advances() {
        let mut level = Level::new(4, 600, 600, false);
        level.start();
        std::thread::sleep(Duration::from_millis(5));
        assert!(level.elapsed() >= Duration::from_millis(5));
    }

    #[test]
    fn start_points_are_opposite_corners() {
        let one = start_point(Seat::One, 600, 600);
        let two = start_point(Seat::Two, 600, 600);
        assert_eq!(one.position, Position::new(0, 0));
        assert_eq!(one.heading, Direction::Right);
        assert_eq!(two.position, Position::new(600, 590));
        assert_eq!(two.heading, Direction::Left);
    }

    #[test]
    fn start_points_scale_with_arena() {
        let two = start_point(Seat::Two, 375, 375);
        assert_eq!(two.position, Position::new(375, 365));
    }
}
