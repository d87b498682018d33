use lightcycle_core::color::Color;

use crate::trail::Trail;
use crate::{Direction, Position};

/// Speed a vehicle has before any level configuration is applied to it.
pub const DEFAULT_SPEED: i32 = 3;

/// A light cycle: position, heading, speed and the trail it has laid.
#[derive(Debug, Clone)]
pub struct Vehicle {
    position: Position,
    heading: Direction,
    start_position: Position,
    start_heading: Direction,
    speed: i32,
    trails: Vec<Trail>,
    color: Color,
    allow_self_trail_collision: bool,
}

impl Vehicle {
    pub fn new(start_position: Position, start_heading: Direction, color: Color) -> Self {
        Self {
            position: start_position,
            heading: start_heading,
            start_position,
            start_heading,
            speed: DEFAULT_SPEED,
            trails: Vec::new(),
            color,
            allow_self_trail_collision: false,
        }
    }

    /// Move `speed` pixels along the heading, then lay a trail cell at the
    /// new position.
    pub fn advance(&mut self) {
        let (dx, dy) = self.heading.step(self.speed);
        self.position.x += dx;
        self.position.y += dy;
        self.trails.push(Trail::new(self.position, self.color));
    }

    /// Set the heading immediately. Reversal checks belong to the caller.
    pub fn change_direction(&mut self, heading: Direction) {
        self.heading = heading;
    }

    /// Back to the start position and heading with an empty trail.
    pub fn reset(&mut self) {
        self.return_to_start();
        self.trails.clear();
    }

    /// Back to the start position and heading, keeping the trail.
    pub fn return_to_start(&mut self) {
        self.position = self.start_position;
        self.heading = self.start_heading;
    }

    pub fn set_start(&mut self, position: Position, heading: Direction) {
        self.start_position = position;
        self.start_heading = heading;
    }

    /// Move the vehicle without laying a trail.
    pub fn place_at(&mut self, position: Position) {
        self.position = position;
    }

    pub fn set_speed(&mut self, speed: i32) {
        self.speed = speed;
    }

    pub fn set_self_trail_collision(&mut self, allow: bool) {
        self.allow_self_trail_collision = allow;
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn start_position(&self) -> Position {
        self.start_position
    }

    pub fn start_heading(&self) -> Direction {
        self.start_heading
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }

    /// Trail cells in the order they were laid; the last one is the most recent.
    pub fn trails(&self) -> &[Trail] {
        &self.trails
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn allows_self_trail_collision(&self) -> bool {
        self.allow_self_trail_collision
    }
}
