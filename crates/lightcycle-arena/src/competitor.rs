use lightcycle_core::color::Color;

use crate::vehicle::Vehicle;
use crate::{Direction, Position};

/// Score a competitor carries into the leaderboard for each round won.
pub const WIN_SCORE_DELTA: i32 = 1;

/// A named participant driving one vehicle.
#[derive(Debug, Clone)]
pub struct Competitor {
    name: String,
    vehicle: Vehicle,
    score: i32,
}

impl Competitor {
    pub fn new(
        name: impl Into<String>,
        color: Color,
        start_position: Position,
        start_heading: Direction,
    ) -> Self {
        Self {
            name: name.into(),
            vehicle: Vehicle::new(start_position, start_heading, color),
            score: WIN_SCORE_DELTA,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn vehicle_mut(&mut self) -> &mut Vehicle {
        &mut self.vehicle
    }

    pub fn reset(&mut self) {
        self.vehicle.reset();
    }
}
