use crate::{Arena, Direction, Seat};

/// Map a DOM-style key code to the seat and heading it controls.
/// WASD drives seat One, the arrow keys drive seat Two.
pub fn key_binding(code: &str) -> Option<(Seat, Direction)> {
    let binding = match code {
        "KeyW" => (Seat::One, Direction::Up),
        "KeyS" => (Seat::One, Direction::Down),
        "KeyA" => (Seat::One, Direction::Left),
        "KeyD" => (Seat::One, Direction::Right),
        "ArrowUp" => (Seat::Two, Direction::Up),
        "ArrowDown" => (Seat::Two, Direction::Down),
        "ArrowLeft" => (Seat::Two, Direction::Left),
        "ArrowRight" => (Seat::Two, Direction::Right),
        _ => return None,
    };
    Some(binding)
}

impl Arena {
    /// Player steering request. Ignored unless both seats are filled, and
    /// ignored when it would reverse the vehicle onto its own trail.
    /// Returns whether the heading was applied.
    pub fn steer(&mut self, seat: Seat, heading: Direction) -> bool {
        if self.competitor_count() < 2 {
            return false;
        }
        let Some(current) = self.competitor(seat).map(|c| c.vehicle().heading()) else {
            return false;
        };
        if heading == current.reverse() {
            return false;
        }
        self.change_direction(seat, heading);
        true
    }

    /// Apply a raw key press. Unbound keys are ignored.
    pub fn handle_key(&mut self, code: &str) -> bool {
        match key_binding(code) {
            Some((seat, heading)) => self.steer(seat, heading),
            None => false,
        }
    }
}
