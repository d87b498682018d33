use crate::competitor::Competitor;
use crate::trail::Trail;
use crate::{Position, Seat};

/// Side of the square footprint a vehicle or trail cell occupies. Opponent
/// trail hits use this as a proximity box rather than exact equality.
pub const PROXIMITY: i32 = 10;

/// Whether a position lies outside `[0, width] x [0, height]`. The far edges
/// are inside.
pub fn out_of_bounds(position: Position, width: i32, height: i32) -> bool {
    position.x < 0 || position.x > width || position.y < 0 || position.y > height
}

/// Whether any trail cell lies strictly within the proximity box around
/// `position` on both axes.
pub fn near_trail(position: Position, trails: &[Trail]) -> bool {
    trails.iter().any(|t| {
        let cell = t.position();
        (cell.x - position.x).abs() < PROXIMITY && (cell.y - position.y).abs() < PROXIMITY
    })
}

/// Whether `position` exactly revisits one of the vehicle's own trail cells.
/// The most recent cell is skipped: it is the cell just laid at `position`.
pub fn crosses_own_trail(position: Position, trails: &[Trail]) -> bool {
    let Some((_, earlier)) = trails.split_last() else {
        return false;
    };
    earlier.iter().any(|t| t.position() == position)
}

/// First competitor, in seat order, that is out of bounds, touching an
/// opponent's trail, or (where the level forbids it) on its own trail.
pub fn find_collider(
    roster: &[Option<Competitor>; 2],
    arena_width: i32,
    arena_height: i32,
) -> Option<Seat> {
    for seat in Seat::ALL {
        let Some(competitor) = &roster[seat.index()] else {
            continue;
        };
        let vehicle = competitor.vehicle();
        let position = vehicle.position();

        if out_of_bounds(position, arena_width, arena_height) {
            return Some(seat);
        }

        if let Some(opponent) = &roster[seat.other().index()]
            && near_trail(position, opponent.vehicle().trails())
        {
            return Some(seat);
        }

        if !vehicle.allows_self_trail_collision() && crosses_own_trail(position, vehicle.trails())
        {
            return Some(seat);
        }
    }
    None
}
