use serde::{Deserialize, Serialize};

use lightcycle_core::color::Color;

use crate::trail::Trail;
use crate::{Arena, Direction, Position, Seat};

/// Side of the square drawn for a vehicle or a trail cell.
pub const BLOCK_SIZE: i32 = 10;

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    pub level_index: usize,
    pub arena_width: i32,
    pub arena_height: i32,
    pub is_over: bool,
    pub level_elapsed_ms: u64,
    pub vehicles: Vec<VehicleView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleView {
    pub seat: Seat,
    pub name: String,
    pub position: Position,
    pub heading: Direction,
    pub color: Color,
    pub trail: Vec<Trail>,
}

impl Arena {
    pub fn snapshot(&self) -> ArenaSnapshot {
        ArenaSnapshot {
            level_index: self.current_level_index(),
            arena_width: self.arena_width(),
            arena_height: self.arena_height(),
            is_over: self.is_over(),
            level_elapsed_ms: u64::try_from(self.current_level().elapsed().as_millis())
                .unwrap_or(u64::MAX),
            vehicles: self
                .competitors()
                .map(|(seat, c)| {
                    let vehicle = c.vehicle();
                    VehicleView {
                        seat,
                        name: c.name().to_string(),
                        position: vehicle.position(),
                        heading: vehicle.heading(),
                        color: vehicle.color(),
                        trail: vehicle.trails().to_vec(),
                    }
                })
                .collect(),
        }
    }
}

/// Encode a snapshot as MessagePack for broadcast.
pub fn encode_snapshot(snapshot: &ArenaSnapshot) -> Result<Vec<u8>, rmp_serde::encode::Error> {
    rmp_serde::to_vec(snapshot)
}

pub fn decode_snapshot(data: &[u8]) -> Result<ArenaSnapshot, rmp_serde::decode::Error> {
    rmp_serde::from_slice(data)
}
