use serde::{Deserialize, Serialize};

use lightcycle_core::color::Color;

use crate::Position;

/// A cell left behind by a moving vehicle. Never changes once laid down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trail {
    position: Position,
    color: Color,
}

impl Trail {
    pub fn new(position: Position, color: Color) -> Self {
        Self { position, color }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn color(&self) -> Color {
        self.color
    }
}
