use serde::{Deserialize, Serialize};

/// Trail and vehicle color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Default for Color {
    fn default() -> Self {
        Self::PALETTE[0]
    }
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Predefined colors handed out to competitors that did not pick one.
    pub const PALETTE: &[Color] = &[
        Color::rgb(83, 152, 255),  // Blue
        Color::rgb(255, 148, 77),  // Orange
        Color::rgb(46, 213, 115),  // Green
        Color::rgb(255, 87, 87),   // Red
        Color::rgb(78, 205, 196),  // Teal
        Color::rgb(255, 195, 18),  // Yellow
        Color::rgb(130, 88, 255),  // Purple
        Color::rgb(255, 107, 175), // Pink
    ];

    /// Palette entry for the given slot, wrapping around.
    pub fn from_palette(index: usize) -> Self {
        Self::PALETTE[index % Self::PALETTE.len()]
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}
