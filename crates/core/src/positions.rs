//! Position types for game objects

use serde::{Deserialize, Serialize};

/// Tile position of an object in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: u16,
    pub y: u16,
    pub z: i8,
}

impl Position {
    pub const fn new(x: u16, y: u16, z: i8) -> Self {
        Self { x, y, z }
    }

    /// Planar distance to another position
    ///
    /// Uses the Chebyshev metric (the larger of the x and y offsets), which
    /// is how the game measures tile range. Height is ignored.
    pub fn distance_to(self, other: Position) -> u16 {
        let dx = (self.x as i32 - other.x as i32).unsigned_abs();
        let dy = (self.y as i32 - other.y as i32).unsigned_abs();
        dx.max(dy) as u16
    }

    /// Whether `other` lies within `range` tiles
    pub fn in_range(self, other: Position, range: u16) -> bool {
        self.distance_to(other) <= range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_chebyshev() {
        let origin = Position::new(100, 100, 0);
        assert_eq!(origin.distance_to(Position::new(102, 101, 0)), 2);
        // A diagonal step counts as one tile
        assert_eq!(origin.distance_to(Position::new(101, 101, 0)), 1);
        assert_eq!(origin.distance_to(Position::new(97, 100, 0)), 3);
    }

    #[test]
    fn test_distance_ignores_height() {
        let a = Position::new(10, 10, -20);
        let b = Position::new(10, 10, 40);
        assert_eq!(a.distance_to(b), 0);
    }

    #[test]
    fn test_in_range_is_inclusive() {
        let origin = Position::new(50, 50, 0);
        assert!(origin.in_range(Position::new(52, 52, 0), 2));
        assert!(!origin.in_range(Position::new(53, 50, 0), 2));
    }
}
