//! # Game Module
//!
//! Core game state management, the manor grid, and the drafting economy.
//!
//! This module contains the fundamental building blocks of Manse:
//! - Session state machine and event stream
//! - Grid and lazily materialized doors
//! - Room shapes, templates, and placement rules
//! - Inventory, items, and loot

pub mod doors;
pub mod grid;
pub mod inventory;
pub mod items;
pub mod rooms;
pub mod session;

pub use doors::*;
pub use grid::*;
pub use inventory::*;
pub use items::*;
pub use rooms::*;
pub use session::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a 2D cell coordinate on the manor grid.
///
/// The origin is the top-left cell: north decreases `y`, south increases it.
///
/// # Examples
///
/// ```
/// use manse::Position;
///
/// let pos = Position::new(2, 8);
/// assert_eq!(pos.x, 2);
/// assert_eq!(pos.y, 8);
///
/// let neighbors = pos.cardinal_adjacent_positions();
/// assert_eq!(neighbors.len(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the origin position (0, 0).
    pub fn origin() -> Self {
        Self::new(0, 0)
    }

    /// Returns the neighboring position one cell toward `direction`.
    ///
    /// # Examples
    ///
    /// ```
    /// use manse::{Direction, Position};
    ///
    /// let pos = Position::new(2, 3);
    /// assert_eq!(pos.offset(Direction::North), Position::new(2, 2));
    /// assert_eq!(pos.offset(Direction::East), Position::new(3, 3));
    /// ```
    pub fn offset(self, direction: Direction) -> Position {
        self + direction.to_delta()
    }

    /// Returns the 4 cardinal adjacent positions.
    pub fn cardinal_adjacent_positions(self) -> Vec<Position> {
        vec![
            Position::new(self.x, self.y - 1), // N
            Position::new(self.x - 1, self.y), // W
            Position::new(self.x + 1, self.y), // E
            Position::new(self.x, self.y + 1), // S
        ]
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// Cardinal directions for movement and door orientation.
///
/// The manor grid has no diagonal adjacency, so these four are the whole
/// vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Converts a direction to a position delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use manse::{Direction, Position};
    ///
    /// let delta = Direction::North.to_delta();
    /// assert_eq!(delta, Position::new(0, -1));
    /// ```
    pub fn to_delta(self) -> Position {
        match self {
            Direction::North => Position::new(0, -1),
            Direction::South => Position::new(0, 1),
            Direction::East => Position::new(1, 0),
            Direction::West => Position::new(-1, 0),
        }
    }

    /// Converts a position delta to a direction.
    ///
    /// Returns None for any delta that is not exactly one cardinal step,
    /// which is how malformed movement input gets rejected.
    pub fn from_delta(delta: Position) -> Option<Direction> {
        match (delta.x, delta.y) {
            (0, -1) => Some(Direction::North),
            (0, 1) => Some(Direction::South),
            (1, 0) => Some(Direction::East),
            (-1, 0) => Some(Direction::West),
            _ => None,
        }
    }

    /// Returns the opposite direction.
    ///
    /// # Examples
    ///
    /// ```
    /// use manse::Direction;
    ///
    /// assert_eq!(Direction::North.opposite(), Direction::South);
    /// assert_eq!(Direction::East.opposite(), Direction::West);
    /// ```
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Stable slot index for per-cell door storage.
    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
        }
    }

    /// Returns all 4 directions.
    pub fn all() -> Vec<Direction> {
        vec![
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
        ]
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        };
        write!(f, "{}", name)
    }
}

/// Unique identifier for room template instances.
pub type RoomId = Uuid;

/// Creates a new unique room ID.
pub fn new_room_id() -> RoomId {
    Uuid::new_v4()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_creation() {
        let pos = Position::new(2, 8);
        assert_eq!(pos.x, 2);
        assert_eq!(pos.y, 8);
    }

    #[test]
    fn test_position_offset() {
        let pos = Position::new(2, 2);
        assert_eq!(pos.offset(Direction::North), Position::new(2, 1));
        assert_eq!(pos.offset(Direction::South), Position::new(2, 3));
        assert_eq!(pos.offset(Direction::East), Position::new(3, 2));
        assert_eq!(pos.offset(Direction::West), Position::new(1, 2));
    }

    #[test]
    fn test_position_cardinal_adjacent() {
        let pos = Position::new(2, 4);
        let adjacent = pos.cardinal_adjacent_positions();
        assert_eq!(adjacent.len(), 4);
        assert!(adjacent.contains(&Position::new(2, 3))); // North
        assert!(adjacent.contains(&Position::new(1, 4))); // West
        assert!(!adjacent.contains(&Position::new(1, 3))); // No diagonal
    }

    #[test]
    fn test_position_arithmetic() {
        let pos1 = Position::new(5, 10);
        let pos2 = Position::new(3, 2);
        assert_eq!(pos1 + pos2, Position::new(8, 12));
        assert_eq!(pos1 - pos2, Position::new(2, 8));
    }

    #[test]
    fn test_direction_to_delta() {
        assert_eq!(Direction::North.to_delta(), Position::new(0, -1));
        assert_eq!(Direction::East.to_delta(), Position::new(1, 0));
    }

    #[test]
    fn test_direction_from_delta_rejects_diagonals() {
        assert_eq!(
            Direction::from_delta(Position::new(0, 1)),
            Some(Direction::South)
        );
        assert_eq!(Direction::from_delta(Position::new(1, -1)), None);
        assert_eq!(Direction::from_delta(Position::new(0, 0)), None);
        assert_eq!(Direction::from_delta(Position::new(2, 0)), None);
    }

    #[test]
    fn test_direction_opposites_are_involutions() {
        for dir in Direction::all() {
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }

    #[test]
    fn test_direction_indices_are_distinct() {
        let mut seen = [false; 4];
        for dir in Direction::all() {
            assert!(!seen[dir.index()]);
            seen[dir.index()] = true;
        }
    }

    #[test]
    fn test_room_id_uniqueness() {
        let id1 = new_room_id();
        let id2 = new_room_id();
        assert_ne!(id1, id2);
    }
}
