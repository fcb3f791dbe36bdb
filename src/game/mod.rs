//! # Game Module
//!
//! Core game types and subsystems: the board and its cells, the seeded
//! random source, actors and skills, the auto-path walker, the combat
//! phase machine, progression, and the session coordinator.

pub mod actors;
pub mod board;
pub mod combat;
pub mod pathfinding;
pub mod progression;
pub mod rng;
pub mod session;
pub mod skills;
pub mod walker;

pub use actors::*;
pub use board::*;
pub use combat::*;
pub use pathfinding::*;
pub use progression::*;
pub use rng::*;
pub use session::*;
pub use skills::*;
pub use walker::*;

use serde::{Deserialize, Serialize};

/// Represents a 2D coordinate on the board.
///
/// # Examples
///
/// ```
/// use dicebound::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.manhattan_distance(Position::new(13, 9)), 7);
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

    /// Calculates the Manhattan distance to another position.
    pub fn manhattan_distance(self, other: Position) -> u32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u32
    }

    /// Returns the 4 cardinal neighbors in the walker's priority order
    /// (Right, Down, Up, Left).
    pub fn priority_neighbors(self) -> [Position; 4] {
        [
            Position::new(self.x + 1, self.y),
            Position::new(self.x, self.y + 1),
            Position::new(self.x, self.y - 1),
            Position::new(self.x - 1, self.y),
        ]
    }

    /// Returns the 4 cardinal neighbors in reading order.
    pub fn cardinal_neighbors(self) -> [Position; 4] {
        [
            Position::new(self.x, self.y - 1),
            Position::new(self.x - 1, self.y),
            Position::new(self.x + 1, self.y),
            Position::new(self.x, self.y + 1),
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

/// Movement directions. The auto-path walker scans these in the fixed
/// priority order returned by [`Direction::priority`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Converts a direction to a position delta.
    pub fn to_delta(self) -> Position {
        match self {
            Direction::Up => Position::new(0, -1),
            Direction::Down => Position::new(0, 1),
            Direction::Left => Position::new(-1, 0),
            Direction::Right => Position::new(1, 0),
        }
    }

    /// Converts a unit position delta back to a direction.
    ///
    /// Returns None for anything that is not a cardinal unit step.
    pub fn from_delta(delta: Position) -> Option<Direction> {
        match (delta.x, delta.y) {
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            _ => None,
        }
    }

    /// The walker's fixed scan order.
    pub fn priority() -> [Direction; 4] {
        [
            Direction::Right,
            Direction::Down,
            Direction::Up,
            Direction::Left,
        ]
    }
}

/// One face of the combat coin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoinFace {
    Head,
    Tail,
}

/// Final result of one combat encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatOutcome {
    Victory,
    Defeat,
}

/// Tile event categories reported to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileEventKind {
    Monster,
    Boss,
    Rock,
    Teleport,
    Goal,
}

/// Semantic events emitted by the core for the presentation layer.
///
/// These double as audio/asset trigger points: a collaborator maps
/// variants like `DiceRolled` or `HitLanded` to actual playback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A dice roll started a new walk sequence
    DiceRolled { value: i32 },
    /// The player advanced one cell
    StepTaken { to: Position },
    /// A rock was struck; `broken` is true once it crumbled
    RockStruck { at: Position, broken: bool },
    /// The player jumped through a teleport gate
    Teleported { from: Position, to: Position },
    /// A tile event fired at the given coordinate
    TileEventTriggered { kind: TileEventKind, at: Position },
    /// An encounter began against the named enemy
    CombatStarted { enemy: String },
    /// The combat coin settled
    CoinFlipped { result: CoinFace, correct: bool },
    /// Damage was applied; `to_player` tells which side took it
    HitLanded { amount: i32, to_player: bool },
    /// An encounter finished
    CombatEnded { outcome: CombatOutcome },
    /// The player reached the goal cell
    GoalReached,
    /// The player gained a level
    LeveledUp { level: i32 },
    /// The player's character evolved
    Evolved { name: String },
    /// Free-form log line
    Message { text: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_manhattan_distance() {
        let pos1 = Position::new(0, 0);
        let pos2 = Position::new(3, 4);
        assert_eq!(pos1.manhattan_distance(pos2), 7);
        assert_eq!(pos2.manhattan_distance(pos1), 7);
    }

    #[test]
    fn test_position_arithmetic() {
        let pos1 = Position::new(5, 10);
        let pos2 = Position::new(3, 2);
        assert_eq!(pos1 + pos2, Position::new(8, 12));
        assert_eq!(pos1 - pos2, Position::new(2, 8));
    }

    #[test]
    fn test_priority_neighbors_order() {
        let pos = Position::new(5, 5);
        let neighbors = pos.priority_neighbors();
        assert_eq!(neighbors[0], Position::new(6, 5)); // Right
        assert_eq!(neighbors[1], Position::new(5, 6)); // Down
        assert_eq!(neighbors[2], Position::new(5, 4)); // Up
        assert_eq!(neighbors[3], Position::new(4, 5)); // Left
    }

    #[test]
    fn test_direction_round_trip() {
        for dir in Direction::priority() {
            assert_eq!(Direction::from_delta(dir.to_delta()), Some(dir));
        }
        assert_eq!(Direction::from_delta(Position::new(1, 1)), None);
        assert_eq!(Direction::from_delta(Position::new(0, 0)), None);
    }

    #[test]
    fn test_priority_order_matches_neighbors() {
        let pos = Position::new(2, 3);
        let dirs = Direction::priority();
        let neighbors = pos.priority_neighbors();
        for (dir, neighbor) in dirs.iter().zip(neighbors.iter()) {
            assert_eq!(pos + dir.to_delta(), *neighbor);
        }
    }
}
