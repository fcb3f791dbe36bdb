//! # Generation Module
//!
//! Procedural board generation. The maze-carve strategy produces the
//! playing boards used by a normal game; the serpentine strategy is a
//! deterministic guaranteed-solvable layout for callers that want one.
//!
//! Whatever the strategy, the generator's core contract is that the
//! start and goal cells are connected by traversable cells when it
//! returns.

pub mod maze;

pub use maze::*;

use crate::{config, Position};
use serde::{Deserialize, Serialize};

/// Which layout algorithm to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardStrategy {
    /// Randomized goal-biased maze carving with backtracking
    MazeCarve,
    /// Deterministic alternating full-row corridors
    Serpentine,
}

/// Configuration for board generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u32,
    /// Board width in cells
    pub width: i32,
    /// Board height in cells
    pub height: i32,
    /// Player start cell
    pub start: Position,
    /// Goal cell; the boss marker always lands here
    pub goal: Position,
    /// Monster markers to place (maze strategy)
    pub monster_count: usize,
    /// Rock obstacles to place (maze strategy)
    pub rock_count: usize,
    /// Teleport gate pairs to place (maze strategy)
    pub gate_pair_count: usize,
    /// Side branches carved off the main corridor
    pub branch_count: usize,
}

impl GenerationConfig {
    /// Creates the default full-size configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use dicebound::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(42);
    /// assert_eq!(config.width, 30);
    /// assert_eq!(config.seed, 42);
    /// ```
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            width: config::BOARD_WIDTH,
            height: config::BOARD_HEIGHT,
            start: Position::new(config::START_X, config::START_Y),
            goal: Position::new(config::GOAL_X, config::GOAL_Y),
            monster_count: config::MONSTER_COUNT,
            rock_count: config::ROCK_COUNT,
            gate_pair_count: config::GATE_PAIR_COUNT,
            branch_count: config::BRANCH_COUNT,
        }
    }

    /// Creates a configuration for testing with a smaller, simpler
    /// board.
    pub fn for_testing(seed: u32) -> Self {
        Self {
            seed,
            width: 12,
            height: 12,
            start: Position::new(1, 1),
            goal: Position::new(10, 10),
            monster_count: 3,
            rock_count: 2,
            gate_pair_count: 1,
            branch_count: 6,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}
