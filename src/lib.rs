//! # Dicebound
//!
//! A dice-driven board game core: a player token advances along a
//! procedurally generated tile board by dice rolls, triggers tile events
//! (monsters, rocks, teleport gates, the goal), and resolves encounters
//! through a coin-flip-gated skill combat mini-game.
//!
//! ## Architecture Overview
//!
//! The crate is organized around a few key subsystems:
//!
//! - **Board & Generation**: procedural maze boards with a guaranteed
//!   start-to-goal connection, plus a deterministic serpentine fallback
//! - **Auto-path Walker**: consumes a dice roll one cell at a time along
//!   a fixed direction priority, applying rock/teleport/monster rules
//! - **Combat Engine**: a phase state machine gating skill use behind
//!   coin-flip guesses, with status effects and variant-specific enemy AI
//! - **Progression**: levels, evolution, and upgrade points earned from
//!   combat victories
//! - **Session**: the single-threaded coordinator tying the above
//!   together and exposing the query/input/event boundary used by a
//!   presentation layer
//!
//! Rendering, audio, asset loading and window/event polling are external
//! collaborators; the core only emits semantic events for them.

pub mod game;
pub mod generation;

pub use game::*;
pub use generation::*;

/// Core error type for the Dicebound game engine.
#[derive(thiserror::Error, Debug)]
pub enum DiceboundError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Action cannot be performed
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the Dicebound codebase.
pub type DiceboundResult<T> = Result<T, DiceboundError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Default board width in cells
    pub const BOARD_WIDTH: i32 = 30;

    /// Default board height in cells
    pub const BOARD_HEIGHT: i32 = 30;

    /// Default start cell x
    pub const START_X: i32 = 1;
    /// Default start cell y
    pub const START_Y: i32 = 1;

    /// Default goal cell x
    pub const GOAL_X: i32 = 28;
    /// Default goal cell y
    pub const GOAL_Y: i32 = 28;

    /// Strikes needed to break a rock (break + step in)
    pub const ROCK_BREAK_STRIKES: u8 = 2;

    /// Monsters placed by the maze generator
    pub const MONSTER_COUNT: usize = 8;
    /// Rocks placed by the maze generator
    pub const ROCK_COUNT: usize = 6;
    /// Teleport gate pairs placed by the maze generator
    pub const GATE_PAIR_COUNT: usize = 2;

    /// Side branches carved off the main corridor
    pub const BRANCH_COUNT: usize = 18;
    /// Shortest side branch
    pub const BRANCH_MIN_LEN: i32 = 2;
    /// Longest side branch
    pub const BRANCH_MAX_LEN: i32 = 6;
    /// Chance (percent) to carve toward the second-best candidate
    pub const CARVE_DETOUR_CHANCE: f32 = 35.0;

    /// Base player HP
    pub const BASE_PLAYER_HP: i32 = 100;
    /// Base player MP
    pub const BASE_PLAYER_MP: i32 = 50;
    /// Base player attack
    pub const BASE_PLAYER_ATK: i32 = 20;
    /// Base player defense
    pub const BASE_PLAYER_DEF: i32 = 10;
    /// Base player critical chance
    pub const BASE_PLAYER_CRIT: f32 = 0.1;
    /// Base player evade chance
    pub const BASE_PLAYER_EVADE: f32 = 0.05;

    /// Base regular-enemy HP
    pub const BASE_ENEMY_HP: i32 = 70;
    /// Base regular-enemy MP
    pub const BASE_ENEMY_MP: i32 = 30;
    /// Base regular-enemy attack
    pub const BASE_ENEMY_ATK: i32 = 15;
    /// Base regular-enemy defense
    pub const BASE_ENEMY_DEF: i32 = 8;

    /// Base boss HP
    pub const BASE_BOSS_HP: i32 = 180;
    /// Base boss MP
    pub const BASE_BOSS_MP: i32 = 60;
    /// Base boss attack
    pub const BASE_BOSS_ATK: i32 = 25;
    /// Base boss defense
    pub const BASE_BOSS_DEF: i32 = 12;
    /// Boss passive: incoming damage is multiplied by this factor
    pub const BOSS_DAMAGE_REDUCTION: f32 = 0.9;

    /// Super-effective type multiplier
    pub const TYPE_SUPER_EFFECTIVE: f32 = 1.5;
    /// Not-very-effective type multiplier
    pub const TYPE_NOT_VERY_EFFECTIVE: f32 = 0.5;
    /// Neutral type multiplier
    pub const TYPE_NORMAL_EFFECTIVE: f32 = 1.0;

    /// Species-variant chance (percent) to prefer a special skill
    pub const SPECIES_SKILL_CHANCE: f32 = 70.0;
    /// Flat dodge chance (percent) on a failed defense coin
    pub const FAILED_DEFENSE_DODGE_CHANCE: f32 = 30.0;
    /// Target-HP fraction below which the boss turns aggressive
    pub const BOSS_AGGRESSION_THRESHOLD: f32 = 0.4;
    /// Chance (percent) for Nova Strike to stun
    pub const NOVA_STRIKE_STUN_CHANCE: f32 = 25.0;
    /// Fraction of Crash Dive damage taken as recoil
    pub const CRASH_DIVE_RECOIL: f32 = 0.25;
    /// Flat attack bonus granted by Charge Up
    pub const CHARGE_UP_ATK_BONUS: i32 = 8;

    /// Level at/above which evolution is allowed
    pub const EVOLUTION_LEVEL: i32 = 5;
    /// Experience granted per combat victory
    pub const EXP_PER_VICTORY: i32 = 50;
    /// Victories per upgrade-point grant
    pub const VICTORIES_FOR_UPGRADE: i32 = 2;
    /// Upgrade points granted per grant
    pub const UPGRADE_POINTS_PER_GRANT: i32 = 2;
    /// HP gained per upgrade point spent on health
    pub const HP_PER_UPGRADE_POINT: i32 = 5;

    /// Attack gained per level
    pub const ATK_PER_LEVEL: i32 = 2;
    /// Defense gained per level
    pub const DEF_PER_LEVEL: i32 = 1;
    /// HP gained per level
    pub const HP_PER_LEVEL: i32 = 5;
    /// MP gained per level
    pub const MP_PER_LEVEL: i32 = 2;

    /// Walker cadence: one auto-path step per this many milliseconds
    pub const WALKER_STEP_DELAY_MS: u64 = 200;

    /// "Are you ready!?" banner duration in milliseconds
    pub const READY_BANNER_MS: u64 = 3000;
    /// Coin flip animation duration in milliseconds
    pub const COIN_FLIP_MS: u64 = 3000;
    /// Victory/defeat display duration in milliseconds
    pub const RESULT_DISPLAY_MS: u64 = 1500;

    /// Combat log ring capacity
    pub const COMBAT_LOG_CAPACITY: usize = 5;
}
