//! # Auto-path Walker
//!
//! Consumes a dice roll one cell at a time along the fixed direction
//! priority Right, Down, Up, Left, applying the rock / teleport /
//! monster rules and halting early on monster proximity or the goal.
//!
//! The walker is tick-driven: the session feeds it elapsed time and it
//! performs at most one step per expiry of its step delay, so the
//! presentation layer sees the token advance cell by cell.

use crate::{
    config, Board, CellKind, Direction, EnemyVariant, GameEvent, Position, TileEventKind,
};
use std::time::Duration;

/// Per-player boolean grid marking traversed cells.
///
/// The set persists across dice rolls: refusing to re-enter old
/// footprints is what pushes the token forward along winding corridors
/// instead of letting it oscillate. It clears only when a fresh roll
/// finds every direction blocked (the stuck-recovery case) and on new
/// game.
#[derive(Debug, Clone)]
pub struct VisitedSet {
    width: i32,
    height: i32,
    cells: Vec<bool>,
}

impl VisitedSet {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            cells: vec![false; (width * height) as usize],
        }
    }

    pub fn reset(&mut self) {
        self.cells.fill(false);
    }

    pub fn mark(&mut self, pos: Position) {
        if let Some(index) = self.index(pos) {
            self.cells[index] = true;
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.index(pos).map(|i| self.cells[i]).unwrap_or(false)
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if pos.x < 0 || pos.x >= self.width || pos.y < 0 || pos.y >= self.height {
            return None;
        }
        Some((pos.y * self.width + pos.x) as usize)
    }
}

/// One qualifying move found by the direction scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlannedMove {
    Walk(Position),
    BreakRock(Position),
    Teleport { gate: Position, exit: Position },
}

/// Why a walk sequence stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkHalt {
    /// A live monster is within reach; combat should begin against the
    /// monster at this position
    Combat(Position, EnemyVariant),
    /// The player is at (or guaranteed to reach) the goal
    GoalReached,
    /// No direction qualified; leftover steps discarded
    DeadEnd,
    /// All steps consumed normally
    Exhausted,
}

/// The auto-path walker driving player movement from dice rolls.
#[derive(Debug)]
pub struct TurnController {
    remaining_steps: i32,
    active: bool,
    just_teleported: bool,
    visited: VisitedSet,
    step_timer: Duration,
    step_delay: Duration,
}

impl TurnController {
    pub fn new(board_width: i32, board_height: i32) -> Self {
        Self {
            remaining_steps: 0,
            active: false,
            just_teleported: false,
            visited: VisitedSet::new(board_width, board_height),
            step_timer: Duration::ZERO,
            step_delay: Duration::from_millis(config::WALKER_STEP_DELAY_MS),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn remaining_steps(&self) -> i32 {
        self.remaining_steps
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    /// Starts a walk sequence from a dice roll. Returns an immediate
    /// halt if a monster is already within reach of the fresh roll.
    ///
    /// The visited footprints persist between rolls; if they would
    /// leave this sequence with no opening at all, they are cleared so
    /// the walker may backtrack out of an exhausted pocket.
    pub fn begin_sequence(
        &mut self,
        steps: i32,
        board: &Board,
        pos: Position,
    ) -> Option<WalkHalt> {
        self.remaining_steps = steps;
        self.active = true;
        self.just_teleported = false;
        self.step_timer = Duration::ZERO;
        self.visited.mark(pos);

        if self.plan_step(board, pos).is_none() {
            self.visited.reset();
            self.visited.mark(pos);
        }

        if let Some(halt) = self.check_halts(board, pos) {
            self.finish_if_terminal(&halt);
            return Some(halt);
        }
        None
    }

    /// Feeds elapsed time to the walker; performs at most one step per
    /// call once the step delay has accumulated.
    pub fn tick(
        &mut self,
        dt: Duration,
        board: &mut Board,
        pos: &mut Position,
        events: &mut Vec<GameEvent>,
    ) -> Option<WalkHalt> {
        if !self.active {
            return None;
        }
        self.step_timer += dt;
        if self.step_timer < self.step_delay {
            return None;
        }
        self.step_timer -= self.step_delay;
        self.step(board, pos, events)
    }

    /// Performs exactly one walk step. Exposed for tests and headless
    /// drivers that do their own pacing.
    pub fn step(
        &mut self,
        board: &mut Board,
        pos: &mut Position,
        events: &mut Vec<GameEvent>,
    ) -> Option<WalkHalt> {
        if !self.active {
            return None;
        }
        if self.remaining_steps <= 0 {
            self.end_sequence();
            return Some(WalkHalt::Exhausted);
        }

        let moved = self.advance_one(board, pos, events);
        if !moved {
            self.end_sequence();
            return Some(WalkHalt::DeadEnd);
        }

        if let Some(halt) = self.check_halts(board, *pos) {
            self.finish_if_terminal(&halt);
            return Some(halt);
        }

        if self.remaining_steps == 0 {
            self.end_sequence();
            return Some(WalkHalt::Exhausted);
        }
        None
    }

    /// Scans the priority directions and picks the first qualifying
    /// move without applying it.
    fn plan_step(&self, board: &Board, pos: Position) -> Option<PlannedMove> {
        for dir in Direction::priority() {
            let target = pos + dir.to_delta();
            let Some(kind) = board.kind_at(target) else {
                continue;
            };
            if kind == CellKind::Wall || self.visited.contains(target) {
                continue;
            }

            match kind {
                CellKind::Rock if !board.rock_at(target).map(|r| r.broken).unwrap_or(false) => {
                    // Entering a rock costs the break plus the move
                    if self.remaining_steps < 2 {
                        continue;
                    }
                    return Some(PlannedMove::BreakRock(target));
                }
                CellKind::TeleportA | CellKind::TeleportB => {
                    if self.just_teleported {
                        continue;
                    }
                    let Some(exit) = board.gate_exit(target) else {
                        continue;
                    };
                    if self.visited.contains(exit) {
                        continue;
                    }
                    return Some(PlannedMove::Teleport { gate: target, exit });
                }
                _ => return Some(PlannedMove::Walk(target)),
            }
        }
        None
    }

    /// Takes the first qualifying step. Returns false on a dead end.
    fn advance_one(
        &mut self,
        board: &mut Board,
        pos: &mut Position,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        match self.plan_step(board, *pos) {
            Some(PlannedMove::BreakRock(target)) => {
                self.remaining_steps -= 2;
                let broke_once = board.strike_rock(target);
                events.push(GameEvent::RockStruck {
                    at: target,
                    broken: broke_once,
                });
                let broken = board.strike_rock(target);
                events.push(GameEvent::RockStruck { at: target, broken });
                events.push(GameEvent::TileEventTriggered {
                    kind: TileEventKind::Rock,
                    at: target,
                });
                *pos = target;
                self.visited.mark(target);
                self.just_teleported = false;
                events.push(GameEvent::StepTaken { to: target });
                true
            }
            Some(PlannedMove::Teleport { gate, exit }) => {
                self.remaining_steps -= 1;
                self.visited.mark(gate);
                self.visited.mark(exit);
                self.just_teleported = true;
                events.push(GameEvent::TileEventTriggered {
                    kind: TileEventKind::Teleport,
                    at: gate,
                });
                events.push(GameEvent::Teleported {
                    from: gate,
                    to: exit,
                });
                *pos = exit;
                true
            }
            Some(PlannedMove::Walk(target)) => {
                self.remaining_steps -= 1;
                *pos = target;
                self.visited.mark(target);
                self.just_teleported = false;
                events.push(GameEvent::StepTaken { to: target });
                true
            }
            None => false,
        }
    }

    /// Monster-proximity and goal checks run after every successful
    /// step (and at sequence start). Monsters take precedence so the
    /// boss guarding the goal is fought before the goal is credited.
    fn check_halts(&self, board: &Board, pos: Position) -> Option<WalkHalt> {
        for site in board.live_monsters() {
            if pos.manhattan_distance(site.position) as i32 <= self.remaining_steps {
                return Some(WalkHalt::Combat(site.position, site.variant));
            }
        }
        if pos == board.goal || (pos.manhattan_distance(board.goal) as i32) < self.remaining_steps
        {
            return Some(WalkHalt::GoalReached);
        }
        None
    }

    /// Ends the sequence for terminal halts; a combat halt keeps the
    /// walker suspended until the resume contract runs.
    fn finish_if_terminal(&mut self, halt: &WalkHalt) {
        match halt {
            WalkHalt::Combat(..) => self.active = false,
            _ => self.end_sequence(),
        }
    }

    fn end_sequence(&mut self) {
        self.active = false;
        self.remaining_steps = 0;
    }

    /// Post-combat resume after a victory: the defeated monster is
    /// removed, the player snaps onto its cell, and exactly one bonus
    /// forward step is attempted. Leftover dice steps stay discarded.
    pub fn resume_after_victory(
        &mut self,
        board: &mut Board,
        pos: &mut Position,
        monster_pos: Position,
        events: &mut Vec<GameEvent>,
    ) {
        board.defeat_monster(monster_pos);
        *pos = monster_pos;
        self.visited.mark(monster_pos);
        events.push(GameEvent::StepTaken { to: monster_pos });

        for dir in Direction::priority() {
            let target = *pos + dir.to_delta();
            if self.visited.contains(target) || !board.is_walkable(target) {
                continue;
            }
            // The bonus step has no dice budget behind it, so gates and
            // unbroken rocks are skipped along with occupied cells
            match board.kind_at(target) {
                Some(CellKind::Empty) | Some(CellKind::Goal) => {
                    *pos = target;
                    self.visited.mark(target);
                    events.push(GameEvent::StepTaken { to: target });
                    break;
                }
                _ => continue,
            }
        }

        self.end_sequence();
    }

    /// Post-combat resume after a defeat: position unchanged, dice
    /// re-enabled, leftover steps discarded.
    pub fn resume_after_defeat(&mut self) {
        self.end_sequence();
    }
}
