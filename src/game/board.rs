//! # Board Module
//!
//! The playing board: a rectangular grid of typed cells plus the mutable
//! per-cell state layered on top of it (rock break progress, teleport
//! gate pairing, live monsters).
//!
//! The grid records what a cell *is*; the side lists record what has
//! *happened* to it. A monster cell stays `Monster` in the grid while
//! the monster list is the authoritative liveness signal, and a rock
//! flips to `Empty` in the grid once its break counter reaches the
//! threshold.

use crate::{config, DiceboundError, DiceboundResult, EnemyVariant, Position};
use serde::{Deserialize, Serialize};

/// What occupies a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    /// Walkable open path
    Empty,
    /// Impassable wall
    Wall,
    /// Breakable obstacle (two strikes: break + step in)
    Rock,
    /// Teleport gate, first of a pair
    TeleportA,
    /// Teleport gate, second of a pair
    TeleportB,
    /// A live monster encounter
    Monster,
    /// The boss encounter guarding the goal
    Boss,
    /// The goal cell
    Goal,
}

impl CellKind {
    /// Whether an actor may occupy this cell. Walls and (unbroken)
    /// rocks are the only non-walkable kinds; rock walkability is
    /// resolved by [`Board::is_walkable`], which consults break state.
    pub fn is_walkable(self) -> bool {
        !matches!(self, CellKind::Wall | CellKind::Rock)
    }

    /// Whether this kind is a teleport gate.
    pub fn is_gate(self) -> bool {
        matches!(self, CellKind::TeleportA | CellKind::TeleportB)
    }

    /// Single-character form used by the ASCII dump.
    pub fn to_char(self) -> char {
        match self {
            CellKind::Empty => '.',
            CellKind::Wall => '#',
            CellKind::Rock => 'o',
            CellKind::TeleportA => 'A',
            CellKind::TeleportB => 'B',
            CellKind::Monster => 'm',
            CellKind::Boss => 'X',
            CellKind::Goal => 'G',
        }
    }

    /// Parses the ASCII-dump alphabet.
    pub fn from_char(c: char) -> Option<CellKind> {
        match c {
            '.' => Some(CellKind::Empty),
            '#' => Some(CellKind::Wall),
            'o' => Some(CellKind::Rock),
            'A' => Some(CellKind::TeleportA),
            'B' => Some(CellKind::TeleportB),
            'm' => Some(CellKind::Monster),
            'X' => Some(CellKind::Boss),
            'G' => Some(CellKind::Goal),
            _ => None,
        }
    }
}

/// Mutable break state of one rock cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RockState {
    pub position: Position,
    /// 0 = intact, 1 = cracking, 2 = broken
    pub break_progress: u8,
    pub broken: bool,
}

impl RockState {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            break_progress: 0,
            broken: false,
        }
    }
}

/// One teleport gate; `target` is the paired gate's coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeleportGate {
    pub position: Position,
    pub target: Position,
}

/// A live monster on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterSite {
    pub position: Position,
    pub variant: EnemyVariant,
}

/// The playing board.
///
/// Owns the cell grid and the mutable per-cell state. Created by the
/// generator once per game, mutated by rock breaking and monster
/// defeat, and replaced wholesale on new-game or load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub width: i32,
    pub height: i32,
    pub start: Position,
    pub goal: Position,
    cells: Vec<Vec<CellKind>>,
    rocks: Vec<RockState>,
    gates: Vec<TeleportGate>,
    monsters: Vec<MonsterSite>,
}

impl Board {
    /// Creates a board filled with the given cell kind.
    pub fn filled(width: i32, height: i32, fill: CellKind, start: Position, goal: Position) -> Self {
        Self {
            width,
            height,
            start,
            goal,
            cells: vec![vec![fill; width as usize]; height as usize],
            rocks: Vec::new(),
            gates: Vec::new(),
            monsters: Vec::new(),
        }
    }

    /// Checks whether a coordinate is on the board.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Cell kind at a coordinate, or None out of bounds.
    pub fn kind_at(&self, pos: Position) -> Option<CellKind> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(self.cells[pos.y as usize][pos.x as usize])
    }

    /// Sets the cell kind at a coordinate.
    ///
    /// Out-of-bounds writes are a caller error, never silent.
    pub fn set_kind(&mut self, pos: Position, kind: CellKind) -> DiceboundResult<()> {
        if !self.in_bounds(pos) {
            return Err(DiceboundError::InvalidState(format!(
                "cell write out of bounds at ({}, {})",
                pos.x, pos.y
            )));
        }
        self.cells[pos.y as usize][pos.x as usize] = kind;
        Ok(())
    }

    /// Whether an actor may occupy the cell: walls and unbroken rocks
    /// block, everything else (including monsters and the goal) is open.
    pub fn is_walkable(&self, pos: Position) -> bool {
        match self.kind_at(pos) {
            None | Some(CellKind::Wall) => false,
            Some(CellKind::Rock) => self
                .rock_at(pos)
                .map(|rock| rock.broken)
                .unwrap_or(false),
            Some(_) => true,
        }
    }

    /// Registers a rock obstacle at `pos` (also stamps the grid).
    pub fn add_rock(&mut self, pos: Position) -> DiceboundResult<()> {
        self.set_kind(pos, CellKind::Rock)?;
        self.rocks.push(RockState::new(pos));
        Ok(())
    }

    /// Rock state at a coordinate, if any.
    pub fn rock_at(&self, pos: Position) -> Option<&RockState> {
        self.rocks.iter().find(|rock| rock.position == pos)
    }

    /// Strikes the rock at `pos` once. Progress advances by one per
    /// strike; at [`config::ROCK_BREAK_STRIKES`] the cell flips to
    /// `Empty` exactly once. Striking a broken rock is a no-op.
    ///
    /// Returns true if the rock is broken after this strike.
    pub fn strike_rock(&mut self, pos: Position) -> bool {
        let Some(rock) = self.rocks.iter_mut().find(|rock| rock.position == pos) else {
            return false;
        };
        if rock.broken {
            return true;
        }
        rock.break_progress += 1;
        if rock.break_progress >= config::ROCK_BREAK_STRIKES {
            rock.broken = true;
            self.cells[pos.y as usize][pos.x as usize] = CellKind::Empty;
        }
        rock.broken
    }

    /// Registers a mutually-referencing teleport gate pair.
    pub fn add_gate_pair(&mut self, a: Position, b: Position) -> DiceboundResult<()> {
        self.set_kind(a, CellKind::TeleportA)?;
        self.set_kind(b, CellKind::TeleportB)?;
        self.gates.push(TeleportGate {
            position: a,
            target: b,
        });
        self.gates.push(TeleportGate {
            position: b,
            target: a,
        });
        Ok(())
    }

    /// Where the gate at `pos` leads: the paired gate's coordinate.
    pub fn gate_exit(&self, pos: Position) -> Option<Position> {
        self.gates
            .iter()
            .find(|gate| gate.position == pos)
            .map(|gate| gate.target)
    }

    /// Registers a monster at `pos` (also stamps the grid).
    pub fn add_monster(&mut self, pos: Position, variant: EnemyVariant) -> DiceboundResult<()> {
        let kind = if variant == EnemyVariant::Boss {
            CellKind::Boss
        } else {
            CellKind::Monster
        };
        self.set_kind(pos, kind)?;
        self.monsters.push(MonsterSite {
            position: pos,
            variant,
        });
        Ok(())
    }

    /// The live monsters. Removal from this list is the authoritative
    /// "defeated" signal.
    pub fn live_monsters(&self) -> &[MonsterSite] {
        &self.monsters
    }

    /// Monster at a coordinate, if one is still alive there.
    pub fn monster_at(&self, pos: Position) -> Option<&MonsterSite> {
        self.monsters.iter().find(|site| site.position == pos)
    }

    /// Removes a defeated monster and clears its cell to `Empty`.
    ///
    /// Unknown coordinates are a no-op (the monster may have been
    /// removed already).
    pub fn defeat_monster(&mut self, pos: Position) {
        let before = self.monsters.len();
        self.monsters.retain(|site| site.position != pos);
        if self.monsters.len() != before {
            self.cells[pos.y as usize][pos.x as usize] = CellKind::Empty;
        }
    }

    /// Forces a cell open for connectivity repair: walls flip to
    /// `Empty` and rocks are dropped from the rock list. Cells that are
    /// already traversable are left alone.
    pub fn clear_cell(&mut self, pos: Position) {
        match self.kind_at(pos) {
            Some(CellKind::Wall) => {
                self.cells[pos.y as usize][pos.x as usize] = CellKind::Empty;
            }
            Some(CellKind::Rock) => {
                self.rocks.retain(|rock| rock.position != pos);
                self.cells[pos.y as usize][pos.x as usize] = CellKind::Empty;
            }
            _ => {}
        }
    }

    /// All rock states (for save snapshots).
    pub fn rocks(&self) -> &[RockState] {
        &self.rocks
    }

    /// All teleport gates (for save snapshots).
    pub fn gates(&self) -> &[TeleportGate] {
        &self.gates
    }

    /// Renders the grid as one line of characters per row.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width as usize + 1) * self.height as usize);
        for row in &self.cells {
            for kind in row {
                out.push(kind.to_char());
            }
            out.push('\n');
        }
        out
    }

    /// Builds a board from an ASCII dump.
    ///
    /// Gates are paired in reading order (first `A` with first `B`, and
    /// so on); monsters are registered as regular enemies and the boss
    /// cell as the boss. Intended for tests and fixture layouts.
    pub fn from_ascii(text: &str, start: Position, goal: Position) -> DiceboundResult<Board> {
        let rows: Vec<&str> = text.lines().filter(|line| !line.is_empty()).collect();
        if rows.is_empty() {
            return Err(DiceboundError::InvalidState("empty board text".to_string()));
        }
        let height = rows.len() as i32;
        let width = rows[0].chars().count() as i32;

        let mut board = Board::filled(width, height, CellKind::Empty, start, goal);
        let mut a_gates = Vec::new();
        let mut b_gates = Vec::new();

        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() as i32 != width {
                return Err(DiceboundError::InvalidState(format!(
                    "ragged board text at row {}",
                    y
                )));
            }
            for (x, c) in row.chars().enumerate() {
                let pos = Position::new(x as i32, y as i32);
                let kind = CellKind::from_char(c).ok_or_else(|| {
                    DiceboundError::InvalidState(format!("unknown board char '{}'", c))
                })?;
                match kind {
                    CellKind::Rock => board.add_rock(pos)?,
                    CellKind::Monster => board.add_monster(pos, EnemyVariant::Regular)?,
                    CellKind::Boss => board.add_monster(pos, EnemyVariant::Boss)?,
                    CellKind::TeleportA => {
                        a_gates.push(pos);
                        board.set_kind(pos, CellKind::TeleportA)?;
                    }
                    CellKind::TeleportB => {
                        b_gates.push(pos);
                        board.set_kind(pos, CellKind::TeleportB)?;
                    }
                    other => board.set_kind(pos, other)?,
                }
            }
        }

        for (a, b) in a_gates.iter().zip(b_gates.iter()) {
            board.gates.push(TeleportGate {
                position: *a,
                target: *b,
            });
            board.gates.push(TeleportGate {
                position: *b,
                target: *a,
            });
        }

        Ok(board)
    }
}
