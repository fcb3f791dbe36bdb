//! # Board Generation
//!
//! Maze carving and the serpentine fallback layout.
//!
//! The maze strategy runs a randomized depth-first carve from the start
//! cell, scoring candidate cells by Manhattan distance to the goal and
//! occasionally detouring to the second-best candidate so the corridor
//! does not degenerate into a straight line. A cell may only be carved
//! while it has at most one already-open neighbor, which keeps the
//! corridor one cell wide. Population (monsters, rocks, gates) happens
//! on the finished layout, and connectivity is re-validated afterwards
//! with a direct-path repair as the last resort.

use crate::{
    config, pathfinding, Board, BoardStrategy, CellKind, DiceboundResult, EnemyVariant,
    GameRng, GenerationConfig, Position,
};
use log::{debug, info, warn};

/// Board generator. One instance per strategy; `generate` may be called
/// any number of times with different configs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardGenerator {
    pub strategy: BoardStrategy,
}

impl BoardGenerator {
    /// Creates the default maze-carving generator.
    pub fn new() -> Self {
        Self {
            strategy: BoardStrategy::MazeCarve,
        }
    }

    /// Creates a generator for the deterministic serpentine layout.
    pub fn serpentine() -> Self {
        Self {
            strategy: BoardStrategy::Serpentine,
        }
    }

    /// Generates a board. The returned board always satisfies the
    /// start-to-goal connectivity contract.
    pub fn generate(
        &self,
        config: &GenerationConfig,
        rng: &mut GameRng,
    ) -> DiceboundResult<Board> {
        let mut board = Board::filled(
            config.width,
            config.height,
            CellKind::Wall,
            config.start,
            config.goal,
        );

        match self.strategy {
            BoardStrategy::MazeCarve => {
                self.carve_maze(&mut board, config, rng)?;
                self.carve_branches(&mut board, config, rng);
                self.populate(&mut board, config, rng)?;
            }
            BoardStrategy::Serpentine => {
                self.carve_serpentine(&mut board, config)?;
            }
        }

        // Connectivity is the generator's contract; repair locally
        // rather than surfacing an error
        if !pathfinding::reachable(&board, config.start, config.goal) {
            warn!("generated board lost connectivity, carving direct path");
            carve_manhattan(&mut board, config.start, config.goal);
        }

        board.add_monster(config.goal, EnemyVariant::Boss)?;

        info!(
            "generated {}x{} board ({:?}): {} monsters, {} rocks, {} gates",
            board.width,
            board.height,
            self.strategy,
            board.live_monsters().len(),
            board.rocks().len(),
            board.gates().len() / 2,
        );
        Ok(board)
    }

    /// Randomized depth-first carve from start toward goal.
    fn carve_maze(
        &self,
        board: &mut Board,
        config: &GenerationConfig,
        rng: &mut GameRng,
    ) -> DiceboundResult<()> {
        board.set_kind(config.start, CellKind::Empty)?;

        let mut stack = vec![config.start];
        let mut last_visited = config.start;
        let mut reached = false;

        while let Some(&current) = stack.last() {
            if current == config.goal {
                reached = true;
                break;
            }
            last_visited = current;

            let mut candidates = carvable_neighbors(board, current, config);
            if candidates.is_empty() {
                stack.pop();
                continue;
            }

            // Shuffle first so ties in the stable distance sort stay
            // random, then bias toward the goal with an occasional
            // detour to the runner-up
            rng.shuffle(&mut candidates);
            candidates.sort_by_key(|pos| pos.manhattan_distance(config.goal));
            let pick = if candidates.len() > 1
                && rng.percent_check(config::CARVE_DETOUR_CHANCE)
            {
                candidates[1]
            } else {
                candidates[0]
            };

            board.set_kind(pick, CellKind::Empty)?;
            stack.push(pick);
        }

        if !reached {
            debug!("carve frontier exhausted, forcing connector to goal");
            carve_manhattan(board, last_visited, config.goal);
        }
        Ok(())
    }

    /// Carves short random branches off the open corridor for variety.
    /// Branches only have to stay inside the interior bounds.
    fn carve_branches(&self, board: &mut Board, config: &GenerationConfig, rng: &mut GameRng) {
        for _ in 0..config.branch_count {
            let open = open_cells(board);
            if open.is_empty() {
                break;
            }
            let mut current = open[rng.pick_index(open.len())];
            let dir = crate::Direction::priority()[rng.pick_index(4)];
            let length = rng.roll_range(config::BRANCH_MIN_LEN, config::BRANCH_MAX_LEN);

            for _ in 0..length {
                let next = current + dir.to_delta();
                if !in_interior(next, config) {
                    break;
                }
                board.clear_cell(next);
                current = next;
            }
        }
    }

    /// Deterministic alternating full-row corridors from the start
    /// corner to the goal corner.
    fn carve_serpentine(&self, board: &mut Board, config: &GenerationConfig) -> DiceboundResult<()> {
        let rows: Vec<i32> = (1..config.height - 1).step_by(2).collect();
        for (index, &y) in rows.iter().enumerate() {
            for x in 1..config.width - 1 {
                board.set_kind(Position::new(x, y), CellKind::Empty)?;
            }
            // Connector to the next open row, alternating ends
            if index + 1 < rows.len() {
                let connector_x = if index % 2 == 0 {
                    config.width - 2
                } else {
                    1
                };
                board.set_kind(Position::new(connector_x, y + 1), CellKind::Empty)?;
            }
        }

        // The goal may sit off the serpentine rows; connect it straight
        if let Some(&last_row) = rows.last() {
            carve_manhattan(board, Position::new(config.goal.x, last_row), config.goal);
        }
        carve_manhattan(board, config.start, Position::new(config.start.x, rows[0]));
        Ok(())
    }

    /// Places monsters, rocks and teleport gate pairs on open cells
    /// chosen without replacement. Shortfalls place fewer features and
    /// are not an error.
    fn populate(
        &self,
        board: &mut Board,
        config: &GenerationConfig,
        rng: &mut GameRng,
    ) -> DiceboundResult<()> {
        let mut open: Vec<Position> = open_cells(board)
            .into_iter()
            .filter(|pos| *pos != config.start && *pos != config.goal)
            .collect();
        rng.shuffle(&mut open);
        let mut pool = open.into_iter();

        let species = [EnemyVariant::Cinderling, EnemyVariant::Briarling];
        for index in 0..config.monster_count {
            let Some(pos) = pool.next() else { break };
            board.add_monster(pos, species[index % species.len()])?;
        }

        for _ in 0..config.rock_count {
            let Some(pos) = pool.next() else { break };
            board.add_rock(pos)?;
        }

        for _ in 0..config.gate_pair_count {
            let (Some(a), Some(b)) = (pool.next(), pool.next()) else {
                break;
            };
            board.add_gate_pair(a, b)?;
        }

        Ok(())
    }
}

impl Default for BoardGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Interior cells exclude the outer wall ring.
fn in_interior(pos: Position, config: &GenerationConfig) -> bool {
    pos.x >= 1 && pos.x < config.width - 1 && pos.y >= 1 && pos.y < config.height - 1
}

/// Uncarved interior neighbors that would not open a 2-cell-wide gap:
/// at most one of their own neighbors may already be open.
fn carvable_neighbors(board: &Board, from: Position, config: &GenerationConfig) -> Vec<Position> {
    from.cardinal_neighbors()
        .into_iter()
        .filter(|pos| in_interior(*pos, config))
        .filter(|pos| board.kind_at(*pos) == Some(CellKind::Wall))
        .filter(|pos| open_neighbor_count(board, *pos) <= 1)
        .collect()
}

fn open_neighbor_count(board: &Board, pos: Position) -> usize {
    pos.cardinal_neighbors()
        .into_iter()
        .filter(|next| matches!(board.kind_at(*next), Some(kind) if kind != CellKind::Wall))
        .count()
}

/// Every currently-open (non-wall, non-feature) cell.
fn open_cells(board: &Board) -> Vec<Position> {
    let mut cells = Vec::new();
    for y in 0..board.height {
        for x in 0..board.width {
            let pos = Position::new(x, y);
            if board.kind_at(pos) == Some(CellKind::Empty) {
                cells.push(pos);
            }
        }
    }
    cells
}

/// Force-carves an L-shaped Manhattan connector, clearing walls and
/// rocks in its way.
fn carve_manhattan(board: &mut Board, from: Position, to: Position) {
    let mut current = from;
    board.clear_cell(current);
    while current != to {
        if current.x < to.x {
            current.x += 1;
        } else if current.x > to.x {
            current.x -= 1;
        } else if current.y < to.y {
            current.y += 1;
        } else {
            current.y -= 1;
        }
        board.clear_cell(current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maze_is_connected() {
        let config = GenerationConfig::for_testing(12345);
        let mut rng = GameRng::seeded(config.seed);
        let board = BoardGenerator::new().generate(&config, &mut rng).unwrap();

        assert!(pathfinding::reachable(&board, config.start, config.goal));
    }

    #[test]
    fn test_boss_always_at_goal() {
        let config = GenerationConfig::for_testing(7);
        let mut rng = GameRng::seeded(config.seed);
        let board = BoardGenerator::new().generate(&config, &mut rng).unwrap();

        let boss = board.monster_at(config.goal).expect("boss missing");
        assert_eq!(boss.variant, EnemyVariant::Boss);
        assert_eq!(board.kind_at(config.goal), Some(CellKind::Boss));
    }

    #[test]
    fn test_same_seed_same_board() {
        let config = GenerationConfig::for_testing(555);
        let mut rng_a = GameRng::seeded(config.seed);
        let mut rng_b = GameRng::seeded(config.seed);
        let generator = BoardGenerator::new();

        let a = generator.generate(&config, &mut rng_a).unwrap();
        let b = generator.generate(&config, &mut rng_b).unwrap();

        assert_eq!(a.to_ascii(), b.to_ascii());
        assert_eq!(a.live_monsters(), b.live_monsters());
        assert_eq!(a.gates(), b.gates());
    }

    #[test]
    fn test_serpentine_is_connected_and_unpopulated() {
        let config = GenerationConfig::new(1);
        let mut rng = GameRng::seeded(config.seed);
        let board = BoardGenerator::serpentine()
            .generate(&config, &mut rng)
            .unwrap();

        assert!(pathfinding::reachable(&board, config.start, config.goal));
        // Only the boss marker; no random features
        assert_eq!(board.live_monsters().len(), 1);
        assert!(board.rocks().is_empty());
        assert!(board.gates().is_empty());
    }

    #[test]
    fn test_population_shortfall_is_tolerated() {
        // A tiny board cannot host the full feature request
        let config = GenerationConfig {
            width: 6,
            height: 6,
            goal: Position::new(4, 4),
            monster_count: 50,
            rock_count: 50,
            gate_pair_count: 10,
            ..GenerationConfig::for_testing(3)
        };
        let mut rng = GameRng::seeded(config.seed);
        let board = BoardGenerator::new().generate(&config, &mut rng).unwrap();

        // Placed fewer features than requested, and still connected
        assert!(board.live_monsters().len() < 51);
        assert!(pathfinding::reachable(&board, config.start, config.goal));
    }

    #[test]
    fn test_no_two_wide_corridors_before_population() {
        // The carve rule allows a cell only when at most one neighbor
        // is already open, so no 2x2 block can be fully open right
        // after carving. Branches and repair may relax this, so the
        // property is checked on a carve-only run.
        let config = GenerationConfig {
            branch_count: 0,
            monster_count: 0,
            rock_count: 0,
            gate_pair_count: 0,
            ..GenerationConfig::for_testing(42)
        };
        let mut rng = GameRng::seeded(config.seed);
        let board = BoardGenerator::new().generate(&config, &mut rng).unwrap();

        let mut open_blocks = 0;
        for y in 0..board.height - 1 {
            for x in 0..board.width - 1 {
                let block = [
                    Position::new(x, y),
                    Position::new(x + 1, y),
                    Position::new(x, y + 1),
                    Position::new(x + 1, y + 1),
                ];
                if block
                    .iter()
                    .all(|pos| board.kind_at(*pos) != Some(CellKind::Wall))
                {
                    open_blocks += 1;
                }
            }
        }
        // The forced goal connector may fold back on the carved path,
        // so allow a small number of blocks rather than none
        assert!(open_blocks <= 4, "too many open 2x2 blocks: {}", open_blocks);
    }
}
