//! # Pathfinding Module
//!
//! Breadth-first reachability and route queries over a board. The
//! generator uses reachability to validate its connectivity contract;
//! route reconstruction is exposed for callers that want one.

use crate::{Board, Position};
use pathfinding::prelude::bfs;

/// Walkable cardinal neighbors of `pos`.
fn successors(board: &Board, pos: Position) -> Vec<Position> {
    pos.cardinal_neighbors()
        .into_iter()
        .filter(|next| board.is_walkable(*next))
        .collect()
}

/// Shortest path (by cell count) from `from` to `to`, both inclusive,
/// over 4-directional walkable moves. None if unreachable.
pub fn shortest_path(board: &Board, from: Position, to: Position) -> Option<Vec<Position>> {
    if !board.in_bounds(from) || !board.in_bounds(to) {
        return None;
    }
    bfs(&from, |pos| successors(board, *pos), |pos| *pos == to)
}

/// Whether `to` can be reached from `from` over walkable cells.
pub fn reachable(board: &Board, from: Position, to: Position) -> bool {
    shortest_path(board, from, to).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CellKind;

    #[test]
    fn test_reachable_straight_corridor() {
        let text = "\
#####
#...#
#####
";
        let board =
            Board::from_ascii(text, Position::new(1, 1), Position::new(3, 1)).unwrap();
        assert!(reachable(&board, Position::new(1, 1), Position::new(3, 1)));

        let path = shortest_path(&board, Position::new(1, 1), Position::new(3, 1)).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], Position::new(1, 1));
        assert_eq!(path[2], Position::new(3, 1));
    }

    #[test]
    fn test_wall_blocks() {
        let text = "\
#####
#.#.#
#####
";
        let board =
            Board::from_ascii(text, Position::new(1, 1), Position::new(3, 1)).unwrap();
        assert!(!reachable(&board, Position::new(1, 1), Position::new(3, 1)));
    }

    #[test]
    fn test_unbroken_rock_blocks_until_broken() {
        let text = "\
#####
#.o.#
#####
";
        let mut board =
            Board::from_ascii(text, Position::new(1, 1), Position::new(3, 1)).unwrap();
        assert!(!reachable(&board, Position::new(1, 1), Position::new(3, 1)));

        board.strike_rock(Position::new(2, 1));
        board.strike_rock(Position::new(2, 1));
        assert!(reachable(&board, Position::new(1, 1), Position::new(3, 1)));
    }

    #[test]
    fn test_monster_cells_are_traversable() {
        let text = "\
#####
#.m.#
#####
";
        let board =
            Board::from_ascii(text, Position::new(1, 1), Position::new(3, 1)).unwrap();
        assert!(reachable(&board, Position::new(1, 1), Position::new(3, 1)));
    }

    #[test]
    fn test_out_of_bounds_endpoints() {
        let board = Board::filled(
            3,
            3,
            CellKind::Empty,
            Position::new(0, 0),
            Position::new(2, 2),
        );
        assert!(!reachable(&board, Position::new(-1, 0), Position::new(2, 2)));
        assert!(!reachable(&board, Position::new(0, 0), Position::new(5, 5)));
    }
}
