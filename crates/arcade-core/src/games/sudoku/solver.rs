use super::board::{digits, Board, Candidates};
use crate::geometry::GridPos;

/// Backtracking solver that branches on the most constrained empty cell
#[derive(Debug, Clone, Copy, Default)]
pub struct Solver;

impl Solver {
    pub fn new() -> Self {
        Self
    }

    /// First solution found, if any
    pub fn solve(&self, board: &Board) -> Option<Board> {
        let mut working = *board;
        self.solve_recursive(&mut working).then_some(working)
    }

    /// Count solutions, stopping once `limit` is reached
    pub fn count_solutions(&self, board: &Board, limit: usize) -> usize {
        let mut working = *board;
        let mut count = 0;
        self.count_recursive(&mut working, &mut count, limit);
        count
    }

    pub fn has_unique_solution(&self, board: &Board) -> bool {
        self.count_solutions(board, 2) == 1
    }

    /// Empty cell with the fewest candidates. `Err(())` when some cell has none.
    fn most_constrained(board: &Board) -> Result<Option<(GridPos, Candidates)>, ()> {
        let mut best: Option<(GridPos, Candidates)> = None;
        for pos in board.empty_positions() {
            let mask = board.candidates(pos);
            let n = mask.count_ones();
            if n == 0 {
                return Err(());
            }
            if best.map_or(true, |(_, m)| n < m.count_ones()) {
                best = Some((pos, mask));
                if n == 1 {
                    break;
                }
            }
        }
        Ok(best)
    }

    fn solve_recursive(&self, board: &mut Board) -> bool {
        let Ok(next) = Self::most_constrained(board) else {
            return false;
        };
        let Some((pos, mask)) = next else {
            return true;
        };
        for value in digits(mask) {
            board.set(pos, Some(value));
            if self.solve_recursive(board) {
                return true;
            }
        }
        board.set(pos, None);
        false
    }

    fn count_recursive(&self, board: &mut Board, count: &mut usize, limit: usize) {
        if *count >= limit {
            return;
        }
        let Ok(next) = Self::most_constrained(board) else {
            return;
        };
        let Some((pos, mask)) = next else {
            *count += 1;
            return;
        };
        for value in digits(mask) {
            board.set(pos, Some(value));
            self.count_recursive(board, count, limit);
            if *count >= limit {
                break;
            }
        }
        board.set(pos, None);
    }
}
