use super::board::{Board, BOX, SIZE};
use super::solver::Solver;
use super::Difficulty;
use crate::geometry::GridPos;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

/// A generated puzzle and the grid it was carved from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    pub givens: Board,
    pub solution: Board,
}

/// Sudoku puzzle generator
pub struct Generator<'a> {
    rng: &'a mut StdRng,
    solver: Solver,
}

impl<'a> Generator<'a> {
    pub fn new(rng: &'a mut StdRng) -> Self {
        Self {
            rng,
            solver: Solver::new(),
        }
    }

    pub fn generate(&mut self, difficulty: Difficulty) -> Puzzle {
        let solution = self.generate_filled_grid();
        let mut givens = solution;
        let removed = self.remove_cells(&mut givens, difficulty.cells_to_remove());
        debug!(%difficulty, removed, "sudoku generated");
        Puzzle { givens, solution }
    }

    /// A completely filled valid grid
    fn generate_filled_grid(&mut self) -> Board {
        loop {
            let mut board = Board::empty();
            // The diagonal boxes don't constrain each other
            for start in (0..SIZE).step_by(BOX) {
                self.fill_box(&mut board, start, start);
            }
            if self.fill_remaining(&mut board) {
                return board;
            }
            debug!("sudoku fill failed, retrying");
        }
    }

    fn fill_box(&mut self, board: &mut Board, start_row: usize, start_col: usize) {
        let mut values: Vec<u8> = (1..=9).collect();
        values.shuffle(self.rng);
        let cells = (start_row..start_row + BOX)
            .flat_map(|row| (start_col..start_col + BOX).map(move |col| GridPos::new(row, col)));
        for (pos, value) in cells.zip(values) {
            board.set(pos, Some(value));
        }
    }

    /// Row-major backtracking with shuffled digits
    fn fill_remaining(&mut self, board: &mut Board) -> bool {
        let Some(pos) = board.empty_positions().next() else {
            return true;
        };
        let mut values: Vec<u8> = (1..=9).collect();
        values.shuffle(self.rng);
        for value in values {
            if board.allows(pos, value) {
                board.set(pos, Some(value));
                if self.fill_remaining(board) {
                    return true;
                }
            }
        }
        board.set(pos, None);
        false
    }

    /// Empty up to `target` cells in random order, keeping only removals
    /// that leave exactly one solution. Returns how many were removed.
    fn remove_cells(&mut self, board: &mut Board, target: usize) -> usize {
        let mut positions: Vec<GridPos> = Board::positions().collect();
        positions.shuffle(self.rng);

        let mut removed = 0;
        for pos in positions {
            if removed >= target {
                break;
            }
            let Some(value) = board.get(pos) else {
                continue;
            };
            board.set(pos, None);
            if self.solver.has_unique_solution(board) {
                removed += 1;
            } else {
                board.set(pos, Some(value));
            }
        }
        removed
    }
}
