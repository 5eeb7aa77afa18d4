//! Classic 9x9 Sudoku with generated puzzles.

mod board;
mod generator;
mod solver;

pub use board::{digits, Board, BOX, SIZE};
pub use generator::{Generator, Puzzle};
pub use solver::Solver;

use super::make_rng;
use crate::error::{Error, Result};
use crate::game::{Playable, Status};
use crate::geometry::GridPos;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// How many of the 81 cells the generator tries to empty
    pub fn cells_to_remove(self) -> usize {
        match self {
            Difficulty::Easy => 40,
            Difficulty::Medium => 50,
            Difficulty::Hard => 60,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownDifficulty(s.to_string()))
    }
}

/// Result of checking the board against the solution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    Solved,
    /// Filled cells that disagree with the solution
    Errors(Vec<GridPos>),
    /// No wrong entries yet but empty cells remain
    Incomplete,
}

pub struct Sudoku {
    difficulty: Difficulty,
    givens: Board,
    solution: Board,
    current: Board,
    elapsed: Duration,
    status: Status,
}

impl Sudoku {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::build(difficulty, None)
    }

    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        Self::build(difficulty, Some(seed))
    }

    fn build(difficulty: Difficulty, seed: Option<u64>) -> Self {
        let mut rng = make_rng(seed);
        let puzzle = Generator::new(&mut rng).generate(difficulty);
        Self::from_puzzle(difficulty, puzzle)
    }

    pub fn from_puzzle(difficulty: Difficulty, puzzle: Puzzle) -> Self {
        info!(%difficulty, givens = puzzle.givens.filled_count(), "sudoku started");
        Self {
            difficulty,
            givens: puzzle.givens,
            solution: puzzle.solution,
            current: puzzle.givens,
            elapsed: Duration::ZERO,
            status: Status::Playing,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn board(&self) -> &Board {
        &self.current
    }

    pub fn value(&self, pos: GridPos) -> Option<u8> {
        self.current.get(pos)
    }

    pub fn is_given(&self, pos: GridPos) -> bool {
        self.givens.get(pos).is_some()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Enter a digit in a non-given cell
    pub fn set(&mut self, pos: GridPos, value: u8) -> bool {
        if self.status.is_over()
            || !Board::contains(pos)
            || self.is_given(pos)
            || !(1..=9).contains(&value)
        {
            return false;
        }
        self.current.set(pos, Some(value));
        if self.current == self.solution {
            self.win();
        }
        true
    }

    pub fn clear(&mut self, pos: GridPos) -> bool {
        if self.status.is_over() || self.is_given(pos) || self.value(pos).is_none() {
            return false;
        }
        self.current.set(pos, None);
        true
    }

    pub fn check(&mut self) -> Check {
        let errors: Vec<GridPos> = Board::positions()
            .filter(|&pos| match self.current.get(pos) {
                Some(v) => self.solution.get(pos) != Some(v),
                None => false,
            })
            .collect();
        if !errors.is_empty() {
            return Check::Errors(errors);
        }
        if !self.current.is_complete() {
            return Check::Incomplete;
        }
        self.win();
        Check::Solved
    }

    /// Back to the givens; the clock keeps running
    pub fn reset(&mut self) {
        if !self.status.is_over() {
            self.current = self.givens;
        }
    }

    fn win(&mut self) {
        if !self.status.is_over() {
            info!(secs = self.elapsed.as_secs(), difficulty = %self.difficulty, "sudoku solved");
            self.status = Status::Won;
        }
    }

    /// Value repeated elsewhere in the row, column or box
    pub fn has_conflict(&self, pos: GridPos) -> bool {
        match self.current.get(pos) {
            Some(v) => Board::peers(pos).any(|p| self.current.get(p) == Some(v)),
            None => false,
        }
    }

    /// Digits already placed nine times
    pub fn completed_digits(&self) -> [bool; 9] {
        let mut counts = [0u8; 9];
        for v in Board::positions().filter_map(|pos| self.current.get(pos)) {
            counts[usize::from(v - 1)] += 1;
        }
        std::array::from_fn(|i| counts[i] >= 9)
    }

    /// Cells to highlight around a selection: same row, column or box
    pub fn is_related(a: GridPos, b: GridPos) -> bool {
        a.row == b.row || a.col == b.col || (a.row / BOX == b.row / BOX && a.col / BOX == b.col / BOX)
    }
}

impl Playable for Sudoku {
    fn advance(&mut self, dt: Duration) {
        if !self.status.is_over() {
            self.elapsed += dt;
        }
    }

    fn status(&self) -> Status {
        self.status
    }

    fn score(&self) -> u64 {
        self.elapsed.as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUZZLE: &str = "53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79";
    const SOLUTION: &str = "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

    fn classic() -> Sudoku {
        let puzzle = Puzzle {
            givens: Board::parse(PUZZLE).unwrap(),
            solution: Board::parse(SOLUTION).unwrap(),
        };
        Sudoku::from_puzzle(Difficulty::Medium, puzzle)
    }

    fn fill_all(game: &mut Sudoku) {
        let solution = Board::parse(SOLUTION).unwrap();
        for pos in Board::positions() {
            if !game.is_given(pos) {
                game.set(pos, solution.get(pos).unwrap());
            }
        }
    }

    #[test]
    fn test_givens_are_fixed() {
        let mut game = classic();
        let given = GridPos::new(0, 0);
        assert!(!game.set(given, 1));
        assert!(!game.clear(given));
        assert_eq!(game.value(given), Some(5));
    }

    #[test]
    fn test_off_board_positions_are_rejected() {
        let mut game = classic();
        for pos in [GridPos::new(9, 0), GridPos::new(0, 9), GridPos::new(20, 20)] {
            assert!(!game.is_given(pos));
            assert_eq!(game.value(pos), None);
            assert!(!game.set(pos, 4));
            assert!(!game.clear(pos));
        }
        assert_eq!(game.status(), Status::Playing);
    }

    #[test]
    fn test_set_and_clear() {
        let mut game = classic();
        let pos = GridPos::new(0, 2);
        assert!(!game.set(pos, 0));
        assert!(!game.set(pos, 10));
        assert!(game.set(pos, 4));
        assert_eq!(game.value(pos), Some(4));
        assert!(game.clear(pos));
        assert!(!game.clear(pos));
    }

    #[test]
    fn test_check_reports_errors_then_incomplete() {
        let mut game = classic();
        assert_eq!(game.check(), Check::Incomplete);
        game.set(GridPos::new(0, 2), 1);
        assert_eq!(game.check(), Check::Errors(vec![GridPos::new(0, 2)]));
        game.set(GridPos::new(0, 2), 4);
        assert_eq!(game.check(), Check::Incomplete);
        assert_eq!(game.status(), Status::Playing);
    }

    #[test]
    fn test_filling_last_cell_wins() {
        let mut game = classic();
        game.advance(Duration::from_secs(125));
        fill_all(&mut game);
        assert_eq!(game.status(), Status::Won);
        assert_eq!(game.check(), Check::Solved);
        assert_eq!(game.score(), 125);
        assert!(!game.set(GridPos::new(0, 2), 1));
    }

    #[test]
    fn test_reset_restores_givens() {
        let mut game = classic();
        game.set(GridPos::new(0, 2), 4);
        game.set(GridPos::new(8, 8), 1);
        game.reset();
        assert_eq!(*game.board(), Board::parse(PUZZLE).unwrap());
    }

    #[test]
    fn test_conflicts_and_completed_digits() {
        let mut game = classic();
        let pos = GridPos::new(0, 2);
        game.set(pos, 5);
        assert!(game.has_conflict(pos));
        assert!(game.has_conflict(GridPos::new(0, 0)));
        game.set(pos, 4);
        assert!(!game.has_conflict(pos));
        assert!(!game.completed_digits().iter().any(|&d| d));
        fill_all(&mut game);
        assert!(game.completed_digits().iter().all(|&d| d));
    }

    #[test]
    fn test_generated_game() {
        let game = Sudoku::with_seed(Difficulty::Easy, 9);
        let givens = Board::positions().filter(|&p| game.is_given(p)).count();
        assert_eq!(givens, 41);
    }

    #[test]
    fn test_related_cells() {
        let centre = GridPos::new(4, 4);
        assert!(Sudoku::is_related(centre, GridPos::new(4, 0)));
        assert!(Sudoku::is_related(centre, GridPos::new(0, 4)));
        assert!(Sudoku::is_related(centre, GridPos::new(3, 5)));
        assert!(!Sudoku::is_related(centre, GridPos::new(0, 0)));
    }

    #[test]
    fn test_parse_difficulty() {
        assert_eq!("hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(" Easy ".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!(
            "brutal".parse::<Difficulty>(),
            Err(Error::UnknownDifficulty("brutal".to_string()))
        );
    }
}
