use super::make_rng;
use crate::game::{Playable, Status};
use crate::geometry::{Direction, GridPos};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::time::Duration;
use tracing::info;

pub const COLS: usize = 20;
pub const ROWS: usize = 15;

/// Walls around one cell, indexed by [`wall_index`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    walls: [bool; 4],
}

impl Cell {
    fn closed() -> Self {
        Self { walls: [true; 4] }
    }

    pub fn has_wall(&self, dir: Direction) -> bool {
        self.walls[wall_index(dir)]
    }
}

fn wall_index(dir: Direction) -> usize {
    match dir {
        Direction::Up => 0,
        Direction::Right => 1,
        Direction::Down => 2,
        Direction::Left => 3,
    }
}

/// Grid of cells carved into a perfect maze
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Carve with an iterative depth-first backtracker starting at the top-left
    pub fn generate(rows: usize, cols: usize, rng: &mut StdRng) -> Self {
        let mut grid = Self {
            rows,
            cols,
            cells: vec![Cell::closed(); rows * cols],
        };
        let mut visited = vec![false; rows * cols];
        let start = GridPos::new(0, 0);
        visited[0] = true;
        let mut stack = vec![start];

        while let Some(&current) = stack.last() {
            let options: Vec<(Direction, GridPos)> = Direction::ALL
                .into_iter()
                .filter_map(|dir| current.step(dir, rows, cols).map(|next| (dir, next)))
                .filter(|(_, next)| !visited[next.row * cols + next.col])
                .collect();

            match options.choose(rng) {
                Some(&(dir, next)) => {
                    grid.open(current, dir, next);
                    visited[next.row * cols + next.col] = true;
                    stack.push(next);
                }
                None => {
                    stack.pop();
                }
            }
        }
        grid
    }

    fn open(&mut self, from: GridPos, dir: Direction, to: GridPos) {
        let (a, b) = (self.index(from), self.index(to));
        self.cells[a].walls[wall_index(dir)] = false;
        self.cells[b].walls[wall_index(dir.opposite())] = false;
    }

    fn index(&self, pos: GridPos) -> usize {
        pos.row * self.cols + pos.col
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell(&self, pos: GridPos) -> Cell {
        self.cells[self.index(pos)]
    }

    /// Neighbour reachable through an open wall
    pub fn passage(&self, pos: GridPos, dir: Direction) -> Option<GridPos> {
        if self.cell(pos).has_wall(dir) {
            return None;
        }
        pos.step(dir, self.rows, self.cols)
    }
}

/// Walk from the top-left corner to the bottom-right one
pub struct Maze {
    grid: Grid,
    player: GridPos,
    goal: GridPos,
    moves: u32,
    elapsed: Duration,
    status: Status,
}

impl Default for Maze {
    fn default() -> Self {
        Self::new()
    }
}

impl Maze {
    pub fn new() -> Self {
        Self::build(None)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::build(Some(seed))
    }

    fn build(seed: Option<u64>) -> Self {
        let mut rng = make_rng(seed);
        let grid = Grid::generate(ROWS, COLS, &mut rng);
        Self {
            grid,
            player: GridPos::new(0, 0),
            goal: GridPos::new(ROWS - 1, COLS - 1),
            moves: 0,
            elapsed: Duration::ZERO,
            status: Status::Playing,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> GridPos {
        self.player
    }

    pub fn goal(&self) -> GridPos {
        self.goal
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Move the player; returns false when a wall is in the way
    pub fn step(&mut self, dir: Direction) -> bool {
        if self.status.is_over() {
            return false;
        }
        let Some(next) = self.grid.passage(self.player, dir) else {
            return false;
        };
        self.player = next;
        self.moves += 1;
        if self.player == self.goal {
            info!(moves = self.moves, secs = self.elapsed.as_secs(), "maze solved");
            self.status = Status::Won;
        }
        true
    }
}

impl Playable for Maze {
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
    use std::collections::VecDeque;

    /// Breadth-first path from start to goal through open walls
    fn solve(grid: &Grid, from: GridPos, to: GridPos) -> Option<Vec<Direction>> {
        let mut prev = vec![None; grid.rows() * grid.cols()];
        let mut seen = vec![false; grid.rows() * grid.cols()];
        let mut queue = VecDeque::from([from]);
        seen[grid.index(from)] = true;
        while let Some(pos) = queue.pop_front() {
            if pos == to {
                let mut path = Vec::new();
                let mut cur = to;
                while let Some((dir, back)) = prev[grid.index(cur)] {
                    path.push(dir);
                    cur = back;
                }
                path.reverse();
                return Some(path);
            }
            for dir in Direction::ALL {
                if let Some(next) = grid.passage(pos, dir) {
                    if !seen[grid.index(next)] {
                        seen[grid.index(next)] = true;
                        prev[grid.index(next)] = Some((dir, pos));
                        queue.push_back(next);
                    }
                }
            }
        }
        None
    }

    #[test]
    fn test_perfect_maze() {
        let mut rng = make_rng(Some(21));
        let grid = Grid::generate(ROWS, COLS, &mut rng);

        // Spanning tree: every cell reachable, exactly cells - 1 passages
        let mut passages = 0;
        for row in 0..ROWS {
            for col in 0..COLS {
                let pos = GridPos::new(row, col);
                assert!(solve(&grid, GridPos::new(0, 0), pos).is_some());
                if grid.passage(pos, Direction::Right).is_some() {
                    passages += 1;
                }
                if grid.passage(pos, Direction::Down).is_some() {
                    passages += 1;
                }
            }
        }
        assert_eq!(passages, ROWS * COLS - 1);
    }

    #[test]
    fn test_walls_are_symmetric() {
        let mut rng = make_rng(Some(3));
        let grid = Grid::generate(ROWS, COLS, &mut rng);
        for row in 0..ROWS {
            for col in 0..COLS {
                let pos = GridPos::new(row, col);
                for dir in Direction::ALL {
                    if let Some(next) = pos.step(dir, ROWS, COLS) {
                        assert_eq!(
                            grid.cell(pos).has_wall(dir),
                            grid.cell(next).has_wall(dir.opposite())
                        );
                    } else {
                        assert!(grid.cell(pos).has_wall(dir));
                    }
                }
            }
        }
    }

    #[test]
    fn test_walls_block_movement() {
        let mut game = Maze::with_seed(8);
        assert!(!game.step(Direction::Up));
        assert!(!game.step(Direction::Left));
        assert_eq!(game.moves(), 0);
        assert_eq!(game.player(), GridPos::new(0, 0));
    }

    #[test]
    fn test_walking_the_solution_wins() {
        let mut game = Maze::with_seed(8);
        let path = solve(game.grid(), game.player(), game.goal()).unwrap();
        game.advance(Duration::from_secs(42));
        for dir in &path {
            assert!(game.step(*dir));
        }
        assert_eq!(game.status(), Status::Won);
        assert_eq!(game.moves() as usize, path.len());
        assert_eq!(game.score(), 42);

        game.advance(Duration::from_secs(10));
        assert_eq!(game.score(), 42);
    }
}
