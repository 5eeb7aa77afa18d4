use super::make_rng;
use crate::error::{Error, Result};
use crate::game::{Playable, Status};
use rand::seq::SliceRandom;
use std::time::Duration;
use tracing::{debug, info};

pub const MIN_SIZE: usize = 2;
pub const MAX_SIZE: usize = 8;
pub const DEFAULT_SIZE: usize = 3;

/// Shading ramp for the generated picture, darkest first
const RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Text art cut into tiles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    rows: Vec<Vec<char>>,
    width: usize,
}

impl Picture {
    /// Rows are padded with spaces to the widest line; trailing blank lines are dropped
    pub fn from_text(text: &str) -> Result<Self> {
        let mut rows: Vec<Vec<char>> = text.lines().map(|line| line.trim_end().chars().collect()).collect();
        while rows.last().is_some_and(|row| row.is_empty()) {
            rows.pop();
        }
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if width == 0 {
            return Err(Error::EmptyPicture);
        }
        for row in &mut rows {
            row.resize(width, ' ');
        }
        Ok(Self { rows, width })
    }

    /// Diagonal gradient, used when no picture is configured
    pub fn gradient(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let span = (width + height).saturating_sub(2).max(1);
        let rows = (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| RAMP[(x + y) * (RAMP.len() - 1) / span])
                    .collect()
            })
            .collect();
        Self { rows, width }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Lines of the tile at `index` when the picture is cut `size` x `size`.
    /// Pictures smaller than the grid are padded so every tile is at least one cell.
    pub fn tile(&self, size: usize, index: usize) -> Vec<String> {
        let size = size.max(1);
        let tile_w = (self.width / size).max(1);
        let tile_h = (self.height() / size).max(1);
        let (row, col) = (index / size, index % size);
        (0..tile_h)
            .map(|dy| {
                let line = self.rows.get(row * tile_h + dy);
                (0..tile_w)
                    .map(|dx| {
                        line.and_then(|l| l.get(col * tile_w + dx))
                            .copied()
                            .unwrap_or(' ')
                    })
                    .collect()
            })
            .collect()
    }
}

impl Default for Picture {
    fn default() -> Self {
        Self::gradient(48, 24)
    }
}

/// Sliding-by-swap picture puzzle
pub struct Jigsaw {
    size: usize,
    /// `order[pos]` is the original index of the tile shown at `pos`
    order: Vec<usize>,
    /// Tile picked up and waiting for its swap partner
    held: Option<usize>,
    moves: u32,
    status: Status,
}

impl Jigsaw {
    pub fn new(size: usize) -> Result<Self> {
        Self::build(size, None)
    }

    pub fn with_seed(size: usize, seed: u64) -> Result<Self> {
        Self::build(size, Some(seed))
    }

    fn build(size: usize, seed: Option<u64>) -> Result<Self> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(Error::InvalidPuzzleSize(size));
        }
        let mut rng = make_rng(seed);
        let mut order: Vec<usize> = (0..size * size).collect();
        while order.iter().enumerate().all(|(pos, &tile)| pos == tile) {
            order.shuffle(&mut rng);
        }
        debug!(size, "jigsaw shuffled");
        Ok(Self {
            size,
            order,
            held: None,
            moves: 0,
            status: Status::Playing,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn held(&self) -> Option<usize> {
        self.held
    }

    pub fn is_correct(&self, pos: usize) -> bool {
        self.order.get(pos) == Some(&pos)
    }

    pub fn is_solved(&self) -> bool {
        (0..self.order.len()).all(|pos| self.is_correct(pos))
    }

    /// Exchange two tiles; returns false when nothing happened
    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        let len = self.order.len();
        if a == b || a >= len || b >= len || self.status.is_over() {
            return false;
        }
        self.order.swap(a, b);
        self.moves += 1;
        if self.is_solved() {
            info!(moves = self.moves, size = self.size, "jigsaw solved");
            self.status = Status::Won;
        }
        true
    }

    /// Pick up the tile at `pos`, or drop the held tile onto it.
    /// Picking the held tile again puts it back.
    pub fn pick(&mut self, pos: usize) {
        if pos >= self.order.len() || self.status.is_over() {
            return;
        }
        match self.held.take() {
            None => self.held = Some(pos),
            Some(from) => {
                self.swap(from, pos);
            }
        }
    }
}

impl Playable for Jigsaw {
    fn advance(&mut self, _dt: Duration) {}

    fn status(&self) -> Status {
        self.status
    }

    fn score(&self) -> u64 {
        u64::from(self.moves)
    }
}
