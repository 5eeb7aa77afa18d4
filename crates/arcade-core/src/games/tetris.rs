use super::make_rng;
use crate::clock::Ticker;
use crate::game::{Playable, Status};
use rand::rngs::StdRng;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info};

pub const COLS: usize = 10;
pub const ROWS: usize = 20;

/// Points for clearing 0..=4 lines at once, multiplied by the level
const LINE_SCORES: [u64; 5] = [0, 100, 300, 500, 800];
const LINES_PER_LEVEL: u32 = 10;

/// Offsets tried in order when a rotation collides
const KICKS: [(i32, i32); 6] = [(0, 0), (-1, 0), (1, 0), (0, -1), (-2, 0), (2, 0)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl Kind {
    pub const ALL: [Kind; 7] = [Kind::I, Kind::J, Kind::L, Kind::O, Kind::S, Kind::T, Kind::Z];

    /// Spawn orientation
    pub fn shape(self) -> Vec<Vec<bool>> {
        let rows: &[&[u8]] = match self {
            Kind::I => &[&[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0], &[0, 0, 0, 0]],
            Kind::J => &[&[1, 0, 0], &[1, 1, 1], &[0, 0, 0]],
            Kind::L => &[&[0, 0, 1], &[1, 1, 1], &[0, 0, 0]],
            Kind::O => &[&[1, 1], &[1, 1]],
            Kind::S => &[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]],
            Kind::T => &[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]],
            Kind::Z => &[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]],
        };
        rows.iter().map(|row| row.iter().map(|&c| c == 1).collect()).collect()
    }

    /// Display colour as RGB
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Kind::I => (0, 255, 255),
            Kind::J => (0, 0, 255),
            Kind::L => (255, 165, 0),
            Kind::O => (255, 255, 0),
            Kind::S => (0, 255, 0),
            Kind::T => (128, 0, 128),
            Kind::Z => (255, 0, 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub kind: Kind,
    pub shape: Vec<Vec<bool>>,
    pub x: i32,
    pub y: i32,
}

impl Piece {
    fn spawn(kind: Kind) -> Self {
        let shape = kind.shape();
        let x = (COLS / 2) as i32 - shape[0].len() as i32 / 2;
        Self { kind, shape, x, y: 0 }
    }

    /// Board coordinates (x, y) of the filled cells when placed at an offset
    fn cells_at(&self, x: i32, y: i32) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape.iter().enumerate().flat_map(move |(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(c, _)| (x + c as i32, y + r as i32))
        })
    }

    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells_at(self.x, self.y)
    }
}

/// Clockwise quarter turn of a square matrix
fn rotate(shape: &[Vec<bool>]) -> Vec<Vec<bool>> {
    let n = shape.len();
    let mut rotated = vec![vec![false; n]; n];
    for (i, row) in shape.iter().enumerate() {
        for (j, &filled) in row.iter().enumerate() {
            rotated[j][n - 1 - i] = filled;
        }
    }
    rotated
}

pub type Well = [[Option<Kind>; COLS]; ROWS];

pub struct Tetris {
    rng: StdRng,
    well: Well,
    piece: Piece,
    next: Kind,
    gravity: Ticker,
    score: u64,
    lines: u32,
    level: u32,
    paused: bool,
    status: Status,
}

impl Default for Tetris {
    fn default() -> Self {
        Self::new()
    }
}

fn drop_interval(level: u32) -> Duration {
    let ms = 1000i64 - i64::from(level.saturating_sub(1)) * 70;
    Duration::from_millis(ms.max(50) as u64)
}

impl Tetris {
    pub fn new() -> Self {
        Self::build(None)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::build(Some(seed))
    }

    fn build(seed: Option<u64>) -> Self {
        let mut rng = make_rng(seed);
        let first = Kind::ALL[rng.gen_range(0..Kind::ALL.len())];
        let next = Kind::ALL[rng.gen_range(0..Kind::ALL.len())];
        Self {
            rng,
            well: [[None; COLS]; ROWS],
            piece: Piece::spawn(first),
            next,
            gravity: Ticker::new(drop_interval(1)),
            score: 0,
            lines: 0,
            level: 1,
            paused: false,
            status: Status::Playing,
        }
    }

    pub fn well(&self) -> &Well {
        &self.well
    }

    pub fn piece(&self) -> &Piece {
        &self.piece
    }

    pub fn next_piece(&self) -> Kind {
        self.next
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn drop_interval(&self) -> Duration {
        self.gravity.period()
    }

    pub fn toggle_pause(&mut self) {
        if !self.status.is_over() {
            self.paused = !self.paused;
            self.gravity.reset();
        }
    }

    fn active(&self) -> bool {
        !self.paused && !self.status.is_over()
    }

    fn collides(&self, shape_of: &Piece, x: i32, y: i32) -> bool {
        shape_of.cells_at(x, y).any(|(cx, cy)| {
            cx < 0
                || cx >= COLS as i32
                || cy >= ROWS as i32
                || (cy >= 0 && self.well[cy as usize][cx as usize].is_some())
        })
    }

    fn shift(&mut self, dx: i32, dy: i32) -> bool {
        if self.collides(&self.piece, self.piece.x + dx, self.piece.y + dy) {
            return false;
        }
        self.piece.x += dx;
        self.piece.y += dy;
        true
    }

    pub fn move_left(&mut self) -> bool {
        self.active() && self.shift(-1, 0)
    }

    pub fn move_right(&mut self) -> bool {
        self.active() && self.shift(1, 0)
    }

    /// One row down for a point; a blocked piece waits for gravity to lock it
    pub fn soft_drop(&mut self) -> bool {
        if self.active() && self.shift(0, 1) {
            self.score += 1;
            true
        } else {
            false
        }
    }

    /// Drop to the floor for two points a row and lock immediately
    /// Drops to the floor and locks. A piece already resting stays live
    /// until gravity locks it, so it can still be slid sideways.
    pub fn hard_drop(&mut self) {
        if !self.active() {
            return;
        }
        let mut landed = false;
        while self.shift(0, 1) {
            self.score += 2;
            landed = true;
        }
        if landed {
            self.lock();
        }
    }

    pub fn rotate(&mut self) -> bool {
        if !self.active() {
            return false;
        }
        let rotated = Piece {
            shape: rotate(&self.piece.shape),
            ..self.piece.clone()
        };
        let kick = KICKS
            .iter()
            .find(|(dx, dy)| !self.collides(&rotated, rotated.x + dx, rotated.y + dy));
        match kick {
            Some(&(dx, dy)) => {
                self.piece = Piece {
                    x: rotated.x + dx,
                    y: rotated.y + dy,
                    ..rotated
                };
                true
            }
            None => false,
        }
    }

    /// Row where the current piece would land
    pub fn ghost_y(&self) -> i32 {
        let mut y = self.piece.y;
        while !self.collides(&self.piece, self.piece.x, y + 1) {
            y += 1;
        }
        y
    }

    /// Gravity: fall one row or lock in place
    pub fn step(&mut self) {
        if self.active() && !self.shift(0, 1) {
            self.lock();
        }
    }

    fn lock(&mut self) {
        let cells: Vec<(i32, i32)> = self.piece.cells().collect();
        if cells.iter().any(|&(_, y)| y < 0) {
            info!(score = self.score, level = self.level, "tetris topped out");
            self.status = Status::Lost;
            return;
        }
        for (x, y) in cells {
            self.well[y as usize][x as usize] = Some(self.piece.kind);
        }
        debug!(kind = ?self.piece.kind, x = self.piece.x, y = self.piece.y, "piece locked");
        self.clear_lines();
        self.spawn();
    }

    fn clear_lines(&mut self) {
        let remaining: Vec<[Option<Kind>; COLS]> = self
            .well
            .iter()
            .filter(|row| row.iter().any(Option::is_none))
            .copied()
            .collect();
        let cleared = ROWS - remaining.len();
        if cleared == 0 {
            return;
        }
        let mut well = [[None; COLS]; ROWS];
        well[cleared..].copy_from_slice(&remaining);
        self.well = well;

        self.score += LINE_SCORES[cleared] * u64::from(self.level);
        self.lines += cleared as u32;
        if self.lines >= self.level * LINES_PER_LEVEL {
            self.level += 1;
            self.gravity.set_period(drop_interval(self.level));
            self.gravity.reset();
            debug!(level = self.level, "tetris level up");
        }
    }

    fn spawn(&mut self) {
        self.piece = Piece::spawn(self.next);
        self.next = Kind::ALL[self.rng.gen_range(0..Kind::ALL.len())];
        if self.collides(&self.piece, self.piece.x, self.piece.y) {
            info!(score = self.score, level = self.level, "tetris spawn blocked");
            self.status = Status::Lost;
        }
    }
}

impl Playable for Tetris {
    fn advance(&mut self, dt: Duration) {
        if !self.active() {
            return;
        }
        for _ in 0..self.gravity.ticks(dt) {
            self.step();
        }
    }

    fn status(&self) -> Status {
        self.status
    }

    fn score(&self) -> u64 {
        self.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_piece(kind: Kind) -> Tetris {
        let mut game = Tetris::with_seed(1);
        game.piece = Piece::spawn(kind);
        game
    }

    fn fill_row(game: &mut Tetris, row: usize, gap: Option<usize>) {
        for col in 0..COLS {
            if Some(col) != gap {
                game.well[row][col] = Some(Kind::O);
            }
        }
    }

    #[test]
    fn test_spawn_position() {
        assert_eq!(Piece::spawn(Kind::I).x, 3);
        assert_eq!(Piece::spawn(Kind::O).x, 4);
        assert_eq!(Piece::spawn(Kind::T).x, 4);
    }

    #[test]
    fn test_rotation_is_clockwise() {
        let rotated = rotate(&Kind::J.shape());
        let expected: Vec<Vec<bool>> = [[0, 1, 1], [0, 1, 0], [0, 1, 0]]
            .iter()
            .map(|r| r.iter().map(|&c| c == 1).collect())
            .collect();
        assert_eq!(rotated, expected);
        let mut shape = Kind::T.shape();
        for _ in 0..4 {
            shape = rotate(&shape);
        }
        assert_eq!(shape, Kind::T.shape());
    }

    #[test]
    fn test_walls_block_movement() {
        let mut game = with_piece(Kind::O);
        while game.move_left() {}
        assert_eq!(game.piece().x, 0);
        while game.move_right() {}
        assert_eq!(game.piece().x, (COLS - 2) as i32);
    }

    #[test]
    fn test_rotation_kicks_off_the_wall() {
        let mut game = with_piece(Kind::I);
        game.rotate();
        // Vertical I occupies column x + 2
        while game.move_right() {}
        assert_eq!(game.piece().cells().map(|(x, _)| x).max(), Some(9));
        assert!(game.rotate());
        assert!(game.piece().cells().all(|(x, _)| (0..COLS as i32).contains(&x)));
    }

    #[test]
    fn test_soft_and_hard_drop_scores() {
        let mut game = with_piece(Kind::O);
        assert!(game.soft_drop());
        assert_eq!(game.score(), 1);
        let ghost = game.ghost_y();
        assert_eq!(ghost, (ROWS - 2) as i32);
        let drop_rows = (ghost - game.piece().y) as u64;
        game.hard_drop();
        assert_eq!(game.score(), 1 + 2 * drop_rows);
        assert_eq!(game.well()[ROWS - 1][4], Some(Kind::O));
        assert_eq!(game.piece().y, 0);
    }

    #[test]
    fn test_hard_drop_on_resting_piece_does_not_lock() {
        let mut game = with_piece(Kind::O);
        game.piece.y = game.ghost_y();
        let score = game.score();
        game.hard_drop();
        assert_eq!(game.score(), score);
        assert!(game.well().iter().flatten().all(Option::is_none));
        assert!(game.move_left());

        // Gravity still locks it
        game.step();
        assert_eq!(game.well().iter().flatten().filter(|c| c.is_some()).count(), 4);
        assert_eq!(game.piece().y, 0);
    }

    #[test]
    fn test_gravity_follows_interval() {
        let mut game = with_piece(Kind::T);
        game.advance(Duration::from_millis(999));
        assert_eq!(game.piece().y, 0);
        game.advance(Duration::from_millis(1));
        assert_eq!(game.piece().y, 1);
    }

    #[test]
    fn test_pause_freezes() {
        let mut game = with_piece(Kind::T);
        game.toggle_pause();
        game.advance(Duration::from_secs(5));
        assert!(!game.move_left());
        assert_eq!(game.piece().y, 0);
        game.toggle_pause();
        assert!(game.move_left());
    }

    #[test]
    fn test_line_clear_scores_by_level() {
        let mut game = with_piece(Kind::I);
        fill_row(&mut game, ROWS - 1, Some(9));
        fill_row(&mut game, ROWS - 2, Some(9));
        game.well[ROWS - 3][0] = Some(Kind::Z);
        // Vertical I dropped into the two-deep gap at column 9
        game.rotate();
        while game.move_right() {}
        game.hard_drop();
        assert_eq!(game.lines(), 2);
        assert_eq!(game.well()[ROWS - 1][0], Some(Kind::Z));
        assert_eq!(game.well()[ROWS - 1][9], Some(Kind::I));
        assert!(!game.well()[ROWS - 2].iter().all(Option::is_some));
        assert!(game.score() >= 300);
    }

    #[test]
    fn test_level_up_speeds_gravity() {
        let mut game = with_piece(Kind::O);
        game.lines = 9;
        fill_row(&mut game, ROWS - 1, Some(0));
        game.well[ROWS - 1][1] = None;
        game.piece.x = 0;
        game.hard_drop();
        assert_eq!(game.level(), 2);
        assert_eq!(game.drop_interval(), Duration::from_millis(930));
        assert_eq!(drop_interval(20), Duration::from_millis(50));
    }

    #[test]
    fn test_blocked_spawn_loses() {
        let mut game = with_piece(Kind::O);
        game.well[2][4] = Some(Kind::Z);
        // Locks in rows 0 and 1, right where every piece spawns
        game.step();
        assert_eq!(game.status(), Status::Lost);
    }

    #[test]
    fn test_lock_above_top_loses() {
        let mut game = with_piece(Kind::O);
        game.piece.y = -1;
        game.well[1][4] = Some(Kind::Z);
        game.step();
        assert_eq!(game.status(), Status::Lost);
        assert_eq!(game.well()[0][4], None);
    }
}
