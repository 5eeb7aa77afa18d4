use super::make_rng;
use crate::clock::Countdown;
use crate::game::{Playable, Status};
use crate::geometry::GridPos;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const GRID_SIZE: usize = 15;

pub const WORDS: [&str; 15] = [
    "MARIO", "LUIGI", "PEACH", "YOSHI", "BOWSER", "TOAD", "KOOPA", "GOOMBA", "DAISY", "WARIO",
    "WALUIGI", "DONKEY", "DIDDY", "KIRBY", "ZELDA",
];

const PLACEMENT_ATTEMPTS: usize = 100;
const BOARD_ATTEMPTS: usize = 500;
pub const INCORRECT_FLASH: Duration = Duration::from_millis(500);

/// (drow, dcol) for horizontal, vertical and diagonal lines
const DIRECTIONS: [(isize, isize); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Where a word was hidden
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub word: &'static str,
    pub cells: Vec<GridPos>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Found(&'static str),
    /// Not a straight line, or no unfound word along it
    Incorrect,
    Ignored,
}

fn cells_along(start: GridPos, (dr, dc): (isize, isize), len: usize) -> Option<Vec<GridPos>> {
    (0..len as isize)
        .map(|i| {
            let row = start.row as isize + i * dr;
            let col = start.col as isize + i * dc;
            let inside = (0..GRID_SIZE as isize).contains(&row) && (0..GRID_SIZE as isize).contains(&col);
            inside.then(|| GridPos::new(row as usize, col as usize))
        })
        .collect()
}

/// The cells from `start` to `end` when they form a straight line
pub fn line(start: GridPos, end: GridPos) -> Option<Vec<GridPos>> {
    let dr = end.row as isize - start.row as isize;
    let dc = end.col as isize - start.col as isize;
    if dr != 0 && dc != 0 && dr.abs() != dc.abs() {
        return None;
    }
    let len = dr.abs().max(dc.abs()) as usize + 1;
    cells_along(start, (dr.signum(), dc.signum()), len)
}

/// Letter grid with hidden words
pub struct WordSearch {
    letters: Vec<Vec<char>>,
    placements: Vec<Placement>,
    found: Vec<&'static str>,
    found_cells: BTreeSet<GridPos>,
    flash: Countdown,
    flash_cells: Vec<GridPos>,
    elapsed: Duration,
    status: Status,
}

impl Default for WordSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl WordSearch {
    pub fn new() -> Self {
        Self::build(None)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::build(Some(seed))
    }

    fn build(seed: Option<u64>) -> Self {
        let mut rng = make_rng(seed);
        let (mut letters, mut placements) = Self::try_board(&mut rng);
        let mut attempts = 1;
        while placements.len() < WORDS.len() && attempts < BOARD_ATTEMPTS {
            (letters, placements) = Self::try_board(&mut rng);
            attempts += 1;
        }
        debug!(attempts, "word search board generated");
        if placements.len() < WORDS.len() {
            warn!(placed = placements.len(), "word search could not place every word");
        }
        // Listed in the canonical order regardless of placement order
        placements.sort_by_key(|p| WORDS.iter().position(|w| *w == p.word));

        for row in letters.iter_mut() {
            for cell in row.iter_mut().filter(|c| **c == ' ') {
                *cell = char::from(rng.gen_range(b'A'..=b'Z'));
            }
        }

        Self {
            letters,
            placements,
            found: Vec::new(),
            found_cells: BTreeSet::new(),
            flash: Countdown::new(),
            flash_cells: Vec::new(),
            elapsed: Duration::ZERO,
            status: Status::Playing,
        }
    }

    fn try_board(rng: &mut StdRng) -> (Vec<Vec<char>>, Vec<Placement>) {
        let mut letters = vec![vec![' '; GRID_SIZE]; GRID_SIZE];
        let mut words = WORDS;
        words.shuffle(rng);
        let placements = words
            .into_iter()
            .filter_map(|word| Self::place(&mut letters, word, rng))
            .collect();
        (letters, placements)
    }

    fn place(letters: &mut [Vec<char>], word: &'static str, rng: &mut StdRng) -> Option<Placement> {
        let chars: Vec<char> = word.chars().collect();
        for _ in 0..PLACEMENT_ATTEMPTS {
            let start = GridPos::new(rng.gen_range(0..GRID_SIZE), rng.gen_range(0..GRID_SIZE));
            let dir = DIRECTIONS[rng.gen_range(0..DIRECTIONS.len())];
            let Some(cells) = cells_along(start, dir, chars.len()) else {
                continue;
            };
            let fits = cells
                .iter()
                .zip(&chars)
                .all(|(pos, &c)| letters[pos.row][pos.col] == ' ' || letters[pos.row][pos.col] == c);
            if fits {
                for (pos, &c) in cells.iter().zip(&chars) {
                    letters[pos.row][pos.col] = c;
                }
                return Some(Placement { word, cells });
            }
        }
        None
    }

    pub fn letter(&self, pos: GridPos) -> char {
        self.letters[pos.row][pos.col]
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// The words the player is looking for
    pub fn words(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.placements.iter().map(|p| p.word)
    }

    pub fn is_found(&self, word: &str) -> bool {
        self.found.iter().any(|w| *w == word)
    }

    pub fn found_count(&self) -> usize {
        self.found.len()
    }

    pub fn is_found_cell(&self, pos: GridPos) -> bool {
        self.found_cells.contains(&pos)
    }

    /// Cells of the last wrong selection while its flash lasts
    pub fn flash_cells(&self) -> &[GridPos] {
        if self.flash.is_running() {
            &self.flash_cells
        } else {
            &[]
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Check the line from `start` to `end`, read in either direction
    pub fn select(&mut self, start: GridPos, end: GridPos) -> Selection {
        if self.status.is_over() {
            return Selection::Ignored;
        }
        let Some(cells) = line(start, end) else {
            self.flash_cells = vec![start, end];
            self.flash.start(INCORRECT_FLASH);
            return Selection::Incorrect;
        };

        let text: String = cells.iter().map(|&pos| self.letter(pos)).collect();
        let reversed: String = text.chars().rev().collect();
        let hit = self
            .words()
            .find(|word| !self.is_found(word) && (*word == text || *word == reversed));

        match hit {
            Some(word) => {
                debug!(word, "word found");
                self.found.push(word);
                self.found_cells.extend(cells);
                if self.found.len() == self.placements.len() {
                    info!(secs = self.elapsed.as_secs(), "word search completed");
                    self.status = Status::Won;
                }
                Selection::Found(word)
            }
            None => {
                self.flash_cells = cells;
                self.flash.start(INCORRECT_FLASH);
                Selection::Incorrect
            }
        }
    }
}

impl Playable for WordSearch {
    fn advance(&mut self, dt: Duration) {
        if self.flash.advance(dt) {
            self.flash_cells.clear();
        }
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

    fn ends(p: &Placement) -> (GridPos, GridPos) {
        (p.cells[0], p.cells[p.cells.len() - 1])
    }

    #[test]
    fn test_every_word_is_hidden() {
        let game = WordSearch::with_seed(11);
        assert_eq!(game.placements().len(), WORDS.len());
        for p in game.placements() {
            let text: String = p.cells.iter().map(|&pos| game.letter(pos)).collect();
            assert_eq!(text, p.word);
        }
        assert_eq!(game.words().collect::<Vec<_>>(), WORDS.to_vec());
    }

    #[test]
    fn test_grid_is_filled_with_capitals() {
        let game = WordSearch::with_seed(2);
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                assert!(game.letter(GridPos::new(row, col)).is_ascii_uppercase());
            }
        }
    }

    #[test]
    fn test_line_shapes() {
        let a = GridPos::new(2, 2);
        assert_eq!(line(a, GridPos::new(2, 5)).map(|c| c.len()), Some(4));
        assert_eq!(line(a, GridPos::new(5, 5)).map(|c| c.len()), Some(4));
        assert_eq!(line(a, GridPos::new(0, 4)), Some(vec![a, GridPos::new(1, 3), GridPos::new(0, 4)]));
        assert_eq!(line(a, GridPos::new(3, 5)), None);
        assert_eq!(line(a, a), Some(vec![a]));
    }

    #[test]
    fn test_select_forward_and_backward() {
        let mut game = WordSearch::with_seed(11);
        let first = game.placements()[0].clone();
        let (start, end) = ends(&first);
        assert_eq!(game.select(end, start), Selection::Found(first.word));
        assert!(game.is_found(first.word));
        assert!(first.cells.iter().all(|&pos| game.is_found_cell(pos)));
        // Already found words are not accepted twice
        assert_eq!(game.select(start, end), Selection::Incorrect);
    }

    #[test]
    fn test_incorrect_selection_flashes() {
        let mut game = WordSearch::with_seed(11);
        assert_eq!(game.select(GridPos::new(0, 0), GridPos::new(1, 3)), Selection::Incorrect);
        assert!(!game.flash_cells().is_empty());
        game.advance(Duration::from_millis(499));
        assert!(!game.flash_cells().is_empty());
        game.advance(Duration::from_millis(1));
        assert!(game.flash_cells().is_empty());
    }

    #[test]
    fn test_finding_everything_wins() {
        let mut game = WordSearch::with_seed(5);
        game.advance(Duration::from_secs(90));
        let placements = game.placements().to_vec();
        for p in &placements {
            let (start, end) = ends(p);
            assert!(matches!(game.select(start, end), Selection::Found(_)));
        }
        assert_eq!(game.status(), Status::Won);
        assert_eq!(game.score(), 90);
        assert_eq!(game.select(GridPos::new(0, 0), GridPos::new(0, 1)), Selection::Ignored);
    }
}
