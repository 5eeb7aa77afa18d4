//! The individual games. Each module is self-contained.

pub mod arkanoid;
pub mod asteroids;
pub mod counter;
pub mod hangman;
pub mod jigsaw;
pub mod maze;
pub mod memory;
pub mod pong;
pub mod quiz;
pub mod runner;
pub mod snake;
pub mod sudoku;
pub mod tetris;
pub mod wordsearch;

use rand::rngs::StdRng;
use rand::SeedableRng;

/// RNG for a game: seeded when reproducibility is wanted, from entropy otherwise
pub(crate) fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
