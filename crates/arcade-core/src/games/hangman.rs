use super::make_rng;
use crate::game::{Playable, Status};
use rand::seq::SliceRandom;
use std::time::Duration;
use tracing::info;

pub const MAX_ERRORS: u32 = 4;

/// Letters accepted as guesses
pub const ALPHABET: [char; 27] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'ñ', 'o', 'p', 'q', 'r',
    's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

pub const PHRASES: [&str; 39] = [
    "dios amor es",
    "sacrificio",
    "perdonados",
    "santuario",
    "sabado santo",
    "jonas",
    "abraham",
    "jesus",
    "juan el bautista",
    "jerusalen",
    "hebreos",
    "apostol santiago",
    "arbol de la vida",
    "israel",
    "romanos",
    "felipe",
    "ana",
    "apocalipsis",
    "salmos",
    "amor eterno",
    "temed a dios",
    "guardar sus mandamientos",
    "buenos mayordomos",
    "proclamad su venida",
    "cristo vive",
    "fe y esperanza",
    "el señor es mi pastor",
    "dios es amor",
    "gloria a dios",
    "camina en luz",
    "adora al señor",
    "jesus es el camino",
    "salvacion eterna",
    "perdon y gracia",
    "el espiritu santo",
    "confia en el señor",
    "mi roca eterna",
    "gracia infinita",
    "el reino de dios",
];

/// Outcome of a single guess
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessResult {
    /// Letter occurs in the phrase
    Hit,
    /// Letter is absent; one more error
    Miss,
    /// Already guessed, not a letter, or the game is over
    Ignored,
}

/// Guess the phrase one letter at a time
pub struct Hangman {
    phrase: String,
    used: Vec<char>,
    errors: u32,
    status: Status,
}

impl Default for Hangman {
    fn default() -> Self {
        Self::new()
    }
}

impl Hangman {
    pub fn new() -> Self {
        Self::build(None)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::build(Some(seed))
    }

    fn build(seed: Option<u64>) -> Self {
        let mut rng = make_rng(seed);
        let phrase = PHRASES.choose(&mut rng).copied().unwrap_or(PHRASES[0]);
        Self::with_phrase(phrase)
    }

    /// Start with a known phrase
    pub fn with_phrase(phrase: &str) -> Self {
        Self {
            phrase: phrase.to_lowercase(),
            used: Vec::new(),
            errors: 0,
            status: Status::Playing,
        }
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn errors(&self) -> u32 {
        self.errors
    }

    pub fn remaining_tries(&self) -> u32 {
        MAX_ERRORS - self.errors
    }

    /// Letters in the order they were guessed
    pub fn used_letters(&self) -> &[char] {
        &self.used
    }

    pub fn is_used(&self, letter: char) -> bool {
        self.used.contains(&letter)
    }

    pub fn guess(&mut self, letter: char) -> GuessResult {
        let letter = letter.to_lowercase().next().unwrap_or(letter);
        if self.status.is_over() || !ALPHABET.contains(&letter) || self.is_used(letter) {
            return GuessResult::Ignored;
        }
        self.used.push(letter);

        if self.phrase.contains(letter) {
            if self.solved() {
                info!(phrase = %self.phrase, errors = self.errors, "hangman solved");
                self.status = Status::Won;
            }
            GuessResult::Hit
        } else {
            self.errors += 1;
            if self.errors >= MAX_ERRORS {
                info!(phrase = %self.phrase, "hangman lost");
                self.status = Status::Lost;
            }
            GuessResult::Miss
        }
    }

    fn solved(&self) -> bool {
        self.phrase
            .chars()
            .filter(|c| !c.is_whitespace())
            .all(|c| self.used.contains(&c))
    }

    /// Words with unguessed letters as `None`; the whole phrase once lost
    pub fn masked_words(&self) -> Vec<Vec<Option<char>>> {
        let reveal = self.status == Status::Lost;
        self.phrase
            .split_whitespace()
            .map(|word| {
                word.chars()
                    .map(|c| (reveal || self.used.contains(&c)).then_some(c))
                    .collect()
            })
            .collect()
    }

    /// Text rendering of the phrase with `_` for hidden letters
    pub fn masked(&self) -> String {
        self.masked_words()
            .iter()
            .map(|word| {
                word.iter()
                    .map(|c| c.unwrap_or('_').to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("   ")
    }
}

impl Playable for Hangman {
    fn advance(&mut self, _dt: Duration) {}

    fn status(&self) -> Status {
        self.status
    }

    fn score(&self) -> u64 {
        if self.status == Status::Won {
            u64::from(self.remaining_tries())
        } else {
            0
        }
    }
}
