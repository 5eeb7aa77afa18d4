use super::make_rng;
use crate::clock::Countdown;
use crate::error::{Error, Result};
use crate::game::{Playable, Status};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

pub const PAIRS: usize = 7;
pub const CARD_COUNT: usize = PAIRS * 2;
/// How long a mismatched pair stays face up
pub const MISMATCH_DELAY: Duration = Duration::from_millis(600);

/// Card face sets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Deck {
    #[default]
    Letters,
    Numbers,
    Animals,
    Books,
    Names,
}

impl Deck {
    pub const ALL: [Deck; 5] = [Deck::Letters, Deck::Numbers, Deck::Animals, Deck::Books, Deck::Names];

    pub fn name(self) -> &'static str {
        match self {
            Deck::Letters => "letters",
            Deck::Numbers => "numbers",
            Deck::Animals => "animals",
            Deck::Books => "books",
            Deck::Names => "names",
        }
    }

    pub fn faces(self) -> [&'static str; PAIRS] {
        match self {
            Deck::Letters => ["A", "B", "H", "I", "R", "W", "Z"],
            Deck::Numbers => ["1", "2", "3", "4", "5", "6", "7"],
            Deck::Animals => ["Lion", "Owl", "Fox", "Bear", "Frog", "Whale", "Cat"],
            Deck::Books => ["Hechos", "Daniel", "Job", "Mateo", "Salmos", "Génesis", "Éxodo"],
            Deck::Names => ["Jesús", "Rut", "María", "Pedro", "Moisés", "Daniel", "David"],
        }
    }
}

impl FromStr for Deck {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Deck::ALL
            .into_iter()
            .find(|deck| deck.name() == wanted)
            .ok_or_else(|| Error::UnknownDeck(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    Hidden,
    Revealed,
    Matched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    /// Index into the deck faces
    pub face: usize,
    pub state: CardState,
}

/// What happened on a flip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flip {
    /// First card of a pair turned over
    First,
    Match,
    Mismatch,
    Ignored,
}

/// Concentration with seven pairs
pub struct Memory {
    deck: Deck,
    cards: Vec<Card>,
    /// Face-up cards not yet matched
    selected: Vec<usize>,
    attempts: u32,
    flip_back: Countdown,
    status: Status,
}

impl Memory {
    pub fn new(deck: Deck) -> Self {
        Self::build(deck, None)
    }

    pub fn with_seed(deck: Deck, seed: u64) -> Self {
        Self::build(deck, Some(seed))
    }

    fn build(deck: Deck, seed: Option<u64>) -> Self {
        let mut rng = make_rng(seed);
        let mut cards: Vec<Card> = (0..PAIRS)
            .flat_map(|face| {
                [Card {
                    face,
                    state: CardState::Hidden,
                }; 2]
            })
            .collect();
        cards.shuffle(&mut rng);
        Self {
            deck,
            cards,
            selected: Vec::with_capacity(2),
            attempts: 0,
            flip_back: Countdown::new(),
            status: Status::Playing,
        }
    }

    pub fn deck(&self) -> Deck {
        self.deck
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn face_label(&self, card: &Card) -> &'static str {
        self.deck.faces()[card.face]
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn matched_pairs(&self) -> usize {
        self.cards.iter().filter(|c| c.state == CardState::Matched).count() / 2
    }

    /// True while a mismatched pair is waiting to flip back
    pub fn is_locked(&self) -> bool {
        self.flip_back.is_running()
    }

    pub fn flip(&mut self, index: usize) -> Flip {
        if self.status.is_over() || self.is_locked() {
            return Flip::Ignored;
        }
        match self.cards.get(index) {
            Some(card) if card.state == CardState::Hidden => {}
            _ => return Flip::Ignored,
        }

        self.cards[index].state = CardState::Revealed;
        self.selected.push(index);
        if self.selected.len() < 2 {
            return Flip::First;
        }

        self.attempts += 1;
        let (a, b) = (self.selected[0], self.selected[1]);
        if self.cards[a].face == self.cards[b].face {
            self.cards[a].state = CardState::Matched;
            self.cards[b].state = CardState::Matched;
            self.selected.clear();
            if self.matched_pairs() == PAIRS {
                info!(attempts = self.attempts, "memory completed");
                self.status = Status::Won;
            }
            Flip::Match
        } else {
            debug!(a, b, "memory mismatch");
            self.flip_back.start(MISMATCH_DELAY);
            Flip::Mismatch
        }
    }

    fn hide_selected(&mut self) {
        for index in self.selected.drain(..) {
            self.cards[index].state = CardState::Hidden;
        }
    }
}

impl Playable for Memory {
    fn advance(&mut self, dt: Duration) {
        if self.flip_back.advance(dt) {
            self.hide_selected();
        }
    }

    fn status(&self) -> Status {
        self.status
    }

    fn score(&self) -> u64 {
        u64::from(self.attempts)
    }
}
