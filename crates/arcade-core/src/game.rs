use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Whether a game is still running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Playing,
    Won,
    Lost,
}

impl Status {
    pub fn is_over(self) -> bool {
        self != Status::Playing
    }
}

/// Which direction of score counts as a better result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreOrder {
    HigherIsBetter,
    LowerIsBetter,
}

impl ScoreOrder {
    /// True if `candidate` beats `current`
    pub fn beats(self, candidate: u64, current: u64) -> bool {
        match self {
            ScoreOrder::HigherIsBetter => candidate > current,
            ScoreOrder::LowerIsBetter => candidate < current,
        }
    }
}

/// Uniform driving seam shared by every game
pub trait Playable {
    /// Advance real time by `dt`
    fn advance(&mut self, dt: Duration);

    fn status(&self) -> Status;

    /// Score as recorded in the high-score table
    fn score(&self) -> u64;
}

/// Registry of available games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Arkanoid,
    Asteroids,
    Runner,
    Snake,
    Hangman,
    Maze,
    Quiz,
    Memory,
    Pong,
    Jigsaw,
    WordSearch,
    Sudoku,
    Tetris,
    Counter,
}

impl GameKind {
    /// All games in menu order
    pub const ALL: [GameKind; 14] = [
        GameKind::Arkanoid,
        GameKind::Asteroids,
        GameKind::Runner,
        GameKind::Snake,
        GameKind::Tetris,
        GameKind::Pong,
        GameKind::Maze,
        GameKind::Sudoku,
        GameKind::Jigsaw,
        GameKind::WordSearch,
        GameKind::Memory,
        GameKind::Hangman,
        GameKind::Quiz,
        GameKind::Counter,
    ];

    /// Stable identifier used on the command line and in the score file
    pub fn id(self) -> &'static str {
        match self {
            GameKind::Arkanoid => "arkanoid",
            GameKind::Asteroids => "asteroids",
            GameKind::Runner => "runner",
            GameKind::Snake => "snake",
            GameKind::Hangman => "hangman",
            GameKind::Maze => "maze",
            GameKind::Quiz => "quiz",
            GameKind::Memory => "memory",
            GameKind::Pong => "pong",
            GameKind::Jigsaw => "jigsaw",
            GameKind::WordSearch => "wordsearch",
            GameKind::Sudoku => "sudoku",
            GameKind::Tetris => "tetris",
            GameKind::Counter => "counter",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GameKind::Arkanoid => "Arkanoid",
            GameKind::Asteroids => "Asteroids",
            GameKind::Runner => "Runner",
            GameKind::Snake => "Snake",
            GameKind::Hangman => "Hangman",
            GameKind::Maze => "Maze",
            GameKind::Quiz => "Math Quiz",
            GameKind::Memory => "Memory",
            GameKind::Pong => "Pong",
            GameKind::Jigsaw => "Jigsaw",
            GameKind::WordSearch => "Word Search",
            GameKind::Sudoku => "Sudoku",
            GameKind::Tetris => "Tetris",
            GameKind::Counter => "Click Counter",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            GameKind::Arkanoid => "Break every brick across 20 stages",
            GameKind::Asteroids => "Shoot the rocks, survive 10 levels",
            GameKind::Runner => "Jump the obstacles as the pace picks up",
            GameKind::Snake => "Eat, grow, and don't bite yourself",
            GameKind::Hangman => "Guess the phrase before the gallows fill",
            GameKind::Maze => "Find your way to the far corner",
            GameKind::Quiz => "Quick-fire arithmetic",
            GameKind::Memory => "Match all seven pairs",
            GameKind::Pong => "Two players, first to five",
            GameKind::Jigsaw => "Swap tiles back into place",
            GameKind::WordSearch => "Find the hidden names",
            GameKind::Sudoku => "Fill the grid, 1 to 9",
            GameKind::Tetris => "Stack and clear lines",
            GameKind::Counter => "Click. Then click again.",
        }
    }

    pub fn score_order(self) -> ScoreOrder {
        match self {
            GameKind::Maze
            | GameKind::Memory
            | GameKind::Jigsaw
            | GameKind::WordSearch
            | GameKind::Sudoku => ScoreOrder::LowerIsBetter,
            _ => ScoreOrder::HigherIsBetter,
        }
    }

    /// Lower-is-better games only count a score when the game was won
    pub fn needs_win(self) -> bool {
        self.score_order() == ScoreOrder::LowerIsBetter
    }

    /// Label for the recorded score value
    pub fn score_label(self) -> &'static str {
        match self {
            GameKind::Maze | GameKind::WordSearch | GameKind::Sudoku => "seconds",
            GameKind::Memory => "attempts",
            GameKind::Jigsaw => "moves",
            GameKind::Pong => "margin",
            GameKind::Counter => "clicks",
            _ => "points",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GameKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "");
        GameKind::ALL
            .into_iter()
            .find(|kind| kind.id() == wanted)
            .ok_or_else(|| Error::UnknownGame(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_ids_are_unique() {
        let mut ids: Vec<_> = GameKind::ALL.iter().map(|k| k.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), GameKind::ALL.len());
    }

    #[test]
    fn test_parse_game_kind() {
        assert_eq!("Tetris".parse::<GameKind>(), Ok(GameKind::Tetris));
        assert_eq!("word-search".parse::<GameKind>(), Ok(GameKind::WordSearch));
        assert_eq!(
            "golf".parse::<GameKind>(),
            Err(Error::UnknownGame("golf".to_string()))
        );
        for kind in GameKind::ALL {
            assert_eq!(kind.id().parse::<GameKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_score_order() {
        assert!(GameKind::Tetris.score_order().beats(200, 100));
        assert!(GameKind::Maze.score_order().beats(30, 45));
        assert!(!GameKind::Maze.score_order().beats(45, 45));
    }

    #[test]
    fn test_serde_uses_ids() {
        let json = serde_json::to_string(&GameKind::WordSearch).unwrap();
        assert_eq!(json, "\"wordsearch\"");
    }
}
