//! Local high-score cache.
//!
//! Stores behind a small [`ScoreStore`] trait:
//! - [`JsonFileStore`]: `<data_dir>/scores.json`
//! - [`MemoryStore`]: in-process, for tests

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use arcade_core::GameKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

pub const SCORES_FILE_NAME: &str = "scores.json";

/// Entries kept in each game's table
pub const TOP_SCORES: usize = 10;

/// Most recent plays kept across all games
pub const HISTORY_LIMIT: usize = 200;

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("failed to write scores to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode scores: {0}")]
    Json(#[from] serde_json::Error),

    #[error("score store '{0}' is unavailable")]
    #[cfg_attr(not(test), allow(dead_code))]
    Unavailable(&'static str),
}

/// How a played game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Win,
    Loss,
    /// Left before the game decided anything
    Abandoned,
}

/// One finished (or left) game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub game: GameKind,
    pub player: String,
    pub score: u64,
    pub result: GameResult,
    pub duration_secs: u64,
    /// Unix timestamp when the game ended
    pub timestamp: u64,
}

impl ScoreRecord {
    pub fn new(game: GameKind, player: &str, score: u64, result: GameResult, duration_secs: u64) -> Self {
        Self {
            game,
            player: player.to_string(),
            score,
            result,
            duration_secs,
            timestamp: now_secs(),
        }
    }

    /// Whether this record may enter the best and top tables.
    /// Time/attempt games only count wins; a zero never leads a higher-is-better table.
    pub fn counts(&self) -> bool {
        if self.game.needs_win() {
            self.result == GameResult::Win
        } else {
            self.score > 0
        }
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameScores {
    pub best: Option<u64>,
    /// Best first
    pub top: Vec<ScoreRecord>,
    pub plays: u32,
}

/// Everything the cache knows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreBook {
    games: BTreeMap<GameKind, GameScores>,
    /// Oldest first
    history: Vec<ScoreRecord>,
}

impl ScoreBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record. Returns true when it sets a new best.
    pub fn record(&mut self, record: ScoreRecord) -> bool {
        let order = record.game.score_order();
        let entry = self.games.entry(record.game).or_default();
        entry.plays += 1;

        let mut new_best = false;
        if record.counts() {
            new_best = entry.best.map_or(true, |best| order.beats(record.score, best));
            if new_best {
                entry.best = Some(record.score);
            }
            // Ties keep the earlier record ahead
            let pos = entry
                .top
                .iter()
                .position(|r| order.beats(record.score, r.score))
                .unwrap_or(entry.top.len());
            entry.top.insert(pos, record.clone());
            entry.top.truncate(TOP_SCORES);
        }

        if new_best {
            info!(game = %record.game, score = record.score, player = %record.player, "new best score");
        }
        self.history.push(record);
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
        }
        new_best
    }

    /// Overwrite the best, for games whose best lives in the game itself
    pub fn set_best(&mut self, game: GameKind, best: u64) {
        self.games.entry(game).or_default().best = Some(best);
    }

    pub fn best(&self, game: GameKind) -> Option<u64> {
        self.games.get(&game).and_then(|g| g.best)
    }

    pub fn top(&self, game: GameKind) -> &[ScoreRecord] {
        self.games.get(&game).map_or(&[], |g| g.top.as_slice())
    }

    pub fn plays(&self, game: GameKind) -> u32 {
        self.games.get(&game).map_or(0, |g| g.plays)
    }

    /// Most recent first
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &ScoreRecord> {
        self.history.iter().rev().take(limit)
    }

    /// Forget one game, or everything
    pub fn clear(&mut self, game: Option<GameKind>) {
        match game {
            Some(game) => {
                self.games.remove(&game);
                self.history.retain(|r| r.game != game);
            }
            None => {
                self.games.clear();
                self.history.clear();
            }
        }
    }
}

/// Where the score book is kept
pub trait ScoreStore {
    /// Missing or unreadable data loads as an empty book
    fn load(&mut self) -> ScoreBook;

    fn save(&mut self, book: &ScoreBook) -> Result<(), ScoreError>;

    /// Backend name for display
    fn name(&self) -> &'static str;
}

/// Pretty-printed JSON file, cached after the first load
pub struct JsonFileStore {
    path: PathBuf,
    cache: Option<ScoreBook>,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path, cache: None }
    }

    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(SCORES_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> ScoreBook {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return ScoreBook::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read scores, starting empty");
                return ScoreBook::new();
            }
        };
        match serde_json::from_str(&json) {
            Ok(book) => book,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "corrupt score file, starting empty");
                ScoreBook::new()
            }
        }
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&mut self) -> ScoreBook {
        if let Some(book) = &self.cache {
            return book.clone();
        }
        let book = self.read();
        self.cache = Some(book.clone());
        book
    }

    fn save(&mut self, book: &ScoreBook) -> Result<(), ScoreError> {
        let json = serde_json::to_string_pretty(book)?;
        let io_err = |source: io::Error| ScoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(&self.path, json).map_err(io_err)?;
        self.cache = Some(book.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "Local"
    }
}

/// In-memory store for tests
#[cfg(test)]
pub struct MemoryStore {
    book: ScoreBook,
    available: bool,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self {
            book: ScoreBook::new(),
            available: true,
        }
    }

    /// Set whether saving should fail
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }
}

#[cfg(test)]
impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl ScoreStore for MemoryStore {
    fn load(&mut self) -> ScoreBook {
        self.book.clone()
    }

    fn save(&mut self, book: &ScoreBook) -> Result<(), ScoreError> {
        if !self.available {
            return Err(ScoreError::Unavailable(self.name()));
        }
        self.book = book.clone();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "Memory"
    }
}

/// Format seconds as MM:SS or HH:MM:SS
pub fn format_time(secs: u64) -> String {
    if secs >= 3600 {
        format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
    } else {
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}

/// A score as shown to the player, in the game's own unit
pub fn format_score(game: GameKind, score: u64) -> String {
    match game.score_label() {
        "seconds" => format_time(score),
        label => format!("{score} {label}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(game: GameKind, score: u64, result: GameResult) -> ScoreRecord {
        ScoreRecord::new(game, "tester", score, result, 30)
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("arcade-scores-{}-{name}.json", std::process::id()))
    }

    #[test]
    fn test_higher_is_better_best() {
        let mut book = ScoreBook::new();
        assert!(book.record(rec(GameKind::Tetris, 100, GameResult::Loss)));
        assert!(!book.record(rec(GameKind::Tetris, 80, GameResult::Loss)));
        assert!(book.record(rec(GameKind::Tetris, 300, GameResult::Loss)));
        assert_eq!(book.best(GameKind::Tetris), Some(300));
        let top: Vec<u64> = book.top(GameKind::Tetris).iter().map(|r| r.score).collect();
        assert_eq!(top, vec![300, 100, 80]);
        assert_eq!(book.plays(GameKind::Tetris), 3);
    }

    #[test]
    fn test_lower_is_better_needs_win() {
        let mut book = ScoreBook::new();
        assert!(!book.record(rec(GameKind::Maze, 10, GameResult::Abandoned)));
        assert_eq!(book.best(GameKind::Maze), None);
        assert!(book.record(rec(GameKind::Maze, 45, GameResult::Win)));
        assert!(book.record(rec(GameKind::Maze, 30, GameResult::Win)));
        assert!(!book.record(rec(GameKind::Maze, 30, GameResult::Win)));
        assert_eq!(book.best(GameKind::Maze), Some(30));
        assert_eq!(book.top(GameKind::Maze).len(), 3);
        assert_eq!(book.plays(GameKind::Maze), 4);
    }

    #[test]
    fn test_zero_does_not_take_a_best() {
        let mut book = ScoreBook::new();
        assert!(!book.record(rec(GameKind::Quiz, 0, GameResult::Abandoned)));
        assert_eq!(book.best(GameKind::Quiz), None);
    }

    #[test]
    fn test_top_table_is_capped() {
        let mut book = ScoreBook::new();
        for score in 1..=15 {
            book.record(rec(GameKind::Snake, score, GameResult::Loss));
        }
        let top = book.top(GameKind::Snake);
        assert_eq!(top.len(), TOP_SCORES);
        assert_eq!(top[0].score, 15);
        assert_eq!(top[TOP_SCORES - 1].score, 6);
    }

    #[test]
    fn test_history_is_capped() {
        let mut book = ScoreBook::new();
        for score in 0..(HISTORY_LIMIT as u64 + 20) {
            book.record(rec(GameKind::Runner, score, GameResult::Loss));
        }
        assert_eq!(book.recent(usize::MAX).count(), HISTORY_LIMIT);
        assert_eq!(book.recent(1).next().map(|r| r.score), Some(HISTORY_LIMIT as u64 + 19));
    }

    #[test]
    fn test_set_best_overwrites() {
        let mut book = ScoreBook::new();
        book.set_best(GameKind::Counter, 42);
        assert_eq!(book.best(GameKind::Counter), Some(42));
        book.set_best(GameKind::Counter, 0);
        assert_eq!(book.best(GameKind::Counter), Some(0));
    }

    #[test]
    fn test_clear_one_or_all() {
        let mut book = ScoreBook::new();
        book.record(rec(GameKind::Snake, 5, GameResult::Loss));
        book.record(rec(GameKind::Pong, 3, GameResult::Win));
        book.clear(Some(GameKind::Snake));
        assert_eq!(book.best(GameKind::Snake), None);
        assert_eq!(book.best(GameKind::Pong), Some(3));
        assert_eq!(book.recent(10).count(), 1);
        book.clear(None);
        assert_eq!(book, ScoreBook::new());
    }

    #[test]
    fn test_memory_store_unavailable() {
        let mut store = MemoryStore::new();
        let mut book = store.load();
        book.record(rec(GameKind::Snake, 5, GameResult::Loss));
        store.save(&book).unwrap();
        assert_eq!(store.load().best(GameKind::Snake), Some(5));

        store.set_available(false);
        assert!(matches!(store.save(&book), Err(ScoreError::Unavailable("Memory"))));
    }

    #[test]
    fn test_json_store_persists() {
        let path = temp_path("persist");
        let mut book = ScoreBook::new();
        book.record(rec(GameKind::WordSearch, 95, GameResult::Win));

        let mut store = JsonFileStore::new(path.clone());
        store.save(&book).unwrap();

        let mut reopened = JsonFileStore::new(path.clone());
        let loaded = reopened.load();
        fs::remove_file(&path).ok();
        assert_eq!(loaded, book);
        assert_eq!(reopened.name(), "Local");
    }

    #[test]
    fn test_json_store_missing_or_corrupt_is_empty() {
        let mut missing = JsonFileStore::new(temp_path("missing"));
        assert_eq!(missing.load(), ScoreBook::new());

        let path = temp_path("corrupt");
        fs::write(&path, "{ not json").unwrap();
        let mut corrupt = JsonFileStore::new(path.clone());
        let book = corrupt.load();
        fs::remove_file(&path).ok();
        assert_eq!(book, ScoreBook::new());
    }

    #[test]
    fn test_json_uses_game_ids() {
        let mut book = ScoreBook::new();
        book.record(rec(GameKind::WordSearch, 95, GameResult::Win));
        let json = serde_json::to_string(&book).unwrap();
        assert!(json.contains("\"wordsearch\""));
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(125), "02:05");
        assert_eq!(format_time(3725), "1:02:05");
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(GameKind::Sudoku, 65), "01:05");
        assert_eq!(format_score(GameKind::Memory, 9), "9 attempts");
        assert_eq!(format_score(GameKind::Tetris, 400), "400 points");
    }
}
