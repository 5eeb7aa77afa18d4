//! The game being played, plus the per-game cursor and input state the
//! terminal needs on top of the rules.

use std::time::{Duration, Instant};

use arcade_core::games::arkanoid::Arkanoid;
use arcade_core::games::asteroids::Asteroids;
use arcade_core::games::counter::Counter;
use arcade_core::games::hangman::{GuessResult, Hangman};
use arcade_core::games::jigsaw::{Jigsaw, Picture};
use arcade_core::games::maze::Maze;
use arcade_core::games::memory::{self, Deck, Flip, Memory};
use arcade_core::games::pong::{Phase, Pong, Side};
use arcade_core::games::quiz::{Feedback, Quiz};
use arcade_core::games::runner::Runner;
use arcade_core::games::snake::Snake;
use arcade_core::games::sudoku::{self, Check, Difficulty, Sudoku};
use arcade_core::games::tetris::Tetris;
use arcade_core::games::wordsearch::{self, Selection, WordSearch};
use arcade_core::{Direction, GameKind, GridPos, Playable, Status};
use crossterm::event::{KeyCode, KeyEvent};
use tracing::{debug, info};

use crate::config::Config;
use crate::input::HeldKeys;

pub const LEFT_KEYS: [KeyCode; 2] = [KeyCode::Left, KeyCode::Char('a')];
pub const RIGHT_KEYS: [KeyCode; 2] = [KeyCode::Right, KeyCode::Char('d')];
pub const THRUST_KEYS: [KeyCode; 2] = [KeyCode::Up, KeyCode::Char('w')];

/// Memory cards are laid out in two rows
pub const MEMORY_COLUMNS: usize = memory::CARD_COUNT / 2;

const MAX_ANSWER_LEN: usize = 6;

/// Settings a game is started with
#[derive(Debug, Clone)]
pub struct GameSettings {
    pub pong_speed: u32,
    pub difficulty: Difficulty,
    pub jigsaw_size: usize,
    pub picture: Picture,
    pub deck: Deck,
}

impl GameSettings {
    /// Settings from a validated config; the picture is loaded by the caller
    pub fn from_config(config: &Config, picture: Picture) -> Self {
        Self {
            pong_speed: config.pong.ball_speed,
            difficulty: config.sudoku.difficulty,
            jigsaw_size: config.jigsaw.size,
            picture,
            deck: config.memory.deck,
        }
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            pong_speed: arcade_core::games::pong::DEFAULT_SPEED,
            difficulty: Difficulty::default(),
            jigsaw_size: arcade_core::games::jigsaw::DEFAULT_SIZE,
            picture: Picture::default(),
            deck: Deck::default(),
        }
    }
}

pub enum ActiveGame {
    Arkanoid(Arkanoid),
    Asteroids(Asteroids),
    Runner(Runner),
    Snake(Snake),
    Hangman(Hangman),
    Maze(Maze),
    Quiz {
        quiz: Quiz,
        input: String,
    },
    Memory {
        memory: Memory,
        cursor: usize,
    },
    Pong(Pong),
    Jigsaw {
        jigsaw: Jigsaw,
        picture: Picture,
        cursor: usize,
    },
    WordSearch {
        search: WordSearch,
        cursor: GridPos,
        anchor: Option<GridPos>,
    },
    Sudoku {
        sudoku: Sudoku,
        cursor: GridPos,
        /// Wrong cells from the last check, cleared on the next edit
        errors: Vec<GridPos>,
    },
    Tetris(Tetris),
    Counter(Counter),
}

/// One play of one game
pub struct Session {
    kind: GameKind,
    pub game: ActiveGame,
    played: Duration,
}

/// Cursor step on a `rows` x `cols` board, clamped at the edges
fn move_cursor(pos: GridPos, dir: Direction, rows: usize, cols: usize) -> GridPos {
    pos.step(dir, rows, cols).unwrap_or(pos)
}

/// Arrow keys, vi keys and WASD as a direction
fn key_direction(code: KeyCode, vi: bool) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('w') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') => Some(Direction::Right),
        KeyCode::Char('k') if vi => Some(Direction::Up),
        KeyCode::Char('j') if vi => Some(Direction::Down),
        KeyCode::Char('h') if vi => Some(Direction::Left),
        KeyCode::Char('l') if vi => Some(Direction::Right),
        _ => None,
    }
}

fn is_select(code: KeyCode) -> bool {
    matches!(code, KeyCode::Enter | KeyCode::Char(' '))
}

impl Session {
    /// Start `kind`. `best` seeds games that keep their own best (the counter).
    pub fn start(kind: GameKind, settings: &GameSettings, best: Option<u64>) -> arcade_core::Result<Self> {
        let game = match kind {
            GameKind::Arkanoid => ActiveGame::Arkanoid(Arkanoid::new()),
            GameKind::Asteroids => ActiveGame::Asteroids(Asteroids::new()),
            GameKind::Runner => ActiveGame::Runner(Runner::new()),
            GameKind::Snake => ActiveGame::Snake(Snake::new()),
            GameKind::Hangman => ActiveGame::Hangman(Hangman::new()),
            GameKind::Maze => ActiveGame::Maze(Maze::new()),
            GameKind::Quiz => ActiveGame::Quiz {
                quiz: Quiz::new(),
                input: String::new(),
            },
            GameKind::Memory => ActiveGame::Memory {
                memory: Memory::new(settings.deck),
                cursor: 0,
            },
            GameKind::Pong => ActiveGame::Pong(Pong::new(settings.pong_speed)?),
            GameKind::Jigsaw => ActiveGame::Jigsaw {
                jigsaw: Jigsaw::new(settings.jigsaw_size)?,
                picture: settings.picture.clone(),
                cursor: 0,
            },
            GameKind::WordSearch => ActiveGame::WordSearch {
                search: WordSearch::new(),
                cursor: GridPos::new(0, 0),
                anchor: None,
            },
            GameKind::Sudoku => ActiveGame::Sudoku {
                sudoku: Sudoku::new(settings.difficulty),
                cursor: GridPos::new(4, 4),
                errors: Vec::new(),
            },
            GameKind::Tetris => ActiveGame::Tetris(Tetris::new()),
            GameKind::Counter => ActiveGame::Counter(Counter::with_best(best.unwrap_or(0))),
        };
        info!(game = %kind, "session started");
        Ok(Self::with_game(kind, game))
    }

    pub fn with_game(kind: GameKind, game: ActiveGame) -> Self {
        Self {
            kind,
            game,
            played: Duration::ZERO,
        }
    }

    pub fn kind(&self) -> GameKind {
        self.kind
    }

    /// Time spent in play, excluding pauses
    pub fn played(&self) -> Duration {
        self.played
    }

    pub fn status(&self) -> Status {
        self.playable().status()
    }

    pub fn score(&self) -> u64 {
        self.playable().score()
    }

    /// Games that never end on their own; their score is kept when the player leaves
    pub fn records_on_leave(&self) -> bool {
        matches!(self.kind, GameKind::Quiz | GameKind::Counter)
    }

    fn playable(&self) -> &dyn Playable {
        match &self.game {
            ActiveGame::Arkanoid(g) => g,
            ActiveGame::Asteroids(g) => g,
            ActiveGame::Runner(g) => g,
            ActiveGame::Snake(g) => g,
            ActiveGame::Hangman(g) => g,
            ActiveGame::Maze(g) => g,
            ActiveGame::Quiz { quiz, .. } => quiz,
            ActiveGame::Memory { memory, .. } => memory,
            ActiveGame::Pong(g) => g,
            ActiveGame::Jigsaw { jigsaw, .. } => jigsaw,
            ActiveGame::WordSearch { search, .. } => search,
            ActiveGame::Sudoku { sudoku, .. } => sudoku,
            ActiveGame::Tetris(g) => g,
            ActiveGame::Counter(g) => g,
        }
    }

    fn playable_mut(&mut self) -> &mut dyn Playable {
        match &mut self.game {
            ActiveGame::Arkanoid(g) => g,
            ActiveGame::Asteroids(g) => g,
            ActiveGame::Runner(g) => g,
            ActiveGame::Snake(g) => g,
            ActiveGame::Hangman(g) => g,
            ActiveGame::Maze(g) => g,
            ActiveGame::Quiz { quiz, .. } => quiz,
            ActiveGame::Memory { memory, .. } => memory,
            ActiveGame::Pong(g) => g,
            ActiveGame::Jigsaw { jigsaw, .. } => jigsaw,
            ActiveGame::WordSearch { search, .. } => search,
            ActiveGame::Sudoku { sudoku, .. } => sudoku,
            ActiveGame::Tetris(g) => g,
            ActiveGame::Counter(g) => g,
        }
    }

    /// Apply held keys, then advance the game by `dt`
    pub fn tick(&mut self, dt: Duration, held: &HeldKeys, now: Instant) {
        match &mut self.game {
            ActiveGame::Arkanoid(g) => g.set_paddle_direction(held.axis(&LEFT_KEYS, &RIGHT_KEYS, now)),
            ActiveGame::Asteroids(g) => {
                g.set_rotation(held.axis(&LEFT_KEYS, &RIGHT_KEYS, now));
                g.set_thrust(held.any_held(&THRUST_KEYS, now));
            }
            ActiveGame::Pong(g) => {
                g.set_paddle(
                    Side::Left,
                    held.axis(&[KeyCode::Char('w')], &[KeyCode::Char('s')], now),
                );
                g.set_paddle(Side::Right, held.axis(&[KeyCode::Up], &[KeyCode::Down], now));
            }
            _ => {}
        }
        if !self.status().is_over() {
            self.played += dt;
        }
        self.playable_mut().advance(dt);
    }

    /// Handle a key press. Returns a message to flash, if any.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<String> {
        let code = key.code;
        match &mut self.game {
            ActiveGame::Arkanoid(g) => {
                if code == KeyCode::Char(' ') {
                    g.launch();
                }
                None
            }
            ActiveGame::Asteroids(g) => {
                if code == KeyCode::Char(' ') {
                    g.fire();
                }
                None
            }
            ActiveGame::Runner(g) => {
                if matches!(code, KeyCode::Char(' ') | KeyCode::Up | KeyCode::Char('w')) {
                    g.jump();
                }
                None
            }
            ActiveGame::Snake(g) => {
                if let Some(dir) = key_direction(code, false) {
                    g.turn(dir);
                }
                None
            }
            ActiveGame::Maze(g) => {
                if let Some(dir) = key_direction(code, true) {
                    g.step(dir);
                }
                None
            }
            ActiveGame::Hangman(g) => handle_hangman(g, code),
            ActiveGame::Quiz { quiz, input } => handle_quiz(quiz, input, code),
            ActiveGame::Memory { memory, cursor } => handle_memory(memory, cursor, code),
            ActiveGame::Pong(g) => handle_pong(g, code),
            ActiveGame::Jigsaw { jigsaw, cursor, .. } => {
                let size = jigsaw.size();
                if let Some(dir) = key_direction(code, true) {
                    let pos = GridPos::new(*cursor / size, *cursor % size);
                    let next = move_cursor(pos, dir, size, size);
                    *cursor = next.row * size + next.col;
                } else if is_select(code) {
                    jigsaw.pick(*cursor);
                }
                None
            }
            ActiveGame::WordSearch { search, cursor, anchor } => handle_word_search(search, cursor, anchor, code),
            ActiveGame::Sudoku { sudoku, cursor, errors } => handle_sudoku(sudoku, cursor, errors, code),
            ActiveGame::Tetris(g) => {
                match code {
                    KeyCode::Left | KeyCode::Char('h') => {
                        g.move_left();
                    }
                    KeyCode::Right | KeyCode::Char('l') => {
                        g.move_right();
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        g.soft_drop();
                    }
                    KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('x') => {
                        g.rotate();
                    }
                    KeyCode::Char(' ') => g.hard_drop(),
                    KeyCode::Char('p') => g.toggle_pause(),
                    _ => {}
                }
                None
            }
            ActiveGame::Counter(g) => match code {
                KeyCode::Char(' ') | KeyCode::Enter => g.click().then(|| format!("Now: {}", g.skin().name())),
                KeyCode::Char('r') => {
                    g.reset();
                    Some("Counter and best reset".to_string())
                }
                _ => None,
            },
        }
    }
}

fn handle_hangman(game: &mut Hangman, code: KeyCode) -> Option<String> {
    let KeyCode::Char(c) = code else {
        return None;
    };
    if !c.is_alphabetic() {
        return None;
    }
    let letter = c.to_lowercase().next().unwrap_or(c);
    match game.guess(letter) {
        GuessResult::Ignored if game.is_used(letter) => Some(format!("Already tried '{}'", letter)),
        GuessResult::Miss => Some(format!("No '{}'", letter)),
        _ => None,
    }
}

fn handle_quiz(quiz: &mut Quiz, input: &mut String, code: KeyCode) -> Option<String> {
    if quiz.awaiting_next() {
        if is_select(code) {
            quiz.next();
            input.clear();
        }
        return None;
    }
    match code {
        KeyCode::Char(c) if (c.is_ascii_digit() || c == '-') && input.len() < MAX_ANSWER_LEN => {
            input.push(c);
            None
        }
        KeyCode::Backspace => {
            input.pop();
            None
        }
        KeyCode::Enter => {
            let feedback = quiz.submit(input);
            debug!(?feedback, "quiz submit");
            if feedback == Feedback::NotANumber {
                input.clear();
                Some("Type a number".to_string())
            } else {
                None
            }
        }
        _ => None,
    }
}

fn handle_memory(memory: &mut Memory, cursor: &mut usize, code: KeyCode) -> Option<String> {
    let rows = memory::CARD_COUNT / MEMORY_COLUMNS;
    if let Some(dir) = key_direction(code, true) {
        let pos = GridPos::new(*cursor / MEMORY_COLUMNS, *cursor % MEMORY_COLUMNS);
        let next = move_cursor(pos, dir, rows, MEMORY_COLUMNS);
        *cursor = next.row * MEMORY_COLUMNS + next.col;
        return None;
    }
    if !is_select(code) {
        return None;
    }
    match memory.flip(*cursor) {
        Flip::Match => Some(format!(
            "Pair! {}/{}",
            memory.matched_pairs(),
            memory::PAIRS
        )),
        Flip::Ignored if memory.is_locked() => Some("Wait...".to_string()),
        _ => None,
    }
}

fn handle_pong(pong: &mut Pong, code: KeyCode) -> Option<String> {
    if pong.phase() != Phase::Setup {
        return None;
    }
    let speed = pong.speed();
    let wanted = match code {
        KeyCode::Left | KeyCode::Char('-') => speed.saturating_sub(1),
        KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => speed + 1,
        c if is_select(c) => {
            pong.start();
            return None;
        }
        _ => return None,
    };
    match pong.set_speed(wanted) {
        Ok(()) => Some(format!("Ball speed {}", pong.speed())),
        Err(e) => Some(e.to_string()),
    }
}

fn handle_word_search(
    search: &mut WordSearch,
    cursor: &mut GridPos,
    anchor: &mut Option<GridPos>,
    code: KeyCode,
) -> Option<String> {
    if let Some(dir) = key_direction(code, true) {
        *cursor = move_cursor(*cursor, dir, wordsearch::GRID_SIZE, wordsearch::GRID_SIZE);
        return None;
    }
    match code {
        KeyCode::Backspace => {
            *anchor = None;
            None
        }
        c if is_select(c) => match anchor.take() {
            None => {
                *anchor = Some(*cursor);
                None
            }
            Some(start) => match search.select(start, *cursor) {
                Selection::Found(word) => Some(format!("Found {}!", word)),
                Selection::Incorrect => Some("Not a word".to_string()),
                Selection::Ignored => None,
            },
        },
        _ => None,
    }
}

fn handle_sudoku(
    sudoku: &mut Sudoku,
    cursor: &mut GridPos,
    errors: &mut Vec<GridPos>,
    code: KeyCode,
) -> Option<String> {
    if let Some(dir) = key_direction(code, true) {
        *cursor = move_cursor(*cursor, dir, sudoku::SIZE, sudoku::SIZE);
        return None;
    }
    match code {
        KeyCode::Char(c @ '1'..='9') => {
            let value = c as u8 - b'0';
            if sudoku.set(*cursor, value) {
                errors.clear();
            }
            None
        }
        KeyCode::Char('0') | KeyCode::Char('.') | KeyCode::Backspace | KeyCode::Delete => {
            if sudoku.clear(*cursor) {
                errors.clear();
            }
            None
        }
        KeyCode::Char('c') => match sudoku.check() {
            Check::Solved => Some("Solved!".to_string()),
            Check::Incomplete => {
                errors.clear();
                Some("No mistakes so far".to_string())
            }
            Check::Errors(wrong) => {
                let message = format!("{} wrong", wrong.len());
                *errors = wrong;
                Some(message)
            }
        },
        KeyCode::Char('x') => {
            sudoku.reset();
            errors.clear();
            Some("Board reset".to_string())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_core::games::sudoku::{Board, Puzzle};
    use crossterm::event::{KeyEventKind, KeyModifiers};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    fn session(kind: GameKind) -> Session {
        Session::start(kind, &GameSettings::default(), None).unwrap()
    }

    #[test]
    fn test_every_game_starts() {
        for kind in GameKind::ALL {
            let s = session(kind);
            assert_eq!(s.kind(), kind);
            assert_eq!(s.status(), Status::Playing);
        }
    }

    #[test]
    fn test_invalid_settings_fail_to_start() {
        let settings = GameSettings {
            pong_speed: 40,
            ..GameSettings::default()
        };
        assert!(Session::start(GameKind::Pong, &settings, None).is_err());
    }

    #[test]
    fn test_only_quiz_and_counter_record_on_leave() {
        let leaving: Vec<GameKind> = GameKind::ALL
            .into_iter()
            .filter(|&k| session(k).records_on_leave())
            .collect();
        assert_eq!(leaving, vec![GameKind::Quiz, GameKind::Counter]);
    }

    #[test]
    fn test_counter_starts_from_best() {
        let mut s = Session::start(GameKind::Counter, &GameSettings::default(), Some(12)).unwrap();
        assert_eq!(s.score(), 12);
        s.handle_key(press(KeyCode::Char(' ')));
        assert_eq!(s.score(), 12);
        assert_eq!(
            s.handle_key(press(KeyCode::Char('r'))).as_deref(),
            Some("Counter and best reset")
        );
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn test_played_time_accumulates() {
        let mut s = session(GameKind::Maze);
        let held = HeldKeys::new(Duration::from_millis(150));
        s.tick(Duration::from_secs(2), &held, Instant::now());
        assert_eq!(s.played(), Duration::from_secs(2));
        assert_eq!(s.score(), 2);
    }

    #[test]
    fn test_quiz_input_and_submit() {
        let mut s = session(GameKind::Quiz);
        let answer = match &s.game {
            ActiveGame::Quiz { quiz, .. } => quiz.question().answer(),
            _ => unreachable!(),
        };
        for c in answer.to_string().chars() {
            s.handle_key(press(KeyCode::Char(c)));
        }
        s.handle_key(press(KeyCode::Char('x')));
        s.handle_key(press(KeyCode::Enter));
        assert_eq!(s.score(), 1);
        // Enter moves on to a fresh question with an empty answer
        s.handle_key(press(KeyCode::Enter));
        match &s.game {
            ActiveGame::Quiz { quiz, input } => {
                assert!(!quiz.awaiting_next());
                assert!(input.is_empty());
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_quiz_rejects_empty_answer() {
        let mut s = session(GameKind::Quiz);
        assert_eq!(s.handle_key(press(KeyCode::Enter)).as_deref(), Some("Type a number"));
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn test_memory_cursor_clamps_at_edges() {
        let mut s = session(GameKind::Memory);
        s.handle_key(press(KeyCode::Down));
        s.handle_key(press(KeyCode::Right));
        s.handle_key(press(KeyCode::Down));
        match &s.game {
            ActiveGame::Memory { cursor, .. } => assert_eq!(*cursor, MEMORY_COLUMNS + 1),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_pong_speed_setup() {
        let mut s = session(GameKind::Pong);
        assert_eq!(s.handle_key(press(KeyCode::Right)).as_deref(), Some("Ball speed 6"));
        for _ in 0..20 {
            s.handle_key(press(KeyCode::Right));
        }
        match &s.game {
            ActiveGame::Pong(p) => assert_eq!(p.speed(), 15),
            _ => unreachable!(),
        }
        s.handle_key(press(KeyCode::Enter));
        match &s.game {
            ActiveGame::Pong(p) => assert_eq!(p.phase(), Phase::Running),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_word_search_anchor_then_select() {
        let mut s = session(GameKind::WordSearch);
        s.handle_key(press(KeyCode::Char(' ')));
        s.handle_key(press(KeyCode::Right));
        s.handle_key(press(KeyCode::Down));
        s.handle_key(press(KeyCode::Down));
        // (0,0) to (2,1) is not a straight line
        assert_eq!(s.handle_key(press(KeyCode::Char(' '))).as_deref(), Some("Not a word"));
        match &s.game {
            ActiveGame::WordSearch { anchor, cursor, .. } => {
                assert_eq!(*anchor, None);
                assert_eq!(*cursor, GridPos::new(2, 1));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_sudoku_check_marks_errors() {
        let puzzle = Puzzle {
            givens: Board::parse(
                "53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79",
            )
            .unwrap(),
            solution: Board::parse(
                "534678912672195348198342567859761423426853791713924856961537284287419635345286179",
            )
            .unwrap(),
        };
        let game = ActiveGame::Sudoku {
            sudoku: Sudoku::from_puzzle(Difficulty::Easy, puzzle),
            cursor: GridPos::new(0, 2),
            errors: Vec::new(),
        };
        let mut s = Session::with_game(GameKind::Sudoku, game);
        s.handle_key(press(KeyCode::Char('1')));
        assert_eq!(s.handle_key(press(KeyCode::Char('c'))).as_deref(), Some("1 wrong"));
        match &s.game {
            ActiveGame::Sudoku { errors, .. } => assert_eq!(errors, &vec![GridPos::new(0, 2)]),
            _ => unreachable!(),
        }
        s.handle_key(press(KeyCode::Char('4')));
        match &s.game {
            ActiveGame::Sudoku { sudoku, errors, .. } => {
                assert!(errors.is_empty());
                assert_eq!(sudoku.value(GridPos::new(0, 2)), Some(4));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_hangman_repeat_guess_message() {
        let game = ActiveGame::Hangman(Hangman::with_phrase("hola mundo"));
        let mut s = Session::with_game(GameKind::Hangman, game);
        assert_eq!(s.handle_key(press(KeyCode::Char('H'))), None);
        assert_eq!(
            s.handle_key(press(KeyCode::Char('h'))).as_deref(),
            Some("Already tried 'h'")
        );
        assert_eq!(s.handle_key(press(KeyCode::Char('z'))).as_deref(), Some("No 'z'"));
    }

    #[test]
    fn test_asteroids_hold_thrust() {
        let mut s = session(GameKind::Asteroids);
        let mut held = HeldKeys::new(Duration::from_millis(150));
        let now = Instant::now();
        held.handle(&press(KeyCode::Up), now);
        s.tick(Duration::from_millis(16), &held, now);
        match &s.game {
            ActiveGame::Asteroids(g) => assert!(g.ship().thrusting),
            _ => unreachable!(),
        }
    }
}
