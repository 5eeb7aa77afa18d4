//! Drawing. Every frame is built in a [`Canvas`] and flushed as a diff.

pub mod arcade;
pub mod board;
pub mod canvas;
pub mod screens;
pub mod text;

use crate::app::{App, ScreenState};
use crate::scores::{format_score, format_time};
use crate::session::{ActiveGame, Session};
use crate::theme::Theme;
use arcade_core::games::{arkanoid, asteroids, jigsaw, memory, pong, wordsearch};
use arcade_core::GameKind;
use canvas::Canvas;
use crossterm::terminal;
use std::io::{self, Write};

/// A rectangle of terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Area {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Area {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w: w.max(0), h: h.max(0) }
    }

    /// A `w` x `h` block centred in this area; clipped to the top-left when it does not fit
    pub fn centered(&self, w: i32, h: i32) -> Area {
        Area::new(
            self.x + ((self.w - w) / 2).max(0),
            self.y + ((self.h - h) / 2).max(0),
            w,
            h,
        )
    }
}

pub fn render(out: &mut impl Write, canvas: &mut Canvas, app: &mut App) -> io::Result<()> {
    let (width, height) = terminal::size()?;
    canvas.resize(width, height);
    app.resize(width, height);
    draw(canvas, app);
    canvas.flush(out)
}

/// Build the frame for the current screen
pub fn draw(canvas: &mut Canvas, app: &App) {
    let theme = &app.theme;
    canvas.clear(theme.fg, theme.bg);

    match app.screen_state {
        ScreenState::Menu => screens::menu(canvas, app),
        ScreenState::Playing => draw_game(canvas, app),
        ScreenState::Paused => {
            draw_game(canvas, app);
            screens::paused(canvas, app);
        }
        ScreenState::GameOver => {
            draw_game(canvas, app);
            screens::game_over(canvas, app);
        }
        ScreenState::Scores => screens::scores(canvas, app),
        ScreenState::Help => screens::help(canvas, app),
    }

    if let Some(msg) = &app.message {
        let y = canvas.height() as i32 - 2;
        canvas.text_centered(y, msg, theme.info);
    }
}

/// Space between the HUD line and the message/footer lines
fn play_area(canvas: &Canvas) -> Area {
    Area::new(1, 2, canvas.width() as i32 - 2, canvas.height() as i32 - 5)
}

fn draw_game(canvas: &mut Canvas, app: &App) {
    let Some(session) = &app.session else {
        return;
    };
    let theme = &app.theme;
    let area = play_area(canvas);

    match &session.game {
        ActiveGame::Arkanoid(g) => arcade::arkanoid(canvas, area, g, theme),
        ActiveGame::Asteroids(g) => arcade::asteroids(canvas, area, g, theme),
        ActiveGame::Runner(g) => arcade::runner(canvas, area, g, theme),
        ActiveGame::Pong(g) => arcade::pong(canvas, area, g, theme),
        ActiveGame::Snake(g) => board::snake(canvas, area, g, theme),
        ActiveGame::Maze(g) => board::maze(canvas, area, g, theme),
        ActiveGame::Memory { memory, cursor } => board::memory(canvas, area, memory, *cursor, theme),
        ActiveGame::Jigsaw { jigsaw, picture, cursor } => {
            board::jigsaw(canvas, area, jigsaw, picture, *cursor, theme)
        }
        ActiveGame::WordSearch { search, cursor, anchor } => {
            board::word_search(canvas, area, search, *cursor, *anchor, theme)
        }
        ActiveGame::Sudoku { sudoku, cursor, errors } => board::sudoku(canvas, area, sudoku, *cursor, errors, theme),
        ActiveGame::Tetris(g) => board::tetris(canvas, area, g, theme),
        ActiveGame::Hangman(g) => text::hangman(canvas, area, g, theme),
        ActiveGame::Quiz { quiz, input } => text::quiz(canvas, area, quiz, input, theme),
        ActiveGame::Counter(g) => text::counter(canvas, area, g, theme),
    }

    draw_hud(canvas, app, session, theme);
    let footer = controls(session.kind());
    let y = canvas.height() as i32 - 1;
    canvas.text(1, y, footer, theme.key);
}

fn draw_hud(canvas: &mut Canvas, app: &App, session: &Session, theme: &Theme) {
    let kind = session.kind();
    canvas.text(1, 0, kind.name(), theme.title);
    let stats = hud(session);
    canvas.text(kind.name().chars().count() as i32 + 3, 0, &stats, theme.fg);

    let best = match app.book.best(kind) {
        Some(best) => format!("Best: {}", format_score(kind, best)),
        None => "Best: -".to_string(),
    };
    let x = canvas.width() as i32 - best.chars().count() as i32 - 1;
    canvas.text(x, 0, &best, theme.dim);
}

/// Status line for the running game
pub fn hud(session: &Session) -> String {
    let score = session.score();
    match &session.game {
        ActiveGame::Arkanoid(g) => format!(
            "Score {}  Lives {}  Stage {}/{}",
            score,
            g.lives(),
            g.stage(),
            arkanoid::STAGES.len()
        ),
        ActiveGame::Asteroids(g) => format!(
            "Score {}  Lives {}  Level {}/{}",
            score,
            g.lives(),
            g.level(),
            asteroids::TOTAL_LEVELS
        ),
        ActiveGame::Runner(g) => format!("Score {}  Speed {:.1}", score, g.speed()),
        ActiveGame::Snake(g) => format!("Score {}  Length {}", score, g.len()),
        ActiveGame::Hangman(g) => format!("Tries left {}", g.remaining_tries()),
        ActiveGame::Maze(g) => format!("Time {}  Moves {}", format_time(g.elapsed().as_secs()), g.moves()),
        ActiveGame::Quiz { quiz, .. } => format!(
            "Score {}  Answered {}  Best streak {}",
            score,
            quiz.answered(),
            quiz.best_streak()
        ),
        ActiveGame::Memory { memory: m, .. } => format!(
            "Attempts {}  Pairs {}/{}  Deck {}",
            m.attempts(),
            m.matched_pairs(),
            memory::PAIRS,
            m.deck().name()
        ),
        ActiveGame::Pong(g) => format!(
            "{} {}  {} {}  Ball speed {}",
            pong::Side::Left.label(),
            g.paddle(pong::Side::Left).score,
            pong::Side::Right.label(),
            g.paddle(pong::Side::Right).score,
            g.speed()
        ),
        ActiveGame::Jigsaw { jigsaw: j, .. } => format!(
            "Moves {}  {}x{} (max {})",
            j.moves(),
            j.size(),
            j.size(),
            jigsaw::MAX_SIZE
        ),
        ActiveGame::WordSearch { search, .. } => format!(
            "Found {}/{}  Time {}",
            search.found_count(),
            search.placements().len(),
            format_time(search.elapsed().as_secs())
        ),
        ActiveGame::Sudoku { sudoku, .. } => format!(
            "{}  Time {}",
            sudoku.difficulty(),
            format_time(sudoku.elapsed().as_secs())
        ),
        ActiveGame::Tetris(g) => format!("Score {}  Lines {}  Level {}", score, g.lines(), g.level()),
        ActiveGame::Counter(g) => format!("Count {}  Best {}", g.count(), g.best()),
    }
}

/// Key help shown at the bottom of a game
pub fn controls(kind: GameKind) -> &'static str {
    match kind {
        GameKind::Arkanoid => "←/→ move  Space launch  Esc pause",
        GameKind::Asteroids => "←/→ turn  ↑ thrust  Space fire  Esc pause",
        GameKind::Runner => "Space/↑ jump  Esc pause",
        GameKind::Snake => "Arrows/WASD steer  Esc pause",
        GameKind::Hangman => "Type a letter  Esc pause",
        GameKind::Maze => "Arrows/WASD/hjkl move  Esc pause",
        GameKind::Quiz => "Digits answer  Enter submit/next  Esc pause",
        GameKind::Memory => "Arrows move  Enter/Space flip  Esc pause",
        GameKind::Pong => "W/S left  ↑/↓ right  ←/→ speed  Enter start  Esc pause",
        GameKind::Jigsaw => "Arrows move  Enter/Space pick/swap  Esc pause",
        GameKind::WordSearch => "Arrows move  Space mark start/end  Backspace cancel  Esc pause",
        GameKind::Sudoku => "Arrows move  1-9 set  0/Del clear  c check  x reset  Esc pause",
        GameKind::Tetris => "←/→ move  ↑ rotate  ↓ soft drop  Space hard drop  p pause",
        GameKind::Counter => "Space/Enter click  r reset  Esc pause",
    }
}

/// Cells a word-search selection would cover, if it is a straight line
pub fn selection_cells(anchor: Option<arcade_core::GridPos>, cursor: arcade_core::GridPos) -> Vec<arcade_core::GridPos> {
    anchor
        .and_then(|start| wordsearch::line(start, cursor))
        .unwrap_or_default()
}
