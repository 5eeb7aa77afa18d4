use crate::animations::Celebration;
use crate::config::Config;
use crate::input::HeldKeys;
use crate::scores::{GameResult, ScoreBook, ScoreRecord, ScoreStore};
use crate::session::{GameSettings, Session};
use crate::theme::{Theme, ThemeName};
use arcade_core::{GameKind, Status};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Menu shortcut for each entry of `GameKind::ALL`
pub const SHORTCUTS: [char; 14] = ['1', '2', '3', '4', '5', '6', '7', '8', '9', '0', 'a', 'b', 'c', 'd'];

/// Longest step a game is advanced by, so a stalled terminal does not teleport anything
const MAX_TICK: Duration = Duration::from_millis(250);

const MESSAGE_TIME: Duration = Duration::from_secs(3);

/// Result of handling a key press
pub enum AppAction {
    Continue,
    Quit,
}

/// Current screen state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    /// Game list
    Menu,
    /// A game owns the input
    Playing,
    /// Game suspended by Esc
    Paused,
    /// Result screen with the celebration
    GameOver,
    /// Best scores per game
    Scores,
    Help,
}

/// What the game-over screen reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub kind: GameKind,
    pub status: Status,
    pub score: u64,
    pub best: Option<u64>,
    pub new_best: bool,
}

/// The main application state
pub struct App {
    /// Terminal size in cells, as last drawn
    pub size: (u16, u16),
    pub theme: Theme,
    pub theme_name: ThemeName,
    pub config: Config,
    settings: GameSettings,
    store: Box<dyn ScoreStore>,
    /// Scores as last loaded or saved
    pub book: ScoreBook,
    /// Current (or just finished) game
    pub session: Option<Session>,
    pub screen_state: ScreenState,
    /// Index into `GameKind::ALL` on the menu
    pub menu_selection: usize,
    /// Index into `GameKind::ALL` on the scores screen
    pub scores_selection: usize,
    pub held: HeldKeys,
    /// Message to display
    pub message: Option<String>,
    message_timer: Duration,
    pub last_outcome: Option<Outcome>,
    pub celebration: Option<Celebration>,
    /// Whether the current game has been recorded (to avoid double recording)
    game_recorded: bool,
    last_update: Instant,
}

impl App {
    pub fn new(config: Config, settings: GameSettings, mut store: Box<dyn ScoreStore>) -> Self {
        let book = store.load();
        info!(store = store.name(), "scores loaded");
        let theme_name = config.theme;
        let held = HeldKeys::new(config.hold());
        Self {
            size: (80, 24),
            theme: Theme::named(theme_name),
            theme_name,
            config,
            settings,
            store,
            book,
            session: None,
            screen_state: ScreenState::Menu,
            menu_selection: 0,
            scores_selection: 0,
            held,
            message: None,
            message_timer: Duration::ZERO,
            last_outcome: None,
            celebration: None,
            game_recorded: false,
            last_update: Instant::now(),
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
    }

    /// Name of the score backend, for the scores screen
    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    /// Get the tick rate based on current screen
    pub fn get_tick_rate(&self) -> Duration {
        match self.screen_state {
            ScreenState::Playing => self.config.frame(),
            // 30 FPS for the particles
            ScreenState::GameOver => Duration::from_millis(33),
            ScreenState::Menu | ScreenState::Paused | ScreenState::Scores | ScreenState::Help => {
                Duration::from_millis(100)
            }
        }
    }

    /// Update games, animations and timers (called every tick)
    pub fn tick(&mut self) {
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last_update).min(MAX_TICK);
        self.last_update = now;
        self.tick_by(dt, now);
    }

    pub fn tick_by(&mut self, dt: Duration, now: Instant) {
        if self.message.is_some() {
            self.message_timer = self.message_timer.saturating_sub(dt);
            if self.message_timer.is_zero() {
                self.message = None;
            }
        }

        match self.screen_state {
            ScreenState::Playing => {
                let Some(session) = self.session.as_mut() else {
                    self.screen_state = ScreenState::Menu;
                    return;
                };
                session.tick(dt, &self.held, now);
                match session.status() {
                    Status::Playing => {}
                    Status::Won => self.finish_game(GameResult::Win),
                    Status::Lost => self.finish_game(GameResult::Loss),
                }
            }
            ScreenState::GameOver => {
                if let Some(celebration) = self.celebration.as_mut() {
                    celebration.resize(self.size.0, self.size.1);
                    celebration.update();
                }
            }
            ScreenState::Menu | ScreenState::Paused | ScreenState::Scores | ScreenState::Help => {}
        }
    }

    /// Show a temporary message
    pub fn show_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_timer = MESSAGE_TIME;
    }

    /// Start `kind` and switch to the playing screen
    pub fn start_game(&mut self, kind: GameKind) {
        let best = self.book.best(kind);
        match Session::start(kind, &self.settings, best) {
            Ok(session) => {
                self.session = Some(session);
                self.game_recorded = false;
                self.last_outcome = None;
                self.celebration = None;
                self.held.clear();
                self.screen_state = ScreenState::Playing;
                self.show_message(&format!("{} - Esc to pause", kind.name()));
            }
            Err(e) => {
                warn!(game = %kind, error = %e, "could not start game");
                self.show_message(&format!("Cannot start {}: {}", kind.name(), e));
                self.screen_state = ScreenState::Menu;
            }
        }
    }

    /// Record the current game once and show the result
    fn finish_game(&mut self, result: GameResult) {
        let Some(outcome) = self.record_game(result) else {
            return;
        };
        self.celebration = Some(match outcome.status {
            Status::Won => Celebration::win(),
            _ => Celebration::loss(),
        });
        if let Some(c) = self.celebration.as_mut() {
            c.resize(self.size.0, self.size.1);
        }
        self.last_outcome = Some(outcome);
        self.held.clear();
        self.screen_state = ScreenState::GameOver;
    }

    /// Write the current game into the score book and save it
    fn record_game(&mut self, result: GameResult) -> Option<Outcome> {
        if self.game_recorded {
            return None;
        }
        let session = self.session.as_ref()?;
        self.game_recorded = true;

        let kind = session.kind();
        let score = session.score();
        let status = session.status();
        let new_best = if kind == GameKind::Counter {
            // The counter keeps its own best, including a reset to zero
            let improved = self.book.best(kind).map_or(score > 0, |best| score > best);
            self.book.set_best(kind, score);
            improved
        } else {
            let record = ScoreRecord::new(
                kind,
                &self.config.player_name,
                score,
                result,
                session.played().as_secs(),
            );
            self.book.record(record)
        };
        info!(game = %kind, score, ?result, new_best, "game recorded");

        if let Err(e) = self.store.save(&self.book) {
            warn!(error = %e, store = self.store.name(), "could not save scores");
            self.show_message(&format!("Scores not saved: {}", e));
        }

        Some(Outcome {
            kind,
            status,
            score,
            best: self.book.best(kind),
            new_best,
        })
    }

    /// Leave the current game for the menu
    fn leave_game(&mut self) {
        let keep = self
            .session
            .as_ref()
            .map(|s| (s.kind(), s.records_on_leave() && !s.status().is_over()));
        match keep {
            Some((_, true)) => {
                self.record_game(GameResult::Abandoned);
            }
            Some((kind, false)) => info!(game = %kind, "game abandoned"),
            None => {}
        }
        self.session = None;
        self.celebration = None;
        self.held.clear();
        self.screen_state = ScreenState::Menu;
    }

    /// Handle a key event. Releases only update the held-key state.
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        self.held.handle(&key, Instant::now());
        if key.kind == KeyEventKind::Release {
            return AppAction::Continue;
        }
        match self.screen_state {
            ScreenState::Menu => self.handle_menu_key(key),
            ScreenState::Playing => self.handle_game_key(key),
            ScreenState::Paused => self.handle_pause_key(key),
            ScreenState::GameOver => self.handle_game_over_key(key),
            ScreenState::Scores => self.handle_scores_key(key),
            ScreenState::Help => {
                self.screen_state = ScreenState::Menu;
                AppAction::Continue
            }
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) -> AppAction {
        let count = GameKind::ALL.len();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return AppAction::Quit,
            KeyCode::Up | KeyCode::Char('k') => {
                self.menu_selection = (self.menu_selection + count - 1) % count;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.menu_selection = (self.menu_selection + 1) % count;
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let kind = GameKind::ALL[self.menu_selection];
                self.start_game(kind);
            }
            KeyCode::Char('s') => {
                self.scores_selection = self.menu_selection;
                self.screen_state = ScreenState::Scores;
            }
            KeyCode::Char('?') | KeyCode::Char('h') => {
                self.screen_state = ScreenState::Help;
            }
            KeyCode::Char('t') => {
                self.theme_name = match self.theme_name {
                    ThemeName::Dark => ThemeName::Light,
                    ThemeName::Light => ThemeName::HighContrast,
                    ThemeName::HighContrast => ThemeName::Dark,
                };
                self.theme = Theme::named(self.theme_name);
                self.show_message(&format!("Theme: {}", self.theme_name));
            }
            KeyCode::Char(c) => {
                if let Some(index) = SHORTCUTS.iter().position(|&s| s == c) {
                    self.menu_selection = index;
                    self.start_game(GameKind::ALL[index]);
                }
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_game_key(&mut self, key: KeyEvent) -> AppAction {
        if key.code == KeyCode::Esc {
            self.held.clear();
            self.screen_state = ScreenState::Paused;
            return AppAction::Continue;
        }
        let message = self.session.as_mut().and_then(|s| s.handle_key(key));
        if let Some(msg) = message {
            self.show_message(&msg);
        }
        AppAction::Continue
    }

    fn handle_pause_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ') => {
                self.screen_state = ScreenState::Playing;
                // Paused time does not count
                self.last_update = Instant::now();
            }
            KeyCode::Char('r') => {
                if let Some(kind) = self.session.as_ref().map(Session::kind) {
                    self.leave_game();
                    self.start_game(kind);
                }
            }
            KeyCode::Char('q') => self.leave_game(),
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_game_over_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('r') => {
                if let Some(kind) = self.last_outcome.as_ref().map(|o| o.kind) {
                    self.start_game(kind);
                }
            }
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => {
                self.session = None;
                self.celebration = None;
                self.screen_state = ScreenState::Menu;
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_scores_key(&mut self, key: KeyEvent) -> AppAction {
        let count = GameKind::ALL.len();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.screen_state = ScreenState::Menu;
            }
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Up | KeyCode::Char('k') => {
                self.scores_selection = (self.scores_selection + count - 1) % count;
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Down | KeyCode::Char('j') => {
                self.scores_selection = (self.scores_selection + 1) % count;
            }
            _ => {}
        }
        AppAction::Continue
    }
}
