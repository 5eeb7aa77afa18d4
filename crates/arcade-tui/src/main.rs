#![allow(clippy::needless_range_loop)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]

mod animations;
mod app;
mod cli;
mod config;
mod input;
mod logging;
mod render;
mod scores;
mod session;
mod theme;

use anyhow::Context;
use app::App;
use clap::Parser;
use cli::{Cli, Command};
use config::Config;
use crossterm::{
    cursor::{Hide, Show},
    event::{
        self, Event, KeyCode, KeyModifiers, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use render::canvas::Canvas;
use scores::{JsonFileStore, ScoreStore};
use session::GameSettings;
use std::io::{self, Write};
use std::time::{Duration, Instant};
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_from(cli.config.clone()).context("loading configuration")?;
    cli.apply(&mut config);
    config.validate().context("invalid configuration")?;

    let data_dir = config.data_dir();
    if let Err(e) = logging::init_logging(cli.verbosity(), &data_dir) {
        eprintln!("warning: logging disabled: {e:#}");
    }
    info!(data_dir = %data_dir.display(), "arcade starting");

    let mut store = JsonFileStore::in_dir(&data_dir);
    info!(path = %store.path().display(), "score file");
    let mut stdout = io::stdout();
    match cli.command {
        Some(Command::List) => {
            cli::list_games(&mut stdout)?;
            return Ok(());
        }
        Some(Command::Scores { game }) => {
            let book = store.load();
            cli::print_scores(&mut stdout, &book, game)?;
            return Ok(());
        }
        Some(Command::ResetScores { game }) => {
            cli::reset_scores(&mut store, game).context("resetting scores")?;
            match game {
                Some(kind) => println!("Scores cleared for {}", kind.name()),
                None => println!("All scores cleared"),
            }
            return Ok(());
        }
        Some(Command::Play { .. }) | None => {}
    }

    // Read the picture before the terminal is taken over so errors print normally
    let picture = config.jigsaw_picture().context("loading jigsaw picture")?;
    let settings = GameSettings::from_config(&config, picture);
    let mut app = App::new(config, settings, Box::new(store));
    if let Some(Command::Play { game }) = cli.command {
        app.start_game(game);
    }

    // Setup terminal
    enable_raw_mode().context("enabling raw mode")?;
    execute!(stdout, EnterAlternateScreen, Hide).context("entering alternate screen")?;
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                    | KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
            )
        )?;
        app.held.set_release_events(true);
    }

    let result = run_app(&mut stdout, &mut app);

    // Restore terminal
    if enhanced {
        let _ = execute!(stdout, PopKeyboardEnhancementFlags);
    }
    execute!(stdout, Show, LeaveAlternateScreen)?;
    disable_raw_mode()?;

    if let Err(e) = &result {
        error!(error = %e, "terminal loop failed");
    }
    info!("arcade exiting");
    result.context("running the terminal loop")
}

fn run_app(stdout: &mut io::Stdout, app: &mut App) -> io::Result<()> {
    let (width, height) = crossterm::terminal::size()?;
    let mut canvas = Canvas::new(width, height);
    let mut last_tick = Instant::now();

    loop {
        // Determine tick rate based on screen mode
        let tick_rate = app.get_tick_rate();

        render::render(stdout, &mut canvas, app)?;
        stdout.flush()?;

        // Handle input with timeout for animation updates
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout.min(Duration::from_millis(33)))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                        break;
                    }

                    match app.handle_key(key) {
                        app::AppAction::Continue => {}
                        app::AppAction::Quit => break,
                    }
                }
                Event::Resize(..) => canvas.invalidate(),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
