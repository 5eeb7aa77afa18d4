//! Command-line interface for the `arcade` binary.

use std::io::{self, Write};
use std::path::PathBuf;

use arcade_core::GameKind;
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::logging::Verbosity;
use crate::scores::{format_score, format_time, ScoreBook, ScoreError, ScoreStore};
use crate::theme::ThemeName;

/// Plays listed under `arcade scores`
const RECENT_PLAYS: usize = 5;

/// arcade - fourteen small games in your terminal
#[derive(Debug, Parser)]
#[command(name = "arcade")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Where scores and the log are kept
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Colour theme
    #[arg(long, global = true, value_enum)]
    pub theme: Option<ThemeName>,

    /// Name recorded with scores
    #[arg(long, global = true, value_name = "NAME")]
    pub player: Option<String>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Without a command the game menu opens
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start a game directly
    Play {
        /// Game id, see `arcade list`
        game: GameKind,
    },

    /// Print the available games
    List,

    /// Print best scores
    Scores {
        /// Only this game
        game: Option<GameKind>,
    },

    /// Clear cached scores
    ResetScores {
        /// Only this game
        game: Option<GameKind>,
    },
}

impl Cli {
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }

    /// Command-line options win over every config source
    pub fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.data_dir {
            config.data_dir = Some(dir.clone());
        }
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        if let Some(player) = &self.player {
            config.player_name = player.clone();
        }
    }
}

/// `arcade list`
pub fn list_games(out: &mut impl Write) -> io::Result<()> {
    for kind in GameKind::ALL {
        writeln!(out, "{:<12} {:<12} {}", kind.id(), kind.name(), kind.description())?;
    }
    Ok(())
}

/// `arcade scores [GAME]`
pub fn print_scores(out: &mut impl Write, book: &ScoreBook, game: Option<GameKind>) -> io::Result<()> {
    let games: Vec<GameKind> = match game {
        Some(kind) => vec![kind],
        None => GameKind::ALL.to_vec(),
    };
    for kind in games {
        let best = book
            .best(kind)
            .map_or_else(|| "-".to_string(), |b| format_score(kind, b));
        writeln!(out, "{:<12} best {:<16} played {}", kind.name(), best, book.plays(kind))?;
        if game.is_some() {
            for (i, record) in book.top(kind).iter().enumerate() {
                writeln!(
                    out,
                    "  {:>2}. {:<16} {:>14}  {}",
                    i + 1,
                    record.player,
                    format_score(kind, record.score),
                    format_time(record.duration_secs)
                )?;
            }
        }
    }
    if game.is_none() {
        let recent: Vec<_> = book.recent(RECENT_PLAYS).collect();
        if !recent.is_empty() {
            writeln!(out, "\nRecent")?;
        }
        for record in recent {
            writeln!(
                out,
                "  {:<12} {:<16} {:>14}",
                record.game.name(),
                record.player,
                format_score(record.game, record.score)
            )?;
        }
    }
    Ok(())
}

/// `arcade reset-scores [GAME]`
///
/// # Errors
///
/// Returns an error if the emptied book cannot be saved.
pub fn reset_scores(store: &mut dyn ScoreStore, game: Option<GameKind>) -> Result<(), ScoreError> {
    let mut book = store.load();
    book.clear(game);
    store.save(&book)
}
