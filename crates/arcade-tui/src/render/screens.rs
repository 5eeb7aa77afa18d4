use super::canvas::Canvas;
use super::Area;
use crate::app::{App, SHORTCUTS};
use crate::scores::{format_score, format_time, GameResult};
use arcade_core::{GameKind, Status};

const TITLE: [&str; 5] = [
    "   _   ___  ___   _   ___  ___ ",
    "  /_\\ | _ \\/ __| /_\\ |   \\| __|",
    " / _ \\|   / (__ / _ \\| |) | _| ",
    "/_/ \\_\\_|_\\\\___/_/ \\_\\___/|___|",
    "",
];

fn screen_area(canvas: &Canvas) -> Area {
    Area::new(0, 0, canvas.width() as i32, canvas.height() as i32)
}

/// Bordered box with a filled interior
fn panel(canvas: &mut Canvas, area: Area, app: &App) {
    let theme = &app.theme;
    for y in area.y..area.y + area.h {
        for x in area.x..area.x + area.w {
            canvas.put_bg(x, y, ' ', theme.fg, theme.bg);
        }
    }
    canvas.frame(area.x, area.y, area.w, area.h, theme.border);
}

fn centered_in(canvas: &mut Canvas, area: Area, y: i32, s: &str, fg: crossterm::style::Color) {
    let x = area.x + (area.w - s.chars().count() as i32) / 2;
    canvas.text(x, y, s, fg);
}

pub fn menu(canvas: &mut Canvas, app: &App) {
    let theme = &app.theme;
    let screen = screen_area(canvas);
    let list_h = GameKind::ALL.len() as i32;
    let block = screen.centered(64, TITLE.len() as i32 + list_h + 4);

    for (i, line) in TITLE.iter().enumerate() {
        centered_in(canvas, block, block.y + i as i32, line, theme.title);
    }

    let top = block.y + TITLE.len() as i32 + 1;
    for (i, kind) in GameKind::ALL.iter().enumerate() {
        let y = top + i as i32;
        let selected = i == app.menu_selection;
        let (fg, bg) = if selected {
            (theme.title, theme.selected_bg)
        } else {
            (theme.fg, theme.bg)
        };
        let best = app
            .book
            .best(*kind)
            .map(|b| format_score(*kind, b))
            .unwrap_or_default();
        let line = format!(
            " {}  {:<12} {:<30} {:>14} ",
            SHORTCUTS[i],
            kind.name(),
            kind.description(),
            best
        );
        canvas.text_bg(block.x, y, &line, fg, bg);
        canvas.put_bg(block.x + 1, y, SHORTCUTS[i], theme.key, bg);
    }

    let footer = "↑/↓ select  Enter play  s scores  ? help  t theme  q quit";
    centered_in(canvas, screen, top + list_h + 2, footer, theme.dim);
    let player = format!("Player: {}", app.config.player_name);
    canvas.text(1, canvas.height() as i32 - 1, &player, theme.dim);
}

pub fn paused(canvas: &mut Canvas, app: &App) {
    let theme = &app.theme;
    let area = screen_area(canvas).centered(30, 7);
    panel(canvas, area, app);
    centered_in(canvas, area, area.y + 1, "PAUSED", theme.title);
    centered_in(canvas, area, area.y + 3, "Esc/Enter  resume", theme.fg);
    centered_in(canvas, area, area.y + 4, "r          restart", theme.fg);
    centered_in(canvas, area, area.y + 5, "q          menu   ", theme.fg);
}

pub fn game_over(canvas: &mut Canvas, app: &App) {
    let theme = &app.theme;
    if let Some(celebration) = &app.celebration {
        for p in celebration.particles() {
            canvas.put(p.x as i32, p.y as i32, p.char, p.color);
        }
    }
    let Some(outcome) = &app.last_outcome else {
        return;
    };

    let area = screen_area(canvas).centered(40, 9);
    panel(canvas, area, app);

    let (title, color) = match (outcome.kind, outcome.status) {
        (GameKind::Pong, _) => ("MATCH OVER", theme.title),
        (_, Status::Won) => ("YOU WIN!", theme.success),
        _ => ("GAME OVER", theme.error),
    };
    centered_in(canvas, area, area.y + 1, title, color);

    let winner = app.session.as_ref().and_then(|s| match &s.game {
        crate::session::ActiveGame::Pong(p) => p.winner().map(|side| format!("{} wins", side.label())),
        crate::session::ActiveGame::Hangman(h) if outcome.status == Status::Lost => {
            Some(format!("It was: {}", h.phrase()))
        }
        _ => None,
    });
    if let Some(line) = winner {
        centered_in(canvas, area, area.y + 2, &line, theme.info);
    }

    let score = format!("Score: {}", format_score(outcome.kind, outcome.score));
    centered_in(canvas, area, area.y + 4, &score, theme.fg);
    let best_line = if outcome.new_best {
        "New best!".to_string()
    } else {
        match outcome.best {
            Some(best) => format!("Best: {}", format_score(outcome.kind, best)),
            None => "No best yet".to_string(),
        }
    };
    let best_color = if outcome.new_best { theme.success } else { theme.dim };
    centered_in(canvas, area, area.y + 5, &best_line, best_color);
    centered_in(canvas, area, area.y + 7, "r again   Enter menu", theme.key);
}

fn result_label(result: GameResult) -> &'static str {
    match result {
        GameResult::Win => "win",
        GameResult::Loss => "loss",
        GameResult::Abandoned => "left",
    }
}

pub fn scores(canvas: &mut Canvas, app: &App) {
    let theme = &app.theme;
    let screen = screen_area(canvas);
    let kind = GameKind::ALL[app.scores_selection % GameKind::ALL.len()];
    let block = screen.centered(56, 18);

    let title = format!("◀  {}  ▶", kind.name());
    centered_in(canvas, block, block.y, &title, theme.title);
    let summary = format!(
        "Played {}   Best {}",
        app.book.plays(kind),
        app.book
            .best(kind)
            .map_or_else(|| "-".to_string(), |b| format_score(kind, b))
    );
    centered_in(canvas, block, block.y + 1, &summary, theme.fg);

    let header = format!("{:>3}  {:<16} {:>14} {:>8}  {}", "#", "Player", "Score", "Time", "Result");
    canvas.text(block.x, block.y + 3, &header, theme.dim);

    let top = app.book.top(kind);
    if top.is_empty() {
        centered_in(canvas, block, block.y + 5, "No scores yet", theme.dim);
    }
    for (i, record) in top.iter().enumerate() {
        let line = format!(
            "{:>3}  {:<16} {:>14} {:>8}  {}",
            i + 1,
            record.player.chars().take(16).collect::<String>(),
            format_score(kind, record.score),
            format_time(record.duration_secs),
            result_label(record.result)
        );
        let color = if i == 0 { theme.success } else { theme.fg };
        canvas.text(block.x, block.y + 4 + i as i32, &line, color);
    }

    let footer = format!("←/→ game  Esc back   ({} store)", app.store_name());
    centered_in(canvas, block, block.y + block.h - 1, &footer, theme.dim);
}

const HELP: [&str; 12] = [
    "Pick a game from the menu with the arrows and Enter,",
    "or press its shortcut key.",
    "",
    "In a game, Esc pauses. From the pause box, r restarts",
    "and q goes back to the menu.",
    "",
    "Each game shows its own keys on the bottom line.",
    "Scores are kept per game; the scores screen (s) lists",
    "the ten best of each.",
    "",
    "Quiz and counter scores are kept when you leave them.",
    "Press any key to go back.",
];

pub fn help(canvas: &mut Canvas, app: &App) {
    let theme = &app.theme;
    let block = screen_area(canvas).centered(56, HELP.len() as i32 + 2);
    centered_in(canvas, block, block.y, "HELP", theme.title);
    for (i, line) in HELP.iter().enumerate() {
        canvas.text(block.x, block.y + 2 + i as i32, line, theme.fg);
    }
}
