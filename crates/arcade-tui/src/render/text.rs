//! Games that are mostly words and numbers.

use super::canvas::Canvas;
use super::Area;
use crate::theme::Theme;
use arcade_core::games::counter::{Counter, Skin};
use arcade_core::games::hangman::{self, Hangman, ALPHABET};
use arcade_core::games::quiz::{Feedback, Quiz};
use arcade_core::{Playable, Status};

/// Gallows by number of errors, one frame per error up to the last try
const GALLOWS: [[&str; 6]; hangman::MAX_ERRORS as usize + 1] = [
    ["  +---+", "  |   |", "      |", "      |", "      |", "========"],
    ["  +---+", "  |   |", "  O   |", "      |", "      |", "========"],
    ["  +---+", "  |   |", "  O   |", "  |   |", "      |", "========"],
    ["  +---+", "  |   |", "  O   |", " /|\\  |", "      |", "========"],
    ["  +---+", "  |   |", "  O   |", " /|\\  |", " / \\  |", "========"],
];

pub fn hangman(canvas: &mut Canvas, area: Area, game: &Hangman, theme: &Theme) {
    let masked = game.masked();
    let width = (masked.chars().count() as i32).max(ALPHABET.len() as i32 * 2).max(10);
    let block = area.centered(width, 14);

    let frame = GALLOWS[(game.errors() as usize).min(GALLOWS.len() - 1)];
    let gallows_color = match game.status() {
        Status::Lost => theme.error,
        Status::Won => theme.success,
        Status::Playing => theme.fg,
    };
    let gx = block.x + (block.w - 8) / 2;
    for (i, line) in frame.iter().enumerate() {
        canvas.text(gx, block.y + i as i32, line, gallows_color);
    }

    let phrase_color = if game.status() == Status::Lost { theme.error } else { theme.title };
    let px = block.x + (block.w - masked.chars().count() as i32) / 2;
    canvas.text(px, block.y + 8, &masked, phrase_color);

    // Keyboard: used letters greyed, misses in red
    let ax = block.x + (block.w - ALPHABET.len() as i32 * 2) / 2;
    for (i, letter) in ALPHABET.iter().enumerate() {
        let color = if !game.is_used(*letter) {
            theme.fg
        } else if game.phrase().contains(*letter) {
            theme.success
        } else {
            theme.dim
        };
        let shown = letter.to_uppercase().next().unwrap_or(*letter);
        canvas.put(ax + i as i32 * 2, block.y + 11, shown, color);
    }

    let tries = format!("{} tries left", game.remaining_tries());
    canvas.text(block.x + (block.w - tries.len() as i32) / 2, block.y + 13, &tries, theme.dim);
}

pub fn quiz(canvas: &mut Canvas, area: Area, game: &Quiz, input: &str, theme: &Theme) {
    let block = area.centered(30, 9);
    let question = game.question().to_string();
    let qx = block.x + (block.w - question.chars().count() as i32) / 2;
    canvas.text(qx, block.y, &question, theme.title);

    // Answer box
    let box_w = 10;
    let bx = block.x + (block.w - box_w) / 2;
    canvas.frame(bx, block.y + 3, box_w, 1, theme.border);
    canvas.text(bx + 1, block.y + 3, input, theme.fg);
    if !game.awaiting_next() {
        canvas.put(bx + 1 + input.chars().count() as i32, block.y + 3, '▏', theme.key);
    }

    let (line, color) = match game.feedback() {
        Some(Feedback::Correct) => ("Correct!".to_string(), theme.success),
        Some(Feedback::Incorrect { expected }) => (format!("Wrong, it was {}", expected), theme.error),
        Some(Feedback::NotANumber) => ("That is not a number".to_string(), theme.error),
        None => (String::new(), theme.fg),
    };
    canvas.text(block.x + (block.w - line.chars().count() as i32) / 2, block.y + 6, &line, color);
    if game.awaiting_next() {
        let next = "Enter for the next one";
        canvas.text(block.x + (block.w - next.len() as i32) / 2, block.y + 8, next, theme.dim);
    }
}

/// Text figure for each skin
fn figure(skin: Skin) -> [&'static str; 5] {
    match skin {
        Skin::Cameraman => ["  ___  ", " [o_o] ", " /|_|\\ ", "  | |  ", " _| |_ "],
        Skin::Lego => [" [===] ", " |o o| ", " [___] ", " /| |\\ ", " _|_|_ "],
        Skin::Minecraft => [" ##### ", " #o o# ", " ##### ", "  ###  ", "  # #  "],
        Skin::Cameraman2 => [" _[*]_ ", " [o_o] ", " /|#|\\ ", "  | |  ", " _| |_ "],
        Skin::Titan => ["\\[O_O]/", " |###| ", " |###| ", " /   \\ ", "/_   _\\"],
        Skin::Mario(_) => ["  ___  ", " (o o) ", "  >M<  ", " /| |\\ ", "  d b  "],
    }
}

pub fn counter(canvas: &mut Canvas, area: Area, game: &Counter, theme: &Theme) {
    let block = area.centered(30, 12);
    let skin = game.skin();
    let fx = block.x + (block.w - 7) / 2;
    for (i, line) in figure(skin).iter().enumerate() {
        canvas.text(fx, block.y + i as i32, line, theme.player);
    }

    let name = skin.name();
    canvas.text(block.x + (block.w - name.chars().count() as i32) / 2, block.y + 6, &name, theme.title);

    let count = format!("{} clicks", game.count());
    canvas.text(block.x + (block.w - count.len() as i32) / 2, block.y + 8, &count, theme.fg);

    let next = match Skin::next_milestone(game.count()) {
        Some(at) => format!("Next skin at {}", at),
        None => "Every skin unlocked".to_string(),
    };
    canvas.text(block.x + (block.w - next.len() as i32) / 2, block.y + 10, &next, theme.dim);

    let best = format!("Best {}", game.best());
    canvas.text(block.x + (block.w - best.len() as i32) / 2, block.y + 11, &best, theme.dim);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::style::Color;

    fn screen(canvas: &Canvas) -> String {
        (0..canvas.height() as i32)
            .map(|y| {
                (0..canvas.width() as i32)
                    .filter_map(|x| canvas.get(x, y).map(|c| c.ch))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn canvas() -> Canvas {
        let mut canvas = Canvas::new(80, 30);
        canvas.clear(Color::White, Color::Black);
        canvas
    }

    #[test]
    fn test_hangman_shows_masked_phrase() {
        let mut game = Hangman::with_phrase("hola mundo");
        game.guess('o');
        let mut c = canvas();
        hangman(&mut c, Area::new(0, 0, 80, 30), &game, &Theme::dark());
        assert!(screen(&c).contains(&game.masked()));
    }

    #[test]
    fn test_hangman_gallows_grows() {
        let mut game = Hangman::with_phrase("sol");
        game.guess('z');
        game.guess('x');
        let mut c = canvas();
        hangman(&mut c, Area::new(0, 0, 80, 30), &game, &Theme::dark());
        let text = screen(&c);
        assert!(text.contains("  O   |"));
        assert!(!text.contains("/|\\"));
    }

    #[test]
    fn test_quiz_shows_question_and_feedback() {
        let mut game = Quiz::with_seed(9);
        game.submit("-1");
        let mut c = canvas();
        quiz(&mut c, Area::new(0, 0, 80, 30), &game, "-1", &Theme::dark());
        let text = screen(&c);
        assert!(text.contains(&game.question().to_string()));
        assert!(text.contains("Wrong, it was"));
    }

    #[test]
    fn test_counter_shows_next_milestone() {
        let mut game = Counter::new();
        for _ in 0..12 {
            game.click();
        }
        let mut c = canvas();
        counter(&mut c, Area::new(0, 0, 80, 30), &game, &Theme::dark());
        let text = screen(&c);
        assert!(text.contains("12 clicks"));
        assert!(text.contains("Next skin at 50"));
        assert!(text.contains("Lego Cameraman"));
    }
}
