use crossterm::style::Color;
use rand::Rng;

/// A single particle in an end-of-game effect
#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub char: char,
    pub color: Color,
    /// Seconds left
    pub lifetime: f32,
}

impl Particle {
    pub fn is_visible(&self, width: u16, height: u16) -> bool {
        self.x >= 0.0
            && self.x < width as f32
            && self.y >= 0.0
            && self.y < height as f32
            && self.lifetime > 0.0
    }

    /// Move one frame of `dt` seconds under `gravity`
    pub fn update(&mut self, dt: f32, gravity: f32) {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += gravity;
        self.lifetime -= dt;
    }
}

/// Generate a random bright color
pub fn random_bright_color(rng: &mut impl Rng) -> Color {
    match rng.gen_range(0..7) {
        0 => Color::Red,
        1 => Color::Green,
        2 => Color::Yellow,
        3 => Color::Blue,
        4 => Color::Magenta,
        5 => Color::Cyan,
        _ => Color::White,
    }
}

/// Generate a random gloomy color for a lost game
pub fn random_dark_color(rng: &mut impl Rng) -> Color {
    match rng.gen_range(0..4) {
        0 => Color::DarkRed,
        1 => Color::DarkGrey,
        2 => Color::Rgb { r: 100, g: 50, b: 50 },
        _ => Color::Rgb { r: 80, g: 80, b: 100 },
    }
}

pub const CONFETTI_CHARS: &[char] = &['*', '✦', '✧', '◆', '◇', '○', '●', '■', '□', '▲', '▽'];

pub const RAIN_CHARS: &[char] = &['│', '╎', '┊', '┆', '|', '.'];
