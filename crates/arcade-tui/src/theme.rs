use crossterm::style::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Palette selectable from the config file or `--theme`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
    HighContrast,
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeName::Dark => write!(f, "dark"),
            ThemeName::Light => write!(f, "light"),
            ThemeName::HighContrast => write!(f, "high_contrast"),
        }
    }
}

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    /// Background color
    pub bg: Color,
    /// Default text color
    pub fg: Color,
    /// Play-area frame
    pub border: Color,
    /// Screen titles and banners
    pub title: Color,
    /// Whatever the player controls: paddle, ship, snake
    pub player: Color,
    /// Things that hurt: obstacles, rocks, conflicts
    pub hazard: Color,
    /// Things worth collecting: food, bullets, found words
    pub pickup: Color,
    /// Secondary text and empty cells
    pub dim: Color,
    /// Cursor cell background
    pub selected_bg: Color,
    /// Related cells (row/column/box, pending selection)
    pub highlight_bg: Color,
    /// Error/conflict color
    pub error: Color,
    /// Success/complete color
    pub success: Color,
    /// HUD text color
    pub info: Color,
    /// Key binding text color
    pub key: Color,
    /// Brick colors by layout row
    pub bricks: [Color; 5],
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn named(name: ThemeName) -> Self {
        match name {
            ThemeName::Dark => Self::dark(),
            ThemeName::Light => Self::light(),
            ThemeName::HighContrast => Self::high_contrast(),
        }
    }

    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb { r: 20, g: 22, b: 30 },
            fg: Color::Rgb { r: 230, g: 230, b: 240 },
            border: Color::Rgb { r: 90, g: 95, b: 120 },
            title: Color::Rgb { r: 255, g: 210, b: 100 },
            player: Color::Rgb { r: 80, g: 180, b: 255 },
            hazard: Color::Rgb { r: 255, g: 120, b: 90 },
            pickup: Color::Rgb { r: 120, g: 230, b: 120 },
            dim: Color::Rgb { r: 90, g: 95, b: 115 },
            selected_bg: Color::Rgb { r: 70, g: 90, b: 140 },
            highlight_bg: Color::Rgb { r: 35, g: 40, b: 55 },
            error: Color::Rgb { r: 255, g: 90, b: 90 },
            success: Color::Rgb { r: 90, g: 255, b: 130 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
            key: Color::Rgb { r: 255, g: 210, b: 100 },
            bricks: [
                Color::Rgb { r: 230, g: 80, b: 80 },
                Color::Rgb { r: 240, g: 160, b: 60 },
                Color::Rgb { r: 230, g: 220, b: 80 },
                Color::Rgb { r: 90, g: 200, b: 110 },
                Color::Rgb { r: 80, g: 150, b: 240 },
            ],
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            bg: Color::Rgb { r: 248, g: 248, b: 252 },
            fg: Color::Rgb { r: 30, g: 30, b: 40 },
            border: Color::Rgb { r: 150, g: 150, b: 170 },
            title: Color::Rgb { r: 180, g: 100, b: 10 },
            player: Color::Rgb { r: 30, g: 100, b: 200 },
            hazard: Color::Rgb { r: 200, g: 70, b: 40 },
            pickup: Color::Rgb { r: 30, g: 140, b: 50 },
            dim: Color::Rgb { r: 170, g: 170, b: 185 },
            selected_bg: Color::Rgb { r: 180, g: 200, b: 255 },
            highlight_bg: Color::Rgb { r: 230, g: 232, b: 242 },
            error: Color::Rgb { r: 220, g: 50, b: 50 },
            success: Color::Rgb { r: 40, g: 160, b: 60 },
            info: Color::Rgb { r: 90, g: 90, b: 110 },
            key: Color::Rgb { r: 200, g: 120, b: 20 },
            bricks: [
                Color::Rgb { r: 200, g: 50, b: 50 },
                Color::Rgb { r: 210, g: 120, b: 20 },
                Color::Rgb { r: 170, g: 150, b: 0 },
                Color::Rgb { r: 40, g: 150, b: 60 },
                Color::Rgb { r: 40, g: 90, b: 200 },
            ],
        }
    }

    /// High contrast theme
    pub fn high_contrast() -> Self {
        Self {
            bg: Color::Black,
            fg: Color::White,
            border: Color::White,
            title: Color::Yellow,
            player: Color::Cyan,
            hazard: Color::Red,
            pickup: Color::Green,
            dim: Color::Grey,
            selected_bg: Color::Blue,
            highlight_bg: Color::Rgb { r: 30, g: 30, b: 30 },
            error: Color::Red,
            success: Color::Green,
            info: Color::Grey,
            key: Color::Yellow,
            bricks: [Color::Red, Color::Yellow, Color::Green, Color::Cyan, Color::Magenta],
        }
    }
}
