use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{BeginSynchronizedUpdate, EndSynchronizedUpdate},
};
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

/// Double-buffered frame of styled cells. Each frame is drawn into the back
/// buffer and only the cells that changed since the last flush are written.
pub struct Canvas {
    width: u16,
    height: u16,
    front: Vec<Option<Cell>>,
    back: Vec<Cell>,
    bg: Color,
}

impl Canvas {
    pub fn new(width: u16, height: u16) -> Self {
        let len = width as usize * height as usize;
        let blank = Cell {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
        };
        Self {
            width,
            height,
            front: vec![None; len],
            back: vec![blank; len],
            bg: Color::Black,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Background of the cleared frame
    pub fn background(&self) -> Color {
        self.bg
    }

    /// Resize, forcing a full redraw if the size changed
    pub fn resize(&mut self, width: u16, height: u16) {
        if (width, height) != (self.width, self.height) {
            *self = Self::new(width, height);
        }
    }

    /// Start a new frame
    pub fn clear(&mut self, fg: Color, bg: Color) {
        self.bg = bg;
        for cell in &mut self.back {
            *cell = Cell { ch: ' ', fg, bg };
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|i| self.back[i])
    }

    /// Write a character, keeping the cell's background. Off-canvas writes are dropped.
    pub fn put(&mut self, x: i32, y: i32, ch: char, fg: Color) {
        if let Some(i) = self.index(x, y) {
            self.back[i].ch = ch;
            self.back[i].fg = fg;
        }
    }

    pub fn put_bg(&mut self, x: i32, y: i32, ch: char, fg: Color, bg: Color) {
        if let Some(i) = self.index(x, y) {
            self.back[i] = Cell { ch, fg, bg };
        }
    }

    /// Recolor a cell's background only
    pub fn tint(&mut self, x: i32, y: i32, bg: Color) {
        if let Some(i) = self.index(x, y) {
            self.back[i].bg = bg;
        }
    }

    pub fn text(&mut self, x: i32, y: i32, s: &str, fg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.put(x + i as i32, y, ch, fg);
        }
    }

    pub fn text_bg(&mut self, x: i32, y: i32, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.put_bg(x + i as i32, y, ch, fg, bg);
        }
    }

    /// Text centred on the whole canvas width
    pub fn text_centered(&mut self, y: i32, s: &str, fg: Color) {
        let x = (self.width as i32 - s.chars().count() as i32) / 2;
        self.text(x, y, s, fg);
    }

    pub fn fill(&mut self, x: i32, y: i32, w: i32, h: i32, ch: char, fg: Color) {
        for dy in 0..h {
            for dx in 0..w {
                self.put(x + dx, y + dy, ch, fg);
            }
        }
    }

    /// Single-line frame drawn just outside the given interior
    pub fn frame(&mut self, x: i32, y: i32, w: i32, h: i32, fg: Color) {
        let (left, top, right, bottom) = (x - 1, y - 1, x + w, y + h);
        for cx in x..right {
            self.put(cx, top, '─', fg);
            self.put(cx, bottom, '─', fg);
        }
        for cy in y..bottom {
            self.put(left, cy, '│', fg);
            self.put(right, cy, '│', fg);
        }
        self.put(left, top, '┌', fg);
        self.put(right, top, '┐', fg);
        self.put(left, bottom, '└', fg);
        self.put(right, bottom, '┘', fg);
    }

    /// Straight line between two cells
    pub fn line(&mut self, from: (i32, i32), to: (i32, i32), ch: char, fg: Color) {
        let (mut x, mut y) = from;
        let dx = (to.0 - x).abs();
        let dy = -(to.1 - y).abs();
        let sx = if x < to.0 { 1 } else { -1 };
        let sy = if y < to.1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.put(x, y, ch, fg);
            if (x, y) == to {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Write the changed cells and remember them as displayed
    pub fn flush(&mut self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, BeginSynchronizedUpdate)?;
        let mut cur_fg = None::<Color>;
        let mut cur_bg = None::<Color>;
        let mut cursor: Option<(u16, u16)> = None;

        for y in 0..self.height {
            let row = y as usize * self.width as usize;
            for x in 0..self.width {
                let i = row + x as usize;
                let cell = self.back[i];
                if self.front[i] == Some(cell) {
                    continue;
                }
                if cursor != Some((x, y)) {
                    queue!(out, MoveTo(x, y))?;
                }
                if cur_fg != Some(cell.fg) {
                    queue!(out, SetForegroundColor(cell.fg))?;
                    cur_fg = Some(cell.fg);
                }
                if cur_bg != Some(cell.bg) {
                    queue!(out, SetBackgroundColor(cell.bg))?;
                    cur_bg = Some(cell.bg);
                }
                queue!(out, Print(cell.ch))?;
                cursor = Some((x + 1, y));
                self.front[i] = Some(cell);
            }
        }

        queue!(out, ResetColor, EndSynchronizedUpdate)?;
        out.flush()
    }

    /// Forget what is on screen so the next flush redraws everything
    pub fn invalidate(&mut self) {
        self.front.iter_mut().for_each(|c| *c = None);
    }
}
