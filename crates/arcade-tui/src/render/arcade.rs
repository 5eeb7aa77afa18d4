//! Pixel-space games, scaled from field coordinates into terminal cells.

use super::canvas::Canvas;
use super::Area;
use crate::theme::Theme;
use arcade_core::games::arkanoid::{self, Arkanoid};
use arcade_core::games::asteroids::{self, Asteroids};
use arcade_core::games::pong::{self, Phase, Pong, Side};
use arcade_core::games::runner::{self, Runner};
use arcade_core::{Rect, Vec2};
use crossterm::style::Color;

/// Maps a `field_w` x `field_h` field onto terminal cells.
/// A cell is about twice as tall as it is wide, so one row covers two columns' worth of field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub area: Area,
    /// Field units per column
    scale: f32,
}

impl Viewport {
    pub fn fit(bounds: Area, field_w: f32, field_h: f32) -> Self {
        let cols = bounds.w.max(1) as f32;
        let rows = bounds.h.max(1) as f32;
        let scale = (field_w / cols).max(field_h / (rows * 2.0)).max(f32::EPSILON);
        let w = ((field_w / scale).floor() as i32).clamp(1, bounds.w.max(1));
        let h = ((field_h / (scale * 2.0)).floor() as i32).clamp(1, bounds.h.max(1));
        Self {
            area: bounds.centered(w, h),
            scale,
        }
    }

    /// Cell under a field point, or None outside the field
    pub fn cell(&self, p: Vec2) -> Option<(i32, i32)> {
        let cx = (p.x / self.scale).floor() as i32;
        let cy = (p.y / (self.scale * 2.0)).floor() as i32;
        if cx < 0 || cy < 0 || cx >= self.area.w || cy >= self.area.h {
            return None;
        }
        Some((self.area.x + cx, self.area.y + cy))
    }

    /// Same as `cell` but pinned to the nearest edge cell
    fn clamped(&self, p: Vec2) -> (i32, i32) {
        let cx = ((p.x / self.scale).floor() as i32).clamp(0, self.area.w - 1);
        let cy = ((p.y / (self.scale * 2.0)).floor() as i32).clamp(0, self.area.h - 1);
        (self.area.x + cx, self.area.y + cy)
    }

    /// Fill every cell the rectangle touches, at least one
    pub fn fill(&self, canvas: &mut Canvas, r: Rect, ch: char, fg: Color) {
        let (x0, y0) = self.clamped(Vec2::new(r.x, r.y));
        let (x1, y1) = self.clamped(Vec2::new(r.right() - 0.01, r.bottom() - 0.01));
        for y in y0..=y1.max(y0) {
            for x in x0..=x1.max(x0) {
                canvas.put(x, y, ch, fg);
            }
        }
    }

    pub fn point(&self, canvas: &mut Canvas, p: Vec2, ch: char, fg: Color) {
        if let Some((x, y)) = self.cell(p) {
            canvas.put(x, y, ch, fg);
        }
    }

    /// Straight segment between two field points, clipped to the field
    pub fn segment(&self, canvas: &mut Canvas, a: Vec2, b: Vec2, ch: char, fg: Color) {
        let from = self.clamped(a);
        let to = self.clamped(b);
        canvas.line(from, to, ch, fg);
    }

    /// Frame just outside the field
    pub fn border(&self, canvas: &mut Canvas, fg: Color) {
        canvas.frame(self.area.x, self.area.y, self.area.w, self.area.h, fg);
    }

    /// Text centred in the field
    pub fn caption(&self, canvas: &mut Canvas, row: i32, s: &str, fg: Color) {
        let x = self.area.x + (self.area.w - s.chars().count() as i32) / 2;
        canvas.text(x, self.area.y + row, s, fg);
    }
}

/// The field sits inside a frame, so leave a cell on every side for it
fn field_bounds(area: Area) -> Area {
    Area::new(area.x + 1, area.y + 1, area.w - 2, area.h - 2)
}

pub fn arkanoid(canvas: &mut Canvas, area: Area, game: &Arkanoid, theme: &Theme) {
    let view = Viewport::fit(field_bounds(area), arkanoid::WIDTH, arkanoid::HEIGHT);
    view.border(canvas, theme.border);

    for brick in game.bricks() {
        let color = theme.bricks[brick.row % theme.bricks.len()];
        view.fill(canvas, brick.rect, '▆', color);
    }
    view.fill(canvas, game.paddle(), '▀', theme.player);
    view.point(canvas, game.ball().pos, '●', theme.pickup);

    if !game.is_launched() {
        view.caption(canvas, view.area.h * 2 / 3, "Space to launch", theme.info);
    }
}

pub fn asteroids(canvas: &mut Canvas, area: Area, game: &Asteroids, theme: &Theme) {
    let view = Viewport::fit(field_bounds(area), asteroids::WIDTH, asteroids::HEIGHT);
    view.border(canvas, theme.border);

    for rock in game.asteroids() {
        let outline: Vec<Vec2> = rock.outline().collect();
        for (i, &a) in outline.iter().enumerate() {
            let b = outline[(i + 1) % outline.len()];
            // Rocks straddling an edge would draw a line across the field
            if view.cell(a).is_some() && view.cell(b).is_some() {
                view.segment(canvas, a, b, '·', theme.hazard);
            }
        }
    }
    for bullet in game.bullets() {
        view.point(canvas, bullet.pos, '•', theme.pickup);
    }

    let ship = game.ship();
    if ship.is_visible() {
        let [nose, left, right] = ship.hull();
        view.segment(canvas, nose, left, '*', theme.player);
        view.segment(canvas, nose, right, '*', theme.player);
        view.segment(canvas, left, right, '*', theme.player);
        if ship.thrusting {
            let tail = Vec2::new((left.x + right.x) / 2.0, (left.y + right.y) / 2.0);
            view.point(canvas, tail, '▲', theme.hazard);
        }
        view.point(canvas, nose, '^', theme.title);
    }

    if game.in_intermission() {
        let text = format!("Level {}", game.level());
        view.caption(canvas, view.area.h / 2, &text, theme.title);
    }
}

pub fn runner(canvas: &mut Canvas, area: Area, game: &Runner, theme: &Theme) {
    let view = Viewport::fit(field_bounds(area), runner::WIDTH, runner::HEIGHT);
    view.border(canvas, theme.border);

    let ground = Rect::new(0.0, runner::GROUND_Y, runner::WIDTH, runner::HEIGHT - runner::GROUND_Y);
    view.fill(canvas, ground, '▔', theme.dim);
    for obstacle in game.obstacles() {
        view.fill(canvas, *obstacle, '▓', theme.hazard);
    }
    let ch = if game.is_airborne() { '▲' } else { '█' };
    view.fill(canvas, game.runner(), ch, theme.player);
}

pub fn pong(canvas: &mut Canvas, area: Area, game: &Pong, theme: &Theme) {
    let view = Viewport::fit(field_bounds(area), pong::WIDTH, pong::HEIGHT);
    view.border(canvas, theme.border);

    let mid = view.area.x + view.area.w / 2;
    for y in (view.area.y..view.area.y + view.area.h).step_by(2) {
        canvas.put(mid, y, '┆', theme.dim);
    }
    view.fill(canvas, game.paddle(Side::Left).rect, '█', theme.player);
    view.fill(canvas, game.paddle(Side::Right).rect, '█', theme.hazard);
    view.point(canvas, game.ball(), '●', theme.pickup);

    match game.phase() {
        Phase::Setup => {
            let speed = format!("Ball speed  < {} >", game.speed());
            view.caption(canvas, view.area.h / 3, &speed, theme.title);
            view.caption(canvas, view.area.h / 3 + 2, "Enter to serve", theme.info);
        }
        Phase::Running => {}
        Phase::Finished => {
            if let Some(side) = game.winner() {
                let text = format!("{} wins", side.label());
                view.caption(canvas, view.area.h / 3, &text, theme.success);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_keeps_aspect() {
        // 800x400 field, 2:1 cells: 80 columns need 20 rows
        let view = Viewport::fit(Area::new(0, 0, 80, 40), 800.0, 400.0);
        assert_eq!((view.area.w, view.area.h), (80, 20));
        assert_eq!(view.area.y, 10);
    }

    #[test]
    fn test_viewport_limited_by_height() {
        let view = Viewport::fit(Area::new(0, 0, 200, 10), 800.0, 400.0);
        assert_eq!(view.area.h, 10);
        assert_eq!(view.area.w, 40);
        assert_eq!(view.area.x, 80);
    }

    #[test]
    fn test_cell_mapping() {
        let view = Viewport::fit(Area::new(0, 0, 80, 20), 800.0, 400.0);
        assert_eq!(view.cell(Vec2::new(0.0, 0.0)), Some((0, 0)));
        assert_eq!(view.cell(Vec2::new(799.0, 399.0)), Some((79, 19)));
        assert_eq!(view.cell(Vec2::new(-1.0, 0.0)), None);
        assert_eq!(view.cell(Vec2::new(800.0, 0.0)), None);
    }

    #[test]
    fn test_fill_covers_small_rects() {
        let view = Viewport::fit(Area::new(0, 0, 80, 20), 800.0, 400.0);
        let mut canvas = Canvas::new(80, 20);
        canvas.clear(Color::White, Color::Black);
        view.fill(&mut canvas, Rect::new(401.0, 201.0, 1.0, 1.0), '#', Color::Red);
        assert_eq!(canvas.get(40, 10).map(|c| c.ch), Some('#'));
    }
}
