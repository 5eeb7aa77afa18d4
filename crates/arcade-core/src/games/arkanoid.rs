use super::make_rng;
use crate::clock::FrameClock;
use crate::game::{Playable, Status};
use crate::geometry::{Rect, Vec2};
use rand::rngs::StdRng;
use rand::Rng;
use std::f32::consts::{FRAC_PI_3, FRAC_PI_4};
use std::time::Duration;
use tracing::{debug, info};

pub const WIDTH: f32 = 600.0;
pub const HEIGHT: f32 = 400.0;

pub const PADDLE_WIDTH: f32 = 100.0;
pub const PADDLE_HEIGHT: f32 = 15.0;
pub const PADDLE_SPEED: f32 = 7.0;
const PADDLE_Y: f32 = HEIGHT - PADDLE_HEIGHT - 10.0;

pub const BALL_RADIUS: f32 = 7.0;
pub const BALL_SPEED: f32 = 3.0;

pub const BRICK_WIDTH: f32 = 65.0;
pub const BRICK_HEIGHT: f32 = 20.0;
const BRICK_PADDING: f32 = 5.0;
const BRICK_OFFSET_TOP: f32 = 30.0;
const BRICK_OFFSET_LEFT: f32 = 20.0;
pub const BRICK_ROWS: usize = 5;
pub const BRICK_COLS: usize = 8;
pub const BRICK_POINTS: u64 = 10;

pub const STARTING_LIVES: u32 = 3;

type Layout = [[u8; BRICK_COLS]; BRICK_ROWS];

/// Brick layouts, one per stage
pub const STAGES: [Layout; 20] = [
    // Full wall
    [
        [1, 1, 1, 1, 1, 1, 1, 1],
        [1, 1, 1, 1, 1, 1, 1, 1],
        [1, 1, 1, 1, 1, 1, 1, 1],
        [1, 1, 1, 1, 1, 1, 1, 1],
        [1, 1, 1, 1, 1, 1, 1, 1],
    ],
    // Frame
    [
        [1, 1, 1, 1, 1, 1, 1, 1],
        [1, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 1],
        [1, 1, 1, 1, 1, 1, 1, 1],
    ],
    // Cross
    [
        [0, 0, 1, 1, 1, 1, 0, 0],
        [0, 0, 1, 1, 1, 1, 0, 0],
        [1, 1, 1, 1, 1, 1, 1, 1],
        [0, 0, 1, 1, 1, 1, 0, 0],
        [0, 0, 1, 1, 1, 1, 0, 0],
    ],
    // Checkerboard
    [
        [1, 0, 1, 0, 1, 0, 1, 0],
        [0, 1, 0, 1, 0, 1, 0, 1],
        [1, 0, 1, 0, 1, 0, 1, 0],
        [0, 1, 0, 1, 0, 1, 0, 1],
        [1, 0, 1, 0, 1, 0, 1, 0],
    ],
    // Pyramid
    [
        [0, 0, 0, 1, 1, 0, 0, 0],
        [0, 0, 1, 1, 1, 1, 0, 0],
        [0, 1, 1, 1, 1, 1, 1, 0],
        [1, 1, 1, 1, 1, 1, 1, 1],
        [1, 1, 1, 1, 1, 1, 1, 1],
    ],
    // Ring
    [
        [0, 0, 1, 1, 1, 1, 0, 0],
        [0, 1, 1, 1, 1, 1, 1, 0],
        [1, 1, 0, 0, 0, 0, 1, 1],
        [0, 1, 1, 1, 1, 1, 1, 0],
        [0, 0, 1, 1, 1, 1, 0, 0],
    ],
    // Centre columns
    [
        [0, 0, 1, 1, 1, 1, 0, 0],
        [0, 0, 1, 1, 1, 1, 0, 0],
        [0, 0, 1, 1, 1, 1, 0, 0],
        [0, 0, 1, 1, 1, 1, 0, 0],
        [0, 0, 1, 1, 1, 1, 0, 0],
    ],
    // Hollow centre
    [
        [1, 1, 1, 1, 1, 1, 1, 1],
        [1, 1, 0, 0, 0, 0, 1, 1],
        [1, 0, 0, 0, 0, 0, 0, 1],
        [1, 1, 0, 0, 0, 0, 1, 1],
        [1, 1, 1, 1, 1, 1, 1, 1],
    ],
    // Staircase right
    [
        [1, 0, 0, 0, 0, 0, 0, 0],
        [1, 1, 0, 0, 0, 0, 0, 0],
        [1, 1, 1, 0, 0, 0, 0, 0],
        [1, 1, 1, 1, 0, 0, 0, 0],
        [1, 1, 1, 1, 1, 0, 0, 0],
    ],
    // Staircase left
    [
        [0, 0, 0, 0, 0, 0, 0, 1],
        [0, 0, 0, 0, 0, 0, 1, 1],
        [0, 0, 0, 0, 0, 1, 1, 1],
        [0, 0, 0, 0, 1, 1, 1, 1],
        [0, 0, 0, 1, 1, 1, 1, 1],
    ],
    // Nested frames
    [
        [1, 1, 1, 1, 1, 1, 1, 1],
        [1, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 1, 1, 1, 1, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 1],
        [1, 1, 1, 1, 1, 1, 1, 1],
    ],
    // Heart
    [
        [0, 1, 1, 0, 0, 1, 1, 0],
        [1, 1, 1, 1, 1, 1, 1, 1],
        [1, 1, 1, 1, 1, 1, 1, 1],
        [0, 1, 1, 1, 1, 1, 1, 0],
        [0, 0, 1, 1, 1, 1, 0, 0],
    ],
    // Vertical bars
    [
        [1, 0, 1, 0, 1, 0, 1, 0],
        [1, 0, 1, 0, 1, 0, 1, 0],
        [1, 0, 1, 0, 1, 0, 1, 0],
        [1, 0, 1, 0, 1, 0, 1, 0],
        [1, 0, 1, 0, 1, 0, 1, 0],
    ],
    // Horizontal bars
    [
        [1, 1, 1, 1, 1, 1, 1, 1],
        [0, 0, 0, 0, 0, 0, 0, 0],
        [1, 1, 1, 1, 1, 1, 1, 1],
        [0, 0, 0, 0, 0, 0, 0, 0],
        [1, 1, 1, 1, 1, 1, 1, 1],
    ],
    // Diamond
    [
        [0, 0, 0, 1, 1, 0, 0, 0],
        [0, 0, 1, 1, 1, 1, 0, 0],
        [0, 1, 1, 1, 1, 1, 1, 0],
        [0, 0, 1, 1, 1, 1, 0, 0],
        [0, 0, 0, 1, 1, 0, 0, 0],
    ],
    // Diagonals
    [
        [1, 0, 0, 0, 0, 0, 0, 1],
        [0, 1, 0, 0, 0, 0, 1, 0],
        [0, 0, 1, 0, 0, 1, 0, 0],
        [0, 0, 0, 1, 1, 0, 0, 0],
        [0, 0, 0, 0, 0, 0, 0, 0],
    ],
    // Centre wall
    [
        [0, 0, 0, 0, 0, 0, 0, 0],
        [0, 1, 1, 1, 1, 1, 1, 0],
        [0, 1, 1, 1, 1, 1, 1, 0],
        [0, 1, 1, 1, 1, 1, 1, 0],
        [0, 0, 0, 0, 0, 0, 0, 0],
    ],
    // Scattered
    [
        [1, 0, 1, 0, 1, 0, 1, 0],
        [0, 0, 0, 1, 0, 0, 0, 0],
        [1, 0, 1, 0, 1, 0, 1, 0],
        [0, 0, 0, 0, 1, 0, 0, 0],
        [1, 0, 1, 0, 1, 0, 1, 0],
    ],
    // Squares
    [
        [1, 1, 0, 0, 0, 0, 1, 1],
        [1, 1, 0, 0, 0, 0, 1, 1],
        [0, 0, 1, 1, 1, 1, 0, 0],
        [1, 1, 0, 0, 0, 0, 1, 1],
        [1, 1, 0, 0, 0, 0, 1, 1],
    ],
    // "20"
    [
        [1, 1, 1, 1, 0, 1, 1, 1],
        [0, 0, 0, 1, 0, 1, 0, 1],
        [1, 1, 1, 1, 0, 1, 1, 1],
        [1, 0, 0, 0, 0, 1, 0, 0],
        [1, 1, 1, 1, 0, 1, 1, 1],
    ],
];

/// A live brick; destroyed bricks are removed from the list
#[derive(Debug, Clone, PartialEq)]
pub struct Brick {
    pub rect: Rect,
    /// Layout row, used for colouring
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Ball {
    pub fn bounds(&self) -> Rect {
        Rect::around(self.pos, BALL_RADIUS)
    }
}

/// Brick-breaker over a fixed sequence of stages
pub struct Arkanoid {
    rng: StdRng,
    clock: FrameClock,
    paddle: Rect,
    paddle_dir: f32,
    ball: Ball,
    launched: bool,
    bricks: Vec<Brick>,
    stage: usize,
    lives: u32,
    score: u64,
    status: Status,
}

impl Default for Arkanoid {
    fn default() -> Self {
        Self::new()
    }
}

impl Arkanoid {
    pub fn new() -> Self {
        Self::build(None)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::build(Some(seed))
    }

    fn build(seed: Option<u64>) -> Self {
        let mut game = Self {
            rng: make_rng(seed),
            clock: FrameClock::new(),
            paddle: Rect::new(0.0, PADDLE_Y, PADDLE_WIDTH, PADDLE_HEIGHT),
            paddle_dir: 0.0,
            ball: Ball {
                pos: Vec2::ZERO,
                vel: Vec2::ZERO,
            },
            launched: false,
            bricks: Vec::new(),
            stage: 1,
            lives: STARTING_LIVES,
            score: 0,
            status: Status::Playing,
        };
        game.load_stage(1);
        game.reset_ball_and_paddle();
        game
    }

    /// Start a specific stage (1-based); used for practice and tests
    pub fn with_stage(stage: usize, seed: u64) -> Self {
        let mut game = Self::with_seed(seed);
        let stage = stage.clamp(1, STAGES.len());
        game.stage = stage;
        game.load_stage(stage);
        game
    }

    pub fn paddle(&self) -> Rect {
        self.paddle
    }

    pub fn ball(&self) -> Ball {
        self.ball
    }

    pub fn bricks(&self) -> &[Brick] {
        &self.bricks
    }

    pub fn stage(&self) -> usize {
        self.stage
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn is_launched(&self) -> bool {
        self.launched
    }

    /// -1 moves left, 1 moves right, 0 stops
    pub fn set_paddle_direction(&mut self, dir: i8) {
        self.paddle_dir = f32::from(dir.signum());
    }

    /// Release the ball from the paddle at 45 degrees, left or right at random
    pub fn launch(&mut self) {
        if self.launched || self.status.is_over() {
            return;
        }
        let side = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        self.ball.vel = Vec2::new(
            side * BALL_SPEED * FRAC_PI_4.sin(),
            -BALL_SPEED * FRAC_PI_4.cos(),
        );
        self.launched = true;
    }

    fn load_stage(&mut self, stage: usize) {
        let layout = &STAGES[stage - 1];
        self.bricks.clear();
        for (row, cells) in layout.iter().enumerate() {
            for (col, &cell) in cells.iter().enumerate() {
                if cell == 1 {
                    let x = col as f32 * (BRICK_WIDTH + BRICK_PADDING) + BRICK_OFFSET_LEFT;
                    let y = row as f32 * (BRICK_HEIGHT + BRICK_PADDING) + BRICK_OFFSET_TOP;
                    self.bricks.push(Brick {
                        rect: Rect::new(x, y, BRICK_WIDTH, BRICK_HEIGHT),
                        row,
                        col,
                    });
                }
            }
        }
        debug!(stage, bricks = self.bricks.len(), "arkanoid stage loaded");
    }

    fn reset_ball_and_paddle(&mut self) {
        self.paddle.x = (WIDTH - PADDLE_WIDTH) / 2.0;
        self.paddle_dir = 0.0;
        self.launched = false;
        self.ball = Ball {
            pos: Vec2::new(WIDTH / 2.0, PADDLE_Y - BALL_RADIUS),
            vel: Vec2::ZERO,
        };
    }

    /// Simulate a single frame
    pub fn step(&mut self) {
        if self.status.is_over() {
            return;
        }

        self.paddle.x = (self.paddle.x + self.paddle_dir * PADDLE_SPEED).clamp(0.0, WIDTH - PADDLE_WIDTH);

        if !self.launched {
            self.ball.pos = Vec2::new(self.paddle.center().x, PADDLE_Y - BALL_RADIUS);
            return;
        }

        self.ball.pos += self.ball.vel;
        self.bounce_off_walls();

        if self.ball.pos.y + BALL_RADIUS > HEIGHT {
            self.lives = self.lives.saturating_sub(1);
            if self.lives == 0 {
                info!(score = self.score, stage = self.stage, "arkanoid lost");
                self.status = Status::Lost;
            } else {
                debug!(lives = self.lives, "arkanoid ball lost");
                self.reset_ball_and_paddle();
            }
            return;
        }

        self.bounce_off_paddle();
        self.hit_brick();

        if self.bricks.is_empty() {
            if self.stage == STAGES.len() {
                info!(score = self.score, "arkanoid won");
                self.status = Status::Won;
            } else {
                self.stage += 1;
                self.load_stage(self.stage);
                self.reset_ball_and_paddle();
            }
        }
    }

    fn bounce_off_walls(&mut self) {
        let ball = &mut self.ball;
        if ball.pos.x - BALL_RADIUS < 0.0 {
            ball.pos.x = BALL_RADIUS;
            ball.vel.x = ball.vel.x.abs();
        } else if ball.pos.x + BALL_RADIUS > WIDTH {
            ball.pos.x = WIDTH - BALL_RADIUS;
            ball.vel.x = -ball.vel.x.abs();
        }
        if ball.pos.y - BALL_RADIUS < 0.0 {
            ball.pos.y = BALL_RADIUS;
            ball.vel.y = ball.vel.y.abs();
        }
    }

    fn bounce_off_paddle(&mut self) {
        let ball = &mut self.ball;
        let paddle = self.paddle;
        let overlaps = ball.pos.y + BALL_RADIUS > paddle.y
            && ball.pos.x - BALL_RADIUS < paddle.right()
            && ball.pos.x + BALL_RADIUS > paddle.x
            && ball.pos.y < paddle.bottom();
        if !overlaps {
            return;
        }
        // Offset from paddle centre in [-1, 1] steers the rebound up to 60 degrees
        let hit = ((ball.pos.x - paddle.center().x) / (PADDLE_WIDTH / 2.0)).clamp(-1.0, 1.0);
        let angle = hit * FRAC_PI_3;
        ball.vel = Vec2::new(BALL_SPEED * angle.sin(), -BALL_SPEED * angle.cos());
        ball.pos.y = paddle.y - BALL_RADIUS;
    }

    fn hit_brick(&mut self) {
        let bounds = self.ball.bounds();
        if let Some(index) = self.bricks.iter().position(|b| b.rect.intersects(&bounds)) {
            self.bricks.remove(index);
            self.ball.vel.y = -self.ball.vel.y;
            self.score += BRICK_POINTS;
        }
    }
}

impl Playable for Arkanoid {
    fn advance(&mut self, dt: Duration) {
        for _ in 0..self.clock.frames(dt) {
            self.step();
        }
    }

    fn status(&self) -> Status {
        self.status
    }

    fn score(&self) -> u64 {
        self.score
    }
}
