use super::make_rng;
use crate::clock::FrameClock;
use crate::error::{Error, Result};
use crate::game::{Playable, Status};
use crate::geometry::{Rect, Vec2};
use rand::rngs::StdRng;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info};

pub const WIDTH: f32 = 800.0;
pub const HEIGHT: f32 = 400.0;

pub const PADDLE_WIDTH: f32 = 10.0;
pub const PADDLE_HEIGHT: f32 = 80.0;
pub const BALL_RADIUS: f32 = 10.0;
pub const WINNING_SCORE: u32 = 5;

pub const MIN_SPEED: u32 = 1;
pub const MAX_SPEED: u32 = 15;
pub const DEFAULT_SPEED: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn label(self) -> &'static str {
        match self {
            Side::Left => "Player 1",
            Side::Right => "Player 2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Speed can be changed, nothing moves
    Setup,
    Running,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paddle {
    pub rect: Rect,
    dy: f32,
    pub score: u32,
}

impl Paddle {
    fn at(x: f32) -> Self {
        Self {
            rect: Rect::new(x, (HEIGHT - PADDLE_HEIGHT) / 2.0, PADDLE_WIDTH, PADDLE_HEIGHT),
            dy: 0.0,
            score: 0,
        }
    }
}

/// Two-player pong, first to five
pub struct Pong {
    rng: StdRng,
    clock: FrameClock,
    speed: u32,
    left: Paddle,
    right: Paddle,
    ball: Vec2,
    ball_vel: Vec2,
    phase: Phase,
}

fn validate(speed: u32) -> Result<u32> {
    if (MIN_SPEED..=MAX_SPEED).contains(&speed) {
        Ok(speed)
    } else {
        Err(Error::InvalidSpeed(speed))
    }
}

impl Pong {
    pub fn new(speed: u32) -> Result<Self> {
        Self::build(speed, None)
    }

    pub fn with_seed(speed: u32, seed: u64) -> Result<Self> {
        Self::build(speed, Some(seed))
    }

    fn build(speed: u32, seed: Option<u64>) -> Result<Self> {
        Ok(Self {
            rng: make_rng(seed),
            clock: FrameClock::new(),
            speed: validate(speed)?,
            left: Paddle::at(0.0),
            right: Paddle::at(WIDTH - PADDLE_WIDTH),
            ball: Vec2::new(WIDTH / 2.0, HEIGHT / 2.0),
            ball_vel: Vec2::ZERO,
            phase: Phase::Setup,
        })
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Change the ball speed; only allowed before the match starts
    pub fn set_speed(&mut self, speed: u32) -> Result<()> {
        let speed = validate(speed)?;
        if self.phase == Phase::Setup {
            self.speed = speed;
        }
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn ball(&self) -> Vec2 {
        self.ball
    }

    pub fn winner(&self) -> Option<Side> {
        if self.left.score >= WINNING_SCORE {
            Some(Side::Left)
        } else if self.right.score >= WINNING_SCORE {
            Some(Side::Right)
        } else {
            None
        }
    }

    /// Serve and start the match
    pub fn start(&mut self) {
        if self.phase != Phase::Setup {
            return;
        }
        info!(speed = self.speed, "pong match started");
        self.phase = Phase::Running;
        self.serve();
    }

    /// Back to the setup state with scores cleared
    pub fn reset(&mut self) {
        self.left = Paddle::at(0.0);
        self.right = Paddle::at(WIDTH - PADDLE_WIDTH);
        self.ball = Vec2::new(WIDTH / 2.0, HEIGHT / 2.0);
        self.ball_vel = Vec2::ZERO;
        self.phase = Phase::Setup;
    }

    /// -1 moves up, 1 down, 0 stops
    pub fn set_paddle(&mut self, side: Side, dir: i8) {
        if self.phase != Phase::Running {
            return;
        }
        let dy = f32::from(dir.signum()) * self.speed as f32;
        match side {
            Side::Left => self.left.dy = dy,
            Side::Right => self.right.dy = dy,
        }
    }

    fn serve(&mut self) {
        let speed = self.speed as f32;
        let sx = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let sy = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        self.ball = Vec2::new(WIDTH / 2.0, HEIGHT / 2.0);
        self.ball_vel = Vec2::new(speed * sx, speed * sy);
    }

    pub fn step(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        for paddle in [&mut self.left, &mut self.right] {
            paddle.rect.y = (paddle.rect.y + paddle.dy).clamp(0.0, HEIGHT - PADDLE_HEIGHT);
        }

        self.ball += self.ball_vel;
        if self.ball.y + BALL_RADIUS > HEIGHT || self.ball.y - BALL_RADIUS < 0.0 {
            self.ball_vel.y = -self.ball_vel.y;
        }

        let (l, r) = (self.left.rect, self.right.rect);
        if self.ball_vel.x < 0.0
            && self.ball.x - BALL_RADIUS < l.right()
            && self.ball.y > l.y
            && self.ball.y < l.bottom()
        {
            self.ball_vel.x = -self.ball_vel.x;
            self.ball.x = l.right() + BALL_RADIUS;
        }
        if self.ball_vel.x > 0.0
            && self.ball.x + BALL_RADIUS > r.x
            && self.ball.y > r.y
            && self.ball.y < r.bottom()
        {
            self.ball_vel.x = -self.ball_vel.x;
            self.ball.x = r.x - BALL_RADIUS;
        }

        if self.ball.x - BALL_RADIUS < 0.0 {
            self.point(Side::Right);
        } else if self.ball.x + BALL_RADIUS > WIDTH {
            self.point(Side::Left);
        }
    }

    fn point(&mut self, side: Side) {
        let paddle = match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        };
        paddle.score += 1;
        debug!(side = side.label(), left = self.left.score, right = self.right.score, "pong point");
        if let Some(winner) = self.winner() {
            info!(winner = winner.label(), "pong match over");
            self.phase = Phase::Finished;
            self.ball_vel = Vec2::ZERO;
        } else {
            self.serve();
        }
    }
}

impl Playable for Pong {
    fn advance(&mut self, dt: Duration) {
        for _ in 0..self.clock.frames(dt) {
            self.step();
        }
    }

    fn status(&self) -> Status {
        if self.phase == Phase::Finished {
            Status::Won
        } else {
            Status::Playing
        }
    }

    /// Winning margin
    fn score(&self) -> u64 {
        u64::from(self.left.score.abs_diff(self.right.score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(speed: u32) -> Pong {
        let mut game = Pong::with_seed(speed, 7).unwrap();
        game.start();
        game
    }

    #[test]
    fn test_speed_is_validated() {
        assert_eq!(Pong::new(0).err(), Some(Error::InvalidSpeed(0)));
        assert_eq!(Pong::new(16).err(), Some(Error::InvalidSpeed(16)));
        assert!(Pong::new(MIN_SPEED).is_ok());
        assert!(Pong::new(MAX_SPEED).is_ok());
    }

    #[test]
    fn test_setup_is_still() {
        let mut game = Pong::with_seed(5, 1).unwrap();
        game.set_paddle(Side::Left, 1);
        game.step();
        assert_eq!(game.ball(), Vec2::new(WIDTH / 2.0, HEIGHT / 2.0));
        assert_eq!(game.phase(), Phase::Setup);
        assert!(game.set_speed(9).is_ok());
        assert_eq!(game.speed(), 9);
    }

    #[test]
    fn test_speed_locked_while_running() {
        let mut game = running(5);
        assert!(game.set_speed(9).is_ok());
        assert_eq!(game.speed(), 5);
        assert!(game.set_speed(99).is_err());
    }

    #[test]
    fn test_serve_is_diagonal_at_speed() {
        let game = running(6);
        assert_eq!(game.ball_vel.x.abs(), 6.0);
        assert_eq!(game.ball_vel.y.abs(), 6.0);
    }

    #[test]
    fn test_paddles_are_clamped() {
        let mut game = running(15);
        game.set_paddle(Side::Left, -1);
        game.set_paddle(Side::Right, 1);
        for _ in 0..100 {
            game.step();
        }
        assert_eq!(game.paddle(Side::Left).rect.y, 0.0);
        assert_eq!(game.paddle(Side::Right).rect.y, HEIGHT - PADDLE_HEIGHT);
    }

    #[test]
    fn test_paddle_returns_ball() {
        let mut game = running(5);
        let paddle_y = game.paddle(Side::Left).rect.y;
        game.ball = Vec2::new(PADDLE_WIDTH + BALL_RADIUS + 2.0, paddle_y + 40.0);
        game.ball_vel = Vec2::new(-5.0, 0.0);
        game.step();
        assert!(game.ball_vel.x > 0.0);
        assert_eq!(game.ball().x, PADDLE_WIDTH + BALL_RADIUS);
    }

    #[test]
    fn test_miss_scores_for_opponent() {
        let mut game = running(5);
        game.ball = Vec2::new(BALL_RADIUS + 1.0, 5.0 + BALL_RADIUS);
        game.left.rect.y = HEIGHT - PADDLE_HEIGHT;
        game.ball_vel = Vec2::new(-5.0, 5.0);
        game.step();
        assert_eq!(game.paddle(Side::Right).score, 1);
        assert_eq!(game.ball(), Vec2::new(WIDTH / 2.0, HEIGHT / 2.0));
    }

    #[test]
    fn test_first_to_five_wins() {
        let mut game = running(5);
        for _ in 0..WINNING_SCORE {
            game.point(Side::Left);
        }
        game.right.score = 2;
        assert_eq!(game.winner(), Some(Side::Left));
        assert_eq!(game.status(), Status::Won);
        assert_eq!(game.score(), 3);

        game.reset();
        assert_eq!(game.phase(), Phase::Setup);
        assert_eq!(game.winner(), None);
        assert_eq!(game.status(), Status::Playing);
    }
}
