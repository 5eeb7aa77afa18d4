use super::make_rng;
use crate::clock::FrameClock;
use crate::game::{Playable, Status};
use crate::geometry::Rect;
use rand::rngs::StdRng;
use rand::Rng;
use std::time::Duration;
use tracing::info;

pub const WIDTH: f32 = 800.0;
pub const HEIGHT: f32 = 250.0;
pub const GROUND_Y: f32 = HEIGHT - 20.0;

pub const RUNNER_WIDTH: f32 = 40.0;
pub const RUNNER_HEIGHT: f32 = 60.0;
const RUNNER_X: f32 = 50.0;
const JUMP_VELOCITY: f32 = -10.0;
const GRAVITY: f32 = 0.4;

pub const OBSTACLE_WIDTH: f32 = 20.0;
const OBSTACLE_MIN_HEIGHT: f32 = 30.0;
const OBSTACLE_MAX_HEIGHT: f32 = 60.0;
const OBSTACLE_MIN_GAP: f32 = 250.0;
const OBSTACLE_MAX_GAP: f32 = 550.0;

const INITIAL_SPEED: f32 = 5.0;
const MAX_SPEED: f32 = 15.0;
const SPEED_STEP_POINTS: u64 = 100;
const SPEED_STEP: f32 = 0.5;
const POINTS_PER_FRAME: f64 = 0.1;

/// Endless side-scroller: jump the obstacles for as long as possible
pub struct Runner {
    rng: StdRng,
    clock: FrameClock,
    runner: Rect,
    vy: f32,
    airborne: bool,
    obstacles: Vec<Rect>,
    next_gap: f32,
    speed: f32,
    last_speedup: u64,
    distance: f64,
    status: Status,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner {
    pub fn new() -> Self {
        Self::build(None)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::build(Some(seed))
    }

    fn build(seed: Option<u64>) -> Self {
        let mut rng = make_rng(seed);
        let next_gap = rng.gen_range(OBSTACLE_MIN_GAP..OBSTACLE_MAX_GAP);
        Self {
            rng,
            clock: FrameClock::new(),
            runner: Rect::new(RUNNER_X, GROUND_Y - RUNNER_HEIGHT, RUNNER_WIDTH, RUNNER_HEIGHT),
            vy: 0.0,
            airborne: false,
            obstacles: Vec::new(),
            next_gap,
            speed: INITIAL_SPEED,
            last_speedup: 0,
            distance: 0.0,
            status: Status::Playing,
        }
    }

    pub fn runner(&self) -> Rect {
        self.runner
    }

    pub fn obstacles(&self) -> &[Rect] {
        &self.obstacles
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_airborne(&self) -> bool {
        self.airborne
    }

    /// Jump; ignored while already in the air
    pub fn jump(&mut self) {
        if !self.airborne && !self.status.is_over() {
            self.vy = JUMP_VELOCITY;
            self.airborne = true;
        }
    }

    pub fn step(&mut self) {
        if self.status.is_over() {
            return;
        }

        self.vy += GRAVITY;
        self.runner.y += self.vy;
        if self.runner.bottom() > GROUND_Y {
            self.runner.y = GROUND_Y - RUNNER_HEIGHT;
            self.vy = 0.0;
            self.airborne = false;
        }

        let points = self.score();
        if points - self.last_speedup >= SPEED_STEP_POINTS && self.speed < MAX_SPEED {
            self.speed = (self.speed + SPEED_STEP).min(MAX_SPEED);
            self.last_speedup = points;
        }

        let due = match self.obstacles.last() {
            None => true,
            Some(last) => WIDTH - last.x >= self.next_gap,
        };
        if due {
            let height = self.rng.gen_range(OBSTACLE_MIN_HEIGHT..OBSTACLE_MAX_HEIGHT);
            self.obstacles
                .push(Rect::new(WIDTH, GROUND_Y - height, OBSTACLE_WIDTH, height));
            self.next_gap = self.rng.gen_range(OBSTACLE_MIN_GAP..OBSTACLE_MAX_GAP);
        }

        for obstacle in &mut self.obstacles {
            obstacle.x -= self.speed;
        }
        if self.obstacles.iter().any(|o| o.intersects(&self.runner)) {
            info!(score = self.score(), "runner crashed");
            self.status = Status::Lost;
            return;
        }
        self.obstacles.retain(|o| o.right() >= 0.0);

        self.distance += POINTS_PER_FRAME;
    }
}

impl Playable for Runner {
    fn advance(&mut self, dt: Duration) {
        for _ in 0..self.clock.frames(dt) {
            self.step();
        }
    }

    fn status(&self) -> Status {
        self.status
    }

    fn score(&self) -> u64 {
        // Small epsilon keeps repeated 0.1 additions from flooring one short
        (self.distance + 1e-9).floor() as u64
    }
}
