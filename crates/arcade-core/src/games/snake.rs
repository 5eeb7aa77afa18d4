use super::make_rng;
use crate::clock::Ticker;
use crate::game::{Playable, Status};
use crate::geometry::{Direction, GridPos};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::VecDeque;
use std::time::Duration;
use tracing::info;

pub const GRID_SIZE: usize = 20;
pub const STEP_INTERVAL: Duration = Duration::from_millis(150);

/// Classic snake on a walled square board
pub struct Snake {
    rng: StdRng,
    ticker: Ticker,
    /// Head first
    body: VecDeque<GridPos>,
    heading: Direction,
    /// Turn requested since the last step
    queued: Option<Direction>,
    food: Option<GridPos>,
    score: u64,
    status: Status,
}

impl Default for Snake {
    fn default() -> Self {
        Self::new()
    }
}

impl Snake {
    pub fn new() -> Self {
        Self::build(None)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::build(Some(seed))
    }

    fn build(seed: Option<u64>) -> Self {
        let mut game = Self {
            rng: make_rng(seed),
            ticker: Ticker::new(STEP_INTERVAL),
            body: [GridPos::new(10, 10), GridPos::new(10, 9), GridPos::new(10, 8)]
                .into_iter()
                .collect(),
            heading: Direction::Right,
            queued: None,
            food: None,
            score: 0,
            status: Status::Playing,
        };
        game.place_food();
        game
    }

    pub fn body(&self) -> impl Iterator<Item = GridPos> + '_ {
        self.body.iter().copied()
    }

    pub fn head(&self) -> GridPos {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn food(&self) -> Option<GridPos> {
        self.food
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Request a turn. Only the first request between steps is honoured and
    /// reversing onto the neck is refused.
    pub fn turn(&mut self, dir: Direction) {
        if self.queued.is_none() && dir != self.heading.opposite() {
            self.queued = Some(dir);
        }
    }

    fn place_food(&mut self) {
        let free: Vec<GridPos> = (0..GRID_SIZE)
            .flat_map(|row| (0..GRID_SIZE).map(move |col| GridPos::new(row, col)))
            .filter(|pos| !self.body.contains(pos))
            .collect();
        self.food = free.choose(&mut self.rng).copied();
    }

    /// Move one cell
    pub fn step(&mut self) {
        if self.status.is_over() {
            return;
        }
        if let Some(dir) = self.queued.take() {
            self.heading = dir;
        }

        let Some(next) = self.head().step(self.heading, GRID_SIZE, GRID_SIZE) else {
            info!(score = self.score, "snake hit the wall");
            self.status = Status::Lost;
            return;
        };

        let eating = self.food == Some(next);
        // The tail vacates its cell this step unless the snake grows
        let solid = if eating { self.body.len() } else { self.body.len() - 1 };
        if self.body.iter().take(solid).any(|&p| p == next) {
            info!(score = self.score, "snake bit itself");
            self.status = Status::Lost;
            return;
        }

        self.body.push_front(next);
        if eating {
            self.score += 1;
            self.place_food();
            if self.food.is_none() {
                info!(score = self.score, "snake filled the board");
                self.status = Status::Won;
            }
        } else {
            self.body.pop_back();
        }
    }
}

impl Playable for Snake {
    fn advance(&mut self, dt: Duration) {
        for _ in 0..self.ticker.ticks(dt) {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let game = Snake::with_seed(1);
        assert_eq!(game.len(), 3);
        assert_eq!(game.head(), GridPos::new(10, 10));
        assert_eq!(game.heading(), Direction::Right);
        let food = game.food().unwrap();
        assert!(!game.body().any(|p| p == food));
    }

    #[test]
    fn test_steps_on_interval() {
        let mut game = Snake::with_seed(1);
        game.food = Some(GridPos::new(0, 0));
        game.advance(Duration::from_millis(100));
        assert_eq!(game.head(), GridPos::new(10, 10));
        game.advance(Duration::from_millis(50));
        assert_eq!(game.head(), GridPos::new(10, 11));
    }

    #[test]
    fn test_reverse_is_ignored() {
        let mut game = Snake::with_seed(1);
        game.food = Some(GridPos::new(0, 0));
        game.turn(Direction::Left);
        game.step();
        assert_eq!(game.heading(), Direction::Right);
        assert_eq!(game.head(), GridPos::new(10, 11));
    }

    #[test]
    fn test_one_turn_per_step() {
        let mut game = Snake::with_seed(1);
        game.food = Some(GridPos::new(0, 0));
        game.turn(Direction::Up);
        // Second request before the step is dropped
        game.turn(Direction::Left);
        game.step();
        assert_eq!(game.head(), GridPos::new(9, 10));
        game.turn(Direction::Left);
        game.step();
        assert_eq!(game.head(), GridPos::new(9, 9));
    }

    #[test]
    fn test_eating_grows_and_scores() {
        let mut game = Snake::with_seed(1);
        game.food = Some(GridPos::new(10, 11));
        game.step();
        assert_eq!(game.len(), 4);
        assert_eq!(game.score(), 1);
        let food = game.food().unwrap();
        assert!(!game.body().any(|p| p == food));
    }

    #[test]
    fn test_wall_collision() {
        let mut game = Snake::with_seed(1);
        game.food = Some(GridPos::new(0, 0));
        for _ in 0..9 {
            game.step();
        }
        assert_eq!(game.head(), GridPos::new(10, 19));
        assert_eq!(game.status(), Status::Playing);
        game.step();
        assert_eq!(game.status(), Status::Lost);
    }

    #[test]
    fn test_chasing_the_tail_is_allowed() {
        let mut game = Snake::with_seed(1);
        game.body = [
            GridPos::new(5, 5),
            GridPos::new(5, 4),
            GridPos::new(6, 4),
            GridPos::new(6, 5),
        ]
        .into_iter()
        .collect();
        game.heading = Direction::Down;
        game.food = Some(GridPos::new(0, 0));
        game.step();
        assert_eq!(game.status(), Status::Playing);
        assert_eq!(game.head(), GridPos::new(6, 5));
    }

    #[test]
    fn test_biting_body_loses() {
        let mut game = Snake::with_seed(1);
        game.body = [
            GridPos::new(5, 5),
            GridPos::new(5, 4),
            GridPos::new(6, 4),
            GridPos::new(6, 5),
            GridPos::new(6, 6),
        ]
        .into_iter()
        .collect();
        game.heading = Direction::Down;
        game.food = Some(GridPos::new(0, 0));
        game.step();
        assert_eq!(game.status(), Status::Lost);
    }

    #[test]
    fn test_full_board_wins() {
        let mut game = Snake::with_seed(1);
        let mut cells: VecDeque<GridPos> = (0..GRID_SIZE)
            .flat_map(|row| (0..GRID_SIZE).map(move |col| GridPos::new(row, col)))
            .collect();
        // Bottom-right corner stays free, head sits just left of it
        let free = cells.pop_back().unwrap();
        game.body = cells.into_iter().rev().collect();
        game.heading = Direction::Right;
        game.food = Some(free);
        game.step();
        assert_eq!(game.status(), Status::Won);
    }
}
