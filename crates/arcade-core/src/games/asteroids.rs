use super::make_rng;
use crate::clock::FrameClock;
use crate::game::{Playable, Status};
use crate::geometry::{circles_overlap, wrap, Vec2};
use rand::rngs::StdRng;
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, TAU};
use std::time::Duration;
use tracing::{debug, info};

pub const WIDTH: f32 = 800.0;
pub const HEIGHT: f32 = 600.0;

pub const SHIP_RADIUS: f32 = 10.0;
const SHIP_ROTATION_SPEED: f32 = 0.08;
const SHIP_THRUST: f32 = 0.05;
const SHIP_FRICTION: f32 = 0.99;
const HIT_COOLDOWN: u32 = 120;
const BLINK_FRAMES: u32 = 10;

const BULLET_SPEED: f32 = 7.0;
const BULLET_LIFESPAN: u32 = 60;
pub const BULLET_RADIUS: f32 = 2.0;

const ASTEROID_BASE_SPEED: f32 = 1.0;
const ASTEROID_SPEED_PER_LEVEL: f32 = 0.3;
pub const ASTEROID_MAX_RADIUS: f32 = 30.0;
/// Asteroids larger than this split in two when shot
const SPLIT_RADIUS: f32 = 15.0;
pub const ASTEROID_VERTICES: usize = 10;
const INITIAL_ASTEROIDS: usize = 4;
const SAFE_SPAWN_DISTANCE: f32 = 150.0;

pub const TOTAL_LEVELS: u32 = 10;
pub const STARTING_LIVES: u32 = 3;
pub const ASTEROID_POINTS: u64 = 10;
/// Pause between clearing a level and the next wave
const LEVEL_INTERMISSION: u32 = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading in radians, counter-clockwise from the positive x axis
    pub angle: f32,
    pub thrusting: bool,
    cooldown: u32,
    blink_timer: u32,
    blink_on: bool,
}

impl Ship {
    fn spawn() -> Self {
        Self {
            pos: Vec2::new(WIDTH / 2.0, HEIGHT / 2.0),
            vel: Vec2::ZERO,
            angle: FRAC_PI_2,
            thrusting: false,
            cooldown: HIT_COOLDOWN,
            blink_timer: 0,
            blink_on: true,
        }
    }

    pub fn is_invulnerable(&self) -> bool {
        self.cooldown > 0
    }

    /// False on the hidden phase of the invulnerability blink
    pub fn is_visible(&self) -> bool {
        !(self.is_invulnerable() && self.blink_on)
    }

    /// Nose, left and right corners of the hull
    pub fn hull(&self) -> [Vec2; 3] {
        let (sin, cos) = self.angle.sin_cos();
        let r = SHIP_RADIUS;
        [
            Vec2::new(self.pos.x + r * cos, self.pos.y - r * sin),
            Vec2::new(self.pos.x - r * (cos + sin), self.pos.y + r * (sin - cos)),
            Vec2::new(self.pos.x - r * (cos - sin), self.pos.y + r * (sin + cos)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    life: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Asteroid {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub angle: f32,
    spin: f32,
    /// Radial jitter per vertex
    pub offsets: [f32; ASTEROID_VERTICES],
}

impl Asteroid {
    /// Outline vertices in field space
    pub fn outline(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.offsets.iter().enumerate().map(move |(i, offset)| {
            let a = i as f32 / ASTEROID_VERTICES as f32 * TAU + self.angle;
            Vec2::new(
                self.pos.x + self.radius * offset * a.cos(),
                self.pos.y + self.radius * offset * a.sin(),
            )
        })
    }
}

/// Ship-versus-rocks shooter across ten waves
pub struct Asteroids {
    rng: StdRng,
    clock: FrameClock,
    ship: Ship,
    rotation: f32,
    bullets: Vec<Bullet>,
    asteroids: Vec<Asteroid>,
    level: u32,
    lives: u32,
    score: u64,
    intermission: Option<u32>,
    status: Status,
}

impl Default for Asteroids {
    fn default() -> Self {
        Self::new()
    }
}

impl Asteroids {
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
            ship: Ship::spawn(),
            rotation: 0.0,
            bullets: Vec::new(),
            asteroids: Vec::new(),
            level: 1,
            lives: STARTING_LIVES,
            score: 0,
            intermission: None,
            status: Status::Playing,
        };
        game.spawn_wave(INITIAL_ASTEROIDS);
        game
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// True while waiting for the next wave
    pub fn in_intermission(&self) -> bool {
        self.intermission.is_some()
    }

    /// -1 turns left (counter-clockwise), 1 turns right, 0 holds the heading
    pub fn set_rotation(&mut self, dir: i8) {
        self.rotation = -f32::from(dir.signum()) * SHIP_ROTATION_SPEED;
    }

    pub fn set_thrust(&mut self, on: bool) {
        self.ship.thrusting = on;
    }

    /// No shots while the engine is burning
    pub fn fire(&mut self) {
        if self.status.is_over() || self.ship.thrusting {
            return;
        }
        let heading = Vec2::from_heading(self.ship.angle);
        self.bullets.push(Bullet {
            pos: self.ship.pos + heading * SHIP_RADIUS,
            vel: heading * BULLET_SPEED + self.ship.vel,
            life: BULLET_LIFESPAN,
        });
    }

    /// Number of asteroids in the wave that opens `level`
    pub fn wave_size(level: u32) -> usize {
        if level <= 1 {
            INITIAL_ASTEROIDS
        } else {
            INITIAL_ASTEROIDS + level as usize * 3 + level as usize / 3
        }
    }

    fn asteroid_speed(&self) -> f32 {
        ASTEROID_BASE_SPEED + (self.level.saturating_sub(1)) as f32 * ASTEROID_SPEED_PER_LEVEL
    }

    fn spawn_wave(&mut self, count: usize) {
        for _ in 0..count {
            let pos = loop {
                let candidate = Vec2::new(self.rng.gen_range(0.0..WIDTH), self.rng.gen_range(0.0..HEIGHT));
                if candidate.distance(self.ship.pos) >= SAFE_SPAWN_DISTANCE {
                    break candidate;
                }
            };
            let rock = self.make_asteroid(pos, ASTEROID_MAX_RADIUS);
            self.asteroids.push(rock);
        }
        debug!(level = self.level, count, "asteroid wave spawned");
    }

    fn make_asteroid(&mut self, pos: Vec2, radius: f32) -> Asteroid {
        let speed = self.asteroid_speed();
        let vel = loop {
            let v = Vec2::new(
                self.rng.gen_range(-speed..speed),
                self.rng.gen_range(-speed..speed),
            );
            if v != Vec2::ZERO {
                break v;
            }
        };
        let mut offsets = [1.0; ASTEROID_VERTICES];
        for offset in offsets.iter_mut() {
            *offset = self.rng.gen_range(0.8..1.2);
        }
        Asteroid {
            pos,
            vel,
            radius,
            angle: self.rng.gen_range(0.0..TAU),
            spin: self.rng.gen_range(-0.01..0.01),
            offsets,
        }
    }

    fn reset_ship(&mut self) {
        let thrusting = self.ship.thrusting;
        self.ship = Ship::spawn();
        self.ship.thrusting = thrusting;
        self.bullets.clear();
    }

    /// Simulate a single frame
    pub fn step(&mut self) {
        if self.status.is_over() {
            return;
        }

        if let Some(frames) = self.intermission {
            if frames > 1 {
                self.intermission = Some(frames - 1);
            } else {
                self.intermission = None;
                self.reset_ship();
                self.spawn_wave(Self::wave_size(self.level));
            }
        }

        self.update_ship();
        self.update_bullets();

        for rock in &mut self.asteroids {
            rock.pos += rock.vel;
            rock.angle += rock.spin;
            rock.pos.x = wrap(rock.pos.x, WIDTH, rock.radius);
            rock.pos.y = wrap(rock.pos.y, HEIGHT, rock.radius);
        }

        if !self.ship.is_invulnerable()
            && self
                .asteroids
                .iter()
                .any(|rock| circles_overlap(self.ship.pos, SHIP_RADIUS, rock.pos, rock.radius))
        {
            self.lives = self.lives.saturating_sub(1);
            if self.lives == 0 {
                info!(score = self.score, level = self.level, "asteroids lost");
                self.status = Status::Lost;
                return;
            }
            debug!(lives = self.lives, "ship destroyed");
            self.reset_ship();
        }

        self.resolve_shots();

        if self.asteroids.is_empty() && self.intermission.is_none() {
            if self.level >= TOTAL_LEVELS {
                info!(score = self.score, "asteroids won");
                self.status = Status::Won;
            } else {
                self.level += 1;
                self.intermission = Some(LEVEL_INTERMISSION);
                debug!(level = self.level, "asteroids level cleared");
            }
        }
    }

    fn update_ship(&mut self) {
        let ship = &mut self.ship;
        ship.angle += self.rotation;
        if ship.thrusting {
            ship.vel += Vec2::from_heading(ship.angle) * SHIP_THRUST;
        }
        ship.vel = ship.vel * SHIP_FRICTION;
        ship.pos += ship.vel;
        ship.pos.x = wrap(ship.pos.x, WIDTH, SHIP_RADIUS);
        ship.pos.y = wrap(ship.pos.y, HEIGHT, SHIP_RADIUS);

        if ship.cooldown > 0 {
            ship.cooldown -= 1;
            if ship.blink_timer <= 1 {
                ship.blink_on = !ship.blink_on;
                ship.blink_timer = BLINK_FRAMES;
            } else {
                ship.blink_timer -= 1;
            }
        }
    }

    fn update_bullets(&mut self) {
        for bullet in &mut self.bullets {
            bullet.pos += bullet.vel;
            bullet.life = bullet.life.saturating_sub(1);
            bullet.pos.x = wrap(bullet.pos.x, WIDTH, 0.0);
            bullet.pos.y = wrap(bullet.pos.y, HEIGHT, 0.0);
        }
        self.bullets.retain(|b| b.life > 0);
    }

    fn resolve_shots(&mut self) {
        let mut i = self.asteroids.len();
        while i > 0 {
            i -= 1;
            let rock = &self.asteroids[i];
            let Some(hit) = self
                .bullets
                .iter()
                .position(|b| circles_overlap(b.pos, BULLET_RADIUS, rock.pos, rock.radius))
            else {
                continue;
            };
            self.bullets.remove(hit);
            let rock = self.asteroids.remove(i);
            self.score += ASTEROID_POINTS;
            if rock.radius > SPLIT_RADIUS {
                for _ in 0..2 {
                    let child = self.make_asteroid(rock.pos, rock.radius / 2.0);
                    self.asteroids.push(child);
                }
            }
        }
    }
}

impl Playable for Asteroids {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn rock_at(game: &mut Asteroids, pos: Vec2, radius: f32) -> Asteroid {
        let mut rock = game.make_asteroid(pos, radius);
        rock.vel = Vec2::ZERO;
        rock.spin = 0.0;
        rock
    }

    #[test]
    fn test_initial_wave_is_clear_of_ship() {
        let game = Asteroids::with_seed(11);
        assert_eq!(game.asteroids().len(), 4);
        for rock in game.asteroids() {
            assert!(rock.pos.distance(game.ship().pos) >= SAFE_SPAWN_DISTANCE);
            assert!(rock.vel != Vec2::ZERO);
        }
    }

    #[test]
    fn test_wave_sizes() {
        assert_eq!(Asteroids::wave_size(1), 4);
        assert_eq!(Asteroids::wave_size(2), 10);
        assert_eq!(Asteroids::wave_size(3), 14);
        assert_eq!(Asteroids::wave_size(10), 37);
    }

    #[test]
    fn test_thrust_moves_ship_up() {
        let mut game = Asteroids::with_seed(1);
        game.asteroids.clear();
        game.intermission = Some(1000);
        game.set_thrust(true);
        let start = game.ship().pos;
        for _ in 0..30 {
            game.step();
        }
        assert!(game.ship().pos.y < start.y);
        assert!((game.ship().pos.x - start.x).abs() < 1e-3);
    }

    #[test]
    fn test_rotation_direction() {
        let mut game = Asteroids::with_seed(1);
        game.set_rotation(-1);
        game.step();
        assert!(game.ship().angle > FRAC_PI_2);
        game.set_rotation(1);
        game.step();
        game.step();
        assert!(game.ship().angle < FRAC_PI_2);
    }

    #[test]
    fn test_bullets_expire() {
        let mut game = Asteroids::with_seed(1);
        game.asteroids.clear();
        game.intermission = Some(1000);
        game.fire();
        assert_eq!(game.bullets().len(), 1);
        for _ in 0..BULLET_LIFESPAN {
            game.step();
        }
        assert!(game.bullets().is_empty());
    }

    #[test]
    fn test_no_fire_while_thrusting() {
        let mut game = Asteroids::with_seed(1);
        game.set_thrust(true);
        game.fire();
        assert!(game.bullets().is_empty());
        game.set_thrust(false);
        game.fire();
        assert_eq!(game.bullets().len(), 1);
    }

    #[test]
    fn test_respawn_blinks_until_cooldown_ends() {
        let mut game = Asteroids::with_seed(1);
        game.asteroids.clear();
        game.intermission = Some(1000);
        game.ship = Ship::spawn();

        game.step();
        let mut visible = game.ship().is_visible();
        let mut toggles = 0;
        for frame in 2..=HIT_COOLDOWN {
            game.step();
            let now = game.ship().is_visible();
            if now != visible {
                toggles += 1;
                // Toggles land on frames 11, 21, 31, ... until the cooldown runs out
                if game.ship().is_invulnerable() {
                    assert_eq!(frame % BLINK_FRAMES, 1, "toggle at frame {frame}");
                }
                visible = now;
            }
        }
        assert!(toggles >= (HIT_COOLDOWN / BLINK_FRAMES - 2) as usize);
        assert!(!game.ship().is_invulnerable());
        for _ in 0..3 * BLINK_FRAMES {
            game.step();
            assert!(game.ship().is_visible());
        }
    }

    #[test]
    fn test_shot_splits_large_asteroid() {
        let mut game = Asteroids::with_seed(5);
        let target = rock_at(&mut game, Vec2::new(400.0, 250.0), ASTEROID_MAX_RADIUS);
        game.asteroids = vec![target];
        game.fire();
        for _ in 0..10 {
            game.step();
            if game.score() > 0 {
                break;
            }
        }
        assert_eq!(game.score(), ASTEROID_POINTS);
        assert_eq!(game.asteroids().len(), 2);
        assert!(game.asteroids().iter().all(|r| r.radius == ASTEROID_MAX_RADIUS / 2.0));
        assert!(game.bullets().is_empty());
    }

    #[test]
    fn test_small_asteroid_does_not_split() {
        let mut game = Asteroids::with_seed(5);
        let target = rock_at(&mut game, Vec2::new(400.0, 250.0), SPLIT_RADIUS);
        game.asteroids = vec![target];
        game.fire();
        for _ in 0..10 {
            game.step();
        }
        assert_eq!(game.score(), ASTEROID_POINTS);
        assert!(game.asteroids().is_empty());
        assert!(game.in_intermission());
        assert_eq!(game.level(), 2);
    }

    #[test]
    fn test_next_wave_after_intermission() {
        let mut game = Asteroids::with_seed(5);
        game.asteroids.clear();
        game.step();
        assert_eq!(game.level(), 2);
        for _ in 0..LEVEL_INTERMISSION {
            game.step();
        }
        assert!(!game.in_intermission());
        assert_eq!(game.asteroids().len(), Asteroids::wave_size(2));
        assert_eq!(game.level(), 2);
    }

    #[test]
    fn test_clearing_last_level_wins() {
        let mut game = Asteroids::with_seed(5);
        game.level = TOTAL_LEVELS;
        game.asteroids.clear();
        game.step();
        assert_eq!(game.status(), Status::Won);
    }

    #[test]
    fn test_collision_costs_life_and_respawns_invulnerable() {
        let mut game = Asteroids::with_seed(9);
        let centre = Vec2::new(WIDTH / 2.0, HEIGHT / 2.0);
        let rock = rock_at(&mut game, centre, ASTEROID_MAX_RADIUS);
        game.asteroids = vec![rock];
        game.ship.cooldown = 0;
        game.step();
        assert_eq!(game.lives(), STARTING_LIVES - 1);
        assert!(game.ship().is_invulnerable());
        // Invulnerable ship sits inside the rock without losing more lives
        for _ in 0..50 {
            game.step();
        }
        assert_eq!(game.lives(), STARTING_LIVES - 1);
    }

    #[test]
    fn test_last_life_loses() {
        let mut game = Asteroids::with_seed(9);
        let centre = Vec2::new(WIDTH / 2.0, HEIGHT / 2.0);
        let rock = rock_at(&mut game, centre, ASTEROID_MAX_RADIUS);
        game.asteroids = vec![rock];
        game.lives = 1;
        game.ship.cooldown = 0;
        game.step();
        assert_eq!(game.status(), Status::Lost);
    }

    #[test]
    fn test_wrap_around_edges() {
        let mut game = Asteroids::with_seed(1);
        game.asteroids.clear();
        game.intermission = Some(1000);
        game.ship.pos = Vec2::new(WIDTH + SHIP_RADIUS + 0.5, 100.0);
        game.ship.vel = Vec2::new(1.0, 0.0);
        game.step();
        assert_eq!(game.ship().pos.x, -SHIP_RADIUS);
    }
}
