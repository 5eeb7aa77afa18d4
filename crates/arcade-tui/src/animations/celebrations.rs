use rand::prelude::SliceRandom;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::particles::{random_bright_color, random_dark_color, Particle, CONFETTI_CHARS, RAIN_CHARS};

/// Seconds per update, at the ~30 FPS the game-over screen ticks at
const FRAME_SECS: f32 = 0.033;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Confetti,
    Fireworks,
    /// For losses
    Rain,
}

/// Particle effect behind the game-over screen
pub struct Celebration {
    effect: Effect,
    particles: Vec<Particle>,
    frame_count: u32,
    firework_cooldown: u32,
    rng: StdRng,
    pub width: u16,
    pub height: u16,
}

impl Celebration {
    pub fn win() -> Self {
        let mut rng = StdRng::from_entropy();
        let effect = if rng.gen_bool(0.5) {
            Effect::Confetti
        } else {
            Effect::Fireworks
        };
        Self::with_rng(effect, rng)
    }

    pub fn loss() -> Self {
        Self::with_rng(Effect::Rain, StdRng::from_entropy())
    }

    pub fn with_rng(effect: Effect, rng: StdRng) -> Self {
        Self {
            effect,
            particles: Vec::new(),
            frame_count: 0,
            firework_cooldown: 0,
            rng,
            width: 80,
            height: 24,
        }
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    pub fn update(&mut self) {
        self.frame_count += 1;

        let gravity = match self.effect {
            Effect::Rain => 0.0,
            _ => 0.05,
        };
        let bottom = self.height as f32 + 2.0;
        self.particles.retain_mut(|p| {
            p.update(FRAME_SECS, gravity);
            p.lifetime > 0.0 && p.y < bottom
        });

        match self.effect {
            Effect::Confetti => self.spawn_confetti(),
            Effect::Fireworks => self.spawn_fireworks(),
            Effect::Rain => self.spawn_rain(),
        }
    }

    /// Particles currently on screen
    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.particles
            .iter()
            .filter(move |p| p.is_visible(self.width, self.height))
    }

    fn spawn_confetti(&mut self) {
        for _ in 0..3 {
            let particle = Particle {
                x: self.rng.gen_range(0.0..self.width.max(1) as f32),
                y: 0.0,
                vx: self.rng.gen_range(-0.5..0.5),
                vy: self.rng.gen_range(0.2..0.6),
                char: CONFETTI_CHARS.choose(&mut self.rng).copied().unwrap_or('*'),
                color: random_bright_color(&mut self.rng),
                lifetime: self.rng.gen_range(3.0..6.0),
            };
            self.particles.push(particle);
        }
    }

    fn spawn_fireworks(&mut self) {
        if self.firework_cooldown > 0 {
            self.firework_cooldown -= 1;
            return;
        }
        let w = self.width.max(4) as f32;
        let h = self.height.max(4) as f32;
        let x = self.rng.gen_range(w * 0.1..w * 0.9);
        let y = self.rng.gen_range(h * 0.1..h * 0.5);
        let color = random_bright_color(&mut self.rng);
        for _ in 0..25 {
            let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
            let speed = self.rng.gen_range(0.3..1.2);
            self.particles.push(Particle {
                x,
                y,
                // Cells are about twice as tall as they are wide
                vx: angle.cos() * speed * 2.0,
                vy: angle.sin() * speed,
                char: '●',
                color,
                lifetime: self.rng.gen_range(0.8..1.8),
            });
        }
        self.firework_cooldown = 20;
    }

    fn spawn_rain(&mut self) {
        for _ in 0..2 {
            let particle = Particle {
                x: self.rng.gen_range(0.0..self.width.max(1) as f32),
                y: 0.0,
                vx: 0.0,
                vy: self.rng.gen_range(0.4..0.9),
                char: RAIN_CHARS.choose(&mut self.rng).copied().unwrap_or('|'),
                color: random_dark_color(&mut self.rng),
                lifetime: self.rng.gen_range(2.0..4.0),
            };
            self.particles.push(particle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(effect: Effect) -> Celebration {
        let mut c = Celebration::with_rng(effect, StdRng::seed_from_u64(1));
        c.resize(40, 12);
        c
    }

    #[test]
    fn test_confetti_spawns_every_frame() {
        let mut c = seeded(Effect::Confetti);
        c.update();
        assert_eq!(c.particles.len(), 3);
        c.update();
        assert_eq!(c.particles.len(), 6);
        assert_eq!(c.frame_count(), 2);
    }

    #[test]
    fn test_fireworks_burst_then_cool_down() {
        let mut c = seeded(Effect::Fireworks);
        c.update();
        assert_eq!(c.particles.len(), 25);
        c.update();
        assert_eq!(c.particles.len(), 25);
    }

    #[test]
    fn test_rain_falls_straight_and_leaves_screen() {
        let mut c = seeded(Effect::Rain);
        c.update();
        assert!(c.particles.iter().all(|p| p.vx == 0.0));
        for _ in 0..200 {
            c.update();
        }
        // Old drops age out, so the population stays bounded
        assert!(c.particles.len() < 200);
        assert!(c.particles().all(|p| p.y < 12.0));
    }

    #[test]
    fn test_visible_particles_are_inside() {
        let mut c = seeded(Effect::Fireworks);
        for _ in 0..30 {
            c.update();
        }
        assert!(c.particles().all(|p| p.x >= 0.0 && p.x < 40.0));
    }

    #[test]
    fn test_loss_uses_rain() {
        assert_eq!(Celebration::loss().effect(), Effect::Rain);
        assert_ne!(Celebration::win().effect(), Effect::Rain);
    }
}
