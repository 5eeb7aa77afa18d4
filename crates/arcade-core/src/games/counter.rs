use crate::game::{Playable, Status};
use std::time::Duration;
use tracing::{debug, info};

/// What the clickable figure looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skin {
    Cameraman,
    Lego,
    Minecraft,
    Cameraman2,
    Titan,
    Mario(u8),
}

/// Counts at which the skin changes, in ascending order
const MILESTONES: [(u64, Skin); 11] = [
    (10, Skin::Lego),
    (50, Skin::Minecraft),
    (100, Skin::Cameraman2),
    (300, Skin::Titan),
    (500, Skin::Mario(1)),
    (800, Skin::Mario(2)),
    (1000, Skin::Mario(3)),
    (1010, Skin::Mario(4)),
    (1100, Skin::Mario(5)),
    (1200, Skin::Mario(6)),
    (1500, Skin::Mario(7)),
];

impl Skin {
    /// Skin shown at `count` clicks
    pub fn for_count(count: u64) -> Self {
        MILESTONES
            .iter()
            .rev()
            .find(|(at, _)| count >= *at)
            .map_or(Skin::Cameraman, |&(_, skin)| skin)
    }

    pub fn name(self) -> String {
        match self {
            Skin::Cameraman => "Cameraman".to_string(),
            Skin::Lego => "Lego Cameraman".to_string(),
            Skin::Minecraft => "Minecraft Cameraman".to_string(),
            Skin::Cameraman2 => "Cameraman Mk II".to_string(),
            Skin::Titan => "Titan Cameraman".to_string(),
            Skin::Mario(n) => format!("Mario #{}", n),
        }
    }

    /// Next milestone after `count`, if any
    pub fn next_milestone(count: u64) -> Option<u64> {
        MILESTONES.iter().map(|(at, _)| *at).find(|&at| at > count)
    }
}

/// Click as fast as you like
#[derive(Debug, Clone, Default)]
pub struct Counter {
    count: u64,
    best: u64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume with a previously recorded best
    pub fn with_best(best: u64) -> Self {
        Self { count: 0, best }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    pub fn skin(&self) -> Skin {
        Skin::for_count(self.count)
    }

    /// Returns true when the click reached a new skin
    pub fn click(&mut self) -> bool {
        self.count += 1;
        if self.count > self.best {
            self.best = self.count;
        }
        let changed = MILESTONES.iter().any(|(at, _)| *at == self.count);
        if changed {
            debug!(count = self.count, skin = %self.skin().name(), "counter milestone");
        }
        changed
    }

    /// Clears both the count and the best
    pub fn reset(&mut self) {
        info!(count = self.count, best = self.best, "counter reset");
        self.count = 0;
        self.best = 0;
    }
}

impl Playable for Counter {
    fn advance(&mut self, _dt: Duration) {}

    fn status(&self) -> Status {
        Status::Playing
    }

    fn score(&self) -> u64 {
        self.best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skins_follow_milestones() {
        assert_eq!(Skin::for_count(0), Skin::Cameraman);
        assert_eq!(Skin::for_count(9), Skin::Cameraman);
        assert_eq!(Skin::for_count(10), Skin::Lego);
        assert_eq!(Skin::for_count(1009), Skin::Mario(3));
        assert_eq!(Skin::for_count(1010), Skin::Mario(4));
        assert_eq!(Skin::for_count(99_999), Skin::Mario(7));
        assert_eq!(Skin::next_milestone(0), Some(10));
        assert_eq!(Skin::next_milestone(1500), None);
    }

    #[test]
    fn test_click_reports_skin_change() {
        let mut counter = Counter::new();
        for _ in 0..9 {
            assert!(!counter.click());
        }
        assert!(counter.click());
        assert_eq!(counter.skin(), Skin::Lego);
    }

    #[test]
    fn test_best_tracks_immediately() {
        let mut counter = Counter::with_best(3);
        counter.click();
        counter.click();
        assert_eq!(counter.best(), 3);
        counter.click();
        counter.click();
        assert_eq!(counter.best(), 4);
        assert_eq!(counter.score(), 4);
    }

    #[test]
    fn test_reset_clears_best() {
        let mut counter = Counter::with_best(30);
        counter.click();
        counter.reset();
        assert_eq!(counter.count(), 0);
        assert_eq!(counter.best(), 0);
        assert_eq!(counter.skin(), Skin::Cameraman);
    }
}
