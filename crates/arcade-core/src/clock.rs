use std::time::Duration;

/// One simulation frame at 60 Hz
pub const FRAME: Duration = Duration::from_nanos(16_666_667);

/// Most frames simulated for a single delta; the rest are dropped
pub const MAX_CATCH_UP: u32 = 5;

/// Converts wall-clock deltas into whole fixed frames
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    pending: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames due after `dt` has elapsed
    pub fn frames(&mut self, dt: Duration) -> u32 {
        self.pending += dt;
        let due = (self.pending.as_nanos() / FRAME.as_nanos()) as u32;
        if due > MAX_CATCH_UP {
            self.pending = Duration::ZERO;
            return MAX_CATCH_UP;
        }
        self.pending -= FRAME * due;
        due
    }
}

/// Fires repeatedly with a fixed (but adjustable) period
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    pending: Duration,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            pending: Duration::ZERO,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn set_period(&mut self, period: Duration) {
        self.period = period;
    }

    /// Number of periods completed after `dt`
    pub fn ticks(&mut self, dt: Duration) -> u32 {
        if self.period.is_zero() {
            return 0;
        }
        self.pending += dt;
        let mut count = 0;
        while self.pending >= self.period {
            self.pending -= self.period;
            count += 1;
        }
        count
    }

    pub fn reset(&mut self) {
        self.pending = Duration::ZERO;
    }
}

/// One-shot timer
#[derive(Debug, Clone, Default)]
pub struct Countdown {
    remaining: Option<Duration>,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, duration: Duration) {
        self.remaining = Some(duration);
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    pub fn is_running(&self) -> bool {
        self.remaining.is_some()
    }

    /// Returns true exactly once, on the call where the timer runs out
    pub fn advance(&mut self, dt: Duration) -> bool {
        match self.remaining {
            Some(left) if dt >= left => {
                self.remaining = None;
                true
            }
            Some(left) => {
                self.remaining = Some(left - dt);
                false
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_clock_accumulates() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.frames(Duration::from_millis(10)), 0);
        assert_eq!(clock.frames(Duration::from_millis(10)), 1);
        assert_eq!(clock.frames(FRAME * 2), 2);
    }

    #[test]
    fn test_frame_clock_clamps_stalls() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.frames(Duration::from_secs(3)), MAX_CATCH_UP);
        assert_eq!(clock.frames(Duration::ZERO), 0);
    }

    #[test]
    fn test_ticker_period_change() {
        let mut ticker = Ticker::new(Duration::from_millis(100));
        assert_eq!(ticker.ticks(Duration::from_millis(250)), 2);
        ticker.set_period(Duration::from_millis(25));
        assert_eq!(ticker.ticks(Duration::from_millis(50)), 2);
    }

    #[test]
    fn test_countdown_fires_once() {
        let mut timer = Countdown::new();
        timer.start(Duration::from_millis(600));
        assert!(!timer.advance(Duration::from_millis(500)));
        assert!(timer.advance(Duration::from_millis(100)));
        assert!(!timer.advance(Duration::from_millis(100)));
        assert!(!timer.is_running());
    }
}
