//! Real-time to game-time conversion for the host loop.

use hexrail_core::GameSpeed;

/// Accumulates scaled frame time and reports when months are due.
#[derive(Clone, Debug)]
pub struct SimulationClock {
    month_seconds: f64,
    accumulated: f64,
}

impl SimulationClock {
    /// `month_seconds` is the real time of one month at normal speed.
    pub fn new(month_seconds: f64) -> Self {
        Self {
            month_seconds,
            accumulated: 0.0,
        }
    }

    /// Add a frame of `delta` real seconds. Returns how many months elapsed.
    pub fn tick(&mut self, delta: f64, speed: GameSpeed) -> u32 {
        self.accumulated += delta * speed.multiplier();

        let mut months = 0;
        while self.accumulated >= self.month_seconds {
            self.accumulated -= self.month_seconds;
            months += 1;
        }
        months
    }

    /// Fraction of the current month already elapsed.
    pub fn progress(&self) -> f64 {
        self.accumulated / self.month_seconds
    }
}
