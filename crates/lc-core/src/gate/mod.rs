use serde::{Serialize, Deserialize};

mod dwell;
mod subscriber;

pub use dwell::{DwellGate, TICK_PERIOD};
pub use subscriber::GateSubscriber;

/// Countdown state for the active lecture item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Dwell duration the countdown was started with
    pub dwell_seconds: u64,
    /// Seconds left before forward navigation unlocks
    pub remaining_seconds: u64,
    /// Whether forward navigation is currently permitted
    pub can_advance: bool,
}

impl TimerState {
    /// Fresh countdown for an item with the given dwell time
    pub fn started(dwell_seconds: u64) -> Self {
        Self {
            dwell_seconds,
            remaining_seconds: dwell_seconds,
            can_advance: dwell_seconds == 0,
        }
    }

    /// Fraction of the dwell time already elapsed, in `[0, 1]`
    pub fn progress(&self) -> f32 {
        if self.dwell_seconds == 0 {
            return 1.0;
        }
        let elapsed = self.dwell_seconds - self.remaining_seconds.min(self.dwell_seconds);
        elapsed as f32 / self.dwell_seconds as f32
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::started(0)
    }
}
