//! Gate subscriber trait

use super::TimerState;

/// Trait for components that need to respond to countdown changes
pub trait GateSubscriber: Send + Sync {
    /// Called when the countdown is restarted or ticks
    fn on_timer_change(&self, timer: &TimerState);
}
