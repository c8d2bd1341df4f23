//! Dwell-timer gate implementation

use super::{GateSubscriber, TimerState};
use std::sync::{Arc, Weak};
use std::time::Duration;
use parking_lot::RwLock;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::debug;

/// Countdown resolution
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Countdown state stored internally
struct GateState {
    timer: TimerState,
    /// Bumped on every start/cancel; ticks carrying an older value are ignored
    generation: u64,
    ticker: Option<JoinHandle<()>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickOutcome {
    Running,
    Finished,
    Stale,
}

struct GateShared {
    state: RwLock<GateState>,
    subscribers: RwLock<Vec<Weak<dyn GateSubscriber>>>,
}

impl GateShared {
    fn tick(&self, generation: u64) -> TickOutcome {
        let mut state = self.state.write();
        if state.generation != generation {
            return TickOutcome::Stale;
        }
        if state.timer.remaining_seconds == 0 {
            state.ticker = None;
            return TickOutcome::Finished;
        }

        state.timer.remaining_seconds -= 1;
        let outcome = if state.timer.remaining_seconds == 0 {
            state.timer.can_advance = true;
            // The ticker task is the caller; dropping its handle just detaches it
            state.ticker = None;
            TickOutcome::Finished
        } else {
            TickOutcome::Running
        };
        let timer = state.timer;
        drop(state);

        debug!(remaining = timer.remaining_seconds, "Dwell countdown tick");
        self.notify_subscribers(&timer);
        outcome
    }

    fn notify_subscribers(&self, timer: &TimerState) {
        let mut subscribers = self.subscribers.write();

        // Remove any dead weak references
        subscribers.retain(|weak| weak.strong_count() > 0);
        let live: Vec<_> = subscribers.iter().filter_map(Weak::upgrade).collect();
        drop(subscribers);

        for subscriber in live {
            subscriber.on_timer_change(timer);
        }
    }
}

/// Gate that holds forward navigation closed until the active item's
/// dwell time has elapsed
///
/// The gate owns its countdown task. Starting a new countdown, cancelling,
/// or dropping the gate aborts the previous task, and any tick that still
/// slips through is discarded by its generation check.
pub struct DwellGate {
    shared: Arc<GateShared>,
    runtime: Handle,
}

impl DwellGate {
    /// Create an idle gate that spawns its countdown on `runtime`
    pub fn new(runtime: Handle) -> Self {
        let state = GateState {
            timer: TimerState::default(),
            generation: 0,
            ticker: None,
        };

        Self {
            shared: Arc::new(GateShared {
                state: RwLock::new(state),
                subscribers: RwLock::new(Vec::new()),
            }),
            runtime,
        }
    }

    /// Restart the countdown for a newly activated item
    pub fn start(&self, dwell_seconds: u64) {
        let mut state = self.shared.state.write();
        if let Some(ticker) = state.ticker.take() {
            ticker.abort();
        }
        state.generation += 1;
        state.timer = TimerState::started(dwell_seconds);

        if dwell_seconds > 0 {
            let generation = state.generation;
            state.ticker = Some(self.spawn_ticker(generation));
        }
        let timer = state.timer;
        drop(state);

        debug!(dwell_seconds, "Dwell countdown started");
        self.shared.notify_subscribers(&timer);
    }

    /// Stop the countdown, leaving the current permission as it is
    pub fn cancel(&self) {
        let mut state = self.shared.state.write();
        if let Some(ticker) = state.ticker.take() {
            ticker.abort();
            debug!(remaining = state.timer.remaining_seconds, "Dwell countdown cancelled");
        }
        state.generation += 1;
    }

    /// Stop the countdown and return to the idle, open state
    ///
    /// Used when there is no active item left to count down for.
    pub fn reset(&self) {
        let mut state = self.shared.state.write();
        if let Some(ticker) = state.ticker.take() {
            ticker.abort();
        }
        state.generation += 1;
        state.timer = TimerState::default();
        let timer = state.timer;
        drop(state);

        debug!("Dwell countdown reset");
        self.shared.notify_subscribers(&timer);
    }

    /// Whether forward navigation is currently permitted
    pub fn can_advance(&self) -> bool {
        self.shared.state.read().timer.can_advance
    }

    /// Seconds left on the countdown
    pub fn remaining_seconds(&self) -> u64 {
        self.shared.state.read().timer.remaining_seconds
    }

    /// Get the current countdown state
    pub fn timer_state(&self) -> TimerState {
        self.shared.state.read().timer
    }

    /// Whether a countdown task is currently running
    pub fn is_running(&self) -> bool {
        self.shared.state.read().ticker.is_some()
    }

    /// Add a subscriber
    pub fn add_subscriber(&self, subscriber: Arc<dyn GateSubscriber>) {
        let mut subscribers = self.shared.subscribers.write();
        subscribers.push(Arc::downgrade(&subscriber));
    }

    fn spawn_ticker(&self, generation: u64) -> JoinHandle<()> {
        let shared = Arc::downgrade(&self.shared);
        let first_tick = Instant::now() + TICK_PERIOD;

        self.runtime.spawn(async move {
            let mut interval = time::interval_at(first_tick, TICK_PERIOD);
            loop {
                interval.tick().await;
                let Some(shared) = shared.upgrade() else {
                    break;
                };
                if shared.tick(generation) != TickOutcome::Running {
                    break;
                }
            }
        })
    }
}

impl Drop for DwellGate {
    fn drop(&mut self) {
        if let Some(ticker) = self.shared.state.write().ticker.take() {
            ticker.abort();
        }
    }
}
