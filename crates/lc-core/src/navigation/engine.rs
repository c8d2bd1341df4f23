//! Navigator implementation

use super::{ContentStatus, LectureItem, NavigationContext, NavigationSubscriber};
use crate::events::events::{ContentLoadFailed, ItemActivated};
use crate::events::EventBus;
use crate::gate::{DwellGate, TimerState};
use crate::sources::ContentLoader;
use std::sync::{Arc, Weak};
use parking_lot::{Mutex, RwLock};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Navigation state stored internally
struct NavigationState {
    items: Arc<[LectureItem]>,
    current_index: Option<usize>,
    loaded_content: String,
    content_status: ContentStatus,
    /// Identifies the current activation; fetches started under an older
    /// ticket are dropped on arrival
    selection_ticket: u64,
    fetch: Option<JoinHandle<()>>,
}

impl NavigationState {
    fn has_next(&self) -> bool {
        self.current_index
            .map_or(false, |idx| idx + 1 < self.items.len())
    }

    fn has_previous(&self) -> bool {
        self.current_index.map_or(false, |idx| idx > 0)
    }
}

struct NavigatorShared {
    state: RwLock<NavigationState>,
    /// Serialises transitions so the index and the gate move together
    transition: Mutex<()>,
    gate: DwellGate,
    event_bus: Arc<EventBus>,
    subscribers: RwLock<Vec<Weak<dyn NavigationSubscriber>>>,
}

impl NavigatorShared {
    fn context(&self) -> NavigationContext {
        let state = self.state.read();
        let timer = self.gate.timer_state();
        NavigationContext {
            item_count: state.items.len(),
            current_index: state.current_index,
            active_item: state.current_index.and_then(|idx| state.items.get(idx)).cloned(),
            loaded_content: state.loaded_content.clone(),
            content_status: state.content_status,
            timer,
            can_go_previous: state.has_previous(),
            can_go_next: state.has_next() && timer.can_advance,
        }
    }

    /// Apply a finished fetch if it still belongs to the current activation
    fn apply_content(&self, index: usize, location: &str, ticket: u64, result: anyhow::Result<String>) {
        let mut state = self.state.write();
        if state.selection_ticket != ticket {
            debug!(index, location, "Dropping stale content response");
            return;
        }
        state.fetch = None;

        match result {
            Ok(text) => {
                state.loaded_content = text;
                state.content_status = ContentStatus::Loaded;
                drop(state);
                debug!(index, location, "Content loaded");
            }
            Err(e) => {
                state.loaded_content.clear();
                state.content_status = ContentStatus::Failed;
                drop(state);
                let error = format!("{e:#}");
                warn!(index, location, %error, "Failed to load content");
                self.event_bus.publish(ContentLoadFailed {
                    index,
                    location: location.to_string(),
                    error,
                });
            }
        }

        self.notify_subscribers();
    }

    /// Notify all subscribers of navigation change
    fn notify_subscribers(&self) {
        let context = self.context();
        let mut subscribers = self.subscribers.write();

        // Remove any dead weak references
        subscribers.retain(|weak| weak.strong_count() > 0);
        let live: Vec<_> = subscribers.iter().filter_map(Weak::upgrade).collect();
        drop(subscribers);

        for subscriber in live {
            subscriber.on_navigation_change(&context);
        }
    }
}

/// Sequential navigator over a channel's lecture items
///
/// Selection updates the index, the loaded content and the dwell gate
/// synchronously; the content fetch runs on the runtime and only lands if no
/// other selection happened in between.
///
/// Transitions are serialised. Gate subscribers are called while a
/// transition is in progress and must not navigate from that callback;
/// navigation subscribers and event handlers run after it completes.
pub struct Navigator {
    shared: Arc<NavigatorShared>,
    loader: Arc<dyn ContentLoader>,
    runtime: Handle,
}

impl Navigator {
    /// Create an empty navigator
    pub fn new(loader: Arc<dyn ContentLoader>, event_bus: Arc<EventBus>, runtime: Handle) -> Self {
        let state = NavigationState {
            items: Arc::from(Vec::new()),
            current_index: None,
            loaded_content: String::new(),
            content_status: ContentStatus::Idle,
            selection_ticket: 0,
            fetch: None,
        };

        Self {
            shared: Arc::new(NavigatorShared {
                state: RwLock::new(state),
                transition: Mutex::new(()),
                gate: DwellGate::new(runtime.clone()),
                event_bus,
                subscribers: RwLock::new(Vec::new()),
            }),
            loader,
            runtime,
        }
    }

    /// Replace the sequence wholesale and activate its first item
    pub fn load_sequence(&self, items: impl Into<Arc<[LectureItem]>>) {
        let items = items.into();
        let activated = {
            let _transition = self.shared.transition.lock();
            let previous_fetch = {
                let mut state = self.shared.state.write();
                state.items = items.clone();
                state.current_index = None;
                state.selection_ticket += 1;
                state.loaded_content.clear();
                state.content_status = ContentStatus::Idle;
                state.fetch.take()
            };
            if let Some(fetch) = previous_fetch {
                fetch.abort();
            }

            if items.is_empty() {
                // No active item, so no countdown either
                self.shared.gate.reset();
                None
            } else {
                self.activate(0)
            }
        };

        match activated {
            Some(item) => {
                info!(count = items.len(), "Loaded lecture sequence");
                self.announce(0, item);
            }
            None => {
                info!("Loaded empty lecture sequence");
                self.shared.notify_subscribers();
            }
        }
    }

    /// Activate the item at `index`
    ///
    /// Returns `false` and leaves everything untouched when `index` is out of
    /// range. Selecting the already active index counts as a fresh activation.
    pub fn select_index(&self, index: usize) -> bool {
        let activated = {
            let _transition = self.shared.transition.lock();
            self.activate(index)
        };
        self.finish(index, activated)
    }

    /// Move to the next item if one exists and the gate is open
    pub fn go_next(&self) -> bool {
        let (next, activated) = {
            let _transition = self.shared.transition.lock();
            let next = {
                let state = self.shared.state.read();
                match state.current_index {
                    Some(idx) if idx + 1 < state.items.len() => idx + 1,
                    _ => {
                        debug!("Already at end");
                        return false;
                    }
                }
            };

            if !self.shared.gate.can_advance() {
                debug!(remaining = self.shared.gate.remaining_seconds(), "Advance blocked by dwell timer");
                return false;
            }
            (next, self.activate(next))
        };
        self.finish(next, activated)
    }

    /// Move to the previous item; never gated
    pub fn go_previous(&self) -> bool {
        let (previous, activated) = {
            let _transition = self.shared.transition.lock();
            let previous = self.shared.state.read().current_index.and_then(|idx| idx.checked_sub(1));
            let Some(previous) = previous else {
                debug!("Already at beginning");
                return false;
            };
            (previous, self.activate(previous))
        };
        self.finish(previous, activated)
    }

    /// Stop the countdown and abandon any in-flight fetch
    pub fn shutdown(&self) {
        let _transition = self.shared.transition.lock();
        let fetch = {
            let mut state = self.shared.state.write();
            state.selection_ticket += 1;
            state.fetch.take()
        };
        if let Some(fetch) = fetch {
            fetch.abort();
        }
        self.shared.gate.cancel();
    }

    /// Get current navigation context
    pub fn context(&self) -> NavigationContext {
        self.shared.context()
    }

    pub fn items(&self) -> Arc<[LectureItem]> {
        self.shared.state.read().items.clone()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.shared.state.read().current_index
    }

    pub fn active_item(&self) -> Option<LectureItem> {
        let state = self.shared.state.read();
        state.current_index.and_then(|idx| state.items.get(idx)).cloned()
    }

    /// Video source for the renderer; `None` renders nothing
    pub fn active_video_source(&self) -> Option<String> {
        self.active_item().and_then(|item| item.video_source)
    }

    pub fn loaded_content(&self) -> String {
        self.shared.state.read().loaded_content.clone()
    }

    pub fn content_status(&self) -> ContentStatus {
        self.shared.state.read().content_status
    }

    pub fn timer_state(&self) -> TimerState {
        self.shared.gate.timer_state()
    }

    pub fn can_go_previous(&self) -> bool {
        self.shared.state.read().has_previous()
    }

    pub fn can_go_next(&self) -> bool {
        self.shared.state.read().has_next() && self.shared.gate.can_advance()
    }

    /// The dwell gate attached to this navigator
    pub fn gate(&self) -> &DwellGate {
        &self.shared.gate
    }

    /// Add a subscriber
    pub fn add_subscriber(&self, subscriber: Arc<dyn NavigationSubscriber>) {
        let mut subscribers = self.shared.subscribers.write();
        subscribers.push(Arc::downgrade(&subscriber));
    }

    /// Index, content reset, gate restart and fetch for one activation
    ///
    /// Callers hold the transition lock, so the index and the gate always
    /// describe the same item.
    fn activate(&self, index: usize) -> Option<LectureItem> {
        let (item, ticket, previous_fetch) = {
            let mut state = self.shared.state.write();
            let Some(item) = state.items.get(index).cloned() else {
                debug!(index, count = state.items.len(), "Ignoring out-of-range selection");
                return None;
            };
            state.current_index = Some(index);
            state.selection_ticket += 1;
            state.loaded_content.clear();
            state.content_status = if item.content_location.is_some() {
                ContentStatus::Loading
            } else {
                ContentStatus::Idle
            };
            (item, state.selection_ticket, state.fetch.take())
        };
        if let Some(fetch) = previous_fetch {
            fetch.abort();
        }

        self.shared.gate.start(item.dwell_seconds);

        if let Some(location) = item.content_location.clone() {
            let fetch = self.spawn_fetch(index, location, ticket);
            let mut state = self.shared.state.write();
            if state.selection_ticket == ticket {
                state.fetch = Some(fetch);
            } else {
                fetch.abort();
            }
        }
        Some(item)
    }

    fn finish(&self, index: usize, activated: Option<LectureItem>) -> bool {
        match activated {
            Some(item) => {
                self.announce(index, item);
                true
            }
            None => false,
        }
    }

    /// Log, publish and notify once the transition lock is released
    fn announce(&self, index: usize, item: LectureItem) {
        info!(index, title = %item.title, dwell_seconds = item.dwell_seconds, "Selected lecture item");
        self.shared.event_bus.publish(ItemActivated {
            index,
            title: item.title,
            dwell_seconds: item.dwell_seconds,
        });
        self.shared.notify_subscribers();
    }

    fn spawn_fetch(&self, index: usize, location: String, ticket: u64) -> JoinHandle<()> {
        let loader = self.loader.clone();
        let shared = Arc::downgrade(&self.shared);

        self.runtime.spawn(async move {
            let result = loader.load(&location).await;
            if let Some(shared) = shared.upgrade() {
                shared.apply_content(index, &location, ticket, result);
            }
        })
    }
}

impl Drop for Navigator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::AHashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time;

    /// Loader answering each location after a fixed delay
    #[derive(Default)]
    struct ScriptedLoader {
        responses: AHashMap<String, (Duration, Result<String, String>)>,
    }

    impl ScriptedLoader {
        fn respond(mut self, location: &str, delay_ms: u64, text: &str) -> Self {
            self.responses.insert(
                location.to_string(),
                (Duration::from_millis(delay_ms), Ok(text.to_string())),
            );
            self
        }

        fn fail(mut self, location: &str, delay_ms: u64, error: &str) -> Self {
            self.responses.insert(
                location.to_string(),
                (Duration::from_millis(delay_ms), Err(error.to_string())),
            );
            self
        }
    }

    #[async_trait::async_trait]
    impl ContentLoader for ScriptedLoader {
        async fn load(&self, location: &str) -> anyhow::Result<String> {
            let Some((delay, response)) = self.responses.get(location) else {
                anyhow::bail!("unknown location {location}");
            };
            time::sleep(*delay).await;
            response.clone().map_err(anyhow::Error::msg)
        }
    }

    #[derive(Default)]
    struct CountingSubscriber {
        calls: AtomicUsize,
    }

    impl NavigationSubscriber for CountingSubscriber {
        fn on_navigation_change(&self, _context: &NavigationContext) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn navigator(loader: ScriptedLoader) -> Navigator {
        Navigator::new(Arc::new(loader), Arc::new(EventBus::new()), Handle::current())
    }

    fn dwell_sequence(dwell: &[u64]) -> Vec<LectureItem> {
        dwell
            .iter()
            .enumerate()
            .map(|(idx, seconds)| LectureItem::new(format!("Topic {idx}")).with_dwell_seconds(*seconds))
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_sequence() {
        let nav = navigator(ScriptedLoader::default());
        nav.load_sequence(Vec::<LectureItem>::new());

        assert_eq!(nav.current_index(), None);
        assert!(nav.active_item().is_none());
        assert!(!nav.go_next());
        assert!(!nav.go_previous());
        assert!(!nav.select_index(0));
        assert!(!nav.can_go_next());
        assert!(!nav.can_go_previous());
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_index_in_and_out_of_range() {
        let nav = navigator(ScriptedLoader::default());
        let items = dwell_sequence(&[0, 0, 0]);
        nav.load_sequence(items.clone());

        assert!(nav.select_index(2));
        assert_eq!(nav.current_index(), Some(2));
        assert_eq!(nav.active_item().as_ref(), Some(&items[2]));

        assert!(!nav.select_index(3));
        assert!(!nav.select_index(usize::MAX));
        assert_eq!(nav.current_index(), Some(2));
        assert_eq!(nav.active_item().as_ref(), Some(&items[2]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dwell_gated_walkthrough() {
        let nav = navigator(ScriptedLoader::default());
        nav.load_sequence(dwell_sequence(&[0, 5, 0]));

        assert_eq!(nav.current_index(), Some(0));
        assert!(nav.timer_state().can_advance);

        assert!(nav.go_next());
        assert_eq!(nav.current_index(), Some(1));
        assert!(!nav.timer_state().can_advance);
        assert_eq!(nav.timer_state().remaining_seconds, 5);

        for _ in 0..4 {
            time::sleep(Duration::from_secs(1)).await;
            assert!(!nav.go_next());
            assert_eq!(nav.current_index(), Some(1));
        }

        time::sleep(Duration::from_millis(1_500)).await;
        assert!(nav.timer_state().can_advance);
        assert!(nav.can_go_next());
        assert!(nav.go_next());
        assert_eq!(nav.current_index(), Some(2));

        // End of the sequence
        assert!(!nav.go_next());
        assert_eq!(nav.current_index(), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_previous_ignores_gate() {
        let nav = navigator(ScriptedLoader::default());
        nav.load_sequence(dwell_sequence(&[0, 30]));
        assert!(nav.go_next());
        assert!(!nav.can_go_next());

        assert!(nav.can_go_previous());
        assert!(nav.go_previous());
        assert_eq!(nav.current_index(), Some(0));
        assert!(!nav.go_previous());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reselect_resets_countdown() {
        let nav = navigator(ScriptedLoader::default());
        nav.load_sequence(dwell_sequence(&[5, 0]));

        time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(nav.timer_state().remaining_seconds, 3);

        assert!(nav.select_index(0));
        assert_eq!(nav.timer_state().remaining_seconds, 5);
        assert!(!nav.timer_state().can_advance);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_fetch_does_not_overwrite_newer_selection() {
        let loader = ScriptedLoader::default()
            .respond("a.md", 3_000, "A")
            .respond("b.md", 1_000, "B");
        let nav = navigator(loader);
        nav.load_sequence(vec![
            LectureItem::new("A").with_content_location("a.md"),
            LectureItem::new("B").with_content_location("b.md"),
        ]);
        assert_eq!(nav.content_status(), ContentStatus::Loading);

        assert!(nav.select_index(1));
        assert_eq!(nav.loaded_content(), "");

        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(nav.loaded_content(), "B");
        assert_eq!(nav.content_status(), ContentStatus::Loaded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_ticket_is_dropped() {
        let loader = ScriptedLoader::default()
            .respond("a.md", 0, "A")
            .respond("b.md", 0, "B");
        let nav = navigator(loader);
        nav.load_sequence(vec![
            LectureItem::new("A").with_content_location("a.md"),
            LectureItem::new("B").with_content_location("b.md"),
        ]);
        let ticket_for_a = nav.shared.state.read().selection_ticket;

        nav.select_index(1);
        time::sleep(Duration::from_millis(10)).await;
        assert_eq!(nav.loaded_content(), "B");

        // A response for the earlier activation arriving now changes nothing
        nav.shared.apply_content(0, "a.md", ticket_for_a, Ok("A".to_string()));
        assert_eq!(nav.loaded_content(), "B");
        assert_eq!(nav.current_index(), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_content_failure_clears_and_reports() {
        let loader = ScriptedLoader::default()
            .respond("ok.md", 0, "fine")
            .fail("broken.md", 0, "not found");
        let event_bus = Arc::new(EventBus::new());
        let failures = Arc::new(Mutex::new(Vec::new()));
        let sink = failures.clone();
        event_bus.on(move |failed: &ContentLoadFailed| sink.lock().push(failed.location.clone()));

        let nav = Navigator::new(Arc::new(loader), event_bus, Handle::current());
        nav.load_sequence(vec![
            LectureItem::new("Ok").with_content_location("ok.md"),
            LectureItem::new("Broken").with_content_location("broken.md"),
        ]);
        time::sleep(Duration::from_millis(10)).await;
        assert_eq!(nav.loaded_content(), "fine");

        nav.select_index(1);
        time::sleep(Duration::from_millis(10)).await;
        assert_eq!(nav.loaded_content(), "");
        assert_eq!(nav.content_status(), ContentStatus::Failed);
        assert_eq!(*failures.lock(), vec!["broken.md".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_item_without_location_has_no_content() {
        let nav = navigator(ScriptedLoader::default());
        nav.load_sequence(vec![
            LectureItem::new("Video only").with_video_source("https://example.com/v.mp4"),
        ]);

        assert_eq!(nav.content_status(), ContentStatus::Idle);
        assert_eq!(nav.loaded_content(), "");
        assert_eq!(nav.active_video_source().as_deref(), Some("https://example.com/v.mp4"));
        assert_eq!(nav.context().video_source(), Some("https://example.com/v.mp4"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reload_replaces_sequence() {
        let nav = navigator(ScriptedLoader::default());
        nav.load_sequence(dwell_sequence(&[0, 0, 0]));
        nav.select_index(2);

        nav.load_sequence(dwell_sequence(&[7]));
        assert_eq!(nav.items().len(), 1);
        assert_eq!(nav.current_index(), Some(0));
        assert_eq!(nav.timer_state().remaining_seconds, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_notified_on_transitions() {
        let loader = ScriptedLoader::default().respond("a.md", 100, "A");
        let nav = navigator(loader);
        let subscriber = Arc::new(CountingSubscriber::default());
        nav.add_subscriber(subscriber.clone());

        nav.load_sequence(vec![LectureItem::new("A").with_content_location("a.md")]);
        assert_eq!(subscriber.calls.load(Ordering::SeqCst), 1);

        time::sleep(Duration::from_millis(200)).await;
        assert_eq!(subscriber.calls.load(Ordering::SeqCst), 2);

        // Rejected requests are silent
        nav.go_next();
        nav.select_index(4);
        assert_eq!(subscriber.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_countdown() {
        let nav = navigator(ScriptedLoader::default());
        nav.load_sequence(dwell_sequence(&[10]));
        assert!(nav.gate().is_running());

        nav.shutdown();
        assert!(!nav.gate().is_running());
        time::sleep(Duration::from_secs(3)).await;
        assert_eq!(nav.timer_state().remaining_seconds, 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_reload_clears_countdown() {
        let nav = navigator(ScriptedLoader::default());
        nav.load_sequence(dwell_sequence(&[20]));
        time::sleep(Duration::from_millis(3_500)).await;
        assert_eq!(nav.timer_state().remaining_seconds, 17);

        nav.load_sequence(Vec::<LectureItem>::new());
        let context = nav.context();
        assert_eq!(context.current_index, None);
        assert_eq!(context.timer, TimerState::default());
        assert!(!nav.gate().is_running());

        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(nav.timer_state(), TimerState::default());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_selection_keeps_gate_in_step() {
        let nav = navigator(ScriptedLoader::default());
        nav.load_sequence(dwell_sequence(&[3, 7]));

        for _ in 0..200 {
            let barrier = std::sync::Barrier::new(2);
            std::thread::scope(|scope| {
                for index in [0, 1] {
                    let (nav, barrier) = (&nav, &barrier);
                    scope.spawn(move || {
                        barrier.wait();
                        nav.select_index(index);
                    });
                }
            });

            let context = nav.context();
            let active = context.active_item.expect("active item");
            assert_eq!(context.timer.dwell_seconds, active.dwell_seconds);
        }
    }

    #[derive(Default)]
    struct TickCounter {
        calls: AtomicUsize,
    }

    impl crate::gate::GateSubscriber for TickCounter {
        fn on_timer_change(&self, _timer: &TimerState) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_countdown() {
        let nav = navigator(ScriptedLoader::default());
        let ticks = Arc::new(TickCounter::default());
        nav.gate().add_subscriber(ticks.clone());

        nav.load_sequence(dwell_sequence(&[10]));
        time::sleep(Duration::from_millis(1_500)).await;
        let seen = ticks.calls.load(Ordering::SeqCst);
        assert_eq!(seen, 2);

        drop(nav);
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(ticks.calls.load(Ordering::SeqCst), seen);
    }
}
