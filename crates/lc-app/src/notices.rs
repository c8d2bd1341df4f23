//! Failure notices collected from the session's event bus

use std::sync::Arc;
use parking_lot::RwLock;

use lc_core::events::events::{ContentLoadFailed, ItemActivated, ListingFailed, ListingLoaded};
use lc_core::events::EventBus;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notices {
    /// Why the channel listing could not be loaded
    pub listing_error: Option<String>,
    /// Index of the item whose content failed, with the reason
    pub content_error: Option<(usize, String)>,
}

impl Notices {
    /// Failure reason for `index`, if its content is the one that failed
    pub fn content_error_for(&self, index: Option<usize>) -> Option<&str> {
        match (&self.content_error, index) {
            (Some((failed, reason)), Some(index)) if *failed == index => Some(reason),
            _ => None,
        }
    }
}

/// Keep `notices` in step with the bus; `changed` runs after every update
pub fn subscribe<F>(bus: &EventBus, notices: Arc<RwLock<Notices>>, changed: F)
where
    F: Fn() + Clone + Send + Sync + 'static,
{
    let (sink, notify) = (notices.clone(), changed.clone());
    bus.on(move |failed: &ListingFailed| {
        sink.write().listing_error = Some(failed.error.clone());
        notify();
    });

    let (sink, notify) = (notices.clone(), changed.clone());
    bus.on(move |_: &ListingLoaded| {
        sink.write().listing_error = None;
        notify();
    });

    let (sink, notify) = (notices.clone(), changed.clone());
    bus.on(move |failed: &ContentLoadFailed| {
        sink.write().content_error = Some((failed.index, failed.error.clone()));
        notify();
    });

    // Moving to another item retires the old failure. The activated item's own
    // failure may already have been reported by its fetch, so it stays.
    bus.on(move |activated: &ItemActivated| {
        let mut notices = notices.write();
        if notices.content_error.as_ref().is_some_and(|(failed, _)| *failed != activated.index) {
            notices.content_error = None;
            drop(notices);
            changed();
        }
    });
}
