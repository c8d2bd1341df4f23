//! Typed events describing what happened to the listing and the active item
//!
//! The navigator and the session publish; the application shell subscribes to
//! surface failures that the navigation context alone cannot explain.

use std::any::{Any, TypeId};
use std::marker::PhantomData;
use parking_lot::Mutex;
use ahash::AHashMap;

/// Viewer-wide event bus
#[derive(Default)]
pub struct EventBus {
    handlers: Mutex<AHashMap<TypeId, Vec<Box<dyn EventHandler>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Common viewer events
pub mod events {
    use super::Event;

    /// A listing was fetched and handed to the navigator
    #[derive(Debug, Clone)]
    pub struct ListingLoaded {
        pub provider_name: String,
        pub item_count: usize,
    }

    /// A listing could not be fetched or parsed
    #[derive(Debug, Clone)]
    pub struct ListingFailed {
        pub provider_name: String,
        pub error: String,
    }

    /// A lecture item became the active item
    #[derive(Debug, Clone)]
    pub struct ItemActivated {
        pub index: usize,
        pub title: String,
        pub dwell_seconds: u64,
    }

    /// Content for the active item could not be loaded
    #[derive(Debug, Clone)]
    pub struct ContentLoadFailed {
        pub index: usize,
        pub location: String,
        pub error: String,
    }

    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(ListingLoaded, ListingFailed, ItemActivated, ContentLoadFailed);
}

/// Closure bound to one concrete event type
struct TypedHandler<E, F> {
    callback: F,
    _event: PhantomData<fn(&E)>,
}

impl<E, F> EventHandler for TypedHandler<E, F>
where
    E: Event,
    F: FnMut(&E) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        if let Some(event) = event.as_any().downcast_ref::<E>() {
            (self.callback)(event);
        }
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type-erased handler for events of type `E`
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        self.handlers
            .lock()
            .entry(TypeId::of::<E>())
            .or_default()
            .push(handler);
    }

    /// Register a closure that receives events of type `E` already downcast
    pub fn on<E, F>(&self, callback: F)
    where
        E: Event,
        F: FnMut(&E) + Send + Sync + 'static,
    {
        self.subscribe::<E>(Box::new(TypedHandler {
            callback,
            _event: PhantomData,
        }));
    }

    /// Publish an event
    ///
    /// Handlers run while the bus is locked, so they must not publish.
    pub fn publish<E: Event>(&self, event: E) {
        let mut handlers = self.handlers.lock();
        if let Some(handlers) = handlers.get_mut(&TypeId::of::<E>()) {
            for handler in handlers.iter_mut() {
                handler.handle(&event);
            }
        }
    }
}
