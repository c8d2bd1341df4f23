//! Core functionality for the lecture channel viewer
//!
//! This crate provides the sequential navigation controller: the navigator
//! that tracks the active lecture item and the dwell-timer gate that paces
//! forward movement through the sequence.

pub mod events;
pub mod gate;
pub mod navigation;
pub mod session;

// Re-export commonly used types
pub use gate::{DwellGate, GateSubscriber, TimerState};
pub use navigation::{
    ContentStatus, LectureItem, NavigationContext, NavigationSubscriber, Navigator,
};
pub use session::ViewerSession;
pub use sources::{ContentLoader, Listing, ListingProvider};

/// Collaborators the core consumes but does not implement
pub mod sources {
    use crate::navigation::LectureItem;

    /// An ordered channel listing as supplied by a listing provider
    #[derive(Debug, Clone, Default)]
    pub struct Listing {
        /// Channel name, if the provider knows one
        pub channel_name: Option<String>,
        /// Items in presentation order
        pub items: Vec<LectureItem>,
    }

    /// Trait for listing providers
    #[async_trait::async_trait]
    pub trait ListingProvider: Send + Sync {
        /// Fetch the ordered sequence of lecture items
        async fn fetch_listing(&self) -> anyhow::Result<Listing>;

        /// Get the provider name/path
        fn provider_name(&self) -> &str;
    }

    /// Trait for content loaders
    #[async_trait::async_trait]
    pub trait ContentLoader: Send + Sync {
        /// Load the text content behind a content location
        async fn load(&self, location: &str) -> anyhow::Result<String>;
    }
}
