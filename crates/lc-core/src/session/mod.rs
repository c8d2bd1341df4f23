use std::sync::Arc;
use parking_lot::RwLock;
use tokio::runtime::Handle;
use tracing::{error, info};

use crate::events::events::{ListingFailed, ListingLoaded};
use crate::events::EventBus;
use crate::navigation::Navigator;
use crate::sources::{ContentLoader, ListingProvider};

/// One viewer session: the navigator plus the listing it was fed
pub struct ViewerSession {
    /// The navigator
    pub navigator: Arc<Navigator>,

    /// The event bus
    pub event_bus: Arc<EventBus>,

    /// Channel name reported by the last successful listing
    channel_name: Arc<RwLock<Option<String>>>,
}

impl ViewerSession {
    /// Create a new session with an empty navigator
    pub fn new(loader: Arc<dyn ContentLoader>, runtime: Handle) -> Self {
        let event_bus = Arc::new(EventBus::new());
        let navigator = Navigator::new(loader, event_bus.clone(), runtime);

        Self {
            navigator: Arc::new(navigator),
            event_bus,
            channel_name: Arc::new(RwLock::new(None)),
        }
    }

    /// Fetch a listing and hand its items to the navigator
    ///
    /// On failure the navigator keeps whatever sequence it had before.
    pub async fn load_listing(&self, provider: &dyn ListingProvider) -> anyhow::Result<usize> {
        let listing = match provider.fetch_listing().await {
            Ok(listing) => listing,
            Err(e) => {
                let message = format!("{e:#}");
                error!(provider = provider.provider_name(), error = %message, "Failed to load channel listing");
                self.event_bus.publish(ListingFailed {
                    provider_name: provider.provider_name().to_string(),
                    error: message,
                });
                return Err(e);
            }
        };

        let item_count = listing.items.len();
        *self.channel_name.write() = listing.channel_name;
        self.navigator.load_sequence(listing.items);

        info!(provider = provider.provider_name(), item_count, "Channel listing loaded");
        self.event_bus.publish(ListingLoaded {
            provider_name: provider.provider_name().to_string(),
            item_count,
        });

        Ok(item_count)
    }

    /// Channel name from the listing, if it carried one
    pub fn channel_name(&self) -> Option<String> {
        self.channel_name.read().clone()
    }
}
