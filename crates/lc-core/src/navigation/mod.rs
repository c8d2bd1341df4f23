use serde::{Serialize, Deserialize};

mod engine;
mod item;
mod subscriber;

pub use engine::Navigator;
pub use item::LectureItem;
pub use subscriber::NavigationSubscriber;

use crate::gate::TimerState;

/// Progress of the content fetch for the active item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContentStatus {
    /// No content requested (no active item, or the item has no location)
    #[default]
    Idle,
    /// A fetch is in flight
    Loading,
    /// Content arrived and is in `loaded_content`
    Loaded,
    /// The fetch failed; `loaded_content` is empty
    Failed,
}

/// Snapshot passed to subscribers and renderers on navigation updates
#[derive(Debug, Clone)]
pub struct NavigationContext {
    pub item_count: usize,
    pub current_index: Option<usize>,
    pub active_item: Option<LectureItem>,
    pub loaded_content: String,
    pub content_status: ContentStatus,
    pub timer: TimerState,
    pub can_go_previous: bool,
    pub can_go_next: bool,
}

impl NavigationContext {
    /// Video source the renderer should play, if any
    pub fn video_source(&self) -> Option<&str> {
        self.active_item.as_ref()?.video_source.as_deref()
    }
}
