//! User interface components for the lecture channel viewer
//!
//! Widgets render from a `NavigationContext` snapshot and report what the
//! user asked for; they never drive the navigator themselves.

pub mod channel_list;
pub mod content_pane;
pub mod navigation_bar;
pub mod theme;

pub use channel_list::{ChannelList, ChannelListConfig};
pub use content_pane::ContentPane;
pub use navigation_bar::{countdown_label, NavigationAction, NavigationBar};
pub use theme::{apply_theme, Theme};

// Panel IDs
pub mod panel_ids {
    pub const CHANNEL_LIST: &str = "channel_list_panel";
    pub const NAVIGATION: &str = "navigation_bar_panel";
}
