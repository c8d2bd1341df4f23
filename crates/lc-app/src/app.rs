//! The viewer window

use std::sync::Arc;
use eframe::egui::{self, Context};
use parking_lot::RwLock;
use tracing::{debug, info};

use lc_core::{GateSubscriber, NavigationContext, NavigationSubscriber, TimerState, ViewerSession};
use lc_data::{FileContentLoader, ManifestSource, ViewerConfig};
use crate::notices::{self, Notices};
use lc_ui::{panel_ids, theme::error_color, ChannelList, ContentPane, NavigationAction, NavigationBar, Theme};

/// Requests a repaint whenever the navigator or its gate changes
struct RepaintOnChange {
    ctx: Context,
}

impl NavigationSubscriber for RepaintOnChange {
    fn on_navigation_change(&self, _context: &NavigationContext) {
        self.ctx.request_repaint();
    }
}

impl GateSubscriber for RepaintOnChange {
    fn on_timer_change(&self, _timer: &TimerState) {
        self.ctx.request_repaint();
    }
}

/// Main application state
pub struct LectureChannelApp {
    /// Navigator and listing state
    session: Arc<ViewerSession>,

    config: ViewerConfig,

    channel_list: ChannelList,

    navigation_bar: NavigationBar,

    /// Failures reported on the session's event bus
    notices: Arc<RwLock<Notices>>,

    /// Held so the weak subscriptions stay alive
    _repaint: Arc<RepaintOnChange>,

    /// Tokio runtime driving fetches and the countdown
    runtime: tokio::runtime::Runtime,
}

impl LectureChannelApp {
    pub fn new(cc: &eframe::CreationContext<'_>, runtime: tokio::runtime::Runtime, config: ViewerConfig) -> Self {
        lc_ui::apply_theme(&cc.egui_ctx, &Theme::default());

        let loader = Arc::new(FileContentLoader::new(config.content_root()));
        let session = Arc::new(ViewerSession::new(loader, runtime.handle().clone()));

        let repaint = Arc::new(RepaintOnChange {
            ctx: cc.egui_ctx.clone(),
        });
        session.navigator.add_subscriber(repaint.clone());
        session.navigator.gate().add_subscriber(repaint.clone());

        let notices = Arc::new(RwLock::new(Notices::default()));
        let ctx = cc.egui_ctx.clone();
        notices::subscribe(&session.event_bus, notices.clone(), move || ctx.request_repaint());

        let app = Self {
            session,
            config,
            channel_list: ChannelList::new(),
            navigation_bar: NavigationBar::new(),
            notices,
            _repaint: repaint,
            runtime,
        };
        app.load_listing();
        app
    }

    /// Fetch the manifest in the background
    ///
    /// The outcome reaches the window through the event bus.
    fn load_listing(&self) {
        let source = ManifestSource::new(self.config.manifest.clone());
        let session = self.session.clone();

        info!(manifest = %source.path().display(), "Loading channel listing");
        self.runtime.spawn(async move {
            // The session logs and publishes failures itself
            let _ = session.load_listing(&source).await;
        });
    }

    fn apply(&self, action: NavigationAction) {
        let navigator = &self.session.navigator;
        let moved = match action {
            NavigationAction::Previous => navigator.go_previous(),
            NavigationAction::Next => navigator.go_next(),
        };
        if !moved {
            debug!(?action, "Navigation request ignored");
        }
    }
}

impl eframe::App for LectureChannelApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        // Read keys first; navigating inside the input closure would re-enter the context
        let (previous_key, next_key) = ctx.input(|i| {
            (i.key_pressed(egui::Key::ArrowLeft), i.key_pressed(egui::Key::ArrowRight))
        });
        if previous_key {
            self.apply(NavigationAction::Previous);
        }
        if next_key {
            self.apply(NavigationAction::Next);
        }

        let navigator = self.session.navigator.clone();
        let context = navigator.context();
        let items = navigator.items();
        let channel_name = self.config.display_name(self.session.channel_name().as_deref());

        egui::SidePanel::left(panel_ids::CHANNEL_LIST)
            .resizable(true)
            .default_width(250.0)
            .show(ctx, |ui| {
                if let Some(index) = self.channel_list.ui(ui, &channel_name, &items, context.current_index) {
                    navigator.select_index(index);
                }
            });

        let mut action = None;
        egui::TopBottomPanel::bottom(panel_ids::NAVIGATION).show(ctx, |ui| {
            ui.add_space(4.0);
            action = self.navigation_bar.ui(ui, &context);
            ui.add_space(4.0);
        });
        if let Some(action) = action {
            self.apply(action);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let notices = self.notices.read().clone();
            if let Some(error) = notices.listing_error.as_deref() {
                ui.colored_label(error_color(), format!("Could not load the channel: {error}"));
                ui.separator();
            }
            ContentPane::ui(ui, &context, notices.content_error_for(context.current_index));
        });
    }
}
