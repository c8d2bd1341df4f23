//! Previous/next controls with the dwell countdown

use std::time::Duration;
use egui::{Button, ProgressBar, Ui, Vec2};
use lc_core::{NavigationContext, TimerState};

/// What the user asked the navigation bar for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationAction {
    Previous,
    Next,
}

/// Bottom bar with the previous/next buttons
#[derive(Default)]
pub struct NavigationBar;

impl NavigationBar {
    pub fn new() -> Self {
        Self
    }

    /// Show the bar; returns the action for a clicked button
    pub fn ui(&mut self, ui: &mut Ui, context: &NavigationContext) -> Option<NavigationAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            let button_size = Vec2::new(96.0, 28.0);

            let previous = ui.add_enabled(context.can_go_previous, Button::new("◀ Previous").min_size(button_size));
            if previous.on_hover_text("Previous topic (Left Arrow)").clicked() {
                action = Some(NavigationAction::Previous);
            }

            let next = ui.add_enabled(context.can_go_next, Button::new("Next ▶").min_size(button_size));
            if next.on_hover_text("Next topic (Right Arrow)").clicked() {
                action = Some(NavigationAction::Next);
            }

            if let Some(index) = context.current_index {
                ui.separator();
                ui.label(format!("{} / {}", index + 1, context.item_count));
            }

            if let Some(label) = countdown_label(&context.timer) {
                ui.separator();
                ui.add(
                    ProgressBar::new(context.timer.progress())
                        .desired_width(160.0)
                        .text(label),
                );
            }
        });

        action
    }
}

/// Countdown text while the gate is closed
pub fn countdown_label(timer: &TimerState) -> Option<String> {
    if timer.can_advance {
        return None;
    }
    let remaining = Duration::from_secs(timer.remaining_seconds);
    Some(format!("Next unlocks in {}", humantime::format_duration(remaining)))
}
