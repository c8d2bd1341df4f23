//! Main pane showing the active lecture item

use egui::{RichText, ScrollArea, Ui};
use lc_core::{ContentStatus, NavigationContext};

use crate::theme::error_color;

pub const PLACEHOLDER_TITLE: &str = "Select a Topic";
pub const PLACEHOLDER_DESCRIPTION: &str = "Select a topic from the sidebar to show its content here.";

/// Central pane: title, video link, description and loaded text
pub struct ContentPane;

impl ContentPane {
    /// `failure` is the reason reported for the active item's last failed fetch
    pub fn ui(ui: &mut Ui, context: &NavigationContext, failure: Option<&str>) {
        ui.heading(heading_text(context));
        ui.add_space(8.0);

        // The renderer gets the source as a value; nothing is shown without one
        if let Some(source) = context.video_source() {
            ui.horizontal(|ui| {
                ui.label("▶");
                ui.hyperlink_to("Watch video", source);
            });
            ui.small(source);
            ui.add_space(8.0);
        }

        if let Some(description) = description_text(context) {
            ui.label(description);
            ui.add_space(8.0);
        }

        match context.content_status {
            ContentStatus::Idle => {}
            ContentStatus::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.weak("Loading…");
                });
            }
            ContentStatus::Loaded => {
                ui.separator();
                ScrollArea::vertical()
                    .id_source("content_pane_text")
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ui.label(&context.loaded_content);
                    });
            }
            ContentStatus::Failed => {
                ui.label(RichText::new(failure_text(failure)).color(error_color()));
            }
        }
    }
}

fn heading_text(context: &NavigationContext) -> &str {
    context
        .active_item
        .as_ref()
        .map_or(PLACEHOLDER_TITLE, |item| item.title.as_str())
}

fn description_text(context: &NavigationContext) -> Option<&str> {
    match &context.active_item {
        Some(item) => item.description.as_deref(),
        None => Some(PLACEHOLDER_DESCRIPTION),
    }
}

fn failure_text(reason: Option<&str>) -> String {
    match reason {
        Some(reason) => format!("Content could not be loaded: {reason}"),
        None => "Content could not be loaded.".to_string(),
    }
}
