//! Sidebar listing the channel's topics

use egui::{Align2, Color32, FontId, Response, Rounding, ScrollArea, Sense, Ui, Vec2};
use lc_core::LectureItem;

use crate::theme::accent_color;

/// Channel list configuration
#[derive(Debug, Clone)]
pub struct ChannelListConfig {
    /// Height of one row
    pub row_height: f32,

    /// Radius of the numbered badge
    pub badge_radius: f32,

    /// Badge fill color
    pub badge_color: Color32,
}

impl Default for ChannelListConfig {
    fn default() -> Self {
        Self {
            row_height: 44.0,
            badge_radius: 13.0,
            badge_color: accent_color(),
        }
    }
}

/// Sidebar widget: channel heading plus one selectable row per item
#[derive(Default)]
pub struct ChannelList {
    config: ChannelListConfig,
}

impl ChannelList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set configuration
    pub fn with_config(mut self, config: ChannelListConfig) -> Self {
        self.config = config;
        self
    }

    /// Show the list; returns the index of a clicked row
    pub fn ui(
        &self,
        ui: &mut Ui,
        channel_name: &str,
        items: &[LectureItem],
        current_index: Option<usize>,
    ) -> Option<usize> {
        ui.heading(channel_name);
        ui.separator();

        if items.is_empty() {
            ui.weak("No topics yet");
            return None;
        }

        let mut clicked = None;
        ScrollArea::vertical()
            .id_source("channel_list_rows")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for (index, item) in items.iter().enumerate() {
                    let response = self.row(ui, index, item, current_index == Some(index));
                    if response.clicked() {
                        clicked = Some(index);
                    }
                }
            });
        clicked
    }

    fn row(&self, ui: &mut Ui, index: usize, item: &LectureItem, selected: bool) -> Response {
        let size = Vec2::new(ui.available_width(), self.config.row_height);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());

        if ui.is_rect_visible(rect) {
            let visuals = ui.style().interact_selectable(&response, selected);
            let painter = ui.painter();
            painter.rect(rect.shrink(1.0), Rounding::same(5.0), visuals.bg_fill, visuals.bg_stroke);

            let badge_center = rect.left_center() + Vec2::new(self.config.badge_radius + 8.0, 0.0);
            painter.circle_filled(badge_center, self.config.badge_radius, self.config.badge_color);
            painter.text(
                badge_center,
                Align2::CENTER_CENTER,
                badge_label(index),
                FontId::proportional(12.0),
                Color32::WHITE,
            );

            let title_pos = badge_center + Vec2::new(self.config.badge_radius + 10.0, 0.0);
            painter.text(
                title_pos,
                Align2::LEFT_CENTER,
                &item.title,
                FontId::proportional(14.0),
                visuals.text_color(),
            );
        }

        let response = response.on_hover_cursor(egui::CursorIcon::PointingHand);
        match &item.description {
            Some(description) => response.on_hover_text(description),
            None => response,
        }
    }
}

/// Text shown in a row's badge; rows are numbered from one
pub fn badge_label(index: usize) -> String {
    (index + 1).to_string()
}
