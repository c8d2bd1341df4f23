use serde::{Serialize, Deserialize};

/// One entry in the ordered lecture sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LectureItem {
    /// Display label
    pub title: String,
    /// Free-text summary
    pub description: Option<String>,
    /// Where to fetch the expanded text content
    pub content_location: Option<String>,
    /// Playable video resource
    pub video_source: Option<String>,
    /// Minimum seconds the item stays active before advancing is allowed
    pub dwell_seconds: u64,
}

impl LectureItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            content_location: None,
            video_source: None,
            dwell_seconds: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_content_location(mut self, location: impl Into<String>) -> Self {
        self.content_location = Some(location.into());
        self
    }

    pub fn with_video_source(mut self, source: impl Into<String>) -> Self {
        self.video_source = Some(source.into());
        self
    }

    pub fn with_dwell_seconds(mut self, seconds: u64) -> Self {
        self.dwell_seconds = seconds;
        self
    }

    /// Whether advancing past this item is gated at all
    pub fn is_gated(&self) -> bool {
        self.dwell_seconds > 0
    }
}
