//! Channel manifest parsing
//!
//! A manifest looks like
//!
//! ```json
//! { "title": "Channel", "data": { "items": [
//!   { "title": "Intro", "description": "...", "location": "topics/intro.md",
//!     "metadata": { "source": "https://example.com/intro.mp4", "time": 30 } } ] } }
//! ```

mod source;

pub use source::ManifestSource;

use lc_core::{LectureItem, Listing};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::ManifestError;

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    name: Option<String>,
    data: RawData,
}

#[derive(Debug, Deserialize)]
struct RawData {
    #[serde(default)]
    items: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    location: Option<String>,
    /// Some manifests put the video next to the title instead of in metadata
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    metadata: RawMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    time: Option<Value>,
}

/// Parse manifest text into an ordered listing
///
/// Either every item converts or the whole manifest is rejected.
pub fn parse_manifest(text: &str) -> Result<Listing, ManifestError> {
    let raw: RawManifest = serde_json::from_str(text)?;

    let items = raw
        .data
        .items
        .into_iter()
        .enumerate()
        .map(|(index, item)| convert_item(index, item))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Listing {
        channel_name: non_blank(raw.title).or_else(|| non_blank(raw.name)),
        items,
    })
}

fn convert_item(index: usize, raw: RawItem) -> Result<LectureItem, ManifestError> {
    let title = non_blank(raw.title).ok_or(ManifestError::MissingTitle { index })?;

    Ok(LectureItem {
        title,
        description: non_blank(raw.description),
        content_location: non_blank(raw.location),
        video_source: non_blank(raw.metadata.source).or_else(|| non_blank(raw.source)),
        dwell_seconds: dwell_seconds(index, raw.metadata.time.as_ref()),
    })
}

/// Read `metadata.time`; anything that is not a non-negative integer counts as zero
fn dwell_seconds(index: usize, value: Option<&Value>) -> u64 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Number(number)) => number.as_u64().unwrap_or_else(|| {
            warn!(index, time = %number, "Ignoring invalid dwell time");
            0
        }),
        Some(Value::String(text)) if text.trim().is_empty() => 0,
        Some(Value::String(text)) => text.trim().parse().unwrap_or_else(|_| {
            warn!(index, time = %text, "Ignoring invalid dwell time");
            0
        }),
        Some(other) => {
            warn!(index, time = %other, "Ignoring invalid dwell time");
            0
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
